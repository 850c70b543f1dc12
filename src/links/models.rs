//! Link data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Length of server-generated short codes
pub const SHORT_CODE_LENGTH: usize = 7;
/// Lifetime of anonymously created links
pub const ANONYMOUS_LINK_TTL_HOURS: i64 = 24;

/// Link database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub user_id: Option<i64>,
    pub password: Option<String>,
    pub accessible_at: Option<String>,
    pub expires_at: Option<String>,
    pub archived: Option<String>,
    pub clicks: i64,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateLinkRequest {
    pub url: String,
    pub short_code: Option<String>,
    pub password: Option<String>,
    pub accessible_at: Option<String>,
    pub expires_at: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UpdateLinkRequest {
    pub url: Option<String>,
    pub short_code: Option<String>,
    pub password: Option<String>,
    pub accessible_at: Option<String>,
    pub expires_at: Option<String>,
    pub archived: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

#[derive(Deserialize, Debug)]
pub struct ListLinksQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_sort_by", rename = "sortBy")]
    pub sort_by: String,
    #[serde(default = "default_sort_order", rename = "sortOrder")]
    pub sort_order: String,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl Default for ListLinksQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
            status: None,
            search: None,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ListMeta {
    #[serde(rename = "totalItems")]
    pub total_items: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: i64,
}

#[derive(Serialize, Debug)]
pub struct LinksPage {
    pub data: Vec<Link>,
    pub meta: ListMeta,
}
