use chrono::{Duration, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::models::{
    CreateLinkRequest, Link, LinksPage, ListLinksQuery, ListMeta, UpdateLinkRequest,
    ANONYMOUS_LINK_TTL_HOURS, SHORT_CODE_LENGTH,
};
use crate::common::error::is_unique_violation;
use crate::common::helpers::generate_short_code;
use crate::common::{ApiError, Validator};

/// Sort columns accepted by the listing endpoint; anything else falls back
/// to `created_at`
const ALLOWED_SORT_COLUMNS: &[&str] = &["created_at", "url", "short_code", "expires_at", "clicks"];

/// Page size cap for the listing endpoint
const MAX_PAGE_SIZE: i64 = 100;
/// Page number cap; keeps `(page - 1) * limit` far from i64 overflow
const MAX_PAGE: i64 = 1_000_000;

pub struct LinksService {
    db: SqlitePool,
}

impl LinksService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Paginated listing of one user's links with optional status filter
    /// and substring search over url/short_code
    pub async fn list_links(
        &self,
        user_id: i64,
        query: &ListLinksQuery,
    ) -> Result<LinksPage, ApiError> {
        let page = query.page.clamp(1, MAX_PAGE);
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let sort_by = if ALLOWED_SORT_COLUMNS.contains(&query.sort_by.as_str()) {
            query.sort_by.as_str()
        } else {
            "created_at"
        };
        let sort_order = if query.sort_order.eq_ignore_ascii_case("asc") {
            "ASC"
        } else {
            "DESC"
        };

        let mut where_sql = String::from("WHERE user_id = ?");
        match query.status.as_deref() {
            Some("active") => where_sql.push_str(" AND archived IS NULL"),
            Some("archived") => where_sql.push_str(" AND archived IS NOT NULL"),
            _ => {}
        }
        let search_pattern = query.search.as_ref().map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            where_sql.push_str(" AND (url LIKE ? OR short_code LIKE ?)");
        }

        // Sort column and order are whitelisted above; everything
        // user-controlled goes through binds
        let select_sql = format!(
            "SELECT * FROM links {} ORDER BY {} {} LIMIT ? OFFSET ?",
            where_sql, sort_by, sort_order
        );
        let count_sql = format!("SELECT COUNT(*) FROM links {}", where_sql);

        let mut select = sqlx::query_as::<_, Link>(&select_sql).bind(user_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
        if let Some(pattern) = &search_pattern {
            select = select.bind(pattern).bind(pattern);
            count = count.bind(pattern).bind(pattern);
        }

        let data = select
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
        let total_items = count.fetch_one(&self.db).await.map_err(ApiError::DatabaseError)?;

        let total_pages = (total_items + limit - 1) / limit;

        debug!(user_id, page, limit, total_items, "Listed links");

        Ok(LinksPage {
            data,
            meta: ListMeta {
                total_items,
                total_pages,
                current_page: page,
                items_per_page: limit,
            },
        })
    }

    /// Creates a link.
    ///
    /// Anonymous creators get the safety policy: a server-generated short
    /// code, no password, no visibility window, and a fixed 24-hour expiry.
    /// Whatever the request body supplied for those fields is discarded.
    pub async fn create_link(
        &self,
        user_id: Option<i64>,
        mut request: CreateLinkRequest,
    ) -> Result<Link, ApiError> {
        let validation = request.validate(&request);
        if !validation.is_valid {
            return Err(ApiError::BadRequest(validation.error_message()));
        }

        if user_id.is_none() {
            request.short_code = None;
            request.password = None;
            request.accessible_at = None;
            request.expires_at = Some(timestamp_in_hours(ANONYMOUS_LINK_TTL_HOURS));
        }

        let short_code = request
            .short_code
            .unwrap_or_else(|| generate_short_code(SHORT_CODE_LENGTH));

        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (url, short_code, user_id, password, accessible_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&request.url)
        .bind(&short_code)
        .bind(user_id)
        .bind(&request.password)
        .bind(&request.accessible_at)
        .bind(&request.expires_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Short code already exists.".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(
            link_id = link.id,
            short_code = %link.short_code,
            anonymous = user_id.is_none(),
            "Link created"
        );

        Ok(link)
    }

    /// Owner-scoped partial update
    pub async fn update_link(
        &self,
        user_id: i64,
        link_id: i64,
        request: UpdateLinkRequest,
    ) -> Result<Link, ApiError> {
        let validation = request.validate(&request);
        if !validation.is_valid {
            return Err(ApiError::BadRequest(validation.error_message()));
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE links SET ");
        let mut fields = builder.separated(", ");
        let mut has_updates = false;

        if let Some(url) = &request.url {
            fields.push("url = ").push_bind_unseparated(url);
            has_updates = true;
        }
        if let Some(short_code) = &request.short_code {
            fields.push("short_code = ").push_bind_unseparated(short_code);
            has_updates = true;
        }
        if let Some(password) = &request.password {
            fields.push("password = ").push_bind_unseparated(password);
            has_updates = true;
        }
        if let Some(accessible_at) = &request.accessible_at {
            fields
                .push("accessible_at = ")
                .push_bind_unseparated(accessible_at);
            has_updates = true;
        }
        if let Some(expires_at) = &request.expires_at {
            fields.push("expires_at = ").push_bind_unseparated(expires_at);
            has_updates = true;
        }
        if let Some(archived) = &request.archived {
            fields.push("archived = ").push_bind_unseparated(archived);
            has_updates = true;
        }

        if !has_updates {
            return Err(ApiError::BadRequest(
                "No data provided for update.".to_string(),
            ));
        }

        builder
            .push(" WHERE id = ")
            .push_bind(link_id)
            .push(" AND user_id = ")
            .push_bind(user_id)
            .push(" RETURNING *");

        let link = builder
            .build_query_as::<Link>()
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("The provided short code is already in use.".to_string())
                } else {
                    ApiError::DatabaseError(e)
                }
            })?
            .ok_or_else(|| ApiError::NotFound("Link not found.".to_string()))?;

        info!(link_id, user_id, "Link updated");

        Ok(link)
    }

    /// Owner-scoped delete; deleting an unknown or foreign id is a no-op
    pub async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM links WHERE id = ? AND user_id = ?")
            .bind(link_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(link_id, user_id, "Link deleted");

        Ok(())
    }
}

/// `datetime('now')`-compatible timestamp `hours` from now
fn timestamp_in_hours(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
