//! Dashboard data models

use serde::Serialize;
use sqlx::FromRow;

/// Summary counters for one user's links
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub total_links: i64,
    pub active_links: i64,
    pub total_clicks: i64,
    pub unique_clicks: i64,
}

/// Click count for one country
#[derive(FromRow, Serialize, Debug)]
pub struct CountryClicks {
    pub country_code: String,
    pub click_count: i64,
}

/// Click count for one device type; the edge may log none
#[derive(FromRow, Serialize, Debug)]
pub struct DeviceClicks {
    pub device_type: Option<String>,
    pub click_count: i64,
}

#[derive(Serialize, Debug)]
pub struct DashboardAnalytics {
    #[serde(rename = "topCountries")]
    pub top_countries: Vec<CountryClicks>,
    #[serde(rename = "topDevices")]
    pub top_devices: Vec<DeviceClicks>,
}
