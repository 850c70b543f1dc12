use sqlx::SqlitePool;
use tracing::warn;

use super::models::{CountryClicks, DashboardAnalytics, DashboardStats, DeviceClicks};
use crate::common::ApiError;

pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Summary counters for the user's links.
    ///
    /// Each aggregate query degrades to zeros on failure; a partially
    /// populated dashboard beats a failed one.
    pub async fn stats(&self, user_id: i64) -> Result<DashboardStats, ApiError> {
        let link_totals = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(id) AS total_links,
                COALESCE(SUM(
                    CASE WHEN archived IS NULL
                          AND (expires_at IS NULL OR expires_at > datetime('now'))
                    THEN 1 ELSE 0 END
                ), 0) AS active_links,
                COALESCE(SUM(clicks), 0) AS total_clicks
            FROM links
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, user_id, "Link totals query failed, degrading to zeros");
            (0, 0, 0)
        });

        // Distinct (ip, user_agent) pairs across the user's links; NULL ip
        // or agent makes the concatenation NULL and drops out of the count
        let unique_clicks = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT c.ip || '|' || c.user_agent)
            FROM links l
            LEFT JOIN clicks c ON l.short_code = c.short_code
            WHERE l.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, user_id, "Unique clicks query failed, degrading to zero");
            0
        });

        Ok(DashboardStats {
            total_links: link_totals.0,
            active_links: link_totals.1,
            total_clicks: link_totals.2,
            unique_clicks,
        })
    }

    /// Top 10 countries and the device-type breakdown for the user's
    /// links. A failed sub-query degrades to an empty list.
    pub async fn analytics(&self, user_id: i64) -> Result<DashboardAnalytics, ApiError> {
        let top_countries = sqlx::query_as::<_, CountryClicks>(
            r#"
            SELECT c.country_code, COUNT(*) AS click_count
            FROM clicks c
            JOIN links l ON c.short_code = l.short_code
            WHERE c.country_code IS NOT NULL
              AND l.user_id = ?
            GROUP BY c.country_code
            ORDER BY click_count DESC
            LIMIT 10
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, user_id, "Country analytics query failed, degrading to empty");
            Vec::new()
        });

        let top_devices = sqlx::query_as::<_, DeviceClicks>(
            r#"
            SELECT c.device_type, COUNT(*) AS click_count
            FROM clicks c
            JOIN links l ON c.short_code = l.short_code
            WHERE l.user_id = ?
            GROUP BY c.device_type
            ORDER BY click_count DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, user_id, "Device analytics query failed, degrading to empty");
            Vec::new()
        });

        Ok(DashboardAnalytics {
            top_countries,
            top_devices,
        })
    }
}
