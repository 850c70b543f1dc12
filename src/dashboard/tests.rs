//! Tests for dashboard module
//!
//! Aggregation correctness against a seeded in-memory database:
//! - Active-link counting (archived and expired exclusion)
//! - Unique-click counting over (ip, user_agent) pairs
//! - Country and device analytics ordering and scoping

mod tests {
    use super::super::models::DashboardStats;
    use super::super::services::DashboardService;
    use crate::common::migrations::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn seed_user(pool: &SqlitePool, email: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO users (email, name) VALUES (?, ?) RETURNING id")
            .bind(email)
            .bind("Test User")
            .fetch_one(pool)
            .await
            .expect("Failed to seed user")
    }

    async fn seed_link(
        pool: &SqlitePool,
        user_id: i64,
        short_code: &str,
        clicks: i64,
        archived: Option<&str>,
        expires_at: Option<&str>,
    ) {
        sqlx::query(
            r#"
            INSERT INTO links (url, short_code, user_id, clicks, archived, expires_at)
            VALUES ('https://example.com', ?, ?, ?, ?, ?)
            "#,
        )
        .bind(short_code)
        .bind(user_id)
        .bind(clicks)
        .bind(archived)
        .bind(expires_at)
        .execute(pool)
        .await
        .expect("Failed to seed link");
    }

    async fn seed_click(
        pool: &SqlitePool,
        short_code: &str,
        ip: &str,
        user_agent: &str,
        country_code: Option<&str>,
        device_type: &str,
    ) {
        sqlx::query(
            r#"
            INSERT INTO clicks (short_code, ip, user_agent, country_code, device_type)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(short_code)
        .bind(ip)
        .bind(user_agent)
        .bind(country_code)
        .bind(device_type)
        .execute(pool)
        .await
        .expect("Failed to seed click");
    }

    #[tokio::test]
    async fn test_stats_counts_active_links() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "u@example.com").await;

        seed_link(&pool, user_id, "live01", 3, None, None).await;
        seed_link(&pool, user_id, "live02", 2, None, Some("2099-01-01 00:00:00")).await;
        seed_link(&pool, user_id, "gone01", 1, None, Some("2001-01-01 00:00:00")).await;
        seed_link(&pool, user_id, "arch01", 4, Some("2024-01-01 00:00:00"), None).await;

        let service = DashboardService::new(pool);
        let stats = service.stats(user_id).await.expect("Failed to fetch stats");

        assert_eq!(
            stats,
            DashboardStats {
                total_links: 4,
                active_links: 2,
                total_clicks: 10,
                unique_clicks: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_for_user_without_links_is_all_zeros() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "u@example.com").await;

        let service = DashboardService::new(pool);
        let stats = service.stats(user_id).await.expect("Failed to fetch stats");

        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_stats_unique_clicks_deduplicates_visitor_pairs() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "u@example.com").await;
        seed_link(&pool, user_id, "code01", 0, None, None).await;

        // Same visitor twice, one different agent, one different ip
        seed_click(&pool, "code01", "1.1.1.1", "firefox", None, "desktop").await;
        seed_click(&pool, "code01", "1.1.1.1", "firefox", None, "desktop").await;
        seed_click(&pool, "code01", "1.1.1.1", "chrome", None, "desktop").await;
        seed_click(&pool, "code01", "2.2.2.2", "firefox", None, "mobile").await;

        let service = DashboardService::new(pool);
        let stats = service.stats(user_id).await.expect("Failed to fetch stats");

        assert_eq!(stats.unique_clicks, 3);
    }

    #[tokio::test]
    async fn test_analytics_orders_countries_and_skips_null() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "u@example.com").await;
        seed_link(&pool, user_id, "code01", 0, None, None).await;

        seed_click(&pool, "code01", "1.1.1.1", "ua", Some("DE"), "desktop").await;
        seed_click(&pool, "code01", "1.1.1.2", "ua", Some("DE"), "desktop").await;
        seed_click(&pool, "code01", "1.1.1.3", "ua", Some("FR"), "mobile").await;
        seed_click(&pool, "code01", "1.1.1.4", "ua", None, "mobile").await;

        let service = DashboardService::new(pool);
        let analytics = service
            .analytics(user_id)
            .await
            .expect("Failed to fetch analytics");

        assert_eq!(analytics.top_countries.len(), 2);
        assert_eq!(analytics.top_countries[0].country_code, "DE");
        assert_eq!(analytics.top_countries[0].click_count, 2);
        assert_eq!(analytics.top_countries[1].country_code, "FR");

        // NULL country still counts toward devices
        let mobile = analytics
            .top_devices
            .iter()
            .find(|d| d.device_type.as_deref() == Some("mobile"))
            .expect("mobile bucket");
        assert_eq!(mobile.click_count, 2);
    }

    #[tokio::test]
    async fn test_analytics_scoped_to_own_links() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        seed_link(&pool, owner, "owned1", 0, None, None).await;
        seed_link(&pool, other, "theirs", 0, None, None).await;

        seed_click(&pool, "owned1", "1.1.1.1", "ua", Some("DE"), "desktop").await;
        seed_click(&pool, "theirs", "2.2.2.2", "ua", Some("US"), "desktop").await;

        let service = DashboardService::new(pool);
        let analytics = service
            .analytics(owner)
            .await
            .expect("Failed to fetch analytics");

        assert_eq!(analytics.top_countries.len(), 1);
        assert_eq!(analytics.top_countries[0].country_code, "DE");
    }
}
