//! Tests for profile module

mod tests {
    use super::super::handlers::{fetch_profile, rename_profile};
    use super::super::models::UpdateProfileRequest;
    use crate::common::error::ApiError;
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

    async fn seed_user(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("INSERT INTO users (email, name) VALUES (?, ?) RETURNING id")
            .bind("u@example.com")
            .bind("Original Name")
            .fetch_one(pool)
            .await
            .expect("Failed to seed user")
    }

    #[tokio::test]
    async fn test_fetch_profile_returns_row() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;

        let profile = fetch_profile(&pool, user_id)
            .await
            .expect("Failed to fetch profile");

        assert_eq!(profile.id, user_id);
        assert_eq!(profile.email, "u@example.com");
    }

    #[tokio::test]
    async fn test_fetch_missing_profile_is_not_found() {
        let pool = test_pool().await;

        assert!(matches!(
            fetch_profile(&pool, 999).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_updates_name() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;

        let request = UpdateProfileRequest {
            name: Some("New Name".to_string()),
        };
        let profile = rename_profile(&pool, user_id, request)
            .await
            .expect("Failed to rename profile");

        assert_eq!(profile.name, "New Name");
    }

    #[tokio::test]
    async fn test_rename_without_name_is_rejected() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool).await;

        let absent = rename_profile(&pool, user_id, UpdateProfileRequest { name: None }).await;
        let blank = rename_profile(
            &pool,
            user_id,
            UpdateProfileRequest {
                name: Some("   ".to_string()),
            },
        )
        .await;

        assert!(matches!(absent, Err(ApiError::BadRequest(_))));
        assert!(matches!(blank, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rename_missing_user_is_not_found() {
        let pool = test_pool().await;

        let request = UpdateProfileRequest {
            name: Some("New Name".to_string()),
        };

        assert!(matches!(
            rename_profile(&pool, 999, request).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
