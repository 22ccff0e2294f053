use savanna_core::{
    models::{Setting, SettingUpdate},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const SETTING_COLUMNS: &str = "id, key, value, label, setting_type, updated_at";

/// Repository for key-addressed site settings
#[derive(Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "settings", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Setting>, AppError> {
        let settings = sqlx::query_as::<Postgres, Setting>(&format!(
            "SELECT {} FROM settings ORDER BY key ASC",
            SETTING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    #[tracing::instrument(skip(self), fields(db.table = "settings", db.operation = "select"))]
    pub async fn get(&self, key: &str) -> Result<Option<Setting>, AppError> {
        let setting = sqlx::query_as::<Postgres, Setting>(&format!(
            "SELECT {} FROM settings WHERE key = $1",
            SETTING_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Upserts every entry by key inside one transaction.
    #[tracing::instrument(skip(self, updates), fields(db.table = "settings", db.operation = "upsert", count = updates.len()))]
    pub async fn upsert_many(&self, updates: Vec<SettingUpdate>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for update in updates {
            sqlx::query(
                r#"
                INSERT INTO settings (id, key, value, label, setting_type, updated_at)
                VALUES ($1, $2, $3, COALESCE($4, $2), COALESCE($5, 'text'), NOW())
                ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value,
                    label = COALESCE($4, settings.label),
                    setting_type = COALESCE($5, settings.setting_type),
                    updated_at = NOW()
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&update.key)
            .bind(&update.value)
            .bind(update.label.as_deref())
            .bind(update.setting_type.map(|t| t.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, settings), fields(db.table = "settings", db.operation = "insert"))]
    pub async fn insert_missing(&self, settings: Vec<Setting>) -> Result<u64, AppError> {
        let mut inserted = 0;
        for setting in settings {
            inserted += sqlx::query(
                r#"
                INSERT INTO settings (id, key, value, label, setting_type, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (key) DO NOTHING
                "#,
            )
            .bind(setting.id)
            .bind(&setting.key)
            .bind(&setting.value)
            .bind(&setting.label)
            .bind(setting.setting_type.as_str())
            .bind(setting.updated_at)
            .execute(&self.pool)
            .await?
            .rows_affected();
        }
        Ok(inserted)
    }
}
