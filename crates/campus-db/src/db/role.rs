use campus_core::{AppError, AppRole};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Role membership lookup
#[async_trait::async_trait]
pub trait RoleStore: Send + Sync {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresRoleStore {
    pool: PgPool,
}

impl PostgresRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RoleStore for PostgresRoleStore {
    #[tracing::instrument(skip(self), fields(db.table = "user_roles", db.operation = "select", user_id = %user_id, role = %role))]
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
