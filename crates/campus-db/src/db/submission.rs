use campus_core::models::{NewAdmissionApplication, NewContactMessage};
use campus_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Write side of the public submission forms
#[async_trait::async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert a contact message and return its id
    async fn insert_contact_message(&self, message: NewContactMessage) -> Result<Uuid, AppError>;

    /// Insert an admission application (status `pending`) and return its id
    async fn insert_admission_application(
        &self,
        application: NewAdmissionApplication,
    ) -> Result<Uuid, AppError>;
}

#[derive(Clone)]
pub struct PostgresSubmissionStore {
    pool: PgPool,
}

impl PostgresSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubmissionStore for PostgresSubmissionStore {
    #[tracing::instrument(skip(self, message), fields(
        db.system = "postgresql",
        db.table = "contact_messages",
        db.operation = "insert"
    ))]
    async fn insert_contact_message(&self, message: NewContactMessage) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self, application), fields(
        db.system = "postgresql",
        db.table = "admission_applications",
        db.operation = "insert"
    ))]
    async fn insert_admission_application(
        &self,
        application: NewAdmissionApplication,
    ) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO admission_applications (
                student_name, date_of_birth, gender, parent_name, parent_email,
                parent_phone, address, grade_applying_for, previous_school,
                additional_info, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
            RETURNING id
            "#,
        )
        .bind(&application.student_name)
        .bind(application.date_of_birth)
        .bind(&application.gender)
        .bind(&application.parent_name)
        .bind(&application.parent_email)
        .bind(&application.parent_phone)
        .bind(&application.address)
        .bind(&application.grade_applying_for)
        .bind(&application.previous_school)
        .bind(&application.additional_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
