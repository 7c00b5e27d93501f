use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Local shadow of an identity-service user. Rows are provisioned lazily the
/// first time an authenticated request needs one; `current_plan_id` is the
/// single mutable pointer to the active plan and is written only by
/// activation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub current_plan_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}
