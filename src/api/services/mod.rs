pub mod catalog;
pub mod chapter;
pub mod health;
pub mod progress;

use anyhow::Context;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Resolve a bearer token to its account. Malformed tokens are unknown
/// tokens, not errors.
pub async fn user_for_token(
    db: &DatabaseConnection,
    raw: &str,
) -> anyhow::Result<Option<entities::user::Model>> {
    let Ok(token) = uuid::Uuid::parse_str(raw.trim()) else {
        return Ok(None);
    };
    entities::user::Entity::find()
        .filter(entities::user::Column::ApiToken.eq(token))
        .one(db)
        .await
        .with_context(|| "Failed to resolve API token")
}
