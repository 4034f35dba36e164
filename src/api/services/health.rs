use poem_openapi::payload::Json;
use sea_orm::DatabaseConnection;

use crate::api::models::{ErrorDto, HealthDto, HealthResponseDto};

pub struct HealthService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> HealthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn check(&self) -> HealthResponseDto {
        match self.db.ping().await {
            Ok(()) => HealthResponseDto::Ok(Json(HealthDto {
                service: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                database: "ok".to_string(),
            })),
            Err(e) => {
                tracing::error!(error = %e, "database ping failed");
                HealthResponseDto::Internal(Json(ErrorDto {
                    message: format!("database error: {}", e),
                }))
            }
        }
    }
}
