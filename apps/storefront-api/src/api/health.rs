//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health;
use mongodb::Database;
use serde_json::Value;

async fn ready(State(db): State<Database>) -> (StatusCode, Json<Value>) {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = check_health(&db).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];
    run_health_checks(checks).await
}

/// `/ready` answers 503 until MongoDB responds to a ping.
pub fn router(db: Database) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
