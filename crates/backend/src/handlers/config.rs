use axum::Json;
use contracts::config::AppConfig;

use crate::shared::config;

/// GET /api/config
///
/// The frontend boots from this document: content types, field
/// descriptors and theme all come over the wire.
pub async fn get_app_config() -> Json<AppConfig> {
    Json(config::get().app.clone())
}
