use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::content::entry::{ContentEntry, ContentPage, EntryPatch};
use serde::Deserialize;

use crate::content::service;
use crate::shared::config;
use crate::shared::error::ServiceError;
use crate::system::users::service as users;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub from: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// GET /api/content/:type
pub async fn list(
    Path(type_slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ContentPage>, ServiceError> {
    let options = service::ListOptions {
        from: params.from,
        limit: params.limit,
        sort_by: params.sort_by,
        sort_order: params.sort_order,
    };
    let page = service::list(&config::get().app, &type_slug, &options).await?;
    Ok(Json(page))
}

/// GET /api/content/:type/:slug
pub async fn get_by_slug(
    Path((type_slug, slug)): Path<(String, String)>,
) -> Result<Json<ContentEntry>, ServiceError> {
    let entry = service::get(&config::get().app, &type_slug, &slug).await?;
    Ok(Json(entry))
}

/// PUT /api/content/:type/:slug
pub async fn update(
    Path((type_slug, slug)): Path<(String, String)>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<ContentEntry>, ServiceError> {
    let entry = service::update(&config::get().app, &type_slug, &slug, patch).await?;
    Ok(Json(entry))
}

/// POST /api/content/:type/testdata
pub async fn insert_test_data(Path(type_slug): Path<String>) -> Result<StatusCode, ServiceError> {
    let author = users::me().await?.id;
    service::insert_test_data(&config::get().app, &type_slug, &author).await?;
    Ok(StatusCode::OK)
}
