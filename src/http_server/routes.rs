use crate::http_server::server::AppState;
use crate::models::{MarketplaceManifest, MANIFEST_DIR, PLUGIN_MANIFEST_FILE};
use crate::utils::errors::ConvertError;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check endpoint
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The whole marketplace manifest
pub async fn marketplace(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MarketplaceManifest>, ConvertError> {
    Ok(Json(state.marketplace.manifest()?))
}

/// Names of all registered plugins
pub async fn list_plugins(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ConvertError> {
    let names: Vec<String> = state
        .marketplace
        .list()?
        .into_iter()
        .map(|entry| entry.name)
        .collect();

    Ok(Json(json!({
        "count": names.len(),
        "plugins": names,
    })))
}

/// One generated plugin descriptor, looked up by entry name
pub async fn get_plugin(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ConvertError> {
    // Entry names are slugs; anything path-like is not a plugin name.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ConvertError::PluginNotFound(name));
    }

    let manifest_path = state
        .plugins_dir
        .join(&name)
        .join(MANIFEST_DIR)
        .join(PLUGIN_MANIFEST_FILE);

    if !manifest_path.exists() {
        return Err(ConvertError::PluginNotFound(name));
    }

    let content = tokio::fs::read_to_string(&manifest_path).await?;
    Ok(Json(serde_json::from_str(&content)?))
}
