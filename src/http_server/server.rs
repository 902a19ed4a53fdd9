//! Read-only HTTP front end over the persisted marketplace
//!
//! A pure read projection: every request goes back to the files on
//! disk, so the server always reflects the latest registered state
//! without any cache invalidation.

use crate::http_server::routes;
use crate::marketplace::Marketplace;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppState {
    pub marketplace: Marketplace,
    pub plugins_dir: PathBuf,
}

pub struct HttpServer {
    host: String,
    port: u16,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(host: String, port: u16, marketplace: Marketplace, plugins_dir: PathBuf) -> Self {
        Self {
            host,
            port,
            state: Arc::new(AppState {
                marketplace,
                plugins_dir,
            }),
        }
    }

    pub fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/marketplace", get(routes::marketplace))
            .route("/plugins", get(routes::list_plugins))
            .route("/plugins/{name}", get(routes::get_plugin))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = Self::router(self.state);

        let addr = SocketAddr::from((self.host.parse::<std::net::IpAddr>()?, self.port));
        info!("serving marketplace on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
