//! HTTP surface of the meeting summarizer: the axum router, its controllers and the
//! mapping of domain errors onto HTTP responses.

use domain::upload::UploadStore;
use log::*;
use std::error::Error as StdError;
use tokio::net::TcpListener;

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub mod router;

/// Prepares the upload directory, binds the configured address and serves requests
/// until the process is stopped.
pub async fn init_server(
    app_state: AppState,
) -> core::result::Result<(), Box<dyn StdError + Send + Sync>> {
    let store = UploadStore::new(app_state.config.upload_dir());
    store.ensure_dir().await?;

    let interface = app_state.config.interface.as_deref().unwrap_or("0.0.0.0");
    let server_url = format!("{}:{}", interface, app_state.config.port);
    let listener = TcpListener::bind(&server_url).await?;

    info!(
        "Server listening on http://{} (uploads stored in {})",
        server_url,
        store.dir().display()
    );

    axum::serve(listener, router::define_routes(app_state)).await?;

    Ok(())
}
