use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{auth, auth::AccessCredential, store::StatusStore, types::StatusBody};

#[derive(Clone)]
pub struct AppState {
    store: StatusStore, // read-only from the HTTP side
}

/// Router with the single guarded status route at `path`.
///
/// The secret check is a route layer, so unknown paths still get the default 404.
/// Every request, including rejected ones, is logged at INFO.
pub fn build_router(store: StatusStore, path: &str, credential: AccessCredential) -> Router {
    let credential = Arc::new(credential);
    Router::new()
        .route(path, get(get_status))
        .route_layer(middleware::from_fn_with_state(credential, auth::require_secret))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(AppState { store })
}

/// Serve `app` on `listener` until `cancel` fires.
pub async fn serve(listener: TcpListener, app: Router, cancel: CancellationToken) -> Result<()> {
    tracing::info!("serving status on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

/// Cancel `cancel` once `signal` fires. If the signal cannot be listened for, the
/// error is logged and the token is left alone so the process keeps serving.
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::info!("ctrl-c received, shutting down");
            cancel.cancel();
        }
        Err(e) => {
            tracing::error!("failed to listen for ctrl-c, graceful shutdown disabled: {e}");
            std::future::pending::<()>().await;
        }
    }
}

async fn get_status(State(app): State<AppState>) -> impl IntoResponse {
    let ports = app.store.read().await;
    (StatusCode::OK, Json(StatusBody::running(ports.clone())))
}
