use std::net::SocketAddr;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    SessionManagerLayer, SessionStore,
};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, blogs};

pub fn build_app(state: AppState) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();

    Router::new()
        .merge(auth::router())
        .merge(blogs::router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Session middleware over a pluggable store: `MemoryStore` in tests,
/// `PostgresStore` in production. The cookie is signed with a key derived
/// from the configured secret.
pub fn session_layer<Store>(
    store: Store,
    config: &AppConfig,
) -> SessionManagerLayer<Store, SignedCookie>
where
    Store: SessionStore + Clone,
{
    let key = Key::from(config.session_secret.as_bytes());
    SessionManagerLayer::new(store)
        .with_name("blog.sid")
        .with_secure(config.cookie_secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_path("/")
        .with_signed(key)
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
