use inkpost::app::{build_app, serve, session_layer};
use inkpost::state::AppState;
use tower_sessions_sqlx_store::PostgresStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inkpost=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (state, pool) = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }

    // Sessions live in the same database so a restart does not log everyone
    // out.
    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;
    let sessions = session_layer(session_store, &state.config);

    let app = build_app(state).layer(sessions);
    serve(app).await
}
