use tango_backend::config::Config;
use tango_backend::state::AppState;
use tango_backend::{db, logging, seed};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let db_path = config
        .database_path
        .clone()
        .unwrap_or_else(db::default_db_path);

    let pool = match db::init_pool(&db_path).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, path = %db_path.display(), "database init failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = seed::load_initial_corpus(&pool, &config.corpus_dir).await {
        tracing::warn!(error = %err, "initial corpus load failed");
    }

    let addr = config.bind_addr();
    let state = AppState::new(pool.clone(), config);
    let app = tango_backend::create_app(state);

    tracing::info!(%addr, "tango-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped");
    pool.close().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
