use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blogicum_db::{init_pool, run_migrations};
use blogicum_server::{create_router, AppState, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blogicum=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Required: BLOGICUM_SECRET_KEY=<at least 16 bytes>");
            eprintln!(
                "Optional: BLOGICUM_DATABASE_URL, BLOGICUM_LISTEN_ADDR, BLOGICUM_MEDIA_DIR, \
                 BLOGICUM_SESSION_TTL_HOURS"
            );
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Blogicum");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Database: {}", config.database_url);
    tracing::info!("Media directory: {}", config.media_dir.display());

    let pool = match init_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool).await {
        eprintln!("Migration error: {}", e);
        std::process::exit(1);
    }

    let state = AppState::new(pool, &config);
    let app = create_router(state).nest_service("/media", ServeDir::new(&config.media_dir));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server running at http://{}", config.listen_addr);

    axum::serve(listener, app).await.expect("Server error");
}
