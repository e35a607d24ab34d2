#![allow(clippy::useless_format)]

pub mod content;
pub mod handlers;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post, put},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Log directory next to the build artifacts
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep application logs, quiet the SQL layer
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Thousands separators for the response-size column
    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, ch) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push('.');
            }
            result.push(ch);
        }
        result.chars().rev().collect()
    }

    // Simple request logging middleware
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use axum::body::to_bytes;
        use chrono::Utc;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();

        // Read the body back to report the real size
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(_) => {
                let duration = start.elapsed();
                let timestamp = Utc::now();
                println!(
                    "\x1b[33m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
                    timestamp.format("%H:%M:%S"),
                    duration.as_millis(),
                    "error",
                    parts.status.as_u16(),
                    method,
                    uri.path()
                );
                return Response::from_parts(parts, Body::default());
            }
        };

        let size = bytes.len();
        let duration = start.elapsed();
        let timestamp = Utc::now();

        // Cyan for 200, brown for everything else
        let color_code = if parts.status.as_u16() == 200 {
            "36"
        } else {
            "33"
        };

        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
            color_code,
            timestamp.format("%H:%M:%S"),
            duration.as_millis(),
            format!("{}", format_number(size)),
            parts.status.as_u16(),
            method,
            uri.path()
        );

        // Rebuild the response around the bytes we consumed
        Response::from_parts(parts, Body::from(bytes))
    }

    // Load config.toml (site definition, ports, paths)
    shared::config::initialize()?;
    let config = shared::config::get();

    // Initialize database
    let db_path = shared::config::get_database_path(config);
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Stored uploads are served from here
    let storage_dir = shared::config::get_storage_dir(config);
    std::fs::create_dir_all(&storage_dir)?;

    // Ensure the demo account exists and seed first-run content
    system::initialization::ensure_demo_user().await?;
    system::initialization::ensure_demo_content(&config.app).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // Site configuration (the frontend boots from this)
        .route("/api/config", get(handlers::config::get_app_config))
        // Account routes (`me` resolves to the signed-in account)
        .route(
            "/api/users/:id",
            get(system::handlers::users::get_user).delete(system::handlers::users::delete_user),
        )
        .route(
            "/api/users/:id/username",
            put(system::handlers::users::update_username),
        )
        .route(
            "/api/users/:id/email",
            put(system::handlers::users::update_email),
        )
        .route(
            "/api/users/:id/profile",
            put(system::handlers::users::update_profile),
        )
        .route(
            "/api/users/:id/password",
            put(system::handlers::users::change_password),
        )
        .route(
            "/api/users/:id/picture",
            put(system::handlers::users::update_picture),
        )
        // Content routes (one set for every configured type)
        .route("/api/content/:type", get(handlers::content::list))
        .route(
            "/api/content/:type/testdata",
            post(handlers::content::insert_test_data),
        )
        .route(
            "/api/content/:type/:slug",
            get(handlers::content::get_by_slug).put(handlers::content::update),
        )
        // File uploads
        .route("/api/storage", post(handlers::storage::upload))
        .nest_service("/files", ServeDir::new(&storage_dir))
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
