// src/main.rs

use dotenvy::dotenv;
use quiz_backend::config::Config;
use quiz_backend::routes;
use quiz_backend::state::AppState;
use quiz_backend::utils::hash::hash_password;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let config = Config::from_env();

    // The guard must outlive main or the file layer stops flushing.
    let _guard = init_tracing(&config);

    let pool = connect_with_retry(&config).await;
    tracing::info!("Database connected...");

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    if let Err(e) = seed_admin_user(&pool, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    let state = AppState {
        pool,
        config: config.clone(),
    };
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Logs to stdout and to a daily-rolling file under logs/, filtered by
/// RUST_LOG.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.rust_log))
        .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

/// Connects to Postgres, tolerating a database that is still starting up
/// (e.g. under docker-compose). Gives up after 5 attempts.
async fn connect_with_retry(config: &Config) -> PgPool {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => return pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

/// Creates the admin account named by ADMIN_USERNAME/ADMIN_PASSWORD when it
/// does not exist yet. A no-op if either variable is unset.
async fn seed_admin_user(pool: &PgPool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };

    let user_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if user_exists.is_none() {
        tracing::info!("Seeding admin user: {}", username);
        let hashed_password = hash_password(password)?;

        sqlx::query("INSERT INTO users (username, password, role) VALUES ($1, $2, 'admin')")
            .bind(username)
            .bind(&hashed_password)
            .execute(pool)
            .await?;
    }
    Ok(())
}
