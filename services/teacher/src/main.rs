use sea_orm::Database;
use tracing::info;

use campus_bus::{BusClient, OutboxRelay, RelayConfig};
use campus_core::config::Config;
use campus_core::tracing::init_tracing;

use campus_teacher::config::TeacherConfig;
use campus_teacher::router::build_router;
use campus_teacher::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = TeacherConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let bus = BusClient::open(redis, &config.event_stream);
    let state = AppState::new(db, &config);

    // Outbox relay: publishes committed teacher.created events.
    let relay = OutboxRelay::new(
        state.outbox_store(),
        bus,
        RelayConfig::new("teacher-service"),
    );
    tokio::spawn(async move { relay.run().await });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.teacher_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("teacher service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
