use sea_orm::Database;
use tracing::info;

use campus_bus::{BusClient, BusConsumer, ConsumerConfig, OutboxRelay, RelayConfig};
use campus_core::config::Config;
use campus_core::tracing::init_tracing;

use campus_auth::config::AuthConfig;
use campus_auth::consumer;
use campus_auth::router::build_router;
use campus_auth::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let bus = BusClient::open(redis, &config.event_stream);
    let state = AppState::new(db, bus.clone(), &config);

    // Provisioning consumer: creates shadow accounts off teacher-service events.
    let consumer_state = state.clone();
    let bus_consumer = BusConsumer::new(bus.clone(), ConsumerConfig::new(&config.consumer_group));
    tokio::spawn(async move {
        if let Err(e) = consumer::run(consumer_state, bus_consumer).await {
            tracing::error!(error = %e, "consumer task exited");
        }
    });

    // Outbox relay: publishes committed verification/reset events.
    let relay = OutboxRelay::new(state.outbox_store(), bus, RelayConfig::new("auth-service"));
    tokio::spawn(async move { relay.run().await });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
