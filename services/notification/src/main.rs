use tracing::info;

use campus_bus::{BusClient, BusConsumer, ConsumerConfig};
use campus_core::config::Config;
use campus_core::tracing::init_tracing;

use campus_notification::config::NotificationConfig;
use campus_notification::consumer;
use campus_notification::dedupe::RedisDeduplicator;
use campus_notification::mailer::SmtpMailer;
use campus_notification::router::build_router;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = NotificationConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let bus = BusClient::open(redis.clone(), &config.event_stream);
    let mailer = SmtpMailer::new(&config).expect("failed to build SMTP mailer");
    let dedupe = RedisDeduplicator::new(redis);

    let bus_consumer = BusConsumer::new(bus, ConsumerConfig::new(&config.consumer_group));
    let base_url = config.public_base_url.clone();
    tokio::spawn(async move {
        if let Err(e) = consumer::run(mailer, dedupe, bus_consumer, base_url).await {
            tracing::error!(error = %e, "consumer task exited");
        }
    });

    let router = build_router();
    let addr = format!("0.0.0.0:{}", config.notification_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("notification service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
