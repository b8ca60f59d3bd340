/// Errors surfaced by the bus client and consumer.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
    #[error("redis error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),
    #[error("malformed stream entry: {0}")]
    Malformed(String),
    #[error("envelope codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
