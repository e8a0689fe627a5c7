//! Code storage
//!
//! Redis client with retry logic, the Redis-backed store used in
//! production and an in-memory store for development and tests.

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use memory_store::MemoryOtpStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisOtpStore;
