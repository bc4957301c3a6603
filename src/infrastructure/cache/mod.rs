// src/infrastructure/cache/mod.rs
pub mod memory_store;
pub mod redis_store;

pub use memory_store::InMemoryCacheStore;
pub use redis_store::RedisCacheStore;
