// Camera domain: discovery, property access and backends.

pub mod adapter;
pub mod backend;
pub mod device;
pub mod dummy;
pub mod error;
pub mod manager;
pub mod platform;
pub mod property;
pub mod types;
