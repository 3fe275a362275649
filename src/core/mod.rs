//! 服务核心

pub mod service;

pub use service::{ContentDeliveryService, ServiceBuilder, ServiceStats, ServiceStatsSnapshot};
