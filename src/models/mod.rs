//! Order model, validation and HTTP response DTOs.

pub mod order;
pub mod responses;
pub mod validation;

// Re-export commonly used types
pub use order::{Delivery, Item, Order, Payment};
pub use responses::{
    CacheStatsBody, ErrorResponse, HealthResponse, PublishResponse, StatsResponse,
};
pub use validation::{IdFormat, OrderValidator};
