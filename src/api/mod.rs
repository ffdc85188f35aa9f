//! API Module
//!
//! HTTP handlers and routing for the order service REST API.
//!
//! # Endpoints
//! - `GET /api/order/:order_uid` - Fetch one order
//! - `GET /api/orders/recent` - Newest orders
//! - `POST /api/orders` - Publish an order record
//! - `GET /stats` - Cache and ingestion statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
