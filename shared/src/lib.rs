//! Shared types for the table ordering server
//!
//! Common types used by `menu-server` and its clients: data models, the
//! notification wire format, error types and response structures.

pub mod error;
pub mod message;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use message::{NotificationEvent, WsServerMessage};
pub use response::{Page, Pagination};
