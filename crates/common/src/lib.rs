//! Shared building blocks for the PushCourier workspace: configuration,
//! database pool construction, the common error type, and the queue's
//! data types.

pub mod config;
pub mod db;
pub mod error;
pub mod types;
