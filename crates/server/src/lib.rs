//! HTTP surface for the PushCourier worker: health check and the manual
//! queue-processing trigger.

pub mod routes;
pub mod state;
