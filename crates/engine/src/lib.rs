//! Queue processing engine: the store client, the push delivery client,
//! the per-cycle processor, and the interval scheduler that drives it.

pub mod delivery;
pub mod processor;
pub mod scheduler;
pub mod store;
