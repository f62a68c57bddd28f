//! Concurrent harvest pool

mod pool;

pub use pool::{HarvestPool, PassReport};
