//! Crawl pipeline orchestration

mod coordinator;

pub use coordinator::Coordinator;
