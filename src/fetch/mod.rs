//! Resilient fetch layer
//!
//! The single point of upstream contact: every page the crawler reads comes
//! through [`ExtractionClient::fetch`], which converts upstream instability
//! into classified, bounded-retry errors. Nothing else in the crate performs
//! network I/O.

mod client;

pub use client::ExtractionClient;

use thiserror::Error;

/// Classified failure reason for a fetch call
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Rate-limited or overloaded upstream (HTTP 429, 503, 520); retried with backoff
    #[error("HTTP {status}: {message}")]
    RateLimited { status: u16, message: String },

    /// Any other non-2xx upstream response; retried without backoff
    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Request timed out; retried without backoff
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Connection-level failure; retried without backoff
    #[error("Transport error: {0}")]
    Transport(String),

    /// The extraction response itself was unparseable; fatal for the call
    #[error("Malformed extraction response: {0}")]
    Malformed(String),
}
