//! Downstream preference service access.
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (one GET or POST to the configured URL)
//!     → Ok(body) on 2xx
//!     → Err(DownstreamError::Http) on any other status
//!     → Err(DownstreamError::Transport) when no response was obtained
//! ```

pub mod client;
pub mod error;

pub use client::{DownstreamClient, DownstreamResult};
pub use error::DownstreamError;
