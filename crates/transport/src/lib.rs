//! # Transport
//!
//! HTTP transport layer used by live-mode invocations.
//!
//! Responsibilities:
//! - Define the `HttpTransport` seam between dispatcher and network
//! - Provide the real reqwest-backed transport
//! - Provide a scriptable mock transport for tests and offline demos
//!
//! ## Feature Flags
//!
//! - `live-http`: Enable the real HTTP transport (requires reqwest)

pub mod client;
pub mod error;
pub mod mock_transport;

#[cfg(feature = "live-http")]
pub mod reqwest_transport;

pub use client::{HttpTransport, LocalHttpTransport, TransportRequest, TransportResponse};
pub use error::{Result, TransportError};
pub use mock_transport::{MockOutcome, MockTransport};

#[cfg(feature = "live-http")]
pub use reqwest_transport::ReqwestTransport;
