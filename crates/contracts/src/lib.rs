//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the sandbox.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `ApiCatalog` / `ApiDefinition`: static catalog loaded once at start-up
//! - `InvocationRequest`: one user submission, discarded after the call
//! - `ResponseEnvelope`: uniform result (`success`, `data`, `error`, `source`, `latency`)

mod catalog;
mod envelope;
mod error;
mod invocation;
mod settings;

pub use catalog::*;
pub use envelope::*;
pub use error::*;
pub use invocation::*;
pub use settings::*;
