//! Infrastructure Layer
//!
//! Cross-cutting concerns shared by the inbound adapters.

pub mod shutdown;

pub use shutdown::shutdown_signal;
