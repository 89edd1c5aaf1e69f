//! Application Layer
//!
//! Use cases that wire the domain services to the ports.

mod locator_service;

pub use locator_service::{CarrierLocatorService, LocateOutcome, LocateReport, DEFAULT_RESULT_COUNT};
