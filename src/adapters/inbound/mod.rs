mod api_server;
pub mod console;

pub use api_server::{build_router, status_for, ApiServer, ApiState};

// Re-export for external use (e.g., integration tests)
#[allow(unused_imports)]
pub use api_server::{CarrierView, ErrorResponse, LocateQuery, NearestResponse};
