//! Inbound Adapters - Drive the application
//!
//! These adapters receive external requests and call into the domain.

pub mod api_server;
pub mod extractors;
pub mod middleware;
pub mod responses;

pub use api_server::{build_router, ApiServer, ApiState};
pub use middleware::{access_gate_middleware, client_address};
pub use responses::ApiMessage;
