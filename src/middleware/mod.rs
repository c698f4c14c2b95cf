pub mod auth;
pub mod response;

pub use auth::{authorize, required_scope, ROUTE_SCOPES};
pub use response::{json_method_not_allowed, ApiResponse, ApiResult};
