// handlers/protected/mod.rs - Actor and movie CRUD
//
// Every handler here runs behind middleware::authorize, which has already
// checked the route's scope and attached the decoded Claims to the request.
pub mod actors;
pub mod movies;
pub mod utils;
