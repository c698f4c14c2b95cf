// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (bearer token carrying the route's scope).
// The scope each protected route needs lives in middleware::auth::ROUTE_SCOPES.
pub mod protected;
pub mod public;
