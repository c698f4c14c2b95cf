use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenValidator;
use crate::config::SecurityConfig;
use crate::database::{Actor, MemoryTable, Movie, PgStore, Store};
use crate::handlers::{protected, public};
use crate::middleware::{authorize, json_method_not_allowed};

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub actors: Arc<dyn Store<Actor>>,
    pub movies: Arc<dyn Store<Movie>>,
    pub validator: Arc<TokenValidator>,
}

impl AppState {
    pub fn new(
        actors: Arc<dyn Store<Actor>>,
        movies: Arc<dyn Store<Movie>>,
        validator: TokenValidator,
    ) -> Self {
        Self {
            actors,
            movies,
            validator: Arc::new(validator),
        }
    }

    /// Both tables in one Postgres database
    pub fn postgres(store: PgStore, validator: TokenValidator) -> Self {
        Self::new(Arc::new(store.clone()), Arc::new(store), validator)
    }

    /// Empty in-process tables; contents are lost when the process exits
    pub fn in_memory(validator: TokenValidator) -> Self {
        Self::new(
            Arc::new(MemoryTable::<Actor>::new()),
            Arc::new(MemoryTable::<Movie>::new()),
            validator,
        )
    }
}

/// Build the HTTP router with authorization, CORS and request tracing
pub fn router(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        // Protected; scopes come from middleware::auth::ROUTE_SCOPES
        .route("/actors", get(protected::actors::list).post(protected::actors::create))
        .route(
            "/actors/:id",
            patch(protected::actors::update).delete(protected::actors::delete),
        )
        .route("/movies", get(protected::movies::list).post(protected::movies::create))
        .route(
            "/movies/:id",
            patch(protected::movies::update).delete(protected::movies::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize))
        .fallback(public::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(security))
                .layer(middleware::map_response(json_method_not_allowed)),
        )
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins = if security.cors_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
}
