use crate::core::error;
use crate::core::state::AppState;
use crate::routes::{auth, user};
use crate::utils;
use axum::error_handling::HandleErrorLayer;
use axum::{
    Router,
    extract::MatchedPath,
    http::{Method, Request},
    middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;

pub(crate) fn routes(state: AppState) -> Router {
    let authorized_routes = Router::new()
        .route("/me", get(user::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            utils::auth::authorize,
        ));

    Router::new()
        .route("/login", post(auth::login))
        .route("/auth-status", get(auth::auth_status))
        .merge(authorized_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(error::handle_middleware_errors))
                .buffer(128)
                .rate_limit(50, Duration::from_secs(1)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(cors::Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                info_span!(
                    "request",
                    method = ?request.method(),
                    matched_path,
                )
            }),
        )
}
