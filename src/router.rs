use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::admins::router::init_admins_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::channels::router::init_channels_router;
use crate::modules::departments::router::init_departments_router;
use crate::modules::events::router::init_events_router;
use crate::modules::faculties::router::init_faculties_router;
use crate::modules::levels::router::init_levels_router;
use crate::modules::posts::router::{init_comments_router, init_posts_router};
use crate::modules::timetables::router::init_timetables_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/profile", init_users_router())
                .nest("/admins", init_admins_router())
                .nest("/faculties", init_faculties_router())
                .nest("/departments", init_departments_router())
                .nest("/levels", init_levels_router())
                .nest("/posts", init_posts_router())
                .nest("/comments", init_comments_router())
                .nest("/channels", init_channels_router())
                .nest("/events", init_events_router())
                .nest("/timetables", init_timetables_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
