// src/routes.rs

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{admin, auth, feed, quiz, settings},
    models::feed::{FeedIndexRequest, FeedKind, NewFeedItem, UpdateFeedItemRequest},
    state::{AppState, Feeds},
    utils::{body::JsonBody, gate::Admin},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, feeds, quiz, admin).
/// * Serves the frontend for every other path.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (documents and configuration).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let static_dir = &state.config.static_dir;
    let frontend = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    let quiz_routes = Router::new()
        .route("/tests", get(quiz::list_public_tests))
        .route("/tests/submit", post(quiz::submit_test));

    // Admin credentials travel in each request body and are checked by the `Admin` extractor.
    let admin_routes = Router::new()
        .route("/users/list", post(admin::list_users))
        .route("/users/add_or_update", post(admin::upsert_user))
        .route("/users/delete", post(admin::delete_user))
        .route(
            "/settings/theme",
            get(settings::get_theme).post(settings::set_theme),
        )
        .route("/tests/list", post(quiz::list_tests))
        .route("/tests/add_or_update", post(quiz::upsert_test))
        .route("/tests/delete", post(quiz::delete_test))
        .route("/results", post(quiz::list_results));

    let mut app = Router::new()
        .merge(auth_routes)
        .merge(quiz_routes)
        .nest("/admin", admin_routes);

    for kind in FeedKind::ALL {
        app = app.merge(feed_routes(kind));
    }

    app.fallback_service(frontend)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Public and admin routes of one feed: `/<feed>` and `/admin/<feed>/{delete,update}`.
fn feed_routes(kind: FeedKind) -> Router<AppState> {
    let name = kind.as_str();

    Router::new()
        .route(
            &format!("/{name}"),
            get(move |feeds: State<Feeds>| feed::list_items(feeds, kind)).post(
                move |feeds: State<Feeds>, body: JsonBody<NewFeedItem>| feed::add_item(feeds, kind, body),
            ),
        )
        .route(
            &format!("/admin/{name}/delete"),
            post(move |feeds: State<Feeds>, payload: Admin<FeedIndexRequest>| {
                feed::delete_item(feeds, kind, payload)
            }),
        )
        .route(
            &format!("/admin/{name}/update"),
            post(move |feeds: State<Feeds>, payload: Admin<UpdateFeedItemRequest>| {
                feed::update_item(feeds, kind, payload)
            }),
        )
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}
