// File: services/consultify_backend/src/main.rs
use axum::{routing::get, Router};
use consultify_booking::routes as booking_routes;
use consultify_booking::BookingEngine;
use consultify_config::load_config;
use consultify_scheduling::directory::SlotDirectory;
use consultify_scheduling::routes as scheduling_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

mod app_state;
mod service_factory;

use crate::app_state::AppState;

#[tokio::main]
async fn main() {
    consultify_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let state = AppState::new(config.clone()).await;

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Consultify API!" }))
        .with_state(config.clone());

    // The whole flow hangs off the availability backend: no scheduling
    // client means neither the slot directory nor the booking sessions
    // can serve anything, so those routes are not mounted at all.
    let booking_stack = state
        .service_factory
        .scheduling_service()
        .map(|scheduling| {
            let directory = Arc::new(SlotDirectory::from_config(
                scheduling.clone(),
                state.config.scheduling.as_ref().unwrap(),
            ));
            let engine = Arc::new(BookingEngine::new(
                &state.config,
                directory.clone(),
                scheduling,
                state.service_factory.payment_provider(),
            ));
            (directory, engine)
        });

    let api_router = Router::new().nest("/api", {
        let mut router = api_router;
        if let Some((directory, engine)) = booking_stack {
            router = router.merge(scheduling_routes::routes(config.clone(), directory));
            router = router.merge(booking_routes::routes(config.clone(), engine));
        } else {
            println!("⚠️ Scheduling backend disabled, slot and booking routes not mounted");
        }
        router
    });

    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use consultify_booking::doc::BookingApiDoc;
        use consultify_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Consultify API",
                version = "0.1.0",
                description = "Consultify Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Consultify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        openapi_doc.merge(BookingApiDoc::openapi());
        println!("📖 Adding Swagger UI at /api/docs");

        // Create the Swagger UI route, referencing the merged doc
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        // Merge the Swagger UI into the main app router
        app = app.merge(swagger_ui);
    }

    // Serve static files in dev mode
    if cfg!(debug_assertions) {
        println!("Running in development mode, serving static files from ../../dist");

        // Serve static files at a specific path
        let static_router = Router::new().nest_service("/static", ServeDir::new("../../dist"));
        app = app.merge(static_router);

        // You can also keep the fallback service for non-matched routes
        app = app.fallback_service(ServeDir::new("../dist"));
    }

    // Bind and serve
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
