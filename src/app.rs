use crate::handlers;
use crate::state::AppState;
use crate::views::Page;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/dashboard", get(handlers::dashboard_page))
        .route(
            "/dashboard/alertas/:id/:action",
            post(handlers::alert_action_form),
        )
        .route("/api/views/:page", get(handlers::page_view))
        .route("/api/charts/:page", get(handlers::page_charts))
        .route("/api/alerts", get(handlers::list_alerts))
        .route("/api/alerts/:id/:action", post(handlers::alert_action));

    // Each page answers on its slug and on the `.html` file name it used to
    // be served as.
    for page in Page::ALL {
        router = router
            .route(
                &format!("/dashboard/{}", page.slug()),
                get(handlers::dashboard_page),
            )
            .route(
                &format!("/dashboard/{}.html", page.slug()),
                get(handlers::dashboard_page),
            );
    }

    router.with_state(state)
}
