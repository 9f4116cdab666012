//! Route modules for the docdiff server

pub mod compare;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All routes, without middleware
pub fn router(max_request_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/compare", compare::router(max_request_bytes))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_route() {
        let app = router(1024).with_state(AppState::new(Config::default()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_compare_rejects_get() {
        let app = router(1024).with_state(AppState::new(Config::default()));
        let response = app
            .oneshot(Request::builder().uri("/compare").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
