//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::TokenService;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router for any repository implementation
///
/// `/me` sits behind the bearer gate; `/register` and `/login` are open.
pub fn auth_router<R>(repo: R, tokens: Arc<TokenService>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens: tokens.clone(),
    };

    Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AuthConfig;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::dto::{MeResponse, TokenResponse};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> Router {
        let tokens = Arc::new(TokenService::new(&AuthConfig::with_random_secret()));
        auth_router(InMemoryUserRepository::new(), tokens)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let app = app();
        let credentials = json!({ "email": "ada@example.com", "password": "correct horse" });

        let response = app
            .clone()
            .oneshot(post_json("/register", credentials.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post_json("/login", credentials))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let TokenResponse { token } = body_json(response).await;

        let response = app
            .oneshot(
                Request::get("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me: MeResponse = body_json(response).await;
        assert_eq!(me.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_register_is_conflict() {
        let app = app();
        let credentials = json!({ "email": "ada@example.com", "password": "correct horse" });
        app.clone()
            .oneshot(post_json("/register", credentials.clone()))
            .await
            .unwrap();
        let response = app.oneshot(post_json("/register", credentials)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bad_login_is_unauthorized() {
        let response = app()
            .oneshot(post_json(
                "/login",
                json!({ "email": "nobody@example.com", "password": "whatever1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["detail"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["detail"], "Missing or invalid Authorization header");

        let response = app
            .oneshot(
                Request::get("/me")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["detail"], "Invalid or expired token");
    }
}
