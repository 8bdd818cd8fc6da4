//! Router Assembly

use std::sync::Arc;

use auth::{TokenService, UserRepository, auth_router};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use links::{EnrichmentQueue, LinkRepository, links_router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full HTTP surface over any repository implementations
pub fn build_router<U, L>(
    users: U,
    links: Arc<L>,
    tokens: Arc<TokenService>,
    enrichment: EnrichmentQueue,
    allowed_origins: Vec<HeaderValue>,
) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    L: LinkRepository + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_router(users.clone(), tokens.clone()))
        .nest("/api/links", links_router(links, users, tokens, enrichment))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{AuthConfig, InMemoryUserRepository};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use links::{EnrichmentConfig, InMemoryLinkRepository};
    use platform::http::{FetchedPage, HttpFetcher, TransportError};
    use serde_json::json;
    use tower::ServiceExt;

    struct OfflineFetcher;

    impl HttpFetcher for OfflineFetcher {
        async fn get(&self, _url: &str) -> Result<FetchedPage, TransportError> {
            Err(TransportError::Request("offline".to_string()))
        }
    }

    fn app() -> Router {
        let links = Arc::new(InMemoryLinkRepository::new());
        let (queue, _) =
            EnrichmentQueue::start(links.clone(), OfflineFetcher, &EnrichmentConfig::default());
        build_router(
            InMemoryUserRepository::new(),
            links,
            Arc::new(TokenService::new(&AuthConfig::with_random_secret())),
            queue,
            vec![HeaderValue::from_static("http://localhost:5173")],
        )
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_then_save_link() {
        let app = app();

        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({ "email": "alice@example.com", "password": "correct horse" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, link) = send(
            &app,
            json_request(
                Method::POST,
                "/api/links",
                Some(&token),
                json!({ "url": "https://example.com", "title": "Example" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(link["title"], "Example");
        assert_eq!(link["description"], "");

        let (status, listed) = send(
            &app,
            Request::get("/api/links")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_links_require_auth() {
        let (status, body) = send(
            &app(),
            Request::get("/api/links").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Missing or invalid Authorization header");
    }
}
