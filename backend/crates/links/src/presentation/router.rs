//! Links Router

use auth::{TokenService, UserRepository, require_auth};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::application::EnrichmentQueue;
use crate::domain::repository::LinkRepository;
use crate::presentation::handlers::{self, LinksAppState};

/// Create the Links router; every route requires a bearer token
///
/// `links` is shared with the enrichment dispatcher, hence the `Arc`.
pub fn links_router<L, U>(
    links: Arc<L>,
    users: U,
    tokens: Arc<TokenService>,
    enrichment: EnrichmentQueue,
) -> Router
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let state = LinksAppState {
        links,
        users: Arc::new(users),
        enrichment,
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_links::<L, U>).post(handlers::create_link::<L, U>),
        )
        .route(
            "/{id}",
            get(handlers::get_link::<L, U>)
                .patch(handlers::update_link::<L, U>)
                .delete(handlers::delete_link::<L, U>),
        )
        .route_layer(middleware::from_fn_with_state(tokens, require_auth))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::EnrichmentConfig;
    use crate::application::enrichment::test_support::{StubFetcher, TEST_PAGE};
    use crate::infra::memory::InMemoryLinkRepository;
    use crate::presentation::dto::LinkResponse;
    use auth::{AuthConfig, Email, InMemoryUserRepository, User};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use platform::password::HashedPassword;
    use serde_json::json;
    use tokio::task::JoinHandle;
    use tower::ServiceExt;

    const PAGE_URL: &str = "https://example.com/page";
    const BROKEN_URL: &str = "https://example.com/broken";

    struct Harness {
        app: Router,
        links: Arc<InMemoryLinkRepository>,
        enrichment: JoinHandle<()>,
        alice: String,
        bob: String,
    }

    async fn harness() -> Harness {
        let users = InMemoryUserRepository::new();
        let tokens = Arc::new(TokenService::new(&AuthConfig::with_random_secret()));
        let mut bearer = Vec::new();
        for email in ["alice@example.com", "bob@example.com"] {
            let email = Email::new(email).unwrap();
            users
                .create(&User::new(email.clone(), HashedPassword::from_db("unused")))
                .await
                .unwrap();
            bearer.push(format!("Bearer {}", tokens.issue(&email).unwrap()));
        }

        let links = Arc::new(InMemoryLinkRepository::new());
        let fetcher = StubFetcher::default()
            .with_page(PAGE_URL, 200, TEST_PAGE)
            .with_page(BROKEN_URL, 500, "");
        let (queue, enrichment) =
            EnrichmentQueue::start(links.clone(), fetcher, &EnrichmentConfig::default());

        let bob = bearer.pop().unwrap();
        let alice = bearer.pop().unwrap();
        Harness {
            app: links_router(links.clone(), users, tokens, queue),
            links,
            enrichment,
            alice,
            bob,
        }
    }

    fn request(method: &str, uri: &str, auth: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, auth);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(h: &Harness, auth: &str, url: &str, title: &str) -> LinkResponse {
        let response = h
            .app
            .clone()
            .oneshot(request(
                "POST",
                "/",
                auth,
                Some(json!({ "url": url, "title": title, "tags": ["reading"] })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_create_is_enriched_eventually() {
        let h = harness().await;
        let created = create(&h, &h.alice, PAGE_URL, "My title").await;
        assert_eq!(created.description, "");

        let Harness { app, links, enrichment, .. } = h;
        drop(app);
        enrichment.await.unwrap();

        let id = created.id.parse().unwrap();
        let stored = links.get(&id).await.unwrap();
        assert_eq!(stored.title, "My title");
        assert_eq!(stored.description, "X");
        assert_eq!(stored.image, "Y");
    }

    #[tokio::test]
    async fn test_broken_target_still_created() {
        let h = harness().await;
        let created = create(&h, &h.alice, BROKEN_URL, "Broken").await;

        let Harness { app, links, enrichment, .. } = h;
        drop(app);
        enrichment.await.unwrap();

        let stored = links.get(&created.id.parse().unwrap()).await.unwrap();
        assert!(stored.description.is_empty());
        assert!(stored.image.is_empty());
    }

    #[tokio::test]
    async fn test_other_owner_gets_404() {
        let h = harness().await;
        let created = create(&h, &h.alice, PAGE_URL, "Alice's").await;
        let uri = format!("/{}", created.id);

        for (method, body) in [
            ("GET", None),
            ("PATCH", Some(json!({ "title": "Bob's now" }))),
            ("DELETE", None),
        ] {
            let response = h
                .app
                .clone()
                .oneshot(request(method, &uri, &h.bob, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
        }

        let response = h.app.clone().oneshot(request("GET", "/", &h.bob, None)).await.unwrap();
        let listed: Vec<LinkResponse> = body_json(response).await;
        assert!(listed.is_empty());

        let response = h.app.clone().oneshot(request("GET", &uri, &h.alice, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_owner_crud() {
        let h = harness().await;
        let created = create(&h, &h.alice, PAGE_URL, "Before").await;
        let uri = format!("/{}", created.id);

        let response = h
            .app
            .clone()
            .oneshot(request("PATCH", &uri, &h.alice, Some(json!({ "title": "After" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: LinkResponse = body_json(response).await;
        assert_eq!(updated.title, "After");
        assert_eq!(updated.tags, vec!["reading".to_string()]);

        let response = h.app.clone().oneshot(request("DELETE", &uri, &h.alice, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = h.app.clone().oneshot(request("GET", &uri, &h.alice, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_404() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(request("GET", "/not-a-uuid", &h.alice, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_url_is_400() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(request(
                "POST",
                "/",
                &h.alice,
                Some(json!({ "url": "ftp://example.com", "title": "t" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let h = harness().await;
        for auth in ["", "Token abc", "Bearer ", "Bearer forged.token.value"] {
            let response = h
                .app
                .clone()
                .oneshot(request("GET", "/", auth, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        }
    }
}
