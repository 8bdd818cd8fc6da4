//! Link Enrichment
//!
//! Fire-and-forget metadata scraping for newly created links. Callers push a
//! job onto a bounded queue and return at once; a dispatcher task runs the
//! jobs with a cap on concurrent fetches. Failures are logged and the link
//! keeps its empty description and image. There are no retries.

use std::sync::Arc;

use kernel::id::LinkId;
use platform::http::HttpFetcher;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};

use crate::application::config::EnrichmentConfig;
use crate::domain::entities::LinkPatch;
use crate::domain::metadata::{Metadata, extract_metadata};
use crate::domain::repository::LinkRepository;
use crate::error::FetchError;

/// Tracing target for the enrichment pipeline
const TRACING_TARGET: &str = "links::enrichment";

/// Fetches a page and extracts its metadata
pub struct MetadataFetcher<F> {
    http: F,
}

impl<F> MetadataFetcher<F>
where
    F: HttpFetcher,
{
    pub fn new(http: F) -> Self {
        Self { http }
    }

    /// Only 2xx bodies are parsed
    pub async fn fetch(&self, url: &str) -> Result<Metadata, FetchError> {
        let page = self.http.get(url).await?;
        if !page.is_success() {
            return Err(FetchError::NonSuccessStatus(page.status));
        }
        extract_metadata(&page.body)
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    pub link_id: LinkId,
    pub url: String,
}

/// Enrich one link: fetch, then patch description and image by id
///
/// Never fails; every outcome is logged.
pub async fn enrich_link<R, F>(repo: &R, fetcher: &MetadataFetcher<F>, job: EnrichmentJob)
where
    R: LinkRepository,
    F: HttpFetcher,
{
    let metadata = match fetcher.fetch(&job.url).await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(
                target: TRACING_TARGET,
                link_id = %job.link_id,
                url = %job.url,
                error = %e,
                "Enrichment fetch failed"
            );
            return;
        }
    };

    let patch = LinkPatch::enrichment(&metadata);
    if patch.is_empty() {
        tracing::debug!(
            target: TRACING_TARGET,
            link_id = %job.link_id,
            "Page has no description or image"
        );
        return;
    }

    match repo.update_partial(&job.link_id, None, &patch).await {
        Ok(Some(_)) => {
            tracing::info!(
                target: TRACING_TARGET,
                link_id = %job.link_id,
                page_title = %metadata.title,
                has_description = !metadata.description.is_empty(),
                has_image = !metadata.image.is_empty(),
                "Link enriched"
            );
        }
        Ok(None) => {
            tracing::debug!(
                target: TRACING_TARGET,
                link_id = %job.link_id,
                "Link deleted before enrichment finished"
            );
        }
        Err(e) => {
            tracing::error!(
                target: TRACING_TARGET,
                link_id = %job.link_id,
                error = %e,
                "Failed to store enrichment"
            );
        }
    }
}

/// Handle for scheduling enrichment
///
/// Cheap to clone. When the last clone is dropped the dispatcher finishes the
/// jobs already running and exits.
#[derive(Clone)]
pub struct EnrichmentQueue {
    sender: mpsc::Sender<EnrichmentJob>,
}

impl EnrichmentQueue {
    /// Spawn the dispatcher; the returned handle resolves once it has drained
    pub fn start<R, F>(repo: Arc<R>, http: F, config: &EnrichmentConfig) -> (Self, JoinHandle<()>)
    where
        R: LinkRepository + Send + Sync + 'static,
        F: HttpFetcher + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        let fetcher = Arc::new(MetadataFetcher::new(http));

        let handle = tokio::spawn(dispatch(receiver, repo, fetcher, semaphore));
        (Self { sender }, handle)
    }

    /// Queue a link for enrichment and return immediately
    ///
    /// A full or closed queue drops the job with a warning.
    pub fn schedule(&self, link_id: LinkId, url: impl Into<String>) {
        let job = EnrichmentJob {
            link_id,
            url: url.into(),
        };
        match self.sender.try_send(job) {
            Ok(()) => {
                tracing::debug!(target: TRACING_TARGET, link_id = %link_id, "Enrichment scheduled");
            }
            Err(mpsc::error::TrySendError::Full(job)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    link_id = %job.link_id,
                    "Enrichment queue full, job dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    link_id = %job.link_id,
                    "Enrichment dispatcher stopped, job dropped"
                );
            }
        }
    }
}

async fn dispatch<R, F>(
    mut receiver: mpsc::Receiver<EnrichmentJob>,
    repo: Arc<R>,
    fetcher: Arc<MetadataFetcher<F>>,
    semaphore: Arc<Semaphore>,
) where
    R: LinkRepository + Send + Sync + 'static,
    F: HttpFetcher + Send + Sync + 'static,
{
    tracing::info!(target: TRACING_TARGET, "Enrichment dispatcher started");

    let mut in_flight = JoinSet::new();
    while let Some(job) = receiver.recv().await {
        while let Some(result) = in_flight.try_join_next() {
            log_join_result(result);
        }

        // Waiting here leaves later jobs in the channel, which is what bounds it
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repo = repo.clone();
        let fetcher = fetcher.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            enrich_link(repo.as_ref(), fetcher.as_ref(), job).await;
        });
    }

    while let Some(result) = in_flight.join_next().await {
        log_join_result(result);
    }

    tracing::info!(target: TRACING_TARGET, "Enrichment dispatcher stopped");
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(target: TRACING_TARGET, error = %e, "Enrichment task panicked");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use platform::http::{FetchedPage, HttpFetcher, TransportError};

    /// Canned responses by URL; unknown URLs fail at the transport level
    #[derive(Default)]
    pub struct StubFetcher {
        pages: HashMap<String, FetchedPage>,
    }

    impl StubFetcher {
        pub fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }
    }

    impl HttpFetcher for StubFetcher {
        async fn get(&self, url: &str) -> Result<FetchedPage, TransportError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| TransportError::Request("connection refused".to_string()))
        }
    }

    pub const TEST_PAGE: &str = r#"<html><head>
        <title>Test Page</title>
        <meta name="description" content="X">
        <meta property="og:image" content="Y">
    </head><body></body></html>"#;
}

#[cfg(test)]
mod tests {
    use super::test_support::{StubFetcher, TEST_PAGE};
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::value_objects::{LinkTitle, LinkUrl, Tags};
    use crate::infra::memory::InMemoryLinkRepository;
    use kernel::id::UserId;
    use platform::http::{FetchedPage, TransportError};
    use tokio::sync::Notify;

    const URL: &str = "https://example.com/page";

    async fn stored_link(repo: &InMemoryLinkRepository, title: &str) -> Link {
        let link = Link::new(
            UserId::new(),
            LinkUrl::parse(URL).unwrap(),
            LinkTitle::new(title).unwrap(),
            Tags::default(),
        );
        repo.create(&link).await.unwrap();
        link
    }

    #[tokio::test]
    async fn test_fetch_extracts_metadata() {
        let fetcher = MetadataFetcher::new(StubFetcher::default().with_page(URL, 200, TEST_PAGE));
        let metadata = fetcher.fetch(URL).await.unwrap();
        assert_eq!(metadata.title, "Test Page");
        assert_eq!(metadata.description, "X");
        assert_eq!(metadata.image, "Y");
    }

    #[tokio::test]
    async fn test_fetch_errors() {
        let fetcher = MetadataFetcher::new(
            StubFetcher::default()
                .with_page(URL, 500, "")
                .with_page("https://example.com/json", 200, "{}"),
        );
        assert!(matches!(
            fetcher.fetch(URL).await,
            Err(FetchError::NonSuccessStatus(500))
        ));
        assert!(matches!(
            fetcher.fetch("https://example.com/json").await,
            Err(FetchError::ParseFailure)
        ));
        assert!(matches!(
            fetcher.fetch("https://unreachable.example").await,
            Err(FetchError::TransportFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_enrichment_sets_only_description_and_image() {
        let repo = InMemoryLinkRepository::new();
        let link = stored_link(&repo, "My title").await;
        let fetcher = MetadataFetcher::new(StubFetcher::default().with_page(URL, 200, TEST_PAGE));

        enrich_link(&repo, &fetcher, EnrichmentJob { link_id: link.id, url: URL.to_string() }).await;

        let stored = repo.get(&link.id).await.unwrap();
        assert_eq!(stored.title, "My title");
        assert_eq!(stored.url, URL);
        assert_eq!(stored.description, "X");
        assert_eq!(stored.image, "Y");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_fields_empty() {
        let repo = InMemoryLinkRepository::new();
        let link = stored_link(&repo, "My title").await;
        let fetcher = MetadataFetcher::new(StubFetcher::default().with_page(URL, 500, TEST_PAGE));

        enrich_link(&repo, &fetcher, EnrichmentJob { link_id: link.id, url: URL.to_string() }).await;

        let stored = repo.get(&link.id).await.unwrap();
        assert_eq!(stored, link);
    }

    #[tokio::test]
    async fn test_deleted_link_is_not_resurrected() {
        let repo = InMemoryLinkRepository::new();
        let link = stored_link(&repo, "gone").await;
        repo.delete_by_id_and_owner(&link.id, &link.user_id).await.unwrap();
        let fetcher = MetadataFetcher::new(StubFetcher::default().with_page(URL, 200, TEST_PAGE));

        enrich_link(&repo, &fetcher, EnrichmentJob { link_id: link.id, url: URL.to_string() }).await;

        assert!(repo.get(&link.id).await.is_none());
    }

    #[tokio::test]
    async fn test_queue_runs_jobs_and_drains_on_drop() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let first = stored_link(&repo, "first").await;
        let second = stored_link(&repo, "second").await;

        let (queue, handle) = EnrichmentQueue::start(
            repo.clone(),
            StubFetcher::default().with_page(URL, 200, TEST_PAGE),
            &EnrichmentConfig::default(),
        );
        queue.schedule(first.id, URL);
        queue.schedule(second.id, URL);
        drop(queue);
        handle.await.unwrap();

        for id in [first.id, second.id] {
            assert_eq!(repo.get(&id).await.unwrap().description, "X");
        }
    }

    /// Blocks every fetch until released
    struct GatedFetcher {
        gate: Arc<Notify>,
    }

    impl HttpFetcher for GatedFetcher {
        async fn get(&self, _url: &str) -> Result<FetchedPage, TransportError> {
            self.gate.notified().await;
            Ok(FetchedPage {
                status: 200,
                body: TEST_PAGE.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_rename_survives_enrichment() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let link = stored_link(&repo, "original").await;
        let gate = Arc::new(Notify::new());

        let (queue, handle) = EnrichmentQueue::start(
            repo.clone(),
            GatedFetcher { gate: gate.clone() },
            &EnrichmentConfig::default(),
        );
        queue.schedule(link.id, URL);

        let rename = LinkPatch {
            title: Some("renamed".to_string()),
            ..LinkPatch::default()
        };
        repo.update_partial(&link.id, Some(&link.user_id), &rename)
            .await
            .unwrap()
            .unwrap();

        // notify_one stores a permit if the fetch is not waiting yet
        gate.notify_one();
        drop(queue);
        handle.await.unwrap();

        let stored = repo.get(&link.id).await.unwrap();
        assert_eq!(stored.title, "renamed");
        assert_eq!(stored.description, "X");
        assert_eq!(stored.image, "Y");
    }

    #[tokio::test]
    async fn test_full_queue_drops_jobs() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let mut links = Vec::new();
        for i in 0..5 {
            links.push(stored_link(&repo, &format!("link {i}")).await);
        }
        let config = EnrichmentConfig {
            queue_capacity: 1,
            ..Default::default()
        };
        let (queue, handle) = EnrichmentQueue::start(
            repo.clone(),
            StubFetcher::default().with_page(URL, 200, TEST_PAGE),
            &config,
        );

        // The test runtime is single-threaded, so the dispatcher cannot
        // drain the channel between these calls
        for link in &links {
            queue.schedule(link.id, URL);
        }
        drop(queue);
        handle.await.unwrap();

        let mut enriched = 0;
        for link in &links {
            if repo.get(&link.id).await.unwrap().description == "X" {
                enriched += 1;
            }
        }
        assert_eq!(enriched, 1);
    }
}
