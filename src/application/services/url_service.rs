//! Short URL creation and resolution service.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::entities::ShortCode;
use crate::domain::repositories::{RepositoryError, UrlRepository};
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_url;

/// Failures surfaced by [`UrlService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("URL not found")]
    NotFound,

    /// The URL's derived code belongs to a different URL. There is no
    /// alternative code to fall back to.
    #[error("short code collision detected: {code} is already used by a different URL")]
    Collision { code: String, original_url: String },

    /// A concurrent caller stored this URL under another code between the
    /// lookup and the write.
    #[error("URL already shortened")]
    Duplicate,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Service for creating and resolving short codes.
///
/// Codes are derived from the URL, so creation is idempotent: a URL that was
/// shortened before gets its existing code back without a write.
pub struct UrlService<R: UrlRepository + ?Sized = dyn UrlRepository> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Returns the short code for `original_url`, creating the mapping on
    /// first use.
    ///
    /// # Flow
    ///
    /// 1. Validate the URL (`http`/`https`, non-empty host)
    /// 2. Return the existing code if the URL is already stored
    /// 3. Otherwise derive the code and save the mapping
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidUrl`] if validation fails
    /// - [`ServiceError::Collision`] if the derived code belongs to another URL
    /// - [`ServiceError::Duplicate`] if a concurrent create won the race
    /// - [`ServiceError::Storage`] on backend failures
    pub async fn create(&self, original_url: &str) -> Result<ShortCode, ServiceError> {
        validate_url(original_url).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;

        match self.repository.get_by_original(original_url).await {
            Ok(existing) => {
                debug!(code = %existing, "URL already shortened");
                return Ok(existing);
            }
            Err(RepositoryError::NotFound) => {}
            Err(e) => {
                return Err(ServiceError::Storage(format!(
                    "failed to check existing URL: {e}"
                )));
            }
        }

        let code = generate_code(original_url);

        match self.repository.save(&code, original_url).await {
            Ok(()) => {
                metrics::counter!("shorturl_urls_created_total").increment(1);
                info!(code = %code, "Short URL created");
                Ok(code)
            }
            Err(RepositoryError::AlreadyExists { .. }) => {
                metrics::counter!("shorturl_code_collisions_total").increment(1);
                error!(
                    code = %code,
                    original_url,
                    "Short code collision: derived code is owned by a different URL"
                );
                Err(ServiceError::Collision {
                    code: code.into_inner(),
                    original_url: original_url.to_string(),
                })
            }
            Err(RepositoryError::Duplicate { .. }) => {
                // Surfaced as-is; re-resolving via get_by_original is not done here.
                metrics::counter!("shorturl_duplicate_races_total").increment(1);
                warn!(code = %code, original_url, "URL was shortened concurrently");
                Err(ServiceError::Duplicate)
            }
            Err(e) => Err(ServiceError::Storage(format!("failed to save URL: {e}"))),
        }
    }

    /// Resolves a short code to its original URL.
    ///
    /// Malformed codes fail with [`ServiceError::NotFound`] before any
    /// storage access.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the code is malformed or unknown
    /// - [`ServiceError::Storage`] on backend failures
    pub async fn resolve(&self, code: &str) -> Result<String, ServiceError> {
        let Ok(code) = ShortCode::parse(code) else {
            debug!(code, "Rejected malformed short code");
            return Err(ServiceError::NotFound);
        };

        self.repository.get(&code).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Storage(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::persistence::MemoryUrlRepository;
    use std::collections::HashSet;

    fn memory_service() -> (UrlService<MemoryUrlRepository>, Arc<MemoryUrlRepository>) {
        let repo = Arc::new(MemoryUrlRepository::new());
        (UrlService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_valid_urls() {
        let (service, _) = memory_service();

        for url in [
            "http://example.com/test",
            "https://example.com/test",
            "https://example.com/path/to/page?param=value",
        ] {
            let code = service.create(url).await.unwrap();
            assert_eq!(code.as_str().len(), 10);
            assert_eq!(code, generate_code(url));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_urls() {
        let (service, repo) = memory_service();

        for url in ["", "example.com", "ftp://example.com", "ftp://x", "https://"] {
            let err = service.create(url).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidUrl(_)),
                "{url:?} gave {err:?}"
            );
        }

        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (service, repo) = memory_service();

        let first = service.create("https://example.com/test").await.unwrap();
        let second = service.create("https://example.com/test").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (service, _) = memory_service();

        let url = "https://example.com/path?q=1#frag";
        let code = service.create(url).await.unwrap();

        assert_eq!(service.resolve(code.as_str()).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_url_stored_verbatim() {
        let (service, _) = memory_service();

        let upper = service.create("https://EXAMPLE.COM/Path").await.unwrap();
        let lower = service.create("https://example.com/Path").await.unwrap();

        assert_ne!(upper, lower);
        assert_eq!(
            service.resolve(upper.as_str()).await.unwrap(),
            "https://EXAMPLE.COM/Path"
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let (service, _) = memory_service();

        assert_eq!(
            service.resolve("abcdefghij").await,
            Err(ServiceError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_storage() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_get().times(0);

        let service = UrlService::new(Arc::new(mock_repo));

        for code in ["bad", "", "abcdefghijk", "abcde-ghij", "abcde@ghij"] {
            assert_eq!(service.resolve(code).await, Err(ServiceError::NotFound));
        }
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_failure() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("connection reset".to_string())));

        let service = UrlService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.resolve("abcdefghij").await,
            Err(ServiceError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_create_returns_existing_without_generating_or_saving() {
        let mut mock_repo = MockUrlRepository::new();
        let existing = ShortCode::parse("existing00").unwrap();

        mock_repo
            .expect_get_by_original()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(existing.clone()));
        mock_repo.expect_save().times(0);

        let service = UrlService::new(Arc::new(mock_repo));

        let code = service.create("https://example.com").await.unwrap();
        assert_eq!(code.as_str(), "existing00");
    }

    #[tokio::test]
    async fn test_create_saves_derived_code() {
        let mut mock_repo = MockUrlRepository::new();
        let url = "https://example.com/test";
        let expected = generate_code(url);
        let expected_in_save = expected.clone();

        mock_repo
            .expect_get_by_original()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));
        mock_repo
            .expect_save()
            .withf(move |code, original| *code == expected_in_save && original == url)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UrlService::new(Arc::new(mock_repo));

        assert_eq!(service.create(url).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_create_lookup_failure_is_storage_error() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("timeout".to_string())));
        mock_repo.expect_save().times(0);

        let service = UrlService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.create("https://example.com").await,
            Err(ServiceError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_create_collision_is_reported() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .returning(|_| Err(RepositoryError::NotFound));
        mock_repo.expect_save().times(1).returning(|code, _| {
            Err(RepositoryError::AlreadyExists {
                code: code.to_string(),
            })
        });

        let service = UrlService::new(Arc::new(mock_repo));

        let err = service.create("https://example.com").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Collision {
                code: generate_code("https://example.com").into_inner(),
                original_url: "https://example.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_collision_with_reference_store() {
        let (service, repo) = memory_service();
        let victim = "https://victim.example.com";

        // Occupy the victim's derived slot with a different URL.
        repo.save(&generate_code(victim), "https://squatter.example.com")
            .await
            .unwrap();

        let err = service.create(victim).await.unwrap_err();
        assert!(matches!(err, ServiceError::Collision { .. }));
        assert_eq!(
            service
                .resolve(generate_code(victim).as_str())
                .await
                .unwrap(),
            "https://squatter.example.com"
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_race_is_surfaced() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));
        mock_repo.expect_save().times(1).returning(|_, url| {
            Err(RepositoryError::Duplicate {
                original_url: url.to_string(),
            })
        });

        let service = UrlService::new(Arc::new(mock_repo));

        assert_eq!(
            service.create("https://example.com").await,
            Err(ServiceError::Duplicate)
        );
    }

    #[tokio::test]
    async fn test_create_save_failure_is_storage_error() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .returning(|_| Err(RepositoryError::NotFound));
        mock_repo
            .expect_save()
            .returning(|_, _| Err(RepositoryError::Storage("disk full".to_string())));

        let service = UrlService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.create("https://example.com").await,
            Err(ServiceError::Storage(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_distinct_urls() {
        let (service, repo) = memory_service();
        let service = Arc::new(service);
        let mut handles = vec![];

        for i in 0..100u32 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create(&format!("https://example.com/item/{i}"))
                    .await
                    .unwrap()
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap());
        }

        assert_eq!(codes.len(), 100);
        assert_eq!(repo.count(), 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_same_url() {
        let (service, repo) = memory_service();
        let service = Arc::new(service);
        let mut handles = vec![];

        for _ in 0..50 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.create("https://example.com/hot").await
            }));
        }

        let expected = generate_code("https://example.com/hot");
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), expected);
        }

        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_scenario_end_to_end() {
        let (service, _) = memory_service();

        let code = service.create("https://example.com/test").await.unwrap();
        assert_eq!(code.as_str().len(), 10);
        assert_eq!(
            service.resolve(code.as_str()).await.unwrap(),
            "https://example.com/test"
        );
        assert_eq!(
            service.create("https://example.com/test").await.unwrap(),
            code
        );
        assert!(matches!(
            service.create("ftp://x").await,
            Err(ServiceError::InvalidUrl(_))
        ));
        assert_eq!(service.resolve("bad").await, Err(ServiceError::NotFound));
        assert!(matches!(
            service.create("").await,
            Err(ServiceError::InvalidUrl(_))
        ));
    }
}
