use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use wa_core::identity::assign_batch;
use wa_core::{Article, ArticleId, Category, HarvestRequest};

use crate::fetcher::ContentFetcher;
use crate::logging::Logger;
use crate::sources::ContentSource;

const ENRICH_CONCURRENCY: usize = 4;

/// Category for a candidate harvested under `all`, derived from its identity.
pub fn derive_category(id: &ArticleId) -> Category {
    let bucket = id
        .as_str()
        .get(..2)
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        .unwrap_or(0);
    Category::DERIVABLE[bucket as usize % Category::DERIVABLE.len()]
}

pub struct Harvester {
    source: Arc<dyn ContentSource>,
    fetcher: Option<Arc<dyn ContentFetcher>>,
}

impl Harvester {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            fetcher: None,
        }
    }

    /// Fetch each kept candidate's full text before it is returned.
    pub fn with_enrichment(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Runs every keyword against the source and concatenates the kept
    /// candidates in keyword order. A failing keyword contributes nothing.
    pub async fn harvest(&self, request: &HarvestRequest, logger: &Logger) -> Vec<Article> {
        let keywords: Vec<&str> = request
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        let batches = join_all(
            keywords
                .iter()
                .map(|keyword| self.harvest_keyword(keyword, request, logger.child(format!("[{}]", keyword)))),
        )
        .await;

        let mut articles: Vec<Article> = batches.into_iter().flatten().collect();

        if let Some(fetcher) = &self.fetcher {
            articles = stream::iter(articles)
                .map(|mut article| {
                    let fetcher = fetcher.clone();
                    async move {
                        article.content = fetcher.fetch(&article.content_url).await;
                        article
                    }
                })
                .buffered(ENRICH_CONCURRENCY)
                .collect()
                .await;
        }

        logger.info(&format!(
            "Harvested {} articles for {} keywords from {}",
            articles.len(),
            keywords.len(),
            self.source.name()
        ));
        articles
    }

    async fn harvest_keyword(&self, keyword: &str, request: &HarvestRequest, logger: Logger) -> Vec<Article> {
        let mut batch = match self.source.search(keyword).await {
            Ok(batch) => batch,
            Err(e) => {
                logger.error(&format!("Search failed: {}", e));
                return Vec::new();
            }
        };

        assign_batch(&mut batch);
        for article in &mut batch {
            article.category = if request.category.is_all() {
                derive_category(&article.id)
            } else {
                request.category
            };
        }

        let found = batch.len();
        batch.retain(|a| a.read_count >= request.min_reads);
        logger.debug(&format!(
            "Kept {} of {} candidates with at least {} reads",
            batch.len(),
            found,
            request.min_reads
        ));
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SyntheticSource;
    use async_trait::async_trait;
    use wa_core::{Error, Result};

    /// Fails for one keyword and delegates the rest.
    struct FlakySource {
        inner: SyntheticSource,
        failing: &'static str,
    }

    #[async_trait]
    impl ContentSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn search(&self, keyword: &str) -> Result<Vec<Article>> {
            if keyword == self.failing {
                return Err(Error::Harvest("upstream unavailable".into()));
            }
            self.inner.search(keyword).await
        }
    }

    struct StaticFetcher;

    #[async_trait]
    impl ContentFetcher for StaticFetcher {
        async fn fetch(&self, reference: &str) -> String {
            format!("body of {}", reference)
        }
    }

    fn request(keywords: &[&str], category: Category, min_reads: u64) -> HarvestRequest {
        HarvestRequest::new(keywords.iter().map(|k| k.to_string()).collect(), category, min_reads)
    }

    #[tokio::test]
    async fn test_min_reads_filter() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        for threshold in [0, 100_000, 250_000, 400_000, 600_000] {
            let articles = harvester
                .harvest(&request(&["理财", "职场"], Category::All, threshold), &Logger::new())
                .await;
            assert!(articles.iter().all(|a| a.read_count >= threshold));
        }
        let none = harvester
            .harvest(&request(&["理财"], Category::All, 600_000), &Logger::new())
            .await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_requested_category_is_applied() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        let articles = harvester
            .harvest(&request(&["理财"], Category::Finance, 10_000), &Logger::new())
            .await;
        assert_eq!(articles.len(), 8);
        assert!(articles.iter().all(|a| a.category == Category::Finance));
    }

    #[tokio::test]
    async fn test_all_derives_a_concrete_category() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        let articles = harvester
            .harvest(&request(&["理财"], Category::All, 10_000), &Logger::new())
            .await;
        for article in &articles {
            assert!(Category::DERIVABLE.contains(&article.category));
            assert_eq!(article.category, derive_category(&article.id));
        }
    }

    #[tokio::test]
    async fn test_failing_keyword_does_not_abort_batch() {
        let harvester = Harvester::new(Arc::new(FlakySource {
            inner: SyntheticSource::default(),
            failing: "坏",
        }));
        let articles = harvester
            .harvest(&request(&["坏", "理财"], Category::All, 10_000), &Logger::new())
            .await;
        assert_eq!(articles.len(), 8);
        assert!(articles.iter().all(|a| a.title.contains("理财")));
    }

    #[tokio::test]
    async fn test_identities_are_stable_across_harvests() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        let req = request(&["干货"], Category::All, 10_000);
        let first: Vec<_> = harvester.harvest(&req, &Logger::new()).await.into_iter().map(|a| a.id).collect();
        let second: Vec<_> = harvester.harvest(&req, &Logger::new()).await.into_iter().map(|a| a.id).collect();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_keyword_order_and_no_cross_keyword_dedup() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default()));
        let articles = harvester
            .harvest(&request(&["理财", " ", "理财"], Category::All, 10_000), &Logger::new())
            .await;
        assert_eq!(articles.len(), 16);
        assert_eq!(articles[0].id, articles[8].id);
    }

    #[tokio::test]
    async fn test_enrichment_fills_content() {
        let harvester = Harvester::new(Arc::new(SyntheticSource::default())).with_enrichment(Arc::new(StaticFetcher));
        let articles = harvester
            .harvest(&request(&["理财"], Category::All, 10_000), &Logger::new())
            .await;
        assert!(articles.iter().all(|a| a.content == format!("body of {}", a.content_url)));
    }

    #[test]
    fn test_derive_category_buckets() {
        assert_eq!(derive_category(&ArticleId::new("00ff")), Category::Tech);
        assert_eq!(derive_category(&ArticleId::new("01ff")), Category::Finance);
        assert_eq!(derive_category(&ArticleId::new("07")), Category::Education);
        assert_eq!(derive_category(&ArticleId::new("")), Category::Tech);
    }
}
