use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use wa_core::{
    AnalysisRecord, Article, ArticleId, ArticlePage, ArticleQuery, ArticleStorage, Result,
    TemplateRecord,
};

use crate::StorageBackend;

#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: HashMap<ArticleId, Article>,
    analyses: HashMap<ArticleId, AnalysisRecord>,
    templates: Vec<TemplateRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_article(&mut self, article: &Article) {
        self.articles.insert(article.id.clone(), article.clone());
    }

    pub fn list_articles(&self, query: &ArticleQuery) -> ArticlePage {
        let mut matching: Vec<&Article> = self
            .articles
            .values()
            .filter(|a| a.category.matches(query.category))
            .collect();
        matching.sort_by(|a, b| b.crawl_time.cmp(&a.crawl_time).then_with(|| a.id.cmp(&b.id)));

        ArticlePage {
            total: matching.len(),
            articles: matching
                .into_iter()
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect(),
        }
    }

    pub fn list_templates(&self, user_id: &str, limit: usize) -> Vec<TemplateRecord> {
        let mut templates: Vec<&TemplateRecord> =
            self.templates.iter().filter(|t| t.user_id == user_id).collect();
        templates.sort_by(|a, b| b.created_time.cmp(&a.created_time));
        templates.into_iter().take(limit).cloned().collect()
    }
}

/// Process-local storage. Every write happens under one write lock, so an
/// upsert is a single critical section per identity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn new() -> Result<Self> {
        Ok(InMemoryStorage::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn upsert_article(&self, article: &Article) -> Result<()> {
        self.store.write().await.upsert_article(article);
        Ok(())
    }

    async fn get_article(&self, id: &ArticleId) -> Result<Option<Article>> {
        Ok(self.store.read().await.articles.get(id).cloned())
    }

    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticlePage> {
        Ok(self.store.read().await.list_articles(query))
    }

    async fn all_articles(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.articles.values().cloned().collect())
    }

    async fn count_articles(&self) -> Result<usize> {
        Ok(self.store.read().await.articles.len())
    }

    async fn upsert_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        self.store
            .write()
            .await
            .analyses
            .insert(record.article_id.clone(), record.clone());
        Ok(())
    }

    async fn get_analysis(&self, article_id: &ArticleId) -> Result<Option<AnalysisRecord>> {
        Ok(self.store.read().await.analyses.get(article_id).cloned())
    }

    async fn count_analyses(&self) -> Result<usize> {
        Ok(self.store.read().await.analyses.len())
    }

    async fn insert_template(&self, record: &TemplateRecord) -> Result<()> {
        self.store.write().await.templates.push(record.clone());
        Ok(())
    }

    async fn list_templates(&self, user_id: &str, limit: usize) -> Result<Vec<TemplateRecord>> {
        Ok(self.store.read().await.list_templates(user_id, limit))
    }

    async fn count_templates(&self) -> Result<usize> {
        Ok(self.store.read().await.templates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{analysis_record, article, template_record};
    use chrono::{Duration, Utc};
    use wa_core::Category;

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let storage = InMemoryStorage::new();
        let mut a = article("a", Category::Tech, Utc::now());
        storage.upsert_article(&a).await.unwrap();
        a.read_count = 99;
        storage.upsert_article(&a).await.unwrap();

        assert_eq!(storage.count_articles().await.unwrap(), 1);
        let stored = storage.get_article(&a.id).await.unwrap().unwrap();
        assert_eq!(stored.read_count, 99);
        assert!(storage.get_article(&ArticleId::new("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_filters_and_pages() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();
        storage.upsert_article(&article("old", Category::Tech, now - Duration::hours(2))).await.unwrap();
        storage.upsert_article(&article("new", Category::Tech, now)).await.unwrap();
        storage.upsert_article(&article("mid", Category::Finance, now - Duration::hours(1))).await.unwrap();

        let page = storage.list_articles(&ArticleQuery::default()).await.unwrap();
        let ids: Vec<_> = page.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(page.total, 3);

        let tech = storage
            .list_articles(&ArticleQuery { category: Category::Tech, limit: 1, offset: 1 })
            .await
            .unwrap();
        assert_eq!(tech.total, 2);
        assert_eq!(tech.articles.len(), 1);
        assert_eq!(tech.articles[0].id.as_str(), "old");
    }

    #[tokio::test]
    async fn test_analysis_overwrite() {
        let storage = InMemoryStorage::new();
        let id = ArticleId::new("a");
        storage.upsert_analysis(&analysis_record(&id, 10)).await.unwrap();
        storage.upsert_analysis(&analysis_record(&id, 80)).await.unwrap();

        assert_eq!(storage.count_analyses().await.unwrap(), 1);
        assert_eq!(storage.get_analysis(&id).await.unwrap().unwrap().analysis.score, 80);
    }

    #[tokio::test]
    async fn test_templates_per_user() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();
        storage.insert_template(&template_record("1", "alice", now - Duration::minutes(1))).await.unwrap();
        storage.insert_template(&template_record("2", "alice", now)).await.unwrap();
        storage.insert_template(&template_record("3", "bob", now)).await.unwrap();

        let alice = storage.list_templates("alice", 10).await.unwrap();
        assert_eq!(alice.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(storage.list_templates("alice", 1).await.unwrap().len(), 1);
        assert_eq!(storage.count_templates().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_converge() {
        let storage = Arc::new(InMemoryStorage::new());
        let now = Utc::now();
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    for j in 0..5 {
                        let mut a = article(&format!("id-{}", j), Category::Tech, now);
                        a.like_count = i;
                        storage.upsert_article(&a).await.unwrap();
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(storage.count_articles().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_dashboard_stats_default_impl() {
        let storage = InMemoryStorage::new();
        let now = Utc::now();
        storage.upsert_article(&article("a", Category::Tech, now)).await.unwrap();
        storage.upsert_analysis(&analysis_record(&ArticleId::new("a"), 50)).await.unwrap();

        let stats = storage.dashboard_stats(now).await.unwrap();
        assert_eq!(stats.total_articles, 1);
        assert_eq!(stats.total_analysis, 1);
        assert_eq!(stats.total_templates, 0);
        assert_eq!(stats.article_trend.len(), 1);
    }
}
