use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::stats::DashboardStats;
use crate::types::{AnalysisRecord, Article, ArticleId, ArticlePage, ArticleQuery, TemplateRecord};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Insert or overwrite the article sharing `article.id`. Atomic per identity.
    async fn upsert_article(&self, article: &Article) -> Result<()>;

    async fn get_article(&self, id: &ArticleId) -> Result<Option<Article>>;

    /// A page of articles ordered by harvest time, newest first.
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticlePage>;

    async fn all_articles(&self) -> Result<Vec<Article>>;

    async fn count_articles(&self) -> Result<usize>;

    /// Insert or overwrite the analysis of `record.article_id`.
    async fn upsert_analysis(&self, record: &AnalysisRecord) -> Result<()>;

    async fn get_analysis(&self, article_id: &ArticleId) -> Result<Option<AnalysisRecord>>;

    async fn count_analyses(&self) -> Result<usize>;

    async fn insert_template(&self, record: &TemplateRecord) -> Result<()>;

    /// Templates of one user, newest first.
    async fn list_templates(&self, user_id: &str, limit: usize) -> Result<Vec<TemplateRecord>>;

    async fn count_templates(&self) -> Result<usize>;

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let articles = self.all_articles().await?;
        Ok(DashboardStats::compute(
            &articles,
            self.count_analyses().await?,
            self.count_templates().await?,
            now,
        ))
    }
}
