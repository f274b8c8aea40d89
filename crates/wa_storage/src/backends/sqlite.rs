use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use wa_core::{
    AnalysisRecord, Article, ArticleId, ArticlePage, ArticleQuery, ArticleStorage, Error, Result,
    TemplateRecord,
};

use crate::StorageBackend;

pub const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        crawl_time TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS articles_crawl_time ON articles (crawl_time DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analysis (
        article_id TEXT PRIMARY KEY,
        analyze_time TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS templates (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_time TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
];

/// Fixed-width UTC timestamps so text ordering is time ordering.
fn sortable_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> Error + '_ {
    move |e| Error::Database(format!("{}: {}", context, e))
}

fn decode<T: DeserializeOwned>(row: &SqliteRow) -> Result<T> {
    let data: String = row.try_get("data").map_err(db_error("Failed to read row"))?;
    Ok(serde_json::from_str(&data)?)
}

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    async fn new() -> Result<Self> {
        Self::new_with_path(Path::new(DEFAULT_DB_PATH)).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(db_error("Invalid database path"))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    async fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&*self.pool)
            .await
            .map_err(db_error("Failed to count rows"))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn upsert_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, category, crawl_time, data)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                crawl_time = excluded.crawl_time,
                data = excluded.data
            "#,
        )
        .bind(article.id.as_str())
        .bind(article.category.as_str())
        .bind(sortable_time(&article.crawl_time))
        .bind(serde_json::to_string(article)?)
        .execute(&*self.pool)
        .await
        .map_err(db_error("Failed to store article"))?;
        Ok(())
    }

    async fn get_article(&self, id: &ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT data FROM articles WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("Failed to load article"))?;
        row.as_ref().map(decode).transpose()
    }

    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticlePage> {
        let category = query.category.as_str();
        let rows = sqlx::query(
            r#"
            SELECT data FROM articles
            WHERE (? = 'all' OR category = ?)
            ORDER BY crawl_time DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(category)
        .bind(category)
        .bind(query.limit as i64)
        .bind(query.offset as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("Failed to list articles"))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE (? = 'all' OR category = ?)")
            .bind(category)
            .bind(category)
            .fetch_one(&*self.pool)
            .await
            .map_err(db_error("Failed to count articles"))?;

        Ok(ArticlePage {
            articles: rows.iter().map(decode).collect::<Result<Vec<_>>>()?,
            total: total as usize,
        })
    }

    async fn all_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT data FROM articles")
            .fetch_all(&*self.pool)
            .await
            .map_err(db_error("Failed to load articles"))?;
        rows.iter().map(decode).collect()
    }

    async fn count_articles(&self) -> Result<usize> {
        self.count("articles").await
    }

    async fn upsert_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analysis (article_id, analyze_time, data)
            VALUES (?, ?, ?)
            ON CONFLICT(article_id) DO UPDATE SET
                analyze_time = excluded.analyze_time,
                data = excluded.data
            "#,
        )
        .bind(record.article_id.as_str())
        .bind(sortable_time(&record.analyze_time))
        .bind(serde_json::to_string(record)?)
        .execute(&*self.pool)
        .await
        .map_err(db_error("Failed to store analysis"))?;
        Ok(())
    }

    async fn get_analysis(&self, article_id: &ArticleId) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query("SELECT data FROM analysis WHERE article_id = ?")
            .bind(article_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_error("Failed to load analysis"))?;
        row.as_ref().map(decode).transpose()
    }

    async fn count_analyses(&self) -> Result<usize> {
        self.count("analysis").await
    }

    async fn insert_template(&self, record: &TemplateRecord) -> Result<()> {
        sqlx::query("INSERT INTO templates (id, user_id, created_time, data) VALUES (?, ?, ?, ?)")
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(sortable_time(&record.created_time))
            .bind(serde_json::to_string(record)?)
            .execute(&*self.pool)
            .await
            .map_err(db_error("Failed to store template"))?;
        Ok(())
    }

    async fn list_templates(&self, user_id: &str, limit: usize) -> Result<Vec<TemplateRecord>> {
        let rows = sqlx::query(
            "SELECT data FROM templates WHERE user_id = ? ORDER BY created_time DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("Failed to list templates"))?;
        rows.iter().map(decode).collect()
    }

    async fn count_templates(&self) -> Result<usize> {
        self.count("templates").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{analysis_record, article, template_record};
    use chrono::Duration;
    use tempfile::tempdir;
    use wa_core::Category;

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db")).await.unwrap();
        let now = Utc::now();

        let mut a = article("a", Category::Tech, now - Duration::hours(1));
        storage.upsert_article(&a).await.unwrap();
        storage.upsert_article(&article("b", Category::Finance, now)).await.unwrap();
        a.like_count = 42;
        storage.upsert_article(&a).await.unwrap();

        assert_eq!(storage.count_articles().await.unwrap(), 2);
        assert_eq!(storage.get_article(&a.id).await.unwrap().unwrap().like_count, 42);

        let page = storage.list_articles(&ArticleQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.articles[0].id.as_str(), "b");

        let tech = storage
            .list_articles(&ArticleQuery { category: Category::Tech, limit: 10, offset: 0 })
            .await
            .unwrap();
        assert_eq!(tech.total, 1);
        assert_eq!(tech.articles[0].like_count, 42);
    }

    #[tokio::test]
    async fn test_sqlite_analysis_and_templates() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("nested/test.db")).await.unwrap();
        let id = ArticleId::new("a");

        storage.upsert_analysis(&analysis_record(&id, 30)).await.unwrap();
        storage.upsert_analysis(&analysis_record(&id, 75)).await.unwrap();
        assert_eq!(storage.count_analyses().await.unwrap(), 1);
        assert_eq!(storage.get_analysis(&id).await.unwrap().unwrap().analysis.score, 75);

        let now = Utc::now();
        storage.insert_template(&template_record("t1", "alice", now - Duration::minutes(5))).await.unwrap();
        storage.insert_template(&template_record("t2", "alice", now)).await.unwrap();
        let templates = storage.list_templates("alice", 10).await.unwrap();
        assert_eq!(templates[0].id, "t2");
        assert!(storage.list_templates("bob", 10).await.unwrap().is_empty());
    }
}
