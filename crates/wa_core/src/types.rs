use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Content category of an article. `All` means "unassigned" on an article and
/// "no filter" on a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Tech,
    Finance,
    Lifestyle,
    Education,
    Health,
    Entertainment,
}

impl Category {
    /// Categories a harvester may derive for a candidate when the request asked for `All`.
    pub const DERIVABLE: [Category; 4] = [
        Category::Tech,
        Category::Finance,
        Category::Lifestyle,
        Category::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Tech => "tech",
            Category::Finance => "finance",
            Category::Lifestyle => "lifestyle",
            Category::Education => "education",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }

    /// Whether an article tagged `self` passes a query filtered on `filter`.
    pub fn matches(&self, filter: Category) -> bool {
        filter.is_all() || *self == filter
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Category::All),
            "tech" => Ok(Category::Tech),
            "finance" => Ok(Category::Finance),
            "lifestyle" => Ok(Category::Lifestyle),
            "education" => Ok(Category::Education),
            "health" => Ok(Category::Health),
            "entertainment" => Ok(Category::Entertainment),
            other => Err(Error::Validation(format!("Unknown category: {}", other))),
        }
    }
}

/// Opaque, stable identity of an article. See [`crate::identity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub content_url: String,
    pub read_count: u64,
    pub like_count: u64,
    pub publish_time: DateTime<Utc>,
    pub category: Category,
    pub summary: String,
    pub keywords: Vec<String>,
    pub crawl_time: DateTime<Utc>,
    /// Full text, only present when the harvest enriched the article.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

/// The current analysis of one article. Re-analysis overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub article_id: ArticleId,
    pub analysis: crate::models::AnalysisResult,
    pub analyze_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub audience: String,
    pub keywords: Vec<String>,
    pub title_formula: String,
    pub structure: Vec<String>,
    pub examples: Vec<String>,
    pub tips: Vec<String>,
    pub generated_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub template: WritingTemplate,
    pub user_id: String,
    pub created_time: DateTime<Utc>,
}

/// A page request over stored articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleQuery {
    pub category: Category,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            category: Category::All,
            limit: 20,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("finance".parse::<Category>().unwrap(), Category::Finance);
        assert_eq!(" Tech ".parse::<Category>().unwrap(), Category::Tech);
        assert_eq!("".parse::<Category>().unwrap(), Category::All);
        assert!("sports".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde() {
        assert_eq!(serde_json::to_string(&Category::Lifestyle).unwrap(), "\"lifestyle\"");
        let c: Category = serde_json::from_str("\"all\"").unwrap();
        assert!(c.is_all());
    }

    #[test]
    fn test_category_matches() {
        assert!(Category::Tech.matches(Category::All));
        assert!(Category::Tech.matches(Category::Tech));
        assert!(!Category::Tech.matches(Category::Finance));
    }

    #[test]
    fn test_article_serializes_timestamps_as_iso8601() {
        let time = DateTime::parse_from_rfc3339("2024-03-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let article = Article {
            id: ArticleId::new("abc"),
            title: "t".into(),
            author: "a".into(),
            content_url: "https://example.com".into(),
            read_count: 1,
            like_count: 2,
            publish_time: time,
            category: Category::Tech,
            summary: String::new(),
            keywords: vec![],
            crawl_time: time,
            content: String::new(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["crawl_time"], "2024-03-01T08:30:00Z");
        assert!(json.get("content").is_none());
    }
}
