//! Dashboard aggregation over stored articles.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::{Article, Category};

pub const TREND_DAYS: i64 = 7;
pub const HOT_KEYWORD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_articles: usize,
    pub total_analysis: usize,
    pub total_templates: usize,
    pub article_trend: Vec<DailyCount>,
    pub category_stats: Vec<CategoryCount>,
    pub hot_keywords: Vec<KeywordCount>,
}

impl DashboardStats {
    pub fn compute(
        articles: &[Article],
        total_analysis: usize,
        total_templates: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let since = now - Duration::days(TREND_DAYS);

        let mut trend: BTreeMap<String, usize> = BTreeMap::new();
        let mut categories: HashMap<Category, usize> = HashMap::new();
        let mut keywords: HashMap<&str, usize> = HashMap::new();

        for article in articles {
            if article.crawl_time >= since {
                *trend
                    .entry(article.crawl_time.format("%Y-%m-%d").to_string())
                    .or_default() += 1;
            }
            *categories.entry(article.category).or_default() += 1;
            for keyword in &article.keywords {
                *keywords.entry(keyword.as_str()).or_default() += 1;
            }
        }

        let mut category_stats: Vec<CategoryCount> = categories
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        category_stats.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });

        let mut hot_keywords: Vec<KeywordCount> = keywords
            .into_iter()
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.to_string(),
                count,
            })
            .collect();
        hot_keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        hot_keywords.truncate(HOT_KEYWORD_LIMIT);

        Self {
            total_articles: articles.len(),
            total_analysis,
            total_templates,
            article_trend: trend
                .into_iter()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
            category_stats,
            hot_keywords,
        }
    }
}
