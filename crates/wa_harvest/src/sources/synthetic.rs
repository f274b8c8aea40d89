use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use wa_core::{Article, ArticleId, Category, Result};

use super::ContentSource;

const TITLE_TEMPLATES: [&str; 8] = [
    "🔥 {}必看指南：10个让你效率翻倍的技巧",
    "💡 关于{}，99%的人都不知道的秘密",
    "📈 {}赚钱攻略：从0到月入过万的完整路径",
    "🎯 {}高手都在用的5个核心方法",
    "💰 {}变现指南：普通人也能实现财务自由",
    "🚀 {}新手入门：30天从小白到专家",
    "⚡ {}效率提升：这些工具让你事半功倍",
    "🧠 {}思维升级：改变认知，改变人生",
];

const AUTHORS: [&str; 8] = [
    "财富自由之路",
    "效率工具箱",
    "职场进阶指南",
    "创业邦",
    "理财小达人",
    "成长笔记",
    "投资思维",
    "情商学院",
];

const MIN_READS: u64 = 50_000;
const MAX_READS: u64 = 500_000;
const MIN_LIKES: u64 = 1_000;
const MAX_LIKES: u64 = 20_000;

/// Stands in for a real article search. Every numeric field is drawn from the
/// title digest, so a keyword always yields the same batch.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    base_url: String,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new("https://mp.weixin.qq.com/s/")
    }
}

impl SyntheticSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn candidate(&self, keyword: &str, template: &str) -> Article {
        let title = template.replace("{}", keyword);
        let digest = Sha256::digest(title.as_bytes());
        let word = |i: usize| u32::from_be_bytes([digest[i], digest[i + 1], digest[i + 2], digest[i + 3]]) as u64;
        let hex: String = digest.iter().take(16).map(|b| format!("{:02x}", b)).collect();

        let now = Utc::now();
        Article {
            id: ArticleId::new(""),
            author: AUTHORS[digest[8] as usize % AUTHORS.len()].to_string(),
            content_url: format!("{}{}", self.base_url, hex),
            read_count: MIN_READS + word(0) % (MAX_READS - MIN_READS + 1),
            like_count: MIN_LIKES + word(4) % (MAX_LIKES - MIN_LIKES + 1),
            publish_time: now - Duration::days(1 + (digest[9] % 7) as i64),
            category: Category::All,
            summary: format!(
                "这是一篇关于{}的深度文章，通过实际案例和数据分析，为读者提供了有价值的见解和建议。",
                keyword
            ),
            keywords: std::iter::once(keyword.to_string())
                .chain((0..3).map(|j| format!("关键词{}", j)))
                .collect(),
            crawl_time: now,
            content: String::new(),
            title,
        }
    }
}

#[async_trait]
impl ContentSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Article>> {
        Ok(TITLE_TEMPLATES
            .iter()
            .map(|template| self.candidate(keyword, template))
            .collect())
    }
}
