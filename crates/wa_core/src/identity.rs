//! Article identity derivation.
//!
//! An identity is the SHA-256 of the canonical title and the source reference,
//! so the same logical article keeps its key across harvests and the storage
//! upsert overwrites instead of duplicating. A batch position is mixed in only
//! when two candidates of one batch would otherwise share a key.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::types::{Article, ArticleId};

/// Trimmed, whitespace-collapsed, lowercased title.
pub fn canonical_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Derives the identity of an article from its content-stable fields.
pub fn derive_id(title: &str, source_ref: &str, disambiguator: Option<usize>) -> ArticleId {
    let mut hasher = Sha256::new();
    hasher.update(canonical_title(title).as_bytes());
    hasher.update([0u8]);
    hasher.update(source_ref.trim().as_bytes());
    if let Some(index) = disambiguator {
        hasher.update([0u8]);
        hasher.update(index.to_string().as_bytes());
    }
    ArticleId::new(format!("{:x}", hasher.finalize()))
}

/// Assigns identities to one source batch in place. The first occurrence of a
/// (title, reference) pair gets the plain key, later occurrences get their
/// batch index mixed in.
pub fn assign_batch(batch: &mut [Article]) {
    let mut seen = HashSet::new();
    for (index, article) in batch.iter_mut().enumerate() {
        let mut id = derive_id(&article.title, &article.content_url, None);
        if !seen.insert(id.clone()) {
            id = derive_id(&article.title, &article.content_url, Some(index));
            seen.insert(id.clone());
        }
        article.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    fn candidate(title: &str, url: &str) -> Article {
        Article {
            id: ArticleId::new(""),
            title: title.to_string(),
            author: "author".to_string(),
            content_url: url.to_string(),
            read_count: 0,
            like_count: 0,
            publish_time: Utc::now(),
            category: Category::All,
            summary: String::new(),
            keywords: vec![],
            crawl_time: Utc::now(),
            content: String::new(),
        }
    }

    #[test]
    fn test_derive_id_is_stable() {
        let a = derive_id("理财必看指南", "https://mp.weixin.qq.com/s/a", None);
        let b = derive_id("  理财必看指南 ", "https://mp.weixin.qq.com/s/a", None);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_derive_id_depends_on_reference() {
        let a = derive_id("title", "https://example.com/a", None);
        let b = derive_id("title", "https://example.com/b", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_canonical_title() {
        assert_eq!(canonical_title("  Hello   World \n"), "hello world");
    }

    #[test]
    fn test_assign_batch_disambiguates_collisions() {
        let mut batch = vec![
            candidate("Same", "https://example.com/x"),
            candidate("Other", "https://example.com/y"),
            candidate("same", "https://example.com/x"),
        ];
        assign_batch(&mut batch);
        assert_eq!(batch[0].id, derive_id("Same", "https://example.com/x", None));
        assert_eq!(batch[2].id, derive_id("Same", "https://example.com/x", Some(2)));
        assert_ne!(batch[0].id, batch[2].id);
    }

    #[test]
    fn test_assign_batch_ignores_position_without_collision() {
        let mut first = vec![candidate("A", "u1"), candidate("B", "u2")];
        let mut second = vec![candidate("B", "u2"), candidate("A", "u1")];
        assign_batch(&mut first);
        assign_batch(&mut second);
        assert_eq!(first[0].id, second[1].id);
        assert_eq!(first[1].id, second[0].id);
    }
}
