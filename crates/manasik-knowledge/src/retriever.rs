//! Overlap-coefficient retriever over an in-memory corpus.

use std::collections::HashSet;

use manasik_core::types::{Document, ScoredResult};

use crate::tokenizer::token_set;

/// Number of results returned when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 4;

/// Ranks corpus documents by how many query tokens they contain.
///
/// The corpus is fixed at construction. Document token sets are computed once
/// up front; retrieval itself never mutates state, so a `Retriever` can be
/// shared across tasks behind an `Arc` without locking.
pub struct Retriever {
    documents: Vec<Document>,
    /// Token set of each document's search text, index-aligned with `documents`.
    doc_tokens: Vec<HashSet<String>>,
}

impl Retriever {
    pub fn new(documents: Vec<Document>) -> Self {
        let doc_tokens = documents
            .iter()
            .map(|doc| token_set(&doc.search_text()))
            .collect();
        Self {
            documents,
            doc_tokens,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Return up to `top_k` documents with a positive score, best first.
    ///
    /// Equal scores keep corpus order. `top_k == 0` yields an empty result.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<ScoredResult<'_>> {
        if top_k == 0 {
            return Vec::new();
        }

        let query_tokens = token_set(query);

        let mut scored: Vec<ScoredResult<'_>> = self
            .documents
            .iter()
            .zip(&self.doc_tokens)
            .map(|(doc, tokens)| ScoredResult {
                doc,
                score: overlap_score(&query_tokens, tokens),
            })
            .collect();

        // sort_by is stable: ties stay in corpus order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.retain(|r| r.score > 0.0);
        scored.truncate(top_k);

        tracing::debug!(
            "Retrieved {} of {} document(s) for {} query token(s)",
            scored.len(),
            self.documents.len(),
            query_tokens.len()
        );
        scored
    }
}

/// `|query ∩ doc| / max(|query|, 1)`.
fn overlap_score(query: &HashSet<String>, doc: &HashSet<String>) -> f64 {
    let common = query.iter().filter(|t| doc.contains(*t)).count();
    common as f64 / query.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hajj_corpus() -> Vec<Document> {
        vec![
            Document::new("Tawaf is circling the Kaaba seven times").with_title("Tawaf"),
            Document::new("Ihram is the sacred state entered before Hajj").with_title("Ihram"),
        ]
    }

    fn titles(results: &[ScoredResult<'_>]) -> Vec<String> {
        results
            .iter()
            .map(|r| r.doc.title.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_tawaf_query_ranks_tawaf_first() {
        let retriever = Retriever::new(hajj_corpus());
        let results = retriever.retrieve("What is Tawaf?", DEFAULT_TOP_K);

        // {what, is, tawaf}: the Tawaf entry has "is" and "tawaf", the Ihram entry only "is".
        assert_eq!(titles(&results), vec!["Tawaf", "Ihram"]);
        assert!((results[0].score - 2.0 / 3.0).abs() < 1e-9);
        assert!((results[1].score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_match() {
        let retriever = Retriever::new(hajj_corpus());
        let results = retriever.retrieve("Tawaf?", DEFAULT_TOP_K);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc.title.as_deref(), Some("Tawaf"));
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlap_returns_empty() {
        let retriever = Retriever::new(hajj_corpus());
        assert!(retriever.retrieve("Tell me about prayer", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn test_empty_corpus_returns_empty() {
        let retriever = Retriever::new(vec![]);
        assert!(retriever.is_empty());
        assert!(retriever.retrieve("What is Tawaf?", DEFAULT_TOP_K).is_empty());
        assert!(retriever.retrieve("", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn test_punctuation_only_query_returns_empty() {
        let retriever = Retriever::new(hajj_corpus());
        assert!(retriever.retrieve("???", DEFAULT_TOP_K).is_empty());
        assert!(retriever.retrieve("   ", DEFAULT_TOP_K).is_empty());
    }

    #[test]
    fn test_zero_top_k_returns_empty() {
        let retriever = Retriever::new(hajj_corpus());
        assert!(retriever.retrieve("Tawaf", 0).is_empty());
    }

    #[test]
    fn test_metadata_is_searchable() {
        let retriever = Retriever::new(vec![
            Document::new("Stoning the pillars at Mina")
                .with_title("Rami")
                .with_category("Days of Tashreeq")
                .with_tags(["jamarat", "pebbles"]),
        ]);
        assert_eq!(retriever.retrieve("jamarat", 4).len(), 1);
        assert_eq!(retriever.retrieve("tashreeq", 4).len(), 1);
        assert_eq!(retriever.retrieve("rami", 4).len(), 1);
    }

    #[test]
    fn test_duplicate_query_tokens_collapse() {
        let retriever = Retriever::new(vec![Document::new("zamzam water")]);
        let results = retriever.retrieve("zamzam zamzam ZAMZAM", 4);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_document_length_does_not_dilute_score() {
        let long = "mina ".repeat(200) + "arafah";
        let retriever = Retriever::new(vec![Document::new("arafah"), Document::new(long)]);
        let results = retriever.retrieve("arafah", 4);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, results[1].score);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = vec![
            Document::new("muzdalifah night").with_title("first"),
            Document::new("unrelated text").with_title("noise"),
            Document::new("muzdalifah pebbles").with_title("second"),
            Document::new("muzdalifah stay").with_title("third"),
        ];
        let retriever = Retriever::new(corpus);
        let results = retriever.retrieve("muzdalifah", 4);
        assert_eq!(titles(&results), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_k_returns_best_prefix() {
        let corpus = vec![
            Document::new("safa").with_title("one"),
            Document::new("safa marwah sai").with_title("three"),
            Document::new("safa marwah").with_title("two"),
            Document::new("zamzam").with_title("none"),
        ];
        let retriever = Retriever::new(corpus);
        let all = retriever.retrieve("safa marwah sai", 10);
        assert_eq!(titles(&all), vec!["three", "two", "one"]);

        for k in 1..=3 {
            let top = retriever.retrieve("safa marwah sai", k);
            assert_eq!(top.len(), k);
            assert_eq!(titles(&top), titles(&all[..k]));
        }
    }

    #[test]
    fn test_scores_in_range_and_sorted() {
        let corpus = vec![
            Document::new("Tawaf al-Ifadah after Arafah").with_category("Hajj"),
            Document::new("Umrah consists of Ihram, Tawaf, Sa'i and Halq").with_tags(["umrah"]),
            Document::new("Wuquf at Arafah is the pillar of Hajj"),
            Document::new("Farewell Tawaf before leaving Makkah"),
            Document::new(""),
        ];
        let retriever = Retriever::new(corpus);
        let results = retriever.retrieve("Which Tawaf is done after Arafah in Hajj?", 10);
        assert!(!results.is_empty());
        for r in &results {
            assert!(r.score > 0.0 && r.score <= 1.0);
        }
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_results_borrow_from_corpus() {
        let retriever = Retriever::new(hajj_corpus());
        let results = retriever.retrieve("ihram", 4);
        assert!(std::ptr::eq(results[0].doc, &retriever.documents()[1]));
    }

    #[test]
    fn test_retrieval_is_deterministic() {
        let retriever = Retriever::new(hajj_corpus());
        let a = retriever.retrieve("What is Tawaf?", 4);
        let b = retriever.retrieve("What is Tawaf?", 4);
        assert_eq!(a, b);
    }
}
