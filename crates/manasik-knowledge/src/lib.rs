//! # Manasik Knowledge
//!
//! Lexical retrieval over a small, static Hajj & Umrah corpus.
//! No vector DB, no embeddings, no index on disk.
//!
//! ## Design
//! - **Corpus** — a JSON array of documents, loaded once at startup
//! - **Tokenizer** — lowercase ASCII alphanumeric words, punctuation splits
//! - **Scoring** — asymmetric overlap: share of query tokens found in a document
//! - **Ranking** — stable sort, zero scores dropped, top-k kept
//!
//! ## How it works
//! ```text
//! User: "What is Tawaf?"
//!   ↓ tokenize → {what, is, tawaf}
//! Retriever.retrieve(query, 4)
//!   ↓ overlap / |query tokens|
//! Top 4 documents with score > 0
//!   ↓
//! Rendered into the grounding prompt
//! ```

pub mod corpus;
pub mod retriever;
pub mod tokenizer;

pub use corpus::{load_corpus, parse_corpus};
pub use retriever::{DEFAULT_TOP_K, Retriever};
pub use tokenizer::{token_set, tokenize};
