//! Text normalization and token matching for Pracehub.
//!
//! This crate provides:
//! - Canonical key normalization (case folding, diacritic stripping)
//! - Length-tiered token matching tolerant of Czech inflection
//! - Whitespace tokenization
//!
//! # Example
//!
//! ```
//! use pracehub_text::{normalize, matches_all_tokens};
//!
//! let haystack = normalize("Servisní technik – Plzeň");
//! assert!(matches_all_tokens(&haystack, "technik plzen"));
//! ```

mod matcher;
mod normalize;

pub use matcher::{matches_all_tokens, prefix_len_for_token, token_in_text, whole_word_in_text};
pub use normalize::{normalize, tokenize};
