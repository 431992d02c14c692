//! Length-tiered token matching.
//!
//! Exact substring matching alone is too strict for inflected Czech
//! morphology ("mechanik" vs "mechanika" vs "mechaniků"), while plain
//! substring containment lets short tokens match mid-word noise. Matching is
//! therefore tiered by token length:
//!
//! - ≤ 2 characters: whole-word match only
//! - 3–4 characters: must start some word of the haystack
//! - > 4 characters: substring containment, falling back to a fuzzy
//!   word-prefix match with a length-derived prefix

use crate::normalize::{normalize, tokenize};

/// Prefix length used by the fuzzy word-prefix fallback.
///
/// Tokens of up to 4 characters keep their full length; longer tokens use
/// 65% of their length, clamped into `4..=6`.
pub fn prefix_len_for_token(token: &str) -> usize {
    let len = token.chars().count();
    if len <= 4 {
        len
    } else {
        ((len as f64 * 0.65).floor() as usize).clamp(4, 6)
    }
}

/// Whole-word containment: the token bounded by string edges or whitespace.
pub fn whole_word_in_text(haystack: &str, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return true;
    }
    haystack.split_whitespace().any(|w| w == token)
}

/// Fuzzy word-prefix fallback for long tokens.
///
/// Accepts when some haystack word at least as long as the computed prefix
/// starts with that prefix. Rejects outright when the prefix would be
/// shorter than 4 characters.
fn prefix_token_match(haystack: &str, token: &str) -> bool {
    let prefix_len = prefix_len_for_token(token);
    if prefix_len < 4 {
        return false;
    }

    let prefix: String = token.chars().take(prefix_len).collect();
    haystack
        .split_whitespace()
        .filter(|w| w.chars().count() >= prefix_len)
        .any(|w| w.starts_with(prefix.as_str()))
}

/// Decide whether a single token is "present" in a haystack key.
///
/// Both sides are expected to be [`normalize`](crate::normalize)d already.
/// An empty token always matches.
pub fn token_in_text(haystack: &str, token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return true;
    }

    let len = token.chars().count();

    // Very short tokens: whole word only, to avoid noise.
    if len <= 2 {
        return whole_word_in_text(haystack, token);
    }

    // Short tokens anchor at a word start, so "bor" does not hit "odborna".
    if len <= 4 {
        return haystack.split_whitespace().any(|w| w.starts_with(token));
    }

    if haystack.contains(token) {
        return true;
    }
    prefix_token_match(haystack, token)
}

/// Require every token of a free-text query to match the haystack.
///
/// The query is normalized and tokenized here; the haystack must already be
/// a normalized key. Order-independent logical AND; an empty or
/// all-punctuation query matches everything.
pub fn matches_all_tokens(haystack: &str, query: &str) -> bool {
    let q = normalize(query);
    tokenize(&q).all(|t| token_in_text(haystack, t))
}
