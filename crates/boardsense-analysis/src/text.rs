//! Shared text helpers: keyword tokenization and edit-distance similarity.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();

    static ref STOP_WORDS: HashSet<&'static str> = [
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
        "was", "one", "our", "out", "has", "his", "how", "its", "may", "new", "now", "old",
        "see", "two", "way", "who", "did", "get", "let", "say", "she", "too", "use", "with",
        "this", "that", "from", "they", "have", "will", "your", "what", "when", "where",
        "which", "their", "there", "then", "than", "them", "these", "those", "into", "onto",
        "over", "under", "about", "after", "before", "been", "being", "were", "would",
        "could", "should", "also", "just", "only", "some", "such", "very", "more", "most",
        "each", "other", "here", "does", "done", "because", "while", "upon", "via",
    ]
    .into_iter()
    .collect();
}

/// Keyword tokens of a text: lowercased, punctuation stripped, stop-words and
/// tokens of two characters or fewer removed
pub fn keyword_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Words of a label split on every non-alphanumeric character
pub fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Classic Levenshtein distance over characters
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// `(max_len - distance) / max_len`, in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}
