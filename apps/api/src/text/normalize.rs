//! Text normalization applied before embedding: lowercase, tokenize on
//! whitespace, peel surrounding punctuation and drop stopwords.

use crate::text::stopwords::is_stopword;

/// Characters peeled off the front of a whitespace-delimited chunk.
fn is_prefix_punct(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '(' | '[' | '{' | '<' | '*' | '-' | '•' | '·' | '–' | '—' | '“' | '‘'
    )
}

/// Characters peeled off the end. `+` and `#` are not here so `c++` and
/// `c#` survive.
fn is_suffix_punct(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | ')' | ']' | '}' | '>' | '.' | ',' | ';' | ':' | '!' | '?' | '*' | '”' | '’'
    )
}

fn keep(token: &str) -> bool {
    !token.is_empty() && token.chars().any(char::is_alphanumeric) && !is_stopword(token)
}

/// Lowercases `text` and returns its content tokens joined by single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered
        .split_whitespace()
        .map(|chunk| {
            chunk
                .trim_start_matches(is_prefix_punct)
                .trim_end_matches(is_suffix_punct)
        })
        .filter(|token| keep(token))
        .collect::<Vec<_>>()
        .join(" ")
}
