//! Weight tables derived from ordered preference lists.

use std::collections::HashMap;

use super::languages::is_supported_language;
use super::parser::normalize_format;

/// Mapping from preference token to a strictly ordered positive weight
///
/// For a list of `N` tokens the first gets `N`, the last gets `1`. Tokens that
/// are not in the table weigh `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    weights: HashMap<String, u32>,
}

impl WeightTable {
    /// Build a table from tokens in preference order
    ///
    /// Repeated tokens keep their first position; later repeats are dropped
    /// before weights are assigned.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            if !unique.contains(&token) {
                unique.push(token);
            }
        }

        let n = unique.len() as u32;
        let weights = unique
            .into_iter()
            .enumerate()
            .map(|(i, token)| (token, n - i as u32))
            .collect();

        Self { weights }
    }

    /// Build a language table, dropping unsupported languages before weighting
    pub fn for_languages<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_tokens(
            tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| is_supported_language(t))
                .map(|t| t.to_lowercase()),
        )
    }

    /// Build a format table; tokens are normalized but never filtered
    pub fn for_formats<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_tokens(
            tokens
                .into_iter()
                .map(|t| normalize_format(t.as_ref()))
                .filter(|t| !t.is_empty()),
        )
    }

    /// Weight of `token`, `0` when absent
    pub fn weight(&self, token: &str) -> u32 {
        self.weights.get(token).copied().unwrap_or(0)
    }

    /// Number of weighted tokens
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table has no weighted tokens
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
