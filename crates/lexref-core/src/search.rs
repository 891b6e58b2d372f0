//! Search-query normalizer.
//!
//! Converts a free-text query into a primary/fallback pair of full-text
//! expressions the FTS engine accepts. Explicit FTS syntax (quoted phrases,
//! boolean operators, a trailing prefix wildcard) is passed through verbatim.

use serde::{Deserialize, Serialize};

/// Primary and fallback full-text-search expressions for one query.
///
/// Ephemeral; computed per search call. The caller runs `primary` first and
/// falls back to `fallback` only when the primary returns zero rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtsQueryVariants {
  /// Strict expression: every token required, quoted, prefix-matched.
  pub primary:  String,
  /// Loose expression: any token prefix-matched. Absent for passthrough
  /// queries and queries with no usable tokens.
  pub fallback: Option<String>,
}

/// Build FTS match expressions for `input`.
///
/// Never returns an empty `primary`: a query that tokenizes to nothing
/// yields the trimmed original string, which the engine rejects with its
/// own error rather than a silent empty match-all.
pub fn normalize_query(input: &str) -> FtsQueryVariants {
  if has_explicit_syntax(input) {
    return FtsQueryVariants {
      primary:  input.to_string(),
      fallback: None,
    };
  }

  let tokens: Vec<String> = input
    .split_whitespace()
    .map(clean_token)
    .filter(|t| !t.is_empty())
    .collect();

  if tokens.is_empty() {
    return FtsQueryVariants {
      primary:  input.trim().to_string(),
      fallback: None,
    };
  }

  let primary = tokens
    .iter()
    .map(|t| format!("\"{t}\"*"))
    .collect::<Vec<_>>()
    .join(" ");
  let fallback = tokens
    .iter()
    .map(|t| format!("{t}*"))
    .collect::<Vec<_>>()
    .join(" OR ");

  FtsQueryVariants {
    primary,
    fallback: Some(fallback),
  }
}

/// Does the query already use FTS syntax the user wrote deliberately?
fn has_explicit_syntax(input: &str) -> bool {
  if input.contains('"') || input.trim_end().ends_with('*') {
    return true;
  }
  input
    .split_whitespace()
    .any(|w| matches!(w, "OR" | "AND" | "NOT"))
}

/// Strip characters outside word characters and hyphen.
fn clean_token(token: &str) -> String {
  token
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
    .collect()
}
