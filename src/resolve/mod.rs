// src/resolve/mod.rs
pub mod catalog;

use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions};
use std::path::Path;
use tracing::{debug, trace};

pub use catalog::IndicatorSpec;

/// How an indicator's file was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Tokens,
}

/// Outcome of resolving one indicator against a file listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub key: &'static str,
    /// Matched file name and how it matched; `None` means the indicator is
    /// unavailable and downstream uses its neutral default.
    pub found: Option<(String, MatchKind)>,
}

/// List regular files directly inside `dir`, by file name.
///
/// Names come back sorted (glob yields paths in lexicographic order), which
/// makes the "first match wins" rule of token matching deterministic.
pub fn list_data_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        anyhow::bail!("{:?} is not a directory", dir);
    }
    let escaped = glob::Pattern::escape(&dir.display().to_string());
    let pattern = format!("{}/*", escaped);
    let opts = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob_with(&pattern, opts).with_context(|| format!("bad glob {}", pattern))? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            files.push(name.to_string());
        }
    }
    debug!(dir = %dir.display(), files = files.len(), "listed data files");
    Ok(files)
}

/// Return the first name in `files` whose lowercased form contains every
/// token (case-insensitive, order-independent). Empty tokens are ignored;
/// a token list with nothing left never matches.
pub fn find_file_by_tokens<'a>(tokens: &[&str], files: &'a [String]) -> Option<&'a str> {
    let tokens: Vec<String> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();
    if tokens.is_empty() {
        return None;
    }
    files
        .iter()
        .find(|f| {
            let low = f.to_lowercase();
            tokens.iter().all(|t| low.contains(t.as_str()))
        })
        .map(String::as_str)
}

/// Resolve one indicator: exact names first, then token matching.
pub fn resolve_indicator(spec: &IndicatorSpec, files: &[String]) -> Resolution {
    let exact = spec
        .exact_names()
        .into_iter()
        .find(|name| files.iter().any(|f| f == name));

    let found = match exact {
        Some(name) => Some((name, MatchKind::Exact)),
        None => find_file_by_tokens(spec.tokens, files).map(|f| (f.to_string(), MatchKind::Tokens)),
    };
    trace!(key = spec.key, ?found, "resolved indicator");
    Resolution {
        key: spec.key,
        found,
    }
}

/// Resolve every indicator in `specs`, preserving their order.
pub fn resolve_all(specs: &[IndicatorSpec], files: &[String]) -> Vec<Resolution> {
    specs.iter().map(|s| resolve_indicator(s, files)).collect()
}

#[cfg(test)]
mod tests {
    use super::catalog::*;
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_name_beats_tokens() {
        let files = names(&["unemployment_2024.csv", "Unemployment rate.csv"]);
        let r = resolve_indicator(&UNEMP, &files);
        assert_eq!(
            r.found,
            Some(("Unemployment rate.csv".to_string(), MatchKind::Exact))
        );

        let files = names(&["Unemp.csv", "Unemployment rate.csv"]);
        let r = resolve_indicator(&UNEMP, &files);
        assert_eq!(r.found.unwrap().0, "Unemp.csv");
    }

    #[test]
    fn test_token_match_is_case_insensitive_and_unordered() {
        let files = names(&["ILO_POPULATION-to-EMPLOYMENT_ratio.CSV"]);
        let r = resolve_indicator(&EMP_POP, &files);
        assert_eq!(r.found.unwrap().1, MatchKind::Tokens);
    }

    #[test]
    fn test_first_listed_match_wins() {
        let files = names(&["a_neet.csv", "b_neet.csv"]);
        assert_eq!(find_file_by_tokens(&["NEET"], &files), Some("a_neet.csv"));
    }

    #[test]
    fn test_unmatched_indicator_is_none() {
        let files = names(&["readme.md"]);
        let all = resolve_all(LABOUR_MARKET_INDICATORS, &files);
        assert_eq!(all.len(), 7);
        assert!(all.iter().all(|r| r.found.is_none()));
        assert_eq!(find_file_by_tokens(&["", ""], &files), None);
    }

    #[test]
    fn test_list_data_files_skips_dirs_and_hidden() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.csv"), "x")?;
        fs::write(dir.path().join("a.csv"), "x")?;
        fs::write(dir.path().join(".hidden.csv"), "x")?;
        fs::create_dir(dir.path().join("sub.csv"))?;

        assert_eq!(list_data_files(dir.path())?, names(&["a.csv", "b.csv"]));
        assert!(list_data_files(dir.path().join("nope")).is_err());
        Ok(())
    }
}
