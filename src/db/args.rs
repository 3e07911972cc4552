//! Argument list builders
//!
//! Turn decoded query parameters into the argv tail of a subcommand. Values are
//! forwarded literally; nothing is escaped or validated beyond presence.

use std::collections::HashSet;
use thiserror::Error;

/// A required query parameter was absent or empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("Missing match_col or match_val")]
    MissingMatch,
    #[error("Missing delete parameters")]
    MissingDelete,
}

/// First value of `key`, treating an empty value as absent
fn required<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

/// `key=value` tokens, one per distinct key in arrival order, first value wins
fn key_value_tokens<'a>(
    params: &'a [(String, String)],
    skip: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    let mut seen = HashSet::with_capacity(params.len());
    params.iter().filter_map(move |(key, value)| {
        let first = seen.insert(key.as_str());
        (first && !skip.contains(&key.as_str())).then(|| format!("{key}={value}"))
    })
}

/// `insert k1=v1 k2=v2 ...`
pub fn insert_args(params: &[(String, String)]) -> Vec<String> {
    key_value_tokens(params, &[]).collect()
}

/// `update match_col match_val k=v ...`
pub fn update_args(params: &[(String, String)]) -> Result<Vec<String>, ArgsError> {
    let (Some(col), Some(val)) = (required(params, "match_col"), required(params, "match_val"))
    else {
        return Err(ArgsError::MissingMatch);
    };

    let mut args = vec![col.to_string(), val.to_string()];
    args.extend(key_value_tokens(params, &["match_col", "match_val"]));
    Ok(args)
}

/// `delete col val`
pub fn delete_args(params: &[(String, String)]) -> Result<Vec<String>, ArgsError> {
    match (required(params, "col"), required(params, "val")) {
        (Some(col), Some(val)) => Ok(vec![col.to_string(), val.to_string()]),
        _ => Err(ArgsError::MissingDelete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_insert_preserves_arrival_order() {
        let p = params(&[("name", "bob"), ("id", "7"), ("city", "Oslo")]);
        assert_eq!(insert_args(&p), vec!["name=bob", "id=7", "city=Oslo"]);
    }

    #[test]
    fn test_insert_repeated_key_keeps_first_value() {
        let p = params(&[("id", "1"), ("name", "a"), ("id", "2")]);
        assert_eq!(insert_args(&p), vec!["id=1", "name=a"]);
    }

    #[test]
    fn test_insert_many_distinct_keys() {
        let p: Vec<(String, String)> = (0..60_000)
            .map(|i| (format!("c{i}"), i.to_string()))
            .chain(std::iter::once(("c0".to_string(), "late".to_string())))
            .collect();

        let started = std::time::Instant::now();
        let args = insert_args(&p);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        assert_eq!(args.len(), 60_000);
        assert_eq!(args[0], "c0=0");
        assert_eq!(args[59_999], "c59999=59999");
    }

    #[test]
    fn test_update_skips_repeated_match_keys() {
        let p = params(&[
            ("match_col", "id"),
            ("match_val", "3"),
            ("name", "x"),
            ("match_col", "other"),
        ]);
        assert_eq!(update_args(&p).expect("args"), vec!["id", "3", "name=x"]);
    }

    #[test]
    fn test_insert_without_params() {
        assert!(insert_args(&[]).is_empty());
    }

    #[test]
    fn test_insert_forwards_values_literally() {
        let p = params(&[("note", "a b;rm -rf /"), ("empty", "")]);
        assert_eq!(insert_args(&p), vec!["note=a b;rm -rf /", "empty="]);
    }

    #[test]
    fn test_update_puts_match_first() {
        let p = params(&[
            ("name", "carol"),
            ("match_col", "id"),
            ("age", "40"),
            ("match_val", "3"),
        ]);
        assert_eq!(
            update_args(&p).expect("args"),
            vec!["id", "3", "name=carol", "age=40"]
        );
    }

    #[test]
    fn test_update_missing_or_empty_match() {
        let missing = params(&[("match_col", "id"), ("name", "x")]);
        assert_eq!(update_args(&missing), Err(ArgsError::MissingMatch));

        let empty = params(&[("match_col", "id"), ("match_val", "")]);
        assert_eq!(update_args(&empty), Err(ArgsError::MissingMatch));
        assert_eq!(
            ArgsError::MissingMatch.to_string(),
            "Missing match_col or match_val"
        );
    }

    #[test]
    fn test_delete_args() {
        let p = params(&[("val", "9"), ("col", "id"), ("extra", "ignored")]);
        assert_eq!(delete_args(&p).expect("args"), vec!["id", "9"]);
    }

    #[test]
    fn test_delete_missing() {
        assert_eq!(
            delete_args(&params(&[("col", "id")])),
            Err(ArgsError::MissingDelete)
        );
        assert_eq!(
            ArgsError::MissingDelete.to_string(),
            "Missing delete parameters"
        );
    }
}
