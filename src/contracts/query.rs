//! Query options parsed from flat key/value maps such as URL query strings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Paging, sorting and filtering options for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

const RECOGNIZED_KEYS: [&str; 7] = [
    "limit",
    "offset",
    "sortBy",
    "sortOrder",
    "search",
    "include",
    "exclude",
];

/// Parse query options from string pairs.
///
/// Unrecognized keys are ignored and values that fail to parse are left out.
/// Returns `None` when none of the recognized keys is present at all.
pub fn parse_query_options<I, K, V>(pairs: I) -> Option<QueryOptions>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut options = QueryOptions::default();
    let mut recognized = false;

    for (key, value) in pairs {
        let key = key.as_ref();
        let value = value.as_ref().trim();
        if !RECOGNIZED_KEYS.contains(&key) {
            continue;
        }
        recognized = true;

        match key {
            "limit" => options.limit = value.parse().ok(),
            "offset" => options.offset = value.parse().ok(),
            "sortBy" => options.sort_by = non_empty(value),
            "sortOrder" => options.sort_order = value.parse().ok(),
            "search" => options.search = non_empty(value),
            "include" => options.include = split_list(value),
            "exclude" => options.exclude = split_list(value),
            _ => {}
        }
    }

    recognized.then_some(options)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn split_list(value: &str) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

impl QueryOptions {
    /// Whether `name` passes the include/exclude filters.
    pub fn allows(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|i| i == name) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|e| e == name) {
                return false;
            }
        }
        true
    }

    /// Sort, skip and truncate an in-memory list.
    ///
    /// `compare` receives the requested `sort_by` key and is only called when
    /// one was given. Sorting is stable; `desc` reverses the comparison.
    pub fn apply<T, F>(&self, mut items: Vec<T>, compare: F) -> Vec<T>
    where
        F: Fn(&str, &T, &T) -> Ordering,
    {
        if let Some(key) = &self.sort_by {
            let descending = self.sort_order == Some(SortOrder::Desc);
            items.sort_by(|a, b| {
                let ord = compare(key, a, b);
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        let offset = self.offset.unwrap_or(0);
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_limit_and_sort_order() {
        let options = parse_query_options(map(&[("limit", "10"), ("sortOrder", "asc")])).unwrap();
        assert_eq!(
            options,
            QueryOptions {
                limit: Some(10),
                sort_order: Some(SortOrder::Asc),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_map_is_none() {
        assert_eq!(parse_query_options(map(&[])), None);
    }

    #[test]
    fn test_only_unknown_keys_is_none() {
        assert_eq!(parse_query_options(map(&[("page", "2"), ("q", "x")])), None);
    }

    #[test]
    fn test_invalid_sort_order_omitted() {
        let options = parse_query_options(map(&[("sortOrder", "bogus")])).unwrap();
        assert_eq!(options.sort_order, None);
        assert_eq!(options, QueryOptions::default());
    }

    #[test]
    fn test_sort_order_case_insensitive() {
        let options = parse_query_options([("sortOrder", "DESC")]).unwrap();
        assert_eq!(options.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_invalid_numbers_omitted() {
        let options = parse_query_options([("limit", "ten"), ("offset", "-1")]).unwrap();
        assert_eq!(options.limit, None);
        assert_eq!(options.offset, None);
    }

    #[test]
    fn test_lists_are_split_and_trimmed() {
        let options =
            parse_query_options([("include", "spots, clues,,"), ("exclude", " ")]).unwrap();
        assert_eq!(
            options.include,
            Some(vec!["spots".to_string(), "clues".to_string()])
        );
        assert_eq!(options.exclude, None);
        assert!(options.allows("spots"));
        assert!(!options.allows("owner"));
    }

    #[test]
    fn test_apply_sorts_and_pages() {
        let options = parse_query_options([
            ("sortBy", "value"),
            ("sortOrder", "desc"),
            ("offset", "1"),
            ("limit", "2"),
        ])
        .unwrap();
        let result = options.apply(vec![3, 1, 4, 1, 5], |_, a, b| a.cmp(b));
        assert_eq!(result, vec![4, 3]);
    }

    #[test]
    fn test_apply_without_sort_keeps_order() {
        let options = parse_query_options([("limit", "2")]).unwrap();
        let result = options.apply(vec!["b", "a", "c"], |_, a, b| a.cmp(b));
        assert_eq!(result, vec!["b", "a"]);
    }
}
