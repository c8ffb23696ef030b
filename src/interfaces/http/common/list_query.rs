//! Query-string parsing for list endpoints
//!
//! `select`, `sort`, `page` and `limit` become [`QueryOptions`]; every other
//! parameter becomes a [`FilterMap`] entry. Bracket keys nest:
//! `averageCost[lte]=10000` is `{averageCost: {lte: "10000"}}` and
//! `location[city]=Boston` is `{location: {city: "Boston"}}`. A repeated key
//! collects its values into a list.

use url::form_urlencoded;

use crate::domain::query::{FilterMap, FilterNode, QueryOptions};
use crate::domain::{DomainError, DomainResult};

const RESERVED: [&str; 4] = ["select", "sort", "page", "limit"];

/// Bracket segments split off a key; the rest stays one literal segment
pub const MAX_KEY_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub filter: FilterMap,
    pub options: QueryOptions,
}

/// Split a raw query string into filter and shaping options
pub fn parse_list_query(raw: Option<&str>, default_limit: u64) -> DomainResult<ListParams> {
    let mut filter = FilterMap::new();
    let mut reserved: [Option<String>; 4] = Default::default();

    for (key, value) in form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
        if key.is_empty() {
            continue;
        }
        if let Some(idx) = RESERVED.iter().position(|r| *r == key) {
            reserved[idx] = Some(value.into_owned());
            continue;
        }
        let segments = split_key(&key);
        insert(&mut filter, &segments, value.into_owned(), &key)?;
    }

    let [select, sort, page, limit] = reserved;
    let options = QueryOptions::from_raw(
        select.as_deref(),
        sort.as_deref(),
        page.as_deref(),
        limit.as_deref(),
        default_limit,
    )?;

    Ok(ListParams { filter, options })
}

/// `a[b][c]` → `["a", "b", "c"]`; empty `[]` segments are dropped, and a
/// key with unbalanced brackets is kept whole. Past [`MAX_KEY_DEPTH`]
/// segments the remainder, brackets included, becomes one final segment.
fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };
    let (head, mut rest) = key.split_at(open);
    let mut segments = vec![head.to_string()];

    while !rest.is_empty() {
        if segments.len() > MAX_KEY_DEPTH {
            segments.push(rest.to_string());
            break;
        }
        let Some(inner) = rest.strip_prefix('[') else {
            return vec![key.to_string()];
        };
        let Some(close) = inner.find(']') else {
            return vec![key.to_string()];
        };
        let segment = &inner[..close];
        if !segment.is_empty() {
            segments.push(segment.to_string());
        }
        rest = &inner[close + 1..];
    }
    segments
}

fn insert(map: &mut FilterMap, segments: &[String], value: String, key: &str) -> DomainResult<()> {
    let conflict = || DomainError::Validation(format!("Conflicting filter parameter '{}'", key));

    let Some((first, rest)) = segments.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        match map.remove(first) {
            None => {
                map.insert(first.clone(), FilterNode::Value(value));
            }
            Some(FilterNode::Value(existing)) => {
                map.insert(first.clone(), FilterNode::List(vec![existing, value]));
            }
            Some(FilterNode::List(mut values)) => {
                values.push(value);
                map.insert(first.clone(), FilterNode::List(values));
            }
            Some(FilterNode::Map(_)) => return Err(conflict()),
        }
        return Ok(());
    }

    let node = map
        .entry(first.clone())
        .or_insert_with(|| FilterNode::Map(FilterMap::new()));
    match node {
        FilterNode::Map(inner) => insert(inner, rest, value, key),
        _ => Err(conflict()),
    }
}
