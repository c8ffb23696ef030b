//! Result shaping options for list queries

use crate::domain::bootcamp::BootcampField;
use crate::domain::error::{DomainError, DomainResult};

use super::filter::Filter;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 25;
/// Largest page, limit or offset handed to storage; SQL binds these as i64
pub const MAX_WINDOW: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: BootcampField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: BootcampField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: BootcampField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parse `name,-averageCost`. A leading `-` sorts descending.
    pub fn parse_list(raw: &str) -> DomainResult<Vec<SortKey>> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|token| {
                let (direction, path) = match token.strip_prefix('-') {
                    Some(rest) => (SortDirection::Descending, rest),
                    None => (SortDirection::Ascending, token.strip_prefix('+').unwrap_or(token)),
                };
                let field = BootcampField::from_path(path)
                    .filter(BootcampField::is_sortable)
                    .ok_or_else(|| DomainError::cast("sort field", path))?;
                Ok(SortKey { field, direction })
            })
            .collect()
    }
}

/// Named list options. Everything else in the query string is a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Top-level fields to keep (plus `id`); `None` returns whole records
    pub select: Option<Vec<String>>,
    /// Empty means newest first
    pub sort: Vec<SortKey>,
    pub page: u64,
    pub limit: u64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            select: None,
            sort: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryOptions {
    /// Build from raw parameter values. Missing, non-numeric or zero
    /// `page`/`limit` fall back to the defaults; huge ones are clamped to
    /// [`MAX_WINDOW`].
    pub fn from_raw(
        select: Option<&str>,
        sort: Option<&str>,
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
    ) -> DomainResult<Self> {
        let select = select.map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });
        let sort = match sort {
            Some(raw) => SortKey::parse_list(raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            select: select.filter(|fields| !fields.is_empty()),
            sort,
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(default_limit.max(1)),
        })
    }

    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .map_or(MAX_WINDOW, |n| n.min(MAX_WINDOW))
    }

    /// `limit`, bounded for storage
    pub fn take(&self) -> u64 {
        self.limit.min(MAX_WINDOW)
    }

    /// Sort keys to execute: the requested ones or `-createdAt`
    pub fn effective_sort(&self) -> Vec<SortKey> {
        if self.sort.is_empty() {
            vec![SortKey::desc(BootcampField::CreatedAt)]
        } else {
            self.sort.clone()
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        // all digits but too large for u64 still means "huge"
        let n = raw.parse::<u64>().unwrap_or(u64::MAX);
        (n >= 1).then(|| n.min(MAX_WINDOW))
    } else {
        None
    }
}

/// Everything a repository needs to run a list query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    pub options: QueryOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent_or_garbage() {
        let opts = QueryOptions::from_raw(None, None, Some("abc"), Some("0"), DEFAULT_LIMIT).unwrap();
        assert_eq!(opts.page, 1);
        assert_eq!(opts.limit, 25);
        assert_eq!(opts.skip(), 0);
        assert_eq!(opts.effective_sort(), vec![SortKey::desc(BootcampField::CreatedAt)]);
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        let opts = QueryOptions::from_raw(None, None, Some("3"), Some("10"), DEFAULT_LIMIT).unwrap();
        assert_eq!(opts.skip(), 20);
    }

    #[test]
    fn parses_select_and_multi_key_sort() {
        let opts = QueryOptions::from_raw(
            Some("name, description,"),
            Some("-averageCost,name"),
            None,
            None,
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(opts.select, Some(vec!["name".to_string(), "description".to_string()]));
        assert_eq!(
            opts.sort,
            vec![
                SortKey::desc(BootcampField::AverageCost),
                SortKey::asc(BootcampField::Name)
            ]
        );
    }

    #[test]
    fn unknown_or_unsortable_sort_field_fails() {
        assert!(SortKey::parse_list("-tuition").is_err());
        assert!(SortKey::parse_list("careers").is_err());
    }

    #[test]
    fn huge_page_and_limit_are_clamped() {
        let opts = QueryOptions::from_raw(
            None,
            None,
            Some("18446744073709551615"),
            Some("99999999999999999999999"),
            DEFAULT_LIMIT,
        )
        .unwrap();
        assert_eq!(opts.page, MAX_WINDOW);
        assert_eq!(opts.limit, MAX_WINDOW);
        assert_eq!(opts.skip(), MAX_WINDOW);

        let opts = QueryOptions {
            page: u64::MAX,
            limit: u64::MAX,
            ..Default::default()
        };
        assert_eq!(opts.skip(), MAX_WINDOW);
        assert_eq!(opts.take(), MAX_WINDOW);
    }

    #[test]
    fn configured_default_limit_applies() {
        let opts = QueryOptions::from_raw(None, None, None, None, 50).unwrap();
        assert_eq!(opts.limit, 50);
    }
}
