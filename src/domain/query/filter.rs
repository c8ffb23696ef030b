//! Filter translation
//!
//! Query strings such as `averageCost[lte]=10000&location[city]=Boston` are
//! parsed into a nested [`FilterMap`]. [`translate`] walks that map and
//! rewrites keys that are exactly one of the operator tokens (`gt`, `gte`,
//! `lt`, `lte`, `in`) into comparison predicates on the enclosing path. Any
//! other nested key extends the dotted path. Values are never inspected, so a
//! literal like `"gt"` stays a literal.
//!
//! [`Filter::bind`] then resolves paths to [`BootcampField`]s and casts the
//! raw strings, producing the typed filter both repositories execute.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::bootcamp::{Bootcamp, BootcampField, FieldKind, FieldValue};
use crate::domain::error::{DomainError, DomainResult};

/// One node of a parsed query string
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Value(String),
    /// The same key repeated
    List(Vec<String>),
    /// Bracketed sub-keys, e.g. `price[gt]`
    Map(FilterMap),
}

pub type FilterMap = BTreeMap<String, FilterNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOp {
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Gt => ordering == Greater,
            Self::Gte => ordering != Less,
            Self::Lt => ordering == Less,
            Self::Lte => ordering != Greater,
        }
    }
}

/// Reserved sub-keys recognized as operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compare(ComparisonOp),
    In,
}

impl Operator {
    /// Exact token match only; `gtx` or `GT` are ordinary keys
    pub fn from_token(key: &str) -> Option<Self> {
        match key {
            "gt" => Some(Self::Compare(ComparisonOp::Gt)),
            "gte" => Some(Self::Compare(ComparisonOp::Gte)),
            "lt" => Some(Self::Compare(ComparisonOp::Lt)),
            "lte" => Some(Self::Compare(ComparisonOp::Lte)),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Compare(ComparisonOp::Gt) => "gt",
            Self::Compare(ComparisonOp::Gte) => "gte",
            Self::Compare(ComparisonOp::Lt) => "lt",
            Self::Compare(ComparisonOp::Lte) => "lte",
            Self::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A predicate on a dotted path, values still as received
#[derive(Debug, Clone, PartialEq)]
pub enum RawPredicate {
    Eq(Vec<String>),
    Op(Operator, Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawClause {
    pub path: String,
    pub predicate: RawPredicate,
}

/// Structural rewrite of a filter map into path predicates
pub fn translate(map: &FilterMap) -> DomainResult<Vec<RawClause>> {
    let mut clauses = Vec::new();
    for (key, node) in map {
        walk(key, node, &mut clauses)?;
    }
    Ok(clauses)
}

/// Nesting below this is never a known field path
const MAX_PATH_DEPTH: usize = 8;

fn walk(path: &str, node: &FilterNode, out: &mut Vec<RawClause>) -> DomainResult<()> {
    if path.split('.').count() > MAX_PATH_DEPTH {
        return Err(DomainError::Validation(format!(
            "Filter parameter '{}' is nested too deeply",
            path.split('.').next().unwrap_or(path)
        )));
    }
    match node {
        FilterNode::Value(v) => out.push(RawClause {
            path: path.to_string(),
            predicate: RawPredicate::Eq(vec![v.clone()]),
        }),
        FilterNode::List(values) => out.push(RawClause {
            path: path.to_string(),
            predicate: RawPredicate::Eq(values.clone()),
        }),
        FilterNode::Map(children) => {
            for (key, child) in children {
                match Operator::from_token(key) {
                    Some(op) => {
                        let values = match child {
                            FilterNode::Value(v) => vec![v.clone()],
                            FilterNode::List(vs) => vs.clone(),
                            FilterNode::Map(_) => {
                                return Err(DomainError::Validation(format!(
                                    "Operator '{}' on '{}' expects a plain value",
                                    op, path
                                )))
                            }
                        };
                        out.push(RawClause {
                            path: path.to_string(),
                            predicate: RawPredicate::Op(op, values),
                        });
                    }
                    None => walk(&format!("{}.{}", path, key), child, out)?,
                }
            }
        }
    }
    Ok(())
}

/// Typed predicate on one field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(FieldValue),
    Compare(ComparisonOp, FieldValue),
    In(Vec<FieldValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: BootcampField,
    pub predicate: Predicate,
}

/// Conjunction of field predicates. Empty matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<FieldFilter>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Translate and bind in one step
    pub fn from_map(map: &FilterMap) -> DomainResult<Self> {
        Self::bind(translate(map)?)
    }

    pub fn bind(raw: Vec<RawClause>) -> DomainResult<Self> {
        let mut clauses = Vec::with_capacity(raw.len());
        for clause in raw {
            let field = BootcampField::from_path(&clause.path)
                .ok_or_else(|| DomainError::cast("filter field", clause.path.as_str()))?;
            let predicate = match clause.predicate {
                RawPredicate::Eq(values) if values.len() == 1 => {
                    Predicate::Eq(field.cast(&values[0])?)
                }
                RawPredicate::Eq(values) => Predicate::In(cast_all(field, &values)?),
                RawPredicate::Op(Operator::In, values) => {
                    let split: Vec<String> = values
                        .iter()
                        .flat_map(|v| v.split(','))
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(String::from)
                        .collect();
                    Predicate::In(cast_all(field, &split)?)
                }
                RawPredicate::Op(Operator::Compare(op), values) => {
                    if field.kind() == FieldKind::Careers {
                        return Err(DomainError::Validation(format!(
                            "Operator '{}' is not supported on '{}'",
                            Operator::Compare(op),
                            field.path()
                        )));
                    }
                    let raw = values
                        .last()
                        .ok_or_else(|| DomainError::cast(field.path(), ""))?;
                    Predicate::Compare(op, field.cast(raw)?)
                }
            };
            clauses.push(FieldFilter { field, predicate });
        }
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[FieldFilter] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a record; multi-valued fields match if any value does
    pub fn matches(&self, bootcamp: &Bootcamp) -> bool {
        self.clauses.iter().all(|clause| {
            let values = bootcamp.values(clause.field);
            match &clause.predicate {
                Predicate::Eq(expected) => values.iter().any(|v| v == expected),
                Predicate::Compare(op, bound) => values
                    .iter()
                    .any(|v| v.compare(bound).map(|o| op.holds(o)).unwrap_or(false)),
                Predicate::In(set) => values.iter().any(|v| set.contains(v)),
            }
        })
    }
}

fn cast_all(field: BootcampField, values: &[String]) -> DomainResult<Vec<FieldValue>> {
    values.iter().map(|v| field.cast(v)).collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bootcamp::{Career, Location, NewBootcamp};

    fn value(v: &str) -> FilterNode {
        FilterNode::Value(v.to_string())
    }

    fn nested(pairs: &[(&str, FilterNode)]) -> FilterNode {
        FilterNode::Map(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    fn map(pairs: &[(&str, FilterNode)]) -> FilterMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn bootcamp(name: &str, cost: Option<f64>, careers: Vec<Career>, city: &str) -> Bootcamp {
        let mut location = Location::default();
        location.city = Some(city.to_string());
        let mut b = Bootcamp::create(
            NewBootcamp {
                name: name.into(),
                description: "d".into(),
                careers,
                ..Default::default()
            },
            location,
        );
        b.average_cost = cost;
        b
    }

    #[test]
    fn operator_suffixes_become_comparisons() {
        let raw = translate(&map(&[(
            "averageCost",
            nested(&[("gte", value("100")), ("lt", value("500"))]),
        )]))
        .unwrap();

        assert_eq!(
            raw,
            vec![
                RawClause {
                    path: "averageCost".into(),
                    predicate: RawPredicate::Op(Operator::Compare(ComparisonOp::Gte), vec!["100".into()]),
                },
                RawClause {
                    path: "averageCost".into(),
                    predicate: RawPredicate::Op(Operator::Compare(ComparisonOp::Lt), vec!["500".into()]),
                },
            ]
        );
    }

    #[test]
    fn values_containing_operator_tokens_are_untouched() {
        let raw = translate(&map(&[
            ("name", value("gt lte in")),
            ("description", value("in")),
        ]))
        .unwrap();

        assert!(raw.iter().all(|c| matches!(c.predicate, RawPredicate::Eq(_))));
        assert_eq!(raw[1].predicate, RawPredicate::Eq(vec!["gt lte in".into()]));
        assert_eq!(raw[0].predicate, RawPredicate::Eq(vec!["in".into()]));
    }

    #[test]
    fn near_miss_keys_extend_the_path() {
        let raw = translate(&map(&[(
            "location",
            nested(&[("city", value("Boston")), ("gtx", value("1"))]),
        )]))
        .unwrap();

        let paths: Vec<&str> = raw.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["location.city", "location.gtx"]);
    }

    #[test]
    fn operator_over_a_map_is_rejected() {
        let bad = map(&[("averageCost", nested(&[("gt", nested(&[("x", value("1"))]))]))]);
        assert!(matches!(translate(&bad), Err(DomainError::Validation(_))));
    }

    #[test]
    fn empty_map_matches_everything() {
        let filter = Filter::from_map(&FilterMap::new()).unwrap();
        assert!(filter.is_empty());
        assert!(filter.matches(&bootcamp("A", None, vec![], "Boston")));
    }

    #[test]
    fn binds_and_evaluates_range() {
        let filter = Filter::from_map(&map(&[(
            "averageCost",
            nested(&[("lte", value("10000"))]),
        )]))
        .unwrap();

        assert_eq!(
            filter.clauses()[0].predicate,
            Predicate::Compare(ComparisonOp::Lte, FieldValue::Number(10_000.0))
        );
        assert!(filter.matches(&bootcamp("A", Some(9_000.0), vec![], "X")));
        assert!(filter.matches(&bootcamp("B", Some(10_000.0), vec![], "X")));
        assert!(!filter.matches(&bootcamp("C", Some(12_000.0), vec![], "X")));
        assert!(!filter.matches(&bootcamp("D", None, vec![], "X")));
    }

    #[test]
    fn in_accepts_commas_and_repeats_on_multi_valued_fields() {
        let filter = Filter::from_map(&map(&[(
            "careers",
            nested(&[(
                "in",
                FilterNode::List(vec!["Business,UI/UX".into(), "Other".into()]),
            )]),
        )]))
        .unwrap();

        match &filter.clauses()[0].predicate {
            Predicate::In(set) => assert_eq!(set.len(), 3),
            other => panic!("unexpected predicate {:?}", other),
        }
        assert!(filter.matches(&bootcamp("A", None, vec![Career::WebDevelopment, Career::UiUx], "X")));
        assert!(!filter.matches(&bootcamp("B", None, vec![Career::DataScience], "X")));
    }

    #[test]
    fn nested_location_path_filters_city() {
        let filter = Filter::from_map(&map(&[("location", nested(&[("city", value("Boston"))]))])).unwrap();
        assert!(filter.matches(&bootcamp("A", None, vec![], "Boston")));
        assert!(!filter.matches(&bootcamp("B", None, vec![], "Providence")));
    }

    #[test]
    fn repeated_plain_key_is_membership() {
        let filter = Filter::from_map(&map(&[(
            "name",
            FilterNode::List(vec!["A".into(), "B".into()]),
        )]))
        .unwrap();
        assert!(filter.matches(&bootcamp("B", None, vec![], "X")));
        assert!(!filter.matches(&bootcamp("C", None, vec![], "X")));
    }

    #[test]
    fn unknown_fields_and_bad_values_are_cast_errors() {
        assert!(matches!(
            Filter::from_map(&map(&[("tuition", value("1"))])),
            Err(DomainError::Cast { .. })
        ));
        assert!(matches!(
            Filter::from_map(&map(&[("averageCost", nested(&[("gt", value("lots"))]))])),
            Err(DomainError::Cast { .. })
        ));
    }

    #[test]
    fn range_on_careers_is_rejected() {
        let result = Filter::from_map(&map(&[("careers", nested(&[("gt", value("Business"))]))]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn deeply_nested_maps_are_rejected() {
        let mut node = value("1");
        for _ in 0..20 {
            node = nested(&[("x", node)]);
        }
        let result = translate(&map(&[("name", node)]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
