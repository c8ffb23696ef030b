//! List query model: filter translation, shaping options, pagination

pub mod filter;
pub mod options;
pub mod pagination;
pub mod projection;

pub use filter::{
    translate, ComparisonOp, FieldFilter, Filter, FilterMap, FilterNode, Operator, Predicate,
    RawClause, RawPredicate,
};
pub use options::{
    ListQuery, QueryOptions, SortDirection, SortKey, DEFAULT_LIMIT, DEFAULT_PAGE,
    MAX_WINDOW,
};
pub use pagination::{CountScope, PageLink, Pagination};
pub use projection::Projection;
