use super::types::{SqlFragment, SqlValue};

/// Comparison applied by one filter criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Gte(SqlValue),
    Lte(SqlValue),
    /// Case-insensitive substring match, bound as `%value%`.
    Contains(String),
    /// `> 0` with nothing bound.
    Positive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub op: FilterOp,
}

impl Condition {
    pub fn gte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self { column, op: FilterOp::Gte(value.into()) }
    }

    pub fn lte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self { column, op: FilterOp::Lte(value.into()) }
    }

    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self { column, op: FilterOp::Contains(needle.into()) }
    }

    pub fn positive(column: &'static str) -> Self {
        Self { column, op: FilterOp::Positive }
    }
}

/// A request-scoped set of optional filters for one entity.
pub trait WhereCriteria {
    /// Every recognized criterion in its fixed order, `None` when inactive.
    ///
    /// The order decides parameter numbering, so it must not depend on input.
    fn conditions(&self) -> Vec<Option<Condition>>;

    fn is_empty(&self) -> bool {
        self.conditions().iter().all(Option::is_none)
    }
}

/// Build a `WHERE ...` clause joining every active criterion with `AND`.
///
/// Inactive criteria take no parameter slot. With nothing active the result
/// is an empty fragment.
pub fn build_where<C: WhereCriteria + ?Sized>(criteria: &C) -> SqlFragment {
    let (clauses, params) = criteria.conditions().into_iter().flatten().fold(
        (Vec::<String>::new(), Vec::<SqlValue>::new()),
        |(mut clauses, mut params), Condition { column, op }| {
            let clause = match op {
                FilterOp::Gte(value) => {
                    params.push(value);
                    format!("{} >= ${}", column, params.len())
                }
                FilterOp::Lte(value) => {
                    params.push(value);
                    format!("{} <= ${}", column, params.len())
                }
                FilterOp::Contains(needle) => {
                    params.push(SqlValue::from(format!("%{}%", needle)));
                    format!("{} ILIKE ${}", column, params.len())
                }
                FilterOp::Positive => format!("{} > 0", column),
            };
            clauses.push(clause);
            (clauses, params)
        },
    );

    if clauses.is_empty() {
        return SqlFragment::empty();
    }

    SqlFragment {
        query: format!("WHERE {}", clauses.join(" AND ")),
        params,
    }
}
