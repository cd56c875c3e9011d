//! ORDER BY specifications.

use crate::expr::Expr;
use crate::table::SqlColumn;

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: OrderDirection,
    pub nulls: Option<NullsOrder>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// NULLS FIRST/LAST ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl OrderBy {
    /// Create an ascending order by entry.
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            direction: OrderDirection::Asc,
            nulls: None,
        }
    }

    /// Create a descending order by entry.
    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            direction: OrderDirection::Desc,
            nulls: None,
        }
    }

    /// Set NULLS FIRST.
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    /// Set NULLS LAST.
    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    /// The text appended after the sort expression, e.g. ` desc nulls last`.
    pub(crate) fn suffix(&self) -> &'static str {
        match (self.direction, self.nulls) {
            (OrderDirection::Asc, None) => "",
            (OrderDirection::Desc, None) => " desc",
            (OrderDirection::Asc, Some(NullsOrder::First)) => " nulls first",
            (OrderDirection::Asc, Some(NullsOrder::Last)) => " nulls last",
            (OrderDirection::Desc, Some(NullsOrder::First)) => " desc nulls first",
            (OrderDirection::Desc, Some(NullsOrder::Last)) => " desc nulls last",
        }
    }
}

impl From<SqlColumn> for OrderBy {
    fn from(column: SqlColumn) -> Self {
        OrderBy::asc(column)
    }
}

impl From<&SqlColumn> for OrderBy {
    fn from(column: &SqlColumn) -> Self {
        OrderBy::asc(column.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SqlTable;

    #[test]
    fn test_suffix() {
        let id = SqlTable::new("person").column("id");
        assert_eq!(OrderBy::asc(id.clone()).suffix(), "");
        assert_eq!(id.desc().suffix(), " desc");
        assert_eq!(id.desc().nulls_last().suffix(), " desc nulls last");
        assert_eq!(id.asc().nulls_first().suffix(), " nulls first");
    }

    #[test]
    fn test_from_column_is_ascending() {
        let id = SqlTable::new("person").column("id");
        let order: OrderBy = (&id).into();
        assert_eq!(order.direction, OrderDirection::Asc);
    }
}
