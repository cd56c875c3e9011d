//! Renderable expressions.
//!
//! Expressions appear in select lists, on the left-hand side of criteria,
//! as the right-hand side of column comparisons, in GROUP BY and ORDER BY,
//! and as the THEN/ELSE arms of case expressions.

use crate::case::CaseExpr;
use crate::clause::OrderBy;
use crate::select::SelectModel;
use crate::table::SqlColumn;
use sqlweave_core::{SqlType, Value};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference, qualified at render time
    Column(SqlColumn),
    /// Raw SQL text emitted verbatim
    Constant(String),
    /// String literal, quoted at render time
    StringConstant(String),
    /// Bound parameter
    Value {
        value: Value,
        sql_type: Option<SqlType>,
    },
    /// Function call
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },
    /// `count(*)`
    CountAll,
    /// CASE expression
    Case(Box<CaseExpr>),
    /// Scalar subquery
    Subquery(Box<SelectModel>),
    /// Expression with a select-list alias
    Aliased { expr: Box<Expr>, alias: String },
}

impl Expr {
    /// Column reference.
    pub fn col(column: &SqlColumn) -> Self {
        Expr::Column(column.clone())
    }

    /// Bound parameter value.
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Value {
            value: value.into(),
            sql_type: None,
        }
    }

    /// Bound parameter value with an explicit type hint.
    pub fn typed(value: impl Into<Value>, sql_type: SqlType) -> Self {
        Expr::Value {
            value: value.into(),
            sql_type: Some(sql_type),
        }
    }

    /// Raw SQL text.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Constant(sql.into())
    }

    /// Quoted string literal.
    pub fn string(text: impl Into<String>) -> Self {
        Expr::StringConstant(text.into())
    }

    /// Scalar subquery.
    pub fn subquery(select: SelectModel) -> Self {
        Expr::Subquery(Box::new(select))
    }

    /// Function call with arbitrary arguments.
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
            distinct: false,
        }
    }

    /// `count(*)`
    pub fn count_star() -> Self {
        Expr::CountAll
    }

    /// `count(expr)`
    pub fn count(self) -> Self {
        Expr::function("count", vec![self])
    }

    /// `count(distinct expr)`
    pub fn count_distinct(self) -> Self {
        Expr::Function {
            name: "count".to_string(),
            args: vec![self],
            distinct: true,
        }
    }

    pub fn sum(self) -> Self {
        Expr::function("sum", vec![self])
    }

    pub fn avg(self) -> Self {
        Expr::function("avg", vec![self])
    }

    pub fn min(self) -> Self {
        Expr::function("min", vec![self])
    }

    pub fn max(self) -> Self {
        Expr::function("max", vec![self])
    }

    pub fn upper(self) -> Self {
        Expr::function("upper", vec![self])
    }

    pub fn lower(self) -> Self {
        Expr::function("lower", vec![self])
    }

    /// Give the expression a select-list alias.
    pub fn aliased(self, alias: impl Into<String>) -> Self {
        match self {
            Expr::Column(column) => Expr::Column(column.aliased(alias)),
            Expr::Aliased { expr, .. } => Expr::Aliased {
                expr,
                alias: alias.into(),
            },
            other => Expr::Aliased {
                expr: Box::new(other),
                alias: alias.into(),
            },
        }
    }

    /// The select-list alias, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Expr::Column(column) => column.alias(),
            Expr::Aliased { alias, .. } => Some(alias.as_str()),
            _ => None,
        }
    }

    /// Type hint carried by this expression.
    ///
    /// Values compared against a typed column are bound with that type.
    pub fn sql_type(&self) -> Option<&SqlType> {
        match self {
            Expr::Column(column) => column.sql_type(),
            Expr::Value { sql_type, .. } => sql_type.as_ref(),
            Expr::Aliased { expr, .. } => expr.sql_type(),
            _ => None,
        }
    }

    pub fn asc(self) -> OrderBy {
        OrderBy::asc(self)
    }

    pub fn desc(self) -> OrderBy {
        OrderBy::desc(self)
    }
}

impl From<SqlColumn> for Expr {
    fn from(column: SqlColumn) -> Self {
        Expr::Column(column)
    }
}

impl From<&SqlColumn> for Expr {
    fn from(column: &SqlColumn) -> Self {
        Expr::Column(column.clone())
    }
}

impl From<CaseExpr> for Expr {
    fn from(case: CaseExpr) -> Self {
        Expr::Case(Box::new(case))
    }
}

impl From<SelectModel> for Expr {
    fn from(select: SelectModel) -> Self {
        Expr::Subquery(Box::new(select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SqlTable;

    #[test]
    fn test_aliasing_a_column_stays_a_column() {
        let id = SqlTable::new("person").column("id");
        let expr = Expr::from(&id).aliased("person_id");
        assert!(matches!(expr, Expr::Column(_)));
        assert_eq!(expr.alias(), Some("person_id"));
    }

    #[test]
    fn test_aliasing_a_function() {
        let id = SqlTable::new("person").column("id");
        let expr = Expr::from(&id).count().aliased("total");
        assert_eq!(expr.alias(), Some("total"));
        let expr = expr.aliased("renamed");
        assert_eq!(expr.alias(), Some("renamed"));
        assert!(matches!(expr, Expr::Aliased { ref expr, .. } if matches!(**expr, Expr::Function { .. })));
    }

    #[test]
    fn test_type_hint_from_column() {
        let age = SqlTable::new("person")
            .column("age")
            .with_type(SqlType::Integer);
        assert_eq!(Expr::from(&age).sql_type(), Some(&SqlType::Integer));
        assert_eq!(Expr::lit(5).sql_type(), None);
        assert_eq!(Expr::typed(5, SqlType::BigInt).sql_type(), Some(&SqlType::BigInt));
    }
}
