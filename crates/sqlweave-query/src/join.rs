//! JOIN specifications.
//!
//! ```ignore
//! select([&order_id, &line_no])
//!     .from(orders.aliased("om"))
//!     .join(lines.aliased("ol"), on(&order_id, equal_to(&line_order_id)))
//! ```

use crate::condition::Condition;
use crate::criterion::{Connector, CriteriaChain, Criterion};
use crate::expr::Expr;
use crate::table::TableExpr;

/// Types of SQL joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    /// Get the SQL keyword for this join type.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "join",
            JoinType::Left => "left join",
            JoinType::Right => "right join",
            JoinType::Full => "full join",
        }
    }
}

/// The on-clause of a join: one initial criterion plus AND-ed extras.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    chain: CriteriaChain,
}

impl JoinCondition {
    pub fn and(mut self, column: impl Into<Expr>, condition: Condition) -> Self {
        self.chain
            .push(Connector::And, Criterion::column(column, condition));
        self
    }

    pub fn and_criterion(mut self, criterion: impl Into<Criterion>) -> Self {
        self.chain.push(Connector::And, criterion.into());
        self
    }

    pub fn chain(&self) -> &CriteriaChain {
        &self.chain
    }
}

/// Start an on-clause.
pub fn on(column: impl Into<Expr>, condition: Condition) -> JoinCondition {
    on_criterion(Criterion::column(column, condition))
}

/// Start an on-clause from an arbitrary criterion.
pub fn on_criterion(criterion: impl Into<Criterion>) -> JoinCondition {
    JoinCondition {
        chain: CriteriaChain::new(criterion.into()),
    }
}

/// One join in a query expression.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub table: TableExpr,
    pub on: CriteriaChain,
}

impl JoinSpec {
    pub fn new(join_type: JoinType, table: impl Into<TableExpr>, on: JoinCondition) -> Self {
        Self {
            join_type,
            table: table.into(),
            on: on.chain,
        }
    }
}
