//! CASE expressions, searched and simple.
//!
//! ```ignore
//! let grade = search_case()
//!     .when(&score, is_greater_than_or_equal_to(90)).then_string("A")
//!     .when(&score, is_greater_than_or_equal_to(80)).then_string("B")
//!     .else_string("C")
//!     .end()?
//!     .aliased("grade");
//! ```

use crate::condition::Condition;
use crate::criterion::{Connector, CriteriaChain, Criterion};
use crate::expr::Expr;
use sqlweave_core::{BuildError, Result, Value};

/// A finished CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub kind: CaseKind,
    pub else_: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseKind {
    /// `case when <criteria> then ...`
    Searched(Vec<SearchedWhen>),
    /// `case <operand> when <values|conditions> then ...`
    Simple {
        operand: Expr,
        whens: Vec<SimpleWhen>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchedWhen {
    pub condition: CriteriaChain,
    pub then: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleWhen {
    pub condition: SimpleCondition,
    pub then: Expr,
}

/// What a simple-case arm compares its operand against.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleCondition {
    /// `when :p1, :p2`
    Values(Vec<Value>),
    /// `when > :p1` style operator fragments
    Conditions(Vec<Condition>),
}

/// Start a searched case expression.
pub fn search_case() -> SearchedCaseBuilder {
    SearchedCaseBuilder {
        whens: Vec::new(),
        else_: None,
    }
}

/// Start a simple case expression over `operand`.
pub fn simple_case(operand: impl Into<Expr>) -> SimpleCaseBuilder {
    SimpleCaseBuilder {
        operand: operand.into(),
        whens: Vec::new(),
        else_: None,
        error: None,
    }
}

#[derive(Debug, Clone)]
pub struct SearchedCaseBuilder {
    whens: Vec<SearchedWhen>,
    else_: Option<Expr>,
}

impl SearchedCaseBuilder {
    pub fn when(self, column: impl Into<Expr>, condition: Condition) -> SearchedWhenBuilder {
        self.when_criterion(Criterion::column(column, condition))
    }

    pub fn when_criterion(self, criterion: impl Into<Criterion>) -> SearchedWhenBuilder {
        SearchedWhenBuilder {
            case: self,
            condition: CriteriaChain::new(criterion.into()),
        }
    }

    pub fn else_(mut self, expr: impl Into<Expr>) -> Self {
        self.else_ = Some(expr.into());
        self
    }

    pub fn else_value(self, value: impl Into<Value>) -> Self {
        self.else_(Expr::lit(value))
    }

    pub fn else_string(self, text: impl Into<String>) -> Self {
        self.else_(Expr::string(text))
    }

    pub fn else_constant(self, sql: impl Into<String>) -> Self {
        self.else_(Expr::raw(sql))
    }

    /// Finish the expression. Fails if no WHEN arm was added.
    pub fn end(self) -> Result<Expr> {
        if self.whens.is_empty() {
            return Err(BuildError::empty_group("a case expression requires at least one when").into());
        }
        Ok(Expr::from(CaseExpr {
            kind: CaseKind::Searched(self.whens),
            else_: self.else_,
        }))
    }
}

/// A WHEN arm waiting for its THEN.
#[derive(Debug, Clone)]
pub struct SearchedWhenBuilder {
    case: SearchedCaseBuilder,
    condition: CriteriaChain,
}

impl SearchedWhenBuilder {
    pub fn and(self, column: impl Into<Expr>, condition: Condition) -> Self {
        self.and_criterion(Criterion::column(column, condition))
    }

    pub fn or(self, column: impl Into<Expr>, condition: Condition) -> Self {
        self.or_criterion(Criterion::column(column, condition))
    }

    pub fn and_criterion(mut self, criterion: impl Into<Criterion>) -> Self {
        self.condition.push(Connector::And, criterion.into());
        self
    }

    pub fn or_criterion(mut self, criterion: impl Into<Criterion>) -> Self {
        self.condition.push(Connector::Or, criterion.into());
        self
    }

    pub fn then(mut self, expr: impl Into<Expr>) -> SearchedCaseBuilder {
        self.case.whens.push(SearchedWhen {
            condition: self.condition,
            then: expr.into(),
        });
        self.case
    }

    pub fn then_value(self, value: impl Into<Value>) -> SearchedCaseBuilder {
        self.then(Expr::lit(value))
    }

    pub fn then_string(self, text: impl Into<String>) -> SearchedCaseBuilder {
        self.then(Expr::string(text))
    }

    pub fn then_constant(self, sql: impl Into<String>) -> SearchedCaseBuilder {
        self.then(Expr::raw(sql))
    }
}

#[derive(Debug, Clone)]
pub struct SimpleCaseBuilder {
    operand: Expr,
    whens: Vec<SimpleWhen>,
    else_: Option<Expr>,
    error: Option<BuildError>,
}

impl SimpleCaseBuilder {
    /// `when :p1, :p2, ...`
    pub fn when_values<I, V>(self, values: I) -> SimpleWhenBuilder
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let empty = values.is_empty();
        self.arm(SimpleCondition::Values(values), empty)
    }

    /// `when <op> :p1, ...` using the operator fragment of each condition.
    pub fn when_conditions(self, conditions: impl IntoIterator<Item = Condition>) -> SimpleWhenBuilder {
        let conditions: Vec<Condition> = conditions.into_iter().collect();
        let empty = conditions.is_empty();
        self.arm(SimpleCondition::Conditions(conditions), empty)
    }

    fn arm(mut self, condition: SimpleCondition, empty: bool) -> SimpleWhenBuilder {
        if empty && self.error.is_none() {
            self.error = Some(BuildError::empty_group(
                "a simple case when requires at least one value or condition",
            ));
        }
        SimpleWhenBuilder {
            case: self,
            condition,
        }
    }

    pub fn else_(mut self, expr: impl Into<Expr>) -> Self {
        self.else_ = Some(expr.into());
        self
    }

    pub fn else_value(self, value: impl Into<Value>) -> Self {
        self.else_(Expr::lit(value))
    }

    pub fn else_string(self, text: impl Into<String>) -> Self {
        self.else_(Expr::string(text))
    }

    pub fn else_constant(self, sql: impl Into<String>) -> Self {
        self.else_(Expr::raw(sql))
    }

    pub fn end(self) -> Result<Expr> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        if self.whens.is_empty() {
            return Err(BuildError::empty_group("a case expression requires at least one when").into());
        }
        Ok(Expr::from(CaseExpr {
            kind: CaseKind::Simple {
                operand: self.operand,
                whens: self.whens,
            },
            else_: self.else_,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct SimpleWhenBuilder {
    case: SimpleCaseBuilder,
    condition: SimpleCondition,
}

impl SimpleWhenBuilder {
    pub fn then(mut self, expr: impl Into<Expr>) -> SimpleCaseBuilder {
        self.case.whens.push(SimpleWhen {
            condition: self.condition,
            then: expr.into(),
        });
        self.case
    }

    pub fn then_value(self, value: impl Into<Value>) -> SimpleCaseBuilder {
        self.then(Expr::lit(value))
    }

    pub fn then_string(self, text: impl Into<String>) -> SimpleCaseBuilder {
        self.then(Expr::string(text))
    }

    pub fn then_constant(self, sql: impl Into<String>) -> SimpleCaseBuilder {
        self.then(Expr::raw(sql))
    }
}
