//! Conditions: a predicate operator plus its bound values.
//!
//! Conditions are immutable values. `filter` and `map` return a new
//! condition and are applied eagerly, so a chain of filters behaves as their
//! logical AND and a chain of maps applies left to right. A condition whose
//! filter rejected its value is kept in the tree but declines to render.
//!
//! The `*_when_present` constructors are the strict constructor followed by
//! a filter that rejects NULL, so `Option<T>` arguments that are `None`
//! drop the whole criterion from the statement.

use crate::expr::Expr;
use crate::select::SelectModel;
use sqlweave_core::Value;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl Comparison {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Comparison::EqualTo => "=",
            Comparison::NotEqualTo => "<>",
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEqualTo => ">=",
            Comparison::LessThan => "<",
            Comparison::LessThanOrEqualTo => "<=",
        }
    }
}

/// The closed set of condition kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    IsNull,
    IsNotNull,
    Compare {
        op: Comparison,
        value: Value,
    },
    Like {
        negated: bool,
        case_insensitive: bool,
        value: Value,
    },
    Between {
        negated: bool,
        low: Value,
        high: Value,
    },
    In {
        negated: bool,
        values: Vec<Value>,
        /// An unfiltered list renders even when empty (`in ()`).
        render_empty: bool,
    },
    /// Caller-supplied operator, e.g. `@>` or `similar to`
    Custom {
        operator: String,
        value: Value,
    },
    /// Comparison against another column or expression
    CompareColumn {
        op: Comparison,
        other: Expr,
    },
    CompareSelect {
        op: Comparison,
        select: Box<SelectModel>,
    },
    InSelect {
        negated: bool,
        select: Box<SelectModel>,
    },
}

/// A predicate that may decline to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    kind: ConditionKind,
    suppressed: bool,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            suppressed: false,
        }
    }

    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    /// Whether this condition contributes anything to the statement.
    pub fn should_render(&self) -> bool {
        if self.suppressed {
            return false;
        }
        match &self.kind {
            ConditionKind::In {
                values,
                render_empty,
                ..
            } => *render_empty || !values.is_empty(),
            _ => true,
        }
    }

    /// Keep the condition only if its value(s) satisfy `predicate`.
    ///
    /// Single-value conditions are suppressed when the value fails. Between
    /// conditions require both bounds to pass. List conditions keep the
    /// passing elements and render only if at least one remains. Conditions
    /// without bound values are unchanged; use [`Condition::filter_when`].
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool,
    {
        if self.suppressed {
            return self;
        }
        match &mut self.kind {
            ConditionKind::Compare { value, .. }
            | ConditionKind::Like { value, .. }
            | ConditionKind::Custom { value, .. } => {
                if !predicate(value) {
                    self.suppressed = true;
                }
            }
            ConditionKind::Between { low, high, .. } => {
                if !(predicate(low) && predicate(high)) {
                    self.suppressed = true;
                }
            }
            ConditionKind::In {
                values,
                render_empty,
                ..
            } => {
                values.retain(|v| predicate(v));
                *render_empty = false;
            }
            ConditionKind::IsNull
            | ConditionKind::IsNotNull
            | ConditionKind::CompareColumn { .. }
            | ConditionKind::CompareSelect { .. }
            | ConditionKind::InSelect { .. } => {}
        }
        self
    }

    /// Keep the condition only if `keep` is true. Works for every kind.
    pub fn filter_when(mut self, keep: bool) -> Self {
        if !keep {
            self.suppressed = true;
        }
        self
    }

    /// Transform the bound value(s). List conditions map element-wise.
    /// A suppressed condition is returned unchanged.
    pub fn map<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value,
    {
        if self.suppressed {
            return self;
        }
        let apply = |value: &mut Value| {
            let current = std::mem::replace(value, Value::Null);
            *value = transform(current);
        };
        match &mut self.kind {
            ConditionKind::Compare { value, .. }
            | ConditionKind::Like { value, .. }
            | ConditionKind::Custom { value, .. } => apply(value),
            ConditionKind::Between { low, high, .. } => {
                apply(low);
                apply(high);
            }
            ConditionKind::In { values, .. } => values.iter_mut().for_each(apply),
            ConditionKind::IsNull
            | ConditionKind::IsNotNull
            | ConditionKind::CompareColumn { .. }
            | ConditionKind::CompareSelect { .. }
            | ConditionKind::InSelect { .. } => {}
        }
        self
    }

    /// Bound values in render order.
    pub fn values(&self) -> Vec<&Value> {
        match &self.kind {
            ConditionKind::Compare { value, .. }
            | ConditionKind::Like { value, .. }
            | ConditionKind::Custom { value, .. } => vec![value],
            ConditionKind::Between { low, high, .. } => vec![low, high],
            ConditionKind::In { values, .. } => values.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn present(self) -> Self {
        self.filter(|v| !v.is_null())
    }
}

fn compare(op: Comparison, value: impl Into<Value>) -> Condition {
    Condition::new(ConditionKind::Compare {
        op,
        value: value.into(),
    })
}

fn like(negated: bool, case_insensitive: bool, value: impl Into<Value>) -> Condition {
    Condition::new(ConditionKind::Like {
        negated,
        case_insensitive,
        value: value.into(),
    })
}

fn between(negated: bool, low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    Condition::new(ConditionKind::Between {
        negated,
        low: low.into(),
        high: high.into(),
    })
}

fn in_list<I, V>(negated: bool, values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::new(ConditionKind::In {
        negated,
        values: values.into_iter().map(Into::into).collect(),
        render_empty: true,
    })
}

pub fn is_null() -> Condition {
    Condition::new(ConditionKind::IsNull)
}

pub fn is_not_null() -> Condition {
    Condition::new(ConditionKind::IsNotNull)
}

macro_rules! comparison_conditions {
    ($($strict:ident, $present:ident => $op:ident;)*) => {
        $(
            pub fn $strict(value: impl Into<Value>) -> Condition {
                compare(Comparison::$op, value)
            }

            pub fn $present(value: impl Into<Value>) -> Condition {
                compare(Comparison::$op, value).present()
            }
        )*
    };
}

comparison_conditions! {
    is_equal_to, is_equal_to_when_present => EqualTo;
    is_not_equal_to, is_not_equal_to_when_present => NotEqualTo;
    is_greater_than, is_greater_than_when_present => GreaterThan;
    is_greater_than_or_equal_to, is_greater_than_or_equal_to_when_present => GreaterThanOrEqualTo;
    is_less_than, is_less_than_when_present => LessThan;
    is_less_than_or_equal_to, is_less_than_or_equal_to_when_present => LessThanOrEqualTo;
}

pub fn is_like(pattern: impl Into<Value>) -> Condition {
    like(false, false, pattern)
}

pub fn is_like_when_present(pattern: impl Into<Value>) -> Condition {
    like(false, false, pattern).present()
}

pub fn is_not_like(pattern: impl Into<Value>) -> Condition {
    like(true, false, pattern)
}

pub fn is_not_like_when_present(pattern: impl Into<Value>) -> Condition {
    like(true, false, pattern).present()
}

/// `upper(col) like :p` with the pattern upper-cased when bound.
pub fn is_like_case_insensitive(pattern: impl Into<Value>) -> Condition {
    like(false, true, pattern)
}

pub fn is_like_case_insensitive_when_present(pattern: impl Into<Value>) -> Condition {
    like(false, true, pattern).present()
}

pub fn is_not_like_case_insensitive(pattern: impl Into<Value>) -> Condition {
    like(true, true, pattern)
}

pub fn is_not_like_case_insensitive_when_present(pattern: impl Into<Value>) -> Condition {
    like(true, true, pattern).present()
}

/// Closed interval `low <= col <= high`.
pub fn is_between(low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    between(false, low, high)
}

pub fn is_between_when_present(low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    between(false, low, high).present()
}

pub fn is_not_between(low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    between(true, low, high)
}

pub fn is_not_between_when_present(low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    between(true, low, high).present()
}

/// Strict list membership. An empty list renders as `in ()`.
pub fn is_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    in_list(false, values)
}

/// List membership over the non-null elements; renders nothing when none remain.
pub fn is_in_when_present<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    in_list(false, values).present()
}

pub fn is_not_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    in_list(true, values)
}

pub fn is_not_in_when_present<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    in_list(true, values).present()
}

/// A caller-supplied binary operator, rendered as `col <operator> :p`.
pub fn custom(operator: impl Into<String>, value: impl Into<Value>) -> Condition {
    Condition::new(ConditionKind::Custom {
        operator: operator.into(),
        value: value.into(),
    })
}

pub fn custom_when_present(operator: impl Into<String>, value: impl Into<Value>) -> Condition {
    custom(operator, value).present()
}

macro_rules! column_conditions {
    ($($name:ident => $op:ident;)*) => {
        $(
            pub fn $name(other: impl Into<Expr>) -> Condition {
                Condition::new(ConditionKind::CompareColumn {
                    op: Comparison::$op,
                    other: other.into(),
                })
            }
        )*
    };
}

column_conditions! {
    equal_to => EqualTo;
    not_equal_to => NotEqualTo;
    greater_than => GreaterThan;
    greater_than_or_equal_to => GreaterThanOrEqualTo;
    less_than => LessThan;
    less_than_or_equal_to => LessThanOrEqualTo;
}

macro_rules! select_conditions {
    ($($name:ident => $op:ident;)*) => {
        $(
            pub fn $name(select: SelectModel) -> Condition {
                Condition::new(ConditionKind::CompareSelect {
                    op: Comparison::$op,
                    select: Box::new(select),
                })
            }
        )*
    };
}

select_conditions! {
    is_equal_to_select => EqualTo;
    is_not_equal_to_select => NotEqualTo;
    is_greater_than_select => GreaterThan;
    is_greater_than_or_equal_to_select => GreaterThanOrEqualTo;
    is_less_than_select => LessThan;
    is_less_than_or_equal_to_select => LessThanOrEqualTo;
}

pub fn is_in_select(select: SelectModel) -> Condition {
    Condition::new(ConditionKind::InSelect {
        negated: false,
        select: Box::new(select),
    })
}

pub fn is_not_in_select(select: SelectModel) -> Condition {
    Condition::new(ConditionKind::InSelect {
        negated: true,
        select: Box::new(select),
    })
}
