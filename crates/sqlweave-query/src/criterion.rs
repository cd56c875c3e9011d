//! The criterion tree.
//!
//! A [`Criterion`] is one node of a boolean expression: a column bound to a
//! [`Condition`], an EXISTS test, a parenthesised group, or a negation.
//! Leaves and groups carry trailing `(connector, criterion)` pairs; at render
//! time entries that do not render are dropped and the first surviving entry
//! becomes the new root of its chain.

use crate::condition::Condition;
use crate::expr::Expr;
use crate::select::SelectModel;
use sqlweave_core::{BuildError, Result};

/// How an entry attaches to the entries before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

/// A criterion tagged with the connector that joins it to its chain.
#[derive(Debug, Clone, PartialEq)]
pub struct AndOrCriterion {
    pub connector: Connector,
    pub criterion: Criterion,
}

/// One node of the boolean expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `<column> <condition>` plus optional trailing entries
    Column {
        column: Expr,
        condition: Condition,
        sub_criteria: Vec<AndOrCriterion>,
    },
    /// `exists (<select>)` plus optional trailing entries
    Exists {
        select: Box<SelectModel>,
        sub_criteria: Vec<AndOrCriterion>,
    },
    /// Parenthesised sub-expression
    Group {
        initial: Option<Box<Criterion>>,
        sub_criteria: Vec<AndOrCriterion>,
    },
    /// `not <criterion>`
    Not(Box<Criterion>),
}

impl Criterion {
    /// Bind a column (or any expression) to a condition.
    pub fn column(column: impl Into<Expr>, condition: Condition) -> Self {
        Criterion::Column {
            column: column.into(),
            condition,
            sub_criteria: Vec::new(),
        }
    }

    /// Append an AND entry to this criterion.
    pub fn and(self, other: impl Into<Criterion>) -> Self {
        self.push(Connector::And, other.into())
    }

    /// Append an OR entry to this criterion.
    pub fn or(self, other: impl Into<Criterion>) -> Self {
        self.push(Connector::Or, other.into())
    }

    /// Append several pre-tagged entries.
    pub fn with_sub_criteria(self, entries: impl IntoIterator<Item = AndOrCriterion>) -> Self {
        entries
            .into_iter()
            .fold(self, |acc, entry| acc.push(entry.connector, entry.criterion))
    }

    fn push(self, connector: Connector, criterion: Criterion) -> Self {
        let entry = AndOrCriterion {
            connector,
            criterion,
        };
        match self {
            Criterion::Column {
                column,
                condition,
                mut sub_criteria,
            } => {
                sub_criteria.push(entry);
                Criterion::Column {
                    column,
                    condition,
                    sub_criteria,
                }
            }
            Criterion::Exists {
                select,
                mut sub_criteria,
            } => {
                sub_criteria.push(entry);
                Criterion::Exists {
                    select,
                    sub_criteria,
                }
            }
            Criterion::Group {
                initial,
                mut sub_criteria,
            } => {
                sub_criteria.push(entry);
                Criterion::Group {
                    initial,
                    sub_criteria,
                }
            }
            not @ Criterion::Not(_) => Criterion::Group {
                initial: Some(Box::new(not)),
                sub_criteria: vec![entry],
            },
        }
    }

    /// Whether any part of this criterion would render.
    pub fn should_render(&self) -> bool {
        match self {
            Criterion::Column {
                condition,
                sub_criteria,
                ..
            } => condition.should_render() || any_renders(sub_criteria),
            Criterion::Exists { .. } => true,
            Criterion::Group {
                initial,
                sub_criteria,
            } => initial.as_ref().is_some_and(|c| c.should_render()) || any_renders(sub_criteria),
            Criterion::Not(inner) => inner.should_render(),
        }
    }
}

fn any_renders(entries: &[AndOrCriterion]) -> bool {
    entries.iter().any(|entry| entry.criterion.should_render())
}

impl<C: Into<Expr>> From<(C, Condition)> for Criterion {
    fn from((column, condition): (C, Condition)) -> Self {
        Criterion::column(column, condition)
    }
}

/// An ordered boolean expression: an optional root plus connector-tagged
/// entries. Used for WHERE, HAVING, join on-clauses and case WHEN arms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaChain {
    pub initial: Option<Criterion>,
    pub sub_criteria: Vec<AndOrCriterion>,
}

impl CriteriaChain {
    pub fn new(initial: Criterion) -> Self {
        Self {
            initial: Some(initial),
            sub_criteria: Vec::new(),
        }
    }

    /// A chain with no root yet; the first entry added becomes the root
    /// when rendered.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, connector: Connector, criterion: Criterion) {
        if self.initial.is_none() && self.sub_criteria.is_empty() {
            self.initial = Some(criterion);
        } else {
            self.sub_criteria.push(AndOrCriterion {
                connector,
                criterion,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_none() && self.sub_criteria.is_empty()
    }
}

/// Tag a criterion with AND, for use in sub-criteria lists.
pub fn and(criterion: impl Into<Criterion>) -> AndOrCriterion {
    AndOrCriterion {
        connector: Connector::And,
        criterion: criterion.into(),
    }
}

/// Tag a criterion with OR, for use in sub-criteria lists.
pub fn or(criterion: impl Into<Criterion>) -> AndOrCriterion {
    AndOrCriterion {
        connector: Connector::Or,
        criterion: criterion.into(),
    }
}

/// Shorthand for [`Criterion::column`].
pub fn criterion(column: impl Into<Expr>, condition: Condition) -> Criterion {
    Criterion::column(column, condition)
}

pub fn not(criterion: impl Into<Criterion>) -> Criterion {
    Criterion::Not(Box::new(criterion.into()))
}

pub fn exists(select: SelectModel) -> Criterion {
    Criterion::Exists {
        select: Box::new(select),
        sub_criteria: Vec::new(),
    }
}

pub fn not_exists(select: SelectModel) -> Criterion {
    not(exists(select))
}

/// A parenthesised group rooted at `initial`; extend it with `.and`/`.or`.
pub fn group(initial: impl Into<Criterion>) -> Criterion {
    Criterion::Group {
        initial: Some(Box::new(initial.into())),
        sub_criteria: Vec::new(),
    }
}

/// A parenthesised group made only of tagged entries. The first entry's
/// connector is dropped when rendered.
pub fn group_of(entries: impl IntoIterator<Item = AndOrCriterion>) -> Result<Criterion> {
    let sub_criteria: Vec<AndOrCriterion> = entries.into_iter().collect();
    if sub_criteria.is_empty() {
        return Err(BuildError::empty_group("a criteria group requires at least one criterion").into());
    }
    Ok(Criterion::Group {
        initial: None,
        sub_criteria,
    })
}
