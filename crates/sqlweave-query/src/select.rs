//! SELECT statements: the immutable model and its fluent builders.
//!
//! Every builder returned along a chain holds a handle to the same shared
//! draft, so calling `build()` on any of them snapshots the chain as it
//! stands, including calls made later through other builders:
//!
//! ```ignore
//! let from = select([&id, &name]).from(&person);
//! let filtered = from.where_(&id, is_greater_than(3));
//! let ordered = filtered.order_by([&id]);
//! assert_eq!(from.build()?, ordered.build()?);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::clause::OrderBy;
use crate::condition::Condition;
use crate::criterion::{Connector, CriteriaChain, Criterion};
use crate::expr::Expr;
use crate::join::{JoinCondition, JoinSpec, JoinType};
use crate::paging::PagingModel;
use crate::render::{self, PlaceholderStrategy, RenderedStatement};
use crate::set_ops::SetOpType;
use crate::table::TableExpr;
use sqlweave_core::{BuildError, Result, StatementConfiguration};

/// A fully built SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectModel {
    /// The first query expression and any union'd continuations.
    pub queries: Vec<QueryExpressionModel>,
    pub order_by: Option<Vec<OrderBy>>,
    pub paging: Option<PagingModel>,
    pub configuration: StatementConfiguration,
}

/// One `select ... from ... where ... group by ... having ...` block.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpressionModel {
    /// How this block attaches to the previous one; `None` for the first.
    pub connector: Option<SetOpType>,
    pub distinct: bool,
    pub select_list: Vec<Expr>,
    pub table: TableExpr,
    pub joins: Vec<JoinSpec>,
    pub where_clause: Option<CriteriaChain>,
    pub group_by: Option<Vec<Expr>>,
    pub having: Option<CriteriaChain>,
}

impl SelectModel {
    /// Render to SQL text plus parameters using `strategy` for placeholders.
    pub fn render(&self, strategy: &dyn PlaceholderStrategy) -> Result<RenderedStatement> {
        render::render_select(self, strategy)
    }
}

type DraftHandle = Rc<RefCell<SelectDraft>>;

#[derive(Debug, Default)]
struct SelectDraft {
    queries: Vec<QueryDraft>,
    order_by: Option<Vec<OrderBy>>,
    limit: Option<u64>,
    offset: Option<u64>,
    fetch_first: Option<u64>,
    configuration: StatementConfiguration,
    error: Option<BuildError>,
}

#[derive(Debug)]
struct QueryDraft {
    connector: Option<SetOpType>,
    distinct: bool,
    select_list: Vec<Expr>,
    table: Option<TableExpr>,
    joins: Vec<JoinSpec>,
    where_clause: Option<CriteriaChain>,
    group_by: Option<Vec<Expr>>,
    having: Option<CriteriaChain>,
}

impl SelectDraft {
    /// Record the first error; later errors are dropped.
    fn fail(&mut self, err: BuildError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn push_query(
        &mut self,
        connector: Option<SetOpType>,
        distinct: bool,
        select_list: Vec<Expr>,
    ) -> usize {
        if select_list.is_empty() {
            self.fail(BuildError::empty_group(
                "a select list requires at least one column",
            ));
        }
        self.queries.push(QueryDraft {
            connector,
            distinct,
            select_list,
            table: None,
            joins: Vec::new(),
            where_clause: None,
            group_by: None,
            having: None,
        });
        self.queries.len() - 1
    }

    fn snapshot(&self) -> Result<SelectModel> {
        if let Some(err) = &self.error {
            return Err(err.clone().into());
        }
        let queries = self
            .queries
            .iter()
            .map(QueryDraft::to_model)
            .collect::<Result<Vec<_>>>()?;
        Ok(SelectModel {
            queries,
            order_by: self.order_by.clone(),
            paging: PagingModel::from_parts(self.limit, self.offset, self.fetch_first)?,
            configuration: self.configuration,
        })
    }
}

impl QueryDraft {
    fn to_model(&self) -> Result<QueryExpressionModel> {
        let table = self.table.clone().ok_or_else(|| {
            BuildError::missing_argument("a query expression requires a table; call from()")
        })?;
        Ok(QueryExpressionModel {
            connector: self.connector,
            distinct: self.distinct,
            select_list: self.select_list.clone(),
            table,
            joins: self.joins.clone(),
            where_clause: self.where_clause.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
        })
    }
}

fn start<I, E>(distinct: bool, columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    let mut draft = SelectDraft::default();
    let query = draft.push_query(None, distinct, columns.into_iter().map(Into::into).collect());
    SelectBuilder {
        draft: Rc::new(RefCell::new(draft)),
        query,
    }
}

/// Start a SELECT statement.
pub fn select<I, E>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    start(false, columns)
}

/// Start a SELECT DISTINCT statement.
pub fn select_distinct<I, E>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    start(true, columns)
}

/// A select list waiting for its table.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    draft: DraftHandle,
    query: usize,
}

impl SelectBuilder {
    pub fn from(&self, table: impl Into<TableExpr>) -> QueryExpressionBuilder {
        let table = table.into();
        let query = self.query;
        let mut draft = self.draft.borrow_mut();
        if !table.is_named() {
            draft.fail(BuildError::missing_argument("from() requires a table name"));
        }
        draft.queries[query].table = Some(table);
        drop(draft);
        QueryExpressionBuilder::new(self.draft.clone(), self.query)
    }
}

/// Follows `union()`/`union_all()`; starts the next query expression.
#[derive(Debug, Clone)]
pub struct UnionBuilder {
    draft: DraftHandle,
    connector: SetOpType,
}

impl UnionBuilder {
    pub fn select<I, E>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.start(false, columns.into_iter().map(Into::into).collect())
    }

    pub fn select_distinct<I, E>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.start(true, columns.into_iter().map(Into::into).collect())
    }

    fn start(&self, distinct: bool, select_list: Vec<Expr>) -> SelectBuilder {
        let query = self
            .draft
            .borrow_mut()
            .push_query(Some(self.connector), distinct, select_list);
        SelectBuilder {
            draft: self.draft.clone(),
            query,
        }
    }
}

macro_rules! phase_builder {
    ($($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty),* };)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name {
                draft: DraftHandle,
                $($field: $ty,)*
            }

            impl $name {
                fn new(draft: DraftHandle $(, $field: $ty)*) -> Self {
                    Self { draft $(, $field)* }
                }

                fn update(&self, f: impl FnOnce(&mut SelectDraft)) {
                    f(&mut self.draft.borrow_mut());
                }

                /// Adjust the statement configuration.
                pub fn configure(&self, f: impl FnOnce(&mut StatementConfiguration)) -> Self {
                    self.update(|draft| f(&mut draft.configuration));
                    self.clone()
                }

                /// Replace the statement configuration.
                pub fn with_configuration(&self, configuration: StatementConfiguration) -> Self {
                    self.update(|draft| draft.configuration = configuration);
                    self.clone()
                }

                /// Snapshot the whole chain into an immutable model.
                #[tracing::instrument(level = "trace", skip(self))]
                pub fn build(&self) -> Result<SelectModel> {
                    self.draft.borrow().snapshot()
                }
            }
        )*
    };
}

phase_builder! {
    /// A query expression with its table; joins, where, group by and the
    /// statement-level clauses may follow.
    QueryExpressionBuilder { query: usize };
    /// Extends the WHERE clause of the current query expression.
    WhereBuilder { query: usize };
    GroupByBuilder { query: usize };
    /// Extends the HAVING clause of the current query expression.
    HavingBuilder { query: usize };
    OrderByBuilder {};
    LimitBuilder {};
    OffsetBuilder {};
    /// Terminal paging phase.
    PagingBuilder {};
}

impl QueryExpressionBuilder {
    pub fn join(&self, table: impl Into<TableExpr>, on: JoinCondition) -> Self {
        self.add_join(JoinType::Inner, table.into(), on)
    }

    pub fn left_join(&self, table: impl Into<TableExpr>, on: JoinCondition) -> Self {
        self.add_join(JoinType::Left, table.into(), on)
    }

    pub fn right_join(&self, table: impl Into<TableExpr>, on: JoinCondition) -> Self {
        self.add_join(JoinType::Right, table.into(), on)
    }

    pub fn full_join(&self, table: impl Into<TableExpr>, on: JoinCondition) -> Self {
        self.add_join(JoinType::Full, table.into(), on)
    }

    fn add_join(&self, join_type: JoinType, table: TableExpr, on: JoinCondition) -> Self {
        let query = self.query;
        self.update(|draft| {
            if !table.is_named() {
                draft.fail(BuildError::missing_argument("join() requires a table name"));
            }
            draft.queries[query]
                .joins
                .push(JoinSpec::new(join_type, table, on));
        });
        self.clone()
    }

    pub fn where_(&self, column: impl Into<Expr>, condition: Condition) -> WhereBuilder {
        self.where_criterion(Criterion::column(column, condition))
    }

    /// Add a criterion to the WHERE clause. Repeated calls are AND-ed.
    pub fn where_criterion(&self, criterion: impl Into<Criterion>) -> WhereBuilder {
        let query = self.query;
        let criterion = criterion.into();
        self.update(|draft| {
            draft.queries[query]
                .where_clause
                .get_or_insert_with(CriteriaChain::empty)
                .push(Connector::And, criterion);
        });
        WhereBuilder::new(self.draft.clone(), self.query)
    }

    /// Declare a WHERE clause whose criteria are added with `and`/`or`.
    pub fn where_clause(&self) -> WhereBuilder {
        let query = self.query;
        self.update(|draft| {
            draft.queries[query]
                .where_clause
                .get_or_insert_with(CriteriaChain::empty);
        });
        WhereBuilder::new(self.draft.clone(), self.query)
    }
}

macro_rules! criteria_methods {
    ($name:ident, $field:ident) => {
        impl $name {
            pub fn and(&self, column: impl Into<Expr>, condition: Condition) -> Self {
                self.push(Connector::And, Criterion::column(column, condition))
            }

            pub fn or(&self, column: impl Into<Expr>, condition: Condition) -> Self {
                self.push(Connector::Or, Criterion::column(column, condition))
            }

            pub fn and_criterion(&self, criterion: impl Into<Criterion>) -> Self {
                self.push(Connector::And, criterion.into())
            }

            pub fn or_criterion(&self, criterion: impl Into<Criterion>) -> Self {
                self.push(Connector::Or, criterion.into())
            }

            fn push(&self, connector: Connector, criterion: Criterion) -> Self {
                let query = self.query;
                self.update(|draft| {
                    draft.queries[query]
                        .$field
                        .get_or_insert_with(CriteriaChain::empty)
                        .push(connector, criterion);
                });
                self.clone()
            }
        }
    };
}

criteria_methods!(WhereBuilder, where_clause);
criteria_methods!(HavingBuilder, having);

macro_rules! group_by_methods {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn group_by<I, E>(&self, columns: I) -> GroupByBuilder
                where
                    I: IntoIterator<Item = E>,
                    E: Into<Expr>,
                {
                    let query = self.query;
                    let columns: Vec<Expr> = columns.into_iter().map(Into::into).collect();
                    self.update(|draft| {
                        if columns.is_empty() {
                            draft.fail(BuildError::empty_group(
                                "group by requires at least one column",
                            ));
                        }
                        draft.queries[query].group_by = Some(columns);
                    });
                    GroupByBuilder::new(self.draft.clone(), self.query)
                }
            }
        )*
    };
}

group_by_methods!(QueryExpressionBuilder, WhereBuilder);

impl GroupByBuilder {
    pub fn having(&self, column: impl Into<Expr>, condition: Condition) -> HavingBuilder {
        self.having_criterion(Criterion::column(column, condition))
    }

    pub fn having_criterion(&self, criterion: impl Into<Criterion>) -> HavingBuilder {
        let query = self.query;
        let criterion = criterion.into();
        self.update(|draft| {
            draft.queries[query]
                .having
                .get_or_insert_with(CriteriaChain::empty)
                .push(Connector::And, criterion);
        });
        HavingBuilder::new(self.draft.clone(), self.query)
    }

    /// Declare a HAVING clause whose criteria are added with `and`/`or`.
    pub fn having_clause(&self) -> HavingBuilder {
        let query = self.query;
        self.update(|draft| {
            draft.queries[query]
                .having
                .get_or_insert_with(CriteriaChain::empty);
        });
        HavingBuilder::new(self.draft.clone(), self.query)
    }
}

macro_rules! union_methods {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn union(&self) -> UnionBuilder {
                    UnionBuilder {
                        draft: self.draft.clone(),
                        connector: SetOpType::Union,
                    }
                }

                pub fn union_all(&self) -> UnionBuilder {
                    UnionBuilder {
                        draft: self.draft.clone(),
                        connector: SetOpType::UnionAll,
                    }
                }
            }
        )*
    };
}

union_methods!(QueryExpressionBuilder, WhereBuilder, GroupByBuilder, HavingBuilder);

macro_rules! order_by_methods {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Order the whole statement, including any union'd blocks.
                pub fn order_by<I, O>(&self, specs: I) -> OrderByBuilder
                where
                    I: IntoIterator<Item = O>,
                    O: Into<OrderBy>,
                {
                    let specs: Vec<OrderBy> = specs.into_iter().map(Into::into).collect();
                    self.update(|draft| {
                        if specs.is_empty() {
                            draft.fail(BuildError::empty_group(
                                "order by requires at least one column",
                            ));
                        }
                        draft.order_by = Some(specs);
                    });
                    OrderByBuilder::new(self.draft.clone())
                }
            }
        )*
    };
}

order_by_methods!(QueryExpressionBuilder, WhereBuilder, GroupByBuilder, HavingBuilder);

macro_rules! paging_methods {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn limit(&self, limit: u64) -> LimitBuilder {
                    self.limit_when_present(Some(limit))
                }

                /// Like `limit`, but `None` leaves the statement unpaged.
                pub fn limit_when_present(&self, limit: Option<u64>) -> LimitBuilder {
                    if let Some(limit) = limit {
                        self.update(|draft| draft.limit = Some(limit));
                    }
                    LimitBuilder::new(self.draft.clone())
                }

                pub fn offset(&self, offset: u64) -> OffsetBuilder {
                    self.offset_when_present(Some(offset))
                }

                pub fn offset_when_present(&self, offset: Option<u64>) -> OffsetBuilder {
                    if let Some(offset) = offset {
                        self.update(|draft| draft.offset = Some(offset));
                    }
                    OffsetBuilder::new(self.draft.clone())
                }

                pub fn fetch_first(&self, rows: u64) -> PagingBuilder {
                    self.fetch_first_when_present(Some(rows))
                }

                pub fn fetch_first_when_present(&self, rows: Option<u64>) -> PagingBuilder {
                    if let Some(rows) = rows {
                        self.update(|draft| draft.fetch_first = Some(rows));
                    }
                    PagingBuilder::new(self.draft.clone())
                }
            }
        )*
    };
}

paging_methods!(
    QueryExpressionBuilder,
    WhereBuilder,
    GroupByBuilder,
    HavingBuilder,
    OrderByBuilder
);

impl LimitBuilder {
    pub fn offset(&self, offset: u64) -> PagingBuilder {
        self.offset_when_present(Some(offset))
    }

    pub fn offset_when_present(&self, offset: Option<u64>) -> PagingBuilder {
        if let Some(offset) = offset {
            self.update(|draft| draft.offset = Some(offset));
        }
        PagingBuilder::new(self.draft.clone())
    }
}

impl OffsetBuilder {
    pub fn fetch_first(&self, rows: u64) -> PagingBuilder {
        self.fetch_first_when_present(Some(rows))
    }

    pub fn fetch_first_when_present(&self, rows: Option<u64>) -> PagingBuilder {
        if let Some(rows) = rows {
            self.update(|draft| draft.fetch_first = Some(rows));
        }
        PagingBuilder::new(self.draft.clone())
    }
}
