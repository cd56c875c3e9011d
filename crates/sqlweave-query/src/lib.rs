//! Criterion tree, statement models and rendering engine for sqlweave.
//!
//! `sqlweave-query` is the **statement construction layer**. Fluent builders
//! produce immutable models; the rendering engine turns a model into SQL text
//! plus a map of named parameters.
//!
//! # Role In The Architecture
//!
//! - **Conditions**: `is_equal_to`, `is_in_when_present`, ... decide at build
//!   time whether they take part in rendering.
//! - **Criteria**: `Criterion` and `CriteriaChain` form the AND/OR tree that
//!   backs WHERE, HAVING, join ON and searched CASE conditions.
//! - **Statements**: `select`, `update`, `delete_from` and `insert_into` start
//!   chain-safe builders.
//! - **Rendering**: `PlaceholderStrategy` decides placeholder syntax; the
//!   numbering of parameters is owned by the renderer.
//!
//! Most users reach these through the `sqlweave` facade crate.

pub mod builder;
pub mod case;
pub mod clause;
pub mod condition;
pub mod criterion;
pub mod expr;
pub mod join;
pub mod paging;
pub mod render;
pub mod select;
pub mod set_ops;
pub mod table;

pub use builder::{
    ColumnValue, DeleteBuilder, DeleteModel, DeleteWhereBuilder, InsertBuilder, InsertModel,
    InsertSetBuilder, UpdateBuilder, UpdateModel, UpdateSetBuilder, UpdateWhereBuilder,
    delete_from, insert_into, update,
};
pub use case::{
    CaseExpr, CaseKind, SearchedCaseBuilder, SearchedWhen, SearchedWhenBuilder, SimpleCaseBuilder,
    SimpleCondition, SimpleWhen, SimpleWhenBuilder, search_case, simple_case,
};
pub use clause::{NullsOrder, OrderBy, OrderDirection};
pub use condition::{Comparison, Condition, ConditionKind};
pub use criterion::{AndOrCriterion, Connector, CriteriaChain, Criterion};
pub use expr::Expr;
pub use join::{JoinCondition, JoinSpec, JoinType, on, on_criterion};
pub use paging::PagingModel;
pub use render::{
    Dialect, NamedColon, ParameterKey, Parameters, PlaceholderStrategy, RenderedStatement,
    RenderingContext, TableAliasResolver, Templated,
};
pub use select::{
    GroupByBuilder, HavingBuilder, LimitBuilder, OffsetBuilder, OrderByBuilder, PagingBuilder,
    QueryExpressionBuilder, QueryExpressionModel, SelectBuilder, SelectModel, UnionBuilder,
    WhereBuilder, select, select_distinct,
};
pub use set_ops::SetOpType;
pub use table::{SqlColumn, SqlTable, TableExpr, TableId, TableSource};
