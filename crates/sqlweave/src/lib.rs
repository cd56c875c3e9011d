//! sqlweave - a fluent, chain-safe SQL statement builder.
//!
//! Statements are assembled with builders, frozen into immutable models by
//! `build()`, and rendered into SQL text with named parameters:
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let person = SqlTable::new("person");
//! let id = person.column("id");
//! let name = person.column("first_name");
//!
//! let rendered = select([&id, &name])
//!     .from(&person)
//!     .where_(&id, is_in([5, 8, 10]))
//!     .and(&name, is_like_when_present(None::<&str>))
//!     .build()?
//!     .render(&NamedColon)?;
//!
//! assert_eq!(rendered.sql, "select id, first_name from person where id in (:p1,:p2,:p3)");
//! ```
//!
//! # Features
//!
//! - **Optional conditions**: `*_when_present` conditions drop out of the
//!   statement when their value is NULL, and the connectors around them
//!   re-root so the SQL stays well-formed.
//! - **One parameter sequence**: `p1..pN` in SQL text order across
//!   sub-queries, CASE expressions and paging.
//! - **Alias resolution**: columns pick up table aliases, and joins force
//!   qualification.
//! - **Pluggable placeholders**: `Dialect`, `NamedColon`, `Templated` or any
//!   `PlaceholderStrategy`.

pub use sqlweave_core::{
    BuildError, BuildErrorKind, Clause, ConfigError, Error, RenderError, RenderErrorKind, Result,
    SqlType, StatementConfiguration, Value,
};

pub use sqlweave_query::{
    AndOrCriterion, CaseExpr, ColumnValue, Condition, ConditionKind, Connector, CriteriaChain,
    Criterion, DeleteModel, Dialect, Expr, InsertModel, JoinCondition, JoinType, NamedColon,
    NullsOrder, OrderBy, OrderDirection, PagingModel, ParameterKey, Parameters,
    PlaceholderStrategy, QueryExpressionModel, RenderedStatement, SelectModel, SetOpType,
    SqlColumn, SqlTable, TableExpr, TableId, Templated, UpdateModel, delete_from, insert_into, on,
    on_criterion, search_case, select, select_distinct, simple_case, update,
};

/// Condition constructors: `is_equal_to`, `is_in_when_present`, ...
pub use sqlweave_query::condition;

/// Criterion constructors: `and`, `or`, `not`, `exists`, `group`, ...
pub use sqlweave_query::criterion;

/// Everything needed to build and render statements.
pub mod prelude {
    pub use crate::{
        // Core types
        Error,
        Result,
        SqlType,
        StatementConfiguration,
        Value,
        // Statement building
        Expr,
        OrderBy,
        SelectModel,
        SqlColumn,
        SqlTable,
        delete_from,
        insert_into,
        on,
        on_criterion,
        search_case,
        select,
        select_distinct,
        simple_case,
        update,
        // Rendering
        Dialect,
        NamedColon,
        PlaceholderStrategy,
        RenderedStatement,
        Templated,
    };
    pub use sqlweave_query::condition::*;
    pub use sqlweave_query::criterion::{
        and, criterion, exists, group, group_of, not, not_exists, or,
    };
}
