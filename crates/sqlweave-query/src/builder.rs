//! Builders for UPDATE, DELETE and INSERT statements.
//!
//! These share the criterion tree, configuration and chain-safe build
//! protocol of SELECT: every builder in a chain holds the same draft, and
//! `build()` from any of them snapshots the whole chain.

use std::cell::RefCell;
use std::rc::Rc;

use crate::condition::Condition;
use crate::criterion::{Connector, CriteriaChain, Criterion};
use crate::expr::Expr;
use crate::render::{self, PlaceholderStrategy, RenderedStatement};
use crate::select::SelectModel;
use crate::table::{SqlColumn, SqlTable};
use sqlweave_core::{BuildError, Result, StatementConfiguration, Value};

/// A column paired with the expression assigned or inserted into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub column: SqlColumn,
    pub value: Expr,
}

/// A fully built UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateModel {
    pub table: SqlTable,
    pub set: Vec<ColumnValue>,
    pub where_clause: Option<CriteriaChain>,
    pub configuration: StatementConfiguration,
}

impl UpdateModel {
    pub fn render(&self, strategy: &dyn PlaceholderStrategy) -> Result<RenderedStatement> {
        render::render_update(self, strategy)
    }
}

/// A fully built DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteModel {
    pub table: SqlTable,
    pub where_clause: Option<CriteriaChain>,
    pub configuration: StatementConfiguration,
}

impl DeleteModel {
    pub fn render(&self, strategy: &dyn PlaceholderStrategy) -> Result<RenderedStatement> {
        render::render_delete(self, strategy)
    }
}

/// A fully built single-row INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertModel {
    pub table: SqlTable,
    pub values: Vec<ColumnValue>,
}

impl InsertModel {
    pub fn render(&self, strategy: &dyn PlaceholderStrategy) -> Result<RenderedStatement> {
        render::render_insert(self, strategy)
    }
}

type DraftHandle = Rc<RefCell<DmlDraft>>;

#[derive(Debug)]
struct DmlDraft {
    table: SqlTable,
    columns: Vec<ColumnValue>,
    where_clause: Option<CriteriaChain>,
    configuration: StatementConfiguration,
    error: Option<BuildError>,
}

impl DmlDraft {
    fn handle(table: &SqlTable) -> DraftHandle {
        let error = table
            .name()
            .is_empty()
            .then(|| BuildError::missing_argument("a statement requires a table name"));
        Rc::new(RefCell::new(Self {
            table: table.clone(),
            columns: Vec::new(),
            where_clause: None,
            configuration: StatementConfiguration::default(),
            error,
        }))
    }

    fn fail(&mut self, err: BuildError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check(&self) -> Result<()> {
        match &self.error {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    fn push_column(&mut self, column: &SqlColumn, value: Expr) {
        if column.name().is_empty() {
            self.fail(BuildError::missing_argument("a column name is required"));
        }
        self.columns.push(ColumnValue {
            column: column.clone(),
            value,
        });
    }

    fn to_update(&self) -> Result<UpdateModel> {
        self.check()?;
        Ok(UpdateModel {
            table: self.table.clone(),
            set: self.columns.clone(),
            where_clause: self.where_clause.clone(),
            configuration: self.configuration,
        })
    }

    fn to_delete(&self) -> Result<DeleteModel> {
        self.check()?;
        Ok(DeleteModel {
            table: self.table.clone(),
            where_clause: self.where_clause.clone(),
            configuration: self.configuration,
        })
    }

    fn to_insert(&self) -> Result<InsertModel> {
        self.check()?;
        Ok(InsertModel {
            table: self.table.clone(),
            values: self.columns.clone(),
        })
    }
}

macro_rules! dml_phase {
    ($($(#[$meta:meta])* $name:ident => $model:ident, $snapshot:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name {
                draft: DraftHandle,
            }

            impl $name {
                fn update(&self, f: impl FnOnce(&mut DmlDraft)) {
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
                pub fn build(&self) -> Result<$model> {
                    self.draft.borrow().$snapshot()
                }
            }
        )*
    };
}

dml_phase! {
    UpdateBuilder => UpdateModel, to_update;
    UpdateWhereBuilder => UpdateModel, to_update;
    DeleteBuilder => DeleteModel, to_delete;
    DeleteWhereBuilder => DeleteModel, to_delete;
    InsertBuilder => InsertModel, to_insert;
}

macro_rules! where_entry {
    ($($name:ident => $where:ident),*) => {
        $(
            impl $name {
                pub fn where_(&self, column: impl Into<Expr>, condition: Condition) -> $where {
                    self.where_criterion(Criterion::column(column, condition))
                }

                /// Add a criterion to the WHERE clause. Repeated calls are AND-ed.
                pub fn where_criterion(&self, criterion: impl Into<Criterion>) -> $where {
                    let criterion = criterion.into();
                    self.update(|draft| {
                        draft
                            .where_clause
                            .get_or_insert_with(CriteriaChain::empty)
                            .push(Connector::And, criterion);
                    });
                    $where {
                        draft: self.draft.clone(),
                    }
                }

                /// Declare a WHERE clause whose criteria are added with `and`/`or`.
                pub fn where_clause(&self) -> $where {
                    self.update(|draft| {
                        draft.where_clause.get_or_insert_with(CriteriaChain::empty);
                    });
                    $where {
                        draft: self.draft.clone(),
                    }
                }
            }

            impl $where {
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
                    self.update(|draft| {
                        draft
                            .where_clause
                            .get_or_insert_with(CriteriaChain::empty)
                            .push(connector, criterion);
                    });
                    self.clone()
                }
            }
        )*
    };
}

where_entry!(UpdateBuilder => UpdateWhereBuilder, DeleteBuilder => DeleteWhereBuilder);

/// Start an UPDATE statement.
pub fn update(table: &SqlTable) -> UpdateBuilder {
    UpdateBuilder {
        draft: DmlDraft::handle(table),
    }
}

/// Start a DELETE statement.
pub fn delete_from(table: &SqlTable) -> DeleteBuilder {
    DeleteBuilder {
        draft: DmlDraft::handle(table),
    }
}

/// Start a single-row INSERT statement.
pub fn insert_into(table: &SqlTable) -> InsertBuilder {
    InsertBuilder {
        draft: DmlDraft::handle(table),
    }
}

impl UpdateBuilder {
    pub fn set(&self, column: &SqlColumn) -> UpdateSetBuilder {
        UpdateSetBuilder {
            draft: self.draft.clone(),
            column: column.clone(),
        }
    }
}

/// The right-hand side of one `set column = ...` entry.
#[derive(Debug, Clone)]
pub struct UpdateSetBuilder {
    draft: DraftHandle,
    column: SqlColumn,
}

impl UpdateSetBuilder {
    pub fn equal_to(&self, value: impl Into<Value>) -> UpdateBuilder {
        self.equal_to_expr(Expr::lit(value))
    }

    /// Skip the assignment entirely when the value is NULL.
    pub fn equal_to_when_present(&self, value: impl Into<Value>) -> UpdateBuilder {
        let value = value.into();
        if value.is_null() {
            tracing::trace!(column = self.column.name(), "set entry skipped");
            return self.finish();
        }
        self.equal_to_expr(Expr::lit(value))
    }

    pub fn equal_to_null(&self) -> UpdateBuilder {
        self.equal_to_expr(Expr::raw("null"))
    }

    pub fn equal_to_constant(&self, sql: impl Into<String>) -> UpdateBuilder {
        self.equal_to_expr(Expr::raw(sql))
    }

    pub fn equal_to_string_constant(&self, text: impl Into<String>) -> UpdateBuilder {
        self.equal_to_expr(Expr::string(text))
    }

    pub fn equal_to_select(&self, select: SelectModel) -> UpdateBuilder {
        self.equal_to_expr(Expr::subquery(select))
    }

    /// Assign an arbitrary expression, e.g. another column.
    pub fn equal_to_expr(&self, expr: impl Into<Expr>) -> UpdateBuilder {
        let expr = expr.into();
        self.draft.borrow_mut().push_column(&self.column, expr);
        self.finish()
    }

    fn finish(&self) -> UpdateBuilder {
        UpdateBuilder {
            draft: self.draft.clone(),
        }
    }
}

impl InsertBuilder {
    pub fn set(&self, column: &SqlColumn) -> InsertSetBuilder {
        InsertSetBuilder {
            draft: self.draft.clone(),
            column: column.clone(),
        }
    }
}

/// The value of one inserted column.
#[derive(Debug, Clone)]
pub struct InsertSetBuilder {
    draft: DraftHandle,
    column: SqlColumn,
}

impl InsertSetBuilder {
    pub fn to_value(&self, value: impl Into<Value>) -> InsertBuilder {
        self.to_expr(Expr::lit(value))
    }

    /// Leave the column out of the statement when the value is NULL.
    pub fn to_value_when_present(&self, value: impl Into<Value>) -> InsertBuilder {
        let value = value.into();
        if value.is_null() {
            tracing::trace!(column = self.column.name(), "insert column skipped");
            return self.finish();
        }
        self.to_expr(Expr::lit(value))
    }

    pub fn to_null(&self) -> InsertBuilder {
        self.to_expr(Expr::raw("null"))
    }

    pub fn to_constant(&self, sql: impl Into<String>) -> InsertBuilder {
        self.to_expr(Expr::raw(sql))
    }

    pub fn to_string_constant(&self, text: impl Into<String>) -> InsertBuilder {
        self.to_expr(Expr::string(text))
    }

    pub fn to_expr(&self, expr: impl Into<Expr>) -> InsertBuilder {
        let expr = expr.into();
        self.draft.borrow_mut().push_column(&self.column, expr);
        self.finish()
    }

    fn finish(&self) -> InsertBuilder {
        InsertBuilder {
            draft: self.draft.clone(),
        }
    }
}
