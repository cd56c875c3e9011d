//! Tables, columns and table expressions.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::clause::OrderBy;
use crate::select::SelectModel;
use sqlweave_core::SqlType;

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one `SqlTable` instance.
///
/// Clones share it. Tables constructed separately never do, even when they
/// name the same database table, which is what lets a self-join give each
/// side its own alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(u64);

impl TableId {
    fn next() -> Self {
        Self(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A database table, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTable {
    id: TableId,
    name: String,
    schema: Option<String>,
}

impl SqlTable {
    /// Create a table reference with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TableId::next(),
            name: name.into(),
            schema: None,
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// Qualify the table with a schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The name used in FROM clauses, e.g. `sales.orders`.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// Create a column belonging to this table.
    pub fn column(&self, name: impl Into<String>) -> SqlColumn {
        SqlColumn {
            table: Some(ColumnTable {
                id: self.id,
                name: self.qualified_name(),
            }),
            name: name.into(),
            alias: None,
            qualifier: None,
            sql_type: None,
        }
    }

    /// Use this table in a FROM or JOIN under an alias.
    pub fn aliased(&self, alias: impl Into<String>) -> TableExpr {
        TableExpr::table(self.clone()).aliased(alias)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ColumnTable {
    id: TableId,
    name: String,
}

/// A column reference.
///
/// Columns remember which table they belong to so the renderer can qualify
/// them with that table's alias (or name, once joins are present).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumn {
    table: Option<ColumnTable>,
    name: String,
    alias: Option<String>,
    qualifier: Option<String>,
    sql_type: Option<SqlType>,
}

impl SqlColumn {
    /// A free-standing column not tied to any table, e.g. a column of a
    /// derived table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
            alias: None,
            qualifier: None,
            sql_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified name of the owning table, if any.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_ref().map(|table| table.name.as_str())
    }

    /// Identity of the owning table instance, if any.
    pub fn table_id(&self) -> Option<TableId> {
        self.table.as_ref().map(|table| table.id)
    }

    /// Select-list alias (`col as alias`).
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Explicit qualifier overriding alias resolution.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn sql_type(&self) -> Option<&SqlType> {
        self.sql_type.as_ref()
    }

    /// Attach a type hint used when binding values against this column.
    pub fn with_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    /// Give the column a select-list alias.
    pub fn aliased(&self, alias: impl Into<String>) -> Self {
        let mut column = self.clone();
        column.alias = Some(alias.into());
        column
    }

    /// Render this column with the given qualifier regardless of table aliases.
    pub fn qualified_with(&self, qualifier: impl Into<String>) -> Self {
        let mut column = self.clone();
        column.qualifier = Some(qualifier.into());
        column
    }

    /// Ascending sort on this column.
    pub fn asc(&self) -> OrderBy {
        OrderBy::asc(self.clone())
    }

    /// Descending sort on this column.
    pub fn desc(&self) -> OrderBy {
        OrderBy::desc(self.clone())
    }
}

/// What a FROM or JOIN reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Table(SqlTable),
    Subquery(Box<SelectModel>),
}

/// A table source plus its optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExpr {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl TableExpr {
    pub fn table(table: SqlTable) -> Self {
        Self {
            source: TableSource::Table(table),
            alias: None,
        }
    }

    /// A derived table. Its parameters are numbered in the same sequence as
    /// the enclosing statement.
    pub fn subquery(select: SelectModel) -> Self {
        Self {
            source: TableSource::Subquery(Box::new(select)),
            alias: None,
        }
    }

    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The backing table, when this is not a derived table.
    pub fn as_table(&self) -> Option<&SqlTable> {
        match &self.source {
            TableSource::Table(table) => Some(table),
            TableSource::Subquery(_) => None,
        }
    }

    pub(crate) fn is_named(&self) -> bool {
        match &self.source {
            TableSource::Table(table) => !table.name().is_empty(),
            TableSource::Subquery(_) => true,
        }
    }
}

impl From<SqlTable> for TableExpr {
    fn from(table: SqlTable) -> Self {
        TableExpr::table(table)
    }
}

impl From<&SqlTable> for TableExpr {
    fn from(table: &SqlTable) -> Self {
        TableExpr::table(table.clone())
    }
}

impl From<SelectModel> for TableExpr {
    fn from(select: SelectModel) -> Self {
        TableExpr::subquery(select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_knows_its_table() {
        let person = SqlTable::new("person");
        let id = person.column("id");
        assert_eq!(id.table_name(), Some("person"));
        assert_eq!(id.name(), "id");
        assert_eq!(id.alias(), None);
    }

    #[test]
    fn test_table_identity_survives_clone_only() {
        let person = SqlTable::new("person");
        let other = SqlTable::new("person");
        assert_eq!(person.clone().id(), person.id());
        assert_ne!(person.id(), other.id());
        assert_ne!(person, other);
        assert_eq!(person.column("id").table_id(), Some(person.id()));
        let qualified = person.clone().with_schema("app");
        assert_eq!(qualified.column("id").table_id(), Some(person.id()));
    }

    #[test]
    fn test_schema_qualified_table() {
        let orders = SqlTable::new("orders").with_schema("sales");
        assert_eq!(orders.qualified_name(), "sales.orders");
        assert_eq!(orders.column("id").table_name(), Some("sales.orders"));
    }

    #[test]
    fn test_aliased_column_keeps_original() {
        let person = SqlTable::new("person");
        let id = person.column("id");
        let aliased = id.aliased("person_id");
        assert_eq!(aliased.alias(), Some("person_id"));
        assert_eq!(id.alias(), None);
    }

    #[test]
    fn test_table_expr_alias() {
        let person = SqlTable::new("person");
        let expr = person.aliased("p");
        assert_eq!(expr.alias.as_deref(), Some("p"));
        assert_eq!(expr.as_table(), Some(&person));
        assert!(expr.is_named());
        assert!(!TableExpr::from(SqlTable::new("")).is_named());
    }
}
