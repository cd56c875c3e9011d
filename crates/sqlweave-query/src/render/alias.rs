//! Table alias resolution.

use std::collections::HashMap;

use crate::select::QueryExpressionModel;
use crate::table::{SqlColumn, TableExpr, TableId, TableSource};

/// Decides how column references are qualified within one query expression.
///
/// Tables named in FROM and JOIN are registered with their alias, if any,
/// keyed by table instance so the two sides of a self-join stay distinct.
/// Once a join is present qualification is guaranteed: every column of a
/// registered table is prefixed with its alias or, lacking one, the table
/// name. Sub-queries get a child resolver that falls back to the enclosing
/// query's tables for correlated references.
#[derive(Debug, Clone, Default)]
pub struct TableAliasResolver {
    tables: HashMap<TableId, Option<String>>,
    guaranteed: bool,
    parent: Option<Box<TableAliasResolver>>,
}

impl TableAliasResolver {
    /// A resolver that never qualifies (beyond explicit qualifiers).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_query(query: &QueryExpressionModel, parent: Option<&TableAliasResolver>) -> Self {
        let mut resolver = Self {
            tables: HashMap::new(),
            guaranteed: !query.joins.is_empty(),
            parent: parent.map(|p| Box::new(p.clone())),
        };
        resolver.register(&query.table);
        for join in &query.joins {
            resolver.register(&join.table);
        }
        resolver
    }

    fn register(&mut self, table: &TableExpr) {
        if let TableSource::Table(t) = &table.source {
            self.tables.insert(t.id(), table.alias.clone());
        }
    }

    pub fn is_guaranteed(&self) -> bool {
        self.guaranteed
    }

    /// The qualifier for columns of the table instance `table`, named `name`.
    pub fn qualifier<'a>(&'a self, table: TableId, name: &'a str) -> Option<&'a str> {
        if let Some(alias) = self.tables.get(&table) {
            return match alias {
                Some(alias) => Some(alias.as_str()),
                None if self.guaranteed => Some(name),
                None => None,
            };
        }
        if let Some(parent) = &self.parent {
            return parent.qualifier(table, name);
        }
        if self.guaranteed { Some(name) } else { None }
    }

    /// Render a column reference, e.g. `a.id`.
    pub fn column_name(&self, column: &SqlColumn) -> String {
        let qualifier = column.qualifier().or_else(|| {
            let table = column.table_id()?;
            self.qualifier(table, column.table_name()?)
        });
        match qualifier {
            Some(qualifier) => format!("{}.{}", qualifier, column.name()),
            None => column.name().to_string(),
        }
    }
}
