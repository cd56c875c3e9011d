//! Statement-level rendering: SELECT and the DML statements.

use sqlweave_core::{Clause, RenderError, Result};

use super::alias::TableAliasResolver;
use super::context::RenderingContext;
use super::criteria::{render_chain, render_clause, render_expr, render_select_item};
use super::strategy::PlaceholderStrategy;
use super::RenderedStatement;
use crate::builder::{DeleteModel, InsertModel, UpdateModel};
use crate::clause::OrderBy;
use crate::expr::Expr;
use crate::paging::PagingModel;
use crate::select::{QueryExpressionModel, SelectModel};
use crate::table::{SqlColumn, TableExpr, TableSource};

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn render_select(
    model: &SelectModel,
    strategy: &dyn PlaceholderStrategy,
) -> Result<RenderedStatement> {
    let mut ctx = RenderingContext::new(strategy);
    let sql = render_select_body(&mut ctx, model, None)?;
    Ok(finish("select", sql, ctx))
}

fn finish(kind: &str, sql: String, ctx: RenderingContext<'_>) -> RenderedStatement {
    let parameters = ctx.into_parameters();
    tracing::debug!(
        statement = kind,
        sql = %sql,
        parameters = parameters.len(),
        "Rendered statement"
    );
    RenderedStatement { sql, parameters }
}

/// Render a select statement into an existing context. `parent` is the
/// resolver of the enclosing query when this is a sub-query.
pub(crate) fn render_select_body(
    ctx: &mut RenderingContext<'_>,
    model: &SelectModel,
    parent: Option<&TableAliasResolver>,
) -> Result<String> {
    let mut sql = String::new();
    for query in &model.queries {
        if let Some(connector) = query.connector {
            sql.push(' ');
            sql.push_str(connector.as_sql());
            sql.push(' ');
        }
        sql.push_str(&render_query_expression(ctx, model, query, parent)?);
    }
    if let Some(order_by) = &model.order_by {
        sql.push_str(" order by ");
        sql.push_str(&render_order_by(ctx, order_by)?);
    }
    if let Some(paging) = &model.paging {
        sql.push(' ');
        sql.push_str(&render_paging(ctx, paging));
    }
    Ok(sql)
}

fn render_query_expression(
    ctx: &mut RenderingContext<'_>,
    model: &SelectModel,
    query: &QueryExpressionModel,
    parent: Option<&TableAliasResolver>,
) -> Result<String> {
    let resolver = TableAliasResolver::for_query(query, parent);
    let configuration = &model.configuration;

    let mut sql = String::from("select ");
    if query.distinct {
        sql.push_str("distinct ");
    }
    let columns = query
        .select_list
        .iter()
        .map(|expr| render_select_item(ctx, &resolver, expr))
        .collect::<Result<Vec<_>>>()?;
    sql.push_str(&columns.join(", "));

    sql.push_str(" from ");
    sql.push_str(&render_table_expr(ctx, &resolver, &query.table)?);

    for join in &query.joins {
        let table = render_table_expr(ctx, &resolver, &join.table)?;
        let on = render_chain(ctx, &resolver, join.on.initial.as_ref(), &join.on.sub_criteria)?
            .ok_or_else(|| RenderError::non_rendering(Clause::JoinOn))?;
        sql.push_str(&format!(" {} {} on {}", join.join_type.as_sql(), table, on.sql));
    }

    if let Some(where_sql) = render_clause(
        ctx,
        &resolver,
        query.where_clause.as_ref(),
        Clause::Where,
        configuration.non_rendering_where_allowed,
    )? {
        sql.push_str(" where ");
        sql.push_str(&where_sql);
    }

    if let Some(group_by) = &query.group_by {
        let columns = group_by
            .iter()
            .map(|expr| render_expr(ctx, &resolver, expr))
            .collect::<Result<Vec<_>>>()?;
        sql.push_str(" group by ");
        sql.push_str(&columns.join(", "));
    }

    if let Some(having_sql) = render_clause(
        ctx,
        &resolver,
        query.having.as_ref(),
        Clause::Having,
        configuration.non_rendering_having_allowed,
    )? {
        sql.push_str(" having ");
        sql.push_str(&having_sql);
    }

    Ok(sql)
}

fn render_table_expr(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    table: &TableExpr,
) -> Result<String> {
    let base = match &table.source {
        TableSource::Table(table) => table.qualified_name(),
        TableSource::Subquery(select) => {
            format!("({})", render_select_body(ctx, select, Some(resolver))?)
        }
    };
    Ok(match &table.alias {
        Some(alias) => format!("{} {}", base, alias),
        None => base,
    })
}

/// ORDER BY applies to the whole statement, so columns render by their
/// select-list alias or bare name rather than through a table alias.
fn render_order_by(ctx: &mut RenderingContext<'_>, specs: &[OrderBy]) -> Result<String> {
    let resolver = TableAliasResolver::empty();
    let mut rendered = Vec::with_capacity(specs.len());
    for spec in specs {
        let base = match (&spec.expr, spec.expr.alias()) {
            (_, Some(alias)) => alias.to_string(),
            (Expr::Column(column), None) => resolver.column_name(column),
            (expr, None) => render_expr(ctx, &resolver, expr)?,
        };
        rendered.push(format!("{}{}", base, spec.suffix()));
    }
    Ok(rendered.join(", "))
}

fn render_paging(ctx: &mut RenderingContext<'_>, paging: &PagingModel) -> String {
    let mut bind = |n: i64| ctx.bind(sqlweave_core::Value::BigInt(n), None);
    match *paging {
        PagingModel::LimitOffset { limit, offset } => {
            let mut sql = format!("limit {}", bind(limit));
            if let Some(offset) = offset {
                sql.push_str(&format!(" offset {}", bind(offset)));
            }
            sql
        }
        PagingModel::OffsetFetch {
            offset,
            fetch_first,
        } => {
            let mut parts = Vec::with_capacity(2);
            if let Some(offset) = offset {
                parts.push(format!("offset {} rows", bind(offset)));
            }
            if let Some(rows) = fetch_first {
                parts.push(format!("fetch first {} rows only", bind(rows)));
            }
            parts.join(" ")
        }
    }
}

/// Render `column = <value>` for SET lists, binding plain values with the
/// column's type hint.
fn render_assignment(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    column: &SqlColumn,
    value: &Expr,
) -> Result<String> {
    Ok(format!(
        "{} = {}",
        column.name(),
        render_value(ctx, resolver, column, value)?
    ))
}

fn render_value(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    column: &SqlColumn,
    value: &Expr,
) -> Result<String> {
    match value {
        Expr::Value { value, sql_type } => {
            Ok(ctx.bind(value.clone(), sql_type.as_ref().or(column.sql_type())))
        }
        other => render_expr(ctx, resolver, other),
    }
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn render_update(
    model: &UpdateModel,
    strategy: &dyn PlaceholderStrategy,
) -> Result<RenderedStatement> {
    let mut ctx = RenderingContext::new(strategy);
    let resolver = TableAliasResolver::empty();
    if model.set.is_empty() {
        return Err(RenderError::empty(Clause::Set).into());
    }
    let assignments = model
        .set
        .iter()
        .map(|entry| render_assignment(&mut ctx, &resolver, &entry.column, &entry.value))
        .collect::<Result<Vec<_>>>()?;
    let mut sql = format!(
        "update {} set {}",
        model.table.qualified_name(),
        assignments.join(", ")
    );
    if let Some(where_sql) = render_clause(
        &mut ctx,
        &resolver,
        model.where_clause.as_ref(),
        Clause::Where,
        model.configuration.non_rendering_where_allowed,
    )? {
        sql.push_str(" where ");
        sql.push_str(&where_sql);
    }
    Ok(finish("update", sql, ctx))
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn render_delete(
    model: &DeleteModel,
    strategy: &dyn PlaceholderStrategy,
) -> Result<RenderedStatement> {
    let mut ctx = RenderingContext::new(strategy);
    let resolver = TableAliasResolver::empty();
    let mut sql = format!("delete from {}", model.table.qualified_name());
    if let Some(where_sql) = render_clause(
        &mut ctx,
        &resolver,
        model.where_clause.as_ref(),
        Clause::Where,
        model.configuration.non_rendering_where_allowed,
    )? {
        sql.push_str(" where ");
        sql.push_str(&where_sql);
    }
    Ok(finish("delete", sql, ctx))
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn render_insert(
    model: &InsertModel,
    strategy: &dyn PlaceholderStrategy,
) -> Result<RenderedStatement> {
    let mut ctx = RenderingContext::new(strategy);
    let resolver = TableAliasResolver::empty();
    if model.values.is_empty() {
        return Err(RenderError::empty(Clause::Values).into());
    }
    let mut columns = Vec::with_capacity(model.values.len());
    let mut values = Vec::with_capacity(model.values.len());
    for entry in &model.values {
        columns.push(entry.column.name().to_string());
        values.push(render_value(&mut ctx, &resolver, &entry.column, &entry.value)?);
    }
    let sql = format!(
        "insert into {} ({}) values ({})",
        model.table.qualified_name(),
        columns.join(", "),
        values.join(", ")
    );
    Ok(finish("insert", sql, ctx))
}
