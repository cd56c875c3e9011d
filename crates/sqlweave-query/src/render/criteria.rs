//! Rendering of criteria chains, conditions and expressions.

use sqlweave_core::{Clause, RenderError, Result, SqlType, Value};

use super::alias::TableAliasResolver;
use super::context::RenderingContext;
use super::statement::render_select_body;
use crate::case::{CaseExpr, CaseKind, SimpleCondition};
use crate::condition::{Condition, ConditionKind};
use crate::criterion::{AndOrCriterion, Connector, CriteriaChain, Criterion};
use crate::expr::Expr;
use crate::select::SelectModel;

/// The rendered text of a chain and how many of its entries rendered.
#[derive(Debug, Default)]
pub(crate) struct ChainFragment {
    pub sql: String,
    pub terms: usize,
}

impl ChainFragment {
    /// Append a rendered entry. The first entry to arrive is the root and
    /// is written without its connector.
    fn push(&mut self, connector: Option<Connector>, fragment: &str) {
        if self.terms > 0 {
            self.sql.push(' ');
            self.sql
                .push_str(connector.map_or("and", |connector| connector.as_sql()));
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
        self.terms += 1;
    }

    fn finish(self) -> Option<Self> {
        if self.terms == 0 { None } else { Some(self) }
    }

    /// Parenthesise when more than one entry rendered.
    fn into_compound(self) -> String {
        if self.terms > 1 {
            format!("({})", self.sql)
        } else {
            self.sql
        }
    }
}

/// Render `initial` followed by `sub_criteria`, dropping entries that do not
/// render and re-rooting on the first one that does.
pub(crate) fn render_chain(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    initial: Option<&Criterion>,
    sub_criteria: &[AndOrCriterion],
) -> Result<Option<ChainFragment>> {
    let mut fragment = ChainFragment::default();
    if let Some(initial) = initial {
        match render_criterion(ctx, resolver, initial)? {
            Some(sql) => fragment.push(None, &sql),
            None => tracing::trace!("initial criterion skipped"),
        }
    }
    render_entries(ctx, resolver, sub_criteria, &mut fragment)?;
    Ok(fragment.finish())
}

fn render_entries(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    entries: &[AndOrCriterion],
    fragment: &mut ChainFragment,
) -> Result<()> {
    for entry in entries {
        match render_criterion(ctx, resolver, &entry.criterion)? {
            Some(sql) => fragment.push(Some(entry.connector), &sql),
            None => tracing::trace!(connector = entry.connector.as_sql(), "criterion skipped"),
        }
    }
    Ok(())
}

/// Render a declared WHERE/HAVING clause. `Ok(None)` means the clause is
/// absent from the statement.
pub(crate) fn render_clause(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    chain: Option<&CriteriaChain>,
    clause: Clause,
    non_rendering_allowed: bool,
) -> Result<Option<String>> {
    let Some(chain) = chain else {
        return Ok(None);
    };
    match render_chain(ctx, resolver, chain.initial.as_ref(), &chain.sub_criteria)? {
        Some(fragment) => Ok(Some(fragment.sql)),
        None if non_rendering_allowed => {
            tracing::trace!(clause = %clause, "clause rendered nothing and was omitted");
            Ok(None)
        }
        None => Err(RenderError::non_rendering(clause).into()),
    }
}

fn render_criterion(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    criterion: &Criterion,
) -> Result<Option<String>> {
    match criterion {
        Criterion::Column {
            column,
            condition,
            sub_criteria,
        } => {
            let mut fragment = ChainFragment::default();
            if condition.should_render() {
                let sql = render_condition(ctx, resolver, column, condition)?;
                fragment.push(None, &sql);
            }
            render_entries(ctx, resolver, sub_criteria, &mut fragment)?;
            Ok(fragment.finish().map(ChainFragment::into_compound))
        }
        Criterion::Exists {
            select,
            sub_criteria,
        } => {
            let mut fragment = ChainFragment::default();
            let sql = format!("exists ({})", render_subquery(ctx, resolver, select)?);
            fragment.push(None, &sql);
            render_entries(ctx, resolver, sub_criteria, &mut fragment)?;
            Ok(fragment.finish().map(ChainFragment::into_compound))
        }
        Criterion::Group {
            initial,
            sub_criteria,
        } => Ok(render_chain(ctx, resolver, initial.as_deref(), sub_criteria)?
            .map(|fragment| format!("({})", fragment.sql))),
        Criterion::Not(inner) => {
            Ok(render_criterion(ctx, resolver, inner)?.map(|sql| format!("not {}", sql)))
        }
    }
}

/// Render `<left> <operator fragment>`.
pub(crate) fn render_condition(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    left: &Expr,
    condition: &Condition,
) -> Result<String> {
    let mut left_sql = render_expr(ctx, resolver, left)?;
    if matches!(
        condition.kind(),
        ConditionKind::Like {
            case_insensitive: true,
            ..
        }
    ) {
        left_sql = format!("upper({})", left_sql);
    }
    let operator = render_operator(ctx, resolver, left.sql_type(), condition)?;
    Ok(format!("{} {}", left_sql, operator))
}

/// Render the operator and right-hand side of a condition, e.g. `in (:p1,:p2)`.
fn render_operator(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    hint: Option<&SqlType>,
    condition: &Condition,
) -> Result<String> {
    let sql = match condition.kind() {
        ConditionKind::IsNull => "is null".to_string(),
        ConditionKind::IsNotNull => "is not null".to_string(),
        ConditionKind::Compare { op, value } => {
            format!("{} {}", op.as_sql(), ctx.bind(value.clone(), hint))
        }
        ConditionKind::Like {
            negated,
            case_insensitive,
            value,
        } => {
            let value = if *case_insensitive {
                upper_case(value)
            } else {
                value.clone()
            };
            let keyword = if *negated { "not like" } else { "like" };
            format!("{} {}", keyword, ctx.bind(value, hint))
        }
        ConditionKind::Between { negated, low, high } => {
            let keyword = if *negated { "not between" } else { "between" };
            let low = ctx.bind(low.clone(), hint);
            let high = ctx.bind(high.clone(), hint);
            format!("{} {} and {}", keyword, low, high)
        }
        ConditionKind::In {
            negated, values, ..
        } => {
            let keyword = if *negated { "not in" } else { "in" };
            let placeholders: Vec<String> = values
                .iter()
                .map(|value| ctx.bind(value.clone(), hint))
                .collect();
            format!("{} ({})", keyword, placeholders.join(","))
        }
        ConditionKind::Custom { operator, value } => {
            format!("{} {}", operator, ctx.bind(value.clone(), hint))
        }
        ConditionKind::CompareColumn { op, other } => {
            format!("{} {}", op.as_sql(), render_expr(ctx, resolver, other)?)
        }
        ConditionKind::CompareSelect { op, select } => {
            format!("{} ({})", op.as_sql(), render_subquery(ctx, resolver, select)?)
        }
        ConditionKind::InSelect { negated, select } => {
            let keyword = if *negated { "not in" } else { "in" };
            format!("{} ({})", keyword, render_subquery(ctx, resolver, select)?)
        }
    };
    Ok(sql)
}

fn upper_case(value: &Value) -> Value {
    match value {
        Value::Text(text) => Value::Text(text.to_uppercase()),
        other => other.clone(),
    }
}

fn render_subquery(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    select: &SelectModel,
) -> Result<String> {
    render_select_body(ctx, select, Some(resolver))
}

/// Render an expression without its select-list alias.
pub(crate) fn render_expr(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    expr: &Expr,
) -> Result<String> {
    let sql = match expr {
        Expr::Column(column) => resolver.column_name(column),
        Expr::Constant(sql) => sql.clone(),
        Expr::StringConstant(text) => format!("'{}'", text.replace('\'', "''")),
        Expr::Value { value, sql_type } => ctx.bind(value.clone(), sql_type.as_ref()),
        Expr::Function {
            name,
            args,
            distinct,
        } => {
            let args = args
                .iter()
                .map(|arg| render_expr(ctx, resolver, arg))
                .collect::<Result<Vec<_>>>()?;
            let distinct = if *distinct { "distinct " } else { "" };
            format!("{}({}{})", name, distinct, args.join(", "))
        }
        Expr::CountAll => "count(*)".to_string(),
        Expr::Case(case) => render_case(ctx, resolver, case)?,
        Expr::Subquery(select) => format!("({})", render_subquery(ctx, resolver, select)?),
        Expr::Aliased { expr, .. } => render_expr(ctx, resolver, expr)?,
    };
    Ok(sql)
}

/// Render a select-list item, appending ` as <alias>` when aliased.
pub(crate) fn render_select_item(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    expr: &Expr,
) -> Result<String> {
    let sql = render_expr(ctx, resolver, expr)?;
    Ok(match expr.alias() {
        Some(alias) => format!("{} as {}", sql, alias),
        None => sql,
    })
}

fn render_case(
    ctx: &mut RenderingContext<'_>,
    resolver: &TableAliasResolver,
    case: &CaseExpr,
) -> Result<String> {
    let mut sql = String::from("case");
    let mut arms = 0usize;
    match &case.kind {
        CaseKind::Searched(whens) => {
            for when in whens {
                let condition = &when.condition;
                let Some(fragment) = render_chain(
                    ctx,
                    resolver,
                    condition.initial.as_ref(),
                    &condition.sub_criteria,
                )?
                else {
                    tracing::trace!("case arm skipped");
                    continue;
                };
                let then = render_expr(ctx, resolver, &when.then)?;
                sql.push_str(&format!(" when {} then {}", fragment.sql, then));
                arms += 1;
            }
        }
        CaseKind::Simple { operand, whens } => {
            sql.push(' ');
            sql.push_str(&render_expr(ctx, resolver, operand)?);
            let hint = operand.sql_type();
            for when in whens {
                let matches: Vec<String> = match &when.condition {
                    SimpleCondition::Values(values) => values
                        .iter()
                        .map(|value| ctx.bind(value.clone(), hint))
                        .collect(),
                    SimpleCondition::Conditions(conditions) => conditions
                        .iter()
                        .filter(|condition| condition.should_render())
                        .map(|condition| render_operator(ctx, resolver, hint, condition))
                        .collect::<Result<Vec<_>>>()?,
                };
                if matches.is_empty() {
                    tracing::trace!("case arm skipped");
                    continue;
                }
                let then = render_expr(ctx, resolver, &when.then)?;
                sql.push_str(&format!(" when {} then {}", matches.join(", "), then));
                arms += 1;
            }
        }
    }
    if arms == 0 {
        return Err(RenderError::empty(Clause::Case).into());
    }
    if let Some(else_) = &case.else_ {
        sql.push_str(" else ");
        sql.push_str(&render_expr(ctx, resolver, else_)?);
    }
    sql.push_str(" end");
    Ok(sql)
}
