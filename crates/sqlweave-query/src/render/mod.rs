//! The rendering engine.
//!
//! Rendering walks a built statement once, in SQL text order, and produces
//! the SQL string together with the parameters it bound. Parameters are
//! numbered `p1..pN` from a single sequence per render call; sub-queries,
//! case expressions and paging values draw from the same sequence. Rendering
//! holds no state between calls, so a model can be rendered any number of
//! times, from any thread, with identical results.

mod alias;
mod context;
mod criteria;
mod statement;
mod strategy;

use serde::Serialize;

pub use alias::TableAliasResolver;
pub use context::{ParameterKey, Parameters, RenderingContext};
pub use strategy::{Dialect, NamedColon, PlaceholderStrategy, Templated};

pub(crate) use statement::{render_delete, render_insert, render_select, render_update};

/// SQL text plus the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStatement {
    pub sql: String,
    pub parameters: Parameters,
}

impl RenderedStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}
