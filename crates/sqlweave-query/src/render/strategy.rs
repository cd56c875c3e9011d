//! Placeholder strategies.
//!
//! A strategy turns a parameter key into the literal placeholder text a
//! downstream consumer expects. The renderer never looks at the result.

use sqlweave_core::SqlType;

use super::context::ParameterKey;

/// Maps a parameter key (and optional type hint) to placeholder text.
pub trait PlaceholderStrategy: Send + Sync {
    fn placeholder(&self, key: ParameterKey, sql_type: Option<&SqlType>) -> String;
}

/// Native driver placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL dialect (uses $1, $2 placeholders)
    #[default]
    Postgres,
    /// SQLite dialect (uses ?1, ?2 placeholders)
    Sqlite,
    /// MySQL dialect (uses ? placeholders)
    Mysql,
}

impl Dialect {
    /// Generate a placeholder for the given parameter index (1-based).
    pub fn placeholder_for(self, index: u32) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Mysql => "?".to_string(),
        }
    }
}

impl PlaceholderStrategy for Dialect {
    fn placeholder(&self, key: ParameterKey, _sql_type: Option<&SqlType>) -> String {
        self.placeholder_for(key.index())
    }
}

/// `:p1`, `:p2`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamedColon;

impl PlaceholderStrategy for NamedColon {
    fn placeholder(&self, key: ParameterKey, _sql_type: Option<&SqlType>) -> String {
        format!(":{}", key)
    }
}

/// Template-engine placeholders such as `#{parameters.p1,jdbcType=INTEGER}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templated {
    prefix: String,
    type_attribute: Option<String>,
}

impl Default for Templated {
    fn default() -> Self {
        Self {
            prefix: "parameters".to_string(),
            type_attribute: Some("jdbcType".to_string()),
        }
    }
}

impl Templated {
    /// Placeholders of the form `#{<prefix>.p1}`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Name of the attribute carrying the type hint; `None` drops hints.
    pub fn with_type_attribute(mut self, attribute: Option<&str>) -> Self {
        self.type_attribute = attribute.map(str::to_string);
        self
    }
}

impl PlaceholderStrategy for Templated {
    fn placeholder(&self, key: ParameterKey, sql_type: Option<&SqlType>) -> String {
        match (&self.type_attribute, sql_type) {
            (Some(attribute), Some(sql_type)) => format!(
                "#{{{}.{},{}={}}}",
                self.prefix,
                key,
                attribute,
                sql_type.type_code()
            ),
            _ => format!("#{{{}.{}}}", self.prefix, key),
        }
    }
}
