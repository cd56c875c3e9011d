//! Error types for sqlweave operations.

use std::fmt;

/// The primary error type for all sqlweave operations.
#[derive(Debug)]
pub enum Error {
    /// A builder was used in a way that cannot produce a statement
    Build(BuildError),
    /// A built statement could not be rendered
    Render(RenderError),
    /// Configuration errors
    Config(ConfigError),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub kind: BuildErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// A group, case, select list or order-by finished with no entries
    EmptyGroup,
    /// A required table, column or other input was absent
    MissingArgument,
    /// An input was supplied but cannot be expressed, e.g. conflicting
    /// paging forms or a row count beyond BIGINT
    InvalidArgument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    pub kind: RenderErrorKind,
    pub clause: Clause,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    /// A declared clause rendered nothing and the configuration forbids that
    NonRenderingClause,
    /// A clause that requires at least one entry rendered none
    EmptyGroup,
}

/// The statement clause a render error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    Having,
    JoinOn,
    Case,
    Set,
    Values,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BuildError {
    pub fn empty_group(message: impl Into<String>) -> Self {
        Self {
            kind: BuildErrorKind::EmptyGroup,
            message: message.into(),
        }
    }

    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self {
            kind: BuildErrorKind::MissingArgument,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            kind: BuildErrorKind::InvalidArgument,
            message: message.into(),
        }
    }
}

impl RenderError {
    pub fn non_rendering(clause: Clause) -> Self {
        Self {
            kind: RenderErrorKind::NonRenderingClause,
            clause,
            message: format!(
                "the {} clause rendered nothing and non-rendering {} clauses are not allowed",
                clause, clause
            ),
        }
    }

    pub fn empty(clause: Clause) -> Self {
        Self {
            kind: RenderErrorKind::EmptyGroup,
            clause,
            message: format!("the {} clause has no entries to render", clause),
        }
    }
}

impl Error {
    /// Is this an empty group, case, select list or order-by?
    pub fn is_empty_group(&self) -> bool {
        match self {
            Error::Build(e) => e.kind == BuildErrorKind::EmptyGroup,
            Error::Render(e) => e.kind == RenderErrorKind::EmptyGroup,
            _ => false,
        }
    }

    /// Is this a declared clause that rendered nothing?
    pub fn is_non_rendering_clause(&self) -> bool {
        matches!(self, Error::Render(e) if e.kind == RenderErrorKind::NonRenderingClause)
    }

    /// Is this a required argument that was not supplied?
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, Error::Build(e) if e.kind == BuildErrorKind::MissingArgument)
    }

    /// Is this an argument that was supplied but cannot be expressed?
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::Build(e) if e.kind == BuildErrorKind::InvalidArgument)
    }

    /// The clause a render error refers to, if any.
    pub fn clause(&self) -> Option<Clause> {
        match self {
            Error::Render(e) => Some(e.clause),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(e) => write!(f, "Build error: {}", e),
            Error::Render(e) => write!(f, "Render error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Where => "where",
            Clause::Having => "having",
            Clause::JoinOn => "join on",
            Clause::Case => "case",
            Clause::Set => "set",
            Clause::Values => "values",
        };
        f.write_str(name)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Build(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(ConfigError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

/// Result type alias for sqlweave operations.
pub type Result<T> = std::result::Result<T, Error>;
