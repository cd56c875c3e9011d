//! SQL type hints.

use serde::{Deserialize, Serialize};

/// SQL data types used as binding hints.
///
/// A column may carry a type so that placeholder strategies which need an
/// explicit target type (for example when binding NULL) can emit one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    // Integer types
    TinyInt,
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,

    // Fixed precision
    Numeric { precision: u8, scale: u8 },
    Decimal { precision: u8, scale: u8 },

    // Boolean
    Boolean,

    // String types
    Char(u32),
    VarChar(u32),
    Text,

    // Binary types
    Binary(u32),
    VarBinary(u32),
    Blob,

    // Date/time types
    Date,
    Time,
    Timestamp,
    TimestampTz,

    Uuid,
    Json,

    Array(Box<SqlType>),

    /// Any other type name, passed through verbatim.
    Custom(String),
}

impl SqlType {
    /// Get the full SQL type name, including length or precision.
    pub fn sql_name(&self) -> String {
        match self {
            SqlType::Numeric { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            SqlType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            SqlType::Char(len) => format!("CHAR({})", len),
            SqlType::VarChar(len) => format!("VARCHAR({})", len),
            SqlType::Binary(len) => format!("BINARY({})", len),
            SqlType::VarBinary(len) => format!("VARBINARY({})", len),
            SqlType::Array(inner) => format!("{}[]", inner.sql_name()),
            other => other.type_code().to_string(),
        }
    }

    /// Get the bare type code without length or precision.
    ///
    /// This is what templated placeholders put in their type attribute,
    /// e.g. `VARCHAR` for `VarChar(64)`.
    pub fn type_code(&self) -> &str {
        match self {
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric { .. } => "NUMERIC",
            SqlType::Decimal { .. } => "DECIMAL",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Char(_) => "CHAR",
            SqlType::VarChar(_) => "VARCHAR",
            SqlType::Text => "TEXT",
            SqlType::Binary(_) => "BINARY",
            SqlType::VarBinary(_) => "VARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::TimestampTz => "TIMESTAMP_WITH_TIMEZONE",
            SqlType::Uuid => "UUID",
            SqlType::Json => "JSON",
            SqlType::Array(_) => "ARRAY",
            SqlType::Custom(name) => name,
        }
    }

    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::Double
                | SqlType::Numeric { .. }
                | SqlType::Decimal { .. }
        )
    }

    /// Check if this type is text-based.
    pub const fn is_text(&self) -> bool {
        matches!(self, SqlType::Char(_) | SqlType::VarChar(_) | SqlType::Text)
    }

    /// Check if this type is a date/time type.
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            SqlType::Date | SqlType::Time | SqlType::Timestamp | SqlType::TimestampTz
        )
    }
}
