//! Write precision and column metadata types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Schema metadata key carrying the column classifier.
pub const COLUMN_TYPE_KEY: &str = "iox::column::type";

/// Prefix shared by every column classifier value.
const COLUMN_TYPE_PREFIX: &str = "iox::column_type::";

/// Time unit a timestamp is rendered at in line protocol.
///
/// Points always store nanoseconds; the precision only scales the rendered value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePrecision {
    /// Nanoseconds.
    #[default]
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl WritePrecision {
    /// Number of nanoseconds in one unit of this precision.
    pub fn nanos_per_unit(self) -> i128 {
        match self {
            WritePrecision::Ns => 1,
            WritePrecision::Us => 1_000,
            WritePrecision::Ms => 1_000_000,
            WritePrecision::S => 1_000_000_000,
        }
    }
}

impl FromStr for WritePrecision {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "ns" => Ok(Self::Ns),
            "us" => Ok(Self::Us),
            "ms" => Ok(Self::Ms),
            "s" => Ok(Self::S),
            _ => Err(Error::Parse {
                message: format!("Unknown write precision: {}", input),
            }),
        }
    }
}

impl std::fmt::Display for WritePrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WritePrecision::Ns => "ns",
            WritePrecision::Us => "us",
            WritePrecision::Ms => "ms",
            WritePrecision::S => "s",
        };
        write!(f, "{}", s)
    }
}

/// Declared type of a field column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Signed 64-bit integer.
    Integer,
    /// Unsigned 64-bit integer.
    UInteger,
    /// 64-bit floating point.
    Float,
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "integer" => Ok(Self::Integer),
            "uinteger" => Ok(Self::UInteger),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "boolean" => Ok(Self::Boolean),
            _ => Err(Error::Parse {
                message: format!("Unknown field type: {}", input),
            }),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldType::Integer => "integer",
            FieldType::UInteger => "uinteger",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

/// Classifier attached to a query result column through schema metadata.
///
/// Parsed from values such as `iox::column_type::field::integer` or
/// `iox::column_type::tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// A field column, with its declared type when the server sent one.
    Field(Option<FieldType>),
    /// A tag column.
    Tag,
    /// The point timestamp.
    Timestamp,
    /// The measurement name.
    Measurement,
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::Parse {
            message: format!("Unknown column type: {}", input),
        };
        let rest = input.strip_prefix(COLUMN_TYPE_PREFIX).ok_or_else(unknown)?;
        let (category, subtype) = match rest.split_once("::") {
            Some((category, subtype)) => (category, Some(subtype)),
            None => (rest, None),
        };

        match (category, subtype) {
            ("field", None) => Ok(Self::Field(None)),
            ("field", Some(subtype)) => Ok(Self::Field(Some(subtype.parse()?))),
            ("tag", None) => Ok(Self::Tag),
            ("timestamp", None) => Ok(Self::Timestamp),
            ("measurement", None) => Ok(Self::Measurement),
            _ => Err(unknown()),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Field(None) => write!(f, "{}field", COLUMN_TYPE_PREFIX),
            ColumnType::Field(Some(t)) => write!(f, "{}field::{}", COLUMN_TYPE_PREFIX, t),
            ColumnType::Tag => write!(f, "{}tag", COLUMN_TYPE_PREFIX),
            ColumnType::Timestamp => write!(f, "{}timestamp", COLUMN_TYPE_PREFIX),
            ColumnType::Measurement => write!(f, "{}measurement", COLUMN_TYPE_PREFIX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_from_str() {
        assert_eq!("ns".parse::<WritePrecision>().unwrap(), WritePrecision::Ns);
        assert_eq!("us".parse::<WritePrecision>().unwrap(), WritePrecision::Us);
        assert_eq!("ms".parse::<WritePrecision>().unwrap(), WritePrecision::Ms);
        assert_eq!("s".parse::<WritePrecision>().unwrap(), WritePrecision::S);
        assert!("seconds".parse::<WritePrecision>().is_err());
        assert!("NS".parse::<WritePrecision>().is_err());
    }

    #[test]
    fn test_precision_display_round_trips() {
        for p in [
            WritePrecision::Ns,
            WritePrecision::Us,
            WritePrecision::Ms,
            WritePrecision::S,
        ] {
            assert_eq!(p.to_string().parse::<WritePrecision>().unwrap(), p);
        }
    }

    #[test]
    fn test_precision_default_is_ns() {
        assert_eq!(WritePrecision::default(), WritePrecision::Ns);
        assert_eq!(WritePrecision::S.nanos_per_unit(), 1_000_000_000);
    }

    #[test]
    fn test_column_type_field_subtypes() {
        assert_eq!(
            "iox::column_type::field::integer".parse::<ColumnType>().unwrap(),
            ColumnType::Field(Some(FieldType::Integer))
        );
        assert_eq!(
            "iox::column_type::field::uinteger".parse::<ColumnType>().unwrap(),
            ColumnType::Field(Some(FieldType::UInteger))
        );
        assert_eq!(
            "iox::column_type::field::float".parse::<ColumnType>().unwrap(),
            ColumnType::Field(Some(FieldType::Float))
        );
        assert_eq!(
            "iox::column_type::field::string".parse::<ColumnType>().unwrap(),
            ColumnType::Field(Some(FieldType::String))
        );
        assert_eq!(
            "iox::column_type::field::boolean".parse::<ColumnType>().unwrap(),
            ColumnType::Field(Some(FieldType::Boolean))
        );
        assert_eq!(
            "iox::column_type::field".parse::<ColumnType>().unwrap(),
            ColumnType::Field(None)
        );
    }

    #[test]
    fn test_column_type_categories() {
        assert_eq!(
            "iox::column_type::tag".parse::<ColumnType>().unwrap(),
            ColumnType::Tag
        );
        assert_eq!(
            "iox::column_type::timestamp".parse::<ColumnType>().unwrap(),
            ColumnType::Timestamp
        );
        assert_eq!(
            "iox::column_type::measurement".parse::<ColumnType>().unwrap(),
            ColumnType::Measurement
        );
    }

    #[test]
    fn test_column_type_rejects_unknown() {
        assert!("iox::column_type::field::decimal".parse::<ColumnType>().is_err());
        assert!("iox::column_type::tag::string".parse::<ColumnType>().is_err());
        assert!("iox::column_type::other".parse::<ColumnType>().is_err());
        assert!("field::integer".parse::<ColumnType>().is_err());
        assert!("".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_column_type_display_round_trips() {
        for t in [
            ColumnType::Field(None),
            ColumnType::Field(Some(FieldType::UInteger)),
            ColumnType::Tag,
            ColumnType::Timestamp,
            ColumnType::Measurement,
        ] {
            assert_eq!(t.to_string().parse::<ColumnType>().unwrap(), t);
        }
    }
}
