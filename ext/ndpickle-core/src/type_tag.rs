use crate::{IndexKind, NdPickleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identity of every value kind that has its own codec
///
/// The serialized names are what type references carry on the wire, so
/// bytes written by one process resolve to the same kinds in any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    #[serde(rename = "ndarray")]
    NdArray,
    Float64,
    Int64,
    Index,
    Int64Index,
    Float64Index,
    DatetimeIndex,
    Series,
    Table,
}

impl TypeTag {
    pub const ALL: [TypeTag; 9] = [
        TypeTag::NdArray,
        TypeTag::Float64,
        TypeTag::Int64,
        TypeTag::Index,
        TypeTag::Int64Index,
        TypeTag::Float64Index,
        TypeTag::DatetimeIndex,
        TypeTag::Series,
        TypeTag::Table,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::NdArray => "ndarray",
            TypeTag::Float64 => "float64",
            TypeTag::Int64 => "int64",
            TypeTag::Index => "index",
            TypeTag::Int64Index => "int64_index",
            TypeTag::Float64Index => "float64_index",
            TypeTag::DatetimeIndex => "datetime_index",
            TypeTag::Series => "series",
            TypeTag::Table => "table",
        }
    }

    /// Index kind served by this tag, if it names an index type
    pub fn index_kind(&self) -> Option<IndexKind> {
        match self {
            TypeTag::Index => Some(IndexKind::Generic),
            TypeTag::Int64Index => Some(IndexKind::Int64),
            TypeTag::Float64Index => Some(IndexKind::Float64),
            TypeTag::DatetimeIndex => Some(IndexKind::DateTime),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = NdPickleError;

    fn from_str(s: &str) -> Result<Self> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| NdPickleError::format(format!("unknown type reference '{}'", s)))
    }
}
