//! Codecs for the buffer-backed and indexed value kinds
//!
//! Each handler reduces its value to a type reference plus arguments and
//! delegates nested arrays and indexes back to the pickler, so shared
//! sub-values are memoized across handlers.

mod array;
mod index;
mod scalar;
mod series;
mod table;

pub use array::ArrayHandler;
pub use index::{DatetimeIndexHandler, IndexHandler};
pub use scalar::ScalarHandler;
pub use series::SeriesHandler;
pub use table::TableHandler;

use ndpickle_core::{Index, NdArray, NdPickleError, Result, TypeTag, Value};
use ndpickle_host::Unpickler;
use serde_json::Value as Json;
use std::sync::Arc;

/// Error for a value dispatched to a handler of another kind
fn mismatched(tag: TypeTag, value: &Value) -> NdPickleError {
    NdPickleError::unsupported_type(format!(
        "'{}' handler cannot reduce {}",
        tag,
        value.type_name()
    ))
}

/// Decode an argument that must be an array
fn restore_array(
    unpickler: &mut Unpickler<'_>,
    tag: TypeTag,
    json: &Json,
) -> Result<Arc<NdArray>> {
    match unpickler.restore(json)? {
        Value::Array(array) => Ok(array),
        other => Err(NdPickleError::format(format!(
            "'{}' expected an array argument, got {}",
            tag,
            other.type_name()
        ))),
    }
}

/// Decode an argument that must be an index
fn restore_index(unpickler: &mut Unpickler<'_>, tag: TypeTag, json: &Json) -> Result<Arc<Index>> {
    match unpickler.restore(json)? {
        Value::Index(index) => Ok(index),
        other => Err(NdPickleError::format(format!(
            "'{}' expected an index argument, got {}",
            tag,
            other.type_name()
        ))),
    }
}
