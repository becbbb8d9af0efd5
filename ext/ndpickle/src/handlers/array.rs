use super::mismatched;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use ndpickle_core::{DType, ErrorContext, NdArray, NdPickleError, Order, Result, TypeTag, Value};
use ndpickle_host::{check_arity, Handler, Pickler, Reduction, Unpickler};
use serde_json::Value as Json;
use tracing::trace;

/// Codec for [`NdArray`]
///
/// Arguments are `[shape, dtype, payload, order]`. Fixed-width payloads are
/// the physical buffer in base64, written and read back without relayout;
/// object payloads are a list of recursively encoded elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayHandler;

impl Handler for ArrayHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let array = value
            .as_array()
            .ok_or_else(|| mismatched(TypeTag::NdArray, value))?;
        trace!(shape = ?array.shape(), dtype = %array.dtype(), order = array.order().code(), "flattening array");

        let shape = array
            .shape()
            .iter()
            .map(|&dim| {
                i64::try_from(dim)
                    .map(Value::Int)
                    .map_err(|_| NdPickleError::unsupported_type(format!("axis length {} overflows int64", dim)))
            })
            .collect::<Result<Vec<_>>>()?;
        let shape = pickler.flatten(&Value::Tuple(shape))?;

        let payload = match (array.as_bytes(), array.objects()) {
            (Some(data), _) => Json::String(STANDARD.encode(data)),
            (None, Some(items)) => Json::Array(
                items
                    .iter()
                    .map(|item| pickler.flatten(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            (None, None) => {
                return Err(NdPickleError::unsupported_type("array without storage"))
            }
        };

        Ok(Reduction::new(
            pickler.flatten_type(TypeTag::NdArray)?,
            vec![
                shape,
                Json::String(array.dtype().to_string()),
                payload,
                Json::from(array.order().code()),
            ],
        ))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 4)?;
        let shape = restore_shape(unpickler, &args[0])?;
        let dtype: DType = args[1]
            .as_str()
            .ok_or_else(|| NdPickleError::format("array dtype must be a string"))?
            .parse()?;
        let order = args[3]
            .as_str()
            .and_then(Order::from_code)
            .ok_or_else(|| {
                NdPickleError::format(format!("array order must be \"C\" or \"F\", got {}", args[3]))
            })?;

        let array = if dtype.is_object() {
            let Json::Array(items) = &args[2] else {
                return Err(NdPickleError::format("object array payload must be a list"));
            };
            let items = items
                .iter()
                .map(|item| unpickler.restore(item))
                .collect::<Result<Vec<_>>>()?;
            NdArray::from_objects(shape, order, items).format_context("ndarray")?
        } else {
            let encoded = args[2]
                .as_str()
                .ok_or_else(|| NdPickleError::format("array payload must be a base64 string"))?;
            let data = STANDARD
                .decode(encoded)
                .map_err(|e| NdPickleError::format(format!("array payload is not base64: {}", e)))?;
            NdArray::from_bytes(shape, dtype, order, Bytes::from(data)).format_context("ndarray")?
        };
        trace!(shape = ?array.shape(), dtype = %array.dtype(), "restored array");
        Ok(Value::from(array))
    }
}

fn restore_shape(unpickler: &mut Unpickler<'_>, json: &Json) -> Result<Vec<usize>> {
    let dims = match unpickler.restore(json)? {
        Value::Tuple(dims) | Value::List(dims) => dims,
        other => {
            return Err(NdPickleError::format(format!(
                "array shape must be a tuple, got {}",
                other.type_name()
            )))
        }
    };
    dims.into_iter()
        .map(|dim| match dim {
            Value::Int(n) => usize::try_from(n)
                .map_err(|_| NdPickleError::format(format!("negative axis length {}", n))),
            other => Err(NdPickleError::format(format!(
                "axis length must be an integer, got {}",
                other.type_name()
            ))),
        })
        .collect()
}
