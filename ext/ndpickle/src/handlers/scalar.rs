use super::mismatched;
use ndpickle_core::{NdPickleError, Result, Scalar, TypeTag, Value};
use ndpickle_host::{check_arity, Handler, Pickler, Reduction, Unpickler};
use serde_json::Value as Json;

/// Codec for boxed `int64` and `float64` scalars
///
/// The payload is always a float; the type reference restores the kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarHandler;

impl Handler for ScalarHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let Value::Scalar(scalar) = value else {
            return Err(mismatched(TypeTag::Float64, value));
        };
        let payload = pickler.flatten(&Value::Float(scalar.to_payload()?))?;
        Ok(Reduction::new(
            pickler.flatten_type(scalar.type_tag())?,
            vec![payload],
        ))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 1)?;
        let payload = match unpickler.restore(&args[0])? {
            Value::Float(f) => f,
            Value::Int(i) => i as f64,
            other => {
                return Err(NdPickleError::format(format!(
                    "'{}' payload must be a number, got {}",
                    tag,
                    other.type_name()
                )))
            }
        };
        Ok(Value::Scalar(Scalar::from_payload(tag, payload)?))
    }
}
