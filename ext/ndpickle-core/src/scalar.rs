use crate::{NdPickleError, Result, TypeTag};
use num::ToPrimitive;

/// Largest magnitude an `i64` can have and still survive a trip through `f64`
const MAX_EXACT_INT: i64 = 1 << 53;

/// A boxed fixed-width numeric scalar
///
/// Both kinds travel as a float64 payload; the kind itself is carried by the
/// type reference so an integer never comes back as a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int64(i64),
    Float64(f64),
}

impl Scalar {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Scalar::Int64(_) => TypeTag::Int64,
            Scalar::Float64(_) => TypeTag::Float64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Int64(v) => *v as f64,
            Scalar::Float64(v) => *v,
        }
    }

    /// The float64 value written at rest
    pub fn to_payload(&self) -> Result<f64> {
        match self {
            Scalar::Int64(v) if v.unsigned_abs() > MAX_EXACT_INT as u64 => {
                Err(NdPickleError::unsupported_type(format!(
                    "int64 scalar {} has no exact float64 payload",
                    v
                )))
            }
            _ => Ok(self.as_f64()),
        }
    }

    /// Rebuild the scalar kind named by `tag` from its payload
    pub fn from_payload(tag: TypeTag, payload: f64) -> Result<Self> {
        match tag {
            TypeTag::Float64 => Ok(Scalar::Float64(payload)),
            TypeTag::Int64 => {
                if payload.fract() != 0.0 || payload.abs() > MAX_EXACT_INT as f64 {
                    return Err(NdPickleError::format(format!(
                        "payload {} is not an exact int64",
                        payload
                    )));
                }
                payload.to_i64().map(Scalar::Int64).ok_or_else(|| {
                    NdPickleError::format(format!("payload {} is not an exact int64", payload))
                })
            }
            other => Err(NdPickleError::format(format!(
                "'{}' is not a scalar type",
                other
            ))),
        }
    }
}
