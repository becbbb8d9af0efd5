use super::{mismatched, restore_array};
use ndpickle_core::{
    ErrorContext, Frequency, Index, IndexKind, NdPickleError, Result, TypeTag, Value,
};
use ndpickle_host::{check_arity, Handler, Pickler, Reduction, Unpickler};
use serde_json::Value as Json;

/// Codec for value-only indexes of one kind
///
/// Arguments are `[values]`. Datetime indexes carry a frequency and have
/// their own [`DatetimeIndexHandler`].
#[derive(Debug, Clone, Copy)]
pub struct IndexHandler {
    kind: IndexKind,
}

impl IndexHandler {
    /// Handler for the index type named by `tag`
    ///
    /// Fails for `datetime_index` and `series`, which have dedicated
    /// handlers, and for every tag that does not name an index.
    pub fn for_type(tag: TypeTag) -> Result<Self> {
        match tag.index_kind() {
            Some(IndexKind::DateTime) => Err(NdPickleError::configuration(format!(
                "'{}' keeps a frequency and needs its own handler",
                tag
            ))),
            Some(kind) => Ok(Self { kind }),
            None if tag == TypeTag::Series => Err(NdPickleError::configuration(
                "'series' is a time series, not an index type",
            )),
            None => Err(NdPickleError::configuration(format!(
                "expected an index type, got '{}'",
                tag
            ))),
        }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }
}

impl Handler for IndexHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let tag = self.kind.type_tag();
        let index = value
            .as_index()
            .filter(|index| index.kind() == self.kind)
            .ok_or_else(|| mismatched(tag, value))?;
        let values = pickler.flatten(&Value::Array(index.values().clone()))?;
        Ok(Reduction::new(pickler.flatten_type(tag)?, vec![values]))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 1)?;
        let values = restore_array(unpickler, tag, &args[0])?;
        let index = Index::new(self.kind, values).format_context(tag.name())?;
        Ok(Value::from(index))
    }
}

/// Codec for datetime indexes
///
/// Arguments are `[values, freq]` with `freq` a string such as `"1 second"`
/// or null for an irregular index.
#[derive(Debug, Default, Clone, Copy)]
pub struct DatetimeIndexHandler;

impl Handler for DatetimeIndexHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let index = value
            .as_index()
            .filter(|index| index.kind() == IndexKind::DateTime)
            .ok_or_else(|| mismatched(TypeTag::DatetimeIndex, value))?;
        let values = pickler.flatten(&Value::Array(index.values().clone()))?;
        let freq = match index.freq() {
            Some(freq) => Json::String(freq.to_string()),
            None => Json::Null,
        };
        Ok(Reduction::new(
            pickler.flatten_type(TypeTag::DatetimeIndex)?,
            vec![values, freq],
        ))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 2)?;
        let values = restore_array(unpickler, tag, &args[0])?;
        let freq = match &args[1] {
            Json::Null => None,
            Json::String(freq) => Some(freq.parse::<Frequency>()?),
            other => {
                return Err(NdPickleError::format(format!(
                    "frequency must be a string or null, got {}",
                    other
                )))
            }
        };
        let index = Index::datetime(values, freq).format_context(tag.name())?;
        Ok(Value::from(index))
    }
}
