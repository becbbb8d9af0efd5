use super::{mismatched, restore_array, restore_index};
use ndpickle_core::{ErrorContext, Result, Series, TypeTag, Value};
use ndpickle_host::{check_arity, Handler, Pickler, Reduction, Unpickler};
use serde_json::Value as Json;

/// Codec for [`Series`]: `[values, index]`, re-paired positionally on decode
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesHandler;

impl Handler for SeriesHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let series = value
            .as_series()
            .ok_or_else(|| mismatched(TypeTag::Series, value))?;
        let values = pickler
            .flatten(&Value::Array(series.values().clone()))
            .context("series values")?;
        let index = pickler.flatten(&Value::Index(series.index().clone()))?;
        Ok(Reduction::new(
            pickler.flatten_type(TypeTag::Series)?,
            vec![values, index],
        ))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 2)?;
        let values = restore_array(unpickler, tag, &args[0])?;
        let index = restore_index(unpickler, tag, &args[1])?;
        let series = Series::new(values, index).format_context("series")?;
        Ok(Value::from(series))
    }
}
