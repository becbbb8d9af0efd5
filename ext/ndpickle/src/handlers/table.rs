use super::{mismatched, restore_array, restore_index};
use ndpickle_core::{ErrorContext, NdPickleError, Result, Table, TypeTag, Value};
use ndpickle_host::{check_arity, Handler, Pickler, Reduction, Unpickler};
use serde_json::Value as Json;
use tracing::trace;

/// Codec for [`Table`]
///
/// Arguments are `[[columns...], row_index, column_index]`. Columns are
/// written left to right as independent arrays and keep their own layout.
/// On decode the column labels are paired with the columns positionally;
/// a repeated label is rejected rather than dropping a column.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableHandler;

impl Handler for TableHandler {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction> {
        let table = value
            .as_table()
            .ok_or_else(|| mismatched(TypeTag::Table, value))?;
        trace!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "flattening table"
        );
        let columns = table
            .column_arrays()
            .iter()
            .enumerate()
            .map(|(position, column)| {
                pickler
                    .flatten(&Value::Array(column.clone()))
                    .with_context(|| format!("table column {}", position))
            })
            .collect::<Result<Vec<_>>>()?;
        let index = pickler.flatten(&Value::Index(table.index().clone()))?;
        let labels = pickler.flatten(&Value::Index(table.columns().clone()))?;
        Ok(Reduction::new(
            pickler.flatten_type(TypeTag::Table)?,
            vec![Json::Array(columns), index, labels],
        ))
    }

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>) -> Result<Value> {
        check_arity(tag, args, 3)?;
        let Json::Array(columns) = &args[0] else {
            return Err(NdPickleError::format("table columns must be a list"));
        };
        let columns = columns
            .iter()
            .map(|column| restore_array(unpickler, tag, column))
            .collect::<Result<Vec<_>>>()?;
        let index = restore_index(unpickler, tag, &args[1])?;
        let labels = restore_index(unpickler, tag, &args[2])?;
        let table = Table::from_parts(index, labels, columns).format_context("table")?;
        Ok(Value::from(table))
    }
}
