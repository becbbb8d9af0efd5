//! Two-dimensional column-oriented tables
//!
//! A [`Table`] is a row [`Index`], a column-label [`Index`] and one
//! one-dimensional array per label, in declared left-to-right order.
//! Columns may have different dtypes but all share the row count.

use crate::{DType, Index, Label, NdArray, NdPickleError, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// A labeled, column-oriented table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Arc<Index>,
    columns: Arc<Index>,
    data: Vec<Arc<NdArray>>,
    positions: IndexMap<Label, usize>,
}

impl Table {
    /// Start a table over `index`; add columns with [`TableBuilder::column`]
    pub fn builder(index: impl Into<Arc<Index>>) -> TableBuilder {
        TableBuilder {
            index: index.into(),
            columns: IndexMap::new(),
        }
    }

    /// Assemble a table from its three parts, pairing labels with columns
    /// positionally
    pub fn from_parts(
        index: Arc<Index>,
        columns: Arc<Index>,
        data: Vec<Arc<NdArray>>,
    ) -> Result<Self> {
        if columns.len() != data.len() {
            return Err(NdPickleError::invalid_argument(format!(
                "{} column labels cannot pair with {} columns",
                columns.len(),
                data.len()
            )));
        }
        let labels = columns.labels()?;
        let mut positions = IndexMap::with_capacity(labels.len());
        for (position, (label, column)) in labels.into_iter().zip(&data).enumerate() {
            if column.ndim() != 1 || column.len() != index.len() {
                return Err(NdPickleError::invalid_argument(format!(
                    "column {} has shape {:?} but the table has {} rows",
                    label,
                    column.shape(),
                    index.len()
                )));
            }
            if let Some(previous) = positions.insert(label.clone(), position) {
                return Err(NdPickleError::invalid_argument(format!(
                    "column label {} appears at positions {} and {}",
                    label, previous, position
                )));
            }
        }
        Ok(Self {
            index,
            columns,
            data,
            positions,
        })
    }

    /// Row index
    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    /// Column-label index
    pub fn columns(&self) -> &Arc<Index> {
        &self.columns
    }

    /// Column arrays in declared order
    pub fn column_arrays(&self) -> &[Arc<NdArray>] {
        &self.data
    }

    pub fn column(&self, label: &Label) -> Option<&Arc<NdArray>> {
        self.positions.get(label).map(|&position| &self.data[position])
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.positions.keys()
    }

    /// `(label, column)` pairs in declared order
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Arc<NdArray>)> {
        self.positions
            .iter()
            .map(|(label, &position)| (label, &self.data[position]))
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.data.len()
    }

    pub fn dtypes(&self) -> Vec<DType> {
        self.data.iter().map(|column| column.dtype()).collect()
    }
}

/// Collects labeled columns for a [`Table`]
#[derive(Debug, Clone)]
pub struct TableBuilder {
    index: Arc<Index>,
    columns: IndexMap<Label, Arc<NdArray>>,
}

impl TableBuilder {
    /// Add a column; a repeated label replaces the earlier column in place
    pub fn column(mut self, label: impl Into<Label>, values: impl Into<Arc<NdArray>>) -> Self {
        self.columns.insert(label.into(), values.into());
        self
    }

    pub fn build(self) -> Result<Table> {
        let labels: Vec<Label> = self.columns.keys().cloned().collect();
        let columns = Index::from_labels(&labels)?;
        Table::from_parts(
            self.index,
            Arc::new(columns),
            self.columns.into_values().collect(),
        )
    }
}
