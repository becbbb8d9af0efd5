use crate::array::Element;
use crate::{Index, NdArray, NdPickleError, Result};
use std::sync::Arc;

/// A one-dimensional value sequence paired positionally with an [`Index`]
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Arc<NdArray>,
    index: Arc<Index>,
}

impl Series {
    pub fn new(values: impl Into<Arc<NdArray>>, index: impl Into<Arc<Index>>) -> Result<Self> {
        let values = values.into();
        let index = index.into();
        if values.ndim() != 1 {
            return Err(NdPickleError::invalid_argument(format!(
                "series values must be one-dimensional, got shape {:?}",
                values.shape()
            )));
        }
        if values.len() != index.len() {
            return Err(NdPickleError::invalid_argument(format!(
                "{} values cannot pair with an index of length {}",
                values.len(),
                index.len()
            )));
        }
        Ok(Self { values, index })
    }

    /// Series over the default positional index `0..len`
    pub fn from_values(values: impl Into<Arc<NdArray>>) -> Result<Self> {
        let values = values.into();
        let index = Index::range(values.len());
        Self::new(values, index)
    }

    pub fn values(&self) -> &Arc<NdArray> {
        &self.values
    }

    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `position`
    pub fn get(&self, position: usize) -> Option<Element> {
        self.values.element(&[position])
    }
}
