//! Ordered label sequences that address the rows of a series or table
//!
//! An [`Index`] wraps a one-dimensional [`NdArray`] whose dtype matches its
//! [`IndexKind`]. Element order is positional and is never re-sorted. Only
//! datetime indexes may carry a [`Frequency`], and when they do every step
//! between consecutive values must equal it.

use crate::array::Element;
use crate::{DType, Frequency, NdArray, NdPickleError, Result, TimeUnit, TypeTag, Value};
use jiff::Timestamp;
use ordered_float::OrderedFloat;
use std::fmt;
use std::sync::Arc;

/// Specialization of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Any one-dimensional dtype, typically text or objects
    Generic,
    Int64,
    Float64,
    DateTime,
}

impl IndexKind {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            IndexKind::Generic => TypeTag::Index,
            IndexKind::Int64 => TypeTag::Int64Index,
            IndexKind::Float64 => TypeTag::Float64Index,
            IndexKind::DateTime => TypeTag::DatetimeIndex,
        }
    }

    fn accepts(&self, dtype: DType) -> bool {
        match self {
            IndexKind::Generic => true,
            IndexKind::Int64 => dtype == DType::Int64,
            IndexKind::Float64 => dtype == DType::Float64,
            IndexKind::DateTime => dtype.is_datetime(),
        }
    }
}

/// A hashable index element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(Arc<str>),
    Bool(bool),
    DateTime(i64, TimeUnit),
}

impl Label {
    fn from_element(element: Element) -> Result<Self> {
        match element {
            Element::Bool(b) => Ok(Label::Bool(b)),
            Element::Int(i) => Ok(Label::Int(i)),
            Element::UInt(u) => i64::try_from(u)
                .map(Label::Int)
                .map_err(|_| NdPickleError::invalid_argument(format!("label {} overflows int64", u))),
            Element::Float(f) => Ok(Label::Float(OrderedFloat(f))),
            Element::Str(s) => Ok(Label::Str(s.into())),
            Element::DateTime(ticks, unit) => Ok(Label::DateTime(ticks, unit)),
            Element::Object(value) => match value {
                Value::Int(i) => Ok(Label::Int(i)),
                Value::Float(f) => Ok(Label::Float(OrderedFloat(f))),
                Value::Str(s) => Ok(Label::Str(s)),
                Value::Bool(b) => Ok(Label::Bool(b)),
                other => Err(NdPickleError::invalid_argument(format!(
                    "{} cannot be used as a label",
                    other.type_name()
                ))),
            },
        }
    }

    fn to_object(&self) -> Result<Value> {
        match self {
            Label::Int(i) => Ok(Value::Int(*i)),
            Label::Float(f) => Ok(Value::Float(f.0)),
            Label::Str(s) => Ok(Value::Str(s.clone())),
            Label::Bool(b) => Ok(Value::Bool(*b)),
            Label::DateTime(..) => Err(NdPickleError::invalid_argument(
                "datetime labels cannot be mixed with other label kinds",
            )),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Label::Float(OrderedFloat(value))
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.into())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value.into())
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        Label::Bool(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{}", i),
            Label::Float(v) => write!(f, "{}", v),
            Label::Str(s) => write!(f, "{:?}", s),
            Label::Bool(b) => write!(f, "{}", b),
            Label::DateTime(ticks, unit) => write!(f, "{}{}", ticks, unit.code()),
        }
    }
}

/// An ordered sequence of row labels
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    kind: IndexKind,
    values: Arc<NdArray>,
    freq: Option<Frequency>,
}

impl Index {
    /// Index of `kind` over one-dimensional `values` of a matching dtype
    pub fn new(kind: IndexKind, values: impl Into<Arc<NdArray>>) -> Result<Self> {
        let values = values.into();
        if values.ndim() != 1 {
            return Err(NdPickleError::invalid_argument(format!(
                "index values must be one-dimensional, got shape {:?}",
                values.shape()
            )));
        }
        if !kind.accepts(values.dtype()) {
            return Err(NdPickleError::invalid_argument(format!(
                "{:?} index cannot hold {} values",
                kind,
                values.dtype()
            )));
        }
        Ok(Self {
            kind,
            values,
            freq: None,
        })
    }

    pub fn generic(values: impl Into<Arc<NdArray>>) -> Result<Self> {
        Self::new(IndexKind::Generic, values)
    }

    pub fn int64(values: Vec<i64>) -> Self {
        Self {
            kind: IndexKind::Int64,
            values: Arc::new(NdArray::from_vec(values)),
            freq: None,
        }
    }

    pub fn float64(values: Vec<f64>) -> Self {
        Self {
            kind: IndexKind::Float64,
            values: Arc::new(NdArray::from_vec(values)),
            freq: None,
        }
    }

    /// Positions `0..len` as an int64 index
    pub fn range(len: usize) -> Self {
        Self::int64((0..len as i64).collect())
    }

    /// Datetime index, regular when `freq` is given
    pub fn datetime(values: impl Into<Arc<NdArray>>, freq: Option<Frequency>) -> Result<Self> {
        let mut index = Self::new(IndexKind::DateTime, values)?;
        if let Some(freq) = freq {
            index.check_conforms(freq)?;
        }
        index.freq = freq;
        Ok(index)
    }

    fn check_conforms(&self, freq: Frequency) -> Result<()> {
        let (values, unit) = self.values.datetime_values()?;
        let step = freq.step_in(unit).ok_or_else(|| {
            NdPickleError::invalid_argument(format!(
                "frequency {} is finer than datetime64[{}]",
                freq,
                unit.code()
            ))
        })?;
        for (position, pair) in values.windows(2).enumerate() {
            if pair[1].checked_sub(pair[0]) != Some(step) {
                return Err(NdPickleError::invalid_argument(format!(
                    "values do not follow frequency {} at position {}",
                    freq,
                    position + 1
                )));
            }
        }
        Ok(())
    }

    /// `periods` nanosecond timestamps starting at `start`, `freq` apart
    pub fn date_range(start: Timestamp, periods: usize, freq: Frequency) -> Result<Self> {
        let start = start.as_nanosecond();
        let step = freq.step_nanos();
        let values = (0..periods)
            .map(|i| {
                i64::try_from(start + step * i as i128).map_err(|_| {
                    NdPickleError::invalid_argument("date range overflows datetime64[ns]")
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            kind: IndexKind::DateTime,
            values: Arc::new(NdArray::from_datetime_values(values, TimeUnit::Nanosecond)),
            freq: Some(freq),
        })
    }

    /// Narrowest index able to hold `labels`
    ///
    /// Uniform ints, floats or datetimes get their typed kind; anything else
    /// becomes a generic index of objects.
    pub fn from_labels(labels: &[Label]) -> Result<Self> {
        if !labels.is_empty() && labels.iter().all(|l| matches!(l, Label::Int(_))) {
            let values = labels
                .iter()
                .filter_map(|l| match l {
                    Label::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            return Ok(Self::int64(values));
        }
        if !labels.is_empty() && labels.iter().all(|l| matches!(l, Label::Float(_))) {
            let values = labels
                .iter()
                .filter_map(|l| match l {
                    Label::Float(f) => Some(f.0),
                    _ => None,
                })
                .collect();
            return Ok(Self::float64(values));
        }
        if let Some(Label::DateTime(_, unit)) = labels.first() {
            let ticks: Option<Vec<i64>> = labels
                .iter()
                .map(|l| match l {
                    Label::DateTime(t, u) if u == unit => Some(*t),
                    _ => None,
                })
                .collect();
            if let Some(ticks) = ticks {
                return Self::datetime(NdArray::from_datetime_values(ticks, *unit), None);
            }
        }
        let objects = labels
            .iter()
            .map(Label::to_object)
            .collect::<Result<Vec<_>>>()?;
        Self::generic(NdArray::from_values(objects))
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn values(&self) -> &Arc<NdArray> {
        &self.values
    }

    pub fn freq(&self) -> Option<Frequency> {
        self.freq
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn type_tag(&self) -> TypeTag {
        self.kind.type_tag()
    }

    /// Labels in positional order
    pub fn labels(&self) -> Result<Vec<Label>> {
        self.values
            .elements()
            .into_iter()
            .map(Label::from_element)
            .collect()
    }
}
