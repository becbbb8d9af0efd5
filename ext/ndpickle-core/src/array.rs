//! N-dimensional typed arrays
//!
//! An [`NdArray`] owns a contiguous buffer plus the metadata needed to read
//! it back: shape, element type and physical [`Order`]. The buffer is never
//! relaid implicitly; constructors check that its length matches the shape
//! and element size exactly, and [`NdArray::to_order`] is the only way to
//! move elements between row-major and column-major layouts.

use crate::dtype::NativeType;
use crate::{DType, NdPickleError, Result, TimeUnit, Value};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Physical linearization of an array's elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Last axis varies fastest ("C")
    #[default]
    RowMajor,
    /// First axis varies fastest ("F")
    ColumnMajor,
}

impl Order {
    pub fn code(&self) -> &'static str {
        match self {
            Order::RowMajor => "C",
            Order::ColumnMajor => "F",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(Order::RowMajor),
            "F" => Some(Order::ColumnMajor),
            _ => None,
        }
    }
}

/// A single array element widened to a common representation
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    DateTime(i64, TimeUnit),
    Object(Value),
}

#[derive(Debug, Clone)]
enum Storage {
    Bytes(Bytes),
    Objects(Vec<Value>),
}

/// A shaped, typed, contiguous array
#[derive(Debug, Clone)]
pub struct NdArray {
    shape: Vec<usize>,
    dtype: DType,
    order: Order,
    storage: Storage,
}

fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Physical slot of every logical (row-major) position
fn physical_positions(shape: &[usize], order: Order) -> Vec<usize> {
    let count = shape.iter().product::<usize>();
    match order {
        Order::RowMajor => (0..count).collect(),
        Order::ColumnMajor => {
            let mut strides = vec![1usize; shape.len()];
            for axis in 1..shape.len() {
                strides[axis] = strides[axis - 1] * shape[axis - 1];
            }
            (0..count)
                .map(|linear| {
                    let mut rem = linear;
                    let mut slot = 0;
                    for axis in (0..shape.len()).rev() {
                        slot += (rem % shape[axis]) * strides[axis];
                        rem /= shape[axis];
                    }
                    slot
                })
                .collect()
        }
    }
}

fn encode_native<T: NativeType>(data: &[T]) -> Bytes {
    let mut buf = BytesMut::with_capacity(data.len() * T::DTYPE.itemsize());
    for &value in data {
        value.put(&mut buf);
    }
    buf.freeze()
}

fn decode_text(mut chunk: &[u8]) -> std::result::Result<String, u32> {
    let mut code_points = Vec::with_capacity(chunk.len() / 4);
    while chunk.remaining() >= 4 {
        code_points.push(chunk.get_u32_le());
    }
    // Only trailing NULs are padding
    while code_points.last() == Some(&0) {
        code_points.pop();
    }
    code_points
        .into_iter()
        .map(|code_point| char::from_u32(code_point).ok_or(code_point))
        .collect()
}

fn timestamp_to_ticks(ts: Timestamp, unit: TimeUnit) -> Result<i64> {
    let ticks = ts.as_nanosecond().div_euclid(unit.nanos());
    i64::try_from(ticks).map_err(|_| {
        NdPickleError::invalid_argument(format!(
            "{} does not fit datetime64[{}]",
            ts,
            unit.code()
        ))
    })
}

fn ticks_to_timestamp(ticks: i64, unit: TimeUnit) -> Result<Timestamp> {
    Ok(Timestamp::from_nanosecond(i128::from(ticks) * unit.nanos())?)
}

impl NdArray {
    /// Wrap an existing buffer without copying or relaying it
    pub fn from_bytes(shape: Vec<usize>, dtype: DType, order: Order, data: Bytes) -> Result<Self> {
        if dtype.is_object() {
            return Err(NdPickleError::invalid_argument(
                "object arrays carry values, not a byte buffer",
            ));
        }
        if dtype == DType::Str(0) {
            return Err(NdPickleError::invalid_argument(
                "text elements need a width of at least 1",
            ));
        }
        let expected = element_count(&shape)
            .and_then(|count| count.checked_mul(dtype.itemsize()))
            .ok_or_else(|| {
                NdPickleError::invalid_argument(format!("shape {:?} overflows", shape))
            })?;
        if data.len() != expected {
            return Err(NdPickleError::invalid_argument(format!(
                "buffer holds {} bytes but shape {:?} of {} needs {}",
                data.len(),
                shape,
                dtype,
                expected
            )));
        }
        if let DType::Str(_) = dtype {
            for (slot, chunk) in data.chunks_exact(dtype.itemsize()).enumerate() {
                decode_text(chunk).map_err(|code_point| {
                    NdPickleError::invalid_argument(format!(
                        "invalid code point {:#x} in text element {}",
                        code_point, slot
                    ))
                })?;
            }
        }
        Ok(Self {
            shape,
            dtype,
            order,
            storage: Storage::Bytes(data),
        })
    }

    /// Build an `object` array; `items` are given in physical order
    pub fn from_objects(shape: Vec<usize>, order: Order, items: Vec<Value>) -> Result<Self> {
        let expected = element_count(&shape).ok_or_else(|| {
            NdPickleError::invalid_argument(format!("shape {:?} overflows", shape))
        })?;
        if items.len() != expected {
            return Err(NdPickleError::invalid_argument(format!(
                "{} objects cannot fill shape {:?}",
                items.len(),
                shape
            )));
        }
        Ok(Self {
            shape,
            dtype: DType::Object,
            order,
            storage: Storage::Objects(items),
        })
    }

    /// One-dimensional array of native elements
    pub fn from_vec<T: NativeType>(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            dtype: T::DTYPE,
            order: Order::RowMajor,
            storage: Storage::Bytes(encode_native(&data)),
        }
    }

    /// Shaped array from elements listed in logical (row-major) order,
    /// laid out physically in `order`
    pub fn from_shape_vec<T: NativeType>(
        shape: Vec<usize>,
        order: Order,
        data: Vec<T>,
    ) -> Result<Self> {
        let row_major = Self::from_bytes(shape, T::DTYPE, Order::RowMajor, encode_native(&data))?;
        Ok(row_major.to_order(order))
    }

    /// One-dimensional object array
    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            shape: vec![items.len()],
            dtype: DType::Object,
            order: Order::RowMajor,
            storage: Storage::Objects(items),
        }
    }

    /// One-dimensional fixed-width text array, sized to the longest item
    pub fn from_strs<S: AsRef<str>>(items: &[S]) -> Self {
        let width = items
            .iter()
            .map(|item| item.as_ref().chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let mut buf = BytesMut::with_capacity(items.len() * width * 4);
        for item in items {
            let mut written = 0;
            for c in item.as_ref().chars() {
                buf.put_u32_le(c as u32);
                written += 1;
            }
            for _ in written..width {
                buf.put_u32_le(0);
            }
        }
        Self {
            shape: vec![items.len()],
            dtype: DType::Str(width),
            order: Order::RowMajor,
            storage: Storage::Bytes(buf.freeze()),
        }
    }

    /// One-dimensional `datetime64` array of raw epoch offsets
    pub fn from_datetime_values(values: Vec<i64>, unit: TimeUnit) -> Self {
        Self {
            shape: vec![values.len()],
            dtype: DType::DateTime64(unit),
            order: Order::RowMajor,
            storage: Storage::Bytes(encode_native(&values)),
        }
    }

    pub fn from_timestamps(timestamps: &[Timestamp], unit: TimeUnit) -> Result<Self> {
        let values = timestamps
            .iter()
            .map(|ts| timestamp_to_ticks(*ts, unit))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_datetime_values(values, unit))
    }

    /// Calendar dates as `datetime64[D]`
    pub fn from_dates(dates: &[Date]) -> Result<Self> {
        let values = dates
            .iter()
            .map(|date| {
                let ts = date.to_zoned(TimeZone::UTC)?.timestamp();
                Ok(ts.as_second().div_euclid(86_400))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_datetime_values(values, TimeUnit::Day))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Length of the first axis (1 for zero-dimensional arrays)
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn itemsize(&self) -> usize {
        self.dtype.itemsize()
    }

    /// Raw buffer in physical order; `None` for object arrays
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.storage {
            Storage::Bytes(data) => Some(data),
            Storage::Objects(_) => None,
        }
    }

    /// Elements of an object array in physical order
    pub fn objects(&self) -> Option<&[Value]> {
        match &self.storage {
            Storage::Objects(items) => Some(items),
            Storage::Bytes(_) => None,
        }
    }

    /// Byte step along each axis
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![0; self.shape.len()];
        let mut step = self.itemsize();
        match self.order {
            Order::RowMajor => {
                for axis in (0..self.shape.len()).rev() {
                    strides[axis] = step;
                    step = step.saturating_mul(self.shape[axis]);
                }
            }
            Order::ColumnMajor => {
                for axis in 0..self.shape.len() {
                    strides[axis] = step;
                    step = step.saturating_mul(self.shape[axis]);
                }
            }
        }
        strides
    }

    fn element_at(&self, slot: usize) -> Element {
        let data = match &self.storage {
            Storage::Objects(items) => return Element::Object(items[slot].clone()),
            Storage::Bytes(data) => data,
        };
        let size = self.itemsize();
        let mut chunk = &data[slot * size..(slot + 1) * size];
        match self.dtype {
            DType::Bool => Element::Bool(bool::get(&mut chunk)),
            DType::Int8 => Element::Int(i8::get(&mut chunk).into()),
            DType::Int16 => Element::Int(i16::get(&mut chunk).into()),
            DType::Int32 => Element::Int(i32::get(&mut chunk).into()),
            DType::Int64 => Element::Int(i64::get(&mut chunk)),
            DType::UInt8 => Element::UInt(u8::get(&mut chunk).into()),
            DType::UInt16 => Element::UInt(u16::get(&mut chunk).into()),
            DType::UInt32 => Element::UInt(u32::get(&mut chunk).into()),
            DType::UInt64 => Element::UInt(u64::get(&mut chunk)),
            DType::Float32 => Element::Float(f32::get(&mut chunk).into()),
            DType::Float64 => Element::Float(f64::get(&mut chunk)),
            DType::Str(_) => match decode_text(chunk) {
                Ok(text) => Element::Str(text),
                Err(_) => unreachable!("text buffers are checked on construction"),
            },
            DType::DateTime64(unit) => Element::DateTime(i64::get(&mut chunk), unit),
            DType::Object => unreachable!("object arrays never hold a byte buffer"),
        }
    }

    /// Element at a multi-dimensional position
    pub fn element(&self, index: &[usize]) -> Option<Element> {
        if index.len() != self.shape.len() {
            return None;
        }
        let itemsize = self.itemsize();
        let mut slot = 0;
        for ((&i, &dim), &stride) in index.iter().zip(&self.shape).zip(&self.strides()) {
            if i >= dim {
                return None;
            }
            slot += i * (stride / itemsize.max(1));
        }
        Some(self.element_at(slot))
    }

    /// All elements in logical (row-major) order, whatever the layout
    pub fn elements(&self) -> Vec<Element> {
        physical_positions(&self.shape, self.order)
            .into_iter()
            .map(|slot| self.element_at(slot))
            .collect()
    }

    /// Copy into the requested physical layout
    pub fn to_order(&self, order: Order) -> Self {
        if order == self.order {
            return self.clone();
        }
        let src = physical_positions(&self.shape, self.order);
        let dst = physical_positions(&self.shape, order);
        let storage = match &self.storage {
            Storage::Bytes(data) => {
                let size = self.itemsize();
                let mut out = vec![0u8; data.len()];
                for (&s, &d) in src.iter().zip(&dst) {
                    out[d * size..(d + 1) * size].copy_from_slice(&data[s * size..(s + 1) * size]);
                }
                Storage::Bytes(Bytes::from(out))
            }
            Storage::Objects(items) => {
                let mut out = items.clone();
                for (&s, &d) in src.iter().zip(&dst) {
                    out[d] = items[s].clone();
                }
                Storage::Objects(out)
            }
        };
        Self {
            shape: self.shape.clone(),
            dtype: self.dtype,
            order,
            storage,
        }
    }

    /// Native elements in logical order
    pub fn to_vec<T: NativeType>(&self) -> Result<Vec<T>> {
        if self.dtype != T::DTYPE {
            return Err(NdPickleError::invalid_argument(format!(
                "array of {} cannot be read as {}",
                self.dtype,
                T::DTYPE
            )));
        }
        self.raw_values()
    }

    fn raw_values<T: NativeType>(&self) -> Result<Vec<T>> {
        let data = self.as_bytes().ok_or_else(|| {
            NdPickleError::invalid_argument("object arrays have no native elements")
        })?;
        let size = self.itemsize();
        Ok(physical_positions(&self.shape, self.order)
            .into_iter()
            .map(|slot| {
                let mut chunk = &data[slot * size..(slot + 1) * size];
                T::get(&mut chunk)
            })
            .collect())
    }

    /// Text elements in logical order
    pub fn to_strings(&self) -> Result<Vec<String>> {
        let DType::Str(_) = self.dtype else {
            return Err(NdPickleError::invalid_argument(format!(
                "array of {} is not text",
                self.dtype
            )));
        };
        let data = self
            .as_bytes()
            .ok_or_else(|| NdPickleError::invalid_argument("text array without a buffer"))?;
        let size = self.itemsize();
        physical_positions(&self.shape, self.order)
            .into_iter()
            .map(|slot| {
                decode_text(&data[slot * size..(slot + 1) * size]).map_err(|code_point| {
                    NdPickleError::format(format!("invalid code point {:#x}", code_point))
                })
            })
            .collect()
    }

    /// Raw epoch offsets and their unit
    pub fn datetime_values(&self) -> Result<(Vec<i64>, TimeUnit)> {
        let DType::DateTime64(unit) = self.dtype else {
            return Err(NdPickleError::invalid_argument(format!(
                "array of {} is not datetime64",
                self.dtype
            )));
        };
        Ok((self.raw_values()?, unit))
    }

    pub fn to_timestamps(&self) -> Result<Vec<Timestamp>> {
        let (values, unit) = self.datetime_values()?;
        values
            .into_iter()
            .map(|ticks| ticks_to_timestamp(ticks, unit))
            .collect()
    }

    /// Calendar dates (UTC) of a datetime array
    pub fn to_dates(&self) -> Result<Vec<Date>> {
        Ok(self
            .to_timestamps()?
            .into_iter()
            .map(|ts| ts.to_zoned(TimeZone::UTC).date())
            .collect())
    }

    /// Equal elements and identical physical layout
    pub fn layout_eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.shape == other.shape
            && self.dtype == other.dtype
            && match (&self.storage, &other.storage) {
                (Storage::Bytes(a), Storage::Bytes(b)) => a == b,
                (Storage::Objects(a), Storage::Objects(b)) => a == b,
                _ => false,
            }
    }
}

/// Element-wise equality: same shape, same dtype, equal elements in logical
/// order. Physical layout is not compared; see [`NdArray::layout_eq`].
impl PartialEq for NdArray {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.dtype == other.dtype
            && self.elements() == other.elements()
    }
}
