//! Element type tags for n-dimensional arrays
//!
//! A [`DType`] names the width and kind of every element in an
//! [`NdArray`](crate::NdArray). Its string form is the normalized tag written
//! to the wire, e.g. `int64`, `float64`, `<U3`, `datetime64[ns]`, `object`.
//! Fixed-width elements are stored little-endian.

use crate::{NdPickleError, Result};
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use std::str::FromStr;

/// Resolution of a `datetime64` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Day,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Short code used inside `datetime64[..]`
    pub fn code(&self) -> &'static str {
        match self {
            TimeUnit::Day => "D",
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(TimeUnit::Day),
            "s" => Some(TimeUnit::Second),
            "ms" => Some(TimeUnit::Millisecond),
            "us" => Some(TimeUnit::Microsecond),
            "ns" => Some(TimeUnit::Nanosecond),
            _ => None,
        }
    }

    /// Length of one tick in nanoseconds
    pub fn nanos(&self) -> i128 {
        match self {
            TimeUnit::Day => 86_400_000_000_000,
            TimeUnit::Second => 1_000_000_000,
            TimeUnit::Millisecond => 1_000_000,
            TimeUnit::Microsecond => 1_000,
            TimeUnit::Nanosecond => 1,
        }
    }
}

/// Normalized element type of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Fixed-width text of `n` UCS-4 code points
    Str(usize),
    /// Signed 64-bit offsets from the Unix epoch
    DateTime64(TimeUnit),
    /// Arbitrary host values; carried element by element, never as raw bytes
    Object,
}

impl DType {
    /// Size of one element in bytes
    ///
    /// Object elements report pointer width, which only matters for strides.
    pub fn itemsize(&self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
            DType::Str(width) => width.saturating_mul(4),
            DType::DateTime64(_) => 8,
            DType::Object => 8,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DType::Object)
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, DType::DateTime64(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::Int8 => write!(f, "int8"),
            DType::Int16 => write!(f, "int16"),
            DType::Int32 => write!(f, "int32"),
            DType::Int64 => write!(f, "int64"),
            DType::UInt8 => write!(f, "uint8"),
            DType::UInt16 => write!(f, "uint16"),
            DType::UInt32 => write!(f, "uint32"),
            DType::UInt64 => write!(f, "uint64"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
            DType::Str(width) => write!(f, "<U{}", width),
            DType::DateTime64(unit) => write!(f, "datetime64[{}]", unit.code()),
            DType::Object => write!(f, "object"),
        }
    }
}

impl FromStr for DType {
    type Err = NdPickleError;

    fn from_str(s: &str) -> Result<Self> {
        let dtype = match s {
            "bool" => DType::Bool,
            "int8" => DType::Int8,
            "int16" => DType::Int16,
            "int32" => DType::Int32,
            "int64" => DType::Int64,
            "uint8" => DType::UInt8,
            "uint16" => DType::UInt16,
            "uint32" => DType::UInt32,
            "uint64" => DType::UInt64,
            "float32" => DType::Float32,
            "float64" => DType::Float64,
            "object" => DType::Object,
            _ => {
                if let Some(width) = s.strip_prefix("<U") {
                    let width = width
                        .parse::<usize>()
                        .ok()
                        .filter(|&width| width > 0 && width.checked_mul(4).is_some())
                        .ok_or_else(|| NdPickleError::format(format!("invalid text width in dtype '{}'", s)))?;
                    DType::Str(width)
                } else if let Some(unit) = s
                    .strip_prefix("datetime64[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    let unit = TimeUnit::from_code(unit).ok_or_else(|| {
                        NdPickleError::format(format!("unknown datetime unit in dtype '{}'", s))
                    })?;
                    DType::DateTime64(unit)
                } else {
                    return Err(NdPickleError::format(format!("unknown dtype '{}'", s)));
                }
            }
        };
        Ok(dtype)
    }
}

/// Fixed-width element types that can back an array buffer directly
pub trait NativeType: Copy + PartialEq + fmt::Debug + 'static {
    const DTYPE: DType;

    /// Append the little-endian encoding of `self`
    fn put(self, buf: &mut BytesMut);

    /// Read one element from the front of `buf`
    fn get(buf: &mut &[u8]) -> Self;
}

macro_rules! native_type {
    ($ty:ty, $dtype:expr, $put:ident, $get:ident) => {
        impl NativeType for $ty {
            const DTYPE: DType = $dtype;

            fn put(self, buf: &mut BytesMut) {
                buf.$put(self)
            }

            fn get(buf: &mut &[u8]) -> Self {
                buf.$get()
            }
        }
    };
}

native_type!(i8, DType::Int8, put_i8, get_i8);
native_type!(i16, DType::Int16, put_i16_le, get_i16_le);
native_type!(i32, DType::Int32, put_i32_le, get_i32_le);
native_type!(i64, DType::Int64, put_i64_le, get_i64_le);
native_type!(u8, DType::UInt8, put_u8, get_u8);
native_type!(u16, DType::UInt16, put_u16_le, get_u16_le);
native_type!(u32, DType::UInt32, put_u32_le, get_u32_le);
native_type!(u64, DType::UInt64, put_u64_le, get_u64_le);
native_type!(f32, DType::Float32, put_f32_le, get_f32_le);
native_type!(f64, DType::Float64, put_f64_le, get_f64_le);

impl NativeType for bool {
    const DTYPE: DType = DType::Bool;

    fn put(self, buf: &mut BytesMut) {
        buf.put_u8(self as u8)
    }

    fn get(buf: &mut &[u8]) -> Self {
        buf.get_u8() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_strings_roundtrip() {
        let dtypes = [
            DType::Bool,
            DType::Int8,
            DType::Int64,
            DType::UInt32,
            DType::Float32,
            DType::Float64,
            DType::Str(3),
            DType::DateTime64(TimeUnit::Nanosecond),
            DType::DateTime64(TimeUnit::Day),
            DType::Object,
        ];
        for dtype in dtypes {
            let parsed: DType = dtype.to_string().parse().unwrap();
            assert_eq!(parsed, dtype);
        }
    }

    #[test]
    fn test_dtype_display() {
        assert_eq!(DType::Int64.to_string(), "int64");
        assert_eq!(DType::Str(12).to_string(), "<U12");
        assert_eq!(
            DType::DateTime64(TimeUnit::Microsecond).to_string(),
            "datetime64[us]"
        );
    }

    #[test]
    fn test_unknown_dtype_is_format_error() {
        assert!("complex128".parse::<DType>().unwrap_err().is_format());
        assert!("datetime64[fortnight]".parse::<DType>().unwrap_err().is_format());
        assert!("<Uabc".parse::<DType>().unwrap_err().is_format());
    }

    #[test]
    fn test_text_width_bounds() {
        assert!("<U0".parse::<DType>().unwrap_err().is_format());
        let oversized = format!("<U{}", usize::MAX / 4 + 1);
        assert!(oversized.parse::<DType>().unwrap_err().is_format());
        assert_eq!(format!("<U{}", usize::MAX / 4).parse::<DType>().unwrap(), DType::Str(usize::MAX / 4));
        assert_eq!(DType::Str(usize::MAX).itemsize(), usize::MAX);
    }

    #[test]
    fn test_itemsize() {
        assert_eq!(DType::Bool.itemsize(), 1);
        assert_eq!(DType::Int16.itemsize(), 2);
        assert_eq!(DType::Float64.itemsize(), 8);
        assert_eq!(DType::Str(3).itemsize(), 12);
        assert_eq!(DType::DateTime64(TimeUnit::Second).itemsize(), 8);
    }

    #[test]
    fn test_native_type_little_endian() {
        let mut buf = BytesMut::new();
        1i32.put(&mut buf);
        (-2.5f64).put(&mut buf);
        true.put(&mut buf);
        assert_eq!(&buf[..4], &[1, 0, 0, 0]);

        let mut reader: &[u8] = &buf;
        assert_eq!(i32::get(&mut reader), 1);
        assert_eq!(f64::get(&mut reader), -2.5);
        assert!(bool::get(&mut reader));
        assert!(reader.is_empty());
    }
}
