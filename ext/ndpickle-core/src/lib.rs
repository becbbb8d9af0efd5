//! Data model for type-faithful serialization of numeric arrays and tables
//!
//! `ndpickle-core` holds the values that the ndpickle codecs know how to
//! take apart and rebuild, without any knowledge of the wire format.
//!
//! # Key Components
//!
//! - **Arrays**: [`NdArray`] is a shaped, typed, contiguous buffer
//!   - Element types are described by [`DType`] (ints, floats, bool,
//!     fixed-width text, `datetime64`, objects)
//!   - Physical layout is explicit through [`Order`] and never changes
//!     behind the caller's back
//!
//! - **Scalars**: [`Scalar`] keeps int64 and float64 apart
//!
//! - **Indexes**: [`Index`] labels rows; datetime indexes may carry a
//!   regular [`Frequency`]
//!
//! - **Series and Tables**: [`Series`] pairs values with an index,
//!   [`Table`] holds labeled columns over a shared row index
//!
//! - **Values**: [`Value`] is the object graph a pickler walks; buffer-backed
//!   nodes are shared through `Arc`
//!
//! The pickler lives in `ndpickle-host`, the codecs in `ndpickle`.

pub mod array;
pub mod dtype;
pub mod error;
pub mod frequency;
pub mod index;
pub mod scalar;
pub mod series;
pub mod table;
pub mod type_tag;
pub mod value;

pub use array::{Element, NdArray, Order};
pub use dtype::{DType, NativeType, TimeUnit};
pub use error::{ErrorContext, NdPickleError, Result};
pub use frequency::{FreqUnit, Frequency};
pub use index::{Index, IndexKind, Label};
pub use scalar::Scalar;
pub use series::Series;
pub use table::{Table, TableBuilder};
pub use type_tag::TypeTag;
pub use value::Value;
