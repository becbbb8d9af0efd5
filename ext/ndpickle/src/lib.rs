//! Type-faithful JSON serialization of numeric arrays, indexes, series and
//! tables
//!
//! `ndpickle` plugs a codec for every buffer-backed value kind into the
//! `ndpickle-host` pickler. Decoding restores exact element types, shapes,
//! memory order, scalar kinds, index frequencies and structural sharing.
//!
//! # Key Components
//!
//! - **Handlers**: one codec per value kind in [`handlers`]
//!   - Arrays travel as shape, dtype, base64 buffer and order
//!   - Scalars keep their int64/float64 kind
//!   - Indexes, series and tables delegate their parts to the array and
//!     index codecs, so shared parts are written once
//!
//! - **Registry**: [`Registry`] owns a handler table and a [`Config`];
//!   [`register_handlers`] fills any [`HandlerTable`] idempotently
//!
//! # Example Usage
//!
//! ```no_run
//! use ndpickle::{NdArray, Registry, Value};
//!
//! let registry = Registry::new()?;
//! let bytes = registry.dumps(&Value::from(NdArray::from_vec(vec![1i64, 2, 3])))?;
//! let value = registry.loads(&bytes)?;
//! # Ok::<(), ndpickle::NdPickleError>(())
//! ```

pub mod handlers;
pub mod registry;

pub use ndpickle_core::*;
pub use ndpickle_host::{Config, ConfigBuilder, Handler, HandlerTable, Pickler, Reduction, Unpickler};
pub use registry::{register_handlers, Registry};

use std::sync::OnceLock;

static DEFAULT_REGISTRY: OnceLock<Registry> = OnceLock::new();

fn default_registry() -> Result<&'static Registry> {
    if let Some(registry) = DEFAULT_REGISTRY.get() {
        return Ok(registry);
    }
    let registry = Registry::new()?;
    Ok(DEFAULT_REGISTRY.get_or_init(|| registry))
}

/// Encode `value` with the default registry
pub fn dumps(value: &Value) -> Result<Vec<u8>> {
    default_registry()?.dumps(value)
}

/// Decode bytes with the default registry
pub fn loads(data: &[u8]) -> Result<Value> {
    default_registry()?.loads(data)
}
