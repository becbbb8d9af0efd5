//! JSON object-graph pickler with pluggable per-type handlers
//!
//! `ndpickle-host` owns the wire envelope and the memo context; it knows
//! nothing about arrays or tables beyond their [`TypeTag`](ndpickle_core::TypeTag).
//!
//! # Key Components
//!
//! - **Pickler / Unpickler**: one encoding or decoding pass over a value
//!   - Primitives, lists, tuples and string-keyed dicts are written inline
//!   - Everything else is reduced by a [`Handler`] to a constructor
//!     reference plus arguments
//!   - Shared buffer-backed values are written once and referenced after
//!
//! - **HandlerTable**: the dispatch table handlers are registered into
//!
//! - **Config**: reference emission, nesting limit and output indentation
//!
//! The handlers themselves live in the `ndpickle` crate.

pub mod config;
pub mod handler;
pub mod pickler;
pub mod unpickler;
pub mod wire;

pub use config::{Config, ConfigBuilder, DEFAULT_MAX_DEPTH};
pub use handler::{check_arity, Handler, HandlerTable, Reduction};
pub use pickler::Pickler;
pub use unpickler::Unpickler;
