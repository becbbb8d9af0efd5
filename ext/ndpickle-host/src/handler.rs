//! Pluggable per-type codecs and the table the pickler dispatches through

use crate::wire::{record, REDUCE_KEY};
use crate::{Pickler, Unpickler};
use ndpickle_core::{NdPickleError, Result, TypeTag, Value};
use serde_json::Value as Json;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Encodes and rebuilds one family of values
///
/// `flatten` reduces a value to a constructor reference plus arguments,
/// asking the pickler to encode any nested values. `restore` receives the
/// stored arguments and asks the unpickler to decode them back.
pub trait Handler: Send + Sync {
    fn flatten(&self, value: &Value, pickler: &mut Pickler<'_>) -> Result<Reduction>;

    fn restore(&self, tag: TypeTag, args: &[Json], unpickler: &mut Unpickler<'_>)
        -> Result<Value>;
}

/// A constructor reference with its reconstruction arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    constructor: Json,
    args: Vec<Json>,
}

impl Reduction {
    pub fn new(constructor: Json, args: Vec<Json>) -> Self {
        Self { constructor, args }
    }

    pub fn constructor(&self) -> &Json {
        &self.constructor
    }

    pub fn args(&self) -> &[Json] {
        &self.args
    }

    /// `{"__reduce__": [constructor, [args...]]}`
    pub fn into_json(self) -> Json {
        record(
            REDUCE_KEY,
            Json::Array(vec![self.constructor, Json::Array(self.args)]),
        )
    }
}

/// Fail unless `args` has exactly `expected` entries
pub fn check_arity(tag: TypeTag, args: &[Json], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(NdPickleError::format(format!(
            "'{}' expects {} arguments, got {}",
            tag,
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Dispatch table from type identity to handler
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<TypeTag, Arc<dyn Handler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `tag` unless one is already present
    ///
    /// Returns whether the handler was inserted.
    pub fn register(&mut self, tag: TypeTag, handler: Arc<dyn Handler>) -> bool {
        match self.handlers.entry(tag) {
            Entry::Occupied(_) => {
                trace!(%tag, "handler already registered");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(handler);
                debug!(%tag, "registered handler");
                true
            }
        }
    }

    pub fn get(&self, tag: TypeTag) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(&tag)
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered tags in a stable order
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.handlers.keys().copied().collect();
        tags.sort();
        tags
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("tags", &self.tags())
            .finish()
    }
}
