//! Encoding side of the host pickler
//!
//! A [`Pickler`] walks a [`Value`] tree and produces JSON. Primitives and
//! containers are written directly; every other value is handed to the
//! handler registered for its [`TypeTag`]. Buffer-backed values are
//! memoized by allocation so a second occurrence within one pass becomes a
//! `{"__ref__": n}` record.

use crate::wire::{record, DICT_KEY, FLOAT_KEY, REF_KEY, TUPLE_KEY, TYPE_KEY};
use crate::{wire, Config, HandlerTable};
use indexmap::IndexMap;
use ndpickle_core::{NdPickleError, Result, TypeTag, Value};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Encoding context for one top-level value
pub struct Pickler<'a> {
    handlers: &'a HandlerTable,
    config: &'a Config,
    memo: HashMap<usize, usize>,
    // Keeps memoized allocations alive so their addresses stay unique
    retained: Vec<Value>,
    depth: usize,
}

impl<'a> Pickler<'a> {
    pub fn new(handlers: &'a HandlerTable, config: &'a Config) -> Self {
        Self {
            handlers,
            config,
            memo: HashMap::new(),
            retained: Vec::new(),
            depth: 0,
        }
    }

    /// Forget every shared value seen so far
    pub fn reset(&mut self) {
        self.memo.clear();
        self.retained.clear();
        self.depth = 0;
    }

    /// Number of shared values memoized in the current pass
    pub fn memo_len(&self) -> usize {
        self.retained.len()
    }

    /// Encode `root` as UTF-8 JSON bytes in a fresh pass
    pub fn encode(&mut self, root: &Value) -> Result<Vec<u8>> {
        self.reset();
        let json = self.flatten(root)?;
        let bytes = if self.config.pretty() {
            serde_json::to_vec_pretty(&json)?
        } else {
            serde_json::to_vec(&json)?
        };
        debug!(
            root = root.type_name(),
            bytes = bytes.len(),
            shared = self.memo_len(),
            "encoded value"
        );
        Ok(bytes)
    }

    /// Encode a nested value within the current pass
    pub fn flatten(&mut self, value: &Value) -> Result<Json> {
        if self.depth >= self.config.max_depth() {
            return Err(NdPickleError::unsupported_type(format!(
                "{} nested deeper than {} levels",
                value.type_name(),
                self.config.max_depth()
            )));
        }
        self.depth += 1;
        let result = self.flatten_value(value);
        self.depth -= 1;
        result
    }

    /// Constructor reference for `tag`
    pub fn flatten_type(&self, tag: TypeTag) -> Result<Json> {
        Ok(record(TYPE_KEY, serde_json::to_value(tag)?))
    }

    fn flatten_value(&mut self, value: &Value) -> Result<Json> {
        match value {
            Value::None => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Int(i) => Ok(Json::from(*i)),
            Value::Float(f) => Ok(flatten_float(*f)),
            Value::Str(s) => Ok(Json::String(s.to_string())),
            Value::List(items) => Ok(Json::Array(self.flatten_all(items)?)),
            Value::Tuple(items) => Ok(record(TUPLE_KEY, Json::Array(self.flatten_all(items)?))),
            Value::Dict(entries) => self.flatten_dict(entries),
            _ => self.flatten_reduced(value),
        }
    }

    fn flatten_all(&mut self, items: &[Value]) -> Result<Vec<Json>> {
        items.iter().map(|item| self.flatten(item)).collect()
    }

    fn flatten_dict(&mut self, entries: &IndexMap<Arc<str>, Value>) -> Result<Json> {
        if entries.keys().any(|key| wire::is_reserved(key)) {
            let pairs = entries
                .iter()
                .map(|(key, value)| Ok(Json::Array(vec![Json::String(key.to_string()), self.flatten(value)?])))
                .collect::<Result<Vec<_>>>()?;
            return Ok(record(DICT_KEY, Json::Array(pairs)));
        }
        let mut map = Map::with_capacity(entries.len());
        for (key, value) in entries {
            map.insert(key.to_string(), self.flatten(value)?);
        }
        Ok(Json::Object(map))
    }

    fn flatten_reduced(&mut self, value: &Value) -> Result<Json> {
        let tag = value.type_tag().ok_or_else(|| {
            NdPickleError::unsupported_type(format!("{} has no codec", value.type_name()))
        })?;
        let identity = if self.config.make_refs() {
            value.identity()
        } else {
            None
        };
        if let Some(address) = identity {
            if let Some(&id) = self.memo.get(&address) {
                trace!(%tag, id, "memo hit");
                return Ok(record(REF_KEY, Json::from(id)));
            }
        }

        let handlers = self.handlers;
        let handler = handlers.get(tag).ok_or_else(|| {
            NdPickleError::unsupported_type(format!("no handler registered for '{}'", tag))
        })?;
        trace!(%tag, "reducing value");
        let reduction = handler.flatten(value, self)?;

        // Ids are assigned once children are done, matching decode order
        if let Some(address) = identity {
            self.memo.insert(address, self.retained.len());
            self.retained.push(value.clone());
        }
        Ok(reduction.into_json())
    }
}

fn flatten_float(f: f64) -> Json {
    match serde_json::Number::from_f64(f) {
        Some(number) => Json::Number(number),
        None => {
            let name = if f.is_nan() {
                "nan"
            } else if f > 0.0 {
                "inf"
            } else {
                "-inf"
            };
            record(FLOAT_KEY, Json::from(name))
        }
    }
}
