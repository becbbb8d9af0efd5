//! Decoding side of the host pickler

use crate::wire::{DICT_KEY, FLOAT_KEY, REDUCE_KEY, REF_KEY, TUPLE_KEY, TYPE_KEY};
use crate::{Config, HandlerTable};
use indexmap::IndexMap;
use ndpickle_core::{NdPickleError, Result, TypeTag, Value};
use serde_json::{Map, Number, Value as Json};
use std::sync::Arc;
use tracing::{debug, trace};

/// Decoding context for one top-level document
///
/// Shared values are numbered in the order their reductions finish, which
/// is the order the [`Pickler`](crate::Pickler) assigned their ids.
pub struct Unpickler<'a> {
    handlers: &'a HandlerTable,
    config: &'a Config,
    restored: Vec<Value>,
    depth: usize,
}

impl<'a> Unpickler<'a> {
    pub fn new(handlers: &'a HandlerTable, config: &'a Config) -> Self {
        Self {
            handlers,
            config,
            restored: Vec::new(),
            depth: 0,
        }
    }

    pub fn reset(&mut self) {
        self.restored.clear();
        self.depth = 0;
    }

    /// Decode UTF-8 JSON bytes in a fresh pass
    pub fn decode(&mut self, data: &[u8]) -> Result<Value> {
        self.reset();
        let json: Json = serde_json::from_slice(data)
            .map_err(|e| NdPickleError::format(format!("invalid JSON payload: {}", e)))?;
        let value = self.restore(&json)?;
        debug!(
            root = value.type_name(),
            bytes = data.len(),
            shared = self.restored.len(),
            "decoded value"
        );
        Ok(value)
    }

    /// Decode a nested JSON value within the current pass
    pub fn restore(&mut self, json: &Json) -> Result<Value> {
        if self.depth >= self.config.max_depth() {
            return Err(NdPickleError::format(format!(
                "document nested deeper than {} levels",
                self.config.max_depth()
            )));
        }
        self.depth += 1;
        let result = self.restore_value(json);
        self.depth -= 1;
        result
    }

    fn restore_value(&mut self, json: &Json) -> Result<Value> {
        match json {
            Json::Null => Ok(Value::None),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => restore_number(n),
            Json::String(s) => Ok(Value::Str(Arc::from(s.as_str()))),
            Json::Array(items) => Ok(Value::List(self.restore_all(items)?)),
            Json::Object(map) => self.restore_object(map),
        }
    }

    fn restore_all(&mut self, items: &[Json]) -> Result<Vec<Value>> {
        items.iter().map(|item| self.restore(item)).collect()
    }

    fn restore_object(&mut self, map: &Map<String, Json>) -> Result<Value> {
        let Some(key) = map.keys().find(|key| crate::wire::is_reserved(key)) else {
            let mut entries = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                entries.insert(Arc::from(key.as_str()), self.restore(value)?);
            }
            return Ok(Value::Dict(entries));
        };
        if map.len() != 1 {
            return Err(NdPickleError::format(format!(
                "'{}' record carries {} extra keys",
                key,
                map.len() - 1
            )));
        }
        let body = &map[key.as_str()];
        match key.as_str() {
            REDUCE_KEY => self.restore_reduced(body),
            REF_KEY => self.restore_ref(body),
            TUPLE_KEY => match body {
                Json::Array(items) => Ok(Value::Tuple(self.restore_all(items)?)),
                _ => Err(NdPickleError::format("'__tuple__' body must be an array")),
            },
            FLOAT_KEY => restore_float(body),
            DICT_KEY => self.restore_dict(body),
            TYPE_KEY => Err(NdPickleError::format(
                "type reference found outside a reduction",
            )),
            other => Err(NdPickleError::format(format!("unhandled record '{}'", other))),
        }
    }

    fn restore_reduced(&mut self, body: &Json) -> Result<Value> {
        let parts = match body {
            Json::Array(parts) if parts.len() == 2 => parts,
            _ => {
                return Err(NdPickleError::format(
                    "'__reduce__' body must be [constructor, args]",
                ))
            }
        };
        let tag = restore_type(&parts[0])?;
        let Json::Array(args) = &parts[1] else {
            return Err(NdPickleError::format(format!(
                "'{}' arguments must be an array",
                tag
            )));
        };

        let handlers = self.handlers;
        let handler = handlers.get(tag).ok_or_else(|| {
            NdPickleError::unsupported_type(format!("no handler registered for '{}'", tag))
        })?;
        trace!(%tag, args = args.len(), "restoring value");
        let value = handler.restore(tag, args, self)?;

        if value.identity().is_some() {
            self.restored.push(value.clone());
        }
        Ok(value)
    }

    fn restore_ref(&self, body: &Json) -> Result<Value> {
        let id = body
            .as_u64()
            .ok_or_else(|| NdPickleError::format("'__ref__' body must be a non-negative integer"))?;
        usize::try_from(id)
            .ok()
            .and_then(|id| self.restored.get(id))
            .cloned()
            .ok_or_else(|| {
                NdPickleError::format(format!(
                    "reference {} points past the {} shared values decoded so far",
                    id,
                    self.restored.len()
                ))
            })
    }

    fn restore_dict(&mut self, body: &Json) -> Result<Value> {
        let Json::Array(pairs) = body else {
            return Err(NdPickleError::format("'__dict__' body must be an array of pairs"));
        };
        let mut entries = IndexMap::with_capacity(pairs.len());
        for pair in pairs {
            match pair.as_array().map(Vec::as_slice) {
                Some([Json::String(key), value]) => {
                    entries.insert(Arc::from(key.as_str()), self.restore(value)?);
                }
                _ => {
                    return Err(NdPickleError::format(
                        "'__dict__' entries must be [string, value] pairs",
                    ))
                }
            }
        }
        Ok(Value::Dict(entries))
    }
}

fn restore_type(json: &Json) -> Result<TypeTag> {
    let name = json
        .as_object()
        .filter(|map| map.len() == 1)
        .and_then(|map| map.get(TYPE_KEY))
        .ok_or_else(|| NdPickleError::format("constructor must be a '__type__' record"))?;
    serde_json::from_value(name.clone())
        .map_err(|_| NdPickleError::format(format!("unknown type reference {}", name)))
}

fn restore_number(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    if n.is_u64() {
        return Err(NdPickleError::format(format!("integer {} overflows int64", n)));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| NdPickleError::format(format!("unreadable number {}", n)))
}

fn restore_float(body: &Json) -> Result<Value> {
    match body.as_str() {
        Some("nan") => Ok(Value::Float(f64::NAN)),
        Some("inf") => Ok(Value::Float(f64::INFINITY)),
        Some("-inf") => Ok(Value::Float(f64::NEG_INFINITY)),
        _ => Err(NdPickleError::format(format!(
            "'__float__' body must be nan, inf or -inf, got {}",
            body
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<Value> {
        let handlers = HandlerTable::new();
        let config = Config::default();
        Unpickler::new(&handlers, &config).decode(text.as_bytes())
    }

    #[test]
    fn test_primitives() {
        assert_eq!(decode("null").unwrap(), Value::None);
        assert_eq!(decode("false").unwrap(), Value::Bool(false));
        assert_eq!(decode("-7").unwrap(), Value::Int(-7));
        assert_eq!(decode("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(decode(r#""x""#).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_containers() {
        let value = decode(r#"{"__tuple__": [1, [2.0, null]]}"#).unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![
                Value::Int(1),
                Value::List(vec![Value::Float(2.0), Value::None])
            ])
        );
    }

    #[test]
    fn test_escaped_dict() {
        let Value::Dict(entries) = decode(r#"{"__dict__": [["__ref__", 1], ["b", 2]]}"#).unwrap()
        else {
            panic!("expected a dict");
        };
        assert_eq!(entries.get("__ref__"), Some(&Value::Int(1)));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_non_finite_floats() {
        match decode(r#"{"__float__": "nan"}"#).unwrap() {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            decode(r#"{"__float__": "inf"}"#).unwrap(),
            Value::Float(f64::INFINITY)
        );
        assert!(decode(r#"{"__float__": "huge"}"#).unwrap_err().is_format());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(decode("{not json").unwrap_err().is_format());
        assert!(decode(r#"{"__ref__": 0}"#).unwrap_err().is_format());
        assert!(decode(r#"{"__ref__": -1}"#).unwrap_err().is_format());
        assert!(decode(r#"{"__tuple__": 3}"#).unwrap_err().is_format());
        assert!(decode(r#"{"__type__": "series"}"#).unwrap_err().is_format());
        assert!(decode(r#"{"__reduce__": [{"__type__": "series"}]}"#)
            .unwrap_err()
            .is_format());
        assert!(decode(r#"{"__reduce__": [{"__type__": "series"}, 5]}"#)
            .unwrap_err()
            .is_format());
        assert!(decode("18446744073709551615").unwrap_err().is_format());
    }

    #[test]
    fn test_extra_keys_on_record() {
        let err = decode(r#"{"__tuple__": [], "other": 1}"#).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("extra keys"));
    }

    #[test]
    fn test_unknown_type_reference() {
        let err = decode(r#"{"__reduce__": [{"__type__": "matrix"}, []]}"#).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("unknown type reference"));
    }

    #[test]
    fn test_missing_handler_is_unsupported() {
        let err = decode(r#"{"__reduce__": [{"__type__": "table"}, []]}"#).unwrap_err();
        assert!(matches!(err, NdPickleError::UnsupportedType(_)));
    }

    #[test]
    fn test_depth_limit() {
        let handlers = HandlerTable::new();
        let config = Config::builder().with_max_depth(2).build();
        let mut unpickler = Unpickler::new(&handlers, &config);
        assert!(unpickler.decode(b"[[]]").is_ok());
        assert!(unpickler.decode(b"[[[]]]").unwrap_err().is_format());
    }
}
