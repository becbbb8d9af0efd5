//! Reserved keys of the JSON wire format

use serde_json::{Map, Value as Json};

/// `{"__reduce__": [constructor, [args...]]}`
pub const REDUCE_KEY: &str = "__reduce__";
/// `{"__type__": "<tag>"}`, the constructor reference inside a reduction
pub const TYPE_KEY: &str = "__type__";
/// `{"__ref__": n}`, the n-th shared value already decoded
pub const REF_KEY: &str = "__ref__";
/// `{"__tuple__": [...]}`
pub const TUPLE_KEY: &str = "__tuple__";
/// `{"__float__": "nan" | "inf" | "-inf"}`
pub const FLOAT_KEY: &str = "__float__";
/// `{"__dict__": [[key, value], ...]}` for dicts that use a reserved key
pub const DICT_KEY: &str = "__dict__";

pub const RESERVED_KEYS: [&str; 6] = [
    REDUCE_KEY, TYPE_KEY, REF_KEY, TUPLE_KEY, FLOAT_KEY, DICT_KEY,
];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A one-entry JSON object
pub fn record(key: &str, value: Json) -> Json {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Json::Object(map)
}
