use ndpickle_core::*;
use ndpickle_host::*;
use serde_json::json;
use std::sync::Arc;

use test_helpers::*;

fn parse(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn test_repeated_array_becomes_reference() {
    let array = Arc::new(NdArray::from_vec(vec![1i64, 2]));
    let value = Value::List(vec![Value::Array(array.clone()), Value::Array(array)]);

    let text = encode_with(&value, &Config::default()).unwrap();
    assert_eq!(
        parse(&text),
        json!([
            {"__reduce__": [{"__type__": "ndarray"}, [[1, 2]]]},
            {"__ref__": 0}
        ])
    );

    let Value::List(items) = roundtrip(&value).unwrap() else {
        panic!("expected a list");
    };
    assert!(items[0].ptr_eq(&items[1]));
    assert_eq!(items[0], value_at(&value, 0));
}

fn value_at(value: &Value, i: usize) -> Value {
    match value {
        Value::List(items) => items[i].clone(),
        _ => panic!("expected a list"),
    }
}

#[test]
fn test_equal_but_distinct_arrays_are_not_shared() {
    let value = Value::List(vec![
        Value::from(NdArray::from_vec(vec![1i64])),
        Value::from(NdArray::from_vec(vec![1i64])),
    ]);
    let text = encode_with(&value, &Config::default()).unwrap();
    assert!(!text.contains("__ref__"));

    let Value::List(items) = roundtrip(&value).unwrap() else {
        panic!("expected a list");
    };
    assert!(!items[0].ptr_eq(&items[1]));
}

#[test]
fn test_ids_follow_completion_order() {
    let values = Arc::new(NdArray::from_vec(vec![10i64, 20, 30]));
    let index = Arc::new(Index::int64(vec![0, 1, 2]));
    let series = Series::new(values.clone(), index.clone()).unwrap();
    let value = Value::List(vec![
        Value::from(series),
        Value::Array(values),
        Value::Index(index),
    ]);

    // values -> 0, index values -> 1, index -> 2, series -> 3
    let text = encode_with(&value, &Config::default()).unwrap();
    let json = parse(&text);
    assert_eq!(json[1], json!({"__ref__": 0}));
    assert_eq!(json[2], json!({"__ref__": 2}));

    let Value::List(items) = roundtrip(&value).unwrap() else {
        panic!("expected a list");
    };
    let series = items[0].as_series().unwrap();
    assert!(Value::Array(series.values().clone()).ptr_eq(&items[1]));
    assert!(Value::Index(series.index().clone()).ptr_eq(&items[2]));
}

#[test]
fn test_make_refs_disabled_writes_full_copies() {
    let array = Arc::new(NdArray::from_vec(vec![5i64]));
    let value = Value::Tuple(vec![Value::Array(array.clone()), Value::Array(array)]);
    let config = Config::builder().with_make_refs(false).build();

    let text = encode_with(&value, &config).unwrap();
    assert!(!text.contains("__ref__"));

    let Value::Tuple(items) = decode_with(&text, &config).unwrap() else {
        panic!("expected a tuple");
    };
    assert_eq!(items[0], items[1]);
    assert!(!items[0].ptr_eq(&items[1]));
}

#[test]
fn test_encodings_are_independent() {
    let array = Arc::new(NdArray::from_vec(vec![7i64]));
    let value = Value::Array(array);
    let handlers = stub_handlers();
    let config = Config::default();
    let mut pickler = Pickler::new(&handlers, &config);

    let first = pickler.encode(&value).unwrap();
    let second = pickler.encode(&value).unwrap();
    assert_eq!(first, second);
    assert!(!String::from_utf8(second).unwrap().contains("__ref__"));
}

#[test]
fn test_reference_to_unfinished_value_is_rejected() {
    let text = r#"{"__reduce__": [{"__type__": "series"}, [{"__ref__": 0}, {"__ref__": 0}]]}"#;
    let err = decode_with(text, &Config::default()).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_handler_errors_propagate() {
    let text = r#"{"__reduce__": [{"__type__": "ndarray"}, [[1, 2], "extra"]]}"#;
    let err = decode_with(text, &Config::default()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("'ndarray' expects 1 arguments, got 2"));
}
