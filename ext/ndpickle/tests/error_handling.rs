use ndpickle::*;

use test_helpers::*;

fn load(text: &str) -> Result<Value> {
    loads(text.as_bytes())
}

#[test]
fn test_buffer_length_mismatch() {
    // Three int64 elements need 24 bytes; the payload holds 16
    let text = r#"{"__reduce__": [{"__type__": "ndarray"},
        [{"__tuple__": [3]}, "int64", "AQAAAAAAAAACAAAAAAAAAA==", "C"]]}"#;
    let err = load(text).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("buffer holds 16 bytes"));
}

#[test]
fn test_invalid_base64() {
    let text = r#"{"__reduce__": [{"__type__": "ndarray"}, [{"__tuple__": [1]}, "uint8", "@@", "C"]]}"#;
    let err = load(text).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("not base64"));
}

#[test]
fn test_unknown_dtype() {
    let text = r#"{"__reduce__": [{"__type__": "ndarray"}, [{"__tuple__": [1]}, "complex128", "", "C"]]}"#;
    assert!(load(text).unwrap_err().is_format());
}

#[test]
fn test_oversized_text_width() {
    let text = r#"{"__reduce__": [{"__type__": "ndarray"},
        [{"__tuple__": [0]}, "<U4611686018427387905", "", "C"]]}"#;
    let err = load(text).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("invalid text width"));
}

#[test]
fn test_zero_width_text_labels() {
    let mut json = to_json(&Value::from(sample_table()));
    json["__reduce__"][1][2] = serde_json::json!({"__reduce__": [{"__type__": "index"}, [
        {"__reduce__": [{"__type__": "ndarray"},
            [{"__tuple__": [2305843009213693952u64]}, "<U0", "", "C"]]}
    ]]});
    let err = load(&json.to_string()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("invalid text width"));
}

#[test]
fn test_invalid_code_points() {
    for (payload, code_point) in [("AAARAA==", "0x110000"), ("ANgAAA==", "0xd800")] {
        let text = format!(
            r#"{{"__reduce__": [{{"__type__": "ndarray"}}, [{{"__tuple__": [1]}}, "<U1", "{}", "C"]]}}"#,
            payload
        );
        let err = load(&text).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains(code_point), "{}", err);
    }
}

#[test]
fn test_encode_error_names_table_column() {
    let bad = NdArray::from_values(vec![Value::Scalar(Scalar::Int64(1 << 60))]);
    let table = Table::builder(Index::range(1))
        .column("ok", NdArray::from_vec(vec![1i64]))
        .column("bad", bad)
        .build()
        .unwrap();
    let err = dumps(&Value::from(table)).unwrap_err();
    assert!(matches!(err, NdPickleError::UnsupportedType(_)));
    assert!(err.to_string().contains("table column 1"));
}

#[test]
fn test_series_length_mismatch() {
    let series = Series::new(NdArray::from_vec(vec![1i64, 2, 3]), Index::range(3)).unwrap();
    let mut json = to_json(&Value::from(series));
    // Swap the index for a two-element one
    json["__reduce__"][1][1] = to_json(&Value::from(Index::range(2)));
    let err = load(&json.to_string()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("series"));
}

#[test]
fn test_column_label_count_mismatch() {
    let mut json = to_json(&Value::from(sample_table()));
    json["__reduce__"][1][2] = to_json(&Value::from(Index::int64(vec![0])));
    let err = load(&json.to_string()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("column labels"));
}

#[test]
fn test_column_label_collision() {
    let mut json = to_json(&Value::from(sample_table()));
    json["__reduce__"][1][2] = to_json(&Value::from(Index::int64(vec![4, 4])));
    let err = load(&json.to_string()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("appears at positions 0 and 1"));
}

#[test]
fn test_frequency_mismatch() {
    let values = NdArray::from_datetime_values(vec![0, 2], TimeUnit::Second);
    let index = Index::datetime(values, None).unwrap();
    let mut json = to_json(&Value::from(index));
    json["__reduce__"][1][1] = serde_json::json!("1 second");
    let err = load(&json.to_string()).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("position 1"));

    json["__reduce__"][1][1] = serde_json::json!("every tuesday");
    assert!(load(&json.to_string()).unwrap_err().is_format());
}

#[test]
fn test_typed_index_dtype_mismatch() {
    let mut json = to_json(&Value::from(Index::int64(vec![1, 2])));
    json["__reduce__"][1][0] = to_json(&Value::from(NdArray::from_vec(vec![1.0f64, 2.0])));
    assert!(load(&json.to_string()).unwrap_err().is_format());
}

#[test]
fn test_wrong_argument_kinds() {
    let text = r#"{"__reduce__": [{"__type__": "series"}, [1, 2]]}"#;
    let err = load(text).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("expected an array argument"));

    let text = r#"{"__reduce__": [{"__type__": "table"}, [{}, null, null]]}"#;
    assert!(load(text).unwrap_err().is_format());
}

#[test]
fn test_wrong_arity() {
    let text = r#"{"__reduce__": [{"__type__": "int64_index"}, []]}"#;
    let err = load(text).unwrap_err();
    assert!(err.to_string().contains("'int64_index' expects 1 arguments, got 0"));
}

#[test]
fn test_malformed_document() {
    assert!(load("").unwrap_err().is_format());
    assert!(load(r#"{"__reduce__": {"__type__": "table"}}"#).unwrap_err().is_format());
    assert!(load(r#"{"__reduce__": [{"__type__": "dataframe"}, []]}"#).unwrap_err().is_format());
}

#[test]
fn test_unsupported_scalar_range() {
    let err = dumps(&Value::Scalar(Scalar::Int64(1 << 60))).unwrap_err();
    assert!(matches!(err, NdPickleError::UnsupportedType(_)));
}

#[test]
fn test_missing_handler_on_custom_table() {
    let handlers = HandlerTable::new();
    let config = Config::default();
    let err = Pickler::new(&handlers, &config)
        .encode(&Value::from(sample_table()))
        .unwrap_err();
    assert!(matches!(err, NdPickleError::UnsupportedType(_)));
}

#[test]
fn test_depth_limit_on_nested_objects() {
    let mut value = Value::Int(0);
    for _ in 0..40 {
        value = Value::from(NdArray::from_values(vec![value]));
    }
    let err = dumps(&value).unwrap_err();
    assert!(matches!(err, NdPickleError::UnsupportedType(_)));

    let registry = Registry::with_config(Config::builder().with_max_depth(64).build()).unwrap();
    let bytes = registry.dumps(&value).unwrap();
    // The default registry refuses to decode what the deeper one wrote
    assert!(loads(&bytes).unwrap_err().is_format());
}
