use ndpickle::*;
use std::sync::Arc;
use tempfile::NamedTempFile;

use test_helpers::*;

fn sample_graph() -> Value {
    let index = Arc::new(seconds_index(3));
    let series = Series::new(NdArray::from_vec(vec![0.25f64, 0.5, 0.75]), index.clone()).unwrap();
    Value::Tuple(vec![
        Value::from(sample_table()),
        Value::from(series),
        Value::Index(index),
        Value::Scalar(Scalar::Int64(-12)),
        Value::from(NdArray::from_shape_vec(vec![2, 3], Order::ColumnMajor, vec![1u32, 2, 3, 4, 5, 6]).unwrap()),
    ])
}

#[test]
fn test_bytes_survive_a_new_process() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    let value = sample_graph();

    {
        let writer = Registry::new()?;
        std::fs::write(temp_file.path(), writer.dumps(&value)?)?;
    }

    // A registry that shares nothing with the writer
    let reader = Registry::new()?;
    let bytes = std::fs::read(temp_file.path())?;
    let decoded = reader.loads(&bytes)?;
    assert_eq!(decoded, value);

    let Value::Tuple(items) = &decoded else {
        panic!("expected a tuple");
    };
    let series = items[1].as_series().unwrap();
    assert!(Value::Index(series.index().clone()).ptr_eq(&items[2]));
    Ok(())
}

#[test]
fn test_encoding_is_deterministic() {
    let value = sample_graph();
    let first = dumps(&value).unwrap();
    let second = Registry::new().unwrap().dumps(&value).unwrap();
    assert_eq!(first, second);

    // Re-encoding the decoded graph reproduces the same bytes
    let again = dumps(&loads(&first).unwrap()).unwrap();
    assert_eq!(first, again);
}

#[test]
fn test_pretty_output_decodes_the_same() {
    let value = sample_graph();
    let registry = Registry::with_config(Config::builder().with_pretty(true).build()).unwrap();
    let pretty = registry.dumps(&value).unwrap();
    assert!(pretty.contains(&b'\n'));
    assert_eq!(loads(&pretty).unwrap(), value);
}
