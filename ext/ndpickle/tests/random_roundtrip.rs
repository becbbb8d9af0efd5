use ndpickle::*;
use rand::Rng;

use test_helpers::*;

fn random_shape(rng: &mut impl Rng) -> Vec<usize> {
    let ndim = rng.random_range(1..=3);
    (0..ndim).map(|_| rng.random_range(0..5)).collect()
}

fn random_order(rng: &mut impl Rng) -> Order {
    if rng.random_bool(0.5) {
        Order::RowMajor
    } else {
        Order::ColumnMajor
    }
}

#[test]
fn test_random_numeric_arrays() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let shape = random_shape(&mut rng);
        let order = random_order(&mut rng);
        let count: usize = shape.iter().product();

        let ints: Vec<i64> = (0..count).map(|_| rng.random()).collect();
        let array = NdArray::from_shape_vec(shape.clone(), order, ints).unwrap();
        let (original, decoded) = roundtrip_array(array);
        assert!(decoded.layout_eq(&original), "int64 {:?} {:?}", shape, order);

        let floats: Vec<f32> = (0..count).map(|_| rng.random_range(-1e6..1e6)).collect();
        let array = NdArray::from_shape_vec(shape.clone(), order, floats).unwrap();
        let (original, decoded) = roundtrip_array(array);
        assert!(decoded.layout_eq(&original), "float32 {:?} {:?}", shape, order);
    }
}

#[test]
fn test_random_tables() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let rows = rng.random_range(0..8);
        let mut builder = Table::builder(Index::range(rows));
        for column in 0..rng.random_range(1..5) {
            let values: Vec<u16> = (0..rows).map(|_| rng.random()).collect();
            builder = builder.column(format!("c{}", column), NdArray::from_vec(values));
        }
        let table = builder.build().unwrap();
        let decoded = roundtrip(&Value::from(table.clone()));
        assert_table_eq(&table, decoded.as_table().unwrap());
    }
}

#[test]
fn test_random_scalars() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let int = Scalar::Int64(rng.random_range(-(1i64 << 53)..=(1i64 << 53)));
        assert_eq!(roundtrip(&Value::Scalar(int)), Value::Scalar(int));

        let float = Scalar::Float64(rng.random::<f64>() * 1e12);
        assert_eq!(roundtrip(&Value::Scalar(float)), Value::Scalar(float));
    }
}
