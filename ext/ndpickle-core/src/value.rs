use crate::{Index, NdArray, Scalar, Series, Table, TypeTag};
use indexmap::IndexMap;
use std::sync::Arc;

/// A node in the object graph handed to the pickler
///
/// Buffer-backed values sit behind an `Arc`; two branches holding clones of
/// the same `Arc` are one shared sub-value and are encoded once.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),

    // Containers
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(IndexMap<Arc<str>, Value>), // Preserves insertion order

    // Handler-backed kinds
    Scalar(Scalar),
    Array(Arc<NdArray>),
    Index(Arc<Index>),
    Series(Arc<Series>),
    Table(Arc<Table>),
}

impl Value {
    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Dict(_) => "Dict",
            Value::Scalar(_) => "Scalar",
            Value::Array(_) => "Array",
            Value::Index(_) => "Index",
            Value::Series(_) => "Series",
            Value::Table(_) => "Table",
        }
    }

    /// Codec identity, or `None` for values the pickler handles itself
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Scalar(scalar) => Some(scalar.type_tag()),
            Value::Array(_) => Some(TypeTag::NdArray),
            Value::Index(index) => Some(index.type_tag()),
            Value::Series(_) => Some(TypeTag::Series),
            Value::Table(_) => Some(TypeTag::Table),
            _ => None,
        }
    }

    /// Address of the shared allocation behind a buffer-backed value
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(Arc::as_ptr(a) as *const () as usize),
            Value::Index(i) => Some(Arc::as_ptr(i) as *const () as usize),
            Value::Series(s) => Some(Arc::as_ptr(s) as *const () as usize),
            Value::Table(t) => Some(Arc::as_ptr(t) as *const () as usize),
            _ => None,
        }
    }

    /// Whether both values are the same shared allocation
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_array(&self) -> Option<&Arc<NdArray>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<&Arc<Index>> {
        match self {
            Value::Index(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&Arc<Series>> {
        match self {
            Value::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Arc<Table>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<NdArray> for Value {
    fn from(value: NdArray) -> Self {
        Value::Array(Arc::new(value))
    }
}

impl From<Index> for Value {
    fn from(value: Index) -> Self {
        Value::Index(Arc::new(value))
    }
}

impl From<Series> for Value {
    fn from(value: Series) -> Self {
        Value::Series(Arc::new(value))
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(Arc::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        let v = Value::from(42i64);
        assert_eq!(v, Value::Int(42));
        assert_eq!(v.type_name(), "Int");
        assert_eq!(v.type_tag(), None);
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::from(Scalar::Int64(1)).type_tag(), Some(TypeTag::Int64));
        assert_eq!(Value::from(Scalar::Float64(1.0)).type_tag(), Some(TypeTag::Float64));
        assert_eq!(
            Value::from(NdArray::from_vec(vec![1u8])).type_tag(),
            Some(TypeTag::NdArray)
        );
        assert_eq!(
            Value::from(Index::float64(vec![0.5])).type_tag(),
            Some(TypeTag::Float64Index)
        );
    }

    #[test]
    fn test_identity_follows_arc() {
        let array = Arc::new(NdArray::from_vec(vec![1i64, 2]));
        let a = Value::Array(array.clone());
        let b = Value::Array(array);
        let c = Value::from(NdArray::from_vec(vec![1i64, 2]));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a, c);
        assert_eq!(Value::Scalar(Scalar::Int64(1)).identity(), None);
    }

    #[test]
    fn test_dict_preserves_order() {
        let mut map: IndexMap<Arc<str>, Value> = IndexMap::new();
        map.insert(Arc::from("b"), Value::Int(1));
        map.insert(Arc::from("a"), Value::Int(2));
        let keys: Vec<&str> = map.keys().map(|k| k.as_ref()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(Value::Dict(map).type_name(), "Dict");
    }
}
