use crate::{List, Map, ObjectId, Record};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A dynamic value: both sides of every conversion.
///
/// Leaves are the JSON primitives (null, booleans, integers, floats, strings) plus byte strings,
/// [`ObjectId`]s, and UTC timestamps. Containers are _lists_ (homogeneous sequences), _tuples_
/// (fixed arity heterogeneous sequences), _maps_ (insertion ordered), and [`Record`]s (instances
/// of a declared [`Shape`]).
///
/// A _generic tree_ is a `Value` as produced by serializing: no records, and for the JSON preset
/// no tuples either.
///
/// # Equality
/// Equality is strict. No coercion happens between variants, so `Int(1) != Float(1.0)`. Floats
/// are compared by their bit pattern, which makes `Value` [`Eq`] and [`Hash`] and lets it key a
/// [`Map`].
///
/// ```rust
/// # use tyser::*;
/// assert_ne!(Value::Int(1), Value::Float(1.0));
/// assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
/// assert_eq!(Value::from(vec![1, 2]), Value::List(vec![Value::Int(1), Value::Int(2)]));
/// ```
///
/// [`Shape`]: crate::Shape
#[derive(Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string value.
    Str(String),
    /// A byte string.
    Bytes(Vec<u8>),
    /// A document identifier.
    ObjectId(ObjectId),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// A homogeneous sequence of values.
    List(List),
    /// A fixed arity, heterogeneous sequence of values.
    Tuple(List),
    /// A mapping of keys to values, in insertion order.
    Map(Map),
    /// A record instance.
    Record(Record),
}

impl PartialEq for Value {
    fn eq(&self, b: &Self) -> bool {
        use Value::*;
        match (self, b) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (ObjectId(a), ObjectId(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Record(a), Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => (),
            Value::Bool(x) => x.hash(state),
            Value::Int(x) => x.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Str(x) => x.hash(state),
            Value::Bytes(x) => x.hash(state),
            Value::ObjectId(x) => x.hash(state),
            Value::DateTime(x) => x.hash(state),
            Value::List(x) | Value::Tuple(x) => x.hash(state),
            // map equality ignores entry order, so only the length is hashed
            Value::Map(x) => x.len().hash(state),
            Value::Record(x) => x.hash(state),
        }
    }
}

/// Constructors.
impl Value {
    /// Construct a new map value from a list of key-value pairs. Later duplicates overwrite
    /// earlier values but keep the first position.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let value = Value::new_map(vec![
    ///     (Value::from("a"), Value::from(1)),
    ///     (Value::from("b"), Value::from(2)),
    /// ]);
    /// assert_eq!(value.map().map(|m| m.len()), Some(2));
    /// ```
    pub fn new_map<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Value::Map(iter.into_iter().collect())
    }

    /// Construct a new map value keyed by strings.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let value = Value::new_str_map(vec![("a", Value::from(1))]);
    /// assert_eq!(
    ///     value.map().and_then(|m| m.get(&Value::from("a"))),
    ///     Some(&Value::Int(1))
    /// );
    /// ```
    pub fn new_str_map<I, S>(iter: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Value)>,
    {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (Value::Str(k.into()), v))
                .collect(),
        )
    }

    /// Construct a new tuple value.
    pub fn new_tuple<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Tuple(iter.into_iter().collect())
    }
}

/// Convenience methods for accessing values straight from the [`Value`] enum.
impl Value {
    /// `Value` is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Value` is a boolean value.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// assert_eq!(Value::Bool(true).bool(), Some(true));
    /// assert_eq!(Value::Int(1).bool(), None);
    /// ```
    pub fn bool(&self) -> Option<bool> {
        match self {
            Value::Bool(x) => Some(*x),
            _ => None,
        }
    }

    /// `Value` is an integer.
    pub fn int(&self) -> Option<i64> {
        match self {
            Value::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// `Value` is a floating point number. Integers are _not_ widened.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// assert_eq!(Value::Float(3.14).float(), Some(3.14));
    /// assert_eq!(Value::Int(3).float(), None);
    /// ```
    pub fn float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// `Value` is a string.
    pub fn str(&self) -> Option<&str> {
        match self {
            Value::Str(x) => Some(x.as_str()),
            _ => None,
        }
    }

    /// `Value` is a string. Can be altered.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let mut value = Value::from("Hello");
    /// value.str_mut().map(|x| x.push_str(", world!"));
    /// assert_eq!(value.str(), Some("Hello, world!"));
    /// ```
    pub fn str_mut(&mut self) -> Option<&mut String> {
        match self {
            Value::Str(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a byte string.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    /// `Value` is a document identifier.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(x) => Some(*x),
            _ => None,
        }
    }

    /// `Value` is a timestamp.
    pub fn datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a list.
    pub fn list(&self) -> Option<&List> {
        match self {
            Value::List(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a list. Can be altered.
    pub fn list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a tuple.
    pub fn tuple(&self) -> Option<&List> {
        match self {
            Value::Tuple(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a list or a tuple.
    ///
    /// As lists and tuples share the same backing store, testing for either can be useful.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let value = Value::from((1, "a"));
    /// assert_eq!(value.list_or_tuple().map(|x| x.len()), Some(2));
    /// ```
    pub fn list_or_tuple(&self) -> Option<&List> {
        match self {
            Value::List(x) | Value::Tuple(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a map.
    pub fn map(&self) -> Option<&Map> {
        match self {
            Value::Map(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a map. Can be altered.
    pub fn map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(x) => Some(x),
            _ => None,
        }
    }

    /// `Value` is a record.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Value::Record(x) => Some(x),
            _ => None,
        }
    }

    /// The name of the value's runtime type, as used in error messages. Records report their
    /// shape's name.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// assert_eq!(Value::from("a").type_name(), "str");
    /// assert_eq!(Value::from(vec![1.0]).type_name(), "list");
    /// ```
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::ObjectId(_) => "ObjectId",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Record(r) => r.shape().name(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({:?})", v),
            Value::Str(v) => write!(f, "Str({:?})", v),
            Value::Bytes(v) => write!(f, "Bytes({:?})", v),
            Value::ObjectId(v) => write!(f, "{:?}", v),
            Value::DateTime(v) => write!(f, "DateTime({:?})", v),
            Value::List(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Tuple(v) => {
                let mut d = f.debug_tuple("Tuple");
                for i in v {
                    d.field(i);
                }
                d.finish()
            }
            Value::Map(v) => f.debug_map().entries(v.iter()).finish(),
            Value::Record(v) => write!(f, "{:?}", v),
        }
    }
}

/// A readable rendering used in error messages.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// let value = Value::new_map(vec![
///     (Value::from("a"), Value::from((1, 2.5))),
///     (Value::from("b"), Value::from(vec![true])),
/// ]);
/// assert_eq!(value.to_string(), r#"{"a": (1, 2.5), "b": [true]}"#);
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Bytes(v) => {
                write!(f, "b\"")?;
                for b in v {
                    write!(f, "{}", std::ascii::escape_default(*b))?;
                }
                write!(f, "\"")
            }
            Value::ObjectId(v) => write!(f, "{:?}", v),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::List(v) => {
                write!(f, "[")?;
                write_seq(f, v)?;
                write!(f, "]")
            }
            Value::Tuple(v) => {
                write!(f, "(")?;
                write_seq(f, v)?;
                if v.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Map(v) => {
                write!(f, "{{")?;
                for (i, (k, v)) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Record(v) => write!(f, "{}", v),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter, seq: &[Value]) -> fmt::Result {
    for (i, x) in seq.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", x)?;
    }
    Ok(())
}
