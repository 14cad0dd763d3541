//! `From` conversions of Rust values into [`Value`]s.
//!
//! The conversions _consume_ the source, so strings and byte arrays are moved rather than
//! copied.
use crate::{ObjectId, Record, Value};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

// ********************* PRIMITIVES *******************************************

macro_rules! integers {
    ( $( $x:ty ) * ) => {
        $(
            impl From<$x> for Value {
                fn from(x: $x) -> Self {
                    Value::Int(i64::from(x))
                }
            }
        )*
    };
}

integers!(i8 i16 i32 i64 u8 u16 u32);

macro_rules! floats {
    ( $( $x:ty ) * ) => {
        $(
            impl From<$x> for Value {
                fn from(x: $x) -> Self {
                    Value::Float(f64::from(x))
                }
            }
        )*
    };
}

floats!(f32 f64);

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Value::Bool(x)
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Value::Str(x)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(x: &'a str) -> Self {
        Value::Str(x.to_string())
    }
}

impl From<ObjectId> for Value {
    fn from(x: ObjectId) -> Self {
        Value::ObjectId(x)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(x: DateTime<Utc>) -> Self {
        Value::DateTime(x)
    }
}

impl From<Record> for Value {
    fn from(x: Record) -> Self {
        Value::Record(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map(Into::into).unwrap_or(Value::Null)
    }
}

// ********************* TUPLES ***********************************************

macro_rules! tuples {
    ( $( $element:tt|$idx:tt ),+ ) => {
        impl<$($element,)*> From<($($element,)*)> for Value
        where
            $(
                $element: Into<Value>,
            )*
        {
            fn from(x: ($($element,)*)) -> Self {
                Value::Tuple(vec![$(
                    x.$idx.into(),
                )*])
            }
        }
    }
}

tuples!(A|0);
tuples!(A|0, B|1);
tuples!(A|0, B|1, C|2);
tuples!(A|0, B|1, C|2, D|3);
tuples!(A|0, B|1, C|2, D|3, E|4);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6, H|7);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6, H|7, I|8);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6, H|7, I|8, J|9);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6, H|7, I|8, J|9, K|10);
tuples!(A|0, B|1, C|2, D|3, E|4, F|5, G|6, H|7, I|8, J|9, K|10, L|11);

// ********************* SEQUENCES AND MAPS ***********************************

/// Vectors become lists. Use [`Value::Bytes`] directly for byte strings.
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(x: Vec<T>) -> Self {
        Value::List(x.into_iter().map(Into::into).collect())
    }
}

impl<K, V, S> From<IndexMap<K, V, S>> for Value
where
    K: Into<Value>,
    V: Into<Value>,
{
    fn from(x: IndexMap<K, V, S>) -> Self {
        Value::new_map(x.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: Into<Value>,
    V: Into<Value>,
{
    fn from(x: BTreeMap<K, V>) -> Self {
        Value::new_map(x.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for Value
where
    K: Into<Value>,
    V: Into<Value>,
    S: BuildHasher,
{
    fn from(x: HashMap<K, V, S>) -> Self {
        Value::new_map(x.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}
