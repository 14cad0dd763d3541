use crate::{List, Map, Value};
use chrono::SecondsFormat;
use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::ObjectId(v) => serializer.collect_str(v),
            Value::DateTime(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(v) | Value::Tuple(v) => serializer.collect_seq(v),
            Value::Map(v) => serializer.collect_map(v),
            Value::Record(v) => serializer.collect_map(v.fields()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "any generic tree")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {} does not fit in 64 bits", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut list = List::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(x) = seq.next_element()? {
            list.push(x);
        }
        Ok(Value::List(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or_default());
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        Ok(Value::Map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Descriptor, ObjectId, Record, Shape};
    use chrono::{DateTime, Utc};

    #[test]
    fn passes_through_the_bridge() {
        let value = Value::new_str_map(vec![
            ("a", Value::from(vec![Value::Int(1), Value::Null])),
            ("b", Value::Bytes(vec![1, 2])),
            ("c", Value::Bool(false)),
        ]);
        assert_eq!(Value::enc(&value), Ok(value.clone()));
        assert_eq!(value.clone().decode::<Value>(), Ok(value));
    }

    #[test]
    fn extension_leaves_serialize_as_strings() {
        let id = ObjectId::from_bytes([1; 12]);
        assert_eq!(Value::enc(&Value::from(id)), Ok(Value::Str(id.to_string())));

        let dt = DateTime::<Utc>::from_timestamp_millis(1_500).unwrap();
        assert_eq!(
            Value::enc(&Value::from(dt)),
            Ok(Value::from("1970-01-01T00:00:01.500Z"))
        );
    }

    #[test]
    fn tuples_and_records_flatten() {
        assert_eq!(
            Value::enc(&Value::from((1, "a"))),
            Ok(Value::from(vec![Value::Int(1), Value::from("a")]))
        );

        let s = Shape::builder("S").field("x", Descriptor::INT).finish();
        let r = Record::new(&s, vec![("x", Value::Int(1))]).unwrap();
        assert_eq!(
            Value::enc(&Value::Record(r)),
            Ok(Value::new_str_map(vec![("x", Value::Int(1))]))
        );
    }
}
