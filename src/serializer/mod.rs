//! The dispatch facade.
//!
//! A [`Serializer`] owns two [`Refinement`] registries. The serialization registry is searched
//! with a _value_ (keys match values they are an [element](crate::desc::is_element) of), the
//! deserialization registry with a _target descriptor_ (keys match descriptors that are their
//! [subtype](crate::desc::is_subtype)). Handlers receive the serializer so containers and records
//! can dispatch their elements back through it.
//!
//! Unless disabled through [`SerializerBuilder::without_defaults`], every serializer carries
//! default handlers in its fallback layer:
//! - serializing any record: its fields as a map, passed back through [`Serializer::serialize`],
//! - deserializing any record: [`record_deserialization`](crate::convert::record_deserialization),
//! - deserializing any union: [`union_deserialization`](crate::convert::union_deserialization).
//!
//! Explicit registrations always outrank these defaults.
use crate::{
    convert::{record_deserialization, record_serialization, union_deserialization},
    desc::{is_element, is_subtype, matches_target},
    refine::RefineError,
    Descriptor, Error, Refinement, Result, Value,
};
use log::{debug, trace};
use std::{fmt, sync::Arc};

mod builder;

pub use builder::SerializerBuilder;

/// A registered serialization handler.
pub type SerializeFn = Arc<dyn Fn(&Serializer, &Value) -> Result<Value> + Send + Sync>;

/// A registered deserialization handler.
pub type DeserializeFn =
    Arc<dyn Fn(&Serializer, &Descriptor, &Value) -> Result<Value> + Send + Sync>;

/// Converts values to generic trees and back, dispatching on registered handlers.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let mut ser = Serializer::new();
/// ser.register(
///     Descriptor::one_of(vec![Descriptor::INT, Descriptor::STR]),
///     |_, v| noop_serialization(v),
///     |_, t, v| noop_deserialization(t, v),
/// );
///
/// assert_eq!(ser.serialize(&Value::Int(1)), Ok(Value::Int(1)));
/// assert!(ser.serialize(&Value::Float(1.0)).is_err()); // nothing registered for floats
///
/// // the union default dispatches each alternative
/// let d = Descriptor::union(vec![Descriptor::INT, Descriptor::STR]);
/// assert_eq!(ser.deserialize(&d, &Value::from("5")), Ok(Value::from("5")));
/// ```
pub struct Serializer {
    serializers: Refinement<Value, Descriptor, SerializeFn>,
    deserializers: Refinement<Descriptor, Descriptor, DeserializeFn>,
}

impl Serializer {
    /// A serializer with only the default handlers.
    pub fn new() -> Self {
        SerializerBuilder::new().build()
    }

    /// A builder to configure a serializer with.
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::new()
    }

    fn empty() -> Self {
        Serializer {
            serializers: Refinement::new(is_subtype, is_element),
            deserializers: Refinement::new(is_subtype, matches_target),
        }
    }

    fn install_defaults(&mut self) {
        self.serializers.setdefault(
            Descriptor::RecordMarker,
            Arc::new(|ser: &Serializer, value: &Value| ser.serialize(&record_serialization(value)?)),
        );
        self.deserializers.setdefault(
            Descriptor::RecordMarker,
            Arc::new(|ser: &Serializer, target: &Descriptor, value: &Value| {
                record_deserialization(target, value, |t, v| ser.deserialize(t, v))
            }),
        );
        self.deserializers.setdefault(
            Descriptor::UnionMarker,
            Arc::new(|ser: &Serializer, target: &Descriptor, value: &Value| {
                union_deserialization(target, value, |t, v| ser.deserialize(t, v))
            }),
        );
    }

    /// Convert `value` to its generic tree.
    ///
    /// Fails with [`Error::CannotConvert`] if no handler is registered for the value's type and
    /// [`Error::AmbiguousKey`] if more than one equally specific handler is.
    pub fn serialize(&self, value: &Value) -> Result<Value> {
        trace!("serializing {}", value.type_name());
        let f = self.serializers.get(value).map_err(|e| match e {
            RefineError::NotFound => Error::cannot_serialize(value),
            RefineError::Ambiguous(keys) => Error::ambiguous(value.type_name(), keys),
        })?;
        f(self, value)
    }

    /// Read the generic tree `value` as `target`.
    ///
    /// Fails with [`Error::CannotConvert`] if no handler is registered for `target` and
    /// [`Error::AmbiguousKey`] if more than one equally specific handler is.
    pub fn deserialize(&self, target: &Descriptor, value: &Value) -> Result<Value> {
        trace!("deserializing {} as {}", value.type_name(), target);
        let f = self.deserializers.get(target).map_err(|e| match e {
            RefineError::NotFound => Error::cannot_deserialize(target),
            RefineError::Ambiguous(keys) => Error::ambiguous(target, keys),
        })?;
        f(self, target, value)
    }

    /// Register a serialization handler for values that are elements of `key`.
    pub fn register_serializer<F>(&mut self, key: Descriptor, f: F)
    where
        F: Fn(&Serializer, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        debug!("registering serializer for {}", key);
        self.serializers.set(key, Arc::new(f));
    }

    /// Register a deserialization handler for targets that are subtypes of `key`.
    pub fn register_deserializer<F>(&mut self, key: Descriptor, f: F)
    where
        F: Fn(&Serializer, &Descriptor, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        debug!("registering deserializer for {}", key);
        self.deserializers.set(key, Arc::new(f));
    }

    /// Register both directions for `key`.
    pub fn register<S, D>(&mut self, key: Descriptor, ser: S, de: D)
    where
        S: Fn(&Serializer, &Value) -> Result<Value> + Send + Sync + 'static,
        D: Fn(&Serializer, &Descriptor, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_serializer(key.clone(), ser);
        self.register_deserializer(key, de);
    }

    /// The serialization registry.
    pub fn serializers(&self) -> &Refinement<Value, Descriptor, SerializeFn> {
        &self.serializers
    }

    /// The deserialization registry.
    pub fn deserializers(&self) -> &Refinement<Descriptor, Descriptor, DeserializeFn> {
        &self.deserializers
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Serializer::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("serializers", &self.serializers)
            .field("deserializers", &self.deserializers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::*;
    use crate::{Record, Shape};

    fn leaves() -> Serializer {
        Serializer::builder()
            .codec_pair(
                Descriptor::one_of(vec![Descriptor::INT, Descriptor::STR, Descriptor::NULL]),
                |_, v| noop_serialization(v),
                |_, t, v| noop_deserialization(t, v),
            )
            .serializer(Descriptor::MAP, |ser, v| {
                map_serialization(v, |k| ser.serialize(k), |v| ser.serialize(v))
            })
            .build()
    }

    #[test]
    fn is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<Serializer>();
    }

    #[test]
    fn missing_handlers() {
        let ser = Serializer::new();
        let e = ser.serialize(&Value::Int(1)).unwrap_err();
        assert_eq!(e, Error::CannotConvert("cannot serialize type int".into()));

        let e = ser.deserialize(&Descriptor::INT, &Value::Int(1)).unwrap_err();
        assert_eq!(e, Error::CannotConvert("cannot deserialize to type int".into()));
    }

    #[test]
    fn default_record_handlers() {
        let ser = leaves();
        let s = Shape::builder("S")
            .field("a", Descriptor::INT)
            .field("b", Descriptor::optional(Descriptor::STR))
            .finish();

        let tree = Value::new_str_map(vec![("a", Value::Int(1)), ("b", Value::Null)]);
        let r = ser.deserialize(&Descriptor::record(&s), &tree).unwrap();
        assert_eq!(
            r,
            Value::Record(Record::new(&s, vec![("a", Value::Int(1)), ("b", Value::Null)]).unwrap())
        );
        assert_eq!(ser.serialize(&r), Ok(tree));
    }

    #[test]
    fn explicit_record_handler_outranks_default() {
        let mut ser = leaves();
        let s = Shape::builder("S").field("a", Descriptor::INT).finish();
        ser.register(
            Descriptor::record(&s),
            |_, _| Ok(Value::from("custom")),
            |_, _, _| Ok(Value::from("custom")),
        );

        let r = Value::Record(Record::new(&s, vec![("a", Value::Int(1))]).unwrap());
        assert_eq!(ser.serialize(&r), Ok(Value::from("custom")));
        assert_eq!(ser.deserialize(&Descriptor::record(&s), &Value::Null), Ok(Value::from("custom")));
    }

    #[test]
    fn explicit_union_handler_outranks_default() {
        let mut ser = leaves();
        ser.register_deserializer(Descriptor::UNION, |_, _, _| Ok(Value::from("shadowed")));

        let d = Descriptor::optional(Descriptor::INT);
        assert_eq!(ser.deserialize(&d, &Value::Int(1)), Ok(Value::from("shadowed")));
    }

    #[test]
    fn ambiguity_is_reported_not_swallowed() {
        let mut ser = leaves();
        ser.register_deserializer(Descriptor::one_of(vec![Descriptor::FLOAT, Descriptor::BOOL]), |_, _, v| Ok(v.clone()));
        ser.register_deserializer(Descriptor::one_of(vec![Descriptor::FLOAT, Descriptor::BYTES]), |_, _, v| Ok(v.clone()));

        let e = ser.deserialize(&Descriptor::FLOAT, &Value::Float(1.0)).unwrap_err();
        assert_eq!(
            e,
            Error::AmbiguousKey {
                subject: "float".into(),
                keys: vec!["(float, bool)".into(), "(float, bytes)".into()],
            }
        );

        // the union converter does not hide it either
        let d = Descriptor::union(vec![Descriptor::FLOAT, Descriptor::INT]);
        assert!(matches!(
            ser.deserialize(&d, &Value::Int(1)),
            Err(Error::AmbiguousKey { .. })
        ));

        // a more specific registration resolves it
        ser.register_deserializer(Descriptor::FLOAT, |_, t, v| noop_deserialization(t, v));
        assert_eq!(ser.deserialize(&Descriptor::FLOAT, &Value::Float(1.0)), Ok(Value::Float(1.0)));
    }

    #[test]
    fn without_defaults() {
        let ser = Serializer::builder().without_defaults().build();
        let s = Shape::builder("S").finish();
        let e = ser.deserialize(&Descriptor::record(&s), &Value::new_map(vec![]));
        assert!(matches!(e, Err(Error::CannotConvert(_))));
        assert!(ser.deserializers().fallback().is_none());
    }
}
