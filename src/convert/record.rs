use crate::{Descriptor, Error, Fields, Result, Value};
use log::trace;

/// The record's fields as a map keyed by field name.
///
/// Field values are _not_ converted; a serializer handler passes the map back through the
/// serializer so every field value is dispatched in turn.
pub fn record_serialization(value: &Value) -> Result<Value> {
    let record = value.record().ok_or_else(|| {
        Error::ShapeMismatch(format!(
            "cannot serialize {} {} using record serialization",
            value.type_name(),
            value
        ))
    })?;

    Ok(Value::new_str_map(
        record.fields().iter().map(|(k, v)| (k.as_str(), v.clone())),
    ))
}

/// Decode a map into a record of `target`.
///
/// The target's type arguments are bound to its shape's parameters; a generic record with free
/// parameters can not be decoded. Every declared field present in the map is decoded with `de`
/// against its field type. Absent fields are left for the shape's constructor to default, and
/// keys the shape does not declare are ignored.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let point = Shape::builder("Point")
///     .field("x", Descriptor::INT)
///     .field_with_default("y", Descriptor::INT, Value::Int(0))
///     .finish();
/// let target = Descriptor::record(&point);
///
/// let map = Value::new_str_map(vec![("x", Value::Int(3))]);
/// let p = record_deserialization(&target, &map, noop_deserialization).unwrap();
/// assert_eq!(p.to_string(), "Point(x: 3, y: 0)");
///
/// let err = record_deserialization(&target, &Value::new_map(vec![]), noop_deserialization);
/// assert!(matches!(err, Err(Error::ShapeMismatch(_))));
/// ```
pub fn record_deserialization<D>(target: &Descriptor, value: &Value, mut de: D) -> Result<Value>
where
    D: FnMut(&Descriptor, &Value) -> Result<Value>,
{
    let (shape, args) = match target {
        Descriptor::Record(shape, args) => (shape, args),
        _ => return Err(Error::mismatch(value, target, "not a record type")),
    };

    let map = value.map().ok_or_else(|| {
        Error::ShapeMismatch(format!(
            "cannot deserialize {} {} using record deserialization",
            value.type_name(),
            value
        ))
    })?;

    if !target.is_bound() {
        return Err(Error::ShapeMismatch(format!(
            "cannot deserialize unbound generic {}",
            target
        )));
    }

    let types = shape
        .field_types(args)
        .map_err(|e| Error::mismatch(value, target, e))?;

    let mut fields = Fields::with_capacity(types.len());
    for (name, ty) in types {
        if let Some(v) = map.get(&Value::from(name)) {
            trace!("decoding field {}.{} as {}", shape.name(), name, ty);
            fields.insert(name.to_string(), de(&ty, v)?);
        }
    }

    shape.construct(fields).map(Value::Record).map_err(|e| {
        Error::ShapeMismatch(format!(
            "missing one or more required fields to deserialize {} as {}: {}",
            value,
            target,
            e.missing.join(", ")
        ))
    })
}
