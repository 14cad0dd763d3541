use crate::{Descriptor, Error, List, Map, Origin, Result, Value};

/// Convert every key with `key_fn` and every value with `value_fn`, preserving entry order.
pub fn map_serialization<KF, VF>(value: &Value, mut key_fn: KF, mut value_fn: VF) -> Result<Value>
where
    KF: FnMut(&Value) -> Result<Value>,
    VF: FnMut(&Value) -> Result<Value>,
{
    let map = value.map().ok_or_else(|| {
        Error::ShapeMismatch(format!(
            "cannot serialize {} {} using map serialization",
            value.type_name(),
            value
        ))
    })?;

    let mut out = Map::with_capacity(map.len());
    for (k, v) in map {
        out.insert(key_fn(k)?, value_fn(v)?);
    }
    Ok(Value::Map(out))
}

/// Decode a map's keys with `key_de` and values with `value_de` against the key and value
/// types of `target`. The bare `Map` marker passes the map through unchanged.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let map = Value::new_str_map(vec![("a", Value::Int(1))]);
/// let d = Descriptor::map_of(Descriptor::STR, Descriptor::INT);
///
/// let out = map_deserialization(&d, &map, noop_deserialization, noop_deserialization);
/// assert_eq!(out, Ok(map.clone()));
///
/// let d = Descriptor::map_of(Descriptor::STR, Descriptor::STR);
/// assert!(map_deserialization(&d, &map, noop_deserialization, noop_deserialization).is_err());
/// ```
pub fn map_deserialization<KD, VD>(
    target: &Descriptor,
    value: &Value,
    mut key_de: KD,
    mut value_de: VD,
) -> Result<Value>
where
    KD: FnMut(&Descriptor, &Value) -> Result<Value>,
    VD: FnMut(&Descriptor, &Value) -> Result<Value>,
{
    let map = value
        .map()
        .ok_or_else(|| Error::mismatch(value, target, "expecting a map"))?;

    match generic_args(target, Origin::Map) {
        Some([]) => Ok(value.clone()),
        Some([kt, vt]) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(key_de(kt, k)?, value_de(vt, v)?);
            }
            Ok(Value::Map(out))
        }
        _ => Err(Error::mismatch(value, target, "not a map type")),
    }
}

/// Convert every element of a list or tuple with `f`, producing a list.
pub fn list_serialization<F>(value: &Value, f: F) -> Result<Value>
where
    F: FnMut(&Value) -> Result<Value>,
{
    value
        .list_or_tuple()
        .ok_or_else(|| {
            Error::ShapeMismatch(format!(
                "cannot serialize {} {} using list serialization",
                value.type_name(),
                value
            ))
        })?
        .iter()
        .map(f)
        .collect::<Result<List>>()
        .map(Value::List)
}

/// Decode every element of a list with `de` against the element type of `target`. The bare
/// `List` marker passes the list through unchanged.
pub fn list_deserialization<D>(target: &Descriptor, value: &Value, mut de: D) -> Result<Value>
where
    D: FnMut(&Descriptor, &Value) -> Result<Value>,
{
    let list = value
        .list()
        .ok_or_else(|| Error::mismatch(value, target, "expecting a list"))?;

    match generic_args(target, Origin::List) {
        Some([]) => Ok(value.clone()),
        Some([t]) => list
            .iter()
            .map(|x| de(t, x))
            .collect::<Result<List>>()
            .map(Value::List),
        _ => Err(Error::mismatch(value, target, "not a list type")),
    }
}

/// Decode a list or tuple slot by slot against the slot types of `target`, producing a tuple.
///
/// - The bare `Tuple` marker passes the value through unchanged.
/// - `Tuple[()]` only accepts an empty sequence.
/// - `Tuple[t, ...]` decodes every element as `t`.
/// - Otherwise the sequence length must equal the number of slots.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let d = Descriptor::tuple_of(vec![Descriptor::INT, Descriptor::INT, Descriptor::INT]);
/// let err = tuple_deserialization(&d, &Value::from(vec![1, 2]), noop_deserialization).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "cannot deserialize a 2-tuple [1, 2] as Tuple[int, int, int], which expects a 3-tuple"
/// );
/// ```
pub fn tuple_deserialization<D>(target: &Descriptor, value: &Value, mut de: D) -> Result<Value>
where
    D: FnMut(&Descriptor, &Value) -> Result<Value>,
{
    let items = value
        .list_or_tuple()
        .ok_or_else(|| Error::mismatch(value, target, "expecting a list or tuple"))?;

    let slots = match generic_args(target, Origin::Tuple) {
        Some([]) => return Ok(value.clone()),
        Some([Descriptor::Unit]) => &[][..],
        Some([t, Descriptor::Ellipsis]) => {
            return items
                .iter()
                .map(|x| de(t, x))
                .collect::<Result<List>>()
                .map(Value::Tuple)
        }
        Some(slots) => slots,
        None => return Err(Error::mismatch(value, target, "not a tuple type")),
    };

    if slots.len() != items.len() {
        return Err(Error::ShapeMismatch(format!(
            "cannot deserialize a {}-tuple {} as {}, which expects a {}-tuple",
            items.len(),
            value,
            target,
            slots.len()
        )));
    }

    items
        .iter()
        .zip(slots)
        .map(|(x, t)| de(t, x))
        .collect::<Result<List>>()
        .map(Value::Tuple)
}

fn generic_args(target: &Descriptor, origin: Origin) -> Option<&[Descriptor]> {
    match target {
        Descriptor::Generic(o, args) if *o == origin => Some(args.as_slice()),
        _ => None,
    }
}
