use super::*;
use crate::Record;

/// `value`'s runtime shape matches `desc`.
///
/// Parameterized containers are checked element by element, so this is linear in the size of
/// the value. A record is an element of its own shape's descriptor and of any ancestor's; given
/// type arguments, its fields must also be elements of the bound field types.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::desc::is_element;
/// let map = Value::new_str_map(vec![("a", Value::Int(1))]);
/// assert!(is_element(&map, &Descriptor::MAP));
/// assert!(is_element(&map, &Descriptor::map_of(Descriptor::STR, Descriptor::INT)));
/// assert!(!is_element(&map, &Descriptor::map_of(Descriptor::STR, Descriptor::STR)));
/// ```
pub fn is_element(value: &Value, desc: &Descriptor) -> bool {
    use Descriptor as D;
    match desc {
        D::Any => true,
        D::Leaf(leaf) => Leaf::of(value) == Some(*leaf),
        D::Generic(Origin::Map, args) => match (value, args.as_slice()) {
            (Value::Map(_), []) => true,
            (Value::Map(map), [k, v]) => map
                .iter()
                .all(|(key, val)| is_element(key, k) && is_element(val, v)),
            _ => false,
        },
        D::Generic(Origin::List, args) => match (value, args.as_slice()) {
            (Value::List(_), []) => true,
            (Value::List(xs), [t]) => xs.iter().all(|x| is_element(x, t)),
            _ => false,
        },
        D::Generic(Origin::Tuple, args) => match value {
            Value::Tuple(xs) => tuple_slots_match(xs, args),
            _ => false,
        },
        D::Record(shape, args) => value
            .record()
            .map_or(false, |r| r.shape().descends_from(shape) && record_args_match(r, shape, args)),
        D::RecordMarker => value.record().is_some(),
        D::Union(ds) | D::OneOf(ds) => ds.iter().any(|d| is_element(value, d)),
        D::UnionMarker | D::Param(_) | D::Ellipsis | D::Unit => false,
    }
}

/// The record's fields are elements of `shape`'s field types bound to `args`. A bare record
/// descriptor only checks the shape.
fn record_args_match(record: &Record, shape: &Shape, args: &[Descriptor]) -> bool {
    if args.is_empty() {
        return true;
    }

    match shape.field_types(args) {
        Ok(types) => types
            .iter()
            .all(|(name, ty)| record.get(name).map_or(false, |v| is_element(v, ty))),
        Err(_) => false,
    }
}

fn tuple_slots_match(xs: &[Value], slots: &[Descriptor]) -> bool {
    match slots {
        [] => true,
        [Descriptor::Unit] => xs.is_empty(),
        [t, Descriptor::Ellipsis] => xs.iter().all(|x| is_element(x, t)),
        slots => xs.len() == slots.len() && xs.iter().zip(slots).all(|(x, t)| is_element(x, t)),
    }
}

/// `a` is subsumed by `b`: every value of `a` is a value of `b`.
///
/// This is the ordering the registries sort their keys by. Beyond equality:
/// - every descriptor is a subtype of [`Descriptor::Any`],
/// - a set of descriptors is a subtype if all its members are,
/// - a descriptor is a subtype of a set if it is a subtype of any member,
/// - a parameterized container is a subtype of its bare marker,
/// - a record is a subtype of an ancestor's bare record descriptor,
/// - only unions are subtypes of the union marker.
///
/// Nothing is a subtype of the record marker; it is a capability tag matched during lookup by
/// [`matches_target`], not a supertype.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::desc::is_subtype;
/// let d = Descriptor::list_of(Descriptor::INT);
/// assert!(is_subtype(&d, &Descriptor::LIST));
/// assert!(!is_subtype(&Descriptor::LIST, &d));
/// assert!(is_subtype(&Descriptor::INT, &Descriptor::one_of(vec![Descriptor::STR, Descriptor::INT])));
/// ```
pub fn is_subtype(a: &Descriptor, b: &Descriptor) -> bool {
    use Descriptor as D;

    if a == b {
        return true;
    }

    if let D::OneOf(ds) = a {
        return ds.iter().all(|d| is_subtype(d, b));
    }

    match b {
        D::Any => true,
        D::RecordMarker => false,
        D::UnionMarker => matches!(a, D::Union(_)),
        D::OneOf(ds) => ds.iter().any(|d| is_subtype(a, d)),
        _ if matches!(a, D::Union(_)) => false,
        D::Generic(origin, args) if args.is_empty() => {
            matches!(a, D::Generic(o, _) if o == origin)
        }
        D::Record(shape, args) if args.is_empty() => {
            matches!(a, D::Record(s, _) if s.descends_from(shape))
        }
        _ => false,
    }
}

/// The lookup predicate of the deserialization registry: [`is_subtype`], plus every record
/// descriptor matches the record marker.
pub fn matches_target(target: &Descriptor, key: &Descriptor) -> bool {
    match (target, key) {
        (Descriptor::Record(..), Descriptor::RecordMarker) => true,
        _ => is_subtype(target, key),
    }
}
