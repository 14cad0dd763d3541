use crate::{Descriptor, Error, Result, Value};
use log::trace;

/// Decode `value` as the first alternative of the union `target` that accepts it.
///
/// Alternatives are tried in declaration order, not by specificity. Conversion failures of an
/// alternative move on to the next one; an ambiguous registry or a codec failure is returned
/// immediately. If no alternative accepts the value, the error names the value and the whole
/// union.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let d = Descriptor::optional(Descriptor::INT);
/// assert_eq!(union_deserialization(&d, &Value::Null, noop_deserialization), Ok(Value::Null));
/// assert_eq!(union_deserialization(&d, &Value::Int(1), noop_deserialization), Ok(Value::Int(1)));
///
/// let err = union_deserialization(&d, &Value::from("x"), noop_deserialization).unwrap_err();
/// assert_eq!(err.to_string(), r#"cannot deserialize "x" as Union[int, null]"#);
/// ```
pub fn union_deserialization<D>(target: &Descriptor, value: &Value, mut de: D) -> Result<Value>
where
    D: FnMut(&Descriptor, &Value) -> Result<Value>,
{
    let alternatives = match target {
        Descriptor::Union(ds) => ds,
        _ => return Err(Error::mismatch(value, target, "not a union type")),
    };

    for alt in alternatives {
        match de(alt, value) {
            Ok(v) => return Ok(v),
            Err(e) if e.is_recoverable() => trace!("{} rejected: {}", alt, e),
            Err(e) => return Err(e),
        }
    }

    Err(Error::no_alternative(value, target))
}
