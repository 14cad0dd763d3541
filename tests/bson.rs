use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tyser::*;

fn person() -> Arc<Shape> {
    Shape::builder("Person").field("name", Descriptor::STR).finish()
}

fn fred(person: &Arc<Shape>) -> Value {
    Value::Record(Record::new(person, vec![("name", Value::from("Fred"))]).unwrap())
}

fn fred_tree() -> Value {
    Value::new_str_map(vec![("name", Value::from("Fred"))])
}

#[test]
fn basic() {
    let ser = formats::bson::serializer();
    let person = person();

    assert_eq!(ser.serialize(&fred(&person)), Ok(fred_tree()));
    assert_eq!(
        ser.deserialize(&Descriptor::record(&person), &fred_tree()),
        Ok(fred(&person))
    );
}

#[test]
fn nested() {
    let ser = formats::bson::serializer();
    let person = person();
    let song = Shape::builder("Song")
        .field("artist", Descriptor::record(&person))
        .finish();

    let obj = Value::Record(Record::new(&song, vec![("artist", fred(&person))]).unwrap());
    let tree = Value::new_str_map(vec![("artist", fred_tree())]);

    assert_eq!(ser.serialize(&obj), Ok(tree.clone()));
    assert_eq!(ser.deserialize(&Descriptor::record(&song), &tree), Ok(obj));
}

#[test]
fn types() {
    let ser = formats::bson::serializer();
    let person = person();
    let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let oid: ObjectId = "0".repeat(24).parse().unwrap();

    let cases = vec![
        (Descriptor::INT, Value::Int(1)),
        (Descriptor::FLOAT, Value::Float(1.0)),
        (Descriptor::STR, Value::from("Fred")),
        (Descriptor::DATETIME, Value::from(dt)),
        (Descriptor::BYTES, Value::Bytes(b"Hello, world".to_vec())),
        (Descriptor::OBJECT_ID, Value::from(oid)),
        (Descriptor::BOOL, Value::Bool(true)),
        (Descriptor::MAP, fred_tree()),
        (Descriptor::LIST, Value::List(vec![])),
        (Descriptor::NULL, Value::Null),
    ];

    for (target, obj) in cases {
        assert_eq!(ser.serialize(&obj), Ok(obj.clone()), "serializing {}", obj);
        assert_eq!(ser.deserialize(&target, &obj), Ok(obj.clone()), "deserializing {}", target);
    }

    let d = Descriptor::map_of(Descriptor::STR, Descriptor::record(&person));
    let obj = Value::new_str_map(vec![("abc123", fred(&person))]);
    let tree = Value::new_str_map(vec![("abc123", fred_tree())]);
    assert_eq!(ser.serialize(&obj), Ok(tree.clone()));
    assert_eq!(ser.deserialize(&d, &tree), Ok(obj));
}

#[test]
fn int_coercion() {
    let ser = formats::bson::serializer();

    assert_eq!(ser.deserialize(&Descriptor::INT, &Value::Float(1.0)), Ok(Value::Int(1)));

    let e = ser.deserialize(&Descriptor::INT, &Value::Float(1.5)).unwrap_err();
    assert_eq!(
        e,
        Error::ShapeMismatch("cannot deserialize 1.5 as int: the conversion is lossy".into())
    );

    // coercion applies inside containers and records too
    let counter = Shape::builder("Counter").field("n", Descriptor::INT).finish();
    let tree = Value::new_str_map(vec![("n", Value::Float(7.0))]);
    let r = ser.deserialize(&Descriptor::record(&counter), &tree).unwrap();
    assert_eq!(r.record().and_then(|r| r.get("n")), Some(&Value::Int(7)));
}

#[cfg(feature = "bson")]
#[test]
fn binary() {
    let ser = formats::bson::binary_serializer();
    let person = person();
    let bytes = b"\x14\x00\x00\x00\x02name\x00\x05\x00\x00\x00Fred\x00\x00".to_vec();

    assert_eq!(ser.serialize(&fred(&person)), Ok(bytes.clone()));
    assert_eq!(
        ser.deserialize(&Descriptor::record(&person), &bytes),
        Ok(fred(&person))
    );

    // the top level must be a document
    assert!(matches!(ser.serialize(&Value::Int(1)), Err(Error::Codec(_))));
}
