#![cfg(feature = "encode")]

use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::f32::consts::PI as PI32;
use std::f64::consts::PI as PI64;
use tyser::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct UnitStruct;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TupleStruct(u8, String, f32);

#[test]
fn strings() {
    let value = Value::enc(&'a').unwrap();
    let r = value.decode::<char>();
    assert_eq!(r, Ok('a'));

    let s = "Hello, world!";
    let r = Value::from(s).decode::<String>();
    assert_eq!(r, Ok(s.to_string()));
}

#[test]
fn optionals() {
    let none = Option::<u8>::None;
    let value = Value::enc(&none).unwrap();
    assert_eq!(value, Value::Null);
    let r = value.decode::<Option<u8>>();
    assert_eq!(r, Ok(None));

    let some = Some(8);
    let value = Value::enc(&some).unwrap();
    let r = value.decode::<Option<u8>>();
    assert_eq!(r, Ok(Some(8)));
}

#[test]
fn unit_struct() {
    let u = UnitStruct;
    let value = Value::enc(&u).unwrap();
    let r = value.decode::<UnitStruct>();
    assert_eq!(r, Ok(UnitStruct));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct EmptyStruct();
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct EmptyStruct2 {}

#[test]
fn empty_struct() {
    let s = EmptyStruct();
    let value = Value::enc(&s).unwrap();
    let r = value.decode::<EmptyStruct>();
    assert_eq!(r, Ok(s));

    let s = EmptyStruct2 {};
    let value = Value::enc(&s).unwrap();
    let r = value.decode::<EmptyStruct2>();
    assert_eq!(r, Ok(s));
}

#[test]
fn tuples() {
    let t = (1,);
    let value = Value::enc(&t).unwrap();
    let r = value.decode::<(u8,)>();
    assert_eq!(r, Ok(t));

    let t = (1, "hello".to_string(), -PI32);
    let value = Value::enc(&t).unwrap();
    let r = value.decode::<(u8, String, f32)>();
    assert_eq!(r, Ok(t));

    let t = TupleStruct(1, "hello".to_string(), -PI32);
    let value = Value::enc(&t).unwrap();
    let r = value.decode::<TupleStruct>();
    assert_eq!(r, Ok(t));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct SomeStruct {
    n: i32,
    f: f64,
    s: String,
    ns: Option<Box<SomeStruct>>,
    u: (),
    un: UnitStruct,
    rs: Result<Box<SomeStruct>, UnitStruct>,
    en: Enum,
    its: Its,
    itsv: Vec<Its>,
    ens: Vec<Enum>,
    sv: Vec<SomeStruct>,
    map: BTreeMap<String, SomeStruct>,
}

type Its = (Option<Box<SomeStruct>>, i32, f64, String);

fn some_struct(n: i32, ns: Option<Box<SomeStruct>>) -> SomeStruct {
    SomeStruct {
        n,
        f: PI64,
        s: "Hello, world!".to_string(),
        ns,
        u: (),
        un: UnitStruct,
        en: Enum::One,
        ens: vec![Enum::One, Enum::Two],
        its: (None, 0, 0.0, String::new()),
        itsv: vec![],
        map: Default::default(),
        rs: Err(UnitStruct),
        sv: vec![],
    }
}

#[test]
fn structs() {
    let s = some_struct(-100, None);
    let value = Value::enc(&s).unwrap();
    let r = value.decode::<SomeStruct>();
    assert_eq!(r, Ok(s));

    let s = some_struct(10101, Some(Box::new(some_struct(-100, None))));
    let value = Value::enc(&s).unwrap();
    let r = value.decode::<SomeStruct>();
    assert_eq!(r, Ok(s));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Enum {
    One,
    Two,
    NType(u8),
    Tuple(u8, i16, f64),
    Struct { a: u8, b: String, c: f64 },
}

#[test]
fn unit_enum() {
    let value = Value::enc(&Enum::One).unwrap();
    assert_eq!(value, Value::from("One"));
    let r = value.decode::<Enum>();
    assert_eq!(r, Ok(Enum::One));

    let value = Value::enc(&Enum::Two).unwrap();
    let r = value.decode::<Enum>();
    assert_eq!(r, Ok(Enum::Two));
}

#[test]
fn newtype_enum_variant() {
    let e = Enum::NType(120);
    let value = Value::enc(&e).unwrap();
    assert_eq!(value.to_string(), r#"{"NType": 120}"#);
    let r = value.decode::<Enum>();
    assert_eq!(r, Ok(e));
}

#[test]
fn tuple_enum_variant() {
    let e = Enum::Tuple(120, -100, PI64);
    let value = Value::enc(&e).unwrap();
    let r = value.decode::<Enum>();
    assert_eq!(r, Ok(e));
}

#[test]
fn struct_enum_variant() {
    let e = Enum::Struct {
        a: 120,
        b: "Hello, world!".to_string(),
        c: -PI64,
    };
    let value = Value::enc(&e).unwrap();
    let r = value.decode::<Enum>();
    assert_eq!(r, Ok(e));
}

#[test]
fn seqs() {
    let v = vec![-1, 0, 1, 5];
    let value = Value::enc(&v).unwrap();
    let r = value.decode::<Vec<i32>>();
    assert_eq!(r, Ok(v));
}

#[test]
fn maps() {
    let m = vec![("a".to_string(), 0), ("b".to_string(), 1), ("c".to_string(), 2)]
        .into_iter()
        .collect::<HashMap<_, _>>();

    let value = Value::enc(&m).unwrap();
    let r = value.decode::<HashMap<String, u32>>();
    assert_eq!(r, Ok(m));
}

#[derive(Debug, PartialEq, Deserialize)]
struct Person {
    name: String,
    age: u8,
}

#[test]
fn deserialized_records_decode_as_structs() {
    let shape = Shape::builder("Person")
        .field("name", Descriptor::STR)
        .field("age", Descriptor::INT)
        .finish();

    let tree = Value::new_str_map(vec![("name", Value::from("Fred")), ("age", Value::Int(42))]);
    let fred = formats::json::serializer()
        .deserialize(&Descriptor::record(&shape), &tree)
        .unwrap();
    assert!(fred.record().is_some());

    assert_eq!(
        fred.decode::<Person>(),
        Ok(Person {
            name: "Fred".into(),
            age: 42
        })
    );
}

#[test]
fn encoded_structs_deserialize_as_records() {
    #[derive(Serialize)]
    struct Point {
        x: f64,
        y: f64,
    }

    let shape = Shape::builder("Point")
        .field("x", Descriptor::FLOAT)
        .field("y", Descriptor::FLOAT)
        .finish();

    let tree = Value::enc(&Point { x: 1.0, y: -1.0 }).unwrap();
    let p = formats::json::serializer()
        .deserialize(&Descriptor::record(&shape), &tree)
        .unwrap();
    assert_eq!(p.to_string(), "Point(x: 1.0, y: -1.0)");
}
