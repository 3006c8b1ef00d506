// Chain Codec
// Copyright (C) 2019 Monadic GmbH <radicle@monadic.xyz>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Encoding and decoding of ABI defined structs, aliases and variants.

use serde_json::json;

use chain_codec::*;
use chain_codec_core::*;
use chain_codec_test_utils::*;

fn encode_with(abi: &Abi, value: &Value, ty: &str) -> Result<Vec<u8>, Error> {
    encode(value, Some(TypeRef::Name(ty)), Some(abi))
}

fn decode_with(abi: &Abi, data: &[u8], ty: &str) -> Result<Value, Error> {
    decode(DecodeInput::Binary(data), Some(TypeRef::Name(ty)), Some(abi))
}

fn bar_value() -> Value {
    StructValue::new()
        .with("one", "one")
        .with("two", 2i8)
        .with("three", Name::from_string("two").unwrap())
        .with(
            "four",
            Value::Array(vec!["f".into(), "o".into(), "u".into(), "r".into()]),
        )
        .into()
}

/// Assert that a derived struct encodes as its base fields followed by its own
#[test]
fn struct_inheritance() {
    let _ = env_logger::try_init();
    let abi = sample_abi();
    let encoded = encode_with(&abi, &bar_value(), "bar").unwrap();

    let expected = concat!(
        "036f6e65",         // one
        "02",               // two
        "01",               // three is present
        "00000000000028cf", // "two"
        "01",               // four is present
        "04",
        "0166",
        "016f",
        "0175",
        "0172"
    );
    assert_eq!(hex::encode(&encoded), expected);

    let base_only = StructValue::new().with("one", "one").with("two", 2i8);
    let base_encoded = encode_with(&abi, &base_only.into(), "foo").unwrap();
    assert!(encoded.starts_with(&base_encoded));

    let decoded = decode_with(&abi, &encoded, "bar").unwrap();
    let fields = decoded.as_struct().unwrap();
    let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["one", "two", "three", "four"]);
    assert_eq!(fields.get("one"), Some(&Value::from("one")));
    assert_eq!(fields.get("two"), Some(&Value::Int(2)));
    assert_eq!(
        fields.get("three"),
        Some(&Value::Name(Name::from_string("two").unwrap()))
    );
    assert_eq!(fields.get("four"), bar_value().as_struct().unwrap().get("four"));
}

#[test]
fn struct_json() {
    let abi = sample_abi();
    let json = json!({"one": "one", "two": 2, "three": null, "four": ["x"]});
    let value = decode(DecodeInput::Json(&json), Some(TypeRef::Name("bar")), Some(&abi)).unwrap();
    assert_eq!(
        to_json(&value, Some(TypeRef::Name("bar")), Some(&abi)).unwrap(),
        json
    );
    assert_eq!(
        hex::encode(encode_with(&abi, &value, "bar").unwrap()),
        "036f6e65020001010178"
    );
}

/// Assert that an absent extension takes fewer bytes than an absent optional
#[test]
fn optional_versus_extension() {
    let abi = sample_abi();
    let value: Value = StructValue::new().with("id", 7u32).into();

    let optional = encode_with(&abi, &value, "with_optional").unwrap();
    let extension = encode_with(&abi, &value, "with_extension").unwrap();
    assert_eq!(hex::encode(&optional), "0700000000");
    assert_eq!(hex::encode(&extension), "07000000");
    assert!(extension.len() < optional.len());

    let decoded = decode_with(&abi, &extension, "with_extension").unwrap();
    assert_eq!(decoded.as_struct().unwrap().get("note"), None);

    let with_note: Value = StructValue::new().with("id", 7u32).with("note", "hi").into();
    let encoded = encode_with(&abi, &with_note, "with_extension").unwrap();
    assert_eq!(hex::encode(&encoded), "07000000026869");
    assert_eq!(decode_with(&abi, &encoded, "with_extension").unwrap(), with_note);
}

/// Assert that aliases resolve to their targets, including modified targets
#[test]
fn aliases() {
    let abi = sample_abi();
    let value = Value::from("eosio");
    assert_eq!(
        encode_with(&abi, &value, "account_name").unwrap(),
        encode(&value, Some(TypeRef::Name("name")), None).unwrap()
    );
    assert_eq!(
        abi.resolve("memo_list").unwrap(),
        resolve(None, "string[]").unwrap()
    );
}

/// Assert that variants carry the member index and reject out of range indices
#[test]
fn variants() {
    let abi = sample_abi();
    let key = random_public_key(CurveType::K1);
    let value: Value = StructValue::new()
        .with("key", key.clone())
        .with("choice", Value::variant("name", Name::from_string("alice").unwrap()))
        .with("memos", Value::Array(vec![]))
        .into();

    let encoded = encode_with(&abi, &value, "keyed").unwrap();
    // curve tag and 33 byte point, variant index 1, name, empty array
    assert_eq!(encoded.len(), 34 + 1 + 8 + 1);
    assert_eq!(encoded[34], 1);
    assert_eq!(decode_with(&abi, &encoded, "keyed").unwrap(), value);

    let json = to_json(&value, Some(TypeRef::Name("keyed")), Some(&abi)).unwrap();
    assert_eq!(json["choice"], json!(["name", "alice"]));
    assert_eq!(json["key"], json!(key.to_string()));

    let mut bad_index = encoded.clone();
    bad_index[34] = 3;
    assert_eq!(
        decode_with(&abi, &bad_index, "keyed"),
        Err(DecodeError::InvalidVariantIndex {
            variant: "key_or_name".to_string(),
            index: 3,
            count: 3
        }
        .into())
    );
}

#[test]
fn variant_holding_struct() {
    let abi = sample_abi();
    let foo: Value = StructValue::new().with("one", "1").with("two", -1i8).into();
    let value = Value::variant("foo", foo);
    let encoded = encode_with(&abi, &value, "key_or_name").unwrap();
    assert_eq!(hex::encode(&encoded), "020131ff");
    assert_eq!(decode_with(&abi, &encoded, "key_or_name").unwrap(), value);
}

#[test]
fn actions_and_tables() {
    let abi = sample_abi();
    assert_eq!(
        abi.get_action_type(Name::from_string("setfoo").unwrap()),
        Some("bar")
    );
    assert_eq!(
        abi.get_table_type(Name::from_string("accounts").unwrap()),
        Some("account")
    );
    assert_eq!(abi.definition().tables[0].index_type, "i64");
}

#[test]
fn missing_field() {
    let abi = sample_abi();
    let value: Value = StructValue::new().with("one", "one").into();
    assert_eq!(
        encode_with(&abi, &value, "foo"),
        Err(EncodeError::MissingField {
            name: "foo".to_string(),
            field: "two".to_string()
        }
        .into())
    );
}

/// Assert that schema errors surface from both encode and decode
#[test]
fn schema_errors() {
    let cyclic = Abi::from_json_str(
        r#"{"types": [
            {"new_type_name": "a", "type": "b"},
            {"new_type_name": "b", "type": "a"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        encode_with(&cyclic, &Value::from("x"), "a"),
        Err(Error::Schema(SchemaError::AliasCycle(_)))
    ));
    assert!(matches!(
        decode_with(&cyclic, &[0], "b"),
        Err(Error::Schema(SchemaError::AliasCycle(_)))
    ));

    let orphan = Abi::from_json_str(
        r#"{"structs": [{"name": "child", "base": "parent", "fields": []}]}"#,
    )
    .unwrap();
    assert_eq!(
        decode_with(&orphan, &[], "child"),
        Err(SchemaError::UnknownBase {
            name: "child".to_string(),
            base: "parent".to_string()
        }
        .into())
    );

    let abi = sample_abi();
    assert_eq!(
        decode_with(&abi, &[0], "santa"),
        Err(SchemaError::UnknownType("santa".to_string()).into())
    );
    assert!(matches!(
        encode_with(&abi, &Value::Null, "string$"),
        Err(Error::Schema(SchemaError::MisplacedExtension(_)))
    ));
}

#[test]
fn abi_round_trips_through_serde() {
    let abi = sample_abi();
    let json = serde_json::to_string(abi.definition()).unwrap();
    let reparsed = Abi::from_json_str(&json).unwrap();
    assert_eq!(reparsed.definition(), abi.definition());
}
