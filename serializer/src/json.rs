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

//! Conversion between [Value]s and their JSON form.
//!
//! Structs are JSON objects keyed by field name, arrays are JSON arrays and an absent optional
//! is `null`. An absent binary extension field is left out of the object. A variant is the
//! two element array `["<member type>", <payload>]`.
use serde_json::{Map, Value as JsonValue};

use crate::abi::Abi;
use crate::builtin::{self, invalid_json};
use crate::error::{DecodeError, EncodeError, Error};
use crate::resolver::{resolve, resolve_field, StructDescriptor, TypeDescriptor, VariantDescriptor};
use crate::value::{StructValue, Value, NULL};

static JSON_NULL: JsonValue = JsonValue::Null;

/// Convert `value` to JSON as the type described by `descriptor`.
pub fn value_to_json(
    abi: Option<&Abi>,
    descriptor: &TypeDescriptor,
    value: &Value,
) -> Result<JsonValue, Error> {
    let json = match descriptor {
        TypeDescriptor::Builtin(ty) => builtin::to_json(*ty, value)?,
        TypeDescriptor::Struct(descriptor) => struct_to_json(abi, descriptor, value)?,
        TypeDescriptor::Variant(descriptor) => variant_to_json(abi, descriptor, value)?,
        TypeDescriptor::Array(inner) => {
            let items = value.as_array().ok_or_else(|| EncodeError::TypeMismatch {
                expected: descriptor.to_string(),
                found: value.kind().to_string(),
            })?;
            let items = items
                .iter()
                .map(|item| value_to_json(abi, inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            JsonValue::Array(items)
        }
        TypeDescriptor::Optional(inner) | TypeDescriptor::Extension(inner) => {
            if value.is_null() {
                JsonValue::Null
            } else {
                value_to_json(abi, inner, value)?
            }
        }
    };
    Ok(json)
}

fn struct_to_json(
    abi: Option<&Abi>,
    descriptor: &StructDescriptor,
    value: &Value,
) -> Result<JsonValue, Error> {
    let fields = value.as_struct().ok_or_else(|| EncodeError::TypeMismatch {
        expected: descriptor.name.clone(),
        found: value.kind().to_string(),
    })?;

    let mut object = Map::new();
    for field in &descriptor.fields {
        let field_type = resolve_field(abi, &field.type_name)?;
        let field_value = match fields.get(&field.name) {
            Some(field_value) => field_value,
            None => match field_type {
                TypeDescriptor::Extension(_) => continue,
                TypeDescriptor::Optional(_) => &NULL,
                _ => {
                    return Err(EncodeError::MissingField {
                        name: descriptor.name.clone(),
                        field: field.name.clone(),
                    }
                    .into())
                }
            },
        };
        if field_type.is_extension() && field_value.is_null() {
            continue;
        }
        object.insert(field.name.clone(), value_to_json(abi, &field_type, field_value)?);
    }
    Ok(JsonValue::Object(object))
}

fn variant_to_json(
    abi: Option<&Abi>,
    descriptor: &VariantDescriptor,
    value: &Value,
) -> Result<JsonValue, Error> {
    match value {
        Value::Variant { member, value } => {
            if descriptor.index_of(member).is_none() {
                return Err(EncodeError::UnknownVariantMember {
                    variant: descriptor.name.clone(),
                    member: member.clone(),
                }
                .into());
            }
            let member_type = resolve(abi, member)?;
            Ok(JsonValue::Array(vec![
                JsonValue::String(member.clone()),
                value_to_json(abi, &member_type, value)?,
            ]))
        }
        other => Err(EncodeError::TypeMismatch {
            expected: descriptor.name.clone(),
            found: other.kind().to_string(),
        }
        .into()),
    }
}

/// Convert the JSON form of a `descriptor` typed value into a [Value].
pub fn value_from_json(
    abi: Option<&Abi>,
    descriptor: &TypeDescriptor,
    json: &JsonValue,
) -> Result<Value, Error> {
    let value = match descriptor {
        TypeDescriptor::Builtin(ty) => builtin::from_json(*ty, json)?,
        TypeDescriptor::Struct(descriptor) => struct_from_json(abi, descriptor, json)?,
        TypeDescriptor::Variant(descriptor) => variant_from_json(abi, descriptor, json)?,
        TypeDescriptor::Array(inner) => {
            let items = json
                .as_array()
                .ok_or_else(|| invalid_json(&descriptor.to_string(), json))?;
            let items = items
                .iter()
                .map(|item| value_from_json(abi, inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Value::Array(items)
        }
        TypeDescriptor::Optional(inner) | TypeDescriptor::Extension(inner) => {
            if json.is_null() {
                Value::Null
            } else {
                value_from_json(abi, inner, json)?
            }
        }
    };
    Ok(value)
}

fn struct_from_json(
    abi: Option<&Abi>,
    descriptor: &StructDescriptor,
    json: &JsonValue,
) -> Result<Value, Error> {
    let object = json
        .as_object()
        .ok_or_else(|| invalid_json(&descriptor.name, json))?;

    let mut fields = StructValue::new();
    for field in &descriptor.fields {
        let field_type = resolve_field(abi, &field.type_name)?;
        let field_json = object.get(&field.name).unwrap_or(&JSON_NULL);
        match field_type {
            TypeDescriptor::Extension(_) if field_json.is_null() => continue,
            TypeDescriptor::Optional(_) => {}
            _ if !object.contains_key(&field.name) => {
                return Err(DecodeError::MissingField {
                    name: descriptor.name.clone(),
                    field: field.name.clone(),
                }
                .into())
            }
            _ => {}
        }
        fields.insert(
            field.name.as_str(),
            value_from_json(abi, &field_type, field_json)?,
        );
    }
    Ok(Value::Struct(fields))
}

fn variant_from_json(
    abi: Option<&Abi>,
    descriptor: &VariantDescriptor,
    json: &JsonValue,
) -> Result<Value, Error> {
    let (member, payload) = match json.as_array().map(Vec::as_slice) {
        Some([JsonValue::String(member), payload]) => (member, payload),
        _ => {
            let expected = format!("[member, value] for {}", descriptor.name);
            return Err(invalid_json(&expected, json).into());
        }
    };
    if descriptor.index_of(member).is_none() {
        return Err(DecodeError::UnknownVariantMember {
            variant: descriptor.name.clone(),
            member: member.clone(),
        }
        .into());
    }
    let member_type = resolve(abi, member)?;
    let value = value_from_json(abi, &member_type, payload)?;
    Ok(Value::variant(member.as_str(), value))
}
