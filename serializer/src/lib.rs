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

//! ABI driven serializer for chain data.
//!
//! Values are held as [Value]s and translated to and from the little-endian binary wire format
//! and JSON. The type of a value is given either as a type name, resolved against an [Abi], as
//! an already resolved [TypeDescriptor], or taken from the value itself when it describes its
//! own type.
//!
//! ```rust
//! # use chain_codec::{encode, decode, DecodeInput, TypeRef, Value};
//! let bytes = encode(&Value::from("hello world"), None, None).unwrap();
//! assert_eq!(hex::encode(&bytes), "0b68656c6c6f20776f726c64");
//!
//! let value = decode(DecodeInput::Binary(&bytes), Some(TypeRef::Name("string")), None).unwrap();
//! assert_eq!(value, Value::from("hello world"));
//! ```
use std::borrow::Cow;

use serde_json::Value as JsonValue;

mod abi;
mod action;
mod builtin;
mod cursor;
mod decoder;
mod encoder;
mod error;
mod json;
mod options;
mod resolver;
mod serializable;
mod value;

pub use abi::{Abi, AbiDef, ActionDef, FieldDef, StructDef, TableDef, TypeDef, VariantDef};
pub use action::{Action, ActionData, PermissionLevel};
pub use builtin::BuiltinType;
pub use error::{DecodeError, EncodeError, Error, SchemaError};
pub use options::{DecodeOptions, TrailingBytes, DEFAULT_MAX_DEPTH};
pub use resolver::{
    resolve, resolve_field, FieldDescriptor, StructDescriptor, TypeDescriptor, VariantDescriptor,
};
pub use serializable::AbiSerializable;
pub use value::{StructValue, Value};

/// The type to encode or decode as.
#[derive(Clone, Copy, Debug)]
pub enum TypeRef<'a> {
    /// A type name, resolved against the ABI passed alongside.
    Name(&'a str),
    Descriptor(&'a TypeDescriptor),
}

impl<'a> From<&'a str> for TypeRef<'a> {
    fn from(name: &'a str) -> Self {
        TypeRef::Name(name)
    }
}

impl<'a> From<&'a TypeDescriptor> for TypeRef<'a> {
    fn from(descriptor: &'a TypeDescriptor) -> Self {
        TypeRef::Descriptor(descriptor)
    }
}

/// Input to [decode]: either the binary form or the JSON form of a value.
#[derive(Clone, Copy, Debug)]
pub enum DecodeInput<'a> {
    Binary(&'a [u8]),
    Json(&'a JsonValue),
}

impl<'a> From<&'a [u8]> for DecodeInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        DecodeInput::Binary(data)
    }
}

impl<'a> From<&'a JsonValue> for DecodeInput<'a> {
    fn from(json: &'a JsonValue) -> Self {
        DecodeInput::Json(json)
    }
}

/// Resolve the type to use for `value`.
///
/// An explicit type always wins. Without one the value must describe its own type.
fn descriptor_for<'a>(
    ty: Option<TypeRef<'a>>,
    value: Option<&Value>,
    abi: Option<&Abi>,
) -> Result<Cow<'a, TypeDescriptor>, SchemaError> {
    match ty {
        Some(TypeRef::Descriptor(descriptor)) => Ok(Cow::Borrowed(descriptor)),
        Some(TypeRef::Name(name)) => resolve(abi, name).map(Cow::Owned),
        None => {
            let name = value
                .and_then(Value::abi_type_name)
                .ok_or(SchemaError::MissingType)?;
            resolve(None, name).map(Cow::Owned)
        }
    }
}

/// Encode a value to its binary form.
///
/// Fails with [SchemaError::MissingType] if `ty` is `None` and the value does not describe its
/// own type, and with [SchemaError::UnknownType] if a type name cannot be resolved.
pub fn encode(value: &Value, ty: Option<TypeRef>, abi: Option<&Abi>) -> Result<Vec<u8>, Error> {
    let descriptor = descriptor_for(ty, Some(value), abi)?;
    let encoded = encoder::encode_value(abi, &descriptor, value)?;
    log::debug!("encoded {} into {} bytes", descriptor, encoded.len());
    Ok(encoded)
}

/// Decode a value from its binary or JSON form with the default [DecodeOptions].
pub fn decode(input: DecodeInput, ty: Option<TypeRef>, abi: Option<&Abi>) -> Result<Value, Error> {
    decode_with_options(input, ty, abi, &DecodeOptions::default())
}

/// Decode a value from its binary or JSON form.
///
/// Decoding always requires a type. `options` only apply to binary input.
pub fn decode_with_options(
    input: DecodeInput,
    ty: Option<TypeRef>,
    abi: Option<&Abi>,
    options: &DecodeOptions,
) -> Result<Value, Error> {
    let descriptor = descriptor_for(ty, None, abi)?;
    match input {
        DecodeInput::Binary(data) => {
            log::debug!("decoding {} from {} bytes", descriptor, data.len());
            decoder::decode_value(abi, &descriptor, data, options)
        }
        DecodeInput::Json(document) => {
            log::debug!("decoding {} from JSON", descriptor);
            json::value_from_json(abi, &descriptor, document)
        }
    }
}

/// Convert a value to its JSON form.
pub fn to_json(value: &Value, ty: Option<TypeRef>, abi: Option<&Abi>) -> Result<JsonValue, Error> {
    let descriptor = descriptor_for(ty, Some(value), abi)?;
    json::value_to_json(abi, &descriptor, value)
}

/// Encode a Rust value as its fixed ABI type.
pub fn encode_typed<T: AbiSerializable>(value: &T) -> Result<Vec<u8>, Error> {
    encode(&value.to_value(), Some(TypeRef::Name(T::ABI_NAME)), None)
}

/// Decode a Rust value from the binary form of its fixed ABI type.
pub fn decode_typed<T: AbiSerializable>(data: &[u8]) -> Result<T, Error> {
    let value = decode(
        DecodeInput::Binary(data),
        Some(TypeRef::Name(T::ABI_NAME)),
        None,
    )?;
    Ok(T::from_value(value)?)
}
