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

//! The fixed registry of built-in types and the codecs of their values.
use core::fmt::Display;
use core::str::FromStr;

use parity_scale_codec::Encode;
use serde_json::Value as JsonValue;

use chain_codec_core::*;

use crate::cursor::Cursor;
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;

/// A type every ABI knows without declaring it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BuiltinType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    VarInt32,
    VarUint32,
    Float32,
    Float64,
    String,
    Bytes,
    Checksum160,
    Checksum256,
    Checksum512,
    Name,
    SymbolCode,
    Symbol,
    Asset,
    ExtendedAsset,
    PublicKey,
    Signature,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 27] = [
        BuiltinType::Bool,
        BuiltinType::Int8,
        BuiltinType::Int16,
        BuiltinType::Int32,
        BuiltinType::Int64,
        BuiltinType::Int128,
        BuiltinType::UInt8,
        BuiltinType::UInt16,
        BuiltinType::UInt32,
        BuiltinType::UInt64,
        BuiltinType::UInt128,
        BuiltinType::VarInt32,
        BuiltinType::VarUint32,
        BuiltinType::Float32,
        BuiltinType::Float64,
        BuiltinType::String,
        BuiltinType::Bytes,
        BuiltinType::Checksum160,
        BuiltinType::Checksum256,
        BuiltinType::Checksum512,
        BuiltinType::Name,
        BuiltinType::SymbolCode,
        BuiltinType::Symbol,
        BuiltinType::Asset,
        BuiltinType::ExtendedAsset,
        BuiltinType::PublicKey,
        BuiltinType::Signature,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Int8 => "int8",
            BuiltinType::Int16 => "int16",
            BuiltinType::Int32 => "int32",
            BuiltinType::Int64 => "int64",
            BuiltinType::Int128 => "int128",
            BuiltinType::UInt8 => "uint8",
            BuiltinType::UInt16 => "uint16",
            BuiltinType::UInt32 => "uint32",
            BuiltinType::UInt64 => "uint64",
            BuiltinType::UInt128 => "uint128",
            BuiltinType::VarInt32 => "varint32",
            BuiltinType::VarUint32 => "varuint32",
            BuiltinType::Float32 => "float32",
            BuiltinType::Float64 => "float64",
            BuiltinType::String => "string",
            BuiltinType::Bytes => "bytes",
            BuiltinType::Checksum160 => "checksum160",
            BuiltinType::Checksum256 => "checksum256",
            BuiltinType::Checksum512 => "checksum512",
            BuiltinType::Name => "name",
            BuiltinType::SymbolCode => "symbol_code",
            BuiltinType::Symbol => "symbol",
            BuiltinType::Asset => "asset",
            BuiltinType::ExtendedAsset => "extended_asset",
            BuiltinType::PublicKey => "public_key",
            BuiltinType::Signature => "signature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.name() == name)
    }

    /// Inclusive range of the integer types. `None` for every other type.
    fn integer_range(self) -> Option<(i128, u128)> {
        match self {
            BuiltinType::Int8 => Some((i8::min_value().into(), i8::max_value() as u128)),
            BuiltinType::Int16 => Some((i16::min_value().into(), i16::max_value() as u128)),
            BuiltinType::Int32 | BuiltinType::VarInt32 => {
                Some((i32::min_value().into(), i32::max_value() as u128))
            }
            BuiltinType::Int64 => Some((i64::min_value().into(), i64::max_value() as u128)),
            BuiltinType::Int128 => Some((i128::min_value(), i128::max_value() as u128)),
            BuiltinType::UInt8 => Some((0, u8::max_value().into())),
            BuiltinType::UInt16 => Some((0, u16::max_value().into())),
            BuiltinType::UInt32 | BuiltinType::VarUint32 => Some((0, u32::max_value().into())),
            BuiltinType::UInt64 => Some((0, u64::max_value().into())),
            BuiltinType::UInt128 => Some((0, u128::max_value())),
            _ => None,
        }
    }

    fn is_signed(self) -> bool {
        matches!(
            self,
            BuiltinType::Int8
                | BuiltinType::Int16
                | BuiltinType::Int32
                | BuiltinType::Int64
                | BuiltinType::Int128
                | BuiltinType::VarInt32
        )
    }

    /// Integers too wide for a JSON number to hold exactly are written as strings.
    fn is_wide_integer(self) -> bool {
        matches!(
            self,
            BuiltinType::Int64 | BuiltinType::UInt64 | BuiltinType::Int128 | BuiltinType::UInt128
        )
    }
}

impl core::fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An integer value normalized for range checks.
#[derive(Clone, Copy)]
enum Integer {
    Signed(i128),
    Unsigned(u128),
}

impl Integer {
    /// Check the value against the range of `ty`.
    fn fit(self, ty: BuiltinType) -> Option<Integer> {
        let (min, max) = ty.integer_range()?;
        match self {
            Integer::Signed(v) if v < 0 => {
                if v >= min {
                    Some(self)
                } else {
                    None
                }
            }
            Integer::Signed(v) => {
                if v as u128 <= max {
                    Some(Integer::Unsigned(v as u128))
                } else {
                    None
                }
            }
            Integer::Unsigned(v) => {
                if v <= max {
                    Some(self)
                } else {
                    None
                }
            }
        }
    }

    fn as_i128(self) -> i128 {
        match self {
            Integer::Signed(v) => v,
            Integer::Unsigned(v) => v as i128,
        }
    }

    fn as_u128(self) -> u128 {
        match self {
            Integer::Signed(v) => v as u128,
            Integer::Unsigned(v) => v,
        }
    }

    fn to_value(self, ty: BuiltinType) -> Value {
        if ty.is_signed() {
            Value::Int(self.as_i128())
        } else {
            Value::UInt(self.as_u128())
        }
    }
}

impl core::fmt::Display for Integer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Integer::Signed(v) => write!(f, "{}", v),
            Integer::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

fn mismatch(ty: BuiltinType, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        expected: ty.name().to_string(),
        found: value.kind().to_string(),
    }
}

fn integer_for_encode(ty: BuiltinType, value: &Value) -> Result<Integer, EncodeError> {
    let integer = match value {
        Value::Int(v) => Integer::Signed(*v),
        Value::UInt(v) => Integer::Unsigned(*v),
        other => return Err(mismatch(ty, other)),
    };
    integer.fit(ty).ok_or_else(|| EncodeError::Overflow {
        ty: ty.name().to_string(),
        value: integer.to_string(),
    })
}

fn float_for_encode(ty: BuiltinType, value: &Value) -> Result<f64, EncodeError> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Int(v) => Ok(*v as f64),
        Value::UInt(v) => Ok(*v as f64),
        other => Err(mismatch(ty, other)),
    }
}

/// Narrow to `f32`. Finite values beyond the `f32` range have no narrowed form.
fn narrow_f32(float: f64) -> Option<f32> {
    let narrowed = float as f32;
    if float.is_finite() && !narrowed.is_finite() {
        None
    } else {
        Some(narrowed)
    }
}

fn float32_for_encode(ty: BuiltinType, value: &Value) -> Result<f32, EncodeError> {
    let float = float_for_encode(ty, value)?;
    narrow_f32(float).ok_or_else(|| EncodeError::Overflow {
        ty: ty.name().to_string(),
        value: float.to_string(),
    })
}

/// Take a typed domain value, or parse it from its textual form.
fn textual<T>(ty: BuiltinType, value: &Value, typed: Option<&T>) -> Result<T, EncodeError>
where
    T: Clone + FromStr,
    T::Err: Display,
{
    if let Some(typed) = typed {
        return Ok(typed.clone());
    }
    match value {
        Value::String(text) => text.parse().map_err(|err: T::Err| EncodeError::Malformed {
            ty: ty.name().to_string(),
            reason: err.to_string(),
        }),
        other => Err(mismatch(ty, other)),
    }
}

/// Append the binary form of `value` as `ty` to `out`.
pub fn encode(ty: BuiltinType, value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match ty {
        BuiltinType::Bool => match value {
            Value::Bool(b) => out.push(u8::from(*b)),
            other => return Err(mismatch(ty, other)),
        },
        BuiltinType::Int8 => out.push(integer_for_encode(ty, value)?.as_i128() as i8 as u8),
        BuiltinType::Int16 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_i128() as i16).to_le_bytes(),
        ),
        BuiltinType::Int32 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_i128() as i32).to_le_bytes(),
        ),
        BuiltinType::Int64 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_i128() as i64).to_le_bytes(),
        ),
        BuiltinType::Int128 => {
            out.extend_from_slice(&integer_for_encode(ty, value)?.as_i128().to_le_bytes())
        }
        BuiltinType::UInt8 => out.push(integer_for_encode(ty, value)?.as_u128() as u8),
        BuiltinType::UInt16 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_u128() as u16).to_le_bytes(),
        ),
        BuiltinType::UInt32 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_u128() as u32).to_le_bytes(),
        ),
        BuiltinType::UInt64 => out.extend_from_slice(
            &(integer_for_encode(ty, value)?.as_u128() as u64).to_le_bytes(),
        ),
        BuiltinType::UInt128 => {
            out.extend_from_slice(&integer_for_encode(ty, value)?.as_u128().to_le_bytes())
        }
        BuiltinType::VarInt32 => {
            VarInt32(integer_for_encode(ty, value)?.as_i128() as i32).encode_to(out)
        }
        BuiltinType::VarUint32 => {
            VarUint32(integer_for_encode(ty, value)?.as_u128() as u32).encode_to(out)
        }
        BuiltinType::Float32 => {
            out.extend_from_slice(&float32_for_encode(ty, value)?.to_le_bytes())
        }
        BuiltinType::Float64 => {
            out.extend_from_slice(&float_for_encode(ty, value)?.to_le_bytes())
        }
        BuiltinType::String => match value {
            Value::String(s) => {
                VarUint32::from_len(s.len())
                    .ok_or(EncodeError::LengthOverflow(s.len()))?
                    .encode_to(out);
                out.extend_from_slice(s.as_bytes());
            }
            other => return Err(mismatch(ty, other)),
        },
        BuiltinType::Bytes => {
            let typed = match value {
                Value::Bytes(b) => Some(b),
                _ => None,
            };
            let bytes: Bytes = textual(ty, value, typed)?;
            if VarUint32::from_len(bytes.len()).is_none() {
                return Err(EncodeError::LengthOverflow(bytes.len()));
            }
            bytes.encode_to(out)
        }
        BuiltinType::Checksum160 => {
            let typed = match value {
                Value::Checksum160(c) => Some(c),
                _ => None,
            };
            textual::<Checksum160>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Checksum256 => {
            let typed = match value {
                Value::Checksum256(c) => Some(c),
                _ => None,
            };
            textual::<Checksum256>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Checksum512 => {
            let typed = match value {
                Value::Checksum512(c) => Some(c),
                _ => None,
            };
            textual::<Checksum512>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Name => {
            let typed = match value {
                Value::Name(n) => Some(n),
                _ => None,
            };
            textual::<Name>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::SymbolCode => {
            let typed = match value {
                Value::SymbolCode(c) => Some(c),
                _ => None,
            };
            textual::<SymbolCode>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Symbol => {
            let typed = match value {
                Value::Symbol(s) => Some(s),
                _ => None,
            };
            textual::<Symbol>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Asset => {
            let typed = match value {
                Value::Asset(a) => Some(a),
                _ => None,
            };
            textual::<Asset>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::ExtendedAsset => match value {
            Value::ExtendedAsset(a) => a.encode_to(out),
            other => return Err(mismatch(ty, other)),
        },
        BuiltinType::PublicKey => {
            let typed = match value {
                Value::PublicKey(k) => Some(k),
                _ => None,
            };
            textual::<PublicKey>(ty, value, typed)?.encode_to(out)
        }
        BuiltinType::Signature => {
            let typed = match value {
                Value::Signature(s) => Some(s),
                _ => None,
            };
            textual::<Signature>(ty, value, typed)?.encode_to(out)
        }
    }
    Ok(())
}

/// Read a value of type `ty` from `cursor`.
pub fn decode(ty: BuiltinType, cursor: &mut Cursor) -> Result<Value, DecodeError> {
    let value = match ty {
        BuiltinType::Bool => match cursor.read_u8()? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            byte => return Err(DecodeError::InvalidBool(byte)),
        },
        BuiltinType::Int8 => Value::Int(i8::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::Int16 => Value::Int(i16::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::Int32 => Value::Int(i32::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::Int64 => Value::Int(i64::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::Int128 => Value::Int(i128::from_le_bytes(cursor.read_array()?)),
        BuiltinType::UInt8 => Value::UInt(cursor.read_u8()?.into()),
        BuiltinType::UInt16 => Value::UInt(u16::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::UInt32 => Value::UInt(u32::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::UInt64 => Value::UInt(u64::from_le_bytes(cursor.read_array()?).into()),
        BuiltinType::UInt128 => Value::UInt(u128::from_le_bytes(cursor.read_array()?)),
        BuiltinType::VarInt32 => Value::Int(cursor.decode::<VarInt32>()?.0.into()),
        BuiltinType::VarUint32 => Value::UInt(cursor.decode::<VarUint32>()?.0.into()),
        BuiltinType::Float32 => {
            Value::Float(f32::from_le_bytes(cursor.read_array()?).into())
        }
        BuiltinType::Float64 => Value::Float(f64::from_le_bytes(cursor.read_array()?)),
        BuiltinType::String => {
            let len = cursor.decode::<VarUint32>()?.0 as usize;
            let bytes = cursor.read_slice(len)?;
            let string = core::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
            Value::String(string.to_string())
        }
        BuiltinType::Bytes => Value::Bytes(cursor.decode()?),
        BuiltinType::Checksum160 => Value::Checksum160(cursor.decode()?),
        BuiltinType::Checksum256 => Value::Checksum256(cursor.decode()?),
        BuiltinType::Checksum512 => Value::Checksum512(cursor.decode()?),
        BuiltinType::Name => Value::Name(cursor.decode()?),
        BuiltinType::SymbolCode => Value::SymbolCode(cursor.decode()?),
        BuiltinType::Symbol => Value::Symbol(cursor.decode()?),
        BuiltinType::Asset => Value::Asset(cursor.decode()?),
        BuiltinType::ExtendedAsset => Value::ExtendedAsset(cursor.decode()?),
        BuiltinType::PublicKey => Value::PublicKey(cursor.decode()?),
        BuiltinType::Signature => Value::Signature(cursor.decode()?),
    };
    Ok(value)
}

/// Convert `value` to its JSON form as `ty`.
pub fn to_json(ty: BuiltinType, value: &Value) -> Result<JsonValue, EncodeError> {
    if ty.integer_range().is_some() {
        let integer = integer_for_encode(ty, value)?;
        if ty.is_wide_integer() {
            return Ok(JsonValue::String(integer.to_string()));
        }
        return Ok(match integer {
            Integer::Signed(v) => JsonValue::from(v as i64),
            Integer::Unsigned(v) => JsonValue::from(v as u64),
        });
    }

    let json = match ty {
        BuiltinType::Bool => match value {
            Value::Bool(b) => JsonValue::Bool(*b),
            other => return Err(mismatch(ty, other)),
        },
        BuiltinType::Float32 | BuiltinType::Float64 => {
            let float = if ty == BuiltinType::Float32 {
                f64::from(float32_for_encode(ty, value)?)
            } else {
                float_for_encode(ty, value)?
            };
            serde_json::Number::from_f64(float)
                .map(JsonValue::Number)
                .ok_or_else(|| EncodeError::NonFiniteFloat(float.to_string()))?
        }
        BuiltinType::String => match value {
            Value::String(s) => JsonValue::String(s.clone()),
            other => return Err(mismatch(ty, other)),
        },
        BuiltinType::ExtendedAsset => match value {
            Value::ExtendedAsset(a) => serde_json::json!({
                "quantity": a.quantity.to_string(),
                "contract": a.contract.to_string(),
            }),
            other => return Err(mismatch(ty, other)),
        },
        _ => {
            // Textual form of the normalized value.
            let mut scratch = Vec::new();
            encode(ty, value, &mut scratch)?;
            let mut cursor = Cursor::new(&scratch);
            let normalized = decode(ty, &mut cursor).map_err(|err| EncodeError::Malformed {
                ty: ty.name().to_string(),
                reason: err.to_string(),
            })?;
            JsonValue::String(textual_form(&normalized))
        }
    };
    Ok(json)
}

fn textual_form(value: &Value) -> String {
    match value {
        Value::Bytes(v) => v.to_string(),
        Value::Checksum160(v) => v.to_string(),
        Value::Checksum256(v) => v.to_string(),
        Value::Checksum512(v) => v.to_string(),
        Value::Name(v) => v.to_string(),
        Value::SymbolCode(v) => v.to_string(),
        Value::Symbol(v) => v.to_string(),
        Value::Asset(v) => v.to_string(),
        Value::PublicKey(v) => v.to_string(),
        Value::Signature(v) => v.to_string(),
        other => other.kind().to_string(),
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

pub(crate) fn invalid_json(expected: &str, json: &JsonValue) -> DecodeError {
    if json.is_null() {
        return DecodeError::UnexpectedNull(expected.to_string());
    }
    DecodeError::InvalidJson {
        expected: expected.to_string(),
        found: json_kind(json).to_string(),
    }
}

fn json_str<'j>(ty: BuiltinType, json: &'j JsonValue) -> Result<&'j str, DecodeError> {
    json.as_str().ok_or_else(|| invalid_json(ty.name(), json))
}

fn integer_from_json(ty: BuiltinType, json: &JsonValue) -> Result<Integer, DecodeError> {
    let out_of_range = |value: String| DecodeError::OutOfRange {
        ty: ty.name().to_string(),
        value,
    };
    let integer = match json {
        JsonValue::Number(n) => {
            if let Some(v) = n.as_u64() {
                Integer::Unsigned(v.into())
            } else if let Some(v) = n.as_i64() {
                Integer::Signed(v.into())
            } else {
                return Err(out_of_range(n.to_string()));
            }
        }
        JsonValue::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<u128>() {
                Integer::Unsigned(v)
            } else {
                Integer::Signed(
                    s.parse::<i128>()
                        .map_err(|_| invalid_json(ty.name(), json))?,
                )
            }
        }
        other => return Err(invalid_json(ty.name(), other)),
    };
    integer.fit(ty).ok_or_else(|| out_of_range(integer.to_string()))
}

/// Convert the JSON form of a `ty` into a value.
pub fn from_json(ty: BuiltinType, json: &JsonValue) -> Result<Value, DecodeError> {
    if ty.integer_range().is_some() {
        return Ok(integer_from_json(ty, json)?.to_value(ty));
    }

    let value = match ty {
        BuiltinType::Bool => match json {
            JsonValue::Bool(b) => Value::Bool(*b),
            other => return Err(invalid_json(ty.name(), other)),
        },
        BuiltinType::Float32 | BuiltinType::Float64 => {
            let float = match json {
                JsonValue::Number(n) => n.as_f64(),
                JsonValue::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            let float = float.ok_or_else(|| invalid_json(ty.name(), json))?;
            if ty == BuiltinType::Float32 {
                let narrowed = narrow_f32(float).ok_or_else(|| DecodeError::OutOfRange {
                    ty: ty.name().to_string(),
                    value: float.to_string(),
                })?;
                Value::Float(f64::from(narrowed))
            } else {
                Value::Float(float)
            }
        }
        BuiltinType::String => Value::String(json_str(ty, json)?.to_string()),
        BuiltinType::Bytes => Value::Bytes(json_str(ty, json)?.parse()?),
        BuiltinType::Checksum160 => Value::Checksum160(json_str(ty, json)?.parse()?),
        BuiltinType::Checksum256 => Value::Checksum256(json_str(ty, json)?.parse()?),
        BuiltinType::Checksum512 => Value::Checksum512(json_str(ty, json)?.parse()?),
        BuiltinType::Name => Value::Name(json_str(ty, json)?.parse()?),
        BuiltinType::SymbolCode => Value::SymbolCode(json_str(ty, json)?.parse()?),
        BuiltinType::Symbol => Value::Symbol(json_str(ty, json)?.parse()?),
        BuiltinType::Asset => Value::Asset(json_str(ty, json)?.parse()?),
        BuiltinType::ExtendedAsset => {
            let object = json
                .as_object()
                .ok_or_else(|| invalid_json(ty.name(), json))?;
            let field = |name: &str| {
                object
                    .get(name)
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| DecodeError::MissingField {
                        name: ty.name().to_string(),
                        field: name.to_string(),
                    })
            };
            Value::ExtendedAsset(ExtendedAsset {
                quantity: field("quantity")?.parse()?,
                contract: field("contract")?.parse()?,
            })
        }
        BuiltinType::PublicKey => Value::PublicKey(json_str(ty, json)?.parse()?),
        BuiltinType::Signature => Value::Signature(json_str(ty, json)?.parse()?),
        _ => return Err(invalid_json(ty.name(), json)),
    };
    Ok(value)
}
