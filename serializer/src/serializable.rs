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

use core::convert::TryFrom;

use chain_codec_core::*;

use crate::error::DecodeError;
use crate::value::Value;

/// Rust types with a fixed ABI type.
///
/// Implementors can be encoded and decoded without naming their type, see
/// [crate::encode_typed] and [crate::decode_typed].
pub trait AbiSerializable: Sized {
    /// Name of the ABI type values of `Self` are encoded as.
    const ABI_NAME: &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

fn unexpected(expected: &str, value: &Value) -> DecodeError {
    DecodeError::Malformed(format!("expected {}, found {}", expected, value.kind()))
}

macro_rules! serializable_integer {
    ($($ty:ty => $abi:expr),* $(,)?) => {
        $(
            impl AbiSerializable for $ty {
                const ABI_NAME: &'static str = $abi;

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn from_value(value: Value) -> Result<Self, DecodeError> {
                    let out_of_range = |value: String| DecodeError::OutOfRange {
                        ty: $abi.to_string(),
                        value,
                    };
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v.to_string())),
                        Value::UInt(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v.to_string())),
                        other => Err(unexpected($abi, &other)),
                    }
                }
            }
        )*
    };
}

serializable_integer!(
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    i128 => "int128",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    u128 => "uint128",
);

/// Domain types that are also accepted in their textual form.
macro_rules! serializable_domain {
    ($($ty:ident => $abi:expr),* $(,)?) => {
        $(
            impl AbiSerializable for $ty {
                const ABI_NAME: &'static str = $abi;

                fn to_value(&self) -> Value {
                    Value::$ty(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, DecodeError> {
                    match value {
                        Value::$ty(v) => Ok(v),
                        Value::String(s) => Ok(s.parse()?),
                        other => Err(unexpected($abi, &other)),
                    }
                }
            }
        )*
    };
}

serializable_domain!(
    Bytes => "bytes",
    Checksum160 => "checksum160",
    Checksum256 => "checksum256",
    Checksum512 => "checksum512",
    Name => "name",
    SymbolCode => "symbol_code",
    Symbol => "symbol",
    Asset => "asset",
    PublicKey => "public_key",
    Signature => "signature",
);

impl AbiSerializable for bool {
    const ABI_NAME: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected(Self::ABI_NAME, &other)),
        }
    }
}

impl AbiSerializable for String {
    const ABI_NAME: &'static str = "string";

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(unexpected(Self::ABI_NAME, &other)),
        }
    }
}

impl AbiSerializable for f32 {
    const ABI_NAME: &'static str = "float32";

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl AbiSerializable for f64 {
    const ABI_NAME: &'static str = "float64";

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(unexpected(Self::ABI_NAME, &other)),
        }
    }
}

impl AbiSerializable for VarUint32 {
    const ABI_NAME: &'static str = "varuint32";

    fn to_value(&self) -> Value {
        Value::from(self.0)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        u32::from_value(value).map(VarUint32)
    }
}

impl AbiSerializable for VarInt32 {
    const ABI_NAME: &'static str = "varint32";

    fn to_value(&self) -> Value {
        Value::from(self.0)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        i32::from_value(value).map(VarInt32)
    }
}

impl AbiSerializable for ExtendedAsset {
    const ABI_NAME: &'static str = "extended_asset";

    fn to_value(&self) -> Value {
        Value::ExtendedAsset(*self)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::ExtendedAsset(v) => Ok(v),
            other => Err(unexpected(Self::ABI_NAME, &other)),
        }
    }
}
