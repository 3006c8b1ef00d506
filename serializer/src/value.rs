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

//! Defines [Value], the native representation the serializer operates on.
use chain_codec_core::*;

/// A value of any ABI type.
///
/// Integers of every width are held as [Value::Int] or [Value::UInt]; the width is only checked
/// against the type the value is encoded as.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An absent optional or binary extension field.
    Null,
    Bool(bool),
    Int(i128),
    UInt(u128),
    Float(f64),
    String(String),
    Bytes(Bytes),
    Checksum160(Checksum160),
    Checksum256(Checksum256),
    Checksum512(Checksum512),
    Name(Name),
    SymbolCode(SymbolCode),
    Symbol(Symbol),
    Asset(Asset),
    ExtendedAsset(ExtendedAsset),
    PublicKey(PublicKey),
    Signature(Signature),
    Struct(StructValue),
    Array(Vec<Value>),
    /// A variant value together with the member type it was built as.
    Variant { member: String, value: Box<Value> },
}

impl Value {
    /// Build a variant value stating which member type it holds.
    pub fn variant(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Variant {
            member: member.into(),
            value: Box::new(value.into()),
        }
    }

    /// The canonical ABI type of this value, if the value alone determines it.
    ///
    /// Integers, floats, structs, arrays and [Value::Null] do not describe their own type.
    pub fn abi_type_name(&self) -> Option<&'static str> {
        match self {
            Value::Bool(_) => Some("bool"),
            Value::String(_) => Some("string"),
            Value::Bytes(_) => Some("bytes"),
            Value::Checksum160(_) => Some("checksum160"),
            Value::Checksum256(_) => Some("checksum256"),
            Value::Checksum512(_) => Some("checksum512"),
            Value::Name(_) => Some("name"),
            Value::SymbolCode(_) => Some("symbol_code"),
            Value::Symbol(_) => Some("symbol"),
            Value::Asset(_) => Some("asset"),
            Value::ExtendedAsset(_) => Some("extended_asset"),
            Value::PublicKey(_) => Some("public_key"),
            Value::Signature(_) => Some("signature"),
            Value::Null
            | Value::Int(_)
            | Value::UInt(_)
            | Value::Float(_)
            | Value::Struct(_)
            | Value::Array(_)
            | Value::Variant { .. } => None,
        }
    }

    /// Short description of the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "signed integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Struct(_) => "struct",
            Value::Array(_) => "array",
            Value::Variant { .. } => "variant",
            other => other.abi_type_name().unwrap_or("value"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Stands in for struct fields that are not set.
pub(crate) static NULL: Value = Value::Null;

/// Field values of a struct in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructValue {
    fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<StructValue> for Value {
    fn from(fields: StructValue) -> Self {
        Value::Struct(fields)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

value_from!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    i128 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    u128 => UInt,
    f64 => Float,
    String => String,
    Bytes => Bytes,
    Checksum160 => Checksum160,
    Checksum256 => Checksum256,
    Checksum512 => Checksum512,
    Name => Name,
    SymbolCode => SymbolCode,
    Symbol => Symbol,
    Asset => Asset,
    ExtendedAsset => ExtendedAsset,
    PublicKey => PublicKey,
    Signature => Signature,
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn self_described_types() {
        assert_eq!(Value::from("foo").abi_type_name(), Some("string"));
        assert_eq!(Value::from(true).abi_type_name(), Some("bool"));
        assert_eq!(Value::from(Name::from_u64(1)).abi_type_name(), Some("name"));
        assert_eq!(Value::from(42u8).abi_type_name(), None);
        assert_eq!(Value::Null.abi_type_name(), None);
        assert_eq!(Value::Array(vec![]).abi_type_name(), None);
    }

    #[test]
    fn struct_fields_keep_order() {
        let fields = StructValue::new()
            .with("b", 1u8)
            .with("a", 2u8)
            .with("b", 3u8);
        let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(fields.get("b"), Some(&Value::UInt(3)));
        assert_eq!(fields.get("c"), None);
    }

    #[test]
    fn options_become_null() {
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(1i8)), Value::Int(1));
    }
}
