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

//! Actions and the typed data they carry.
use parity_scale_codec::{Decode, Encode, Error as CodecError, Input, Output};
use serde::{Deserialize, Serialize};

use chain_codec_core::{Bytes, Name, VarUint32};

use crate::abi::Abi;
use crate::cursor::Cursor;
use crate::decoder::check_trailing_bytes;
use crate::error::{DecodeError, EncodeError, Error, SchemaError};
use crate::options::DecodeOptions;
use crate::value::Value;
use crate::TypeRef;

/// The account and permission an action is authorized by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: Name,
}

impl PermissionLevel {
    pub fn new(actor: Name, permission: Name) -> Self {
        PermissionLevel { actor, permission }
    }
}

impl Encode for PermissionLevel {
    fn size_hint(&self) -> usize {
        16
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.actor.encode_to(dest);
        self.permission.encode_to(dest);
    }
}

impl Decode for PermissionLevel {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        Ok(PermissionLevel {
            actor: Name::decode(input)?,
            permission: Name::decode(input)?,
        })
    }
}

/// Payload of an action before it is encoded.
///
/// Decided once when the action is built: raw bytes are taken as they are, typed values are
/// encoded through the ABI serializer.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionData {
    Raw(Bytes),
    Typed(Value),
}

impl From<Bytes> for ActionData {
    fn from(bytes: Bytes) -> Self {
        ActionData::Raw(bytes)
    }
}

impl From<Value> for ActionData {
    fn from(value: Value) -> Self {
        ActionData::Typed(value)
    }
}

/// A contract call: the `name` action of the `account` contract.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Action {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: Bytes,
}

impl Action {
    /// Build an action.
    ///
    /// Typed data is encoded as the action type registered in `abi`. Without an ABI the data
    /// must describe its own type, see [Value::abi_type_name].
    pub fn new(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: impl Into<ActionData>,
        abi: Option<&Abi>,
    ) -> Result<Self, Error> {
        let data = match data.into() {
            ActionData::Raw(bytes) => bytes,
            ActionData::Typed(value) => {
                let encoded = match abi {
                    Some(abi) => {
                        let type_name = abi
                            .get_action_type(name)
                            .ok_or_else(|| SchemaError::UnknownAction(name.to_string()))?;
                        crate::encode(&value, Some(TypeRef::Name(type_name)), Some(abi))?
                    }
                    None => crate::encode(&value, None, None)?,
                };
                Bytes::new(encoded)
            }
        };
        Ok(Action {
            account,
            name,
            authorization,
            data,
        })
    }

    /// Decode the data as the given type.
    pub fn decode_data(&self, type_name: &str, abi: Option<&Abi>) -> Result<Value, Error> {
        crate::decode(
            crate::DecodeInput::Binary(self.data.as_slice()),
            Some(TypeRef::Name(type_name)),
            abi,
        )
    }

    /// Decode the data as the type `abi` registers for this action.
    pub fn decode_data_with_abi(&self, abi: &Abi) -> Result<Value, Error> {
        let type_name = abi
            .get_action_type(self.name)
            .ok_or_else(|| SchemaError::UnknownAction(self.name.to_string()))?;
        self.decode_data(type_name, Some(abi))
    }

    /// Encode the action, failing when a count does not fit its [VarUint32] prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        count_prefix(self.authorization.len())?;
        count_prefix(self.data.len())?;
        Ok(self.encode())
    }

    /// Decode an action from its complete binary form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(data);
        let action = cursor.decode::<Action>()?;
        if !cursor.is_empty() {
            return Err(DecodeError::TrailingBytes(cursor.remaining()).into());
        }
        Ok(action)
    }

    /// Decode an action from the start of `data`, handling leftovers per `options`.
    pub fn from_bytes_with_options(data: &[u8], options: &DecodeOptions) -> Result<Self, Error> {
        let mut cursor = Cursor::new(data);
        let action = cursor.decode::<Action>()?;
        check_trailing_bytes(cursor.remaining(), "action", options)?;
        Ok(action)
    }
}

fn count_prefix(len: usize) -> Result<VarUint32, EncodeError> {
    VarUint32::from_len(len).ok_or(EncodeError::LengthOverflow(len))
}

/// Counts must fit in 32 bits, see [Action::to_bytes].
impl Encode for Action {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.account.encode_to(dest);
        self.name.encode_to(dest);
        VarUint32(self.authorization.len() as u32).encode_to(dest);
        for level in &self.authorization {
            level.encode_to(dest);
        }
        self.data.encode_to(dest);
    }
}

impl Decode for Action {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let account = Name::decode(input)?;
        let name = Name::decode(input)?;
        let count = VarUint32::decode(input)?.0;
        let mut authorization = Vec::new();
        for _ in 0..count {
            authorization.push(PermissionLevel::decode(input)?);
        }
        Ok(Action {
            account,
            name,
            authorization,
            data: Bytes::decode(input)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::StructValue;

    fn name(s: &str) -> Name {
        Name::from_string(s).unwrap()
    }

    fn token_abi() -> Abi {
        Abi::from_json_str(
            r#"{
                "structs": [{
                    "name": "transfer",
                    "fields": [
                        {"name": "from", "type": "name"},
                        {"name": "to", "type": "name"},
                        {"name": "quantity", "type": "asset"},
                        {"name": "memo", "type": "string"}
                    ]
                }],
                "actions": [{"name": "transfer", "type": "transfer"}]
            }"#,
        )
        .unwrap()
    }

    fn transfer() -> Value {
        StructValue::new()
            .with("from", "alice")
            .with("to", "bob")
            .with("quantity", "1.0000 EOS")
            .with("memo", "")
            .into()
    }

    #[test]
    fn typed_data_through_abi() {
        let abi = token_abi();
        let auth = vec![PermissionLevel::new(name("alice"), name("active"))];
        let action = Action::new(
            name("eosio.token"),
            name("transfer"),
            auth,
            transfer(),
            Some(&abi),
        )
        .unwrap();
        assert_eq!(
            hex::encode(action.data.as_slice()),
            "0000000000855c340000000000000e3d102700000000000004454f530000000000"
        );
        let decoded = action.decode_data_with_abi(&abi).unwrap();
        let fields = decoded.as_struct().unwrap();
        assert_eq!(fields.get("from"), Some(&Value::Name(name("alice"))));
        assert_eq!(fields.get("memo"), Some(&Value::from("")));
    }

    #[test]
    fn unknown_action() {
        let abi = token_abi();
        let result = Action::new(name("eosio.token"), name("issue"), vec![], transfer(), Some(&abi));
        assert_eq!(
            result,
            Err(SchemaError::UnknownAction("issue".to_string()).into())
        );
    }

    #[test]
    fn self_described_data() {
        let action = Action::new(name("foo"), name("bar"), vec![], Value::from("hi"), None).unwrap();
        assert_eq!(action.data.as_slice(), b"\x02hi");
        assert_eq!(action.decode_data("string", None).unwrap(), Value::from("hi"));

        let result = Action::new(name("foo"), name("bar"), vec![], Value::from(1u8), None);
        assert_eq!(result, Err(SchemaError::MissingType.into()));
    }

    #[test]
    fn raw_data_is_kept() {
        let data = Bytes::new(vec![1, 2, 3]);
        let action = Action::new(name("foo"), name("bar"), vec![], data.clone(), None).unwrap();
        assert_eq!(action.data, data);
    }

    #[test]
    fn binary_form() {
        let action = Action {
            account: name("eosio.token"),
            name: name("transfer"),
            authorization: vec![PermissionLevel::new(name("alice"), name("active"))],
            data: Bytes::new(vec![0xab]),
        };
        let encoded = action.encode();
        assert_eq!(
            hex::encode(&encoded),
            concat!(
                "00a6823403ea3055",
                "000000572d3ccdcd",
                "01",
                "0000000000855c34",
                "00000000a8ed3232",
                "01ab"
            )
        );
        assert_eq!(Action::from_bytes(&encoded).unwrap(), action);
        assert_eq!(action.to_bytes().unwrap(), encoded);

        let mut trailing = encoded.clone();
        trailing.push(0);
        assert_eq!(
            Action::from_bytes(&trailing),
            Err(DecodeError::TrailingBytes(1).into())
        );
        assert_eq!(
            Action::from_bytes_with_options(&trailing, &DecodeOptions::default()).unwrap(),
            action
        );
        assert!(matches!(
            Action::from_bytes(&encoded[..20]),
            Err(Error::Decode(DecodeError::BufferUnderrun { .. }))
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn count_prefix_overflow() {
        let len = u32::max_value() as usize + 1;
        assert_eq!(count_prefix(len), Err(EncodeError::LengthOverflow(len)));
        assert_eq!(
            count_prefix(u32::max_value() as usize),
            Ok(VarUint32(u32::max_value()))
        );
    }

    #[test]
    fn json_form() {
        let action = Action {
            account: name("eosio.token"),
            name: name("transfer"),
            authorization: vec![PermissionLevel::new(name("alice"), name("active"))],
            data: Bytes::new(vec![0xab]),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "account": "eosio.token",
                "name": "transfer",
                "authorization": [{"actor": "alice", "permission": "active"}],
                "data": "ab"
            })
        );
        assert_eq!(serde_json::from_value::<Action>(json).unwrap(), action);
    }
}
