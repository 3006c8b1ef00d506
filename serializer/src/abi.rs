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

//! The ABI schema model.
//!
//! [AbiDef] is the serde representation of an ABI JSON document. [Abi] is the indexed,
//! read-only form the resolver works with.
use std::collections::HashMap;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use chain_codec_core::Name;

use crate::builtin::BuiltinType;
use crate::error::SchemaError;

/// An ABI document as it is published for a contract.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiDef {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub structs: Vec<StructDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub variants: Vec<VariantDef>,
}

/// Alias declaration.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct StructDef {
    pub name: String,
    /// Name of the base struct. Empty when the struct has no base.
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct TableDef {
    pub name: Name,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct VariantDef {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// An indexed ABI.
///
/// Built once from an [AbiDef] and never mutated afterwards, so one instance can be shared by
/// reference between any number of concurrent encode and decode calls.
#[derive(Clone, Debug, Default)]
pub struct Abi {
    def: AbiDef,
    aliases: HashMap<String, String>,
    structs: HashMap<String, StructDef>,
    variants: HashMap<String, Vec<String>>,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
}

impl Abi {
    /// Index an ABI definition.
    ///
    /// Fails if a type, struct or variant name is declared twice, if a declared name shadows a
    /// built-in type, or if an action or table is registered twice.
    pub fn from_def(def: AbiDef) -> Result<Self, SchemaError> {
        let mut abi = Abi::default();
        let mut declared = std::collections::HashSet::new();
        let mut declare = |name: &str| -> Result<(), SchemaError> {
            if BuiltinType::from_name(name).is_some() {
                return Err(SchemaError::ShadowsBuiltin(name.to_string()));
            }
            if name.is_empty() {
                return Err(SchemaError::InvalidDefinition(
                    "type names must not be empty".to_string(),
                ));
            }
            if !declared.insert(name.to_string()) {
                return Err(SchemaError::DuplicateType(name.to_string()));
            }
            Ok(())
        };

        for alias in &def.types {
            declare(&alias.new_type_name)?;
            abi.aliases
                .insert(alias.new_type_name.clone(), alias.type_name.clone());
        }
        for struct_def in &def.structs {
            declare(&struct_def.name)?;
            abi.structs
                .insert(struct_def.name.clone(), struct_def.clone());
        }
        for variant in &def.variants {
            declare(&variant.name)?;
            abi.variants
                .insert(variant.name.clone(), variant.types.clone());
        }
        for action in &def.actions {
            if abi
                .actions
                .insert(action.name, action.type_name.clone())
                .is_some()
            {
                return Err(SchemaError::InvalidDefinition(format!(
                    "action {} is defined more than once",
                    action.name
                )));
            }
        }
        for table in &def.tables {
            if abi
                .tables
                .insert(table.name, table.type_name.clone())
                .is_some()
            {
                return Err(SchemaError::InvalidDefinition(format!(
                    "table {} is defined more than once",
                    table.name
                )));
            }
        }

        abi.def = def;
        Ok(abi)
    }

    /// Parse an ABI JSON document and index it.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let def: AbiDef = serde_json::from_str(json)
            .map_err(|err| SchemaError::InvalidDefinition(err.to_string()))?;
        Self::from_def(def)
    }

    /// The definition this ABI was built from.
    pub fn definition(&self) -> &AbiDef {
        &self.def
    }

    /// Returns the type name of the data of the given action.
    pub fn get_action_type(&self, action: Name) -> Option<&str> {
        self.actions.get(&action).map(String::as_str)
    }

    /// Returns the type name of the rows of the given table.
    pub fn get_table_type(&self, table: Name) -> Option<&str> {
        self.tables.get(&table).map(String::as_str)
    }

    pub(crate) fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub(crate) fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub(crate) fn variant_members(&self, name: &str) -> Option<&[String]> {
        self.variants.get(name).map(Vec::as_slice)
    }
}

impl TryFrom<AbiDef> for Abi {
    type Error = SchemaError;

    fn try_from(def: AbiDef) -> Result<Self, Self::Error> {
        Abi::from_def(def)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TOKEN_ABI: &str = r#"{
        "version": "eosio::abi/1.1",
        "types": [{"new_type_name": "account_name", "type": "name"}],
        "structs": [
            {
                "name": "transfer",
                "base": "",
                "fields": [
                    {"name": "from", "type": "account_name"},
                    {"name": "to", "type": "account_name"},
                    {"name": "quantity", "type": "asset"},
                    {"name": "memo", "type": "string"}
                ]
            },
            {
                "name": "account",
                "fields": [{"name": "balance", "type": "asset"}]
            }
        ],
        "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}],
        "tables": [{
            "name": "accounts",
            "index_type": "i64",
            "key_names": [],
            "key_types": [],
            "type": "account"
        }]
    }"#;

    #[test]
    fn parse_token_abi() {
        let abi = Abi::from_json_str(TOKEN_ABI).unwrap();
        assert_eq!(abi.definition().version, "eosio::abi/1.1");
        assert_eq!(
            abi.get_action_type(Name::from_string("transfer").unwrap()),
            Some("transfer")
        );
        assert_eq!(
            abi.get_table_type(Name::from_string("accounts").unwrap()),
            Some("account")
        );
        assert_eq!(abi.get_action_type(Name::from_string("issue").unwrap()), None);
        assert_eq!(abi.alias("account_name"), Some("name"));
        assert_eq!(abi.struct_def("account").unwrap().base, "");
        assert!(abi.definition().variants.is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let def = AbiDef {
            types: vec![TypeDef {
                new_type_name: "foo".to_string(),
                type_name: "string".to_string(),
            }],
            structs: vec![StructDef {
                name: "foo".to_string(),
                ..StructDef::default()
            }],
            ..AbiDef::default()
        };
        assert_eq!(
            Abi::from_def(def).unwrap_err(),
            SchemaError::DuplicateType("foo".to_string())
        );
    }

    #[test]
    fn builtin_names_are_reserved() {
        let def = AbiDef {
            types: vec![TypeDef {
                new_type_name: "name".to_string(),
                type_name: "string".to_string(),
            }],
            ..AbiDef::default()
        };
        assert_eq!(
            Abi::try_from(def).unwrap_err(),
            SchemaError::ShadowsBuiltin("name".to_string())
        );
    }

    #[test]
    fn invalid_json_is_a_schema_error() {
        assert!(matches!(
            Abi::from_json_str("{\"structs\": 1}"),
            Err(SchemaError::InvalidDefinition(_))
        ));
        assert!(matches!(
            Abi::from_json_str(r#"{"actions": [{"name": "Bad", "type": "x"}]}"#),
            Err(SchemaError::InvalidDefinition(_))
        ));
    }
}
