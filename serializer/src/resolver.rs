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

//! Resolution of type names to [TypeDescriptor]s.
//!
//! A type name is an identifier followed by modifiers, read from the right:
//! `$` (binary extension), `?` (optional) and `[]` (array). `?` and `[]` combine freely,
//! `$` is only valid as the outermost modifier of a struct field type.
//!
//! Struct and variant descriptors refer to their members by type name. Members are resolved
//! when the encoder or decoder descends into them, which keeps self-referencing schemas
//! resolvable.
use std::fmt;

use crate::abi::Abi;
use crate::builtin::BuiltinType;
use crate::error::SchemaError;

/// A resolved type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDescriptor {
    Builtin(BuiltinType),
    Struct(StructDescriptor),
    Variant(VariantDescriptor),
    Array(Box<TypeDescriptor>),
    Optional(Box<TypeDescriptor>),
    Extension(Box<TypeDescriptor>),
}

/// A struct with the fields of its base chain flattened in front of its own.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructDescriptor {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantDescriptor {
    pub name: String,
    pub members: Vec<String>,
}

impl VariantDescriptor {
    /// Position of `member` in the member list.
    pub fn index_of(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|candidate| candidate == member)
    }
}

impl TypeDescriptor {
    pub fn is_extension(&self) -> bool {
        matches!(self, TypeDescriptor::Extension(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeDescriptor::Builtin(ty) => write!(f, "{}", ty),
            TypeDescriptor::Struct(s) => f.write_str(&s.name),
            TypeDescriptor::Variant(v) => f.write_str(&v.name),
            TypeDescriptor::Array(inner) => write!(f, "{}[]", inner),
            TypeDescriptor::Optional(inner) => write!(f, "{}?", inner),
            TypeDescriptor::Extension(inner) => write!(f, "{}$", inner),
        }
    }
}

/// Resolve a type name.
///
/// Without an ABI only built-in types and their modified forms are known.
pub fn resolve(abi: Option<&Abi>, type_name: &str) -> Result<TypeDescriptor, SchemaError> {
    Resolution::new(abi).modified(type_name, false)
}

/// Resolve the type name of a struct field. Unlike [resolve] this accepts a trailing `$`.
pub fn resolve_field(abi: Option<&Abi>, type_name: &str) -> Result<TypeDescriptor, SchemaError> {
    Resolution::new(abi).modified(type_name, true)
}

impl Abi {
    /// Resolve a type name against this ABI.
    pub fn resolve(&self, type_name: &str) -> Result<TypeDescriptor, SchemaError> {
        resolve(Some(self), type_name)
    }
}

struct Resolution<'a> {
    abi: Option<&'a Abi>,
    /// Aliases being expanded, innermost last.
    visiting: Vec<String>,
}

impl<'a> Resolution<'a> {
    fn new(abi: Option<&'a Abi>) -> Self {
        Resolution {
            abi,
            visiting: Vec::new(),
        }
    }

    fn modified(
        &mut self,
        type_name: &str,
        allow_extension: bool,
    ) -> Result<TypeDescriptor, SchemaError> {
        let malformed = || SchemaError::MalformedType(type_name.to_string());

        if let Some(inner) = type_name.strip_suffix('$') {
            if !allow_extension {
                return Err(SchemaError::MisplacedExtension(type_name.to_string()));
            }
            if inner.is_empty() || inner.ends_with('$') {
                return Err(malformed());
            }
            let inner = self.modified(inner, false)?;
            return Ok(TypeDescriptor::Extension(Box::new(inner)));
        }

        if let Some(inner) = type_name.strip_suffix('?') {
            if inner.is_empty() || inner.ends_with('$') || inner.ends_with('?') {
                return Err(malformed());
            }
            let inner = self.modified(inner, false)?;
            return Ok(TypeDescriptor::Optional(Box::new(inner)));
        }

        if let Some(inner) = type_name.strip_suffix("[]") {
            if inner.is_empty() || inner.ends_with('$') {
                return Err(malformed());
            }
            let inner = self.modified(inner, false)?;
            return Ok(TypeDescriptor::Array(Box::new(inner)));
        }

        self.named(type_name)
    }

    fn named(&mut self, name: &str) -> Result<TypeDescriptor, SchemaError> {
        if name.is_empty() || name.contains(|c: char| matches!(c, '[' | ']' | '?' | '$')) {
            return Err(SchemaError::MalformedType(name.to_string()));
        }

        if let Some(builtin) = BuiltinType::from_name(name) {
            return Ok(TypeDescriptor::Builtin(builtin));
        }

        let abi = self
            .abi
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;

        if let Some(target) = abi.alias(name) {
            if self.visiting.iter().any(|visited| visited == name) {
                return Err(SchemaError::AliasCycle(name.to_string()));
            }
            log::trace!("resolving alias {} to {}", name, target);
            self.visiting.push(name.to_string());
            let resolved = self.modified(target, false);
            self.visiting.pop();
            return resolved;
        }

        if let Some(members) = abi.variant_members(name) {
            return Ok(TypeDescriptor::Variant(VariantDescriptor {
                name: name.to_string(),
                members: members.to_vec(),
            }));
        }

        if abi.struct_def(name).is_some() {
            return flatten_struct(abi, name).map(TypeDescriptor::Struct);
        }

        Err(SchemaError::UnknownType(name.to_string()))
    }
}

/// Collect the fields of `name` and its base chain, root base first.
fn flatten_struct(abi: &Abi, name: &str) -> Result<StructDescriptor, SchemaError> {
    let mut chain = Vec::new();
    let mut current = name;
    loop {
        let def = abi
            .struct_def(current)
            .ok_or_else(|| SchemaError::UnknownType(current.to_string()))?;
        chain.push(def);
        if def.base.is_empty() {
            break;
        }
        if chain.iter().any(|visited| visited.name == def.base) {
            return Err(SchemaError::BaseCycle(name.to_string()));
        }
        if abi.struct_def(&def.base).is_none() {
            return Err(SchemaError::UnknownBase {
                name: def.name.clone(),
                base: def.base.clone(),
            });
        }
        current = &def.base;
    }

    let fields: Vec<FieldDescriptor> = chain
        .iter()
        .rev()
        .flat_map(|def| def.fields.iter())
        .map(|field| FieldDescriptor {
            name: field.name.clone(),
            type_name: field.type_name.clone(),
        })
        .collect();

    let mut seen_extension = false;
    for field in &fields {
        if field.type_name.ends_with('$') {
            seen_extension = true;
        } else if seen_extension {
            return Err(SchemaError::MisplacedExtension(format!(
                "{}.{}",
                name, field.name
            )));
        }
    }

    let base = chain
        .first()
        .map(|def| def.base.clone())
        .filter(|base| !base.is_empty());

    Ok(StructDescriptor {
        name: name.to_string(),
        base,
        fields,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::abi::{AbiDef, FieldDef, StructDef, TypeDef, VariantDef};

    fn field(name: &str, type_name: &str) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn struct_def(name: &str, base: &str, fields: Vec<FieldDef>) -> StructDef {
        StructDef {
            name: name.to_string(),
            base: base.to_string(),
            fields,
        }
    }

    fn alias(new_type_name: &str, type_name: &str) -> TypeDef {
        TypeDef {
            new_type_name: new_type_name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn abi(types: Vec<TypeDef>, structs: Vec<StructDef>) -> Abi {
        Abi::from_def(AbiDef {
            types,
            structs,
            variants: vec![VariantDef {
                name: "either".to_string(),
                types: vec!["uint8".to_string(), "string".to_string()],
            }],
            ..AbiDef::default()
        })
        .unwrap()
    }

    #[test]
    fn builtins_without_abi() {
        assert_eq!(
            resolve(None, "string").unwrap(),
            TypeDescriptor::Builtin(BuiltinType::String)
        );
        assert_eq!(
            resolve(None, "name?[]").unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::Optional(Box::new(
                TypeDescriptor::Builtin(BuiltinType::Name)
            ))))
        );
        assert_eq!(
            resolve(None, "santa"),
            Err(SchemaError::UnknownType("santa".to_string()))
        );
    }

    #[test]
    fn modifiers_render_back() {
        for name in &["string[]", "name?", "bool[]?", "int8[][]", "asset?[]"] {
            assert_eq!(resolve(None, name).unwrap().to_string(), *name);
        }
        assert_eq!(resolve_field(None, "bool?$").unwrap().to_string(), "bool?$");
    }

    #[test]
    fn malformed_modifiers() {
        for name in &["", "[]", "?", "bool??", "bool$[]", "bool$?", "bo[ol", "bool]"] {
            assert!(
                matches!(
                    resolve_field(None, name),
                    Err(SchemaError::MalformedType(_))
                ),
                "{:?} should be malformed",
                name
            );
        }
        assert_eq!(
            resolve_field(None, "bool$$"),
            Err(SchemaError::MalformedType("bool$$".to_string()))
        );
    }

    #[test]
    fn extension_only_on_fields() {
        assert_eq!(
            resolve(None, "bool$"),
            Err(SchemaError::MisplacedExtension("bool$".to_string()))
        );
        assert!(resolve_field(None, "bool$").unwrap().is_extension());
    }

    #[test]
    fn aliases_are_followed() {
        let abi = abi(
            vec![alias("account", "name"), alias("accounts", "account[]")],
            vec![],
        );
        assert_eq!(
            abi.resolve("accounts").unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::Builtin(BuiltinType::Name)))
        );
        assert_eq!(
            abi.resolve("account?").unwrap().to_string(),
            "name?".to_string()
        );
    }

    #[test]
    fn alias_cycle() {
        let abi = abi(vec![alias("a", "b"), alias("b", "c[]"), alias("c", "a")], vec![]);
        assert!(matches!(
            abi.resolve("a"),
            Err(SchemaError::AliasCycle(_))
        ));
    }

    #[test]
    fn base_fields_come_first() {
        let abi = abi(
            vec![],
            vec![
                struct_def("foo", "", vec![field("one", "string"), field("two", "int8")]),
                struct_def("bar", "foo", vec![field("three", "name?")]),
                struct_def("baz", "bar", vec![field("four", "bool")]),
            ],
        );
        match abi.resolve("baz").unwrap() {
            TypeDescriptor::Struct(descriptor) => {
                let names: Vec<&str> = descriptor.fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["one", "two", "three", "four"]);
                assert_eq!(descriptor.base, Some("bar".to_string()));
            }
            other => panic!("unexpected descriptor {:?}", other),
        }
    }

    #[test]
    fn unknown_base() {
        let abi = abi(vec![], vec![struct_def("foo", "nope", vec![])]);
        assert_eq!(
            abi.resolve("foo"),
            Err(SchemaError::UnknownBase {
                name: "foo".to_string(),
                base: "nope".to_string()
            })
        );
    }

    #[test]
    fn base_cycle() {
        let abi = abi(
            vec![],
            vec![struct_def("a", "b", vec![]), struct_def("b", "a", vec![])],
        );
        assert_eq!(abi.resolve("a"), Err(SchemaError::BaseCycle("a".to_string())));
    }

    #[test]
    fn extensions_must_trail() {
        let abi = abi(
            vec![],
            vec![
                struct_def("ok", "", vec![field("a", "bool"), field("b", "bool$"), field("c", "int8$")]),
                struct_def("bad", "", vec![field("a", "bool$"), field("b", "bool")]),
            ],
        );
        assert!(abi.resolve("ok").is_ok());
        assert_eq!(
            abi.resolve("bad"),
            Err(SchemaError::MisplacedExtension("bad.b".to_string()))
        );
    }

    #[test]
    fn recursive_structs_resolve() {
        let abi = abi(
            vec![],
            vec![struct_def("node", "", vec![field("children", "node[]")])],
        );
        assert!(abi.resolve("node").is_ok());
    }

    #[test]
    fn variants() {
        let abi = abi(vec![], vec![]);
        match abi.resolve("either").unwrap() {
            TypeDescriptor::Variant(variant) => {
                assert_eq!(variant.index_of("string"), Some(1));
                assert_eq!(variant.index_of("bool"), None);
            }
            other => panic!("unexpected descriptor {:?}", other),
        }
    }
}
