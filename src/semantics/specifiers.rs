//! Declaration-specifier resolution
//!
//! Turns the specifier lists the parser collected into canonical types and
//! storage classes:
//!
//! - Basic keyword sets (`unsigned short int`, `long`, ...) go through a
//!   fixed combination table built once at first use.
//! - A single non-basic specifier (struct/union/enum/typedef-name) is
//!   dispatched to the matching resolver.
//! - Storage classes are validated down to at most one distinct specifier.
//!
//! # The combination table
//!
//! The table lists every valid multiset of basic type-specifier keywords.
//! Duplicates of the same keyword collapse before lookup, so `long long` is
//! not distinguished from `long`. There is deliberately no narrow `int`
//! kind: `{int}`, `{signed}`, `{long}`, `{int, long}`, `{signed, long}` and
//! `{int, signed, long}` all map to the wide signed integer, and an empty
//! specifier list means the same type (historic default-int behavior).
//! This collapsing is part of the observable contract; do not "fix" it.

use crate::parser::ast::{
    BasicTypeSpec, DeclarationSpecifiers, SpecifierQualifierList, StorageClassSpec, TypeSpecifier,
};
use crate::semantics::aggregates::{resolve_enum, resolve_struct_or_union};
use crate::semantics::env::{Env, EntryKind};
use crate::semantics::errors::SemanticError;
use crate::semantics::types::{CType, CTypeKind};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// The storage class a declaration resolves to. `auto`, `register`, and the
/// absence of a specifier all come out as `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Auto,
    Static,
    Extern,
    Typedef,
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageClass::Auto => write!(f, "auto"),
            StorageClass::Static => write!(f, "static"),
            StorageClass::Extern => write!(f, "extern"),
            StorageClass::Typedef => write!(f, "typedef"),
        }
    }
}

/// Primitive kinds the combination table can produce. A separate enum (not
/// [`CTypeKind`]) so the table can live in a process-wide static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimitiveKind {
    Void,
    Char,
    UChar,
    Short,
    UShort,
    Long,
    ULong,
    Float,
    Double,
}

impl From<PrimitiveKind> for CTypeKind {
    fn from(kind: PrimitiveKind) -> CTypeKind {
        match kind {
            PrimitiveKind::Void => CTypeKind::Void,
            PrimitiveKind::Char => CTypeKind::Char,
            PrimitiveKind::UChar => CTypeKind::UChar,
            PrimitiveKind::Short => CTypeKind::Short,
            PrimitiveKind::UShort => CTypeKind::UShort,
            PrimitiveKind::Long => CTypeKind::Long,
            PrimitiveKind::ULong => CTypeKind::ULong,
            PrimitiveKind::Float => CTypeKind::Float,
            PrimitiveKind::Double => CTypeKind::Double,
        }
    }
}

/// The fixed table of valid basic type-specifier combinations, keyed by the
/// sorted, deduplicated keyword set. Built once, read-only afterwards.
fn basic_type_table() -> &'static FxHashMap<Vec<BasicTypeSpec>, PrimitiveKind> {
    static TABLE: OnceLock<FxHashMap<Vec<BasicTypeSpec>, PrimitiveKind>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use crate::parser::ast::BasicTypeSpec::*;

        let mut table = FxHashMap::default();
        {
            let mut add = |keys: &[BasicTypeSpec], kind: PrimitiveKind| {
                let mut key = keys.to_vec();
                key.sort();
                table.insert(key, kind);
            };

            add(&[Void], PrimitiveKind::Void);

            add(&[Char], PrimitiveKind::Char);
            add(&[Char, Signed], PrimitiveKind::Char);
            add(&[Char, Unsigned], PrimitiveKind::UChar);

            add(&[Short], PrimitiveKind::Short);
            add(&[Short, Signed], PrimitiveKind::Short);
            add(&[Short, Int], PrimitiveKind::Short);
            add(&[Short, Int, Signed], PrimitiveKind::Short);

            add(&[Short, Unsigned], PrimitiveKind::UShort);
            add(&[Short, Int, Unsigned], PrimitiveKind::UShort);

            add(&[Int], PrimitiveKind::Long);
            add(&[Int, Signed], PrimitiveKind::Long);
            add(&[Int, Long], PrimitiveKind::Long);
            add(&[Int, Signed, Long], PrimitiveKind::Long);
            add(&[Signed], PrimitiveKind::Long);
            add(&[Signed, Long], PrimitiveKind::Long);
            add(&[Long], PrimitiveKind::Long);

            add(&[Unsigned], PrimitiveKind::ULong);
            add(&[Unsigned, Int], PrimitiveKind::ULong);
            add(&[Unsigned, Long], PrimitiveKind::ULong);
            add(&[Unsigned, Int, Long], PrimitiveKind::ULong);

            add(&[Float], PrimitiveKind::Float);

            add(&[Double], PrimitiveKind::Double);
            add(&[Double, Long], PrimitiveKind::Double);
        }
        table
    })
}

/// Classify a set of basic keywords against the combination table.
/// Duplicates of the same keyword collapse first.
fn classify_basic(kinds: &[BasicTypeSpec]) -> Option<PrimitiveKind> {
    let mut key = kinds.to_vec();
    key.sort();
    key.dedup();
    basic_type_table().get(&key).copied()
}

/// Render a specifier list for error messages.
fn describe_specifiers(specifiers: &[TypeSpecifier]) -> String {
    specifiers
        .iter()
        .map(|spec| match spec {
            TypeSpecifier::Basic(kind) => kind.to_string(),
            TypeSpecifier::TypedefName(name) => name.clone(),
            TypeSpecifier::StructOrUnion { tag, name, .. } => match name {
                Some(name) => format!("{} {}", tag, name),
                None => tag.to_string(),
            },
            TypeSpecifier::Enum { name, .. } => match name {
                Some(name) => format!("enum {}", name),
                None => "enum".to_string(),
            },
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl SpecifierQualifierList {
    /// Resolve this specifier-qualifier list to a canonical type, threading
    /// the environment through whichever resolver applies.
    pub fn resolve_type(&self, env: Env) -> Result<(Env, CType), SemanticError> {
        let is_const = self.is_const();
        let is_volatile = self.is_volatile();

        // No type specifier at all: default-int, i.e. the wide signed
        // integer in this model.
        if self.type_specifiers.is_empty() {
            return Ok((
                env,
                CType::qualified(CTypeKind::Long, is_const, is_volatile),
            ));
        }

        // Every specifier basic: the combination table decides.
        if self.type_specifiers.iter().all(TypeSpecifier::is_basic) {
            let kinds: Vec<BasicTypeSpec> = self
                .type_specifiers
                .iter()
                .filter_map(|spec| match spec {
                    TypeSpecifier::Basic(kind) => Some(*kind),
                    _ => None,
                })
                .collect();

            return match classify_basic(&kinds) {
                Some(kind) => Ok((
                    env,
                    CType::qualified(kind.into(), is_const, is_volatile),
                )),
                None => Err(SemanticError::InvalidTypeSpecifierCombination {
                    specifiers: describe_specifiers(&self.type_specifiers),
                }),
            };
        }

        // A non-basic specifier must stand alone.
        if self.type_specifiers.len() != 1 {
            return Err(SemanticError::InvalidTypeSpecifierCombination {
                specifiers: describe_specifiers(&self.type_specifiers),
            });
        }

        match &self.type_specifiers[0] {
            // Unreachable: a lone basic specifier took the table branch
            TypeSpecifier::Basic(_) => Err(SemanticError::InvalidTypeSpecifierCombination {
                specifiers: describe_specifiers(&self.type_specifiers),
            }),
            TypeSpecifier::TypedefName(name) => {
                resolve_typedef_name(env, name, is_const, is_volatile)
            }
            TypeSpecifier::StructOrUnion { tag, name, members } => {
                resolve_struct_or_union(env, *tag, name, members, is_const, is_volatile)
            }
            TypeSpecifier::Enum { name, enumerators } => {
                resolve_enum(env, name, enumerators, is_const, is_volatile)
            }
        }
    }
}

impl DeclarationSpecifiers {
    /// Resolve full declaration specifiers: the canonical type (with the
    /// environment it may have extended) plus the storage class.
    pub fn resolve(&self, env: Env) -> Result<(Env, StorageClass, CType), SemanticError> {
        let (env, ty) = self.specifiers.resolve_type(env)?;
        let storage = self.storage_class()?;
        Ok((env, storage, ty))
    }

    /// Validate and map the collected storage-class specifiers. More than
    /// one distinct specifier is a hard error; repeats of the same keyword
    /// collapse.
    pub fn storage_class(&self) -> Result<StorageClass, SemanticError> {
        let mut distinct: Vec<StorageClassSpec> = Vec::new();
        for spec in &self.storage_classes {
            if !distinct.contains(spec) {
                distinct.push(*spec);
            }
        }

        match distinct.as_slice() {
            [] => Ok(StorageClass::Auto),
            [single] => Ok(match single {
                StorageClassSpec::None | StorageClassSpec::Auto | StorageClassSpec::Register => {
                    StorageClass::Auto
                }
                StorageClassSpec::Extern => StorageClass::Extern,
                StorageClassSpec::Static => StorageClass::Static,
                StorageClassSpec::Typedef => StorageClass::Typedef,
            }),
            _ => Err(SemanticError::MultipleStorageClassSpecifiers {
                specifiers: distinct
                    .iter()
                    .map(|spec| spec.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            }),
        }
    }
}

/// Resolve a bare identifier used as a type specifier. The name must be
/// bound, and bound as a type; the requested qualifiers are applied on top
/// of whatever the typedef already carries.
fn resolve_typedef_name(
    env: Env,
    name: &str,
    is_const: bool,
    is_volatile: bool,
) -> Result<(Env, CType), SemanticError> {
    let entry = match env.find(name) {
        Some(entry) => entry,
        None => {
            return Err(SemanticError::UndefinedName {
                name: name.to_string(),
            })
        }
    };

    if entry.kind != EntryKind::Typedef {
        return Err(SemanticError::NotATypedef {
            name: name.to_string(),
        });
    }

    let ty = entry.ty.with_qualifiers(is_const, is_volatile);
    Ok((env, ty))
}
