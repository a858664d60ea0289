//! Struct/union and enum specifier resolution
//!
//! Aggregate types resolve against the environment under prefixed keys
//! (`struct Node`, `union Blob`, `enum Color`), which keeps tag names from
//! colliding with ordinary typedefs.
//!
//! # The incomplete-then-complete protocol
//!
//! A named struct/union definition ensures an *incomplete* type is
//! registered under its key before its members are resolved (reusing the
//! cell from an earlier forward declaration when one exists). That makes
//! the name resolvable from inside its own member list, which is what
//! allows `struct Node { struct Node *next; ... }`: the member resolves to
//! a pointer at the just-registered incomplete type. After the member list
//! is resolved, the shared type cell is completed in place, so every
//! environment snapshot that already picked up the incomplete type (the
//! self-referential member and any forward declaration included) observes
//! the final member list.
//!
//! Enums have no completeness concept: an enum type is just the wide
//! integer, and defining one registers its enumerator constants followed by
//! the tag key.

use crate::parser::ast::{AggregateTag, Enumerator, MemberDeclaration};
use crate::semantics::env::{Env, EntryKind};
use crate::semantics::errors::SemanticError;
use crate::semantics::types::{CType, CTypeKind, Member, StructOrUnionType, ANONYMOUS};
use std::rc::Rc;

/// Resolve a struct-or-union specifier to its canonical type.
pub(crate) fn resolve_struct_or_union(
    env: Env,
    tag: AggregateTag,
    name: &Option<String>,
    members: &Option<Vec<MemberDeclaration>>,
    is_const: bool,
    is_volatile: bool,
) -> Result<(Env, CType), SemanticError> {
    let name = match name {
        Some(name) => name,
        None => {
            // Anonymous: this must be a new, complete type. No environment
            // entry is registered: without a name there is no lookup key.
            let members = match members {
                Some(members) => members,
                None => return Err(SemanticError::MalformedAggregate { tag }),
            };

            let (env, resolved) = resolve_member_list(env, members)?;
            let cell = StructOrUnionType::new_complete(tag, ANONYMOUS, resolved);
            let ty = CType::qualified(CTypeKind::StructOrUnion(cell), is_const, is_volatile);
            return Ok((env, ty));
        }
    };

    let key = format!("{} {}", tag, name);

    match members {
        None => {
            // Mention of an existing type, or a forward declaration.
            match env.find(&key).cloned() {
                None => {
                    // Not seen before: register a new incomplete type. A
                    // later definition completes this same cell.
                    let cell = StructOrUnionType::new_incomplete(tag, name.clone());
                    let ty =
                        CType::qualified(CTypeKind::StructOrUnion(cell), is_const, is_volatile);
                    let env = env.push_entry(EntryKind::Typedef, key, ty.clone());
                    Ok((env, ty))
                }
                Some(entry) => {
                    if entry.kind != EntryKind::Typedef {
                        return Err(SemanticError::NotATypedef { name: key });
                    }
                    // Found (possibly still incomplete): return it unchanged.
                    Ok((env, entry.ty))
                }
            }
        }
        Some(members) => {
            // Definition. A second complete definition under the same key is
            // a redefinition; an incomplete entry (forward declaration) is
            // the cell this definition will complete.
            let existing = match env.find(&key) {
                Some(entry) => match &entry.ty.kind {
                    CTypeKind::StructOrUnion(cell) if !cell.is_complete() => {
                        Some(Rc::clone(cell))
                    }
                    CTypeKind::StructOrUnion(_) => {
                        return Err(SemanticError::Redefinition { name: key })
                    }
                    _ => None,
                },
                None => None,
            };

            // Ensure an incomplete type is registered before the member list
            // is resolved, so the members can refer back to the type being
            // defined. Reusing the forward-declared cell is what makes the
            // completion below reach every snapshot that took the forward
            // declaration.
            let mut env = env;
            let cell = match existing {
                Some(cell) => cell,
                None => {
                    let fresh = StructOrUnionType::new_incomplete(tag, name.clone());
                    let ty = CType::qualified(
                        CTypeKind::StructOrUnion(Rc::clone(&fresh)),
                        is_const,
                        is_volatile,
                    );
                    env = env.push_entry(EntryKind::Typedef, key, ty);
                    fresh
                }
            };

            let (env, resolved) = resolve_member_list(env, members)?;

            // Complete the shared cell in place; every holder sees it.
            cell.define(resolved);

            let ty = CType::qualified(CTypeKind::StructOrUnion(cell), is_const, is_volatile);
            Ok((env, ty))
        }
    }
}

/// Resolve the member declarations of a struct/union body, threading the
/// environment member by member: a later member may use bindings introduced
/// while resolving an earlier one.
fn resolve_member_list(
    mut env: Env,
    members: &[MemberDeclaration],
) -> Result<(Env, Vec<Member>), SemanticError> {
    let mut resolved = Vec::new();

    for decl in members {
        let (next_env, mut batch) = resolve_member_declaration(env, decl)?;
        env = next_env;
        resolved.append(&mut batch);
    }

    Ok((env, resolved))
}

/// Resolve one member declaration: the shared specifier base, then one
/// member per declarator with its pointer indirection applied.
fn resolve_member_declaration(
    env: Env,
    decl: &MemberDeclaration,
) -> Result<(Env, Vec<Member>), SemanticError> {
    let (env, base) = decl.specifiers.resolve_type(env)?;

    let mut members = Vec::with_capacity(decl.declarators.len());
    for declarator in &decl.declarators {
        let mut ty = base.clone();
        for _ in 0..declarator.pointer_depth {
            ty = ty.pointer_to();
        }
        members.push(Member {
            name: declarator.name.clone(),
            ty,
        });
    }

    Ok((env, members))
}

/// Resolve an enum specifier. The canonical type is always the wide
/// integer; what matters is the environment bookkeeping.
pub(crate) fn resolve_enum(
    env: Env,
    name: &Option<String>,
    enumerators: &Option<Vec<Enumerator>>,
    is_const: bool,
    is_volatile: bool,
) -> Result<(Env, CType), SemanticError> {
    let enumerators = match enumerators {
        Some(enumerators) => enumerators,
        None => {
            // Mention: the definition must already be in the environment.
            let key = format!("enum {}", name.as_deref().unwrap_or(ANONYMOUS));
            match env.find(&key) {
                Some(entry) if entry.kind == EntryKind::Typedef => {}
                _ => return Err(SemanticError::UndefinedType { name: key }),
            }
            return Ok((
                env,
                CType::qualified(CTypeKind::Long, is_const, is_volatile),
            ));
        }
    };

    // Definition: walk the enumerators, assigning a running index. An
    // explicit value resets the index; each enumerator becomes an
    // enum-constant binding.
    let mut env = env;
    let mut index: i64 = 0;
    for enumerator in enumerators {
        if let Some(value) = enumerator.value {
            index = value;
        }
        env = env.push_enum(enumerator.name.clone(), CType::new(CTypeKind::Long), index);
        index += 1;
    }

    // Register the tag itself, when there is one to look up later.
    if let Some(name) = name {
        env = env.push_entry(
            EntryKind::Typedef,
            format!("enum {}", name),
            CType::new(CTypeKind::Long),
        );
    }

    Ok((
        env,
        CType::qualified(CTypeKind::Long, is_const, is_volatile),
    ))
}
