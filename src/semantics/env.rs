//! Scoped symbol environment
//!
//! [`Env`] maps names to typedef and enum-constant bindings. It is a
//! persistent structure: `push_entry`/`push_enum` never mutate the receiver,
//! they return a new environment sharing its tail with the old one. Any
//! snapshot taken at any point stays valid and unchanged, which is what lets
//! the resolver thread one environment value forward through a translation
//! unit while earlier snapshots (captured in AST nodes, tests, or sibling
//! scopes) keep meaning what they meant.
//!
//! Lookup walks the chain from the newest binding outward, so an inner
//! binding shadows an outer one with the same name.
//!
//! The binding chain itself is never mutated. The one way an already-pushed
//! binding can appear to change is through a struct/union type's shared
//! completion cell (see the types module), which is deliberate: completing
//! `struct S` must be visible from every snapshot that already knows the
//! name.

use crate::semantics::types::CType;
use std::rc::Rc;

/// What a name is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A type binding: a `typedef`, or a registered `struct <name>`,
    /// `union <name>`, `enum <name>` tag key.
    Typedef,
    /// An enumerator constant.
    EnumConstant,
}

/// One environment binding.
#[derive(Debug, Clone)]
pub struct Entry {
    pub kind: EntryKind,
    pub ty: CType,
    /// The constant value, for enum constants.
    pub value: Option<i64>,
}

/// Persistent name → [`Entry`] map.
#[derive(Debug, Clone, Default)]
pub struct Env {
    head: Option<Rc<Binding>>,
}

#[derive(Debug)]
struct Binding {
    name: String,
    entry: Entry,
    parent: Option<Rc<Binding>>,
}

impl Env {
    /// The empty environment at the root of a translation unit.
    pub fn new() -> Self {
        Env::default()
    }

    /// Look up a name. The innermost (most recently pushed) binding wins.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        let mut current = self.head.as_deref();
        while let Some(binding) = current {
            if binding.name == name {
                return Some(&binding.entry);
            }
            current = binding.parent.as_deref();
        }
        None
    }

    /// A new environment with `name` bound; the receiver is unchanged.
    pub fn push_entry(&self, kind: EntryKind, name: impl Into<String>, ty: CType) -> Env {
        self.push(
            name.into(),
            Entry {
                kind,
                ty,
                value: None,
            },
        )
    }

    /// A new environment with an enum-constant binding.
    pub fn push_enum(&self, name: impl Into<String>, ty: CType, value: i64) -> Env {
        self.push(
            name.into(),
            Entry {
                kind: EntryKind::EnumConstant,
                ty,
                value: Some(value),
            },
        )
    }

    fn push(&self, name: String, entry: Entry) -> Env {
        Env {
            head: Some(Rc::new(Binding {
                name,
                entry,
                parent: self.head.clone(),
            })),
        }
    }
}
