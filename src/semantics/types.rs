//! Canonical type representation
//!
//! The semantic layer reduces specifier lists to [`CType`] values: a closed
//! set of arithmetic kinds, pointers, and struct/union types, each carrying
//! `const`/`volatile` flags.
//!
//! # Struct/union identity
//!
//! Arithmetic and pointer types have value semantics: they are created
//! fresh per resolution and compared structurally. Struct/union types have
//! *identity*: one [`StructOrUnionType`] cell is created per distinct
//! tag+name and shared by reference (`Rc`) through the environment for the
//! rest of compilation. The member list lives behind a `RefCell` so a
//! forward-declared type can be completed in place; every environment
//! snapshot holding the `Rc` observes the completion without any
//! re-threading. This is the one intentional exception to the otherwise
//! immutable environment structure.
//!
//! # Integer model
//!
//! There is no narrow `int` kind: `int`, `signed`, `long` and their valid
//! combinations all canonicalize to [`CTypeKind::Long`], and enum types are
//! represented as `Long` as well. The combination table in the specifier
//! module is the authority on which keyword sets are legal.

use crate::parser::ast::AggregateTag;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A fully resolved, qualifier-applied type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CType {
    pub kind: CTypeKind,
    pub is_const: bool,
    pub is_volatile: bool,
}

/// The kind of a [`CType`].
#[derive(Debug, Clone)]
pub enum CTypeKind {
    Void,
    Char,
    UChar,
    Short,
    UShort,
    Long,
    ULong,
    Float,
    Double,
    Pointer(Box<CType>),
    StructOrUnion(Rc<StructOrUnionType>),
}

impl PartialEq for CTypeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CTypeKind::Pointer(a), CTypeKind::Pointer(b)) => a == b,
            // Struct/union types compare by identity, not structure
            (CTypeKind::StructOrUnion(a), CTypeKind::StructOrUnion(b)) => Rc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl CType {
    /// An unqualified type of the given kind.
    pub fn new(kind: CTypeKind) -> Self {
        Self {
            kind,
            is_const: false,
            is_volatile: false,
        }
    }

    pub fn qualified(kind: CTypeKind, is_const: bool, is_volatile: bool) -> Self {
        Self {
            kind,
            is_const,
            is_volatile,
        }
    }

    /// Apply additional qualifiers. Qualification is additive: qualifying an
    /// already-const type with `const` is a no-op, not an error.
    pub fn with_qualifiers(&self, is_const: bool, is_volatile: bool) -> CType {
        CType {
            kind: self.kind.clone(),
            is_const: self.is_const || is_const,
            is_volatile: self.is_volatile || is_volatile,
        }
    }

    /// An unqualified pointer to this type.
    pub fn pointer_to(self) -> CType {
        CType::new(CTypeKind::Pointer(Box::new(self)))
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        if self.is_volatile {
            write!(f, "volatile ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for CTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CTypeKind::Void => write!(f, "void"),
            CTypeKind::Char => write!(f, "char"),
            CTypeKind::UChar => write!(f, "unsigned char"),
            CTypeKind::Short => write!(f, "short"),
            CTypeKind::UShort => write!(f, "unsigned short"),
            CTypeKind::Long => write!(f, "long"),
            CTypeKind::ULong => write!(f, "unsigned long"),
            CTypeKind::Float => write!(f, "float"),
            CTypeKind::Double => write!(f, "double"),
            CTypeKind::Pointer(inner) => {
                if matches!(inner.kind, CTypeKind::Pointer(_)) {
                    write!(f, "{}*", inner)
                } else {
                    write!(f, "{} *", inner)
                }
            }
            CTypeKind::StructOrUnion(ty) => write!(f, "{} {}", ty.tag(), ty.name()),
        }
    }
}

/// A resolved struct/union member.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: CType,
}

/// The shared identity cell for a struct or union type.
///
/// Created incomplete (no member list) and completed at most once via
/// [`StructOrUnionType::define`]. An incomplete type is usable wherever
/// layout is not required, e.g. behind a pointer member.
#[derive(Debug)]
pub struct StructOrUnionType {
    tag: AggregateTag,
    name: String,
    members: RefCell<Option<Vec<Member>>>,
}

/// Placeholder tag name for unnamed struct/union types.
pub const ANONYMOUS: &str = "<anonymous>";

impl StructOrUnionType {
    /// A new incomplete type: known by tag+name, members not yet resolved.
    pub fn new_incomplete(tag: AggregateTag, name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            tag,
            name: name.into(),
            members: RefCell::new(None),
        })
    }

    /// A new type that is complete from the start (anonymous definitions).
    pub fn new_complete(tag: AggregateTag, name: impl Into<String>, members: Vec<Member>) -> Rc<Self> {
        let ty = Self::new_incomplete(tag, name);
        ty.define(members);
        ty
    }

    pub fn tag(&self) -> AggregateTag {
        self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_complete(&self) -> bool {
        self.members.borrow().is_some()
    }

    /// The resolved member list, or `None` while the type is incomplete.
    pub fn members(&self) -> Ref<'_, Option<Vec<Member>>> {
        self.members.borrow()
    }

    /// Fix the member list, transitioning incomplete → complete. The
    /// transition is one-directional and happens at most once per identity;
    /// callers check for redefinition before getting here.
    pub fn define(&self, members: Vec<Member>) {
        let mut slot = self.members.borrow_mut();
        debug_assert!(slot.is_none(), "struct/union completed twice");
        *slot = Some(members);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualification_is_additive() {
        let ty = CType::qualified(CTypeKind::Long, true, false);
        let requalified = ty.with_qualifiers(true, true);

        assert!(requalified.is_const);
        assert!(requalified.is_volatile);
        // const applied twice is the same type
        assert_eq!(requalified, ty.with_qualifiers(false, true));
    }

    #[test]
    fn test_struct_identity_equality() {
        let a = StructOrUnionType::new_incomplete(AggregateTag::Struct, "S");
        let b = StructOrUnionType::new_incomplete(AggregateTag::Struct, "S");

        let ta = CType::new(CTypeKind::StructOrUnion(Rc::clone(&a)));
        let tb = CType::new(CTypeKind::StructOrUnion(b));
        let ta2 = CType::new(CTypeKind::StructOrUnion(a));

        // same name, different identity
        assert_ne!(ta, tb);
        assert_eq!(ta, ta2);
    }

    #[test]
    fn test_completion_is_visible_through_shared_handle() {
        let cell = StructOrUnionType::new_incomplete(AggregateTag::Struct, "S");
        let alias = Rc::clone(&cell);
        assert!(!alias.is_complete());

        cell.define(vec![Member {
            name: "x".to_string(),
            ty: CType::new(CTypeKind::Long),
        }]);

        assert!(alias.is_complete());
        assert_eq!(alias.members().as_ref().unwrap()[0].name, "x");
    }

    #[test]
    fn test_display_c_notation() {
        let ty = CType::qualified(CTypeKind::ULong, true, false);
        assert_eq!(ty.to_string(), "const unsigned long");

        let ptr = CType::new(CTypeKind::Long).pointer_to().pointer_to();
        assert_eq!(ptr.to_string(), "long **");
    }
}
