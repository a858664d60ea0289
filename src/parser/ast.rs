// Parse-tree definitions for C declarations

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// storage-class-specifier: auto | register | static | extern | typedef
///
/// `None` is the unspecified value; it resolves the same way as `auto` and
/// `register` (automatic storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClassSpec {
    None,
    Auto,
    Register,
    Static,
    Extern,
    Typedef,
}

impl fmt::Display for StorageClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            StorageClassSpec::None => "<none>",
            StorageClassSpec::Auto => "auto",
            StorageClassSpec::Register => "register",
            StorageClassSpec::Static => "static",
            StorageClassSpec::Extern => "extern",
            StorageClassSpec::Typedef => "typedef",
        };
        write!(f, "{}", keyword)
    }
}

/// type-qualifier: const | volatile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQualifier {
    Const,
    Volatile,
}

/// Basic (keyword-level) type specifiers. These are atoms, not concrete
/// types: which multisets form a valid type is decided by the semantic
/// layer's combination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasicTypeSpec {
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
}

impl fmt::Display for BasicTypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            BasicTypeSpec::Void => "void",
            BasicTypeSpec::Char => "char",
            BasicTypeSpec::Short => "short",
            BasicTypeSpec::Int => "int",
            BasicTypeSpec::Long => "long",
            BasicTypeSpec::Float => "float",
            BasicTypeSpec::Double => "double",
            BasicTypeSpec::Signed => "signed",
            BasicTypeSpec::Unsigned => "unsigned",
        };
        write!(f, "{}", keyword)
    }
}

/// struct-or-union: struct | union
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateTag {
    Struct,
    Union,
}

impl fmt::Display for AggregateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateTag::Struct => write!(f, "struct"),
            AggregateTag::Union => write!(f, "union"),
        }
    }
}

/// type-specifier
///
/// ```text
/// type-specifier
///   : void | char | short | int | long | float | double | signed | unsigned
///   | struct-or-union-specifier
///   | enum-specifier
///   | typedef-name
/// ```
///
/// A closed sum type: the semantic layer dispatches resolution by matching
/// on the variant.
#[derive(Debug, Clone)]
pub enum TypeSpecifier {
    Basic(BasicTypeSpec),

    /// A bare identifier previously declared with `typedef`.
    TypedefName(String),

    /// struct-or-union-specifier. `members` is `None` for a bare mention
    /// (`struct Node`) and `Some` for a definition (`struct Node { ... }`).
    StructOrUnion {
        tag: AggregateTag,
        name: Option<String>,
        members: Option<Vec<MemberDeclaration>>,
    },

    /// enum-specifier. `enumerators` is `None` for a mention of a
    /// previously defined enum.
    Enum {
        name: Option<String>,
        enumerators: Option<Vec<Enumerator>>,
    },
}

impl TypeSpecifier {
    pub fn is_basic(&self) -> bool {
        matches!(self, TypeSpecifier::Basic(_))
    }
}

/// specifier-qualifier-list: [ type-specifier | type-qualifier ]+
///
/// Order of appearance carries no meaning; the list just records what the
/// parser saw. Used standalone for struct/union member declarations and as
/// the base of full declaration specifiers.
#[derive(Debug, Clone, Default)]
pub struct SpecifierQualifierList {
    pub type_specifiers: Vec<TypeSpecifier>,
    pub qualifiers: Vec<TypeQualifier>,
}

impl SpecifierQualifierList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(&TypeQualifier::Const)
    }

    pub fn is_volatile(&self) -> bool {
        self.qualifiers.contains(&TypeQualifier::Volatile)
    }
}

/// declaration-specifiers:
/// [ storage-class-specifier | type-specifier | type-qualifier ]+
#[derive(Debug, Clone, Default)]
pub struct DeclarationSpecifiers {
    pub storage_classes: Vec<StorageClassSpec>,
    pub specifiers: SpecifierQualifierList,
}

impl DeclarationSpecifiers {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A declarator in the supported subset: pointer indirection plus a name.
///
/// Array, function, and parenthesised declarators belong to the enclosing
/// compiler and are not parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub pointer_depth: usize,
    pub name: String,
}

/// struct-declaration: one specifier-qualifier list shared by one or more
/// member declarators (`long x, *p;` declares two members).
#[derive(Debug, Clone)]
pub struct MemberDeclaration {
    pub specifiers: SpecifierQualifierList,
    pub declarators: Vec<Declarator>,
}

/// enumerator: identifier [ '=' constant ]?
///
/// An absent value means "previous value plus one", starting from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: Option<i64>,
}

/// External declaration: declaration-specifiers followed by zero or more
/// declarators. Zero declarators is the tag-only form (`struct Node;`, or a
/// struct/union/enum definition that declares no object).
#[derive(Debug, Clone)]
pub struct Declaration {
    pub specifiers: DeclarationSpecifiers,
    pub declarators: Vec<Declarator>,
    pub location: SourceLocation,
}

/// A parsed translation unit: external declarations in source order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
