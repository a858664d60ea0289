//! # Introduction
//!
//! cfront is the declaration front end of a C compiler: it parses external
//! declarations and resolves their specifier lists into canonical, typed
//! descriptors against a scoped symbol environment.
//!
//! ## Resolution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Specifier lists → Resolver → (Env, types)
//! ```
//!
//! 1. [`parser`] tokenises the source and builds declaration parse trees:
//!    storage classes, type specifiers (basic keywords, struct/union/enum
//!    specifiers, typedef-names), qualifiers, and declarators.
//! 2. [`semantics`] classifies basic-keyword sets through a fixed
//!    combination table, resolves struct/union/enum/typedef specifiers
//!    against the environment, and threads the environment declaration by
//!    declaration through the translation unit.
//!
//! ## Supported C subset
//!
//! External declarations only: all basic type-specifier keywords,
//! `struct`/`union`/`enum` specifiers (named or anonymous, complete or
//! forward-declared), typedef-names, `const`/`volatile`, the storage classes
//! `typedef static extern auto register`, and pointer declarators.
//! Statements, expressions, initializers, and the preprocessor belong to the
//! enclosing compiler.

pub mod parser;
pub mod semantics;
