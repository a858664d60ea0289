//! C declaration parser
//!
//! This module transforms C declaration source text into a parse tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → declarations)
//! - [`ast`]: Parse-tree node definitions
//!
//! # Supported C Subset
//!
//! The parser supports external declarations only:
//! - Specifiers: all basic type keywords, `struct`/`union`/`enum` specifiers,
//!   typedef-names, `const`/`volatile`, and the storage classes
//!   `typedef static extern auto register`
//! - Declarators: pointer indirection plus a name (`long **pp;`)
//! - No statements, expressions, initializers, or function bodies
//! - No preprocessor (directives are skipped)
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser. Typedef-name recognition is
//! handled with a name set maintained while parsing, since C's grammar makes
//! `identifier` ambiguous between a typedef-name and a declarator name.

pub mod ast;
pub mod declarations;
pub mod lexer;
pub mod parse;
