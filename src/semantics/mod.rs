//! Semantic resolution for C declarations
//!
//! This module turns parsed specifier lists into canonical types while
//! threading a scoped symbol environment through the translation unit:
//! - [`types`]: Canonical type descriptors ([`types::CType`]) and the shared
//!   struct/union identity cell
//! - [`env`]: Persistent name → binding environment
//! - [`specifiers`]: Basic-keyword classification, typedef resolution, and
//!   declaration-specifier aggregation
//! - [`aggregates`]: Struct/union and enum resolution, including the
//!   incomplete-then-complete protocol for self-referential types
//! - [`declarations`]: Whole-declaration driver and translation-unit
//!   threading
//! - [`errors`]: Semantic error types
//!
//! # Resolution Model
//!
//! Resolution is a pure walk over parse-tree values. Every function that can
//! introduce or require a binding takes an [`env::Env`] and returns the
//! (possibly extended) environment alongside its result; there is no global
//! symbol table. Failures are typed [`errors::SemanticError`] values and
//! abort the declaration being resolved.

pub mod aggregates;
pub mod declarations;
pub mod env;
pub mod errors;
pub mod specifiers;
pub mod types;
