//! Declaration resolution driver
//!
//! Ties the pieces together for whole declarations: resolve the declaration
//! specifiers, apply each declarator's pointer indirection to the base type,
//! and register typedef names. [`resolve_program`] threads one environment
//! value through a translation unit in source order, so later declarations see
//! the bindings earlier ones introduced, and nothing else does.

use crate::parser::ast::{Declaration, Declarator, Program};
use crate::semantics::env::{Env, EntryKind};
use crate::semantics::errors::SemanticError;
use crate::semantics::specifiers::StorageClass;
use crate::semantics::types::CType;

/// One declared name with its resolved storage class and type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDecl {
    pub name: String,
    pub storage: StorageClass,
    pub ty: CType,
}

fn apply_declarator(base: &CType, declarator: &Declarator) -> CType {
    let mut ty = base.clone();
    for _ in 0..declarator.pointer_depth {
        ty = ty.pointer_to();
    }
    ty
}

impl Declaration {
    /// Resolve this declaration against `env`, producing the environment for
    /// the next declaration plus one record per declared name. Tag-only
    /// declarations (`struct Node;`) produce no records but may still extend
    /// the environment.
    pub fn resolve(&self, env: Env) -> Result<(Env, Vec<ResolvedDecl>), SemanticError> {
        let (mut env, storage, base) = self.specifiers.resolve(env)?;

        let mut resolved = Vec::with_capacity(self.declarators.len());
        for declarator in &self.declarators {
            let ty = apply_declarator(&base, declarator);

            if storage == StorageClass::Typedef {
                env = env.push_entry(EntryKind::Typedef, declarator.name.clone(), ty.clone());
            }

            resolved.push(ResolvedDecl {
                name: declarator.name.clone(),
                storage,
                ty,
            });
        }

        Ok((env, resolved))
    }
}

/// Resolve a whole translation unit in source order, starting from `env`.
pub fn resolve_program(
    program: &Program,
    env: Env,
) -> Result<(Env, Vec<ResolvedDecl>), SemanticError> {
    let mut env = env;
    let mut all = Vec::new();

    for declaration in &program.declarations {
        let (next_env, mut resolved) = declaration.resolve(env)?;
        env = next_env;
        all.append(&mut resolved);
    }

    Ok((env, all))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use crate::semantics::types::CTypeKind;

    fn resolve_source(source: &str) -> Result<(Env, Vec<ResolvedDecl>), SemanticError> {
        let mut parser = Parser::new(source).expect("lexing failed");
        let program = parser.parse_program().expect("parsing failed");
        resolve_program(&program, Env::new())
    }

    #[test]
    fn test_typedef_then_use() {
        let (env, resolved) = resolve_source("typedef unsigned long size; size n;").unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].storage, StorageClass::Typedef);
        assert_eq!(resolved[1].storage, StorageClass::Auto);
        assert_eq!(resolved[1].ty.kind, CTypeKind::ULong);
        assert_eq!(env.find("size").unwrap().kind, EntryKind::Typedef);
    }

    #[test]
    fn test_pointer_declarators() {
        let (_, resolved) = resolve_source("long x, *p;").unwrap();

        assert_eq!(resolved[0].ty.kind, CTypeKind::Long);
        match &resolved[1].ty.kind {
            CTypeKind::Pointer(inner) => assert_eq!(inner.kind, CTypeKind::Long),
            other => panic!("Expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_only_declaration_extends_env() {
        let (env, resolved) = resolve_source("struct List;").unwrap();

        assert!(resolved.is_empty());
        assert!(env.find("struct List").is_some());
    }

    #[test]
    fn test_enum_constant_is_not_a_typedef() {
        use crate::parser::ast::{SpecifierQualifierList, TypeSpecifier};

        let (env, _) = resolve_source("enum Color { RED };").unwrap();

        // "RED" is bound, but as an enum constant, so it cannot name a type
        let list = SpecifierQualifierList {
            type_specifiers: vec![TypeSpecifier::TypedefName("RED".to_string())],
            qualifiers: Vec::new(),
        };
        let err = list.resolve_type(env).unwrap_err();
        assert!(matches!(err, SemanticError::NotATypedef { name } if name == "RED"));
    }
}
