// Integration tests for struct/union and enum resolution

use std::rc::Rc;

use cfront::parser::parse::Parser;
use cfront::semantics::declarations::{resolve_program, ResolvedDecl};
use cfront::semantics::env::{Env, EntryKind};
use cfront::semantics::errors::SemanticError;
use cfront::semantics::types::{CTypeKind, StructOrUnionType};

fn resolve(source: &str) -> (Env, Vec<ResolvedDecl>) {
    resolve_from(source, Env::new()).expect("Resolution failed")
}

fn resolve_from(source: &str, env: Env) -> Result<(Env, Vec<ResolvedDecl>), SemanticError> {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");
    resolve_program(&program, env)
}

fn struct_cell(env: &Env, key: &str) -> Rc<StructOrUnionType> {
    match &env.find(key).expect("tag not registered").ty.kind {
        CTypeKind::StructOrUnion(cell) => Rc::clone(cell),
        other => panic!("'{}' is not a struct/union type: {:?}", key, other),
    }
}

#[test]
fn test_self_referential_struct() {
    let (env, _) = resolve("struct Node { struct Node *next; long val; };");

    let cell = struct_cell(&env, "struct Node");
    assert!(cell.is_complete());

    let members = cell.members();
    let members = members.as_ref().unwrap();
    assert_eq!(members.len(), 2);

    // next is a pointer back at the very same type identity
    assert_eq!(members[0].name, "next");
    match &members[0].ty.kind {
        CTypeKind::Pointer(inner) => match &inner.kind {
            CTypeKind::StructOrUnion(pointee) => assert!(Rc::ptr_eq(pointee, &cell)),
            other => panic!("Expected pointer to struct Node, got {:?}", other),
        },
        other => panic!("Expected pointer member, got {:?}", other),
    }

    assert_eq!(members[1].name, "val");
    assert_eq!(members[1].ty.kind, CTypeKind::Long);
}

#[test]
fn test_struct_redefinition_rejected() {
    let (env, _) = resolve("struct Node { struct Node *next; long val; };");

    let err = resolve_from("struct Node { long x; };", env).unwrap_err();
    assert!(matches!(err, SemanticError::Redefinition { name } if name == "struct Node"));
}

#[test]
fn test_completion_is_visible_from_earlier_snapshot() {
    // Forward-declare, snapshot the environment, then define
    let (env_before, resolved) = resolve("struct S *p;");

    let snapshot = env_before.clone();
    let cell = struct_cell(&snapshot, "struct S");
    assert!(!cell.is_complete());

    let (_env_after, _) = resolve_from("struct S { long x; };", env_before).unwrap();

    // The snapshot taken before the definition observes the completion
    let cell = struct_cell(&snapshot, "struct S");
    assert!(cell.is_complete());
    let members = cell.members();
    let members = members.as_ref().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "x");
    assert_eq!(members[0].ty.kind, CTypeKind::Long);

    // ...and so does the pointer declared before the definition
    match &resolved[0].ty.kind {
        CTypeKind::Pointer(inner) => match &inner.kind {
            CTypeKind::StructOrUnion(pointee) => assert!(pointee.is_complete()),
            other => panic!("Expected pointer to struct S, got {:?}", other),
        },
        other => panic!("Expected pointer, got {:?}", other),
    }
}

#[test]
fn test_pointer_to_opaque_struct() {
    let (env, resolved) = resolve("struct Opaque *handle;");

    match &resolved[0].ty.kind {
        CTypeKind::Pointer(inner) => match &inner.kind {
            CTypeKind::StructOrUnion(cell) => assert!(!cell.is_complete()),
            other => panic!("Expected struct pointee, got {:?}", other),
        },
        other => panic!("Expected pointer, got {:?}", other),
    }
    assert!(env.find("struct Opaque").is_some());
}

#[test]
fn test_union_definition() {
    let (env, resolved) = resolve("union Value { long l; double d; } v;");

    let cell = struct_cell(&env, "union Value");
    assert!(cell.is_complete());
    assert_eq!(cell.members().as_ref().unwrap().len(), 2);

    assert_eq!(resolved[0].name, "v");
    match &resolved[0].ty.kind {
        CTypeKind::StructOrUnion(c) => assert!(Rc::ptr_eq(c, &cell)),
        other => panic!("Expected union type, got {:?}", other),
    }
}

#[test]
fn test_anonymous_struct() {
    let (env, resolved) = resolve("struct { long x; long y; } point;");

    match &resolved[0].ty.kind {
        CTypeKind::StructOrUnion(cell) => {
            assert!(cell.is_complete());
            assert_eq!(cell.members().as_ref().unwrap().len(), 2);
        }
        other => panic!("Expected struct type, got {:?}", other),
    }
    // Anonymity means no lookup key
    assert!(env.find("struct <anonymous>").is_none());
}

#[test]
fn test_typedef_of_struct() {
    let (env, resolved) = resolve(
        r#"
        typedef struct Node { struct Node *next; } Node;
        Node *head;
        "#,
    );

    let cell = struct_cell(&env, "struct Node");
    let head = resolved.last().unwrap();
    match &head.ty.kind {
        CTypeKind::Pointer(inner) => match &inner.kind {
            CTypeKind::StructOrUnion(pointee) => assert!(Rc::ptr_eq(pointee, &cell)),
            other => panic!("Expected struct pointee, got {:?}", other),
        },
        other => panic!("Expected pointer, got {:?}", other),
    }
}

#[test]
fn test_enum_values() {
    let (env, _) = resolve("enum Color { RED, GREEN = 5, BLUE };");

    let red = env.find("RED").expect("RED not registered");
    assert_eq!(red.kind, EntryKind::EnumConstant);
    assert_eq!(red.value, Some(0));
    assert_eq!(env.find("GREEN").unwrap().value, Some(5));
    assert_eq!(env.find("BLUE").unwrap().value, Some(6));

    assert_eq!(env.find("enum Color").unwrap().kind, EntryKind::Typedef);
}

#[test]
fn test_enum_negative_values() {
    let (env, _) = resolve("enum Offset { BACK = -3, HERE };");

    assert_eq!(env.find("BACK").unwrap().value, Some(-3));
    assert_eq!(env.find("HERE").unwrap().value, Some(-2));
}

#[test]
fn test_enum_mention_after_definition() {
    let (_, resolved) = resolve("enum Color { RED, GREEN }; enum Color c;");

    let c = resolved.last().unwrap();
    assert_eq!(c.name, "c");
    // Enum types are the wide integer
    assert_eq!(c.ty.kind, CTypeKind::Long);
}

#[test]
fn test_enum_mention_without_definition() {
    let err = resolve_from("enum Missing m;", Env::new()).unwrap_err();
    assert!(matches!(err, SemanticError::UndefinedType { name } if name == "enum Missing"));
}

#[test]
fn test_member_resolution_threads_environment() {
    // Definitions inside a member list escape to the enclosing scope
    let (env, _) = resolve(
        r#"
        struct Widget {
            enum State { IDLE, BUSY } state;
            struct Point { long x; long y; } origin;
            long id;
        };
        "#,
    );

    assert_eq!(env.find("IDLE").unwrap().value, Some(0));
    assert_eq!(env.find("BUSY").unwrap().value, Some(1));
    assert!(struct_cell(&env, "struct Point").is_complete());
    assert!(struct_cell(&env, "struct Widget").is_complete());

    let widget = struct_cell(&env, "struct Widget");
    let members = widget.members();
    let members = members.as_ref().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].ty.kind, CTypeKind::Long); // enum member
}

#[test]
fn test_mutually_referential_structs() {
    let (env, _) = resolve(
        r#"
        struct B;
        struct A { struct B *peer; };
        struct B { struct A *peer; };
        "#,
    );

    let a = struct_cell(&env, "struct A");
    let b = struct_cell(&env, "struct B");
    assert!(a.is_complete());
    assert!(b.is_complete());

    let a_members = a.members();
    match &a_members.as_ref().unwrap()[0].ty.kind {
        CTypeKind::Pointer(inner) => match &inner.kind {
            CTypeKind::StructOrUnion(pointee) => assert!(Rc::ptr_eq(pointee, &b)),
            other => panic!("Expected struct B pointee, got {:?}", other),
        },
        other => panic!("Expected pointer, got {:?}", other),
    }
}
