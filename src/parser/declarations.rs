//! Declaration parsing implementation
//!
//! This module handles parsing of external declarations:
//!
//! - Declaration specifiers: storage classes, type specifiers, qualifiers
//! - Struct/union specifiers: `struct Name`, `struct Name { ... }`, `struct { ... }`
//! - Enum specifiers: `enum Name`, `enum Name { A, B = 5 }`
//! - Declarators: `'*'* identifier`
//!
//! # Grammar
//!
//! ```text
//! declaration        ::= declaration-specifiers init-declarator-list? ';'
//! init-declarator-list ::= declarator (',' declarator)*
//! declarator         ::= '*'* identifier
//! struct-declaration ::= specifier-qualifier-list declarator (',' declarator)* ';'
//! enumerator         ::= identifier ('=' '-'? int-literal)?
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one external declaration, ending at ';'.
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let loc = self.current_location();

        let specifiers = self.parse_declaration_specifiers()?;

        let mut declarators = Vec::new();
        if !self.check(&Token::Semicolon(self.current_location())) {
            loop {
                declarators.push(self.parse_declarator()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_semicolon("after declaration")?;

        // A completed typedef makes its names visible to later declarations.
        if specifiers
            .storage_classes
            .contains(&StorageClassSpec::Typedef)
        {
            for d in &declarators {
                self.typedef_names.insert(d.name.clone());
            }
        }

        Ok(Declaration {
            specifiers,
            declarators,
            location: loc,
        })
    }

    /// Parse declaration-specifiers: one or more storage-class specifiers,
    /// type specifiers, and type qualifiers, in any order.
    pub(crate) fn parse_declaration_specifiers(
        &mut self,
    ) -> Result<DeclarationSpecifiers, ParseError> {
        let mut specs = DeclarationSpecifiers::new();

        loop {
            if let Some(storage) = self.match_storage_class() {
                specs.storage_classes.push(storage);
            } else if let Some(qual) = self.match_type_qualifier() {
                specs.specifiers.qualifiers.push(qual);
            } else if self.starts_type_specifier(&specs.specifiers) {
                let spec = self.parse_type_specifier()?;
                specs.specifiers.type_specifiers.push(spec);
            } else {
                break;
            }
        }

        if specs.storage_classes.is_empty()
            && specs.specifiers.type_specifiers.is_empty()
            && specs.specifiers.qualifiers.is_empty()
        {
            return Err(ParseError {
                message: format!("Expected declaration specifiers, found {}", self.peek()),
                location: self.current_location(),
            });
        }

        Ok(specs)
    }

    /// Parse a specifier-qualifier list (the member-declaration base: no
    /// storage classes allowed).
    pub(crate) fn parse_specifier_qualifier_list(
        &mut self,
    ) -> Result<SpecifierQualifierList, ParseError> {
        let mut list = SpecifierQualifierList::new();

        loop {
            if let Some(qual) = self.match_type_qualifier() {
                list.qualifiers.push(qual);
            } else if self.starts_type_specifier(&list) {
                let spec = self.parse_type_specifier()?;
                list.type_specifiers.push(spec);
            } else {
                break;
            }
        }

        if list.type_specifiers.is_empty() && list.qualifiers.is_empty() {
            return Err(ParseError {
                message: format!("Expected type specifiers, found {}", self.peek()),
                location: self.current_location(),
            });
        }

        Ok(list)
    }

    /// Consume a storage-class keyword if one is next.
    fn match_storage_class(&mut self) -> Option<StorageClassSpec> {
        let storage = match self.peek_token() {
            Token::Auto(_) => StorageClassSpec::Auto,
            Token::Register(_) => StorageClassSpec::Register,
            Token::Static(_) => StorageClassSpec::Static,
            Token::Extern(_) => StorageClassSpec::Extern,
            Token::Typedef(_) => StorageClassSpec::Typedef,
            _ => return None,
        };
        self.advance();
        Some(storage)
    }

    /// Consume a type-qualifier keyword if one is next.
    fn match_type_qualifier(&mut self) -> Option<TypeQualifier> {
        let qual = match self.peek_token() {
            Token::Const(_) => TypeQualifier::Const,
            Token::Volatile(_) => TypeQualifier::Volatile,
            _ => return None,
        };
        self.advance();
        Some(qual)
    }

    /// Does the next token begin a type specifier, given the specifiers
    /// collected so far?
    ///
    /// A bare identifier only counts when it names a known typedef and no
    /// other type specifier has been seen yet (`size n;` after
    /// `typedef long size;`, but not the `n` in `size n;`).
    fn starts_type_specifier(&self, list: &SpecifierQualifierList) -> bool {
        match self.peek_token() {
            Token::Void(_)
            | Token::Char(_)
            | Token::Short(_)
            | Token::Int(_)
            | Token::Long(_)
            | Token::Float(_)
            | Token::Double(_)
            | Token::Signed(_)
            | Token::Unsigned(_)
            | Token::Struct(_)
            | Token::Union(_)
            | Token::Enum(_) => true,
            Token::Ident(name, _) => {
                list.type_specifiers.is_empty() && self.is_typedef_name(&name)
            }
            _ => false,
        }
    }

    /// Parse one type specifier (basic keyword, struct/union specifier,
    /// enum specifier, or typedef-name).
    fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, ParseError> {
        let basic = match self.peek_token() {
            Token::Void(_) => Some(BasicTypeSpec::Void),
            Token::Char(_) => Some(BasicTypeSpec::Char),
            Token::Short(_) => Some(BasicTypeSpec::Short),
            Token::Int(_) => Some(BasicTypeSpec::Int),
            Token::Long(_) => Some(BasicTypeSpec::Long),
            Token::Float(_) => Some(BasicTypeSpec::Float),
            Token::Double(_) => Some(BasicTypeSpec::Double),
            Token::Signed(_) => Some(BasicTypeSpec::Signed),
            Token::Unsigned(_) => Some(BasicTypeSpec::Unsigned),
            _ => None,
        };
        if let Some(kind) = basic {
            self.advance();
            return Ok(TypeSpecifier::Basic(kind));
        }

        match self.peek_token() {
            Token::Struct(_) => {
                self.advance();
                self.parse_struct_or_union_specifier(AggregateTag::Struct)
            }
            Token::Union(_) => {
                self.advance();
                self.parse_struct_or_union_specifier(AggregateTag::Union)
            }
            Token::Enum(_) => {
                self.advance();
                self.parse_enum_specifier()
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(TypeSpecifier::TypedefName(name))
            }
            other => Err(ParseError {
                message: format!("Expected type specifier, found {}", other),
                location: self.current_location(),
            }),
        }
    }

    /// Parse a struct-or-union-specifier (the keyword itself is already
    /// consumed): `Name`, `Name { members }`, or `{ members }`.
    fn parse_struct_or_union_specifier(
        &mut self,
        tag: AggregateTag,
    ) -> Result<TypeSpecifier, ParseError> {
        let name = if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Some(name)
        } else {
            None
        };

        let members = if self.check(&Token::LBrace(self.current_location())) {
            Some(self.parse_member_list(tag)?)
        } else {
            None
        };

        if name.is_none() && members.is_none() {
            return Err(ParseError {
                message: format!("Expected tag name or '{{' after '{}'", tag),
                location: self.current_location(),
            });
        }

        Ok(TypeSpecifier::StructOrUnion { tag, name, members })
    }

    /// Parse '{' struct-declaration* '}'.
    fn parse_member_list(&mut self, tag: AggregateTag) -> Result<Vec<MemberDeclaration>, ParseError> {
        self.expect_lbrace(&format!("to open {} body", tag))?;

        let mut members = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            let specifiers = self.parse_specifier_qualifier_list()?;

            let mut declarators = Vec::new();
            loop {
                declarators.push(self.parse_declarator()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
            self.expect_semicolon("after member declaration")?;

            members.push(MemberDeclaration {
                specifiers,
                declarators,
            });
        }

        self.expect_rbrace(&format!("to close {} body", tag))?;
        Ok(members)
    }

    /// Parse an enum-specifier (the `enum` keyword is already consumed):
    /// `Name`, `Name { enumerators }`, or `{ enumerators }`.
    fn parse_enum_specifier(&mut self) -> Result<TypeSpecifier, ParseError> {
        let name = if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Some(name)
        } else {
            None
        };

        let enumerators = if self.check(&Token::LBrace(self.current_location())) {
            self.expect_lbrace("to open enum body")?;

            let mut enumerators = Vec::new();
            loop {
                enumerators.push(self.parse_enumerator()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }

            self.expect_rbrace("to close enum body")?;
            Some(enumerators)
        } else {
            None
        };

        if name.is_none() && enumerators.is_none() {
            return Err(ParseError {
                message: "Expected tag name or '{' after 'enum'".to_string(),
                location: self.current_location(),
            });
        }

        Ok(TypeSpecifier::Enum { name, enumerators })
    }

    /// Parse one enumerator: `identifier ('=' '-'? int-literal)?`.
    ///
    /// General constant expressions are not evaluated here; a literal
    /// (optionally negated) is as far as this front end goes.
    fn parse_enumerator(&mut self) -> Result<Enumerator, ParseError> {
        let name = self.expect_identifier()?;

        let value = if self.match_token(&Token::Eq(self.current_location())) {
            let negative = self.match_token(&Token::Minus(self.current_location()));
            if let Token::IntLiteral(n, _) = self.peek_token() {
                self.advance();
                Some(if negative { -n } else { n })
            } else {
                return Err(ParseError {
                    message: format!("Expected enumerator value, found {}", self.peek()),
                    location: self.current_location(),
                });
            }
        } else {
            None
        };

        Ok(Enumerator { name, value })
    }

    /// Parse a declarator: `'*'* identifier`.
    pub(crate) fn parse_declarator(&mut self) -> Result<Declarator, ParseError> {
        let mut pointer_depth = 0;
        while self.match_token(&Token::Star(self.current_location())) {
            pointer_depth += 1;
        }

        let name = self.expect_identifier()?;

        Ok(Declarator {
            pointer_depth,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anonymous_union_member() {
        let source = "union { long l; double d; } blob;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        let decl = &program.declarations[0];
        match &decl.specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::StructOrUnion { tag, name, members } => {
                assert_eq!(*tag, AggregateTag::Union);
                assert!(name.is_none());
                assert_eq!(members.as_ref().unwrap().len(), 2);
            }
            other => panic!("Expected union specifier, got {:?}", other),
        }
        assert_eq!(decl.declarators[0].name, "blob");
    }

    #[test]
    fn test_parse_enum_with_values() {
        let source = "enum Color { RED, GREEN = 5, BLUE };";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        match &program.declarations[0].specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::Enum { name, enumerators } => {
                assert_eq!(name.as_deref(), Some("Color"));
                let enumerators = enumerators.as_ref().unwrap();
                assert_eq!(enumerators[0], Enumerator { name: "RED".into(), value: None });
                assert_eq!(enumerators[1], Enumerator { name: "GREEN".into(), value: Some(5) });
                assert_eq!(enumerators[2], Enumerator { name: "BLUE".into(), value: None });
            }
            other => panic!("Expected enum specifier, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_self_referential_struct() {
        let source = "struct Node { struct Node *next; long val; };";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        match &program.declarations[0].specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::StructOrUnion { members, .. } => {
                let members = members.as_ref().unwrap();
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].declarators[0].pointer_depth, 1);
                assert_eq!(members[0].declarators[0].name, "next");
            }
            other => panic!("Expected struct specifier, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_forward_declaration() {
        let source = "struct List;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        let decl = &program.declarations[0];
        assert!(decl.declarators.is_empty());
        match &decl.specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::StructOrUnion { name, members, .. } => {
                assert_eq!(name.as_deref(), Some("List"));
                assert!(members.is_none());
            }
            other => panic!("Expected struct specifier, got {:?}", other),
        }
    }

    #[test]
    fn test_specifier_order_is_free() {
        // Qualifiers and storage classes may appear anywhere in the list
        let source = "long const static x; static const long y;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.declarations.len(), 2);
        for decl in &program.declarations {
            assert_eq!(decl.specifiers.storage_classes, vec![StorageClassSpec::Static]);
            assert_eq!(decl.specifiers.specifiers.qualifiers, vec![TypeQualifier::Const]);
        }
    }

    #[test]
    fn test_bare_mention_then_definition_parses() {
        let source = "struct Pair *p; struct Pair { long a; long b; };";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();
        assert_eq!(program.declarations.len(), 2);
    }
}
