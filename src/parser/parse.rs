//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following
//! organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing declaration specifiers, declarators, and
//!   struct/union/enum bodies
//!
//! # Typedef names
//!
//! C grammar is not context-free: whether an identifier is a typedef-name
//! depends on earlier declarations. The parser keeps a set of names it has
//! seen declared with `typedef` and consults it when deciding whether a bare
//! identifier starts a type specifier.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use rustc_hash::FxHashSet;
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for external C declarations
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,

    /// Names introduced by `typedef` declarations parsed so far.
    pub(crate) typedef_names: FxHashSet<String>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            typedef_names: FxHashSet::default(),
        })
    }

    /// Parse the entire translation unit (a sequence of declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let decl = self.parse_declaration()?;
            program.declarations.push(decl);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    /// True when `name` has been declared as a typedef earlier in the input.
    pub(crate) fn is_typedef_name(&self, name: &str) -> bool {
        self.typedef_names.contains(name)
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.peek_token()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_declaration() {
        let source = "static unsigned long counter;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.declarations.len(), 1);
        let decl = &program.declarations[0];
        assert_eq!(
            decl.specifiers.storage_classes,
            vec![StorageClassSpec::Static]
        );
        assert_eq!(decl.specifiers.specifiers.type_specifiers.len(), 2);
        assert_eq!(decl.declarators.len(), 1);
        assert_eq!(decl.declarators[0].name, "counter");
        assert_eq!(decl.declarators[0].pointer_depth, 0);
    }

    #[test]
    fn test_parse_multiple_declarators() {
        let source = "long x, *p, **pp;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        let decl = &program.declarations[0];
        assert_eq!(decl.declarators.len(), 3);
        assert_eq!(decl.declarators[0].pointer_depth, 0);
        assert_eq!(decl.declarators[1].pointer_depth, 1);
        assert_eq!(decl.declarators[2].pointer_depth, 2);
    }

    #[test]
    fn test_typedef_name_recognition() {
        let source = "typedef unsigned long size; size n;";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.declarations.len(), 2);
        let second = &program.declarations[1];
        match &second.specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::TypedefName(name) => assert_eq!(name, "size"),
            other => panic!("Expected typedef-name specifier, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_identifier_is_not_a_type() {
        // "size" was never typedef'd, so this cannot parse as a declaration
        let source = "size n;";
        let mut parser = Parser::new(source).unwrap();
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_parse_struct_definition() {
        let source = "struct Point { long x; long y; };";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.declarations.len(), 1);
        let decl = &program.declarations[0];
        assert!(decl.declarators.is_empty());
        match &decl.specifiers.specifiers.type_specifiers[0] {
            TypeSpecifier::StructOrUnion { tag, name, members } => {
                assert_eq!(*tag, AggregateTag::Struct);
                assert_eq!(name.as_deref(), Some("Point"));
                assert_eq!(members.as_ref().unwrap().len(), 2);
            }
            other => panic!("Expected struct specifier, got {:?}", other),
        }
    }
}
