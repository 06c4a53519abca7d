//! Statement parsing implementation
//!
//! This module handles `Block` and every statement form:
//!
//! - Declarations: `local` variables, `function` and `local function`
//! - Control flow: `do`, `while`, `if`/`elseif`/`else`, numeric `for`
//! - Jump statements: `return`, `break`
//! - Assignment: `a, b[i] = 1, 2`
//!
//! # Grammar
//!
//! ```text
//! Block        ::= (Stmt ';'?)*
//! Stmt         ::= 'local' (FunctionDecl | VarList '=' ExpList)
//!                | FunctionDecl
//!                | 'do' Block 'end'
//!                | 'while' Exp 'do' Block 'end'
//!                | 'if' Exp 'then' Block ElseIfBlocks ('else' Block)? 'end'
//!                | 'for' Name '=' Exp ',' Exp (',' Exp)? 'do' Block 'end'
//!                | 'return' ExpList?
//!                | 'break'
//!                | VarList '=' ExpList
//! ElseIfBlocks ::= ('elseif' Exp 'then' Block)*
//! FunctionDecl ::= 'function' Name ('(' Names? ')')? Block 'end'
//! Names        ::= Name (',' Name)*
//! ```
//!
//! `Block` is also where errors are caught: each failed statement goes
//! through [`Parser::recover`](crate::parser::parse::Parser) before the loop
//! moves on.

use crate::parser::parse::{Parser, SyntaxError};
use crate::parser::token::TokenKind;
use log::debug;

impl Parser<'_> {
    /// Parse a block, stopping before `end`, `else`, `elseif` or end of input
    pub(crate) fn block(&mut self) -> Result<(), SyntaxError> {
        self.nested(Self::block_statements)
    }

    fn block_statements(&mut self) -> Result<(), SyntaxError> {
        while !self.at_block_end() {
            let open_before = self.open_blocks;
            let headers_before = self.open_headers;

            if let Err(err) = self.statement() {
                let unclosed = self.open_blocks.saturating_sub(open_before);
                let headers = self.open_headers.saturating_sub(headers_before);
                self.open_blocks = open_before;
                self.open_headers = headers_before;
                self.recover(err, unclosed, headers)?;
            }

            if let Err(err) = self.accept(TokenKind::Semicolon) {
                self.recover(err, 0, 0)?;
            }
        }

        Ok(())
    }

    /// Parse a statement
    pub(crate) fn statement(&mut self) -> Result<(), SyntaxError> {
        debug!(
            "Entering statement at {}: {}",
            self.current.location, self.current
        );

        match self.current.kind {
            TokenKind::Local => {
                self.bump()?;
                if self.check(TokenKind::Function) {
                    self.function_declaration()
                } else {
                    self.assignment()
                }
            }
            TokenKind::Function => self.function_declaration(),
            TokenKind::Do => {
                self.open_block()?;
                self.block()?;
                self.close_block()
            }
            TokenKind::While => self.while_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break => self.bump(),
            _ => self.assignment(),
        }
    }

    /// `VarList '=' ExpList`
    fn assignment(&mut self) -> Result<(), SyntaxError> {
        self.var_list()?;
        self.expect(TokenKind::Assign)?;
        self.exp_list()
    }

    /// Parse while statement
    fn while_statement(&mut self) -> Result<(), SyntaxError> {
        self.open_header();
        self.open_block()?;
        self.exp()?;
        self.close_header()?;
        self.block()?;
        self.close_block()
    }

    /// Parse if statement
    fn if_statement(&mut self) -> Result<(), SyntaxError> {
        self.open_block()?;
        self.exp()?;
        self.expect(TokenKind::Then)?;
        self.block()?;
        self.else_if_blocks()?;

        if self.accept(TokenKind::Else)? {
            self.block()?;
        }

        self.close_block()
    }

    fn else_if_blocks(&mut self) -> Result<(), SyntaxError> {
        while self.accept(TokenKind::ElseIf)? {
            self.exp()?;
            self.expect(TokenKind::Then)?;
            self.block()?;
        }
        Ok(())
    }

    /// Parse numeric for statement
    fn for_statement(&mut self) -> Result<(), SyntaxError> {
        self.open_header();
        self.open_block()?;
        self.expect(TokenKind::Name)?;
        self.expect(TokenKind::Assign)?;
        self.exp()?;
        self.expect(TokenKind::Comma)?;
        self.exp()?;

        if self.accept(TokenKind::Comma)? {
            self.exp()?;
        }

        self.close_header()?;
        self.block()?;
        self.close_block()
    }

    /// Parse return statement
    fn return_statement(&mut self) -> Result<(), SyntaxError> {
        self.bump()?;

        if self.at_block_end() || self.check(TokenKind::Semicolon) {
            return Ok(());
        }

        self.exp_list()
    }

    /// `'function' Name ('(' Names? ')')? Block 'end'`
    pub(crate) fn function_declaration(&mut self) -> Result<(), SyntaxError> {
        self.open_block()?;
        self.expect(TokenKind::Name)?;

        if self.accept(TokenKind::LParen)? {
            if self.check(TokenKind::Name) {
                self.names()?;
            }
            self.expect(TokenKind::RParen)?;
        }

        self.block()?;
        self.close_block()
    }

    /// `Name (',' Name)*`
    fn names(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Name)?;
        while self.accept(TokenKind::Comma)? {
            self.expect(TokenKind::Name)?;
        }
        Ok(())
    }

    /// Consume the keyword that opens a construct closed by `end`.
    fn open_block(&mut self) -> Result<(), SyntaxError> {
        self.open_blocks += 1;
        self.bump()
    }

    fn open_header(&mut self) {
        self.open_headers += 1;
    }

    /// The `do` ending a `while` or `for` header.
    fn close_header(&mut self) -> Result<(), SyntaxError> {
        if !self.check(TokenKind::Do) {
            return Err(self.unexpected(TokenKind::Do));
        }
        self.open_headers -= 1;
        self.bump()
    }

    fn close_block(&mut self) -> Result<(), SyntaxError> {
        if !self.check(TokenKind::End) {
            return Err(self.unexpected(TokenKind::End));
        }
        self.open_blocks -= 1;
        self.bump()
    }
}
