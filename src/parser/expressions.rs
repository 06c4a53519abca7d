//! Expression parsing implementation
//!
//! ```text
//! ExpList   ::= Exp (',' Exp)*
//! Exp       ::= ('not' | '-') Exp
//!             | (Number | String | PrefixExp) (BinOp Exp)?
//! PrefixExp ::= '(' Exp ')' | Var
//! VarList   ::= Var (',' Var)*
//! Var       ::= Name ('[' Exp ']')*
//! BinOp     ::= 'or' | 'and' | '<' | '>' | '<=' | '>=' | '~=' | '=='
//!             | '..' | '+' | '-' | '*' | '/' | '^'
//! ```
//!
//! # Precedence
//!
//! There is none. All binary operators share one right-recursive chain, so
//! `a or b + c` and `a + b or c` are both accepted as a flat operand/operator
//! sequence. The chain is walked with a loop rather than recursion: `Exp`
//! expands to `(unary* operand) (BinOp unary* operand)*` either way, and the
//! loop keeps long operator chains from counting against the nesting limit.
//! Only parentheses and index brackets nest.

use crate::parser::parse::{Parser, SyntaxError};
use crate::parser::token::TokenKind;

impl Parser<'_> {
    /// `Exp (',' Exp)*`
    pub(crate) fn exp_list(&mut self) -> Result<(), SyntaxError> {
        self.exp()?;
        while self.accept(TokenKind::Comma)? {
            self.exp()?;
        }
        Ok(())
    }

    /// Parse expression (top-level entry point)
    pub(crate) fn exp(&mut self) -> Result<(), SyntaxError> {
        self.nested(|parser| {
            parser.operand()?;
            while parser.current.kind.is_binary_operator() {
                parser.bin_op()?;
                parser.operand()?;
            }
            Ok(())
        })
    }

    /// A single operand with its unary prefixes
    fn operand(&mut self) -> Result<(), SyntaxError> {
        while matches!(self.current.kind, TokenKind::Not | TokenKind::Minus) {
            self.bump()?;
        }

        match self.current.kind {
            TokenKind::Number | TokenKind::String => self.bump(),
            _ => self.prefix_exp(),
        }
    }

    fn bin_op(&mut self) -> Result<(), SyntaxError> {
        debug_assert!(self.current.kind.is_binary_operator());
        self.bump()
    }

    /// `'(' Exp ')' | Var`
    fn prefix_exp(&mut self) -> Result<(), SyntaxError> {
        if self.accept(TokenKind::LParen)? {
            self.exp()?;
            self.expect(TokenKind::RParen)?;
            Ok(())
        } else {
            self.var()
        }
    }

    /// `Var (',' Var)*`
    pub(crate) fn var_list(&mut self) -> Result<(), SyntaxError> {
        self.var()?;
        while self.accept(TokenKind::Comma)? {
            self.var()?;
        }
        Ok(())
    }

    /// `Name ('[' Exp ']')*`
    fn var(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Name)?;
        while self.accept(TokenKind::LBracket)? {
            self.exp()?;
            self.expect(TokenKind::RBracket)?;
        }
        Ok(())
    }
}
