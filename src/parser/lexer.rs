//! Lexer (tokenizer) for Lua Simples source code
//!
//! Pulls one classified [`Token`] at a time out of a borrowed byte buffer.
//! The parser drives it through [`Lexer::next_token`]; nothing is buffered
//! beyond the current scan position.
//!
//! At every position the longest lexeme is taken, trying categories in a
//! fixed order:
//!
//! 1. quoted strings (`"..."` or `'...'`)
//! 2. comments (`-- line` and `--[[ block ]]`), skipped silently
//! 3. numbers, with an optional sign when the sign cannot be a binary operator
//! 4. names and keywords
//! 5. two-character operators (`==`, `~=`, `<=`, `>=`, `..`)
//! 6. single-character operators and delimiters
//!
//! Anything else is a [`LexError`]. After an error the cursor has already
//! moved past the offending text, so the caller may keep pulling tokens.

use super::token::{self, SourceLocation, Token, TokenKind};
use std::fmt;

/// What went wrong while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedComment,
    MalformedNumber(String),
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            LexErrorKind::UnterminatedComment => {
                write!(f, "unterminated block comment")
            }
            LexErrorKind::MalformedNumber(text) => {
                write!(f, "malformed number '{}'", text)
            }
            LexErrorKind::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character '{}'", ch.escape_default())
            }
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at line {}, position {}: {kind}", .location.line, .location.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

impl LexError {
    pub fn new(kind: LexErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// Lexer for Lua Simples source code
pub struct Lexer<'src> {
    input: &'src [u8],
    position: usize,
    line: usize,
    column: usize,
    /// Kind of the last token produced; decides whether `-3` is signed.
    previous: Option<TokenKind>,
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'src str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    pub fn from_bytes(input: &'src [u8]) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            previous: None,
            exhausted: false,
        }
    }

    /// Tokenize the entire input, stopping at the first error.
    ///
    /// The returned vector always ends with [`TokenKind::EndOfInput`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::EndOfInput);
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token.
    ///
    /// Once the end of the buffer is reached this keeps returning
    /// `EndOfInput`, never an error.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let loc = self.current_location();
        let Some(byte) = self.peek() else {
            self.exhausted = true;
            self.previous = Some(TokenKind::EndOfInput);
            return Ok(Token::end_of_input(loc));
        };

        let token = match byte {
            b'"' | b'\'' => self.string_literal(loc)?,
            b'0'..=b'9' => self.number_literal(loc)?,
            b'+' | b'-' if self.sign_allowed() => self.number_literal(loc)?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier_or_keyword(loc),
            _ => self.operator_or_delimiter(loc)?,
        };

        self.previous = Some(token.kind);
        Ok(token)
    }

    /// A sign starts a number only when a digit follows and the previous
    /// token cannot be the left operand of a binary `+`/`-`.
    fn sign_allowed(&self) -> bool {
        let digit_follows =
            self.peek_ahead(1).is_some_and(|b| b.is_ascii_digit());
        let after_operand = self.previous.is_some_and(TokenKind::ends_operand);
        digit_follows && !after_operand
    }

    /// Parse string literal
    fn string_literal(
        &mut self,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let start = self.position;
        let quote = self.advance().unwrap_or(b'"');

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        loc,
                    ));
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance(); // consume closing quote
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        Ok(Token::new(TokenKind::String, self.lexeme(start), loc))
    }

    /// Parse numeric literal: `[+-]digits(.digits)?`
    fn number_literal(
        &mut self,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let start = self.position;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.advance();
        }
        self.skip_digits();

        // `..` after the integer part is concatenation, not a fraction
        if self.peek() == Some(b'.') && self.peek_ahead(1) != Some(b'.') {
            self.advance();
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(self.malformed_number(start, loc));
            }
            self.skip_digits();

            if self.peek() == Some(b'.') && self.peek_ahead(1) != Some(b'.') {
                return Err(self.malformed_number(start, loc));
            }
        }

        if self
            .peek()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        {
            return Err(self.malformed_number(start, loc));
        }

        let text = self.lexeme(start);
        debug_assert!(token::is_number(&text));
        Ok(Token::new(TokenKind::Number, text, loc))
    }

    /// Consume the rest of a bad numeral so scanning resumes after it.
    fn malformed_number(
        &mut self,
        start: usize,
        loc: SourceLocation,
    ) -> LexError {
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
        {
            self.advance();
        }
        LexError::new(LexErrorKind::MalformedNumber(self.lexeme(start)), loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let start = self.position;

        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let text = self.lexeme(start);
        let kind = token::keyword(&text).unwrap_or(TokenKind::Name);
        Token::new(kind, text, loc)
    }

    fn operator_or_delimiter(
        &mut self,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let start = self.position;

        // Two-character operators take precedence over their first byte
        if let Some(pair) = self.input.get(start..start + 2) {
            let kind = std::str::from_utf8(pair).ok().and_then(token::operator);
            if let Some(kind) = kind {
                self.advance();
                self.advance();
                return Ok(Token::new(kind, self.lexeme(start), loc));
            }
        }

        let byte = self.input[start];
        let single = token::delimiter(byte).or_else(|| {
            std::str::from_utf8(&self.input[start..start + 1])
                .ok()
                .and_then(token::operator)
        });

        match single {
            Some(kind) => {
                self.advance();
                Ok(Token::new(kind, self.lexeme(start), loc))
            }
            None => {
                let ch = self.skip_unexpected_character();
                Err(LexError::new(LexErrorKind::UnexpectedCharacter(ch), loc))
            }
        }
    }

    /// Skip one source character (all of its bytes) and return it.
    fn skip_unexpected_character(&mut self) -> char {
        let rest = &self.input[self.position..];
        let width = match rest.first() {
            Some(b) if *b < 0x80 => 1,
            Some(b) if *b >= 0xF0 => 4,
            Some(b) if *b >= 0xE0 => 3,
            Some(b) if *b >= 0xC0 => 2,
            _ => 1,
        };
        let width = width.min(rest.len());
        let ch = std::str::from_utf8(&rest[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);

        for _ in 0..width {
            self.advance();
        }
        ch
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C) => {
                    self.advance();
                }
                Some(b'-') if self.peek_ahead(1) == Some(b'-') => {
                    if self.peek_ahead(2) == Some(b'[')
                        && self.peek_ahead(3) == Some(b'[')
                    {
                        self.skip_block_comment()?;
                    } else {
                        self.skip_line_comment();
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (-- ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        while self.peek().is_some_and(|b| b != b'\n') {
            self.advance();
        }
    }

    /// Skip block comment (--[[ ... ]])
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        for _ in 0..4 {
            self.advance(); // skip "--[["
        }

        while !self.is_at_end() {
            if self.peek() == Some(b']') && self.peek_ahead(1) == Some(b']') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new(LexErrorKind::UnterminatedComment, start_loc))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
    }

    fn lexeme(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    /// Peek at current byte without consuming
    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n bytes
    fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next byte
    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;

        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(byte)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Yields every token up to and including `EndOfInput`, with lexical errors
/// in stream order.
impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        Some(self.next_token())
    }
}
