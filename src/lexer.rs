use std::iter::FusedIterator;

use crate::ast::{Token, TokenKind};

const DOT: char = '.';
const COMMA: char = ',';
const LEFT_PAREN: char = '(';
const RIGHT_PAREN: char = ')';
const LEFT_CURLY: char = '{';
const RIGHT_CURLY: char = '}';

/// Scanner states. Each knows what it is looking for and which state
/// follows once it is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ObjectName,
    Dot,
    FunctionName,
    LeftParen,
    Argument,
    RightParen,
    LeftCurly,
    FieldNames,
    Comma,
    RightCurly,
    End,
}

/// Tokenizer for sprig queries.
///
/// A lazy, finite iterator: tokens are scanned only when pulled, the last
/// one is always [`TokenKind::EndOfInput`] or [`TokenKind::Error`], and
/// nothing is yielded after it.
///
/// # Examples
///
/// ```
/// use sprig_query::{Lexer, TokenKind};
///
/// let kinds: Vec<TokenKind> = Lexer::new("node(1){id}").map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![
///     TokenKind::ObjectName,
///     TokenKind::LeftParen,
///     TokenKind::Argument,
///     TokenKind::RightParen,
///     TokenKind::LeftBrace,
///     TokenKind::FieldName,
///     TokenKind::RightBrace,
///     TokenKind::EndOfInput,
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Start of the token being scanned
    start: usize,
    position: usize,
    /// Set once the root `{` is scanned; the field list stays open from then on
    in_fields: bool,
    /// `None` once the terminal token has been yielded
    state: Option<State>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            start: 0,
            position: 0,
            in_fields: false,
            state: Some(State::ObjectName),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn ignore(&mut self) {
        self.start = self.position;
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.current_char() {
            self.advance();
        }
        self.ignore();
    }

    /// Cuts the pending text into a token.
    ///
    /// Names and closing braces are trimmed; if nothing is left the token
    /// is dropped, but the pending text is still consumed.
    fn emit(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        let input = self.input;
        let raw = &input[self.start..self.position];
        let offset = self.start;
        self.ignore();

        match kind {
            TokenKind::FieldName | TokenKind::Function | TokenKind::RightBrace => {
                let text = raw.trim();
                if text.is_empty() {
                    return None;
                }
                let lead = raw.len() - raw.trim_start().len();
                let start = offset + lead;
                Some(Token::new(kind, text, start..start + text.len()))
            }
            _ => Some(Token::new(kind, raw, offset..offset + raw.len())),
        }
    }

    fn emit_nonempty(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.position > self.start {
            self.emit(kind)
        } else {
            None
        }
    }

    fn error(&self, message: &'static str) -> Option<Token<'a>> {
        Some(Token::new(
            TokenKind::Error,
            message,
            self.position..self.position,
        ))
    }

    fn end_of_input(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let text = &input[self.start..];
        let span = self.start..input.len();
        self.position = self.input.len();
        self.ignore();
        Some(Token::new(TokenKind::EndOfInput, text, span))
    }

    /// Runs one state; returns what it emitted (if anything) and the next
    /// state (`None` after a terminal token).
    fn step(&mut self, state: State) -> (Option<Token<'a>>, Option<State>) {
        match state {
            State::ObjectName => self.scan_object_name(),
            State::Dot => {
                self.advance();
                (self.emit(TokenKind::Dot), Some(State::FunctionName))
            }
            State::FunctionName => self.scan_function_name(),
            State::LeftParen => {
                self.advance();
                (self.emit(TokenKind::LeftParen), Some(State::Argument))
            }
            State::Argument => self.scan_argument(),
            State::RightParen => {
                self.advance();
                let token = self.emit(TokenKind::RightParen);
                self.skip_whitespace();
                if self.current_char() == Some(DOT) {
                    (token, Some(State::Dot))
                } else {
                    (token, Some(State::LeftCurly))
                }
            }
            State::LeftCurly => match self.current_char() {
                Some(LEFT_CURLY) => {
                    self.advance();
                    let token = self.emit(TokenKind::LeftBrace);
                    self.in_fields = true;
                    self.skip_whitespace();
                    (token, Some(State::FieldNames))
                }
                // `node(){a(1)`: the field list was never closed
                None if self.in_fields => (self.error("illegal fieldname"), None),
                // `node(1)` with nothing after it
                None => (self.end_of_input(), None),
                Some(_) => (self.error("illegal left curly"), None),
            },
            State::FieldNames => self.scan_field_names(),
            State::Comma => {
                self.advance();
                let token = self.emit(TokenKind::Comma);
                self.skip_whitespace();
                (token, Some(State::FieldNames))
            }
            State::RightCurly => {
                self.advance();
                let token = self.emit(TokenKind::RightBrace);
                if self.remaining().trim_start().is_empty() {
                    (token, Some(State::End))
                } else {
                    (token, Some(State::FieldNames))
                }
            }
            State::End => (self.end_of_input(), None),
        }
    }

    fn scan_object_name(&mut self) -> (Option<Token<'a>>, Option<State>) {
        while let Some(ch) = self.current_char() {
            match ch {
                LEFT_PAREN => {
                    return (self.emit_nonempty(TokenKind::ObjectName), Some(State::LeftParen));
                }
                DOT => return (self.emit_nonempty(TokenKind::ObjectName), Some(State::Dot)),
                _ => self.advance(),
            }
        }
        // No call at all, e.g. "" or "node{}": everything is left unscanned.
        (self.end_of_input(), None)
    }

    fn scan_function_name(&mut self) -> (Option<Token<'a>>, Option<State>) {
        while let Some(ch) = self.current_char() {
            if ch == LEFT_PAREN {
                return (self.emit_nonempty(TokenKind::Function), Some(State::LeftParen));
            }
            self.advance();
        }
        (self.error("illegal function name"), None)
    }

    fn scan_argument(&mut self) -> (Option<Token<'a>>, Option<State>) {
        while let Some(ch) = self.current_char() {
            match ch {
                RIGHT_PAREN => {
                    return (self.emit_nonempty(TokenKind::Argument), Some(State::RightParen));
                }
                '\n' => break,
                _ => self.advance(),
            }
        }
        (self.error("illegal function argument"), None)
    }

    fn scan_field_names(&mut self) -> (Option<Token<'a>>, Option<State>) {
        while let Some(ch) = self.current_char() {
            let next = match ch {
                RIGHT_CURLY => State::RightCurly,
                LEFT_CURLY => State::LeftCurly,
                COMMA => State::Comma,
                DOT => State::Dot,
                LEFT_PAREN => {
                    // a field taking an argument: `node(7) { .. }`
                    return (self.emit_nonempty(TokenKind::Function), Some(State::LeftParen));
                }
                _ => {
                    self.advance();
                    continue;
                }
            };
            return (self.emit_nonempty(TokenKind::FieldName), Some(next));
        }
        (self.error("illegal fieldname"), None)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while let Some(state) = self.state.take() {
            let (token, next) = self.step(state);
            self.state = next;
            if token.is_some() {
                return token;
            }
        }
        None
    }
}

impl FusedIterator for Lexer<'_> {}

#[test]
fn test_spans_point_into_source() {
    let source = "node( 7 ) {  id ,\n name }";
    for token in Lexer::new(source) {
        if token.kind != TokenKind::Error {
            assert_eq!(&source[token.span.clone()], token.text, "{:?}", token);
        }
    }
}

#[test]
fn test_nothing_after_terminal_token() {
    let mut lexer = Lexer::new("node(");
    assert_eq!(lexer.by_ref().last().map(|t| t.kind), Some(TokenKind::Error));
    assert_eq!(lexer.next(), None);
    assert_eq!(lexer.next(), None);
}
