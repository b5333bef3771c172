use crate::{
    ast::{Call, QueryNode, Token, TokenKind},
    lexer::Lexer,
};

/// Nesting limit applied by [`ParseOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested `{ .. }` groups, the root group included.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Errors that abort a parse. No partial tree is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The lexer gave up; `message` is its error text
    #[error("parse error: {message} (at byte {offset})")]
    Lex { message: String, offset: usize },

    #[error("no root node: query must start with an object name, found {found}")]
    NoRootNode { found: TokenKind },

    #[error("expected {expected}, found {found} {text:?} at byte {offset}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        text: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: &'static str },

    /// `{` or a call that does not directly follow a field name
    #[error("{found} at byte {offset} does not follow a field name")]
    DetachedSelection { found: TokenKind, offset: usize },

    #[error("selection nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Builds a [`QueryNode`] tree from the lexer's tokens.
///
/// Tokens are pulled one at a time, left to right, with one token of
/// lookahead. The lexer is dropped with the parser, so returning early on
/// an error leaves nothing running.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser::with_options(lexer, ParseOptions::default())
    }

    pub fn with_options(lexer: Lexer<'a>, options: ParseOptions) -> Self {
        Parser {
            lexer,
            peeked: None,
            options,
        }
    }

    /// Pulls the next token; lexer errors become [`ParseError::Lex`].
    fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        let token = match self.peeked.take().or_else(|| self.lexer.next()) {
            Some(token) => token,
            // The lexer always ends on a terminal token, so this is only
            // reached when asking past it.
            None => {
                return Err(ParseError::UnexpectedEndOfInput {
                    expected: "more input",
                });
            }
        };
        tracing::trace!(kind = ?token.kind, text = token.text, "token");

        if token.kind == TokenKind::Error {
            return Err(ParseError::Lex {
                message: token.text.to_string(),
                offset: token.span.start,
            });
        }
        Ok(token)
    }

    fn peek(&mut self) -> Result<&Token<'a>, ParseError> {
        if self.peeked.is_none() {
            let token = self.advance()?;
            self.peeked = Some(token);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => Err(ParseError::UnexpectedEndOfInput {
                expected: "more input",
            }),
        }
    }

    fn check(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek()?.kind == kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.advance()?;
        if token.kind == kind {
            return Ok(token);
        }
        Err(unexpected(token, expected))
    }

    /// Parses a complete query.
    pub fn parse(&mut self) -> Result<QueryNode, ParseError> {
        let token = self.advance()?;
        if token.kind != TokenKind::ObjectName {
            return Err(ParseError::NoRootNode { found: token.kind });
        }
        let mut root = QueryNode::composite(token.text);

        if self.check(TokenKind::LeftParen)? {
            root.set_argument(self.parse_argument()?);
        } else if !self.check(TokenKind::Dot)? {
            let token = self.advance()?;
            return Err(unexpected(token, "'(' or '.'"));
        }
        for call in self.parse_call_chain()? {
            root.push_call(call);
        }

        self.expect(TokenKind::LeftBrace, "'{'")?;
        self.parse_fields(&mut root, 1)?;
        self.expect(TokenKind::EndOfInput, "end of input")?;

        tracing::debug!(
            name = root.name(),
            fields = root.field_names().len(),
            depth = root.depth(),
            "parsed query"
        );
        Ok(root)
    }

    /// `( [Argument] )`
    fn parse_argument(&mut self) -> Result<Option<String>, ParseError> {
        self.expect(TokenKind::LeftParen, "'('")?;
        let token = self.advance()?;
        match token.kind {
            TokenKind::RightParen => Ok(None),
            TokenKind::Argument => {
                self.expect(TokenKind::RightParen, "')'")?;
                Ok(Some(token.text.to_string()))
            }
            _ => Err(unexpected(token, "argument or ')'")),
        }
    }

    /// `( "." Function "(" [Argument] ")" )*`
    fn parse_call_chain(&mut self) -> Result<Vec<Call>, ParseError> {
        let mut calls = vec![];
        while self.check(TokenKind::Dot)? {
            self.advance()?;
            let name = self.expect(TokenKind::Function, "function name")?;
            let argument = self.parse_argument()?;
            calls.push(Call {
                name: name.text.to_string(),
                argument,
            });
        }
        Ok(calls)
    }

    /// Fills `parent` with the fields up to and including the matching `}`.
    fn parse_fields(&mut self, parent: &mut QueryNode, depth: usize) -> Result<(), ParseError> {
        if depth > self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }

        // The field a `{` or `.call()` would attach to
        let mut last: Option<String> = None;

        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => last = None,
                TokenKind::FieldName => {
                    parent.insert_child(QueryNode::leaf(token.text));
                    last = Some(token.text.to_string());
                }
                TokenKind::Function => {
                    let mut field = QueryNode::leaf(token.text);
                    field.set_argument(self.parse_argument()?);
                    parent.insert_child(field);
                    last = Some(token.text.to_string());
                }
                TokenKind::Dot => {
                    let field = attached(parent, last.as_deref(), &token)?;
                    self.peeked = Some(token);
                    for call in self.parse_call_chain()? {
                        field.push_call(call);
                    }
                }
                TokenKind::LeftBrace => {
                    let field = attached(parent, last.as_deref(), &token)?;
                    field.promote();
                    self.parse_fields(field, depth + 1)?;
                    last = None;
                }
                TokenKind::RightBrace => return Ok(()),
                TokenKind::EndOfInput => {
                    return Err(ParseError::UnexpectedEndOfInput { expected: "'}'" });
                }
                _ => return Err(unexpected(token, "field name, ',' or '}'")),
            }
        }
    }
}

/// The child named by `last`, which `token` applies to.
fn attached<'n>(
    parent: &'n mut QueryNode,
    last: Option<&str>,
    token: &Token<'_>,
) -> Result<&'n mut QueryNode, ParseError> {
    last.and_then(|name| parent.child_mut(name))
        .ok_or(ParseError::DetachedSelection {
            found: token.kind,
            offset: token.span.start,
        })
}

fn unexpected(token: Token<'_>, expected: &'static str) -> ParseError {
    if token.kind == TokenKind::EndOfInput {
        return ParseError::UnexpectedEndOfInput { expected };
    }
    ParseError::UnexpectedToken {
        expected,
        found: token.kind,
        text: token.text.to_string(),
        offset: token.span.start,
    }
}

/// Parses `text` with default options.
///
/// # Examples
///
/// ```
/// let root = sprig_query::parse("node(123){id,name}").unwrap();
/// assert_eq!(root.id(), Ok(123));
///
/// assert!(sprig_query::parse("node(").is_err());
/// ```
pub fn parse(text: &str) -> Result<QueryNode, ParseError> {
    Parser::new(Lexer::new(text)).parse()
}

/// Parses `text` with the given options.
pub fn parse_with(text: &str, options: ParseOptions) -> Result<QueryNode, ParseError> {
    Parser::with_options(Lexer::new(text), options).parse()
}
