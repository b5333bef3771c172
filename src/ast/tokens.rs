use std::fmt;
use std::ops::Range;

/// Kind tag of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Name of the requested top-level record
    ///
    /// # Examples
    /// ```text
    /// node(123) { .. }
    /// ^^^^
    /// ```
    ObjectName,

    /// Dot introducing a call in a call chain
    Dot,

    /// Name of a call, or of a field invoked with an argument
    ///
    /// # Examples
    /// ```text
    /// friends.first(2) { .. }
    ///         ^^^^^
    /// ```
    Function,

    /// Left parenthesis opening an argument
    LeftParen,

    /// Opaque text between parentheses
    ///
    /// Never interpreted by the tokenizer; `QueryNode::id()` is the only
    /// place that gives it a meaning.
    ///
    /// # Examples
    /// ```text
    /// 123
    /// -7
    /// abc
    /// ```
    Argument,

    /// Right parenthesis
    RightParen,

    /// Left brace opening a field list
    LeftBrace,

    /// Selected field, trimmed of surrounding whitespace
    FieldName,

    /// Comma separating fields
    Comma,

    /// Right brace closing a field list
    RightBrace,

    /// Terminal token of a successful scan
    EndOfInput,

    /// Terminal token of a failed scan; its text is the message
    Error,
}

impl TokenKind {
    /// Whether no token can follow this one.
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::EndOfInput | TokenKind::Error)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::ObjectName => "object name",
            TokenKind::Dot => "'.'",
            TokenKind::Function => "function name",
            TokenKind::LeftParen => "'('",
            TokenKind::Argument => "argument",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::FieldName => "field name",
            TokenKind::Comma => "','",
            TokenKind::RightBrace => "'}'",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// A lexical unit borrowed from the query text.
///
/// `text` is the exact source slice the token covers, except for
/// [`TokenKind::Error`] where it holds the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte range in the source.
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Range<usize>) -> Self {
        Token { kind, text, span }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput if self.text.is_empty() => write!(f, "EOF"),
            TokenKind::Error => f.write_str(self.text),
            _ => write!(f, "<{}> {:?}", self.kind, self.text),
        }
    }
}
