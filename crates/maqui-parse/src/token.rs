use maqui_ast::span::Location;

/// The closed set of lexical token kinds.
///
/// `Error` and `Eof` are sentinels: they terminate the stream and are never
/// handed to later stages as data. An `Error` token carries its message in
/// the token text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Error,
    Eof,
    Number,
    Str,
    Identifier,
    Func,
    If,
    Else,
    Plus,
    Minus,
    Multi,
    Div,
    /// `:=`
    Declaration,
    /// `==`
    BooleanEquals,
    LineComment,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Comma,
}

/// A lexical token: kind, payload text (delimiters stripped) and the source
/// range it was scanned from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub loc: Location,
}

impl Token {
    /// False for the `Eof` and `Error` sentinels.
    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, TokenKind::Eof | TokenKind::Error)
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::LineComment
    }
}

/// Reserved words, matched after identifier scanning so they can never be
/// re-tokenized as identifiers.
pub fn keyword(text: &str) -> Option<TokenKind> {
    match text {
        "func" => Some(TokenKind::Func),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        _ => None,
    }
}

/// Operator symbols, both one- and two-rune forms.
pub fn operator(sym: &str) -> Option<TokenKind> {
    match sym {
        "+" => Some(TokenKind::Plus),
        "-" => Some(TokenKind::Minus),
        "*" => Some(TokenKind::Multi),
        "/" => Some(TokenKind::Div),
        ":=" => Some(TokenKind::Declaration),
        "==" => Some(TokenKind::BooleanEquals),
        "//" => Some(TokenKind::LineComment),
        "(" => Some(TokenKind::OpenParen),
        ")" => Some(TokenKind::CloseParen),
        "{" => Some(TokenKind::OpenCurly),
        "}" => Some(TokenKind::CloseCurly),
        "," => Some(TokenKind::Comma),
        _ => None,
    }
}
