//! State-machine lexer for Maqui source text.
//!
//! Each state consumes zero or more runes, may emit one token, and names the
//! next state; a terminal state ends the machine. The lexer exposes a pull
//! interface (`get`), a blocking interface (`run`) and a channel-backed
//! streaming interface (`stream`).

use crate::reader::SourceReader;
use crate::token::{keyword, operator, Token, TokenKind};
use maqui_ast::span::Location;
use std::fmt;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

/// Capacity of the streaming-mode token channel.
const STREAM_BUFFER: usize = 2;

/// A fatal lexing failure. Lexing does not recover: the failing token is the
/// last one produced.
#[derive(Clone, Debug, PartialEq)]
pub struct LexError {
    pub message: String,
    pub loc: Location,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LexError {}

/// A supplier of tokens: the seam between the lexer and the parser. The
/// stream ends with an `Eof` token (or an `Error` token followed by `Eof`);
/// after that, `get` keeps returning the sentinel.
pub trait TokenSource {
    fn get(&mut self) -> Token;
    fn filename(&self) -> &str;
}

enum State {
    Start,
    Number,
    Str,
    Ident,
    Operator,
    LineComment,
    End,
}

pub struct Lexer {
    filename: String,
    reader: SourceReader,
    state: Option<State>,
    start: u64,
}

impl Lexer {
    pub fn new(filename: impl Into<String>, src: &str) -> Self {
        Lexer {
            filename: filename.into(),
            reader: SourceReader::new(src),
            state: Some(State::Start),
            start: 0,
        }
    }

    /// Pulls the next token. Once `Eof` has been produced the lexer stays at
    /// `Eof`.
    pub fn get(&mut self) -> Token {
        loop {
            let Some(state) = self.state.take() else {
                return self.eof_token();
            };
            let (next, tok) = self.step(state);
            self.state = next;
            if let Some(tok) = tok {
                return tok;
            }
        }
    }

    /// Lexes the whole stream, blocking until every token is ready or an
    /// error is hit.
    pub fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.get();
            match tok.kind {
                TokenKind::Eof => return Ok(tokens),
                TokenKind::Error => {
                    return Err(LexError {
                        message: tok.text,
                        loc: tok.loc,
                    })
                }
                _ => tokens.push(tok),
            }
        }
    }

    /// Moves the lexer onto its own thread, handing tokens over a small
    /// bounded channel.
    pub fn stream(self) -> TokenStream {
        let filename = self.filename.clone();
        let (tx, rx) = sync_channel(STREAM_BUFFER);
        thread::spawn(move || {
            let mut lexer = self;
            loop {
                let tok = lexer.get();
                let done = !tok.is_valid();
                if tx.send(tok).is_err() || done {
                    break;
                }
            }
        });
        TokenStream {
            filename,
            rx,
            terminal: None,
        }
    }

    fn step(&mut self, state: State) -> (Option<State>, Option<Token>) {
        match state {
            State::Start => loop {
                match self.reader.peek() {
                    Some(c) if c.is_whitespace() => {
                        self.reader.next();
                    }
                    None => {
                        self.start = self.reader.pos();
                        return (Some(State::End), None);
                    }
                    Some(c) => {
                        self.start = self.reader.pos();
                        let next = if c.is_ascii_digit() {
                            State::Number
                        } else if c == '"' {
                            State::Str
                        } else if c.is_alphabetic() {
                            State::Ident
                        } else {
                            State::Operator
                        };
                        return (Some(next), None);
                    }
                }
            },
            State::Number => {
                let mut num = String::new();
                while let Some(c) = self.reader.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    num.push(c);
                    self.reader.next();
                }
                self.emit(TokenKind::Number, num)
            }
            State::Str => {
                self.reader.next(); // leading double-quote
                let mut text = String::new();
                loop {
                    match self.reader.next() {
                        Some('"') => return self.emit(TokenKind::Str, text),
                        Some(c) => text.push(c),
                        None => return self.error(format!("unclosed string: {text}")),
                    }
                }
            }
            State::Ident => {
                let mut id = String::new();
                while let Some(c) = self.reader.peek() {
                    if !c.is_alphabetic() {
                        break;
                    }
                    id.push(c);
                    self.reader.next();
                }
                let kind = keyword(&id).unwrap_or(TokenKind::Identifier);
                self.emit(kind, id)
            }
            State::Operator => self.operator(),
            State::LineComment => {
                let mut body = String::new();
                while let Some(c) = self.reader.peek() {
                    if c == '\n' {
                        break;
                    }
                    body.push(c);
                    self.reader.next();
                }
                self.emit(TokenKind::LineComment, body)
            }
            State::End => (None, Some(self.eof_token())),
        }
    }

    fn operator(&mut self) -> (Option<State>, Option<Token>) {
        let Some(r) = self.reader.next() else {
            return (Some(State::End), None);
        };

        // Some operators are two runes wide; peek before committing.
        if matches!(r, ':' | '/' | '=') {
            if let Some(p) = self.reader.peek() {
                let sym = format!("{r}{p}");
                if let Some(kind) = operator(&sym) {
                    self.reader.next();
                    if kind == TokenKind::LineComment {
                        return (Some(State::LineComment), None);
                    }
                    return self.emit(kind, sym);
                }
            }
        }

        let sym = r.to_string();
        if let Some(kind) = operator(&sym) {
            return self.emit(kind, sym);
        }

        self.error(format!("invalid symbol '{r}'"))
    }

    fn emit(&mut self, kind: TokenKind, text: String) -> (Option<State>, Option<Token>) {
        let tok = Token {
            kind,
            text,
            loc: self.location(),
        };
        self.start = self.reader.pos();
        (Some(State::Start), Some(tok))
    }

    fn error(&mut self, message: String) -> (Option<State>, Option<Token>) {
        let tok = Token {
            kind: TokenKind::Error,
            text: message,
            loc: self.location(),
        };
        (Some(State::End), Some(tok))
    }

    fn eof_token(&self) -> Token {
        let pos = self.reader.pos();
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            loc: Location::new(self.filename.clone(), pos, pos),
        }
    }

    fn location(&self) -> Location {
        Location::new(self.filename.clone(), self.start, self.reader.pos())
    }
}

impl TokenSource for Lexer {
    fn get(&mut self) -> Token {
        Lexer::get(self)
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}

/// Consumer end of a streaming lexer. Latches onto the terminal sentinel once
/// the producer is done.
pub struct TokenStream {
    filename: String,
    rx: Receiver<Token>,
    terminal: Option<Token>,
}

impl TokenSource for TokenStream {
    fn get(&mut self) -> Token {
        if let Some(t) = &self.terminal {
            return t.clone();
        }
        match self.rx.recv() {
            Ok(tok) => {
                if !tok.is_valid() {
                    self.terminal = Some(tok.clone());
                }
                tok
            }
            Err(_) => {
                let tok = Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    loc: Location::new(self.filename.clone(), 0, 0),
                };
                self.terminal = Some(tok.clone());
                tok
            }
        }
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}
