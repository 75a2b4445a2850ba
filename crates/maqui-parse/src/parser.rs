//! Recursive-descent parser with panic-token error recovery.
//!
//! Malformed input turns into `Expr::Bad` nodes rather than aborting the
//! parse; a lexer failure ends the statement stream and is surfaced through
//! [`ExprSource::lex_error`] instead of becoming an AST node. Line comments
//! are filtered at the token boundary, so the grammar never sees them.

use crate::lexer::{LexError, TokenSource};
use crate::token::{Token, TokenKind};
use maqui_ast::ast::{
    BadExpr, BinaryExpr, BinaryOp, BooleanExpr, BooleanOp, Expr, FuncCall, FuncDecl, Identifier,
    IfExpr, LiteralExpr, LiteralKind, UnaryExpr, UnaryOp, VariableDecl,
};
use maqui_ast::span::Location;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

/// Capacity of the streaming-mode statement channel.
const STREAM_BUFFER: usize = 2;

/// A supplier of parsed statements: the seam between the parser and the
/// analyzer. `get` returns `None` at end of stream; if the underlying lexer
/// failed, `lex_error` reports it once the stream has ended.
pub trait ExprSource {
    fn get(&mut self) -> Option<Expr>;
    fn filename(&self) -> &str;
    fn lex_error(&self) -> Option<&LexError> {
        None
    }
}

pub struct Parser<T: TokenSource> {
    filename: String,
    tokens: T,
    buf: Option<Token>,
    lex_error: Option<LexError>,
}

impl<T: TokenSource> Parser<T> {
    pub fn new(tokens: T) -> Self {
        let filename = tokens.filename().to_string();
        Parser {
            filename,
            tokens,
            buf: None,
            lex_error: None,
        }
    }

    /// Parses every statement, returning them in source order together with
    /// the lexer failure that cut the stream short, if any.
    pub fn run(mut self) -> (Vec<Expr>, Option<LexError>) {
        let mut statements = Vec::new();
        while let Some(stmt) = self.get() {
            statements.push(stmt);
        }
        (statements, self.lex_error)
    }

    /// Pulls the next statement, or `None` at end of stream.
    pub fn get(&mut self) -> Option<Expr> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Eof => None,
            TokenKind::Error => {
                self.lex_error = Some(LexError {
                    message: tok.text,
                    loc: tok.loc,
                });
                None
            }
            _ => Some(self.statement()),
        }
    }

    // ======= token plumbing =======

    fn peek(&mut self) -> Token {
        match &self.buf {
            Some(tok) => tok.clone(),
            None => {
                let tok = self.fetch();
                self.buf = Some(tok.clone());
                tok
            }
        }
    }

    fn next(&mut self) -> Token {
        match self.buf.take() {
            Some(tok) if tok.is_valid() => tok,
            Some(tok) => {
                // Sentinels stay buffered: no more valid tokens follow.
                self.buf = Some(tok.clone());
                tok
            }
            None => {
                let tok = self.fetch();
                if !tok.is_valid() {
                    self.buf = Some(tok.clone());
                }
                tok
            }
        }
    }

    fn fetch(&mut self) -> Token {
        loop {
            let tok = self.tokens.get();
            if !tok.is_comment() {
                return tok;
            }
        }
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        self.next().kind == kind
    }

    /// Consumes the next token; on a kind mismatch the offending token is
    /// returned as the error value so the caller can point a diagnostic at
    /// it.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, Token> {
        let tok = self.next();
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(tok)
        }
    }

    fn bad(&self, loc: Location, message: impl Into<String>) -> Expr {
        Expr::Bad(BadExpr {
            loc,
            message: message.into(),
        })
    }

    // ======= statements =======

    fn statement(&mut self) -> Expr {
        match self.peek().kind {
            TokenKind::Func => self.func_decl(),
            _ => self.expr(),
        }
    }

    fn func_decl(&mut self) -> Expr {
        let start = self.next().loc; // func keyword

        let name = match self.expect(TokenKind::Identifier) {
            Ok(tok) => tok.text,
            Err(_) => return self.bad(start, "expected function name"),
        };

        if !self.consume(TokenKind::OpenParen) || !self.consume(TokenKind::CloseParen) {
            return self.bad(start, "bad function declaration");
        }

        Expr::FuncDecl(FuncDecl {
            name,
            body: self.block_stmt(),
        })
    }

    fn block_stmt(&mut self) -> Vec<Expr> {
        if let Err(tok) = self.expect(TokenKind::OpenCurly) {
            return vec![self.bad(tok.loc, "invalid block statement")];
        }

        let mut exprs = Vec::new();
        loop {
            let tok = self.peek();
            if !tok.is_valid() || tok.kind == TokenKind::CloseCurly {
                break;
            }
            exprs.push(self.statement());
        }

        let closer = self.next();
        match closer.kind {
            TokenKind::CloseCurly => exprs,
            TokenKind::Error => {
                exprs.push(self.bad(closer.loc, "invalid block statement"));
                exprs
            }
            TokenKind::Eof => {
                exprs.push(self.bad(closer.loc, "unclosed block statement"));
                exprs
            }
            _ => {
                exprs.push(self.bad(closer.loc, "unexpected token in block statement"));
                exprs
            }
        }
    }

    // ======= expressions =======

    fn expr(&mut self) -> Expr {
        let lhs = self.equality();

        // Declarations hang off a bare identifier on the left-hand side.
        if let Expr::Identifier(id) = &lhs {
            if self.check(TokenKind::Declaration) {
                let id = id.clone();
                self.next(); // :=
                return Expr::VariableDecl(VariableDecl {
                    name: id.name,
                    loc: id.loc,
                    value: Box::new(self.expr()),
                    resolved_type: None,
                });
            }
        }

        lhs
    }

    fn equality(&mut self) -> Expr {
        let lhs = self.additive();
        if !self.check(TokenKind::BooleanEquals) {
            return lhs;
        }
        self.next();
        Expr::Boolean(BooleanExpr {
            op: BooleanOp::Eq,
            lhs: Box::new(lhs),
            rhs: Box::new(self.additive()),
        })
    }

    fn additive(&mut self) -> Expr {
        let lhs = self.multiplicative();
        let op = match self.peek().kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            _ => return lhs,
        };
        self.next();

        // Chained operands nest to the right: 1 - 3 + 1 is 1 - (3 + 1).
        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(self.additive()),
        })
    }

    fn multiplicative(&mut self) -> Expr {
        let lhs = self.unary();
        let op = match self.peek().kind {
            TokenKind::Multi => BinaryOp::Mul,
            TokenKind::Div => BinaryOp::Div,
            _ => return lhs,
        };
        self.next();

        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(self.multiplicative()),
        })
    }

    fn unary(&mut self) -> Expr {
        if self.check(TokenKind::Minus) {
            self.next();
            return Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                operand: Box::new(self.primary()),
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Expr {
        match self.peek().kind {
            TokenKind::OpenParen => self.paren_expr(),
            TokenKind::If => self.if_expr(),
            TokenKind::Identifier => self.ident_or_call(),
            _ => self.literal(),
        }
    }

    fn paren_expr(&mut self) -> Expr {
        self.next(); // (
        let inner = self.expr();
        match self.expect(TokenKind::CloseParen) {
            Ok(_) => inner,
            Err(tok) => self.bad(tok.loc, "expected closing parenthesis"),
        }
    }

    fn if_expr(&mut self) -> Expr {
        self.next(); // if keyword
        let cond = self.expr();
        let then_body = self.block_stmt();
        let else_body = if self.check(TokenKind::Else) {
            self.next();
            Some(self.block_stmt())
        } else {
            None
        };

        Expr::If(IfExpr {
            cond: Box::new(cond),
            then_body,
            else_body,
        })
    }

    fn ident_or_call(&mut self) -> Expr {
        let tok = self.next();
        let id = Identifier {
            name: tok.text,
            loc: tok.loc,
        };
        if self.check(TokenKind::OpenParen) {
            return self.func_call(id);
        }

        Expr::Identifier(id)
    }

    fn func_call(&mut self, id: Identifier) -> Expr {
        self.next(); // (

        let mut args = Vec::new();
        loop {
            let tok = self.peek();
            if !tok.is_valid() || tok.kind == TokenKind::CloseParen {
                break;
            }
            args.push(self.expr());
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        match self.expect(TokenKind::CloseParen) {
            Ok(_) => Expr::FuncCall(FuncCall {
                name: id.name,
                loc: id.loc,
                args,
                resolved_arg_types: Vec::new(),
            }),
            Err(tok) => self.bad(tok.loc, "bad function call"),
        }
    }

    fn literal(&mut self) -> Expr {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number => {
                let tok = self.next();
                Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Number,
                    text: tok.text,
                })
            }
            TokenKind::Str => {
                let tok = self.next();
                Expr::Literal(LiteralExpr {
                    kind: LiteralKind::String,
                    text: tok.text,
                })
            }
            TokenKind::Error => {
                let tok = self.next();
                self.bad(tok.loc, tok.text)
            }
            _ => {
                let tok = self.next();
                self.bad(tok.loc, format!("invalid symbol '{}'", tok.text))
            }
        }
    }
}

impl<T: TokenSource> ExprSource for Parser<T> {
    fn get(&mut self) -> Option<Expr> {
        Parser::get(self)
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn lex_error(&self) -> Option<&LexError> {
        self.lex_error.as_ref()
    }
}

enum StreamItem {
    Stmt(Expr),
    LexFail(LexError),
}

impl<T: TokenSource + Send + 'static> Parser<T> {
    /// Moves the parser onto its own thread, handing statements over a small
    /// bounded channel.
    pub fn stream(mut self) -> ExprStream {
        let filename = self.filename.clone();
        let (tx, rx) = sync_channel(STREAM_BUFFER);
        thread::spawn(move || {
            while let Some(stmt) = self.get() {
                if tx.send(StreamItem::Stmt(stmt)).is_err() {
                    return;
                }
            }
            if let Some(err) = self.lex_error.take() {
                let _ = tx.send(StreamItem::LexFail(err));
            }
        });
        ExprStream {
            filename,
            rx,
            lex_error: None,
            done: false,
        }
    }
}

/// Consumer end of a streaming parser.
pub struct ExprStream {
    filename: String,
    rx: Receiver<StreamItem>,
    lex_error: Option<LexError>,
    done: bool,
}

impl ExprSource for ExprStream {
    fn get(&mut self) -> Option<Expr> {
        if self.done {
            return None;
        }
        match self.rx.recv() {
            Ok(StreamItem::Stmt(stmt)) => Some(stmt),
            Ok(StreamItem::LexFail(err)) => {
                self.lex_error = Some(err);
                self.done = true;
                None
            }
            Err(_) => {
                self.done = true;
                None
            }
        }
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn lex_error(&self) -> Option<&LexError> {
        self.lex_error.as_ref()
    }
}
