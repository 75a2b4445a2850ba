//! Source-location tracking through the lexer and parser.

use maqui_ast::ast::Expr;
use maqui_parse::token::TokenKind;
use maqui_parse::{parse_str, Lexer};

#[test]
fn token_locations_cover_their_text() {
    // src:  func main () {}
    // pos:  0123456789...
    let tokens = Lexer::new("<test>", "func main () {}")
        .run()
        .expect("lexing failed");

    let spans: Vec<(TokenKind, u64, u64)> =
        tokens.iter().map(|t| (t.kind, t.loc.start, t.loc.end)).collect();
    assert_eq!(
        spans,
        vec![
            (TokenKind::Func, 0, 4),
            (TokenKind::Identifier, 5, 9),
            (TokenKind::OpenParen, 10, 11),
            (TokenKind::CloseParen, 11, 12),
            (TokenKind::OpenCurly, 13, 14),
            (TokenKind::CloseCurly, 14, 15),
        ]
    );
}

#[test]
fn locations_count_runes_not_bytes() {
    // 'á' is two bytes but one rune; positions advance by one.
    let tokens = Lexer::new("<test>", "á := 1").run().expect("lexing failed");
    assert_eq!(tokens[0].loc.start, 0);
    assert_eq!(tokens[0].loc.end, 1);
    assert_eq!(tokens[1].loc.start, 2);
    assert_eq!(tokens[1].loc.end, 4);
}

#[test]
fn tokens_carry_the_filename() {
    let tokens = Lexer::new("dir/prog.mq", "x").run().expect("lexing failed");
    assert_eq!(tokens[0].loc.file, "dir/prog.mq");
    assert_eq!(tokens[0].loc.to_string(), "prog.mq:[0:1]");
}

#[test]
fn string_location_includes_the_delimiters() {
    let tokens = Lexer::new("<test>", "\"ab\"").run().expect("lexing failed");
    assert_eq!(tokens[0].text, "ab");
    assert_eq!(tokens[0].loc.start, 0);
    assert_eq!(tokens[0].loc.end, 4);
}

#[test]
fn identifier_nodes_keep_their_location() {
    let (statements, _) = parse_str("<test>", "func main () { y }");
    let Expr::FuncDecl(decl) = &statements[0] else {
        panic!("expected a function declaration");
    };
    let Expr::Identifier(id) = &decl.body[0] else {
        panic!("expected an identifier statement");
    };
    assert_eq!(id.loc.start, 15);
    assert_eq!(id.loc.end, 16);
}

#[test]
fn declaration_nodes_point_at_their_name() {
    let (statements, _) = parse_str("<test>", "value := 1");
    let Expr::VariableDecl(decl) = &statements[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.loc.start, 0);
    assert_eq!(decl.loc.end, 5);
}

#[test]
fn bad_nodes_point_at_the_offending_token() {
    let (statements, _) = parse_str("<test>", "x := (1");
    let Expr::VariableDecl(decl) = &statements[0] else {
        panic!("expected a variable declaration");
    };
    let Expr::Bad(bad) = &*decl.value else {
        panic!("expected a bad value");
    };
    // The missing ')' diagnostic lands on the end-of-file position.
    assert_eq!(bad.loc.start, 7);
    assert_eq!(bad.message, "expected closing parenthesis");
}
