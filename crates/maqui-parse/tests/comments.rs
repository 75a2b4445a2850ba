//! Comments are filtered at the token boundary; the grammar never sees them.

use maqui_ast::ast::Expr;
use maqui_parse::parse_str;

#[test]
fn comment_only_input_parses_to_nothing() {
    let (statements, lex_error) = parse_str("<test>", "// this is a comment\n");
    assert!(statements.is_empty());
    assert!(lex_error.is_none());
}

#[test]
fn comment_inside_a_block_is_skipped() {
    let (statements, _) = parse_str("<test>", "func main () {\n// note\n}");
    assert_eq!(
        statements,
        vec![Expr::FuncDecl(maqui_ast::ast::FuncDecl {
            name: "main".to_string(),
            body: vec![],
        })]
    );
}

#[test]
fn comment_at_end_of_line_does_not_split_statements() {
    let (statements, _) = parse_str("<test>", "x := 1 // declares x\ny := 2");
    assert_eq!(statements.len(), 2);
}
