//! Error recovery: malformed input becomes `Expr::Bad` nodes and the parse
//! keeps going; lexer failures end the stream without becoming nodes.

use maqui_ast::ast::Expr;
use maqui_parse::parse_str;

fn first_bad_message(src: &str) -> String {
    let (statements, _) = parse_str("<test>", src);
    statements
        .iter()
        .find_map(|stmt| find_bad(stmt))
        .unwrap_or_else(|| panic!("expected a bad expression in {statements:?}"))
}

fn find_bad(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Bad(bad) => Some(bad.message.clone()),
        Expr::FuncDecl(decl) => decl.body.iter().find_map(find_bad),
        Expr::VariableDecl(decl) => find_bad(&decl.value),
        Expr::FuncCall(call) => call.args.iter().find_map(find_bad),
        Expr::If(ifx) => find_bad(&ifx.cond)
            .or_else(|| ifx.then_body.iter().find_map(find_bad))
            .or_else(|| {
                ifx.else_body
                    .as_ref()
                    .and_then(|body| body.iter().find_map(find_bad))
            }),
        Expr::Binary(bin) => find_bad(&bin.lhs).or_else(|| find_bad(&bin.rhs)),
        Expr::Boolean(cmp) => find_bad(&cmp.lhs).or_else(|| find_bad(&cmp.rhs)),
        Expr::Unary(unary) => find_bad(&unary.operand),
        _ => None,
    }
}

#[test]
fn missing_function_name() {
    assert_eq!(first_bad_message("func () {}"), "expected function name");
}

#[test]
fn missing_parameter_parens() {
    assert_eq!(first_bad_message("func main {}"), "bad function declaration");
}

#[test]
fn missing_block_open() {
    assert_eq!(first_bad_message("func main () x"), "invalid block statement");
}

#[test]
fn unclosed_block() {
    assert_eq!(
        first_bad_message("func main () { x := 1"),
        "unclosed block statement"
    );
}

#[test]
fn unclosed_parenthesis() {
    assert_eq!(
        first_bad_message("x := (1 + 2"),
        "expected closing parenthesis"
    );
}

#[test]
fn missing_argument_comma() {
    assert_eq!(first_bad_message("foo(1 2)"), "bad function call");
}

#[test]
fn unexpected_operator_in_value_position() {
    assert_eq!(first_bad_message("x := +"), "invalid symbol '+'");
}

#[test]
fn bad_statement_does_not_abort_the_parse() {
    // The bad declaration consumes through its '(' and every stray token
    // after it becomes its own bad statement, but the parse reaches `y`.
    let (statements, _) = parse_str("<test>", "func () {}\ny := 1");
    assert!(matches!(&statements[0], Expr::Bad(_)));
    assert!(matches!(
        statements.last(),
        Some(Expr::VariableDecl(d)) if d.name == "y"
    ));
}

#[test]
fn lexer_failure_ends_the_stream() {
    let (statements, lex_error) = parse_str("<test>", "\"unclosed");
    assert!(statements.is_empty());
    let err = lex_error.expect("expected a lex error");
    assert!(err.message.starts_with("unclosed string"));
}

#[test]
fn lexer_failure_mid_statement_is_reported_once_per_channel() {
    let (statements, lex_error) = parse_str("<test>", "x := @");
    // The failing token surfaces as the declaration's bad value, and the
    // fatal error is also held on the stream.
    assert_eq!(statements.len(), 1);
    assert_eq!(
        find_bad(&statements[0]).as_deref(),
        Some("invalid symbol '@'")
    );
    assert!(lex_error.is_some());
}

#[test]
fn comment_between_statements_is_invisible() {
    let (statements, _) = parse_str("<test>", "x := 1\n// note\ny := 2");
    assert_eq!(statements.len(), 2);
}
