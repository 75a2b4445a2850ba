//! Blocks and if/else parsing.

use maqui_ast::ast::{BooleanExpr, BooleanOp, Expr, LiteralExpr, LiteralKind};
use maqui_parse::parse_str;

fn parse(src: &str) -> Vec<Expr> {
    let (statements, lex_error) = parse_str("<test>", src);
    assert!(lex_error.is_none(), "unexpected lex error: {lex_error:?}");
    statements
}

fn num(text: &str) -> Expr {
    Expr::Literal(LiteralExpr {
        kind: LiteralKind::Number,
        text: text.to_string(),
    })
}

#[test]
fn if_with_else() {
    let statements = parse("if 1 == 1 { print(1) } else { print(2) }");
    let Expr::If(ifx) = &statements[0] else {
        panic!("expected an if expression");
    };

    assert_eq!(
        *ifx.cond,
        Expr::Boolean(BooleanExpr {
            op: BooleanOp::Eq,
            lhs: Box::new(num("1")),
            rhs: Box::new(num("1")),
        })
    );
    assert!(matches!(
        &ifx.then_body[..],
        [Expr::FuncCall(call)] if call.name == "print"
    ));
    let else_body = ifx.else_body.as_ref().expect("expected an else branch");
    assert!(matches!(
        &else_body[..],
        [Expr::FuncCall(call)] if call.name == "print"
    ));
}

#[test]
fn if_without_else() {
    let statements = parse("if x == 1 { print(1) }");
    let Expr::If(ifx) = &statements[0] else {
        panic!("expected an if expression");
    };
    assert!(ifx.else_body.is_none());
}

#[test]
fn if_condition_may_be_any_expression() {
    let statements = parse("if 1 { }");
    let Expr::If(ifx) = &statements[0] else {
        panic!("expected an if expression");
    };
    assert_eq!(*ifx.cond, num("1"));
    assert!(ifx.then_body.is_empty());
}

#[test]
fn nested_if() {
    let statements = parse("if 1 == 1 { if 2 == 2 { print(1) } }");
    let Expr::If(outer) = &statements[0] else {
        panic!("expected an if expression");
    };
    assert!(matches!(&outer.then_body[..], [Expr::If(_)]));
}

#[test]
fn if_in_function_body() {
    let statements = parse("func main () { if 1 == 1 { print(1) } }");
    let Expr::FuncDecl(decl) = &statements[0] else {
        panic!("expected a function declaration");
    };
    assert!(matches!(&decl.body[..], [Expr::If(_)]));
}

#[test]
fn blocks_nest_statements_in_order() {
    let statements = parse("func main () { a := 1 b := 2 }");
    let Expr::FuncDecl(decl) = &statements[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(decl.body.len(), 2);
    assert!(matches!(&decl.body[0], Expr::VariableDecl(d) if d.name == "a"));
    assert!(matches!(&decl.body[1], Expr::VariableDecl(d) if d.name == "b"));
}
