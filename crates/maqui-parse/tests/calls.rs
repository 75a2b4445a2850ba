//! Function declarations, calls and variable declarations.

use maqui_ast::ast::{
    BinaryExpr, BinaryOp, Expr, FuncCall, FuncDecl, LiteralExpr, LiteralKind, VariableDecl,
};
use maqui_ast::span::Location;
use maqui_parse::parse_str;

fn parse(src: &str) -> Vec<Expr> {
    let (statements, lex_error) = parse_str("<test>", src);
    assert!(lex_error.is_none(), "unexpected lex error: {lex_error:?}");
    statements
}

fn loc(start: u64, end: u64) -> Location {
    Location::new("<test>", start, end)
}

fn num(text: &str) -> Expr {
    Expr::Literal(LiteralExpr {
        kind: LiteralKind::Number,
        text: text.to_string(),
    })
}

fn string(text: &str) -> Expr {
    Expr::Literal(LiteralExpr {
        kind: LiteralKind::String,
        text: text.to_string(),
    })
}

#[test]
fn empty_function_declaration() {
    assert_eq!(
        parse("func main () {}"),
        vec![Expr::FuncDecl(FuncDecl {
            name: "main".to_string(),
            body: vec![],
        })]
    );
}

#[test]
fn function_body_holds_statements() {
    let statements = parse("func main () { x := 1 }");
    let Expr::FuncDecl(decl) = &statements[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(decl.name, "main");
    assert_eq!(
        decl.body,
        vec![Expr::VariableDecl(VariableDecl {
            name: "x".to_string(),
            loc: loc(15, 16),
            value: Box::new(num("1")),
            resolved_type: None,
        })]
    );
}

#[test]
fn variable_declaration_from_number() {
    assert_eq!(
        parse("x := 1"),
        vec![Expr::VariableDecl(VariableDecl {
            name: "x".to_string(),
            loc: loc(0, 1),
            value: Box::new(num("1")),
            resolved_type: None,
        })]
    );
}

#[test]
fn variable_declaration_from_string() {
    assert_eq!(
        parse("greeting := \"string\""),
        vec![Expr::VariableDecl(VariableDecl {
            name: "greeting".to_string(),
            loc: loc(0, 8),
            value: Box::new(string("string")),
            resolved_type: None,
        })]
    );
}

#[test]
fn call_without_arguments() {
    assert_eq!(
        parse("foo()"),
        vec![Expr::FuncCall(FuncCall {
            name: "foo".to_string(),
            loc: loc(0, 3),
            args: vec![],
            resolved_arg_types: vec![],
        })]
    );
}

#[test]
fn call_with_mixed_arguments() {
    assert_eq!(
        parse("foo(\"arg1\", 2)"),
        vec![Expr::FuncCall(FuncCall {
            name: "foo".to_string(),
            loc: loc(0, 3),
            args: vec![string("arg1"), num("2")],
            resolved_arg_types: vec![],
        })]
    );
}

#[test]
fn call_argument_may_be_an_expression() {
    assert_eq!(
        parse("foo(1 + 2)"),
        vec![Expr::FuncCall(FuncCall {
            name: "foo".to_string(),
            loc: loc(0, 3),
            args: vec![Expr::Binary(BinaryExpr {
                op: BinaryOp::Add,
                lhs: Box::new(num("1")),
                rhs: Box::new(num("2")),
            })],
            resolved_arg_types: vec![],
        })]
    );
}

#[test]
fn call_in_declaration_value() {
    let statements = parse("x := foo()");
    let Expr::VariableDecl(decl) = &statements[0] else {
        panic!("expected a variable declaration");
    };
    assert!(matches!(&*decl.value, Expr::FuncCall(call) if call.name == "foo"));
}

#[test]
fn nested_calls() {
    let statements = parse("foo(bar())");
    let Expr::FuncCall(call) = &statements[0] else {
        panic!("expected a call");
    };
    assert!(matches!(&call.args[0], Expr::FuncCall(inner) if inner.name == "bar"));
}
