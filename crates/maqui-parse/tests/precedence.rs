//! Operator precedence and associativity shapes.

use maqui_ast::ast::{BinaryExpr, BinaryOp, BooleanExpr, BooleanOp, Expr, UnaryExpr, UnaryOp};
use maqui_parse::parse_str;

fn parse_one(src: &str) -> Expr {
    let (mut statements, lex_error) = parse_str("<test>", src);
    assert!(lex_error.is_none(), "unexpected lex error: {lex_error:?}");
    assert_eq!(statements.len(), 1, "expected one statement: {statements:?}");
    statements.remove(0)
}

fn num(text: &str) -> Expr {
    Expr::Literal(maqui_ast::ast::LiteralExpr {
        kind: maqui_ast::ast::LiteralKind::Number,
        text: text.to_string(),
    })
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        parse_one("1 + 2 * 3"),
        binary(
            BinaryOp::Add,
            num("1"),
            binary(BinaryOp::Mul, num("2"), num("3")),
        )
    );
}

#[test]
fn trailing_multiplication_also_binds_tighter() {
    assert_eq!(
        parse_one("1 * 2 + 3"),
        binary(
            BinaryOp::Add,
            binary(BinaryOp::Mul, num("1"), num("2")),
            num("3"),
        )
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(
        parse_one("(1 + 3) * 2"),
        binary(
            BinaryOp::Mul,
            binary(BinaryOp::Add, num("1"), num("3")),
            num("2"),
        )
    );
}

#[test]
fn same_precedence_chains_nest_to_the_right() {
    assert_eq!(
        parse_one("1 - 3 + 1"),
        binary(
            BinaryOp::Sub,
            num("1"),
            binary(BinaryOp::Add, num("3"), num("1")),
        )
    );
}

#[test]
fn division_chains_nest_to_the_right() {
    assert_eq!(
        parse_one("8 / 4 / 2"),
        binary(
            BinaryOp::Div,
            num("8"),
            binary(BinaryOp::Div, num("4"), num("2")),
        )
    );
}

#[test]
fn equality_sits_below_arithmetic() {
    assert_eq!(
        parse_one("1 + 2 == 3"),
        Expr::Boolean(BooleanExpr {
            op: BooleanOp::Eq,
            lhs: Box::new(binary(BinaryOp::Add, num("1"), num("2"))),
            rhs: Box::new(num("3")),
        })
    );
}

#[test]
fn unary_minus_binds_to_the_primary() {
    assert_eq!(
        parse_one("-1 + 2"),
        binary(
            BinaryOp::Add,
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Neg,
                operand: Box::new(num("1")),
            }),
            num("2"),
        )
    );
}
