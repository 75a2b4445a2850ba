//! Properties of the type data model: semantic equality and display forms.

use maqui_ast::types::{ArgType, Basic, FuncType, Type, TypeErrReason};

fn arg(name: &str, ty: Type) -> ArgType {
    ArgType {
        name: name.to_string(),
        ty: Box::new(ty),
    }
}

fn samples() -> Vec<Type> {
    vec![
        Type::int(),
        Type::string(),
        Type::Any,
        Type::Err(TypeErrReason::Undefined),
        Type::Func(FuncType::default()),
        Type::Func(FuncType {
            args: vec![arg("v", Type::int())],
            returns: vec![Basic::Int],
        }),
        Type::Arg(arg("v", Type::int())),
    ]
}

#[test]
fn equality_is_symmetric() {
    let types = samples();
    for a in &types {
        for b in &types {
            assert_eq!(
                a.equals(b),
                b.equals(a),
                "equals not symmetric for {a:?} and {b:?}"
            );
        }
    }
}

#[test]
fn error_types_equal_nothing() {
    let err = Type::Err(TypeErrReason::Incompatible);
    for ty in samples() {
        assert!(!err.equals(&ty), "~error matched {ty:?}");
    }
    assert!(!err.equals(&err), "~error matched itself");
}

#[test]
fn any_matches_every_well_formed_type() {
    for ty in samples() {
        let expect = !ty.is_err();
        assert_eq!(Type::Any.equals(&ty), expect, "any vs {ty:?}");
    }
}

#[test]
fn basic_equality_is_structural() {
    assert!(Type::int().equals(&Type::int()));
    assert!(!Type::int().equals(&Type::string()));
}

#[test]
fn func_equality_compares_args_and_returns() {
    let a = Type::Func(FuncType {
        args: vec![arg("v", Type::int())],
        returns: vec![Basic::Int],
    });
    let b = Type::Func(FuncType {
        args: vec![arg("v", Type::int())],
        returns: vec![Basic::Int],
    });
    let fewer_args = Type::Func(FuncType {
        args: vec![],
        returns: vec![Basic::Int],
    });
    let other_ret = Type::Func(FuncType {
        args: vec![arg("v", Type::int())],
        returns: vec![Basic::Str],
    });

    assert!(a.equals(&b));
    assert!(!a.equals(&fewer_args));
    assert!(!a.equals(&other_ret));
}

#[test]
fn func_display_has_no_trailing_separators() {
    assert_eq!(Type::Func(FuncType::default()).to_string(), "func()");

    let print_like = FuncType {
        args: vec![arg("v", Type::Any)],
        returns: vec![],
    };
    assert_eq!(print_like.to_string(), "func(any)");

    let full = FuncType {
        args: vec![arg("a", Type::int()), arg("b", Type::string())],
        returns: vec![Basic::Int, Basic::Str],
    };
    assert_eq!(full.to_string(), "func(int, string) int, string");
}

#[test]
fn basic_display_forms() {
    assert_eq!(Type::int().to_string(), "int");
    assert_eq!(Type::string().to_string(), "string");
    assert_eq!(Type::Any.to_string(), "any");
    assert_eq!(Type::Err(TypeErrReason::Unknown).to_string(), "~error");
}
