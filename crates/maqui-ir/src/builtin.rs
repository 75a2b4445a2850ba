//! Built-in functions installed on every module.

use crate::ir::{Block, Declare, Function, Global, Inst, Module, Param, Terminator, Ty, Value};
use crate::value::ValueLookup;

const PRINTF_FMT_GLOBAL: &str = "._printf_fmt";

/// Installs the `print(i32)` intrinsic: a thin wrapper over the C library's
/// variadic `printf` with a `"%d\n"` format global. This is the only place
/// the emitted IR touches a platform library.
pub fn install(module: &mut Module, values: &mut ValueLookup) {
    module.globals.push(Global {
        name: PRINTF_FMT_GLOBAL.to_string(),
        bytes: b"%d\n\0".to_vec(),
    });

    module.declares.push(Declare {
        name: "printf".to_string(),
        ret: Ty::I32,
        params: vec![Ty::ptr(Ty::I8)],
        variadic: true,
    });

    let mut entry = Block::new("entry");
    entry.insts.push(Inst::Call {
        dst: None,
        ret: Ty::I32,
        callee: "printf".to_string(),
        args: vec![
            Value::BytesPtr {
                global: PRINTF_FMT_GLOBAL.to_string(),
                len: 4,
            },
            Value::Local {
                name: "v".to_string(),
                ty: Ty::I32,
            },
        ],
        variadic_params: Some(vec![Ty::ptr(Ty::I8)]),
    });
    entry.term = Some(Terminator::Ret);

    module.functions.push(Function {
        name: "print".to_string(),
        ret: Ty::Void,
        params: vec![Param {
            name: "v".to_string(),
            ty: Ty::I32,
        }],
        blocks: vec![entry],
    });

    values.set(
        "print",
        Value::Func {
            name: "print".to_string(),
            ret: Ty::Void,
        },
    );
}
