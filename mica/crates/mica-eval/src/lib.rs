//! The evaluator stage of the mica interpreter pipeline: AST to runtime
//! values. `eval_program` is the single public entry point; everything
//! else (environments, builtins, the value model) exists to support it.
//!
//! Values are a tagged sum (`Value`) rather than a `Box<dyn Trait>`
//! hierarchy, matching the AST's own design: the evaluator's dispatch is a
//! `match` over a closed set of variants, so adding a new value kind is a
//! compile error everywhere it isn't handled, not a silent no-op.

mod builtins;
mod environment;
mod eval;
mod value;

pub use environment::Environment;
pub use eval::{apply_function, eval_program};
pub use value::{hash_key, values_identical, BuiltinFn, FunctionData, HashKey, Value, ValueKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use mica_par::Parser;
    use proptest::prelude::*;

    proptest! {
        /// Evaluation is total: no well-formed arithmetic expression should
        /// ever panic, only ever bottom out in an `Error` value (division
        /// by zero) or a plain `Integer`.
        #[test]
        fn arithmetic_never_panics(a in any::<i64>(), b in any::<i64>()) {
            let source = format!("{a} + {b}; {a} - {b}; {a} * {b}; {a} / {b};");
            let mut parser = Parser::from_source(&source);
            let program = parser.parse_program();
            prop_assert!(parser.errors().is_empty());
            let result = eval_program(&program, &Environment::new());
            prop_assert!(matches!(result, Value::Integer(_) | Value::Error(_)));
        }
    }
}
