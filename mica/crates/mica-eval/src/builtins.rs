//! The fixed builtin registry, consulted only after environment lookup
//! fails for an identifier, so a script can `let len = 5;` and shadow the
//! builtin without this registry ever finding out.

use std::rc::Rc;

use crate::value::Value;

pub fn lookup(name: &str) -> Option<Value> {
    let func: crate::value::BuiltinFn = match name {
        "len" => len,
        "first" => first,
        "last" => last,
        "rest" => rest,
        "push" => push,
        "puts" => puts,
        _ => return None,
    };
    Some(Value::Builtin(func))
}

fn len(args: &[Value]) -> Value {
    match args {
        [Value::String(s)] => Value::Integer(s.len() as i64),
        [Value::Array(items)] => Value::Integer(items.len() as i64),
        [one] => Value::error(format!("argument to `len` not supported, got {}", one.kind())),
        _ => Value::error(format!("wrong number of arguments. got={}, want=1", args.len())),
    }
}

fn first(args: &[Value]) -> Value {
    match args {
        [Value::Array(items)] => items.first().cloned().unwrap_or(Value::Null),
        [one] => Value::error(format!("argument to `first` must be ARRAY, got {}", one.kind())),
        _ => Value::error(format!("wrong number of arguments. got={}, want=1", args.len())),
    }
}

fn last(args: &[Value]) -> Value {
    match args {
        [Value::Array(items)] => items.last().cloned().unwrap_or(Value::Null),
        [one] => Value::error(format!("argument to `last` must be ARRAY, got {}", one.kind())),
        _ => Value::error(format!("wrong number of arguments. got={}, want=1", args.len())),
    }
}

fn rest(args: &[Value]) -> Value {
    match args {
        [Value::Array(items)] => {
            if items.is_empty() {
                Value::Null
            } else {
                Value::Array(Rc::new(items[1..].to_vec()))
            }
        }
        [one] => Value::error(format!("argument to `rest` must be ARRAY, got {}", one.kind())),
        _ => Value::error(format!("wrong number of arguments. got={}, want=1", args.len())),
    }
}

fn push(args: &[Value]) -> Value {
    match args {
        [Value::Array(items), value] => {
            let mut copy = (**items).clone();
            copy.push(value.clone());
            Value::Array(Rc::new(copy))
        }
        [other, _] => Value::error(format!("argument to `push` must be ARRAY, got {}", other.kind())),
        _ => Value::error(format!("wrong number of arguments. got={}, want=2", args.len())),
    }
}

fn puts(args: &[Value]) -> Value {
    for arg in args {
        println!("{}", arg.inspect());
    }
    Value::Null
}
