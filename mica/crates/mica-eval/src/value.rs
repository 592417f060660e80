use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use mica_par::{Block, Identifier};

use crate::environment::Environment;

/// A hashable value's identity for use as a `Hash` key: a type tag plus a
/// 64-bit payload. The tag guarantees `1` (integer) and `"1"` (string)
/// never collide even though their payloads could otherwise match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: u8,
    payload: u64,
}

const TAG_INTEGER: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_STRING: u8 = 2;

/// FNV-1a, 64-bit.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Computes the hash key for a value, or `None` if the value is not
/// hashable (only `Integer`, `Boolean`, `String` are).
pub fn hash_key(value: &Value) -> Option<HashKey> {
    match value {
        Value::Integer(i) => Some(HashKey {
            tag: TAG_INTEGER,
            payload: *i as u64,
        }),
        Value::Boolean(b) => Some(HashKey {
            tag: TAG_BOOLEAN,
            payload: if *b { 1 } else { 0 },
        }),
        Value::String(s) => Some(HashKey {
            tag: TAG_STRING,
            payload: fnv1a(s.as_bytes()),
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Integer => "INTEGER",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::Null => "NULL",
            ValueKind::String => "STRING",
            ValueKind::Array => "ARRAY",
            ValueKind::Hash => "HASH",
            ValueKind::Function => "FUNCTION",
            ValueKind::Builtin => "BUILTIN",
            ValueKind::ReturnValue => "RETURN_VALUE",
            ValueKind::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A user-defined closure: the parameter list and body as parsed, plus the
/// environment that was active when the `fn` literal was evaluated. Calling
/// it later extends *this* environment, not the caller's. This is what
/// makes closures actually close over their defining scope.
pub struct FunctionData {
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub env: Rc<std::cell::RefCell<Environment>>,
}

/// A host-provided builtin. Takes the already-evaluated argument list and
/// returns a value directly; builtins never need access to the environment.
pub type BuiltinFn = fn(&[Value]) -> Value;

/// Every runtime value in the language, as one tagged sum rather than a
/// trait-object hierarchy. `eval` dispatches on this by `match`, never by
/// virtual call, so the compiler flags any unhandled variant.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<IndexMap<HashKey, (Value, Value)>>),
    Function(Rc<FunctionData>),
    Builtin(BuiltinFn),
    /// Wraps a value while it unwinds through nested blocks on its way to
    /// the nearest `Program` or call boundary. Never stored in an
    /// environment.
    ReturnValue(Box<Value>),
    /// Halts evaluation with a message. Never stored in an environment.
    Error(Rc<str>),
}

impl Value {
    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(Rc::from(message.into().as_str()))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::from(s.into().as_str()))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Hash(_) => ValueKind::Hash,
            Value::Function(_) => ValueKind::Function,
            Value::Builtin(_) => ValueKind::Builtin,
            Value::ReturnValue(_) => ValueKind::ReturnValue,
            Value::Error(_) => ValueKind::Error,
        }
    }

    /// `FALSE` and `NULL` are falsy; everything else is truthy, including
    /// `0` and the empty string.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Human-readable rendering, distinct from any `Display`/source-text
    /// form: this is what `puts` prints and what the REPL echoes.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::String(s) => s.to_string(),
            Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(f) => {
                let params: Vec<String> = f.parameters.iter().map(|p| p.name.to_string()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), f.body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR: {message}"),
        }
    }
}

/// `==`/`!=` on anything that isn't a matched pair of `Integer`s falls back
/// to this: reference identity for the canonical `Boolean`/`Null`
/// singletons, and pointer identity for the reference-counted compound
/// values. Two independently-built arrays or hashes with equal contents are
/// therefore *not* `==` to each other; only the same allocation compares
/// equal, same as pointer equality for everything outside the arithmetic
/// fast path.
pub fn values_identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::String(x), Value::String(y)) => Rc::ptr_eq(x, y),
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Hash(x), Value::Hash(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Builtin(x), Value::Builtin(y)) => std::ptr::eq(*x as *const (), *y as *const ()),
        _ => false,
    }
}
