use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use mica_par::{Block, Expression, InfixOp, PrefixOp, Program, Statement};
use mica_util::Symbol;

use crate::environment::Environment;
use crate::value::{hash_key, values_identical, Value};

/// Evaluates a whole program. Top level: a `ReturnValue` produced anywhere
/// unwraps immediately (there's no further block to propagate through), an
/// `Error` stops evaluation and is returned as-is.
pub fn eval_program(program: &Program, env: &Rc<RefCell<Environment>>) -> Value {
    let mut result = Value::Null;
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

/// Evaluates a `{ ... }` block. Unlike [`eval_program`], a `ReturnValue` or
/// `Error` is returned *wrapped*: blocks do not introduce scope or consume
/// return values in this language, only `Program` and a function call
/// boundary do (see [`crate::apply_function`]).
fn eval_block(block: &Block, env: &Rc<RefCell<Environment>>) -> Value {
    let mut result = Value::Null;
    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<RefCell<Environment>>) -> Value {
    match stmt {
        Statement::Let { name, value, .. } => {
            let evaluated = eval_expression(value, env);
            if evaluated.is_error() {
                return evaluated;
            }
            env.borrow_mut().bind(name.name, evaluated);
            Value::Null
        }
        Statement::Assign { name, value, .. } => {
            let evaluated = eval_expression(value, env);
            if evaluated.is_error() {
                return evaluated;
            }
            let found = env.borrow_mut().assign(name.name, evaluated);
            if found {
                Value::Null
            } else {
                Value::error(format!("identifier not found: {}", name.name))
            }
        }
        Statement::Return { value, .. } => {
            let evaluated = eval_expression(value, env);
            if evaluated.is_error() {
                return evaluated;
            }
            Value::ReturnValue(Box::new(evaluated))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Block(block) => eval_block(block, env),
    }
}

fn eval_expression(expr: &Expression, env: &Rc<RefCell<Environment>>) -> Value {
    match expr {
        Expression::Identifier(id) => eval_identifier(id.name, env),
        Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expression::StringLiteral { value, .. } => Value::string(value.clone()),
        Expression::Boolean { value, .. } => Value::Boolean(*value),
        Expression::ArrayLiteral { elements, .. } => eval_array_literal(elements, env),
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, env),
        Expression::Prefix { op, right, .. } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(*op, right)
        }
        Expression::Infix { op, left, right, .. } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(*op, left, right)
        }
        Expression::Index { left, index, .. } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
        Expression::For {
            init,
            condition,
            post,
            body,
            ..
        } => eval_for_expression(init.as_deref(), condition, post.as_deref(), body, env),
        Expression::Function {
            parameters, body, ..
        } => Value::Function(Rc::new(crate::value::FunctionData {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        })),
        Expression::Call {
            function,
            arguments,
            ..
        } => eval_call_expression(function, arguments, env),
    }
}

fn eval_identifier(name: Symbol, env: &Rc<RefCell<Environment>>) -> Value {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = crate::builtins::lookup(name.as_str()) {
        return builtin;
    }
    Value::error(format!("identifier not found: {name}"))
}

fn eval_array_literal(elements: &[Expression], env: &Rc<RefCell<Environment>>) -> Value {
    let mut items = Vec::with_capacity(elements.len());
    for element in elements {
        let value = eval_expression(element, env);
        if value.is_error() {
            return value;
        }
        items.push(value);
    }
    Value::Array(Rc::new(items))
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<RefCell<Environment>>) -> Value {
    let mut map = IndexMap::with_capacity(pairs.len());
    for (key_expr, value_expr) in pairs {
        let key_value = eval_expression(key_expr, env);
        if key_value.is_error() {
            return key_value;
        }
        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }
        let key = match hash_key(&key_value) {
            Some(key) => key,
            None => return Value::error(format!("unusable as hash key: {}", key_value.kind())),
        };
        map.insert(key, (key_value, value));
    }
    Value::Hash(Rc::new(map))
}

fn eval_prefix_expression(op: PrefixOp, right: Value) -> Value {
    match op {
        PrefixOp::Bang => Value::Boolean(!right.is_truthy()),
        PrefixOp::Minus => match right {
            Value::Integer(i) => Value::Integer(i.wrapping_neg()),
            other => Value::error(format!("unknown operator: -{}", other.kind())),
        },
        PrefixOp::Increment => match right {
            Value::Integer(i) => Value::Integer(i.wrapping_add(1)),
            other => Value::error(format!("unknown operator: ++{}", other.kind())),
        },
        PrefixOp::Decrement => match right {
            Value::Integer(i) => Value::Integer(i.wrapping_sub(1)),
            other => Value::error(format!("unknown operator: --{}", other.kind())),
        },
    }
}

fn eval_infix_expression(op: InfixOp, left: Value, right: Value) -> Value {
    if let (Value::Integer(l), Value::Integer(r)) = (&left, &right) {
        return eval_integer_infix(op, *l, *r);
    }
    if matches!(op, InfixOp::Eq | InfixOp::NotEq) {
        let equal = values_identical(&left, &right);
        return Value::Boolean(if matches!(op, InfixOp::Eq) { equal } else { !equal });
    }
    if let (Value::String(l), Value::String(r)) = (&left, &right) {
        return match op {
            InfixOp::Add => Value::string(format!("{l}{r}")),
            _ => Value::error(format!("unknown operator: {} {} {}", left.kind(), op, right.kind())),
        };
    }
    if left.kind() != right.kind() {
        return Value::error(format!("type mismatch: {} {} {}", left.kind(), op, right.kind()));
    }
    Value::error(format!("unknown operator: {} {} {}", left.kind(), op, right.kind()))
}

fn eval_integer_infix(op: InfixOp, l: i64, r: i64) -> Value {
    match op {
        InfixOp::Add => Value::Integer(l.wrapping_add(r)),
        InfixOp::Sub => Value::Integer(l.wrapping_sub(r)),
        InfixOp::Mul => Value::Integer(l.wrapping_mul(r)),
        InfixOp::Div => {
            if r == 0 {
                Value::error("division by zero")
            } else {
                Value::Integer(l.wrapping_div(r))
            }
        }
        InfixOp::Lt => Value::Boolean(l < r),
        InfixOp::Gt => Value::Boolean(l > r),
        InfixOp::Le => Value::Boolean(l <= r),
        InfixOp::Ge => Value::Boolean(l >= r),
        InfixOp::Eq => Value::Boolean(l == r),
        InfixOp::NotEq => Value::Boolean(l != r),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(items), Value::Integer(i)) => {
            if *i >= 0 && (*i as usize) < items.len() {
                items[*i as usize].clone()
            } else {
                Value::Null
            }
        }
        (Value::Hash(pairs), _) => match hash_key(&index) {
            Some(key) => pairs.get(&key).map(|(_, v)| v.clone()).unwrap_or(Value::Null),
            None => Value::error(format!("unusable as hash key: {}", index.kind())),
        },
        _ => Value::error(format!("index operator not supported: {}", left.kind())),
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &Block,
    alternative: Option<&Block>,
    env: &Rc<RefCell<Environment>>,
) -> Value {
    let condition = eval_expression(condition, env);
    if condition.is_error() {
        return condition;
    }
    if condition.is_truthy() {
        eval_block(consequence, env)
    } else if let Some(alternative) = alternative {
        eval_block(alternative, env)
    } else {
        Value::error("else branch must be present when if condition is false")
    }
}

/// `init`/`post` run in the loop's own enclosing environment, not a
/// per-iteration scope. Blocks never introduce scope in this language, so
/// neither does a `for` loop's header.
fn eval_for_expression(
    init: Option<&Statement>,
    condition: &Expression,
    post: Option<&Statement>,
    body: &Block,
    env: &Rc<RefCell<Environment>>,
) -> Value {
    if let Some(init) = init {
        let result = eval_statement(init, env);
        if result.is_error() {
            return result;
        }
    }
    loop {
        let condition_value = eval_expression(condition, env);
        if condition_value.is_error() {
            return condition_value;
        }
        if !condition_value.is_truthy() {
            break;
        }
        let result = eval_block(body, env);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
        if let Some(post) = post {
            let result = eval_statement(post, env);
            if result.is_error() {
                return result;
            }
        }
    }
    Value::Null
}

fn eval_call_expression(
    function_expr: &Expression,
    argument_exprs: &[Expression],
    env: &Rc<RefCell<Environment>>,
) -> Value {
    let function = eval_expression(function_expr, env);
    if function.is_error() {
        return function;
    }
    let mut arguments = Vec::with_capacity(argument_exprs.len());
    for arg_expr in argument_exprs {
        let value = eval_expression(arg_expr, env);
        if value.is_error() {
            return value;
        }
        arguments.push(value);
    }
    apply_function(function, &arguments)
}

/// Applies a `Value` as a function to already-evaluated arguments. Shared
/// by call-expression evaluation and anything else (the REPL, tests) that
/// needs to invoke a `Value::Function`/`Value::Builtin` directly.
pub fn apply_function(function: Value, args: &[Value]) -> Value {
    match function {
        Value::Function(f) => {
            let call_env = Environment::enclosed(f.env.clone());
            {
                let mut call_env_mut = call_env.borrow_mut();
                for (param, arg) in f.parameters.iter().zip(args.iter()) {
                    call_env_mut.bind(param.name, arg.clone());
                }
            }
            match eval_block(&f.body, &call_env) {
                Value::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(func) => func(args),
        other => Value::error(format!("not a function: {}", other.kind())),
    }
}
