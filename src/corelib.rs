//! Native function library installed into every interpreter's globals.
//!
//! Each native receives the host [`System`] and its evaluated arguments,
//! checks their shape itself, and reports violations as [`CoreLibError`].
//! The interpreter attaches the call-site token before the error leaves it.

use std::time::Duration;

use log::debug;

use crate::error::CoreLibError;
use crate::system::System;
use crate::value::{ArrayRef, NativeFunction, Value};

type NResult = Result<Value, CoreLibError>;

/// Every native, by the global name it is installed under.
pub const NATIVES: &[NativeFunction] = &[
    NativeFunction { name: "now", func: now },
    NativeFunction { name: "output", func: output },
    NativeFunction { name: "input", func: input },
    NativeFunction { name: "clear", func: clear },
    NativeFunction { name: "sleep", func: sleep },
    NativeFunction { name: "string", func: string },
    NativeFunction { name: "number", func: number },
    NativeFunction { name: "int", func: int },
    NativeFunction { name: "boolean", func: boolean },
    NativeFunction { name: "abs", func: abs },
    NativeFunction { name: "floor", func: floor },
    NativeFunction { name: "round", func: round },
    NativeFunction { name: "sqrt", func: sqrt },
    NativeFunction { name: "len", func: len },
    NativeFunction { name: "push", func: push },
    NativeFunction { name: "pop", func: pop },
    NativeFunction { name: "shift", func: shift },
    NativeFunction { name: "unshift", func: unshift },
    NativeFunction { name: "insert", func: insert },
    NativeFunction { name: "remove", func: remove },
    NativeFunction { name: "indexOf", func: index_of },
    NativeFunction { name: "copy", func: copy },
    NativeFunction { name: "slice", func: slice },
    NativeFunction { name: "keys", func: keys },
];

// ─────────────────────────────────────────────────────────────────────────────
// Argument checks
// ─────────────────────────────────────────────────────────────────────────────

fn expect_args(args: &[Value], count: usize) -> Result<(), CoreLibError> {
    if args.len() != count {
        return Err(CoreLibError::new(format!(
            "Expected {} arguments but got {}.",
            count,
            args.len()
        )));
    }

    Ok(())
}

fn expect_at_least(args: &[Value], count: usize) -> Result<(), CoreLibError> {
    if args.len() < count {
        return Err(CoreLibError::new(format!(
            "Expected at least {} arguments but got {}.",
            count,
            args.len()
        )));
    }

    Ok(())
}

fn expect_array(value: &Value) -> Result<&ArrayRef, CoreLibError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CoreLibError::new("Expected array.")),
    }
}

fn expect_number(value: &Value) -> Result<f64, CoreLibError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(CoreLibError::new("Expected number.")),
    }
}

fn expect_integer(value: &Value) -> Result<i64, CoreLibError> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        Value::Number(_) => Err(CoreLibError::new("Index must be an integer.")),
        _ => Err(CoreLibError::new("Expected number.")),
    }
}

/// An index in `0..=limit`.
fn expect_index(value: &Value, limit: usize) -> Result<usize, CoreLibError> {
    let index = expect_integer(value)?;

    if index < 0 || index as usize > limit {
        return Err(CoreLibError::new("Index out of bounds."));
    }

    Ok(index as usize)
}

// ─────────────────────────────────────────────────────────────────────────────
// Host I/O
// ─────────────────────────────────────────────────────────────────────────────

fn now(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 0)?;

    Ok(Value::Number(chrono::Utc::now().timestamp_millis() as f64))
}

fn output(sys: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    sys.log(&args[0].to_string());

    Ok(Value::Nil)
}

fn input(sys: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 0)?;

    let line = sys
        .input()
        .map_err(|e| CoreLibError::new(format!("Input failed: {}", e)))?;

    debug!("input() resumed with {} bytes", line.len());

    Ok(Value::String(line))
}

fn clear(sys: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 0)?;

    sys.clear();

    Ok(Value::Nil)
}

fn sleep(sys: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    let millis = expect_number(&args[0])?;
    if !millis.is_finite() || millis < 0.0 {
        return Err(CoreLibError::new("Expected a non-negative duration."));
    }

    let duration = Duration::try_from_secs_f64(millis / 1000.0)
        .map_err(|_| CoreLibError::new("Duration out of range."))?;
    sys.sleep(duration);

    Ok(Value::Nil)
}

// ─────────────────────────────────────────────────────────────────────────────
// Coercions
// ─────────────────────────────────────────────────────────────────────────────

fn string(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    match &args[0] {
        Value::Nil => Err(CoreLibError::new("Cannot convert nil to string.")),
        value => Ok(Value::String(value.to_string())),
    }
}

fn to_number(value: &Value) -> Result<f64, CoreLibError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreLibError::new(format!("Cannot convert '{}' to number.", s))),
        other => Err(CoreLibError::new(format!(
            "Cannot convert {} to number.",
            other.type_name()
        ))),
    }
}

fn number(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(to_number(&args[0])?))
}

fn int(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(to_number(&args[0])?.trunc()))
}

fn boolean(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Bool(args[0].is_truthy()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Math
// ─────────────────────────────────────────────────────────────────────────────

fn abs(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(expect_number(&args[0])?.abs()))
}

fn floor(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(expect_number(&args[0])?.floor()))
}

fn round(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(expect_number(&args[0])?.round()))
}

fn sqrt(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    Ok(Value::Number(expect_number(&args[0])?.sqrt()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequences
// ─────────────────────────────────────────────────────────────────────────────

fn len(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    match &args[0] {
        Value::Array(items) => Ok(Value::Number(items.borrow().len() as f64)),
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        _ => Err(CoreLibError::new("Expected array or string.")),
    }
}

/// `push(array, values...)` → new length.
fn push(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_at_least(args, 2)?;

    let items = expect_array(&args[0])?;
    let mut items = items.borrow_mut();
    items.extend(args[1..].iter().cloned());

    Ok(Value::Number(items.len() as f64))
}

/// `pop(array)` → removed last element, or nil when empty.
fn pop(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    let popped = expect_array(&args[0])?.borrow_mut().pop();

    Ok(popped.unwrap_or(Value::Nil))
}

/// `shift(array)` → removed first element, or nil when empty.
fn shift(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    let mut items = expect_array(&args[0])?.borrow_mut();
    if items.is_empty() {
        return Ok(Value::Nil);
    }

    Ok(items.remove(0))
}

/// `unshift(array, values...)` → new length; values keep their order.
fn unshift(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_at_least(args, 2)?;

    let mut items = expect_array(&args[0])?.borrow_mut();
    items.splice(0..0, args[1..].iter().cloned());

    Ok(Value::Number(items.len() as f64))
}

/// `insert(array, index, value)`; `index` may equal the length (append).
fn insert(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 3)?;

    let items = expect_array(&args[0])?;
    let length = items.borrow().len();
    let index = expect_index(&args[1], length)?;

    items.borrow_mut().insert(index, args[2].clone());

    Ok(Value::Nil)
}

/// `remove(array, index)` → the removed element.
fn remove(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 2)?;

    let items = expect_array(&args[0])?;
    let length = items.borrow().len();
    if length == 0 {
        return Err(CoreLibError::new("Index out of bounds."));
    }
    let index = expect_index(&args[1], length - 1)?;

    let removed = items.borrow_mut().remove(index);

    Ok(removed)
}

/// `indexOf(array, value)` → first identical element's index, or -1.
fn index_of(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 2)?;

    let position = expect_array(&args[0])?
        .borrow()
        .iter()
        .position(|item| item.is_identical(&args[1]));

    Ok(Value::Number(position.map_or(-1.0, |i| i as f64)))
}

/// Shallow clone that no longer aliases the original.
fn copy(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    match &args[0] {
        Value::Array(items) => Ok(Value::array(items.borrow().clone())),
        Value::Struct(fields) => Ok(Value::structure(fields.borrow().clone())),
        _ => Err(CoreLibError::new("Expected array or struct.")),
    }
}

/// `slice(seq, start, end)` with `end` nil meaning "to the end".
fn slice(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 3)?;

    match &args[0] {
        Value::Array(items) => {
            let items = items.borrow();
            let (start, end) = slice_bounds(&args[1], &args[2], items.len())?;

            Ok(Value::array(items[start..end].to_vec()))
        }
        Value::String(s) => {
            let (start, end) = slice_bounds(&args[1], &args[2], s.chars().count())?;
            let sliced: String = s.chars().skip(start).take(end - start).collect();

            Ok(Value::String(sliced))
        }
        _ => Err(CoreLibError::new("Expected array or string.")),
    }
}

fn slice_bounds(start: &Value, end: &Value, length: usize) -> Result<(usize, usize), CoreLibError> {
    let start = expect_index(start, length)?;
    let end = match end {
        Value::Nil => length,
        value => expect_index(value, length)?,
    };

    Ok((start, end.max(start)))
}

/// `keys(struct)` → property names in declaration order.
fn keys(_: &mut dyn System, args: &[Value]) -> NResult {
    expect_args(args, 1)?;

    match &args[0] {
        Value::Struct(fields) => {
            let names: Vec<Value> = fields.borrow().keys().map(Value::from).collect();

            Ok(Value::array(names))
        }
        _ => Err(CoreLibError::new("Expected struct.")),
    }
}
