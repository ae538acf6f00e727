//! Tree‑walking evaluator.
//!
//! Statements return a [`Completion`] instead of unwinding: `return` and
//! `break` travel up the call chain as values and are consumed at the call
//! frame and at the loop / switch boundary respectively.  Errors travel in
//! the `Err` side and always carry the token of the failing operation.

use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::corelib::NATIVES;
use crate::environment::{self, EnvRef, Environment};
use crate::error::RuntimeError;
use crate::expr::{Affix, Expr, ExprId, LiteralValue};
use crate::resolver::Bindings;
use crate::stmt::{Stmt, SwitchCase};
use crate::system::System;
use crate::token::{Token, TokenType};
use crate::value::{ArrayRef, Fields, Function, StructRef, Value};

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum Completion {
    Normal,
    Return(Value),
    Break,
}

/// A writable location: the target of `op=`, `++` and `--`.
enum Place<'e> {
    Variable { id: ExprId, name: &'e Token },
    Element { items: ArrayRef, index: usize },
    Property { fields: StructRef, key: String },
}

pub struct Interpreter<S: System> {
    globals: EnvRef,
    environment: EnvRef,
    bindings: Bindings,
    system: S,
}

impl<S: System> Interpreter<S> {
    /// Creates a new Interpreter with the native library installed.
    pub fn new(system: S) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = global_environment();

        Self {
            environment: Rc::clone(&globals),
            globals,
            bindings: Bindings::new(),
            system,
        }
    }

    /// Drop all program state: fresh globals, no bindings.
    pub fn reset(&mut self) {
        debug!("Resetting interpreter state");

        self.globals = global_environment();
        self.environment = Rc::clone(&self.globals);
        self.bindings.clear();
    }

    /// Merge the resolver's output for the statements about to run.
    pub fn add_bindings(&mut self, bindings: Bindings) {
        self.bindings.extend(bindings);
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut S {
        &mut self.system
    }

    pub fn into_system(self) -> S {
        self.system
    }

    /// Value of a global variable, if defined.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }

    /// Interprets a list of statements (a "program").
    pub fn interpret(&mut self, statements: &[Stmt]) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            // The resolver rejects top-level `return` / `break`.
            self.execute(stmt)?;
        }

        info!("Interpretation completed successfully");

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Completion> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.system.log(&value.to_string());
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Defining variable '{}'", name.lexeme);

                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment)).into_ref();

                return self.execute_block(statements, scope);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_stmt) = else_branch {
                    return self.execute(else_stmt);
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Completion::Normal => {}
                        Completion::Break => break,
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                }
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);

                // Capture the scope active *now*, not at call time.
                let function = Value::Function(Rc::new(Function {
                    declaration: Rc::clone(decl),
                    closure: Rc::clone(&self.environment),
                }));

                self.environment
                    .borrow_mut()
                    .define(&decl.name.lexeme, function);
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                return Ok(Completion::Return(value));
            }

            Stmt::Break { .. } => return Ok(Completion::Break),

            Stmt::Switch {
                subject,
                cases,
                default,
                ..
            } => return self.execute_switch(subject, cases, default.as_deref()),
        }

        Ok(Completion::Normal)
    }

    /// Run `statements` with `scope` as the current environment.  The
    /// previous environment is restored on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> IResult<Completion> {
        let previous: EnvRef = mem::replace(&mut self.environment, scope);

        let result = self.execute_all(statements);

        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> IResult<Completion> {
        for stmt in statements {
            match self.execute(stmt)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }

        Ok(Completion::Normal)
    }

    /// C‑style switch: once a case matches, every following case body runs
    /// too until a `break`.  `default` runs only when nothing matched.
    fn execute_switch(
        &mut self,
        subject: &Expr,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> IResult<Completion> {
        let subject: Value = self.evaluate(subject)?;
        let mut matched = false;

        for case in cases {
            if !matched {
                for candidate in &case.matches {
                    if self.evaluate(candidate)?.is_identical(&subject) {
                        matched = true;
                        break;
                    }
                }
            }

            if matched {
                debug!("Switch executing case body");

                match self.execute_clause(&case.body)? {
                    Completion::Normal => {}
                    Completion::Break => return Ok(Completion::Normal),
                    ret @ Completion::Return(_) => return Ok(ret),
                }
            }
        }

        if !matched {
            if let Some(body) = default {
                if let ret @ Completion::Return(_) = self.execute_clause(body)? {
                    return Ok(ret);
                }
            }
        }

        Ok(Completion::Normal)
    }

    fn execute_clause(&mut self, body: &[Stmt]) -> IResult<Completion> {
        let scope = Environment::with_enclosing(Rc::clone(&self.environment)).into_ref();

        self.execute_block(body, scope)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                self.assign_variable(*id, name, value.clone())?;
                Ok(value)
            }

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match operator.token_type {
                    TokenType::MINUS => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
                    },
                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(RuntimeError::new(operator, "Invalid unary operator.")),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                binary_op(operator, &operator.token_type, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuit = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    values.push(self.evaluate(arg)?);
                }

                self.call(callee, paren, values)
            }

            Expr::AssignOperator {
                target,
                operator,
                value,
            } => {
                let place = self.place(target)?;
                let current = self.read_place(&place, operator)?;
                let rhs = self.evaluate(value)?;

                let kind = match operator.token_type {
                    TokenType::PLUS_EQUAL => TokenType::PLUS,
                    TokenType::MINUS_EQUAL => TokenType::MINUS,
                    TokenType::STAR_EQUAL => TokenType::STAR,
                    _ => TokenType::SLASH,
                };

                let result = binary_op(operator, &kind, current, rhs)?;
                self.write_place(place, result.clone(), operator)?;

                Ok(result)
            }

            Expr::UnaryOperator {
                target,
                operator,
                affix,
            } => {
                let place = self.place(target)?;

                let old = match self.read_place(&place, operator)? {
                    Value::Number(n) => n,
                    _ => return Err(RuntimeError::new(operator, "Operand must be a number.")),
                };

                let new = if operator.token_type == TokenType::PLUS_PLUS {
                    old + 1.0
                } else {
                    old - 1.0
                };

                self.write_place(place, Value::Number(new), operator)?;

                Ok(Value::Number(match affix {
                    Affix::Prefix => new,
                    Affix::Postfix => old,
                }))
            }

            Expr::Array(elements) => {
                let mut items: Vec<Value> = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.evaluate(element)?);
                }

                Ok(Value::array(items))
            }

            Expr::Struct(properties) => {
                let mut fields = Fields::new();
                for property in properties {
                    let value = self.evaluate(&property.value)?;
                    fields.insert(property.name(), value);
                }

                Ok(Value::structure(fields))
            }

            Expr::Get { object, token, key } => {
                let object = self.evaluate(object)?;
                let key = self.evaluate(key)?;

                match object {
                    Value::Array(items) => {
                        let items = items.borrow();
                        let index = array_index(&key, items.len(), token)?;

                        Ok(items[index].clone())
                    }
                    Value::Struct(fields) => {
                        let key = struct_key(&key, token)?;
                        let value = fields.borrow().get(&key).cloned();

                        value.ok_or_else(|| undefined_property(token, &key))
                    }
                    _ => Err(RuntimeError::new(
                        token,
                        "Only arrays and structs can be indexed.",
                    )),
                }
            }

            Expr::Set {
                object,
                token,
                key,
                value,
            } => {
                let object = self.evaluate(object)?;
                let key = self.evaluate(key)?;
                let value = self.evaluate(value)?;

                match object {
                    Value::Array(items) => {
                        let mut items = items.borrow_mut();
                        let index = array_index(&key, items.len(), token)?;
                        items[index] = value.clone();
                    }
                    Value::Struct(fields) => {
                        let key = struct_key(&key, token)?;
                        fields.borrow_mut().insert(&key, value.clone());
                    }
                    _ => {
                        return Err(RuntimeError::new(
                            token,
                            "Only arrays and structs can be indexed.",
                        ))
                    }
                }

                Ok(value)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Variables and places
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolved locals are read exactly `distance` scopes up; everything else
    /// comes from the globals.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> IResult<Value> {
        let value = match self.bindings.get(&id) {
            Some(distance) => environment::get_at(&self.environment, *distance, &name.lexeme),
            None => self.globals.borrow().get(&name.lexeme),
        };

        value.ok_or_else(|| RuntimeError::new(name, "Variable not found."))
    }

    fn assign_variable(&mut self, id: ExprId, name: &Token, value: Value) -> IResult<()> {
        let assigned = match self.bindings.get(&id) {
            Some(distance) => {
                environment::assign_at(&self.environment, *distance, &name.lexeme, value)
            }
            None => self.globals.borrow_mut().assign(&name.lexeme, value),
        };

        if !assigned {
            return Err(RuntimeError::new(name, "Variable not found."));
        }

        Ok(())
    }

    /// Locate the storage `target` refers to, checking container kind,
    /// bounds and key presence.
    fn place<'e>(&mut self, target: &'e Expr) -> IResult<Place<'e>> {
        match target {
            Expr::Variable { id, name } => Ok(Place::Variable { id: *id, name }),

            Expr::Get { object, token, key } => {
                let object = self.evaluate(object)?;
                let key = self.evaluate(key)?;

                match object {
                    Value::Array(items) => {
                        let index = array_index(&key, items.borrow().len(), token)?;

                        Ok(Place::Element { items, index })
                    }
                    Value::Struct(fields) => {
                        let key = struct_key(&key, token)?;

                        if !fields.borrow().contains(&key) {
                            return Err(undefined_property(token, &key));
                        }

                        Ok(Place::Property { fields, key })
                    }
                    _ => Err(RuntimeError::new(
                        token,
                        "Only arrays and structs can be indexed.",
                    )),
                }
            }

            // The parser only builds assignable targets.
            _ => Err(RuntimeError::new(
                &Token::new(TokenType::EOF, "", 0, 0),
                "Invalid assignment target.",
            )),
        }
    }

    fn read_place(&self, place: &Place<'_>, token: &Token) -> IResult<Value> {
        match place {
            Place::Variable { id, name } => self.look_up_variable(*id, name),
            Place::Element { items, index } => items
                .borrow()
                .get(*index)
                .cloned()
                .ok_or_else(|| RuntimeError::new(token, "Index out of bounds.")),
            Place::Property { fields, key } => fields
                .borrow()
                .get(key)
                .cloned()
                .ok_or_else(|| undefined_property(token, key)),
        }
    }

    /// Write back; the container may have changed while the right-hand side
    /// was evaluated, so bounds are checked again.
    fn write_place(&mut self, place: Place<'_>, value: Value, token: &Token) -> IResult<()> {
        match place {
            Place::Variable { id, name } => self.assign_variable(id, name, value),
            Place::Element { items, index } => match items.borrow_mut().get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(RuntimeError::new(token, "Index out of bounds.")),
            },
            Place::Property { fields, key } => {
                fields.borrow_mut().insert(&key, value);
                Ok(())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    /// Invokes a callable (native or user-defined function).
    fn call(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> IResult<Value> {
        match callee {
            Value::NativeFunction(native) => {
                debug!("Calling native function '{}'", native.name);

                (native.func)(&mut self.system, &arguments)
                    .map_err(|e| RuntimeError::new(paren, e.message))
            }

            Value::Function(function) => {
                debug!("Calling user-defined function '{}'", function.name());

                if arguments.len() != function.arity() {
                    return Err(RuntimeError::new(
                        paren,
                        format!(
                            "Expected {} arguments but got {}.",
                            function.arity(),
                            arguments.len()
                        ),
                    ));
                }

                // The new frame hangs off the closure, not the caller.
                let mut frame = Environment::with_enclosing(Rc::clone(&function.closure));
                for (param, value) in function.declaration.params.iter().zip(arguments) {
                    frame.define(&param.lexeme, value);
                }

                match self.execute_block(&function.declaration.body, frame.into_ref())? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Nil),
                }
            }

            _ => Err(RuntimeError::new(paren, "Can only call functions.")),
        }
    }
}

/// Globals with every native installed.
fn global_environment() -> EnvRef {
    let mut globals = Environment::new();

    for native in NATIVES {
        globals.define(native.name, Value::NativeFunction(*native));
    }

    debug!("Installed {} native functions", NATIVES.len());

    globals.into_ref()
}

/// Arithmetic, comparison and equality.  `kind` is passed separately so
/// compound assignment can reuse this with its own operator token.
fn binary_op(operator: &Token, kind: &TokenType, left: Value, right: Value) -> IResult<Value> {
    use Value::{Number, String as Str};

    let numbers_only = || RuntimeError::new(operator, "Operands must be numbers.");
    let comparable = || RuntimeError::new(operator, "Operands must be two numbers or two strings.");

    match kind {
        TokenType::PLUS => match (left, right) {
            (Number(a), Number(b)) => Ok(Number(a + b)),
            (Str(a), Str(b)) => Ok(Str(a + &b)),
            _ => Err(RuntimeError::new(
                operator,
                "Operands must be numbers or strings.",
            )),
        },

        TokenType::MINUS | TokenType::STAR | TokenType::SLASH => match (left, right) {
            (Number(a), Number(b)) => Ok(Number(match kind {
                TokenType::MINUS => a - b,
                TokenType::STAR => a * b,
                _ => a / b,
            })),
            _ => Err(numbers_only()),
        },

        TokenType::GREATER | TokenType::GREATER_EQUAL | TokenType::LESS | TokenType::LESS_EQUAL => {
            let ordering = match (&left, &right) {
                (Number(a), Number(b)) => a.partial_cmp(b),
                (Str(a), Str(b)) => Some(a.cmp(b)),
                _ => return Err(comparable()),
            };

            // NaN compares false with everything.
            let result = ordering.is_some_and(|ordering| match kind {
                TokenType::GREATER => ordering.is_gt(),
                TokenType::GREATER_EQUAL => ordering.is_ge(),
                TokenType::LESS => ordering.is_lt(),
                _ => ordering.is_le(),
            });

            Ok(Value::Bool(result))
        }

        TokenType::EQUAL_EQUAL => Ok(Value::Bool(left.is_identical(&right))),
        TokenType::BANG_EQUAL => Ok(Value::Bool(!left.is_identical(&right))),

        _ => Err(RuntimeError::new(operator, "Invalid binary operator.")),
    }
}

fn array_index(key: &Value, length: usize, token: &Token) -> IResult<usize> {
    match key {
        Value::Number(n) if n.fract() != 0.0 || !n.is_finite() => {
            Err(RuntimeError::new(token, "Index must be an integer."))
        }
        Value::Number(n) if *n < 0.0 || *n as usize >= length => {
            Err(RuntimeError::new(token, "Index out of bounds."))
        }
        Value::Number(n) => Ok(*n as usize),
        _ => Err(RuntimeError::new(token, "Array index must be a number.")),
    }
}

fn struct_key(key: &Value, token: &Token) -> IResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        _ => Err(RuntimeError::new(token, "Property key must be a string.")),
    }
}

fn undefined_property(token: &Token, key: &str) -> RuntimeError {
    RuntimeError::new(token, format!("Undefined property '{}'.", key))
}
