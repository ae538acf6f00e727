//! Static resolver pass for the **Quill** interpreter.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of maps tracking declared/defined names),
//!    mirroring exactly the environments the interpreter will create.
//! 2. Report static errors: redeclaration, reading a local in its own
//!    initializer, `return` outside a function, `break` outside a loop or
//!    switch, wrong argument counts for known functions, and calls on values
//!    that can never be callable.
//! 3. Record, for *each* variable occurrence, how many environments up its
//!    declaration lives.  Occurrences with no entry are globals.
//!
//! The resolver never evaluates anything.

use std::collections::HashMap;

use crate::error::ResolverError;
use crate::expr::{Expr, ExprId};
use crate::stmt::{FunctionDecl, Stmt, SwitchCase};
use crate::token::Token;
use log::{debug, info};

/// Expression id → number of `enclosing` hops to the declaring environment.
pub type Bindings = HashMap<ExprId, usize>;

/// Resolver result alias.
pub type RResult<T> = std::result::Result<T, ResolverError>;

/// Are we inside a user function?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
}

/// What the resolver knows about a name in one scope.
#[derive(Copy, Clone, Debug)]
struct Binding {
    /// `false` between `declare` and `define`.
    defined: bool,

    /// Parameter count while the name still holds the function it was
    /// declared with.
    arity: Option<usize>,
}

/// Resolver: tracks scopes, enforces static rules, and records binding
/// distances for the interpreter.
pub struct Resolver {
    scopes: Vec<HashMap<String, Binding>>,
    globals: HashMap<String, Binding>,
    bindings: Bindings,
    current_function: FunctionType,
    /// Number of enclosing loops/switches inside the current function.
    breakable: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: Vec::new(),
            globals: HashMap::new(),
            bindings: Bindings::new(),
            current_function: FunctionType::None,
            breakable: 0,
        }
    }

    /// Walk all top‑level statements and hand back the binding map.
    pub fn resolve(mut self, statements: &[Stmt]) -> RResult<Bindings> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements)?;

        info!("Resolved {} local binding(s)", self.bindings.len());

        Ok(self.bindings)
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) -> RResult<()> {
        for stmt in statements {
            self.resolve_stmt(stmt)?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) -> RResult<()> {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                let result = self.resolve_stmts(statements);
                self.end_scope();
                result?;
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define
                self.declare(name)?;
                if let Some(expr) = initializer {
                    self.resolve_expr(expr)?;
                }
                self.define(name, None);
            }

            Stmt::Function(decl) => {
                // the name is visible *inside* its own body
                self.declare(&decl.name)?;
                self.define(&decl.name, Some(decl.params.len()));
                self.resolve_function(decl)?;
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr)?;
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition)?;
                self.resolve_stmt(then_branch)?;
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb)?;
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition)?;

                self.breakable += 1;
                let result = self.resolve_stmt(body);
                self.breakable -= 1;
                result?;
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    return Err(ResolverError::new(
                        keyword,
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(expr) = value {
                    self.resolve_expr(expr)?;
                }
            }

            Stmt::Break { keyword } => {
                if self.breakable == 0 {
                    return Err(ResolverError::new(
                        keyword,
                        "Can't break outside of a loop or switch.",
                    ));
                }
            }

            Stmt::Switch {
                subject,
                cases,
                default,
                ..
            } => {
                self.resolve_expr(subject)?;

                self.breakable += 1;
                let result = self.resolve_switch_clauses(cases, default.as_deref());
                self.breakable -= 1;
                result?;
            }
        }

        Ok(())
    }

    /// Each clause body is its own scope, like a block.
    fn resolve_switch_clauses(
        &mut self,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> RResult<()> {
        for case in cases {
            for matcher in &case.matches {
                self.resolve_expr(matcher)?;
            }

            self.begin_scope();
            let result = self.resolve_stmts(&case.body);
            self.end_scope();
            result?;
        }

        if let Some(body) = default {
            self.begin_scope();
            let result = self.resolve_stmts(body);
            self.end_scope();
            result?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) -> RResult<()> {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(inner)?,

            Expr::Unary { right, .. } => self.resolve_expr(right)?,

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)?;
            }

            Expr::Variable { id, name } => {
                // At top level an undefined name falls through to the global
                // it shadows, which may already hold a value.
                if let Some(binding) = self.scopes.last().and_then(|s| s.get(&name.lexeme)) {
                    if !binding.defined {
                        return Err(ResolverError::new(
                            name,
                            "Can't read local variable in its own initializer.",
                        ));
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                self.resolve_expr(value)?;
                self.resolve_local(*id, name);
                self.forget_arity(name);
            }

            Expr::AssignOperator { target, value, .. } => {
                self.resolve_expr(value)?;
                self.resolve_target(target)?;
            }

            Expr::UnaryOperator { target, .. } => self.resolve_target(target)?,

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                self.resolve_expr(callee)?;
                for arg in arguments {
                    self.resolve_expr(arg)?;
                }
                self.check_call(callee, paren, arguments.len())?;
            }

            Expr::Array(elements) => {
                for element in elements {
                    self.resolve_expr(element)?;
                }
            }

            Expr::Struct(properties) => {
                for property in properties {
                    self.resolve_expr(&property.value)?;
                }
            }

            Expr::Get { object, key, .. } => {
                self.resolve_expr(object)?;
                self.resolve_expr(key)?;
            }

            Expr::Set {
                object, key, value, ..
            } => {
                self.resolve_expr(object)?;
                self.resolve_expr(key)?;
                self.resolve_expr(value)?;
            }
        }

        Ok(())
    }

    /// Target of `op=` / `++` / `--`: a variable or a `Get`.
    fn resolve_target(&mut self, target: &Expr) -> RResult<()> {
        self.resolve_expr(target)?;

        if let Expr::Variable { name, .. } = target {
            self.forget_arity(name);
        }

        Ok(())
    }

    /// Static call checks: literals are never callable, and a name still
    /// bound to a known function must get exactly its parameter count.
    fn check_call(&self, callee: &Expr, paren: &Token, argc: usize) -> RResult<()> {
        let mut callee = callee;
        while let Expr::Grouping(inner) = callee {
            callee = inner;
        }

        match callee {
            Expr::Literal(_) | Expr::Array(_) | Expr::Struct(_) => {
                Err(ResolverError::new(paren, "Can only call functions."))
            }

            Expr::Variable { name, .. } => match self.lookup(&name.lexeme).and_then(|b| b.arity) {
                Some(arity) if arity != argc => Err(ResolverError::new(
                    paren,
                    format!("Expected {} arguments but got {}.", arity, argc),
                )),
                _ => Ok(()),
            },

            _ => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.  `break` does
    /// not reach through a function boundary.
    fn resolve_function(&mut self, decl: &FunctionDecl) -> RResult<()> {
        let enclosing_function = self.current_function;
        let enclosing_breakable = self.breakable;
        self.current_function = FunctionType::Function;
        self.breakable = 0;

        self.begin_scope();
        let result = self.resolve_params_and_body(decl);
        self.end_scope();

        self.current_function = enclosing_function;
        self.breakable = enclosing_breakable;

        result
    }

    fn resolve_params_and_body(&mut self, decl: &FunctionDecl) -> RResult<()> {
        for param in &decl.params {
            self.declare(param)?;
            self.define(param, None);
        }

        self.resolve_stmts(&decl.body)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// The scope new declarations land in: the innermost block, or the
    /// global table at top level.
    fn innermost_mut(&mut self) -> &mut HashMap<String, Binding> {
        match self.scopes.last_mut() {
            Some(scope) => scope,
            None => &mut self.globals,
        }
    }

    fn declare(&mut self, name: &Token) -> RResult<()> {
        let scope = self.innermost_mut();

        if scope.contains_key(&name.lexeme) {
            return Err(ResolverError::new(
                name,
                format!("Variable '{}' already declared in this scope.", name.lexeme),
            ));
        }

        scope.insert(
            name.lexeme.clone(),
            Binding {
                defined: false,
                arity: None,
            },
        );

        Ok(())
    }

    fn define(&mut self, name: &Token, arity: Option<usize>) {
        self.innermost_mut().insert(
            name.lexeme.clone(),
            Binding {
                defined: true,
                arity,
            },
        );
    }

    fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// After an assignment the name may hold anything.
    fn forget_arity(&mut self, name: &Token) {
        let scope = self
            .scopes
            .iter_mut()
            .rev()
            .find(|scope| scope.contains_key(&name.lexeme));

        let binding = match scope {
            Some(scope) => scope.get_mut(&name.lexeme),
            None => self.globals.get_mut(&name.lexeme),
        };

        if let Some(binding) = binding {
            binding.arity = None;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this variable occurrence as a local at depth `d`, or leave it
    /// unrecorded (global) if no local scope declares it.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.bindings.insert(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
