//! Quill: a small dynamically typed scripting language.
//!
//! The pipeline is `source → Scanner → Parser → Resolver → Interpreter`.
//! Every stage stops at its first error.  All host interaction goes through
//! the [`system::System`] trait, so the same program runs against a terminal
//! ([`system::StdSystem`]) or a scripted test double
//! ([`system::ScriptedSystem`]).

pub mod ast_printer;
pub mod corelib;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod system;
pub mod token;
pub mod value;

use log::info;

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::{Bindings, Resolver};
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use crate::system::System;

/// A parsed program.  Can be resolved and run any number of times; every run
/// starts from fresh globals.
#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<Stmt>,
}

impl Program {
    /// Scan and parse `source`.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = Scanner::new(source).scan_tokens()?;
        let statements = Parser::new(&tokens).parse()?;

        info!("Parsed program with {} statements", statements.len());

        Ok(Self { statements })
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    /// Static checks.  Returns the binding distance of every resolved local.
    pub fn resolve(&self) -> Result<Bindings> {
        Ok(Resolver::new().resolve(&self.statements)?)
    }

    /// Resolve, reset `interpreter` and execute.  Output produced before a
    /// runtime error stays with the interpreter's system.
    pub fn run_in<S: System>(&self, interpreter: &mut Interpreter<S>) -> Result<()> {
        let bindings = self.resolve()?;

        interpreter.reset();
        interpreter.add_bindings(bindings);
        interpreter.interpret(&self.statements)?;

        Ok(())
    }

    /// Run against `system` and hand it back when the program finishes.
    pub fn run<S: System>(&self, system: S) -> Result<S> {
        let mut interpreter = Interpreter::new(system);
        self.run_in(&mut interpreter)?;

        Ok(interpreter.into_system())
    }
}

/// Parse, resolve and run `source` in one go.
pub fn run<S: System>(source: &str, system: S) -> Result<S> {
    Program::parse(source)?.run(system)
}

/// Incremental evaluation for the REPL: globals persist between inputs and
/// expression ids keep counting so earlier bindings stay valid.
pub struct Session<S: System> {
    interpreter: Interpreter<S>,
    next_id: usize,
}

impl<S: System> Session<S> {
    pub fn new(system: S) -> Self {
        Self {
            interpreter: Interpreter::new(system),
            next_id: 0,
        }
    }

    /// Evaluate one chunk of input against the session state.
    pub fn eval(&mut self, source: &str) -> Result<()> {
        let tokens = Scanner::new(source).scan_tokens()?;

        let mut parser = Parser::with_id_base(&tokens, self.next_id);
        let statements = parser.parse()?;
        self.next_id = parser.next_id();

        let bindings = Resolver::new().resolve(&statements)?;
        self.interpreter.add_bindings(bindings);
        self.interpreter.interpret(&statements)?;

        Ok(())
    }

    pub fn system(&self) -> &S {
        self.interpreter.system()
    }

    pub fn system_mut(&mut self) -> &mut S {
        self.interpreter.system_mut()
    }
}
