//! Centralised error hierarchy for the **Quill interpreter**.
//!
//! Every pipeline stage reports failure through its own error type so a host
//! can tell *where* a program was rejected:
//!
//! | Stage       | Type             | Carries                               |
//! |-------------|------------------|---------------------------------------|
//! | scanner     | [`LexerError`]   | tokens scanned before the failure     |
//! | parser      | [`ParserError`]  | offending token                       |
//! | resolver    | [`ResolverError`]| offending token                       |
//! | interpreter | [`RuntimeError`] | token of the failing operation / call |
//! | natives     | [`CoreLibError`] | message only; rewrapped at call site  |
//!
//! [`QuillError`] unifies the user-visible ones behind the crate `Result<T>`
//! alias.  The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Scan-time failure.  `tokens` holds everything recognised before the bad
/// input so a caller can still highlight up to the failure point.
#[derive(Debug, Clone, Error)]
#[error("[line {line}] Error: {message}")]
pub struct LexerError {
    pub message: String,

    /// 1‑based line where the error occurred.
    pub line: usize,

    /// Byte offset of the offending character.
    pub offset: usize,

    /// Byte length of the offending lexeme.
    pub length: usize,

    pub tokens: Vec<Token>,
}

/// Syntax error.  Parsing stops at the first one.
#[derive(Debug, Clone, Error)]
#[error("[line {}] Error at '{}': {}", .token.line, .token.lexeme, .message)]
pub struct ParserError {
    pub message: String,
    pub token: Token,
}

/// Static scope violation found before execution.
#[derive(Debug, Clone, Error)]
#[error("[line {}] Error at '{}': {}", .token.line, .token.lexeme, .message)]
pub struct ResolverError {
    pub message: String,
    pub token: Token,
}

/// Failure while executing a program.
#[derive(Debug, Clone, Error)]
#[error("[line {}] Runtime error: {}", .token.line, .message)]
pub struct RuntimeError {
    pub message: String,
    pub token: Token,
}

/// Contract violation inside a native function.  Never leaves the
/// interpreter: the call site turns it into a [`RuntimeError`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CoreLibError {
    pub message: String,
}

impl LexerError {
    pub fn new<S: Into<String>>(
        line: usize,
        offset: usize,
        length: usize,
        msg: S,
        tokens: Vec<Token>,
    ) -> Self {
        let message: String = msg.into();

        info!("Creating Lexer error: line={}, msg={}", line, message);

        Self {
            message,
            line,
            offset,
            length,
            tokens,
        }
    }
}

impl ParserError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        Self {
            message,
            token: token.clone(),
        }
    }
}

impl ResolverError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        Self {
            message,
            token: token.clone(),
        }
    }
}

impl RuntimeError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", token.line, message);

        Self {
            message,
            token: token.clone(),
        }
    }
}

impl CoreLibError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Canonical error type returned by the pipeline entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuillError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl QuillError {
    /// The token the error points at, if the stage recorded one.
    pub fn token(&self) -> Option<&Token> {
        match self {
            QuillError::Parser(e) => Some(&e.token),
            QuillError::Resolver(e) => Some(&e.token),
            QuillError::Runtime(e) => Some(&e.token),
            _ => None,
        }
    }

    /// Source span `(start, length)` in bytes for highlighting.
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            QuillError::Lexer(e) => Some((e.offset, e.length)),
            _ => self.token().map(|t| (t.start, t.length)),
        }
    }

    /// Whether the program was rejected before it started running.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            QuillError::Lexer(_) | QuillError::Parser(_) | QuillError::Resolver(_)
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, QuillError>;
