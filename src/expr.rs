use crate::token::{Token, TokenType};

/// Stable identity of a variable-referencing expression.
///
/// The parser hands these out from a counter; the resolver keys binding
/// distances on them, so two structurally equal expressions in different
/// places never share a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

/// A literal constant that appears directly in the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

/// Whether `++` / `--` was written before or after its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    Prefix,
    Postfix,
}

/// One `key: value` entry of a struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Token,
    pub value: Expr,
}

impl Property {
    /// The property name: identifier lexeme or string-literal contents.
    pub fn name(&self) -> &str {
        match &self.key.token_type {
            TokenType::STRING(s) => s,
            _ => &self.key.lexeme,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),

    Variable {
        id: ExprId,
        name: Token,
    },

    /// `!x`, `-x`
    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short‑circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Grouping(Box<Expr>),

    Call {
        callee: Box<Expr>,
        /// The closing `)` token, retained for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },

    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    /// `target op= value` where `target` is a variable or a `Get`.
    AssignOperator {
        target: Box<Expr>,
        operator: Token,
        value: Box<Expr>,
    },

    /// `++target`, `target--`, ...
    UnaryOperator {
        target: Box<Expr>,
        operator: Token,
        affix: Affix,
    },

    Array(Vec<Expr>),

    /// `object[key]` or `object.name`.  For the dot form `token` is the
    /// property name and `key` is a string literal of it; for the bracket
    /// form `token` is the `[`.
    Get {
        object: Box<Expr>,
        token: Token,
        key: Box<Expr>,
    },

    Set {
        object: Box<Expr>,
        token: Token,
        key: Box<Expr>,
        value: Box<Expr>,
    },

    Struct(Vec<Property>),
}

impl Expr {
    /// Can this expression be written to by `=`, `op=`, `++` or `--`?
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Variable { .. } | Expr::Get { .. })
    }
}
