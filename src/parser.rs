/*!
Time & Space Complexity — whole‑file overview
============================================

Definitions
-----------
* **n** = number of tokens (including the sole EOF).
* **m** = number of AST nodes (`m ≤ n` plus a constant per desugared `for`).

### Time

| Phase / function              | Cost           | Rationale                                   |
|-------------------------------|---------------:|---------------------------------------------|
| `Parser::parse` main loop     | Θ(n)           | Each token is consumed once via `advance()`.|
| Individual productions        | O(1) per token | Recursive descent, no backtracking.         |
| Struct duplicate‑key check    | O(k) per key   | Linear scan of the properties parsed so far.|

**Overall:** **Θ(n)** for ordinary programs.

### Space

| Structure                | Asymptotic | Notes                                               |
|--------------------------|-----------:|-----------------------------------------------------|
| Borrowed token slice     | O(n)       | Tokens are cloned only into the nodes that keep them.|
| AST (`Vec`, `Box`)       | O(m)       | One `Box` per interior node.                        |

Call‑stack depth grows with syntactic nesting.

### Error policy

The first syntax error aborts the parse.  There is no synchronisation and no
multi‑error reporting: the [`ParserError`] carries the offending token.

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------------------------------------------------

```text
program        → declaration* EOF ;
declaration    → funDecl | varDecl | statement ;
funDecl        → "fun" IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | printStmt | whileStmt | forStmt | ifStmt
               | block | returnStmt | breakStmt | switchStmt ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
switchStmt     → "switch" "(" expression ")" "{" switchClause+ "}" ;
switchClause   → "case" expression ( "," expression )* ":" declaration*
               | "default" ":" declaration* ;
breakStmt      → "break" ";" ;
block          → "{" declaration* "}" ;
expression     → assignment ;
assignment     → ( call "." IDENT | call "[" expression "]" | IDENT ) "=" assignment
               | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ( ( "-=" | "+=" ) assignment )? ;
factor         → unary ( ( "/" | "*" ) unary )* ( ( "/=" | "*=" ) assignment )? ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" | "[" expression "]" | "." IDENT )*
                 ( "++" | "--" )? ;
primary        → NUMBER | STRING | "true" | "false" | "nil" | IDENT
               | "(" expression ")" | "[" arguments? "]"
               | "{" ( property ( "," property )* )? "}"
               | ( "++" | "--" ) call ;
property       → ( IDENT | STRING ) ":" expression ;
```

`for` loops are desugared here into `{ init; while (cond) { body; incr; } }`.
*/

use std::iter;
use std::rc::Rc;

use crate::error::ParserError;
use crate::expr::{Affix, Expr, ExprId, LiteralValue, Property};
use crate::stmt::{FunctionDecl, Stmt, SwitchCase};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Parser result alias.
pub type PResult<T> = std::result::Result<T, ParserError>;

const MAX_ARGUMENTS: usize = 255;

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    next_id: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_id_base(tokens, 0)
    }

    /// Construct a parser whose expression ids start at `base`.  Used when
    /// several inputs share one binding map (REPL sessions).
    pub fn with_id_base(tokens: &'a [Token], base: usize) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            next_id: base,
        }
    }

    /// The first id not handed out yet.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement list.
    pub fn parse(&mut self) -> PResult<Vec<Stmt>> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        if self.tokens.is_empty() {
            return Ok(statements);
        }

        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        info!("Parsed {} statements", statements.len());

        Ok(statements)
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> PResult<Stmt> {
        debug!("Entering declaration at line {}", self.peek().line);

        if self.matches(TokenType::FUN) {
            self.function()
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn function(&mut self) -> PResult<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expected function name")?;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after function name")?;

        let mut params: Vec<Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    return Err(ParserError::new(
                        self.peek(),
                        "Cannot have more than 255 parameters",
                    ));
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expected parameter name")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(TokenType::LEFT_BRACE, "Expected '{' before function body")?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn var_declaration(&mut self) -> PResult<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expected variable name")?;

        let initializer: Option<Expr> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> PResult<Stmt> {
        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::BREAK) {
            self.break_statement()
        } else if self.matches(TokenType::SWITCH) {
            self.switch_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `for (init; cond; incr) body` becomes
    /// `{ init; while (cond) { body...; incr; } }`.  The increment joins the
    /// body's own block, so it runs in that block's scope.
    fn for_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'for'")?;

        let initializer: Option<Stmt> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition")?;

        let increment: Option<Expr> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses")?;

        let mut body: Stmt = self.statement()?;

        if let Some(increment) = increment {
            body = match body {
                Stmt::Block(mut statements) => {
                    statements.push(Stmt::Expression(increment));
                    Stmt::Block(statements)
                }
                other => Stmt::Block(vec![other, Stmt::Expression(increment)]),
            };
        }

        let condition: Expr = condition.unwrap_or(Expr::Literal(LiteralValue::Bool(true)));

        let while_loop = Stmt::While {
            condition,
            body: Box::new(body),
        };

        Ok(Stmt::Block(
            initializer.into_iter().chain(iter::once(while_loop)).collect(),
        ))
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;
        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> PResult<Stmt> {
        let keyword: Token = self.previous().clone();
        let value: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn break_statement(&mut self) -> PResult<Stmt> {
        let keyword: Token = self.previous().clone();

        self.consume(TokenType::SEMICOLON, "Expected ';' after 'break'")?;

        Ok(Stmt::Break { keyword })
    }

    fn switch_statement(&mut self) -> PResult<Stmt> {
        let keyword: Token = self.previous().clone();

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'switch'")?;
        let subject: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after switch value")?;
        self.consume(TokenType::LEFT_BRACE, "Expected '{' before switch body")?;

        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut default: Option<Vec<Stmt>> = None;

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if self.matches(TokenType::CASE) {
                let mut matches: Vec<Expr> = vec![self.expression()?];

                while self.matches(TokenType::COMMA) {
                    matches.push(self.expression()?);
                }

                self.consume(TokenType::COLON, "Expected ':' after case value")?;

                let body: Vec<Stmt> = self.clause_body()?;
                cases.push(SwitchCase { matches, body });
            } else if self.matches(TokenType::DEFAULT) {
                if default.is_some() {
                    return Err(ParserError::new(
                        self.previous(),
                        "Multiple default clauses in switch.",
                    ));
                }

                self.consume(TokenType::COLON, "Expected ':' after 'default'")?;

                default = Some(self.clause_body()?);
            } else {
                return Err(ParserError::new(
                    self.peek(),
                    "Expected 'case' or 'default' in switch body",
                ));
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after switch body")?;

        if cases.is_empty() && default.is_none() {
            return Err(ParserError::new(
                &keyword,
                "Switch must have at least one case or default.",
            ));
        }

        Ok(Stmt::Switch {
            keyword,
            subject,
            cases,
            default,
        })
    }

    /// Statements of a `case` / `default` clause, up to the next clause.
    fn clause_body(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::CASE)
            && !self.check(TokenType::DEFAULT)
            && !self.check(TokenType::RIGHT_BRACE)
            && !self.is_at_end()
        {
            statements.push(self.declaration()?);
        }

        Ok(statements)
    }

    fn print_statement(&mut self) -> PResult<Stmt> {
        let value: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> PResult<Stmt> {
        let expr: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    fn block(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;

        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> PResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let expr: Expr = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token = self.previous().clone();
            let value: Box<Expr> = Box::new(self.assignment()?);

            return match expr {
                Expr::Variable { id, name } => Ok(Expr::Assign { id, name, value }),

                Expr::Get { object, token, key } => Ok(Expr::Set {
                    object,
                    token,
                    key,
                    value,
                }),

                _ => Err(ParserError::new(&equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;

            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.factor()?;

        loop {
            if self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
                let operator: Token = self.previous().clone();
                let right: Expr = self.factor()?;

                expr = binary(expr, operator, right);
            } else if self.check(TokenType::PLUS_EQUAL) || self.check(TokenType::MINUS_EQUAL) {
                return self.compound_assignment(expr);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.unary()?;

        loop {
            if self.matches(TokenType::STAR) || self.matches(TokenType::SLASH) {
                let operator: Token = self.previous().clone();
                let right: Expr = self.unary()?;

                expr = binary(expr, operator, right);
            } else if self.check(TokenType::STAR_EQUAL) || self.check(TokenType::SLASH_EQUAL) {
                return self.compound_assignment(expr);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// `target op= value`; the operator token is the current one.
    fn compound_assignment(&mut self, target: Expr) -> PResult<Expr> {
        let operator: Token = self.advance().clone();

        if !target.is_assignable() {
            return Err(ParserError::new(
                &operator,
                "Invalid compound assignment target.",
            ));
        }

        let value: Expr = self.assignment()?;

        Ok(Expr::AssignOperator {
            target: Box::new(target),
            operator,
            value: Box::new(value),
        })
    }

    fn unary(&mut self) -> PResult<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> PResult<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::LEFT_BRACKET) {
                let token: Token = self.previous().clone();
                let key: Expr = self.expression()?;

                self.consume(TokenType::RIGHT_BRACKET, "Expected ']' after index")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    token,
                    key: Box::new(key),
                };
            } else if self.matches(TokenType::DOT) {
                let name: Token =
                    self.consume(TokenType::IDENTIFIER, "Expected property name after '.'")?;
                let key = Expr::Literal(LiteralValue::Str(name.lexeme.clone()));

                expr = Expr::Get {
                    object: Box::new(expr),
                    token: name,
                    key: Box::new(key),
                };
            } else {
                break;
            }
        }

        if self.matches(TokenType::PLUS_PLUS) || self.matches(TokenType::MINUS_MINUS) {
            let operator: Token = self.previous().clone();

            return step_operator(expr, operator, Affix::Postfix);
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> PResult<Expr> {
        let arguments: Vec<Expr> = self.arguments(TokenType::RIGHT_PAREN)?;
        let paren: Token = self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    /// Comma‑separated expressions up to (not including) `close`.
    fn arguments(&mut self, close: TokenType) -> PResult<Vec<Expr>> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(close) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    return Err(ParserError::new(
                        self.peek(),
                        "Cannot have more than 255 arguments",
                    ));
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        Ok(arguments)
    }

    fn primary(&mut self) -> PResult<Expr> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if let TokenType::NUMBER(n) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Number(n)));
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            let s: String = s.clone();
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Str(s)));
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: Token = self.previous().clone();
            let id: ExprId = self.fresh_id();

            return Ok(Expr::Variable { id, name });
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        if self.matches(TokenType::LEFT_BRACKET) {
            let elements: Vec<Expr> = self.arguments(TokenType::RIGHT_BRACKET)?;

            self.consume(TokenType::RIGHT_BRACKET, "Expected ']' after array elements")?;

            return Ok(Expr::Array(elements));
        }

        if self.matches(TokenType::LEFT_BRACE) {
            return self.struct_literal();
        }

        if self.matches(TokenType::PLUS_PLUS) || self.matches(TokenType::MINUS_MINUS) {
            let operator: Token = self.previous().clone();
            let target: Expr = self.call()?;

            return step_operator(target, operator, Affix::Prefix);
        }

        Err(ParserError::new(self.peek(), "Expected expression"))
    }

    fn struct_literal(&mut self) -> PResult<Expr> {
        let mut properties: Vec<Property> = Vec::new();

        if !self.check(TokenType::RIGHT_BRACE) {
            loop {
                let key: Token = if self.check(TokenType::IDENTIFIER)
                    || self.check(TokenType::STRING(String::new()))
                {
                    self.advance().clone()
                } else {
                    return Err(ParserError::new(self.peek(), "Expected property name"));
                };

                self.consume(TokenType::COLON, "Expected ':' after property name")?;

                let property = Property {
                    key,
                    value: self.expression()?,
                };

                if properties.iter().any(|p| p.name() == property.name()) {
                    return Err(ParserError::new(
                        &property.key,
                        format!("Duplicate property '{}' in struct.", property.name()),
                    ));
                }

                properties.push(property);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after struct properties")?;

        Ok(Expr::Struct(properties))
    }

    // ────────────────────── utility helpers ───────────────────────

    fn fresh_id(&mut self) -> ExprId {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> PResult<Token> {
        if self.check(ttype) {
            return Ok(self.advance().clone());
        }

        debug!("consume failed at '{}': {}", self.peek().lexeme, message);

        Err(ParserError::new(self.peek(), message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    /// Current token; a token stream without EOF is treated as ending at its
    /// last token.
    #[inline(always)]
    fn peek(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.current.min(tokens.len() - 1)]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.current.saturating_sub(1)]
    }
}

fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

/// Build a `++` / `--` node, rejecting targets that cannot be written.
fn step_operator(target: Expr, operator: Token, affix: Affix) -> PResult<Expr> {
    if !target.is_assignable() {
        let message = if operator.token_type == TokenType::PLUS_PLUS {
            "Invalid increment target."
        } else {
            "Invalid decrement target."
        };

        return Err(ParserError::new(&operator, message));
    }

    Ok(Expr::UnaryOperator {
        target: Box::new(target),
        operator,
        affix,
    })
}
