use crate::expr::{Affix, Expr, LiteralValue};
use crate::stmt::{Stmt, SwitchCase};

/// Renders the tree in parenthesised prefix form, one top-level statement
/// per line.  Used by the `parse` command.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_program(statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(Self::print_stmt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", Self::print(expr)),

            Stmt::Print(expr) => format!("(print {})", Self::print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, Self::print(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => Self::group("block", statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_stmt) => format!(
                    "(if {} {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch),
                    Self::print_stmt(else_stmt)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print(condition),
                    Self::print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => {
                format!("(while {} {})", Self::print(condition), Self::print_stmt(body))
            }

            Stmt::Function(decl) => {
                let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();

                format!(
                    "(fun {} ({}) {})",
                    decl.name.lexeme,
                    params.join(" "),
                    Self::group("block", &decl.body)
                )
            }

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("(return {})", Self::print(expr)),
                None => "(return)".into(),
            },

            Stmt::Break { .. } => "(break)".into(),

            Stmt::Switch {
                subject,
                cases,
                default,
                ..
            } => {
                let mut s = format!("(switch {}", Self::print(subject));

                for SwitchCase { matches, body } in cases {
                    let matchers: Vec<String> = matches.iter().map(Self::print).collect();
                    s.push(' ');
                    s.push_str(&Self::group(&format!("case {}", matchers.join(" ")), body));
                }

                if let Some(body) = default {
                    s.push(' ');
                    s.push_str(&Self::group("default", body));
                }

                s.push(')');
                s
            }
        }
    }

    pub fn print(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(lit) => match lit {
                LiteralValue::Bool(b) => b.to_string(),

                LiteralValue::Nil => "nil".into(),

                LiteralValue::Str(s) => s.clone(),

                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
            },

            Expr::Grouping(inner) => format!("(group {})", Self::print(inner)),

            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                format!("(= {} {})", name.lexeme, Self::print(value))
            }

            Expr::AssignOperator {
                target,
                operator,
                value,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::print(target),
                Self::print(value)
            ),

            Expr::UnaryOperator {
                target,
                operator,
                affix,
            } => match affix {
                Affix::Prefix => format!("({} {})", operator.lexeme, Self::print(target)),
                Affix::Postfix => format!("({} {} post)", operator.lexeme, Self::print(target)),
            },

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut s = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&Self::print(arg));
                }
                s.push(')');
                s
            }

            Expr::Array(elements) => {
                let mut s = String::from("(array");
                for element in elements {
                    s.push(' ');
                    s.push_str(&Self::print(element));
                }
                s.push(')');
                s
            }

            Expr::Struct(properties) => {
                let mut s = String::from("(struct");
                for property in properties {
                    s.push_str(&format!(" ({} {})", property.name(), Self::print(&property.value)));
                }
                s.push(')');
                s
            }

            Expr::Get { object, key, .. } => {
                format!("(get {} {})", Self::print(object), Self::print(key))
            }

            Expr::Set {
                object, key, value, ..
            } => format!(
                "(set {} {} {})",
                Self::print(object),
                Self::print(key),
                Self::print(value)
            ),
        }
    }

    fn group(name: &str, statements: &[Stmt]) -> String {
        let mut s = format!("({}", name);
        for stmt in statements {
            s.push(' ');
            s.push_str(&Self::print_stmt(stmt));
        }
        s.push(')');
        s
    }
}
