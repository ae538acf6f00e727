#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use quill::error::QuillError;
    use quill::expr::ExprId;
    use quill::resolver::Bindings;
    use quill::Program;

    fn resolve(source: &str) -> Result<Bindings, QuillError> {
        Program::parse(source).unwrap().resolve()
    }

    fn resolve_error(source: &str) -> String {
        match resolve(source) {
            Err(QuillError::Resolver(e)) => e.message,
            other => panic!("expected a resolver error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolver_01_globals_are_unbound() {
        let bindings = resolve("var a = 1; print a;").unwrap();

        assert!(bindings.is_empty());
    }

    #[test]
    fn test_resolver_02_local_distances() {
        // ids: a(0) in the inner print, a(1) in the outer print
        let bindings = resolve("{ var a = 1; { print a; } print a; }").unwrap();

        assert_eq!(bindings.get(&ExprId(0)), Some(&1));
        assert_eq!(bindings.get(&ExprId(1)), Some(&0));
    }

    #[test]
    fn test_resolver_03_parameters_share_the_body_scope() {
        // ids: x(0)
        let bindings = resolve("fun f(x) { return x; }").unwrap();

        assert_eq!(bindings.get(&ExprId(0)), Some(&0));
    }

    #[test]
    fn test_resolver_04_self_reference_in_initializer() {
        assert_eq!(
            resolve_error("if (true) { var a = a + 1; }"),
            "Can't read local variable in its own initializer."
        );
    }

    #[test]
    fn test_resolver_05_redeclaration() {
        assert_eq!(
            resolve_error("{ var a = 1; var a = 2; }"),
            "Variable 'a' already declared in this scope."
        );
        assert_eq!(
            resolve_error("var a; fun a() {}"),
            "Variable 'a' already declared in this scope."
        );
        assert_eq!(
            resolve_error("fun f(a, a) {}"),
            "Variable 'a' already declared in this scope."
        );

        // Shadowing in an inner scope is fine.
        assert!(resolve("var a = 1; { var a = 2; }").is_ok());
    }

    #[test]
    fn test_resolver_06_return_outside_function() {
        assert_eq!(
            resolve_error("return 1;"),
            "Can't return from top-level code."
        );
        assert!(resolve("fun f() { if (true) return 1; }").is_ok());
    }

    #[test]
    fn test_resolver_07_break_placement() {
        assert_eq!(
            resolve_error("break;"),
            "Can't break outside of a loop or switch."
        );
        assert_eq!(
            resolve_error("while (true) { fun f() { break; } }"),
            "Can't break outside of a loop or switch."
        );

        assert!(resolve("while (true) { if (true) break; }").is_ok());
        assert!(resolve("for (;;) { break; }").is_ok());
        assert!(resolve("switch (1) { case 1: break; }").is_ok());
    }

    #[test]
    fn test_resolver_08_arity_of_known_functions() {
        assert_eq!(
            resolve_error("fun f(a, b) {} f(1);"),
            "Expected 2 arguments but got 1."
        );

        // Recursive calls see the function's own arity.
        assert_eq!(
            resolve_error("fun f(n) { return f(); }"),
            "Expected 1 arguments but got 0."
        );

        // After reassignment the name may hold anything.
        assert!(resolve("fun f(a) {} f = len; f(1);").is_ok());
    }

    #[test]
    fn test_resolver_09_literal_callee() {
        assert_eq!(resolve_error("\"text\"();"), "Can only call functions.");
        assert_eq!(resolve_error("(nil)();"), "Can only call functions.");
        assert_eq!(resolve_error("[1](0);"), "Can only call functions.");
    }

    #[test]
    fn test_resolver_10_switch_clauses_are_scoped() {
        let source = "
            switch (1) {
                case 1: var x = 1;
                case 2: var x = 2;
                default: var x = 3;
            }
        ";

        assert!(resolve(source).is_ok());
    }

    #[test]
    fn test_resolver_11_error_points_at_offending_token() {
        match resolve("{\n var a = 1;\n var a = 2;\n}") {
            Err(e @ QuillError::Resolver(_)) => {
                let token = e.token().unwrap();
                assert_eq!(token.lexeme, "a");
                assert_eq!(token.line, 3);
                assert!(e.is_static());
            }
            other => panic!("expected a resolver error, got {:?}", other),
        }
    }
}
