#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use quill::error::QuillError;
    use quill::interpreter::Interpreter;
    use quill::system::ScriptedSystem;
    use quill::value::Value;
    use quill::{Program, Session};

    /// Run `source` and return what it printed plus how it ended.
    fn run(source: &str) -> (Vec<String>, Result<(), QuillError>) {
        let program = Program::parse(source).unwrap();
        let mut interpreter = Interpreter::new(ScriptedSystem::new());
        let result = program.run_in(&mut interpreter);

        (interpreter.system().output().to_vec(), result)
    }

    fn output(source: &str) -> Vec<String> {
        let (output, result) = run(source);

        if let Err(e) = result {
            panic!("program failed: {}", e);
        }

        output
    }

    fn runtime_error(source: &str) -> String {
        match run(source).1 {
            Err(QuillError::Runtime(e)) => e.message,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpreter_01_arithmetic() {
        assert_eq!(output("print 5 * (6 + 1);"), vec!["35"]);
        assert_eq!(output("print 5 + 11;"), vec!["16"]);
        assert_eq!(
            output("print 7 / 2; print -3; print 0.1 + 0.2 > 0.3;"),
            vec!["3.5", "-3", "true"]
        );
    }

    #[test]
    fn test_interpreter_02_division_by_zero_is_ieee() {
        assert_eq!(output("print 1 / 0; print -1 / 0;"), vec!["Infinity", "-Infinity"]);
    }

    #[test]
    fn test_interpreter_03_strings() {
        assert_eq!(output("print \"test\" + \"ab\";"), vec!["testab"]);
        assert_eq!(output("print \"a\" < \"b\"; print \"b\" <= \"a\";"), vec!["true", "false"]);
    }

    #[test]
    fn test_interpreter_04_operand_type_errors() {
        assert_eq!(runtime_error("print 1 + \"a\";"), "Operands must be numbers or strings.");
        assert_eq!(runtime_error("print \"a\" * 2;"), "Operands must be numbers.");
        assert_eq!(runtime_error("print -\"a\";"), "Operand must be a number.");
        assert_eq!(
            runtime_error("print 1 < \"a\";"),
            "Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn test_interpreter_05_truthiness() {
        let source = r#"
            if (0) print "zero";
            if ("") print "empty";
            if ([]) print "array";
            if (nil) print "nil"; else print "no nil";
            if (false) print "f"; else print "no false";
            print !0;
            print !nil;
        "#;

        assert_eq!(
            output(source),
            vec!["zero", "empty", "array", "no nil", "no false", "false", "true"]
        );
    }

    #[test]
    fn test_interpreter_06_logical_operators_return_operands() {
        assert_eq!(
            output("print nil or \"x\"; print 1 and 2; print false and missing();"),
            vec!["x", "2", "false"]
        );
    }

    #[test]
    fn test_interpreter_07_equality() {
        let source = r#"
            print 1 == 1;
            print "a" == "a";
            print nil == false;
            print 1 == "1";
            print [1] == [1];
            var a = [1];
            var b = a;
            print a == b;
            print a != b;
        "#;

        assert_eq!(
            output(source),
            vec!["true", "true", "false", "false", "false", "true", "false"]
        );
    }

    #[test]
    fn test_interpreter_08_block_scoping() {
        assert_eq!(
            output("var a = 1; { var a = 2; print a; } print a;"),
            vec!["2", "1"]
        );
        assert_eq!(runtime_error("{ var x = 1; } print x;"), "Variable not found.");
    }

    #[test]
    fn test_interpreter_09_closures() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var c = makeCounter();
            print c();
            print c();
            var d = makeCounter();
            print d();
        "#;

        assert_eq!(output(source), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_interpreter_10_closures_bind_statically() {
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(output(source), vec!["global", "global"]);
    }

    #[test]
    fn test_interpreter_11_recursion() {
        let source = r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(10);
        "#;

        assert_eq!(output(source), vec!["55"]);
    }

    #[test]
    fn test_interpreter_12_functions_as_values() {
        assert_eq!(
            output("fun f() {} print f(); print f; print len;"),
            vec!["nil", "<fn f>", "<native fn len>"]
        );
    }

    #[test]
    fn test_interpreter_13_runtime_call_errors() {
        assert_eq!(
            runtime_error("var f; fun g(a) {} f = g; f();"),
            "Expected 1 arguments but got 0."
        );
        assert_eq!(runtime_error("var x = 1; x();"), "Can only call functions.");
    }

    #[test]
    fn test_interpreter_14_loops_and_break() {
        assert_eq!(
            output("var i = 0; while (true) { i = i + 1; if (i == 3) break; } print i;"),
            vec!["3"]
        );
        assert_eq!(
            output("for (var i = 0; i < 3; i++) print i;"),
            vec!["0", "1", "2"]
        );

        // `break` leaves only the innermost loop.
        let source = r#"
            for (var i = 0; i < 2; i++) {
                for (var j = 0; j < 5; j++) {
                    if (j == 1) break;
                    print string(i) + ":" + string(j);
                }
            }
        "#;
        assert_eq!(output(source), vec!["0:0", "1:0"]);
    }

    #[test]
    fn test_interpreter_15_increment_and_decrement() {
        assert_eq!(output("var n = 1; print n++; print n;"), vec!["1", "2"]);
        assert_eq!(output("var n = 1; print --n;"), vec!["0"]);
        assert_eq!(output("var n = 5; print ++n; print n--; print n;"), vec!["6", "6", "5"]);
        assert_eq!(runtime_error("var s = \"a\"; s++;"), "Operand must be a number.");
    }

    #[test]
    fn test_interpreter_16_compound_assignment() {
        assert_eq!(
            output(
                "var s = \"a\"; s += \"b\"; print s; var x = 10; x -= 3; x *= 2; x /= 7; print x;"
            ),
            vec!["ab", "2"]
        );
        assert_eq!(output("var x = 1; print x += 4;"), vec!["5"]);
        assert_eq!(
            runtime_error("var x = 1; x += \"a\";"),
            "Operands must be numbers or strings."
        );
    }

    #[test]
    fn test_interpreter_17_arrays() {
        assert_eq!(
            output("var a = [1, 2, 3]; a[0] = 10; a[1] += 5; a[2]++; print a; print a[1];"),
            vec!["[10,7,4]", "7"]
        );
    }

    #[test]
    fn test_interpreter_18_array_aliasing_and_copy() {
        let source = r#"
            var a = [1];
            var b = a;
            push(b, 2);
            print a;
            var c = copy(a);
            push(c, 3);
            print a;
            print c;
        "#;

        assert_eq!(output(source), vec!["[1,2]", "[1,2]", "[1,2,3]"]);
    }

    #[test]
    fn test_interpreter_19_index_errors() {
        assert_eq!(runtime_error("var a = [1]; print a[1];"), "Index out of bounds.");
        assert_eq!(runtime_error("var a = [1]; print a[-1];"), "Index out of bounds.");
        assert_eq!(runtime_error("var a = [1]; print a[0.5];"), "Index must be an integer.");
        assert_eq!(runtime_error("var a = [1]; a[\"x\"] = 2;"), "Array index must be a number.");
        assert_eq!(
            runtime_error("var n = 1; print n[0];"),
            "Only arrays and structs can be indexed."
        );
    }

    #[test]
    fn test_interpreter_20_structs() {
        let source = r#"
            var s = {name: "q", "n": 1};
            print s.name;
            print s["n"];
            s.extra = true;
            print s;
            s.n += 1;
            print s.n;
        "#;

        assert_eq!(
            output(source),
            vec!["q", "1", r#"{"name":"q","n":1,"extra":true}"#, "2"]
        );
    }

    #[test]
    fn test_interpreter_21_missing_properties() {
        assert_eq!(runtime_error("var s = {}; print s.nope;"), "Undefined property 'nope'.");
        assert_eq!(runtime_error("var s = {}; s.count++;"), "Undefined property 'count'.");
        assert_eq!(runtime_error("var s = {}; s[1] = 2;"), "Property key must be a string.");
    }

    #[test]
    fn test_interpreter_22_nested_display() {
        assert_eq!(
            output("fun f() {} print [nil, \"s\", 1.5, f, {a: [true]}];"),
            vec![r#"[null,"s",1.5,"<fn f>",{"a":[true]}]"#]
        );
        assert_eq!(
            output("var a = []; push(a, a); print a;"),
            vec![r#"["[circular]"]"#]
        );
    }

    #[test]
    fn test_interpreter_23_switch_fallthrough() {
        let source = r#"
            fun describe(n) {
                switch (n) {
                    case 1:
                        print "one";
                    case 2, 3:
                        print "two or three";
                        break;
                    case 4:
                        print "four";
                    default:
                        print "other";
                }
            }
            describe(1);
            describe(3);
            describe(4);
            describe(9);
        "#;

        assert_eq!(
            output(source),
            vec!["one", "two or three", "two or three", "four", "other"]
        );
    }

    #[test]
    fn test_interpreter_24_switch_return_and_strings() {
        let source = r#"
            fun f(x) {
                switch (x) {
                    case "a": return 1;
                    default: return 2;
                }
            }
            print f("a");
            print f("b");
        "#;

        assert_eq!(output(source), vec!["1", "2"]);
    }

    #[test]
    fn test_interpreter_25_switch_subject_evaluated_once() {
        let source = r#"
            var n = 0;
            fun next() { n++; return n; }
            switch (next()) {
                case 0: print "zero";
                case 1: print "first";
            }
            print n;
        "#;

        assert_eq!(output(source), vec!["first", "1"]);
    }

    #[test]
    fn test_interpreter_26_output_before_runtime_error_is_kept() {
        let (output, result) = run("print 1;\nprint nil + 1;");

        assert_eq!(output, vec!["1"]);

        let err = result.unwrap_err();
        assert!(!err.is_static());
        assert_eq!(
            err.to_string(),
            "[line 2] Runtime error: Operands must be numbers or strings."
        );
    }

    #[test]
    fn test_interpreter_27_reruns_start_fresh() {
        let program = Program::parse("var a = 1; a = a + 1; print a;").unwrap();
        let mut interpreter = Interpreter::new(ScriptedSystem::new());

        program.run_in(&mut interpreter).unwrap();
        program.run_in(&mut interpreter).unwrap();

        assert_eq!(interpreter.system().output(), ["2", "2"]);
        assert_eq!(interpreter.global("a"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_interpreter_28_static_errors_run_nothing() {
        let (output, result) = run("print 1; return 2;");

        assert!(output.is_empty());
        assert!(matches!(result, Err(QuillError::Resolver(_))));
    }

    #[test]
    fn test_interpreter_29_session_keeps_state() {
        let mut session = Session::new(ScriptedSystem::new());

        session.eval("var a = 1;").unwrap();
        session.eval("fun f() { return a + 1; }").unwrap();
        session.eval("print f();").unwrap();
        session
            .eval("fun mk() { var x = 5; fun g() { return x; } return g; }")
            .unwrap();
        session.eval("print mk()();").unwrap();

        // Redeclaring a global on a later line is allowed.
        session.eval("var a = 10; print f();").unwrap();

        assert_eq!(session.system().output(), ["2", "5", "11"]);
    }

    #[test]
    fn test_interpreter_30_session_survives_errors() {
        let mut session = Session::new(ScriptedSystem::new());

        assert!(session.eval("print 1 +;").is_err());
        assert!(session.eval("print nope;").is_err());
        session.eval("print 3;").unwrap();

        assert_eq!(session.system().output(), ["3"]);
    }

    #[test]
    fn test_interpreter_31_run_entry_point() {
        let system = quill::run("print \"hi\";", ScriptedSystem::new()).unwrap();

        assert_eq!(system.output(), ["hi"]);
    }

    fn session_error(session: &mut Session<ScriptedSystem>, source: &str) -> String {
        match session.eval(source) {
            Err(QuillError::Runtime(e)) => e.message,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_interpreter_32_block_scope_restored_after_error() {
        let mut session = Session::new(ScriptedSystem::new());

        assert_eq!(
            session_error(&mut session, "{ var z = 1; print nope; }"),
            "Variable not found."
        );
        assert_eq!(
            session_error(&mut session, "var q = 2; print z;"),
            "Variable not found."
        );
        session.eval("print q;").unwrap();

        assert_eq!(session.system().output(), ["2"]);
    }

    #[test]
    fn test_interpreter_33_call_frame_restored_after_error() {
        let mut session = Session::new(ScriptedSystem::new());

        session.eval("fun boom() { var inner = 1; return nope; }").unwrap();
        assert_eq!(session_error(&mut session, "boom();"), "Variable not found.");
        assert_eq!(session_error(&mut session, "print inner;"), "Variable not found.");
        session.eval("var q = 3; print q;").unwrap();

        assert_eq!(session.system().output(), ["3"]);
    }

    #[test]
    fn test_interpreter_34_session_global_reads_its_previous_value() {
        let mut session = Session::new(ScriptedSystem::new());

        session.eval("var a = 1;").unwrap();
        session.eval("var a = a + 1; print a;").unwrap();

        assert_eq!(session.system().output(), ["2"]);
    }
}
