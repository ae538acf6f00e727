#[cfg(test)]
mod corelib_tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use quill::error::QuillError;
    use quill::system::ScriptedSystem;

    fn run_with(source: &str, system: ScriptedSystem) -> Result<ScriptedSystem, QuillError> {
        quill::run(source, system)
    }

    fn output(source: &str) -> Vec<String> {
        match run_with(source, ScriptedSystem::new()) {
            Ok(system) => system.output().to_vec(),
            Err(e) => panic!("program failed: {}", e),
        }
    }

    fn runtime_error(source: &str) -> String {
        match run_with(source, ScriptedSystem::new()) {
            Err(QuillError::Runtime(e)) => e.message,
            Err(other) => panic!("expected a runtime error, got {}", other),
            Ok(_) => panic!("expected a runtime error"),
        }
    }

    #[test]
    fn test_corelib_01_output_and_input() {
        let system = ScriptedSystem::with_inputs(["Ada"]);
        let system = run_with(
            "output(\"name?\"); var name = input(); output(\"hi \" + name);",
            system,
        )
        .unwrap();

        assert_eq!(system.output(), ["name?", "hi Ada"]);
    }

    #[test]
    fn test_corelib_02_input_exhausted() {
        let message = runtime_error("input();");

        assert!(message.starts_with("Input failed"), "got: {}", message);
    }

    #[test]
    fn test_corelib_03_clear_and_sleep_reach_the_host() {
        let system = run_with("clear(); sleep(250); clear();", ScriptedSystem::new()).unwrap();

        assert_eq!(system.clears(), 2);
        assert_eq!(system.sleeps(), [Duration::from_millis(250)]);
    }

    #[test]
    fn test_corelib_04_sleep_rejects_negative() {
        assert_eq!(runtime_error("sleep(-1);"), "Expected a non-negative duration.");
        assert_eq!(runtime_error("sleep(number(\"1e300\"));"), "Duration out of range.");
    }

    #[test]
    fn test_corelib_05_now_is_a_number() {
        assert_eq!(output("print now() > 0;"), vec!["true"]);
    }

    #[test]
    fn test_corelib_06_conversions() {
        let source = r#"
            print string(12) + "!";
            print string([1, 2]);
            print number("3.5") + 1;
            print number(true);
            print int("7.9");
            print int(-2.5);
            print boolean(0);
            print boolean(nil);
        "#;

        assert_eq!(
            output(source),
            vec!["12!", "[1,2]", "4.5", "1", "7", "-2", "true", "false"]
        );
    }

    #[test]
    fn test_corelib_07_conversion_errors() {
        assert_eq!(runtime_error("string(nil);"), "Cannot convert nil to string.");
        assert_eq!(runtime_error("number(\"abc\");"), "Cannot convert 'abc' to number.");
        assert_eq!(runtime_error("number([]);"), "Cannot convert array to number.");
    }

    #[test]
    fn test_corelib_08_math() {
        assert_eq!(
            output("print abs(-3); print floor(2.7); print round(2.5); print sqrt(16);"),
            vec!["3", "2", "3", "4"]
        );
        assert_eq!(runtime_error("abs(\"x\");"), "Expected number.");
    }

    #[test]
    fn test_corelib_09_len() {
        assert_eq!(output("print len([1, 2, 3]); print len(\"héllo\");"), vec!["3", "5"]);
        assert_eq!(runtime_error("len(1);"), "Expected array or string.");
    }

    #[test]
    fn test_corelib_10_push_pop_shift_unshift() {
        let source = r#"
            var a = [2];
            print push(a, 3, 4);
            print unshift(a, 0, 1);
            print a;
            print pop(a);
            print shift(a);
            print a;
            var e = [];
            print pop(e);
            print shift(e);
        "#;

        assert_eq!(
            output(source),
            vec!["3", "5", "[0,1,2,3,4]", "4", "0", "[1,2,3]", "nil", "nil"]
        );
    }

    #[test]
    fn test_corelib_11_insert_and_remove() {
        let source = r#"
            var a = [1, 3];
            insert(a, 1, 2);
            insert(a, 3, 4);
            print a;
            print remove(a, 0);
            print a;
        "#;

        assert_eq!(output(source), vec!["[1,2,3,4]", "1", "[2,3,4]"]);
    }

    #[test]
    fn test_corelib_12_index_contract_violations() {
        assert_eq!(runtime_error("insert([], 1, -1);"), "Index out of bounds.");
        assert_eq!(runtime_error("insert(\"x\", 0, 1);"), "Expected array.");
        assert_eq!(runtime_error("insert([], 0.5, 1);"), "Index must be an integer.");
        assert_eq!(runtime_error("remove([], 0);"), "Index out of bounds.");
        assert_eq!(runtime_error("remove([1], 1);"), "Index out of bounds.");
    }

    #[test]
    fn test_corelib_13_index_of() {
        assert_eq!(
            output(
                "var a = [1, \"x\", 1]; print indexOf(a, 1); print indexOf(a, \"x\"); \
                 print indexOf(a, 9);"
            ),
            vec!["0", "1", "-1"]
        );
    }

    #[test]
    fn test_corelib_14_copy_struct() {
        let source = r#"
            var s = {a: 1};
            var t = copy(s);
            t.a = 2;
            print s.a;
            print t.a;
        "#;

        assert_eq!(output(source), vec!["1", "2"]);
    }

    #[test]
    fn test_corelib_15_slice() {
        let source = r#"
            var a = [1, 2, 3, 4];
            print slice(a, 1, 3);
            print slice(a, 2, nil);
            print slice(a, 3, 1);
            print slice("quill", 1, 3);
        "#;

        assert_eq!(output(source), vec!["[2,3]", "[3,4]", "[]", "ui"]);
        assert_eq!(runtime_error("slice([1], 0, 5);"), "Index out of bounds.");
    }

    #[test]
    fn test_corelib_16_keys() {
        assert_eq!(
            output("print keys({b: 1, a: 2});"),
            vec![r#"["b","a"]"#]
        );
        assert_eq!(runtime_error("keys([]);"), "Expected struct.");
    }

    #[test]
    fn test_corelib_17_native_arity() {
        assert_eq!(runtime_error("len();"), "Expected 1 arguments but got 0.");
        assert_eq!(runtime_error("push([]);"), "Expected at least 2 arguments but got 1.");
    }

    #[test]
    fn test_corelib_18_error_points_at_call() {
        match run_with("var a = [];\n\nremove(a, 0);", ScriptedSystem::new()) {
            Err(QuillError::Runtime(e)) => {
                assert_eq!(e.token.lexeme, ")");
                assert_eq!(e.token.line, 3);
            }
            _ => panic!("expected a runtime error"),
        }
    }

    #[test]
    fn test_corelib_19_natives_can_be_shadowed() {
        assert_eq!(output("fun len(x) { return 42; } print len([]);"), vec!["42"]);
    }
}
