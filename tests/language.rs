use pretty_assertions::assert_eq;
use quill::{error::RuntimeError, get_output, host::MemoryHost, interpreter::session::Session};

fn run(src: &str) -> MemoryHost {
    let mut session = Session::new(MemoryHost::new());
    session.run_source(src);
    session.into_host()
}

fn assert_output(src: &str, expected: &str) {
    let host = run(src);
    assert_eq!(host.stderr(), "", "script reported errors:\n{src}");
    assert_eq!(host.stdout(), expected);
}

fn assert_error(src: &str, message: &str) {
    let host = run(src);
    assert!(host.stderr().contains(message),
            "expected '{message}' in:\n{}",
            host.stderr());
}

#[test]
fn assignment_and_say() {
    assert_output("x = 5\nsay x", "5\n");
    assert_output("x = \"hello world\"\nsay x", "hello world\n");
    assert_output("x = 2.5\ny = x\nsay y", "2.5\n");
    assert_output("say \"a\" 1 \"b\"", "a 1 b\n");
    assert_output("print 1\nprint 2", "12");
}

#[test]
fn compound_assignment() {
    assert_output("x = 10\nx += 5\nsay x", "15\n");
    assert_output("x = 10\nx -= 4\nsay x", "6\n");
    assert_output("x = 3\nx *= 3\nsay x", "9\n");
    assert_output("x = 9\nx /= 2\nsay x", "4.5\n");
    assert_output("x = 9\nx %= 4\nsay x", "1\n");
    assert_output("x = 2\nx ^= 3\nsay x", "8\n");
    assert_output("s = \"ab\"\ns += \"cd\"\nsay s", "abcd\n");
}

#[test]
fn folded_assignment() {
    assert_output("x = 2 + 3\nsay x", "5\n");
    assert_output("a = 4\nb = 6\nc = a * b\nsay c", "24\n");
    assert_output("s = \"ab\" + \"cd\"\nsay s", "abcd\n");
}

#[test]
fn stack_expressions() {
    assert_output("say (3 + 4 * 2)", "14\n");
    assert_output("x = (\"abcabc\" - \"bc\")\nsay x", "aabc\n");
    assert_output("say (\"ab\" * 3)", "ababab\n");
    assert_output("x = 4\nsay (x * -1)", "-4\n");
    assert_output("say ('it' + \"s\")", "its\n");
}

#[test]
fn undefined_bare_words_are_text_when_printed() {
    assert_output("say hello", "hello\n");
    assert_error("x = nothing", "Undefined variable 'nothing'.");
}

#[test]
fn semicolons_split_statements() {
    assert_output("a = 1; b = 2; say a b", "1 2\n");
    assert_output("say \"a;b\"", "a;b\n");
}

#[test]
fn comments_are_ignored() {
    assert_output("say 1 # trailing\n# whole line\nsay 2", "1\n2\n");
    assert_output("## opened here\nsay \"hidden\"\nclosed ##\nsay \"shown\"", "shown\n");
}

#[test]
fn var_declares_an_absent_value() {
    assert_output("var x\nx is_absent?", "true\n");
    assert_output("var x\nsay x \"|\"", " |\n");
}

#[test]
fn constants_are_write_once() {
    assert_output("const PI = 3.14\nsay PI", "3.14\n");
    assert_error("const PI = 3.14\nPI = 3", "'PI' is already defined.");
    assert_error("const PI = 3.14\nconst PI = 3", "'PI' is already defined.");
}

#[test]
fn lists() {
    assert_output("list L = (3, 1, 2)\nsay L[0] L.size L.last", "3 3 2\n");
    assert_output("list L = (a, \"b c\", 3)\nsay L[1]", "b c\n");
    assert_output("list L\nL += 1\nL += 2\nsay L.size L.first", "2 1\n");
    assert_output("list L = (1, 2, 1)\nL -= 1\nsay L[0] L[1]", "2 1\n");
    assert_output("list L = (1, 2)\nL[1] = 5\nsay L[1]", "5\n");
    assert_output("list A = (x, y)\nlist B = A\nA += \"z\"\nsay B.size A.size", "2 3\n");
}

#[test]
fn list_errors() {
    assert_error("list L = (1, 2)\nsay L[2]", "Index out of bounds: 2");
    assert_error("list L = (1, 2)\nsay L[-1]", "Index out of bounds: -1");
    assert_error("list L = (1)\nL -= 9", "'9' is not in list 'L'");
    assert_error("sort nope", "Undefined list 'nope'.");
}

#[test]
fn sort_reverse_and_revert() {
    assert_output("list L = (10, 9, 100)\nsort L\nsay L[0] L[1] L[2]", "9 10 100\n");
    assert_output("list L = (pear, apple, fig)\nsort L\nsay L[0] L[2]", "apple pear\n");
    assert_output("list L = (1, 2, 3)\nreverse L\nsay L[0]", "3\n");
    assert_output("list L = (3, 1, 2)\nsort L\nrevert L\nsay L[0] L[1] L[2]", "3 1 2\n");
    assert_error("list L = (1)\nrevert L", "no order to revert to");
}

#[test]
fn properties() {
    assert_output("name = \"quill\"\nsay name.length", "5\n");
    assert_output("const C = \"ab\"\nsay C.size", "2\n");
}

#[test]
fn inspection_predicates() {
    assert_output("x = 5\nx is_number?", "true\n");
    assert_output("x = \"5\"\nx is_number?", "true\n");
    assert_output("x = \"five\"\nx is_string?\nx is_number?", "true\nfalse\n");
    assert_output("x = 1\nx is_variable?\ny is_variable?", "true\nfalse\n");
    assert_output("list L\nL is_list?\nL is_variable?", "true\nfalse\n");
    assert_output("method m\nend\nm is_method?", "true\n");
    assert_error("x = 1\nx is_purple?", "Invalid operator 'is_purple?'.");
}

#[test]
fn remove_lock_and_clear() {
    assert_output("x = 1\nremove x\nx is_variable?", "false\n");
    assert_error("x = 1\nlock x\nremove x", "'x' is locked");
    assert_output("x = 1\nlock x\nunlock x\nremove x\nx is_variable?", "false\n");
    assert_output("a = 1\nb = 2\nlock a\nclear_variables!\na is_variable?\nb is_variable?",
                  "true\nfalse\n");
    assert_output("list L\nx = 1\nclear_all!\nL is_list?\nx is_variable?", "false\nfalse\n");
    assert_error("const K = 1\nremove K", "constant 'K' cannot be removed");
    assert_error("remove ghost", "Undefined variable 'ghost'.");
}

#[test]
fn listings_are_sorted() {
    assert_output("b = 2\na = 1\nvariables", "a = 1\nb = 2\n");
    assert_output("list Z = (1)\nlist A = (2, 3)\nlists", "A = (2, 3)\nZ = (1)\n");
    assert_output("method zed\nend\nmethod alpha\nend\nmethods", "alpha\nzed\n");
}

#[test]
fn errors_are_reported_with_line_numbers_and_do_not_stop_the_script() {
    let host = run("say 1\nx = (1 / 0)\nsay 2");
    assert_eq!(host.stdout(), "1\n2\n");
    assert_eq!(host.stderr(), "Error on line 2: Division by zero.\n");
}

#[test]
fn exit_code_is_the_last_error_code() {
    let mut session = Session::new(MemoryHost::new());
    assert_eq!(session.run_source("say (1 / 0)"), RuntimeError::DivideByZero.code());

    let mut session = Session::new(MemoryHost::new());
    assert_eq!(session.run_source("say 1"), 0);
}

#[test]
fn expression_statement_sets_last_value() {
    let mut session = Session::new(MemoryHost::new());
    session.execute_source("(6 * 7)");
    assert_eq!(session.last_value().to_string(), "42");
}

#[test]
fn block_comments_carry_across_execute_source_calls() {
    let mut session = Session::new(MemoryHost::new());
    session.execute_source("## start");
    session.execute_source("say \"hidden\"");
    session.execute_source("end ## say \"after\"");
    assert_eq!(session.host().stdout(), "after\n");
}

#[test]
fn sessions_are_independent() {
    let mut first = Session::new(MemoryHost::new());
    let mut second = Session::new(MemoryHost::new());
    first.execute_source("x = 1");
    second.execute_source("x = 2");
    assert_eq!(first.value("x").map(ToString::to_string), Some("1".to_string()));
    assert_eq!(second.value("x").map(ToString::to_string), Some("2".to_string()));
}

#[test]
fn defined_arguments_survive_clears() {
    let mut session = Session::new(MemoryHost::new());
    session.define_argument("mode", "fast");
    session.run_source("clear_all!\nsay mode");
    assert_eq!(session.host().stdout(), "fast\n");
}

#[test]
fn get_output_runs_a_fresh_session() {
    assert_eq!(get_output("say (1 + 1)"), "2\n");
}
