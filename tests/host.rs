use std::path::Path;

use pretty_assertions::assert_eq;
use quill::{host::MemoryHost, interpreter::session::Session};

fn run_with(host: MemoryHost, src: &str) -> MemoryHost {
    let mut session = Session::new(host);
    session.run_source(src);
    session.into_host()
}

fn assert_output(src: &str, expected: &str) {
    let host = run_with(MemoryHost::new(), src);
    assert_eq!(host.stderr(), "", "script reported errors:\n{src}");
    assert_eq!(host.stdout(), expected);
}

fn assert_error(src: &str, message: &str) {
    let host = run_with(MemoryHost::new(), src);
    assert!(host.stderr().contains(message),
            "expected '{message}' in:\n{}",
            host.stderr());
}

#[test]
fn file_operations() {
    let src = "\
mkdir data
cd data
write notes.txt \"hello\"
append notes.txt \"world\"
cat notes.txt
pwd
ls";
    let host = run_with(MemoryHost::new(), src);
    assert_eq!(host.stderr(), "");
    assert_eq!(host.stdout(), "hello\nworld\n/data\nnotes.txt\n");
    assert_eq!(host.file("/data/notes.txt"), Some("hello\nworld\n"));
}

#[test]
fn file_paths_may_come_from_variables() {
    let src = "\
name = \"out.txt\"
write name 42
cat name";
    assert_output(src, "42\n");
}

#[test]
fn touch_and_rm() {
    assert_output("touch a.txt\na.txt is_file?\nrm a.txt\na.txt is_file?", "true\nfalse\n");
    assert_error("touch a.txt\ntouch a.txt", "File 'a.txt' already exists.");
    assert_error("rm missing.txt", "File 'missing.txt' does not exist.");
    assert_error("cat missing.txt", "File 'missing.txt' does not exist.");
}

#[test]
fn directories() {
    assert_output("mkdir box\nbox is_dir?\nrmdir box\nbox is_dir?", "true\nfalse\n");
    assert_error("mkdir box\nmkdir box", "Directory 'box' already exists.");
    assert_error("cd nowhere", "Directory 'nowhere' does not exist.");
    assert_error("rmdir nowhere", "Directory 'nowhere' does not exist.");
}

#[test]
fn unknown_statements_go_to_the_shell() {
    let host = run_with(MemoryHost::new(), "git status\nfrobnicate\necho \"hi there\"");
    assert_eq!(host.stderr(), "");
    assert_eq!(host.commands(), ["git status", "frobnicate", "echo \"hi there\""]);
}

#[test]
fn ask_reads_from_the_host() {
    let host = MemoryHost::new().with_input(["Ada", "41"]);
    let host = run_with(host, "ask name\nask age\nsay \"hi\" name (age + 1)\nask more\nmore is_absent?");
    assert_eq!(host.stderr(), "");
    assert_eq!(host.stdout(), "hi Ada 42\ntrue\n");
}

#[test]
fn embedded_scripts_are_written_and_loaded() {
    let src = "\
__begin__ gen.ql
say \"from gen\"
if 1
	say \"nested\"
endif
__end__
load gen.ql";
    let host = run_with(MemoryHost::new(), src);
    assert_eq!(host.stderr(), "");
    assert_eq!(host.file("gen.ql"), Some("say \"from gen\"\nif 1\nsay \"nested\"\nendif\n"));
    assert_eq!(host.stdout(), "from gen\nnested\n");
}

#[test]
fn loaded_scripts_share_the_session() {
    let host = MemoryHost::new().with_file("lib.ql", "method twice(v)\n\treturn (v * 2)\nend");
    let host = run_with(host, "load lib.ql\nsay twice(21)");
    assert_eq!(host.stderr(), "");
    assert_eq!(host.stdout(), "42\n");
}

#[test]
fn run_script_sets_arguments() {
    let host = MemoryHost::new().with_file("main.ql", "say args[0] args[1] args.size");
    let mut session = Session::new(host);
    let code = session.run_script(Path::new("main.ql"), &["alpha".to_string()]);
    assert_eq!(code, Ok(0));
    assert_eq!(session.host().stdout(), "main.ql alpha 2\n");
}

#[test]
fn run_script_fails_for_missing_files() {
    let mut session = Session::new(MemoryHost::new());
    assert!(session.run_script(Path::new("nope.ql"), &[]).is_err());
}

#[test]
fn repl_reads_until_exit() {
    let host = MemoryHost::new().with_input(["x = 2", "say (x * 3)", "exit 4", "say \"never\""]);
    let mut session = Session::new(host);
    assert_eq!(session.repl(), 4);
    assert_eq!(session.host().stdout(), "> > 6\n> ");
}

#[test]
fn repl_prompt_can_change() {
    let host = MemoryHost::new().with_input(["prompt empty", "say 1", "prompt \"\\u$ \"", "say 2"]);
    let mut session = Session::new(host);
    assert_eq!(session.repl(), 0);
    assert_eq!(session.host().stdout(), "> 1\nuser$ 2\nuser$ ");
}

#[test]
fn repl_keeps_blocks_open_across_lines() {
    let host = MemoryHost::new().with_input(["for (1..2)", "print #{$}", "next"]);
    let mut session = Session::new(host);
    session.repl();
    assert_eq!(session.host().stdout(), "> > > 12> ");
}
