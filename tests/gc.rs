use pretty_assertions::assert_eq;
use quill::{host::MemoryHost, interpreter::session::Session};

fn session(src: &str) -> Session<MemoryHost> {
    let mut session = Session::new(MemoryHost::new());
    session.run_source(src);
    session
}

fn assert_output(src: &str, expected: &str) {
    let session = session(src);
    assert_eq!(session.host().stderr(), "", "script reported errors:\n{src}");
    assert_eq!(session.host().stdout(), expected);
}

#[test]
fn method_locals_are_swept_when_the_method_returns() {
    let src = "\
method make(n)
	tmp = n
	say tmp
end
make(5)
tmp is_variable?";
    assert_output(src, "5\nfalse\n");
}

#[test]
fn top_level_variables_persist() {
    let src = "\
before = 1
method noop
end
noop
after = 2";
    let session = session(src);
    assert!(session.value("before").is_some());
    assert!(session.value("after").is_some());
}

#[test]
fn globals_updated_inside_a_method_survive() {
    assert_output("total = 0\nmethod add\n\ttotal += 5\nend\nadd\nadd\nsay total", "10\n");
}

#[test]
fn lists_and_classes_created_inside_methods_are_swept() {
    let src = "\
method build
	list L = (1, 2)
	class Temp
		x = 1
	end
end
build
L is_list?
Temp is_class?";
    assert_output(src, "false\nfalse\n");
}

#[test]
fn locking_does_not_protect_from_the_sweep() {
    assert_output("method m\n\tkeep = 1\n\tlock keep\nend\nm\nkeep is_variable?", "false\n");
}

#[test]
fn sweep_waits_for_the_outermost_invocation() {
    let src = "\
method inner
	made = 1
end
method outer
	inner
	say made
end
outer
made is_variable?";
    assert_output(src, "1\nfalse\n");
}

#[test]
fn sweep_is_deferred_while_an_if_chain_runs() {
    let src = "\
method make
	made = 1
end
if 1 == 1
	make
	say made
endif
made is_variable?";
    assert_output(src, "1\nfalse\n");
}

#[test]
fn try_blocks_sweep_what_they_create() {
    assert_output("try\n\tinside = 1\nend\ninside is_variable?", "false\n");
    assert_output("try\n\tx = (1 / 0)\ncatch e\n\tsay e\nend\ne is_variable?",
                  "Division by zero.\nfalse\n");
}

#[test]
fn templates_sweep_what_they_create() {
    let src = "\
template set(2)
	$0 = $1
end
set(\"made\", 1)
made is_variable?";
    assert_output(src, "false\n");
}

#[test]
fn class_members_added_inside_methods_are_swept() {
    let src = "\
class Point
	x = 1
	method tag
		self.label = \"temp\"
		self.x = 2
	end
end
Point.tag
say Point.x
Point.label is_variable?";
    assert_output(src, "2\nfalse\n");
}

#[test]
fn collect_garbage_reports_the_sweep_count() {
    let mut session = Session::new(MemoryHost::new());
    session.state.executions = 1;
    session.execute_source("a = 1; b = 2; list L");
    session.state.executions = 0;
    assert_eq!(session.collect_garbage(), 3);
    assert_eq!(session.collect_garbage(), 0);
}
