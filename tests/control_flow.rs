use pretty_assertions::assert_eq;
use quill::{host::MemoryHost, interpreter::session::Session};

fn run(src: &str) -> (MemoryHost, i32) {
    let mut session = Session::new(MemoryHost::new());
    let code = session.run_source(src);
    (session.into_host(), code)
}

fn assert_output(src: &str, expected: &str) {
    let (host, _) = run(src);
    assert_eq!(host.stderr(), "", "script reported errors:\n{src}");
    assert_eq!(host.stdout(), expected);
}

fn assert_error(src: &str, message: &str) {
    let (host, _) = run(src);
    assert!(host.stderr().contains(message),
            "expected '{message}' in:\n{}",
            host.stderr());
}

#[test]
fn if_elsif_else() {
    let chain = "if x < 5\n\tsay \"small\"\nelsif x < 10\n\tsay \"medium\"\nelse\n\tsay \
                 \"large\"\nendif";
    assert_output(&format!("x = 1\n{chain}"), "small\n");
    assert_output(&format!("x = 7\n{chain}"), "medium\n");
    assert_output(&format!("x = 70\n{chain}"), "large\n");
}

#[test]
fn only_the_first_true_candidate_runs() {
    assert_output("x = 1\nif x == 1\n\tsay \"a\"\nelsif x == 1\n\tsay \"b\"\nendif", "a\n");
}

#[test]
fn unless_negates_the_condition() {
    assert_output("x = 2\nunless x == 1\n\tsay \"not one\"\nendif", "not one\n");
    assert_output("x = 1\nunless x == 1\n\tsay \"not one\"\nendif\nsay \"done\"", "done\n");
}

#[test]
fn conditions() {
    assert_output("if \"abc\" > \"zz\"\n\tsay \"longer\"\nendif", "longer\n");
    assert_output("if \"quill\" begins_with \"qu\"\n\tsay \"yes\"\nendif", "yes\n");
    assert_output("if \"quill\" ends_with \"ll\"\n\tsay \"yes\"\nendif", "yes\n");
    assert_output("if \"quill\" contains \"ui\"\n\tsay \"yes\"\nendif", "yes\n");
    assert_output("if 5 == \"5\"\n\tsay \"same\"\nendif", "same\n");
    assert_output("x = 3\nif x is_number?\n\tsay \"number\"\nendif", "number\n");
    assert_output("if (2 * 3) >= 6\n\tsay \"six\"\nendif", "six\n");
    assert_output("answer = \"yes\"\nif answer == yes\n\tsay \"ok\"\nendif", "ok\n");
}

#[test]
fn truthiness() {
    assert_output("if 1\n\tsay \"a\"\nendif\nif 0\n\tsay \"b\"\nendif", "a\n");
    assert_output("if false\n\tsay \"a\"\nendif\nif true\n\tsay \"b\"\nendif", "b\n");
    assert_output("var x\nif x\n\tsay \"a\"\nelse\n\tsay \"b\"\nendif", "b\n");
}

#[test]
fn unparsable_condition_is_never_true() {
    assert_output("if 1 2 3 4\n\tsay \"a\"\nendif", "");
    assert_output("unless 1 2 3 4\n\tsay \"a\"\nendif", "");
    assert_output("if 1 2 3 4\n\tsay \"a\"\nelse\n\tsay \"b\"\nendif", "b\n");
}

#[test]
fn untaken_branches_are_never_evaluated() {
    let src = "\
if false
	if explode() == 1
		say \"inner\"
	endif
	say \"outer\"
endif
say \"done\"";
    assert_output(src, "done\n");

    let src = "\
count = 0
method bump
	count += 1
end
if count == 1
	bump
elsif count == 0
	say \"zero\"
else
	bump
endif
say count";
    assert_output(src, "zero\n0\n");
}

#[test]
fn nested_ifs_run_when_reached() {
    let src = "\
x = 2
if x > 1
	if x > 5
		say \"big\"
	else
		say \"middling\"
	endif
	say \"checked\"
endif";
    assert_output(src, "middling\nchecked\n");
}

#[test]
fn for_ranges() {
    assert_output("for (1..3)\n\tprint #{$}\nnext", "123");
    assert_output("for (5..3)\n\tprint #{$}\nnext", "543");
    assert_output("for (1<4)\n\tprint #{$}\nnext", "123");
    assert_output("for (4>1)\n\tprint #{$}\nnext", "432");
    assert_output("for x in (1..2) step 0.5\n\tprint #{x} \"\"\nendfor", "1 1.5 2 ");
    assert_output("for $i in (0..4) step 2\n\tprint #{i}\nnext", "024");
    assert_output("n = 3\nfor (1..n)\n\tprint #{$}\nnext", "123");
}

#[test]
fn fractional_steps_reach_the_end_bound() {
    assert_output("for x in (0..1) step 0.1\n\tprint #{x} \"\"\nnext",
                  "0 0.1 0.2 0.3 0.4 0.5 0.6 0.7 0.8 0.9 1 ");
    assert_output("for x in (1..0) step 0.25\n\tprint #{x} \"\"\nnext", "1 0.75 0.5 0.25 0 ");
}

#[test]
fn huge_ranges_run_one_pass_at_a_time() {
    assert_output("for x in (1..1000000000000)\n\tsay #{x}\n\tbreak\nnext\nsay \"done\"",
                  "1\ndone\n");
}

#[test]
fn failed_ranges_run_zero_times() {
    assert_output("for (3<3)\n\tsay \"never\"\nnext\nsay \"after\"", "after\n");
    assert_output("for (a..b)\n\tsay \"never\"\nnext", "");
    assert_output("for x in (1..3) step 0\n\tsay \"never\"\nnext", "");
    assert_output("for x in missing\n\tsay \"never\"\nnext", "");
}

#[test]
fn for_over_lists() {
    assert_output("list L = (a, \"b c\", 3)\nfor item in L\n\tsay #{item}\nnext",
                  "a\nb c\n3\n");
    assert_output("for (red, green)\n\tsay #{$}\nnext", "red\ngreen\n");
}

#[test]
fn nested_for_loops() {
    let src = "\
for x in (1..2)
	for y in (1..2)
		print #{x}#{y} \"\"
	next
next";
    assert_output(src, "11 12 21 22 ");
}

#[test]
fn infinite_for_needs_break() {
    let src = "\
n = 0
for infinity
	n += 1
	if n == 3
		break
	endif
next
say n";
    assert_output(src, "3\n");
}

#[test]
fn while_loops() {
    assert_output("i = 0\nwhile i < 3\n\ti += 1\nend\nsay i", "3\n");
    assert_output("i = 0\nwhile i < 10\n\ti += 1\n\tif i == 4\n\t\tleave!\n\tendif\nend\nsay i",
                  "4\n");
    assert_output("while 0\n\tsay \"never\"\nend", "");
}

#[test]
fn braces_close_blocks() {
    assert_output("i = 0\nwhile i < 2\n\ti += 1\n}\nsay i", "2\n");
}

#[test]
fn switch_selects_a_case() {
    let switch = "switch x\n\tcase 1\n\t\tsay \"one\"\n\tcase two\n\t\tsay \"two\"\n\tdefault\n\t\tsay \"other\"\nend";
    assert_output(&format!("x = 1\n{switch}"), "one\n");
    assert_output(&format!("x = \"two\"\n{switch}"), "two\n");
    assert_output(&format!("x = 7\n{switch}"), "other\n");
}

#[test]
fn switch_without_default_runs_nothing() {
    assert_output("x = 7\nswitch x\n\tcase 1\n\t\tsay \"one\"\nend\nsay \"done\"", "done\n");
}

#[test]
fn switch_labels_may_be_quoted() {
    assert_output("x = \"a b\"\nswitch x\n\tcase \"a b\"\n\t\tsay \"matched\"\nend", "matched\n");
}

#[test]
fn switch_labels_may_be_variables() {
    let src = "\
y = 5
x = 5
switch x
	case y
		say \"hit\"
	default
		say \"miss\"
end";
    assert_output(src, "hit\n");
    assert_output("y = 6\nx = 5\nswitch x\n\tcase y\n\t\tsay \"hit\"\nend", "");
}

#[test]
fn try_catch() {
    let src = "\
try
	x = (1 / 0)
	say \"unreached\"
catch e
	say \"caught:\" e
end
say \"after\"";
    let (host, code) = run(src);
    assert_eq!(host.stdout(), "caught: Division by zero.\nafter\n");
    assert_eq!(host.stderr(), "");
    assert_eq!(code, 9);
}

#[test]
fn try_without_error_skips_the_handler() {
    assert_output("try\n\tsay \"fine\"\ncatch\n\tsay \"handler\"\nend", "fine\n");
}

#[test]
fn errors_inside_called_methods_are_caught() {
    let src = "\
method fail
	x = undefined_thing
	say \"unreached\"
end
try
	fail
catch e
	say e
end";
    assert_output(src, "Undefined variable 'undefined_thing'.\n");
}

#[test]
fn goto_jumps_to_marks() {
    let src = "\
i = 0
top::
i += 1
if i < 3
	goto top
endif
say i";
    assert_output(src, "3\n");
    assert_error("goto nowhere", "no mark named 'nowhere'");
}

#[test]
fn exit_stops_the_script() {
    let (host, code) = run("say \"a\"\nexit 3\nsay \"b\"");
    assert_eq!(host.stdout(), "a\n");
    assert_eq!(code, 3);
}

#[test]
fn exit_inside_a_loop_inside_a_method() {
    let src = "\
method quit
	for (1..5)
		if #{$} == 2
			exit 7
		endif
		say #{$}
	next
end
quit
say \"never\"";
    let (host, code) = run(src);
    assert_eq!(host.stdout(), "1\n");
    assert_eq!(code, 7);
}

#[test]
fn exit_clears_the_session() {
    let mut session = Session::new(MemoryHost::new());
    session.run_source("x = 1\nexit");
    assert!(session.value("x").is_none());
}

#[test]
fn stray_terminators_are_errors() {
    assert_error("endif", "'endif' outside of a matching block");
    assert_error("next", "'next' outside of a matching block");
    assert_error("[/Mod]", "'[/Mod]' outside of a matching module");
}

#[test]
fn unterminated_blocks_are_reported() {
    assert_error("if 1\n\tsay \"a\"", "unterminated if block");
    assert_error("method m\n\tsay \"a\"", "unterminated method block");
}

#[test]
fn modules() {
    assert_output("[Greet]\n\tsay \"hi\"\n[/Greet]\nGreet\nGreet", "hi\nhi\n");
    assert_output("[Outer]\n\t[Inner]\n\t\tsay \"in\"\n\t[/Inner]\n[/Outer]\nOuter\nInner", "in\n");
    assert_output("[M]\nend\n[/M]\nmodules", "M\n");
}
