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
fn methods_without_parameters() {
    assert_output("method hello\n\tsay \"hello\"\nend\nhello\nhello()", "hello\nhello\n");
}

#[test]
fn parameters_are_substituted_by_name_and_position() {
    assert_output("method add(a, b)\n\tsay (a + b)\nend\nadd(2, 3)", "5\n");
    assert_output("method add(a, b)\n\tsay ($0 + $1)\nend\nadd(2, 3)", "5\n");
    assert_output("method greet(who)\n\tsay \"hi\" who\nend\nname = \"ann\"\ngreet(name)",
                  "hi ann\n");
}

#[test]
fn substitution_is_textual() {
    assert_output("method shout(word)\n\tsay \"word:\" word\nend\nshout(5)", "5: 5\n");
    assert_output("method f(n)\n\tsay n nn\nend\nf(1)", "1 nn\n");
}

#[test]
fn substituted_arguments_are_not_substituted_again() {
    assert_output("method show(msg, n)\n\tsay msg n\nend\nshow(\"n\", 3)", "n 3\n");
    assert_output("method show(a, b)\n\tsay $0 $1\nend\nshow(\"$1\", 2)", "$1 2\n");
    assert_output("template pair(2)\n\tsay $0 $1\nend\npair(1, \"$0\")", "1 $0\n");
}

#[test]
fn self_in_an_argument_is_left_alone() {
    let src = "\
class Box
	v = 1
	method show(text)
		say text self.v
	end
end
Box.show(\"self.v\")";
    assert_output(src, "self.v 1\n");
}

#[test]
fn parameters_keep_their_last_value() {
    assert_output("method greet(who)\n\tsay \"hello\" who\nend\ngreet(\"ann\")\ngreet",
                  "hello ann\nhello ann\n");
}

#[test]
fn too_many_arguments_is_an_error() {
    assert_error("method one(a)\nend\none(1, 2)", "'one' takes 1 arguments, got 2");
}

#[test]
fn return_sets_the_call_value() {
    assert_output("method double(v)\n\treturn (v * 2)\nend\nx = double(4)\nsay x", "8\n");
    assert_output("method early\n\treturn 1\n\tsay \"unreached\"\nend\nsay early()", "1\n");
    assert_output("method nothing\nend\nx = nothing()\nx is_absent?", "true\n");
}

#[test]
fn calls_in_conditions() {
    let src = "\
method double(v)
	return (v * 2)
end
if double(3) == 6
	say \"six\"
endif";
    assert_output(src, "six\n");
}

#[test]
fn arguments_resolve_before_the_call() {
    let src = "\
method inc(v)
	return (v + 1)
end
x = inc(inc(1))
say x";
    assert_output(src, "3\n");
}

#[test]
fn recursion() {
    let src = "\
method countdown(n)
	if n > 0
		print n
		countdown((n - 1))
	endif
end
countdown(3)";
    assert_output(src, "321");
}

#[test]
fn redefinition_is_an_error() {
    assert_error("method m\nend\nmethod m\nend", "'m' is already defined.");
    assert_output("method m\n\tsay 1\nend\nremove m\nmethod m\n\tsay 2\nend\nm", "2\n");
}

#[test]
fn undefined_methods() {
    assert_error("missing(1)", "Undefined method 'missing'.");
    assert_error("x = missing()", "Undefined method 'missing'.");
}

#[test]
fn templates_substitute_positionally() {
    assert_output("template pair(2)\n\tsay $0 $1\nend\npair(\"x\", 5)", "x 5\n");
    assert_output("template swap(2)\n\tsay $1 $0\nend\nswap(1, 2)", "2 1\n");
    assert_output("template wrap(1)\n\tsay \"[$0]\"\nend\nwrap(\"in\")", "[in]\n");
}

#[test]
fn template_arity_is_exact() {
    assert_error("template pair(2)\nend\npair(1)", "template 'pair' takes 2 arguments, got 1");
}

#[test]
fn template_arguments_can_name_variables() {
    let src = "\
template set(2)
	$0 = $1
	say $0
end
set(\"y\", 9)";
    assert_output(src, "9\n");
}

#[test]
fn classes() {
    let src = "\
class Point
	x = 1
	method move(d)
		self.x += d
	end
end
Point.move(4)
say Point.x";
    assert_output(src, "5\n");
}

#[test]
fn class_members_are_checked_before_flat_names() {
    let src = "\
Point.x = 10
class Point
	x = 1
end
say Point.x";
    assert_output(src, "1\n");
}

#[test]
fn class_member_initializers_may_call_methods() {
    let src = "\
method start
	return 42
end
class Box
	value = start()
end
say Box.value";
    assert_output(src, "42\n");
}

#[test]
fn private_methods() {
    let src = "\
class Safe
	private
	method secret
		say \"hidden\"
	end
	public
	method open
		self.secret
	end
end
Safe.open
Safe.secret";
    let host = run_with(MemoryHost::new(), src);
    assert_eq!(host.stdout(), "hidden\n");
    assert_eq!(host.stderr(), "Error on line 12: Invalid operation: method 'Safe.secret' is private.\n");
}

#[test]
fn objects_copy_their_class() {
    let src = "\
class Counter
	n = 0
	method inc
		self.n += 1
	end
end
object c = Counter
c.inc
c.inc
say c.n Counter.n";
    assert_output(src, "2 0\n");
    assert_error("object c = Nope", "Undefined class 'Nope'.");
}

#[test]
fn object_keyword_opens_a_class() {
    assert_output("object Dog\n\tsound = \"woof\"\nend\nsay Dog.sound\nDog is_class?",
                  "woof\ntrue\n");
}

#[test]
fn class_bodies_reject_statements() {
    assert_error("class C\n\tsay \"hi\"\nend", "is not allowed in a class body");
}

#[test]
fn errors_inside_methods_name_the_method() {
    let host = run_with(MemoryHost::new(), "method bad\n\tx = (1 / 0)\nend\nbad");
    assert_eq!(host.stderr(), "Error on line 4 in bad: Division by zero.\n");
}

#[test]
fn deep_recursion_is_stopped() {
    let result = std::thread::Builder::new().stack_size(256 * 1024 * 1024)
                                            .spawn(|| {
                                                run_with(MemoryHost::new(),
                                                         "method forever\n\tforever\nend\nforever")
                                            })
                                            .unwrap()
                                            .join()
                                            .unwrap();
    assert!(result.stderr().contains("nested deeper than 256 calls"),
            "{}",
            result.stderr());
}

#[test]
fn builtins() {
    assert_output("say upper(\"quill\") lower(\"QUILL\")", "QUILL quill\n");
    assert_output("say length(\"héllo\")", "5\n");
    assert_output("say random(3, 9)", "3\n");
    assert_output("say random(9, 3)", "3\n");
    assert_output("say date() time()", "1970-01-01 00:00:00\n");
    assert_output("say date(\"%Y\")", "1970\n");
    assert_error("say upper()", "'upper' does not take 0 arguments");
}

#[test]
fn builtins_use_the_host() {
    let host = MemoryHost::new().with_env("HOME", "/home/q")
                                .with_file("notes.txt", "remember");
    let host = run_with(host, "say env(\"HOME\")\nx = read(\"notes.txt\")\nsay x\nsay env(\"NOPE\") \"|\"");
    assert_eq!(host.stderr(), "");
    assert_eq!(host.stdout(), "/home/q\nremember\n |\n");
}

#[test]
fn user_methods_shadow_builtins() {
    assert_output("method upper(s)\n\treturn \"mine\"\nend\nsay upper(\"a\")", "mine\n");
}
