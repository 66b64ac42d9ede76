use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use quill::{host::MemoryHost, interpreter::session::Session};
use walkdir::WalkDir;

fn run(source: &str) -> MemoryHost {
    let mut session = Session::new(MemoryHost::new());
    session.run_source(source);
    session.into_host()
}

fn read_sibling(path: &Path, extension: &str) -> Option<String> {
    fs::read_to_string(path.with_extension(extension)).ok()
}

#[test]
fn scripts_match_their_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "ql"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = read_sibling(path, "out").unwrap_or_else(|| panic!("{path:?} has no .out file"));
        let expected_errors = read_sibling(path, "err").unwrap_or_default();

        let host = run(&source);
        assert_eq!(host.stderr(), expected_errors, "stderr of {path:?}");
        assert_eq!(host.stdout(), expected, "stdout of {path:?}");
        count += 1;
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn readme_examples_work() {
    let content = fs::read_to_string("README.md").expect("README.md is readable");
    let blocks = extract_quill_blocks(&content);
    assert!(!blocks.is_empty(), "No quill examples found in README.md");

    for (i, code) in blocks.into_iter().enumerate() {
        let host = run(&code);
        assert!(host.stderr().is_empty(),
                "README example {} failed:\n{}\nError: {}",
                i + 1,
                code,
                host.stderr());
    }
}

fn extract_quill_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```quill") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}
