use std::fs;

use pie::frontend::session::Error;

use crate::common::{programs, run};

/// Ensures every program is rejected. Each program's first line is a comment naming the stage that rejects it.
#[test]
fn run_fail_tests() {
	let paths = programs("tests/fail/programs");
	assert!(!paths.is_empty());
	for path in paths {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(&path).expect(&path_str);
		let stage = source.lines().next().and_then(|line| line.strip_prefix("; ")).expect(&path_str).trim();
		let (_, result) = run(&source);
		let rejected_by = match result {
			Ok(_) => panic!("{path_str} was accepted"),
			Err(Error::Lex(_)) => "lex",
			Err(Error::Parse(_)) => "parse",
			Err(Error::Elaboration(_)) => "elaborate",
			Err(Error::Io { .. }) => unreachable!(),
		};
		assert_eq!(rejected_by, stage, "{path_str}");
	}
}
