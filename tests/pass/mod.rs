use std::fs;

use pie::report::format_elaboration_error;

use crate::common::{programs, run};

/// Ensures every program is accepted and leaves no unfinished holes.
#[test]
fn run_pass_tests() {
	let paths = programs("tests/pass/programs");
	assert!(!paths.is_empty());
	for path in paths {
		let path_str = path.as_os_str().to_str().unwrap().to_owned();
		let source = fs::read_to_string(&path).expect(&path_str);
		let (session, result) = run(&source);
		let processed = match result {
			Ok(processed) => processed,
			Err(pie::frontend::session::Error::Elaboration(error)) =>
				panic!("{path_str}\n{}", format_elaboration_error(&source, session.names(), &error)),
			Err(error) => panic!("{path_str}: {error}"),
		};
		assert!(processed.iter().all(|processed| processed.holes.is_empty()), "{path_str}");
	}
}
