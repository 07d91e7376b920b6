use std::process::ExitCode;

use bpaf::{construct, long, short, Parser};
use pie::{
	frontend::{
		parse::parse,
		session::{Error, Session},
	},
	ir::source::lex,
	report::{report_elaboration_error, report_hole, report_parse_error, report_tokenization_error},
};
use tracing_subscriber::EnvFilter;

/// Processes every form in `source`, printing outputs and holes as it goes. Returns whether every form checked.
pub fn run(source: &str, quiet: bool) -> bool {
	let mut session = Session::new();

	// Parsing.
	let lexed_source = match lex(source) {
		Ok(x) => x,
		Err(e) => {
			report_tokenization_error(source, &e);
			return false;
		}
	};
	let forms = match parse(&lexed_source, session.names()) {
		Ok(x) => x,
		Err(e) => {
			report_parse_error(source, &e);
			return false;
		}
	};
	tracing::debug!(forms = forms.len(), "parsing complete");

	// Elaboration.
	for form in &forms {
		match session.process(form) {
			Ok(processed) => {
				for hole in &processed.holes {
					report_hole(source, session.names(), hole);
				}
				if !quiet {
					println!("{}", processed.output.render(session.names()));
				}
			}
			Err(e) => {
				report_elaboration_error(source, session.names(), &e);
				return false;
			}
		}
	}
	true
}

enum InputOption {
	Direct(String),
	FilePath(String),
}

struct Options {
	input: InputOption,
	quiet: bool,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

	let direct = short('c').argument::<String>("SOURCE").help("Read input from argument").map(InputOption::Direct);
	let file_path = short('f').argument::<String>("PATH").help("Read input from file").map(InputOption::FilePath);
	let input = construct!([direct, file_path]);
	let quiet = long("quiet").short('q').help("Only report errors and unfinished holes").switch();
	let options: Options = construct!(Options { input, quiet }).to_options().run();

	let input = match options.input {
		InputOption::Direct(source) => source,
		InputOption::FilePath(path) => match std::fs::read_to_string(&path) {
			Ok(source) => source,
			Err(source) => {
				eprintln!("error: {}", Error::Io { path, source });
				return ExitCode::FAILURE;
			}
		},
	};

	if run(&input, options.quiet) {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}
