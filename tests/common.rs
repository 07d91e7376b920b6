use std::{
	ffi::OsStr,
	fs,
	path::{Path, PathBuf},
};

use pie::frontend::session::{Error, Processed, Session};

pub const EXTENSION: &str = "pie";

/// The programs with the right extension in `directory`.
pub fn programs(directory: impl AsRef<Path>) -> Vec<PathBuf> {
	let mut paths = fs::read_dir(directory)
		.unwrap()
		.flatten()
		.map(|x| x.path())
		.filter(|x| x.extension() == Some(OsStr::new(EXTENSION)))
		.collect::<Vec<_>>();
	paths.sort();
	paths
}

pub fn run(source: &str) -> (Session, Result<Vec<Processed>, Error>) {
	let mut session = Session::new();
	let result = session.run(source);
	(session, result)
}

/// The printed output of each form in `source`.
pub fn outputs(source: &str) -> Vec<String> {
	let (session, result) = run(source);
	match result {
		Ok(processed) => processed.iter().map(|processed| processed.output.render(session.names())).collect(),
		Err(error) => panic!("{source}: {error}"),
	}
}

/// The printed normal form of the last form in `source`.
pub fn normalize(source: &str) -> String { outputs(source).pop().unwrap() }
