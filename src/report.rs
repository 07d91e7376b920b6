use crate::{
	common::{Names, Range},
	frontend::{elaborate::ElaborationError, parse::ParseError, session::Hole},
	ir::source::{LexError, LexErrorKind},
	pretty::unparse::pretty_print,
};

pub fn report_tokenization_error(source: &str, error: &LexError) {
	eprint!("{}", format_tokenization_error(source, error))
}

pub fn report_parse_error(source: &str, error: &ParseError) { eprint!("{}", format_parse_error(source, error)) }

pub fn report_elaboration_error(source: &str, names: &Names, error: &ElaborationError) {
	eprint!("{}", format_elaboration_error(source, names, error))
}

pub fn report_hole(source: &str, names: &Names, hole: &Hole) { eprint!("{}", format_hole(source, names, hole)) }

pub fn format_tokenization_error(source: &str, LexError(location, kind): &LexError) -> String {
	let character = source[*location..].chars().next().unwrap_or_default();
	let (width, message) = match kind {
		LexErrorKind::UnrecognizedLexemePrefix =>
			(character.len_utf8(), format!("unrecognized lexeme prefix `{}`", character.escape_default())),
		LexErrorKind::MalformedName(length) =>
			(*length, format!("`{}` is neither a name nor a number", &source[*location..*location + length])),
		LexErrorKind::MismatchedBracket(bracket) => (1, format!("`{bracket}` does not close the innermost bracket")),
		LexErrorKind::UnexpectedEnd(bracket) => (1, format!("this bracket is never closed; expected `{bracket}`")),
	};
	line_error(source, (*location, *location + width.max(1)), &format!("lex error: {message}"))
}

pub fn format_parse_error(source: &str, error: &ParseError) -> String {
	line_error(source, error.range, &format!("parse error: {error}"))
}

pub fn format_elaboration_error(source: &str, names: &Names, error: &ElaborationError) -> String {
	line_error(source, error.range, &format!("elaboration error: {}", error.kind.message().render(names)))
}

pub fn format_hole(source: &str, names: &Names, hole: &Hole) -> String {
	line_error(source, hole.range, &format!("unfinished: TODO has type {}", pretty_print(&hole.ty, names)))
}

/// Formats a message under a `[line:column]` heading, followed by the line the range starts on with the range
/// underlined.
fn line_error(source: &str, range: Range, message: &str) -> String {
	const TAB_WIDTH: usize = 3;
	// SAFETY: Repeated spaces form a valid string.
	const TAB_REPLACEMENT: &str = unsafe { std::str::from_utf8_unchecked(&[b' '; TAB_WIDTH]) };

	let start = range.0.min(source.len());
	let line_start = source[..start].rfind('\n').map_or(0, |newline| newline + 1);
	let line_number = source[..line_start].matches('\n').count() + 1;
	let line = source[line_start..].split('\n').next().unwrap_or_default();
	let column = start - line_start;
	let underlined_end = range.1.saturating_sub(line_start).clamp(column, line.len());

	let width = |text: &str| unicode_width::UnicodeWidthStr::width(text.replace('\t', TAB_REPLACEMENT).as_str());
	let visual_line = line.replace('\t', TAB_REPLACEMENT).trim_end().to_owned();
	let visual_offset = width(&line[..column]);
	let visual_width = width(&line[column..underlined_end]).max(1);

	let displayed_line_number = line_number.to_string();
	let dummy_line_number = " ".repeat(displayed_line_number.len());
	let mut report = format!("[{}:{}] error: {message}\n", line_number, line[..column].chars().count() + 1);
	report.push_str(&format!("{dummy_line_number} |\n"));
	report.push_str(&format!("{displayed_line_number} | {visual_line}\n"));
	report.push_str(&format!("{dummy_line_number} | {}{}\n", " ".repeat(visual_offset), "^".repeat(visual_width)));
	report
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_are_located_by_line_and_column() {
		let source = "(claim x Nat)\n(define x 'a)\n";
		let start = source.find("'a").unwrap();
		let report = line_error(source, (start, start + 2), "boom");
		let lines = report.lines().collect::<Vec<_>>();
		assert_eq!(lines[0], "[2:11] error: boom");
		assert_eq!(lines[2], "2 | (define x 'a)");
		assert_eq!(lines[3], format!("  | {}^^", " ".repeat(10)));
	}

	#[test]
	fn multibyte_characters_take_one_column() {
		let source = "(λ (x) x)";
		let report = line_error(source, (1, 3), "here");
		assert_eq!(report.lines().nth(3), Some("  |  ^"));
	}

	#[test]
	fn ranges_at_the_end_of_input_are_shown() {
		let source = "(add1";
		let report = line_error(source, (5, 5), "end");
		assert!(report.starts_with("[1:6] error: end"));
		assert_eq!(report.lines().nth(3), Some(format!("  | {}^", " ".repeat(5)).as_str()));
	}
}
