use crate::{common::Names, ir::syntax::Core, pretty::unparse::pretty_print};

#[derive(Debug, Clone)]
pub enum MessagePart {
	Text(String),
	Core(Core),
}

/// Text interleaved with the terms it talks about, which are printed only when the message is rendered.
#[derive(Debug, Clone, Default)]
pub struct Message(pub Vec<MessagePart>);

impl Message {
	#[must_use]
	pub fn text(mut self, text: &str) -> Self {
		self.0.push(MessagePart::Text(text.to_owned()));
		self
	}

	#[must_use]
	pub fn core(mut self, term: Core) -> Self {
		self.0.push(MessagePart::Core(term));
		self
	}

	#[must_use]
	pub fn append(mut self, other: Self) -> Self {
		self.0.extend(other.0);
		self
	}

	pub fn render(&self, names: &Names) -> String {
		self.0
			.iter()
			.map(|part| match part {
				MessagePart::Text(text) => text.clone(),
				MessagePart::Core(term) => pretty_print(term, names),
			})
			.collect()
	}
}
