//! Workflow and file command formatting for the GitHub Actions runner.

// self
use crate::{_prelude::*, host::HostError};

/// `::name key=value,...::message` line understood by the runner.
#[derive(Clone, Debug)]
pub struct Command<'a> {
	name: &'a str,
	properties: Vec<(&'a str, &'a str)>,
	message: &'a str,
}
impl<'a> Command<'a> {
	/// Creates a command without properties.
	pub fn new(name: &'a str, message: &'a str) -> Self {
		Self { name, properties: Vec::new(), message }
	}

	/// Adds a `key=value` property.
	pub fn property(mut self, key: &'a str, value: &'a str) -> Self {
		self.properties.push((key, value));

		self
	}
}
impl Display for Command<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "::{}", self.name)?;

		for (idx, (key, value)) in self.properties.iter().enumerate() {
			f.write_str(if idx == 0 { " " } else { "," })?;

			write!(f, "{key}={}", escape_property(value))?;
		}

		write!(f, "::{}", escape_data(self.message))
	}
}

/// Escapes a command message.
pub fn escape_data(value: &str) -> String {
	value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escapes a command property value.
pub fn escape_property(value: &str) -> String {
	escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Formats a heredoc entry for a file command such as `GITHUB_OUTPUT`.
pub fn key_value_message(key: &str, value: &str, delimiter: &str) -> Result<String, HostError> {
	if key.contains(delimiter) {
		return Err(HostError::DelimiterCollision { field: "name", delimiter: delimiter.into() });
	}
	if value.contains(delimiter) {
		return Err(HostError::DelimiterCollision { field: "value", delimiter: delimiter.into() });
	}

	Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}"))
}
