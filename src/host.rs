//! Host environment contract: parameter retrieval, secret masking, output publication, and
//! failure reporting.
//!
//! [`ActionsHost`] speaks the GitHub Actions runner protocol; [`MemoryHost`] records every call
//! in-process for tests and embedders.

pub mod actions;
pub mod command;
pub mod memory;

pub use actions::ActionsHost;
pub use memory::{HostCall, MemoryHost};

// std
use std::io;
// self
use crate::_prelude::*;

/// Failures raised by host services.
#[derive(Debug, ThisError)]
pub enum HostError {
	/// A required input was absent or empty.
	#[error("Input required and not supplied: {name}")]
	MissingInput {
		/// Input name as declared by the action.
		name: String,
	},
	/// The file named by a file-command variable does not exist.
	#[error("Missing file at path: {path}")]
	MissingFile {
		/// Path read from the environment.
		path: String,
	},
	/// A key/value pair would terminate its own heredoc early.
	#[error("Unexpected input: {field} should not contain the delimiter {delimiter}")]
	DelimiterCollision {
		/// `name` or `value`.
		field: &'static str,
		/// Generated heredoc delimiter.
		delimiter: String,
	},
	/// Writing a workflow or file command failed.
	#[error("Unable to write the {target}.")]
	Io {
		/// Human-readable destination label.
		target: &'static str,
		/// Underlying IO failure.
		#[source]
		source: io::Error,
	},
}

/// Options for [`Host::input`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputOptions {
	/// Fail with [`HostError::MissingInput`] when the input is absent or empty.
	pub required: bool,
	/// Trim leading and trailing whitespace from the value.
	pub trim_whitespace: bool,
}
impl InputOptions {
	/// Options for a required, trimmed input.
	pub const fn required() -> Self {
		Self { required: true, trim_whitespace: true }
	}

	/// Applies the options to a raw value looked up by a host.
	///
	/// The required check runs before trimming, so a whitespace-only value satisfies it and
	/// yields an empty string.
	pub fn apply(self, name: &str, raw: Option<&str>) -> Result<String, HostError> {
		let value = raw.unwrap_or_default();

		if self.required && value.is_empty() {
			return Err(HostError::MissingInput { name: name.to_owned() });
		}

		Ok(if self.trim_whitespace { value.trim() } else { value }.to_owned())
	}
}
impl Default for InputOptions {
	fn default() -> Self {
		Self { required: false, trim_whitespace: true }
	}
}

/// Services the job environment offers to one invocation.
pub trait Host
where
	Self: Send + Sync,
{
	/// Reads the named invocation input.
	fn input(&self, name: &str, options: InputOptions) -> Result<String, HostError>;

	/// Registers `secret` so it is redacted from all subsequent log output.
	fn set_secret(&self, secret: &str) -> Result<(), HostError>;

	/// Publishes a named output of the invocation.
	fn set_output(&self, name: &str, value: &str) -> Result<(), HostError>;

	/// Records `message` as the failure reason and marks the invocation unsuccessful.
	fn set_failed(&self, message: &str);

	/// Whether [`Host::set_failed`] has been called.
	fn failed(&self) -> bool;
}
