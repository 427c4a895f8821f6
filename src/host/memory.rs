//! In-process [`Host`] that records every call for tests and embedders.

// self
use crate::{
	_prelude::*,
	host::{Host, HostError, InputOptions},
};

/// Host service call captured by [`MemoryHost`].
#[derive(Clone, PartialEq, Eq)]
pub enum HostCall {
	/// [`Host::set_secret`].
	SetSecret(String),
	/// [`Host::set_output`].
	SetOutput {
		/// Output name.
		name: String,
		/// Output value.
		value: String,
	},
	/// [`Host::set_failed`].
	SetFailed(String),
}
impl Debug for HostCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::SetSecret(_) => f.debug_tuple("SetSecret").field(&"<redacted>").finish(),
			Self::SetOutput { name, .. } =>
				f.debug_struct("SetOutput").field("name", name).field("value", &"<redacted>").finish(),
			Self::SetFailed(message) => f.debug_tuple("SetFailed").field(message).finish(),
		}
	}
}

/// Thread-safe host keeping inputs and recorded calls in memory.
#[derive(Default)]
pub struct MemoryHost {
	inputs: HashMap<String, String>,
	calls: Mutex<Vec<HostCall>>,
}
impl MemoryHost {
	/// Adds or replaces an input value.
	pub fn with_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.inputs.insert(name.into(), value.into());

		self
	}

	/// Every recorded call, in order.
	pub fn calls(&self) -> Vec<HostCall> {
		self.calls.lock().clone()
	}

	/// Values registered for masking.
	pub fn secrets(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				HostCall::SetSecret(secret) => Some(secret.clone()),
				_ => None,
			})
			.collect()
	}

	/// Published outputs; later values win.
	pub fn outputs(&self) -> BTreeMap<String, String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				HostCall::SetOutput { name, value } => Some((name.clone(), value.clone())),
				_ => None,
			})
			.collect()
	}

	/// Failure reason, when one was reported.
	pub fn failure(&self) -> Option<String> {
		self.calls.lock().iter().rev().find_map(|call| match call {
			HostCall::SetFailed(message) => Some(message.clone()),
			_ => None,
		})
	}

	fn record(&self, call: HostCall) {
		self.calls.lock().push(call);
	}
}
impl Host for MemoryHost {
	fn input(&self, name: &str, options: InputOptions) -> Result<String, HostError> {
		options.apply(name, self.inputs.get(name).map(String::as_str))
	}

	fn set_secret(&self, secret: &str) -> Result<(), HostError> {
		self.record(HostCall::SetSecret(secret.to_owned()));

		Ok(())
	}

	fn set_output(&self, name: &str, value: &str) -> Result<(), HostError> {
		self.record(HostCall::SetOutput { name: name.to_owned(), value: value.to_owned() });

		Ok(())
	}

	fn set_failed(&self, message: &str) {
		self.record(HostCall::SetFailed(message.to_owned()));
	}

	fn failed(&self) -> bool {
		self.calls.lock().iter().any(|call| matches!(call, HostCall::SetFailed(_)))
	}
}
impl Debug for MemoryHost {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryHost")
			.field("inputs", &self.inputs.keys().collect::<Vec<_>>())
			.field("calls", &self.calls.lock().len())
			.finish()
	}
}
