//! [`Host`] implementation for the GitHub Actions runner.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, masking and failures are workflow
//! commands on stdout, and outputs go to the file named by `GITHUB_OUTPUT` (falling back to the
//! legacy `set-output` command on runners that do not provide it).

// std
use std::{
	fs::OpenOptions,
	io::{self, Stdout, Write},
	path::Path,
	sync::atomic::{AtomicBool, Ordering},
};
// self
use crate::{
	_prelude::*,
	host::{
		Host, HostError, InputOptions,
		command::{self, Command},
	},
};

/// Environment variable naming the output file command target.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Runner-backed host reading a snapshot of the process environment.
pub struct ActionsHost<W = Stdout> {
	env: HashMap<String, String>,
	out: Mutex<W>,
	failed: AtomicBool,
}
impl ActionsHost<Stdout> {
	/// Snapshots the process environment and writes commands to stdout.
	pub fn from_env() -> Self {
		let env = std::env::vars_os()
			.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

		Self::new(env, io::stdout())
	}
}
impl<W> ActionsHost<W>
where
	W: Write + Send,
{
	/// Creates a host over an explicit environment and command sink.
	pub fn new(env: impl IntoIterator<Item = (String, String)>, out: W) -> Self {
		Self {
			env: env.into_iter().collect(),
			out: Mutex::new(out),
			failed: AtomicBool::new(false),
		}
	}

	/// Environment variable carrying the input `name`.
	pub fn input_variable(name: &str) -> String {
		format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
	}

	/// Looks up a variable in the environment snapshot.
	pub fn env(&self, key: &str) -> Option<&str> {
		self.env.get(key).map(String::as_str)
	}

	/// Consumes the host and returns the command sink.
	pub fn into_writer(self) -> W {
		self.out.into_inner()
	}

	fn issue(&self, command: &Command) -> Result<(), HostError> {
		let mut out = self.out.lock();

		writeln!(out, "{command}")
			.and_then(|()| out.flush())
			.map_err(|source| HostError::Io { target: "workflow command", source })
	}

	fn append_file_command(&self, path: &str, message: &str) -> Result<(), HostError> {
		if !Path::new(path).exists() {
			return Err(HostError::MissingFile { path: path.to_owned() });
		}

		let mut file = OpenOptions::new()
			.append(true)
			.open(path)
			.map_err(|source| HostError::Io { target: "output file", source })?;

		writeln!(file, "{message}").map_err(|source| HostError::Io { target: "output file", source })
	}
}
impl<W> Host for ActionsHost<W>
where
	W: Write + Send,
{
	fn input(&self, name: &str, options: InputOptions) -> Result<String, HostError> {
		options.apply(name, self.env(&Self::input_variable(name)))
	}

	fn set_secret(&self, secret: &str) -> Result<(), HostError> {
		self.issue(&Command::new("add-mask", secret))
	}

	fn set_output(&self, name: &str, value: &str) -> Result<(), HostError> {
		if let Some(path) = self.env(OUTPUT_FILE_ENV).filter(|path| !path.is_empty()) {
			let delimiter = format!("ghadelimiter_{:032x}", rand::random::<u128>());
			let message = command::key_value_message(name, value, &delimiter)?;

			return self.append_file_command(path, &message);
		}

		{
			let mut out = self.out.lock();

			writeln!(out).map_err(|source| HostError::Io { target: "workflow command", source })?;
		}

		self.issue(&Command::new("set-output", value).property("name", name))
	}

	fn set_failed(&self, message: &str) {
		self.failed.store(true, Ordering::SeqCst);

		if let Err(e) = self.issue(&Command::new("error", message)) {
			tracing::error!(error = %e, "unable to report failure to the runner");
		}
	}

	fn failed(&self) -> bool {
		self.failed.load(Ordering::SeqCst)
	}
}
impl<W> Debug for ActionsHost<W> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ActionsHost")
			.field("env_vars", &self.env.len())
			.field("failed", &self.failed.load(Ordering::SeqCst))
			.finish()
	}
}
