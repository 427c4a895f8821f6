//! GitHub Actions entry point: mint an installation token for the configured App.

// std
use std::{io, process::ExitCode};
// crates.io
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use github_app_token::{
	config::LOG_FILTER_ENV,
	exchange::{self, CredentialExchanger},
	host::ActionsHost,
	provider::GitHubAppProvider,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(io::stderr)
		.with_target(false)
		.init();

	let host = ActionsHost::from_env();

	match GitHubAppProvider::from_actions_host(&host) {
		Ok(provider) => {
			// The failure, if any, has already been reported to the runner.
			let _ = <CredentialExchanger<GitHubAppProvider>>::new(provider).run(&host).await;
		},
		Err(e) => exchange::report_failure(&host, &e),
	}

	Ok(exchange::exit_code(&host))
}
