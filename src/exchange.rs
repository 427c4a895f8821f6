//! Credential exchange: identity in, masked installation token out.
//!
//! [`CredentialExchanger::exchange`] is the bare operation. [`CredentialExchanger::run`] wraps it
//! in a full invocation against a [`Host`]: read the inputs, exchange, register the token for
//! masking, publish it as the `token` output, and report any failure exactly once.

// std
use std::process::ExitCode;
// self
use crate::{
	_prelude::*,
	config::{
		APP_ID_INPUT, INSTALLATION_ID_INPUT, PRIVATE_KEY_INPUT, REPOSITORIES_INPUT, TOKEN_OUTPUT,
		parse_repositories,
	},
	host::{Host, InputOptions},
	identity::AppIdentity,
	obs::{self, ExchangeOutcome, ExchangeSpan},
	provider::{AuthProvider, InstallationTokenRequest},
	token::InstallationToken,
};

/// Trades an [`AppIdentity`] for an installation access token through an [`AuthProvider`].
///
/// The exchanger holds no state besides the provider, so repeated invocations with the same
/// inputs behave identically.
pub struct CredentialExchanger<P = dyn AuthProvider>
where
	P: ?Sized + AuthProvider,
{
	provider: Arc<P>,
}
impl<P> CredentialExchanger<P>
where
	P: ?Sized + AuthProvider,
{
	/// Creates an exchanger backed by `provider`.
	pub fn new(provider: impl Into<Arc<P>>) -> Self {
		Self { provider: provider.into() }
	}

	/// Validates the raw parameters and requests an installation token for them.
	pub async fn exchange(
		&self,
		app_id: &str,
		private_key: &str,
		installation_id: &str,
	) -> Result<InstallationToken> {
		let identity = AppIdentity::parse(app_id, private_key, installation_id)?;

		self.exchange_identity(&identity, &InstallationTokenRequest::default()).await
	}

	/// Requests an installation token for an already validated identity.
	pub async fn exchange_identity(
		&self,
		identity: &AppIdentity,
		request: &InstallationTokenRequest,
	) -> Result<InstallationToken> {
		<P as AuthProvider>::installation_token(self.provider.as_ref(), identity, request).await
	}

	/// Runs one complete invocation against `host`.
	///
	/// On success the token is registered as a secret and then published as the `token` output,
	/// once each. On failure the error message is reported through [`Host::set_failed`] exactly
	/// once and returned to the caller.
	pub async fn run<H>(&self, host: &H) -> Result<()>
	where
		H: ?Sized + Host,
	{
		let span = ExchangeSpan::new("run");

		obs::record_exchange_outcome(ExchangeOutcome::Attempt);

		let result = span.instrument(self.run_inner(host)).await;

		match &result {
			Ok(()) => obs::record_exchange_outcome(ExchangeOutcome::Success),
			Err(e) => {
				obs::record_exchange_outcome(ExchangeOutcome::Failure);
				report_failure(host, e);
			},
		}

		result
	}

	async fn run_inner<H>(&self, host: &H) -> Result<()>
	where
		H: ?Sized + Host,
	{
		let app_id = host.input(APP_ID_INPUT, InputOptions::required())?;
		let private_key = host.input(PRIVATE_KEY_INPUT, InputOptions::required())?;
		let installation_id = host.input(INSTALLATION_ID_INPUT, InputOptions::required())?;
		let repositories = parse_repositories(&host.input(REPOSITORIES_INPUT, Default::default())?);
		let identity = AppIdentity::parse(&app_id, &private_key, &installation_id)?;
		let request = InstallationTokenRequest::default().with_repositories(repositories);

		tracing::info!(
			app_id = %identity.app_id,
			installation_id = %identity.installation_id,
			"exchanging App credentials for an installation token"
		);

		let token = self.exchange_identity(&identity, &request).await?;

		host.set_secret(token.token.expose())?;
		host.set_output(TOKEN_OUTPUT, token.token.expose())?;

		tracing::info!(
			expires_at = ?token.expires_at,
			repository_selection = token.repository_selection.as_deref(),
			"installation token masked and published"
		);

		Ok(())
	}
}
impl<P> Clone for CredentialExchanger<P>
where
	P: ?Sized + AuthProvider,
{
	fn clone(&self) -> Self {
		Self { provider: self.provider.clone() }
	}
}
impl<P> Debug for CredentialExchanger<P>
where
	P: ?Sized + AuthProvider,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CredentialExchanger(..)")
	}
}

/// Process exit status for an invocation: failure once [`Host::set_failed`] was called.
pub fn exit_code<H>(host: &H) -> ExitCode
where
	H: ?Sized + Host,
{
	if host.failed() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Logs `err` and records its message as the invocation's failure reason.
pub fn report_failure<H>(host: &H, err: &Error)
where
	H: ?Sized + Host,
{
	tracing::error!(error = %err, "installation token exchange failed");

	host.set_failed(&err.to_string());
}
