//! Authentication provider seam and the built-in GitHub App implementation.
//!
//! The exchanger only depends on [`AuthProvider`]; the JWT signing and HTTP exchange live
//! behind it so tests can substitute a deterministic stub.

#[cfg(feature = "reqwest")] pub mod github;
pub mod jwt;

#[cfg(feature = "reqwest")] pub use github::GitHubAppProvider;

// self
use crate::{_prelude::*, identity::AppIdentity, token::InstallationToken};

/// Future returned by [`AuthProvider`] implementations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Options narrowing the requested installation credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallationTokenRequest {
	/// Repository names (without owner) the token should be limited to. Empty means every
	/// repository the installation can access.
	pub repositories: Vec<String>,
}
impl InstallationTokenRequest {
	/// Limits the token to the provided repositories.
	pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.repositories = repositories.into_iter().map(Into::into).collect();

		self
	}
}

/// Collaborator that turns an [`AppIdentity`] into an installation access token.
pub trait AuthProvider
where
	Self: Send + Sync,
{
	/// Requests an installation-type credential for `identity`.
	fn installation_token<'a>(
		&'a self,
		identity: &'a AppIdentity,
		request: &'a InstallationTokenRequest,
	) -> ProviderFuture<'a, InstallationToken>;
}
