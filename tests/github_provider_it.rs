// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use github_app_token::{
	config::{APP_ID_INPUT, INSTALLATION_ID_INPUT, PRIVATE_KEY_INPUT, REPOSITORIES_INPUT},
	error::{Error, TransportError},
	exchange::CredentialExchanger,
	host::{ActionsHost, Host, actions::OUTPUT_FILE_ENV},
	identity::AppIdentity,
	provider::{AuthProvider, GitHubAppProvider, InstallationTokenRequest},
	url::Url,
};

const PRIVATE_KEY: &str = include_str!("fixtures/app-key.pem");
const TOKEN_BODY: &str = r#"{
	"token": "ghs_mocked",
	"expires_at": "2030-01-01T00:00:00Z",
	"permissions": { "contents": "read" },
	"repository_selection": "all"
}"#;

fn provider(server: &MockServer) -> GitHubAppProvider {
	GitHubAppProvider::new(
		Url::parse(&server.base_url()).expect("Mock server URL should parse successfully."),
	)
	.expect("Provider should build for the mock server.")
}

fn identity(installation_id: &str) -> AppIdentity {
	AppIdentity::parse("123456", PRIVATE_KEY, installation_id)
		.expect("Identity fixture should be valid.")
}

#[tokio::test]
async fn exchanges_jwt_for_installation_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/app/installations/42/access_tokens")
				.header("accept", "application/vnd.github+json")
				.header("x-github-api-version", "2022-11-28")
				.header_exists("authorization")
				.header_exists("user-agent")
				.json_body(json!({}));
			then.status(201).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let token = provider(&server)
		.installation_token(&identity("42"), &InstallationTokenRequest::default())
		.await
		.expect("Mocked exchange should succeed.");

	assert_eq!(token.token.expose(), "ghs_mocked");
	assert_eq!(token.permissions.get("contents").map(String::as_str), Some("read"));
	assert_eq!(token.repository_selection.as_deref(), Some("all"));
	assert!(token.expires_at.is_some());

	mock.assert_async().await;
}

#[tokio::test]
async fn repository_scope_is_sent_in_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/app/installations/7/access_tokens")
				.json_body(json!({ "repositories": ["alpha", "beta"] }));
			then.status(201).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let request = InstallationTokenRequest::default().with_repositories(["alpha", "beta"]);

	provider(&server)
		.installation_token(&identity("7"), &request)
		.await
		.expect("Scoped exchange should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn github_rejection_keeps_message_and_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/installations/42/access_tokens");
			then.status(401).header("content-type", "application/json").body(
				r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#,
			);
		})
		.await;
	let err = provider(&server)
		.installation_token(&identity("42"), &InstallationTokenRequest::default())
		.await
		.expect_err("401 responses should be rejections.");

	assert!(matches!(err, Error::Rejected { status: Some(401), .. }));
	assert_eq!(err.to_string(), "Bad credentials - https://docs.github.com/rest");

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/installations/42/access_tokens");
			then.status(201).header("content-type", "application/json").body(r#"{"expires_at":1}"#);
		})
		.await;
	let err = provider(&server)
		.installation_token(&identity("42"), &InstallationTokenRequest::default())
		.await
		.expect_err("Bodies without a usable token should fail.");

	assert!(matches!(err, Error::ResponseParse { status: Some(201), .. }));

	mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
	let provider = GitHubAppProvider::new(
		Url::parse("http://127.0.0.1:9").expect("Discard-port URL should parse successfully."),
	)
	.expect("Provider should build for loopback URLs.");
	let err = provider
		.installation_token(&identity("42"), &InstallationTokenRequest::default())
		.await
		.expect_err("Nothing listens on the discard port.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
}

#[tokio::test]
async fn actions_run_masks_and_outputs_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/app/installations/42/access_tokens")
				.json_body(json!({ "repositories": ["alpha"] }));
			then.status(201).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let host = ActionsHost::new(
		[
			(ActionsHost::<Vec<u8>>::input_variable(APP_ID_INPUT), "123456".to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(PRIVATE_KEY_INPUT), PRIVATE_KEY.to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(INSTALLATION_ID_INPUT), "42".to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(REPOSITORIES_INPUT), "alpha".to_owned()),
		],
		Vec::new(),
	);

	<CredentialExchanger<GitHubAppProvider>>::new(provider(&server))
		.run(&host)
		.await
		.expect("Runner invocation should succeed.");

	assert!(!host.failed());
	assert_eq!(
		String::from_utf8(host.into_writer()).expect("Commands should be UTF-8."),
		"::add-mask::ghs_mocked\n\n::set-output name=token::ghs_mocked\n"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn actions_run_reports_rejection_as_error_command() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/installations/404/access_tokens");
			then.status(404)
				.header("content-type", "application/json")
				.body(r#"{"message":"Not Found"}"#);
		})
		.await;
	let host = ActionsHost::new(
		[
			(ActionsHost::<Vec<u8>>::input_variable(APP_ID_INPUT), "123456".to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(PRIVATE_KEY_INPUT), PRIVATE_KEY.to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(INSTALLATION_ID_INPUT), "404".to_owned()),
		],
		Vec::new(),
	);

	<CredentialExchanger<GitHubAppProvider>>::new(provider(&server))
		.run(&host)
		.await
		.expect_err("Rejected exchanges should fail the run.");

	assert!(host.failed());
	assert_eq!(
		String::from_utf8(host.into_writer()).expect("Commands should be UTF-8."),
		"::error::Not Found\n"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn actions_run_reports_output_failure_after_masking() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/installations/42/access_tokens");
			then.status(201).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let dir = tempfile::tempdir().expect("Temporary directory should exist.");
	let output = dir.path().join("absent");
	let output_path = output.to_str().expect("Temporary path should be UTF-8.").to_owned();
	let host = ActionsHost::new(
		[
			(ActionsHost::<Vec<u8>>::input_variable(APP_ID_INPUT), "123456".to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(PRIVATE_KEY_INPUT), PRIVATE_KEY.to_owned()),
			(ActionsHost::<Vec<u8>>::input_variable(INSTALLATION_ID_INPUT), "42".to_owned()),
			(OUTPUT_FILE_ENV.to_owned(), output_path.clone()),
		],
		Vec::new(),
	);

	<CredentialExchanger<GitHubAppProvider>>::new(provider(&server))
		.run(&host)
		.await
		.expect_err("Unwritable outputs should fail the run.");

	assert!(host.failed());
	assert_eq!(
		String::from_utf8(host.into_writer()).expect("Commands should be UTF-8."),
		format!("::add-mask::ghs_mocked\n::error::Missing file at path: {output_path}\n")
	);
	assert!(!output.exists());

	mock.assert_async().await;
}
