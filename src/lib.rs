//! Exchange a GitHub App private key and installation identity for a short-lived installation
//! access token, then mask and publish it for the rest of a GitHub Actions job.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod exchange;
pub mod host;
#[cfg(feature = "reqwest")] pub mod http;
pub mod identity;
pub mod obs;
pub mod provider;
pub mod token;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
// Only the binary drives these.
use {color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, tempfile as _};
