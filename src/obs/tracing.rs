// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::_prelude::*;

/// Span wrapper used by the exchanger.
#[derive(Clone, Debug)]
pub struct ExchangeSpan {
	span: Span,
}
impl ExchangeSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		Self { span: tracing::info_span!("github_app_token.exchange", stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
