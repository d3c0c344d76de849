//! 401 recovery: single-flight token refresh, FIFO replay, fail-closed logout.
//!
//! The client exposes no refresh API of its own; recovery happens inside
//! [`ApiClient::request`](crate::client::ApiClient::request). The first request to see a 401
//! wins the [`RefreshGate`] flag transition and runs the exchange; every request that 401s while
//! the exchange is in flight parks a continuation in the gate's FIFO queue and replays with
//! whatever outcome the leader broadcasts. A failed exchange clears the stored tokens, signals
//! the login redirect, and rejects the whole wave with one shared [`RefreshError`].

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE};
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::ApiClient,
	error::{ConfigError, RefreshError},
	obs::{self, OpKind, OpOutcome, OpSpan},
	transport::HttpResponse,
};

#[derive(Serialize)]
struct RefreshRequest<'a> {
	refresh: &'a str,
}
#[derive(Deserialize)]
struct RefreshResponse {
	access: String,
}

/// Result of one settled refresh attempt, broadcast to every queued continuation.
#[derive(Clone, Debug)]
pub(crate) enum RefreshOutcome {
	/// Exchange succeeded; replay with this access token.
	Refreshed(TokenSecret),
	/// Exchange failed; the session is over.
	Failed(Arc<RefreshError>),
}

/// Coordinates the at-most-one-refresh invariant and the FIFO pending queue.
///
/// The flag check-and-set and every queue append/drain happen under one synchronous mutex, and
/// no await point is reached while it is held, so two flows can never both observe the idle
/// state and start competing exchanges.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	state: Mutex<GateState>,
}
#[derive(Debug, Default)]
struct GateState {
	in_flight: bool,
	waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}
impl RefreshGate {
	/// Joins the current refresh wave, either as the leader that must run the exchange or as a
	/// follower parked behind it.
	fn enter(self: &Arc<Self>) -> GateEntry {
		let mut state = self.state.lock();

		if state.in_flight {
			let (sender, receiver) = oneshot::channel();

			state.waiters.push(sender);

			GateEntry::Follower(receiver)
		} else {
			state.in_flight = true;

			GateEntry::Leader(RefreshLease { gate: Arc::clone(self), settled: false })
		}
	}

	/// Resets the flag and drains the queue exactly once, delivering `outcome` in arrival order.
	fn settle(&self, outcome: RefreshOutcome) {
		let waiters = {
			let mut state = self.state.lock();

			state.in_flight = false;

			std::mem::take(&mut state.waiters)
		};

		for waiter in waiters {
			// Continuations dropped by cancelled callers are fine; delivery is best effort.
			let _ = waiter.send(outcome.clone());
		}
	}

	#[cfg(test)]
	fn is_idle(&self) -> bool {
		let state = self.state.lock();

		!state.in_flight && state.waiters.is_empty()
	}
}

/// Entry ticket handed out by [`RefreshGate::enter`].
pub(crate) enum GateEntry {
	/// Caller won the flag transition and must settle the gate after the exchange.
	Leader(RefreshLease),
	/// A refresh is already in flight; await the broadcast outcome.
	Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Leadership token that guarantees the gate settles.
///
/// If the leader unwinds without settling, `Drop` rejects the queued continuations and resets
/// the flag, so one aborted exchange cannot deadlock every later 401 wave.
pub(crate) struct RefreshLease {
	gate: Arc<RefreshGate>,
	settled: bool,
}
impl RefreshLease {
	fn settle(mut self, outcome: RefreshOutcome) {
		self.settled = true;
		self.gate.settle(outcome);
	}
}
impl Drop for RefreshLease {
	fn drop(&mut self) {
		if !self.settled {
			self.gate.settle(RefreshOutcome::Failed(Arc::new(RefreshError::Interrupted)));
		}
	}
}

impl ApiClient {
	/// Dispatches a fully built request, transparently recovering from the first 401.
	pub(crate) async fn send_with_auth(
		&self,
		method: Method,
		url: Url,
		exempt: bool,
		body: Vec<u8>,
		headers: HeaderMap,
	) -> Result<HttpResponse> {
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, "send_with_auth");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let bearer = if exempt { None } else { self.store.access_token().await? };
				let request =
					self.build_request(&method, &url, &headers, &body, bearer.as_ref())?;
				let response = self.transport.execute(request).await?;

				if response.status() != StatusCode::UNAUTHORIZED || exempt {
					return Ok(response);
				}

				// First 401 for this request. Recover once; whatever the replay answers, even
				// another 401, goes back to the caller untouched.
				let token = self.recover_unauthorized().await?;
				let retry = self.build_request(&method, &url, &headers, &body, Some(&token))?;

				Ok(self.transport.execute(retry).await?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Joins or leads the single-flight refresh and returns the replacement access token.
	async fn recover_unauthorized(&self) -> Result<TokenSecret> {
		match self.gate.enter() {
			GateEntry::Leader(lease) => self.lead_refresh(lease).await,
			GateEntry::Follower(receiver) => match receiver.await {
				Ok(RefreshOutcome::Refreshed(token)) => Ok(token),
				Ok(RefreshOutcome::Failed(source)) => Err(Error::SessionExpired { source }),
				Err(_) =>
					Err(Error::SessionExpired { source: Arc::new(RefreshError::Interrupted) }),
			},
		}
	}

	/// Runs the refresh exchange as the gate leader and broadcasts the outcome.
	async fn lead_refresh(&self, lease: RefreshLease) -> Result<TokenSecret> {
		const KIND: OpKind = OpKind::Refresh;

		let span = OpSpan::new(KIND, "lead_refresh");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.exchange_refresh_token()).await;

		match result {
			Ok(token) => {
				self.refresh_metrics.record_success();
				obs::record_op_outcome(KIND, OpOutcome::Success);
				lease.settle(RefreshOutcome::Refreshed(token.clone()));

				Ok(token)
			},
			Err(err) => {
				self.refresh_metrics.record_failure();
				obs::record_op_outcome(KIND, OpOutcome::Failure);
				self.end_session(&err).await;

				let source = Arc::new(err);

				lease.settle(RefreshOutcome::Failed(source.clone()));

				Err(Error::SessionExpired { source })
			},
		}
	}

	/// Performs the refresh exchange against the bare transport.
	///
	/// Goes straight to [`Transport::execute`](crate::transport::Transport::execute) so a 401
	/// from the refresh endpoint itself can never re-enter the recovery path.
	async fn exchange_refresh_token(&self) -> Result<TokenSecret, RefreshError> {
		let refresh =
			self.store.refresh_token().await?.ok_or(RefreshError::MissingRefreshToken)?;
		let url = self.descriptor.refresh_endpoint()?;
		let payload = serde_json::to_vec(&RefreshRequest { refresh: refresh.expose() })
			.map_err(ConfigError::from)?;
		let request = http::Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, "application/json")
			.body(payload)
			.map_err(ConfigError::from)?;
		let response = self.transport.execute(request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(RefreshError::Rejected { status: status.as_u16() });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let parsed: RefreshResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| RefreshError::ResponseParse { source, status: status.as_u16() })?;
		let access = TokenSecret::new(parsed.access);

		self.store.store_access_token(access.clone()).await?;

		Ok(access)
	}

	/// Clears token state and signals the login redirect after a terminal auth failure.
	///
	/// The redirect is a side effect on top of the returned error, never a replacement for it.
	async fn end_session(&self, cause: &RefreshError) {
		// Best effort; the session is over either way.
		match cause {
			RefreshError::MissingRefreshToken => {
				let _ = self.store.remove_access_token().await;
			},
			_ => {
				let _ = self.store.clear().await;
			},
		}

		if let Ok(login_url) = self.descriptor.login_url() {
			self.navigator.redirect_to_login(&login_url);
		}
	}
}
