//! Login navigation contracts that let embedding shells react when a session ends.

// self
use crate::_prelude::*;

/// Sink notified when the client abandons the session and the user must sign in again.
///
/// The client invokes [`redirect_to_login`](LoginNavigator::redirect_to_login) once per terminal
/// auth failure, in addition to (never instead of) surfacing the error to the caller.
/// Implementations decide what navigation means for their surface: a web shell swaps the view, a
/// desktop app opens its sign-in window, a headless job can simply log and exit.
pub trait LoginNavigator
where
	Self: Send + Sync,
{
	/// Sends the user to the login view at `login_url`.
	fn redirect_to_login(&self, login_url: &Url);
}

/// No-op navigator for callers that only observe the returned errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl LoginNavigator for NoopNavigator {
	fn redirect_to_login(&self, _login_url: &Url) {}
}
