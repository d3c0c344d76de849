//! Access/refresh token pair as issued at login.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Token pair produced by a successful sign-in.
///
/// The access secret authenticates every ordinary request; the refresh secret is exchanged for a
/// replacement access secret when the backend rejects the current one. A refresh exchange
/// rewrites only the access slot, so the pair as stored keeps its refresh secret until the
/// session ends.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Access token attached as the bearer credential.
	pub access: TokenSecret,
	/// Refresh token exchanged when the access token is rejected.
	pub refresh: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from raw secret strings.
	pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
		Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) }
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access", &"<redacted>")
			.field("refresh", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn pair_debug_redacts_both_slots() {
		let pair = TokenPair::new("A1", "R1");

		assert_eq!(format!("{pair:?}"), "TokenPair { access: \"<redacted>\", refresh: \"<redacted>\" }");
	}
}
