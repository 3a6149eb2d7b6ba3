//! Bearer token record and the expiry state machine driving lifecycle decisions.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Lifecycle classification for a cached bearer token at a given instant.
///
/// The lifecycle manager branches on this value instead of using errors for control
/// flow: `ExpiredRefreshable` means "attempt a refresh", `ExpiredUnrefreshable` means
/// "only a fresh login helps".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// The access token is still valid.
	Active,
	/// The access token expired, but the refresh token is still inside its window.
	ExpiredRefreshable,
	/// Both the access token and the refresh window have elapsed.
	ExpiredUnrefreshable,
}

/// Immutable bearer token issued by a login or refresh call.
///
/// Tokens are superseded, never mutated in place; any later login or refresh produces a
/// replacement record.
#[derive(Clone)]
pub struct BearerToken {
	access_token: TokenSecret,
	refresh_token: TokenSecret,
	issued_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl BearerToken {
	/// Builds a token stamped with a locally computed expiry.
	///
	/// The expiry is always `issued_at + lifetime` using the configured constant; any
	/// lifetime metadata the provider might return is deliberately ignored.
	pub fn issued(
		access_token: impl Into<String>,
		refresh_token: impl Into<String>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
			issued_at,
			expires_at: issued_at + lifetime,
		}
	}

	/// Returns the opaque access token attached to authenticated calls.
	pub fn access_token(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns the refresh token used to obtain a replacement without re-sending the
	/// password.
	pub fn refresh_token(&self) -> &str {
		self.refresh_token.expose()
	}

	/// Returns the instant the token was issued.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Returns the instant the access token stops being valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Returns `true` once the access token's lifetime has elapsed at `now`.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}

	/// Classifies the token against the refresh window at the given instant.
	///
	/// Elapsed time since expiry strictly below `refresh_window` keeps the refresh token
	/// usable; meeting or exceeding the window requires a fresh login.
	pub fn state_at(&self, now: OffsetDateTime, refresh_window: Duration) -> TokenState {
		if now < self.expires_at {
			return TokenState::Active;
		}
		if now - self.expires_at < refresh_window {
			return TokenState::ExpiredRefreshable;
		}

		TokenState::ExpiredUnrefreshable
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
