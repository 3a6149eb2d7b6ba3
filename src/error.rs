//! Relay-level error types shared across the transport, cache, and lifecycle layers.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Labels the authentication operation that a provider rejection belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOperation {
	/// `POST Auth/Login` with the configured credential.
	Login,
	/// `GET Auth/RefreshToken/{refreshToken}` with the cached refresh token.
	Refresh,
}
impl AuthOperation {
	/// Returns a stable label suitable for span fields and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOperation::Login => "login",
			AuthOperation::Refresh => "refresh",
		}
	}
}
impl Display for AuthOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Login or refresh was rejected by the provider; never retried by the relay itself.
	#[error("Provider rejected the {operation} call (status {status}): {body}.")]
	Auth {
		/// Which authentication operation was rejected.
		operation: AuthOperation,
		/// HTTP status the provider answered with.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// Provider call quota is exhausted.
	///
	/// The message is the provider's own text (or the documented default) so callers can
	/// surface it directly without knowing provider internals.
	#[error("{message}")]
	RateLimited {
		/// Provider-supplied or default human-readable message.
		message: String,
	},
	/// Provider returned a non-success status outside the auth and rate-limit contracts.
	#[error("Provider returned status {status}: {body}.")]
	Upstream {
		/// HTTP status the provider answered with.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// Provider answered with a success status but a malformed envelope.
	#[error("Provider returned a malformed envelope.")]
	Decode {
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status the provider answered with.
		status: u16,
	},
	/// Transport failure (DNS, TCP, TLS).
	#[error("Network error occurred while calling the provider.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token replacement kept yielding an already-expired token.
	#[error("Token replacement kept yielding an expired token; check the configured lifetimes against the host clock.")]
	StaleClock,

	/// Local configuration problem; a startup-time fault, not a per-request one.
	#[error(transparent)]
	Settings(#[from] crate::settings::SettingsError),
	/// Cache backend failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
}
impl Error {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Returns `true` when the provider reported quota exhaustion.
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, Self::RateLimited { .. })
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::cache::CacheError;

	#[test]
	fn cache_error_converts_into_relay_error_with_source() {
		let cache_error = CacheError::Backend { message: "slot poisoned".into() };
		let relay_error: Error = cache_error.clone().into();

		assert!(matches!(relay_error, Error::Cache(_)));
		assert!(relay_error.to_string().contains("slot poisoned"));

		let source = StdError::source(&relay_error)
			.expect("Relay error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn rate_limited_displays_the_provider_message_verbatim() {
		let err = Error::RateLimited { message: "Kota aşıldı".into() };

		assert!(err.is_rate_limited());
		assert_eq!(err.to_string(), "Kota aşıldı");
	}

	#[test]
	fn auth_operation_labels_are_stable() {
		assert_eq!(AuthOperation::Login.to_string(), "login");
		assert_eq!(AuthOperation::Refresh.to_string(), "refresh");
	}
}
