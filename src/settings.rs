//! Provider connection settings and the validating builder used to construct them.

// self
use crate::{_prelude::*, auth::Credential};

const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;
const DEFAULT_REFRESH_LIFETIME_MINUTES: i64 = 30;

/// Errors raised while constructing or validating provider settings.
///
/// These are startup-time faults; a host that gets past [`ProviderSettingsBuilder::build`]
/// never sees them again on the request path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SettingsError {
	/// No account user name was supplied.
	#[error("Missing provider user name.")]
	MissingUserName,
	/// No account password was supplied.
	#[error("Missing provider password.")]
	MissingPassword,
	/// The access-token lifetime must be a positive number of minutes.
	#[error("Token lifetime must be positive, got {minutes} minutes.")]
	NonPositiveTokenLifetime {
		/// Rejected value.
		minutes: i64,
	},
	/// The refresh-token lifetime must be a positive number of minutes.
	#[error("Refresh token lifetime must be positive, got {minutes} minutes.")]
	NonPositiveRefreshLifetime {
		/// Rejected value.
		minutes: i64,
	},
	/// The provider base URL must use HTTPS unless explicitly overridden.
	#[error("The provider base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// A relative call path could not be joined onto the base URL.
	#[error("Call path cannot be joined onto the base URL: {path}.")]
	InvalidPath {
		/// Path that failed to join.
		path: String,
	},
}

/// Builder for [`ProviderSettings`] values.
///
/// Deserializable so hosts can load it straight from their configuration layer; call
/// [`build`](Self::build) to validate and obtain usable settings.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderSettingsBuilder {
	/// Base address of the provider API.
	pub base_url: Url,
	/// Account user name (the provider's login body calls this `Email`).
	pub user_name: String,
	/// Account password.
	pub password: String,
	/// Access-token lifetime in minutes; the relay always trusts this constant over any
	/// provider-supplied metadata.
	#[serde(default = "default_token_lifetime_minutes")]
	pub token_lifetime_minutes: i64,
	/// Refresh-token lifetime in minutes, counted from access-token expiry.
	#[serde(default = "default_refresh_lifetime_minutes")]
	pub refresh_token_lifetime_minutes: i64,
	/// Accepts a plain-HTTP base URL; meant for tests against local mock servers.
	#[serde(default)]
	pub allow_insecure_base_url: bool,
}
impl ProviderSettingsBuilder {
	/// Creates a builder seeded with the base URL and credential, using the default
	/// 60/30-minute lifetimes.
	pub fn new(
		base_url: Url,
		user_name: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			base_url,
			user_name: user_name.into(),
			password: password.into(),
			token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
			refresh_token_lifetime_minutes: DEFAULT_REFRESH_LIFETIME_MINUTES,
			allow_insecure_base_url: false,
		}
	}

	/// Overrides the access-token lifetime in minutes.
	pub fn token_lifetime_minutes(mut self, minutes: i64) -> Self {
		self.token_lifetime_minutes = minutes;

		self
	}

	/// Overrides the refresh-token lifetime in minutes.
	pub fn refresh_token_lifetime_minutes(mut self, minutes: i64) -> Self {
		self.refresh_token_lifetime_minutes = minutes;

		self
	}

	/// Accepts a plain-HTTP base URL.
	pub fn allow_insecure_base_url(mut self) -> Self {
		self.allow_insecure_base_url = true;

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<ProviderSettings, SettingsError> {
		if self.user_name.trim().is_empty() {
			return Err(SettingsError::MissingUserName);
		}
		if self.password.trim().is_empty() {
			return Err(SettingsError::MissingPassword);
		}
		if self.token_lifetime_minutes <= 0 {
			return Err(SettingsError::NonPositiveTokenLifetime {
				minutes: self.token_lifetime_minutes,
			});
		}
		if self.refresh_token_lifetime_minutes <= 0 {
			return Err(SettingsError::NonPositiveRefreshLifetime {
				minutes: self.refresh_token_lifetime_minutes,
			});
		}
		if self.base_url.scheme() != "https" && !self.allow_insecure_base_url {
			return Err(SettingsError::InsecureBaseUrl { url: self.base_url.to_string() });
		}

		Ok(ProviderSettings {
			base_url: self.base_url,
			credential: Credential::new(self.user_name, self.password),
			token_lifetime: Duration::minutes(self.token_lifetime_minutes),
			refresh_token_lifetime: Duration::minutes(self.refresh_token_lifetime_minutes),
		})
	}
}

/// Validated connection settings for the prayer-times provider.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
	base_url: Url,
	credential: Credential,
	token_lifetime: Duration,
	refresh_token_lifetime: Duration,
}
impl ProviderSettings {
	/// Returns a builder seeded with the provided base URL and credential.
	pub fn builder(
		base_url: Url,
		user_name: impl Into<String>,
		password: impl Into<String>,
	) -> ProviderSettingsBuilder {
		ProviderSettingsBuilder::new(base_url, user_name, password)
	}

	/// Returns the provider base address.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns the login credential.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Returns the configured access-token lifetime.
	pub fn token_lifetime(&self) -> Duration {
		self.token_lifetime
	}

	/// Returns the configured refresh-token lifetime.
	pub fn refresh_token_lifetime(&self) -> Duration {
		self.refresh_token_lifetime
	}

	/// Returns the cache grace window: access lifetime plus refresh lifetime.
	///
	/// Entries outlive the access token by the refresh window so the lifecycle manager
	/// can still decide refresh-vs-relogin after the access token has expired.
	pub fn cache_window(&self) -> Duration {
		self.token_lifetime + self.refresh_token_lifetime
	}
}

fn default_token_lifetime_minutes() -> i64 {
	DEFAULT_TOKEN_LIFETIME_MINUTES
}

fn default_refresh_lifetime_minutes() -> i64 {
	DEFAULT_REFRESH_LIFETIME_MINUTES
}
