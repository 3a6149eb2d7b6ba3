//! Redacting wrappers for token material and the login credential.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Login credential for the provider.
///
/// Loaded once from settings and never cached alongside the token; the password only
/// leaves this type when the transport client serializes the login body.
#[derive(Clone)]
pub struct Credential {
	user_name: String,
	password: TokenSecret,
}
impl Credential {
	/// Creates a credential from the configured user name and password.
	pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
		Self { user_name: user_name.into(), password: TokenSecret::new(password) }
	}

	/// Returns the account user name (the provider calls this field `Email`).
	pub fn user_name(&self) -> &str {
		&self.user_name
	}

	/// Returns the password for login body construction only.
	pub(crate) fn password(&self) -> &str {
		self.password.expose()
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("user_name", &self.user_name)
			.field("password", &self.password)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn credential_debug_redacts_the_password() {
		let credential = Credential::new("relay@example.com", "hunter2");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains("relay@example.com"));
		assert!(!rendered.contains("hunter2"));
	}
}
