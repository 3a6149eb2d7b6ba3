//! Raw HTTP transport against the provider: login, refresh, and authenticated dispatch.

// crates.io
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Credential},
	error::AuthOperation,
	settings::ProviderSettings,
};

/// Message reported when a rate-limit body carries no parsable text.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Kota aşıldı";

const LOGIN_PATH: &str = "Auth/Login";
const REFRESH_PATH: &str = "Auth/RefreshToken";

/// Envelope wrapping every successful provider response; only `data` matters here.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
	data: Option<T>,
}

/// Token pair inside the `data` field of login and refresh envelopes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrant {
	access_token: String,
	refresh_token: String,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
	#[serde(rename = "Email")]
	email: &'a str,
	#[serde(rename = "Password")]
	password: &'a str,
}

/// HTTP client bound to the provider base address.
///
/// Every call builds a fresh request carrying its own bearer header; shared default
/// headers are never mutated, so a stale token cannot leak across concurrent calls.
#[derive(Clone, Debug)]
pub struct ProviderClient {
	http: ReqwestClient,
	settings: Arc<ProviderSettings>,
}
impl ProviderClient {
	/// Creates a client with a default reqwest transport.
	pub fn new(settings: Arc<ProviderSettings>) -> Self {
		Self::with_client(ReqwestClient::default(), settings)
	}

	/// Wraps an existing reqwest client, e.g. one with custom TLS or proxy settings.
	pub fn with_client(http: ReqwestClient, settings: Arc<ProviderSettings>) -> Self {
		Self { http, settings }
	}

	/// Performs `POST Auth/Login` and stamps a locally computed expiry on the result.
	pub async fn login(&self, credential: &Credential) -> Result<BearerToken> {
		let body = LoginBody { email: credential.user_name(), password: credential.password() };
		let response = self.http.post(self.endpoint(LOGIN_PATH)?).json(&body).send().await?;

		self.grant(AuthOperation::Login, response).await
	}

	/// Performs `GET Auth/RefreshToken/{refreshToken}`; same contract and expiry
	/// stamping rule as login.
	pub async fn refresh(&self, refresh_token: &str) -> Result<BearerToken> {
		let response =
			self.http.get(self.endpoint(&format!("{REFRESH_PATH}/{refresh_token}"))?).send().await?;

		self.grant(AuthOperation::Refresh, response).await
	}

	/// Sends an authenticated call and returns the envelope's `data` field.
	///
	/// `Ok(None)` means the provider answered with a success status but no payload,
	/// which callers treat as "no data" rather than an error. HTTP 406 is the
	/// provider's rate-limit signal and surfaces as [`Error::RateLimited`] with the
	/// extracted body message.
	pub async fn dispatch<T, B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		token: &BearerToken,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: Serialize + ?Sized,
	{
		let mut request =
			self.http.request(method, self.endpoint(path)?).bearer_auth(token.access_token());

		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await?;
		let status = response.status();

		if status == StatusCode::NOT_ACCEPTABLE {
			let body = response.text().await.unwrap_or_default();

			return Err(Error::RateLimited { message: rate_limit_message(&body) });
		}
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();

			return Err(Error::Upstream { status: status.as_u16(), body });
		}

		let bytes = response.bytes().await?;

		if bytes.is_empty() {
			return Ok(None);
		}

		let envelope: Envelope<T> = decode(&bytes, status.as_u16())?;

		Ok(envelope.data)
	}

	async fn grant(&self, operation: AuthOperation, response: Response) -> Result<BearerToken> {
		let status = response.status();

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();

			return Err(Error::Auth { operation, status: status.as_u16(), body });
		}

		let issued_at = OffsetDateTime::now_utc();
		let bytes = response.bytes().await?;
		let envelope: Envelope<TokenGrant> = decode(&bytes, status.as_u16())?;
		let grant = envelope.data.ok_or_else(|| Error::Upstream {
			status: status.as_u16(),
			body: "Grant envelope carried no data.".into(),
		})?;

		Ok(BearerToken::issued(
			grant.access_token,
			grant.refresh_token,
			issued_at,
			self.settings.token_lifetime(),
		))
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		self.settings
			.base_url()
			.join(path)
			.map_err(|_| crate::settings::SettingsError::InvalidPath { path: path.into() }.into())
	}
}

fn decode<T>(bytes: &[u8], status: u16) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status })
}

/// Extracts the human-readable message from a rate-limit body.
///
/// The provider is inconsistent about casing, so `message` is tried before `Message`;
/// unparsable bodies fall back to [`DEFAULT_RATE_LIMIT_MESSAGE`].
fn rate_limit_message(body: &str) -> String {
	let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
		return DEFAULT_RATE_LIMIT_MESSAGE.into();
	};

	["message", "Message"]
		.into_iter()
		.find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
		.map(str::to_owned)
		.unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rate_limit_message_prefers_lowercase_then_capitalized() {
		assert_eq!(rate_limit_message(r#"{"message": "Kota aşıldı"}"#), "Kota aşıldı");
		assert_eq!(rate_limit_message(r#"{"Message": "Kota aşıldı"}"#), "Kota aşıldı");
		assert_eq!(
			rate_limit_message(r#"{"message": "first", "Message": "second"}"#),
			"first",
		);
	}

	#[test]
	fn rate_limit_message_falls_back_on_unparsable_bodies() {
		assert_eq!(rate_limit_message("<html>quota</html>"), DEFAULT_RATE_LIMIT_MESSAGE);
		assert_eq!(rate_limit_message(""), DEFAULT_RATE_LIMIT_MESSAGE);
		assert_eq!(rate_limit_message(r#"{"detail": "other"}"#), DEFAULT_RATE_LIMIT_MESSAGE);
	}

	#[test]
	fn grant_envelopes_deserialize_the_camel_case_data_field() {
		let envelope: Envelope<TokenGrant> =
			serde_json::from_str(r#"{"data":{"accessToken":"A1","refreshToken":"R1"}}"#)
				.expect("Grant envelope fixture should deserialize.");
		let grant = envelope.data.expect("Grant data should be present.");

		assert_eq!(grant.access_token, "A1");
		assert_eq!(grant.refresh_token, "R1");
	}
}
