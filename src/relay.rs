//! Thin authenticated pass-through over the lifecycle manager and transport client.

// crates.io
use reqwest::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	cache::{MemoryTokenCache, TokenCache},
	client::ProviderClient,
	manager::TokenManager,
	obs::{FlowKind, FlowSpan},
	settings::ProviderSettings,
};

/// Facade combining the lifecycle manager and the transport client.
///
/// Construct one per provider account and share it; every call ensures a fresh bearer
/// token before dispatching. The relay absorbs nothing: rate-limit errors surface with
/// the provider's own message and every other failure keeps its original status + body.
#[derive(Debug)]
pub struct Relay {
	manager: TokenManager,
	client: ProviderClient,
}
impl Relay {
	/// Builds a relay backed by the in-memory cache and a default reqwest client.
	pub fn new(settings: ProviderSettings) -> Self {
		Self::with_parts(Arc::new(MemoryTokenCache::default()), ReqwestClient::default(), settings)
	}

	/// Builds a relay with a caller-provided cache and HTTP client.
	pub fn with_parts(
		cache: Arc<dyn TokenCache>,
		http: ReqwestClient,
		settings: ProviderSettings,
	) -> Self {
		let settings = Arc::new(settings);
		let client = ProviderClient::with_client(http, settings.clone());
		let manager = TokenManager::new(cache, client.clone(), settings);

		Self { manager, client }
	}

	/// Returns the lifecycle manager, e.g. for hosts that pre-warm the token at startup.
	pub fn manager(&self) -> &TokenManager {
		&self.manager
	}

	/// Issues an authenticated GET; `Ok(None)` means the provider answered a success
	/// status with no data.
	pub async fn get<T>(&self, path: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.call::<T, ()>(Method::GET, path, None).await
	}

	/// Issues an authenticated POST carrying `body` as JSON.
	pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: Serialize + ?Sized,
	{
		self.call(Method::POST, path, Some(body)).await
	}

	async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: Serialize + ?Sized,
	{
		let span = FlowSpan::new(FlowKind::Call, "call");

		span.instrument(async move {
			let token = self.manager.ensure_token().await?;

			self.client.dispatch(method, path, body, &token).await
		})
		.await
	}
}
