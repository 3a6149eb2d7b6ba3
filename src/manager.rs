//! Token lifecycle orchestration: single-flight login, refresh with login fallback, and
//! a bounded re-ensure loop.
//!
//! [`TokenManager::ensure_token`] is the one entry point callers use before every
//! outbound authenticated call. The cache's get-or-create primitive is the only
//! concurrency control point; the expiry check and the remove+recreate pair are
//! deliberately not atomic, because racing replacers collapse inside the cache and the
//! loser's attempt is redundant rather than corrupting.

mod metrics;

pub use metrics::LifecycleMetrics;

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, TokenState},
	cache::TokenCache,
	client::ProviderClient,
	obs::{FlowKind, FlowSpan},
	settings::ProviderSettings,
};

/// Cache key under which the sole provider token lives.
pub const TOKEN_CACHE_KEY: &str = "awqat-salah-token";

/// Replacement attempts per `ensure_token` call before giving up.
///
/// A fresh login always yields an active token, so the loop resolves on the second pass
/// in practice; the cap only guards against pathological clock skew.
const MAX_ENSURE_ATTEMPTS: usize = 3;

/// Owns the when-to-login / when-to-refresh decision for the shared token slot.
///
/// Guarantees that a caller never observes a token known to be expired without at least
/// one replacement attempt. Login failures always propagate; refresh failures are
/// absorbed by falling back to a fresh login.
pub struct TokenManager {
	cache: Arc<dyn TokenCache>,
	client: ProviderClient,
	settings: Arc<ProviderSettings>,
	metrics: Arc<LifecycleMetrics>,
}
impl TokenManager {
	/// Creates a manager over the provided cache, transport client, and settings.
	pub fn new(
		cache: Arc<dyn TokenCache>,
		client: ProviderClient,
		settings: Arc<ProviderSettings>,
	) -> Self {
		Self { cache, client, settings, metrics: Default::default() }
	}

	/// Returns the lifecycle counters.
	pub fn metrics(&self) -> &LifecycleMetrics {
		&self.metrics
	}

	/// Returns a token valid at the moment of return, performing login or refresh as
	/// needed.
	///
	/// Concurrent callers racing on a cold cache collapse into a single login. The only
	/// exception to the validity guarantee is the accepted bounded-staleness race where
	/// a token expires between the cache lookup and the return.
	pub async fn ensure_token(&self) -> Result<BearerToken> {
		let span = FlowSpan::new(FlowKind::Ensure, "ensure_token");

		span.instrument(async move {
			let token = self.replace_until_active().await;

			if token.is_err() {
				self.metrics.record_failure();
			}

			token
		})
		.await
	}

	async fn replace_until_active(&self) -> Result<BearerToken> {
		for _ in 0..MAX_ENSURE_ATTEMPTS {
			let token = self.cached_or_login().await?;
			let now = OffsetDateTime::now_utc();

			match token.state_at(now, self.settings.refresh_token_lifetime()) {
				TokenState::Active => return Ok(token),
				TokenState::ExpiredRefreshable => return self.refresh_or_relogin(&token).await,
				TokenState::ExpiredUnrefreshable => {
					// The refresh window elapsed too; drop the slot so the next pass
					// takes the cold login path.
					self.cache.remove(TOKEN_CACHE_KEY).await?;
				},
			}
		}

		Err(Error::StaleClock)
	}

	/// Reads the cached token, logging in through the cache factory on a miss.
	async fn cached_or_login(&self) -> Result<BearerToken> {
		let expires_at = OffsetDateTime::now_utc() + self.settings.cache_window();
		let client = self.client.clone();
		let credential = self.settings.credential().clone();
		let metrics = self.metrics.clone();

		self.cache
			.get_or_create(
				TOKEN_CACHE_KEY,
				expires_at,
				Box::pin(async move {
					let span = FlowSpan::new(FlowKind::Login, "login_factory");

					span.instrument(async move {
						metrics.record_login();
						client.login(&credential).await
					})
					.await
				}),
			)
			.await
	}

	/// Handles an expired-but-refreshable token: refresh first, full login on failure.
	async fn refresh_or_relogin(&self, stale: &BearerToken) -> Result<BearerToken> {
		let span = FlowSpan::new(FlowKind::Refresh, "refresh_or_relogin");

		span.instrument(async move {
			self.metrics.record_refresh();

			let expires_at = OffsetDateTime::now_utc() + self.settings.cache_window();

			match self.client.refresh(stale.refresh_token()).await {
				Ok(fresh) => {
					// Replace, never edit in place; racing refreshers collapse into one
					// winner inside the cache.
					self.cache.remove(TOKEN_CACHE_KEY).await?;

					let replacement = fresh.clone();

					self.cache
						.get_or_create(
							TOKEN_CACHE_KEY,
							expires_at,
							Box::pin(async move { Ok(replacement) }),
						)
						.await
				},
				Err(err) => {
					#[cfg(feature = "tracing")]
					tracing::warn!(error = %err, "Refresh failed; falling back to a fresh login.");
					#[cfg(not(feature = "tracing"))]
					let _ = err;

					self.metrics.record_fallback();
					self.metrics.record_login();
					self.cache.remove(TOKEN_CACHE_KEY).await?;

					let fresh = self.client.login(self.settings.credential()).await?;

					// The login already happened, so the slot is written directly
					// instead of going through the factory again.
					self.cache.put(TOKEN_CACHE_KEY, fresh.clone(), expires_at).await?;

					Ok(fresh)
				},
			}
		})
		.await
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager").field("settings", &self.settings).finish()
	}
}
