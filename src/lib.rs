//! Managed relay for the Awqat Salah prayer-times API—username/password login exchanged
//! for a short-lived bearer token, single-flight token caching, refresh with automatic
//! login fallback, and rate-limit aware authenticated calls.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod manager;
pub mod obs;
pub mod relay;
pub mod settings;

#[cfg(any(test, feature = "test"))]
pub mod testkit {
	//! Convenience helpers for integration tests driving the relay against a mock provider.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::BearerToken,
		cache::{MemoryTokenCache, TokenCache},
		manager::TOKEN_CACHE_KEY,
		relay::Relay,
		settings::{ProviderSettings, ProviderSettingsBuilder},
	};

	/// Returns a settings builder seeded with fixture credentials against a mock base URL.
	///
	/// The builder accepts the plain-HTTP endpoints `httpmock` serves during tests.
	pub fn test_settings(base_url: &str) -> ProviderSettingsBuilder {
		let base_url = Url::parse(base_url).expect("Mock base URL should parse successfully.");

		ProviderSettings::builder(base_url, "relay@example.com", "fixture-password")
			.allow_insecure_base_url()
	}

	/// Constructs a [`Relay`] backed by a shared in-memory cache so tests can seed and
	/// inspect the token slot directly.
	pub fn build_test_relay(settings: ProviderSettings) -> (Relay, Arc<MemoryTokenCache>) {
		let cache = Arc::new(MemoryTokenCache::default());
		let relay = Relay::with_parts(cache.clone(), ReqwestClient::default(), settings);

		(relay, cache)
	}

	/// Seeds the shared token slot with a token issued at the provided instant.
	///
	/// The cache entry expires at `issued_at` plus the configured grace window, matching
	/// what the lifecycle manager would have written itself.
	pub async fn seed_token(
		cache: &MemoryTokenCache,
		settings: &ProviderSettings,
		access: &str,
		refresh: &str,
		issued_at: OffsetDateTime,
	) {
		let token = BearerToken::issued(access, refresh, issued_at, settings.token_lifetime());

		cache
			.put(TOKEN_CACHE_KEY, token, issued_at + settings.cache_window())
			.await
			.expect("Seeding the token slot should succeed.");
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {awqat_relay as _, httpmock as _, tokio as _};
