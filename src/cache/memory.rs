//! Thread-safe in-memory [`TokenCache`] with single-flight factory execution.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	cache::{CacheFuture, TokenCache, TokenFactory},
};

#[derive(Clone, Debug)]
struct Entry {
	token: BearerToken,
	expires_at: OffsetDateTime,
}

/// In-memory cache suitable for single-process hosts and tests.
///
/// A per-key async mutex serializes factory execution, so racing cold-cache callers
/// collapse into one provider login and the losers receive the winner's token.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
	entries: RwLock<HashMap<String, Entry>>,
	guards: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl MemoryTokenCache {
	/// Returns (and creates on demand) the single-flight guard for a key.
	fn guard(&self, key: &str) -> Arc<AsyncMutex<()>> {
		let mut guards = self.guards.lock();

		guards.entry(key.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}

	fn live_entry(&self, key: &str, now: OffsetDateTime) -> Option<BearerToken> {
		let entries = self.entries.read();

		entries.get(key).filter(|entry| now < entry.expires_at).map(|entry| entry.token.clone())
	}

	fn insert(&self, key: &str, token: BearerToken, expires_at: OffsetDateTime) {
		self.entries.write().insert(key.to_owned(), Entry { token, expires_at });
	}
}
impl TokenCache for MemoryTokenCache {
	fn get_or_create<'a>(
		&'a self,
		key: &'a str,
		expires_at: OffsetDateTime,
		factory: TokenFactory<'a>,
	) -> CacheFuture<'a, BearerToken> {
		Box::pin(async move {
			// Fast path skips the guard entirely; hits never contend with an in-flight factory.
			if let Some(token) = self.live_entry(key, OffsetDateTime::now_utc()) {
				return Ok(token);
			}

			let guard = self.guard(key);
			let _singleflight = guard.lock().await;

			// Double-check under the guard: a concurrent miss may have filled the slot.
			if let Some(token) = self.live_entry(key, OffsetDateTime::now_utc()) {
				return Ok(token);
			}

			let token = factory.await?;

			self.insert(key, token.clone(), expires_at);

			Ok(token)
		})
	}

	fn put<'a>(
		&'a self,
		key: &'a str,
		token: BearerToken,
		expires_at: OffsetDateTime,
	) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			self.insert(key, token, expires_at);

			Ok(())
		})
	}

	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			self.entries.write().remove(key);

			Ok(())
		})
	}
}
