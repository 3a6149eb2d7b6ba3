//! Expiring token cache contract and the built-in in-memory implementation.

pub mod memory;

pub use memory::MemoryTokenCache;

// self
use crate::{_prelude::*, auth::BearerToken};

/// Boxed future returned by cache operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Async factory awaited on a cache miss.
///
/// Factories are lazy futures; an implementation that finds a live entry simply drops
/// the factory without side effects.
pub type TokenFactory<'a> = Pin<Box<dyn Future<Output = Result<BearerToken>> + 'a + Send>>;

/// Expiring key-value contract the lifecycle manager drives.
///
/// Implementations MUST guarantee single-flight creation: concurrent misses for the
/// same key await the one in-flight factory instead of each starting their own. That
/// guarantee is the relay's only concurrency control point, so a backend that runs
/// factories per caller would multiply login calls against the provider.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the live cached token, or awaits `factory` and stores its result until
	/// `expires_at`.
	///
	/// Entries past their absolute expiry count as misses.
	fn get_or_create<'a>(
		&'a self,
		key: &'a str,
		expires_at: OffsetDateTime,
		factory: TokenFactory<'a>,
	) -> CacheFuture<'a, BearerToken>;

	/// Stores `token` under `key` until `expires_at`, replacing any existing entry.
	fn put<'a>(
		&'a self,
		key: &'a str,
		token: BearerToken,
		expires_at: OffsetDateTime,
	) -> CacheFuture<'a, ()>;

	/// Removes the entry under `key`, if any.
	fn remove<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the storage engine.
	#[error("Cache backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
