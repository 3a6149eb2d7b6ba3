// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use awqat_relay::{
	auth::BearerToken,
	cache::{MemoryTokenCache, TokenCache, TokenFactory},
	testkit::*,
};

fn fixture_token(access: &str) -> BearerToken {
	BearerToken::issued(access, "refresh", OffsetDateTime::now_utc(), Duration::minutes(60))
}

fn counting_factory(runs: Arc<AtomicUsize>, access: &'static str) -> TokenFactory<'static> {
	Box::pin(async move {
		runs.fetch_add(1, Ordering::SeqCst);

		Ok(fixture_token(access))
	})
}

#[tokio::test]
async fn concurrent_misses_collapse_into_one_factory_run() {
	let cache = MemoryTokenCache::default();
	let runs = Arc::new(AtomicUsize::new(0));
	let expires_at = OffsetDateTime::now_utc() + Duration::minutes(90);
	let (first, second) = tokio::join!(
		cache.get_or_create("slot", expires_at, counting_factory(runs.clone(), "token-a")),
		cache.get_or_create("slot", expires_at, counting_factory(runs.clone(), "token-b")),
	);
	let first = first.expect("First get_or_create should succeed.");
	let second = second.expect("Second get_or_create should succeed.");

	assert_eq!(runs.load(Ordering::SeqCst), 1);
	assert_eq!(first.access_token(), second.access_token());
}

#[tokio::test]
async fn live_entry_is_returned_without_running_the_factory() {
	let cache = MemoryTokenCache::default();
	let runs = Arc::new(AtomicUsize::new(0));
	let expires_at = OffsetDateTime::now_utc() + Duration::minutes(90);

	cache
		.put("slot", fixture_token("cached"), expires_at)
		.await
		.expect("Seeding the cache should succeed.");

	let token = cache
		.get_or_create("slot", expires_at, counting_factory(runs.clone(), "fresh"))
		.await
		.expect("get_or_create should succeed on a warm cache.");

	assert_eq!(token.access_token(), "cached");
	assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn entry_past_its_absolute_expiry_counts_as_a_miss() {
	let cache = MemoryTokenCache::default();
	let runs = Arc::new(AtomicUsize::new(0));
	let stale_expiry = OffsetDateTime::now_utc() - Duration::minutes(1);

	cache
		.put("slot", fixture_token("stale"), stale_expiry)
		.await
		.expect("Seeding the cache should succeed.");

	let fresh_expiry = OffsetDateTime::now_utc() + Duration::minutes(90);
	let token = cache
		.get_or_create("slot", fresh_expiry, counting_factory(runs.clone(), "fresh"))
		.await
		.expect("get_or_create should succeed past the absolute expiry.");

	assert_eq!(token.access_token(), "fresh");
	assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remove_leaves_the_next_lookup_cold() {
	let cache = MemoryTokenCache::default();
	let runs = Arc::new(AtomicUsize::new(0));
	let expires_at = OffsetDateTime::now_utc() + Duration::minutes(90);

	cache
		.put("slot", fixture_token("cached"), expires_at)
		.await
		.expect("Seeding the cache should succeed.");
	cache.remove("slot").await.expect("Removal should succeed.");

	let token = cache
		.get_or_create("slot", expires_at, counting_factory(runs.clone(), "recreated"))
		.await
		.expect("get_or_create should succeed after removal.");

	assert_eq!(token.access_token(), "recreated");
	assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn put_replaces_the_existing_entry() {
	let cache = MemoryTokenCache::default();
	let runs = Arc::new(AtomicUsize::new(0));
	let expires_at = OffsetDateTime::now_utc() + Duration::minutes(90);

	cache
		.put("slot", fixture_token("first"), expires_at)
		.await
		.expect("First put should succeed.");
	cache
		.put("slot", fixture_token("second"), expires_at)
		.await
		.expect("Second put should succeed.");

	let token = cache
		.get_or_create("slot", expires_at, counting_factory(runs.clone(), "unused"))
		.await
		.expect("get_or_create should succeed on a warm cache.");

	assert_eq!(token.access_token(), "second");
	assert_eq!(runs.load(Ordering::SeqCst), 0);
}
