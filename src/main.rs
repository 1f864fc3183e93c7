//! Demonstration driver for the LRU cache engine
//!
//! Mirrors the typical embedding: one shared cache, many concurrent writers,
//! an eviction subscriber, and a background expiry sweeper with a
//! deterministic shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_cache_engine::{spawn_sweeper, Config, ExpirationPolicy, LruCache};

/// Small capacity so evictions are visible in the demo output.
const DEMO_CAPACITY: usize = 5;
const WRITERS: usize = 10;
const PUTS_PER_WRITER: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_cache_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "starting cache demo: capacity={}, sweep_interval={}s",
        DEMO_CAPACITY, config.sweep_interval
    );

    let cache: Arc<LruCache<u32, String>> =
        Arc::new(LruCache::new(DEMO_CAPACITY).context("failed to construct cache")?);

    cache.subscribe(|key, reason| {
        println!("evicted key: {key} ({reason})");
    });

    let sweeper = spawn_sweeper(cache.clone(), config.sweep_interval_duration());

    // Concurrent writers hammering a shared key space, as a host process would
    let mut workers = Vec::with_capacity(WRITERS);
    for writer in 0..WRITERS {
        let cache = cache.clone();
        workers.push(tokio::spawn(async move {
            for i in 0..PUTS_PER_WRITER {
                // Scatter keys over 1..=100 so writers collide and evict
                let key = (writer as u32 * 37 + i * 17) % 100 + 1;
                let value = format!("{key}_CacheItem");
                println!("writer {writer} putting key: {key}");
                cache
                    .put_with_policy(
                        key,
                        value,
                        ExpirationPolicy::Sliding(Duration::from_secs(120)),
                    )
                    .await?;
            }
            Ok::<(), lru_cache_engine::CacheError>(())
        }));
    }
    for worker in workers {
        worker.await?.context("writer task failed")?;
    }

    // Read back whatever survived the capacity pressure
    for key in [1u32, 50, 100] {
        match cache.get(&key).await? {
            Some(value) => println!("get({key}) = {value}"),
            None => println!("get({key}) = not found"),
        }
    }

    sweeper.stop().await;

    let stats = cache.stats().await;
    println!(
        "final stats: {}",
        serde_json::to_string_pretty(&stats).context("failed to serialize stats")?
    );
    info!("demo complete: hit rate {:.2}", stats.hit_rate());

    Ok(())
}
