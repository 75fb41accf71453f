//! Walks through a sync session against a simulated remote
//!
//! Run with `cargo run -p quotesync-sync-engine --example sync_demo`.
//! Set `RUST_LOG=debug` for the full log.

use quotesync_config::{Config, ConfigManager};
use quotesync_core::{QuoteRecord, RecordId, UuidGenerator};
use quotesync_store::{KeyValueStore, RecordStore, StoreKeys};
use quotesync_sync_engine::{
    KvRemoteGateway, RemoteGateway, ResolutionStrategy, SyncContext, SyncCoordinator,
    SyncOutcome, SyncScheduler, TimeoutGateway,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    manager.initialize()?;
    let config: Config = manager.load_with_env_overrides()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.as_filter()),
    )
    .init();

    println!("QuoteSync Demo");
    println!("==============\n");

    let backend: Arc<dyn KeyValueStore> = Arc::new(manager.open_storage(&config));
    let store = RecordStore::new(backend.clone(), Arc::new(UuidGenerator)).with_keys(StoreKeys {
        records: config.storage.records_key.clone(),
        filter: config.storage.filter_key.clone(),
    });
    let context = Arc::new(SyncContext::new(store));
    let gateway = TimeoutGateway::new(
        KvRemoteGateway::new(backend.clone(), config.storage.remote_key.clone()),
        config.sync.gateway_timeout(),
    );
    let coordinator = Arc::new(SyncCoordinator::new(context.clone(), gateway));

    println!("1. First sync");
    println!("-------------");
    context.add_quote("Simplicity is prerequisite for reliability.", "software", Some("Edsger Dijkstra"))?;
    report(&coordinator, coordinator.sync().await?)?;

    println!("\n2. Another device edits a quote");
    println!("-------------------------------");
    let mut remote = coordinator.gateway().fetch_all().await?;
    if let Some(first) = remote.first_mut() {
        first.text = "Edited elsewhere: ".to_string() + &first.text;
        first.version += 1;
    }
    remote.push(
        QuoteRecord::new(RecordId::new(), "Well begun is half done.", "wisdom", Some("Aristotle"))?
            .with_version(1),
    );
    coordinator.gateway().push_all(&remote).await?;
    report(&coordinator, coordinator.sync().await?)?;

    if let Some(pending) = coordinator.pending_conflicts()? {
        for entry in &pending.entries {
            println!(
                "  conflict on {}: local v{} vs remote v{}",
                entry.id, entry.local.version, entry.remote.version
            );
        }
    }
    println!("  next sync: {}", match coordinator.sync().await {
        Ok(_) => "ran".to_string(),
        Err(e) => e.to_string(),
    });

    println!("\n3. Resolve by merging");
    println!("---------------------");
    let resolution = coordinator.resolve(ResolutionStrategy::Merge).await?;
    println!("  {} ({} quotes)", coordinator.status()?, resolution.records);

    println!("\n4. Filtering");
    println!("------------");
    println!("  categories: {}", context.categories()?.join(", "));
    context.set_filter(Some("wisdom"))?;
    for quote in context.filtered_records()? {
        println!("  \"{}\" ({})", quote.text, quote.author);
    }

    println!("\n5. Scheduled sync");
    println!("-----------------");
    let scheduler = SyncScheduler::new(Duration::from_millis(200), config.sync.initial_delay() / 10);
    let handle = scheduler.spawn(coordinator.clone());
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.stop().await;
    println!("  {}", coordinator.status()?);

    Ok(())
}

fn report<G: RemoteGateway>(
    coordinator: &SyncCoordinator<G>,
    outcome: SyncOutcome,
) -> Result<(), Box<dyn Error>> {
    match outcome {
        SyncOutcome::Synced { records, local_only, .. } => {
            println!("  synced {} quotes ({} new from this device)", records, local_only)
        }
        SyncOutcome::Conflicts(count) => println!("  {} conflicts found", count),
    }
    println!("  status: {}", coordinator.status()?);
    Ok(())
}
