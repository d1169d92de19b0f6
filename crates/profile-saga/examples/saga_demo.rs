//! Runs the saga over a profile creation and a LEGACY→MANUAL update,
//! printing what each collaborator received.
//!
//! ```sh
//! cargo run -p profile-saga --example saga_demo
//! ```

use std::sync::Arc;

use chrono::Utc;
use memory_adapters::{MemoryFeed, MemoryQueue, MemoryStore, MemoryTransport};
use profile_core::{
    Channel, NotificationMode, PreferencesSettings, Profile, ProfileChangeEvent,
};
use profile_saga::{SagaConfig, SagaCoordinator, TokenIssuer, DEFAULT_MIGRATION_QUEUE};

fn profile(version: u64) -> Profile {
    Profile {
        fiscal_key: "AAABBB80A01C123D".to_string(),
        version,
        email: Some("user@example.com".to_string()),
        is_email_validated: true,
        is_inbox_enabled: true,
        is_webhook_enabled: false,
        is_email_enabled: true,
        preferences_settings: PreferencesSettings::legacy(),
        blocked_inbox_or_channels: [(
            "svc1".to_string(),
            [Channel::Inbox].into_iter().collect(),
        )]
        .into_iter()
        .collect(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    let feed = Arc::new(MemoryFeed::new());
    let transport = Arc::new(MemoryTransport::new());

    let coordinator = SagaCoordinator::new(
        store.clone(),
        queue.clone(),
        feed.clone(),
        transport.clone(),
        store.clone(),
        TokenIssuer::default(),
        SagaConfig {
            cashback_enabled: true,
            notify_queue: Some("profile-changes".to_string()),
            ..SagaConfig::default()
        },
    );

    // Creation: profile-level subscribe plus the welcome messages.
    let created = ProfileChangeEvent {
        new_profile: profile(0),
        old_profile: None,
        updated_at: Utc::now(),
    };
    let report = coordinator.run_event(&created).await?;
    println!(
        "creation: {} feed event(s), {} welcome message(s)",
        report.feed_events.len(),
        report.welcome_sent.len()
    );

    // Opting in to MANUAL: unsubscribe plus the legacy migration batch.
    let old = profile(0);
    let new = Profile {
        version: 1,
        preferences_settings: PreferencesSettings {
            mode: NotificationMode::Manual,
            version: 0,
        },
        blocked_inbox_or_channels: Default::default(),
        ..old.clone()
    };
    let updated = ProfileChangeEvent {
        new_profile: new,
        old_profile: Some(old),
        updated_at: Utc::now(),
    };
    let report = coordinator.run_event(&updated).await?;
    println!(
        "opt-in: {} feed event(s), migrated batch of {:?}",
        report.feed_events.len(),
        report.migrated
    );

    for message in queue.messages(DEFAULT_MIGRATION_QUEUE).await {
        println!("migration queue received: {message}");
    }
    for message in queue.messages("profile-changes").await {
        println!("notify queue received: {message}");
    }

    Ok(())
}
