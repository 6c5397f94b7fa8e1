//! FateSheet Player - composition root binary.
//!
//! Runs headless: wires the store, placement front-end and generation
//! service from configuration and logs the sheet. With an idea on the command
//! line it also asks the backend for a skeleton and applies it.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fatesheet_domain::{CharacterState, MetadataPatch, UuidIdGenerator};
use fatesheet_player::infrastructure::{HttpGenerationClient, LogFeedback, SystemClock};
use fatesheet_player::ports::outbound::{ClockPort, FeedbackPort, GenerationPort};
use fatesheet_player::{
    create_front_end, GenerationOutcome, GenerationService, PlayerConfig, SheetStore,
};
use fatesheet_shared::GenerationMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fatesheet_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FateSheet Player");

    let config = PlayerConfig::from_env().context("invalid player configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        interaction_mode = %config.interaction_mode,
        "Configuration loaded"
    );

    // State
    let mut store = SheetStore::new(CharacterState::sample(), Arc::new(UuidIdGenerator));
    store.subscribe(|state| {
        tracing::debug!(
            skills = state.skills().len(),
            descriptors = state.descriptors().len(),
            abilities = state.abilities().len(),
            "Sheet changed"
        );
    });

    // Interaction
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let feedback: Arc<dyn FeedbackPort> = Arc::new(LogFeedback);
    let front_end = create_front_end(
        config.interaction_mode,
        config.pointer_only,
        clock,
        Some(feedback),
    );
    tracing::info!(kind = ?front_end.kind(), "Front-end ready");

    // Generation
    let port: Arc<dyn GenerationPort> = Arc::new(HttpGenerationClient::new(&config.api_url));
    let generation =
        GenerationService::new(port, config.generation_timeout, config.hint_timeout);

    let idea: Vec<String> = std::env::args().skip(1).collect();
    let store = Mutex::new(store);
    if !idea.is_empty() {
        {
            let mut store = store.lock().await;
            store.reset_for_new_character();
            store.set_metadata(MetadataPatch::default().idea(idea.join(" ")));
        }

        match generation
            .generate(&store, GenerationMode::InitialSkeleton, false)
            .await
        {
            Ok(GenerationOutcome::Applied(report)) => {
                tracing::info!(
                    updated = report.updated,
                    added = report.added,
                    skipped = report.skipped,
                    "Skeleton applied"
                );
            }
            Ok(GenerationOutcome::Hints { .. }) => {}
            Err(e) => tracing::warn!(error = %e, "{}", e.user_message()),
        }
    }

    log_sheet(&store.lock().await.snapshot());
    Ok(())
}

fn log_sheet(state: &CharacterState) {
    for descriptor in state.descriptors() {
        tracing::info!(name = %descriptor.name, "{}", descriptor.description);
    }
    for row in state.ladder_rows() {
        let names: Vec<&str> = row.entries.iter().map(|e| e.name.as_str()).collect();
        tracing::info!(rank = row.rank, "{}: {}", row.label, names.join(", "));
    }
    for ability in state.abilities() {
        tracing::info!(name = %ability.name, "{}", ability.description);
    }
}
