use anyhow::Context;
use kickoff::{AppState, run_trigger};
use kickoff_core::{KickoffConfig, TriggerResponse};

/// Run one trigger pass without starting the HTTP server.
pub async fn trigger(config: &KickoffConfig) -> anyhow::Result<()> {
    let state = AppState::initialize(config);
    let (Some(store), Some(publisher)) = (state.store.as_deref(), state.publisher.as_deref())
    else {
        anyhow::bail!(
            "Firestore or Pub/Sub client is not initialized; check GCP_PROJECT_ID and ARTICLE_PROCESSING_TOPIC_ID"
        );
    };

    let summary = run_trigger(store, publisher, &state.workflow)
        .await
        .context("workflow execution failed")?;

    let response = TriggerResponse::from(summary);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
