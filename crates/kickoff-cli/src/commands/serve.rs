use kickoff::{AppState, router};
use kickoff_core::KickoffConfig;

pub async fn serve(config: &KickoffConfig) -> anyhow::Result<()> {
    let state = AppState::initialize(config);
    if !state.is_ready() {
        tracing::warn!("starting with missing backends; POST / will answer 500 until fixed");
    }

    let addr = config.server.bind_addr();
    tracing::info!(
        %addr,
        workers = config.server.workers,
        app_home = %config.server.app_home,
        "starting workflow trigger"
    );

    kickoff::serve(&addr, router(state)).await?;
    Ok(())
}
