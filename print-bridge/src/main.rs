use anyhow::Context;
use print_bridge::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, configuration, logging
    let config = setup_environment();

    print_banner();

    tracing::info!("Print bridge starting...");

    // 2. Backend, identity, printer list
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    server.run().await.context("server error")?;

    Ok(())
}
