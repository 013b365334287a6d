use ledgerchain::{bootstrap, NodeConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "ledgerchain=info".to_string()))
        .init();

    let config = NodeConfig::default();
    tracing::info!("starting ledgerchain node (fee_policy={:?})", config.fee_policy);

    let core = bootstrap(config);
    core.start();

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tracing::info!("chain length: {}", core.ledger.count());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                core.stop();
                break;
            }
        }
    }
}
