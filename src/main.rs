use clap::Parser;
use prize_savings::cli::{Cli, Commands};
use prize_savings::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = prize_savings::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Odds(args) => args.execute().await?,
        Commands::Vault(args) => args.execute(&config).await?,
        Commands::Draws(args) => {
            tracing::info!(chain_id = args.chain, "Fetching draws");
            args.execute(&config).await?;
        }
        Commands::Prizes(args) => {
            tracing::info!(chain_id = args.chain, user = %args.user, "Fetching user prizes");
            args.execute(&config).await?;
        }
        Commands::Observations(args) => {
            tracing::info!(chain_id = args.chain, user = %args.user, "Fetching user observations");
            args.execute(&config).await?;
        }
        Commands::Wallets(args) => {
            tracing::info!(chain_id = args.chain, "Fetching wallet addresses");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Subgraph: page size {}, timeout {}s",
                config.subgraph.page_size, config.subgraph.timeout_secs
            );
            println!("  RPC: timeout {}s", config.rpc.timeout_secs);

            let registry = config.registry();
            if registry.is_empty() {
                println!("  No chains configured");
            }
            for chain in registry.chains() {
                println!("  Chain {} ({})", chain.id, chain.name);
                println!("    RPC:       {}", chain.rpc_url.as_deref().unwrap_or("-"));
                println!("    Subgraph:  {}", chain.subgraph_url.as_deref().unwrap_or("-"));
                println!("    Multicall: {}", chain.multicall_address);
            }
        }
    }

    Ok(())
}
