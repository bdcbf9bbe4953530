use clap::{Parser, Subcommand};
use forge_core::{Config, NetworkSimulator};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "forge-chain")]
#[command(about = "Single-node proof-of-work consensus engine demo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Optional TOML file overriding the default tunables, falling back to
    /// `Config::default()` if omitted or unreadable.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a short multi-node mining simulation and print the resulting chain
    Demo {
        /// Number of nodes to register
        #[arg(long, default_value = "3")]
        nodes: usize,
        /// Number of simulation ticks to run
        #[arg(long, default_value = "20")]
        steps: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::load_or_default(cli.config.as_deref());

    match cli.command {
        Some(Commands::Demo { nodes, steps }) => run_demo(config, nodes, steps),
        None => run_demo(config, 3, 20),
    }
}

fn run_demo(config: Config, node_count: usize, steps: u64) {
    let mut sim = NetworkSimulator::new(config);

    let mut wallet_addresses = Vec::with_capacity(node_count);
    for i in 0..node_count {
        let address = sim.wallets.create_wallet(format!("node-{i}"));
        sim.add_node(address.clone());
        wallet_addresses.push(address);
    }

    info!(nodes = node_count, steps, "starting simulation");
    sim.run(steps);

    for (i, node) in sim.nodes().iter().enumerate() {
        let tip = node.get_tip_block();
        let address = &wallet_addresses[i];
        let balance = node.state(address).balance;
        println!(
            "node-{i} ({address}): tip height={} hash={} balance={balance}",
            tip.index, tip.hash
        );
    }
}
