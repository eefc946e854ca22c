use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ngbalance",
    about = "Find similar node groups and balance scale-ups between them",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List node groups similar to the given one
    Similar {
        /// Scenario file (TOML)
        #[arg(short, long)]
        scenario: String,
        /// Reference node group id
        #[arg(short, long)]
        group: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Plan a scale-up across node groups.
    ///
    /// Groups already at their max size are never part of the plan. If the
    /// request exceeds the remaining capacity every group is raised to its
    /// max.
    Balance {
        /// Scenario file (TOML)
        #[arg(short, long)]
        scenario: String,
        /// Number of nodes to add
        #[arg(short, long)]
        nodes: u32,
        /// Comma-separated node group ids (default: all groups)
        #[arg(short, long, value_delimiter = ',')]
        groups: Vec<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Partition all node groups into similarity classes
    Classes {
        /// Scenario file (TOML)
        #[arg(short, long)]
        scenario: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nodegroupset=info".parse()?)
                .add_directive("ngbalance=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Similar { scenario, group, format } => {
            commands::similar::similar(&scenario, &group, &format)
        }
        Commands::Balance { scenario, nodes, groups, format } => {
            commands::balance::balance(&scenario, nodes, &groups, &format)
        }
        Commands::Classes { scenario, format } => {
            commands::classes::classes(&scenario, &format)
        }
    }
}
