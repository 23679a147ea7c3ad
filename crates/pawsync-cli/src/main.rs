mod import;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "pawsync-cli")]
#[command(about = "pawsync catalog import command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// The supplier CSV sheet in blob storage.
    Csv,
    /// The third-party table records API.
    Records,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Csv => write!(f, "csv"),
            SourceKind::Records => write!(f, "records"),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Process a single batch and print its report.
    Batch {
        #[arg(long, value_enum, default_value_t = SourceKind::Csv)]
        source: SourceKind,
        /// Fallback supplier id for rows that carry none.
        #[arg(long)]
        supplier: Option<String>,
        /// Cursor from a previous batch; omit to start from the top.
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Drive the import to completion, one batch at a time.
    Run {
        #[arg(long, value_enum, default_value_t = SourceKind::Csv)]
        source: SourceKind,
        #[arg(long)]
        supplier: Option<String>,
    },
    /// List recent import runs.
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = pawsync_core::load_app_config()?;

    match cli.command {
        Commands::Batch {
            source,
            supplier,
            cursor,
        } => import::run_single_batch(&config, source, supplier.as_deref(), cursor.as_deref()).await,
        Commands::Run { source, supplier } => {
            import::run_to_completion(&config, source, supplier.as_deref()).await
        }
        Commands::Runs { limit } => import::print_recent_runs(&config, limit).await,
    }
}
