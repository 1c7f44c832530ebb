use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use keystats::client::ApiClient;
use keystats::config::ClientSettings;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and compare keyboard layout metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: ClientSettings,

    /// JSON file with connection settings; explicit flags override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List text corpora
    Corpora,
    /// List keyboards (form factors)
    Keyboards,
    /// List layouts
    Layouts,
    /// Filter, sort and chart metric records
    Metrics(cmd::metrics::MetricsArgs),
    /// Diff two (corpus, keyboard, layout) selections
    Compare(cmd::compare::CompareArgs),
    /// Show one metric record in full
    Show(cmd::show::ShowArgs),
}

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => {
            info!("⚙️  Loading settings from: {}", path);
            let mut file_settings = ClientSettings::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ Cannot load settings from '{}': {}", path, e);
                process::exit(1);
            });
            file_settings.merge_from_cli(&cli.settings, &matches);
            file_settings
        }
        None => cli.settings.clone(),
    };

    let client = ApiClient::new(&settings).unwrap_or_else(|e| {
        error!("❌ Cannot build API client: {}", e);
        process::exit(1);
    });
    info!("🔌 Backend: {}", client.base_url());

    let outcome = match cli.command {
        Commands::Corpora => cmd::catalog::corpora(&client).await,
        Commands::Keyboards => cmd::catalog::keyboards(&client).await,
        Commands::Layouts => cmd::catalog::layouts(&client).await,
        Commands::Metrics(args) => cmd::metrics::run(args, &client).await,
        Commands::Compare(args) => cmd::compare::run(args, &client).await,
        Commands::Show(args) => cmd::show::run(args, &client).await,
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
