use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Movie catalog service and terminal browser", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "marquee.yaml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the movie listing API (default)
    Serve,
    /// Browse the catalog interactively
    Browse {
        /// Base URL of the listing API, overrides the config file
        #[arg(long)]
        url: Option<String>,
        /// Initial state as a query string, e.g. "page=2&genre=Drama"
        #[arg(default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "marquee=debug,tower_http=debug"
    } else {
        "marquee=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => marquee::run(&args.config, args.debug).await,
        Command::Browse { url, query } => marquee::browse(&args.config, url.as_deref(), &query).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
