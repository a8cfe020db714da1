use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{config::HookBuilder, eyre::Result};
use miniframe_cli::{
    create::{self, CreateOptions},
    output::OutputFormat,
    todomvc::{self, DEFAULT_DIRECTORY, DEFAULT_PORT, TodomvcOptions},
};
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter, fmt::format::FmtSpan};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MINIFRAME_CLI_COMMIT"),
    ")"
);

#[derive(Parser)]
#[command(name = "miniframe")]
#[command(about = "CLI of MiniFrame", long_about = None)]
#[command(version, long_version = LONG_VERSION, author)]
struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new MiniFrame application project
    Create {
        /// Project name
        name: String,
        /// Directory to create the project in (defaults to the project name)
        #[arg(long, short)]
        directory: Option<PathBuf>,
        /// Write into a directory that is not empty
        #[arg(long)]
        force: bool,
    },
    /// Build and serve the TodoMVC demo
    Todomvc {
        /// Directory of the demo crate
        #[arg(long, short, default_value = DEFAULT_DIRECTORY)]
        directory: PathBuf,
        /// Port for the static file server
        #[arg(long, short, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Run the steps instead of printing them
        #[arg(long)]
        run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    HookBuilder::default()
        .display_env_section(false)
        .panic_section("It looks like the MiniFrame CLI encountered a bug")
        .install()?;

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.json { LevelFilter::WARN } else { level })
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let format = OutputFormat::from_json_flag(cli.json);

    match cli.command {
        Commands::Create {
            name,
            directory,
            force,
        } => {
            let report = create::create(&CreateOptions {
                name,
                directory,
                force,
            })?;
            println!("{}", format.render(&report)?);
        }
        Commands::Todomvc {
            directory,
            port,
            run,
        } => {
            let report = todomvc::plan(&TodomvcOptions { directory, port })?;
            if run {
                todomvc::run(&report)?;
            } else {
                println!("{}", format.render(&report)?);
            }
        }
    }
    Ok(())
}
