use clap::{Parser, Subcommand};
use tide_autoscale::ValidationPolicy;

mod commands;

#[derive(Parser)]
#[command(
    name = "tide",
    about = "tide — scaling strategies for Fargate services",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to the stack configuration
    #[arg(short, long, global = true, default_value = "tide.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scaffold tide.toml with a dev and a prod stack
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List configured stacks and their scaling strategies
    List,
    /// Assemble every stack and write its template.
    ///
    /// One <stack>.template.json per stack plus manifest.json are written
    /// to the output directory.
    Synth {
        /// Output directory
        #[arg(short, long, default_value = "tide.out")]
        out: String,
        /// Only synthesize this stack
        #[arg(short, long)]
        stack: Option<String>,
        /// Override the validation policy from the config (strict, passthrough)
        #[arg(long)]
        validation: Option<ValidationPolicy>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tide=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init::init(&cli.config, force),
        Commands::List => commands::list::list(&cli.config),
        Commands::Synth {
            out,
            stack,
            validation,
        } => commands::synth::synth(&cli.config, &out, stack.as_deref(), validation),
    }
}
