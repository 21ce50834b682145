//! CRAITE - Web3 code generator
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use craite::cli::commands;
use craite::cli::GenerateOptions;
use craite::tools::ToolRegistry;
use craite::{Config, CraiteError, Generator};

/// CRAITE - AI-powered Web3 code generation
#[derive(Parser, Debug)]
#[command(name = "craite")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Provider: openai, anthropic, or local
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(long, global = true)]
    model: Option<String>,

    /// API key (overrides config and environment)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Endpoint override
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate code from a prompt
    Generate {
        prompt: String,

        /// Output language
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Generation mode (production/educational)
        #[arg(long, short = 'm')]
        mode: Option<String>,

        /// Tools to run first (repeatable)
        #[arg(long = "tool", short = 't')]
        tools: Vec<String>,

        /// Write the generated code to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Run security and gas scans on a contract
    Analyze {
        file: PathBuf,

        /// Skip the security audit
        #[arg(long)]
        no_security: bool,

        /// Skip the gas review
        #[arg(long)]
        no_gas: bool,
    },

    /// Generate code for every prompt in a JSON file
    Batch {
        /// JSON array of {prompt, language?, mode?, filename?} objects
        prompts_file: PathBuf,

        /// Directory the generated files are written to
        #[arg(long, short = 'o', default_value = "generated")]
        output_dir: PathBuf,

        /// Requests in flight at once
        #[arg(long, short = 'c', default_value_t = 5)]
        concurrency: usize,
    },

    /// Generate a contract scaffold from an OpenZeppelin base
    Scaffold {
        #[arg(value_parser = ["ERC20", "ERC721", "ERC1155"])]
        contract_type: String,

        /// Contract name
        #[arg(long, short = 'n', default_value = "MyContract")]
        name: String,

        /// Extension to include (repeatable)
        #[arg(long = "feature", short = 'f')]
        features: Vec<String>,

        /// Write the generated code to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List available tools
    Tools {
        /// Show parameter schemas
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// List model presets
    Models,

    /// Show the effective configuration
    Config {
        /// Write a default config file
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    if debug {
        if let Ok(directive) = "craite=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Config {
    let mut config = Config::load();

    // CLI overrides
    if let Some(ref provider) = args.provider {
        config.provider.provider = provider.clone();
    }
    if let Some(ref model) = args.model {
        config.provider.model = model.clone();
    }
    if let Some(ref api_key) = args.api_key {
        config.provider.set_api_key(api_key.clone());
    }
    if let Some(ref endpoint) = args.endpoint {
        config.provider.endpoint = Some(endpoint.clone());
    }
    // Re-resolves env keys against the overridden provider
    config.provider.apply_env_fallback();

    config
}

/// Token cancelled on Ctrl+C
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args);
    tracing::debug!(provider = %config.provider.provider, "configuration loaded");

    match args.command {
        Command::Generate {
            prompt,
            language,
            mode,
            tools,
            output,
        } => {
            let generator = Generator::new(config)?;
            let opts = GenerateOptions {
                prompt,
                language,
                mode,
                tools,
                output,
            };
            eprintln!("Generating code...");
            let rendered = commands::generate(&generator, &opts, &interrupt_token()).await?;
            println!("{}", rendered);
        }

        Command::Batch {
            prompts_file,
            output_dir,
            concurrency,
        } => {
            let text = std::fs::read_to_string(&prompts_file)
                .map_err(CraiteError::from)
                .with_context(|| format!("reading {}", prompts_file.display()))?;
            let entries = commands::parse_batch(&text)?;
            let generator = Generator::new(config)?;
            eprintln!("Processing {} prompts...", entries.len());
            let rendered =
                commands::batch(&generator, &entries, &output_dir, concurrency).await?;
            print!("{}", rendered);
        }

        Command::Analyze {
            file,
            no_security,
            no_gas,
        } => {
            let code = std::fs::read_to_string(&file)
                .map_err(CraiteError::from)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("Analyzing: {}", file.display());
            print!(
                "{}",
                commands::analyze(&ToolRegistry::with_defaults(), &code, !no_security, !no_gas)
            );
        }

        Command::Scaffold {
            contract_type,
            name,
            features,
            output,
        } => {
            let generator = Generator::new(config)?;
            eprintln!("Scaffolding {} contract...", contract_type);
            let rendered = commands::scaffold(
                &generator,
                &contract_type,
                &name,
                &features,
                output.as_deref(),
                &interrupt_token(),
            )
            .await?;
            println!("{}", rendered);
        }

        Command::Tools { verbose } => {
            print!(
                "{}",
                commands::tools_listing(&ToolRegistry::with_defaults(), verbose)
            );
        }

        Command::Models => print!("{}", commands::models_listing(&config)),

        Command::Config { init } => {
            if init {
                println!("{}", commands::init_config()?);
            } else {
                print!("{}", commands::config_summary(&config));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<CraiteError>())
                .map(CraiteError::kind)
                .unwrap_or("error");
            eprintln!("error[{}]: {:#}", kind, err);
            ExitCode::FAILURE
        }
    }
}
