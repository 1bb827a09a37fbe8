use std::path::PathBuf;

use opdef_gen::config::CompilerConfig;
use opdef_gen::driver::Compiler;
use opdef_gen::utils;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "opdef-gen",
    about = "Compile YAML operator schemas into registration headers",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate headers for one component, or for every configured component
    Generate {
        /// Project root that group paths are resolved against
        root: PathBuf,
        /// Component id to compile (e.g. `api`, `inc`); all groups when omitted
        component: Option<String>,
        /// YAML file replacing the built-in group table
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output root for generated headers (overrides the config)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Do not copy generated headers back next to their schemas
        #[arg(long, default_value_t = false)]
        no_copy_back: bool,
        /// Load and render everything but write nothing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// List the configured component groups
    Groups {
        /// YAML file replacing the built-in group table
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_config(path: Option<&std::path::Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading group table");
            CompilerConfig::from_yaml_file(path)
        }
        None => Ok(CompilerConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Generate {
            root,
            component,
            config,
            out_dir,
            no_copy_back,
            dry_run,
        } => {
            info!(
                root = %root.display(),
                ?component,
                ?config,
                ?out_dir,
                no_copy_back,
                dry_run,
                "starting generate"
            );
            let mut cfg = load_config(config.as_deref())?;
            if let Some(out_dir) = out_dir {
                cfg.output_dir = out_dir;
            }
            if no_copy_back {
                cfg.copy_back = false;
            }

            let compiler = Compiler::new(root, cfg).dry_run(dry_run);
            let report = compiler.compile(component.as_deref())?;
            utils::print_summary(&report.summary_rows());

            let failed = report.failed_names();
            if !failed.is_empty() {
                warn!(failed = failed.len(), "some schema files failed");
                bail!(
                    "{} schema file(s) failed: {}",
                    failed.len(),
                    failed.join(", ")
                );
            }
            if dry_run {
                info!("dry-run completed; no headers written");
            }
        }
        Commands::Groups { config } => {
            let cfg = load_config(config.as_deref())?;
            println!("{}", utils::format_groups(&cfg.groups));
        }
    }

    Ok(())
}
