mod artifacts;
mod generate;
mod seed;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-factory")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(about = "Generate fake document records and cached test artifacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate document records against a reference pool
    Generate {
        /// Reference pool file (YAML or JSON sequence of {type, _id, name})
        #[arg(short, long)]
        pool: Option<PathBuf>,

        /// Number of records to generate
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Locale for names and text: en, fr_fr
        #[arg(short, long)]
        locale: Option<String>,

        /// Project short name used in internal URLs
        #[arg(long)]
        project: Option<String>,

        /// Output format: json or yaml
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Attach a physical file of this tier: small, medium, large, random
        #[arg(long)]
        attach: Option<String>,

        /// Stage attached files into the local object store
        #[arg(long, requires = "attach")]
        stage: bool,

        /// Keep temporary copies of attached files
        #[arg(long, requires = "attach")]
        persist: bool,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build cached artifacts and report their sizes
    Artifacts {
        /// Only this tier: small, medium, large (default: all)
        #[arg(short, long)]
        tier: Option<String>,

        /// Artifact cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Remove cached artifacts before building
        #[arg(long)]
        rebuild: bool,
    },

    /// Print deterministic seeds for a parent identifier
    Seed {
        /// Common factory seed
        #[arg(long)]
        common_seed: u64,

        /// Parent identifier (24 hex digits)
        #[arg(long)]
        parent: String,

        /// Number of seeds to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            pool,
            count,
            seed,
            locale,
            project,
            format,
            output,
            attach,
            stage,
            persist,
            config,
        } => {
            generate::run(generate::GenerateArgs {
                pool,
                count,
                seed,
                locale,
                project,
                format,
                output,
                attach,
                stage,
                persist,
                config,
            })
            .await
        }
        Commands::Artifacts {
            tier,
            cache_dir,
            rebuild,
        } => artifacts::run(tier, cache_dir, rebuild),
        Commands::Seed {
            common_seed,
            parent,
            count,
        } => seed::run(common_seed, &parent, count),
        Commands::Completions { shell } => {
            generate_completions(
                shell,
                &mut Cli::command(),
                "doc-factory",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
