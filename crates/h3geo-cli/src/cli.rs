use super::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one FASTA record per chain of a structure
    Pdb2fasta {
        #[arg(short, long)]
        input: String,
        /// Skip structures that do not have exactly this many chains
        #[arg(long)]
        num_chains: Option<usize>,
        /// Defaults to stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute the distance/omega/theta/phi matrices of a structure
    Geometry {
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        output: String,
        /// JSON `GeometryConfig`
        #[arg(short, long)]
        config: Option<String>,
    },
    /// One-hot encode a FASTA file as model input
    Encode {
        #[arg(short, long)]
        input: String,
        /// Safetensors file receiving an `input` tensor of shape (1, channels, L)
        #[arg(short, long)]
        output: String,
        /// Leave out the heavy chain delimiter channel even if the config asks for it
        #[arg(long)]
        no_chain_delimiter: bool,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Turn model logits into probabilities, classes and values
    Bin {
        /// Safetensors file with a `logits` tensor of shape (outmats, bins, L, L)
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        output: String,
        /// `max` or `avg`; overrides the config
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the hyperparameters stored in a model checkpoint
    Inspect {
        #[arg(long)]
        checkpoint: String,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Pdb2fasta {
                input,
                num_chains,
                output,
            } => commands::pdb2fasta::execute(input, num_chains, output),
            Commands::Geometry {
                input,
                output,
                config,
            } => commands::geometry::execute(input, output, config),
            Commands::Encode {
                input,
                output,
                no_chain_delimiter,
                config,
            } => commands::encode::execute(input, output, no_chain_delimiter, config),
            Commands::Bin {
                input,
                output,
                method,
                config,
            } => commands::bin::execute(input, output, method, config),
            Commands::Inspect { checkpoint } => commands::inspect::execute(checkpoint),
        }
    }
}
