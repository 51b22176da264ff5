use clap::{ArgAction, Args, Parser, Subcommand};

use crate::formats::{FaqCategory, KittenStatus};
use crate::reader::DEFAULT_ENTRY_EXTENSION;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn default_log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate the content directory into one JSON snapshot.
    Generate(GenerateArgs),
    /// Read and normalize all content without writing a snapshot.
    Check(CheckArgs),
    /// Print records from a generated snapshot.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Content root containing collection directories and singleton files.
    #[arg(long, default_value = "content")]
    pub content: String,

    /// Output file path for the snapshot JSON.
    #[arg(long, default_value = "generated/content-snapshot.json")]
    pub out: String,

    /// File extension of collection entries.
    #[arg(long, default_value = DEFAULT_ENTRY_EXTENSION)]
    pub entry_extension: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Content root containing collection directories and singleton files.
    #[arg(long, default_value = "content")]
    pub content: String,

    /// File extension of collection entries.
    #[arg(long, default_value = DEFAULT_ENTRY_EXTENSION)]
    pub entry_extension: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Snapshot JSON written by `generate`.
    #[arg(long, default_value = "generated/content-snapshot.json")]
    pub snapshot: String,

    #[command(subcommand)]
    pub target: QueryTarget,
}

#[derive(Debug, Subcommand)]
pub enum QueryTarget {
    /// One cat by slug.
    Cat {
        #[arg(long)]
        slug: String,
    },
    Cats {
        /// Only featured cats.
        #[arg(long)]
        featured: bool,
    },
    Kittens {
        #[arg(long, value_enum)]
        status: Option<KittenStatus>,
    },
    Reviews {
        /// Only featured reviews.
        #[arg(long)]
        featured: bool,
    },
    Faqs {
        #[arg(long, value_enum)]
        category: Option<FaqCategory>,
    },
}
