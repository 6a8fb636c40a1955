//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Transpile JavaScript and TypeScript to GachiScript and back
#[derive(Parser, Debug)]
#[command(name = "gachi")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Transpile a project, writing .gachi files next to the sources
    gachi build src

    # Mirror the output under another directory
    gachi build "src/**/*.ts" --output-dir out

    # Turn GachiScript back into JavaScript or TypeScript
    gachi reverse out --output-dir restored

    # Pipe through stdin
    echo "const a = 1;" | gachi build

    # Check that a file survives forward and reverse unchanged
    gachi check src/app.ts --framework react

    # Look up a word in the dictionary
    gachi dict promise
"#)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Framework vocabulary: react, angular, vue, none
    #[arg(short = 'f', long = "framework", global = true)]
    pub framework: Option<String>,

    /// Annotate operators that cannot be substituted in place
    #[arg(long = "strict", global = true)]
    pub strict: bool,

    /// Drop comments from the output
    #[arg(long = "no-comments", global = true)]
    pub no_comments: bool,

    /// Put a decorative phrase before functions and classes
    #[arg(long = "quotes", global = true)]
    pub quotes: bool,

    /// Seed for decorative phrases
    #[arg(long = "seed", global = true)]
    pub seed: Option<u64>,

    /// Grammar: javascript, typescript, tsx (sniffed when omitted)
    #[arg(long = "dialect", global = true)]
    pub dialect: Option<String>,

    /// Configuration file (default: nearest gachi.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Extra dictionary entries, as written by `gachi dict --export`
    #[arg(long = "dictionary", global = true)]
    pub dictionary: Option<PathBuf>,

    /// Write outputs under this directory
    #[arg(short = 'O', long = "output-dir", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'c', long = "concurrency", global = true)]
    pub concurrency: Option<usize>,

    /// Directory or file names to skip (repeatable)
    #[arg(long = "exclude", global = true)]
    pub exclude: Vec<String>,

    /// Diagnostic format: gcc (default), json
    #[arg(short = 'o', long = "format", default_value = "gcc", global = true)]
    pub format: String,

    /// Color output: auto (default), always, never
    #[arg(long = "color", default_value = "auto", global = true)]
    pub color: String,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transpile JavaScript/TypeScript files to GachiScript
    Build {
        /// Files, directories or glob patterns; reads stdin when omitted
        paths: Vec<String>,
    },
    /// Transpile GachiScript files back to JavaScript/TypeScript
    Reverse {
        /// Files, directories or glob patterns; reads stdin when omitted
        paths: Vec<String>,
    },
    /// Check GachiScript for unknown words and syntax errors
    Validate {
        /// GachiScript file; reads stdin when omitted
        file: Option<String>,
    },
    /// Guess the framework a file is written for
    Detect {
        /// Source file; reads stdin when omitted
        file: Option<String>,
    },
    /// Transpile forward and back and compare the tokens
    Check {
        /// JavaScript/TypeScript file; reads stdin when omitted
        file: Option<String>,
    },
    /// Inspect the dictionary
    Dict {
        /// Show entries whose host or GachiScript form contains WORD
        word: Option<String>,

        /// Print mapping counts
        #[arg(long = "stats")]
        stats: bool,

        /// Write the dictionary as JSON to FILE
        #[arg(long = "export")]
        export: Option<PathBuf>,

        /// Print a random phrase
        #[arg(long = "quote")]
        quote: bool,
    },
}
