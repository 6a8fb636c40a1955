//! gachi - transpile JavaScript and TypeScript to GachiScript and back
//!
//! This is the CLI entry point and the composition root: the mapping table
//! is built once here and shared with every transpiler session.

mod cli;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use gachi_core::dictionary::TableRecord;
use gachi_core::{
    check_round_trip, collect_inputs, format_diagnostics, process_files, should_use_color, Config, Diagnostic,
    DiagnosticFormat, Dialect, Direction, Framework, MappingTable, ProcessError, QuoteSource, Transpiler,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use clap::Parser;
use cli::{Args, Command};

const STDIN_NAME: &str = "<stdin>";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` applies unless `--verbose` is given
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// How diagnostics are printed
struct Reporter {
    format: DiagnosticFormat,
    use_color: bool,
}

impl Reporter {
    fn print(&self, file: &str, source: &str, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let output = format_diagnostics(file, source, diagnostics, self.format, self.use_color);
        match self.format {
            DiagnosticFormat::Gcc => eprint!("{}", output),
            DiagnosticFormat::Json => eprintln!("{}", output),
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let format = DiagnosticFormat::from_name(&args.format).ok_or_else(|| {
        anyhow!(
            "invalid format '{}'. Valid formats: {}",
            args.format,
            DiagnosticFormat::valid_formats().join(", ")
        )
    })?;
    let reporter = Reporter {
        format,
        use_color: should_use_color(&args.color),
    };

    let config = load_config(&args)?;
    let table = Arc::new(build_table(&args)?);

    match &args.command {
        Command::Build { paths } => {
            let transpiler = Transpiler::new(table, config.transpiler.clone());
            transform(paths, Direction::Forward, &transpiler, &config, &reporter)
        }
        Command::Reverse { paths } => {
            let transpiler = Transpiler::new(table, config.transpiler.clone());
            transform(paths, Direction::Reverse, &transpiler, &config, &reporter)
        }
        Command::Validate { file } => {
            let (name, source) = read_input(file.as_deref())?;
            let transpiler = Transpiler::new(table, config.transpiler.clone());
            let report = transpiler.validate(&source);
            if format == DiagnosticFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.valid {
                println!("{}: valid", name);
            } else {
                for error in &report.errors {
                    eprintln!("{}: error: {}", name, error);
                }
                for suggestion in &report.suggestions {
                    eprintln!("{}: note: {}", name, suggestion);
                }
            }
            Ok(report.valid)
        }
        Command::Detect { file } => {
            let (_, source) = read_input(file.as_deref())?;
            println!("{}", gachi_core::detect_framework(&table, &source));
            Ok(true)
        }
        Command::Check { file } => {
            let (name, source) = read_input(file.as_deref())?;
            let transpiler = Transpiler::new(table, config.transpiler.clone());
            check(&name, &source, &transpiler, &reporter)
        }
        Command::Dict {
            word,
            stats,
            export,
            quote,
        } => {
            if *stats {
                println!("{}", serde_json::to_string_pretty(&table.stats())?);
            }
            if let Some(path) = export {
                fs::write(path, table.to_json()?).with_context(|| format!("failed to write {}", path.display()))?;
                debug!(path = %path.display(), "exported dictionary");
            }
            if *quote {
                let mut quotes = QuoteSource::new(config.transpiler.quote_seed);
                if let Some(phrase) = quotes.pick(&table.phrases()) {
                    println!("{}", phrase);
                }
            }
            if let Some(word) = word {
                let found = table.search(word);
                if found.is_empty() {
                    eprintln!("no entries match '{}'", word);
                    return Ok(false);
                }
                print_atoms(found);
            } else if !*stats && export.is_none() && !*quote {
                print_atoms(table.atoms().collect());
            }
            Ok(true)
        }
    }
}

/// Nearest `gachi.toml` (or `--config`), then command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => match Config::discover(std::env::current_dir()?)? {
            Some((path, config)) => {
                debug!(path = %path.display(), "using configuration");
                config
            }
            None => Config::default(),
        },
    };

    if let Some(name) = &args.framework {
        config.transpiler.framework = Framework::from_name(name)
            .ok_or_else(|| anyhow!("invalid framework '{}'. Valid frameworks: react, angular, vue, none", name))?;
    }
    if let Some(name) = &args.dialect {
        config.transpiler.dialect = Some(
            Dialect::from_name(name)
                .ok_or_else(|| anyhow!("invalid dialect '{}'. Valid dialects: javascript, typescript, tsx", name))?,
        );
    }
    if args.strict {
        config.transpiler.strict_mode = true;
    }
    if args.no_comments {
        config.transpiler.preserve_comments = false;
    }
    if args.quotes {
        config.transpiler.add_random_quotes = true;
    }
    if args.seed.is_some() {
        config.transpiler.quote_seed = args.seed;
    }
    if args.output_dir.is_some() {
        config.processing.output_dir = args.output_dir.clone();
    }
    if args.concurrency.is_some() {
        config.processing.concurrency = args.concurrency;
    }
    config.processing.exclude.extend(args.exclude.iter().cloned());
    config.processing.verbose |= args.verbose;

    Ok(config)
}

/// Built-in vocabulary plus entries from `--dictionary`
fn build_table(args: &Args) -> Result<MappingTable> {
    let mut table = MappingTable::builtin();
    if let Some(path) = &args.dictionary {
        let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let record: TableRecord =
            serde_json::from_str(&json).with_context(|| format!("invalid dictionary {}", path.display()))?;
        table.extend(&record)?;

        let collisions = table.check_integrity();
        if !collisions.is_empty() {
            warn!("{}: {} mapping collision(s)", path.display(), collisions.len());
        }
    }
    Ok(table)
}

/// Read a named file, or stdin when no file is given
fn read_input(file: Option<&str>) -> Result<(String, String)> {
    match file {
        Some(path) => {
            let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
            Ok((path.to_string(), source))
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                bail!("no input file");
            }
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((STDIN_NAME.to_string(), source))
        }
    }
}

fn transform(
    paths: &[String],
    direction: Direction,
    transpiler: &Transpiler,
    config: &Config,
    reporter: &Reporter,
) -> Result<bool> {
    // Single source piped through stdin
    if paths.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Usage: gachi build <paths...> [OPTIONS]");
            eprintln!("   or: cat app.ts | gachi build");
            eprintln!("\nUse --help for more information.");
            bail!("no input files");
        }
        let (name, source) = read_input(None)?;
        let result = direction.transform(transpiler, &source);
        reporter.print(&name, &source, &result.diagnostics);
        if result.has_errors() {
            return Ok(false);
        }
        print!("{}", result.code);
        return Ok(true);
    }

    let files = collect_inputs(paths, direction, &config.processing.exclude);
    if files.is_empty() {
        bail!("no input files matched");
    }

    let summary = process_files(&files, direction, transpiler, &config.processing)?;
    for outcome in &summary.outcomes {
        let name = outcome.input.display().to_string();
        reporter.print(&name, &outcome.source, &outcome.diagnostics);
        match &outcome.error {
            // Parse and transform errors were printed as diagnostics
            Some(ProcessError::Transform { .. }) | None => {}
            Some(e) => eprintln!("error: {}", e),
        }
        if let (Some(output), true) = (&outcome.output, config.processing.verbose) {
            eprintln!("{} -> {}", name, output.display());
        }
    }

    if config.processing.verbose {
        eprintln!(
            "{} written, {} failed, {} warning(s)",
            summary.written(),
            summary.failed(),
            summary.warnings()
        );
    }

    Ok(summary.failed() == 0)
}

fn check(name: &str, source: &str, transpiler: &Transpiler, reporter: &Reporter) -> Result<bool> {
    let report = check_round_trip(transpiler, source);
    let lawful = report.is_lawful();

    if reporter.format == DiagnosticFormat::Json {
        let value = serde_json::json!({
            "file": name,
            "lawful": lawful,
            "report": report,
            "mismatch": report.mismatch.as_ref().map(|m| m.describe()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(lawful);
    }

    reporter.print(name, source, &report.forward.diagnostics);
    if let Some(reverse) = &report.reverse {
        reporter.print(&format!("{} (reversed)", name), &report.forward.code, &reverse.diagnostics);
    }
    match &report.mismatch {
        Some(mismatch) => eprintln!("{}: error: round trip changed the program: {}", name, mismatch.describe()),
        None if lawful => println!("{}: round trip ok", name),
        None => {}
    }
    Ok(lawful)
}

fn print_atoms(atoms: Vec<gachi_core::dictionary::LexicalAtom<'_>>) {
    let width = atoms.iter().map(|a| a.host.len()).max().unwrap_or(0);
    for atom in atoms {
        let section = match atom.framework {
            Some(framework) => format!("{} ({})", atom.category, framework),
            None => atom.category.to_string(),
        };
        println!("  {:width$}  {}  [{}]", atom.host, atom.substituted, section, width = width);
    }
}
