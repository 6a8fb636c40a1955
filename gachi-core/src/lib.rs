//! gachi-core: token-aware JS/TS to GachiScript rewriting
//!
//! This library provides:
//! - A categorized mapping table with a collision-checked reverse index
//! - Tree-sitter based classification of identifiers, keywords and operators
//! - Forward (host to GachiScript) and reverse rewriting with diagnostics
//! - Round-trip checking, batch file processing and watch scheduling

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod dictionary;
pub mod output;
pub mod parallel;
pub mod parser;
pub mod quotes;
pub mod rewrite;
pub mod roundtrip;
pub mod source_utils;
pub mod transpiler;
pub mod watch;

pub use classifier::{Classifier, ClassifierRules};
pub use config::{Config, ConfigError, ProcessingOptions, TranspilerOptions, CONFIG_FILE_NAME};
pub use diagnostics::{Diagnostic, Diagnostics, Position, Severity};
pub use dictionary::{
    Category, Collision, Framework, IndexScope, MappingTable, ReverseIndex, TableError,
};
pub use output::{format_diagnostics, should_use_color, DiagnosticFormat};
pub use parallel::{
    collect_inputs, expand_globs, process_file, process_files, Direction, FileOutcome, InputFile,
    ProcessError, ProcessingSummary,
};
pub use parser::{parse_source, Dialect, ParseError};
pub use quotes::QuoteSource;
pub use roundtrip::{check_round_trip, RoundTripReport};
pub use transpiler::{
    detect_framework, sniff_extension, TranspileResult, Transpiler, ValidationReport,
};
pub use watch::{
    apply_action, apply_all, ActionOutcome, Debouncer, FileEvent, OutputLedger, PendingAction,
};
