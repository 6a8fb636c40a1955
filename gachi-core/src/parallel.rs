//! Parallel file processing using Rayon
//!
//! Each file is read, transformed and written independently; a failure in
//! one file never affects another. A file whose result carries an Error
//! diagnostic is reported and not written.

use crate::config::ProcessingOptions;
use crate::diagnostics::Diagnostic;
use crate::transpiler::{sniff_extension, TranspileResult, Transpiler};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of forward output
pub const GACHI_EXTENSION: &str = "gachi";

/// Extensions accepted as forward input
pub const HOST_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Directory names never walked into
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "dist", "build", ".git"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host source to GachiScript
    Forward,
    /// GachiScript to host source
    Reverse,
}

impl Direction {
    /// Whether `path` is an input for this direction
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match self {
            Direction::Forward => HOST_EXTENSIONS.contains(&ext) && !name.ends_with(".d.ts"),
            Direction::Reverse => ext == GACHI_EXTENSION,
        }
    }

    pub fn transform(&self, transpiler: &Transpiler, source: &str) -> TranspileResult {
        match self {
            Direction::Forward => transpiler.transform_forward(source),
            Direction::Reverse => transpiler.transform_reverse(source),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: not written, transform reported {errors} error(s)", .path.display())]
    Transform { path: PathBuf, errors: usize },
    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A file to process and the directory it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// Walked directory, used to mirror the layout under an output directory
    pub root: Option<PathBuf>,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InputFile {
            path: path.into(),
            root: None,
        }
    }

    pub fn under(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        InputFile {
            path: path.into(),
            root: Some(root.into()),
        }
    }

    /// Path relative to the walked directory, or the bare file name
    fn relative(&self) -> PathBuf {
        self.root
            .as_deref()
            .and_then(|root| self.path.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .or_else(|| self.path.file_name().map(PathBuf::from))
            .unwrap_or_else(|| self.path.clone())
    }
}

/// Expand glob patterns to file paths
pub fn expand_globs(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob::glob(pattern) {
                Ok(paths) => {
                    for entry in paths.flatten() {
                        if let Some(path) = entry.to_str() {
                            files.push(path.to_string());
                        }
                    }
                }
                Err(e) => {
                    warn!("invalid glob pattern '{}': {}", pattern, e);
                }
            }
        } else {
            files.push(pattern.clone());
        }
    }

    files
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    DEFAULT_EXCLUDES.contains(&name) || exclude.iter().any(|e| e == name)
}

/// Resolve files, directories and glob patterns into inputs for `direction`.
///
/// Directories are walked recursively, skipping excluded names. Paths that
/// do not exist are kept so the failure shows up when the file is read.
pub fn collect_inputs(paths: &[String], direction: Direction, exclude: &[String]) -> Vec<InputFile> {
    let mut inputs = Vec::new();

    for path in expand_globs(paths) {
        let path = PathBuf::from(path);
        if path.is_dir() {
            let walker = WalkDir::new(&path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0 || !entry.file_name().to_str().is_some_and(|n| is_excluded(n, exclude))
                });
            for entry in walker.filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && direction.accepts(entry.path()) {
                    inputs.push(InputFile::under(entry.path(), &path));
                }
            }
        } else if direction.accepts(&path) {
            inputs.push(InputFile::new(path));
        } else {
            debug!(path = %path.display(), "skipping unsupported file");
        }
    }

    inputs.dedup();
    inputs
}

/// Where the transformed `input` is written.
///
/// Reverse output takes its extension from the reconstructed code.
pub fn output_path(input: &InputFile, direction: Direction, code: &str, output_dir: Option<&Path>) -> PathBuf {
    let extension = match direction {
        Direction::Forward => GACHI_EXTENSION,
        Direction::Reverse => sniff_extension(code),
    };
    let target = match output_dir {
        Some(dir) => dir.join(input.relative()),
        None => input.path.clone(),
    };
    target.with_extension(extension)
}

/// Outcome of processing one file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Source text, empty when it could not be read
    pub source: String,
    /// Written file, `None` when nothing was written
    pub output: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
    pub error: Option<ProcessError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failed(input: &InputFile, source: String, diagnostics: Vec<Diagnostic>, error: ProcessError) -> Self {
        warn!("{}", error);
        FileOutcome {
            input: input.path.clone(),
            source,
            output: None,
            diagnostics,
            error: Some(error),
        }
    }
}

/// Transform one file and write the result
pub fn process_file(
    input: &InputFile,
    direction: Direction,
    transpiler: &Transpiler,
    options: &ProcessingOptions,
) -> FileOutcome {
    let source = match fs::read_to_string(&input.path) {
        Ok(source) => source,
        Err(e) => {
            let error = ProcessError::Io {
                path: input.path.clone(),
                source: e,
            };
            return FileOutcome::failed(input, String::new(), Vec::new(), error);
        }
    };

    let result = direction.transform(transpiler, &source);
    if result.has_errors() {
        let errors = result.diagnostics.iter().filter(|d| d.is_error()).count();
        let error = ProcessError::Transform {
            path: input.path.clone(),
            errors,
        };
        return FileOutcome::failed(input, source, result.diagnostics, error);
    }

    let output = output_path(input, direction, &result.code, options.output_dir.as_deref());
    let written = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::write(&output, &result.code));
    if let Err(e) = written {
        let error = ProcessError::Io { path: output, source: e };
        return FileOutcome::failed(input, source, result.diagnostics, error);
    }

    debug!(input = %input.path.display(), output = %output.display(), "wrote");
    FileOutcome {
        input: input.path.clone(),
        source,
        output: Some(output),
        diagnostics: result.diagnostics,
        error: None,
    }
}

/// Outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct ProcessingSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl ProcessingSummary {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.output.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    pub fn warnings(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.diagnostics)
            .filter(|d| !d.is_error())
            .count()
    }
}

/// Process files in parallel on a pool of `options.concurrency` threads
pub fn process_files(
    files: &[InputFile],
    direction: Direction,
    transpiler: &Transpiler,
    options: &ProcessingOptions,
) -> Result<ProcessingSummary, ProcessError> {
    let threads = options.concurrency.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let outcomes = pool.install(|| {
        files
            .par_iter()
            .map(|input| process_file(input, direction, transpiler, options))
            .collect()
    });

    Ok(ProcessingSummary { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerOptions;

    #[test]
    fn test_expand_globs_non_glob() {
        let patterns = vec!["app.ts".to_string()];
        assert_eq!(expand_globs(&patterns), vec!["app.ts"]);
    }

    #[test]
    fn test_direction_accepts() {
        assert!(Direction::Forward.accepts(Path::new("src/app.tsx")));
        assert!(!Direction::Forward.accepts(Path::new("types/index.d.ts")));
        assert!(!Direction::Forward.accepts(Path::new("app.gachi")));
        assert!(Direction::Reverse.accepts(Path::new("app.gachi")));
        assert!(!Direction::Reverse.accepts(Path::new("app.js")));
    }

    #[test]
    fn test_collect_inputs_walks_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::write(root.join("src/a.ts"), "").unwrap();
        fs::write(root.join("src/nested/b.jsx"), "").unwrap();
        fs::write(root.join("src/types.d.ts"), "").unwrap();
        fs::write(root.join("src/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join("vendor/lib.js"), "").unwrap();

        let paths = vec![root.to_string_lossy().to_string()];
        let inputs = collect_inputs(&paths, Direction::Forward, &["vendor".to_string()]);
        let found: Vec<PathBuf> = inputs.iter().map(|i| i.path.strip_prefix(root).unwrap().to_path_buf()).collect();
        assert_eq!(found, vec![PathBuf::from("src/a.ts"), PathBuf::from("src/nested/b.jsx")]);
    }

    #[test]
    fn test_output_path() {
        let input = InputFile::under("/work/src/app/main.ts", "/work/src");
        assert_eq!(
            output_path(&input, Direction::Forward, "", None),
            PathBuf::from("/work/src/app/main.gachi")
        );
        assert_eq!(
            output_path(&input, Direction::Forward, "", Some(Path::new("/out"))),
            PathBuf::from("/out/app/main.gachi")
        );

        let gachi = InputFile::new("/work/view.gachi");
        assert_eq!(
            output_path(&gachi, Direction::Reverse, "const a = <div />;", Some(Path::new("/out"))),
            PathBuf::from("/out/view.jsx")
        );
    }

    #[test]
    fn test_process_files_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.js");
        let bad = dir.path().join("bad.js");
        fs::write(&good, "const a = 1;").unwrap();
        fs::write(&bad, "const = ;").unwrap();

        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());
        let files = vec![InputFile::new(&bad), InputFile::new(&good), InputFile::new(dir.path().join("gone.js"))];
        let options = ProcessingOptions {
            concurrency: Some(2),
            ..ProcessingOptions::default()
        };
        let summary = process_files(&files, Direction::Forward, &transpiler, &options).unwrap();

        assert_eq!(summary.written(), 1);
        assert_eq!(summary.failed(), 2);
        assert!(matches!(summary.outcomes[0].error, Some(ProcessError::Transform { errors: 1, .. })));
        assert!(matches!(summary.outcomes[2].error, Some(ProcessError::Io { .. })));
        assert!(!dir.path().join("bad.gachi").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("good.gachi")).unwrap(),
            "tight a becomes 1;"
        );
    }

    #[test]
    fn test_reverse_batch_sniffs_extension() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::write(dir.path().join("typed.gachi"), "loose n: reps becomes 1;").unwrap();

        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());
        let paths = vec![dir.path().to_string_lossy().to_string()];
        let files = collect_inputs(&paths, Direction::Reverse, &[]);
        let options = ProcessingOptions {
            output_dir: Some(out.clone()),
            ..ProcessingOptions::default()
        };
        let summary = process_files(&files, Direction::Reverse, &transpiler, &options).unwrap();
        assert_eq!(summary.written(), 1);
        assert_eq!(fs::read_to_string(out.join("typed.ts")).unwrap(), "let n: number = 1;");
    }
}
