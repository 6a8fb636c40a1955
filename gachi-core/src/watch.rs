//! Watch-mode scheduling
//!
//! File-system events are folded into at most one pending action per path.
//! A change schedules one transform; a removal cancels any pending
//! transform and schedules deletion of the output instead. Only outputs
//! recorded in an [`OutputLedger`] are ever deleted. Events come from the
//! caller; this module has no file-system watcher of its own.

use crate::config::ProcessingOptions;
use crate::parallel::{process_file, Direction, FileOutcome, InputFile};
use crate::transpiler::Transpiler;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Changed(InputFile),
    Removed(InputFile),
}

impl FileEvent {
    pub fn input(&self) -> &InputFile {
        match self {
            FileEvent::Changed(input) | FileEvent::Removed(input) => input,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Transform(InputFile),
    DeleteOutput(InputFile),
}

impl PendingAction {
    pub fn input(&self) -> &InputFile {
        match self {
            PendingAction::Transform(input) | PendingAction::DeleteOutput(input) => input,
        }
    }
}

/// Per-path pending actions, drained in first-seen order
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: IndexMap<PathBuf, PendingAction>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. The latest event for a path decides its action.
    pub fn push(&mut self, event: FileEvent) {
        let path = event.input().path.clone();
        let action = match event {
            FileEvent::Changed(input) => PendingAction::Transform(input),
            FileEvent::Removed(input) => PendingAction::DeleteOutput(input),
        };
        if let Some(previous) = self.pending.insert(path, action) {
            debug!(path = %previous.input().path.display(), "replaced pending action");
        }
    }

    /// Take every pending action
    pub fn drain(&mut self) -> Vec<PendingAction> {
        self.pending.drain(..).map(|(_, action)| action).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Output paths actually written, keyed by input path.
///
/// Removal of an input deletes only the output recorded here; an input
/// with no record has nothing to delete.
#[derive(Debug, Default)]
pub struct OutputLedger {
    written: IndexMap<PathBuf, PathBuf>,
}

impl OutputLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the output of a successful transform
    pub fn record(&mut self, outcome: &FileOutcome) {
        if let Some(output) = &outcome.output {
            self.written.insert(outcome.input.clone(), output.clone());
        }
    }

    /// Fold applied actions back in: transforms add entries, deletions drop them
    pub fn update(&mut self, outcomes: &[ActionOutcome]) {
        for outcome in outcomes {
            match outcome {
                ActionOutcome::Transformed(file) => self.record(file),
                ActionOutcome::Deleted { input, .. } => {
                    self.written.shift_remove(input);
                }
                ActionOutcome::DeleteFailed { .. } => {}
            }
        }
    }

    pub fn output_for(&self, input: &Path) -> Option<&Path> {
        self.written.get(input).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Result of one applied action
#[derive(Debug)]
pub enum ActionOutcome {
    Transformed(FileOutcome),
    /// `output` is the removed file; `None` when nothing was recorded or it was already gone
    Deleted { input: PathBuf, output: Option<PathBuf> },
    DeleteFailed { path: PathBuf, error: io::Error },
}

/// Run one drained action
pub fn apply_action(
    action: &PendingAction,
    direction: Direction,
    transpiler: &Transpiler,
    options: &ProcessingOptions,
    ledger: &OutputLedger,
) -> ActionOutcome {
    match action {
        PendingAction::Transform(input) => {
            ActionOutcome::Transformed(process_file(input, direction, transpiler, options))
        }
        PendingAction::DeleteOutput(input) => {
            let Some(path) = ledger.output_for(&input.path) else {
                debug!(path = %input.path.display(), "no recorded output");
                return ActionOutcome::Deleted {
                    input: input.path.clone(),
                    output: None,
                };
            };
            // Never delete the input itself
            if path == input.path {
                return ActionOutcome::Deleted {
                    input: input.path.clone(),
                    output: None,
                };
            }
            let output = match fs::remove_file(path) {
                Ok(()) => Some(path.to_path_buf()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(error) => {
                    return ActionOutcome::DeleteFailed {
                        path: path.to_path_buf(),
                        error,
                    }
                }
            };
            ActionOutcome::Deleted {
                input: input.path.clone(),
                output,
            }
        }
    }
}

/// Run drained actions concurrently, then fold the outcomes into `ledger`.
/// Each path appears at most once.
pub fn apply_all(
    actions: &[PendingAction],
    direction: Direction,
    transpiler: &Transpiler,
    options: &ProcessingOptions,
    ledger: &mut OutputLedger,
) -> Vec<ActionOutcome> {
    let outcomes: Vec<ActionOutcome> = {
        let ledger = &*ledger;
        actions
            .par_iter()
            .map(|action| apply_action(action, direction, transpiler, options, ledger))
            .collect()
    };
    ledger.update(&outcomes);
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerOptions;

    #[test]
    fn test_repeated_changes_collapse() {
        let mut debouncer = Debouncer::new();
        debouncer.push(FileEvent::Changed(InputFile::new("a.ts")));
        debouncer.push(FileEvent::Changed(InputFile::new("b.ts")));
        debouncer.push(FileEvent::Changed(InputFile::new("a.ts")));
        assert_eq!(debouncer.len(), 2);
        assert_eq!(
            debouncer.drain(),
            vec![
                PendingAction::Transform(InputFile::new("a.ts")),
                PendingAction::Transform(InputFile::new("b.ts")),
            ]
        );
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_removal_cancels_pending_transform() {
        let mut debouncer = Debouncer::new();
        debouncer.push(FileEvent::Changed(InputFile::new("a.ts")));
        debouncer.push(FileEvent::Removed(InputFile::new("a.ts")));
        assert_eq!(debouncer.drain(), vec![PendingAction::DeleteOutput(InputFile::new("a.ts"))]);
    }

    #[test]
    fn test_delete_absent_output_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());
        let input = dir.path().join("gone.ts");
        let mut ledger = OutputLedger::new();
        ledger.written.insert(input.clone(), dir.path().join("gone.gachi"));

        let action = PendingAction::DeleteOutput(InputFile::new(&input));
        let outcome = apply_action(&action, Direction::Forward, &transpiler, &ProcessingOptions::default(), &ledger);
        assert!(matches!(outcome, ActionOutcome::Deleted { output: None, .. }));
    }

    #[test]
    fn test_change_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("app.ts");
        fs::write(&source, "let a = 1;").unwrap();
        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());
        let options = ProcessingOptions::default();
        let mut ledger = OutputLedger::new();

        let mut debouncer = Debouncer::new();
        debouncer.push(FileEvent::Changed(InputFile::new(&source)));
        let outcomes = apply_all(&debouncer.drain(), Direction::Forward, &transpiler, &options, &mut ledger);
        assert!(matches!(&outcomes[0], ActionOutcome::Transformed(o) if o.is_success()));
        assert!(dir.path().join("app.gachi").exists());
        assert_eq!(ledger.output_for(&source), Some(dir.path().join("app.gachi").as_path()));

        fs::remove_file(&source).unwrap();
        debouncer.push(FileEvent::Removed(InputFile::new(&source)));
        let outcomes = apply_all(&debouncer.drain(), Direction::Forward, &transpiler, &options, &mut ledger);
        assert!(matches!(&outcomes[0], ActionOutcome::Deleted { output: Some(_), .. }));
        assert!(!dir.path().join("app.gachi").exists());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_untracked_removal_leaves_sibling_sources() {
        let dir = tempfile::tempdir().unwrap();
        let ts = dir.path().join("app.ts");
        let js = dir.path().join("app.js");
        fs::write(&ts, "const a = 1;").unwrap();
        fs::write(&js, "const a = 1;").unwrap();
        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());

        let action = PendingAction::DeleteOutput(InputFile::new(dir.path().join("app.gachi")));
        let outcome = apply_action(
            &action,
            Direction::Reverse,
            &transpiler,
            &ProcessingOptions::default(),
            &OutputLedger::new(),
        );
        assert!(matches!(outcome, ActionOutcome::Deleted { output: None, .. }));
        assert!(ts.exists());
        assert!(js.exists());
    }

    #[test]
    fn test_reverse_delete_removes_only_written_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let input = dir.path().join("view.gachi");
        fs::write(&input, "tight a becomes 1;\n").unwrap();
        let sibling = out.join("view.ts");
        fs::create_dir_all(&out).unwrap();
        fs::write(&sibling, "// hand-written\n").unwrap();

        let transpiler = Transpiler::with_builtin(TranspilerOptions::default());
        let options = ProcessingOptions {
            output_dir: Some(out.clone()),
            ..ProcessingOptions::default()
        };
        let mut ledger = OutputLedger::new();
        let file = InputFile::new(&input);
        let outcomes = apply_all(
            &[PendingAction::Transform(file.clone())],
            Direction::Reverse,
            &transpiler,
            &options,
            &mut ledger,
        );
        assert!(matches!(&outcomes[0], ActionOutcome::Transformed(o) if o.is_success()));
        let written = ledger.output_for(&input).unwrap().to_path_buf();
        assert_eq!(written, out.join("view.js"));

        let outcomes = apply_all(
            &[PendingAction::DeleteOutput(file)],
            Direction::Reverse,
            &transpiler,
            &options,
            &mut ledger,
        );
        assert!(matches!(&outcomes[0], ActionOutcome::Deleted { output: Some(p), .. } if p == &written));
        assert!(!written.exists());
        assert!(sibling.exists());
        assert!(input.exists());
    }
}
