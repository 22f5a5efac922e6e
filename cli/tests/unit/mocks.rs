//! Shared test doubles for the bdapt ports.
//!
//! Every double writes into a shared [`Journal`] so tests can assert on the
//! order of side effects across collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::rc::Rc;

use bdapt_cli::application::ports::{
    Artifact, BundleStore, CommandRunner, Confirmer, MetapackageBuilder, PackageSystem,
    ProgressReporter,
};
use bdapt_cli::application::{BundleSync, SyncOptions};
use bdapt_cli::domain::manifest::{DEFAULT_MAINTAINER, render_control};
use bdapt_cli::domain::{CommandError, DryRunSummary, StorageError};
use bdapt_common::{Bundle, BundleStorage};

// ── Journal ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Lock,
    Save,
    Build(String),
    Release(String),
    DryRun(Vec<String>),
    Confirm(String),
    Apply(Vec<String>),
    MarkManual(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Index of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn saw_apply(&self) -> bool {
        self.position(|e| matches!(e, Event::Apply(_))).is_some()
    }

    pub fn saw_save(&self) -> bool {
        self.position(|e| matches!(e, Event::Save)).is_some()
    }
}

// ── Bundle store ──────────────────────────────────────────────────────────────

pub struct MemoryStore {
    storage: RefCell<BundleStorage>,
    journal: Journal,
    fail_save: bool,
}

impl MemoryStore {
    pub fn new(storage: BundleStorage, journal: Journal) -> Self {
        Self {
            storage: RefCell::new(storage),
            journal,
            fail_save: false,
        }
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn snapshot(&self) -> BundleStorage {
        self.storage.borrow().clone()
    }
}

impl BundleStore for MemoryStore {
    type Guard = ();

    fn lock(&self) -> Result<(), StorageError> {
        self.journal.push(Event::Lock);
        Ok(())
    }

    fn load(&self) -> Result<BundleStorage, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, storage: &BundleStorage) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(StorageError::Write {
                path: PathBuf::from("/etc/bdapt/bundles.json"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        self.journal.push(Event::Save);
        *self.storage.borrow_mut() = storage.clone();
        Ok(())
    }
}

// ── Metapackage builder ───────────────────────────────────────────────────────

/// Logs `Release` when the artifact it guards is dropped.
struct ScratchGuard {
    name: String,
    journal: Journal,
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        self.journal.push(Event::Release(self.name.clone()));
    }
}

pub struct FakeBuilder {
    journal: Journal,
    failure: RefCell<Option<CommandError>>,
    built: RefCell<Vec<Bundle>>,
}

impl FakeBuilder {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failure: RefCell::new(None),
            built: RefCell::new(Vec::new()),
        }
    }

    /// Make the next build fail with `err`.
    pub fn fail_with(&self, err: CommandError) {
        *self.failure.borrow_mut() = Some(err);
    }

    /// Bundles passed to `build`, in order.
    pub fn built(&self) -> Vec<Bundle> {
        self.built.borrow().clone()
    }
}

pub fn artifact_target(bundle_name: &str) -> String {
    format!("/tmp/bdapt-test/bdapt-{bundle_name}.deb")
}

impl MetapackageBuilder for FakeBuilder {
    fn render(&self, bundle_name: &str, bundle: &Bundle) -> String {
        render_control(bundle_name, bundle, DEFAULT_MAINTAINER, "1.0~test")
    }

    async fn build(&self, bundle_name: &str, bundle: &Bundle) -> Result<Artifact, CommandError> {
        self.journal.push(Event::Build(bundle_name.to_string()));
        self.built.borrow_mut().push(bundle.clone());
        if let Some(err) = self.failure.borrow_mut().take() {
            return Err(err);
        }
        Ok(Artifact::new(
            PathBuf::from(artifact_target(bundle_name)),
            ScratchGuard {
                name: bundle_name.to_string(),
                journal: self.journal.clone(),
            },
        ))
    }
}

// ── Package system ────────────────────────────────────────────────────────────

/// Package system with scripted previews/applies. Unscripted previews report
/// every target as changed; unscripted applies succeed.
pub struct RecordingPackageSystem {
    journal: Journal,
    dry_runs: RefCell<VecDeque<Result<Option<DryRunSummary>, CommandError>>>,
    applies: RefCell<VecDeque<Result<(), CommandError>>>,
    manual: RefCell<BTreeSet<String>>,
    mark_fails: RefCell<bool>,
    manual_queries: RefCell<Vec<String>>,
}

impl RecordingPackageSystem {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            dry_runs: RefCell::new(VecDeque::new()),
            applies: RefCell::new(VecDeque::new()),
            manual: RefCell::new(BTreeSet::new()),
            mark_fails: RefCell::new(false),
            manual_queries: RefCell::new(Vec::new()),
        }
    }

    pub fn script_dry_run(&self, result: Result<Option<DryRunSummary>, CommandError>) {
        self.dry_runs.borrow_mut().push_back(result);
    }

    pub fn script_apply(&self, result: Result<(), CommandError>) {
        self.applies.borrow_mut().push_back(result);
    }

    pub fn set_manual(&self, package: &str) {
        self.manual.borrow_mut().insert(package.to_string());
    }

    pub fn fail_marking(&self) {
        *self.mark_fails.borrow_mut() = true;
    }

    pub fn manual_queries(&self) -> Vec<String> {
        self.manual_queries.borrow().clone()
    }
}

fn default_summary(targets: &[String]) -> DryRunSummary {
    let (removals, installs): (Vec<String>, Vec<String>) =
        targets.iter().cloned().partition(|t| t.ends_with('-'));
    DryRunSummary {
        installs,
        removals,
        totals: None,
    }
}

impl PackageSystem for RecordingPackageSystem {
    fn tool_exists(&self, _program: &str) -> bool {
        true
    }

    async fn dry_run(&self, targets: &[String]) -> Result<Option<DryRunSummary>, CommandError> {
        self.journal.push(Event::DryRun(targets.to_vec()));
        self.dry_runs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Some(default_summary(targets))))
    }

    async fn apply(&self, targets: &[String]) -> Result<(), CommandError> {
        self.journal.push(Event::Apply(targets.to_vec()));
        self.applies.borrow_mut().pop_front().unwrap_or(Ok(()))
    }

    async fn is_manually_installed(&self, package: &str) -> bool {
        self.manual_queries.borrow_mut().push(package.to_string());
        self.manual.borrow().contains(package)
    }

    async fn mark_manual(&self, packages: &[String]) -> Result<(), CommandError> {
        self.journal.push(Event::MarkManual(packages.to_vec()));
        if *self.mark_fails.borrow() {
            return Err(CommandError::Failed {
                command: "apt-mark manual".to_string(),
                status: "exit status: 1".to_string(),
                stdout: String::new(),
                stderr: "E: not installed".to_string(),
            });
        }
        Ok(())
    }
}

// ── Confirmer ─────────────────────────────────────────────────────────────────

/// Answers prompts from a script; answers yes once the script runs out.
pub struct ScriptedConfirmer {
    journal: Journal,
    answers: RefCell<VecDeque<io::Result<bool>>>,
}

impl ScriptedConfirmer {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            answers: RefCell::new(VecDeque::new()),
        }
    }

    pub fn answer(&self, answer: io::Result<bool>) {
        self.answers.borrow_mut().push_back(answer);
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        self.journal.push(Event::Confirm(prompt.to_string()));
        self.answers.borrow_mut().pop_front().unwrap_or(Ok(true))
    }
}

// ── Reporters ─────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn summary(&self, _: &str, _: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Step,
    Success,
    Warn,
    Info,
    Summary,
}

#[derive(Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn any(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Step, message.to_string()));
    }
    fn success(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Success, message.to_string()));
    }
    fn warn(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Warn, message.to_string()));
    }
    fn info(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Info, message.to_string()));
    }
    fn summary(&self, title: &str, body: &str) {
        self.messages
            .borrow_mut()
            .push((Level::Summary, format!("{title}\n{body}")));
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

/// All doubles wired to one journal.
pub struct Harness {
    pub journal: Journal,
    pub store: MemoryStore,
    pub builder: FakeBuilder,
    pub packages: RecordingPackageSystem,
    pub confirmer: ScriptedConfirmer,
    pub reporter: RecordingReporter,
}

impl Harness {
    pub fn new(storage: BundleStorage) -> Self {
        let journal = Journal::default();
        Self {
            store: MemoryStore::new(storage, journal.clone()),
            builder: FakeBuilder::new(journal.clone()),
            packages: RecordingPackageSystem::new(journal.clone()),
            confirmer: ScriptedConfirmer::new(journal.clone()),
            reporter: RecordingReporter::default(),
            journal,
        }
    }

    /// Orchestrator that prompts through the scripted confirmer.
    pub fn interactive(
        &self,
    ) -> BundleSync<
        '_,
        MemoryStore,
        FakeBuilder,
        RecordingPackageSystem,
        ScriptedConfirmer,
        RecordingReporter,
    > {
        self.with_options(SyncOptions::default())
    }

    /// Orchestrator that never prompts.
    pub fn auto(
        &self,
    ) -> BundleSync<
        '_,
        MemoryStore,
        FakeBuilder,
        RecordingPackageSystem,
        ScriptedConfirmer,
        RecordingReporter,
    > {
        self.with_options(SyncOptions {
            non_interactive: true,
            quiet: false,
        })
    }

    pub fn with_options(
        &self,
        options: SyncOptions,
    ) -> BundleSync<
        '_,
        MemoryStore,
        FakeBuilder,
        RecordingPackageSystem,
        ScriptedConfirmer,
        RecordingReporter,
    > {
        BundleSync::new(
            &self.store,
            &self.builder,
            &self.packages,
            &self.confirmer,
            &self.reporter,
            options,
        )
    }
}

// ── Command runner ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
    /// Issued through `run_to_exit`.
    pub waits_on_interrupt: bool,
}

#[derive(Default)]
struct RunnerState {
    installed: BTreeSet<String>,
    responses: VecDeque<Result<Output, CommandError>>,
    calls: Vec<Call>,
    /// File written into the working directory on `run_in`, if any.
    produce: Option<String>,
    dirs_seen: Vec<PathBuf>,
}

/// `CommandRunner` that records calls and replays scripted outputs.
/// Unscripted calls succeed with empty output.
#[derive(Clone, Default)]
pub struct ScriptedRunner(Rc<RefCell<RunnerState>>);

impl ScriptedRunner {
    pub fn with_programs(programs: &[&str]) -> Self {
        let runner = Self::default();
        runner.0.borrow_mut().installed = programs.iter().map(ToString::to_string).collect();
        runner
    }

    pub fn respond(&self, result: Result<Output, CommandError>) {
        self.0.borrow_mut().responses.push_back(result);
    }

    /// Have `run_in` create `file_name` in its working directory.
    pub fn produce_file(&self, file_name: &str) {
        self.0.borrow_mut().produce = Some(file_name.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn dirs_seen(&self) -> Vec<PathBuf> {
        self.0.borrow().dirs_seen.clone()
    }

    fn next(
        &self,
        program: &str,
        args: &[&str],
        dir: Option<&Path>,
        waits_on_interrupt: bool,
    ) -> Result<Output, CommandError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(Call {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            dir: dir.map(Path::to_path_buf),
            waits_on_interrupt,
        });
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(crate::helpers::ok_output(b"")))
    }
}

impl CommandRunner for ScriptedRunner {
    fn program_exists(&self, program: &str) -> bool {
        self.0.borrow().installed.contains(program)
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, CommandError> {
        self.next(program, args, None, false)
    }

    async fn run_to_exit(&self, program: &str, args: &[&str]) -> Result<Output, CommandError> {
        self.next(program, args, None, true)
    }

    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output, CommandError> {
        let produce = {
            let mut state = self.0.borrow_mut();
            state.dirs_seen.push(dir.to_path_buf());
            state.produce.clone()
        };
        if let Some(file_name) = produce {
            std::fs::write(dir.join(file_name), b"!<arch>\n").map_err(|source| CommandError::Io {
                context: "test artifact".to_string(),
                source,
            })?;
        }
        self.next(program, args, Some(dir), false)
    }
}
