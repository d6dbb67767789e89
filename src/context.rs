//! Validation orchestration.
//!
//! `Context::validate` coordinates the four phases — compatibility gate,
//! graph assembly, unknown-input synthesis, graph walk — under one run lock,
//! with a fail-fast-vs-accumulate policy enforced at each phase boundary:
//! diagnostics are only ever appended, and a fatal diagnostic stops later
//! phases without discarding anything already collected.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::config::{Config, Module};
use crate::diagnostics::Diagnostics;
use crate::graph::{GraphBuilder, State, ValidationGraph};
use crate::value::{InputValue, InputValues, Ty, Value, ValueSource};
use crate::version;
use crate::walk::{self, WalkMode, WalkOpts};

/// Options affecting the details of how a configuration is validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOpts {
    /// Enable additional advisory warnings describing ways to improve a
    /// configuration that is valid as written. Lint findings are subjective;
    /// they never block validation. Off by default.
    pub lint_checks: bool,
}

/// Progress of a single validation run. Every transition is attempted exactly
/// once; `AbortedEarly` is the terminal state for fatal diagnostics at a
/// phase boundary.
enum RunState {
    Start,
    VersionChecked,
    GraphBuilt(ValidationGraph),
    InputsSynthesized(ValidationGraph, InputValues),
    Walked,
    AbortedEarly,
}

/// Orchestrator instance. Holds the run lock admitting one top-level
/// validate/plan/apply operation at a time.
#[derive(Debug, Default)]
pub struct Context {
    run_lock: Mutex<()>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// Acquire the run lock for the given operation. The returned guard keeps
    /// the lock held for the scope of the run and releases it on every exit
    /// path. A poisoned lock is recovered: the previous run only ever held
    /// the unit value.
    fn acquire_run(&self, operation: &str) -> MutexGuard<'_, ()> {
        debug!(operation, "acquiring run lock");
        self.run_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Perform semantic validation of a configuration and return every
    /// warning and error found.
    ///
    /// Syntax and structure are the loader's responsibility and are not
    /// re-checked here. Validation considers only the configuration: all
    /// input variables are treated as unknown values of their declared type,
    /// so the result is independent of whatever concrete values a later plan
    /// will supply. The configuration must not be mutated while a run is in
    /// progress.
    pub fn validate(&self, config: &Config, opts: &ValidateOpts) -> Diagnostics {
        let _run = self.acquire_run("validate");

        let mut diags = Diagnostics::new();
        let mut state = RunState::Start;

        loop {
            state = match state {
                RunState::Start => {
                    let more = version::check_core_version_requirements(config);
                    diags.extend(more);
                    // An incompatible core version makes every downstream
                    // semantic diagnostic misleading, so nothing else runs.
                    if diags.has_errors() {
                        RunState::AbortedEarly
                    } else {
                        RunState::VersionChecked
                    }
                }
                RunState::VersionChecked => {
                    debug!("building validation graph");
                    let builder = GraphBuilder {
                        config,
                        validate: true,
                        state: State::new(),
                    };
                    match builder.build() {
                        Ok(graph) => RunState::GraphBuilt(graph),
                        Err(more) => {
                            diags.extend(more);
                            RunState::AbortedEarly
                        }
                    }
                }
                RunState::GraphBuilt(graph) => {
                    // Total over any variable set, including the empty one.
                    let inputs = unknown_input_values(&config.module);
                    RunState::InputsSynthesized(graph, inputs)
                }
                RunState::InputsSynthesized(graph, inputs) => {
                    debug!("walking validation graph");
                    let (report, walk_diags) = walk::walk(
                        &graph,
                        WalkMode::Validate,
                        config,
                        &inputs,
                        &WalkOpts { lint_checks: opts.lint_checks },
                    );
                    diags.extend(report.non_fatal);
                    let fatal = walk_diags.has_errors();
                    diags.extend(walk_diags);
                    if fatal {
                        RunState::AbortedEarly
                    } else {
                        RunState::Walked
                    }
                }
                RunState::Walked | RunState::AbortedEarly => break,
            };
        }

        diags
    }
}

/// Synthesize one placeholder input per declared root-module variable: an
/// unknown value of the declared type, or a fully dynamic unknown when no
/// type was declared. Every entry carries `ValueSource::FromUnknown` so
/// downstream consumers can tell it apart from real user-supplied data.
pub fn unknown_input_values(module: &Module) -> InputValues {
    module
        .variables
        .iter()
        .map(|(name, decl)| {
            let ty = decl.ty.clone().unwrap_or(Ty::Dynamic);
            (
                name.clone(),
                InputValue {
                    value: Value::unknown(ty),
                    source: ValueSource::FromUnknown,
                },
            )
        })
        .collect()
}
