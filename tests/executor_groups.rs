use std::cell::RefCell;
use std::path::PathBuf;

use smartmv::{
    aggregate, Decision, ExecutionResult, Executor, Group, Invocation, MoveFailure, MoveRequest,
    Mover, Plan, SmartmvError,
};

/// Records calls; fails every call aimed at `fail_for`.
struct FakeMover {
    name: &'static str,
    fail_for: Option<PathBuf>,
    calls: RefCell<Vec<(Vec<PathBuf>, PathBuf, bool)>>,
    modes: RefCell<Vec<bool>>,
}

impl FakeMover {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            fail_for: None,
            calls: RefCell::new(Vec::new()),
            modes: RefCell::new(Vec::new()),
        }
    }

    fn failing_for(mut self, dest: &str) -> Self {
        self.fail_for = Some(PathBuf::from(dest));
        self
    }
}

impl Mover for FakeMover {
    fn primitive(&self) -> &'static str {
        self.name
    }

    fn describe(&self, call: &Invocation<'_>) -> String {
        format!("{} {} {}", self.name, call.sources.len(), call.destination.display())
    }

    fn move_all(&self, call: &Invocation<'_>) -> Result<Vec<PathBuf>, MoveFailure> {
        self.calls.borrow_mut().push((
            call.sources.to_vec(),
            call.destination.to_path_buf(),
            call.overwrite,
        ));
        self.modes.borrow_mut().push(call.into_directory);
        if self.fail_for.as_deref() == Some(call.destination) {
            return Err(MoveFailure::new("permission denied"));
        }
        Ok(call.sources.to_vec())
    }
}

fn group(decision: Decision, dest: &str, sources: &[&str]) -> Group {
    Group {
        decision,
        destination: PathBuf::from(dest),
        into_directory: true,
        repo: None,
        requests: sources
            .iter()
            .map(|s| MoveRequest {
                source: PathBuf::from(s),
                destination: PathBuf::from(dest),
                into_directory: true,
                source_exists: true,
            })
            .collect(),
    }
}

#[test]
fn failed_group_does_not_stop_the_next_one() {
    let vcs = FakeMover::new("git mv").failing_for("/locked");
    let plain = FakeMover::new("mv");
    let plan = Plan::from_groups(vec![
        group(Decision::VersionControlled, "/locked", &["/r/a", "/r/b"]),
        group(Decision::Plain, "/open", &["/x/c"]),
    ]);

    let results = Executor::new(&vcs, &plain).execute(&plan);

    assert_eq!(results.len(), 2);
    assert!(!results[0].succeeded());
    assert!(results[0].moved.is_empty());
    assert!(results[1].succeeded());
    assert_eq!(results[1].moved, vec![PathBuf::from("/x/c")]);

    match &results[0].error {
        Some(SmartmvError::ExternalCommandFailure {
            group,
            primitive,
            destination,
            message,
        }) => {
            assert_eq!(*group, 1);
            assert_eq!(*primitive, "git mv");
            assert_eq!(destination, &PathBuf::from("/locked"));
            assert_eq!(message, "permission denied");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = aggregate(results).unwrap_err();
    assert_eq!(err.code(), 5);
}

#[test]
fn each_group_is_a_single_call_with_all_sources() {
    let vcs = FakeMover::new("git mv");
    let plain = FakeMover::new("mv");
    let plan = Plan::from_groups(vec![
        group(Decision::VersionControlled, "/r/d", &["/r/1", "/r/2", "/r/3"]),
        group(Decision::Plain, "/o", &["/r/4"]),
    ]);

    let results: Vec<ExecutionResult> = Executor::new(&vcs, &plain).overwrite(true).execute(&plan);

    assert!(aggregate(results).is_ok());
    let calls = vcs.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.len(), 3);
    assert!(calls[0].2, "overwrite form must be requested");
    assert_eq!(plain.calls.borrow().len(), 1);
}

#[test]
fn describe_renders_one_line_per_group_in_order() {
    let vcs = FakeMover::new("git mv");
    let plain = FakeMover::new("mv");
    let plan = Plan::from_groups(vec![
        group(Decision::Plain, "/o", &["/a"]),
        group(Decision::VersionControlled, "/r", &["/r/x", "/r/y"]),
    ]);

    let lines = Executor::new(&vcs, &plain).describe(&plan);

    assert_eq!(lines, vec!["mv 1 /o".to_string(), "git mv 2 /r".to_string()]);
    assert!(vcs.calls.borrow().is_empty(), "describing must not move anything");
}

#[test]
fn movers_receive_the_planned_mode() {
    let vcs = FakeMover::new("git mv");
    let plain = FakeMover::new("mv");
    let mut rename = group(Decision::Plain, "/o/new-name", &["/a/old-name"]);
    rename.into_directory = false;
    rename.requests[0].into_directory = false;
    let plan = Plan::from_groups(vec![group(Decision::Plain, "/o", &["/a/x"]), rename]);

    let results = Executor::new(&vcs, &plain).execute(&plan);

    assert!(results.iter().all(ExecutionResult::succeeded));
    assert_eq!(*plain.modes.borrow(), vec![true, false]);
}
