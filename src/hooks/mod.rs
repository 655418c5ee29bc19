//! Lifecycle hooks fired around a committed transition.
//!
//! Three hook kinds exist: the source state's `exit`, the transition's
//! `behavior` and the destination state's `enter`. [`dispatch`] fires them in
//! one fixed order, behavior then exit then enter, and only after the new
//! state has been persisted. A failing hook stops the remaining hooks but can
//! never undo the committed state change.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Side-effecting callback run with the post-persistence record.
pub type Hook<R> = Arc<dyn Fn(&R) -> Result<(), HookError> + Send + Sync>;

/// Error returned by a hook.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which lifecycle slot a hook occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Behavior,
    Exit,
    Enter,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Behavior => "behavior",
            Self::Exit => "exit",
            Self::Enter => "enter",
        };
        f.write_str(name)
    }
}

/// A hook failed after the state change was committed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} hook failed: {source}")]
pub struct HookFailure {
    pub kind: HookKind,
    #[source]
    pub source: HookError,
}

/// The hooks relevant to one transition attempt.
pub struct Hooks<'a, R> {
    /// Exit hook of the source state.
    pub exit: Option<&'a Hook<R>>,
    pub behavior: Option<&'a Hook<R>>,
    /// Enter hook of the destination state.
    pub enter: Option<&'a Hook<R>>,
}

impl<R> Hooks<'_, R> {
    pub fn none() -> Self {
        Self {
            exit: None,
            behavior: None,
            enter: None,
        }
    }
}

/// Fire the hooks for a transition.
///
/// - `behavior` fires when `transition_applied` is true, even for a
///   transition from a state to itself.
/// - `exit` and `enter` fire only when `state_changed` is true.
///
/// Order is always behavior, exit, enter. The first failing hook is returned
/// and the hooks after it are skipped.
///
/// # Example
///
/// ```rust
/// use docstate::hooks::{dispatch, Hook, Hooks};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// let behavior: Hook<String> = Arc::new(move |_record: &String| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// });
///
/// let hooks = Hooks { exit: None, behavior: Some(&behavior), enter: None };
/// dispatch(hooks, false, true, &"record".to_string()).unwrap();
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub fn dispatch<R>(
    hooks: Hooks<'_, R>,
    state_changed: bool,
    transition_applied: bool,
    instance: &R,
) -> Result<(), HookFailure> {
    let plan = [
        (HookKind::Behavior, hooks.behavior, transition_applied),
        (HookKind::Exit, hooks.exit, state_changed),
        (HookKind::Enter, hooks.enter, state_changed),
    ];

    for (kind, hook, should_fire) in plan {
        let Some(hook) = hook.filter(|_| should_fire) else {
            continue;
        };
        hook(instance).map_err(|source| HookFailure { kind, source })?;
    }

    Ok(())
}
