//! End-to-end transitions against the in-memory store.
//!
//! Covers declaration, defaults, guards, hook firing rules and value mode
//! for both the by-id and the in-place paths.

use docstate::builder::{StateBuilder, TransitionBuilder};
use docstate::engine::{StateMachine, TransitionError, TransitionOutcome};
use docstate::store::{Document, MemoryStore};
use docstate::{BuildError, MachineBuilder, StateUpdate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn abc() -> StateMachine<Document> {
    StateMachine::builder()
        .state(StateBuilder::new("a"))
        .state(StateBuilder::new("b"))
        .state(StateBuilder::new("c"))
        .transition(TransitionBuilder::new("x").from("a").to("b"))
        .transition(
            TransitionBuilder::new("y")
                .from("b")
                .to("c")
                .when(|_: &Document| false),
        )
        .transition(TransitionBuilder::new("z").from_any_of(["b", "c"]).to("a"))
        .build()
        .unwrap()
}

fn in_state(state: &str) -> Document {
    Document::new(StateUpdate {
        state: state.into(),
        state_value: None,
    })
}

#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn hook(&self) -> impl Fn(&Document) -> Result<(), docstate::hooks::HookError> {
        let count = Arc::clone(&self.0);
        move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

mod schema {
    use super::*;

    #[test]
    fn enumerates_states_in_declaration_order() {
        assert_eq!(abc().state_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn exposes_every_transition() {
        let machine = abc();
        assert_eq!(machine.transition_names(), vec!["x", "y", "z"]);
        for name in ["x", "y", "z"] {
            assert_eq!(machine.transition(name).unwrap().name(), name);
        }
        assert!(matches!(
            machine.transition("w"),
            Err(TransitionError::UnknownTransition(_))
        ));
    }

    #[test]
    fn new_records_start_in_first_state() {
        let doc = Document::new(abc().initial_update());
        assert_eq!(doc.state, "a");
        assert_eq!(doc.state_value, None);
    }

    #[test]
    fn flagged_default_state_is_used() {
        let machine: StateMachine<Document> = StateMachine::builder()
            .state(StateBuilder::new("a"))
            .state(StateBuilder::new("b").default_state())
            .build()
            .unwrap();

        assert_eq!(Document::new(machine.initial_update()).state, "b");
    }

    #[test]
    fn transitions_to_undeclared_states_fail_construction() {
        let result = MachineBuilder::<Document>::new()
            .state(StateBuilder::new("a"))
            .transition(TransitionBuilder::new("x").from("a").to("nowhere"))
            .build();

        assert!(matches!(result, Err(BuildError::UnknownState { .. })));
    }
}

mod instance {
    use super::*;

    #[test]
    fn transitions_between_states() {
        let machine = abc();
        let store = MemoryStore::new();
        let mut doc = Document::new(machine.initial_update());

        machine.apply_to_instance(&store, "x", &mut doc).unwrap();

        assert_eq!(doc.state, "b");
    }

    #[test]
    fn undefined_move_leaves_state() {
        let machine = abc();
        let store = MemoryStore::new();
        let mut doc = Document::new(machine.initial_update());

        let outcome = machine.apply_to_instance(&store, "y", &mut doc).unwrap();

        assert!(!outcome.is_applied());
        assert_eq!(doc.state, "a");
    }

    #[test]
    fn accepts_array_of_sources() {
        let machine = abc();
        let store = MemoryStore::new();
        let mut doc = in_state("b");

        machine.apply_to_instance(&store, "z", &mut doc).unwrap();

        assert_eq!(doc.state, "a");
    }

    #[test]
    fn guard_protects_state() {
        let machine = abc();
        let store = MemoryStore::new();
        let mut doc = in_state("b");

        let error = machine.apply_to_instance(&store, "y", &mut doc).unwrap_err();

        assert!(matches!(error, TransitionError::GuardFailed { .. }));
        assert_eq!(doc.state, "b");
    }

    #[test]
    fn saves_the_record_during_transition() {
        let machine = abc();
        let store = MemoryStore::new();
        let mut doc = in_state("c");

        machine.apply_to_instance(&store, "z", &mut doc).unwrap();

        assert_eq!(store.get(&doc.id), Some(doc));
    }
}

mod by_id {
    use super::*;

    #[test]
    fn transitions_stored_record() {
        let machine = abc();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine
            .transition("x")
            .unwrap()
            .apply_by_id(&store, &doc.id)
            .unwrap();

        assert_eq!(store.get(&doc.id).unwrap().state, "b");
    }

    #[test]
    fn errors_when_nothing_is_found() {
        let machine = abc();
        let store = MemoryStore::new();
        let never_saved = Document::new(machine.initial_update());

        let error = machine
            .apply_by_id(&store, "x", &never_saved.id)
            .unwrap_err();

        assert!(matches!(error, TransitionError::NotFound { .. }));
    }

    #[test]
    fn round_trip_returns_to_start() {
        let machine = abc();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine.apply_by_id(&store, "x", &doc.id).unwrap();
        machine.apply_by_id(&store, "z", &doc.id).unwrap();

        assert_eq!(store.get(&doc.id).unwrap().state, "a");
    }
}

mod guard {
    use super::*;

    fn guarded() -> StateMachine<Document> {
        StateMachine::builder()
            .state(StateBuilder::new("a"))
            .state(StateBuilder::new("b"))
            .transition(
                TransitionBuilder::new("f")
                    .from("a")
                    .to("b")
                    .validate("attr1", |doc: &Document| {
                        doc.attribute_str("attr1")
                            .filter(|value| !value.is_empty())
                            .is_none()
                            .then(|| "required".to_string())
                    }),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn protects_the_state() {
        let machine = guarded();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update()).with_attribute("attr1", "");
        store.insert(doc.clone());

        let result = machine.apply_by_id(&store, "f", &doc.id);

        assert!(result.is_err());
        assert_eq!(store.get(&doc.id).unwrap().state, "a");
    }

    #[test]
    fn reports_field_message() {
        let machine = guarded();
        let store = MemoryStore::new();
        let mut doc = Document::new(machine.initial_update());

        let error = machine.apply_to_instance(&store, "f", &mut doc).unwrap_err();

        let failure = error.guard_failure().unwrap();
        assert_eq!(failure.field_message("attr1"), Some("required"));
        assert_eq!(failure.field_errors().len(), 1);
    }

    #[test]
    fn passes_when_field_is_set() {
        let machine = guarded();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update()).with_attribute("attr1", "ok");
        store.insert(doc.clone());

        let outcome = machine.apply_by_id(&store, "f", &doc.id).unwrap();

        assert!(outcome.state_changed());
    }
}

mod hooks {
    use super::*;

    struct Spies {
        enter_a: Counter,
        enter_b: Counter,
        enter_c: Counter,
        exit_a: Counter,
        behavior_f: Counter,
        behavior_f2: Counter,
        behavior_f3: Counter,
    }

    fn callbacks() -> (StateMachine<Document>, Spies) {
        let spies = Spies {
            enter_a: Counter::default(),
            enter_b: Counter::default(),
            enter_c: Counter::default(),
            exit_a: Counter::default(),
            behavior_f: Counter::default(),
            behavior_f2: Counter::default(),
            behavior_f3: Counter::default(),
        };

        let machine = StateMachine::builder()
            .state(
                StateBuilder::new("a")
                    .on_enter(spies.enter_a.hook())
                    .on_exit(spies.exit_a.hook()),
            )
            .state(StateBuilder::new("b").on_enter(spies.enter_b.hook()))
            .state(StateBuilder::new("c").on_enter(spies.enter_c.hook()))
            .transition(
                TransitionBuilder::new("f")
                    .from("a")
                    .to("b")
                    .behavior(spies.behavior_f.hook()),
            )
            .transition(
                TransitionBuilder::new("f2")
                    .from("a")
                    .to("c")
                    .behavior(spies.behavior_f2.hook()),
            )
            .transition(
                TransitionBuilder::new("f3")
                    .from("a")
                    .to("a")
                    .behavior(spies.behavior_f3.hook()),
            )
            .build()
            .unwrap();

        (machine, spies)
    }

    #[test]
    fn calls_enter_exit_and_behavior() {
        let (machine, spies) = callbacks();
        let store = MemoryStore::new();
        let mut doc = Document::new(machine.initial_update());

        machine.apply_to_instance(&store, "f", &mut doc).unwrap();

        assert_eq!(spies.enter_b.get(), 1);
        assert_eq!(spies.exit_a.get(), 1);
        assert_eq!(spies.behavior_f.get(), 1);
        assert_eq!(spies.enter_a.get(), 0);
    }

    #[test]
    fn repeated_call_fires_once() {
        let (machine, spies) = callbacks();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine.apply_by_id(&store, "f2", &doc.id).unwrap();
        let second = machine.apply_by_id(&store, "f2", &doc.id).unwrap();

        assert_eq!(
            second,
            TransitionOutcome::NotApplicable {
                current: "c".into()
            }
        );
        assert_eq!(spies.enter_c.get(), 1);
        assert_eq!(spies.behavior_f2.get(), 1);
    }

    #[test]
    fn same_state_runs_behavior_but_not_enter_or_exit() {
        let (machine, spies) = callbacks();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine.apply_by_id(&store, "f3", &doc.id).unwrap();
        machine.apply_by_id(&store, "f3", &doc.id).unwrap();

        assert_eq!(spies.behavior_f3.get(), 2);
        assert_eq!(spies.enter_a.get(), 0);
        assert_eq!(spies.exit_a.get(), 0);
    }

    #[test]
    fn hooks_observe_persisted_state() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let machine: StateMachine<Document> = StateMachine::builder()
            .state(StateBuilder::new("a"))
            .state(StateBuilder::new("b"))
            .transition(TransitionBuilder::new("x").from("a").to("b").behavior(
                move |doc: &Document| {
                    sink.lock().push(doc.state.clone());
                    Ok(())
                },
            ))
            .build()
            .unwrap();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine.apply_by_id(&store, "x", &doc.id).unwrap();

        assert_eq!(*seen.lock(), vec!["b".to_string()]);
    }
}

mod state_value {
    use super::*;

    fn valued() -> StateMachine<Document> {
        StateMachine::builder()
            .state(StateBuilder::new("a").value(0))
            .state(StateBuilder::new("b").value(1))
            .state(StateBuilder::new("c").value(2))
            .transition(TransitionBuilder::new("x").from("a").to("b"))
            .transition(
                TransitionBuilder::new("y")
                    .from("b")
                    .to("c")
                    .when(|_: &Document| false),
            )
            .transition(TransitionBuilder::new("z").from_any_of(["b", "c"]).to("a"))
            .build()
            .unwrap()
    }

    #[test]
    fn looks_up_values() {
        let machine = valued();
        assert_eq!(machine.state_value("a"), Some(0));
        assert_eq!(machine.state_value("b"), Some(1));
        assert_eq!(machine.state_value("c"), Some(2));
    }

    #[test]
    fn has_default_value() {
        let doc = Document::new(valued().initial_update());
        assert_eq!(doc.state_value, Some(0));
    }

    #[test]
    fn flagged_default_carries_its_value() {
        let machine: StateMachine<Document> = StateMachine::builder()
            .state(StateBuilder::new("a").value(0))
            .state(StateBuilder::new("b").value(1).default_state())
            .build()
            .unwrap();

        assert_eq!(Document::new(machine.initial_update()).state_value, Some(1));
    }

    #[test]
    fn value_follows_transition() {
        let machine = valued();
        let store = MemoryStore::new();
        let mut doc = Document::new(machine.initial_update());

        machine.apply_to_instance(&store, "x", &mut doc).unwrap();

        assert_eq!(doc.state, "b");
        assert_eq!(doc.state_value, Some(1));
    }

    #[test]
    fn round_trip_restores_value() {
        let machine = valued();
        let store = MemoryStore::new();
        let doc = Document::new(machine.initial_update());
        store.insert(doc.clone());

        machine.apply_by_id(&store, "x", &doc.id).unwrap();
        machine.apply_by_id(&store, "z", &doc.id).unwrap();

        let stored = store.get(&doc.id).unwrap();
        assert_eq!(stored.state, "a");
        assert_eq!(stored.state_value, Some(0));
    }

    #[test]
    fn no_value_lookup_outside_value_mode() {
        assert_eq!(abc().state_value("a"), None);
    }
}

mod wildcard {
    use super::*;
    use docstate::store::{Store, StoreError, UpdateResult};
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Records the expected state of every conditional update.
    #[derive(Default)]
    struct Recording {
        inner: MemoryStore<Document>,
        filters: Mutex<Vec<String>>,
    }

    impl Store<Document> for Recording {
        fn find_one(&self, id: &Uuid) -> Result<Option<Document>, StoreError> {
            self.inner.find_one(id)
        }

        fn conditional_update(
            &self,
            id: &Uuid,
            expected_state: &str,
            update: &StateUpdate,
        ) -> Result<UpdateResult, StoreError> {
            self.filters.lock().push(expected_state.to_string());
            self.inner.conditional_update(id, expected_state, update)
        }

        fn save(&self, record: &Document) -> Result<(), StoreError> {
            self.inner.save(record)
        }
    }

    fn resettable(exit_c: &Counter, enter_a: &Counter) -> StateMachine<Document> {
        StateMachine::builder()
            .state(StateBuilder::new("a").on_enter(enter_a.hook()))
            .state(StateBuilder::new("b"))
            .state(StateBuilder::new("c").on_exit(exit_c.hook()))
            .transition(TransitionBuilder::new("reset").from("*").to("a"))
            .build()
            .unwrap()
    }

    #[test]
    fn by_id_filters_on_the_state_read() {
        let (exit_c, enter_a) = (Counter::default(), Counter::default());
        let machine = resettable(&exit_c, &enter_a);
        let store = Recording::default();
        let doc = in_state("c");
        store.inner.insert(doc.clone());

        let outcome = machine.apply_by_id(&store, "reset", &doc.id).unwrap();

        assert!(matches!(
            outcome,
            TransitionOutcome::Applied { ref from, state_changed: true, .. } if from == "c"
        ));
        assert_eq!(*store.filters.lock(), vec!["c".to_string()]);
        assert_eq!(store.inner.get(&doc.id).unwrap().state, "a");
        assert_eq!(exit_c.get(), 1);
        assert_eq!(enter_a.get(), 1);
    }

    #[test]
    fn in_place_moves_from_any_declared_state() {
        let (exit_c, enter_a) = (Counter::default(), Counter::default());
        let machine = resettable(&exit_c, &enter_a);
        let store = MemoryStore::new();
        let mut doc = in_state("c");

        let outcome = machine.apply_to_instance(&store, "reset", &mut doc).unwrap();

        assert!(outcome.state_changed());
        assert_eq!(doc.state, "a");
        assert_eq!(store.get(&doc.id), Some(doc));
        assert_eq!(exit_c.get(), 1);
        assert_eq!(enter_a.get(), 1);
    }

    #[test]
    fn by_id_skips_undeclared_state() {
        let (exit_c, enter_a) = (Counter::default(), Counter::default());
        let machine = resettable(&exit_c, &enter_a);
        let store = Recording::default();
        let doc = in_state("archived");
        store.inner.insert(doc.clone());

        let outcome = machine.apply_by_id(&store, "reset", &doc.id).unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::NotApplicable {
                current: "archived".into()
            }
        );
        assert!(store.filters.lock().is_empty());
        assert_eq!(store.inner.get(&doc.id), Some(doc));
        assert_eq!(enter_a.get(), 0);
    }

    #[test]
    fn in_place_skips_undeclared_state() {
        let (exit_c, enter_a) = (Counter::default(), Counter::default());
        let machine = resettable(&exit_c, &enter_a);
        let store = MemoryStore::new();
        let mut doc = in_state("archived");
        let before = doc.clone();

        let outcome = machine.apply_to_instance(&store, "reset", &mut doc).unwrap();

        assert!(!outcome.is_applied());
        assert_eq!(doc, before);
        assert!(store.is_empty());
        assert_eq!(enter_a.get(), 0);
    }
}
