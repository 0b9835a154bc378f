use crate::consumer::Consumer;
use crate::error::SignalError;
use crate::history::History;
use crate::storage::{self, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Named handler run by [`Signal::fire_action`].
pub type Action<T> = Rc<dyn Fn(&mut Signal<T>, Option<Value>) -> Result<(), SignalError>>;

/// New value for [`Signal::set`]: a literal or a function of the current one.
pub enum Update<T> {
    Value(T),
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Update::With(Box::new(f))
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Value(value)
    }
}

#[derive(Clone, Default)]
pub struct SignalOptions {
    /// Record every mutation in a [`History`].
    pub use_history: bool,
    /// Persist under this key and hydrate from it on creation.
    pub persist_name: Option<String>,
    /// Backend for `persist_name`; the thread's [`storage::local`] if unset.
    pub storage: Option<Rc<dyn Storage>>,
}

impl fmt::Debug for SignalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalOptions")
            .field("use_history", &self.use_history)
            .field("persist_name", &self.persist_name)
            .field("storage", &self.storage.as_ref().map(|_| ".."))
            .finish()
    }
}

struct Persist {
    key: String,
    storage: Rc<dyn Storage>,
}

struct Binding {
    consumer: Rc<dyn Consumer>,
    path: Option<String>,
}

/// Reactive value store.
///
/// Every mutation runs the same pipeline: persist (when configured), notify
/// the bound consumer, call the listener, then record history. At most one
/// consumer and one listener are attached at a time; attaching another
/// replaces the previous one.
pub struct Signal<T> {
    value: T,
    history: Option<History<T>>,
    actions: HashMap<String, Action<T>>,
    binding: Option<Binding>,
    listener: Option<Box<dyn FnMut(&T)>>,
    persist: Option<Persist>,
}

impl<T> Signal<T>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    /// A store without history or persistence.
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            history: None,
            actions: HashMap::new(),
            binding: None,
            listener: None,
            persist: None,
        }
    }

    /// A store configured by `options`, hydrated from storage when a persisted
    /// entry exists.
    pub fn with_options(initial: T, options: SignalOptions) -> Result<Self, SignalError> {
        let mut signal = Self::new(initial);
        if let Some(key) = options.persist_name {
            let storage = options
                .storage
                .unwrap_or_else(|| Rc::new(storage::local()) as Rc<dyn Storage>);
            if let Some(text) = storage.get(&key)? {
                // Blank entries and the "undefined" marker count as absent.
                if !text.trim().is_empty() && text != "undefined" {
                    signal.value = serde_json::from_str(&text)?;
                    log::debug!(target: "cradle::signal", "hydrated {key:?}");
                }
            }
            signal.persist = Some(Persist { key, storage });
        }
        if options.use_history {
            signal.history = Some(History::new(signal.value.clone()));
        }
        Ok(signal)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Owned copy of the current value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    pub fn history(&self) -> Option<&[T]> {
        self.history.as_ref().map(History::snapshots)
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history.as_ref().map(History::index)
    }

    /// Replace the value and run the mutation pipeline. With `notify` false
    /// the bound consumer is skipped; persistence, the listener and history
    /// still run.
    pub fn set(&mut self, update: impl Into<Update<T>>, notify: bool) -> Result<(), SignalError> {
        self.value = match update.into() {
            Update::Value(value) => value,
            Update::With(f) => f(&self.value),
        };
        self.commit(notify, true)
    }

    /// `set` with an updater closure, notifying the consumer.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T + 'static) -> Result<(), SignalError> {
        self.set(Update::with(f), true)
    }

    /// Replace one key of an object-shaped value, leaving its siblings.
    pub fn set_key(
        &mut self,
        key: &str,
        value: impl Serialize,
        notify: bool,
    ) -> Result<(), SignalError> {
        let mut json = serde_json::to_value(&self.value)?;
        let Value::Object(map) = &mut json else {
            return Err(SignalError::StoreTypeMismatch {
                key: key.to_string(),
            });
        };
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.value = serde_json::from_value(json)?;
        self.commit(notify, true)
    }

    fn commit(&mut self, notify: bool, record: bool) -> Result<(), SignalError> {
        if let Some(persist) = &self.persist {
            persist
                .storage
                .set(&persist.key, &serde_json::to_string(&self.value)?)?;
            log::debug!(target: "cradle::signal", "persisted {:?}", persist.key);
        }
        // Consumer errors surface only after the listener and history ran.
        let mut delivered = Ok(());
        if notify {
            if let Some(binding) = &self.binding {
                delivered = self.scoped_value(binding.path.as_deref()).and_then(|scoped| {
                    binding
                        .consumer
                        .update_state(&scoped)
                        .map_err(SignalError::Consumer)
                });
            }
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.value);
        }
        if record {
            if let Some(history) = self.history.as_mut() {
                history.push(self.value.clone());
            }
        }
        if let Err(err) = &delivered {
            log::error!(target: "cradle::signal", "consumer rejected update: {err}");
        }
        delivered
    }

    fn scoped_value(&self, path: Option<&str>) -> Result<Value, SignalError> {
        let value = serde_json::to_value(&self.value)?;
        Ok(match path {
            Some(path) => value.get(path).cloned().unwrap_or(Value::Null),
            None => value,
        })
    }

    pub fn create_action(
        &mut self,
        name: &str,
        handler: impl Fn(&mut Signal<T>, Option<Value>) -> Result<(), SignalError> + 'static,
    ) -> Result<(), SignalError> {
        if name.is_empty() {
            return Err(SignalError::ActionRegistration(name.to_string()));
        }
        self.actions.insert(name.to_string(), Rc::new(handler));
        Ok(())
    }

    /// Register several actions. Nothing is registered if any name is empty.
    pub fn create_actions(
        &mut self,
        actions: impl IntoIterator<Item = (String, Action<T>)>,
    ) -> Result<(), SignalError> {
        let actions: Vec<_> = actions.into_iter().collect();
        if let Some((name, _)) = actions.iter().find(|(name, _)| name.is_empty()) {
            return Err(SignalError::ActionRegistration(name.clone()));
        }
        self.actions.extend(actions);
        Ok(())
    }

    pub fn fire_action(&mut self, name: &str, data: Option<Value>) -> Result<(), SignalError> {
        let action = self
            .actions
            .get(name)
            .cloned()
            .ok_or_else(|| SignalError::ActionNotFound(name.to_string()))?;
        action(self, data)
    }

    /// Bind the single consumer slot and pre-bind its render with the
    /// current value (scoped to `path` when given).
    pub fn bind_ref(
        &mut self,
        consumer: Rc<dyn Consumer>,
        path: Option<&str>,
    ) -> Result<(), SignalError> {
        if !consumer.has_update_entry() {
            return Err(SignalError::InvalidConsumerBinding(
                "consumer has no update entry point".to_string(),
            ));
        }
        consumer.bind_render(self.scoped_value(path)?);
        if self.binding.is_some() {
            log::debug!(target: "cradle::signal", "replacing bound consumer");
        }
        self.binding = Some(Binding {
            consumer,
            path: path.map(str::to_string),
        });
        Ok(())
    }

    /// Move to the next snapshot without persisting or notifying.
    pub fn forward(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        let Some(next) = history.next().cloned() else {
            return false;
        };
        history.step_forward();
        self.value = next;
        log::debug!(target: "cradle::signal", "forward to {}", history.index());
        true
    }

    /// Move to the previous snapshot through the mutation pipeline (persist,
    /// notify, listener) without recording a new snapshot.
    pub fn backward(&mut self) -> Result<bool, SignalError> {
        let Some(previous) = self.history.as_ref().and_then(|h| h.previous().cloned()) else {
            return Ok(false);
        };
        self.value = previous;
        if let Some(history) = self.history.as_mut() {
            history.step_back();
            log::debug!(target: "cradle::signal", "backward to {}", history.index());
        }
        self.commit(true, false)?;
        Ok(true)
    }

    pub fn listen(&mut self, callback: impl FnMut(&T) + 'static) {
        self.listener = Some(Box::new(callback));
    }

    /// Drop the persisted entry. The in-memory value and history stay.
    pub fn clear_persist(&self) -> Result<(), SignalError> {
        if let Some(persist) = &self.persist {
            persist.storage.remove(&persist.key)?;
            log::debug!(target: "cradle::signal", "cleared {:?}", persist.key);
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("history", &self.history)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("bound", &self.binding.is_some())
            .field("persist", &self.persist.as_ref().map(|p| &p.key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde::Deserialize;
    use std::cell::RefCell;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
    }

    fn profile() -> Profile {
        Profile {
            name: "ada".into(),
            age: 36,
        }
    }

    #[derive(Default)]
    struct Recorder {
        rendered: RefCell<Option<Value>>,
        updates: RefCell<Vec<Value>>,
        enabled: bool,
    }

    impl Consumer for Recorder {
        fn has_update_entry(&self) -> bool {
            self.enabled
        }

        fn bind_render(&self, initial: Value) {
            *self.rendered.borrow_mut() = Some(initial);
        }

        fn update_state(&self, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
            self.updates.borrow_mut().push(value.clone());
            Ok(())
        }
    }

    struct Rejecting;

    impl Consumer for Rejecting {
        fn has_update_entry(&self) -> bool {
            true
        }

        fn bind_render(&self, _initial: Value) {}

        fn update_state(&self, _value: &Value) -> Result<(), Box<dyn std::error::Error>> {
            Err("render failed".into())
        }
    }

    #[test]
    fn consumer_error_keeps_store_consistent() {
        let mut s = Signal::with_options(
            0i32,
            SignalOptions {
                use_history: true,
                ..SignalOptions::default()
            },
        )
        .unwrap();
        s.bind_ref(Rc::new(Rejecting), None).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        s.listen(move |v| sink.borrow_mut().push(*v));

        assert!(matches!(s.set(1, true), Err(SignalError::Consumer(_))));
        assert!(matches!(s.set(2, true), Err(SignalError::Consumer(_))));
        assert_eq!(s.get(), 2);
        assert_eq!(s.history().unwrap(), &[0, 1, 2]);
        assert_eq!(s.history_index(), Some(2));
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(matches!(s.backward(), Err(SignalError::Consumer(_))));
        assert_eq!(s.get(), 1);
        assert_eq!(s.history_index(), Some(1));
        assert_eq!(s.history().unwrap()[1], s.get());
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    fn recorder() -> Rc<Recorder> {
        Rc::new(Recorder {
            enabled: true,
            ..Recorder::default()
        })
    }

    #[test]
    fn set_literal_and_updater() {
        let mut s = Signal::new(1i32);
        s.set(5, true).unwrap();
        assert_eq!(*s.value(), 5);
        s.set(Update::with(|v: &i32| v * 2), true).unwrap();
        assert_eq!(s.get(), 10);
        s.update(|v| v + 1).unwrap();
        assert_eq!(s.get(), 11);
    }

    #[test]
    fn history_grows_by_one_per_set() {
        let mut s = Signal::with_options(
            0,
            SignalOptions {
                use_history: true,
                ..SignalOptions::default()
            },
        )
        .unwrap();
        for n in 1..=4 {
            s.set(n, true).unwrap();
        }
        assert_eq!(s.history().unwrap(), &[0, 1, 2, 3, 4]);
        assert_eq!(s.history_index(), Some(4));
    }

    #[test]
    fn backward_notifies_forward_does_not() {
        let storage = MemoryStorage::new();
        let mut s = Signal::with_options(
            0i32,
            SignalOptions {
                use_history: true,
                persist_name: Some("steps".into()),
                storage: Some(Rc::new(storage.clone())),
            },
        )
        .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        s.listen(move |v| sink.borrow_mut().push(*v));
        s.set(1, true).unwrap();
        s.set(2, true).unwrap();

        assert!(s.backward().unwrap());
        assert_eq!(s.get(), 1);
        assert_eq!(s.history_index(), Some(1));
        assert_eq!(s.history().unwrap().len(), 3);
        assert_eq!(storage.get("steps").unwrap().as_deref(), Some("1"));

        assert!(s.forward());
        assert_eq!(s.get(), 2);
        assert_eq!(s.history_index(), Some(2));
        assert_eq!(storage.get("steps").unwrap().as_deref(), Some("1"));
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);

        assert!(!s.forward());
    }

    #[test]
    fn backward_stops_at_start() {
        let mut s = Signal::with_options(
            "a".to_string(),
            SignalOptions {
                use_history: true,
                ..SignalOptions::default()
            },
        )
        .unwrap();
        assert!(!s.backward().unwrap());
        assert!(!Signal::new(0u8).backward().unwrap());
    }

    #[test]
    fn set_key_on_object_keeps_siblings() {
        let mut s = Signal::new(profile());
        s.set_key("age", 37, true).unwrap();
        assert_eq!(
            s.get(),
            Profile {
                name: "ada".into(),
                age: 37
            }
        );
    }

    #[test]
    fn set_key_rejects_arrays() {
        let mut s = Signal::new(vec![1, 2, 3]);
        let err = s.set_key("0", 9, true).unwrap_err();
        assert!(matches!(err, SignalError::StoreTypeMismatch { key } if key == "0"));
        assert_eq!(s.get(), vec![1, 2, 3]);
    }

    #[test]
    fn set_key_with_wrong_type_fails_to_decode() {
        let mut s = Signal::new(profile());
        assert!(matches!(
            s.set_key("age", "old", true),
            Err(SignalError::Serde(_))
        ));
        assert_eq!(s.get(), profile());
    }

    #[test]
    fn actions_fire_with_data() {
        let mut s = Signal::new(0i64);
        s.create_action("add", |s, data| {
            let n = data.and_then(|d| d.as_i64()).unwrap_or(1);
            s.update(move |v| v + n)
        })
        .unwrap();
        s.fire_action("add", Some(Value::from(5))).unwrap();
        s.fire_action("add", None).unwrap();
        assert_eq!(s.get(), 6);
    }

    #[test]
    fn missing_action_names_itself() {
        let mut s = Signal::new(0);
        let err = s.fire_action("missing", None).unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(matches!(err, SignalError::ActionNotFound(name) if name == "missing"));
    }

    #[test]
    fn action_registration_rejects_empty_names() {
        let mut s = Signal::new(0i32);
        assert!(matches!(
            s.create_action("", |_, _| Ok(())),
            Err(SignalError::ActionRegistration(_))
        ));
        let noop: Action<i32> =
            Rc::new(|_: &mut Signal<i32>, _: Option<Value>| -> Result<(), SignalError> { Ok(()) });
        let err = s
            .create_actions(vec![
                ("ok".to_string(), Rc::clone(&noop)),
                (String::new(), noop),
            ])
            .unwrap_err();
        assert!(matches!(err, SignalError::ActionRegistration(_)));
        assert!(matches!(
            s.fire_action("ok", None),
            Err(SignalError::ActionNotFound(_))
        ));
    }

    #[test]
    fn bound_consumer_receives_scoped_values() {
        let mut s = Signal::new(profile());
        let rec = recorder();
        s.bind_ref(rec.clone(), Some("name")).unwrap();
        assert_eq!(*rec.rendered.borrow(), Some(Value::from("ada")));

        s.set_key("name", "grace", true).unwrap();
        s.set_key("name", "quiet", false).unwrap();
        assert_eq!(*rec.updates.borrow(), vec![Value::from("grace")]);
    }

    #[test]
    fn second_binding_replaces_first() {
        let mut s = Signal::new(1);
        let first = recorder();
        let second = recorder();
        s.bind_ref(first.clone(), None).unwrap();
        s.bind_ref(second.clone(), None).unwrap();
        s.set(2, true).unwrap();
        assert!(first.updates.borrow().is_empty());
        assert_eq!(*second.updates.borrow(), vec![Value::from(2)]);
    }

    #[test]
    fn consumer_without_update_entry_is_rejected() {
        let mut s = Signal::new(1);
        let rec = Rc::new(Recorder::default());
        assert!(matches!(
            s.bind_ref(rec, None),
            Err(SignalError::InvalidConsumerBinding(_))
        ));
    }

    #[test]
    fn undefined_entry_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set("k", "undefined").unwrap();
        let s = Signal::with_options(
            7,
            SignalOptions {
                persist_name: Some("k".into()),
                storage: Some(Rc::new(storage)),
                ..SignalOptions::default()
            },
        )
        .unwrap();
        assert_eq!(s.get(), 7);
    }
}
