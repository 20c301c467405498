//! Reducers and the root reducer registry.

use core::fmt;

use indexmap::IndexMap;

use crate::Record;

/// A named state accumulator fed with action results.
///
/// Implementations keep their current state and return the new one from
/// [`reduce_action`](Self::reduce_action), or `None` when the action does not
/// concern them. `None` drops the whole dispatch: no props are updated.
pub trait Reducer {
    /// The current state. Before any action, this is the default state that
    /// connected components are seeded with.
    fn state(&self) -> &Record;

    /// Reduce an action result into a new state.
    fn reduce_action(&mut self, action: &Record) -> Option<Record>;
}

/// A [`Reducer`] backed by a closure of `(current state, action) -> new state`.
///
/// The produced state becomes the reducer's current state.
///
/// ```rust
/// use hive_ui::{fields, FnReducer, Record, Reducer};
///
/// let mut usb = FnReducer::new(Record::from(fields! { "status" => "idle" }), |state, action| {
///     let status = action.get("status")?.clone();
///     state.replace(&fields! { "status" => status }).ok()
/// });
///
/// let next = usb.reduce_action(&Record::from(fields! { "status" => "busy" }));
/// assert_eq!(next.as_ref(), Some(usb.state()));
/// assert!(usb.reduce_action(&Record::new()).is_none());
/// ```
pub struct FnReducer<F> {
    state: Record,
    reduce: F,
}

impl<F> FnReducer<F>
where
    F: FnMut(&Record, &Record) -> Option<Record>,
{
    pub fn new(default_state: Record, reduce: F) -> Self {
        Self {
            state: default_state,
            reduce,
        }
    }
}

impl<F> Reducer for FnReducer<F>
where
    F: FnMut(&Record, &Record) -> Option<Record>,
{
    fn state(&self) -> &Record {
        &self.state
    }

    fn reduce_action(&mut self, action: &Record) -> Option<Record> {
        let next = (self.reduce)(&self.state, action)?;
        self.state = next.clone();
        Some(next)
    }
}

/// Reducers combined under their names.
///
/// An engine holds at most one; installing another replaces it wholesale.
#[derive(Default)]
pub struct RootReducer {
    reducers: IndexMap<String, Box<dyn Reducer>>,
}

impl RootReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine named reducers into a root reducer.
    pub fn combine<I, N>(reducers: I) -> Self
    where
        I: IntoIterator<Item = (N, Box<dyn Reducer>)>,
        N: Into<String>,
    {
        Self {
            reducers: reducers
                .into_iter()
                .map(|(name, reducer)| (name.into(), reducer))
                .collect(),
        }
    }

    /// Add (or replace) the reducer called `name`.
    pub fn with<R>(mut self, name: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer + 'static,
    {
        self.reducers.insert(name.into(), Box::new(reducer));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Reducer> {
        self.reducers.get(name).map(|reducer| reducer.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Reducer + 'static)> {
        self.reducers.get_mut(name).map(|reducer| reducer.as_mut())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl fmt::Debug for RootReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.reducers.iter().map(|(name, reducer)| (name, reducer.state())))
            .finish()
    }
}
