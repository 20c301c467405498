//! Action dispatch: bound dispatchers embedded in props, reducer connection,
//! and evaluation of scheduled actions.

use core::fmt;
use core::time::Duration;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    BoxError, ComponentId, Engine, Error, Fields, Record, Result, RootReducer, Scheduler, Task,
    Value,
};

/// What an action function returns: fields to reduce, or `None` for "nothing happened".
pub type ActionResult = core::result::Result<Option<Fields>, BoxError>;

type ActionFn = dyn Fn(&[Value]) -> ActionResult;

pub(crate) type MapStateToProps = dyn Fn(&Record) -> Fields;

/// An action bound to a component and a reducer.
///
/// Connected components find one under `props[reducer][action]`. Invoking
/// [`dispatch`](Self::dispatch) never runs anything right away: evaluation is
/// scheduled after the engine's configured action delay, and its result
/// flows through the reducer back into the component's props.
///
/// `Dispatcher` is cheap to clone, so toolkit callbacks can hold their own copy.
#[derive(Clone)]
pub struct Dispatcher {
    component: ComponentId,
    reducer: Rc<str>,
    action: Rc<str>,
    run: Rc<ActionFn>,
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
}

impl Dispatcher {
    /// The component that receives the reduced result as props.
    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn reducer(&self) -> &str {
        &self.reducer
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Schedule the action with `args`. Scheduled dispatches cannot be cancelled.
    pub fn dispatch(&self, args: Vec<Value>) {
        let component = self.component;
        let reducer = self.reducer.clone();
        let action = self.action.clone();
        let run = self.run.clone();

        trace!("scheduling {}.{} for {}", reducer, action, component);
        self.scheduler.schedule_after(
            self.delay,
            Task::new(move |engine| {
                engine.process_action(component, &reducer, &action, &*run, &args)
            }),
        );
    }
}

impl PartialEq for Dispatcher {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component
            && self.reducer == other.reducer
            && self.action == other.action
            && Rc::ptr_eq(&self.run, &other.run)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<dispatch {}.{} -> {}>", self.reducer, self.action, self.component)
    }
}

struct ActionBinding {
    reducer: String,
    action: String,
    run: Rc<ActionFn>,
}

/// How a component connects to reducers when it is mounted.
///
/// # Example
///
/// ```rust
/// use hive_ui::{fields, Connect, Fields, Record, Value};
///
/// fn map_state_to_props(state: &Record) -> Fields {
///     let usb = state.get("usb").and_then(Value::as_record);
///     fields! { "usb_status" => usb.and_then(|usb| usb.get("status")).cloned() }
/// }
///
/// let connect = Connect::new(map_state_to_props)
///     .action("usb", "connect", |_args: &[Value]| Ok(Some(fields! { "status" => "connecting" })));
/// ```
pub struct Connect {
    actions: Vec<ActionBinding>,
    map_state_to_props: Rc<MapStateToProps>,
    root_reducer: Option<RootReducer>,
}

impl Connect {
    /// Start a connection that maps `{reducer: state}` records to props deltas.
    pub fn new<M>(map_state_to_props: M) -> Self
    where
        M: Fn(&Record) -> Fields + 'static,
    {
        Self {
            actions: Vec::new(),
            map_state_to_props: Rc::new(map_state_to_props),
            root_reducer: None,
        }
    }

    /// Install `root` as the engine's root reducer when connecting.
    pub fn root_reducer(mut self, root: RootReducer) -> Self {
        self.root_reducer = Some(root);
        self
    }

    /// Bind `run` as `props[reducer][action]`.
    pub fn action<F>(mut self, reducer: impl Into<String>, action: impl Into<String>, run: F) -> Self
    where
        F: Fn(&[Value]) -> ActionResult + 'static,
    {
        self.actions.push(ActionBinding {
            reducer: reducer.into(),
            action: action.into(),
            run: Rc::new(run),
        });
        self
    }
}

/// What [`Engine::connect`] did, so a failed mount can be undone.
pub(crate) struct Connected {
    /// Connected reducer names, in first-bound order, for seeding.
    pub(crate) reducers: Vec<String>,
    /// `Some(previous)` when the connection installed a root reducer.
    pub(crate) replaced_root: Option<Option<RootReducer>>,
}

impl Engine {
    /// Install the root reducer, add dispatcher props and remember the mapping.
    pub(crate) fn connect(&mut self, id: ComponentId, connect: Connect) -> Result<Connected> {
        let Connect {
            actions,
            map_state_to_props,
            root_reducer,
        } = connect;

        let replaced_root = root_reducer.map(|root| {
            if self.root_reducer.is_some() {
                debug!("{id} replacing root reducer");
            }
            self.root_reducer.replace(root)
        });

        let mut bound: IndexMap<String, Fields> = IndexMap::new();
        for ActionBinding {
            reducer,
            action,
            run,
        } in actions
        {
            let dispatcher = Dispatcher {
                component: id,
                reducer: Rc::from(reducer.as_str()),
                action: Rc::from(action.as_str()),
                run,
                scheduler: self.scheduler.clone(),
                delay: self.config.action_delay,
            };
            bound
                .entry(reducer)
                .or_default()
                .insert(action, Value::Dispatch(dispatcher));
        }

        let dispatch_props: Fields = bound
            .iter()
            .map(|(reducer, actions)| (reducer.clone(), Value::from(actions.clone())))
            .collect();

        let node = self.node_mut(id)?;
        node.props = node.props.merged(&dispatch_props);
        node.map_state_to_props = Some(map_state_to_props);

        Ok(Connected {
            reducers: bound.into_keys().collect(),
            replaced_root,
        })
    }

    /// Run the current state of every connected reducer through the mapping.
    pub(crate) fn seed_props(&mut self, id: ComponentId, reducers: &[String]) -> Result<()> {
        let root = self.root_reducer.as_ref().ok_or(Error::NoRootReducer)?;

        let mut data = Fields::new();
        for name in reducers {
            let reducer = root
                .get(name)
                .ok_or_else(|| Error::UnknownReducer(name.clone()))?;
            data.insert(name.clone(), Value::Record(reducer.state().clone()));
        }

        let delta = self.map_state_to_props(id, &Record::from(data))?;
        self.update_props(id, delta)
    }

    /// Evaluate a scheduled action and feed the reduced result back as props.
    pub(crate) fn process_action(
        &mut self,
        component: ComponentId,
        reducer: &str,
        action: &str,
        run: &ActionFn,
        args: &[Value],
    ) -> Result<()> {
        let result = run(args).map_err(|source| Error::Action {
            action: format!("{reducer}.{action}"),
            source,
        })?;
        let Some(result) = result else {
            trace!("{reducer}.{action} produced nothing");
            return Ok(());
        };

        let root = self.root_reducer.as_mut().ok_or(Error::NoRootReducer)?;
        let target = root
            .get_mut(reducer)
            .ok_or_else(|| Error::UnknownReducer(reducer.to_owned()))?;
        let Some(state) = target.reduce_action(&Record::from(result)) else {
            debug!("reducer `{reducer}` ignored {action}, dropping dispatch");
            return Ok(());
        };

        let data = Record::from_iter([(reducer, state)]);
        let delta = self.map_state_to_props(component, &data)?;
        self.update_props(component, delta)
    }

    fn map_state_to_props(&self, id: ComponentId, data: &Record) -> Result<Fields> {
        let map = self
            .node(id)?
            .map_state_to_props
            .as_ref()
            .ok_or(Error::NotConnected(id))?;
        Ok(map(data))
    }
}
