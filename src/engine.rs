//! The engine that owns the component tree and reconciles renders.

use core::mem;
use core::time::Duration;
use std::rc::Rc;

use log::{debug, trace};

use crate::component::Node;
use crate::{
    Component, ComponentId, Config, Connect, Context, Error, Layout, Mount, Record, Reducer, Registry,
    Result, RootReducer, Scheduler, Task, Widget, WidgetId,
};

pub(crate) enum RenderGate {
    Now,
    Deferred,
}

struct WidgetSlot {
    widget: Box<dyn Widget>,
    owner: ComponentId,
    pinned: bool,
}

/// Owner of the component tree, the widgets and the root reducer.
///
/// Components and widgets live in arenas keyed by [`ComponentId`] and
/// [`WidgetId`]; parent and child links are ids. All operations run to
/// completion on the calling thread. The only deferred work goes through the
/// [`Scheduler`] handed to [`Engine::new`].
///
/// Rendering does not diff output. After a component's render body runs, the
/// engine compares the widgets and children the component owns against the
/// ones touched during the body, and hides the rest:
/// - untouched widgets get every [`Layout`] cleared,
/// - untouched children that are still visible are [`forget`](Self::forget)-ed.
///
/// Hiding is shallow: a forgotten child hides its own widgets only, and its
/// subtree is looked at again when it renders again.
///
/// # Example
///
/// ```rust
/// use hive_ui::{fields, Component, Context, Engine, Mount, Record, Result, TaskQueue, WidgetId};
/// # use hive_ui::{Layout, Widget};
/// # struct Label;
/// # impl Widget for Label {
/// #     fn position(&mut self, _: Layout, _: &Record) {}
/// #     fn unposition(&mut self, _: Layout) {}
/// # }
///
/// struct Status {
///     label: WidgetId,
/// }
///
/// impl Component for Status {
///     fn render(&mut self, cx: &mut Context<'_>) -> Result<()> {
///         if cx.props().get("visible").and_then(|v| v.as_bool()) == Some(true) {
///             cx.pack(self.label, &Record::new())?;
///         }
///         Ok(())
///     }
/// }
///
/// let queue = TaskQueue::new();
/// let mut engine = Engine::new(queue.scheduler());
///
/// let status = engine
///     .mount(Mount::root().props(fields! { "visible" => true }), |cx| {
///         Ok(Status { label: cx.add_widget(Label)? })
///     })
///     .unwrap();
///
/// engine.render(status).unwrap();
/// engine.update_props(status, fields! { "visible" => false }).unwrap();
/// assert!(engine.widget_renders(status).unwrap().is_empty());
/// ```
pub struct Engine {
    pub(crate) nodes: Vec<Node>,
    widgets: Vec<WidgetSlot>,
    pub(crate) root_reducer: Option<RootReducer>,
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) config: Config,
}

impl Engine {
    /// Create an engine with the default [`Config`].
    pub fn new<S>(scheduler: S) -> Self
    where
        S: Scheduler + 'static,
    {
        Self::with_config(scheduler, Config::default())
    }

    pub fn with_config<S>(scheduler: S, config: Config) -> Self
    where
        S: Scheduler + 'static,
    {
        Engine {
            nodes: Vec::new(),
            widgets: Vec::new(),
            root_reducer: None,
            scheduler: Rc::new(scheduler),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a component.
    ///
    /// In order: the id is assigned, the component is registered as a child
    /// of its parent, its props are set (extended with dispatcher props when
    /// connecting), `build` constructs it (creating widgets, children and
    /// initial state through the context), and finally a connected
    /// component's props are seeded from the current reducer states.
    ///
    /// The component is not rendered. If any step fails, the component, its
    /// widgets and whatever it mounted are dropped again, it is unregistered
    /// from its parent and a root reducer it installed is swapped back out.
    pub fn mount<C, F>(&mut self, mount: Mount, build: F) -> Result<ComponentId>
    where
        C: Component + 'static,
        F: FnOnce(&mut Context<'_>) -> Result<C>,
    {
        let Mount {
            parent,
            props,
            connect,
        } = mount;

        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let id = ComponentId(self.nodes.len());
        let widgets = self.widgets.len();
        self.nodes.push(Node::new(parent, Record::from(props)));
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.insert(id);
        }

        let mut replaced_root = None;
        match self.build_node(id, connect, build, &mut replaced_root) {
            Ok(()) => {
                debug!("mounted {id} (parent {parent:?})");
                Ok(id)
            }
            Err(error) => {
                self.unwind_mount(id, parent, widgets, replaced_root);
                Err(error)
            }
        }
    }

    fn build_node<C, F>(
        &mut self,
        id: ComponentId,
        connect: Option<Connect>,
        build: F,
        replaced_root: &mut Option<Option<RootReducer>>,
    ) -> Result<()>
    where
        C: Component + 'static,
        F: FnOnce(&mut Context<'_>) -> Result<C>,
    {
        let reducers = match connect {
            Some(connect) => {
                let connected = self.connect(id, connect)?;
                *replaced_root = connected.replaced_root;
                Some(connected.reducers)
            }
            None => None,
        };

        let component = build(&mut Context::new(self, id))?;
        self.node_mut(id)?.behavior = Some(Box::new(component));

        if let Some(reducers) = reducers {
            self.seed_props(id, &reducers)?;
        }
        Ok(())
    }

    /// Drop a component whose mount failed. Everything created after it
    /// belongs to its build, so the arenas are cut back to where it started.
    fn unwind_mount(
        &mut self,
        id: ComponentId,
        parent: Option<ComponentId>,
        widgets: usize,
        replaced_root: Option<Option<RootReducer>>,
    ) {
        self.nodes.truncate(id.0);
        self.widgets.truncate(widgets);
        if let Some(node) = parent.and_then(|parent| self.nodes.get_mut(parent.0)) {
            node.children.remove(&id);
            node.renders.remove(&id);
        }
        if let Some(previous) = replaced_root {
            self.root_reducer = previous;
        }
        debug!("mount of {id} failed, rolled back");
    }

    /// Render a component and hide whatever it did not render this cycle.
    ///
    /// Fails with [`Error::ReentrantRender`] if the component is already
    /// rendering.
    ///
    /// Rendering a component from inside one of its own hooks is deferred:
    /// the render runs as soon as the hook returns. A hook running as part of
    /// the component's own render cycle gets [`Error::ReentrantRender`]
    /// instead, and a component whose build closure has not returned yet
    /// gets [`Error::StillBuilding`].
    pub fn render(&mut self, id: ComponentId) -> Result<()> {
        if let RenderGate::Deferred = self.render_gate(id)? {
            trace!("{id} is inside a hook, rendering once it returns");
            self.node_mut(id)?.render_requested = true;
            return Ok(());
        }
        self.node_mut(id)?.rendering = true;

        let result = self.render_cycle(id);
        self.nodes[id.0].rendering = false;
        result
    }

    fn render_cycle(&mut self, id: ComponentId) -> Result<()> {
        let node = self.node_mut(id)?;
        let mounting = node.never_rendered || node.hidden;
        node.never_rendered = false;
        if mounting {
            trace!("{id} will mount");
            self.with_component(id, |component, cx| component.will_mount(cx))?;
        }

        let node = self.node_mut(id)?;
        node.hidden = false;
        node.renders.clear();
        node.widget_renders.clear();
        let parent = node.parent;

        if let Some(parent) = parent {
            self.node_mut(parent)?.renders.insert(id);
        }

        trace!("rendering {id}");
        self.with_component(id, |component, cx| component.render(cx))?;
        self.reconcile(id)
    }

    fn reconcile(&mut self, id: ComponentId) -> Result<()> {
        let node = self.node(id)?;
        let mut hidden_widgets = node.widgets.clone();
        let mut hidden_children = node.children.clone();

        for widget in &node.widget_renders {
            hidden_widgets.remove(widget);
        }
        for child in &node.renders {
            hidden_children.remove(child);
        }

        trace!(
            "{id} reconciled: hiding {} widgets, {} children",
            hidden_widgets.len(),
            hidden_children.len()
        );

        for widget in hidden_widgets.iterate() {
            self.clear_widget(widget)?;
        }
        for child in hidden_children.iterate() {
            if !self.node(child)?.hidden {
                self.forget(child)?;
            }
        }
        Ok(())
    }

    /// Hide a component's own widgets and mark it hidden.
    ///
    /// Nested components are left alone.
    pub fn forget(&mut self, id: ComponentId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.hidden = true;
        let widgets: Vec<WidgetId> = node.widgets.iter().copied().collect();

        debug!("forgetting {id}");
        for widget in widgets {
            self.clear_widget(widget)?;
        }
        Ok(())
    }

    fn clear_widget(&mut self, id: WidgetId) -> Result<()> {
        let slot = self.widgets.get_mut(id.0).ok_or(Error::UnknownWidget(id))?;
        if slot.pinned {
            return Ok(());
        }
        for layout in Layout::ALL {
            slot.widget.unposition(layout);
        }
        Ok(())
    }

    pub(crate) fn adopt_widget(
        &mut self,
        owner: ComponentId,
        widget: Box<dyn Widget>,
        pinned: bool,
    ) -> Result<WidgetId> {
        let id = WidgetId(self.widgets.len());
        self.node_mut(owner)?.widgets.insert(id);
        self.widgets.push(WidgetSlot {
            widget,
            owner,
            pinned,
        });
        Ok(id)
    }

    /// Position a widget, marking it rendered for its owner's current cycle.
    pub fn position_widget(
        &mut self,
        id: WidgetId,
        layout: Layout,
        options: &Record,
    ) -> Result<()> {
        let slot = self.widgets.get_mut(id.0).ok_or(Error::UnknownWidget(id))?;
        let owner = slot.owner;
        slot.widget.position(layout, options);
        self.node_mut(owner)?.widget_renders.insert(id);
        Ok(())
    }

    pub fn configure_widget(&mut self, id: WidgetId, options: &Record) -> Result<()> {
        let slot = self.widgets.get_mut(id.0).ok_or(Error::UnknownWidget(id))?;
        slot.widget.configure(options);
        Ok(())
    }

    pub fn widget(&self, id: WidgetId) -> Result<&dyn Widget> {
        self.widgets
            .get(id.0)
            .map(|slot| slot.widget.as_ref())
            .ok_or(Error::UnknownWidget(id))
    }

    pub fn widget_owner(&self, id: WidgetId) -> Result<ComponentId> {
        self.widgets
            .get(id.0)
            .map(|slot| slot.owner)
            .ok_or(Error::UnknownWidget(id))
    }

    /// Replace the root reducer. Scheduled dispatches resolve reducers by
    /// name when they run, so they see the new one.
    pub fn set_root_reducer(&mut self, root: RootReducer) {
        if self.root_reducer.is_some() {
            debug!("replacing root reducer");
        }
        self.root_reducer = Some(root);
    }

    pub fn root_reducer(&self) -> Option<&RootReducer> {
        self.root_reducer.as_ref()
    }

    pub fn reducer(&self, name: &str) -> Result<&dyn Reducer> {
        self.root_reducer
            .as_ref()
            .ok_or(Error::NoRootReducer)?
            .get(name)
            .ok_or_else(|| Error::UnknownReducer(name.to_owned()))
    }

    pub fn schedule_after(&self, delay: Duration, task: Task) {
        self.scheduler.schedule_after(delay, task);
    }

    pub fn schedule_immediate(&self, task: Task) {
        self.schedule_after(Duration::ZERO, task);
    }

    /// Number of components created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn props(&self, id: ComponentId) -> Result<&Record> {
        Ok(&self.node(id)?.props)
    }

    pub fn state(&self, id: ComponentId) -> Result<Option<&Record>> {
        Ok(self.node(id)?.state.as_ref())
    }

    pub fn parent(&self, id: ComponentId) -> Result<Option<ComponentId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ComponentId) -> Result<&Registry<ComponentId>> {
        Ok(&self.node(id)?.children)
    }

    pub fn widgets(&self, id: ComponentId) -> Result<&Registry<WidgetId>> {
        Ok(&self.node(id)?.widgets)
    }

    /// Children rendered during the component's last cycle.
    pub fn renders(&self, id: ComponentId) -> Result<&Registry<ComponentId>> {
        Ok(&self.node(id)?.renders)
    }

    /// Widgets positioned during the component's last cycle.
    pub fn widget_renders(&self, id: ComponentId) -> Result<&Registry<WidgetId>> {
        Ok(&self.node(id)?.widget_renders)
    }

    pub fn is_hidden(&self, id: ComponentId) -> Result<bool> {
        Ok(self.node(id)?.hidden)
    }

    pub fn has_rendered(&self, id: ComponentId) -> Result<bool> {
        Ok(!self.node(id)?.never_rendered)
    }

    pub fn props_pending(&self, id: ComponentId) -> Result<bool> {
        Ok(self.node(id)?.props_pending)
    }

    /// Whether a render of `id` may start now. Checked before anything about
    /// the component changes.
    pub(crate) fn render_gate(&self, id: ComponentId) -> Result<RenderGate> {
        let node = self.node(id)?;
        if node.rendering {
            Err(Error::ReentrantRender(id))
        } else if node.in_hook {
            Ok(RenderGate::Deferred)
        } else if node.behavior.is_none() {
            Err(Error::StillBuilding(id))
        } else {
            Ok(RenderGate::Now)
        }
    }

    /// Fail unless the component is built and none of its hooks is running.
    pub(crate) fn ensure_idle(&self, id: ComponentId) -> Result<()> {
        let node = self.node(id)?;
        if node.in_hook {
            Err(Error::ComponentBusy(id))
        } else if node.behavior.is_none() {
            Err(Error::StillBuilding(id))
        } else {
            Ok(())
        }
    }

    /// Run `f` with the component taken out of its node, then run a render
    /// the hook asked for.
    pub(crate) fn with_component<R, F>(&mut self, id: ComponentId, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn Component, &mut Context<'_>) -> Result<R>,
    {
        let node = self.node_mut(id)?;
        let mut component = node.behavior.take().ok_or(Error::ComponentBusy(id))?;
        node.in_hook = true;

        let result = f(component.as_mut(), &mut Context::new(self, id));

        let node = self.node_mut(id)?;
        node.behavior = Some(component);
        node.in_hook = false;
        let deferred = mem::take(&mut node.render_requested) && !node.rendering;

        let value = result?;
        if deferred {
            self.render(id)?;
        }
        Ok(value)
    }

    pub(crate) fn node(&self, id: ComponentId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownComponent(id))
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownComponent(id))
    }
}
