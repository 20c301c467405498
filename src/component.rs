//! Components: the lifecycle hooks a component implements, the node the
//! engine keeps for it, and the context its hooks run with.

use core::fmt;
use core::time::Duration;
use std::rc::Rc;

use crate::dispatch::MapStateToProps;
use crate::{
    Connect, Engine, Error, Fields, Layout, Record, Registry, Result, Task, Widget, WidgetId,
};

/// Identity of a component. Ids are assigned in creation order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Lifecycle hooks of a component.
///
/// Every hook defaults to doing nothing. The engine calls them directly:
/// - [`will_mount`](Self::will_mount) before the first render, and before a
///   render that brings a hidden component back.
/// - [`render`](Self::render) as the body of [`Engine::render`]. Position the
///   widgets you want shown and render the children you want shown; the rest
///   is hidden once the body returns.
/// - [`on_props_incoming`](Self::on_props_incoming) when a props delta that
///   touches existing props arrives. The delta is committed right after the
///   hook returns unless the hook commits it itself with
///   [`Context::ready_props`].
///
/// # Example
///
/// ```rust
/// use hive_ui::{Component, Context, Record, Result, WidgetId};
///
/// struct StartButton {
///     button: WidgetId,
/// }
///
/// impl Component for StartButton {
///     fn render(&mut self, cx: &mut Context<'_>) -> Result<()> {
///         let ready = cx.props().get("ready").and_then(|ready| ready.as_bool());
///         if ready == Some(true) {
///             cx.place(self.button, &Record::new())?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Component {
    fn will_mount(&mut self, _cx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, _cx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    fn on_props_incoming(&mut self, _cx: &mut Context<'_>, _incoming: &Fields) -> Result<()> {
        Ok(())
    }
}

/// What the engine knows about one component.
pub(crate) struct Node {
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Registry<ComponentId>,
    pub(crate) widgets: Registry<WidgetId>,
    pub(crate) renders: Registry<ComponentId>,
    pub(crate) widget_renders: Registry<WidgetId>,
    pub(crate) state: Option<Record>,
    pub(crate) props: Record,
    pub(crate) hidden: bool,
    pub(crate) never_rendered: bool,
    pub(crate) props_pending: bool,
    pub(crate) rendering: bool,
    /// Set while one of the component's hooks runs.
    pub(crate) in_hook: bool,
    /// A render asked for while `in_hook`, run once the hook returns.
    pub(crate) render_requested: bool,
    pub(crate) map_state_to_props: Option<Rc<MapStateToProps>>,
    /// Out of the node while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn Component>>,
}

impl Node {
    pub(crate) fn new(parent: Option<ComponentId>, props: Record) -> Self {
        Self {
            parent,
            children: Registry::new(),
            widgets: Registry::new(),
            renders: Registry::new(),
            widget_renders: Registry::new(),
            state: None,
            props,
            hidden: false,
            never_rendered: true,
            props_pending: false,
            rendering: false,
            in_hook: false,
            render_requested: false,
            map_state_to_props: None,
            behavior: None,
        }
    }
}

/// Where and how to mount a component.
///
/// ```rust
/// use hive_ui::{fields, Mount};
///
/// let mount = Mount::root().props(fields! { "width" => 1000, "height" => 618 });
/// ```
pub struct Mount {
    pub(crate) parent: Option<ComponentId>,
    pub(crate) props: Fields,
    pub(crate) connect: Option<Connect>,
}

impl Mount {
    /// A component without parent.
    pub fn root() -> Self {
        Self {
            parent: None,
            props: Fields::new(),
            connect: None,
        }
    }

    pub fn child_of(parent: ComponentId) -> Self {
        Self {
            parent: Some(parent),
            props: Fields::new(),
            connect: None,
        }
    }

    /// Props supplied by the parent.
    pub fn props(mut self, props: Fields) -> Self {
        self.props = props;
        self
    }

    /// Connect the component to reducers.
    pub fn connect(mut self, connect: Connect) -> Self {
        self.connect = Some(connect);
        self
    }
}

/// Handle a component's constructor and hooks work through.
///
/// A context is bound to one component. Widget and child operations are
/// recorded against that component so the reconciler can tell what was
/// rendered in the current cycle.
pub struct Context<'a> {
    engine: &'a mut Engine,
    id: ComponentId,
}

impl<'a> Context<'a> {
    pub(crate) fn new(engine: &'a mut Engine, id: ComponentId) -> Self {
        Self { engine, id }
    }

    /// The component this context is bound to.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.node().parent
    }

    pub fn props(&self) -> &Record {
        &self.node().props
    }

    pub fn state(&self) -> Option<&Record> {
        self.node().state.as_ref()
    }

    /// Whether a props delta is waiting for [`ready_props`](Self::ready_props).
    pub fn props_pending(&self) -> bool {
        self.node().props_pending
    }

    /// Set the component's initial state. Allowed once.
    pub fn init_state(&mut self, fields: Fields) -> Result<()> {
        let id = self.id;
        let node = self.engine.node_mut(id)?;
        if node.state.is_some() {
            return Err(Error::StateAlreadyInitialized(id));
        }
        node.state = Some(Record::from(fields));
        Ok(())
    }

    /// Commit `fields` into props from inside `on_props_incoming`.
    ///
    /// Once called, the delta the hook received is no longer committed
    /// automatically.
    pub fn ready_props(&mut self, fields: &Fields) -> Result<()> {
        self.engine.ready_props(self.id, fields)
    }

    /// Mount a child of this component.
    pub fn mount_child<C, F>(&mut self, props: Fields, build: F) -> Result<ComponentId>
    where
        C: Component + 'static,
        F: FnOnce(&mut Context<'_>) -> Result<C>,
    {
        self.engine
            .mount(Mount::child_of(self.id).props(props), build)
    }

    /// Mount a child of this component connected to reducers.
    pub fn mount_connected_child<C, F>(
        &mut self,
        props: Fields,
        connect: Connect,
        build: F,
    ) -> Result<ComponentId>
    where
        C: Component + 'static,
        F: FnOnce(&mut Context<'_>) -> Result<C>,
    {
        self.engine.mount(
            Mount::child_of(self.id).props(props).connect(connect),
            build,
        )
    }

    /// Hand a toolkit widget to the engine, owned by this component.
    pub fn add_widget<W: Widget + 'static>(&mut self, widget: W) -> Result<WidgetId> {
        self.engine.adopt_widget(self.id, Box::new(widget), false)
    }

    /// Like [`add_widget`](Self::add_widget), for a frame the engine must
    /// never un-position.
    pub fn add_pinned_widget<W: Widget + 'static>(&mut self, widget: W) -> Result<WidgetId> {
        self.engine.adopt_widget(self.id, Box::new(widget), true)
    }

    /// Render a component, normally one of this component's children.
    ///
    /// Rendering this component itself from `on_props_incoming` is deferred
    /// until the hook returns.
    pub fn render(&mut self, child: ComponentId) -> Result<()> {
        self.engine.render(child)
    }

    /// Push a props delta into another component.
    pub fn update_props(&mut self, target: ComponentId, delta: Fields) -> Result<()> {
        self.engine.update_props(target, delta)
    }

    /// Set the state of a component.
    ///
    /// Setting this component's own state from `on_props_incoming` commits
    /// and cascades at once; its render runs when the hook returns.
    pub fn set_state(&mut self, target: ComponentId, fields: Fields) -> Result<()> {
        self.engine.set_state(target, fields)
    }

    /// Position `widget` through `layout`, marking it rendered this cycle.
    pub fn position(&mut self, widget: WidgetId, layout: Layout, options: &Record) -> Result<()> {
        self.engine.position_widget(widget, layout, options)
    }

    pub fn pack(&mut self, widget: WidgetId, options: &Record) -> Result<()> {
        self.position(widget, Layout::Pack, options)
    }

    pub fn place(&mut self, widget: WidgetId, options: &Record) -> Result<()> {
        self.position(widget, Layout::Place, options)
    }

    pub fn grid(&mut self, widget: WidgetId, options: &Record) -> Result<()> {
        self.position(widget, Layout::Grid, options)
    }

    /// Forward toolkit configuration to `widget`. Does not mark it rendered.
    pub fn configure(&mut self, widget: WidgetId, options: &Record) -> Result<()> {
        self.engine.configure_widget(widget, options)
    }

    pub fn schedule_after(&mut self, delay: Duration, task: Task) {
        self.engine.schedule_after(delay, task);
    }

    pub fn schedule_immediate(&mut self, task: Task) {
        self.engine.schedule_immediate(task);
    }

    fn node(&self) -> &Node {
        // Contexts only exist for nodes in the arena: a failed mount is
        // unwound after its build context is dropped.
        &self.engine.nodes[self.id.0]
    }
}
