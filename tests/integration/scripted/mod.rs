use std::cell::RefCell;
use std::rc::Rc;

use hive_ui::{Component, ComponentId, Context, Fields, Layout, Record, Result, WidgetId};

/// What a [`Scripted`] component does in its hooks, editable between renders.
#[derive(Default)]
pub(crate) struct Plan {
    pub(crate) positions: Vec<(WidgetId, Layout)>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) commit: Commit,
}

#[derive(Clone, Debug, Default)]
pub(crate) enum Commit {
    /// Leave the delta to the engine.
    #[default]
    Auto,
    /// Call `ready_props` with these fields.
    With(Fields),
    /// Call `ready_props` twice with these fields.
    Twice(Fields),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Hook {
    WillMount(ComponentId),
    Rendered(ComponentId),
    PropsIncoming(ComponentId, Fields),
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait LifecycleProbe {
    fn will_mount(&self, id: ComponentId);
    fn rendered(&self, id: ComponentId);
    fn props_incoming(&self, id: ComponentId, incoming: Fields);
}

/// Records every hook call of every component sharing it, in call order.
#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<Hook>>>);

impl Journal {
    pub(crate) fn entries(&self) -> Vec<Hook> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, hook: &Hook) -> usize {
        self.0.borrow().iter().filter(|seen| *seen == hook).count()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl LifecycleProbe for Journal {
    fn will_mount(&self, id: ComponentId) {
        self.0.borrow_mut().push(Hook::WillMount(id));
    }

    fn rendered(&self, id: ComponentId) {
        self.0.borrow_mut().push(Hook::Rendered(id));
    }

    fn props_incoming(&self, id: ComponentId, incoming: Fields) {
        self.0.borrow_mut().push(Hook::PropsIncoming(id, incoming));
    }
}

pub(crate) struct Scripted {
    pub(crate) plan: Rc<RefCell<Plan>>,
    pub(crate) probe: Rc<dyn LifecycleProbe>,
}

impl Component for Scripted {
    fn will_mount(&mut self, cx: &mut Context<'_>) -> Result<()> {
        self.probe.will_mount(cx.id());
        Ok(())
    }

    fn render(&mut self, cx: &mut Context<'_>) -> Result<()> {
        self.probe.rendered(cx.id());

        let (positions, children) = {
            let plan = self.plan.borrow();
            (plan.positions.clone(), plan.children.clone())
        };
        for (widget, layout) in positions {
            cx.position(widget, layout, &Record::new())?;
        }
        for child in children {
            cx.render(child)?;
        }
        Ok(())
    }

    fn on_props_incoming(&mut self, cx: &mut Context<'_>, incoming: &Fields) -> Result<()> {
        self.probe.props_incoming(cx.id(), incoming.clone());

        let commit = self.plan.borrow().commit.clone();
        match commit {
            Commit::Auto => Ok(()),
            Commit::With(fields) => cx.ready_props(&fields),
            Commit::Twice(fields) => {
                cx.ready_props(&fields)?;
                cx.ready_props(&fields)
            }
        }
    }
}

/// A component with every hook left at its default.
pub(crate) struct Inert;

impl Component for Inert {}
