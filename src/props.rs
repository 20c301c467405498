//! Props and state propagation.

use log::trace;

use crate::{ComponentId, Engine, Error, Fields, Record, Result};

impl Engine {
    /// Apply a props delta to a component.
    ///
    /// Fields the component does not have yet are added straight away. Fields
    /// it already has go through
    /// [`on_props_incoming`](crate::Component::on_props_incoming) and are
    /// committed by the hook or right after it. The whole delta then cascades
    /// to the rendered children, whose props are matched by name. If any
    /// existing field changed, the component is rendered again (mounting it
    /// first if it never rendered).
    ///
    /// A component cannot update its own props from inside one of its hooks:
    /// that fails with [`Error::ComponentBusy`] before anything changes.
    pub fn update_props(&mut self, id: ComponentId, delta: Fields) -> Result<()> {
        self.ensure_idle(id)?;

        let node = self.node_mut(id)?;
        let (added, existing) = node.props.partition(&delta);
        if !added.is_empty() {
            node.props = node.props.merged(&added);
        }

        if !existing.is_empty() {
            self.deliver_props(id, &existing)?;
        }

        self.cascade(id, &delta)?;

        if !existing.is_empty() {
            let node = self.node_mut(id)?;
            if node.never_rendered {
                node.never_rendered = false;
                self.with_component(id, |component, cx| component.will_mount(cx))?;
            }
            self.render(id)?;
        }
        Ok(())
    }

    /// Set component state and re-render.
    ///
    /// The first call adopts `fields` as the state when none exists. After
    /// that only existing names may be set; an unknown name fails with
    /// [`Error::UnknownField`] and leaves the state as it was. The fields
    /// cascade to the rendered children before the component renders.
    ///
    /// Called from one of the component's own hooks, the state is committed
    /// and cascaded at once and the render follows when the hook returns. A
    /// component that is rendering or still being built fails before its
    /// state changes.
    pub fn set_state(&mut self, id: ComponentId, fields: Fields) -> Result<()> {
        self.render_gate(id)?;

        let node = self.node_mut(id)?;
        let state = match &node.state {
            Some(state) => state.replace(&fields)?,
            None => Record::from(fields.clone()),
        };
        node.state = Some(state);

        self.cascade(id, &fields)?;
        self.render(id)
    }

    /// Forward a delta to the rendered children that share field names,
    /// descending only below children that matched.
    pub(crate) fn cascade(&mut self, id: ComponentId, delta: &Fields) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }

        let rendered: Vec<ComponentId> = self.node(id)?.renders.iter().copied().collect();
        for child in rendered {
            let incoming = self.node(child)?.props.intersect(delta);
            if incoming.is_empty() {
                continue;
            }

            self.deliver_props(child, &incoming)?;

            if !self.node(child)?.children.is_empty() {
                self.cascade(child, &incoming)?;
            }
        }
        Ok(())
    }

    /// Two-phase commit of existing props: run the hook with the delta
    /// pending, then commit it unless the hook already did.
    pub(crate) fn deliver_props(&mut self, id: ComponentId, incoming: &Fields) -> Result<()> {
        self.node_mut(id)?.props_pending = true;
        trace!("{id} receiving {} props", incoming.len());

        let hooked = self.with_component(id, |component, cx| {
            component.on_props_incoming(cx, incoming)
        });

        let node = self.node_mut(id)?;
        if let Err(error) = hooked {
            node.props_pending = false;
            return Err(error);
        }
        if node.props_pending {
            node.props_pending = false;
            node.props = node.props.replace(incoming)?;
        }
        Ok(())
    }

    pub(crate) fn ready_props(&mut self, id: ComponentId, fields: &Fields) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.props_pending {
            return Err(Error::PropsNotPending(id));
        }
        node.props = node.props.replace(fields)?;
        node.props_pending = false;
        Ok(())
    }
}
