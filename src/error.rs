//! Errors raised by the component engine.

use crate::{ComponentId, WidgetId};

/// Boxed error returned by action functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Every failure the engine can report.
///
/// None of these are recovered from internally: they are returned to whoever
/// started the operation (a host event handler, a [`TaskQueue`](crate::TaskQueue)
/// driver, or a test).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record was asked to replace a field it was not constructed with.
    #[error("record has no field named `{0}`")]
    UnknownField(String),

    /// `render` was called on a component whose render is still running.
    #[error("component {0} is already rendering")]
    ReentrantRender(ComponentId),

    /// A hook was requested on a component that is already inside one of its hooks.
    #[error("component {0} is busy running one of its own hooks")]
    ComponentBusy(ComponentId),

    /// The component's build closure has not returned yet.
    #[error("component {0} is still being built")]
    StillBuilding(ComponentId),

    #[error("no component with id {0}")]
    UnknownComponent(ComponentId),

    #[error("no widget with id {0}")]
    UnknownWidget(WidgetId),

    /// Initial state may only be set once, from the component's constructor.
    #[error("state of component {0} is already initialized")]
    StateAlreadyInitialized(ComponentId),

    /// `ready_props` was called outside `on_props_incoming`, or twice.
    #[error("component {0} has no props pending")]
    PropsNotPending(ComponentId),

    #[error("no root reducer has been set")]
    NoRootReducer,

    #[error("root reducer has no reducer named `{0}`")]
    UnknownReducer(String),

    #[error("component {0} is not connected to any reducer")]
    NotConnected(ComponentId),

    /// An action function failed while its dispatch was being evaluated.
    #[error("action `{action}` failed")]
    Action {
        action: String,
        #[source]
        source: BoxError,
    },
}
