//! A retained component tree for native widget toolkits, with render
//! reconciliation and reducer-driven props.
//!
//! Components own toolkit widgets and child components. Rendering a component
//! runs its render body; whatever the body did not position or render is
//! hidden afterwards, so there is no virtual tree to diff. Props flow down the
//! rendered tree by field name, state changes re-render the component that
//! owns them, and bound actions feed reducers whose state maps back to props.
//!
//! Everything runs on one thread. The only deferred work (action evaluation,
//! timers) goes through a [`Scheduler`], for example the bundled [`TaskQueue`]
//! driven by the host's event loop.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use hive_ui::{
//!     fields, Component, Connect, Context, Engine, Fields, FnReducer, Mount, Record, Result,
//!     RootReducer, TaskQueue, Value,
//! };
//!
//! struct Counter;
//!
//! impl Component for Counter {
//!     fn render(&mut self, cx: &mut Context<'_>) -> Result<()> {
//!         let _count = cx.props().get("count").and_then(Value::as_int);
//!         Ok(())
//!     }
//! }
//!
//! fn map_state_to_props(state: &Record) -> Fields {
//!     let count = state
//!         .get("counter")
//!         .and_then(Value::as_record)
//!         .and_then(|counter| counter.get("count"))
//!         .cloned();
//!     fields! { "count" => count }
//! }
//!
//! let counter = FnReducer::new(Record::from(fields! { "count" => 0 }), |state, action| {
//!     let by = action.get("by")?.as_int()?;
//!     let count = state.get("count")?.as_int()?;
//!     state.replace(&fields! { "count" => count + by }).ok()
//! });
//!
//! let mut queue = TaskQueue::new();
//! let mut engine = Engine::new(queue.scheduler());
//!
//! let connect = Connect::new(map_state_to_props)
//!     .root_reducer(RootReducer::new().with("counter", counter))
//!     .action("counter", "add", |args: &[Value]| {
//!         Ok(Some(fields! { "by" => args[0].clone() }))
//!     });
//!
//! let app = engine.mount(Mount::root().connect(connect), |_cx| Ok(Counter)).unwrap();
//! engine.render(app).unwrap();
//! assert_eq!(engine.props(app).unwrap().get("count"), Some(&Value::Int(0)));
//!
//! // Props carry the bound action under `props[reducer][action]`.
//! let add = engine.props(app).unwrap()
//!     .get("counter").and_then(Value::as_record)
//!     .and_then(|counter| counter.get("add")).and_then(Value::as_dispatcher)
//!     .cloned()
//!     .unwrap();
//! add.dispatch(vec![Value::Int(2)]);
//!
//! // Nothing happens until the scheduled evaluation runs.
//! assert_eq!(engine.props(app).unwrap().get("count"), Some(&Value::Int(0)));
//! queue.advance(&mut engine, Duration::from_millis(100)).unwrap();
//! assert_eq!(engine.props(app).unwrap().get("count"), Some(&Value::Int(2)));
//! ```

// Module declarations
mod component;
mod config;
mod dispatch;
mod engine;
mod error;
mod props;
mod record;
mod reducer;
mod registry;
mod scheduler;
mod widget;

// Public re-exports
pub use component::{Component, ComponentId, Context, Mount};
pub use config::Config;
pub use dispatch::{ActionResult, Connect, Dispatcher};
pub use engine::Engine;
pub use error::{BoxError, Error, Result};
pub use record::{Fields, Record, Value};
pub use reducer::{FnReducer, Reducer, RootReducer};
pub use registry::{Iterate, Registry};
pub use scheduler::{QueueScheduler, Scheduler, Task, TaskQueue};
pub use widget::{Layout, Widget, WidgetId};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use widget::{RecordingWidget, WidgetEvent, WidgetLog};
