//! Widget abstraction over the native toolkit.

#[cfg(any(test, feature = "testing"))]
use portable_atomic_util::Arc;
#[cfg(any(test, feature = "testing"))]
use spin::Mutex;

use core::fmt;

use crate::Record;

/// Identity of a widget adopted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) usize);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// The three independent ways a toolkit can place a widget.
///
/// A widget positioned through any one of them counts as rendered for the
/// cycle. A hidden widget has all three cleared, whichever one was used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Pack,
    Place,
    Grid,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Pack, Layout::Place, Layout::Grid];
}

/// The capability surface the engine needs from a toolkit widget.
///
/// Implement this for your toolkit's widget handles (buttons, labels,
/// frames, ...). Only the engine calls these methods: components go through
/// [`Context::position`](crate::Context::position) so the call can be
/// recorded for reconciliation.
///
/// # Example
///
/// ```rust
/// use hive_ui::{Layout, Record, Widget};
///
/// struct ConsoleLabel { text: String }
///
/// impl Widget for ConsoleLabel {
///     fn position(&mut self, layout: Layout, _options: &Record) {
///         println!("show {:?} via {layout:?}", self.text);
///     }
///
///     fn unposition(&mut self, layout: Layout) {
///         println!("hide {:?} via {layout:?}", self.text);
///     }
/// }
/// ```
pub trait Widget {
    /// Place the widget through `layout` with toolkit-specific `options`.
    fn position(&mut self, layout: Layout, options: &Record);

    /// Undo any placement made through `layout`. Must be harmless when the
    /// widget was never placed that way.
    fn unposition(&mut self, layout: Layout);

    /// Apply toolkit configuration such as text or enabled state.
    fn configure(&mut self, _options: &Record) {}
}

#[cfg(any(test, feature = "testing"))]
/// A call observed by a [`RecordingWidget`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    Positioned(Layout),
    Unpositioned(Layout),
    /// The configure options, rendered with `Display`.
    Configured(String),
}

#[cfg(any(test, feature = "testing"))]
/// Shared log of every call made on a [`RecordingWidget`].
///
/// Only available with the `testing` feature.
///
/// # Example
///
/// ```rust
/// use hive_ui::{Layout, Record, RecordingWidget, Widget, WidgetEvent};
///
/// let widget = RecordingWidget::new();
/// let log = widget.log();
///
/// let mut boxed: Box<dyn Widget> = Box::new(widget);
/// boxed.position(Layout::Grid, &Record::new());
///
/// assert_eq!(log.events(), vec![WidgetEvent::Positioned(Layout::Grid)]);
/// ```
pub struct WidgetLog {
    events: Arc<Mutex<Vec<WidgetEvent>>>,
}

#[cfg(any(test, feature = "testing"))]
impl Clone for WidgetLog {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl WidgetLog {
    /// Snapshot of every recorded call, oldest first.
    pub fn events(&self) -> Vec<WidgetEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// How many times `event` was recorded.
    pub fn count_of(&self, event: &WidgetEvent) -> usize {
        self.events.lock().iter().filter(|seen| *seen == event).count()
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Access the recorded calls with a closure.
    pub fn with_events<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<WidgetEvent>) -> R,
    {
        let events = self.events.lock();
        f(&events)
    }

    fn push(&self, event: WidgetEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(any(test, feature = "testing"))]
/// Widget that records the calls it receives into a [`WidgetLog`].
///
/// Only available with the `testing` feature.
pub struct RecordingWidget {
    log: WidgetLog,
}

#[cfg(any(test, feature = "testing"))]
impl Default for RecordingWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl RecordingWidget {
    pub fn new() -> Self {
        Self {
            log: WidgetLog {
                events: Arc::new(Mutex::new(Vec::new())),
            },
        }
    }

    /// A handle on this widget's log that stays valid after the widget is
    /// handed to the engine.
    pub fn log(&self) -> WidgetLog {
        self.log.clone()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Widget for RecordingWidget {
    fn position(&mut self, layout: Layout, _options: &Record) {
        self.log.push(WidgetEvent::Positioned(layout));
    }

    fn unposition(&mut self, layout: Layout) {
        self.log.push(WidgetEvent::Unpositioned(layout));
    }

    fn configure(&mut self, options: &Record) {
        self.log.push(WidgetEvent::Configured(options.to_string()));
    }
}
