//! Insertion-ordered registry used for a component's children and widgets.

use core::fmt;
use core::iter::Rev;
use std::collections::vec_deque::{self, VecDeque};

/// Insertion-ordered collection with FIFO popping and equality-based removal.
///
/// The engine keeps four of these per component: the children and widgets it
/// owns, plus the `renders` and `widget_renders` of the current cycle.
///
/// Two orders coexist on purpose:
/// - [`pop`](Self::pop) and [`remove`](Self::remove) work from the oldest end.
/// - [`iter`](Self::iter) and [`iterate`](Self::iterate) walk from the newest
///   element back to the oldest.
///
/// # Example
///
/// ```rust
/// use hive_ui::Registry;
///
/// let mut registry = Registry::new();
/// registry.insert("a");
/// registry.insert("b");
///
/// assert_eq!(registry.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(registry.pop(), Some("a"));
/// assert!(!registry.remove(&"a"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Registry<T> {
    items: VecDeque<T>,
    auto_pop: bool,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            auto_pop: false,
        }
    }

    /// Create a registry whose [`iterate`](Self::iterate) removes what it yields.
    pub fn with_auto_pop() -> Self {
        Self {
            items: VecDeque::new(),
            auto_pop: true,
        }
    }

    /// Append a value at the newest end.
    pub fn insert(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Remove and return the oldest value still present.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The oldest value, without removing it.
    pub fn peek_oldest(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_auto_pop(&self) -> bool {
        self.auto_pop
    }

    pub fn toggle_auto_pop(&mut self) {
        self.auto_pop = !self.auto_pop;
    }

    /// Walk from the most recently inserted value to the oldest.
    pub fn iter(&self) -> Rev<vec_deque::Iter<'_, T>> {
        self.items.iter().rev()
    }

    /// Walk newest to oldest, yielding owned values.
    ///
    /// In auto-pop mode each yielded value is also removed, so a fully
    /// consumed walk leaves the registry empty.
    pub fn iterate(&mut self) -> Iterate<'_, T> {
        let walk = if self.auto_pop {
            Walk::Popping(&mut self.items)
        } else {
            Walk::Keeping(self.items.iter().rev())
        };
        Iterate { walk }
    }
}

impl<T: PartialEq> Registry<T> {
    /// Remove the oldest value equal to `value`.
    ///
    /// Returns `false` when nothing matched.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }
}

impl<T> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            auto_pop: false,
        }
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = Rev<vec_deque::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Registry::iterate`].
pub struct Iterate<'a, T> {
    walk: Walk<'a, T>,
}

enum Walk<'a, T> {
    Keeping(Rev<vec_deque::Iter<'a, T>>),
    Popping(&'a mut VecDeque<T>),
}

impl<T: Clone> Iterator for Iterate<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.walk {
            Walk::Keeping(iter) => iter.next().cloned(),
            Walk::Popping(items) => items.pop_back(),
        }
    }
}
