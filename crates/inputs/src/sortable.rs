//! Drag-and-drop reordering of a list

use anyhow::{anyhow, Result};
use derive_more::Display;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Items with a stable identity inside a sortable list
pub trait HasId {
    type Id: PartialEq + Clone + Debug;

    fn id(&self) -> &Self::Id;
}

/// Layout of the list being sorted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortableOrientation {
    #[default]
    #[display(fmt = "vertical")]
    Vertical,
    #[display(fmt = "horizontal")]
    Horizontal,
    /// Grid of wrapped items
    #[display(fmt = "mixed")]
    Mixed,
}

/// How neighbours make room while an item is dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortingStrategy {
    #[display(fmt = "vertical list")]
    VerticalList,
    #[display(fmt = "horizontal list")]
    HorizontalList,
    #[display(fmt = "rect")]
    Rect,
}

impl From<SortableOrientation> for SortingStrategy {
    fn from(orientation: SortableOrientation) -> Self {
        match orientation {
            SortableOrientation::Vertical => SortingStrategy::VerticalList,
            SortableOrientation::Horizontal => SortingStrategy::HorizontalList,
            SortableOrientation::Mixed => SortingStrategy::Rect,
        }
    }
}

/// Configuration options for a sortable list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableOptions {
    pub orientation: SortableOrientation,
    /// Pointer travel, in pixels, before a press turns into a drag
    pub activation_distance: f32,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            orientation: SortableOrientation::default(),
            activation_distance: 8.0,
        }
    }
}

impl SortableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: SortableOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn activation_distance(mut self, distance: f32) -> Self {
        self.activation_distance = distance;
        self
    }
}

/// Move the element at `from` so it ends up at `to`, shifting the rest
///
/// Out of range positions leave the list untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

type ReorderCallback<T> = Box<dyn FnMut(&[T])>;

/// State of a sortable list
pub struct Sortable<T: HasId> {
    items: Vec<T>,
    options: SortableOptions,
    active: Option<T::Id>,
    disabled: Vec<T::Id>,
    on_reorder: Option<ReorderCallback<T>>,
}

impl<T: HasId> Sortable<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            options: SortableOptions::default(),
            active: None,
            disabled: Vec::new(),
            on_reorder: None,
        }
    }

    pub fn with_options(mut self, options: SortableOptions) -> Self {
        self.options = options;
        self
    }

    /// Register the callback receiving the list after each reorder
    pub fn on_reorder(mut self, callback: impl FnMut(&[T]) + 'static) -> Self {
        self.on_reorder = Some(Box::new(callback));
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the items, e.g. after the host reloads them
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.active = None;
    }

    pub fn options(&self) -> &SortableOptions {
        &self.options
    }

    pub fn strategy(&self) -> SortingStrategy {
        self.options.orientation.into()
    }

    /// Lock or unlock an item; locked items can't be picked up
    pub fn set_disabled(&mut self, id: &T::Id, disabled: bool) {
        self.disabled.retain(|d| d != id);
        if disabled {
            self.disabled.push(id.clone());
        }
    }

    pub fn is_disabled(&self, id: &T::Id) -> bool {
        self.disabled.contains(id)
    }

    /// Whether a pointer that moved by `(dx, dy)` since the press starts a drag
    pub fn activates(&self, dx: f32, dy: f32) -> bool {
        (dx * dx + dy * dy).sqrt() > self.options.activation_distance
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Pick up an item
    pub fn drag_start(&mut self, id: &T::Id) -> Result<()> {
        if self.position(id).is_none() {
            return Err(anyhow!("No item with id {:?}", id));
        }
        if self.is_disabled(id) {
            return Err(anyhow!("Item {:?} can't be dragged", id));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// Drop the active item over `over`
    ///
    /// The list changes only when dropped over a different item. Returns
    /// whether it was reordered.
    pub fn drag_end(&mut self, over: Option<&T::Id>) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        let Some(over) = over.filter(|over| **over != active) else {
            return false;
        };

        let (Some(from), Some(to)) = (self.position(&active), self.position(over)) else {
            return false;
        };
        debug!("Moving item {:?} from {} to {}", active, from, to);
        array_move(&mut self.items, from, to);

        if let Some(callback) = self.on_reorder.as_mut() {
            callback(&self.items);
        }
        true
    }

    /// Abandon the drag (Escape or leaving the window)
    pub fn drag_cancel(&mut self) {
        self.active = None;
    }

    /// The item rendered in the drag overlay
    pub fn active_item(&self) -> Option<&T> {
        let active = self.active.as_ref()?;
        self.items.iter().find(|item| item.id() == active)
    }

    pub fn is_dragging(&self, id: &T::Id) -> bool {
        self.active.as_ref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        id: u32,
        title: &'static str,
    }

    impl HasId for Card {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn cards() -> Vec<Card> {
        ["plan", "build", "ship"]
            .into_iter()
            .enumerate()
            .map(|(i, title)| Card { id: i as u32 + 1, title })
            .collect()
    }

    fn titles(sortable: &Sortable<Card>) -> Vec<&str> {
        sortable.items().iter().map(|c| c.title).collect()
    }

    #[test]
    fn test_array_move() {
        let mut items = vec![1, 2, 3, 4];
        array_move(&mut items, 0, 2);
        assert_eq!(items, vec![2, 3, 1, 4]);
        array_move(&mut items, 3, 0);
        assert_eq!(items, vec![4, 2, 3, 1]);
        array_move(&mut items, 9, 0);
        assert_eq!(items, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_drop_over_other_item_reorders() {
        let reorders = Rc::new(RefCell::new(0));
        let counter = reorders.clone();
        let mut list = Sortable::new(cards()).on_reorder(move |_| *counter.borrow_mut() += 1);

        list.drag_start(&1).unwrap();
        assert_eq!(list.active_item().map(|c| c.title), Some("plan"));
        assert!(list.is_dragging(&1));

        assert!(list.drag_end(Some(&3)));
        assert_eq!(titles(&list), vec!["build", "ship", "plan"]);
        assert_eq!(list.active_item(), None);
        assert_eq!(*reorders.borrow(), 1);
    }

    #[test]
    fn test_drop_on_itself_or_nowhere_keeps_order() {
        let mut list = Sortable::new(cards());

        list.drag_start(&2).unwrap();
        assert!(!list.drag_end(Some(&2)));

        list.drag_start(&2).unwrap();
        assert!(!list.drag_end(None));

        list.drag_start(&2).unwrap();
        list.drag_cancel();
        assert!(!list.drag_end(Some(&1)));

        assert_eq!(titles(&list), vec!["plan", "build", "ship"]);
    }

    #[test]
    fn test_disabled_and_unknown_items() {
        let mut list = Sortable::new(cards());
        list.set_disabled(&2, true);
        assert!(list.drag_start(&2).is_err());
        assert!(list.drag_start(&7).is_err());

        list.set_disabled(&2, false);
        assert!(list.drag_start(&2).is_ok());
    }

    #[test]
    fn test_strategy_follows_orientation() {
        let list = Sortable::new(cards());
        assert_eq!(list.strategy(), SortingStrategy::VerticalList);

        let grid = Sortable::new(cards())
            .with_options(SortableOptions::new().orientation(SortableOrientation::Mixed));
        assert_eq!(grid.strategy(), SortingStrategy::Rect);
        assert_eq!(SortingStrategy::from(SortableOrientation::Horizontal), SortingStrategy::HorizontalList);
    }

    #[test]
    fn test_activation_distance() {
        let list = Sortable::new(cards());
        assert!(!list.activates(3.0, 4.0));
        assert!(!list.activates(0.0, 8.0));
        assert!(list.activates(6.0, 6.0));
    }
}
