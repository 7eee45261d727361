//! Shopping list state: ordered items plus their running total.

use shared::{
    domain::{Item, Total},
    error::ListError,
};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ShoppingListController {
    items: Vec<Item>,
    total: Total,
}

impl ShoppingListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items: Vec<Item> = items.into_iter().collect();
        let total = Total::of(items.iter().map(|item| &item.price));
        Self { items, total }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> &Total {
        &self.total
    }

    /// Sum of the current item prices, computed from scratch.
    pub fn recomputed_total(&self) -> Total {
        Total::of(self.items.iter().map(|item| &item.price))
    }

    pub fn add_item(&mut self, item: Item) {
        self.total.add(&item.price);
        debug!(food = %item.food, price = %item.price, total = %self.total, "cart: item added");
        self.items.push(item);
        self.debug_check_total();
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Item, ListError> {
        if index >= self.items.len() {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }

        let item = self.items.remove(index);
        self.total.subtract(&item.price);
        debug!(index, food = %item.food, total = %self.total, "cart: item removed");
        self.debug_check_total();
        Ok(item)
    }

    pub fn reset(&mut self) {
        let cleared = self.items.len();
        self.items.clear();
        self.total = Total::zero();
        debug!(cleared, "cart: list reset");
    }

    fn debug_check_total(&self) {
        debug_assert_eq!(self.total, self.recomputed_total(), "running total drifted");
    }
}
