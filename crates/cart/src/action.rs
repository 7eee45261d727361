use serde::Serialize;
use shared::{domain::Item, error::ListError};

use crate::{controller::ShoppingListController, gate::Commit};

/// Mutations of the shopping list that wait for user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListAction {
    AddItem { item: Item },
    DeleteItem { index: usize },
    Reset,
}

impl ListAction {
    pub fn apply(self, list: &mut ShoppingListController) -> Result<(), ListError> {
        match self {
            Self::AddItem { item } => list.add_item(item),
            Self::DeleteItem { index } => {
                list.remove_item(index)?;
            }
            Self::Reset => list.reset(),
        }
        Ok(())
    }
}

impl Commit<ShoppingListController> for ListAction {
    type Error = ListError;

    fn commit(self, target: &mut ShoppingListController) -> Result<(), Self::Error> {
        self.apply(target)
    }
}

pub fn add_prompt(item: &Item) -> String {
    format!("{} average price is ${}", item.food, item.price)
}

pub fn delete_prompt(item: &Item) -> String {
    format!("Are you sure you want to delete {}?", item.food)
}

pub fn reset_prompt() -> String {
    "Are you sure you want to delete the list?".to_string()
}
