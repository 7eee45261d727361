//! Shopping list with confirmation-gated mutations.

use shared::{
    domain::{Item, ProposalId},
    error::ListError,
};

pub mod action;
pub mod controller;
pub mod gate;

pub use action::ListAction;
pub use controller::ShoppingListController;
pub use gate::{Commit, ConfirmationGate, PendingAction};

/// The list together with the gate every user-facing mutation goes through.
#[derive(Debug, Default)]
pub struct Cart {
    list: ShoppingListController,
    gate: ConfirmationGate<ListAction>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            list: ShoppingListController::with_items(items),
            gate: ConfirmationGate::new(),
        }
    }

    pub fn list(&self) -> &ShoppingListController {
        &self.list
    }

    pub fn pending(&self) -> Option<&PendingAction<ListAction>> {
        self.gate.pending()
    }

    pub fn propose_add(&mut self, item: Item) -> ProposalId {
        let prompt = action::add_prompt(&item);
        self.gate.propose(prompt, ListAction::AddItem { item })
    }

    pub fn propose_delete(&mut self, index: usize) -> Result<ProposalId, ListError> {
        let item = self.list.get(index).ok_or(ListError::IndexOutOfRange {
            index,
            len: self.list.len(),
        })?;
        let prompt = action::delete_prompt(item);
        Ok(self.gate.propose(prompt, ListAction::DeleteItem { index }))
    }

    pub fn propose_reset(&mut self) -> ProposalId {
        self.gate.propose(action::reset_prompt(), ListAction::Reset)
    }

    pub fn confirm(&mut self) -> Result<Option<ProposalId>, ListError> {
        self.gate.confirm(&mut self.list)
    }

    pub fn confirm_proposal(&mut self, id: ProposalId) -> Result<Option<ProposalId>, ListError> {
        self.gate.confirm_proposal(id, &mut self.list)
    }

    pub fn cancel(&mut self) -> Option<ProposalId> {
        self.gate.cancel()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod gate_tests;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
