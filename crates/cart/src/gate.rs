//! Single-slot confirmation gate: a mutation is proposed, then confirmed or cancelled.

use serde::Serialize;
use shared::domain::ProposalId;
use tracing::{debug, info};

/// A deferred mutation applied to `T` when the user confirms it.
///
/// `commit` consumes the action, so a proposal can run at most once.
pub trait Commit<T> {
    type Error;

    fn commit(self, target: &mut T) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAction<A> {
    pub id: ProposalId,
    pub description: String,
    pub action: A,
}

#[derive(Debug)]
pub struct ConfirmationGate<A> {
    pending: Option<PendingAction<A>>,
    next_id: u64,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self {
            pending: None,
            next_id: 1,
        }
    }
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `action` as the only pending proposal. An unresolved earlier
    /// proposal is dropped without being committed.
    pub fn propose(&mut self, description: impl Into<String>, action: A) -> ProposalId {
        let id = ProposalId(self.next_id);
        self.next_id += 1;

        let description = description.into();
        match self.pending.replace(PendingAction {
            id,
            description,
            action,
        }) {
            Some(superseded) => info!(
                proposal = id.0,
                superseded = superseded.id.0,
                "gate: pending proposal replaced"
            ),
            None => debug!(proposal = id.0, "gate: proposal pending"),
        }
        id
    }

    pub fn pending(&self) -> Option<&PendingAction<A>> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Commits the pending proposal, if any, and clears the slot. The slot is
    /// cleared even when the commit fails.
    pub fn confirm<T>(&mut self, target: &mut T) -> Result<Option<ProposalId>, A::Error>
    where
        A: Commit<T>,
    {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        debug!(proposal = pending.id.0, "gate: proposal confirmed");
        pending.action.commit(target)?;
        Ok(Some(pending.id))
    }

    /// Like [`confirm`](Self::confirm), but only when `id` is still the pending
    /// proposal. A stale id leaves the current proposal untouched.
    pub fn confirm_proposal<T>(
        &mut self,
        id: ProposalId,
        target: &mut T,
    ) -> Result<Option<ProposalId>, A::Error>
    where
        A: Commit<T>,
    {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.id == id);
        if !is_current {
            debug!(proposal = id.0, "gate: ignoring confirmation for stale proposal");
            return Ok(None);
        }
        self.confirm(target)
    }

    pub fn cancel(&mut self) -> Option<ProposalId> {
        let pending = self.pending.take()?;
        debug!(proposal = pending.id.0, "gate: proposal cancelled");
        Some(pending.id)
    }
}
