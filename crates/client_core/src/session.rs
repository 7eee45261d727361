//! One shopping session: the cart, the camera side, and the classification round trip.

use std::sync::Arc;

use cart::Cart;
use shared::{
    domain::{CameraFacing, ImageHandle, Item, PermissionState, ProposalId},
    protocol::ClassifyOutcome,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{error::UploadError, ImageClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    /// A classification request is in flight.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaptureRejected {
    #[error("a photo is already being classified")]
    Busy,
    #[error("camera permission has not been granted")]
    PermissionRequired,
}

#[derive(Debug)]
pub enum CaptureOutcome {
    /// The item waits for confirmation under this proposal.
    Proposed(ProposalId),
    /// The classifier did not recognise the photo; nothing was proposed.
    NonMatch,
    Failed(UploadError),
}

/// Proof that a capture was admitted; hand it back to
/// [`CartSession::finish_capture`].
#[derive(Debug)]
#[must_use]
pub struct CaptureTicket {
    image: ImageHandle,
}

impl CaptureTicket {
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }
}

pub struct CartSession {
    cart: Cart,
    classifier: Arc<dyn ImageClassifier>,
    capture_state: CaptureState,
    permission: PermissionState,
    facing: CameraFacing,
}

impl CartSession {
    pub fn new(classifier: Arc<dyn ImageClassifier>, cart: Cart) -> Self {
        Self {
            cart,
            classifier,
            capture_state: CaptureState::Idle,
            permission: PermissionState::Undetermined,
            facing: CameraFacing::Back,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture_state
    }

    pub fn is_loading(&self) -> bool {
        self.capture_state == CaptureState::Pending
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn toggle_facing(&mut self) -> CameraFacing {
        self.facing = self.facing.toggled();
        self.facing
    }

    /// Moves Idle -> Pending. Captures are rejected, never queued, while a
    /// request is in flight.
    pub fn begin_capture(&mut self, image: ImageHandle) -> Result<CaptureTicket, CaptureRejected> {
        if !self.permission.is_granted() {
            return Err(CaptureRejected::PermissionRequired);
        }
        if self.capture_state == CaptureState::Pending {
            debug!(image = %image, "capture: rejected while busy");
            return Err(CaptureRejected::Busy);
        }

        self.capture_state = CaptureState::Pending;
        info!(image = %image, facing = ?self.facing, "capture: classification started");
        Ok(CaptureTicket { image })
    }

    /// Moves Pending -> Idle and stages the item when the photo matched.
    pub fn finish_capture(
        &mut self,
        ticket: CaptureTicket,
        result: Result<ClassifyOutcome, UploadError>,
    ) -> CaptureOutcome {
        self.capture_state = CaptureState::Idle;

        match result {
            Ok(ClassifyOutcome::Match(classification)) => {
                let item = Item::new(classification.food, classification.price)
                    .with_image(ticket.image.uri());
                let id = self.cart.propose_add(item);
                CaptureOutcome::Proposed(id)
            }
            Ok(ClassifyOutcome::NonMatch) => {
                info!(image = %ticket.image, "capture: photo not recognised");
                CaptureOutcome::NonMatch
            }
            Err(err) => {
                warn!(image = %ticket.image, error = %err, "capture: classification failed");
                CaptureOutcome::Failed(err)
            }
        }
    }

    pub async fn capture(&mut self, image: ImageHandle) -> Result<CaptureOutcome, CaptureRejected> {
        let ticket = self.begin_capture(image)?;
        let classifier = Arc::clone(&self.classifier);
        let result = classifier.classify(ticket.image()).await;
        Ok(self.finish_capture(ticket, result))
    }
}
