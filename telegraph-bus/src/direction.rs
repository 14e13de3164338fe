//! Per-direction transfer state
//!
//! Receive and transmit each own one `DirectionState`; the arming paths
//! and the interrupt handlers drive it through
//! `Idle → Transferring → {Transferred | Error} → Idle`, where the
//! return to `Idle` happens when the next transfer is armed.
//!
//! Invariants, held at every observation point:
//! - `locked == (status == Transferring)`
//! - `status == Error` implies a latched error

use crate::status::{BusError, Status, TransferError, TransferId, DEFAULT_TRANSFER_ID};

#[derive(Debug, Clone, Copy)]
pub(crate) struct DirectionState {
    status: Status,
    error: Option<TransferError>,
    locked: bool,
    transfer_id: TransferId,
    size: usize,
}

impl DirectionState {
    pub(crate) const fn new() -> Self {
        Self {
            status: Status::Idle,
            error: None,
            locked: false,
            transfer_id: DEFAULT_TRANSFER_ID,
            size: 0,
        }
    }

    /// Begin a transfer of `size` bytes.
    ///
    /// Fails with `Busy` while a transfer is outstanding, mutating
    /// nothing.
    pub(crate) fn arm(&mut self, size: usize) -> Result<(), BusError> {
        if self.locked {
            return Err(BusError::Busy);
        }
        self.status = Status::Transferring;
        self.locked = true;
        self.error = None;
        self.size = size;
        Ok(())
    }

    /// Finish the outstanding transfer normally.
    ///
    /// `moved` is the byte count actually transferred, which is less
    /// than the armed size when an idle-line mark ended the frame early.
    pub(crate) fn finalize_ok(&mut self, moved: usize) {
        self.status = Status::Transferred;
        self.locked = false;
        self.size = moved;
    }

    /// Finish the outstanding transfer with a fault.
    pub(crate) fn finalize_err(&mut self, error: TransferError, moved: usize) {
        self.status = Status::Error;
        self.error = Some(error);
        self.locked = false;
        self.size = moved;
    }

    /// Re-tag the direction. Fails while a transfer is outstanding,
    /// leaving the stored id untouched.
    pub(crate) fn set_transfer_id(&mut self, id: TransferId) -> bool {
        if self.locked {
            return false;
        }
        self.transfer_id = id;
        true
    }

    pub(crate) fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn error(&self) -> Option<TransferError> {
        self.error
    }

    pub(crate) fn locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }
}
