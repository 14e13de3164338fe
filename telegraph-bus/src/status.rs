//! Status and error vocabulary for the bus
//!
//! Everything here is a closed enum so that invalid states are
//! unrepresentable; the "no error" case is `Option::None` rather than a
//! variant.

use telegraph_hal::usart::LineError;

/// Per-direction transfer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// No transfer armed
    Idle,
    /// A DMA transfer is outstanding
    Transferring,
    /// The most recent transfer completed
    Transferred,
    /// The most recent transfer faulted
    Error,
}

/// Faults that terminate a transfer.
///
/// Latched per direction until the next transfer is armed; never
/// surfaced as a synchronous return value because the hardware reports
/// them asynchronously, in interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// Parity mismatch on a received frame
    Parity,
    /// Noise detected during sampling
    Noise,
    /// A received byte was lost before it could be read
    Overrun,
    /// Stop bit not found where expected
    Framing,
    /// The DMA controller reported a transfer fault
    Dma,
}

impl From<LineError> for TransferError {
    fn from(error: LineError) -> Self {
        match error {
            LineError::Parity => TransferError::Parity,
            LineError::Noise => TransferError::Noise,
            LineError::Overrun => TransferError::Overrun,
            LineError::Framing => TransferError::Framing,
        }
    }
}

/// Failures returned synchronously from bus operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The direction (or, in half-duplex, the shared line) already has
    /// an outstanding transfer. Recoverable: wait or retry.
    Busy,
    /// Malformed call: empty buffer, aliased DMA channels, or a
    /// direction the peripheral has disabled.
    InvalidArgument,
    /// The device is already bound to another live bus.
    AlreadyInUse,
}

/// Caller-assigned tag identifying the logical owner of a transfer.
///
/// Lets several logical clients multiplex one bus and recognize whose
/// transfer just finished. Only mutable while the direction is unlocked.
pub type TransferId = u8;

/// Transfer id assigned to both directions at initialization.
pub const DEFAULT_TRANSFER_ID: TransferId = 0;
