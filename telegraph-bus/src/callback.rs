//! Notifier capabilities invoked from interrupt context
//!
//! Registration stores a `&dyn` reference, so both a static struct and a
//! long-lived closure can act as a notifier. Handlers run inside an
//! interrupt handler: they must be bounded, non-blocking and must not
//! call back into a blocking bus operation.

/// Completion/error notifier.
///
/// Fired once per terminal transfer event, for either direction.
pub trait EventHandler: Sync {
    /// Handle a terminal transfer event (completion or fault).
    ///
    /// Returns `true` when the event was consumed. An unconsumed event
    /// needs no recovery: the terminal status stays latched for a later
    /// `wait`/accessor poll.
    fn on_event(&self) -> bool;
}

impl<F> EventHandler for F
where
    F: Fn() -> bool + Sync,
{
    fn on_event(&self) -> bool {
        self()
    }
}

/// Per-byte notifier.
///
/// Fired once per received byte, independent of the DMA bulk path, for
/// protocols that need to inspect the stream as it arrives (address
/// matching, early frame detection).
pub trait ByteHandler: Sync {
    /// Handle one received byte. Returns `true` when consumed.
    fn on_byte(&self, byte: u8) -> bool;
}

impl<F> ByteHandler for F
where
    F: Fn(u8) -> bool + Sync,
{
    fn on_byte(&self, byte: u8) -> bool {
        self(byte)
    }
}
