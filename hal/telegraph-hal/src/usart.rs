//! USART peripheral capability trait
//!
//! Read-only queries over the peripheral's configuration plus the
//! interrupt-flag surface the driver's line interrupt handler consumes.

/// Signal-integrity faults reported by the USART hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Parity mismatch on a received frame
    Parity,
    /// Noise detected during sampling
    Noise,
    /// A received byte was lost before it could be read
    Overrun,
    /// Stop bit not found where expected
    Framing,
}

/// One USART peripheral, as consumed by the bus driver.
///
/// All methods take `&self`: the peripheral is shared between the
/// foreground and interrupt context. The `take_*` methods read and clear
/// the corresponding hardware flag, so each event is observed exactly
/// once.
pub trait UsartDevice {
    /// Whether the transmitter is enabled.
    fn transmitter_enabled(&self) -> bool;

    /// Whether the receiver is enabled.
    fn receiver_enabled(&self) -> bool;

    /// Whether transmit and receive share one physical line.
    fn half_duplex_enabled(&self) -> bool;

    /// Enable the idle-line, line-error and receive-ready interrupt
    /// sources at the peripheral.
    fn listen(&self);

    /// Read and clear a flagged line error, if any.
    fn take_line_error(&self) -> Option<LineError>;

    /// Read and clear the idle-line flag.
    ///
    /// The hardware raises it once the line has been continuously idle
    /// for one frame time.
    fn take_idle(&self) -> bool;

    /// Read a received byte if one is ready, clearing the ready flag.
    fn take_byte(&self) -> Option<u8>;
}
