//! The bus itself: binding, public operations and interrupt entry points
//!
//! A `UsartBus` borrows its peripheral and DMA channels for its whole
//! lifetime and owns all transfer state. The surrounding interrupt
//! vector table is expected to call [`UsartBus::irq_handler`] when the
//! bound device interrupts, and to offer every DMA channel event to
//! [`UsartBus::dma_rx_irq_handler`] / [`UsartBus::dma_tx_irq_handler`]
//! of every live bus, routing on their claim/no-claim return value.

use core::cell::RefCell;
use core::ptr;

use critical_section::Mutex;
use telegraph_hal::dma::DmaChannel;
use telegraph_hal::usart::UsartDevice;

use crate::callback::{ByteHandler, EventHandler};
use crate::claim;
use crate::direction::DirectionState;
use crate::status::{BusError, Status, TransferError, TransferId};

/// Handles binding a bus to its hardware resources.
///
/// The caller constructs the device and channels and keeps ownership;
/// the bus only borrows them, for its whole lifetime.
pub struct BusConfig<'a, D, C> {
    /// The USART peripheral.
    pub device: &'a D,
    /// DMA channel moving received bytes into memory.
    pub dma_rx: &'a C,
    /// DMA channel moving outgoing bytes to the peripheral.
    pub dma_tx: &'a C,
}

struct Inner<'a> {
    callback: Option<&'a dyn EventHandler>,
    rx_callback: Option<&'a dyn ByteHandler>,
    rx: DirectionState,
    tx: DirectionState,
    /// Receive stream suppressed until the next idle-line mark.
    sleeping: bool,
}

/// One bidirectional, DMA-driven byte channel over a USART peripheral.
pub struct UsartBus<'a, D, C> {
    device: &'a D,
    dma_rx: &'a C,
    dma_tx: &'a C,
    inner: Mutex<RefCell<Inner<'a>>>,
}

impl<'a, D, C> UsartBus<'a, D, C>
where
    D: UsartDevice,
    C: DmaChannel,
{
    /// Bind a bus to its peripheral and enable the interrupt sources it
    /// relies on (idle-line, line errors, receive-ready, DMA events).
    ///
    /// Fails with `InvalidArgument` when the two DMA channels alias,
    /// and with `AlreadyInUse` when the device is already bound to
    /// another live bus - sharing one peripheral between two buses would
    /// corrupt its interrupt configuration.
    pub fn new(config: BusConfig<'a, D, C>) -> Result<Self, BusError> {
        if ptr::eq(config.dma_rx, config.dma_tx) {
            return Err(BusError::InvalidArgument);
        }
        if !claim::claim(config.device as *const D as usize) {
            return Err(BusError::AlreadyInUse);
        }

        config.device.listen();
        config.dma_rx.listen();
        config.dma_tx.listen();

        Ok(Self {
            device: config.device,
            dma_rx: config.dma_rx,
            dma_tx: config.dma_tx,
            inner: Mutex::new(RefCell::new(Inner {
                callback: None,
                rx_callback: None,
                rx: DirectionState::new(),
                tx: DirectionState::new(),
                sleeping: false,
            })),
        })
    }

    /// Start transmitting `data`.
    ///
    /// Asynchronous: returns once the DMA transfer is armed, not once it
    /// completes. Completion or failure is reported through the
    /// registered notifier and the tx status/error accessors.
    ///
    /// Fails with `InvalidArgument` on an empty slice or a disabled
    /// transmitter, and with `Busy` while a transmit is outstanding or,
    /// in half-duplex mode, while a receive holds the shared line.
    pub fn send(&self, data: &[u8]) -> Result<(), BusError> {
        if data.is_empty() || !self.device.transmitter_enabled() {
            return Err(BusError::InvalidArgument);
        }
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if self.device.half_duplex_enabled() && inner.rx.locked() {
                return Err(BusError::Busy);
            }
            inner.tx.arm(data.len())?;
            self.dma_tx.start_write(data);
            Ok(())
        })
    }

    /// Steer the next received bytes into `buf`.
    ///
    /// Asynchronous: the transfer finalizes when `buf` is full, when an
    /// idle-line mark ends the frame early, or on a fault. The caller
    /// keeps `buf` alive until one of those is observed.
    ///
    /// Fails with `InvalidArgument` on an empty buffer or a disabled
    /// receiver, and with `Busy` while a receive is outstanding or, in
    /// half-duplex mode, while a transmit holds the shared line.
    pub fn recv(&self, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.is_empty() || !self.device.receiver_enabled() {
            return Err(BusError::InvalidArgument);
        }
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if self.device.half_duplex_enabled() && inner.tx.locked() {
                return Err(BusError::Busy);
            }
            inner.rx.arm(buf.len())?;
            self.dma_rx.start_read(buf);
            Ok(())
        })
    }

    /// Discard the receive stream until the next idle-line mark.
    ///
    /// Resynchronizes to a frame boundary when an unknown number of
    /// stray bytes is still arriving. Exactly one idle mark consumes the
    /// suppression; status, error and size are unaffected.
    pub fn sleep(&self) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).sleeping = true;
        });
    }

    /// Capture the next bytes as a new frame without waiting for an
    /// idle mark.
    ///
    /// The converse of [`UsartBus::sleep`], for callers that learned of
    /// a frame boundary by other means (a timer, an out-of-band signal).
    pub fn wake(&self) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).sleeping = false;
        });
    }

    /// Block until the receive direction leaves `Transferring`.
    ///
    /// Polls the status flag. Must not be called from interrupt
    /// context: the transition waited on is produced by an interrupt
    /// handler, so waiting there deadlocks.
    pub fn rx_wait(&self) {
        while self.rx_busy() {
            core::hint::spin_loop();
        }
    }

    /// Block until the transmit direction leaves `Transferring`.
    ///
    /// Same contract as [`UsartBus::rx_wait`].
    pub fn tx_wait(&self) {
        while self.tx_busy() {
            core::hint::spin_loop();
        }
    }

    /// USART line interrupt entry point.
    ///
    /// Call from the device's interrupt handler. In priority order:
    /// latches a reported line error, honours an idle-line frame
    /// boundary, then feeds the per-byte notifier. Bounded and
    /// non-blocking.
    pub fn irq_handler(&self) {
        // Line errors are receive-side faults on this class of hardware;
        // transmit faults arrive through the tx DMA channel instead.
        if let Some(line_error) = self.device.take_line_error() {
            let callback = critical_section::with(|cs| {
                let mut inner = self.inner.borrow_ref_mut(cs);
                self.dma_rx.stop();
                let moved = inner.rx.size().saturating_sub(self.dma_rx.remaining());
                inner.rx.finalize_err(line_error.into(), moved);
                inner.callback
            });
            notify(callback);
        }

        if self.device.take_idle() {
            let callback = critical_section::with(|cs| {
                let mut inner = self.inner.borrow_ref_mut(cs);
                if inner.sleeping {
                    // The mark the caller slept for; resynchronized now.
                    inner.sleeping = false;
                    None
                } else if inner.rx.locked() {
                    // Natural end of frame: deliver what arrived.
                    self.dma_rx.stop();
                    let moved = inner.rx.size().saturating_sub(self.dma_rx.remaining());
                    inner.rx.finalize_ok(moved);
                    inner.callback
                } else {
                    None
                }
            });
            notify(callback);
        }

        if let Some(byte) = self.device.take_byte() {
            let handler = critical_section::with(|cs| {
                let inner = self.inner.borrow_ref(cs);
                if inner.sleeping {
                    None
                } else if self.device.half_duplex_enabled() && inner.tx.locked() {
                    // Our own transmit echo on the shared line.
                    None
                } else {
                    inner.rx_callback
                }
            });
            if let Some(handler) = handler {
                let _ = handler.on_byte(byte);
            }
        }
    }

    /// DMA receive-channel interrupt entry point.
    ///
    /// Call for every live bus when any DMA channel completes; returns
    /// whether this bus's receive channel raised the event. A `false`
    /// return leaves the bus untouched, so handlers of unrelated buses
    /// compose on one shared dispatcher.
    pub fn dma_rx_irq_handler(&self) -> bool {
        self.dma_channel_event(self.dma_rx, true)
    }

    /// DMA transmit-channel interrupt entry point.
    ///
    /// Same contract as [`UsartBus::dma_rx_irq_handler`], for the
    /// transmit channel.
    pub fn dma_tx_irq_handler(&self) -> bool {
        self.dma_channel_event(self.dma_tx, false)
    }

    fn dma_channel_event(&self, channel: &C, is_rx: bool) -> bool {
        if !channel.take_event() {
            return false;
        }
        let failed = channel.transfer_failed();
        let callback = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let direction = if is_rx { &mut inner.rx } else { &mut inner.tx };
            if !direction.locked() {
                // Stale event from a transfer this bus no longer tracks.
                return None;
            }
            channel.stop();
            let moved = direction.size().saturating_sub(channel.remaining());
            if failed {
                direction.finalize_err(TransferError::Dma, moved);
            } else {
                direction.finalize_ok(moved);
            }
            inner.callback
        });
        notify(callback);
        true
    }

    /// Receive direction status.
    pub fn rx_status(&self) -> Status {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx.status())
    }

    /// Transmit direction status.
    pub fn tx_status(&self) -> Status {
        critical_section::with(|cs| self.inner.borrow_ref(cs).tx.status())
    }

    /// Fault latched by the most recent receive, if any.
    pub fn rx_error(&self) -> Option<TransferError> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx.error())
    }

    /// Fault latched by the most recent transmit, if any.
    pub fn tx_error(&self) -> Option<TransferError> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).tx.error())
    }

    /// Whether a receive is outstanding.
    pub fn rx_busy(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx.locked())
    }

    /// Whether a transmit is outstanding.
    pub fn tx_busy(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).tx.locked())
    }

    /// Byte count of the armed or most recently finalized receive.
    ///
    /// After an idle-line or fault termination this is the count
    /// actually moved, not the count requested.
    pub fn rx_size(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx.size())
    }

    /// Byte count of the armed or most recently finalized transmit.
    pub fn tx_size(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).tx.size())
    }

    /// Tag of the current or most recent receive.
    pub fn rx_transfer_id(&self) -> TransferId {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx.transfer_id())
    }

    /// Tag of the current or most recent transmit.
    pub fn tx_transfer_id(&self) -> TransferId {
        critical_section::with(|cs| self.inner.borrow_ref(cs).tx.transfer_id())
    }

    /// Re-tag the receive direction. Returns `false` (storing nothing)
    /// while a receive is outstanding.
    pub fn set_rx_transfer_id(&self, id: TransferId) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).rx.set_transfer_id(id))
    }

    /// Re-tag the transmit direction. Returns `false` (storing nothing)
    /// while a transmit is outstanding.
    pub fn set_tx_transfer_id(&self, id: TransferId) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).tx.set_transfer_id(id))
    }

    /// The registered completion/error notifier.
    pub fn callback(&self) -> Option<&'a dyn EventHandler> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).callback)
    }

    /// Register (or clear) the completion/error notifier.
    ///
    /// Takes effect immediately: a transfer already in flight notifies
    /// the newly registered handler when it finalizes.
    pub fn set_callback(&self, handler: Option<&'a dyn EventHandler>) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).callback = handler;
        });
    }

    /// The registered per-byte notifier.
    pub fn rx_callback(&self) -> Option<&'a dyn ByteHandler> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).rx_callback)
    }

    /// Register (or clear) the per-byte notifier. Takes effect with the
    /// next received byte.
    pub fn set_rx_callback(&self, handler: Option<&'a dyn ByteHandler>) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).rx_callback = handler;
        });
    }
}

impl<D, C> Drop for UsartBus<'_, D, C> {
    fn drop(&mut self) {
        claim::release(self.device as *const D as usize);
    }
}

fn notify(handler: Option<&dyn EventHandler>) {
    if let Some(handler) = handler {
        // An unconsumed event stays latched for a later poll.
        let _ = handler.on_event();
    }
}
