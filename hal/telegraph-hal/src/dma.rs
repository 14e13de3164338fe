//! DMA channel capability trait

/// One DMA channel, as consumed by the bus driver.
///
/// The driver serializes arming through its per-direction lock, so at
/// most one transfer per channel is outstanding at a time. A buffer
/// handed to [`DmaChannel::start_read`] or [`DmaChannel::start_write`]
/// must stay alive until the driver observes the channel's completion
/// event.
pub trait DmaChannel {
    /// Enable the channel's transfer-complete and transfer-error
    /// interrupt sources.
    fn listen(&self);

    /// Arm a peripheral-to-memory transfer into `buf` and start it.
    fn start_read(&self, buf: &mut [u8]);

    /// Arm a memory-to-peripheral transfer from `data` and start it.
    fn start_write(&self, data: &[u8]);

    /// Data units left to move in the active transfer.
    fn remaining(&self) -> usize;

    /// Read and clear the channel's pending completion/error event.
    ///
    /// Returns `false` when this channel raised no event - the no-claim
    /// signal for a dispatcher shared by every channel in the system.
    fn take_event(&self) -> bool;

    /// Whether the hardware reported a transfer fault.
    fn transfer_failed(&self) -> bool;

    /// Disable the channel.
    fn stop(&self);
}
