//! Interrupt/DMA-driven USART bus driver
//!
//! One [`UsartBus`] manages one bidirectional byte channel. Application
//! code arms background transfers with [`UsartBus::send`] and
//! [`UsartBus::recv`]; hardware events arrive through the interrupt
//! entry points ([`UsartBus::irq_handler`] and the two DMA channel
//! handlers), which drive the per-direction state machine and report
//! terminal events through registered notifiers.
//!
//! The driver is board-agnostic: it consumes the capability traits from
//! `telegraph-hal` and carries no register code, so the whole state
//! machine runs (and is tested) on the host against mock hardware.
//!
//! # Execution model
//!
//! Exactly two contexts touch a bus: the foreground caller and interrupt
//! context. Every multi-field transition happens inside a short
//! `critical-section` block, and the per-direction lock flag is the
//! single serializer: the foreground only mutates an unlocked direction,
//! interrupt handlers only finalize a locked one. Notifiers are invoked
//! outside the critical section.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod callback;
pub mod status;

mod claim;
mod direction;

// Re-export the whole application-facing surface at the crate root
pub use bus::{BusConfig, UsartBus};
pub use callback::{ByteHandler, EventHandler};
pub use status::{BusError, Status, TransferError, TransferId, DEFAULT_TRANSFER_ID};
