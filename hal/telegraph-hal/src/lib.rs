//! Hardware capability traits for the Telegraph USART bus driver
//!
//! The driver core (`telegraph-bus`) never touches a register: it drives
//! one USART peripheral and two DMA channels exclusively through the
//! traits defined here, which chip-specific crates implement against the
//! real hardware. This keeps the driver's state machine board-agnostic
//! and testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  application / protocol code            │
//! └─────────────────────────────────────────┘
//!                     │
//! ┌─────────────────────────────────────────┐
//! │  telegraph-bus (driver core)            │
//! └─────────────────────────────────────────┘
//!                     │
//! ┌─────────────────────────────────────────┐
//! │  telegraph-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!        chip-specific implementations
//! ```
//!
//! # Traits
//!
//! - [`usart::UsartDevice`] - peripheral queries and interrupt-flag surface
//! - [`dma::DmaChannel`] - one DMA channel as seen by the driver

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod usart;

// Re-export key traits at crate root for convenience
pub use dma::DmaChannel;
pub use usart::{LineError, UsartDevice};
