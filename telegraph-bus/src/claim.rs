//! Registry of USART devices bound to live buses
//!
//! Two buses driving one device would fight over its interrupt
//! configuration and DMA channels, so binding claims the device address
//! here and dropping the bus releases it.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

/// Maximum number of simultaneously bound buses.
const MAX_BUSES: usize = 64;

static BOUND: Mutex<RefCell<Vec<usize, MAX_BUSES>>> = Mutex::new(RefCell::new(Vec::new()));

/// Claim `addr`. Returns `false` when it is already bound or the
/// registry is full.
pub(crate) fn claim(addr: usize) -> bool {
    critical_section::with(|cs| {
        let mut bound = BOUND.borrow_ref_mut(cs);
        if bound.contains(&addr) {
            return false;
        }
        bound.push(addr).is_ok()
    })
}

/// Release a previously claimed `addr`.
pub(crate) fn release(addr: usize) {
    critical_section::with(|cs| {
        let mut bound = BOUND.borrow_ref_mut(cs);
        if let Some(index) = bound.iter().position(|&bound_addr| bound_addr == addr) {
            bound.swap_remove(index);
        }
    });
}
