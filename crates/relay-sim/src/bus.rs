//! Virtual I2C bus and delay for testing
//!
//! [`VirtualBus`] implements [`embedded_hal::i2c::I2c`] and keeps a log of
//! every byte written, so tests can assert the exact relay write sequence.
//! [`VirtualDelay`] records waits instead of sleeping.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};
use tracing::trace;

/// A single write seen on the virtual bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusWrite {
    /// Target device address
    pub address: u8,
    /// Bytes written
    pub bytes: Vec<u8>,
}

/// Error produced by an injected bus fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualBusError(ErrorKind);

impl i2c::Error for VirtualBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Debug, Default)]
struct BusState {
    writes: Vec<BusWrite>,
    pass_writes: u32,
    fail_writes: u32,
}

/// Simulated I2C bus
#[derive(Default)]
pub struct VirtualBus {
    state: Rc<RefCell<BusState>>,
}

impl VirtualBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle for inspecting the write log
    pub fn handle(&self) -> VirtualBusHandle {
        VirtualBusHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl ErrorType for VirtualBus {
    type Error = VirtualBusError;
}

impl I2c for VirtualBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if state.pass_writes > 0 {
                        state.pass_writes -= 1;
                    } else if state.fail_writes > 0 {
                        state.fail_writes -= 1;
                        return Err(VirtualBusError(ErrorKind::Other));
                    }
                    trace!("virtual i2c write 0x{:02X}: {:02X?}", address, bytes);
                    state.writes.push(BusWrite {
                        address,
                        bytes: bytes.to_vec(),
                    });
                }
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// Inspection and fault injection for a [`VirtualBus`]
#[derive(Clone)]
pub struct VirtualBusHandle {
    state: Rc<RefCell<BusState>>,
}

impl VirtualBusHandle {
    /// All writes in order
    pub fn writes(&self) -> Vec<BusWrite> {
        self.state.borrow().writes.clone()
    }

    /// All written bytes flattened in order
    pub fn bytes(&self) -> Vec<u8> {
        self.state
            .borrow()
            .writes
            .iter()
            .flat_map(|w| w.bytes.iter().copied())
            .collect()
    }

    /// Number of writes seen so far
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    /// Forget recorded writes
    pub fn clear(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Fail the next `count` writes
    pub fn fail_next_writes(&self, count: u32) {
        self.fail_writes_after(0, count);
    }

    /// Let `pass` writes through, then fail the following `count`
    pub fn fail_writes_after(&self, pass: u32, count: u32) {
        let mut state = self.state.borrow_mut();
        state.pass_writes = pass;
        state.fail_writes = count;
    }
}

#[derive(Debug, Default)]
struct DelayState {
    calls: u32,
    total_ns: u64,
}

/// Delay provider that records requested waits without sleeping
#[derive(Default)]
pub struct VirtualDelay {
    state: Rc<RefCell<DelayState>>,
}

impl VirtualDelay {
    /// Create a delay with an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle for inspecting recorded waits
    pub fn handle(&self) -> VirtualDelayHandle {
        VirtualDelayHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        state.total_ns += ns as u64;
    }
}

/// Inspection for a [`VirtualDelay`]
#[derive(Clone)]
pub struct VirtualDelayHandle {
    state: Rc<RefCell<DelayState>>,
}

impl VirtualDelayHandle {
    /// Sum of all requested waits in nanoseconds
    pub fn total_ns(&self) -> u64 {
        self.state.borrow().total_ns
    }

    /// Number of delay calls
    pub fn calls(&self) -> u32 {
        self.state.borrow().calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_records_writes() {
        let mut bus = VirtualBus::new();
        let handle = bus.handle();

        bus.write(0x21, &[0x3F]).unwrap();
        bus.write(0x21, &[0x40]).unwrap();

        assert_eq!(handle.bytes(), vec![0x3F, 0x40]);
        assert_eq!(
            handle.writes()[0],
            BusWrite {
                address: 0x21,
                bytes: vec![0x3F]
            }
        );
    }

    #[test]
    fn test_bus_fault_injection() {
        let mut bus = VirtualBus::new();
        let handle = bus.handle();
        handle.fail_next_writes(1);

        assert!(bus.write(0x21, &[0x3F]).is_err());
        assert!(bus.write(0x21, &[0x3F]).is_ok());
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn test_bus_fault_after_passing_writes() {
        let mut bus = VirtualBus::new();
        let handle = bus.handle();
        handle.fail_writes_after(1, 1);

        assert!(bus.write(0x21, &[0x3F]).is_ok());
        assert!(bus.write(0x21, &[0x60]).is_err());
        assert!(bus.write(0x21, &[0x60]).is_ok());
        assert_eq!(handle.bytes(), vec![0x3F, 0x60]);
    }

    #[test]
    fn test_delay_records() {
        let mut delay = VirtualDelay::new();
        let handle = delay.handle();

        delay.delay_us(600);

        assert!(handle.calls() >= 1);
        assert_eq!(handle.total_ns(), 600_000);
    }
}
