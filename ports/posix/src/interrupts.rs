//! Simulated interrupt controller.
//!
//! Handlers run on whichever thread calls [`SimInterrupts::raise`], one at a
//! time, which models a single interrupt context.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use systime_hal::{HalError, HalResult, InterruptController, InterruptPriority, IsrHandler};

/// Number of interrupt sources.
pub const MAX_IRQ: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Vector {
    handler: IsrHandler,
    priority: InterruptPriority,
    arg: usize,
    enabled: bool,
}

/// Handle to a simulated interrupt controller; clones share one vector table.
#[derive(Debug, Clone)]
pub struct SimInterrupts {
    table: Arc<Mutex<[Option<Vector>; MAX_IRQ]>>,
    context: Arc<Mutex<()>>,
}

impl SimInterrupts {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new([None; MAX_IRQ])),
            context: Arc::new(Mutex::new(())),
        }
    }

    fn table(&self) -> MutexGuard<'_, [Option<Vector>; MAX_IRQ]> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(irq_num: u32) -> HalResult<usize> {
        let idx = irq_num as usize;
        if idx < MAX_IRQ {
            Ok(idx)
        } else {
            Err(HalError::InvalidParameter)
        }
    }

    /// Runs the handler of `irq_num` if it is installed and enabled.
    ///
    /// Returns whether a handler ran.
    pub fn raise(&self, irq_num: u32) -> bool {
        let vector = match Self::slot(irq_num) {
            Ok(idx) => self.table()[idx],
            Err(_) => None,
        };
        match vector {
            Some(vector) if vector.enabled => {
                let _context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
                (vector.handler)(vector.arg);
                true
            }
            _ => false,
        }
    }

    /// Priority `irq_num` was installed at.
    pub fn priority(&self, irq_num: u32) -> Option<InterruptPriority> {
        let idx = Self::slot(irq_num).ok()?;
        self.table()[idx].map(|vector| vector.priority)
    }

    pub fn is_enabled(&self, irq_num: u32) -> bool {
        Self::slot(irq_num)
            .ok()
            .and_then(|idx| self.table()[idx])
            .is_some_and(|vector| vector.enabled)
    }

    fn set_enabled(&mut self, irq_num: u32, enabled: bool) -> HalResult<()> {
        let idx = Self::slot(irq_num)?;
        let mut table = self.table();
        let vector = table[idx].as_mut().ok_or(HalError::InvalidParameter)?;
        vector.enabled = enabled;
        Ok(())
    }
}

impl Default for SimInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for SimInterrupts {
    fn install(
        &mut self,
        irq_num: u32,
        handler: IsrHandler,
        priority: InterruptPriority,
        arg: usize,
    ) -> HalResult<()> {
        let idx = Self::slot(irq_num)?;
        if priority == 0 {
            return Err(HalError::InvalidParameter);
        }
        let mut table = self.table();
        if table[idx].is_some() {
            return Err(HalError::Busy);
        }
        table[idx] = Some(Vector {
            handler,
            priority,
            arg,
            enabled: false,
        });
        log::debug!("irq {} installed at priority {}", irq_num, priority);
        Ok(())
    }

    fn enable_interrupt(&mut self, irq_num: u32) -> HalResult<()> {
        self.set_enabled(irq_num, true)
    }

    fn disable_interrupt(&mut self, irq_num: u32) -> HalResult<()> {
        self.set_enabled(irq_num, false)
    }
}
