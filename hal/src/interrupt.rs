//! Interrupt controller abstraction

use crate::error::HalResult;

/// Interrupt priority (0 = lowest, service requests need a non-zero level)
pub type InterruptPriority = u8;

/// Interrupt service routine. The argument is the context value supplied at
/// installation time.
pub type IsrHandler = fn(usize);

/// Interrupt controller abstraction
pub trait InterruptController {
    /// Bind `handler` to `irq_num` at `priority`; `arg` is passed to every call.
    fn install(
        &mut self,
        irq_num: u32,
        handler: IsrHandler,
        priority: InterruptPriority,
        arg: usize,
    ) -> HalResult<()>;

    /// Enable interrupt
    fn enable_interrupt(&mut self, irq_num: u32) -> HalResult<()>;

    /// Disable interrupt
    fn disable_interrupt(&mut self, irq_num: u32) -> HalResult<()>;
}
