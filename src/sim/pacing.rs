use std::thread;
use std::time::Duration;

/// Wall-clock gap between cycles. Has no effect on simulated time.
pub trait Pacer {
    fn pace(&self);
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Pacer for FixedDelay {
    fn pace(&self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pace(&self) {}
}
