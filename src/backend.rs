// Native Engine Binding
//
// The narrow call surface every AGC engine exposes. Implementations do no
// validation and no locking: `AutomaticGainControl` owns both concerns.

use crate::error::Result;
use crate::validate::Param;

/// Read-only values the engine reports about its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Current loudness estimate (linear amplitude)
    Loudness,
    /// Gain currently applied, in dB
    Gain,
}

/// A loadable AGC engine.
///
/// `Instance` is the opaque per-handle engine state. It is moved into
/// `destroy` exactly once, so it must not be `Clone` or `Copy`.
pub trait Backend: Sync + 'static {
    type Instance: Send;

    /// Load the engine for this process, or replay the cached outcome.
    fn ensure_loaded() -> Result<&'static Self>;

    fn create(&self, frame_size: usize, sample_rate: u32) -> Result<Self::Instance>;

    fn get(&self, instance: &mut Self::Instance, param: Param) -> Result<i32>;

    fn set(&self, instance: &mut Self::Instance, param: Param, value: i32) -> Result<()>;

    fn metric(&self, instance: &mut Self::Instance, metric: Metric) -> Result<i32>;

    /// Process one frame in place. Returns true when voice was detected.
    ///
    /// `frame.len()` always equals the `frame_size` passed to `create`.
    fn run(&self, instance: &mut Self::Instance, frame: &mut [i16]) -> Result<bool>;

    fn destroy(&self, instance: Self::Instance);
}
