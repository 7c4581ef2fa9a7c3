// Automatic Gain Control Handle
//
// Owns exactly one engine instance. Every operation takes the handle's own
// lock for its full duration, so calls on one handle never interleave while
// separate handles run in parallel. Closing drops the instance and is final.

use parking_lot::Mutex;

use crate::agc_config::{MAX_FRAME_SIZE, MAX_SAMPLE_RATE};
use crate::backend::{Backend, Metric};
use crate::error::{AgcError, Result};
use crate::speex::SpeexDsp;
use crate::validate::{validate, Param};

/// Stateful AGC + VAD over a native engine.
///
/// `instance` is `None` once closed; that is the only state transition.
pub struct AutomaticGainControl<B: Backend = SpeexDsp> {
    backend: &'static B,
    instance: Mutex<Option<B::Instance>>,
    frame_size: usize,
    sample_rate: u32,
}

impl AutomaticGainControl<SpeexDsp> {
    /// Create an AGC backed by libspeexdsp, loading the library on first use.
    pub fn new(frame_size: usize, sample_rate: u32) -> Result<Self> {
        Self::with_backend(frame_size, sample_rate)
    }
}

impl<B: Backend> AutomaticGainControl<B> {
    pub fn with_backend(frame_size: usize, sample_rate: u32) -> Result<Self> {
        if !(1..=MAX_FRAME_SIZE).contains(&frame_size) {
            return Err(AgcError::invalid("Invalid frame size (must be 1..2147483647)"));
        }
        if !(1..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(AgcError::invalid("Invalid sample rate (must be 1..2147483647)"));
        }

        let backend = B::ensure_loaded()?;
        let instance = backend.create(frame_size, sample_rate)?;
        tracing::debug!(frame_size, sample_rate, "AGC created");

        Ok(Self {
            backend,
            instance: Mutex::new(Some(instance)),
            frame_size,
            sample_rate,
        })
    }

    /// Run `op` on the live instance under the handle lock.
    fn with_instance<T>(&self, op: impl FnOnce(&B, &mut B::Instance) -> Result<T>) -> Result<T> {
        let mut guard = self.instance.lock();
        match guard.as_mut() {
            Some(instance) => op(self.backend, instance),
            None => Err(AgcError::ClosedHandle),
        }
    }

    /// Validate, then forward to the engine. Rejected values never take the lock.
    pub fn set_param(&self, param: Param, value: i32) -> Result<()> {
        validate(param, value)?;
        self.with_instance(|backend, instance| backend.set(instance, param, value))
    }

    pub fn get_param(&self, param: Param) -> Result<i32> {
        self.with_instance(|backend, instance| backend.get(instance, param))
    }

    /// Target linear PCM amplitude (1..32768)
    pub fn set_target(&self, target: i32) -> Result<()> {
        self.set_param(Param::Target, target)
    }

    pub fn get_target(&self) -> Result<i32> {
        self.get_param(Param::Target)
    }

    /// Maximum gain that may be applied, in dB (>= 0)
    pub fn set_max_gain(&self, max_gain: i32) -> Result<()> {
        self.set_param(Param::MaxGain, max_gain)
    }

    pub fn get_max_gain(&self) -> Result<i32> {
        self.get_param(Param::MaxGain)
    }

    /// Maximum gain increase in dB/second (>= 0)
    pub fn set_increment(&self, increment: i32) -> Result<()> {
        self.set_param(Param::Increment, increment)
    }

    pub fn get_increment(&self) -> Result<i32> {
        self.get_param(Param::Increment)
    }

    /// Maximum gain decrease in dB/second (<= 0)
    pub fn set_decrement(&self, decrement: i32) -> Result<()> {
        self.set_param(Param::Decrement, decrement)
    }

    pub fn get_decrement(&self) -> Result<i32> {
        self.get_param(Param::Decrement)
    }

    /// Speech probability (%) needed to enter the speech state (0..100)
    pub fn set_vad_prob_start(&self, prob: i32) -> Result<()> {
        self.set_param(Param::VadProbStart, prob)
    }

    pub fn get_vad_prob_start(&self) -> Result<i32> {
        self.get_param(Param::VadProbStart)
    }

    /// Speech probability (%) needed to stay in the speech state (0..100)
    pub fn set_vad_prob_continue(&self, prob: i32) -> Result<()> {
        self.set_param(Param::VadProbContinue, prob)
    }

    pub fn get_vad_prob_continue(&self) -> Result<i32> {
        self.get_param(Param::VadProbContinue)
    }

    /// Current loudness estimate of the engine
    pub fn loudness(&self) -> Result<i32> {
        self.with_instance(|backend, instance| backend.metric(instance, Metric::Loudness))
    }

    /// Gain currently applied, in dB
    pub fn gain(&self) -> Result<i32> {
        self.with_instance(|backend, instance| backend.metric(instance, Metric::Gain))
    }

    /// Adjust the gain of one frame in place.
    ///
    /// The frame must hold exactly `frame_size` samples. Returns true when
    /// voice activity was detected.
    pub fn process(&self, frame: &mut [i16]) -> Result<bool> {
        self.with_instance(|backend, instance| {
            if frame.len() != self.frame_size {
                return Err(AgcError::LengthMismatch {
                    expected: self.frame_size,
                    actual: frame.len(),
                });
            }
            backend.run(instance, frame)
        })
    }

    /// Destroy the engine instance. Further calls are no-ops.
    pub fn close(&self) {
        let instance = self.instance.lock().take();
        self.release(instance);
    }

    fn release(&self, instance: Option<B::Instance>) {
        if let Some(instance) = instance {
            self.backend.destroy(instance);
            tracing::debug!(frame_size = self.frame_size, "AGC closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.instance.lock().is_none()
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl<B: Backend> Drop for AutomaticGainControl<B> {
    fn drop(&mut self) {
        let instance = self.instance.get_mut().take();
        self.release(instance);
    }
}
