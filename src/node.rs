// ============================================================================
// NODE.JS BINDINGS (napi)
// ============================================================================
//
// JavaScript view of `AutomaticGainControl`. All locking, validation and
// lifecycle rules live in the Rust handle; this layer only converts types.

use napi::bindgen_prelude::*;

use crate::agc::AutomaticGainControl;

#[napi(js_name = "AutomaticGainControl")]
pub struct JsAutomaticGainControl {
    inner: AutomaticGainControl,
}

#[napi]
impl JsAutomaticGainControl {
    #[napi(constructor)]
    pub fn new(frame_size: u32, sample_rate: u32) -> napi::Result<Self> {
        let inner = AutomaticGainControl::new(frame_size as usize, sample_rate)?;
        Ok(JsAutomaticGainControl { inner })
    }

    #[napi]
    pub fn set_target(&self, target: i32) -> napi::Result<()> {
        Ok(self.inner.set_target(target)?)
    }

    #[napi]
    pub fn get_target(&self) -> napi::Result<i32> {
        Ok(self.inner.get_target()?)
    }

    #[napi]
    pub fn set_max_gain(&self, max_gain: i32) -> napi::Result<()> {
        Ok(self.inner.set_max_gain(max_gain)?)
    }

    #[napi]
    pub fn get_max_gain(&self) -> napi::Result<i32> {
        Ok(self.inner.get_max_gain()?)
    }

    #[napi]
    pub fn set_increment(&self, increment: i32) -> napi::Result<()> {
        Ok(self.inner.set_increment(increment)?)
    }

    #[napi]
    pub fn get_increment(&self) -> napi::Result<i32> {
        Ok(self.inner.get_increment()?)
    }

    #[napi]
    pub fn set_decrement(&self, decrement: i32) -> napi::Result<()> {
        Ok(self.inner.set_decrement(decrement)?)
    }

    #[napi]
    pub fn get_decrement(&self) -> napi::Result<i32> {
        Ok(self.inner.get_decrement()?)
    }

    #[napi]
    pub fn set_vad_prob_start(&self, prob: i32) -> napi::Result<()> {
        Ok(self.inner.set_vad_prob_start(prob)?)
    }

    #[napi]
    pub fn get_vad_prob_start(&self) -> napi::Result<i32> {
        Ok(self.inner.get_vad_prob_start()?)
    }

    #[napi]
    pub fn set_vad_prob_continue(&self, prob: i32) -> napi::Result<()> {
        Ok(self.inner.set_vad_prob_continue(prob)?)
    }

    #[napi]
    pub fn get_vad_prob_continue(&self) -> napi::Result<i32> {
        Ok(self.inner.get_vad_prob_continue()?)
    }

    #[napi]
    pub fn get_loudness(&self) -> napi::Result<i32> {
        Ok(self.inner.loudness()?)
    }

    #[napi]
    pub fn get_gain(&self) -> napi::Result<i32> {
        Ok(self.inner.gain()?)
    }

    /// Adjusts the gain of `input` in place. Returns true if voice was detected.
    #[napi]
    pub fn agc(&self, mut input: Int16Array) -> napi::Result<bool> {
        Ok(self.inner.process(&mut input)?)
    }

    #[napi]
    pub fn get_frame_size(&self) -> u32 {
        self.inner.frame_size() as u32
    }

    #[napi]
    pub fn get_sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    #[napi]
    pub fn close(&self) {
        self.inner.close();
    }

    #[napi]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
