// In-process engines for exercising handle semantics without libspeexdsp.

use std::cell::Cell;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::agc_config::{
    DEFAULT_DECREMENT, DEFAULT_INCREMENT, DEFAULT_MAX_GAIN, DEFAULT_TARGET,
    DEFAULT_VAD_PROB_CONTINUE, DEFAULT_VAD_PROB_START,
};
use crate::backend::{Backend, Metric};
use crate::error::{AgcError, Result};
use crate::validate::Param;

thread_local! {
    static DESTROYED: Cell<usize> = const { Cell::new(0) };
}

/// Instances destroyed on the current thread
pub fn destroyed_on_this_thread() -> usize {
    DESTROYED.with(|d| d.get())
}

/// Serializes tests that touch `SPEEXDSP_LIBRARY`
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `key` set to `value`, restoring the previous value afterwards.
pub fn with_env_var<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock();
    let previous: Option<OsString> = std::env::var_os(key);
    std::env::set_var(key, value);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    match previous {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// In-memory log sink for a test-local tracing subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Run `f` with debug-level events on this thread written into the capture.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Behaves like a default-configured preprocessor: reports the engine
/// defaults and applies a fixed 2x gain with naive energy-based VAD.
pub struct FakeEngine;

pub struct FakeState {
    frame_size: usize,
    values: [i32; 6],
}

static FAKE: FakeEngine = FakeEngine;

fn slot(param: Param) -> usize {
    match param {
        Param::Target => 0,
        Param::MaxGain => 1,
        Param::Increment => 2,
        Param::Decrement => 3,
        Param::VadProbStart => 4,
        Param::VadProbContinue => 5,
    }
}

impl Backend for FakeEngine {
    type Instance = FakeState;

    fn ensure_loaded() -> Result<&'static Self> {
        Ok(&FAKE)
    }

    fn create(&self, frame_size: usize, _sample_rate: u32) -> Result<FakeState> {
        Ok(FakeState {
            frame_size,
            values: [
                DEFAULT_TARGET,
                DEFAULT_MAX_GAIN,
                DEFAULT_INCREMENT,
                DEFAULT_DECREMENT,
                DEFAULT_VAD_PROB_START,
                DEFAULT_VAD_PROB_CONTINUE,
            ],
        })
    }

    fn get(&self, instance: &mut FakeState, param: Param) -> Result<i32> {
        Ok(instance.values[slot(param)])
    }

    fn set(&self, instance: &mut FakeState, param: Param, value: i32) -> Result<()> {
        instance.values[slot(param)] = value;
        Ok(())
    }

    fn metric(&self, _instance: &mut FakeState, metric: Metric) -> Result<i32> {
        Ok(match metric {
            Metric::Loudness => 0,
            Metric::Gain => 6,
        })
    }

    fn run(&self, instance: &mut FakeState, frame: &mut [i16]) -> Result<bool> {
        assert_eq!(frame.len(), instance.frame_size, "engine saw a foreign frame size");
        let mut voice = false;
        for sample in frame.iter_mut() {
            voice |= sample.unsigned_abs() > 1000;
            *sample = sample.saturating_mul(2);
        }
        Ok(voice)
    }

    fn destroy(&self, _instance: FakeState) {
        DESTROYED.with(|d| d.set(d.get() + 1));
    }
}

/// Loads fine but rejects every operation, like an engine out of resources.
pub struct BrokenEngine;

static BROKEN: BrokenEngine = BrokenEngine;

impl Backend for BrokenEngine {
    type Instance = ();

    fn ensure_loaded() -> Result<&'static Self> {
        Ok(&BROKEN)
    }

    fn create(&self, frame_size: usize, _sample_rate: u32) -> Result<()> {
        if frame_size > 4096 {
            return Err(AgcError::NativeCreate("Failed to create preprocessor state".into()));
        }
        Ok(())
    }

    fn get(&self, _instance: &mut (), param: Param) -> Result<i32> {
        Err(AgcError::Native(format!("Failed to get {}", param)))
    }

    fn set(&self, _instance: &mut (), param: Param, _value: i32) -> Result<()> {
        Err(AgcError::Native(format!("Failed to set {}", param)))
    }

    fn metric(&self, _instance: &mut (), metric: Metric) -> Result<i32> {
        let what = match metric {
            Metric::Loudness => "loudness",
            Metric::Gain => "gain",
        };
        Err(AgcError::Native(format!("Failed to get {}", what)))
    }

    fn run(&self, _instance: &mut (), _frame: &mut [i16]) -> Result<bool> {
        Err(AgcError::Native("Failed to process frame".into()))
    }

    fn destroy(&self, _instance: ()) {}
}

/// Never loads, as on a platform without a native build.
pub struct MissingEngine;

impl Backend for MissingEngine {
    type Instance = ();

    fn ensure_loaded() -> Result<&'static Self> {
        Err(AgcError::UnknownPlatform("plan9-mips".into()))
    }

    fn create(&self, _frame_size: usize, _sample_rate: u32) -> Result<()> {
        unreachable!("create before load")
    }

    fn get(&self, _instance: &mut (), _param: Param) -> Result<i32> {
        unreachable!()
    }

    fn set(&self, _instance: &mut (), _param: Param, _value: i32) -> Result<()> {
        unreachable!()
    }

    fn metric(&self, _instance: &mut (), _metric: Metric) -> Result<i32> {
        unreachable!()
    }

    fn run(&self, _instance: &mut (), _frame: &mut [i16]) -> Result<bool> {
        unreachable!()
    }

    fn destroy(&self, _instance: ()) {}
}
