// libspeexdsp Backend
//
// Resolves the Speex preprocessor entry points at runtime and drives them
// through `speex_preprocess_ctl`. Ownership of each preprocessor state sits
// in a `SpeexState` token that is consumed by `destroy`.

use std::ffi::{c_int, c_void};
use std::ptr::NonNull;

use libloading::Library;

use crate::backend::{Backend, Metric};
use crate::bootstrap::{self, Bootstrap, LoadState};
use crate::error::{AgcError, Result};
use crate::validate::Param;

// speex/speex_preprocess.h request codes
const SET_AGC: c_int = 2;
const SET_VAD: c_int = 4;
const SET_PROB_START: c_int = 14;
const GET_PROB_START: c_int = 15;
const SET_PROB_CONTINUE: c_int = 16;
const GET_PROB_CONTINUE: c_int = 17;
const SET_AGC_INCREMENT: c_int = 26;
const GET_AGC_INCREMENT: c_int = 27;
const SET_AGC_DECREMENT: c_int = 28;
const GET_AGC_DECREMENT: c_int = 29;
const SET_AGC_MAX_GAIN: c_int = 30;
const GET_AGC_MAX_GAIN: c_int = 31;
const GET_AGC_LOUDNESS: c_int = 33;
const GET_AGC_GAIN: c_int = 35;
const SET_AGC_TARGET: c_int = 46;
const GET_AGC_TARGET: c_int = 47;

type InitFn = unsafe extern "C" fn(frame_size: c_int, sampling_rate: c_int) -> *mut c_void;
type DestroyFn = unsafe extern "C" fn(st: *mut c_void);
type RunFn = unsafe extern "C" fn(st: *mut c_void, x: *mut i16) -> c_int;
type CtlFn = unsafe extern "C" fn(st: *mut c_void, request: c_int, ptr: *mut c_void) -> c_int;

static SPEEXDSP: Bootstrap<SpeexDsp> = Bootstrap::new();

/// Entry points of a loaded libspeexdsp.
///
/// The function pointers stay valid because `_library` is never unloaded
/// while the process-wide bootstrap holds this value.
pub struct SpeexDsp {
    init: InitFn,
    destroy: DestroyFn,
    run: RunFn,
    ctl: CtlFn,
    _library: Library,
}

/// One preprocessor state. Not `Clone`: it is destroyed exactly once.
pub struct SpeexState {
    state: NonNull<c_void>,
}

// Safety: the state is only reached through `&mut SpeexState`, which the
// owning handle hands out under its lock.
unsafe impl Send for SpeexState {}

impl SpeexDsp {
    /// Load state of the process-wide libspeexdsp
    pub fn load_state() -> LoadState {
        SPEEXDSP.state()
    }

    fn load() -> Result<Self> {
        let candidates = bootstrap::library_candidates()?;
        let library = bootstrap::open_first(&candidates)?;
        Self::from_library(library)
    }

    fn from_library(library: Library) -> Result<Self> {
        // Safety: signatures match speex/speex_preprocess.h.
        unsafe {
            let init = *library
                .get::<InitFn>(b"speex_preprocess_state_init\0")
                .map_err(missing_symbol)?;
            let destroy = *library
                .get::<DestroyFn>(b"speex_preprocess_state_destroy\0")
                .map_err(missing_symbol)?;
            let run = *library
                .get::<RunFn>(b"speex_preprocess_run\0")
                .map_err(missing_symbol)?;
            let ctl = *library
                .get::<CtlFn>(b"speex_preprocess_ctl\0")
                .map_err(missing_symbol)?;
            Ok(Self {
                init,
                destroy,
                run,
                ctl,
                _library: library,
            })
        }
    }

    fn ctl(&self, state: &mut SpeexState, request: c_int, value: &mut i32) -> c_int {
        // Safety: state is live, every request used here takes a spx_int32_t*.
        unsafe { (self.ctl)(state.state.as_ptr(), request, value as *mut i32 as *mut c_void) }
    }
}

fn missing_symbol(e: libloading::Error) -> AgcError {
    AgcError::LoadIo(format!("missing symbol: {}", e))
}

fn request_codes(param: Param) -> (c_int, c_int) {
    match param {
        Param::Target => (SET_AGC_TARGET, GET_AGC_TARGET),
        Param::MaxGain => (SET_AGC_MAX_GAIN, GET_AGC_MAX_GAIN),
        Param::Increment => (SET_AGC_INCREMENT, GET_AGC_INCREMENT),
        Param::Decrement => (SET_AGC_DECREMENT, GET_AGC_DECREMENT),
        Param::VadProbStart => (SET_PROB_START, GET_PROB_START),
        Param::VadProbContinue => (SET_PROB_CONTINUE, GET_PROB_CONTINUE),
    }
}

impl Backend for SpeexDsp {
    type Instance = SpeexState;

    fn ensure_loaded() -> Result<&'static Self> {
        SPEEXDSP.ensure_loaded(Self::load)
    }

    fn create(&self, frame_size: usize, sample_rate: u32) -> Result<SpeexState> {
        let frame_size = c_int::try_from(frame_size)
            .map_err(|_| AgcError::invalid("Invalid frame size (must be 1..2147483647)"))?;
        let sample_rate = c_int::try_from(sample_rate)
            .map_err(|_| AgcError::invalid("Invalid sample rate (must be 1..2147483647)"))?;

        // Safety: positive sizes were checked by the caller.
        let raw = unsafe { (self.init)(frame_size, sample_rate) };
        let mut state = SpeexState {
            state: NonNull::new(raw)
                .ok_or_else(|| AgcError::NativeCreate("Failed to create preprocessor state".into()))?,
        };

        for (request, what) in [(SET_AGC, "AGC"), (SET_VAD, "VAD")] {
            let mut enabled = 1;
            if self.ctl(&mut state, request, &mut enabled) < 0 {
                self.destroy(state);
                return Err(AgcError::NativeCreate(format!("Failed to enable {}", what)));
            }
        }
        Ok(state)
    }

    fn get(&self, instance: &mut SpeexState, param: Param) -> Result<i32> {
        let (_, get) = request_codes(param);
        let mut value = -1;
        if self.ctl(instance, get, &mut value) < 0 {
            return Err(AgcError::Native(format!("Failed to get {}", param)));
        }
        Ok(value)
    }

    fn set(&self, instance: &mut SpeexState, param: Param, value: i32) -> Result<()> {
        let (set, _) = request_codes(param);
        let mut value = value;
        if self.ctl(instance, set, &mut value) < 0 {
            return Err(AgcError::Native(format!("Failed to set {}", param)));
        }
        Ok(())
    }

    fn metric(&self, instance: &mut SpeexState, metric: Metric) -> Result<i32> {
        let (request, what) = match metric {
            Metric::Loudness => (GET_AGC_LOUDNESS, "loudness"),
            Metric::Gain => (GET_AGC_GAIN, "gain"),
        };
        let mut value = 0;
        if self.ctl(instance, request, &mut value) < 0 {
            return Err(AgcError::Native(format!("Failed to get {}", what)));
        }
        Ok(value)
    }

    fn run(&self, instance: &mut SpeexState, frame: &mut [i16]) -> Result<bool> {
        // Safety: frame holds exactly frame_size samples (checked by the handle)
        // and is only borrowed for the duration of the call.
        let voice = unsafe { (self.run)(instance.state.as_ptr(), frame.as_mut_ptr()) };
        Ok(voice != 0)
    }

    fn destroy(&self, instance: SpeexState) {
        // Safety: consumed by value, so this runs once per state.
        unsafe { (self.destroy)(instance.state.as_ptr()) }
    }
}
