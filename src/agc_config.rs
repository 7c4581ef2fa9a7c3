// AGC Configuration Constants
// Parameter ranges and the defaults libspeexdsp reports for a fresh preprocessor.

/// Target linear PCM amplitude range (inclusive)
pub const TARGET_MIN: i32 = 1;
pub const TARGET_MAX: i32 = 32768;

/// Construction arguments are handed to the engine as C `int`
pub const MAX_FRAME_SIZE: usize = i32::MAX as usize;
pub const MAX_SAMPLE_RATE: u32 = i32::MAX as u32;

/// VAD probabilities are percentages (inclusive)
pub const VAD_PROB_MIN: i32 = 0;
pub const VAD_PROB_MAX: i32 = 100;

/// Engine defaults, as reported by speex_preprocess_state_init
pub const DEFAULT_TARGET: i32 = 8000;
pub const DEFAULT_MAX_GAIN: i32 = 30; // dB
pub const DEFAULT_INCREMENT: i32 = 12; // dB/s
pub const DEFAULT_DECREMENT: i32 = -40; // dB/s
pub const DEFAULT_VAD_PROB_START: i32 = 35;
pub const DEFAULT_VAD_PROB_CONTINUE: i32 = 20;

/// Explicit path to libspeexdsp, bypassing the platform default names
pub const LIBRARY_PATH_ENV: &str = "SPEEXDSP_LIBRARY";

/// Library names tried in order on ELF platforms
pub const ELF_LIBRARY_NAMES: &[&str] = &["libspeexdsp.so.1", "libspeexdsp.so"];

/// Library names tried in order on macOS
pub const MACHO_LIBRARY_NAMES: &[&str] = &["libspeexdsp.1.dylib", "libspeexdsp.dylib"];

/// Library names tried in order on Windows
pub const PE_LIBRARY_NAMES: &[&str] = &["libspeexdsp-1.dll", "libspeexdsp.dll"];

/// Architectures a prebuilt libspeexdsp exists for
pub const SUPPORTED_ARCHS: &[&str] = &["x86", "x86_64", "arm", "aarch64"];
