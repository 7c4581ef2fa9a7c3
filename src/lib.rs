#![deny(clippy::all)]

//! Automatic gain control and voice activity detection over libspeexdsp.
//!
//! [`AutomaticGainControl`] owns one native preprocessor, serializes every
//! call behind its own lock and validates configuration before the engine
//! sees it. The library is loaded once per process on first construction.

#[cfg(feature = "node")]
#[macro_use]
extern crate napi_derive;

pub mod agc;
pub mod agc_config;
pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod speex;
pub mod validate;

#[cfg(feature = "node")]
pub mod node;

#[cfg(test)]
mod testing;

pub use crate::agc::AutomaticGainControl;
pub use crate::backend::{Backend, Metric};
pub use crate::bootstrap::LoadState;
pub use crate::error::{AgcError, Result};
pub use crate::speex::SpeexDsp;
pub use crate::validate::Param;
