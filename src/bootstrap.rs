// Library Bootstrap
//
// Process-wide, load-once native library state. The first caller performs the
// load while concurrent callers block on the cell; afterwards the outcome,
// success or failure, is replayed verbatim. Loading is never retried.

use std::env;
use std::ffi::OsString;

use anyhow::Context;
use libloading::Library;
use once_cell::sync::OnceCell;

use crate::agc_config::{
    ELF_LIBRARY_NAMES, LIBRARY_PATH_ENV, MACHO_LIBRARY_NAMES, PE_LIBRARY_NAMES, SUPPORTED_ARCHS,
};
use crate::error::{AgcError, Result};

/// Observable state of a [`Bootstrap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed(AgcError),
}

/// Lazily initialized, immutable-after-resolution load outcome.
pub struct Bootstrap<T> {
    outcome: OnceCell<Result<T>>,
}

impl<T> Bootstrap<T> {
    pub const fn new() -> Self {
        Self {
            outcome: OnceCell::new(),
        }
    }

    /// Run `load` on the first call only; every call returns its outcome.
    pub fn ensure_loaded<F>(&self, load: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        let outcome = self.outcome.get_or_init(|| {
            let result = load();
            if let Err(ref e) = result {
                tracing::error!(error = %e, "native library unavailable, caching failure");
            }
            result
        });
        match outcome {
            Ok(value) => Ok(value),
            Err(e) => Err(e.clone()),
        }
    }

    pub fn state(&self) -> LoadState {
        match self.outcome.get() {
            None => LoadState::Unloaded,
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(e)) => LoadState::Failed(e.clone()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(_)))
    }
}

impl<T> Default for Bootstrap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Library file names for an os/arch pair, most specific first.
pub fn platform_library_names(os: &str, arch: &str) -> Result<&'static [&'static str]> {
    if !SUPPORTED_ARCHS.contains(&arch) {
        return Err(AgcError::UnknownPlatform(format!("{}-{}", os, arch)));
    }
    match os {
        "linux" | "android" | "freebsd" => Ok(ELF_LIBRARY_NAMES),
        "macos" => Ok(MACHO_LIBRARY_NAMES),
        "windows" => Ok(PE_LIBRARY_NAMES),
        _ => Err(AgcError::UnknownPlatform(format!("{}-{}", os, arch))),
    }
}

/// Candidates to hand to the dynamic loader for the running process.
///
/// An explicit `SPEEXDSP_LIBRARY` path wins over the platform defaults.
pub fn library_candidates() -> Result<Vec<OsString>> {
    if let Some(path) = env::var_os(LIBRARY_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(vec![path]);
    }
    let names = platform_library_names(env::consts::OS, env::consts::ARCH)?;
    Ok(names.iter().map(OsString::from).collect())
}

/// Open the first candidate the dynamic loader accepts.
pub fn open_first(candidates: &[OsString]) -> Result<Library> {
    let mut last_error = None;
    for candidate in candidates {
        match open(candidate) {
            Ok(lib) => {
                tracing::debug!(library = ?candidate, "loaded native library");
                return Ok(lib);
            }
            Err(e) => {
                tracing::warn!(library = ?candidate, error = %format!("{:#}", e), "library candidate failed");
                last_error = Some(e);
            }
        }
    }
    Err(match last_error {
        Some(e) => AgcError::LoadIo(format!("{:#}", e)),
        None => AgcError::LoadIo("no library candidates".to_string()),
    })
}

fn open(candidate: &OsString) -> anyhow::Result<Library> {
    // Safety: libspeexdsp has no load-time initializers with preconditions.
    unsafe { Library::new(candidate) }.with_context(|| format!("opening {:?}", candidate))
}
