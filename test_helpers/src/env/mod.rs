//! Helpers for safely mutating environment variables in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns an RAII guard
//! that restores the previous state when dropped. [`build_script`] sets the
//! pair of variables the builder generator reads and keeps the lock held
//! until the guard is dropped, so generator tests never observe each
//! other's paths.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("KEY", "VALUE");
//! // `KEY` is set to `VALUE` for the duration of the guard.
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Variable holding the crate root in a build script.
pub const MANIFEST_DIR: &str = "CARGO_MANIFEST_DIR";

/// Variable holding the build script's output directory.
pub const OUT_DIR: &str = "OUT_DIR";

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        if let Some(val) = self.original.take() {
            // SAFETY: `ENV_MUTEX` is held during restoration.
            unsafe { env::set_var(&self.key, val) };
        } else {
            // SAFETY: `ENV_MUTEX` is held during restoration.
            unsafe { env::remove_var(&self.key) };
        }
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::set_var("FOO", "bar");
/// assert!(matches!(std::env::var("FOO"), Ok(ref value) if value == "bar"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Removes an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::remove_var("FOO");
/// assert!(std::env::var("FOO").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Build-script variables held for the lifetime of the guard.
///
/// The environment lock stays held, so another test cannot swap the paths
/// while a generator pass reads them. Fields drop in declaration order, so
/// the variables are restored before the lock is released.
#[must_use = "dropping restores the prior build-script environment"]
pub struct BuildScriptEnv {
    _out_dir: EnvVarGuard,
    _manifest_dir: EnvVarGuard,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for BuildScriptEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildScriptEnv").finish_non_exhaustive()
    }
}

/// Points `CARGO_MANIFEST_DIR` and `OUT_DIR` at the given directories.
///
/// # Examples
/// ```
/// use test_helpers::env;
///
/// let _env = env::build_script("/tmp/crate", "/tmp/crate/out");
/// assert_eq!(std::env::var(env::OUT_DIR).as_deref(), Ok("/tmp/crate/out"));
/// ```
pub fn build_script(
    manifest_dir: impl AsRef<OsStr>,
    out_dir: impl AsRef<OsStr>,
) -> BuildScriptEnv {
    let lock = ENV_MUTEX.lock();
    BuildScriptEnv {
        _manifest_dir: set_var(MANIFEST_DIR, manifest_dir),
        _out_dir: set_var(OUT_DIR, out_dir),
        _lock: lock,
    }
}

/// Run a closure while holding the global environment lock.
///
/// # Examples
/// ```
/// use test_helpers::env;
///
/// env::with_lock(|| {
///     let _guard = env::set_var("KEY", "VALUE");
/// });
/// ```
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}
