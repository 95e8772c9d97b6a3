//! Launch-at-login registration.

use anyhow::{bail, Context, Result};
use auto_launch::{AutoLaunch, AutoLaunchBuilder};

use crate::config::ExecutionMode;

const APP_NAME: &str = "rest-reminder";
/// Argument the OS passes when it starts the app at login.
pub const HIDDEN_ARG: &str = "--hidden";

/// OS-side registry of applications started at user login.
pub trait LoginItems {
    fn is_enabled(&self) -> Result<bool>;
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;
}

impl<L: LoginItems + ?Sized> LoginItems for Box<L> {
    fn is_enabled(&self) -> Result<bool> {
        (**self).is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        (**self).set_enabled(enabled)
    }
}

/// Registers the running executable through the `auto-launch` crate.
pub struct SystemLoginItems {
    inner: AutoLaunch,
}

impl SystemLoginItems {
    pub fn new(open_as_hidden: bool) -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate current executable")?;
        let exe = exe.to_string_lossy().into_owned();
        let args: &[&str] = if open_as_hidden { &[HIDDEN_ARG] } else { &[] };

        let inner = AutoLaunchBuilder::new()
            .set_app_name(APP_NAME)
            .set_app_path(&exe)
            .set_args(args)
            .set_use_launch_agent(true)
            .build()
            .context("Failed to configure login item")?;

        Ok(Self { inner })
    }
}

impl LoginItems for SystemLoginItems {
    fn is_enabled(&self) -> Result<bool> {
        self.inner
            .is_enabled()
            .context("Failed to read login item state")
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.inner.enable().context("Failed to enable login item")
        } else {
            self.inner.disable().context("Failed to disable login item")
        }
    }
}

/// Fallback used when the platform registry cannot be set up at all.
/// Nothing is ever registered, so it reports disabled and rejects writes.
#[derive(Debug, Default)]
pub struct DetachedLoginItems;

impl LoginItems for DetachedLoginItems {
    fn is_enabled(&self) -> Result<bool> {
        Ok(false)
    }

    fn set_enabled(&mut self, _enabled: bool) -> Result<()> {
        bail!("login items are unavailable on this system")
    }
}

/// Keeps the in-memory auto-launch flag and decides whether writes reach
/// the OS. In development mode the OS registry is read once at startup and
/// never written.
pub struct LoginItemAdapter<L> {
    backend: L,
    mode: ExecutionMode,
    cached: bool,
}

impl<L: LoginItems> LoginItemAdapter<L> {
    pub fn new(backend: L, mode: ExecutionMode) -> Self {
        let cached = backend.is_enabled().unwrap_or_else(|e| {
            tracing::warn!(event = "reminder.login_item.read_failed", error = %e);
            false
        });
        Self {
            backend,
            mode,
            cached,
        }
    }

    /// Current flag. Production re-reads the OS; development returns the
    /// in-memory copy.
    pub fn get(&mut self) -> bool {
        if self.mode.is_development() {
            return self.cached;
        }
        match self.backend.is_enabled() {
            Ok(enabled) => self.cached = enabled,
            Err(e) => {
                tracing::warn!(
                    event = "reminder.login_item.read_failed",
                    error = %e,
                    cached = self.cached
                );
            }
        }
        self.cached
    }

    pub fn set(&mut self, enabled: bool) {
        if self.mode.is_development() {
            tracing::debug!(
                event = "reminder.login_item.skipped",
                enabled,
                reason = "development mode"
            );
            self.cached = enabled;
            return;
        }

        match self.backend.set_enabled(enabled) {
            Ok(()) => {
                tracing::info!(event = "reminder.login_item.updated", enabled);
                self.cached = enabled;
            }
            Err(e) => {
                tracing::error!(event = "reminder.login_item.write_failed", enabled, error = %e);
            }
        }
    }

    /// Last known flag without consulting the OS.
    pub fn cached(&self) -> bool {
        self.cached
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[cfg(test)]
    pub fn backend(&self) -> &L {
        &self.backend
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeLoginItems;
    use super::*;

    #[test]
    fn production_toggle_round_trips_os_state() {
        let mut adapter =
            LoginItemAdapter::new(FakeLoginItems::with_state(false), ExecutionMode::Production);
        let original = adapter.get();

        adapter.set(!original);
        assert_eq!(adapter.get(), !original);
        adapter.set(original);

        assert_eq!(adapter.get(), original);
        assert!(!adapter.backend().enabled);
        assert_eq!(adapter.backend().writes, vec![true, false]);
    }

    #[test]
    fn development_mode_never_writes_to_os() {
        let mut adapter =
            LoginItemAdapter::new(FakeLoginItems::with_state(false), ExecutionMode::Development);

        adapter.set(true);

        assert!(adapter.get());
        assert!(adapter.backend().writes.is_empty());
        assert!(!adapter.backend().enabled);
    }

    #[test]
    fn read_failure_keeps_cached_flag() {
        let mut adapter =
            LoginItemAdapter::new(FakeLoginItems::with_state(true), ExecutionMode::Production);
        assert!(adapter.get());

        adapter.backend.fail_reads = true;

        assert!(adapter.get());
    }

    #[test]
    fn write_failure_leaves_flag_unchanged() {
        let mut backend = FakeLoginItems::with_state(false);
        backend.fail_writes = true;
        let mut adapter = LoginItemAdapter::new(backend, ExecutionMode::Production);

        adapter.set(true);

        assert!(!adapter.get());
    }

    #[test]
    fn detached_registry_stays_disabled() {
        let mut adapter = LoginItemAdapter::new(DetachedLoginItems, ExecutionMode::Production);

        adapter.set(true);

        assert!(!adapter.get());
        assert!(!adapter.cached());
    }

    #[test]
    fn detached_registry_still_toggles_in_development() {
        let mut adapter = LoginItemAdapter::new(DetachedLoginItems, ExecutionMode::Development);

        adapter.set(true);

        assert!(adapter.get());
    }
}
