//! Theme coordinator
//!
//! Owns the user's theme preference, keeps it persisted, and republishes a
//! freshly derived [`ResolvedTheme`] whenever the preference or (in `auto`
//! mode) the OS dark-mode signal changes.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::core::schedule::{TaskHandle, TimerSlot};
use crate::core::storage::PreferenceStore;
use crate::error::Result;
use crate::theme::derive::{ResolvedTheme, ThemePreference};
use crate::theme::system::ColorSchemeSignal;

/// Storage key holding the JSON-serialized preference
pub const THEME_STORAGE_KEY: &str = "theme-choice";

/// Theme state holder
pub struct ThemeCoordinator {
    store: Arc<dyn PreferenceStore>,
    signal: ColorSchemeSignal,
    preference: Arc<Mutex<ThemePreference>>,
    theme_tx: Arc<watch::Sender<ResolvedTheme>>,
    /// OS signal listener, occupied only while the background is `auto`
    listener: TimerSlot,
}

impl ThemeCoordinator {
    /// Load the stored preference and derive the initial theme.
    ///
    /// Never fails: an unreadable or malformed preference falls back to the
    /// default triple. Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn PreferenceStore>, signal: ColorSchemeSignal) -> Self {
        let preference = load_preference(store.as_ref());
        let initial = ResolvedTheme::from_preference(&preference, signal.is_dark());
        let (theme_tx, _rx) = watch::channel(initial);

        let coordinator = Self {
            store,
            signal,
            preference: Arc::new(Mutex::new(preference)),
            theme_tx: Arc::new(theme_tx),
            listener: TimerSlot::new(),
        };

        if preference.follows_system() {
            coordinator.attach_listener(|| {});
        }

        coordinator
    }

    /// Currently resolved theme
    pub fn theme(&self) -> ResolvedTheme {
        self.theme_tx.borrow().clone()
    }

    /// Current preference triple
    pub fn preference(&self) -> ThemePreference {
        *self.preference.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Receive every republished theme
    pub fn subscribe(&self) -> watch::Receiver<ResolvedTheme> {
        self.theme_tx.subscribe()
    }

    /// The OS signal this coordinator reads in `auto` mode
    pub fn signal(&self) -> &ColorSchemeSignal {
        &self.signal
    }

    /// Whether the OS listener is currently registered
    pub fn is_listening(&self) -> bool {
        self.listener.is_occupied()
    }

    /// Persist a new preference and republish the derived theme.
    ///
    /// The store write happens first; if it fails nothing changes.
    pub fn set_preference(&mut self, preference: ThemePreference) -> Result<()> {
        self.store.set_json(THEME_STORAGE_KEY, &preference)?;

        // Runs under the listener slot's lock so an in-flight OS update
        // cannot land after it.
        let publish = || {
            *self.preference.lock().unwrap_or_else(|e| e.into_inner()) = preference;
            self.theme_tx
                .send_replace(ResolvedTheme::from_preference(&preference, self.signal.is_dark()));
        };

        match (preference.follows_system(), self.is_listening()) {
            (true, false) => self.attach_listener(publish),
            (false, true) => self.detach_listener(publish),
            _ => self.listener.locked(publish),
        }

        tracing::debug!(
            "Theme preference set to {}/{}/{}",
            preference.background,
            preference.primary,
            preference.secondary
        );
        Ok(())
    }

    /// Restore the default preference
    pub fn reset(&mut self) -> Result<()> {
        self.set_preference(ThemePreference::default())
    }

    /// Release the OS listener. Also happens on drop.
    pub fn shutdown(&mut self) {
        if self.is_listening() {
            self.detach_listener(|| {});
        }
    }

    fn attach_listener(&self, publish: impl FnOnce()) {
        let mut rx = self.signal.subscribe();
        let preference = Arc::clone(&self.preference);
        let theme_tx = Arc::clone(&self.theme_tx);

        self.listener.replace(publish, |ticket| {
            TaskHandle::spawn(move |_| async move {
                while rx.changed().await.is_ok() {
                    let is_dark = *rx.borrow_and_update();
                    let published = ticket.run_if_current(|| {
                        let current = *preference.lock().unwrap_or_else(|e| e.into_inner());
                        theme_tx.send_replace(ResolvedTheme::from_preference(&current, is_dark));
                    });
                    if published.is_none() {
                        break;
                    }
                }
            })
        });
        tracing::debug!("Listening for OS color scheme changes");
    }

    fn detach_listener(&self, publish: impl FnOnce()) {
        self.listener.clear(publish);
        tracing::debug!("Stopped listening for OS color scheme changes");
    }
}

/// Read the stored preference, falling back to the default triple
pub fn load_preference(store: &dyn PreferenceStore) -> ThemePreference {
    match store.get_json::<ThemePreference>(THEME_STORAGE_KEY) {
        Ok(Some(preference)) => preference,
        Ok(None) => ThemePreference::default(),
        Err(e) => {
            tracing::warn!("Using default theme, stored preference unreadable: {}", e);
            ThemePreference::default()
        }
    }
}
