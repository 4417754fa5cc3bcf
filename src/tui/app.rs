//! Main TUI application state and logic

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::alert::{CloseReason, Severity};
use crate::api::{report_fetch_error, ApiClient};
use crate::app::Portal;
use crate::core::config::Config;
use crate::core::schedule::{spawn_delayed, TaskHandle};
use crate::core::storage::{FileStore, PreferenceStore};
use crate::error::{PortalError, Result};
use crate::routes::{Route, HEADER_TABS};
use crate::theme::system::spawn_system_watcher;
use crate::theme::{BackgroundChoice, ColorSchemeSignal, PrimaryHue, SecondaryHue, ThemePreference};
use crate::tui::event::{is_back_key, is_quit_key, AppEvent, EventHandler};
use crate::tui::ui;

/// Length of the countdown started from the UI
const QUIZ_COUNTDOWN: Duration = Duration::from_secs(30);

/// How long a status message stays in the status bar
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// Listing page data loaded
    ListLoaded {
        route: Route,
        items: Vec<ListEntry>,
    },
    /// Listing page fetch failed
    ListError { route: Route, error: PortalError },
    /// Status message expired
    ClearStatus,
}

/// One row of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub title: String,
    pub subtitle: Option<String>,
}

impl ListEntry {
    /// Pick display fields out of an arbitrary API record
    pub fn from_value(value: &Value) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| value.get(*k).and_then(Value::as_str))
                .map(str::to_string)
        };

        let title = field(&["title", "name", "bookName", "question", "heading"])
            .unwrap_or_else(|| {
                let raw = value.to_string();
                raw.chars().take(60).collect()
            });
        let subtitle = field(&["author", "writer", "category", "subject", "company"]);

        Self { title, subtitle }
    }
}

/// State of the listing shown in the body
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub route: Option<Route>,
    pub items: Vec<ListEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Popup currently on top of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Theme,
    Notifications,
    Goto,
}

/// List selection state
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total items in the list
    pub total: usize,
}

impl ListState {
    pub fn new(total: usize) -> Self {
        Self { selected: 0, total }
    }

    pub fn next(&mut self) {
        if self.total > 0 {
            self.selected = (self.selected + 1) % self.total;
        }
    }

    pub fn previous(&mut self) {
        if self.total > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.total - 1);
        }
    }
}

/// Main application state
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Portal state: theme, alerts, countdown, notifications, routing
    pub portal: Portal,
    /// Status message to display
    pub status_message: Option<String>,
    /// Popup on top of the page
    pub overlay: Overlay,
    /// Tick counter for the loading spinner
    pub tick_counter: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Page data
    // ─────────────────────────────────────────────────────────────────────────
    /// Listing page contents
    pub listing: Listing,
    /// Listing selection
    pub list_selection: ListState,

    // ─────────────────────────────────────────────────────────────────────────
    // Dialog selections
    // ─────────────────────────────────────────────────────────────────────────
    /// Row in the theme dialog (background, primary, secondary)
    pub theme_selection: ListState,
    /// Row in the notifications dialog
    pub notification_selection: ListState,
    /// Row in the go-to-page dialog
    pub goto_selection: ListState,

    // ─────────────────────────────────────────────────────────────────────────
    // Async communication
    // ─────────────────────────────────────────────────────────────────────────
    /// Sender for async messages (cloned into tasks)
    pub async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async messages
    pub async_rx: mpsc::Receiver<AsyncMessage>,

    api: ApiClient,
    status_timer: Option<TaskHandle>,
    system_watcher: Option<TaskHandle>,
}

impl App {
    /// Create the app with the on-disk preference store and the live OS signal
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn PreferenceStore> = Arc::new(FileStore::open_default()?);
        let signal = ColorSchemeSignal::detect().await;
        let mut app = Self::with_parts(&config, store, signal.clone())?;
        app.system_watcher = Some(spawn_system_watcher(signal, config.color_scheme_poll()));
        Ok(app)
    }

    /// Create the app from explicit parts. Must be called inside a tokio runtime.
    pub fn with_parts(
        config: &Config,
        store: Arc<dyn PreferenceStore>,
        signal: ColorSchemeSignal,
    ) -> Result<Self> {
        let (async_tx, async_rx) = mpsc::channel(32);
        let portal = Portal::new(store, signal);
        let notification_total = portal.notifications().len();

        let mut app = Self {
            running: true,
            portal,
            status_message: None,
            overlay: Overlay::None,
            tick_counter: 0,
            listing: Listing::default(),
            list_selection: ListState::default(),
            theme_selection: ListState::new(3),
            notification_selection: ListState::new(notification_total),
            goto_selection: ListState::new(Route::all().len()),
            async_tx,
            async_rx,
            api: ApiClient::new(config)?,
            status_timer: None,
            system_watcher: None,
        };
        app.load_page();
        Ok(app)
    }

    /// Setup terminal for TUI mode
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| PortalError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| PortalError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| PortalError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| PortalError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| PortalError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| PortalError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let mut events = EventHandler::new(Duration::from_millis(250));

        let result = self.event_loop(&mut terminal, &mut events).await;

        self.shutdown();
        Self::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        events: &mut EventHandler,
    ) -> Result<()> {
        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| PortalError::Terminal(e.to_string()))?;

            // Check for async messages (non-blocking)
            while let Ok(msg) = self.async_rx.try_recv() {
                self.handle_async_message(msg);
            }

            match events.next().await {
                Some(AppEvent::Key(key)) => self.handle_key_event(key),
                Some(AppEvent::Resize(_, _)) => {}
                Some(AppEvent::Tick) => self.on_tick(),
                None => self.running = false,
            }
        }
        Ok(())
    }

    /// Release background tasks and portal timers
    pub fn shutdown(&mut self) {
        self.system_watcher = None;
        self.status_timer = None;
        self.portal.shutdown();
    }

    /// Periodic housekeeping
    pub fn on_tick(&mut self) {
        self.tick_counter = self.tick_counter.wrapping_add(1);

        let countdown = self.portal.alert_context().countdown().clone();
        if countdown.state().is_expired {
            countdown.acknowledge_expiry();
            self.portal
                .alert_context()
                .publish("Time is up!", Severity::Warning);
        }
    }

    /// Show a status message that clears itself
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        let tx = self.async_tx.clone();
        self.status_timer = Some(spawn_delayed(STATUS_TIMEOUT, move || {
            let _ = tx.try_send(AsyncMessage::ClearStatus);
        }));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation and data loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Navigate to a path and load its data
    pub fn navigate(&mut self, path: &str) {
        self.portal.navigate(path);
        self.load_page();
    }

    /// Start fetching the current page's collection, if it has one
    fn load_page(&mut self) {
        let route = self.portal.current_route();
        let collection = route.and_then(|r| r.collection());

        self.listing = Listing {
            route,
            items: Vec::new(),
            loading: collection.is_some(),
            error: None,
        };
        self.list_selection = ListState::default();

        let (Some(route), Some(path)) = (route, collection) else {
            return;
        };

        let api = self.api.clone();
        let tx = self.async_tx.clone();
        self.portal
            .alert_context()
            .alerts()
            .spawn_reported(async move {
                let message = match api.get_list::<Value>(path).await {
                    Ok(values) => AsyncMessage::ListLoaded {
                        route,
                        items: values.iter().map(ListEntry::from_value).collect(),
                    },
                    Err(error) => AsyncMessage::ListError { route, error },
                };
                tx.send(message)
                    .await
                    .map_err(|_| PortalError::Task("UI is no longer listening".into()))
            });
    }

    /// Handle async operation results
    pub fn handle_async_message(&mut self, msg: AsyncMessage) {
        match msg {
            AsyncMessage::ListLoaded { route, items } => {
                if self.listing.route != Some(route) {
                    return;
                }
                self.list_selection = ListState::new(items.len());
                self.listing.items = items;
                self.listing.loading = false;
            }
            AsyncMessage::ListError { route, error } => {
                if self.listing.route != Some(route) {
                    return;
                }
                report_fetch_error(&error, self.portal.alert_context().alerts());
                self.listing.loading = false;
                self.listing.error = Some(error.summary());
            }
            AsyncMessage::ClearStatus => {
                self.status_message = None;
            }
        }
    }

    /// Index of the current page in the header tab bar
    pub fn active_tab_index(&self) -> Option<usize> {
        let current = self.portal.current_route()?;
        HEADER_TABS.iter().position(|r| *r == current)
    }

    fn switch_tab(&mut self, forward: bool) {
        let len = HEADER_TABS.len();
        let next = match (self.active_tab_index(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.navigate(HEADER_TABS[next].path());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.overlay {
            Overlay::Help => {
                // Any key dismisses help
                self.overlay = Overlay::None;
                return;
            }
            Overlay::Theme => return self.handle_theme_key(key),
            Overlay::Notifications => return self.handle_notifications_key(key),
            Overlay::Goto => return self.handle_goto_key(key),
            Overlay::None => {}
        }

        if is_quit_key(&key) {
            self.running = false;
            return;
        }

        if is_back_key(&key) {
            self.portal
                .alert_context()
                .alerts()
                .close(CloseReason::Dismissed);
            return;
        }

        let alerts = self.portal.alert_context();
        match key.code {
            KeyCode::Char('?') => self.overlay = Overlay::Help,
            KeyCode::Char('t') => self.overlay = Overlay::Theme,
            KeyCode::Char('n') => self.overlay = Overlay::Notifications,
            KeyCode::Char('g') => self.overlay = Overlay::Goto,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(true),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(false),
            KeyCode::Char('j') | KeyCode::Down => self.list_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.list_selection.previous(),
            KeyCode::Char('r') => self.load_page(),
            KeyCode::Char('c') => {
                alerts.start_in(QUIZ_COUNTDOWN, Route::ShortQuiz);
                self.set_status("Quiz countdown started");
            }
            KeyCode::Char('x') => {
                alerts.stop();
                self.set_status("Countdown stopped");
            }
            KeyCode::Char('o') => {
                if alerts.countdown_state().is_open {
                    self.portal.follow_countdown();
                    self.load_page();
                }
            }
            _ => {}
        }
    }

    fn handle_theme_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('q') => {
                self.overlay = Overlay::None
            }
            KeyCode::Char('j') | KeyCode::Down => self.theme_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.theme_selection.previous(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => self.cycle_theme(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_theme(false),
            KeyCode::Char('r') => {
                if let Err(e) = self.portal.theme_mut().reset() {
                    self.portal.alert_context().publish_error(&e);
                }
            }
            _ => {}
        }
    }

    /// Step the selected theme field to its next or previous value
    fn cycle_theme(&mut self, forward: bool) {
        let current = self.portal.theme().preference();
        let updated = match self.theme_selection.selected {
            0 => ThemePreference {
                background: cycle(BackgroundChoice::all(), current.background, forward),
                ..current
            },
            1 => ThemePreference {
                primary: cycle(PrimaryHue::all(), current.primary, forward),
                ..current
            },
            _ => ThemePreference {
                secondary: cycle(SecondaryHue::all(), current.secondary, forward),
                ..current
            },
        };

        if let Err(e) = self.portal.theme_mut().set_preference(updated) {
            self.portal.alert_context().publish_error(&e);
        }
    }

    fn handle_notifications_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => {
                self.overlay = Overlay::None
            }
            KeyCode::Char('j') | KeyCode::Down => self.notification_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.notification_selection.previous(),
            KeyCode::Char('a') => {
                self.portal.notifications_mut().mark_all_as_seen();
                self.set_status("All notifications marked as read");
            }
            KeyCode::Char(' ') => {
                self.mark_selected_notification();
            }
            KeyCode::Enter => {
                if let Some(url) = self.mark_selected_notification() {
                    self.overlay = Overlay::None;
                    self.navigate(url.path());
                }
            }
            _ => {}
        }
    }

    /// Mark the highlighted notification seen, returning where it links to
    fn mark_selected_notification(&mut self) -> Option<Route> {
        let index = self.notification_selection.selected;
        match self.portal.notifications_mut().mark_as_seen(index) {
            Ok(()) => self.portal.notifications().get(index).map(|n| n.url),
            Err(e) => {
                self.portal.alert_context().publish_error(&e);
                None
            }
        }
    }

    fn handle_goto_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q') => {
                self.overlay = Overlay::None
            }
            KeyCode::Char('j') | KeyCode::Down => self.goto_selection.next(),
            KeyCode::Char('k') | KeyCode::Up => self.goto_selection.previous(),
            KeyCode::Enter => {
                if let Some(route) = Route::all().get(self.goto_selection.selected) {
                    self.overlay = Overlay::None;
                    self.navigate(route.path());
                }
            }
            _ => {}
        }
    }
}

/// Next or previous value in a fixed option list
fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    options[next]
}
