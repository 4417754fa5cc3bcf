//! Main UI renderer

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::routes::{Route, HEADER_TABS};
use crate::tui::app::{App, Overlay};
use crate::tui::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Approximate pixel width of one terminal cell
const CELL_WIDTH_PX: u32 = 8;

/// Breakpoints below `md` get the compact layout
const COMPACT_BREAKPOINTS: [&str; 3] = ["xxs", "xs", "sm"];

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let resolved = app.portal.theme().theme();
    let theme = Theme::from_resolved(&resolved);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let breakpoint = resolved
        .breakpoints
        .key_for_width(u32::from(frame.area().width) * CELL_WIDTH_PX);
    let compact = COMPACT_BREAKPOINTS.contains(&breakpoint);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app, &theme, compact);
    render_content(frame, chunks[1], app, &theme);
    render_status_bar(frame, chunks[2], app, &theme, compact);

    render_countdown(frame, chunks[1], app, &theme);
    render_alert(frame, chunks[1], app, &theme, compact);

    match app.overlay {
        Overlay::None => {}
        Overlay::Help => render_help_overlay(frame, &theme),
        Overlay::Theme => render_theme_dialog(frame, app, &theme),
        Overlay::Notifications => render_notifications_dialog(frame, app, &theme),
        Overlay::Goto => render_goto_dialog(frame, app, &theme),
    }
}

/// Render the header: title, tab bar and unseen badge.
///
/// The compact layout drops the brand and shortens the badge.
fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, compact: bool) {
    let mut spans = if compact {
        vec![Span::raw(" ")]
    } else {
        vec![Span::styled(" eduportal ", theme.header()), Span::raw("│ ")]
    };

    if app.portal.has_header_tabs() {
        let active = app.active_tab_index();
        for (i, route) in HEADER_TABS.iter().enumerate() {
            let style = if Some(i) == active {
                theme.active_tab()
            } else {
                Style::default().fg(theme.text)
            };
            spans.push(Span::styled(format!(" {} ", route.title()), style));
            spans.push(Span::raw(" "));
        }
    } else {
        let title = app
            .portal
            .current_route()
            .map(|r| r.title())
            .unwrap_or("Not Found");
        spans.push(Span::raw(title));
    }

    let unseen = app.portal.notifications().unseen_count();
    if unseen > 0 {
        spans.push(Span::raw("  "));
        let badge = if compact {
            format!(" {} ", unseen)
        } else {
            format!(" {} new ", unseen)
        };
        spans.push(Span::styled(badge, theme.badge()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.primary)),
    );
    frame.render_widget(header, area);
}

/// Render the current page
fn render_content(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    match app.portal.current_route() {
        None => render_not_found(frame, area, app, theme),
        Some(route) if route.collection().is_some() => render_listing(frame, area, app, theme, route),
        Some(Route::Home) => render_home(frame, area, app, theme),
        Some(Route::Profile) => render_profile(frame, area, app, theme),
        Some(route) => {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(route.title(), theme.header())),
                Line::from(""),
                Line::from(Span::styled(route.path(), theme.muted())),
            ])
            .block(Block::default().borders(Borders::NONE));
            frame.render_widget(body, inset(area));
        }
    }
}

fn render_home(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let countdown = app.portal.alert_context().countdown_state();
    let countdown_line = if countdown.is_open {
        format!("Quiz countdown: {}", countdown.remaining_text)
    } else {
        "Press c to start a practice quiz countdown.".to_string()
    };

    let lines = vec![
        Line::from(Span::styled("Welcome to eduportal", theme.header())),
        Line::from(""),
        Line::from("Browse the question bank, PDF books and short quizzes with Tab."),
        Line::from(format!(
            "You have {} unread notification(s). Press n to view them.",
            app.portal.notifications().unseen_count()
        )),
        Line::from(countdown_line),
    ];
    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, inset(area));
}

fn render_profile(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let users = app.portal.user_context();
    let lines = if users.is_logged_in() {
        let user = users.user();
        vec![
            Line::from(Span::styled(user.full_name, theme.header())),
            Line::from(Span::styled(format!("@{}", user.user_name), theme.muted())),
        ]
    } else {
        vec![
            Line::from(Span::styled("Profile", theme.header())),
            Line::from(""),
            Line::from("You are not signed in."),
        ]
    };
    frame.render_widget(Paragraph::new(lines), inset(area));
}

fn render_not_found(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled("404 · Page not found", Style::default().fg(Theme::ERROR))),
        Line::from(""),
        Line::from(format!("There is nothing at /{}.", app.portal.active_tab())),
        Line::from(Span::styled("Press g to pick a page.", theme.muted())),
    ];
    frame.render_widget(Paragraph::new(lines), inset(area));
}

fn render_listing(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, route: Route) {
    let block = Block::default()
        .title(format!(" {} ", route.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary));

    let listing = &app.listing;
    if listing.loading {
        let spinner = SPINNER[(app.tick_counter % SPINNER.len() as u64) as usize];
        let text = Paragraph::new(format!(" {} Loading...", spinner)).block(block);
        frame.render_widget(text, area);
        return;
    }

    if let Some(error) = &listing.error {
        let text = Paragraph::new(vec![
            Line::from(Span::styled(error.as_str(), Style::default().fg(Theme::ERROR))),
            Line::from(Span::styled("Press r to retry.", theme.muted())),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    if listing.items.is_empty() {
        let text = Paragraph::new(Span::styled(" Nothing here yet.", theme.muted())).block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = listing
        .items
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut spans = vec![Span::raw(entry.title.clone())];
            if let Some(subtitle) = &entry.subtitle {
                spans.push(Span::styled(format!("  {}", subtitle), theme.muted()));
            }
            let style = if i == app.list_selection.selected {
                theme.selected()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, compact: bool) {
    let status_text = if let Some(msg) = &app.status_message {
        format!(" {}", msg)
    } else {
        let path = app
            .portal
            .current_route()
            .map(|r| r.path().to_string())
            .unwrap_or_else(|| format!("/{}", app.portal.active_tab()));
        if compact {
            format!(" {} │ ? help ", path)
        } else {
            format!(" {} │ t theme │ n notifications │ ? help ", path)
        }
    };

    let status = Paragraph::new(status_text)
        .style(theme.status_bar())
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, area);
}

/// Countdown surface in the top-right corner of the body
fn render_countdown(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let state = app.portal.alert_context().countdown_state();
    if !state.is_open {
        return;
    }

    let width = 34.min(area.width);
    let popup = Rect::new(area.right().saturating_sub(width), area.y, width, 4.min(area.height));
    let color = if state.is_warning {
        Theme::WARNING
    } else {
        theme.primary
    };

    frame.render_widget(Clear, popup);
    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {}", state.remaining_text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" o: go to {}", state.navigation_target.title()),
            theme.muted(),
        )),
    ])
    .style(theme.popup())
    .block(
        Block::default()
            .title(" Countdown ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(body, popup);
}

/// Alert snackbar along the bottom of the body. Full width when compact.
fn render_alert(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, compact: bool) {
    let state = app.portal.alert_context().alert_state();
    if !state.is_open {
        return;
    }

    let width = if compact {
        area.width
    } else {
        let scaled = u32::from(area.width) * 80 / 100;
        u16::try_from(scaled).unwrap_or(u16::MAX).max(20).min(area.width)
    };
    let height = 3.min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.bottom().saturating_sub(height),
        width,
        height,
    );
    let color = theme.severity(state.severity);

    frame.render_widget(Clear, popup);
    let body = Paragraph::new(state.message)
        .wrap(Wrap { trim: true })
        .style(theme.popup())
        .block(
            Block::default()
                .title(format!(" {} ", state.severity))
                .title_bottom(" Esc to dismiss ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(body, popup);
}

fn render_theme_dialog(frame: &mut Frame, app: &App, theme: &Theme) {
    let popup = centered_rect(frame.area(), 44, 9);
    frame.render_widget(Clear, popup);

    let preference = app.portal.theme().preference();
    let rows = [
        ("Background", preference.background.as_str()),
        ("Primary", preference.primary.as_str()),
        ("Secondary", preference.secondary.as_str()),
    ];

    let mut lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let style = if i == app.theme_selection.selected {
                theme.selected()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("  {:12}", label), style),
                Span::styled(format!("‹ {} ›", value), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  ←/→ change · r reset · Esc close",
        theme.muted(),
    )));

    let dialog = Paragraph::new(lines).style(theme.popup()).block(
        Block::default()
            .title(" Theme ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.secondary)),
    );
    frame.render_widget(dialog, popup);
}

fn render_notifications_dialog(frame: &mut Frame, app: &App, theme: &Theme) {
    let notifications = app.portal.notifications();
    let popup = centered_rect(frame.area(), 72, notifications.len() as u16 + 5);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = notifications
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if item.is_seen { "  " } else { "● " };
            let mut style = if item.is_seen {
                theme.muted()
            } else {
                Style::default()
            };
            if i == app.notification_selection.selected {
                style = theme.selected();
            }
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.secondary)),
                Span::styled(format!("{:8} {}", item.time, item.text), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter open · Space mark read · a mark all read · Esc close",
        theme.muted(),
    )));

    let dialog = Paragraph::new(lines).style(theme.popup()).block(
        Block::default()
            .title(format!(" Notifications ({} new) ", notifications.unseen_count()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary)),
    );
    frame.render_widget(dialog, popup);
}

fn render_goto_dialog(frame: &mut Frame, app: &App, theme: &Theme) {
    let popup = centered_rect(frame.area(), 44, Route::all().len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = Route::all()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let style = if i == app.goto_selection.selected {
                theme.selected()
            } else if route.is_mounted() {
                Style::default()
            } else {
                theme.muted()
            };
            ListItem::new(format!(" {:22} {}", route.title(), route.path())).style(style)
        })
        .collect();

    let list = List::new(items).style(theme.popup()).block(
        Block::default()
            .title(" Go to page ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary)),
    );
    frame.render_widget(list, popup);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, theme: &Theme) {
    let help_lines = [
        ("Tab / ←→", "Switch header tab"),
        ("g", "Go to any page"),
        ("j / k", "Move selection"),
        ("r", "Reload page"),
        ("t", "Theme settings"),
        ("n", "Notifications"),
        ("c", "Start quiz countdown"),
        ("x", "Stop countdown"),
        ("o", "Follow countdown link"),
        ("Esc", "Dismiss alert"),
        ("q", "Quit"),
    ];

    let popup = centered_rect(frame.area(), 50, help_lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(theme.primary)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text).style(theme.popup()).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.secondary)),
    );
    frame.render_widget(help, popup);
}

/// Fixed-size rectangle centered in `area`, clamped to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn inset(area: Rect) -> Rect {
    area.inner(Margin {
        horizontal: 2,
        vertical: 1,
    })
}
