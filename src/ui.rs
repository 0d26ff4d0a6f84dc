//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the track grid, the persistent now-playing pill and
//! the modal detail view using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, PlaybackState};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::surface::{PlayerSurface, format_clock, format_clock_opt};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected track".to_string());
    map.insert("o".to_string(), "open details".to_string());
    map.insert("n".to_string(), "details for now playing".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("esc".to_string(), "close details".to_string());
    // h/l is filled dynamically from config.
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "enter", "o", "n", "space/p", "h/l", "esc", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compose elapsed/total/remaining time text per `UiSettings`.
fn time_text(elapsed: f64, total: Option<f64>, ui: &UiSettings) -> Option<String> {
    if ui.time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_clock(elapsed)),
            TimeField::Total => parts.push(format_clock_opt(total)),
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_clock((t - elapsed).max(0.0))));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    surface: Option<&PlayerSurface>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" juke ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Track grid
    {
        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = app.tracks.len();
        let list_height = chunks[1].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let i = start + offset;
                let marker = if app.current == Some(i) { "♪ " } else { "  " };
                let line = if track.description.is_empty() {
                    format!("{marker}{}", track.title)
                } else {
                    format!("{marker}{} - {}", track.title, track.description)
                };
                ListItem::new(line)
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Now-playing pill: always visible, whatever the detail view does.
    {
        let pill = match app.current_track() {
            Some(track) => {
                let mut state_txt = "";
                let mut elapsed = 0.0;
                let mut error: Option<String> = None;
                if let Some(ref h) = app.playback_handle {
                    if let Ok(info) = h.lock() {
                        state_txt = if info.playing { "playing" } else { "paused" };
                        elapsed = info.elapsed.as_secs_f64();
                        error = info.load_error.clone();
                    }
                }
                if let Some(total) = track.duration_secs() {
                    elapsed = elapsed.min(total);
                }

                if let Some(err) = error {
                    format!("Now playing: {} [load failed: {err}]", track.title)
                } else {
                    let time = time_text(elapsed, track.duration_secs(), ui_settings);
                    match time {
                        Some(time) => {
                            format!("Now playing: {} [{state_txt}] {time}", track.title)
                        }
                        None => format!("Now playing: {} [{state_txt}]", track.title),
                    }
                }
            }
            None => "Now playing: (nothing yet, press enter on a track)".to_string(),
        };

        let pill_par = Paragraph::new(pill)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .padding(Padding {
                        left: 1,
                        right: 1,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" now playing "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(pill_par, chunks[2]);
    }

    // Detail view popup (keeps the grid visible under it)
    if let (Some(track), Some(surface)) = (app.open_track(), surface) {
        let list_area = chunks[1];
        let popup_area = centered_rect_sized(64, 12, list_area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding {
                left: 1,
                right: 1,
                top: 0,
                bottom: 0,
            })
            .title(" details (esc closes) ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let playing = app.playback == PlaybackState::Playing;
        let state_line = if playing { "playing" } else { "paused" };
        let info = format!(
            "{}\n{}\nartwork: {}\nstate: {state_line}",
            track.title,
            track.description,
            track.artwork.as_deref().unwrap_or("-"),
        );
        let info_par = Paragraph::new(info).wrap(Wrap { trim: true });
        frame.render_widget(info_par, rows[0]);

        // Scrubber, bound to the catalog duration. Indeterminate when the
        // catalog has no duration for this track.
        let label = if surface.can_scrub() {
            format_clock(surface.elapsed_secs())
        } else {
            "--:--".to_string()
        };
        let gauge = Gauge::default()
            .ratio(surface.ratio())
            .label(label)
            .gauge_style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(gauge, rows[1]);

        let time_line = time_text(
            surface.elapsed_secs(),
            surface.duration_secs(),
            ui_settings,
        )
        .unwrap_or_default();
        let time_par = Paragraph::new(time_line).alignment(Alignment::Right).dim();
        frame.render_widget(time_par, rows[2]);
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
