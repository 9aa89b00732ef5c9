//! UI rendering for the TUI.

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::app::{App, ConfirmAction, ListEntry, Mode};
use crate::scanner::format_size;

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Listing
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_listing(app, frame, chunks[1]);
    render_footer(app, frame, chunks[2]);

    match app.mode {
        Mode::Confirm(action) => render_confirm_dialog(app, frame, action),
        Mode::Help => render_help_overlay(frame),
        Mode::Normal => {}
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let size_display = app
        .current_size()
        .map(format_size)
        .unwrap_or_else(|| "...".to_string());

    let header_text = format!(" {}  {}", app.current.display(), size_display);

    let block = Block::default()
        .title(" dirsize ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(header_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn render_listing(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if app.entries.is_empty() {
        let message = if app.current_size().is_none() {
            "No data"
        } else {
            "Empty directory"
        };

        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));

        frame.render_widget(paragraph, area);
        return;
    }

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // entries are sorted, so the first one is the largest
    let max_size = app.entries.first().map(|e| e.size).unwrap_or(0);
    let visible_height = inner_area.height as usize;
    let scroll_offset = calculate_scroll_offset(app.selected, visible_height, app.entries.len());

    for (i, entry) in app
        .entries
        .iter()
        .skip(scroll_offset)
        .take(visible_height)
        .enumerate()
    {
        let row = Rect::new(inner_area.x, inner_area.y + i as u16, inner_area.width, 1);
        let is_selected = scroll_offset + i == app.selected;
        frame.render_widget(Paragraph::new(entry_line(entry, row.width, max_size, is_selected)), row);
    }
}

fn calculate_scroll_offset(selected: usize, visible_height: usize, total: usize) -> usize {
    if total <= visible_height {
        return 0;
    }

    let padding = 3.min(visible_height / 4);
    let last_window = total - visible_height;

    if selected < padding {
        0
    } else {
        // never scroll past the last full window
        selected.saturating_sub(padding).min(last_window)
    }
}

/// Get color for size display based on relative size.
/// Green for small entries, red for large entries.
fn size_color(size: u64, max_size: u64) -> Color {
    if max_size == 0 {
        return Color::Gray;
    }

    let ratio = size as f64 / max_size as f64;

    if ratio < 0.25 {
        Color::Green
    } else if ratio < 0.50 {
        Color::Yellow
    } else if ratio < 0.75 {
        Color::Rgb(255, 165, 0) // Orange
    } else {
        Color::Red
    }
}

fn entry_line(entry: &ListEntry, width: u16, max_size: u64, is_selected: bool) -> Line<'static> {
    let icon = if entry.kind.is_dir() { "► " } else { "  " };

    let bar_width = 10;
    let fill = if max_size > 0 {
        (((entry.size as f64 / max_size as f64) * bar_width as f64) as usize).min(bar_width)
    } else {
        0
    };
    let bar_filled = "█".repeat(fill);
    let bar_empty = "░".repeat(bar_width - fill);

    // widest output is "1023.99 Bytes"
    let size_width = 13;
    let size_str = format!("{:>width$}", format_size(entry.size), width = size_width);

    let prefix_len = icon.chars().count();
    let suffix_len = (bar_width + 2) + size_width + 2;
    let name_width = (width as usize).saturating_sub(prefix_len + suffix_len);

    let name_char_count = entry.name.chars().count();
    let display_name = if name_char_count > name_width && name_width > 1 {
        let truncated: String = entry.name.chars().take(name_width - 1).collect();
        format!("{}…", truncated)
    } else {
        entry.name.clone()
    };
    let padding = " ".repeat(name_width.saturating_sub(display_name.chars().count()));

    let name_style = if entry.kind.is_dir() {
        Style::default().fg(Color::Blue).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let size_style = Style::default().fg(size_color(entry.size, max_size));

    let line = Line::from(vec![
        Span::styled(icon, name_style),
        Span::styled(display_name, name_style),
        Span::raw(padding),
        Span::raw(" "),
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled(bar_filled, size_style),
        Span::styled(bar_empty, Style::default().fg(Color::DarkGray)),
        Span::styled("]", Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(size_str, size_style),
    ]);

    if is_selected {
        line.style(Style::default().bg(Color::DarkGray))
    } else {
        line
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.mode {
        Mode::Normal => "[↑↓] Navigate  [→] Open  [←] Up  [d] Delete  [r] Rescan  [?] Help  [q] Quit",
        Mode::Confirm(_) => "[y] Yes  [n] No",
        Mode::Help => "[Esc] Close",
    };

    let text = app.status_message.as_deref().unwrap_or(hints);

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_confirm_dialog(app: &App, frame: &mut Frame, action: ConfirmAction) {
    let area = frame.area();

    let dialog_width = 50u16.min(area.width.saturating_sub(4));
    let dialog_height = 7u16;
    let dialog_area = Rect {
        x: (area.width.saturating_sub(dialog_width)) / 2,
        y: (area.height.saturating_sub(dialog_height)) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    frame.render_widget(Clear, dialog_area);

    let (title, message) = match action {
        ConfirmAction::Delete => {
            let (path, size) = app
                .selected_entry()
                .map(|e| (shorten(&e.path.display().to_string(), 35), format_size(e.size)))
                .unwrap_or_default();
            (
                " Delete ",
                format!("Delete '{}'?\n\nSize: {}\n\n[y]es  [n]o", path, size),
            )
        }
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, dialog_area);
}

/// Keep the tail of `text` within `max` characters.
fn shorten(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}

fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let help_width = 60u16.min(area.width.saturating_sub(8));
    let help_height = 18u16.min(area.height.saturating_sub(4));
    let help_area = Rect {
        x: (area.width.saturating_sub(help_width)) / 2,
        y: (area.height.saturating_sub(help_height)) / 2,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let help_text = r#"
 NAVIGATION
 ─────────────────────────────────
 ↑/k        Move up
 ↓/j        Move down
 →/l/Enter  Open directory
 ←/h/Bksp   Go to parent
 g / G      Go to top / bottom

 ACTIONS
 ─────────────────────────────────
 d/Del      Delete selected
 r          Rescan from disk
 ?          Toggle this help
 q/Esc      Quit
"#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, help_area);
}
