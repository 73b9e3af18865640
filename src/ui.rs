use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use crate::app::{AppMode, SessionState, ViewScreen};
use crate::catalog::Catalog;
use crate::constants::constants;

// --- Theme ---

struct Theme {
  fg: Color,
  muted: Color,
  accent: Color,
  border: Color,
  busy: Color,
  highlight_fg: Color,
  highlight_bg: Color,
  key_fg: Color,
  key_bg: Color,
}

const THEME: Theme = Theme {
  fg: Color::Rgb(220, 220, 220),
  muted: Color::Rgb(130, 130, 140),
  accent: Color::Rgb(255, 92, 92),
  border: Color::Rgb(80, 80, 90),
  busy: Color::Rgb(240, 190, 80),
  highlight_fg: Color::Rgb(20, 20, 20),
  highlight_bg: Color::Rgb(255, 92, 92),
  key_fg: Color::Rgb(20, 20, 20),
  key_bg: Color::Rgb(130, 130, 140),
};

const COMMAND_HELP: [(&str, &str); 4] = [
  ("/new <url>", "Register a YouTube video"),
  ("/view", "Browse saved videos"),
  ("/help", "Show commands"),
  ("/quit", "Exit"),
];

// --- Helpers ---

/// Truncate `s` to `max_width` terminal columns, appending "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
  let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
  if width <= max_width {
    return s.to_string();
  }
  let budget = max_width.saturating_sub(1);
  let mut used = 0;
  let mut out = String::new();
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > budget {
      break;
    }
    used += w;
    out.push(c);
  }
  out.push('…');
  out
}

fn rounded(title: &str, focused: bool) -> Block<'_> {
  let color = if focused { THEME.accent } else { THEME.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(color))
}

// --- UI Rendering ---

/// Draw one frame from the session state. Reads only; never mutates the session.
pub fn ui(frame: &mut Frame, state: &SessionState, catalog: &Catalog) {
  let [header_area, help_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(COMMAND_HELP.len() as u16 + 2),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, state, header_area);
  render_help(frame, help_area);
  render_main(frame, state, catalog, main_area);
  render_status(frame, state, status_area);
  render_input(frame, state, input_area);
  render_footer(frame, state, footer_area);
}

fn render_header(frame: &mut Frame, state: &SessionState, area: Rect) {
  let title_style = Style::default().fg(THEME.accent).add_modifier(Modifier::BOLD);
  let mut spans = vec![Span::styled(format!(" ▶ {} ", constants().app_name), title_style)];
  if state.busy {
    spans.push(Span::styled("[BUSY]", Style::default().fg(THEME.busy).add_modifier(Modifier::BOLD)));
  }
  frame.render_widget(Line::from(spans), area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(THEME.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_help(frame: &mut Frame, area: Rect) {
  let lines: Vec<Line> = COMMAND_HELP
    .iter()
    .map(|(cmd, desc)| {
      Line::from(vec![
        Span::styled(format!("{cmd:<12}"), Style::default().fg(THEME.accent)),
        Span::styled(*desc, Style::default().fg(THEME.muted)),
      ])
    })
    .collect();
  let paragraph = Paragraph::new(lines).block(rounded(" Commands ", false).padding(Padding::horizontal(1)));
  frame.render_widget(paragraph, area);
}

fn render_main(frame: &mut Frame, state: &SessionState, catalog: &Catalog, area: Rect) {
  let [list_area, detail_area] =
    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
  render_videos(frame, state, catalog, list_area);
  render_components(frame, state, catalog, detail_area);
}

fn render_videos(frame: &mut Frame, state: &SessionState, catalog: &Catalog, area: Rect) {
  let focused = state.mode == AppMode::View(ViewScreen::List);
  let block = rounded(" Videos ", focused);

  if catalog.is_empty() {
    let empty = Paragraph::new(Line::from(Span::styled("  (no videos yet)", Style::default().fg(THEME.muted))));
    frame.render_widget(empty.block(block), area);
    return;
  }

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = catalog
    .all()
    .iter()
    .enumerate()
    .map(|(i, video)| {
      let label = format!("{}. {}", i + 1, video.title);
      ListItem::new(Line::from(Span::styled(truncate_str(&label, inner_w), Style::default().fg(THEME.fg))))
    })
    .collect();

  let highlight = if focused {
    Style::default().fg(THEME.highlight_fg).bg(THEME.highlight_bg).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(THEME.accent)
  };
  let list = List::new(items).block(block).highlight_symbol("▶ ").highlight_style(highlight);
  let mut list_state = ListState::default().with_selected(Some(state.selected_video.min(catalog.len() - 1)));
  frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_components(frame: &mut Frame, state: &SessionState, catalog: &Catalog, area: Rect) {
  let focused = state.mode == AppMode::View(ViewScreen::Components);
  let block = rounded(" Components ", focused);

  let Some(video) = catalog.get(state.selected_video) else {
    let hint = Line::from(Span::styled("  Select a video with /view", Style::default().fg(THEME.muted)));
    let hint = Paragraph::new(hint);
    frame.render_widget(hint.block(block), area);
    return;
  };

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = Catalog::component_rows_for(video)
    .iter()
    .map(|row| {
      let label = format!("{:<10}", row.label());
      // The record row is multi-line JSON; show it flattened.
      let value = row.value.split_whitespace().collect::<Vec<_>>().join(" ");
      let value = truncate_str(&value, inner_w.saturating_sub(label.chars().count()));
      ListItem::new(Line::from(vec![
        Span::styled(label, Style::default().fg(THEME.muted)),
        Span::styled(value, Style::default().fg(THEME.fg)),
      ]))
    })
    .collect();

  let mut list = List::new(items).block(block);
  let mut list_state = ListState::default();
  if focused {
    list = list
      .highlight_symbol("▶ ")
      .highlight_style(Style::default().fg(THEME.highlight_fg).bg(THEME.highlight_bg).add_modifier(Modifier::BOLD));
    list_state.select(Some(state.selected_component));
  }
  frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_status(frame: &mut Frame, state: &SessionState, area: Rect) {
  let (text, style) = if state.busy {
    (format!(" ⏳ {}", state.status), Style::default().fg(THEME.busy))
  } else {
    (format!(" {}", state.status), Style::default().fg(THEME.fg))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, state: &SessionState, area: Rect) {
  let (title, text) = match state.mode {
    AppMode::PromptUrl => (" YouTube URL ", &state.url_input),
    AppMode::Command | AppMode::View(_) => (" Input ", &state.command_input),
  };
  let editing = matches!(state.mode, AppMode::Command | AppMode::PromptUrl);
  let block = rounded(title, editing).padding(Padding::horizontal(1));

  // Keep the tail of long input visible.
  let inner_w = area.width.saturating_sub(4) as usize;
  let mut visible: Vec<char> = Vec::new();
  let mut used = 0;
  for c in text.chars().rev() {
    let w = c.width().unwrap_or(0);
    if used + w >= inner_w {
      break;
    }
    used += w;
    visible.push(c);
  }
  let visible: String = visible.into_iter().rev().collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(THEME.fg)).block(block), area);
  if editing {
    frame.set_cursor_position((area.x + 2 + used as u16, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, state: &SessionState, area: Rect) {
  let keys: &[(&str, &str)] = match state.mode {
    AppMode::Command => &[("Enter", "Run"), ("Esc", "Clear"), ("^c", "Quit")],
    AppMode::PromptUrl => &[("Enter", "Register"), ("Esc", "Cancel"), ("^c", "Quit")],
    AppMode::View(ViewScreen::List) => &[("↑/↓", "Navigate"), ("Enter", "Open"), ("Esc/q", "Back")],
    AppMode::View(ViewScreen::Components) => &[("↑/↓", "Navigate"), ("Enter", "Copy"), ("Esc/q", "Back")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {key} "), Style::default().fg(THEME.key_fg).bg(THEME.key_bg)),
        Span::styled(format!(" {action} "), Style::default().fg(THEME.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();
  frame.render_widget(Line::from(spans), area);
}
