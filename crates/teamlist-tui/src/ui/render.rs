use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use teamlist_core::roster::MIN_SEARCH_QUERY_LENGTH;

use crate::app::{App, AppState, FormField};

use super::roster;
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Sort, filters and search
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_view_bar(frame, app, chunks[1]);
    roster::render_roster(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::AddingMember => render_form_overlay(frame, app),
        AppState::PickingFilter => render_filter_overlay(frame, app),
        AppState::EnteringImportPath => render_import_overlay(frame, app),
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  teamlist";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

/// Sort order, active filter chain and search query
fn render_view_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Sort: ", styles::muted_style()),
        Span::styled(app.list.sort_order().to_string(), styles::highlight_style()),
        Span::styled(" | Filters: ", styles::muted_style()),
    ];

    let filters = app.list.active_filters();
    if filters.is_empty() {
        spans.push(Span::styled("none", styles::muted_style()));
    } else {
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" + ", styles::muted_style()));
            }
            spans.push(Span::styled(format!(" {} ", filter), styles::filter_chip_style()));
        }
    }

    let searching = matches!(app.state, AppState::Searching);
    if searching || !app.search_query.is_empty() {
        let cursor = if searching { "▌" } else { "" };
        spans.push(Span::styled(" | Search: ", styles::muted_style()));
        spans.push(Span::styled(
            format!("{}{}", app.search_query, cursor),
            styles::search_style(),
        ));
        if app.search_query.chars().count() < MIN_SEARCH_QUERY_LENGTH {
            spans.push(Span::styled(
                format!("  (at least {} characters)", MIN_SEARCH_QUERY_LENGTH),
                styles::muted_style(),
            ));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[a]dd [d]elete [f]ilter [s]ort [w]rite | [q]uit";

    let (left_text, left_style) = if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::muted_style())
    } else if app.dirty {
        (format!(" {} ", app.saved_display()), styles::unsaved_style())
    } else {
        (format!(" {} ", app.saved_display()), styles::saved_style())
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::list_item_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  teamlist  version {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓ j/k", "Navigate list"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("Home/End", "First/last member"),
        Line::from(""),
        Line::from(Span::styled(" Roster", styles::highlight_style())),
        help_line("a", "Add a member"),
        help_line("d / Del", "Delete selected member"),
        help_line("s", "Sort by first/last name"),
        help_line("/", "Search name, email, event"),
        help_line("Esc", "Clear search"),
        help_line("f", "Narrow by grade or subteam"),
        help_line("r", "Reset filters"),
        Line::from(""),
        Line::from(Span::styled(" Files", styles::highlight_style())),
        help_line("i", "Import members from CSV"),
        help_line("w", "Write roster to storage file"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(help_text).block(overlay_block(" Help ")), area);
}

fn render_quit_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
    ];
    if app.dirty {
        lines.push(Line::from(Span::styled(
            "   The roster has unsaved changes.",
            styles::error_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" quit  ", styles::muted_style()),
        Span::styled("[W]", styles::help_key_style()),
        Span::styled(" save & quit  ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(overlay_block(" Quit ")), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .selected_member()
        .map(|m| m.full_name())
        .unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("   Delete ", styles::highlight_style()),
            Span::styled(name, styles::title_style()),
            Span::styled("?", styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block(" Delete ")), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let height = if app.form.error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(52, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = app.form.focus == field;
        let style = styles::form_field_style(focused);
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>10}: [", field.label()), styles::muted_style()),
            Span::styled(format!("{:<28}{}", app.form.value(field), cursor), style),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [Tab]", styles::help_key_style()),
        Span::styled(" next  ", styles::muted_style()),
        Span::styled("[Enter]", styles::help_key_style()),
        Span::styled(" add  ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    if let Some(ref error) = app.form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(overlay_block(" Add member ")), area);
}

fn render_filter_overlay(frame: &mut Frame, app: &App) {
    let options = app.filter_options();
    let height = (options.len() as u16).saturating_add(4);
    let area = centered_rect_fixed(40, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(Span::styled(
        " Narrow the current view by:",
        styles::muted_style(),
    ))];
    for (i, option) in options.iter().enumerate() {
        let style = if i == app.filter_selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(Span::styled(format!("   {}", option), style)));
    }

    frame.render_widget(Paragraph::new(lines).block(overlay_block(" Filter ")), area);
}

fn render_import_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  CSV file to import:",
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            format!("  {}▌", app.import_path),
            styles::search_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Enter]", styles::help_key_style()),
            Span::styled(" import  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block(" Import ")), area);
}

fn overlay_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use teamlist_core::{Member, RecordList};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_app() -> App {
        let mut list = RecordList::new();
        list.add_member(Member::new("Alice", "Smith", "a@x.com", 10, "Finance", "BFS"));
        list.add_member(Member::new("Bob", "Jones", "b@x.com", 11, "Marketing", "FTDM"));
        App::new(Config::default(), list)
    }

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(40, 10, outer), Rect::new(30, 15, 40, 10));
        // Clamped to the available area
        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect_fixed(40, 10, small), Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_render_roster_rows() {
        let app = sample_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Alice Smith"));
        assert!(text.contains("Bob Jones"));
        assert!(text.contains("Members (2 of 2)"));
    }

    #[test]
    fn test_status_bar_shows_save_state_without_message() {
        let mut app = sample_app();
        app.status_message = Some("Added Carl Diaz".to_string());
        app.dirty = true;
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Added Carl Diaz"));

        app.clear_status();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Unsaved changes"));
        assert!(!text.contains("Added Carl Diaz"));
    }

    #[test]
    fn test_render_filter_chain_and_overlay() {
        let mut app = sample_app();
        app.list.filter_by_grade(10);
        app.start_picking_filter();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Grade 10"));
        assert!(text.contains("No subteam"));
        assert!(text.contains("Members (1 of 2)"));
    }
}
