use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use teamlist_core::utils::truncate_string;
use teamlist_core::{Member, SortOrder};

use crate::app::{App, AppState};
use crate::ui::styles;

/// Longest email shown in the table before truncating
const EMAIL_COLUMN_CHARS: usize = 28;

/// Render the roster tab - member table with a detail panel
pub fn render_roster(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_member_table(frame, app, chunks[0]);
    render_member_detail(frame, app.selected_member(), chunks[1]);
}

fn render_member_table(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = app.visible_rows();
    let focused = matches!(app.state, AppState::Normal | AppState::Searching);

    let name_header = match app.list.sort_order() {
        SortOrder::FirstName => "Name ▲",
        SortOrder::LastName => "Name (last, first) ▲",
    };
    let header = Row::new(vec![
        Cell::from(name_header),
        Cell::from("Gr"),
        Cell::from("Subteam"),
        Cell::from("Event"),
        Cell::from("Email"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = rows_data
        .iter()
        .enumerate()
        .map(|(i, (_, member))| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(display_name(member, app.list.sort_order())),
                Cell::from(format!("{:>2}", member.grade()))
                    .style(styles::grade_style(member.grade())),
                Cell::from(member.subteam().to_string()),
                Cell::from(member.event_id().to_string()),
                Cell::from(truncate_string(member.email(), EMAIL_COLUMN_CHARS)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Length(3),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Fill(3),
    ];

    let title = if app.search_query.is_empty() {
        format!(
            " Members ({} of {}) ",
            rows_data.len(),
            app.list.len()
        )
    } else {
        format!(" Search results ({}) ", rows_data.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !rows_data.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn display_name(member: &Member, order: SortOrder) -> String {
    match order {
        SortOrder::FirstName => member.full_name(),
        SortOrder::LastName => format!("{}, {}", member.last_name(), member.first_name()),
    }
}

fn render_member_detail(frame: &mut Frame, selected: Option<&Member>, area: Rect) {
    let placeholder = "-";
    let or_placeholder = |s: &str| {
        if s.is_empty() {
            placeholder.to_string()
        } else {
            s.to_string()
        }
    };

    let lines = match selected {
        Some(member) => vec![
            Line::from(Span::styled(member.full_name(), styles::title_style())),
            Line::from(""),
            detail_line("Email", or_placeholder(member.email()), styles::list_item_style()),
            detail_line(
                "Grade",
                member.grade().to_string(),
                styles::grade_style(member.grade()),
            ),
            detail_line("Subteam", or_placeholder(member.subteam()), styles::list_item_style()),
            detail_line("Event", or_placeholder(member.event_id()), styles::list_item_style()),
        ],
        None => vec![Line::from(Span::styled(
            "No member selected",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Details ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

fn detail_line(label: &'static str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<9}", label), styles::muted_style()),
        Span::styled(value, value_style),
    ])
}
