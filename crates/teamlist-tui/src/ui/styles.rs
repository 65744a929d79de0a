use ratatui::style::{Color, Modifier, Style};

// Palette
pub const BLUE: Color = Color::Rgb(70, 130, 200);
pub const GREEN: Color = Color::Rgb(100, 170, 100);
pub const AMBER: Color = Color::Rgb(210, 170, 60);
pub const RED: Color = Color::Rgb(200, 70, 70);
pub const GREY: Color = Color::Rgb(130, 130, 130);
pub const TEXT: Color = Color::Rgb(225, 225, 225);
pub const SELECTION_BG: Color = Color::Rgb(45, 50, 70);
pub const BAR_BG: Color = Color::Rgb(30, 30, 38);

/// Grade column colours, freshmen to seniors
const GRADE_COLORS: [Color; 4] = [
    Color::Rgb(120, 190, 220),
    Color::Rgb(120, 200, 140),
    Color::Rgb(220, 190, 100),
    Color::Rgb(210, 130, 180),
];

pub fn title_style() -> Style {
    Style::default().fg(BLUE).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(GREY)
}

pub fn highlight_style() -> Style {
    Style::default().fg(AMBER)
}

/// Roster matches the storage file
pub fn saved_style() -> Style {
    Style::default().fg(GREEN)
}

/// Roster has changes not yet written
pub fn unsaved_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::ITALIC)
}

pub fn error_style() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { BLUE } else { GREY })
}

pub fn search_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::UNDERLINED)
}

/// An active filter shown in the view bar
pub fn filter_chip_style() -> Style {
    Style::default().fg(BAR_BG).bg(AMBER)
}

pub fn grade_style(grade: i32) -> Style {
    let color = usize::try_from(grade)
        .ok()
        .and_then(|g| g.checked_sub(9))
        .and_then(|i| GRADE_COLORS.get(i).copied())
        .unwrap_or(GREY);
    Style::default().fg(color)
}

pub fn form_field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(TEXT).bg(SELECTION_BG)
    } else {
        Style::default().fg(GREY)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(TEXT)
}

pub fn help_key_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_style_known_grades() {
        assert_eq!(grade_style(9).fg, Some(GRADE_COLORS[0]));
        assert_eq!(grade_style(12).fg, Some(GRADE_COLORS[3]));
    }

    #[test]
    fn test_grade_style_out_of_range() {
        assert_eq!(grade_style(0).fg, Some(GREY));
        assert_eq!(grade_style(13).fg, Some(GREY));
        assert_eq!(grade_style(i32::MIN).fg, Some(GREY));
    }
}
