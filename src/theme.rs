use hilal::calendar::EventVariant;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const HIJRI_HEADER_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const OUTSIDE_MONTH_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const HOLIDAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

pub(crate) const HIJRI_DAY_STYLE: Style = BASE_STYLE.fg(Color::Green);

pub(crate) const IN_RANGE_STYLE: Style = Style::new().bg(Color::Blue);

pub(crate) const SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) fn event_style(variant: EventVariant) -> Style {
    match variant {
        EventVariant::Default => BASE_STYLE,
        EventVariant::Primary => BASE_STYLE.fg(Color::LightCyan),
        EventVariant::Secondary => BASE_STYLE.fg(Color::LightMagenta),
        EventVariant::Destructive => BASE_STYLE.fg(Color::LightRed),
    }
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
