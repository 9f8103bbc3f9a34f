use crate::theme::{
    event_style, BASE_STYLE, CURSOR_STYLE, DISABLED_STYLE, HIJRI_DAY_STYLE, HIJRI_HEADER_STYLE,
    HOLIDAY_STYLE, IN_RANGE_STYLE, OUTSIDE_MONTH_STYLE, PLACEHOLDER_STYLE, SELECTED_STYLE,
    TITLE_STYLE, WEEKDAY_STYLE,
};
use hilal::calendar::{CalendarDay, MonthView, SelectionState, DAYS_IN_WEEK};
use hilal::locale::Locale;
use hilal::picker::{placeholder, selection_text};
use ratatui::{layout::Flex, prelude::*, widgets::*};
use time::Date;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Lines above the first week: title, Hijri header, weekday header, rule
const HEADER_LINES: u16 = 4;

/// Number of lines taken up by each week of the calendar: the Gregorian day,
/// then its Hijri day and event markers
const WEEK_LINES: u16 = 2;

const EVENT_DOT: &str = "•";

const MORE_EVENTS: &str = "+";

const ACS_HLINE: char = '─';

/// Draws a [`MonthView`] along with the current selection and the keyboard
/// cursor.  Arabic calendars are mirrored so that the week runs from right
/// to left.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Calendar<'a> {
    view: &'a MonthView,
    selection: SelectionState,
    cursor: Date,
    locale: Locale,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(
        view: &'a MonthView,
        selection: SelectionState,
        cursor: Date,
        locale: Locale,
    ) -> Calendar<'a> {
        Calendar {
            view,
            selection,
            cursor,
            locale,
        }
    }

    /// The visual column of the `index`-th day of the week
    fn column(&self, index: usize) -> u16 {
        let col = if self.locale.is_rtl() {
            DAYS_IN_WEEK - 1 - index
        } else {
            index
        };
        u16::try_from(col).unwrap_or(0)
    }

    fn day_style(&self, day: &CalendarDay) -> Style {
        let mut style = if day.disabled {
            DISABLED_STYLE
        } else if !day.is_current_month {
            OUTSIDE_MONTH_STYLE
        } else if day.is_holiday() {
            HOLIDAY_STYLE
        } else {
            BASE_STYLE
        };
        if self.selection.in_range(day.date) {
            style = style.patch(IN_RANGE_STYLE);
        }
        if self.selection.is_selected(day.date) {
            style = style.patch(SELECTED_STYLE);
        }
        if day.date == self.cursor {
            style = style.patch(CURSOR_STYLE);
        }
        style
    }

    fn day_label(&self, day: &CalendarDay) -> String {
        let n = self.locale.numerals(&format!("{:2}", day.date.day()));
        if day.is_today {
            format!("[{n}]")
        } else {
            format!(" {n} ")
        }
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let locale = self.locale;
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_centered(
            0,
            &format!(
                "{} {}",
                locale.month_name(self.view.anchor.month()),
                locale.numerals(&self.view.anchor.year().to_string())
            ),
            TITLE_STYLE,
        );
        if let Some(hijri) = self.view.hijri_header {
            canvas.draw_centered(1, &hijri.format_month_year(locale), HIJRI_HEADER_STYLE);
        }
        for (i, &wd) in self.view.weekdays.iter().enumerate() {
            canvas.mvprint(
                2,
                DAY_WIDTH * self.column(i) + 1,
                locale.weekday_short(wd),
                Some(WEEKDAY_STYLE),
            );
        }
        canvas.hline(3, 0, ACS_HLINE, MAIN_WIDTH);
        let mut y = HEADER_LINES;
        for week in &self.view.weeks {
            for (i, day) in week.iter().enumerate() {
                let x = DAY_WIDTH * self.column(i);
                canvas.mvprint(y, x, self.day_label(day), Some(self.day_style(day)));
                canvas.draw_annotations(y + 1, x, day, locale);
            }
            y += WEEK_LINES;
        }
        canvas.hline(y, 0, ACS_HLINE, MAIN_WIDTH);
        y += 1;
        match selection_text(&self.selection, locale) {
            Some(text) => canvas.draw_centered(y, &text, BASE_STYLE),
            None => canvas.draw_centered(
                y,
                placeholder(self.selection.mode(), locale),
                PLACEHOLDER_STYLE,
            ),
        }
        for ev in &self.view.legend {
            y += 1;
            canvas.mvprint(
                y,
                0,
                format!("{EVENT_DOT} {}: {}", locale.format_short(ev.date), ev.title),
                Some(event_style(ev.variant)),
            );
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_centered(&mut self, y: u16, s: &str, style: Style) {
        let width = u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX);
        self.mvprint(y, MAIN_WIDTH.saturating_sub(width) / 2, s, Some(style));
    }

    /// Draw the Hijri day (if any) under the Gregorian day, followed by one
    /// marker per visible event and a "+" if some events are hidden
    fn draw_annotations(&mut self, y: u16, x: u16, day: &CalendarDay, locale: Locale) {
        if let Some(hijri) = day.hijri {
            self.mvprint(
                y,
                x + 1,
                locale.numerals(&format!("{:2}", hijri.day)),
                Some(HIJRI_DAY_STYLE),
            );
        }
        let mut col = x + 3;
        for ev in day.visible_events() {
            self.mvprint(y, col, EVENT_DOT, Some(event_style(ev.variant)));
            col += 1;
        }
        if day.hidden_event_count() > 0 {
            self.mvprint(y, col, MORE_EVENTS, Some(BASE_STYLE));
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
