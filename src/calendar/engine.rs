use super::constraint::Constraint;
use super::events::{attach_events, month_legend, EventMarker, EventVariant, MAX_VISIBLE_EVENTS};
use super::grid::{build_month_grid, weekdays_from, GridCell, YearMonth, DAYS_IN_WEEK};
use super::selection::{SelectionMode, SelectionState, Selector};
use crate::hijri::{ApproximateHijri, HijriConverter, HijriDate, IslamicHoliday};
use crate::locale::Locale;
use std::fmt;
use thiserror::Error;
use time::{Date, Weekday};

/// A fully annotated cell of a month view
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarDay {
    pub date: Date,
    pub is_current_month: bool,
    pub is_today: bool,
    /// Present only when the Hijri overlay is enabled
    pub hijri: Option<HijriDate>,
    pub holiday: Option<&'static IslamicHoliday>,
    pub disabled: bool,
    /// Every event on this day, in caller order
    pub events: Vec<EventMarker>,
}

impl CalendarDay {
    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }

    /// The events to draw on this day
    pub fn visible_events(&self) -> &[EventMarker] {
        &self.events[..self.events.len().min(MAX_VISIBLE_EVENTS)]
    }

    /// How many events are not drawn because of the display cap
    pub fn hidden_event_count(&self) -> usize {
        self.events.len().saturating_sub(MAX_VISIBLE_EVENTS)
    }
}

/// Everything needed to draw one month
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthView {
    pub anchor: YearMonth,
    pub weekdays: [Weekday; DAYS_IN_WEEK],
    pub weeks: Vec<[CalendarDay; DAYS_IN_WEEK]>,
    /// Hijri date of the first of the month, when the overlay is enabled
    pub hijri_header: Option<HijriDate>,
    pub legend: Vec<EventMarker>,
}

impl MonthView {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> + '_ {
        self.weeks.iter().flatten()
    }

    pub fn day(&self, date: Date) -> Option<&CalendarDay> {
        self.days().find(|d| d.date == date)
    }
}

/// Calendar date-selection and rendering engine.
///
/// Configured with builder methods, then driven by [`click()`] and the
/// navigation methods.  [`month_view()`] recomputes the annotated grid for
/// the displayed month from scratch on every call.
///
/// [`click()`]: CalendarEngine::click
/// [`month_view()`]: CalendarEngine::month_view
pub struct CalendarEngine {
    week_start: Weekday,
    show_hijri: bool,
    show_islamic_holidays: bool,
    events: Vec<EventMarker>,
    constraint: Constraint,
    locale: Locale,
    converter: Box<dyn HijriConverter>,
    selector: Selector,
    displayed: YearMonth,
}

impl CalendarEngine {
    /// Create an uncontrolled engine displaying the month containing `today`
    pub fn new(mode: SelectionMode, today: Date) -> CalendarEngine {
        CalendarEngine {
            week_start: Weekday::Sunday,
            show_hijri: false,
            show_islamic_holidays: false,
            events: Vec::new(),
            constraint: Constraint::default(),
            locale: Locale::default(),
            converter: Box::new(ApproximateHijri),
            selector: Selector::uncontrolled(mode),
            displayed: YearMonth::from_date(today),
        }
    }

    pub fn week_start(mut self, wd: Weekday) -> Self {
        self.week_start = wd;
        self
    }

    pub fn show_hijri(mut self, flag: bool) -> Self {
        self.show_hijri = flag;
        self
    }

    /// Mark Islamic holidays with events.  Only takes effect together with
    /// [`show_hijri()`](CalendarEngine::show_hijri).
    pub fn show_islamic_holidays(mut self, flag: bool) -> Self {
        self.show_islamic_holidays = flag;
        self
    }

    pub fn events(mut self, events: Vec<EventMarker>) -> Self {
        self.events = events;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Replace the default [`ApproximateHijri`] converter
    pub fn hijri_converter<C: HijriConverter + 'static>(mut self, converter: C) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Make the selection host-controlled, starting from `value`.  The
    /// displayed month moves to the selected date, if any.
    pub fn controlled(mut self, value: SelectionState) -> Self {
        self.selector.hand_over(value);
        if let Some(date) = value.anchor_date() {
            self.displayed = YearMonth::from_date(date);
        }
        self
    }

    /// Start an uncontrolled engine with an initial selection.  The
    /// displayed month moves to the selected date, if any.
    pub fn initial_selection(mut self, value: SelectionState) -> Self {
        self.selector.set(value);
        if let Some(date) = value.anchor_date() {
            self.displayed = YearMonth::from_date(date);
        }
        self
    }

    pub fn on_select<F: FnMut(&SelectionState) + 'static>(mut self, callback: F) -> Self {
        self.selector = self.selector.on_select(callback);
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.selector.mode()
    }

    pub fn display_locale(&self) -> Locale {
        self.locale
    }

    pub fn is_showing_hijri(&self) -> bool {
        self.show_hijri
    }

    pub fn selection(&self) -> SelectionState {
        self.selector.value()
    }

    /// Write back the host's value for a controlled engine, or reset the
    /// selection of an uncontrolled one.  Does not invoke `on_select`.
    pub fn set_selection(&mut self, value: SelectionState) {
        self.selector.set(value);
    }

    pub fn is_disabled(&self, date: Date) -> bool {
        self.constraint.is_disabled(date)
    }

    /// Click on `date`.  Returns the committed selection, or `None` if the
    /// date is disabled, in which case nothing changes and `on_select` is not
    /// called.
    pub fn click(&mut self, date: Date) -> Option<SelectionState> {
        self.selector.click(date, &self.constraint)
    }

    pub fn displayed_month(&self) -> YearMonth {
        self.displayed
    }

    pub fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.displayed = self.displayed.next().ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        self.displayed = self.displayed.previous().ok_or(OutOfTimeError)?;
        Ok(())
    }

    pub fn go_to_today(&mut self, today: Date) {
        self.jump_to(today);
    }

    pub fn jump_to(&mut self, date: Date) {
        self.displayed = YearMonth::from_date(date);
    }

    /// Build the annotated grid for the displayed month
    pub fn month_view(&self, today: Date) -> MonthView {
        let grid = build_month_grid(self.displayed, self.week_start, today);
        let mut weeks = grid
            .weeks()
            .iter()
            .map(|week| week.days().map(|cell| self.annotate(cell)))
            .collect::<Vec<_>>();
        let mut events = self.events.clone();
        if self.show_hijri && self.show_islamic_holidays {
            events.extend(weeks.iter().flatten().filter_map(|day| {
                day.holiday.map(|h| {
                    EventMarker::new(day.date, h.name(self.locale)).variant(EventVariant::Primary)
                })
            }));
        }
        for day in weeks.iter_mut().flatten() {
            day.events = attach_events(day.date, &events);
        }
        MonthView {
            anchor: self.displayed,
            weekdays: weekdays_from(self.week_start),
            weeks,
            hijri_header: self
                .show_hijri
                .then(|| self.converter.to_hijri(self.displayed.first_day())),
            legend: month_legend(&events, self.displayed),
        }
    }

    fn annotate(&self, cell: GridCell) -> CalendarDay {
        let hijri = self.show_hijri.then(|| self.converter.to_hijri(cell.date));
        CalendarDay {
            date: cell.date,
            is_current_month: cell.is_current_month,
            is_today: cell.is_today,
            hijri,
            holiday: hijri.and_then(|h| h.holiday()),
            disabled: self.constraint.is_disabled(cell.date),
            events: Vec::new(),
        }
    }
}

impl fmt::Debug for CalendarEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarEngine")
            .field("week_start", &self.week_start)
            .field("show_hijri", &self.show_hijri)
            .field("show_islamic_holidays", &self.show_islamic_holidays)
            .field("events", &self.events)
            .field("constraint", &self.constraint)
            .field("locale", &self.locale)
            .field("selector", &self.selector)
            .field("displayed", &self.displayed)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DateRange;
    use crate::hijri::HijriMonth;
    use std::cell::Cell;
    use std::rc::Rc;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 11 - 06);

    #[test]
    fn test_default_view() {
        let engine = CalendarEngine::new(SelectionMode::Single, TODAY);
        let view = engine.month_view(TODAY);
        assert_eq!(view.anchor, YearMonth::new(2025, 11));
        assert_eq!(view.weeks.len(), 6);
        assert_eq!(view.weekdays[0], Weekday::Sunday);
        assert_eq!(view.hijri_header, None);
        assert!(view.days().all(|d| d.hijri.is_none() && !d.is_holiday()));
        assert!(view.day(TODAY).unwrap().is_today);
        let oct26 = view.day(date!(2025 - 10 - 26)).unwrap();
        assert!(!oct26.is_current_month);
        assert!(!oct26.disabled);
    }

    #[test]
    fn test_outside_month_does_not_imply_disabled() {
        let engine = CalendarEngine::new(SelectionMode::Single, TODAY)
            .constraint(Constraint::new().max_date(date!(2025 - 11 - 28)));
        let view = engine.month_view(TODAY);
        let oct31 = view.day(date!(2025 - 10 - 31)).unwrap();
        assert!(!oct31.is_current_month && !oct31.disabled);
        let nov29 = view.day(date!(2025 - 11 - 29)).unwrap();
        assert!(nov29.is_current_month && nov29.disabled);
    }

    #[test]
    fn test_hijri_overlay_and_holidays() {
        let engine = CalendarEngine::new(SelectionMode::Single, date!(2025 - 02 - 10))
            .show_hijri(true)
            .show_islamic_holidays(true)
            .events(vec![EventMarker::new(date!(2025 - 02 - 28), "Dinner")]);
        let view = engine.month_view(date!(2025 - 02 - 10));
        let feb28 = view.day(date!(2025 - 02 - 28)).unwrap();
        assert_eq!(
            feb28.hijri,
            Some(HijriDate {
                year: 1446,
                month: HijriMonth::Ramadan,
                day: 1
            })
        );
        assert!(feb28.is_holiday());
        assert_eq!(feb28.events.len(), 2);
        assert_eq!(feb28.events[0].title, "Dinner");
        assert_eq!(feb28.events[1].title, "Start of Ramadan");
        assert_eq!(feb28.events[1].variant, EventVariant::Primary);
        assert!(view.hijri_header.is_some());
        assert!(view.legend.iter().any(|ev| ev.title == "Start of Ramadan"));
    }

    #[test]
    fn test_holiday_events_need_hijri() {
        let engine = CalendarEngine::new(SelectionMode::Single, date!(2025 - 02 - 10))
            .show_islamic_holidays(true);
        let view = engine.month_view(date!(2025 - 02 - 10));
        let feb28 = view.day(date!(2025 - 02 - 28)).unwrap();
        assert!(feb28.hijri.is_none());
        assert!(feb28.events.is_empty());
    }

    #[test]
    fn test_holiday_titles_follow_locale() {
        let engine = CalendarEngine::new(SelectionMode::Single, date!(2025 - 03 - 30))
            .show_hijri(true)
            .show_islamic_holidays(true)
            .locale(Locale::Ar);
        let view = engine.month_view(date!(2025 - 03 - 30));
        // 1 Shawwal 1446 by the approximation
        let mar29 = view.day(date!(2025 - 03 - 29)).unwrap();
        assert_eq!(mar29.events[0].title, "عيد الفطر");
    }

    #[test]
    fn test_injected_converter() {
        let engine = CalendarEngine::new(SelectionMode::Single, TODAY)
            .show_hijri(true)
            .hijri_converter(|_: Date| HijriDate {
                year: 1447,
                month: HijriMonth::Shawwal,
                day: 1,
            });
        let view = engine.month_view(TODAY);
        assert!(view.days().all(|d| d.is_holiday()));
    }

    #[test]
    fn test_event_cap_keeps_data() {
        let events = (0..5)
            .map(|i| EventMarker::new(TODAY, format!("e{i}")))
            .collect();
        let engine = CalendarEngine::new(SelectionMode::Single, TODAY).events(events);
        let view = engine.month_view(TODAY);
        let day = view.day(TODAY).unwrap();
        assert_eq!(day.events.len(), 5);
        assert_eq!(day.visible_events().len(), 3);
        assert_eq!(day.visible_events()[2].title, "e2");
        assert_eq!(day.hidden_event_count(), 2);
    }

    #[test]
    fn test_click_through_engine() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = Rc::clone(&calls);
        let disabled = date!(2025 - 11 - 15);
        let mut engine = CalendarEngine::new(SelectionMode::Range, TODAY)
            .constraint(Constraint::new().disabled_dates([disabled]))
            .on_select(move |_| calls2.set(calls2.get() + 1));
        assert_eq!(engine.click(disabled), None);
        assert_eq!(calls.get(), 0);
        engine.click(date!(2025 - 11 - 20));
        engine.click(date!(2025 - 11 - 10));
        assert_eq!(
            engine.selection(),
            SelectionState::Range(DateRange::between(
                date!(2025 - 11 - 10),
                date!(2025 - 11 - 20)
            ))
        );
        assert_eq!(calls.get(), 2);
        assert!(engine.month_view(TODAY).day(disabled).unwrap().disabled);
    }

    #[test]
    fn test_controlled_engine_opens_on_selection() {
        let selected = SelectionState::Single {
            selected: Some(date!(2024 - 02 - 29)),
        };
        let mut engine = CalendarEngine::new(SelectionMode::Single, TODAY).controlled(selected);
        assert_eq!(engine.displayed_month(), YearMonth::new(2024, 2));
        let proposed = engine.click(date!(2024 - 02 - 01)).unwrap();
        assert_eq!(engine.selection(), selected);
        engine.set_selection(proposed);
        assert_eq!(engine.selection(), proposed);
    }

    #[test]
    fn test_navigation() {
        let mut engine = CalendarEngine::new(SelectionMode::Single, date!(2025 - 12 - 15));
        engine.next_month().unwrap();
        assert_eq!(engine.displayed_month(), YearMonth::new(2026, 1));
        engine.previous_month().unwrap();
        engine.previous_month().unwrap();
        assert_eq!(engine.displayed_month(), YearMonth::new(2025, 11));
        engine.go_to_today(date!(2025 - 12 - 15));
        assert_eq!(engine.displayed_month(), YearMonth::new(2025, 12));
        engine.jump_to(date!(9999 - 12 - 31));
        assert_eq!(engine.next_month(), Err(OutOfTimeError));
        assert_eq!(engine.displayed_month(), YearMonth::new(9998, 12));
    }

    #[test]
    fn test_week_start() {
        let engine =
            CalendarEngine::new(SelectionMode::Single, TODAY).week_start(Weekday::Monday);
        let view = engine.month_view(TODAY);
        assert_eq!(view.weekdays[6], Weekday::Sunday);
        assert_eq!(view.weeks.len(), 5);
        assert_eq!(view.weeks[0][0].date, date!(2025 - 10 - 27));
    }
}
