//! Open/closed state and display text of date picker controls built on the
//! selection state machine
use crate::calendar::{Constraint, DateRange, SelectionMode, SelectionState};
use crate::locale::Locale;
use std::fmt;
use time::Date;

/// Human-readable rendering of a selection, or `None` if nothing is selected.
///
/// Single dates use the long form ("November 6, 2025").  Ranges use the short
/// form, joined by " - " in English and " – " in Arabic; an in-progress range
/// shows only its start.
pub fn selection_text(state: &SelectionState, locale: Locale) -> Option<String> {
    match state {
        SelectionState::Single { selected } => selected.map(|d| locale.format_long(d)),
        SelectionState::Range(range) => range_text(*range, locale),
    }
}

fn range_text(range: DateRange, locale: Locale) -> Option<String> {
    let from = locale.format_short(range.from()?);
    Some(match range.to() {
        Some(to) => {
            let dash = match locale {
                Locale::En => "-",
                Locale::Ar => "–",
            };
            format!("{from} {dash} {}", locale.format_short(to))
        }
        None => from,
    })
}

/// The built-in prompt shown while nothing is selected
pub fn placeholder(mode: SelectionMode, locale: Locale) -> &'static str {
    match (mode, locale) {
        (SelectionMode::Single, Locale::En) => "Pick a date",
        (SelectionMode::Single, Locale::Ar) => "اختر تاريخ",
        (SelectionMode::Range, Locale::En) => "Pick a date range",
        (SelectionMode::Range, Locale::Ar) => "اختر نطاق التاريخ",
    }
}

/// Popup state shared by both kinds of picker
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Popup {
    open: bool,
    disabled: bool,
    placeholder: Option<String>,
    placeholder_ar: Option<String>,
}

impl Popup {
    /// The caller's placeholder for the locale if there is one, else the
    /// built-in default
    fn placeholder_text(&self, mode: SelectionMode, locale: Locale) -> String {
        let custom = match locale {
            Locale::Ar => self.placeholder_ar.as_deref().or(self.placeholder.as_deref()),
            Locale::En => self.placeholder.as_deref(),
        };
        custom.unwrap_or(placeholder(mode, locale)).to_owned()
    }

    fn open(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.open = true;
        true
    }
}

/// A single-date picker
#[derive(Default)]
pub struct DatePicker {
    date: Option<Date>,
    popup: Popup,
    constraint: Constraint,
    locale: Locale,
    on_change: Option<Box<dyn FnMut(Date)>>,
}

impl DatePicker {
    pub fn new() -> DatePicker {
        DatePicker::default()
    }

    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    pub fn placeholder<S: Into<String>>(mut self, text: S) -> Self {
        self.popup.placeholder = Some(text.into());
        self
    }

    pub fn placeholder_ar<S: Into<String>>(mut self, text: S) -> Self {
        self.popup.placeholder_ar = Some(text.into());
        self
    }

    /// Disable the whole control so that it can no longer be opened
    pub fn disabled(mut self, flag: bool) -> Self {
        self.popup.disabled = flag;
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

    pub fn on_change<F: FnMut(Date) + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn value(&self) -> Option<Date> {
        self.date
    }

    pub fn is_open(&self) -> bool {
        self.popup.open
    }

    /// Open the popup.  Returns `false` if the picker is disabled.
    pub fn open(&mut self) -> bool {
        self.popup.open()
    }

    pub fn close(&mut self) {
        self.popup.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.popup.open {
            self.close();
            true
        } else {
            self.open()
        }
    }

    pub fn display_text(&self) -> String {
        match self.date {
            Some(date) => self.locale.format_long(date),
            None => self.popup.placeholder_text(SelectionMode::Single, self.locale),
        }
    }

    /// Choose `date`.  Disabled dates are ignored and `false` is returned;
    /// otherwise the date is stored, the popup closes, and the change
    /// callback is invoked.
    pub fn select(&mut self, date: Date) -> bool {
        if self.constraint.is_disabled(date) {
            tracing::trace!(%date, "picker ignoring disabled date");
            return false;
        }
        self.date = Some(date);
        self.close();
        if let Some(cb) = self.on_change.as_mut() {
            cb(date);
        }
        true
    }
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("date", &self.date)
            .field("popup", &self.popup)
            .field("constraint", &self.constraint)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

/// A date-range picker
#[derive(Default)]
pub struct DateRangePicker {
    range: DateRange,
    popup: Popup,
    constraint: Constraint,
    locale: Locale,
    on_change: Option<Box<dyn FnMut(DateRange)>>,
}

impl DateRangePicker {
    pub fn new() -> DateRangePicker {
        DateRangePicker::default()
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn placeholder<S: Into<String>>(mut self, text: S) -> Self {
        self.popup.placeholder = Some(text.into());
        self
    }

    pub fn placeholder_ar<S: Into<String>>(mut self, text: S) -> Self {
        self.popup.placeholder_ar = Some(text.into());
        self
    }

    pub fn disabled(mut self, flag: bool) -> Self {
        self.popup.disabled = flag;
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

    pub fn on_change<F: FnMut(DateRange) + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn value(&self) -> DateRange {
        self.range
    }

    pub fn is_open(&self) -> bool {
        self.popup.open
    }

    /// Open the popup.  Returns `false` if the picker is disabled.
    pub fn open(&mut self) -> bool {
        self.popup.open()
    }

    pub fn close(&mut self) {
        self.popup.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.popup.open {
            self.close();
            true
        } else {
            self.open()
        }
    }

    pub fn display_text(&self) -> String {
        range_text(self.range, self.locale)
            .unwrap_or_else(|| self.popup.placeholder_text(SelectionMode::Range, self.locale))
    }

    /// Feed a click on `date` through the range state machine.  The popup
    /// stays open until both endpoints are chosen.  Returns `false` if the
    /// date is disabled.
    pub fn select(&mut self, date: Date) -> bool {
        let Some(SelectionState::Range(range)) =
            SelectionState::Range(self.range).next(date, &self.constraint)
        else {
            tracing::trace!(%date, "range picker ignoring disabled date");
            return false;
        };
        self.range = range;
        if range.is_complete() {
            self.close();
        }
        if let Some(cb) = self.on_change.as_mut() {
            cb(range);
        }
        true
    }
}

impl fmt::Debug for DateRangePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRangePicker")
            .field("range", &self.range)
            .field("popup", &self.popup)
            .field("constraint", &self.constraint)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;

    #[test]
    fn test_selection_text() {
        let single = SelectionState::Single {
            selected: Some(date!(2025 - 11 - 06)),
        };
        assert_eq!(
            selection_text(&single, Locale::En).as_deref(),
            Some("November 6, 2025")
        );
        assert_eq!(
            selection_text(&SelectionState::Single { selected: None }, Locale::En),
            None
        );
        let range = SelectionState::Range(DateRange::between(
            date!(2025 - 11 - 20),
            date!(2025 - 11 - 06),
        ));
        assert_eq!(
            selection_text(&range, Locale::En).as_deref(),
            Some("Nov 6, 2025 - Nov 20, 2025")
        );
        assert_eq!(
            selection_text(&range, Locale::Ar).as_deref(),
            Some("٦ نوفمبر ٢٠٢٥ – ٢٠ نوفمبر ٢٠٢٥")
        );
    }

    #[test]
    fn test_date_picker_placeholders() {
        assert_eq!(DatePicker::new().display_text(), "Pick a date");
        assert_eq!(
            DatePicker::new().locale(Locale::Ar).display_text(),
            "اختر تاريخ"
        );
        let picker = DatePicker::new()
            .placeholder("When?")
            .placeholder_ar("متى؟");
        assert_eq!(picker.display_text(), "When?");
        assert_eq!(picker.locale(Locale::Ar).display_text(), "متى؟");
        let picker = DatePicker::new().placeholder("When?").locale(Locale::Ar);
        assert_eq!(picker.display_text(), "When?");
    }

    #[test]
    fn test_date_picker_select() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes2 = Rc::clone(&changes);
        let mut picker = DatePicker::new()
            .constraint(Constraint::new().max_date(date!(2025 - 11 - 30)))
            .on_change(move |d| changes2.borrow_mut().push(d));
        assert!(picker.open());
        assert!(!picker.select(date!(2025 - 12 - 01)));
        assert!(picker.is_open());
        assert_eq!(picker.value(), None);
        assert!(picker.select(date!(2025 - 11 - 06)));
        assert!(!picker.is_open());
        assert_eq!(picker.value(), Some(date!(2025 - 11 - 06)));
        assert_eq!(picker.display_text(), "November 6, 2025");
        assert_eq!(*changes.borrow(), [date!(2025 - 11 - 06)]);
    }

    #[test]
    fn test_disabled_picker_does_not_open() {
        let mut picker = DatePicker::new().disabled(true);
        assert!(!picker.open());
        assert!(!picker.toggle());
        assert!(!picker.is_open());
    }

    #[test]
    fn test_range_picker_flow() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes2 = Rc::clone(&changes);
        let mut picker = DateRangePicker::new()
            .constraint(Constraint::new().disabled_dates([date!(2025 - 11 - 15)]))
            .on_change(move |r| changes2.borrow_mut().push(r));
        assert_eq!(picker.display_text(), "Pick a date range");
        assert!(picker.toggle());
        assert!(picker.select(date!(2025 - 11 - 20)));
        assert!(picker.is_open());
        assert_eq!(picker.display_text(), "Nov 20, 2025");
        assert!(!picker.select(date!(2025 - 11 - 15)));
        assert!(picker.select(date!(2025 - 11 - 10)));
        assert!(!picker.is_open());
        assert_eq!(
            picker.value(),
            DateRange::between(date!(2025 - 11 - 10), date!(2025 - 11 - 20))
        );
        assert_eq!(picker.display_text(), "Nov 10, 2025 - Nov 20, 2025");
        assert_eq!(changes.borrow().len(), 2);
    }

    #[test]
    fn test_range_picker_arabic_placeholder() {
        let picker = DateRangePicker::new().locale(Locale::Ar);
        assert_eq!(picker.display_text(), "اختر نطاق التاريخ");
    }
}
