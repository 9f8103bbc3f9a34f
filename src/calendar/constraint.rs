use std::fmt;
use std::rc::Rc;
use time::Date;

type DatePredicate = Rc<dyn Fn(Date) -> bool>;

/// Bounds and exclusions that decide whether a day may be selected.  All
/// comparisons are by calendar day.
#[derive(Clone, Default)]
pub struct Constraint {
    min_date: Option<Date>,
    max_date: Option<Date>,
    disabled_dates: Vec<Date>,
    predicate: Option<DatePredicate>,
}

impl Constraint {
    pub fn new() -> Constraint {
        Constraint::default()
    }

    pub fn min_date(mut self, date: Date) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: Date) -> Self {
        self.max_date = Some(date);
        self
    }

    pub fn disabled_dates<I: IntoIterator<Item = Date>>(mut self, dates: I) -> Self {
        self.disabled_dates.extend(dates);
        self
    }

    /// Disable every date for which `pred` returns `true`.  Replaces any
    /// predicate set previously.
    pub fn predicate<F: Fn(Date) -> bool + 'static>(mut self, pred: F) -> Self {
        self.predicate = Some(Rc::new(pred));
        self
    }

    pub fn is_disabled(&self, date: Date) -> bool {
        self.min_date.is_some_and(|min| date < min)
            || self.max_date.is_some_and(|max| date > max)
            || self.disabled_dates.contains(&date)
            || self.predicate.as_ref().is_some_and(|pred| pred(date))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min_date.is_none()
            && self.max_date.is_none()
            && self.disabled_dates.is_empty()
            && self.predicate.is_none()
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("disabled_dates", &self.disabled_dates)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
