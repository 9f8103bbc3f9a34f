use super::constraint::Constraint;
use std::fmt;
use time::Date;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

/// A possibly in-progress date range.
///
/// Invariant: if `to` is set, then `from` is set and `from <= to`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DateRange {
    from: Option<Date>,
    to: Option<Date>,
}

impl DateRange {
    pub const EMPTY: DateRange = DateRange {
        from: None,
        to: None,
    };

    /// Normalizing constructor: the endpoints are swapped if out of order,
    /// and a lone `to` becomes `from`.
    pub fn new(from: Option<Date>, to: Option<Date>) -> DateRange {
        match (from, to) {
            (Some(a), Some(b)) => DateRange::between(a, b),
            (Some(a), None) | (None, Some(a)) => DateRange::starting(a),
            (None, None) => DateRange::EMPTY,
        }
    }

    pub fn starting(from: Date) -> DateRange {
        DateRange {
            from: Some(from),
            to: None,
        }
    }

    pub fn between(a: Date, b: Date) -> DateRange {
        DateRange {
            from: Some(a.min(b)),
            to: Some(a.max(b)),
        }
    }

    pub fn from(&self) -> Option<Date> {
        self.from
    }

    pub fn to(&self) -> Option<Date> {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.to.is_some()
    }

    /// True if both endpoints are set and `date` lies between them
    /// (inclusive)
    pub fn contains(&self, date: Date) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= date && date <= to,
            _ => false,
        }
    }

    pub fn is_start(&self, date: Date) -> bool {
        self.from == Some(date)
    }

    pub fn is_end(&self, date: Date) -> bool {
        self.to == Some(date)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SelectionPhase {
    Idle,
    SingleSelected,
    RangeStart,
    RangeComplete,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SelectionState {
    Single { selected: Option<Date> },
    Range(DateRange),
}

impl SelectionState {
    pub fn idle(mode: SelectionMode) -> SelectionState {
        match mode {
            SelectionMode::Single => SelectionState::Single { selected: None },
            SelectionMode::Range => SelectionState::Range(DateRange::EMPTY),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionState::Single { .. } => SelectionMode::Single,
            SelectionState::Range(_) => SelectionMode::Range,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        match self {
            SelectionState::Single { selected: None } => SelectionPhase::Idle,
            SelectionState::Single { selected: Some(_) } => SelectionPhase::SingleSelected,
            SelectionState::Range(r) if r.is_empty() => SelectionPhase::Idle,
            SelectionState::Range(r) if r.is_complete() => SelectionPhase::RangeComplete,
            SelectionState::Range(_) => SelectionPhase::RangeStart,
        }
    }

    /// Compute the state that results from clicking `date`, or `None` if the
    /// click is ignored because the date is disabled.
    ///
    /// In single mode the clicked date becomes the selection; clicking the
    /// selected date again yields the same state rather than deselecting.
    /// In range mode a click on an idle or complete range starts a new range,
    /// and a click on an in-progress range completes it, swapping the
    /// endpoints if the second date precedes the first.
    pub fn next(&self, date: Date, constraint: &Constraint) -> Option<SelectionState> {
        if constraint.is_disabled(date) {
            return None;
        }
        Some(match self {
            SelectionState::Single { .. } => SelectionState::Single {
                selected: Some(date),
            },
            SelectionState::Range(range) => match (range.from, range.to) {
                (Some(from), None) => SelectionState::Range(DateRange::between(from, date)),
                _ => SelectionState::Range(DateRange::starting(date)),
            },
        })
    }

    /// True if `date` is the selected date or an endpoint of the range
    pub fn is_selected(&self, date: Date) -> bool {
        match self {
            SelectionState::Single { selected } => *selected == Some(date),
            SelectionState::Range(r) => r.is_start(date) || r.is_end(date),
        }
    }

    /// True if `date` lies within a complete range (endpoints included)
    pub fn in_range(&self, date: Date) -> bool {
        match self {
            SelectionState::Single { .. } => false,
            SelectionState::Range(r) => r.contains(date),
        }
    }

    /// The date around which a calendar showing this selection should open
    pub fn anchor_date(&self) -> Option<Date> {
        match self {
            SelectionState::Single { selected } => *selected,
            SelectionState::Range(r) => r.from,
        }
    }
}

pub type SelectCallback = Box<dyn FnMut(&SelectionState)>;

/// Holder of the selection for a calendar.
///
/// An uncontrolled selector owns its state and updates it on every committed
/// click.  A controlled selector only proposes the next state through the
/// `on_select` callback; the host remains the sole writer and reports the
/// value it settled on via [`Selector::set`].
pub struct Selector {
    state: SelectionState,
    controlled: bool,
    on_select: Option<SelectCallback>,
}

impl Selector {
    pub fn uncontrolled(mode: SelectionMode) -> Selector {
        Selector {
            state: SelectionState::idle(mode),
            controlled: false,
            on_select: None,
        }
    }

    pub fn controlled(value: SelectionState) -> Selector {
        Selector {
            state: value,
            controlled: true,
            on_select: None,
        }
    }

    pub fn on_select<F: FnMut(&SelectionState) + 'static>(mut self, callback: F) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Switch to controlled mode with the host's current value, keeping any
    /// callback already registered
    pub(crate) fn hand_over(&mut self, value: SelectionState) {
        self.state = value;
        self.controlled = true;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn value(&self) -> SelectionState {
        self.state
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.mode()
    }

    /// Replace the current value without invoking `on_select`.  This is how
    /// the host of a controlled selector writes back its value.
    pub fn set(&mut self, value: SelectionState) {
        self.state = value;
    }

    /// Handle a click on `date`.  Returns the committed state, or `None` if
    /// the click was ignored.
    pub fn click(&mut self, date: Date, constraint: &Constraint) -> Option<SelectionState> {
        let Some(next) = self.state.next(date, constraint) else {
            tracing::trace!(%date, "ignoring click on disabled date");
            return None;
        };
        if !self.controlled {
            self.state = next;
        }
        tracing::debug!(%date, phase = ?next.phase(), controlled = self.controlled, "selection committed");
        if let Some(callback) = self.on_select.as_mut() {
            callback(&next);
        }
        Some(next)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("state", &self.state)
            .field("controlled", &self.controlled)
            .field("on_select", &self.on_select.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;

    fn recorder() -> (Rc<RefCell<Vec<SelectionState>>>, impl FnMut(&SelectionState)) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = Rc::clone(&log);
        (log, move |s: &SelectionState| log2.borrow_mut().push(*s))
    }

    #[test]
    fn test_range_normalization() {
        let c = Constraint::new();
        let s = SelectionState::idle(SelectionMode::Range);
        let s = s.next(date!(2025 - 11 - 20), &c).unwrap();
        assert_eq!(s.phase(), SelectionPhase::RangeStart);
        let s = s.next(date!(2025 - 11 - 10), &c).unwrap();
        assert_eq!(
            s,
            SelectionState::Range(DateRange::between(
                date!(2025 - 11 - 10),
                date!(2025 - 11 - 20)
            ))
        );
        let SelectionState::Range(r) = s else {
            panic!("expected a range");
        };
        assert_eq!(r.from(), Some(date!(2025 - 11 - 10)));
        assert_eq!(r.to(), Some(date!(2025 - 11 - 20)));
        assert_eq!(s.phase(), SelectionPhase::RangeComplete);
    }

    #[test]
    fn test_range_forward_and_restart() {
        let c = Constraint::new();
        let s = SelectionState::idle(SelectionMode::Range)
            .next(date!(2025 - 11 - 10), &c)
            .unwrap()
            .next(date!(2025 - 11 - 12), &c)
            .unwrap();
        assert!(s.in_range(date!(2025 - 11 - 11)));
        assert!(s.is_selected(date!(2025 - 11 - 12)));
        assert!(!s.in_range(date!(2025 - 11 - 13)));
        let s = s.next(date!(2025 - 11 - 01), &c).unwrap();
        assert_eq!(
            s,
            SelectionState::Range(DateRange::starting(date!(2025 - 11 - 01)))
        );
        assert!(!s.in_range(date!(2025 - 11 - 01)));
    }

    #[test]
    fn test_range_of_one_day() {
        let c = Constraint::new();
        let s = SelectionState::idle(SelectionMode::Range)
            .next(date!(2025 - 11 - 10), &c)
            .unwrap()
            .next(date!(2025 - 11 - 10), &c)
            .unwrap();
        assert_eq!(s.phase(), SelectionPhase::RangeComplete);
        assert!(s.in_range(date!(2025 - 11 - 10)));
    }

    #[test]
    fn test_disabled_click_is_noop() {
        let d = date!(2025 - 11 - 15);
        let c = Constraint::new().disabled_dates([d]);
        let (log, callback) = recorder();
        let mut sel = Selector::uncontrolled(SelectionMode::Range).on_select(callback);
        assert_eq!(sel.click(d, &c), None);
        assert_eq!(sel.value(), SelectionState::idle(SelectionMode::Range));
        assert!(log.borrow().is_empty());
        sel.click(date!(2025 - 11 - 10), &c).unwrap();
        let before = sel.value();
        assert_eq!(sel.click(d, &c), None);
        assert_eq!(sel.value(), before);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_single_reselect_is_idempotent() {
        let d = date!(2025 - 11 - 06);
        let c = Constraint::new();
        let (log, callback) = recorder();
        let mut sel = Selector::uncontrolled(SelectionMode::Single).on_select(callback);
        assert_eq!(sel.value().phase(), SelectionPhase::Idle);
        sel.click(d, &c);
        let after_first = sel.value();
        sel.click(d, &c);
        assert_eq!(sel.value(), after_first);
        assert_eq!(
            *log.borrow(),
            [
                SelectionState::Single { selected: Some(d) },
                SelectionState::Single { selected: Some(d) },
            ]
        );
        assert_eq!(sel.value().phase(), SelectionPhase::SingleSelected);
    }

    #[test]
    fn test_controlled_selector_does_not_mutate() {
        let c = Constraint::new();
        let (log, callback) = recorder();
        let mut sel =
            Selector::controlled(SelectionState::idle(SelectionMode::Range)).on_select(callback);
        assert!(sel.is_controlled());
        let proposed = sel.click(date!(2025 - 11 - 20), &c).unwrap();
        assert_eq!(sel.value(), SelectionState::idle(SelectionMode::Range));
        // Without a write-back the next click still starts from the host's value
        let again = sel.click(date!(2025 - 11 - 10), &c).unwrap();
        assert_eq!(
            again,
            SelectionState::Range(DateRange::starting(date!(2025 - 11 - 10)))
        );
        sel.set(proposed);
        let completed = sel.click(date!(2025 - 11 - 10), &c).unwrap();
        assert_eq!(
            completed,
            SelectionState::Range(DateRange::between(
                date!(2025 - 11 - 10),
                date!(2025 - 11 - 20)
            ))
        );
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(sel.value(), proposed);
    }

    #[test]
    fn test_date_range_constructor_normalizes() {
        let a = date!(2025 - 11 - 01);
        let b = date!(2025 - 11 - 09);
        assert_eq!(DateRange::new(Some(b), Some(a)), DateRange::between(a, b));
        assert_eq!(DateRange::new(None, Some(b)), DateRange::starting(b));
        assert!(DateRange::new(None, None).is_empty());
        let r = DateRange::new(Some(b), Some(a));
        assert!(r.is_start(a) && r.is_end(b));
    }

    #[test]
    fn test_anchor_date() {
        let d = date!(2025 - 03 - 01);
        assert_eq!(SelectionState::Single { selected: Some(d) }.anchor_date(), Some(d));
        assert_eq!(
            SelectionState::Range(DateRange::starting(d)).anchor_date(),
            Some(d)
        );
        assert_eq!(SelectionState::idle(SelectionMode::Range).anchor_date(), None);
    }
}
