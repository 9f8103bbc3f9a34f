//! Month grids, date selection, and the engine that ties them together
mod constraint;
mod engine;
mod events;
mod grid;
mod selection;
pub use self::constraint::Constraint;
pub use self::engine::{CalendarDay, CalendarEngine, MonthView, OutOfTimeError};
pub use self::events::{
    attach_events, load_events, month_legend, parse_events, EventFileError, EventMarker,
    EventVariant, RawEvent, MAX_LEGEND_EVENTS, MAX_VISIBLE_EVENTS,
};
pub use self::grid::{
    build_month_grid, weekdays_from, GridCell, MonthGrid, Week, YearMonth, DAYS_IN_WEEK,
};
pub use self::selection::{
    DateRange, SelectCallback, SelectionMode, SelectionPhase, SelectionState, Selector,
};
