//! Bilingual (English/Arabic) calendar engine.
//!
//! The [`calendar`] module builds month grids, tracks single-date and
//! date-range selections under min/max/disabled-date constraints, and
//! annotates each day with events and an optional Hijri overlay from the
//! [`hijri`] module.  [`picker`] wraps the engine in the state of a date
//! picker control, and [`zakat`] computes zakat due on a set of assets.
pub mod calendar;
pub mod hijri;
pub mod locale;
pub mod picker;
pub mod zakat;
