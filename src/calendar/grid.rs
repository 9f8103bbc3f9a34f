use std::iter::successors;
use time::{Date, Month, Weekday};

pub const DAYS_IN_WEEK: usize = 7;

/// Every month grid has at least this many rows, even a 28-day February that
/// starts on the first day of the week
const MIN_WEEKS: usize = 5;

// Leave a year of slack on either side of `time`'s supported range so that
// the days padding out the first and last grids are representable.
const MIN_YEAR: i32 = -9998;
const MAX_YEAR: i32 = 9998;

pub(crate) trait WeekdayExt {
    /// Number of days from `start` forwards to `self`, in `0..7`
    fn days_since(self, start: Weekday) -> u8;
}

impl WeekdayExt for Weekday {
    fn days_since(self, start: Weekday) -> u8 {
        (7 + self.number_days_from_sunday() - start.number_days_from_sunday()) % 7
    }
}

/// The weekdays of a week starting on `week_start`, in order
pub fn weekdays_from(week_start: Weekday) -> [Weekday; DAYS_IN_WEEK] {
    let mut wd = week_start;
    std::array::from_fn(|_| {
        let r = wd;
        wd = wd.next();
        r
    })
}

/// A month of a specific year.  Construction normalizes out-of-range months
/// and clamps the year to the range for which complete grids exist.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// `month` is 1-based but may be any value: 13 is January of the
    /// following year, 0 is December of the previous year, and so on.
    pub fn new(year: i32, month: i32) -> YearMonth {
        let index = i64::from(year) * 12 + i64::from(month) - 1;
        let (year, month0) = (index.div_euclid(12), index.rem_euclid(12));
        if year < i64::from(MIN_YEAR) {
            YearMonth {
                year: MIN_YEAR,
                month: Month::January,
            }
        } else if year > i64::from(MAX_YEAR) {
            YearMonth {
                year: MAX_YEAR,
                month: Month::December,
            }
        } else {
            YearMonth {
                year: i32::try_from(year).unwrap_or(MAX_YEAR),
                month: u8::try_from(month0 + 1)
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .unwrap_or(Month::January),
            }
        }
    }

    pub fn from_date(date: Date) -> YearMonth {
        YearMonth::new(date.year(), i32::from(u8::from(date.month())))
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> Month {
        self.month
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// # Panics
    ///
    /// The first day of the month
    ///
    /// # Panics
    ///
    /// Never in practice: the year is clamped on construction so that the
    /// first of the month always exists.
    pub fn first_day(self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1)
            .expect("first day of a clamped month should be a valid date")
    }

    /// Number of days in the month
    pub fn length(self) -> u8 {
        match self.month {
            Month::February if is_leap_year(self.year) => 29,
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }

    /// Returns `None` when already at the end of the supported range
    pub fn next(self) -> Option<YearMonth> {
        (self != YearMonth::new(MAX_YEAR, 12))
            .then(|| YearMonth::new(self.year, i32::from(u8::from(self.month)) + 1))
    }

    /// Returns `None` when already at the start of the supported range
    pub fn previous(self) -> Option<YearMonth> {
        (self != YearMonth::new(MIN_YEAR, 1))
            .then(|| YearMonth::new(self.year, i32::from(u8::from(self.month)) - 1))
    }
}

fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// One cell of a month grid before any annotation
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridCell {
    pub date: Date,
    pub is_current_month: bool,
    pub is_today: bool,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Week([GridCell; DAYS_IN_WEEK]);

impl Week {
    pub fn days(&self) -> &[GridCell; DAYS_IN_WEEK] {
        &self.0
    }

    pub fn first(&self) -> GridCell {
        self.0[0]
    }

    pub fn last(&self) -> GridCell {
        self.0[DAYS_IN_WEEK - 1]
    }

    /// Returns the column in which the given date appears, if any
    pub fn position(&self, date: Date) -> Option<usize> {
        self.0.iter().position(|c| c.date == date)
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MonthGrid {
    anchor: YearMonth,
    week_start: Weekday,
    weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn anchor(&self) -> YearMonth {
        self.anchor
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> + '_ {
        self.weeks.iter().flat_map(|w| w.0.iter())
    }

    pub fn first_date(&self) -> Option<Date> {
        self.weeks.first().map(|w| w.first().date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.weeks.last().map(|w| w.last().date)
    }
}

/// Lay out `anchor` as rows of seven days starting on `week_start`, padded
/// with the tail of the previous month and the head of the next one.  The
/// grid always has five or six rows.
pub fn build_month_grid(anchor: YearMonth, week_start: Weekday, today: Date) -> MonthGrid {
    let first = anchor.first_day();
    let lead = usize::from(first.weekday().days_since(week_start));
    let used = lead + usize::from(anchor.length());
    let rows = used.div_ceil(DAYS_IN_WEEK).max(MIN_WEEKS);
    let start = iter_days_before(first).take(lead).last().unwrap_or(first);
    let cells = successors(Some(start), |d| d.next_day())
        .take(rows * DAYS_IN_WEEK)
        .map(|date| GridCell {
            date,
            is_current_month: anchor.contains(date),
            is_today: date == today,
        })
        .collect::<Vec<_>>();
    let weeks = cells
        .chunks_exact(DAYS_IN_WEEK)
        .filter_map(|chunk| <[GridCell; DAYS_IN_WEEK]>::try_from(chunk).ok())
        .map(Week)
        .collect();
    MonthGrid {
        anchor,
        week_start,
        weeks,
    }
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}
