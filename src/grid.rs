//! The month grid: a fixed 6-week, Sunday-first calendar layout with per-day task summaries

use chrono::{Datelike, Local, NaiveDate};

use crate::index::{DateIndex, DateKey};
use crate::task::Task;

/// A month grid always spans 6 full weeks
pub const GRID_CELLS: usize = 42;
/// How many tasks a single cell displays before collapsing into an overflow counter
pub const CELL_TASK_DISPLAY_LIMIT: usize = 4;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];


/// The month a grid is built for, with a zero-based month index.
///
/// Navigation (`prev`/`next`) rolls over year boundaries in both directions, so a view can
/// keep a single `GridMonth` as its cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridMonth {
    year: i32,
    month0: u32,
}

impl GridMonth {
    /// Create a grid month. `month0` is zero-based (0 = January); values past 11 spill into
    /// the following years, which keeps this total.
    pub fn new(year: i32, month0: u32) -> Self {
        Self {
            year: year + (month0 / 12) as i32,
            month0: month0 % 12,
        }
    }

    /// The month containing a given date
    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month0: date.month0() }
    }

    /// The month containing the current local date
    pub fn current() -> Self {
        Self::containing(Local::now().naive_local().date())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index (0 = January, 11 = December)
    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    /// The month before this one (January rolls back to December of the previous year)
    pub fn prev(&self) -> Self {
        if self.month0 == 0 {
            Self { year: self.year - 1, month0: 11 }
        } else {
            Self { year: self.year, month0: self.month0 - 1 }
        }
    }

    /// The month after this one (December rolls over to January of the next year)
    pub fn next(&self) -> Self {
        if self.month0 == 11 {
            Self { year: self.year + 1, month0: 0 }
        } else {
            Self { year: self.year, month0: self.month0 + 1 }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .expect("the first of a month is always a valid date")
    }

    /// The number of days in this month (28 to 31, leap years included)
    pub fn day_count(&self) -> u32 {
        let next_first = self.next().first_day();
        next_first.signed_duration_since(self.first_day()).num_days() as u32
    }
}


/// The date carried by a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellDate {
    pub year: i32,
    /// Zero-based month index
    pub month0: u32,
    pub day: u32,
}

impl CellDate {
    pub fn as_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, self.day)
            .expect("grid cells only carry valid calendar dates")
    }

    pub fn key(&self) -> DateKey {
        DateKey::from(self.as_date())
    }

    /// Exact equality on all three fields. This deliberately never compares timestamps, so a
    /// cell matches "today" or the selected date whatever the time of day is.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.day == date.day() && self.month0 == date.month0() && self.year == date.year()
    }
}


/// One of the 42 cells of a month grid
#[derive(Debug)]
pub struct CalendarCell<'a> {
    date: CellDate,
    in_current_month: bool,
    shown_tasks: Vec<&'a Task>,
    overflow: usize,
}

impl<'a> CalendarCell<'a> {
    pub fn date(&self) -> CellDate {
        self.date
    }

    /// Whether this cell belongs to the displayed month, as opposed to a leading or trailing
    /// adjacent-month filler
    pub fn in_current_month(&self) -> bool {
        self.in_current_month
    }

    /// The tasks displayed in this cell (at most [`CELL_TASK_DISPLAY_LIMIT`]), in input order
    pub fn shown_tasks(&self) -> &[&'a Task] {
        &self.shown_tasks
    }

    /// How many further tasks are due this day but not displayed
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// The total number of tasks due this day
    pub fn task_count(&self) -> usize {
        self.shown_tasks.len() + self.overflow
    }
}


/// A fully built month grid: exactly [`GRID_CELLS`] cells in chronological order, 7 per row,
/// Sunday first.
///
/// Grids are pure recomputations over the displayed month and the current [`DateIndex`]; they
/// are rebuilt on every render and never cached.
#[derive(Debug)]
pub struct MonthGrid<'a> {
    month: GridMonth,
    cells: Vec<CalendarCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Build the grid for a month.
    ///
    /// The first cells are the trailing days of the previous month, one per weekday before the
    /// 1st (a month starting on Sunday gets none). Then come the days of the month itself, and
    /// finally leading days of the next month pad the total to 42.
    pub fn build(month: GridMonth, index: &DateIndex<'a>) -> Self {
        let mut cells = Vec::with_capacity(GRID_CELLS);

        let leading = month.first_day().weekday().num_days_from_sunday();
        let prev = month.prev();
        let prev_len = prev.day_count();
        for day in (prev_len - leading + 1)..=prev_len {
            cells.push(Self::cell(prev, day, false, index));
        }

        for day in 1..=month.day_count() {
            cells.push(Self::cell(month, day, true, index));
        }

        let next = month.next();
        let remaining = GRID_CELLS - cells.len();
        for day in 1..=(remaining as u32) {
            cells.push(Self::cell(next, day, false, index));
        }

        Self { month, cells }
    }

    fn cell(month: GridMonth, day: u32, in_current_month: bool, index: &DateIndex<'a>) -> CalendarCell<'a> {
        let date = CellDate { year: month.year(), month0: month.month0(), day };
        let due = index.tasks_on(&date.key());
        let shown = due.len().min(CELL_TASK_DISPLAY_LIMIT);
        CalendarCell {
            date,
            in_current_month,
            shown_tasks: due[..shown].to_vec(),
            overflow: due.len() - shown,
        }
    }

    pub fn month(&self) -> GridMonth {
        self.month
    }

    /// All 42 cells, in chronological order
    pub fn cells(&self) -> &[CalendarCell<'a>] {
        &self.cells
    }

    /// The cells of one of the 6 displayed weeks, or `None` past the last row
    pub fn week(&self, row: usize) -> Option<&[CalendarCell<'a>]> {
        self.cells.chunks(7).nth(row)
    }
}


/// The current date, captured once (e.g. when a view is mounted) so that highlighting does not
/// drift if the session crosses midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Today {
    date: NaiveDate,
}

impl Today {
    /// Capture the process-observed current local date
    pub fn capture() -> Self {
        Self { date: Local::now().naive_local().date() }
    }

    pub fn fixed(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn key(&self) -> DateKey {
        DateKey::from(self.date)
    }

    /// Whether a grid cell is today's cell
    pub fn contains(&self, cell: &CellDate) -> bool {
        cell.matches(self.date)
    }
}
