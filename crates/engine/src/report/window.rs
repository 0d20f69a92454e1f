//! Calendar windows and periods.
//!
//! A [`Period`] is a whole calendar month or year. Stepping between periods
//! is pure year/month arithmetic on the period's first day, never day
//! arithmetic on the anchor: one month after the period containing Jan 31 is
//! all of February, not "31 days later".

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::{EngineError, ResultEngine};

/// A timestamp window, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// `start > end` is a programmer error and fails fast.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ResultEngine<Self> {
        if start > end {
            return Err(EngineError::InvalidWindow(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Length of a reporting period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Month,
    Year,
}

/// One calendar month or year, identified by the year/month of its first day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    kind: PeriodKind,
    year: i32,
    /// Always 1 for `PeriodKind::Year`.
    month: u32,
}

impl Period {
    /// The period that contains `anchor`.
    pub fn containing(anchor: DateTime<Utc>, kind: PeriodKind) -> Self {
        let month = match kind {
            PeriodKind::Month => anchor.month(),
            PeriodKind::Year => 1,
        };
        Self {
            kind,
            year: anchor.year(),
            month,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// The next period. Always the first instant of the next calendar
    /// month/year, so repeated stepping never drifts.
    pub fn next(&self) -> Self {
        match self.kind {
            PeriodKind::Month => {
                if self.month == 12 {
                    Self {
                        kind: self.kind,
                        year: self.year + 1,
                        month: 1,
                    }
                } else {
                    Self {
                        kind: self.kind,
                        year: self.year,
                        month: self.month + 1,
                    }
                }
            }
            PeriodKind::Year => Self {
                kind: self.kind,
                year: self.year + 1,
                month: 1,
            },
        }
    }

    pub fn prev(&self) -> Self {
        match self.kind {
            PeriodKind::Month => {
                if self.month == 1 {
                    Self {
                        kind: self.kind,
                        year: self.year - 1,
                        month: 12,
                    }
                } else {
                    Self {
                        kind: self.kind,
                        year: self.year,
                        month: self.month - 1,
                    }
                }
            }
            PeriodKind::Year => Self {
                kind: self.kind,
                year: self.year - 1,
                month: 1,
            },
        }
    }

    /// Midnight UTC on the period's first day.
    pub fn start_instant(&self) -> DateTime<Utc> {
        // month is 1..=12 by construction and UTC has no ambiguous local
        // times, so the fallback is unreachable.
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The whole period as an inclusive window.
    pub fn window(&self) -> DateWindow {
        let start = self.start_instant();
        let end = self.next().start_instant() - Duration::nanoseconds(1);
        DateWindow { start, end }
    }

    /// `"YYYY-MM"` for months, `"YYYY"` for years.
    pub fn label(&self) -> String {
        match self.kind {
            PeriodKind::Month => format!("{:04}-{:02}", self.year, self.month),
            PeriodKind::Year => format!("{:04}", self.year),
        }
    }
}
