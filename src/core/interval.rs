use std::{
    fmt::{Debug, Formatter},
    iter,
};

use chrono::{DateTime, Local, NaiveTime, TimeDelta};

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Local>,

    /// Exclusive.
    pub end: DateTime<Local>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }

    /// Split the interval at local midnights.
    ///
    /// Every yielded piece lies within a single calendar day. An empty interval yields nothing.
    pub fn split_by_days(self) -> impl Iterator<Item = Self> {
        let mut start = self.start;
        iter::from_fn(move || {
            if start >= self.end {
                return None;
            }
            let end = next_midnight(start).map_or(self.end, |midnight| midnight.min(self.end));
            let piece = Self::new(start, end);
            start = end;
            Some(piece)
        })
    }
}

fn next_midnight(after: DateTime<Local>) -> Option<DateTime<Local>> {
    after.date_naive().succ_opt()?.and_time(NaiveTime::MIN).and_local_timezone(Local).earliest()
}
