//! Daily reading pace.

use std::fmt::{self, Display, Formatter};

/// Pages a day needed to read `pages` pages within `days` days, rounded up. `None` if either is
/// zero.
pub fn pages_per_day(pages: u32, days: u32) -> Option<u32> {
    if pages == 0 || days == 0 {
        return None;
    }

    Some(pages.div_ceil(days))
}

/// A worked out reading pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub pages: u32,
    pub days: u32,
    pub per_day: u32,
}

impl Estimate {
    pub fn new(pages: u32, days: u32) -> Option<Self> {
        pages_per_day(pages, days).map(|per_day| Self {
            pages,
            days,
            per_day,
        })
    }
}

impl Display for Estimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You need to read {} pages per day to finish your book in the specified time.",
            self.per_day
        )
    }
}
