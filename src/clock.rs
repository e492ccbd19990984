use chrono::NaiveDate;

/// Source of the current calendar date used for overdue checks.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine running the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
