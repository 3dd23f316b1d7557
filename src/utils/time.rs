use chrono::{Datelike, NaiveDate, Utc};

/// Age in whole years on a given date, accounting for whether the
/// birthday has already passed that year.
pub fn age_on(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth_date.year();
    if (on.month(), on.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Age in whole years as of today (UTC)
pub fn current_age(birth_date: NaiveDate) -> i32 {
    age_on(birth_date, Utc::now().date_naive())
}
