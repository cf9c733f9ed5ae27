use crate::core::qm;
use serde::de::Error;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::ops::Add;
use std::ops::Sub;
use std::str::FromStr;

/// Number of days in the year used to convert day counts to year fractions.
/// Act/365 fixed, ignoring leap years.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Range of years accepted when parsing. Matches `Date::is_valid`.
const MIN_YEAR: i32 = 1968;
const MAX_YEAR: i32 = 2168;

/// Date is a local calendar date, as used for valuation and expiry of an
/// option. Times of day are not represented: an option valued on its expiry
/// date has zero time to expiry.
///
/// Date contains a single number, representing a count of days from some
/// well-defined base date. We use Truncated Julian dates, which have a base
/// date of 1968-05-24. The base date is recent enough to catch garbage dates,
/// while still allowing any conceivable listed option.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

impl Add<i32> for Date {
    type Output = Date;

    fn add(self, days: i32) -> Date {
        Date(self.0 + days)
    }
}

impl Sub<i32> for Date {
    type Output = Date;

    fn sub(self, days: i32) -> Date {
        Date(self.0 - days)
    }
}

/// The difference between two dates is a signed count of days
impl Sub<Date> for Date {
    type Output = i32;

    fn sub(self, other: Date) -> i32 {
        self.0 - other.0
    }
}

impl FromStr for Date {
    type Err = qm::Error;

    /// Reads a date from a string, which must be an ISO format date
    /// of the form YYYY-MM-DD. Dates that do not exist, such as 2023-02-30,
    /// are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad_date = || qm::Error::InvalidParameters(format!("bad date: '{}'", s));

        let mut fields = s.trim().split('-');
        let mut ymd = [0; 3];
        for elem in ymd.iter_mut() {
            let field = fields.next().ok_or_else(bad_date)?;
            *elem = field.parse::<i32>().map_err(|_| bad_date())?;
        }
        if fields.next().is_some() {
            return Err(bad_date());
        }

        // keep the julian arithmetic well inside i32
        let (year, month, day) = (ymd[0], ymd[1], ymd[2]);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
        {
            return Err(bad_date());
        }

        // from_ymd happily rolls over out-of-range days, so insist that
        // the date reads back the same
        let result = Date::from_ymd(ymd[0], ymd[1], ymd[2]);
        if !result.is_valid() || result.ymd() != (ymd[0], ymd[1], ymd[2]) {
            return Err(bad_date());
        }

        Ok(result)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::from_str(&s).map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// We always display dates as ISO format.
impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "{:04}-{:02}-{:02}", y, m, d)
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (TJD {})", self, self.0)
    }
}

impl Date {
    /// Constructs a date given a truncated Julian (count of days after
    /// 24th May 1968).
    pub fn from_truncated_julian(truncated_julian_date: i32) -> Date {
        Date(truncated_julian_date)
    }

    /// Constructs a date given a year, month and day. This does not
    /// validate its inputs: for example, 2001-02-30 is a synonym for
    /// 2001-03-02. Use `from_str` for validated input.
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Date {
        Date(truncated_julian_from_ymd(year, month, day))
    }

    /// Returns the year, month and day associated with this date
    pub fn ymd(self) -> (i32, i32, i32) {
        ymd_from_truncated_julian(self.0)
    }

    pub fn truncated_julian(self) -> i32 {
        self.0
    }

    /// Is this date within a range of sensible financial dates?
    pub fn is_valid(self) -> bool {
        // arbitrarily restrict dates to the range 1968 to 2168
        self.0 > 0 && self.0 < 200 * 365
    }
}

/// Time from the valuation date to the expiry date as a fraction of a
/// 365-day year. Negative if the option has already expired.
pub fn year_fraction(valuation: Date, expiry: Date) -> f64 {
    (expiry - valuation) as f64 / DAYS_PER_YEAR
}

/// Calculates a julian date given a year, month and day. (Code adapted
/// from FORTRAN code in http://aa.usno.navy.mil/faq/docs/JD_Formula.php)
fn truncated_julian_from_ymd(year: i32, month: i32, day: i32) -> i32 {
    let year_month = (month - 14) / 12;
    let julian = day - 32075
        + 1461 * (year + 4800 + year_month) / 4
        + 367 * (month - 2 - year_month * 12) / 12
        - 3 * ((year + 4900 + year_month) / 100) / 4;
    julian - 2440000
}

/// Calculates a year, month, day, given a julian date. (Code adapted
/// from FORTRAN code in http://aa.usno.navy.mil/faq/docs/JD_Formula.php)
fn ymd_from_truncated_julian(truncated_julian: i32) -> (i32, i32, i32) {
    let julian = truncated_julian + 2440000;
    let l1 = julian + 68569;
    let n = 4 * l1 / 146097;
    let l2 = l1 - (146097 * n + 3) / 4;
    let i1 = 4000 * (l2 + 1) / 1461001;
    let l3 = l2 - 1461 * i1 / 4 + 31;
    let j1 = 80 * l3 / 2447;
    let day = l3 - 2447 * j1 / 80;
    let l4 = j1 / 11;
    let month = j1 + 2 - 12 * l4;
    let year = 100 * (n - 49) + i1 + l4;
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::numerics::approx_eq;
    use serde_json;

    #[test]
    fn create_date_from_ymd() {
        let first_jan_1970 = Date::from_ymd(1970, 1, 1);
        assert_eq!(first_jan_1970.truncated_julian(), 588);
        assert_eq!(first_jan_1970.ymd(), (1970, 1, 1));
    }

    #[test]
    fn round_trip_date_via_string() {
        // roughly from 1970 to 2120
        for i in 588..(588 + 150 * 365) {
            let d1 = Date::from_truncated_julian(i);
            let d2 = Date::from_str(&d1.to_string()).unwrap();
            assert_eq!(d1, d2);
        }
    }

    #[test]
    fn parse_iso_date() {
        let date = Date::from_str("2024-02-29").unwrap();
        assert_eq!(date.ymd(), (2024, 2, 29));
        assert_eq!(date.to_string(), "2024-02-29");
    }

    #[test]
    fn fail_from_bad_date_string() {
        check_bad_syntax("1970 -01-04");
        check_bad_syntax("1950-01-04");
        check_bad_syntax("2023-02-29");
        check_bad_syntax("2023-13-01");
        check_bad_syntax("2023-01");
        check_bad_syntax("2023-01-02-03");
        check_bad_syntax("2000000-01-01");
        check_bad_syntax("-2147483648-01-01");
        check_bad_syntax("2024-2147483647-01");
        check_bad_syntax("2024-01-2147483647");
        check_bad_syntax("bad date");
        check_bad_syntax("");
    }

    fn check_bad_syntax(text: &str) {
        match Date::from_str(text) {
            Ok(date) => panic!("Failed to raise error for '{}': {}", text, date),
            Err(e) => {
                assert!(e.to_string().contains(text), "message={}", e);
            }
        }
    }

    #[test]
    fn days_between_dates() {
        let valuation = Date::from_ymd(2024, 1, 2);
        let expiry = Date::from_ymd(2024, 7, 2);
        assert_eq!(expiry - valuation, 182);
        assert_eq!((valuation + 182), expiry);
        assert_eq!((expiry - 182), valuation);
    }

    #[test]
    fn year_fraction_act_365() {
        let valuation = Date::from_str("2023-01-01").unwrap();
        let expiry = Date::from_str("2024-01-01").unwrap();
        assert!(approx_eq(year_fraction(valuation, expiry), 1.0, 1e-15));

        let half = Date::from_str("2023-07-02").unwrap();
        assert!(approx_eq(year_fraction(valuation, half), 182.0 / 365.0, 1e-15));

        assert_eq!(year_fraction(valuation, valuation), 0.0);
        assert!(year_fraction(expiry, valuation) < 0.0);
    }

    #[test]
    fn date_serde() {
        let date = Date::from_ymd(2018, 5, 10);

        let serialized = serde_json::to_string(&date).unwrap();
        assert_eq!(serialized, r#""2018-05-10""#);

        let deserialized: Date = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, date);

        let bad: Result<Date, _> = serde_json::from_str(r#""2018-02-31""#);
        assert!(bad.is_err());
    }
}
