//! Time-slot arithmetic: slot `n` fires at `start + n * interval`.
//!
//! An arithmetic sequence, deliberately nothing more. Slots never overlap
//! because the interval is fixed, and a day whose slots run past midnight
//! simply spills into the next calendar date (still strictly increasing).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Compute the scheduled timestamp for one slot on one day.
pub fn slot_time(date: NaiveDate, start: NaiveTime, interval_minutes: u32, slot: u32) -> DateTime<Utc> {
    let offset = Duration::minutes(i64::from(interval_minutes) * i64::from(slot));
    (date.and_time(start) + offset).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn nine_am() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn slot_zero_is_start_time() {
        let t = slot_time(date(), nine_am(), 30, 0);
        assert_eq!(t.time().hour(), 9);
        assert_eq!(t.time().minute(), 0);
    }

    #[test]
    fn slots_are_an_arithmetic_sequence() {
        let times: Vec<_> = (0..5).map(|s| slot_time(date(), nine_am(), 45, s)).collect();
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(45));
        }
    }

    #[test]
    fn slots_strictly_increase() {
        let times: Vec<_> = (0..10).map(|s| slot_time(date(), nine_am(), 15, s)).collect();
        for pair in times.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn late_start_spills_past_midnight() {
        let start = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let t0 = slot_time(date(), start, 60, 0);
        let t1 = slot_time(date(), start, 60, 1);
        assert!(t1 > t0);
        assert_eq!(t1.date_naive(), date().succ_opt().unwrap());
    }
}
