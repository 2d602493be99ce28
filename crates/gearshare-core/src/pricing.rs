//! Rental price computation.
//!
//! Vehicles carry both an hourly and a daily rate. Short rentals are always
//! billed hourly; once a rental reaches 24 hours the cheaper of the two
//! schedules wins, so a client is never charged more by the day than the
//! same period would cost by the hour.

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::interval::Interval;

const SECONDS_PER_HOUR: i64 = 3_600;
const HOURS_PER_DAY: i64 = 24;

/// Computes the total price for renting over `period`.
///
/// - under 24 hours: `price_per_hour * hours`
/// - 24 hours or more: `min(price_per_day * ceil(hours / 24), price_per_hour * hours)`
///
/// Fractional hours are billed pro rata. The result is rounded to two
/// decimal places, half-up.
#[must_use]
pub fn quote(price_per_hour: Decimal, price_per_day: Decimal, period: &Interval) -> Decimal {
    let duration = period.duration();
    let hours = fractional_hours(duration);

    let hourly_total = price_per_hour * hours;
    let total = if duration >= Duration::hours(HOURS_PER_DAY) {
        let days = (hours / Decimal::from(HOURS_PER_DAY)).ceil();
        let daily_total = price_per_day * days;
        hourly_total.min(daily_total)
    } else {
        hourly_total
    };

    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn fractional_hours(duration: Duration) -> Decimal {
    Decimal::from(duration.num_seconds()) / Decimal::from(SECONDS_PER_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(from: &str, to: &str) -> Interval {
        Interval::new(from.parse().unwrap(), to.parse().unwrap()).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn short_rental_is_billed_hourly() {
        // 6 hours at 6.50/h; the 45.00 daily rate does not apply under 24h.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-22T15:00:00Z");
        assert_eq!(quote(dec("6.5"), dec("45"), &period), dec("39.00"));
    }

    #[test]
    fn daily_rate_wins_when_cheaper() {
        // 48 hours: 48 * 6.50 = 312.00 hourly vs 2 * 45.00 = 90.00 daily.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-24T09:00:00Z");
        assert_eq!(quote(dec("6.5"), dec("45"), &period), dec("90.00"));
    }

    #[test]
    fn hourly_rate_wins_when_cheaper_past_a_day() {
        // 25 hours: 25 * 2.00 = 50.00 hourly vs ceil(25/24) * 60.00 = 120.00.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-23T10:00:00Z");
        assert_eq!(quote(dec("2"), dec("60"), &period), dec("50.00"));
    }

    #[test]
    fn partial_days_round_up_for_the_daily_schedule() {
        // 30 hours: daily charges ceil(30/24) = 2 days.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-23T15:00:00Z");
        assert_eq!(quote(dec("10"), dec("45"), &period), dec("90.00"));
    }

    #[test]
    fn fractional_hours_are_billed_pro_rata() {
        // 90 minutes at 6.50/h = 9.75.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-22T10:30:00Z");
        assert_eq!(quote(dec("6.5"), dec("45"), &period), dec("9.75"));
    }

    #[test]
    fn result_rounds_half_up_to_cents() {
        // 30 minutes at 6.05/h = 3.025, a true midpoint: half-up gives 3.03
        // where banker's rounding would give 3.02.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-22T09:30:00Z");
        assert_eq!(quote(dec("6.05"), dec("45"), &period), dec("3.03"));
    }

    #[test]
    fn exactly_24_hours_compares_both_schedules() {
        // 24 * 6.50 = 156.00 hourly vs 45.00 daily.
        let period = interval("2025-09-22T09:00:00Z", "2025-09-23T09:00:00Z");
        assert_eq!(quote(dec("6.5"), dec("45"), &period), dec("45.00"));
    }
}
