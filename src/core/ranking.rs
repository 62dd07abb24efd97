use std::cmp::Reverse;

use itertools::Itertools;

use crate::core::series::{PriceSeries, QuarterIndex};

/// Rank the day's quarters by price, most expensive first, and keep the
/// first `n`.
///
/// Ties break towards the earlier quarter so that the result is
/// deterministic. A series with fewer than `n` points degrades to ranking
/// only what is known. Rankings are recomputed on every tick because the
/// feed revises the series intraday.
pub fn most_expensive(series: &PriceSeries, n: usize) -> Vec<QuarterIndex> {
    let mut ranked = series.iter().map(|point| (point.price, point.quarter)).collect_vec();
    ranked.sort_unstable_by_key(|(price, quarter)| (Reverse(*price), *quarter));
    ranked.into_iter().take(n).map(|(_, quarter)| quarter).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeDelta, TimeZone};

    use super::*;
    use crate::{core::series::PricePoint, quantity::price::KilowattHourPrice};

    fn midnight() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        prices
            .iter()
            .enumerate()
            .map(|(quarter, price)| {
                PricePoint::new(
                    midnight() + TimeDelta::minutes(15 * quarter as i64),
                    KilowattHourPrice(*price),
                )
            })
            .collect()
    }

    #[test]
    fn test_orders_by_descending_price() {
        let top = most_expensive(&series(&[5.0, 20.0, 1.0, 15.0]), 3);
        assert_eq!(top, vec![QuarterIndex::new(1), QuarterIndex::new(3), QuarterIndex::new(0)]);
    }

    #[test]
    fn test_ties_break_towards_earlier_quarter() {
        let top = most_expensive(&series(&[7.0, 9.0, 9.0, 7.0]), 4);
        assert_eq!(
            top,
            vec![
                QuarterIndex::new(1),
                QuarterIndex::new(2),
                QuarterIndex::new(0),
                QuarterIndex::new(3),
            ],
        );
    }

    #[test]
    fn test_returns_at_most_n() {
        assert_eq!(most_expensive(&series(&[1.0, 2.0, 3.0]), 2).len(), 2);
    }

    #[test]
    fn test_zero_n_is_empty() {
        assert!(most_expensive(&series(&[1.0, 2.0]), 0).is_empty());
    }

    #[test]
    fn test_short_series_ranks_what_is_known() {
        assert_eq!(most_expensive(&series(&[4.0, 2.0]), 24).len(), 2);
    }
}
