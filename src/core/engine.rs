use bon::Builder;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        ranking::most_expensive,
        series::{PricePoint, PriceSeries, QuarterIndex},
    },
    prelude::*,
    quantity::price::KilowattHourPrice,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    #[display("HEAT")]
    Heat,

    #[display("BLOCK")]
    Block,
}

/// Outcome of one control tick, immutable once made.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Decision {
    pub timestamp: DateTime<Local>,

    #[serde(rename = "decision")]
    pub action: Action,

    pub price: KilowattHourPrice,

    pub reason: String,

    /// 1-based position within the blocked window, most expensive first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

/// Decides whether the central heating may run for the current quarter.
///
/// The engine holds no state across ticks: the decision is recomputed from
/// the inputs on every invocation, so identical inputs yield an identical
/// decision.
#[derive(Builder)]
pub struct DecisionEngine<'a> {
    series: &'a PriceSeries,
    always_on_threshold: KilowattHourPrice,
    max_shutoff_quarters: usize,
}

impl DecisionEngine<'_> {
    pub fn decide(&self, now: DateTime<Local>, current_price: KilowattHourPrice) -> Decision {
        let quarter = QuarterIndex::of(now);

        if current_price < self.always_on_threshold {
            return Decision {
                timestamp: now,
                action: Action::Heat,
                price: current_price,
                reason: format!(
                    "price {current_price} below the always-on threshold {}",
                    self.always_on_threshold,
                ),
                rank: None,
            };
        }

        let top = if self.series.get(quarter).is_some() {
            most_expensive(self.series, self.max_shutoff_quarters)
        } else {
            // Degraded mode: the supplied price stands in for the missing
            // point, for this tick only.
            warn!(
                quarter = quarter.index(),
                len = self.series.len(),
                "current quarter is missing from the series",
            );
            let mut series = self.series.clone();
            series.push(PricePoint::new(now, current_price));
            most_expensive(&series, self.max_shutoff_quarters)
        };

        match top.iter().position(|ranked| *ranked == quarter) {
            Some(position) => {
                let rank = position + 1;
                Decision {
                    timestamp: now,
                    action: Action::Block,
                    price: current_price,
                    reason: format!(
                        "in the top-{} expensive quarters (rank ~{rank}, price {current_price})",
                        self.max_shutoff_quarters,
                    ),
                    rank: Some(rank),
                }
            }
            None => Decision {
                timestamp: now,
                action: Action::Heat,
                price: current_price,
                reason: format!("outside the blocked window (price {current_price})"),
                rank: None,
            },
        }
    }
}
