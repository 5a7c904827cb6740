//! Assembly of per-item reorder recommendations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reconstruct::StockHistory;
use super::trend::TrendSignal;
use super::{round1, round2, AnalysisConfig, DAYS_PER_MONTH};
use crate::entities::item;

/// Reported as months-of-stock when the sales rate is zero but stock is on
/// hand, so such items sort to the very end of the urgency ordering.
pub const MONTHS_OF_STOCK_SENTINEL: f64 = 999.9;

const SEASONAL_BUMP_THRESHOLD: f64 = 1.2;
const SEASONAL_DIP_THRESHOLD: f64 = 0.8;

/// One item's reorder advice. Rates and month figures carry one decimal,
/// money two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecommendation {
    pub item_id: String,
    pub name: String,
    pub sku: Option<String>,
    pub upc: Option<String>,
    pub current_qty: i32,
    pub avg_monthly_sales: f64,
    pub months_of_stock_left: f64,
    pub out_of_stock_months: f64,
    pub seasonal_factor: f64,
    pub hot_seller: bool,
    pub recommended_order_qty: i64,
    pub unit_cost: Decimal,
    pub estimated_order_cost: Decimal,
    pub notes: Vec<String>,
}

/// Folds the estimated rate, seasonal factor and trend signal into a
/// target stock level and order quantity, with the explanatory notes in a
/// fixed order: seasonal bump, seasonal dip, hot seller, stock-out risk.
pub fn synthesize(
    item: &item::Model,
    history: &StockHistory,
    adjusted_rate: f64,
    seasonal_factor: f64,
    trend: &TrendSignal,
    config: &AnalysisConfig,
) -> OrderRecommendation {
    let current_qty = item.quantity_on_hand;

    let months_of_stock_left = if adjusted_rate > 0.0 {
        round1(f64::from(current_qty) / adjusted_rate)
    } else if current_qty > 0 {
        MONTHS_OF_STOCK_SENTINEL
    } else {
        0.0
    };

    let target_stock = (adjusted_rate * config.order_cycle_months).ceil() as i64;
    let recommended_order_qty = (target_stock - i64::from(current_qty)).max(0);
    let estimated_order_cost = (Decimal::from(recommended_order_qty) * item.unit_cost)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let mut notes = Vec::new();
    if seasonal_factor >= SEASONAL_BUMP_THRESHOLD {
        let pct = ((seasonal_factor - 1.0) * 100.0).round() as i64;
        notes.push(format!(
            "Seasonal bump expected: demand typically up about {pct}% this time of year"
        ));
    }
    if seasonal_factor <= SEASONAL_DIP_THRESHOLD {
        let pct = ((1.0 - seasonal_factor) * 100.0).round() as i64;
        notes.push(format!(
            "Seasonal dip expected: demand typically down about {pct}% this time of year"
        ));
    }
    if trend.hot {
        notes.push(format!(
            "Hot seller: recent sales are {:.1}x the prior rate",
            trend.ratio
        ));
    }
    if adjusted_rate > 0.0 && months_of_stock_left < config.urgent_months && current_qty > 0 {
        notes.push(
            "Stock-out risk: current stock may run out before the next order cycle".to_string(),
        );
    }

    OrderRecommendation {
        item_id: item.id.clone(),
        name: item.name.clone(),
        sku: item.sku.clone(),
        upc: item.upc.clone(),
        current_qty,
        avg_monthly_sales: round1(adjusted_rate),
        months_of_stock_left,
        out_of_stock_months: round1(history.out_of_stock_days / DAYS_PER_MONTH),
        seasonal_factor: round2(seasonal_factor),
        hot_seller: trend.hot,
        recommended_order_qty,
        unit_cost: item.unit_cost,
        estimated_order_cost,
        notes,
    }
}

/// Most urgent first. Ties break on item id so repeated runs order
/// identically.
pub fn sort_recommendations(recommendations: &mut [OrderRecommendation]) {
    recommendations.sort_by(|a, b| {
        a.months_of_stock_left
            .total_cmp(&b.months_of_stock_left)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
}

impl OrderRecommendation {
    pub fn needs_reorder(&self) -> bool {
        self.recommended_order_qty > 0
    }

    pub fn is_urgent(&self) -> bool {
        self.notes
            .iter()
            .any(|note| note.starts_with("Stock-out risk"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn test_item(quantity_on_hand: i32, unit_cost: Decimal) -> item::Model {
        item::Model {
            id: "G19".to_string(),
            name: "Glock 19 Gen5".to_string(),
            sku: Some("GLK-19".to_string()),
            upc: Some("764503026911".to_string()),
            unit_cost,
            retail_price: dec!(599.99),
            quantity_on_hand,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn empty_history() -> StockHistory {
        StockHistory {
            initial_stock: 0,
            out_of_stock_days: 0.0,
            sales: vec![],
            total_days: 0.0,
            total_months: 0.0,
            first_event_at: None,
        }
    }

    fn quiet_trend() -> TrendSignal {
        TrendSignal {
            hot: false,
            ratio: 1.0,
        }
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn zero_rate_with_stock_reports_sentinel_and_no_notes() {
        let rec = synthesize(
            &test_item(5, dec!(450.00)),
            &empty_history(),
            0.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(rec.avg_monthly_sales, 0.0);
        assert_eq!(rec.months_of_stock_left, MONTHS_OF_STOCK_SENTINEL);
        assert_eq!(rec.recommended_order_qty, 0);
        assert_eq!(rec.estimated_order_cost, dec!(0.00));
        assert!(rec.notes.is_empty());
    }

    #[test]
    fn zero_rate_and_zero_stock_reports_zero_months() {
        let rec = synthesize(
            &test_item(0, dec!(450.00)),
            &empty_history(),
            0.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(rec.months_of_stock_left, 0.0);
        assert_eq!(rec.recommended_order_qty, 0);
    }

    #[test]
    fn order_quantity_tops_up_to_one_cycle_of_demand() {
        let rec = synthesize(
            &test_item(4, dec!(549.99)),
            &empty_history(),
            6.5,
            1.0,
            &quiet_trend(),
            &config(),
        );
        // Target is ceil(6.5) = 7 against 4 on hand.
        assert_eq!(rec.recommended_order_qty, 3);
        assert_eq!(rec.estimated_order_cost, dec!(1649.97));
        assert_eq!(rec.avg_monthly_sales, 6.5);
    }

    #[test]
    fn longer_order_cycle_raises_the_target() {
        let mut cfg = config();
        cfg.order_cycle_months = 2.0;
        let rec = synthesize(
            &test_item(4, dec!(100.00)),
            &empty_history(),
            6.5,
            1.0,
            &quiet_trend(),
            &cfg,
        );
        assert_eq!(rec.recommended_order_qty, 9);
    }

    #[test]
    fn overstocked_item_is_clamped_to_zero_order() {
        let rec = synthesize(
            &test_item(50, dec!(100.00)),
            &empty_history(),
            2.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(rec.recommended_order_qty, 0);
        assert_eq!(rec.estimated_order_cost, dec!(0.00));
        assert_eq!(rec.months_of_stock_left, 25.0);
    }

    #[test]
    fn negative_stock_orders_through_the_deficit() {
        let rec = synthesize(
            &test_item(-2, dec!(100.00)),
            &empty_history(),
            1.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(rec.recommended_order_qty, 3);
        assert_eq!(rec.months_of_stock_left, -2.0);
        // Negative stock cannot be at stock-out risk in the note sense.
        assert!(rec.notes.is_empty());
    }

    #[test]
    fn notes_follow_fixed_order() {
        let rec = synthesize(
            &test_item(2, dec!(100.00)),
            &empty_history(),
            10.0,
            1.3,
            &TrendSignal {
                hot: true,
                ratio: 2.08,
            },
            &config(),
        );
        assert_eq!(rec.notes.len(), 3);
        assert_eq!(
            rec.notes[0],
            "Seasonal bump expected: demand typically up about 30% this time of year"
        );
        assert_eq!(rec.notes[1], "Hot seller: recent sales are 2.1x the prior rate");
        assert_eq!(
            rec.notes[2],
            "Stock-out risk: current stock may run out before the next order cycle"
        );
        assert!(rec.is_urgent());
    }

    #[test]
    fn seasonal_thresholds_are_inclusive() {
        let bump = synthesize(
            &test_item(100, dec!(100.00)),
            &empty_history(),
            1.0,
            1.2,
            &quiet_trend(),
            &config(),
        );
        assert!(bump.notes[0].contains("up about 20%"));

        let dip = synthesize(
            &test_item(100, dec!(100.00)),
            &empty_history(),
            1.0,
            0.8,
            &quiet_trend(),
            &config(),
        );
        assert!(dip.notes[0].contains("down about 20%"));
    }

    #[test]
    fn stock_out_note_compares_the_rounded_months_figure() {
        // 49 on hand at 100 a month is 0.49 raw, which reports as 0.5 and
        // is therefore not under the half-month threshold.
        let calm = synthesize(
            &test_item(49, dec!(100.00)),
            &empty_history(),
            100.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(calm.months_of_stock_left, 0.5);
        assert!(!calm.is_urgent());

        let urgent = synthesize(
            &test_item(44, dec!(100.00)),
            &empty_history(),
            100.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(urgent.months_of_stock_left, 0.4);
        assert!(urgent.is_urgent());
    }

    #[test]
    fn out_of_stock_days_report_in_months() {
        let mut history = empty_history();
        history.out_of_stock_days = 40.0;
        let rec = synthesize(
            &test_item(4, dec!(100.00)),
            &history,
            1.0,
            1.0,
            &quiet_trend(),
            &config(),
        );
        assert_eq!(rec.out_of_stock_months, 1.3);
    }

    #[test]
    fn sorts_most_urgent_first_with_stable_ties() {
        let mut recs = vec![
            rec_with("C", 2.0),
            rec_with("B", 0.5),
            rec_with("D", MONTHS_OF_STOCK_SENTINEL),
            rec_with("A", 2.0),
        ];
        sort_recommendations(&mut recs);
        let ids: Vec<&str> = recs.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C", "D"]);
    }

    fn rec_with(item_id: &str, months_of_stock_left: f64) -> OrderRecommendation {
        OrderRecommendation {
            item_id: item_id.to_string(),
            name: item_id.to_string(),
            sku: None,
            upc: None,
            current_qty: 1,
            avg_monthly_sales: 1.0,
            months_of_stock_left,
            out_of_stock_months: 0.0,
            seasonal_factor: 1.0,
            hot_seller: false,
            recommended_order_qty: 0,
            unit_cost: dec!(1.00),
            estimated_order_cost: dec!(0.00),
            notes: vec![],
        }
    }
}
