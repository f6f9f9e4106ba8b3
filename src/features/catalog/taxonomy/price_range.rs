use serde::Serialize;
use utoipa::ToSchema;

/// Lowest slider value, regardless of observed prices
pub const PRICE_FLOOR: i64 = 10_000;
/// The upper bound never drops below this
pub const MIN_PRICE_CEILING: i64 = 200_000;
/// Observed maxima are rounded up to a multiple of this
pub const PRICE_STEP: i64 = 1_000;
/// Smallest distance allowed between the two slider handles
pub const MIN_SPAN: i64 = 1_000;
/// Observed prices above this are treated as this value
pub const MAX_PRICE_BOUND: i64 = i64::MAX / 10;
/// Initial upper handle when no banknote has a positive price
const NO_PRICES_SELECTED_MAX: i64 = 150_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceInterval {
    pub min: i64,
    pub max: i64,
}

/// Slider state: fixed bounds plus the currently selected sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceRange {
    #[serde(rename = "limites")]
    pub bounds: PriceInterval,
    #[serde(rename = "seleccion")]
    pub selection: PriceInterval,
}

impl PriceRange {
    /// Derives bounds from observed prices and selects 20%..80% of the span.
    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let observed_max = prices
            .into_iter()
            .filter(|p| *p > 0.0 && p.is_finite())
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |m| m.max(p))));

        let Some(observed_max) = observed_max else {
            return Self {
                bounds: PriceInterval {
                    min: PRICE_FLOOR,
                    max: MIN_PRICE_CEILING,
                },
                selection: PriceInterval {
                    min: PRICE_FLOOR,
                    max: NO_PRICES_SELECTED_MAX,
                },
            };
        };

        let capped = observed_max.min(MAX_PRICE_BOUND as f64);
        let rounded = ((capped / PRICE_STEP as f64).ceil() as i64).saturating_mul(PRICE_STEP);
        let bounds = PriceInterval {
            min: PRICE_FLOOR,
            max: MIN_PRICE_CEILING.max(rounded),
        };

        let span = bounds.max - bounds.min;
        Self {
            bounds,
            selection: PriceInterval {
                min: bounds.min + span / 5,
                max: bounds.min + span * 4 / 5,
            },
        }
    }

    /// Selection covering the full bounds, i.e. no price filtering
    pub fn unrestricted(&self) -> Self {
        Self {
            bounds: self.bounds,
            selection: self.bounds,
        }
    }

    pub fn reset(&mut self) {
        self.selection = self.bounds;
    }

    /// The price predicate only applies when the selection is narrower than the bounds.
    pub fn is_narrowed(&self) -> bool {
        self.selection.min > self.bounds.min || self.selection.max < self.bounds.max
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.selection.min as f64 && price <= self.selection.max as f64
    }

    /// Moves the lower handle, stopping `MIN_SPAN` below the upper one.
    pub fn move_min(&mut self, value: i64) {
        let value = value.clamp(self.bounds.min, self.bounds.max);
        self.selection.min = value.min(self.selection.max - MIN_SPAN).max(self.bounds.min);
    }

    /// Moves the upper handle, stopping `MIN_SPAN` above the lower one.
    pub fn move_max(&mut self, value: i64) {
        let value = value.clamp(self.bounds.min, self.bounds.max);
        self.selection.max = value.max(self.selection.min + MIN_SPAN).min(self.bounds.max);
    }

    pub fn left_percent(&self) -> f64 {
        let span = self.bounds.max - self.bounds.min;
        if span == 0 {
            return 0.0;
        }
        (self.selection.min - self.bounds.min) as f64 / span as f64 * 100.0
    }

    pub fn width_percent(&self) -> f64 {
        let span = self.bounds.max - self.bounds.min;
        if span == 0 {
            return 100.0;
        }
        (self.selection.max - self.selection.min) as f64 / span as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_positive_prices_uses_defaults() {
        for prices in [vec![], vec![0.0, -5.0]] {
            let range = PriceRange::from_prices(prices);
            assert_eq!(range.bounds, PriceInterval { min: 10_000, max: 200_000 });
            assert_eq!(range.selection, PriceInterval { min: 10_000, max: 150_000 });
        }
    }

    #[test]
    fn test_small_prices_keep_minimum_ceiling() {
        let range = PriceRange::from_prices([5_000.0, 80_000.0]);
        assert_eq!(range.bounds, PriceInterval { min: 10_000, max: 200_000 });
        // span 190_000: 20% = 38_000, 80% = 152_000
        assert_eq!(range.selection, PriceInterval { min: 48_000, max: 162_000 });
        assert!(range.is_narrowed());
    }

    #[test]
    fn test_large_prices_round_up_to_step() {
        let range = PriceRange::from_prices([350_001.0, 12_000.0]);
        assert_eq!(range.bounds.max, 351_000);

        let range = PriceRange::from_prices([350_000.0]);
        assert_eq!(range.bounds.max, 350_000);
    }

    #[test]
    fn test_huge_prices_are_capped() {
        for price in [9.3e18, 1e20, f64::MAX] {
            let range = PriceRange::from_prices([price]);
            assert!(range.bounds.max <= MAX_PRICE_BOUND + PRICE_STEP);
            assert!(range.selection.min < range.selection.max);
            assert!(range.selection.max < range.bounds.max);
        }
    }

    #[test]
    fn test_unrestricted_selection_is_not_narrowed() {
        let range = PriceRange::from_prices([50_000.0]).unrestricted();
        assert!(!range.is_narrowed());
        assert!(range.contains(10_000.0));
        assert!(range.contains(200_000.0));
        assert!(!range.contains(0.0));
    }

    #[test]
    fn test_min_handle_clamps_at_minimum_span() {
        let mut range = PriceRange::from_prices([50_000.0]);
        range.move_max(100_000);
        range.move_min(99_000);
        assert_eq!(range.selection.min, range.selection.max - MIN_SPAN);

        // Already at the minimum span: dragging further right never crosses
        range.move_min(150_000);
        assert_eq!(range.selection, PriceInterval { min: 99_000, max: 100_000 });
        range.move_min(100_000);
        assert_eq!(range.selection.min, 99_000);
    }

    #[test]
    fn test_max_handle_clamps_at_minimum_span() {
        let mut range = PriceRange::from_prices([50_000.0]);
        range.move_min(60_000);
        range.move_max(20_000);
        assert_eq!(range.selection, PriceInterval { min: 60_000, max: 61_000 });
    }

    #[test]
    fn test_handles_stay_within_bounds() {
        let mut range = PriceRange::from_prices([50_000.0]);
        range.move_min(-5);
        assert_eq!(range.selection.min, PRICE_FLOOR);
        range.move_max(9_999_999);
        assert_eq!(range.selection.max, MIN_PRICE_CEILING);
        assert!(!range.is_narrowed());
    }

    #[test]
    fn test_slider_percentages() {
        let mut range = PriceRange::from_prices([]).unrestricted();
        assert_eq!(range.left_percent(), 0.0);
        assert_eq!(range.width_percent(), 100.0);

        range.move_min(105_000);
        assert_eq!(range.left_percent(), 50.0);
        assert_eq!(range.width_percent(), 50.0);
    }
}
