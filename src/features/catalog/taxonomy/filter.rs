use super::enrichment::EnrichedBanknote;
use super::price_range::PriceRange;

/// Case-insensitive substring match on the denomination; blank text matches everything.
pub fn matches_text(denomination: &str, text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || denomination.to_lowercase().contains(&text.to_lowercase())
}

/// Applies the text and price predicates to an untouched base list.
///
/// The price predicate is enforced only while the selection is narrower than the
/// bounds. The result never depends on a previous call.
pub fn apply_filters(
    base: &[EnrichedBanknote],
    text: &str,
    price: &PriceRange,
) -> Vec<EnrichedBanknote> {
    let enforce_price = price.is_narrowed();

    base.iter()
        .filter(|b| matches_text(&b.banknote.denominacion, text))
        .filter(|b| !enforce_price || price.contains(b.numeric_price))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::enrichment::{enrich_all, fixtures::banknote};
    use super::*;

    fn denominations(list: &[EnrichedBanknote]) -> Vec<&str> {
        list.iter().map(|b| b.banknote.denominacion.as_str()).collect()
    }

    #[test]
    fn test_text_filter_keeps_substring_matches() {
        let base = enrich_all(vec![
            banknote(1, "50 Pesos", "Colombia", "co", "50000"),
            banknote(2, "100 Pesos", "Colombia", "co", "60000"),
        ]);
        let price = PriceRange::from_prices([]).unrestricted();

        assert_eq!(denominations(&apply_filters(&base, "50", &price)), vec!["50 Pesos"]);
        assert_eq!(
            denominations(&apply_filters(&base, "PESOS", &price)),
            vec!["50 Pesos", "100 Pesos"]
        );
        assert_eq!(apply_filters(&base, "   ", &price).len(), 2);
    }

    #[test]
    fn test_price_filter_only_when_narrowed() {
        let base = enrich_all(vec![
            banknote(1, "a", "Colombia", "co", "0"),
            banknote(2, "b", "Colombia", "co", "20000"),
            banknote(3, "c", "Colombia", "co", "90000"),
        ]);

        let full = PriceRange::from_prices([20_000.0, 90_000.0]).unrestricted();
        assert_eq!(apply_filters(&base, "", &full).len(), 3);

        let mut narrowed = full;
        narrowed.move_max(50_000);
        assert_eq!(denominations(&apply_filters(&base, "", &narrowed)), vec!["b"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let base = enrich_all(vec![
            banknote(1, "50 Pesos", "Colombia", "co", "50000"),
            banknote(2, "100 Pesos", "Colombia", "co", "150000"),
        ]);
        let mut price = PriceRange::from_prices([50_000.0, 150_000.0]);
        price.move_min(40_000);

        let first = apply_filters(&base, "pesos", &price);
        let second = apply_filters(&base, "pesos", &price);
        assert_eq!(denominations(&first), denominations(&second));
    }
}
