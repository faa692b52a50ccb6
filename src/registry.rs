// 🗂️ Listing Registry - in-memory snapshot with the date and cost queries

use crate::listing::Listing;
use crate::loader::{ListingSource, LoadError};

/// Read-only view over the loaded listings.
///
/// The registry owns its snapshot and never mutates it: queries hand back
/// fresh `Vec`s and leave the stored load order untouched.
pub struct ListingRegistry {
    listings: Vec<Listing>,
}

impl ListingRegistry {
    pub fn new(listings: Vec<Listing>) -> Self {
        ListingRegistry { listings }
    }

    /// Pull everything a source offers into a fresh registry.
    ///
    /// Per-line diagnostics were already reported by the loader; only
    /// file-level failures surface here.
    pub fn load_from(source: &dyn ListingSource) -> Result<Self, LoadError> {
        Ok(Self::new(source.read()?.listings))
    }

    /// All listings, most recently registered first.
    ///
    /// The sort is stable, so listings sharing a date keep their load order.
    pub fn sorted_by_date_desc(&self) -> Vec<Listing> {
        let mut sorted = self.listings.clone();
        sorted.sort_by(|a, b| b.registered_on().cmp(&a.registered_on()));
        sorted
    }

    /// Listings with `min <= cost <= max`, in load order.
    ///
    /// Both bounds are inclusive. A reversed range (`min > max`) matches
    /// nothing and comes back empty.
    pub fn filter_by_cost(&self, min: i64, max: i64) -> Vec<Listing> {
        self.listings
            .iter()
            .filter(|l| min <= l.cost() && l.cost() <= max)
            .cloned()
            .collect()
    }

    pub fn has_data(&self) -> bool {
        !self.listings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// The snapshot in load order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadReport;
    use chrono::NaiveDate;

    fn listing(owner: &str, cost: i64, y: i32, m: u32, d: u32) -> Listing {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Listing::new(owner, cost, date).unwrap()
    }

    fn sample_registry() -> ListingRegistry {
        ListingRegistry::new(vec![
            listing("Иванов И.И.", 5_400_000, 2022, 1, 15),
            listing("Петров П.П.", 30_000_000, 2023, 5, 20),
            listing("Сидоров А.А.", 67_000_000, 2021, 11, 30),
        ])
    }

    #[test]
    fn test_sorted_by_date_desc() {
        let registry = sample_registry();
        let sorted = registry.sorted_by_date_desc();

        assert_eq!(sorted[0].owner(), "Петров П.П.");
        assert_eq!(sorted[1].owner(), "Иванов И.И.");
        assert_eq!(sorted[2].owner(), "Сидоров А.А.");

        // The stored snapshot stays in load order.
        assert_eq!(registry.listings()[0].owner(), "Иванов И.И.");
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let registry = ListingRegistry::new(vec![
            listing("Первый", 100, 2022, 1, 15),
            listing("Второй", 200, 2022, 1, 15),
            listing("Новее", 300, 2023, 1, 1),
        ]);

        let sorted = registry.sorted_by_date_desc();
        assert_eq!(sorted[0].owner(), "Новее");
        assert_eq!(sorted[1].owner(), "Первый");
        assert_eq!(sorted[2].owner(), "Второй");
    }

    #[test]
    fn test_sort_is_idempotent() {
        let registry = sample_registry();
        assert_eq!(registry.sorted_by_date_desc(), registry.sorted_by_date_desc());
    }

    #[test]
    fn test_filter_by_cost_is_inclusive() {
        let registry = sample_registry();

        // Exact match on both bounds.
        let hits = registry.filter_by_cost(5_400_000, 5_400_000);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner(), "Иванов И.И.");

        // Bounds landing exactly on two of the three.
        let hits = registry.filter_by_cost(5_400_000, 30_000_000);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].owner(), "Иванов И.И.");
        assert_eq!(hits[1].owner(), "Петров П.П.");
    }

    #[test]
    fn test_filter_by_cost_no_matches() {
        let registry = sample_registry();
        assert!(registry.filter_by_cost(0, 5_000_000).is_empty());
    }

    #[test]
    fn test_reversed_range_matches_nothing() {
        let registry = sample_registry();
        assert!(registry.filter_by_cost(30_000_000, 5_400_000).is_empty());
    }

    #[test]
    fn test_filter_keeps_load_order() {
        let registry = ListingRegistry::new(vec![
            listing("Поздний", 100, 2023, 1, 1),
            listing("Ранний", 100, 2021, 1, 1),
        ]);

        let hits = registry.filter_by_cost(100, 100);
        assert_eq!(hits[0].owner(), "Поздний");
        assert_eq!(hits[1].owner(), "Ранний");
    }

    #[test]
    fn test_empty_registry() {
        let registry = ListingRegistry::new(Vec::new());

        assert!(!registry.has_data());
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.sorted_by_date_desc().is_empty());
        assert!(registry.filter_by_cost(0, i64::MAX).is_empty());
    }

    #[test]
    fn test_has_data() {
        assert!(sample_registry().has_data());
        assert_eq!(sample_registry().len(), 3);
    }

    struct FixedSource {
        listings: Vec<Listing>,
    }

    impl ListingSource for FixedSource {
        fn read(&self) -> Result<LoadReport, LoadError> {
            Ok(LoadReport {
                listings: self.listings.clone(),
                skipped: Vec::new(),
            })
        }
    }

    struct BrokenSource;

    impl ListingSource for BrokenSource {
        fn read(&self) -> Result<LoadReport, LoadError> {
            Err(LoadError::NotFound {
                path: "nowhere.txt".to_string(),
            })
        }
    }

    #[test]
    fn test_load_from_source() {
        let source = FixedSource {
            listings: vec![listing("Иванов И.И.", 5_000_000, 2022, 1, 15)],
        };

        let registry = ListingRegistry::load_from(&source).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.listings()[0].owner(), "Иванов И.И.");
    }

    #[test]
    fn test_load_from_propagates_source_failure() {
        let result = ListingRegistry::load_from(&BrokenSource);
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }
}
