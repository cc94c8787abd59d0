//! Listing filters, modeled as a pure function over the row snapshot.
//!
//! The browse page fetches the full row set once and re-filters it in memory
//! on every apply; `public/js/apartments.js` runs these predicates in the
//! browser. Keeping the routine here as well makes the semantics (blank
//! inputs pass everything, null fields cannot be filtered out, the second
//! distance metric only exists for dev sessions) testable without a
//! browser.

use crate::models::apartment::Apartment;

/// One filter pass over the row snapshot. Blank form inputs map to `None`.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Case-insensitive substring match against the listing name.
    pub name: Option<String>,
    /// Inclusive price range; either bound may be blank.
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Inclusive square-footage range.
    pub sqft_min: Option<f64>,
    pub sqft_max: Option<f64>,
    /// Exact bedroom count. Not a range.
    pub bedrooms: Option<f64>,
    /// Exact bathroom count. Not a range.
    pub bathrooms: Option<f64>,
    /// Upper bound on the primary proximity metric.
    pub distance1_max: Option<f64>,
    /// Upper bound on the secondary proximity metric. Only consulted for
    /// dev sessions.
    pub distance2_max: Option<f64>,
}

impl Filters {
    /// Whether a single row survives every predicate (logical AND).
    pub fn matches(&self, row: &Apartment, is_dev: bool) -> bool {
        if let Some(query) = self.name.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() && !row.name.to_lowercase().contains(&query) {
                return false;
            }
        }

        if !in_range(row.price, self.price_min, self.price_max) {
            return false;
        }
        if !in_range(Some(row.square_footage), self.sqft_min, self.sqft_max) {
            return false;
        }

        if let Some(beds) = self.bedrooms {
            if row.bedrooms != beds {
                return false;
            }
        }
        if let Some(baths) = self.bathrooms {
            if row.bathrooms != baths {
                return false;
            }
        }

        if !within_max(row.distance1, self.distance1_max) {
            return false;
        }
        // The secondary metric is privileged: for non-dev sessions this
        // predicate is inert no matter what the form holds.
        if is_dev && !within_max(row.distance2, self.distance2_max) {
            return false;
        }

        true
    }
}

/// Inclusive range check with blank bounds defaulting to `[0, +inf)`.
/// A null value always passes.
fn in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    match value {
        Some(v) => v >= min.unwrap_or(0.0) && v <= max.unwrap_or(f64::INFINITY),
        None => true,
    }
}

/// Upper-bound check; a null value or a blank bound always passes.
fn within_max(value: Option<f64>, max: Option<f64>) -> bool {
    match (value, max) {
        (Some(v), Some(max)) => v <= max,
        _ => true,
    }
}

/// Apply one filter pass to the row snapshot, preserving order.
pub fn filter_rows<'a>(
    rows: &'a [Apartment],
    filters: &Filters,
    is_dev: bool,
) -> Vec<&'a Apartment> {
    rows.iter()
        .filter(|row| filters.matches(row, is_dev))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apartment(id: i32, name: &str, price: Option<f64>) -> Apartment {
        Apartment {
            id,
            name: name.to_string(),
            price,
            square_footage: 800.0,
            bedrooms: 2.0,
            bathrooms: 1.0,
            distance1: Some(5.0),
            distance2: Some(10.0),
            url: None,
        }
    }

    fn snapshot() -> Vec<Apartment> {
        vec![
            apartment(1, "The Aspens", Some(1589.0)),
            apartment(2, "Creekside Commons", Some(1857.0)),
            apartment(3, "Granite Flats", None),
            Apartment {
                bedrooms: 3.0,
                bathrooms: 1.5,
                square_footage: 1240.0,
                distance1: None,
                distance2: None,
                ..apartment(4, "Willow Park", Some(2105.0))
            },
        ]
    }

    fn ids(rows: &[&Apartment]) -> Vec<i32> {
        rows.iter().map(|a| a.id).collect()
    }

    #[test]
    fn default_filters_pass_every_row() {
        let rows = snapshot();
        let kept = filter_rows(&rows, &Filters::default(), false);
        assert_eq!(ids(&kept), vec![1, 2, 3, 4]);
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let rows = snapshot();
        let filters = Filters {
            name: Some("CREEK".to_string()),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![2]);

        // Whitespace-only queries pass everything, same as blank.
        let filters = Filters {
            name: Some("   ".to_string()),
            ..Filters::default()
        };
        assert_eq!(filter_rows(&rows, &filters, false).len(), 4);
    }

    #[test]
    fn null_price_survives_any_price_range() {
        let rows = snapshot();
        for (min, max) in [
            (None, None),
            (Some(0.0), Some(0.0)),
            (Some(100_000.0), None),
            (None, Some(1.0)),
            (Some(1600.0), Some(1900.0)),
        ] {
            let filters = Filters {
                price_min: min,
                price_max: max,
                ..Filters::default()
            };
            let kept = filter_rows(&rows, &filters, false);
            assert!(
                kept.iter().any(|a| a.id == 3),
                "null-price row dropped by range {min:?}..{max:?}"
            );
        }
    }

    #[test]
    fn price_range_is_inclusive() {
        let rows = snapshot();
        let filters = Filters {
            price_min: Some(1589.0),
            price_max: Some(1857.0),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![1, 2, 3]);
    }

    #[test]
    fn blank_bedroom_and_bathroom_filters_are_identity() {
        let rows = snapshot();
        let filters = Filters {
            bedrooms: None,
            bathrooms: None,
            ..Filters::default()
        };
        assert_eq!(
            ids(&filter_rows(&rows, &filters, false)),
            ids(&filter_rows(&rows, &Filters::default(), false))
        );
    }

    #[test]
    fn bedroom_and_bathroom_filters_match_exactly() {
        let rows = snapshot();
        let filters = Filters {
            bedrooms: Some(3.0),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![4]);

        // 1.5 baths is an exact value, not "at least one".
        let filters = Filters {
            bathrooms: Some(1.5),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![4]);
    }

    #[test]
    fn square_footage_range_applies() {
        let rows = snapshot();
        let filters = Filters {
            sqft_min: Some(1000.0),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![4]);
    }

    #[test]
    fn distance1_upper_bound_keeps_null_distances() {
        let rows = snapshot();
        let filters = Filters {
            distance1_max: Some(1.0),
            ..Filters::default()
        };
        // Rows 1-3 sit at distance 5.0 and are dropped; row 4 has no
        // distance recorded and passes.
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![4]);
    }

    #[test]
    fn distance2_filter_is_inert_for_non_dev_sessions() {
        let rows = snapshot();
        let filters = Filters {
            distance2_max: Some(0.0),
            ..Filters::default()
        };
        let unfiltered = filter_rows(&rows, &Filters::default(), false);
        let filtered = filter_rows(&rows, &filters, false);
        assert_eq!(ids(&filtered), ids(&unfiltered));
    }

    #[test]
    fn distance2_filter_applies_for_dev_sessions() {
        let rows = snapshot();
        let filters = Filters {
            distance2_max: Some(0.0),
            ..Filters::default()
        };
        // Rows with distance2 = 10.0 drop; the row with a null distance2
        // still passes.
        assert_eq!(ids(&filter_rows(&rows, &filters, true)), vec![4]);
    }

    #[test]
    fn clearing_filters_restores_the_full_set() {
        let rows = snapshot();
        let narrow = Filters {
            name: Some("aspens".to_string()),
            price_min: Some(1000.0),
            price_max: Some(1600.0),
            bedrooms: Some(2.0),
            distance1_max: Some(6.0),
            distance2_max: Some(12.0),
            ..Filters::default()
        };
        assert_eq!(ids(&filter_rows(&rows, &narrow, true)), vec![1]);

        // "Clear" resets every input, equivalent to an all-pass filter.
        let cleared = Filters::default();
        assert_eq!(ids(&filter_rows(&rows, &cleared, true)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn predicates_combine_as_a_conjunction() {
        let rows = snapshot();
        let filters = Filters {
            name: Some("s".to_string()),
            price_max: Some(1900.0),
            bedrooms: Some(2.0),
            ..Filters::default()
        };
        // "s" matches 1, 2, 3; the price cap keeps 1, 2 and the null-price
        // row; bedrooms = 2 keeps all three of those.
        assert_eq!(ids(&filter_rows(&rows, &filters, false)), vec![1, 2, 3]);
    }
}
