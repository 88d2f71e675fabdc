//! The fixed price ranges used by the bar chart.

use serde::{Deserialize, Serialize};

/// The lower bound of each price bucket. The final bucket has no upper bound.
const BUCKET_LOWER_BOUNDS: [u32; 10] = [0, 100, 200, 300, 400, 500, 600, 700, 800, 900];

/// One price range of the bar chart and the number of transactions in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// The label of the price range, e.g. "100-200" or "900+".
    pub range: String,
    /// The number of transactions whose price falls in the range.
    pub count: u32,
}

/// Distribute grouped price counts into the ten fixed price buckets.
///
/// Each entry of `price_counts` pairs a price with the number of transactions
/// at that price. All ten buckets are always returned in ascending price
/// order, including empty ones, so chart clients get a stable shape.
pub fn bucket_price_counts(price_counts: &[(f64, u32)]) -> Vec<PriceBucket> {
    let mut bucket_counts = [0u32; BUCKET_LOWER_BOUNDS.len()];

    for &(price, count) in price_counts {
        bucket_counts[bucket_index(price)] += count;
    }

    BUCKET_LOWER_BOUNDS
        .iter()
        .enumerate()
        .map(|(index, &lower_bound)| {
            let range = match BUCKET_LOWER_BOUNDS.get(index + 1) {
                Some(upper_bound) => format!("{lower_bound}-{upper_bound}"),
                None => format!("{lower_bound}+"),
            };

            PriceBucket {
                range,
                count: bucket_counts[index],
            }
        })
        .collect()
}

/// The index of the bucket that `price` falls into.
///
/// A bucket covers prices from its lower bound up to but not including the
/// next bucket's lower bound. Prices below the first lower bound land in the
/// first bucket so that every price maps to exactly one bucket.
fn bucket_index(price: f64) -> usize {
    BUCKET_LOWER_BOUNDS
        .iter()
        .rposition(|&lower_bound| price >= lower_bound as f64)
        .unwrap_or(0)
}

#[cfg(test)]
mod bucket_price_counts_tests {
    use super::{PriceBucket, bucket_price_counts};

    fn bucket(range: &str, count: u32) -> PriceBucket {
        PriceBucket {
            range: range.to_owned(),
            count,
        }
    }

    #[test]
    fn returns_all_ten_buckets_for_no_prices() {
        let want = vec![
            bucket("0-100", 0),
            bucket("100-200", 0),
            bucket("200-300", 0),
            bucket("300-400", 0),
            bucket("400-500", 0),
            bucket("500-600", 0),
            bucket("600-700", 0),
            bucket("700-800", 0),
            bucket("800-900", 0),
            bucket("900+", 0),
        ];

        let got = bucket_price_counts(&[]);

        assert_eq!(want, got);
    }

    #[test]
    fn assigns_prices_on_bucket_boundaries_to_upper_bucket() {
        let got = bucket_price_counts(&[(100.0, 1)]);

        assert_eq!(bucket("0-100", 0), got[0]);
        assert_eq!(bucket("100-200", 1), got[1]);
    }

    #[test]
    fn assigns_prices_just_below_boundary_to_lower_bucket() {
        let got = bucket_price_counts(&[(99.99, 1)]);

        assert_eq!(bucket("0-100", 1), got[0]);
        assert_eq!(bucket("100-200", 0), got[1]);
    }

    #[test]
    fn final_bucket_has_no_upper_bound() {
        let got = bucket_price_counts(&[(900.0, 1), (12345.67, 1)]);

        assert_eq!(bucket("900+", 2), got[9]);
    }

    #[test]
    fn negative_prices_land_in_first_bucket() {
        let got = bucket_price_counts(&[(-5.0, 1)]);

        assert_eq!(bucket("0-100", 1), got[0]);
    }

    #[test]
    fn sums_counts_within_a_bucket() {
        let got = bucket_price_counts(&[(10.0, 2), (55.5, 3), (150.0, 1)]);

        assert_eq!(bucket("0-100", 5), got[0]);
        assert_eq!(bucket("100-200", 1), got[1]);
    }
}
