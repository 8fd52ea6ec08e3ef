use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::model::{AggregationBucket, AggregationKey, MeasureUpdate};

/// Accumulation map for one import pass, private to that pass.
///
/// Repeated keys sum: duplicate rows, or distinct raw spellings that
/// collapse into one canonical company, must add up rather than
/// overwrite. The line name follows the most recent non-empty value.
#[derive(Debug, Default)]
pub struct Aggregation {
    buckets: HashMap<AggregationKey, AggregationBucket>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one (row, company, share) contribution.
    pub fn add(&mut self, key: AggregationKey, share: Decimal, line_name: &str) {
        match self.buckets.get_mut(&key) {
            Some(bucket) => {
                bucket.passengers += share;
                if !line_name.is_empty() {
                    bucket.line_name = line_name.to_string();
                }
            }
            None => {
                self.buckets.insert(
                    key,
                    AggregationBucket {
                        passengers: share,
                        line_name: line_name.to_string(),
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drain into sink updates, sorted by key so writes are
    /// deterministic run to run.
    pub fn into_updates(self) -> Vec<MeasureUpdate> {
        let mut updates: Vec<MeasureUpdate> = self
            .buckets
            .into_iter()
            .map(|(key, bucket)| MeasureUpdate {
                date: key.date,
                line_code: key.line_code,
                line_name: bucket.line_name,
                company: key.company,
                value: bucket.passengers,
            })
            .collect();
        updates.sort_by(|a, b| {
            (&a.date, &a.line_code, &a.company).cmp(&(&b.date, &b.line_code, &b.company))
        });
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn key(date: &str, line: &str, company: &str) -> AggregationKey {
        AggregationKey {
            date: date.to_string(),
            line_code: line.to_string(),
            company: company.to_string(),
        }
    }

    #[test]
    fn test_repeated_keys_sum() {
        let mut agg = Aggregation::new();
        agg.add(key("2024-01-15", "501", "ABC"), dec!(50), "Lapa");
        agg.add(key("2024-01-15", "501", "ABC"), dec!(25.5), "Lapa");
        assert_eq!(agg.len(), 1);

        let updates = agg.into_updates();
        assert_eq!(updates[0].value, dec!(75.5));
    }

    #[test]
    fn test_distinct_keys_kept_apart() {
        let mut agg = Aggregation::new();
        agg.add(key("2024-01-15", "501", "ABC"), dec!(50), "Lapa");
        agg.add(key("2024-01-15", "501", "DEF"), dec!(50), "Lapa");
        agg.add(key("2024-01-16", "501", "ABC"), dec!(50), "Lapa");
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn test_line_name_last_non_empty_wins() {
        let mut agg = Aggregation::new();
        agg.add(key("2024-01-15", "501", "ABC"), dec!(1), "Old Name");
        agg.add(key("2024-01-15", "501", "ABC"), dec!(1), "New Name");
        agg.add(key("2024-01-15", "501", "ABC"), dec!(1), "");

        let updates = agg.into_updates();
        assert_eq!(updates[0].line_name, "New Name");
    }

    #[test]
    fn test_updates_sorted_by_key() {
        let mut agg = Aggregation::new();
        agg.add(key("2024-01-16", "501", "ABC"), dec!(1), "n");
        agg.add(key("2024-01-15", "502", "ABC"), dec!(1), "n");
        agg.add(key("2024-01-15", "501", "DEF"), dec!(1), "n");
        agg.add(key("2024-01-15", "501", "ABC"), dec!(1), "n");

        let updates = agg.into_updates();
        let keys: Vec<(&str, &str, &str)> = updates
            .iter()
            .map(|u| (u.date.as_str(), u.line_code.as_str(), u.company.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01-15", "501", "ABC"),
                ("2024-01-15", "501", "DEF"),
                ("2024-01-15", "502", "ABC"),
                ("2024-01-16", "501", "ABC"),
            ]
        );
    }
}
