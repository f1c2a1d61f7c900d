use super::types::SecretRecord;
use std::collections::HashMap;

/// Index secret records by name.
///
/// Later records overwrite earlier ones with the same name; callers that
/// need uniqueness must check it upstream.
pub fn to_secret_map<'a, I>(records: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a SecretRecord>,
{
    records
        .into_iter()
        .map(|record| (record.name.clone(), record.data.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn last_write_wins() {
        let records = vec![
            SecretRecord::new("a", "1"),
            SecretRecord::new("b", "2"),
            SecretRecord::new("a", "3"),
        ];
        let map = to_secret_map(&records);

        let expected: HashMap<String, String> = [("a", "3"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn empty_input() {
        assert!(to_secret_map(&Vec::new()).is_empty());
    }
}
