//! Partitioning records by a categorical field.

use indexmap::IndexMap;

use crate::record::Record;

/// Records grouped by key, in first-occurrence order of the keys.
pub type Groups<'a> = IndexMap<String, Vec<&'a Record>>;

/// Group `records` by the stringified value of `key_field`.
///
/// Records missing the field land in the [`MISSING_KEY`](crate::record::MISSING_KEY)
/// group; callers filter it out if unwanted.
pub fn group_by<'a>(records: &'a [Record], key_field: &str) -> Groups<'a> {
    let mut groups: Groups<'a> = IndexMap::new();
    for record in records {
        groups.entry(record.key(key_field)).or_default().push(record);
    }
    groups
}

/// Number of records per key value, in first-occurrence order.
pub fn count_by(records: &[Record], key_field: &str) -> IndexMap<String, usize> {
    group_by(records, key_field)
        .into_iter()
        .map(|(key, members)| (key, members.len()))
        .collect()
}
