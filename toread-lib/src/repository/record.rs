//! The records of the to-read list and the immutable snapshots that hold them.

use std::{iter, slice, sync::Arc};

use derive_more::{Display, From};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

/// Identifies a single [`Record`]. Unique within a [`Collection`].
///
/// Stored as a non-negative JSON integer. A payload holding a negative or fractional id does not
/// decode, so the whole stored list is rejected rather than partially loaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id directly after this one, if there is one.
    pub(crate) fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

/// A single entry on the to-read list.
///
/// Records are only ever created by the [`ListStore`](super::ListStore); everything else reads
/// them through the getters.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[getset(get_copy = "pub")]
    id: RecordId,
    /// The book title
    #[getset(get = "pub")]
    text: String,
    #[getset(get_copy = "pub")]
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl Record {
    pub(crate) fn new(id: RecordId, text: &str, image_url: Option<&str>) -> Self {
        Self {
            id,
            text: text.to_string(),
            completed: false,
            image_url: image_url.map(str::to_string),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn flipped(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// An ordered, immutable snapshot of every [`Record`].
///
/// Cloning is cheap. Every change produces a new snapshot, so anyone holding an older one keeps
/// seeing exactly what they were handed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    records: Arc<[Record]>,
}

impl Collection {
    /// A new snapshot with `record` at the end.
    pub fn appended(&self, record: Record) -> Self {
        self.records
            .iter()
            .cloned()
            .chain(iter::once(record))
            .collect()
    }

    /// A new snapshot with the completion of `id` flipped. Returns this very snapshot if no
    /// record has that id.
    pub fn toggled(&self, id: RecordId) -> Self {
        if !self.contains(id) {
            return self.clone();
        }

        self.records
            .iter()
            .map(|r| if r.id == id { r.flipped() } else { r.clone() })
            .collect()
    }

    /// A new snapshot without `id`. Returns this very snapshot if no record has that id.
    pub fn without(&self, id: RecordId) -> Self {
        if !self.contains(id) {
            return self.clone();
        }

        self.records.iter().filter(|r| r.id != id).cloned().collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Number of records marked as completed. Always derived, never stored.
    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }

    pub fn max_id(&self) -> Option<RecordId> {
        self.records.iter().map(Record::id).max()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Whether both handles point at the same snapshot, as opposed to equal contents.
    pub fn same_snapshot(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Record>> for Collection {
    fn from(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Collection {
        Collection::from(vec![
            Record::new(1.into(), "Dune", None),
            Record::new(2.into(), "Foundation", Some("https://x/img.png")),
            Record::new(3.into(), "Hyperion", None),
        ])
    }

    fn titles(collection: &Collection) -> Vec<&str> {
        collection.iter().map(|r| r.text().as_str()).collect()
    }

    #[test]
    fn test_appended() {
        let before = sample();
        let after = before.appended(Record::new(4.into(), "Solaris", None));

        assert_eq!(before.len(), 3);
        assert_eq!(after.len(), 4);
        assert_eq!(after.last().unwrap().text(), "Solaris");
        assert!(!after.last().unwrap().completed());
    }

    #[test]
    fn test_toggled() {
        let before = sample();
        let after = before.toggled(2.into());

        assert!(after.get(2.into()).unwrap().completed());
        assert!(!after.get(1.into()).unwrap().completed());
        assert!(!after.get(3.into()).unwrap().completed());
        assert_eq!(titles(&after), titles(&before));
        // The old snapshot is untouched
        assert!(!before.get(2.into()).unwrap().completed());

        assert_eq!(after.toggled(2.into()), before);
    }

    #[test]
    fn test_toggled_missing() {
        let before = sample();
        let after = before.toggled(42.into());

        assert!(after.same_snapshot(&before));
    }

    #[test]
    fn test_without() {
        let before = sample();
        let after = before.without(2.into());

        assert_eq!(titles(&after), vec!["Dune", "Hyperion"]);
        assert!(before.without(42.into()).same_snapshot(&before));
    }

    #[test]
    fn test_completed_count() {
        let collection = sample().toggled(1.into()).toggled(3.into());

        assert_eq!(collection.completed_count(), 2);
        assert_eq!(Collection::default().completed_count(), 0);
    }

    #[test]
    fn test_image_url() {
        let collection = sample();

        assert_eq!(
            collection.get(2.into()).unwrap().image_url(),
            Some("https://x/img.png")
        );
        assert_eq!(collection.get(1.into()).unwrap().image_url(), None);
    }

    #[test]
    fn test_max_id() {
        assert_eq!(sample().max_id(), Some(3.into()));
        assert_eq!(Collection::default().max_id(), None);
    }
}
