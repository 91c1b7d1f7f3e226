use tracing::debug;

use crate::repository::{
    ids::IdSource,
    record::{Collection, Record, RecordId},
};

/// Owns the current [`Collection`] and is the only thing allowed to change it.
///
/// Every operation is total: blank titles and unknown ids are ignored rather than reported.
/// Each one returns the snapshot that is current afterwards, which is the previous snapshot
/// itself when nothing changed.
#[derive(Debug)]
pub struct ListStore {
    collection: Collection,
    ids: Box<dyn IdSource>,
    /// Highest id present in or ever issued by this store
    high_water: Option<RecordId>,
}

impl ListStore {
    /// Build a store around an already restored collection.
    pub fn new(initial: Collection, ids: Box<dyn IdSource>) -> Self {
        Self {
            high_water: initial.max_id(),
            collection: initial,
            ids,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn add(&mut self, text: &str, image_url: Option<&str>) -> Collection {
        if text.trim().is_empty() {
            debug!("Ignoring blank title");
            return self.collection.clone();
        }

        let id = self.fresh_id();
        let image_url = image_url.filter(|url| !url.trim().is_empty());
        let record = Record::new(id, text, image_url);

        debug!("Added record {id}: {text}");

        self.replace(self.collection.appended(record))
    }

    pub fn toggle(&mut self, id: RecordId) -> Collection {
        let next = self.collection.toggled(id);
        if next.same_snapshot(&self.collection) {
            debug!("Toggle of unknown record {id} ignored");
        }

        self.replace(next)
    }

    pub fn delete(&mut self, id: RecordId) -> Collection {
        let next = self.collection.without(id);
        if next.same_snapshot(&self.collection) {
            debug!("Delete of unknown record {id} ignored");
        }

        self.replace(next)
    }

    /// Draw a candidate from the id source and lift it past the high-water mark if needed, so
    /// ids stay strictly increasing even when the source repeats itself or goes backwards.
    fn fresh_id(&mut self) -> RecordId {
        let candidate = self.ids.next_id();
        let id = match self.high_water.and_then(RecordId::successor) {
            Some(floor) if candidate < floor => floor,
            _ => candidate,
        };

        self.high_water = Some(id);
        id
    }

    fn replace(&mut self, next: Collection) -> Collection {
        self.collection = next;
        self.collection.clone()
    }
}

#[cfg(test)]
mod test {
    use crate::repository::ids::SequentialIds;

    use super::*;

    /// Always returns the same candidate, like a clock read twice within one millisecond
    #[derive(Debug)]
    struct StuckClock(u64);

    impl IdSource for StuckClock {
        fn next_id(&mut self) -> RecordId {
            self.0.into()
        }
    }

    fn store() -> ListStore {
        ListStore::new(Collection::default(), Box::new(SequentialIds::default()))
    }

    #[test]
    fn test_add() {
        let mut store = store();

        let collection = store.add("Dune", None);

        assert_eq!(collection.len(), 1);
        let record = collection.last().unwrap();
        assert_eq!(record.text(), "Dune");
        assert!(!record.completed());
        assert_eq!(record.image_url(), None);
        assert_eq!(store.collection(), &collection);
    }

    #[test]
    fn test_add_with_image() {
        let mut store = store();

        let collection = store.add("Foundation", Some("https://x/img.png"));

        assert_eq!(
            collection.last().unwrap().image_url(),
            Some("https://x/img.png")
        );
    }

    #[test]
    fn test_add_blank_image_is_absent() {
        let mut store = store();

        let collection = store.add("Foundation", Some("  "));

        assert_eq!(collection.last().unwrap().image_url(), None);
    }

    #[test]
    fn test_add_blank() {
        let mut store = store();
        let before = store.add("Dune", None);

        for blank in ["", "   ", "\t\n"] {
            let after = store.add(blank, None);
            assert!(after.same_snapshot(&before));
        }

        assert_eq!(store.collection().len(), 1);
    }

    #[test]
    fn test_add_keeps_text_as_given() {
        let mut store = store();

        let collection = store.add("  Dune ", None);

        assert_eq!(collection.last().unwrap().text(), "  Dune ");
    }

    #[test]
    fn test_add_preserves_order() {
        let mut store = store();

        store.add("Dune", None);
        store.add("Foundation", None);
        let collection = store.add("Hyperion", None);

        let titles: Vec<_> = collection.iter().map(|r| r.text().as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Foundation", "Hyperion"]);
    }

    #[test]
    fn test_ids_unique_when_source_repeats() {
        let mut store = ListStore::new(Collection::default(), Box::new(StuckClock(1_000)));

        store.add("Dune", None);
        store.add("Foundation", None);
        let collection = store.add("Hyperion", None);

        let ids: Vec<_> = collection.iter().map(|r| r.id().get()).collect();
        assert_eq!(ids, vec![1_000, 1_001, 1_002]);
    }

    #[test]
    fn test_ids_clear_restored_records() {
        let restored = Collection::from(vec![Record::new(50.into(), "Dune", None)]);
        let mut store = ListStore::new(restored, Box::new(StuckClock(10)));

        let collection = store.add("Foundation", None);

        assert_eq!(collection.last().unwrap().id(), 51.into());
    }

    #[test]
    fn test_toggle() {
        let mut store = store();
        store.add("Dune", None);
        let before = store.add("Foundation", None);
        let dune = before.iter().next().unwrap().id();

        let after = store.toggle(dune);
        assert!(after.get(dune).unwrap().completed());
        assert_eq!(after.last(), before.last());

        let again = store.toggle(dune);
        assert_eq!(again, before);
    }

    #[test]
    fn test_toggle_missing() {
        let mut store = store();
        let before = store.add("Dune", None);

        let after = store.toggle(999.into());

        assert!(after.same_snapshot(&before));
    }

    #[test]
    fn test_delete() {
        let mut store = store();
        store.add("Dune", None);
        let before = store.add("Foundation", None);
        store.add("Hyperion", None);
        let foundation = before.last().unwrap().id();

        let after = store.delete(foundation);

        let titles: Vec<_> = after.iter().map(|r| r.text().as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Hyperion"]);
    }

    #[test]
    fn test_delete_missing() {
        let mut store = store();
        let before = store.add("Dune", None);

        let after = store.delete(999.into());

        assert!(after.same_snapshot(&before));
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let mut store = store();
        let first = store.add("Dune", None).last().unwrap().id();
        store.delete(first);

        let second = store.add("Foundation", None).last().unwrap().id();

        assert!(second > first);
    }
}
