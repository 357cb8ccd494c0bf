//! Generic ordered in-memory collection.
//!
//! Identifiers come from a counter owned by the store, not from the
//! collection length, so an id is never handed out twice even after
//! deletes. Reads hand back clones; mutation goes through [`EntityStore::update`].

/// A record addressable by a unique identifier.
pub trait Record: Clone {
    type Id: PartialEq + ?Sized;

    fn id(&self) -> &Self::Id;
}

/// Where new records land in the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Oldest first
    Append,
    /// Most recent first
    Prepend,
}

pub struct EntityStore<T: Record> {
    records: Vec<T>,
    placement: Placement,
    next_seq: u64,
}

impl<T: Record> EntityStore<T> {
    pub fn new(placement: Placement) -> Self {
        Self {
            records: Vec::new(),
            placement,
            next_seq: 1,
        }
    }

    /// Build a store from seed records kept in the given order.
    /// The counter continues after the seed count.
    pub fn seeded(placement: Placement, records: Vec<T>) -> Self {
        let next_seq = records.len() as u64 + 1;
        Self {
            records,
            placement,
            next_seq,
        }
    }

    pub fn list(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    /// Insert a record built from the next sequence number.
    pub fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        let seq = self.next_seq;
        self.next_seq += 1;

        let record = build(seq);
        match self.placement {
            Placement::Append => self.records.push(record.clone()),
            Placement::Prepend => self.records.insert(0, record.clone()),
        }
        record
    }

    pub fn update(&mut self, id: &T::Id, apply: impl FnOnce(&mut T)) -> Option<T> {
        let record = self.records.iter_mut().find(|r| r.id() == id)?;
        apply(record);
        Some(record.clone())
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let idx = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.records.iter().filter(|r| pred(r)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }
}
