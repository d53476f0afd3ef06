// core/resolver.rs
//
// Initialization order for a set of body records. The reference star comes
// first, and every other body comes after its parent, so a single forward
// pass over the order always sees the parent's current transform.
//
// Among bodies that are ready at the same time the order is:
//   reference first → ascending order_from_parent (unset last) → id

use std::collections::{BTreeSet, HashMap};

use crate::assets::dataset::BodyRecord;
use crate::error::{ConfigError, ConfigResult};

/// Result of resolving a record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrder {
    /// Record indices in initialization order. Records dropped as
    /// duplicates do not appear.
    pub order: Vec<usize>,
    /// Parent record index for each record, indexed like the input.
    /// `None` for the reference body, for orphans and for dropped duplicates.
    pub parents: Vec<Option<usize>>,
    /// Record index of the reference body.
    pub reference: usize,
}

impl ResolvedOrder {
    /// Ids in initialization order.
    pub fn ids<'a>(&self, records: &'a [BodyRecord]) -> Vec<&'a str> {
        self.order.iter().map(|&i| records[i].id.as_str()).collect()
    }
}

/// Sort key for bodies whose parent is already placed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyKey<'a> {
    not_reference: bool,
    order_missing: bool,
    order: u32,
    id: &'a str,
    index: usize,
}

impl<'a> ReadyKey<'a> {
    fn new(index: usize, record: &'a BodyRecord) -> Self {
        Self {
            not_reference: !record.is_reference,
            order_missing: record.order_from_parent.is_none(),
            order: record.order_from_parent.unwrap_or(u32::MAX),
            id: &record.id,
            index,
        }
    }
}

/// Index records by id. The first record with a given id wins; later ones
/// are dropped with a warning.
fn index_ids(records: &[BodyRecord]) -> (HashMap<&str, usize>, Vec<bool>) {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut kept = vec![true; records.len()];
    for (i, record) in records.iter().enumerate() {
        if index.contains_key(record.id.as_str()) {
            log::warn!("duplicate body id '{}' (record {i}); keeping the first", record.id);
            kept[i] = false;
        } else {
            index.insert(record.id.as_str(), i);
        }
    }
    (index, kept)
}

/// Link every kept record to its parent. Dangling or missing parents are
/// logged and the body is treated as orbiting the world origin.
fn link_parents(
    records: &[BodyRecord],
    index: &HashMap<&str, usize>,
    kept: &[bool],
) -> Vec<Option<usize>> {
    records
        .iter()
        .zip(kept)
        .map(|(record, &kept)| {
            if !kept {
                return None;
            }
            if record.is_reference {
                if let Some(parent) = &record.parent_id {
                    log::warn!(
                        "reference body '{}' names parent '{}'; ignoring it",
                        record.id, parent
                    );
                }
                return None;
            }
            match record.parent_id.as_deref() {
                None => {
                    log::warn!("body '{}' has no parent; it will orbit the origin", record.id);
                    None
                }
                Some(parent) => match index.get(parent) {
                    Some(&p) => Some(p),
                    None => {
                        log::warn!(
                            "body '{}' names unknown parent '{}'; it will orbit the origin",
                            record.id, parent
                        );
                        None
                    }
                },
            }
        })
        .collect()
}

/// Resolve the initialization order.
///
/// Fails on an empty set, a missing or ambiguous reference body, or a parent
/// cycle. Everything else, duplicate ids included, degrades with a warning.
pub fn resolve_order(records: &[BodyRecord]) -> ConfigResult<ResolvedOrder> {
    if records.is_empty() {
        return Err(ConfigError::Empty);
    }

    let (index, kept) = index_ids(records);
    let live = kept.iter().filter(|&&k| k).count();

    let references: Vec<usize> = (0..records.len())
        .filter(|&i| kept[i] && records[i].is_reference)
        .collect();
    let reference = match references.as_slice() {
        [] => return Err(ConfigError::MissingReference),
        [only] => *only,
        many => {
            let mut ids: Vec<String> = many.iter().map(|&i| records[i].id.clone()).collect();
            ids.sort();
            return Err(ConfigError::MultipleReferences(ids));
        }
    };

    let parents = link_parents(records, &index, &kept);
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(child);
        }
    }

    let mut ready: BTreeSet<ReadyKey> = parents
        .iter()
        .enumerate()
        .filter(|&(i, parent)| kept[i] && parent.is_none())
        .map(|(i, _)| ReadyKey::new(i, &records[i]))
        .collect();

    let mut order = Vec::with_capacity(live);
    while let Some(next) = ready.pop_first() {
        order.push(next.index);
        for &child in &children[next.index] {
            ready.insert(ReadyKey::new(child, &records[child]));
        }
    }

    if order.len() < live {
        let mut placed = vec![false; records.len()];
        for &i in &order {
            placed[i] = true;
        }
        let mut stuck: Vec<String> = (0..records.len())
            .filter(|&i| kept[i] && !placed[i])
            .map(|i| records[i].id.clone())
            .collect();
        stuck.sort();
        return Err(ConfigError::ParentCycle(stuck));
    }

    log::debug!("resolved initialization order for {} bodies", order.len());
    Ok(ResolvedOrder { order, parents, reference })
}
