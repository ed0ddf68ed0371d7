//! Reserved slot mapping for anchor students.
//!
//! When a new group starts filling, the two configured anchors (if both are
//! still in the pool) get fixed slots: one at the entry slot (0 or 1) and the
//! other one to three slots later. The randomness here is cosmetic and
//! deliberately non-cryptographic.

use crate::domain::model::{ReservedSlotMap, Student};
use rand::Rng;

pub const ENTRY_SLOTS: [usize; 2] = [0, 1];
pub const MIN_EXIT_OFFSET: usize = 1;
pub const MAX_EXIT_OFFSET: usize = 3;

pub fn map_reserved_slots<R: Rng + ?Sized>(
    pool: &[Student],
    anchors: Option<(&str, &str)>,
    rng: &mut R,
) -> ReservedSlotMap {
    let mut reserved = ReservedSlotMap::new();

    let Some((first, second)) = anchors else {
        return reserved;
    };

    let (Some(a), Some(b)) = (
        pool.iter().find(|s| s.name_matches(first)),
        pool.iter().find(|s| s.name_matches(second)),
    ) else {
        tracing::debug!("Anchor pair not fully present in pool, no slots reserved");
        return reserved;
    };

    let entry_slot = ENTRY_SLOTS[rng.gen_range(0..ENTRY_SLOTS.len())];
    let offset = rng.gen_range(MIN_EXIT_OFFSET..=MAX_EXIT_OFFSET);
    let exit_slot = entry_slot + offset;

    let (entry_name, exit_name) = if rng.gen_bool(0.5) {
        (&a.name, &b.name)
    } else {
        (&b.name, &a.name)
    };

    reserved.insert(entry_slot, entry_name.clone());
    reserved.insert(exit_slot, exit_name.clone());

    tracing::debug!(entry_slot, exit_slot, "Reserved anchor slots");
    reserved
}

/// Moves reservations for anchors that are not in `drawn` but whose slot
/// is already behind the next draw, to the first free slot from there on.
/// Keeps a returned anchor in the group it was mapped to.
pub fn rebind_overdue(reserved: &mut ReservedSlotMap, drawn: &[Student]) {
    let next_slot = drawn.len();
    let overdue: Vec<(usize, String)> = reserved
        .iter()
        .filter(|(slot, name)| **slot < next_slot && !drawn.iter().any(|s| s.name_matches(name)))
        .map(|(slot, name)| (*slot, name.clone()))
        .collect();

    for (slot, name) in overdue {
        reserved.remove(&slot);
        let mut target = next_slot;
        while reserved.contains_key(&target) {
            target += 1;
        }
        tracing::debug!(from = slot, to = target, "Rebound reserved slot");
        reserved.insert(target, name);
    }
}
