use crate::domain::model::{ReservedSlotMap, Student};
use crate::utils::error::{GroupError, Result};
use rand::Rng;

/// Picks the student for `slot` from `pool` without mutating anything.
///
/// A reservation for this slot wins if its student is still in the pool.
/// Otherwise reserved students are held back and the pick is uniform over
/// the rest, falling back to the whole pool when only reserved students
/// remain.
pub fn draw_next<R: Rng + ?Sized>(
    slot: usize,
    pool: &[Student],
    reserved: &ReservedSlotMap,
    rng: &mut R,
) -> Result<Student> {
    if pool.is_empty() {
        return Err(GroupError::NoCandidates);
    }

    if let Some(name) = reserved.get(&slot) {
        if let Some(student) = pool.iter().find(|s| s.name_matches(name)) {
            tracing::debug!(slot, "Reserved slot filled");
            return Ok(student.clone());
        }
    }

    let generic: Vec<&Student> = pool
        .iter()
        .filter(|s| !reserved.values().any(|name| s.name_matches(name)))
        .collect();

    let picked = if generic.is_empty() {
        &pool[rng.gen_range(0..pool.len())]
    } else {
        generic[rng.gen_range(0..generic.len())]
    };

    Ok(picked.clone())
}
