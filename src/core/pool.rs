use crate::domain::model::{names_equal, Group, Student};
use std::collections::HashSet;

/// Students still free to be placed: not in any committed group and not
/// holding the exempt role. Roster order is preserved.
pub fn compute_pool(roster: &[Student], groups: &[Group], exempt_role: &str) -> Vec<Student> {
    let committed: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.id.as_str()))
        .collect();

    roster
        .iter()
        .filter(|s| !committed.contains(s.id.as_str()))
        .filter(|s| !is_exempt(s, exempt_role))
        .cloned()
        .collect()
}

fn is_exempt(student: &Student, exempt_role: &str) -> bool {
    !exempt_role.trim().is_empty() && names_equal(&student.role, exempt_role)
}
