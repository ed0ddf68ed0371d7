use crate::domain::model::{Group, Student};
use crate::utils::error::{GroupError, Result};
use chrono::Utc;
use uuid::Uuid;

/// Commits the drawn students as a new group. A blank name becomes
/// "Group N", numbered after the groups that already exist.
pub fn finalize(name: &str, buffer: &[Student], existing: &[Group]) -> Result<Group> {
    if buffer.is_empty() {
        return Err(GroupError::EmptyDrawBuffer);
    }

    let name = match name.trim() {
        "" => format!("Group {}", existing.len() + 1),
        trimmed => trimmed.to_string(),
    };

    Ok(Group {
        id: Uuid::new_v4().to_string(),
        name,
        members: buffer.to_vec(),
        created_at: Utc::now(),
    })
}
