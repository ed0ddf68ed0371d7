use crate::domain::model::{Group, Student, DEFAULT_ROLE};
use crate::utils::error::{GroupError, Result};
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

pub fn groups_to_csv(groups: &[Group]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["group", "slot", "student_id", "name", "role"])?;

    for group in groups {
        for (slot, member) in group.members.iter().enumerate() {
            let slot = (slot + 1).to_string();
            writer.write_record([
                group.name.as_str(),
                slot.as_str(),
                member.id.as_str(),
                member.name.as_str(),
                member.role.as_str(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GroupError::IoError(e.into_error()))?;
    // Only &str fields are written, so the bytes are always UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    id: Option<String>,
}

/// Reads `name,role[,id]` rows. Rows without an id get a fresh one; a blank
/// role means an ordinary student.
pub fn roster_from_csv<R: Read>(reader: R) -> Result<Vec<Student>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut students = Vec::new();
    for row in csv_reader.deserialize::<RosterRow>() {
        let row = row?;
        let id = row
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let role = if row.role.is_empty() {
            DEFAULT_ROLE.to_string()
        } else {
            row.role
        };
        students.push(Student::new(id, row.name, role));
    }

    Ok(students)
}
