use crate::core::constraint::rebind_overdue;
use crate::domain::model::{DrawBuffer, ReservedSlotMap, Student};
use crate::utils::error::{GroupError, Result};

/// In-progress assembly of a single group.
///
/// `reserved` is `None` while no group is being assembled; it is filled once
/// per group when the first draw (or an explicit start) happens.
#[derive(Debug, Default)]
pub struct DrawSession {
    buffer: DrawBuffer,
    reserved: Option<ReservedSlotMap>,
    drawing: bool,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.reserved.is_some()
    }

    pub fn open(&mut self, reserved: ReservedSlotMap) {
        self.reserved = Some(reserved);
    }

    pub fn reserved(&self) -> Option<&ReservedSlotMap> {
        self.reserved.as_ref()
    }

    pub fn buffer(&self) -> &[Student] {
        &self.buffer
    }

    /// Slot the next drawn student will occupy.
    pub fn next_slot(&self) -> usize {
        self.buffer.len()
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.buffer.iter().any(|s| s.id == student_id)
    }

    pub fn push(&mut self, student: Student) {
        self.buffer.push(student);
    }

    /// Takes a drawn student back out. Emptying the buffer ends the session,
    /// so the next draw maps fresh reservations.
    pub fn remove(&mut self, student_id: &str) -> Result<Student> {
        let index = self
            .buffer
            .iter()
            .position(|s| s.id == student_id)
            .ok_or_else(|| GroupError::StudentNotFound {
                id: student_id.to_string(),
            })?;

        let student = self.buffer.remove(index);
        if self.buffer.is_empty() {
            self.reserved = None;
        } else if let Some(reserved) = self.reserved.as_mut() {
            rebind_overdue(reserved, &self.buffer);
        }
        Ok(student)
    }

    /// Refreshes a buffered copy after the roster entry changed.
    pub fn replace(&mut self, student: &Student) {
        if let Some(slot) = self.buffer.iter_mut().find(|s| s.id == student.id) {
            *slot = student.clone();
        }
    }

    /// Closes a session that has not drawn anyone yet.
    pub fn close_if_idle(&mut self) {
        if self.buffer.is_empty() {
            self.reserved = None;
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.reserved = None;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn begin_draw(&mut self) -> Result<()> {
        if self.drawing {
            return Err(GroupError::DrawInProgress);
        }
        self.drawing = true;
        Ok(())
    }

    pub fn end_draw(&mut self) {
        self.drawing = false;
    }
}
