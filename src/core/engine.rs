use crate::core::constraint::map_reserved_slots;
use crate::core::draw::draw_next;
use crate::core::finalize;
use crate::core::pool::compute_pool;
use crate::core::session::DrawSession;
use crate::core::store::AppStore;
use crate::domain::model::{names_equal, Group, ReservedSlotMap, SiteState, Student, DEFAULT_ROLE};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GroupError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

pub const DEFAULT_EXEMPT_ROLE: &str = "Wali Kelas";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSettings {
    pub exempt_role: String,
    pub anchors: Option<(String, String)>,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            exempt_role: DEFAULT_EXEMPT_ROLE.to_string(),
            anchors: None,
        }
    }
}

impl DrawSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            exempt_role: config.exempt_role().to_string(),
            anchors: config
                .anchors()
                .map(|(a, b)| (a.to_string(), b.to_string())),
        }
    }

    pub fn with_anchors(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.anchors = Some((first.into(), second.into()));
        self
    }
}

/// Entry point for everything the UI layer does with groups and the roster.
///
/// The engine holds the site state, the group currently being drawn, and
/// the random source used for committed draws. Persisting the state is the
/// caller's job (see [`crate::domain::ports::StateStore`]).
pub struct GroupEngine<R: Rng = StdRng> {
    store: AppStore,
    session: DrawSession,
    settings: DrawSettings,
    rng: R,
}

impl GroupEngine<StdRng> {
    /// Seeded engines replay the same draws; `None` seeds from the OS.
    pub fn with_seed(state: SiteState, settings: DrawSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(state, settings, rng)
    }
}

impl<R: Rng> GroupEngine<R> {
    pub fn new(state: SiteState, settings: DrawSettings, rng: R) -> Self {
        Self {
            store: AppStore::new(state),
            session: DrawSession::new(),
            settings,
            rng,
        }
    }

    pub fn state(&self) -> &SiteState {
        self.store.get()
    }

    pub fn into_state(self) -> SiteState {
        self.store.into_state()
    }

    pub fn buffer(&self) -> &[Student] {
        self.session.buffer()
    }

    pub fn reserved(&self) -> Option<&ReservedSlotMap> {
        self.session.reserved()
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    /// Students not in any committed group, minus the exempt role.
    pub fn compute_pool(&self) -> Vec<Student> {
        let state = self.store.get();
        compute_pool(&state.students, &state.groups, &self.settings.exempt_role)
    }

    /// The pool minus students already drawn for the current group.
    pub fn available(&self) -> Vec<Student> {
        let mut pool = self.compute_pool();
        pool.retain(|s| !self.session.contains(&s.id));
        pool
    }

    /// Opens a group session and maps anchor slots. Returns the existing
    /// reservations if a session is already open.
    pub fn start_session(&mut self) -> ReservedSlotMap {
        if let Some(reserved) = self.session.reserved() {
            return reserved.clone();
        }

        let pool = self.available();
        if pool.is_empty() {
            return ReservedSlotMap::new();
        }

        let anchors = self
            .settings
            .anchors
            .as_ref()
            .map(|(a, b)| (a.as_str(), b.as_str()));
        let reserved = map_reserved_slots(&pool, anchors, &mut self.rng);

        tracing::debug!(
            pool = pool.len(),
            reserved = reserved.len(),
            "Group session started"
        );
        self.session.open(reserved.clone());
        reserved
    }

    /// Marks a draw as in flight, e.g. while a spinner is shown.
    pub fn begin_draw(&mut self) -> Result<()> {
        self.session.begin_draw()
    }

    /// Performs the committed draw and clears the in-flight flag.
    pub fn complete_draw(&mut self) -> Result<Student> {
        let result = self.draw_unguarded();
        self.session.end_draw();
        result
    }

    pub fn draw_next(&mut self) -> Result<Student> {
        self.begin_draw()?;
        self.complete_draw()
    }

    fn draw_unguarded(&mut self) -> Result<Student> {
        let pool = self.available();
        if pool.is_empty() {
            return Err(GroupError::NoCandidates);
        }

        if !self.session.is_open() {
            self.start_session();
        }

        let slot = self.session.next_slot();
        let empty = ReservedSlotMap::new();
        let reserved = self.session.reserved().unwrap_or(&empty);
        let student = draw_next(slot, &pool, reserved, &mut self.rng)?;

        tracing::info!("Slot {}: {}", slot + 1, student.name);
        self.session.push(student.clone());
        Ok(student)
    }

    /// Returns a drawn student to the pool before the group is finalized.
    pub fn remove_from_buffer(&mut self, student_id: &str) -> Result<Student> {
        let student = self.session.remove(student_id)?;
        tracing::info!("Returned {} to the pool", student.name);
        Ok(student)
    }

    pub fn abandon(&mut self) {
        if !self.session.buffer().is_empty() {
            tracing::info!("Abandoned draw of {} students", self.session.buffer().len());
        }
        self.session.reset();
    }

    pub fn finalize(&mut self, name: &str) -> Result<Group> {
        if self.session.is_drawing() {
            return Err(GroupError::DrawInProgress);
        }

        let group = finalize::finalize(name, self.session.buffer(), &self.store.get().groups)?;
        self.session.reset();
        self.store.update(|s| s.groups.push(group.clone()));

        tracing::info!("Created {} with {} members", group.name, group.members.len());
        Ok(group)
    }

    /// Draws until the current group has `size` members or the pool runs
    /// out, then finalizes it.
    pub fn draw_group(&mut self, size: usize, name: &str) -> Result<Group> {
        while self.session.buffer().len() < size && !self.available().is_empty() {
            self.draw_next()?;
        }
        self.finalize(name)
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<Group> {
        let index = self
            .store
            .get()
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| GroupError::GroupNotFound {
                id: group_id.to_string(),
            })?;

        let group = self.store.update(|s| s.groups.remove(index));
        self.session.close_if_idle();

        tracing::info!("Deleted {}", group.name);
        Ok(group)
    }

    pub fn clear_all_groups(&mut self) -> usize {
        let removed = self.store.update(|s| std::mem::take(&mut s.groups).len());
        self.session.close_if_idle();

        tracing::info!("Cleared {} groups", removed);
        removed
    }

    pub fn add_student(&mut self, name: &str, role: &str) -> Result<Student> {
        let name = self.checked_name(name, None)?;
        let role = match role.trim() {
            "" => DEFAULT_ROLE.to_string(),
            trimmed => trimmed.to_string(),
        };

        let student = Student::new(Uuid::new_v4().to_string(), name, role);
        self.store.update(|s| s.students.push(student.clone()));
        self.session.close_if_idle();
        Ok(student)
    }

    pub fn rename_student(&mut self, student_id: &str, name: &str) -> Result<Student> {
        if self.store.get().find_student(student_id).is_none() {
            return Err(GroupError::StudentNotFound {
                id: student_id.to_string(),
            });
        }
        let name = self.checked_name(name, Some(student_id))?;

        let renamed = self.store.update(|s| {
            let student = s.students.iter_mut().find(|st| st.id == student_id)?;
            student.name = name;
            Some(student.clone())
        });
        let renamed = renamed.ok_or_else(|| GroupError::StudentNotFound {
            id: student_id.to_string(),
        })?;

        self.session.replace(&renamed);
        Ok(renamed)
    }

    /// Removes a student from the roster. Committed groups keep their
    /// snapshot of the student; an in-progress draw loses them.
    pub fn remove_student(&mut self, student_id: &str) -> Result<Student> {
        let removed = self.store.update(|s| {
            let index = s.students.iter().position(|st| st.id == student_id)?;
            Some(s.students.remove(index))
        });
        let removed = removed.ok_or_else(|| GroupError::StudentNotFound {
            id: student_id.to_string(),
        })?;

        if self.session.contains(student_id) {
            self.session.remove(student_id)?;
        }
        self.session.close_if_idle();
        Ok(removed)
    }

    /// Adds students in bulk, skipping blank names and names or ids that are
    /// already on the roster. Returns how many were added.
    pub fn import_roster(&mut self, students: Vec<Student>) -> usize {
        let mut added = 0;
        for mut student in students {
            student.name = student.name.trim().to_string();
            if student.name.is_empty() {
                tracing::warn!("Skipping roster entry with blank name (id {})", student.id);
                continue;
            }

            let state = self.store.get();
            if state.find_student(&student.id).is_some()
                || state.students.iter().any(|s| s.name_matches(&student.name))
            {
                tracing::warn!("Skipping duplicate roster entry: {}", student.name);
                continue;
            }

            if student.role.trim().is_empty() {
                student.role = DEFAULT_ROLE.to_string();
            }
            self.store.update(|s| s.students.push(student));
            added += 1;
        }

        self.session.close_if_idle();
        tracing::info!("Imported {} students", added);
        added
    }

    fn checked_name(&self, name: &str, except_id: Option<&str>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::InvalidStudent {
                message: "name cannot be blank".to_string(),
            });
        }

        let taken = self
            .store
            .get()
            .students
            .iter()
            .any(|s| Some(s.id.as_str()) != except_id && names_equal(&s.name, name));
        if taken {
            return Err(GroupError::DuplicateStudent {
                name: name.to_string(),
            });
        }

        Ok(name.to_string())
    }
}
