use crate::domain::model::SiteState;

/// Owns the site document for the lifetime of the application. Every change
/// goes through [`AppStore::update`].
#[derive(Debug, Default)]
pub struct AppStore {
    state: SiteState,
    revision: u64,
}

impl AppStore {
    pub fn new(state: SiteState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn get(&self) -> &SiteState {
        &self.state
    }

    pub fn update<T>(&mut self, f: impl FnOnce(&mut SiteState) -> T) -> T {
        let out = f(&mut self.state);
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            students = self.state.students.len(),
            groups = self.state.groups.len(),
            "State updated"
        );
        out
    }

    /// Number of updates applied since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_state(self) -> SiteState {
        self.state
    }
}
