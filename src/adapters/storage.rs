use crate::core::{SiteState, StateStore};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Site document kept as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<SiteState> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {}, starting empty", self.path.display());
                return Ok(SiteState::default());
            }
            Err(e) => return Err(e.into()),
        };

        let state = serde_json::from_slice(&data)?;
        Ok(state)
    }

    async fn save(&self, state: &SiteState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, data).await?;
        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<SiteState>>,
}

impl MemoryStore {
    pub fn new(state: SiteState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }
}

impl StateStore for MemoryStore {
    async fn load(&self) -> Result<SiteState> {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, state: &SiteState) -> Result<()> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Student;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("missing.json"));
        assert_eq!(store.load().await.unwrap(), SiteState::default());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("site_state.json");
        let store = JsonFileStore::new(&path);

        let state = SiteState {
            class_name: "X TJKT 2".into(),
            students: vec![Student::new("s1", "Ayu", "Siswa")],
            ..SiteState::default()
        };
        store.save(&state).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_save_keeps_keys_owned_by_other_pages() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site_state.json");
        std::fs::write(
            &path,
            r#"{
                "className": "X TJKT 2",
                "students": [],
                "gallery": [{"url": "a.png"}],
                "announcements": [{"title": "Ujian", "body": "Senin"}],
                "quiz": {"highScore": 90}
            }"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        let mut state = store.load().await.unwrap();
        state.students.push(Student::new("s1", "Ayu", "Siswa"));
        store.save(&state).await.unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["gallery"][0]["url"], "a.png");
        assert_eq!(raw["announcements"][0]["title"], "Ujian");
        assert_eq!(raw["quiz"]["highScore"], 90);
        assert_eq!(raw["students"][0]["name"], "Ayu");

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, state);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site_state.json");
        std::fs::write(&path, b"{not json").unwrap();

        let result = JsonFileStore::new(&path).load().await;
        assert!(matches!(
            result,
            Err(crate::utils::error::GroupError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::default();
        assert!(store.load().await.unwrap().students.is_empty());

        let mut state = SiteState::default();
        state.students.push(Student::new("s1", "Ayu", "Siswa"));
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap().students.len(), 1);
    }
}
