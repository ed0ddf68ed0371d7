use crate::core::engine::DEFAULT_EXEMPT_ROLE;
use crate::core::spinner::Spinner;
use crate::core::ConfigProvider;
use crate::utils::error::{GroupError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CLASS_NAME: &str = "X TJKT 2";
pub const DEFAULT_STATE_PATH: &str = "./data/site_state.json";
pub const DEFAULT_GROUP_SIZE: usize = 5;
pub const MAX_GROUP_SIZE: usize = 40;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub class: ClassConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub spinner: SpinnerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: Option<String>,
    pub exempt_role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub state_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    pub default_group_size: Option<usize>,
    /// Two names that always end up in the same group.
    pub anchors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinnerConfig {
    pub enabled: Option<bool>,
    pub ticks: Option<usize>,
    pub tick_millis: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GroupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GroupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CLASS_STATE_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GroupError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.state_path", self.state_path())?;
        validation::validate_range(
            "draw.default_group_size",
            self.default_group_size(),
            1,
            MAX_GROUP_SIZE,
        )?;

        if let Some(anchors) = &self.draw.anchors {
            validation::validate_anchor_pair("draw.anchors", anchors)?;
        }

        if let Some(name) = &self.class.name {
            validation::validate_non_empty_string("class.name", name)?;
        }

        if let Some(ticks) = self.spinner.ticks {
            validation::validate_range("spinner.ticks", ticks, 0, 200)?;
        }

        Ok(())
    }

    pub fn class_name(&self) -> &str {
        self.class.name.as_deref().unwrap_or(DEFAULT_CLASS_NAME)
    }

    pub fn state_path(&self) -> &str {
        self.storage
            .state_path
            .as_deref()
            .unwrap_or(DEFAULT_STATE_PATH)
    }

    pub fn set_state_path(&mut self, path: impl Into<String>) {
        self.storage.state_path = Some(path.into());
    }

    pub fn default_group_size(&self) -> usize {
        self.draw.default_group_size.unwrap_or(DEFAULT_GROUP_SIZE)
    }

    pub fn spinner_enabled(&self) -> bool {
        self.spinner.enabled.unwrap_or(true)
    }

    pub fn spinner(&self) -> Spinner {
        let defaults = Spinner::default();
        Spinner {
            ticks: self.spinner.ticks.unwrap_or(defaults.ticks),
            tick: self
                .spinner
                .tick_millis
                .map(std::time::Duration::from_millis)
                .unwrap_or(defaults.tick),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn state_path(&self) -> &str {
        self.state_path()
    }

    fn exempt_role(&self) -> &str {
        self.class
            .exempt_role
            .as_deref()
            .unwrap_or(DEFAULT_EXEMPT_ROLE)
    }

    fn anchors(&self) -> Option<(&str, &str)> {
        match self.draw.anchors.as_deref() {
            Some([first, second]) => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }

    fn default_group_size(&self) -> usize {
        self.default_group_size()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[class]
name = "X TJKT 2"
exempt_role = "Wali Kelas"

[storage]
state_path = "./class/state.json"

[draw]
default_group_size = 4
anchors = ["Rizky", "Nabila"]

[spinner]
enabled = false
ticks = 8
tick_millis = 40
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.class_name(), "X TJKT 2");
        assert_eq!(config.state_path(), "./class/state.json");
        assert_eq!(config.default_group_size(), 4);
        assert_eq!(config.anchors(), Some(("Rizky", "Nabila")));
        assert!(!config.spinner_enabled());
        assert_eq!(config.spinner().ticks, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.state_path(), DEFAULT_STATE_PATH);
        assert_eq!(config.exempt_role(), DEFAULT_EXEMPT_ROLE);
        assert_eq!(config.default_group_size(), DEFAULT_GROUP_SIZE);
        assert_eq!(config.anchors(), None);
        assert!(config.spinner_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TJKT_TEST_STATE_PATH", "/tmp/tjkt/state.json");

        let toml_content = r#"
[storage]
state_path = "${TJKT_TEST_STATE_PATH}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.state_path(), "/tmp/tjkt/state.json");

        std::env::remove_var("TJKT_TEST_STATE_PATH");
    }

    #[test]
    fn test_config_validation() {
        let bad_size = TomlConfig::from_toml_str("[draw]\ndefault_group_size = 0\n").unwrap();
        assert!(bad_size.validate().is_err());

        let one_anchor = TomlConfig::from_toml_str("[draw]\nanchors = [\"Rizky\"]\n").unwrap();
        assert!(one_anchor.validate().is_err());
        assert_eq!(one_anchor.anchors(), None);

        let same_anchor =
            TomlConfig::from_toml_str("[draw]\nanchors = [\"Rizky\", \"rizky\"]\n").unwrap();
        assert!(same_anchor.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = TomlConfig::from_toml_str("[draw\n");
        assert!(matches!(result, Err(GroupError::ConfigValidationError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[class]
name = "File Class"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.class_name(), "File Class");
    }
}
