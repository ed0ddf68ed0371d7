use crate::domain::model::SiteState;
use crate::utils::error::Result;

/// Durable home of the site document. A store with nothing saved yet loads
/// `SiteState::default()`.
pub trait StateStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<SiteState>> + Send;
    fn save(&self, state: &SiteState) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn state_path(&self) -> &str;
    fn exempt_role(&self) -> &str;
    fn anchors(&self) -> Option<(&str, &str)>;
    fn default_group_size(&self) -> usize;
}
