//! Text persistence shared by the config file and the high-score store:
//! where the text lives (`ContentProvider`), how it is encoded
//! (`ConfigSerializer`), and a validated cache on top (`ConfigManager`).

mod config_manager;
mod content_provider;
mod serializer;
mod validate;

pub use config_manager::ConfigManager;
pub use content_provider::{ContentProvider, FileContentProvider, InMemoryContentProvider};
pub use serializer::{ConfigSerializer, YamlConfigSerializer};
pub use validate::Validate;
