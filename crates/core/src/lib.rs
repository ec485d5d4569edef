pub mod anchor;
pub mod chrome;
pub mod config;
pub mod contact;
pub mod copy;
pub mod error;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod settings;
pub mod tilt;
pub mod typewriter;

pub use config::SiteConfig;
pub use error::{BootError, ConfigError, Error};
pub use page::{Boot, Environment, Inventory, Listeners, Outcome, Page, PageEvent};
pub use settings::{MemoryStore, Settings, ThemeStore};
