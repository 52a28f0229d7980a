//! Translation of App Service site configuration between the user facing
//! model and the provider wire format.
//!
//! - [`site_config`] spreads a [`SiteConfig`] over the site properties and the
//!   app settings of a site, and reads it back.
//! - [`auto_heal`] translates auto-heal rules, including the status code
//!   versus status code range handling.
//! - The runtime stack descriptors are encoded with [`fx_version`], which is
//!   re-exported here.
//!
//! ```
//! use site_config::{AppSettings, SiteConfig, TranslatorOptions};
//! use site_config::fx_version::{FxTarget, RuntimeStack};
//!
//! let mut config = SiteConfig::new(FxTarget::LinuxFunctionApp);
//! config.application_stack = Some(RuntimeStack::Python { version: "3.11".into() });
//!
//! let properties = config
//!     .expand(AppSettings::default(), &TranslatorOptions::default())
//!     .expect("python runs on linux function apps");
//!
//! assert_eq!(properties.linux_fx_version.as_deref(), Some("python|3.11"));
//! assert_eq!(properties.app_settings.get("FUNCTIONS_WORKER_RUNTIME"), Some("python"));
//! ```

pub mod app_settings;
pub mod auto_heal;
pub mod logging;
pub mod options;
pub mod site_config;

pub use fx_version;

pub use crate::{
    app_settings::AppSettings,
    options::TranslatorOptions,
    site_config::{SiteConfig, SiteConfigProperties},
};
