//! The part of a site configuration this crate manages, and its translation
//! to the provider properties and app settings it is spread over.

use std::num::ParseIntError;

use fx_version::{
    DOCKER_REGISTRY_SERVER_PASSWORD, DOCKER_REGISTRY_SERVER_URL, DOCKER_REGISTRY_SERVER_USERNAME,
    FxTarget, OsType, RegistryCredentials, RuntimeStack,
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::{
    app_settings::{
        AppSettings, FUNCTIONS_WORKER_RUNTIME, WEBSITE_HEALTHCHECK_MAXPINGFAILURES,
        WEBSITE_NODE_DEFAULT_VERSION,
    },
    auto_heal::{self, AutoHealRule, expand_auto_heal, flatten_auto_heal, wire::AutoHealRules},
    options::TranslatorOptions,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to encode the runtime stack for a {target}"))]
    EncodeStack {
        source: fx_version::EncodeError,
        target: FxTarget,
    },

    #[snafu(display("failed to decode the runtime stack of a {target}"))]
    DecodeStack {
        source: fx_version::DecodeError,
        target: FxTarget,
    },

    #[snafu(display("failed to translate the auto-heal rule"))]
    TranslateAutoHeal { source: auto_heal::Error },

    #[snafu(display("failed to parse health check eviction time {value:?}"))]
    ParseEvictionTime {
        source: ParseIntError,
        value: String,
    },
}

/// The user facing site configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub target: FxTarget,

    /// [`None`] resets the site to the platform default stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_stack: Option<RuntimeStack>,

    /// Credentials of the registry a [`RuntimeStack::Docker`] image is pulled
    /// from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_credentials: Option<RegistryCredentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_heal_setting: Option<AutoHealRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,

    /// Minutes a failing instance is kept before it is removed from the load
    /// balancer. Only used together with `health_check_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_eviction_time_in_min: Option<u32>,

    /// The descriptor as it was last read from the site.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fx_version: String,
}

/// The provider site properties and app settings written by
/// [`SiteConfig::expand`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_fx_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_fx_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_heal_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_heal_rules: Option<AutoHealRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,

    #[serde(default, skip_serializing_if = "AppSettings::is_empty")]
    pub app_settings: AppSettings,
}

impl SiteConfigProperties {
    /// The descriptor property for sites running on `os`.
    pub fn fx_version(&self, os: OsType) -> Option<&str> {
        match os {
            OsType::Linux => self.linux_fx_version.as_deref(),
            OsType::Windows => self.windows_fx_version.as_deref(),
        }
    }
}

impl SiteConfig {
    pub fn new(target: FxTarget) -> Self {
        Self {
            target,
            application_stack: None,
            registry_credentials: None,
            auto_heal_setting: None,
            health_check_path: None,
            health_check_eviction_time_in_min: None,
            fx_version: String::new(),
        }
    }

    /// Translates the configuration into provider properties. `app_settings`
    /// are the current settings of the site, the managed entries in them are
    /// updated to match this configuration.
    pub fn expand(
        &self,
        mut app_settings: AppSettings,
        options: &TranslatorOptions,
    ) -> Result<SiteConfigProperties> {
        let encoded = fx_version::encode(
            self.application_stack.as_ref(),
            self.target,
            self.registry_credentials.as_ref(),
        )
        .context(EncodeStackSnafu {
            target: self.target,
        })?;

        for name in [
            DOCKER_REGISTRY_SERVER_URL,
            DOCKER_REGISTRY_SERVER_USERNAME,
            DOCKER_REGISTRY_SERVER_PASSWORD,
        ] {
            app_settings.remove(name);
        }

        if let Some(credentials) = &encoded.registry_credentials {
            for (name, value) in credentials.to_app_settings() {
                app_settings.set(name, value);
            }
        }

        if self.target.is_function_app() {
            self.expand_worker_runtime(&mut app_settings);
        }

        match (&self.health_check_path, self.health_check_eviction_time_in_min) {
            (Some(path), Some(minutes)) if !path.is_empty() && minutes != 0 => {
                app_settings.set(WEBSITE_HEALTHCHECK_MAXPINGFAILURES, minutes.to_string());
            }
            _ => {
                app_settings.remove(WEBSITE_HEALTHCHECK_MAXPINGFAILURES);
            }
        }

        let (auto_heal_enabled, auto_heal_rules) = expand_auto_heal(
            self.auto_heal_setting.as_ref(),
            self.target.os(),
            options,
        )
        .context(TranslateAutoHealSnafu)?;

        let mut properties = SiteConfigProperties {
            auto_heal_enabled: Some(auto_heal_enabled),
            auto_heal_rules,
            health_check_path: self.health_check_path.clone(),
            app_settings,
            ..Default::default()
        };

        match self.target.os() {
            OsType::Linux => properties.linux_fx_version = Some(encoded.descriptor),
            OsType::Windows => properties.windows_fx_version = Some(encoded.descriptor),
        }

        Ok(properties)
    }

    /// Reads the configuration of a `target` back from its provider
    /// properties.
    pub fn flatten(properties: &SiteConfigProperties, target: FxTarget) -> Result<Self> {
        let app_settings = &properties.app_settings;
        let credentials = RegistryCredentials::from_app_settings(app_settings.entries());

        let descriptor = properties.fx_version(target.os()).unwrap_or_default();
        let decoded = fx_version::decode(descriptor, target, credentials.as_ref())
            .context(DecodeStackSnafu { target })?;

        let application_stack = match decoded.stack {
            // Custom handlers only show up in the app settings.
            None if target.is_function_app()
                && app_settings.get(FUNCTIONS_WORKER_RUNTIME) == Some("custom") =>
            {
                Some(RuntimeStack::CustomHandler)
            }
            stack => stack,
        };

        let health_check_eviction_time_in_min = app_settings
            .get(WEBSITE_HEALTHCHECK_MAXPINGFAILURES)
            .map(|value| value.parse().context(ParseEvictionTimeSnafu { value }))
            .transpose()?;

        let auto_heal_setting = if properties.auto_heal_enabled == Some(false) {
            debug!("auto-heal is disabled, ignoring any rules left on the site");
            None
        } else {
            flatten_auto_heal(properties.auto_heal_rules.as_ref(), target.os())
        };

        Ok(Self {
            target,
            application_stack,
            registry_credentials: decoded.registry_credentials,
            auto_heal_setting,
            health_check_path: properties
                .health_check_path
                .clone()
                .filter(|path| !path.is_empty()),
            health_check_eviction_time_in_min,
            fx_version: decoded.raw,
        })
    }

    fn expand_worker_runtime(&self, app_settings: &mut AppSettings) {
        let Some(stack) = &self.application_stack else {
            app_settings.remove(FUNCTIONS_WORKER_RUNTIME);
            return;
        };

        // Containers bring their own runtime, the setting is left to the user.
        if let Some(runtime) = stack.worker_runtime() {
            app_settings.set(FUNCTIONS_WORKER_RUNTIME, runtime);
        }

        if let RuntimeStack::Node { version } = stack {
            app_settings.set(WEBSITE_NODE_DEFAULT_VERSION, version.as_str());
        }
    }
}
