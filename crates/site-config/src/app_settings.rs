use fx_version::{
    DOCKER_REGISTRY_SERVER_PASSWORD, DOCKER_REGISTRY_SERVER_URL, DOCKER_REGISTRY_SERVER_USERNAME,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const FUNCTIONS_WORKER_RUNTIME: &str = "FUNCTIONS_WORKER_RUNTIME";
pub const WEBSITE_NODE_DEFAULT_VERSION: &str = "WEBSITE_NODE_DEFAULT_VERSION";
pub const WEBSITE_HEALTHCHECK_MAXPINGFAILURES: &str = "WEBSITE_HEALTHCHECK_MAXPINGFAILURES";

/// App settings written by the platform or owned by dedicated site
/// properties. They are hidden from the user facing settings.
const MANAGED_APP_SETTINGS: &[&str] = &[
    DOCKER_REGISTRY_SERVER_URL,
    DOCKER_REGISTRY_SERVER_USERNAME,
    DOCKER_REGISTRY_SERVER_PASSWORD,
    "DIAGNOSTICS_AZUREBLOBCONTAINERSASURL",
    "DIAGNOSTICS_AZUREBLOBRETENTIONINDAYS",
    "WEBSITE_HTTPLOGGING_CONTAINER_URL",
    "WEBSITE_HTTPLOGGING_RETENTION_DAYS",
    "WEBSITE_VNET_ROUTE_ALL",
    "spring.datasource.password",
    "spring.datasource.url",
    "spring.datasource.username",
    WEBSITE_HEALTHCHECK_MAXPINGFAILURES,
];

/// A single entry of the provider app settings list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

/// App settings of a site, in the order they were read or added.
///
/// Serializes as the provider `[{name, value}]` list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(from = "Vec<NameValuePair>", into = "Vec<NameValuePair>")]
pub struct AppSettings(IndexMap<String, String>);

impl AppSettings {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Sets `name` to `value`. An existing entry keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Removes the settings that are owned by dedicated site properties or
    /// written by the platform.
    pub fn filter_managed(mut self) -> Self {
        self.0
            .retain(|name, _| !MANAGED_APP_SETTINGS.contains(&name.as_str()));
        self
    }
}

impl From<Vec<NameValuePair>> for AppSettings {
    fn from(value: Vec<NameValuePair>) -> Self {
        value
            .into_iter()
            .map(|pair| (pair.name, pair.value))
            .collect()
    }
}

impl From<AppSettings> for Vec<NameValuePair> {
    fn from(value: AppSettings) -> Self {
        value
            .0
            .into_iter()
            .map(|(name, value)| NameValuePair { name, value })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for AppSettings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
