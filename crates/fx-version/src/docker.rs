//! Container images and the registry credentials that travel next to them.
//!
//! The descriptor itself only carries `host/image:tag`. Everything else about
//! the registry lives in app settings, which is why decoding needs the
//! credentials as a hint to tell the registry host apart from the image path.

pub const DOCKER_REGISTRY_SERVER_URL: &str = "DOCKER_REGISTRY_SERVER_URL";
pub const DOCKER_REGISTRY_SERVER_USERNAME: &str = "DOCKER_REGISTRY_SERVER_USERNAME";
pub const DOCKER_REGISTRY_SERVER_PASSWORD: &str = "DOCKER_REGISTRY_SERVER_PASSWORD";

/// A container image reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DockerImage {
    /// The registry, `None` means the public default registry.
    ///
    /// May carry a `http(s)://` scheme, which is stripped when encoding.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub registry_url: Option<String>,

    pub image_name: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub image_tag: String,
}

impl DockerImage {
    /// Renders the descriptor payload, `host/image:tag` or `image:tag`.
    pub(crate) fn to_payload(&self) -> String {
        let host = self
            .registry_url
            .as_deref()
            .map(registry_host)
            .filter(|host| !host.is_empty());

        let path = match host {
            Some(host) => format!("{host}/{image}", image = self.image_name),
            None => self.image_name.clone(),
        };

        if self.image_tag.is_empty() {
            path
        } else {
            format!("{path}:{tag}", tag = self.image_tag)
        }
    }

    /// Parses a descriptor payload.
    ///
    /// The tag is everything after the last `:`, unless that part contains a
    /// `/`, in which case the colon belongs to a registry port and there is no
    /// tag. The leading path segment is only treated as the registry when
    /// `registry_url` (scheme stripped) followed by `/` is a prefix of the
    /// path.
    pub(crate) fn from_payload(payload: &str, registry_url: Option<&str>) -> Self {
        let (path, image_tag) = match payload.rsplit_once(':') {
            Some((path, tag)) if !tag.contains('/') => (path, tag),
            _ => (payload, ""),
        };

        let registry = registry_url.and_then(|url| {
            let host = registry_host(url);
            if host.is_empty() {
                return None;
            }

            path.strip_prefix(host)
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|image_name| (url, image_name))
        });

        match registry {
            Some((url, image_name)) => Self {
                registry_url: Some(url.to_owned()),
                image_name: image_name.to_owned(),
                image_tag: image_tag.to_owned(),
            },
            None => Self {
                registry_url: None,
                image_name: path.to_owned(),
                image_tag: image_tag.to_owned(),
            },
        }
    }
}

/// Login details for a private registry, stored in the `DOCKER_REGISTRY_*`
/// app settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RegistryCredentials {
    pub server_url: String,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub username: Option<String>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub password: Option<String>,
}

impl RegistryCredentials {
    /// Reads the credentials out of app settings. Returns [`None`] if there is
    /// no `DOCKER_REGISTRY_SERVER_URL` entry.
    pub fn from_app_settings<'a, I>(settings: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut server_url = None;
        let mut username = None;
        let mut password = None;

        for (name, value) in settings {
            match name {
                DOCKER_REGISTRY_SERVER_URL => server_url = Some(value.to_owned()),
                DOCKER_REGISTRY_SERVER_USERNAME => username = Some(value.to_owned()),
                DOCKER_REGISTRY_SERVER_PASSWORD => password = Some(value.to_owned()),
                _ => {}
            }
        }

        server_url.map(|server_url| Self {
            server_url,
            username,
            password,
        })
    }

    /// The app settings entries for these credentials. The server URL is always
    /// present, username and password only when set.
    pub fn to_app_settings(&self) -> Vec<(&'static str, String)> {
        let mut settings = vec![(DOCKER_REGISTRY_SERVER_URL, self.server_url.clone())];

        if let Some(username) = &self.username {
            settings.push((DOCKER_REGISTRY_SERVER_USERNAME, username.clone()));
        }

        if let Some(password) = &self.password {
            settings.push((DOCKER_REGISTRY_SERVER_PASSWORD, password.clone()));
        }

        settings
    }

    /// The registry host as it appears in a descriptor.
    pub fn host(&self) -> &str {
        registry_host(&self.server_url)
    }
}

/// Strips a leading `http://` or `https://` from `url`.
///
/// ```
/// use fx_version::trim_url_scheme;
///
/// assert_eq!(trim_url_scheme("https://myregistry.azurecr.io"), "myregistry.azurecr.io");
/// assert_eq!(trim_url_scheme("myregistry.azurecr.io"), "myregistry.azurecr.io");
/// ```
pub fn trim_url_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

fn registry_host(url: &str) -> &str {
    trim_url_scheme(url).trim_end_matches('/')
}
