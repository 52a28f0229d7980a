use crate::{DockerImage, StackKind};

/// The application server a Java stack runs on.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum JavaServer {
    /// Java SE, the application brings its own (embedded) server.
    Java,

    /// Apache Tomcat.
    Tomcat,

    /// Red Hat JBoss Enterprise Application Platform.
    JBossEap,
}

impl JavaServer {
    pub fn kind(&self) -> StackKind {
        match self {
            Self::Java => StackKind::Java,
            Self::Tomcat => StackKind::Tomcat,
            Self::JBossEap => StackKind::JBossEap,
        }
    }

    pub(crate) fn from_kind(kind: StackKind) -> Option<Self> {
        match kind {
            StackKind::Java => Some(Self::Java),
            StackKind::Tomcat => Some(Self::Tomcat),
            StackKind::JBossEap => Some(Self::JBossEap),
            _ => None,
        }
    }
}

/// The structured form of a descriptor.
///
/// Only one language can be configured per site, which is why this is an
/// enum. The absence of a stack is expressed as `Option::<RuntimeStack>::None`
/// and encodes to an empty descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum RuntimeStack {
    DotNet {
        version: String,
    },
    DotNetCore {
        version: String,
    },
    /// Isolated worker model, function apps and Windows web apps only.
    DotNetIsolated {
        version: String,
    },
    Node {
        version: String,
    },
    Python {
        version: String,
    },
    Php {
        version: String,
    },
    Ruby {
        version: String,
    },
    Go {
        version: String,
    },
    /// PowerShell Core, function apps only.
    PowerShell {
        version: String,
    },
    /// A JDK, optionally running inside an application server.
    ///
    /// `server_version` is empty for a plain Java SE stack.
    Java {
        major_version: String,
        server: JavaServer,
        server_version: String,
    },
    Docker(DockerImage),
    /// A custom handler (function apps only). Encodes to an explicitly empty
    /// descriptor, so the platform falls back to the handler configured in
    /// `host.json`.
    CustomHandler,
}

impl RuntimeStack {
    /// The vocabulary entry this stack is written with, [`None`] for
    /// [`RuntimeStack::CustomHandler`] which has no type token at all.
    pub fn kind(&self) -> Option<StackKind> {
        let kind = match self {
            Self::DotNet { .. } => StackKind::DotNet,
            Self::DotNetCore { .. } => StackKind::DotNetCore,
            Self::DotNetIsolated { .. } => StackKind::DotNetIsolated,
            Self::Node { .. } => StackKind::Node,
            Self::Python { .. } => StackKind::Python,
            Self::Php { .. } => StackKind::Php,
            Self::Ruby { .. } => StackKind::Ruby,
            Self::Go { .. } => StackKind::Go,
            Self::PowerShell { .. } => StackKind::PowerShell,
            Self::Java { server, .. } => server.kind(),
            Self::Docker(_) => StackKind::Docker,
            Self::CustomHandler => return None,
        };

        Some(kind)
    }

    /// Builds the variant for a language `kind` carrying a plain version.
    /// Returns [`None`] for the kinds that need more than a version string.
    pub fn with_version(kind: StackKind, version: impl Into<String>) -> Option<Self> {
        let version = version.into();

        let stack = match kind {
            StackKind::DotNet => Self::DotNet { version },
            StackKind::DotNetCore => Self::DotNetCore { version },
            StackKind::DotNetIsolated => Self::DotNetIsolated { version },
            StackKind::Node => Self::Node { version },
            StackKind::Python => Self::Python { version },
            StackKind::Php => Self::Php { version },
            StackKind::Ruby => Self::Ruby { version },
            StackKind::Go => Self::Go { version },
            StackKind::PowerShell => Self::PowerShell { version },
            StackKind::Java | StackKind::Tomcat | StackKind::JBossEap | StackKind::Docker => {
                return None;
            }
        };

        Some(stack)
    }

    /// The plain version of the simple language stacks.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::DotNet { version }
            | Self::DotNetCore { version }
            | Self::DotNetIsolated { version }
            | Self::Node { version }
            | Self::Python { version }
            | Self::Php { version }
            | Self::Ruby { version }
            | Self::Go { version }
            | Self::PowerShell { version } => Some(version),
            Self::Java { major_version, .. } => Some(major_version),
            Self::Docker(_) | Self::CustomHandler => None,
        }
    }

    /// The value function apps expect in the `FUNCTIONS_WORKER_RUNTIME` app
    /// setting for this stack.
    pub fn worker_runtime(&self) -> Option<&'static str> {
        match self {
            Self::DotNet { .. } | Self::DotNetCore { .. } => Some("dotnet"),
            Self::DotNetIsolated { .. } => Some("dotnet-isolated"),
            Self::Node { .. } => Some("node"),
            Self::Python { .. } => Some("python"),
            Self::Java { .. } => Some("java"),
            Self::PowerShell { .. } => Some("powershell"),
            Self::CustomHandler => Some("custom"),
            Self::Php { .. } | Self::Ruby { .. } | Self::Go { .. } | Self::Docker(_) => None,
        }
    }
}
