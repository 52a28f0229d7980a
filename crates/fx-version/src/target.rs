#[cfg(feature = "serde")]
mod serde;

/// The operating system an app runs on. Auto-heal rules and runtime stacks
/// support a different feature set depending on this.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OsType {
    Linux,
    Windows,
}

/// The kind of site a descriptor is written for.
///
/// Every target uses its own type token vocabulary, see [`FxTarget::token`].
/// The casing of those tokens is fixed per target and can not be chosen by
/// the caller.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FxTarget {
    /// Encoded into `LinuxFxVersion` of a Linux web app.
    LinuxWebApp,

    /// Encoded into `WindowsFxVersion` of a Windows web app.
    WindowsWebApp,

    /// Encoded into `LinuxFxVersion` of a Linux function app.
    LinuxFunctionApp,

    /// Encoded into `WindowsFxVersion` of a Windows function app.
    WindowsFunctionApp,
}

impl FxTarget {
    pub fn os(&self) -> OsType {
        match self {
            Self::LinuxWebApp | Self::LinuxFunctionApp => OsType::Linux,
            Self::WindowsWebApp | Self::WindowsFunctionApp => OsType::Windows,
        }
    }

    pub fn is_function_app(&self) -> bool {
        matches!(self, Self::LinuxFunctionApp | Self::WindowsFunctionApp)
    }

    /// Returns the type token used for `kind` on this target, or [`None`] if
    /// the target can not run that kind of stack.
    pub fn token(&self, kind: StackKind) -> Option<&'static str> {
        match self {
            Self::LinuxWebApp => match kind {
                StackKind::DotNetCore => Some("DOTNETCORE"),
                StackKind::Node => Some("NODE"),
                StackKind::Python => Some("PYTHON"),
                StackKind::Php => Some("PHP"),
                StackKind::Ruby => Some("RUBY"),
                StackKind::Go => Some("GO"),
                StackKind::Java => Some("JAVA"),
                StackKind::Tomcat => Some("TOMCAT"),
                StackKind::JBossEap => Some("JBOSSEAP"),
                StackKind::Docker => Some("DOCKER"),
                _ => None,
            },
            Self::WindowsWebApp => match kind {
                StackKind::DotNet => Some("DOTNET"),
                StackKind::DotNetCore => Some("DOTNETCORE"),
                StackKind::DotNetIsolated => Some("DOTNET-ISOLATED"),
                StackKind::Node => Some("NODE"),
                StackKind::Python => Some("PYTHON"),
                StackKind::Php => Some("PHP"),
                StackKind::Java => Some("JAVA"),
                StackKind::Tomcat => Some("TOMCAT"),
                StackKind::Docker => Some("DOCKER"),
                _ => None,
            },
            Self::LinuxFunctionApp => match kind {
                StackKind::DotNet => Some("dotnet"),
                StackKind::DotNetIsolated => Some("dotnet-isolated"),
                StackKind::Node => Some("node"),
                StackKind::Python => Some("python"),
                StackKind::PowerShell => Some("powershell"),
                StackKind::Java => Some("java"),
                StackKind::Docker => Some("docker"),
                _ => None,
            },
            Self::WindowsFunctionApp => match kind {
                StackKind::DotNet => Some("DotNet"),
                StackKind::DotNetIsolated => Some("DotNet-Isolated"),
                StackKind::Node => Some("Node"),
                StackKind::Python => Some("Python"),
                StackKind::PowerShell => Some("PowerShell"),
                StackKind::Java => Some("Java"),
                StackKind::Docker => Some("Docker"),
                _ => None,
            },
        }
    }

    /// Looks up the stack kind for a type token. Matching is case-insensitive
    /// and restricted to the vocabulary of this target.
    pub fn kind_for_token(&self, token: &str) -> Option<StackKind> {
        <StackKind as strum::IntoEnumIterator>::iter().find(|kind| {
            self.token(*kind)
                .is_some_and(|known| known.eq_ignore_ascii_case(token))
        })
    }
}

/// The language (or container) part of a descriptor, independent of the
/// target specific spelling.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum StackKind {
    DotNet,
    DotNetCore,
    DotNetIsolated,
    Node,
    Python,
    Php,
    Ruby,
    Go,
    PowerShell,
    Java,
    Tomcat,
    JBossEap,
    Docker,
}
