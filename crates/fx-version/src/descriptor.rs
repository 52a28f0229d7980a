use std::fmt::Display;

use snafu::{OptionExt, Snafu};
use tracing::debug;

use crate::{
    DockerImage, FxTarget, JavaServer, RegistryCredentials, RuntimeStack, StackKind,
    java::{decode_java_payload, java_payload},
};

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum EncodeError {
    #[snafu(display("the {kind} stack is not supported on a {target}"))]
    UnsupportedStack { kind: StackKind, target: FxTarget },

    #[snafu(display("custom handlers are only supported on function apps, not on a {target}"))]
    CustomHandlerOnWebApp { target: FxTarget },
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum DecodeError {
    #[snafu(display("malformed descriptor {descriptor:?}, expected <TYPE>|<PAYLOAD>"))]
    MalformedDescriptor { descriptor: String },
}

/// The result of [`encode`]: the descriptor string plus the registry
/// credentials that have to be written to app settings next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EncodedStack {
    pub descriptor: String,

    /// Only set for container images that name their registry. Callers should
    /// remove any previously written registry settings when this is [`None`].
    pub registry_credentials: Option<RegistryCredentials>,
}

/// The result of [`decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FxDescriptor {
    /// The descriptor exactly as it was read.
    pub raw: String,

    /// [`None`] if no stack is configured.
    pub stack: Option<RuntimeStack>,

    /// The credentials the container stack was decoded with, if they matched
    /// the registry host of the image.
    pub registry_credentials: Option<RegistryCredentials>,
}

impl Display for FxDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Encodes `stack` into the descriptor for `target`.
///
/// No stack encodes to an empty descriptor, which resets the site to the
/// platform default. So does [`RuntimeStack::CustomHandler`] on function apps.
/// For container stacks, `credentials` provide the username and password
/// returned next to the descriptor.
pub fn encode(
    stack: Option<&RuntimeStack>,
    target: FxTarget,
    credentials: Option<&RegistryCredentials>,
) -> Result<EncodedStack, EncodeError> {
    let Some(stack) = stack else {
        return Ok(EncodedStack {
            descriptor: String::new(),
            registry_credentials: None,
        });
    };

    let Some(kind) = stack.kind() else {
        // Custom handlers are the only stacks without a type token.
        return if target.is_function_app() {
            Ok(EncodedStack {
                descriptor: String::new(),
                registry_credentials: None,
            })
        } else {
            CustomHandlerOnWebAppSnafu { target }.fail()
        };
    };

    let token = target
        .token(kind)
        .context(UnsupportedStackSnafu { kind, target })?;

    let (payload, registry_credentials) = match stack {
        RuntimeStack::Java {
            major_version,
            server,
            server_version,
        } => {
            let payload = if target.is_function_app() {
                major_version.clone()
            } else {
                java_payload(major_version, *server, server_version)
            };
            (payload, None)
        }
        RuntimeStack::Docker(image) => (
            image.to_payload(),
            image_credentials(image, credentials),
        ),
        other => (other.version().unwrap_or_default().to_owned(), None),
    };

    Ok(EncodedStack {
        descriptor: format!("{token}|{payload}"),
        registry_credentials,
    })
}

/// Decodes a descriptor read from a `target`.
///
/// An empty descriptor means no stack is configured. A type token this target
/// does not know is read as a container image, the same way the platform
/// treats it. `credentials` are the registry settings stored next to the
/// descriptor. They tell the registry host apart from the image path.
pub fn decode(
    descriptor: &str,
    target: FxTarget,
    credentials: Option<&RegistryCredentials>,
) -> Result<FxDescriptor, DecodeError> {
    if descriptor.is_empty() {
        return Ok(FxDescriptor {
            raw: String::new(),
            stack: None,
            registry_credentials: None,
        });
    }

    let (token, payload) = descriptor
        .split_once('|')
        .context(MalformedDescriptorSnafu { descriptor })?;

    let stack = match target.kind_for_token(token) {
        Some(kind) => known_stack(kind, payload, target, credentials),
        None => {
            debug!(
                descriptor,
                %target,
                "unknown type token, reading descriptor as container image"
            );
            docker_stack(payload, credentials)
        }
    };

    let registry_credentials = match &stack {
        RuntimeStack::Docker(DockerImage {
            registry_url: Some(_),
            ..
        }) => credentials.cloned(),
        _ => None,
    };

    Ok(FxDescriptor {
        raw: descriptor.to_owned(),
        stack: Some(stack),
        registry_credentials,
    })
}

fn known_stack(
    kind: StackKind,
    payload: &str,
    target: FxTarget,
    credentials: Option<&RegistryCredentials>,
) -> RuntimeStack {
    if let Some(server) = JavaServer::from_kind(kind) {
        return java_stack(payload, server, target);
    }

    // Everything but Java and Docker carries a plain version.
    RuntimeStack::with_version(kind, payload)
        .unwrap_or_else(|| docker_stack(payload, credentials))
}

fn docker_stack(payload: &str, credentials: Option<&RegistryCredentials>) -> RuntimeStack {
    let registry_url = credentials.map(|credentials| credentials.server_url.as_str());
    RuntimeStack::Docker(DockerImage::from_payload(payload, registry_url))
}

fn java_stack(payload: &str, server: JavaServer, target: FxTarget) -> RuntimeStack {
    if target.is_function_app() {
        return RuntimeStack::Java {
            major_version: payload.to_owned(),
            server,
            server_version: String::new(),
        };
    }

    let (server_version, java_version) = decode_java_payload(payload);
    RuntimeStack::Java {
        major_version: java_version,
        server,
        server_version,
    }
}

/// Credentials are only written for images that name their registry, so the
/// registry setting always matches the host in the descriptor.
fn image_credentials(
    image: &DockerImage,
    credentials: Option<&RegistryCredentials>,
) -> Option<RegistryCredentials> {
    let server_url = image
        .registry_url
        .clone()
        .filter(|url| !url.is_empty())?;

    Some(RegistryCredentials {
        server_url,
        username: credentials.and_then(|credentials| credentials.username.clone()),
        password: credentials.and_then(|credentials| credentials.password.clone()),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rstest_reuse::{apply, template};

    use super::*;

    #[template]
    #[rstest]
    #[case(FxTarget::LinuxWebApp)]
    #[case(FxTarget::WindowsWebApp)]
    #[case(FxTarget::LinuxFunctionApp)]
    #[case(FxTarget::WindowsFunctionApp)]
    fn targets(#[case] target: FxTarget) {}

    fn java(major_version: &str, server: JavaServer, server_version: &str) -> RuntimeStack {
        RuntimeStack::Java {
            major_version: major_version.to_owned(),
            server,
            server_version: server_version.to_owned(),
        }
    }

    fn docker(registry_url: Option<&str>, image_name: &str, image_tag: &str) -> RuntimeStack {
        RuntimeStack::Docker(DockerImage {
            registry_url: registry_url.map(ToOwned::to_owned),
            image_name: image_name.to_owned(),
            image_tag: image_tag.to_owned(),
        })
    }

    #[apply(targets)]
    fn empty_round_trip(target: FxTarget) {
        let decoded = decode("", target, None).expect("empty descriptor is valid");
        assert_eq!(decoded.stack, None);

        let encoded = encode(decoded.stack.as_ref(), target, None).expect("no stack encodes");
        assert_eq!(encoded.descriptor, "");
        assert_eq!(encoded.registry_credentials, None);
    }

    #[apply(targets)]
    fn docker_round_trip(target: FxTarget) {
        let credentials = RegistryCredentials {
            server_url: "r.io".to_owned(),
            username: Some("admin".to_owned()),
            password: Some("hunter2".to_owned()),
        };
        let stack = docker(Some("r.io"), "app", "v1");

        let encoded = encode(Some(&stack), target, Some(&credentials)).expect("docker encodes");
        assert_eq!(encoded.registry_credentials.as_ref(), Some(&credentials));

        let decoded = decode(&encoded.descriptor, target, encoded.registry_credentials.as_ref())
            .expect("docker decodes");
        assert_eq!(decoded.stack, Some(stack));
        assert_eq!(decoded.registry_credentials, Some(credentials));
    }

    #[apply(targets)]
    fn malformed(target: FxTarget) {
        assert_eq!(
            decode("DOTNETCORE", target, None),
            Err(DecodeError::MalformedDescriptor {
                descriptor: "DOTNETCORE".to_owned()
            })
        );
    }

    #[rstest]
    fn simple_stack_round_trip(
        #[values(
            StackKind::DotNetCore,
            StackKind::Node,
            StackKind::Python,
            StackKind::Php,
            StackKind::Ruby,
            StackKind::Go
        )]
        kind: StackKind,
        #[values("6.0", "18-lts", "3.9", "v8.0", "~14")] version: &str,
        #[values(
            FxTarget::LinuxWebApp,
            FxTarget::WindowsWebApp,
            FxTarget::LinuxFunctionApp,
            FxTarget::WindowsFunctionApp
        )]
        target: FxTarget,
    ) {
        let stack = RuntimeStack::with_version(kind, version).expect("plain version stack");

        match encode(Some(&stack), target, None) {
            Ok(encoded) => {
                let decoded =
                    decode(&encoded.descriptor, target, None).expect("encoded stack decodes");
                assert_eq!(decoded.stack, Some(stack));
            }
            Err(err) => {
                assert!(target.token(kind).is_none(), "{err}");
            }
        }
    }

    #[rstest]
    #[case(FxTarget::LinuxWebApp, "DOTNETCORE|6.0")]
    #[case(FxTarget::LinuxWebApp, "PHP|8.1")]
    #[case(FxTarget::LinuxWebApp, "NODE|18-lts")]
    #[case(FxTarget::LinuxWebApp, "RUBY|2.7")]
    #[case(FxTarget::LinuxWebApp, "GO|1.19")]
    #[case(FxTarget::LinuxWebApp, "JAVA|8-jre8")]
    #[case(FxTarget::LinuxWebApp, "JAVA|8u302")]
    #[case(FxTarget::LinuxWebApp, "TOMCAT|10.0.20-java8")]
    #[case(FxTarget::LinuxWebApp, "JBOSSEAP|7-java11")]
    #[case(FxTarget::WindowsWebApp, "DOTNET|v6.0")]
    #[case(FxTarget::WindowsWebApp, "DOTNET-ISOLATED|v6.0")]
    #[case(FxTarget::WindowsWebApp, "JAVA|11")]
    #[case(FxTarget::WindowsWebApp, "TOMCAT|9.0-java11")]
    #[case(FxTarget::LinuxFunctionApp, "node|14")]
    #[case(FxTarget::LinuxFunctionApp, "python|3.9")]
    #[case(FxTarget::LinuxFunctionApp, "dotnet-isolated|6.0")]
    #[case(FxTarget::LinuxFunctionApp, "powershell|7.2")]
    #[case(FxTarget::WindowsFunctionApp, "Node|14-lts")]
    #[case(FxTarget::WindowsFunctionApp, "DotNet-Isolated|6.0")]
    #[case(FxTarget::WindowsFunctionApp, "Java|11")]
    fn descriptor_round_trip(#[case] target: FxTarget, #[case] descriptor: &str) {
        let decoded = decode(descriptor, target, None).expect("known descriptor decodes");
        assert_eq!(decoded.raw, descriptor);

        let encoded = encode(decoded.stack.as_ref(), target, None).expect("decoded stack encodes");
        assert_eq!(encoded.descriptor, descriptor);
    }

    #[rstest]
    #[case(FxTarget::LinuxWebApp, RuntimeStack::DotNetCore { version: "6.0".into() }, "DOTNETCORE|6.0")]
    #[case(FxTarget::WindowsWebApp, RuntimeStack::DotNet { version: "v6.0".into() }, "DOTNET|v6.0")]
    #[case(FxTarget::LinuxFunctionApp, RuntimeStack::Python { version: "3.9".into() }, "python|3.9")]
    #[case(FxTarget::WindowsFunctionApp, RuntimeStack::PowerShell { version: "7.2".into() }, "PowerShell|7.2")]
    #[case(FxTarget::LinuxWebApp, java("8", JavaServer::Tomcat, "10.0.20"), "TOMCAT|10.0.20-java8")]
    #[case(FxTarget::LinuxWebApp, java("8", JavaServer::Tomcat, "10.0"), "TOMCAT|10.0-jre8")]
    #[case(FxTarget::WindowsWebApp, java("11", JavaServer::Java, ""), "JAVA|11")]
    #[case(FxTarget::LinuxFunctionApp, java("17", JavaServer::Java, ""), "java|17")]
    #[case(FxTarget::WindowsFunctionApp, java("11", JavaServer::Java, "11.0.12"), "Java|11")]
    #[case(FxTarget::LinuxWebApp, docker(None, "nginx", "latest"), "DOCKER|nginx:latest")]
    #[case(FxTarget::WindowsWebApp, docker(Some("https://r.io"), "app", "v1"), "DOCKER|r.io/app:v1")]
    #[case(FxTarget::LinuxFunctionApp, RuntimeStack::CustomHandler, "")]
    #[case(FxTarget::WindowsFunctionApp, RuntimeStack::CustomHandler, "")]
    fn encode_stack(#[case] target: FxTarget, #[case] stack: RuntimeStack, #[case] expected: &str) {
        let encoded = encode(Some(&stack), target, None).expect("supported stack encodes");
        assert_eq!(encoded.descriptor, expected);
    }

    #[rstest]
    #[case(FxTarget::LinuxWebApp, RuntimeStack::DotNet { version: "v4.0".into() }, StackKind::DotNet)]
    #[case(FxTarget::LinuxWebApp, RuntimeStack::PowerShell { version: "7.2".into() }, StackKind::PowerShell)]
    #[case(FxTarget::WindowsWebApp, RuntimeStack::Ruby { version: "2.7".into() }, StackKind::Ruby)]
    #[case(FxTarget::WindowsWebApp, java("11", JavaServer::JBossEap, "7"), StackKind::JBossEap)]
    #[case(FxTarget::LinuxFunctionApp, RuntimeStack::Php { version: "8.1".into() }, StackKind::Php)]
    #[case(FxTarget::WindowsFunctionApp, java("8", JavaServer::Tomcat, "9.0"), StackKind::Tomcat)]
    fn encode_unsupported(
        #[case] target: FxTarget,
        #[case] stack: RuntimeStack,
        #[case] kind: StackKind,
    ) {
        assert_eq!(
            encode(Some(&stack), target, None),
            Err(EncodeError::UnsupportedStack { kind, target })
        );
    }

    #[rstest]
    #[case(FxTarget::LinuxWebApp)]
    #[case(FxTarget::WindowsWebApp)]
    fn custom_handler_on_web_app(#[case] target: FxTarget) {
        assert_eq!(
            encode(Some(&RuntimeStack::CustomHandler), target, None),
            Err(EncodeError::CustomHandlerOnWebApp { target })
        );
    }

    #[apply(targets)]
    fn unknown_token_is_docker(target: FxTarget) {
        let decoded = decode("FOO|bar:1", target, None).expect("unknown token falls back");

        assert_eq!(decoded.raw, "FOO|bar:1");
        assert_eq!(decoded.stack, Some(docker(None, "bar", "1")));
    }

    #[test]
    fn token_outside_target_vocabulary_is_docker() {
        // PHP exists for Linux web apps, not for Linux function apps.
        let decoded = decode("PHP|8.1", FxTarget::LinuxFunctionApp, None).expect("falls back");
        assert_eq!(decoded.stack, Some(docker(None, "8.1", "")));
    }

    #[rstest]
    #[case(FxTarget::LinuxWebApp, "java|11-java11", java("java11", JavaServer::Java, "11"))]
    #[case(FxTarget::LinuxWebApp, "Tomcat|9.0.41-java11", java("java11", JavaServer::Tomcat, "9.0.41"))]
    #[case(FxTarget::LinuxWebApp, "JAVA|8u302", java("8u302", JavaServer::Java, ""))]
    #[case(FxTarget::WindowsFunctionApp, "Java|11", java("11", JavaServer::Java, ""))]
    #[case(FxTarget::LinuxFunctionApp, "java|17", java("17", JavaServer::Java, ""))]
    fn decode_java(#[case] target: FxTarget, #[case] descriptor: &str, #[case] expected: RuntimeStack) {
        let decoded = decode(descriptor, target, None).expect("java decodes");
        assert_eq!(decoded.stack, Some(expected));
    }

    // Structured Java values do not survive a round trip: the JDK comes back
    // with its suffix. The descriptor string itself is stable.
    #[rstest]
    #[case(java("8", JavaServer::Tomcat, "10.0"), java("jre8", JavaServer::Tomcat, "10.0"))]
    #[case(java("11", JavaServer::Tomcat, "9.0"), java("java11", JavaServer::Tomcat, "9.0"))]
    #[case(java("11", JavaServer::Java, "11.0.12"), java("11.0.12", JavaServer::Java, ""))]
    #[case(java("17", JavaServer::Java, "17.0.1"), java("17.0.1", JavaServer::Java, ""))]
    fn java_does_not_round_trip(#[case] stack: RuntimeStack, #[case] decoded_stack: RuntimeStack) {
        let target = FxTarget::LinuxWebApp;
        let encoded = encode(Some(&stack), target, None).expect("java encodes");

        let decoded = decode(&encoded.descriptor, target, None).expect("java decodes");
        assert_ne!(decoded.stack.as_ref(), Some(&stack));
        assert_eq!(decoded.stack.as_ref(), Some(&decoded_stack));

        let reencoded = encode(decoded.stack.as_ref(), target, None).expect("java encodes");
        assert_eq!(reencoded.descriptor, encoded.descriptor);
    }

    #[apply(targets)]
    fn image_without_registry_drops_credentials(target: FxTarget) {
        let credentials = RegistryCredentials {
            server_url: "https://r.io".to_owned(),
            username: Some("admin".to_owned()),
            password: None,
        };
        let stack = docker(None, "app", "v1");

        let encoded = encode(Some(&stack), target, Some(&credentials)).expect("docker encodes");
        assert_eq!(encoded.registry_credentials, None);

        let decoded = decode(&encoded.descriptor, target, encoded.registry_credentials.as_ref())
            .expect("docker decodes");
        assert_eq!(decoded.stack, Some(stack));
        assert_eq!(decoded.registry_credentials, None);

        let decoded = decode(&encoded.descriptor, target, Some(&credentials))
            .expect("docker decodes");
        assert_eq!(decoded.stack, Some(docker(None, "app", "v1")));
        assert_eq!(decoded.registry_credentials, None);
    }

    #[test]
    fn docker_without_credentials() {
        let stack = docker(None, "nginx", "latest");
        let encoded = encode(Some(&stack), FxTarget::LinuxWebApp, None).expect("docker encodes");

        assert_eq!(encoded.registry_credentials, None);
    }

    #[test]
    fn non_docker_drops_credentials() {
        let credentials = RegistryCredentials {
            server_url: "r.io".to_owned(),
            ..Default::default()
        };

        let encoded = encode(
            Some(&RuntimeStack::Node { version: "18".into() }),
            FxTarget::LinuxWebApp,
            Some(&credentials),
        )
        .expect("node encodes");
        assert_eq!(encoded.registry_credentials, None);

        let decoded = decode("NODE|18", FxTarget::LinuxWebApp, Some(&credentials))
            .expect("node decodes");
        assert_eq!(decoded.registry_credentials, None);
    }
}
