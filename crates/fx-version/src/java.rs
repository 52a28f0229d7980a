//! Java payloads of web app descriptors.
//!
//! The payload combines the application server version with a JDK suffix,
//! for example `9.0.41-java11`. Which suffix is used depends on the JDK major
//! version and on how many dotted components the server version has, mirroring
//! the strings the platform lists as supported stacks.

use crate::JavaServer;

/// Builds the complete web app descriptor for a Java stack, for example
/// `TOMCAT|9.0-java11`.
///
/// ```
/// use fx_version::{JavaServer, java_fx_string};
///
/// assert_eq!(java_fx_string("11", JavaServer::Java, "11"), "JAVA|11-java11");
/// assert_eq!(java_fx_string("8", JavaServer::Tomcat, "10.0"), "TOMCAT|10.0-jre8");
/// assert_eq!(java_fx_string("8", JavaServer::Java, "8u302"), "JAVA|8u302");
/// ```
pub fn java_fx_string(major_version: &str, server: JavaServer, server_version: &str) -> String {
    format!(
        "{server}|{payload}",
        payload = java_payload(major_version, server, server_version)
    )
}

/// Builds the part of a Java descriptor after the `|`.
pub(crate) fn java_payload(
    major_version: &str,
    server: JavaServer,
    server_version: &str,
) -> String {
    // Plain Java SE without a server version only pins the JDK.
    if server == JavaServer::Java && server_version.is_empty() {
        return major_version.to_owned();
    }

    let components = server_version.split('.').count();

    match (major_version, server) {
        ("8", JavaServer::Java) if server_version.contains('u') => server_version.to_owned(),
        ("8", JavaServer::Java) => format!("{server_version}-jre8"),
        ("8", JavaServer::Tomcat) if components == 3 => format!("{server_version}-java8"),
        ("8", JavaServer::Tomcat) => format!("{server_version}-jre8"),
        ("8", JavaServer::JBossEap) => format!("{server_version}-java8"),

        ("11", JavaServer::Java) if components >= 3 => server_version.to_owned(),
        ("11", _) => format!("{server_version}-java11"),

        ("17", JavaServer::Java) if components == 3 => server_version.to_owned(),
        ("17", _) => format!("{server_version}-java17"),

        _ => format!("{server_version}-{major_version}"),
    }
}

/// Splits a Java payload into `(server_version, java_version)`.
///
/// A payload with exactly one `-` separates the two. Anything else is taken
/// as a bare JDK version with an empty server version.
///
/// ```
/// use fx_version::decode_java_payload;
///
/// assert_eq!(decode_java_payload("9.0-java11"), ("9.0".to_owned(), "java11".to_owned()));
/// assert_eq!(decode_java_payload("8u302"), (String::new(), "8u302".to_owned()));
/// ```
pub fn decode_java_payload(payload: &str) -> (String, String) {
    match payload.split_once('-') {
        Some((server_version, java_version)) if !java_version.contains('-') => {
            (server_version.to_owned(), java_version.to_owned())
        }
        _ => (String::new(), payload.to_owned()),
    }
}
