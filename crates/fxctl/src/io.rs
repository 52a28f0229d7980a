use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read input from {path}", path = path.display()))]
    ReadInput {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse input from {path}", path = path.display()))]
    ParseInput {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to serialize output as JSON"))]
    SerializeJson { source: serde_json::Error },

    #[snafu(display("failed to serialize output as YAML"))]
    SerializeYaml { source: serde_yaml::Error },
}

/// Reads a YAML (or JSON) document from `path`. No path or `-` reads stdin.
pub fn read_input<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let path = path.unwrap_or_else(|| Path::new("-"));

    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context(ReadInputSnafu { path })?;
        content
    } else {
        std::fs::read_to_string(path).context(ReadInputSnafu { path })?
    };

    parse_input(&content, path)
}

pub fn parse_input<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    serde_yaml::from_str(content).context(ParseInputSnafu { path })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context(SerializeJsonSnafu)?;
    println!("{output}");
    Ok(())
}

pub fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_yaml::to_string(value).context(SerializeYamlSnafu)?;
    print!("{output}");
    Ok(())
}
