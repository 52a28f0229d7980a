use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use site_config::{
    AppSettings, SiteConfig, SiteConfigProperties, TranslatorOptions,
    auto_heal::{self, AutoHealRule, wire::AutoHealRules},
    fx_version::{self, FxTarget, OsType, RegistryCredentials, RuntimeStack},
    logging::initialize_logging,
};
use snafu::{ResultExt, Snafu};

mod io;

pub const APP_NAME: &str = "fxctl";
pub const LOG_ENV: &str = "FXCTL_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize logging"))]
    InitLogging {
        source: site_config::logging::Error,
    },

    #[snafu(display("failed to encode runtime stack"))]
    EncodeStack { source: fx_version::EncodeError },

    #[snafu(display("failed to decode runtime stack"))]
    DecodeStack { source: fx_version::DecodeError },

    #[snafu(display("failed to translate auto-heal rule"))]
    TranslateAutoHeal { source: auto_heal::Error },

    #[snafu(display("failed to expand site config"))]
    ExpandSiteConfig {
        source: site_config::site_config::Error,
    },

    #[snafu(display("failed to flatten site config"))]
    FlattenSiteConfig {
        source: site_config::site_config::Error,
    },

    #[snafu(display("failed to serialize JSON schema"))]
    SerializeSchema { source: serde_json::Error },

    #[snafu(transparent)]
    Io { source: io::Error },
}

/// Encode and decode App Service runtime stack descriptors and auto-heal
/// rules.
///
/// Inputs are read as YAML (or JSON) from the given file, or from stdin if the
/// file is omitted or `-`.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode a runtime stack into a `LinuxFxVersion`/`WindowsFxVersion`
    /// descriptor.
    Encode(EncodeArguments),

    /// Decode a `LinuxFxVersion`/`WindowsFxVersion` descriptor.
    Decode(DecodeArguments),

    #[command(subcommand)]
    AutoHeal(AutoHealCommand),

    #[command(subcommand)]
    SiteConfig(SiteConfigCommand),
}

/// Translate auto-heal rules.
#[derive(Debug, Subcommand)]
enum AutoHealCommand {
    /// Translate a rule into the provider wire format.
    ToWire {
        #[arg(long)]
        os: OsType,

        input: Option<PathBuf>,

        #[command(flatten)]
        options: TranslatorOptions,
    },

    /// Read a rule back from the provider wire format.
    FromWire {
        #[arg(long)]
        os: OsType,

        input: Option<PathBuf>,
    },

    /// Print the JSON schema of auto-heal rules.
    Schema,
}

/// Translate site configurations.
#[derive(Debug, Subcommand)]
enum SiteConfigCommand {
    /// Translate a site config into provider properties and app settings.
    Expand {
        input: Option<PathBuf>,

        /// The current app settings of the site, as a `[{name, value}]` list.
        #[arg(long)]
        app_settings: Option<PathBuf>,

        #[command(flatten)]
        options: TranslatorOptions,
    },

    /// Read a site config back from provider properties.
    Flatten {
        #[arg(long)]
        target: FxTarget,

        input: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct EncodeArguments {
    #[arg(long)]
    target: FxTarget,

    /// A runtime stack, for example `{type: node, version: 18-lts}`. An empty
    /// document or `null` encodes to the platform default.
    input: Option<PathBuf>,

    #[command(flatten)]
    registry: RegistryArguments,
}

#[derive(Debug, Args)]
struct DecodeArguments {
    #[arg(long)]
    target: FxTarget,

    descriptor: String,

    #[command(flatten)]
    registry: RegistryArguments,
}

#[derive(Debug, PartialEq, Eq, Args)]
#[command(next_help_heading = "Registry Options")]
struct RegistryArguments {
    /// The container registry, used to tell the registry host apart from the
    /// image path.
    #[arg(long, env = "DOCKER_REGISTRY_SERVER_URL")]
    registry_url: Option<String>,

    #[arg(long, env = "DOCKER_REGISTRY_SERVER_USERNAME")]
    registry_username: Option<String>,

    #[arg(long, env = "DOCKER_REGISTRY_SERVER_PASSWORD", hide_env_values = true)]
    registry_password: Option<String>,
}

impl RegistryArguments {
    fn credentials(&self) -> Option<RegistryCredentials> {
        self.registry_url.as_ref().map(|server_url| RegistryCredentials {
            server_url: server_url.clone(),
            username: self.registry_username.clone(),
            password: self.registry_password.clone(),
        })
    }
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    initialize_logging(LOG_ENV, APP_NAME).context(InitLoggingSnafu)?;

    match cli.command {
        Command::Encode(arguments) => run_encode(&arguments),
        Command::Decode(arguments) => run_decode(&arguments),
        Command::AutoHeal(command) => run_auto_heal(command),
        Command::SiteConfig(command) => run_site_config(command),
    }
}

fn run_encode(arguments: &EncodeArguments) -> Result<(), Error> {
    let stack: Option<RuntimeStack> = io::read_input(arguments.input.as_deref())?;
    let credentials = arguments.registry.credentials();

    tracing::debug!(target = %arguments.target, ?stack, "encoding runtime stack");
    let encoded = fx_version::encode(stack.as_ref(), arguments.target, credentials.as_ref())
        .context(EncodeStackSnafu)?;

    Ok(io::print_json(&encoded)?)
}

fn run_decode(arguments: &DecodeArguments) -> Result<(), Error> {
    let credentials = arguments.registry.credentials();
    let decoded = fx_version::decode(&arguments.descriptor, arguments.target, credentials.as_ref())
        .context(DecodeStackSnafu)?;

    Ok(io::print_json(&decoded)?)
}

fn run_auto_heal(command: AutoHealCommand) -> Result<(), Error> {
    match command {
        AutoHealCommand::ToWire { os, input, options } => {
            let rule: Option<AutoHealRule> = io::read_input(input.as_deref())?;
            let rules = rule
                .unwrap_or_default()
                .to_wire(os, &options)
                .context(TranslateAutoHealSnafu)?;

            Ok(io::print_json(&rules)?)
        }
        AutoHealCommand::FromWire { os, input } => {
            let rules: Option<AutoHealRules> = io::read_input(input.as_deref())?;
            let rule = auto_heal::flatten_auto_heal(rules.as_ref(), os);

            Ok(io::print_yaml(&rule)?)
        }
        AutoHealCommand::Schema => {
            let schema = schemars::schema_for!(AutoHealRule);
            let output = serde_json::to_string_pretty(&schema).context(SerializeSchemaSnafu)?;
            println!("{output}");

            Ok(())
        }
    }
}

fn run_site_config(command: SiteConfigCommand) -> Result<(), Error> {
    match command {
        SiteConfigCommand::Expand {
            input,
            app_settings,
            options,
        } => {
            let config: SiteConfig = io::read_input(input.as_deref())?;
            let app_settings: AppSettings = match app_settings {
                Some(path) => io::read_input(Some(path.as_path()))?,
                None => AppSettings::default(),
            };

            let properties = config
                .expand(app_settings, &options)
                .context(ExpandSiteConfigSnafu)?;

            Ok(io::print_json(&properties)?)
        }
        SiteConfigCommand::Flatten { target, input } => {
            let properties: SiteConfigProperties = io::read_input(input.as_deref())?;
            let config = SiteConfig::flatten(&properties, target).context(FlattenSiteConfigSnafu)?;

            Ok(io::print_yaml(&config)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["fxctl", "decode", "--target", "linux-web-app", "NODE|18-lts"], FxTarget::LinuxWebApp)]
    #[case(&["fxctl", "decode", "--target", "Windows-Function-App", "Node|18"], FxTarget::WindowsFunctionApp)]
    fn parse_decode(#[case] args: &[&str], #[case] expected: FxTarget) {
        let cli = Cli::try_parse_from(args).expect("arguments are valid");

        let Command::Decode(arguments) = cli.command else {
            panic!("expected the decode command");
        };
        assert_eq!(arguments.target, expected);
    }

    #[test]
    fn parse_unknown_target() {
        Cli::try_parse_from(["fxctl", "decode", "--target", "mainframe", "NODE|18"])
            .expect_err("unknown targets are rejected");
    }

    #[test]
    fn registry_credentials_need_a_url() {
        let registry = RegistryArguments {
            registry_url: None,
            registry_username: Some("admin".to_owned()),
            registry_password: None,
        };
        assert_eq!(registry.credentials(), None);

        let registry = RegistryArguments {
            registry_url: Some("https://r.io".to_owned()),
            ..registry
        };
        assert_eq!(
            registry.credentials(),
            Some(RegistryCredentials {
                server_url: "https://r.io".to_owned(),
                username: Some("admin".to_owned()),
                password: None,
            })
        );
    }

    #[test]
    fn legacy_mode_flag_on_to_wire() {
        let cli = Cli::try_parse_from([
            "fxctl",
            "auto-heal",
            "to-wire",
            "--os",
            "windows",
            "--legacy-status-code-mode",
            "rule.yaml",
        ])
        .expect("arguments are valid");

        let Command::AutoHeal(AutoHealCommand::ToWire { os, input, options }) = cli.command else {
            panic!("expected the auto-heal to-wire command");
        };
        assert_eq!(os, OsType::Windows);
        assert_eq!(input, Some(PathBuf::from("rule.yaml")));
        assert!(options.legacy_status_code_mode);
    }
}
