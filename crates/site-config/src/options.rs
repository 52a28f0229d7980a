use clap::Args;

/// Options changing how site configuration is translated to the provider
/// wire format. They are passed explicitly into every translation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Args)]
#[command(next_help_heading = "Translator Options")]
pub struct TranslatorOptions {
    /// Write single status codes without a sub-status or win32 status into the
    /// `statusCodesRange` list instead of `statusCodes`.
    ///
    /// Consumers of the wire format that predate the dedicated status code
    /// list expect single codes in the range list. Only enable this for them.
    #[arg(long, env)]
    pub legacy_status_code_mode: bool,
}
