//! Auto-heal rules: "if these conditions occur this many times in this
//! interval, perform this action".
//!
//! [`AutoHealRule`] is the flattened form users configure. It is translated
//! to and from the nested provider structures in [`wire`] with
//! [`AutoHealRule::to_wire`] and [`AutoHealRule::from_wire`]. Linux sites
//! support a subset of the Windows feature set: no private memory trigger and
//! only the `Recycle` action.

use fx_version::OsType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::options::TranslatorOptions;

mod translate;
pub mod wire;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display(
        "status code trigger {value:?} is a range and can not carry a sub-status or win32 status"
    ))]
    ConflictingFields { value: String },

    #[snafu(display("the {feature} is not supported on linux"))]
    UnsupportedOnLinux { feature: &'static str },

    #[snafu(display("the {action_type} action is not supported on linux, only Recycle is"))]
    UnsupportedActionOnLinux { action_type: AutoHealActionType },

    #[snafu(display("the CustomAction action type requires a custom action to run"))]
    MissingCustomAction,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<AutoHealTriggers>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AutoHealAction>,
}

impl AutoHealRule {
    /// A rule without triggers and without an action is the same as no rule
    /// at all.
    pub fn is_empty(&self) -> bool {
        self.triggers.as_ref().is_none_or(AutoHealTriggers::is_empty) && self.action.is_none()
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<RequestTrigger>,

    /// Windows only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_memory_kb: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_request: Option<SlowRequestTrigger>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slow_requests_with_path: Vec<SlowRequestTrigger>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_codes: Vec<StatusCodeTrigger>,
}

impl AutoHealTriggers {
    pub fn is_empty(&self) -> bool {
        self.requests.is_none()
            && self.enabled_private_memory_kb().is_none()
            && self.slow_request.is_none()
            && self.slow_requests_with_path.is_empty()
            && self.status_codes.is_empty()
    }

    /// The private memory limit, [`None`] when unset or 0 (disabled).
    pub(crate) fn enabled_private_memory_kb(&self) -> Option<i32> {
        self.private_memory_kb.filter(|kilobytes| *kilobytes != 0)
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTrigger {
    pub count: i32,

    /// Format `hh:mm:ss`.
    pub interval: String,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowRequestTrigger {
    /// Format `hh:mm:ss`.
    pub time_taken: String,

    pub interval: String,

    pub count: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A status based trigger.
///
/// Whether this is a single status code or a range of codes is decided by
/// the shape of `status_code_range`, see [`StatusCodeTrigger::classify`].
/// Ranges can not carry a sub-status or a win32 status.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodeTrigger {
    /// A single code like `500` or a range like `400-499`.
    pub status_code_range: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win32_status: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub count: i32,

    pub interval: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCodeClass {
    Single(i32),
    Range { low: i32, high: i32 },

    /// Neither a number nor two numbers separated by a single `-`.
    Invalid,
}

impl StatusCodeTrigger {
    pub fn classify(&self) -> StatusCodeClass {
        let value = self.status_code_range.trim();

        if let Some((low, high)) = value.split_once('-') {
            return match (low.trim().parse(), high.trim().parse()) {
                (Ok(low), Ok(high)) => StatusCodeClass::Range { low, high },
                _ => StatusCodeClass::Invalid,
            };
        }

        value
            .parse()
            .map_or(StatusCodeClass::Invalid, StatusCodeClass::Single)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Hash,
    JsonSchema,
    PartialEq,
    Eq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum AutoHealActionType {
    #[default]
    Recycle,
    LogEvent,
    CustomAction,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealAction {
    pub action_type: AutoHealActionType,

    /// Minimum uptime of the process before the action triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_process_execution_time: Option<String>,

    /// Required for [`AutoHealActionType::CustomAction`], Windows only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_action: Option<CustomAction>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAction {
    pub executable: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

/// Translates an optional rule into the `autoHealEnabled` flag and the wire
/// rules. No rule leaves both untouched, an empty rule disables auto-heal and
/// clears the rules with an empty object.
pub fn expand_auto_heal(
    rule: Option<&AutoHealRule>,
    os: OsType,
    options: &TranslatorOptions,
) -> Result<(bool, Option<wire::AutoHealRules>)> {
    let Some(rule) = rule else {
        return Ok((false, None));
    };

    Ok((!rule.is_empty(), Some(rule.to_wire(os, options)?)))
}

pub fn flatten_auto_heal(rules: Option<&wire::AutoHealRules>, os: OsType) -> Option<AutoHealRule> {
    rules.and_then(|rules| AutoHealRule::from_wire(rules, os))
}
