//! The auto-heal rules as they are sent to and received from the provider.
//!
//! Every field is optional and omitted when unset, so an empty rule set
//! serializes to `{}`.

use serde::{Deserialize, Serialize};

use crate::auto_heal::AutoHealActionType;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<AutoHealTriggers>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<AutoHealActions>,
}

impl AutoHealRules {
    pub fn is_empty(&self) -> bool {
        self.triggers.as_ref().is_none_or(AutoHealTriggers::is_empty)
            && self.actions.as_ref().is_none_or(AutoHealActions::is_empty)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<RequestsBasedTrigger>,

    // Older API versions called this privateMemoryInKB.
    #[serde(
        default,
        rename = "privateBytesInKB",
        alias = "privateMemoryInKB",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_bytes_in_kb: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<Vec<StatusCodesBasedTrigger>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_requests: Option<SlowRequestsBasedTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_requests_with_path: Option<Vec<SlowRequestsBasedTrigger>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes_range: Option<Vec<StatusCodesRangeBasedTrigger>>,
}

impl AutoHealTriggers {
    pub fn is_empty(&self) -> bool {
        self.requests.is_none()
            && self.private_bytes_in_kb.is_none()
            && self.status_codes.as_ref().is_none_or(Vec::is_empty)
            && self.slow_requests.is_none()
            && self.slow_requests_with_path.as_ref().is_none_or(Vec::is_empty)
            && self.status_codes_range.as_ref().is_none_or(Vec::is_empty)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsBasedTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_interval: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodesBasedTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win32_status: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCodesRangeBasedTrigger {
    /// Either `<low>-<high>` or, in legacy mode, a single code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_codes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_interval: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowRequestsBasedTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_interval: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<AutoHealActionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_action: Option<AutoHealCustomAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_process_execution_time: Option<String>,
}

impl AutoHealActions {
    pub fn is_empty(&self) -> bool {
        self.action_type.is_none()
            && self.custom_action.is_none()
            && self.min_process_execution_time.is_none()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoHealCustomAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exe: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}
