use fx_version::OsType;
use snafu::ensure;
use tracing::{debug, warn};

use crate::{
    auto_heal::{
        AutoHealAction, AutoHealActionType, AutoHealRule, AutoHealTriggers,
        ConflictingFieldsSnafu, CustomAction, MissingCustomActionSnafu, RequestTrigger, Result,
        SlowRequestTrigger, StatusCodeClass, StatusCodeTrigger, UnsupportedActionOnLinuxSnafu,
        UnsupportedOnLinuxSnafu, wire,
    },
    options::TranslatorOptions,
};

impl AutoHealRule {
    /// Translates the rule into the provider structures for a site running on
    /// `os`. An empty rule becomes an empty wire object.
    pub fn to_wire(&self, os: OsType, options: &TranslatorOptions) -> Result<wire::AutoHealRules> {
        if self.is_empty() {
            return Ok(wire::AutoHealRules::default());
        }

        let triggers = self
            .triggers
            .as_ref()
            .filter(|triggers| !triggers.is_empty())
            .map(|triggers| triggers.to_wire(os, options))
            .transpose()?;

        let actions = self
            .action
            .as_ref()
            .map(|action| action.to_wire(os))
            .transpose()?;

        Ok(wire::AutoHealRules { triggers, actions })
    }

    /// Reads the rule back from the provider structures. Returns [`None`] if
    /// the wire object carries neither triggers nor an action.
    ///
    /// Single codes and ranges are merged into one list, codes first. A range
    /// entry holding a single code (written in legacy mode) comes back as a
    /// single code.
    pub fn from_wire(rules: &wire::AutoHealRules, os: OsType) -> Option<Self> {
        let triggers = rules
            .triggers
            .as_ref()
            .map(|triggers| AutoHealTriggers::from_wire(triggers, os))
            .filter(|triggers| !triggers.is_empty());

        let action = rules
            .actions
            .as_ref()
            .filter(|actions| !actions.is_empty())
            .map(|actions| AutoHealAction::from_wire(actions, os));

        let rule = Self { triggers, action };
        (!rule.is_empty()).then_some(rule)
    }
}

impl AutoHealTriggers {
    fn to_wire(&self, os: OsType, options: &TranslatorOptions) -> Result<wire::AutoHealTriggers> {
        ensure!(
            os == OsType::Windows || self.enabled_private_memory_kb().is_none(),
            UnsupportedOnLinuxSnafu {
                feature: "private memory trigger"
            }
        );

        let mut status_codes = Vec::new();
        let mut status_codes_range = Vec::new();

        for trigger in &self.status_codes {
            let class = trigger.classify();

            // Ranges reject a sub-status below, on every OS.
            let sub_status = match (os, class, trigger.sub_status) {
                (
                    OsType::Linux,
                    StatusCodeClass::Single(_) | StatusCodeClass::Invalid,
                    Some(sub_status),
                ) => {
                    debug!(
                        sub_status,
                        value = %trigger.status_code_range,
                        "dropping sub-status, linux does not support it"
                    );
                    None
                }
                (_, _, sub_status) => sub_status,
            };

            match class {
                StatusCodeClass::Range { .. } => {
                    ensure!(
                        trigger.sub_status.is_none() && trigger.win32_status.is_none(),
                        ConflictingFieldsSnafu {
                            value: &trigger.status_code_range
                        }
                    );

                    status_codes_range.push(trigger.to_wire_range(trigger.status_code_range.trim()));
                }
                StatusCodeClass::Single(status)
                    if options.legacy_status_code_mode
                        && sub_status.is_none()
                        && trigger.win32_status.is_none() =>
                {
                    status_codes_range.push(trigger.to_wire_range(&status.to_string()));
                }
                StatusCodeClass::Single(status) => {
                    status_codes.push(trigger.to_wire_code(Some(status), sub_status));
                }
                StatusCodeClass::Invalid => {
                    warn!(
                        value = %trigger.status_code_range,
                        "status code trigger is neither a code nor a range, sending it without a status"
                    );
                    status_codes.push(trigger.to_wire_code(None, sub_status));
                }
            }
        }

        Ok(wire::AutoHealTriggers {
            requests: self.requests.as_ref().map(|requests| wire::RequestsBasedTrigger {
                count: Some(requests.count),
                time_interval: Some(requests.interval.clone()),
            }),
            private_bytes_in_kb: self.enabled_private_memory_kb(),
            status_codes: (!status_codes.is_empty()).then_some(status_codes),
            slow_requests: self.slow_request.as_ref().map(SlowRequestTrigger::to_wire),
            slow_requests_with_path: (!self.slow_requests_with_path.is_empty()).then(|| {
                self.slow_requests_with_path
                    .iter()
                    .map(SlowRequestTrigger::to_wire)
                    .collect()
            }),
            status_codes_range: (!status_codes_range.is_empty()).then_some(status_codes_range),
        })
    }

    fn from_wire(triggers: &wire::AutoHealTriggers, os: OsType) -> Self {
        let private_memory_kb = match (os, triggers.private_bytes_in_kb) {
            // The provider reports 0 for a disabled trigger.
            (_, None | Some(0)) => None,
            (OsType::Linux, Some(kilobytes)) => {
                debug!(kilobytes, "dropping private memory trigger, linux does not support it");
                None
            }
            (OsType::Windows, Some(kilobytes)) => Some(kilobytes),
        };

        let codes = triggers
            .status_codes
            .iter()
            .flatten()
            .map(|trigger| StatusCodeTrigger::from_wire_code(trigger, os));
        let ranges = triggers
            .status_codes_range
            .iter()
            .flatten()
            .map(StatusCodeTrigger::from_wire_range);

        Self {
            requests: triggers.requests.as_ref().map(|requests| RequestTrigger {
                count: requests.count.unwrap_or_default(),
                interval: requests.time_interval.clone().unwrap_or_default(),
            }),
            private_memory_kb,
            slow_request: triggers
                .slow_requests
                .as_ref()
                .map(SlowRequestTrigger::from_wire),
            slow_requests_with_path: triggers
                .slow_requests_with_path
                .iter()
                .flatten()
                .map(SlowRequestTrigger::from_wire)
                .collect(),
            status_codes: codes.chain(ranges).collect(),
        }
    }
}

impl StatusCodeTrigger {
    fn to_wire_code(
        &self,
        status: Option<i32>,
        sub_status: Option<i32>,
    ) -> wire::StatusCodesBasedTrigger {
        wire::StatusCodesBasedTrigger {
            status,
            sub_status,
            win32_status: self.win32_status,
            count: Some(self.count),
            time_interval: Some(self.interval.clone()),
            path: non_empty(self.path.as_deref()),
        }
    }

    fn to_wire_range(&self, status_codes: &str) -> wire::StatusCodesRangeBasedTrigger {
        wire::StatusCodesRangeBasedTrigger {
            status_codes: Some(status_codes.to_owned()),
            path: non_empty(self.path.as_deref()),
            count: Some(self.count),
            time_interval: Some(self.interval.clone()),
        }
    }

    fn from_wire_code(trigger: &wire::StatusCodesBasedTrigger, os: OsType) -> Self {
        let sub_status = match (os, trigger.sub_status) {
            (OsType::Linux, Some(sub_status)) => {
                debug!(sub_status, "dropping sub-status, linux does not support it");
                None
            }
            (_, sub_status) => sub_status,
        };

        Self {
            status_code_range: trigger
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            sub_status,
            win32_status: trigger.win32_status,
            path: non_empty(trigger.path.as_deref()),
            count: trigger.count.unwrap_or_default(),
            interval: trigger.time_interval.clone().unwrap_or_default(),
        }
    }

    fn from_wire_range(trigger: &wire::StatusCodesRangeBasedTrigger) -> Self {
        Self {
            status_code_range: trigger.status_codes.clone().unwrap_or_default(),
            sub_status: None,
            win32_status: None,
            path: non_empty(trigger.path.as_deref()),
            count: trigger.count.unwrap_or_default(),
            interval: trigger.time_interval.clone().unwrap_or_default(),
        }
    }
}

impl SlowRequestTrigger {
    fn to_wire(&self) -> wire::SlowRequestsBasedTrigger {
        wire::SlowRequestsBasedTrigger {
            time_taken: Some(self.time_taken.clone()),
            path: non_empty(self.path.as_deref()),
            count: Some(self.count),
            time_interval: Some(self.interval.clone()),
        }
    }

    fn from_wire(trigger: &wire::SlowRequestsBasedTrigger) -> Self {
        Self {
            time_taken: trigger.time_taken.clone().unwrap_or_default(),
            interval: trigger.time_interval.clone().unwrap_or_default(),
            count: trigger.count.unwrap_or_default(),
            path: non_empty(trigger.path.as_deref()),
        }
    }
}

impl AutoHealAction {
    fn to_wire(&self, os: OsType) -> Result<wire::AutoHealActions> {
        if os == OsType::Linux {
            ensure!(
                self.action_type == AutoHealActionType::Recycle,
                UnsupportedActionOnLinuxSnafu {
                    action_type: self.action_type
                }
            );
            ensure!(
                self.custom_action.is_none(),
                UnsupportedOnLinuxSnafu {
                    feature: "custom action"
                }
            );
        }

        ensure!(
            self.action_type != AutoHealActionType::CustomAction || self.custom_action.is_some(),
            MissingCustomActionSnafu
        );

        Ok(wire::AutoHealActions {
            action_type: Some(self.action_type),
            custom_action: self
                .custom_action
                .as_ref()
                .map(|custom_action| wire::AutoHealCustomAction {
                    exe: Some(custom_action.executable.clone()),
                    parameters: custom_action.parameters.clone(),
                }),
            min_process_execution_time: self.minimum_process_execution_time.clone(),
        })
    }

    fn from_wire(actions: &wire::AutoHealActions, os: OsType) -> Self {
        let custom_action = match (os, &actions.custom_action) {
            (_, None) => None,
            (OsType::Linux, Some(_)) => {
                debug!("dropping custom action, linux does not support it");
                None
            }
            (OsType::Windows, Some(custom_action)) => Some(CustomAction {
                executable: custom_action.exe.clone().unwrap_or_default(),
                parameters: non_empty(custom_action.parameters.as_deref()),
            }),
        };

        Self {
            action_type: actions.action_type.unwrap_or_default(),
            minimum_process_execution_time: non_empty(
                actions.min_process_execution_time.as_deref(),
            ),
            custom_action,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(ToOwned::to_owned)
}
