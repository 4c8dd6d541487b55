//! Parsing of `key: value` configuration blocks into generation settings

use crate::model::{LinkDirection, TableGenSettings};
use thiserror::Error;
use tracing::warn;

/// Non-fatal problem found while parsing a configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsWarning {
    #[error("Unable to parse gen setting key {key}")]
    UnknownKey { key: String },

    #[error("Unable to parse line {line} as a gen setting")]
    MalformedLine { line: String },

    #[error("Invalid value {value:?} for {key}, keeping the default")]
    InvalidValue { key: String, value: String },
}

/// Settings recovered from a block together with everything that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSettings {
    pub settings: TableGenSettings,
    pub warnings: Vec<SettingsWarning>,
}

/// Keys accepted in a configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    TimeAxisPath,
    InquireAxisPath,
    CollectLinks,
    IncludeFirst,
    IncludeLast,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::TimeAxisPath,
        SettingKey::InquireAxisPath,
        SettingKey::CollectLinks,
        SettingKey::IncludeFirst,
        SettingKey::IncludeLast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::TimeAxisPath => "time_axis_path",
            SettingKey::InquireAxisPath => "inquire_axis_path",
            SettingKey::CollectLinks => "collect_links",
            SettingKey::IncludeFirst => "include_first",
            SettingKey::IncludeLast => "include_last",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl TableGenSettings {
    /// Set one field from its textual value. The field is left untouched on error.
    pub fn apply(&mut self, key: SettingKey, value: &str) -> Result<(), SettingsWarning> {
        let invalid = || SettingsWarning::InvalidValue {
            key: key.name().to_string(),
            value: value.to_string(),
        };
        match key {
            SettingKey::TimeAxisPath => self.time_axis_path = value.to_string(),
            SettingKey::InquireAxisPath => self.inquire_axis_path = value.to_string(),
            SettingKey::CollectLinks => {
                self.collect_links = value.parse::<LinkDirection>().map_err(|_| invalid())?
            }
            SettingKey::IncludeFirst => self.include_first = parse_flag(value).ok_or_else(invalid)?,
            SettingKey::IncludeLast => self.include_last = parse_flag(value).ok_or_else(invalid)?,
        }
        Ok(())
    }
}

/// `true`/`false` and the usual spellings, case-insensitive.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a configuration block on top of the default settings.
pub fn parse_block(source: &str) -> ParsedSettings {
    parse_block_with(source, TableGenSettings::default())
}

/// Parse a configuration block on top of `base`. Never fails; every skipped
/// line or value is reported in `warnings` and logged.
pub fn parse_block_with(source: &str, base: TableGenSettings) -> ParsedSettings {
    let mut parsed = ParsedSettings {
        settings: base,
        warnings: Vec::new(),
    };

    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            parsed.warnings.push(SettingsWarning::MalformedLine {
                line: line.to_string(),
            });
            continue;
        };

        let key = key.trim();
        let value = value.trim();
        match SettingKey::from_name(key) {
            Some(setting) => {
                if let Err(warning) = parsed.settings.apply(setting, value) {
                    parsed.warnings.push(warning);
                }
            }
            None => parsed.warnings.push(SettingsWarning::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    for warning in &parsed.warnings {
        warn!("{}", warning);
    }
    tracing::debug!("Generating with settings: {:?}", parsed.settings);

    parsed
}
