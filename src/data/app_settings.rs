use crate::data::persistence::get_data_dir;
use crate::data::schedule::hh_mm;
use crate::data::{DumpFormat, OperatingSchedule, Persistable};
use anyhow::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    #[serde(with = "hh_mm")]
    pub default_open: Option<NaiveTime>,
    #[serde(with = "hh_mm")]
    pub default_close: Option<NaiveTime>,
    pub dump_format: DumpFormat,
    /// Dial prefix shown beside the phone input. Display only.
    pub country_code: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let hours = OperatingSchedule::default();
        AppSettings {
            default_open: hours.from,
            default_close: hours.to,
            dump_format: DumpFormat::Json,
            country_code: "+91".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }

    /// The schedule a fresh wizard starts from: nothing selected, configured hours.
    pub fn initial_schedule(&self) -> OperatingSchedule {
        OperatingSchedule::with_hours(self.default_open, self.default_close)
    }
}
