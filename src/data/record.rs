use crate::data::OperatingSchedule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::Small => "Small (1-50 rooms)",
            SizeTier::Medium => "Medium (51-200 rooms)",
            SizeTier::Large => "Large (201+ rooms)",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SizeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(SizeTier::Small),
            "medium" => Ok(SizeTier::Medium),
            "large" => Ok(SizeTier::Large),
            _ => Err(format!("unknown property size '{s}'")),
        }
    }
}

/// Output of the contact step, and the slice that step is rendered with.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
}

/// Output of the property step.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyDetails {
    pub name: String,
    pub size: Option<SizeTier>,
    pub location: String,
}

/// Output of the operating-hours step. Staged attachments are not part of it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleDetails {
    pub total_units: u32,
    pub schedule: OperatingSchedule,
    pub description: String,
}

/// What a step hands to the controller once its gate has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutput {
    Contact(ContactInfo),
    Property(PropertyDetails),
    Schedule(ScheduleDetails),
}

impl StepOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            StepOutput::Contact(_) => "contact",
            StepOutput::Property(_) => "property",
            StepOutput::Schedule(_) => "schedule",
        }
    }
}

/// The hotel-operator profile accumulated across the wizard.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub contact_name: String,
    pub contact_phone: String,
    pub property_name: String,
    pub property_size: Option<SizeTier>,
    pub property_location: String,
    pub total_units: u32,
    pub schedule: OperatingSchedule,
    pub description: String,
}

impl Record {
    /// Empty record whose schedule starts from `schedule` (normally the
    /// configured opening hours).
    pub fn with_schedule(schedule: OperatingSchedule) -> Self {
        Record {
            schedule,
            ..Record::default()
        }
    }

    /// Shallow merge: the output's fields overwrite their counterparts, every
    /// other field is left alone.
    pub fn merge(&mut self, output: StepOutput) {
        match output {
            StepOutput::Contact(c) => {
                self.contact_name = c.name;
                self.contact_phone = c.phone;
            }
            StepOutput::Property(p) => {
                self.property_name = p.name;
                self.property_size = p.size;
                self.property_location = p.location;
            }
            StepOutput::Schedule(s) => {
                self.total_units = s.total_units;
                self.schedule = s.schedule;
                self.description = s.description;
            }
        }
    }

    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            name: self.contact_name.clone(),
            phone: self.contact_phone.clone(),
        }
    }

    pub fn property(&self) -> PropertyDetails {
        PropertyDetails {
            name: self.property_name.clone(),
            size: self.property_size,
            location: self.property_location.clone(),
        }
    }

    pub fn schedule_details(&self) -> ScheduleDetails {
        ScheduleDetails {
            total_units: self.total_units,
            schedule: self.schedule,
            description: self.description.clone(),
        }
    }

    /// Structured dump shown on the completion screen.
    pub fn render(&self, format: DumpFormat) -> Result<String> {
        match format {
            DumpFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize record as JSON")
            }
            DumpFormat::Yaml => {
                serde_norway::to_string(self).context("failed to serialize record as YAML")
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    #[default]
    Json,
    Yaml,
}
