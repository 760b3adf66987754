pub mod app_settings;
pub mod attachment;
pub mod persistence;
pub mod record;
pub mod schedule;

pub use app_settings::AppSettings;
pub use attachment::Attachment;
pub use persistence::Persistable;
pub use record::{
    ContactInfo, DumpFormat, PropertyDetails, Record, ScheduleDetails, SizeTier, StepOutput,
};
pub use schedule::{OperatingSchedule, TimeBound, ToggleKey};
