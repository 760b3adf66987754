use crate::data::attachment::MAX_ATTACHMENT_BYTES;
use crate::data::{Attachment, ContactInfo, PropertyDetails, ScheduleDetails};
use std::num::IntErrorKind;

/// A step's input failed its local gate. The message is shown to the user
/// as-is and the step is not submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in both name and phone number.")]
    MissingContact,

    #[error("Please fill in all hotel details.")]
    MissingPropertyDetails,

    #[error("Please enter a valid number of rooms.")]
    InvalidUnitCount,

    #[error("Please select at least one operating day.")]
    NoDaySelected,

    #[error("Please select operating hours.")]
    MissingHours,

    #[error("File {name} is not a PDF, JPG, or PNG.")]
    UnsupportedAttachment { name: String },

    #[error("File {name} exceeds 10MB limit.")]
    AttachmentTooLarge { name: String },
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn validate_contact(contact: &ContactInfo) -> Result<(), ValidationError> {
    if is_blank(&contact.name) || is_blank(&contact.phone) {
        return Err(ValidationError::MissingContact);
    }
    Ok(())
}

pub fn validate_property(property: &PropertyDetails) -> Result<(), ValidationError> {
    if is_blank(&property.name) || property.size.is_none() || is_blank(&property.location) {
        return Err(ValidationError::MissingPropertyDetails);
    }
    Ok(())
}

/// Checks run in order: unit count, day selection, opening hours.
pub fn validate_schedule(details: &ScheduleDetails) -> Result<(), ValidationError> {
    if details.total_units == 0 {
        return Err(ValidationError::InvalidUnitCount);
    }
    if !details.schedule.has_any_day() {
        return Err(ValidationError::NoDaySelected);
    }
    if !details.schedule.has_hours() {
        return Err(ValidationError::MissingHours);
    }
    Ok(())
}

/// Selection-time check for a menu file, independent of step submission.
pub fn validate_attachment(attachment: &Attachment) -> Result<(), ValidationError> {
    if !attachment.is_accepted_type() {
        return Err(ValidationError::UnsupportedAttachment {
            name: attachment.name.clone(),
        });
    }
    if attachment.size > MAX_ATTACHMENT_BYTES {
        return Err(ValidationError::AttachmentTooLarge {
            name: attachment.name.clone(),
        });
    }
    Ok(())
}

/// Room-count input: anything that is not a non-negative integer becomes 0,
/// which the schedule gate then rejects. Counts too large for `u32`
/// saturate at `u32::MAX`.
pub fn parse_unit_count(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
        Err(_) => 0,
    }
}
