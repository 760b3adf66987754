use crate::data::{ContactInfo, PropertyDetails, Record, ScheduleDetails, StepOutput};
use crate::wizard::{Move, Step, WizardError};
use tracing::info;

/// What the current screen is rendered with: its slice of the record, or the
/// whole record once the wizard is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    Contact(ContactInfo),
    Property(PropertyDetails),
    Schedule(ScheduleDetails),
    Complete(&'a Record),
}

/// Owns the current step and the accumulated record. Outputs handed to
/// `advance` have already passed their step's gate; nothing is re-validated.
#[derive(Debug, Clone)]
pub struct WizardController {
    step: Step,
    record: Record,
}

impl Default for WizardController {
    fn default() -> Self {
        WizardController::new(Record::default())
    }
}

impl WizardController {
    pub fn new(record: Record) -> Self {
        WizardController {
            step: Step::Contact,
            record,
        }
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Merges the current step's output into the record and moves forward.
    pub fn advance(&mut self, output: StepOutput) -> Result<Step, WizardError> {
        let next = self.target(Move::Advance)?;
        let owner = Step::for_output(&output);
        if owner != self.step {
            return Err(WizardError::StepMismatch {
                step: self.step,
                output: output.kind(),
            });
        }
        self.record.merge(output);
        info!(from = %self.step, to = %next, "step completed");
        self.step = next;
        Ok(next)
    }

    /// Moves back one step. The record is not rolled back.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        let prev = self.target(Move::Retreat)?;
        info!(from = %self.step, to = %prev, "step revisited");
        self.step = prev;
        Ok(prev)
    }

    pub fn current_view(&self) -> View<'_> {
        match self.step {
            Step::Contact => View::Contact(self.record.contact()),
            Step::Property => View::Property(self.record.property()),
            Step::Schedule => View::Schedule(self.record.schedule_details()),
            Step::Complete => View::Complete(&self.record),
        }
    }

    fn target(&self, action: Move) -> Result<Step, WizardError> {
        self.step
            .target(action)
            .ok_or(WizardError::NoTransition {
                from: self.step,
                action,
            })
    }
}
