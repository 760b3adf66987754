use crate::calc::ValidationError;
use crate::wizard::{Move, Step};

/// Why a wizard event was not applied. In every case the wizard state is
/// left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} from step {from}")]
    NoTransition { from: Step, action: Move },

    #[error("{output} output submitted on step {step}")]
    StepMismatch { step: Step, output: &'static str },

    #[error("{event} is not available on step {step}")]
    EventNotAvailable { event: &'static str, step: Step },

    #[error("no staged attachment at index {0}")]
    NoSuchAttachment(usize),
}

impl WizardError {
    /// True for gate failures the user can fix by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }
}
