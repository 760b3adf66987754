pub mod controller;
pub mod error;
pub mod session;
pub mod step;

pub use controller::{View, WizardController};
pub use error::WizardError;
pub use session::{Session, WizardEvent};
pub use step::{Move, Step};
