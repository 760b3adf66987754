pub mod hours;
pub mod validation;

pub use validation::ValidationError;
