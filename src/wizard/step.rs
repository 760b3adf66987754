use crate::data::StepOutput;
use std::fmt;

/// The four screens of the wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Contact,
    Property,
    Schedule,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Advance,
    Retreat,
}

/// Every legal edge. There is no skip edge and nothing leaves `Complete`.
const TRANSITIONS: [(Step, Move, Step); 5] = [
    (Step::Contact, Move::Advance, Step::Property),
    (Step::Property, Move::Retreat, Step::Contact),
    (Step::Property, Move::Advance, Step::Schedule),
    (Step::Schedule, Move::Retreat, Step::Property),
    (Step::Schedule, Move::Advance, Step::Complete),
];

const HELLO_TITLE: &str = "Hello, I'm AgukenAI.";
const HELLO_SUBTITLE: &str =
    "I'm an AI Agent helping you handle reception and support calls using GenAI-based phone call automation.";

impl Step {
    pub const ALL: [Step; 4] = [Step::Contact, Step::Property, Step::Schedule, Step::Complete];

    /// Where `mv` leads from this step, if anywhere.
    pub fn target(self, mv: Move) -> Option<Step> {
        TRANSITIONS
            .iter()
            .find(|(from, m, _)| *from == self && *m == mv)
            .map(|(_, _, to)| *to)
    }

    pub fn can_retreat(self) -> bool {
        self.target(Move::Retreat).is_some()
    }

    pub fn is_terminal(self) -> bool {
        self.target(Move::Advance).is_none() && self.target(Move::Retreat).is_none()
    }

    /// 1-based position shown to the user.
    pub fn number(self) -> u8 {
        match self {
            Step::Contact => 1,
            Step::Property => 2,
            Step::Schedule => 3,
            Step::Complete => 4,
        }
    }

    /// The step whose gate produces `output`.
    pub fn for_output(output: &StepOutput) -> Step {
        match output {
            StepOutput::Contact(_) => Step::Contact,
            StepOutput::Property(_) => Step::Property,
            StepOutput::Schedule(_) => Step::Schedule,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Contact | Step::Property => HELLO_TITLE,
            Step::Schedule => "Total Number of Rooms",
            Step::Complete => "Onboarding Complete!",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Step::Contact | Step::Property => HELLO_SUBTITLE,
            Step::Schedule => "Reception Operating Hours",
            Step::Complete => "",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Advance => write!(f, "advance"),
            Move::Retreat => write!(f, "go back"),
        }
    }
}
