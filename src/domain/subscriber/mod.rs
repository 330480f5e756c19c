pub mod email;
pub mod name;

use self::email::Email;
use self::name::Name;

/// Default signup source when a form does not say where it lives.
pub const DEFAULT_SOURCE: &str = "main";

/// A validated waitlist signup.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: Email,
    pub name: Option<Name>,
    pub source: String,
}

/// Whether capturing a subscriber created a new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Created,
    AlreadySubscribed,
}

impl CaptureOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Created)
    }
}
