use derive_more::Display;
use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 128;
const FORBIDDEN_CHARACTERS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

/// A display name used to greet a subscriber in campaign emails.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}", _0)]
pub struct Name(String);

impl TryFrom<String> for Name {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err("name is empty".into());
        }

        if value.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!("name is longer than {} characters", MAX_GRAPHEMES));
        }

        if value.chars().any(|c| FORBIDDEN_CHARACTERS.contains(&c)) {
            return Err("name contains invalid characters".into());
        }

        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
