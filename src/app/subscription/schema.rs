use serde::{Deserialize, Serialize};

use crate::domain::subscriber::{email::Email, name::Name, NewSubscriber, DEFAULT_SOURCE};
use crate::notification::DispatchResult;

#[derive(Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = String;

    fn try_from(value: SubscribeBody) -> Result<Self, Self::Error> {
        let email = Email::try_from(value.email)?;
        let name = value
            .name
            .filter(|name| !name.trim().is_empty())
            .map(Name::try_from)
            .transpose()?;
        let source = value
            .source
            .map(|source| source.trim().to_owned())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_owned());

        Ok(Self {
            email,
            name,
            source,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponseBody {
    pub success: bool,
    pub is_new: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<DispatchResult>,
}
