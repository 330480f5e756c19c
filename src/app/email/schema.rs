use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::subscriber::email::Email;
use crate::domain::template::{TemplateData, TemplateId};

#[derive(Deserialize)]
pub struct SendEmailBody {
    pub to: Option<String>,
    pub template: Option<String>,
    pub data: Option<Map<String, Value>>,
}

/// A validated `/send-email` request.
pub struct EmailRequest {
    pub to: Email,
    pub template: TemplateId,
    pub data: TemplateData,
}

impl TryFrom<SendEmailBody> for EmailRequest {
    type Error = String;

    fn try_from(body: SendEmailBody) -> Result<Self, Self::Error> {
        let to = body.to.ok_or("missing recipient `to`")?;
        let template = body.template.ok_or("missing `template`")?;

        Ok(Self {
            to: Email::try_from(to)?,
            template: TemplateId::lookup(&template).map_err(|e| e.to_string())?,
            data: body.data.map(TemplateData::from).unwrap_or_default(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponseBody {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub preview: Preview,
}

#[derive(Serialize)]
pub struct Preview {
    pub to: String,
    pub subject: String,
    pub html: String,
}
