/// JSON body of every error response.
#[derive(serde::Serialize)]
pub struct Error {
    pub code: u16,
    pub message: String,
}
