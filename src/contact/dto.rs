use serde::Deserialize;

use super::repo_types::NewMessage;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl From<ContactRequest> for NewMessage {
    fn from(r: ContactRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            message: r.message,
        }
    }
}
