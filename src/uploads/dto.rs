use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}
