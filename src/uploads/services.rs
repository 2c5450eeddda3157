use anyhow::Context;
use bytes::Bytes;
use rand::Rng;
use time::OffsetDateTime;

use crate::state::AppState;

pub struct UploadItem<'a> {
    pub original_name: &'a str,
    pub content_type: &'a str,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub public_path: String,
}

pub async fn store_upload(st: &AppState, item: UploadItem<'_>) -> anyhow::Result<StoredFile> {
    let name = generate_name(
        item.original_name,
        now_millis(),
        rand::thread_rng().gen_range(0..=1_000_000_000u32),
    );
    st.storage
        .put_object(&name, item.body, item.content_type)
        .await
        .with_context(|| format!("put_object {}", name))?;
    Ok(StoredFile {
        public_path: st.storage.public_path(&name),
        name,
    })
}

/// `<millis>-<random>-<original name>`, the name reduced to a single path component.
pub(crate) fn generate_name(original: &str, millis: i128, suffix: u32) -> String {
    format!("{}-{}-{}", millis, suffix, sanitize_file_name(original))
}

pub(crate) fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    match cleaned.trim() {
        "" | "." | ".." => "file".to_string(),
        _ => cleaned,
    }
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}
