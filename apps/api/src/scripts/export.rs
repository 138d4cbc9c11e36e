//! Markdown export of saved scripts to object storage.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scripts::store::ScriptRecord;

pub fn export_key(user_id: Uuid, script_id: Uuid) -> String {
    format!("scripts/{user_id}/{script_id}.md")
}

/// Renders a script as a markdown document with a metadata header.
pub fn render_script_to_md(record: &ScriptRecord) -> String {
    let mut md = format!("# {}\n\n", record.title.trim());
    md.push_str(&format!("- **Script ID:** {}\n", record.id));
    md.push_str(&format!("- **Language:** {}\n", record.language));
    if let Some(industry) = record.industry.as_deref().filter(|i| !i.trim().is_empty()) {
        md.push_str(&format!("- **Industry:** {}\n", industry.trim()));
    }
    md.push_str(&format!("- **Words:** {}\n", record.word_count));
    md.push_str(&format!(
        "- **Created:** {}\n\n---\n\n",
        record.created_at.to_rfc3339()
    ));
    md.push_str(&record.content);
    if !record.content.ends_with('\n') {
        md.push('\n');
    }
    md
}

/// Uploads the rendered markdown and returns its object key.
pub async fn upload_script(
    s3: &S3Client,
    bucket: &str,
    record: &ScriptRecord,
) -> Result<String, AppError> {
    let key = export_key(record.user_id, record.id);
    let body = render_script_to_md(record);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(body.into_bytes()))
        .content_type("text/markdown")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Exported script {} to s3://{}/{}", record.id, bucket, key);
    Ok(key)
}
