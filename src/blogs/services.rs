use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;

use crate::auth::session::CurrentUser;
use crate::error::AppError;

/// Parsed blog form: required text fields plus at most one `image` file.
#[derive(Debug)]
pub struct BlogSubmission {
    pub title: String,
    pub content: String,
    pub image: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("malformed form submission: {e}"))
}

/// Read the create/edit form out of a multipart body. A file part with an
/// empty filename or empty body is how browsers submit an untouched file
/// input, so both count as "no image".
pub async fn read_submission(multipart: &mut Multipart) -> Result<BlogSubmission, AppError> {
    let mut title = None;
    let mut content = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => title = Some(field.text().await.map_err(bad_multipart)?),
            Some("content") => content = Some(field.text().await.map_err(bad_multipart)?),
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !filename.is_empty() && !data.is_empty() {
                    image = Some(UploadedFile { filename, data });
                }
            }
            _ => {}
        }
    }

    let title = title
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("title is required".into()))?;
    let content = content
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("content is required".into()))?;

    Ok(BlogSubmission {
        title,
        content,
        image,
    })
}

/// The single ownership check used by every mutating blog route.
pub fn require_owner(author: &str, actor: &CurrentUser) -> Result<(), AppError> {
    if author == actor.username {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you do not have permission to do this".into(),
        ))
    }
}
