use aws_smithy_types::byte_stream::ByteStream;
use tracing::info;

use super::dto::PhotoPart;
use super::repo_types::User;
use crate::{error::AppError, state::AppState, storage::UploadError};

/// Uploads the photo, then announces the user on the queue. Returns the photo reference.
///
/// Nothing is written to the users table here; the queue consumer owns the insert.
/// A failed publish leaves the uploaded photo in place, there is no compensation step.
pub async fn register_user(
    st: &AppState,
    name: String,
    email: String,
    photo: PhotoPart,
) -> Result<String, AppError> {
    let body = ByteStream::from_path(&photo.path)
        .await
        .map_err(|e| UploadError::Transfer(e.into()))?;
    let link = st.blobs.upload(&photo.file_name, body).await?;
    info!(size = photo.size, %link, "photo stored");
    // spool file goes away here
    drop(photo);

    let user = User::pending(name, email, link);
    st.publisher.publish(&user).await?;

    info!(email = %user.email, link = %user.link, "user submitted");
    Ok(user.link)
}
