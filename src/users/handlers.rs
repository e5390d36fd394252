use std::path::Path;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    routing::get,
    Json, Router,
};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use super::{
    dto::{CreatedUserResponse, NewUserForm, PhotoPart, USER_CREATED_MESSAGE},
    repo_types::User,
    services::register_user,
};
use crate::{error::AppError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .layer(DefaultBodyLimit::disable())
}

/// GET /users
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// POST /users (multipart: name, email, photo)
#[instrument(skip(state, mp))]
pub async fn create_user(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreatedUserResponse>, AppError> {
    let mp = mp.map_err(|e| {
        warn!(error = %e, "not a multipart body");
        AppError::InvalidUpload
    })?;
    let form = read_form(mp).await?;
    let photo = form.photo.ok_or(AppError::InvalidUpload)?;

    let profile_pic_url = register_user(&state, form.name, form.email, photo).await?;

    Ok(Json(CreatedUserResponse {
        message: USER_CREATED_MESSAGE,
        profile_pic_url,
    }))
}

async fn read_form(mut mp: Multipart) -> Result<NewUserForm, AppError> {
    let mut name = None;
    let mut email = None;
    let mut photo = None;

    while let Some(mut field) = mp.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") if name.is_none() => {
                name = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("email") if email.is_none() => {
                email = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("photo") if photo.is_none() => {
                let file_name = field
                    .file_name()
                    .and_then(base_name)
                    .ok_or(AppError::InvalidUpload)?;
                photo = Some(spool_photo(file_name, &mut field).await?);
            }
            _ => {}
        }
    }

    Ok(NewUserForm {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        photo,
    })
}

/// Copies the part to a temp file chunk by chunk.
async fn spool_photo(file_name: String, field: &mut Field<'_>) -> Result<PhotoPart, AppError> {
    let (file, path) = NamedTempFile::new().map_err(AppError::Spool)?.into_parts();
    let mut out = tokio::fs::File::from_std(file);
    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        out.write_all(&chunk).await.map_err(AppError::Spool)?;
        size += chunk.len() as u64;
    }
    out.flush().await.map_err(AppError::Spool)?;
    debug!(%file_name, size, "photo spooled");

    Ok(PhotoPart {
        file_name,
        path,
        size,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    warn!(error = %e, "malformed multipart body");
    AppError::InvalidUpload
}

/// Last path component of a client-supplied file name.
fn base_name(raw: &str) -> Option<String> {
    Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
