use serde::Serialize;
use tempfile::TempPath;

pub const USER_CREATED_MESSAGE: &str = "User created successfully";

/// Uploaded photo spooled to disk. The file is removed when this is dropped.
#[derive(Debug)]
pub struct PhotoPart {
    pub file_name: String,
    pub path: TempPath,
    pub size: u64,
}

/// Fields of the `POST /users` multipart body.
#[derive(Debug, Default)]
pub struct NewUserForm {
    pub name: String,
    pub email: String,
    pub photo: Option<PhotoPart>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: &'static str,
    pub profile_pic_url: String,
}
