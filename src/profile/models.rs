//! Profile data models

use serde::Deserialize;

/// PATCH /user body; only the display name is self-serviceable
#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}
