use super::models::{CreateLinkRequest, UpdateLinkRequest};
use crate::common::{ValidationResult, Validator};

fn validate_url(result: &mut ValidationResult, url: &str) {
    if url.trim().is_empty() {
        result.add_error("url", "URL is required");
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        result.add_error(
            "url",
            "URL must be a valid URL starting with http:// or https://",
        );
    }
}

fn validate_short_code(result: &mut ValidationResult, short_code: &str) {
    if short_code.len() < 3 || short_code.len() > 20 {
        result.add_error("short_code", "Short code must be 3 to 20 characters");
    }
}

impl Validator<CreateLinkRequest> for CreateLinkRequest {
    fn validate(&self, data: &CreateLinkRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_url(&mut result, &data.url);

        if let Some(short_code) = &data.short_code {
            validate_short_code(&mut result, short_code);
        }

        result
    }
}

impl Validator<UpdateLinkRequest> for UpdateLinkRequest {
    fn validate(&self, data: &UpdateLinkRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(url) = &data.url {
            validate_url(&mut result, url);
        }

        if let Some(short_code) = &data.short_code {
            validate_short_code(&mut result, short_code);
        }

        result
    }
}
