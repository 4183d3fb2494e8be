use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::listing::model::{DEFAULT_IMAGE_FILENAME, ListingImage, ListingInput, ListingPayload};
use crate::review::model::{ReviewInput, ReviewPayload};
use crate::user::model::SignupRequest;
use crate::utils::error::CustomError;

static COUNTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("country pattern"));
static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ,]+$").expect("location pattern"));
static URI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("uri pattern"));
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("username pattern"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, format!("\"{field}\" is required"))
    }

    fn empty(field: &str) -> Self {
        Self::new(field, format!("\"{field}\" is not allowed to be empty"))
    }

    fn too_short(field: &str, min: usize) -> Self {
        Self::new(
            field,
            format!("\"{field}\" length must be at least {min} characters long"),
        )
    }

    fn pattern(field: &str, value: &str, pattern: &Regex) -> Self {
        Self::new(
            field,
            format!(
                "\"{field}\" with value \"{value}\" fails to match the required pattern: /{}/",
                pattern.as_str()
            ),
        )
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Join every violation into the single 400 raised to the client.
pub fn into_validation_error(errors: Vec<FieldError>) -> CustomError {
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    CustomError::ValidationError(message)
}

/// Trimmed, non-empty string with at least `min` characters.
fn required_text(
    value: Option<&String>,
    field: &str,
    min: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = value else {
        errors.push(FieldError::required(field));
        return None;
    };
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::empty(field));
        return None;
    }
    if value.chars().count() < min {
        errors.push(FieldError::too_short(field, min));
        return None;
    }
    Some(value.to_string())
}

fn matching(
    value: Option<String>,
    field: &str,
    pattern: &Regex,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = value?;
    if pattern.is_match(&value) {
        Some(value)
    } else {
        errors.push(FieldError::pattern(field, &value, pattern));
        None
    }
}

pub fn validate_listing(payload: &ListingPayload) -> Result<ListingInput, Vec<FieldError>> {
    let Some(draft) = payload.listing.as_ref() else {
        return Err(vec![FieldError::required("listing")]);
    };
    let mut errors = Vec::new();

    let title = required_text(draft.title.as_ref(), "listing.title", 5, &mut errors);
    let description = required_text(
        draft.description.as_ref(),
        "listing.description",
        20,
        &mut errors,
    );

    let price = match draft.price {
        None => {
            errors.push(FieldError::required("listing.price"));
            None
        }
        Some(price) if !price.is_finite() => {
            errors.push(FieldError::new(
                "listing.price",
                "\"listing.price\" must be a number",
            ));
            None
        }
        Some(price) if price < 1.0 => {
            errors.push(FieldError::new(
                "listing.price",
                "\"listing.price\" must be greater than or equal to 1",
            ));
            None
        }
        Some(price) => Some(price),
    };

    let location = required_text(draft.location.as_ref(), "listing.location", 3, &mut errors);
    let location = matching(location, "listing.location", &LOCATION_PATTERN, &mut errors);

    let country = required_text(draft.country.as_ref(), "listing.country", 1, &mut errors);
    let country = matching(country, "listing.country", &COUNTRY_PATTERN, &mut errors);

    let image = match draft.image.as_ref() {
        None => {
            errors.push(FieldError::required("listing.image"));
            None
        }
        Some(image) => {
            let url = required_text(image.url.as_ref(), "listing.image.url", 1, &mut errors);
            let url = url.and_then(|url| {
                if URI_PATTERN.is_match(&url) {
                    Some(url)
                } else {
                    errors.push(FieldError::new(
                        "listing.image.url",
                        "\"listing.image.url\" must be a valid uri",
                    ));
                    None
                }
            });
            url.map(|url| ListingImage {
                filename: image
                    .filename
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_IMAGE_FILENAME)
                    .to_string(),
                url,
            })
        }
    };

    match (title, description, price, location, country, image) {
        (Some(title), Some(description), Some(price), Some(location), Some(country), Some(image))
            if errors.is_empty() =>
        {
            Ok(ListingInput {
                title,
                description,
                image,
                price,
                location,
                country,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_review(payload: &ReviewPayload) -> Result<ReviewInput, Vec<FieldError>> {
    let Some(draft) = payload.review.as_ref() else {
        return Err(vec![FieldError::required("review")]);
    };
    let mut errors = Vec::new();

    let comment = required_text(draft.comment.as_ref(), "review.comment", 5, &mut errors);

    let rating = match draft.rating {
        None => {
            errors.push(FieldError::required("review.rating"));
            None
        }
        Some(rating) if !rating.is_finite() || rating.fract() != 0.0 => {
            errors.push(FieldError::new(
                "review.rating",
                "\"review.rating\" must be an integer",
            ));
            None
        }
        Some(rating) if rating < 1.0 => {
            errors.push(FieldError::new(
                "review.rating",
                "\"review.rating\" must be greater than or equal to 1",
            ));
            None
        }
        Some(rating) if rating > 5.0 => {
            errors.push(FieldError::new(
                "review.rating",
                "\"review.rating\" must be less than or equal to 5",
            ));
            None
        }
        Some(rating) => Some(rating as i32),
    };

    match (comment, rating) {
        (Some(comment), Some(rating)) => Ok(ReviewInput { comment, rating }),
        _ => Err(errors),
    }
}

pub fn validate_password(password: &str) -> Result<(), FieldError> {
    let length = password.chars().count();
    if !(8..=64).contains(&length) {
        return Err(FieldError::new(
            "password",
            "Password must be between 8 and 64 characters long.",
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(FieldError::new(
            "password",
            "Password must include at least one letter and one number.",
        ));
    }

    Ok(())
}

/// Returns the trimmed username and email.
pub fn validate_signup(request: &SignupRequest) -> Result<(String, String), Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = request.username.trim();
    if username.is_empty() {
        errors.push(FieldError::required("username"));
    } else if !USERNAME_PATTERN.is_match(username) {
        errors.push(FieldError::new(
            "username",
            "Username must be 3 to 30 letters, digits or underscores.",
        ));
    }

    let email = request.email.trim();
    if email.is_empty() {
        errors.push(FieldError::required("email"));
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.push(FieldError::new("email", "\"email\" must be a valid email"));
    }

    if let Err(e) = validate_password(&request.password) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok((username.to_string(), email.to_string()))
    } else {
        Err(errors)
    }
}
