//! Urlencoded form payloads and their conversion into store inputs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use blogicum_core::{
    Category, CategoryId, Location, LocationId, Post, PostDraft, User, ValidationError, Validator,
};
use blogicum_db::ProfileChanges;

const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub category: String,
    pub location: String,
    pub image: String,
    /// Checkbox: present when ticked.
    pub is_published: Option<String>,
}

impl PostForm {
    /// An empty form, published and dated now.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            pub_date: now.format(DATETIME_LOCAL_FORMAT).to_string(),
            is_published: Some("on".to_string()),
            ..Self::default()
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date.format(DATETIME_LOCAL_FORMAT).to_string(),
            category: post
                .category
                .as_ref()
                .map(|c| c.id.0.to_string())
                .unwrap_or_default(),
            location: post
                .location
                .as_ref()
                .map(|l| l.id.0.to_string())
                .unwrap_or_default(),
            image: post.image.clone().unwrap_or_default(),
            is_published: post.is_published.then(|| "on".to_string()),
        }
    }

    pub fn is_published(&self) -> bool {
        self.is_published.is_some()
    }

    /// Validate the form against the available choices.
    /// A category is required; a location is optional.
    pub fn to_draft(
        &self,
        categories: &[Category],
        locations: &[Location],
    ) -> Result<PostDraft, ValidationError> {
        Validator::validate_title("title", &self.title)?;
        Validator::validate_text("text", &self.text)?;
        let pub_date = Validator::parse_datetime_local(&self.pub_date)?;

        let category_id = match parse_choice(&self.category, "category")? {
            None => return Err(ValidationError::Required("category")),
            Some(id) if categories.iter().any(|c| c.id.0 == id) => CategoryId(id),
            Some(_) => return Err(ValidationError::UnknownChoice("category")),
        };

        let location_id = match parse_choice(&self.location, "location")? {
            None => None,
            Some(id) if locations.iter().any(|l| l.id.0 == id) => Some(LocationId(id)),
            Some(_) => return Err(ValidationError::UnknownChoice("location")),
        };

        let image = self.image.trim();
        if image.starts_with('/') || image.split('/').any(|part| part == "..") {
            return Err(ValidationError::InvalidCharacters {
                field: "image",
                value: image.to_string(),
            });
        }

        Ok(PostDraft {
            title: self.title.trim().to_string(),
            text: self.text.clone(),
            pub_date,
            is_published: self.is_published(),
            image: (!image.is_empty()).then(|| image.to_string()),
            category_id: Some(category_id),
            location_id,
        })
    }
}

fn parse_choice(raw: &str, field: &'static str) -> Result<Option<i64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| ValidationError::UnknownChoice(field))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<&str, ValidationError> {
        Validator::validate_text("text", &self.text)?;
        Ok(&self.text)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn to_changes(&self) -> Result<ProfileChanges, ValidationError> {
        let changes = ProfileChanges {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
        };
        Validator::validate_username(&changes.username)?;
        Validator::validate_person_name("first_name", &changes.first_name)?;
        Validator::validate_person_name("last_name", &changes.last_name)?;
        Validator::validate_email(&changes.email)?;
        Ok(changes)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        Validator::validate_username(self.username.trim())?;
        Validator::validate_new_password(&self.password1, &self.password2)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login. Browsers drop
/// tabs and newlines while parsing a URL, so control characters are refused.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n)
            if n.starts_with('/')
                && !n.starts_with("//")
                && !n.contains('\\')
                && !n.chars().any(char::is_control) =>
        {
            n
        }
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn choices() -> (Vec<Category>, Vec<Location>) {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (
            vec![Category {
                id: CategoryId(1),
                title: "Travel".to_string(),
                description: String::new(),
                slug: "travel".to_string(),
                is_published: true,
                created_at: at,
            }],
            vec![Location {
                id: LocationId(2),
                name: "Kazan".to_string(),
                is_published: true,
                created_at: at,
            }],
        )
    }

    fn valid_form() -> PostForm {
        PostForm {
            title: "Trip".to_string(),
            text: "Went places".to_string(),
            pub_date: "2024-06-01T10:00".to_string(),
            category: "1".to_string(),
            location: "2".to_string(),
            image: String::new(),
            is_published: Some("on".to_string()),
        }
    }

    #[test]
    fn test_valid_post_form() {
        let (categories, locations) = choices();
        let draft = valid_form().to_draft(&categories, &locations).unwrap();

        assert_eq!(draft.title, "Trip");
        assert_eq!(draft.category_id, Some(CategoryId(1)));
        assert_eq!(draft.location_id, Some(LocationId(2)));
        assert!(draft.is_published);
        assert_eq!(draft.image, None);
        assert_eq!(
            draft.pub_date,
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unticked_checkbox_unpublishes() {
        let (categories, locations) = choices();
        let form = PostForm {
            is_published: None,
            location: String::new(),
            ..valid_form()
        };
        let draft = form.to_draft(&categories, &locations).unwrap();
        assert!(!draft.is_published);
        assert_eq!(draft.location_id, None);
    }

    #[test]
    fn test_post_form_choices() {
        let (categories, locations) = choices();

        let no_category = PostForm {
            category: String::new(),
            ..valid_form()
        };
        assert_eq!(
            no_category.to_draft(&categories, &locations),
            Err(ValidationError::Required("category"))
        );

        let unknown = PostForm {
            category: "9".to_string(),
            ..valid_form()
        };
        assert_eq!(
            unknown.to_draft(&categories, &locations),
            Err(ValidationError::UnknownChoice("category"))
        );

        let bad_location = PostForm {
            location: "x".to_string(),
            ..valid_form()
        };
        assert_eq!(
            bad_location.to_draft(&categories, &locations),
            Err(ValidationError::UnknownChoice("location"))
        );
    }

    #[test]
    fn test_image_path_must_stay_in_media_dir() {
        let (categories, locations) = choices();

        let ok = PostForm {
            image: "posts_images/a.jpg".to_string(),
            ..valid_form()
        };
        assert_eq!(
            ok.to_draft(&categories, &locations).unwrap().image.as_deref(),
            Some("posts_images/a.jpg")
        );

        for bad in ["/etc/passwd", "../secret.jpg", "posts_images/../../x"] {
            let form = PostForm {
                image: bad.to_string(),
                ..valid_form()
            };
            assert!(form.to_draft(&categories, &locations).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_form_from_post_round_trips() {
        let (categories, locations) = choices();
        let draft = valid_form().to_draft(&categories, &locations).unwrap();
        let post = Post {
            id: blogicum_core::PostId(1),
            title: draft.title.clone(),
            text: draft.text.clone(),
            pub_date: draft.pub_date,
            is_published: draft.is_published,
            created_at: draft.pub_date,
            image: None,
            author: User {
                id: blogicum_core::UserId(1),
                username: "anna".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                date_joined: draft.pub_date,
            },
            category: categories.first().cloned(),
            location: locations.first().cloned(),
        };

        let form = PostForm::from_post(&post);
        assert_eq!(form.pub_date, "2024-06-01T10:00");
        assert_eq!(form.to_draft(&categories, &locations), Ok(draft));
    }

    #[test]
    fn test_profile_form() {
        let form = ProfileForm {
            username: " anna ".to_string(),
            first_name: "Anna".to_string(),
            last_name: String::new(),
            email: "anna@example.com".to_string(),
        };
        assert_eq!(form.to_changes().unwrap().username, "anna");

        let bad = ProfileForm {
            email: "nope".to_string(),
            ..form
        };
        assert!(bad.to_changes().is_err());
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/posts/1/")), "/posts/1/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("/\t/evil.example/")), "/");
        assert_eq!(safe_next(Some("/x\ny")), "/");
        assert_eq!(safe_next(Some("/posts/\r1/")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
