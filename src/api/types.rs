// API request and response bodies
// Shared by the route handlers and the client actions

use serde::{Deserialize, Serialize};

use crate::model::{Education, EntryId, Experience, ProfileFields, Social, UserId};
use crate::validation::{Checks, FieldError};

/// Skills as sent by a form (`"rust, sql"`) or as a JSON list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    /// Split on commas, trim, and drop empty pieces
    pub fn into_list(self) -> Vec<String> {
        let pieces: Vec<String> = match self {
            Self::Csv(csv) => csv.split(',').map(ToString::to_string).collect(),
            Self::List(list) => list,
        };
        pieces
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Body of `POST /api/profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillsInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl ProfileForm {
    /// Validate and turn the form into the fields stored for `user`
    pub fn into_fields(self, user: UserId) -> Result<ProfileFields, Vec<FieldError>> {
        let skills = self.skills.map(SkillsInput::into_list).unwrap_or_default();
        let status = present(self.status);

        let mut checks = Checks::new();
        checks
            .required("status", status.as_deref(), "Status is required")
            .required(
                "skills",
                skills.first().map(String::as_str),
                "Skills is required",
            );
        checks.finish()?;

        Ok(ProfileFields {
            user,
            company: present(self.company),
            website: present(self.website),
            location: present(self.location),
            bio: present(self.bio),
            status: status.unwrap_or_default(),
            githubusername: present(self.githubusername),
            skills,
            social: Social {
                youtube: present(self.youtube),
                twitter: present(self.twitter),
                facebook: present(self.facebook),
                linkedin: present(self.linkedin),
                instagram: present(self.instagram),
            },
        })
    }
}

/// Body of `PUT /api/profile/experience`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExperienceForm {
    pub fn into_entry(self) -> Result<Experience, Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("title", self.title.as_deref(), "Title is required")
            .required("company", self.company.as_deref(), "Company is required")
            .required("from", self.from.as_deref(), "From date is required");
        let from = checks.date("from", self.from.as_deref(), "From date is invalid");
        let to = checks.date("to", self.to.as_deref(), "To date is invalid");
        checks.finish()?;

        let from = from.ok_or_else(|| missing_from(self.from.as_deref()))?;
        Ok(Experience {
            id: EntryId::new(),
            title: self.title.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            location: present(self.location),
            from,
            to,
            current: self.current,
            description: present(self.description),
        })
    }
}

/// Body of `PUT /api/profile/education`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldofstudy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EducationForm {
    pub fn into_entry(self) -> Result<Education, Vec<FieldError>> {
        let mut checks = Checks::new();
        checks
            .required("school", self.school.as_deref(), "School is required")
            .required("degree", self.degree.as_deref(), "Degree is required")
            .required(
                "fieldofstudy",
                self.fieldofstudy.as_deref(),
                "Field of study is required",
            )
            .required("from", self.from.as_deref(), "From date is required");
        let from = checks.date("from", self.from.as_deref(), "From date is invalid");
        let to = checks.date("to", self.to.as_deref(), "To date is invalid");
        checks.finish()?;

        let from = from.ok_or_else(|| missing_from(self.from.as_deref()))?;
        Ok(Education {
            id: EntryId::new(),
            school: self.school.unwrap_or_default(),
            degree: self.degree.unwrap_or_default(),
            fieldofstudy: self.fieldofstudy.unwrap_or_default(),
            from,
            to,
            current: self.current,
            description: present(self.description),
        })
    }
}

/// `{"msg": ...}` body used for confirmations and single-message errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// `{"errors": [...]}` body of a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

/// Blank strings count as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_from(value: Option<&str>) -> Vec<FieldError> {
    vec![FieldError::new("from", value.unwrap_or_default(), "From date is required")]
}
