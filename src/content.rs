use crate::timeline::{sort_by_start_date_descending, Dated};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const MAX_GOALS: usize = 3;
pub const MAX_CERTIFICATIONS: usize = 5;
pub const MAX_PROJECTS: usize = 6;
pub const MAX_GALLERY_IMAGES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Github,
    Email,
    Twitter,
    Instagram,
    Phone,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Github => "GitHub",
            Platform::Email => "Email",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Phone => "Phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: Platform,
    /// Profile URL, bare email address or bare phone number.
    pub url: String,
}

impl SocialLink {
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.platform.label()
    }

    pub fn href(&self) -> String {
        match self.platform {
            Platform::Email if !self.url.starts_with("mailto:") => format!("mailto:{}", self.url),
            Platform::Phone if !self.url.starts_with("tel:") => {
                let digits: String = self
                    .url
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect();
                format!("tel:{digits}")
            }
            _ => self.url.clone(),
        }
    }

    /// External profiles open in a new tab; mail and phone links open in place.
    pub fn opens_in_new_tab(&self) -> bool {
        !matches!(self.platform, Platform::Email | Platform::Phone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

impl Profile {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Email and phone from the profile fields, then the social links.
    pub fn contact_links(&self) -> Vec<SocialLink> {
        let mut links = vec![SocialLink::new(Platform::Email, self.email.clone())];
        if let Some(phone) = &self.phone {
            links.push(SocialLink::new(Platform::Phone, phone.clone()));
        }
        links.extend(
            self.social
                .iter()
                .filter(|link| !matches!(link.platform, Platform::Email | Platform::Phone))
                .cloned(),
        );
        links
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl Dated for Experience {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Project {
    /// Live demo first, repository second. A project with neither renders without a link.
    pub fn primary_link(&self) -> Option<&str> {
        [self.live_url.as_deref(), self.repo_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty() && *url != "#")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub issued: NaiveDate,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Everything the page renders, read once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
}

impl Portfolio {
    /// Load the content directory. Only `profile.json` is required.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading portfolio content from {}", dir.display());

        let profile = read_json(&dir.join("profile.json"))
            .await?
            .with_context(|| format!("profile.json missing from {}", dir.display()))?;

        let portfolio = Self {
            profile,
            experience: read_optional(dir, "experience.json").await?,
            skills: read_optional(dir, "skills.json").await?,
            projects: read_optional(dir, "projects.json").await?,
            certifications: read_optional(dir, "certifications.json").await?,
            goals: read_optional(dir, "goals.json").await?,
            gallery: read_optional(dir, "gallery.json").await?,
        };

        info!(
            "Loaded portfolio for {}: {} roles, {} projects, {} gallery images",
            portfolio.profile.name,
            portfolio.experience.len(),
            portfolio.projects.len(),
            portfolio.gallery.len()
        );
        Ok(portfolio)
    }

    pub fn experience_timeline(&self) -> Vec<Experience> {
        sort_by_start_date_descending(&self.experience)
    }

    pub fn goals(&self) -> &[Goal] {
        capped(&self.goals, MAX_GOALS)
    }

    pub fn certifications(&self) -> &[Certification] {
        capped(&self.certifications, MAX_CERTIFICATIONS)
    }

    pub fn projects(&self) -> &[Project] {
        capped(&self.projects, MAX_PROJECTS)
    }

    pub fn gallery(&self) -> &[GalleryImage] {
        capped(&self.gallery, MAX_GALLERY_IMAGES)
    }
}

fn capped<T>(items: &[T], max: usize) -> &[T] {
    &items[..items.len().min(max)]
}

async fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    Ok(read_json(&dir.join(file)).await?.unwrap_or_default())
}

/// `Ok(None)` when the file does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} found, using defaults", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}
