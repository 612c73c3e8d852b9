//! Role-specific profiles.
//!
//! Each profile is one-to-one with its user and stores a
//! `profile_completeness` percentage that is recomputed from a fixed
//! checklist before every save.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::CatalogEntry;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Availability {
    Immediately,
    #[serde(rename = "Within 2 weeks")]
    WithinTwoWeeks,
    #[default]
    #[serde(rename = "Within 1 month")]
    WithinOneMonth,
    #[serde(rename = "Within 3 months")]
    WithinThreeMonths,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Immediately => "Immediately",
            Availability::WithinTwoWeeks => "Within 2 weeks",
            Availability::WithinOneMonth => "Within 1 month",
            Availability::WithinThreeMonths => "Within 3 months",
        }
    }

    /// Unknown stored values fall back to the default.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "Immediately" => Availability::Immediately,
            "Within 2 weeks" => Availability::WithinTwoWeeks,
            "Within 3 months" => Availability::WithinThreeMonths,
            _ => Availability::WithinOneMonth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Private,
}

impl ProfileVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileVisibility::Public => "public",
            ProfileVisibility::Private => "private",
        }
    }

    pub fn parse_lossy(value: &str) -> Self {
        if value == "private" {
            ProfileVisibility::Private
        } else {
            ProfileVisibility::Public
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    pub years_of_experience: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub field_of_study: String,
    pub university: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    #[serde(default)]
    pub currently_studying: bool,
    pub gpa: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub currently_working: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "501-1000")]
    VeryLarge,
    #[serde(rename = "1000+")]
    Enterprise,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Micro => "1-10",
            CompanySize::Small => "11-50",
            CompanySize::Medium => "51-200",
            CompanySize::Large => "201-500",
            CompanySize::VeryLarge => "501-1000",
            CompanySize::Enterprise => "1000+",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1-10" => Some(CompanySize::Micro),
            "11-50" => Some(CompanySize::Small),
            "51-200" => Some(CompanySize::Medium),
            "201-500" => Some(CompanySize::Large),
            "501-1000" => Some(CompanySize::VeryLarge),
            "1000+" => Some(CompanySize::Enterprise),
            _ => None,
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn percent(checks: &[bool]) -> i32 {
    let filled = checks.iter().filter(|c| **c).count();
    ((filled * 100) / checks.len()) as i32
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub statement_header: Option<String>,
    pub statement: Option<String>,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
    pub resume_url: Option<String>,
    pub profile_picture_url: Option<String>,
    pub city_id: Option<Uuid>,
    pub availability: Availability,
    pub profile_visibility: ProfileVisibility,
    pub skills: Vec<Skill>,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub social_links: SocialLinks,
    pub profile_completeness: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobSeekerProfile {
    pub fn completeness(&self) -> i32 {
        percent(&[
            present(&self.statement_header),
            present(&self.statement),
            present(&self.university),
            present(&self.field_of_study),
            present(&self.resume_url),
            present(&self.profile_picture_url),
            self.city_id.is_some(),
            !self.skills.is_empty(),
            !self.educations.is_empty(),
            !self.experiences.is_empty() || !self.projects.is_empty(),
        ])
    }

    /// Recompute derived fields before a save.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.profile_completeness = self.completeness();
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub business_email: String,
    pub contact_person_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<CompanySize>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
    pub social_links: SocialLinks,
    pub verified: bool,
    pub profile_completeness: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployerProfile {
    pub fn completeness(&self) -> i32 {
        percent(&[
            !self.company_name.trim().is_empty(),
            !self.business_email.trim().is_empty(),
            !self.contact_person_name.trim().is_empty(),
            present(&self.website),
            present(&self.description),
            present(&self.logo_url),
            present(&self.industry),
            self.company_size.is_some(),
            self.founded_year.is_some(),
            present(&self.headquarters),
            present(&self.phone),
            present(&self.address),
            self.city_id.is_some(),
        ])
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.profile_completeness = self.completeness();
        self.updated_at = now;
    }
}

/// A public seeker as listed in the professionals directory. Carries no
/// contact details.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalCard {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub statement_header: Option<String>,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
    pub profile_picture_url: Option<String>,
    pub city: Option<CatalogEntry>,
    pub availability: Availability,
    pub skills: Vec<Skill>,
    pub profile_completeness: i32,
}

impl ProfessionalCard {
    pub fn new(
        profile: JobSeekerProfile,
        first_name: String,
        last_name: String,
        city: Option<CatalogEntry>,
    ) -> Self {
        Self {
            id: profile.id,
            first_name,
            last_name,
            statement_header: profile.statement_header,
            university: profile.university,
            field_of_study: profile.field_of_study,
            profile_picture_url: profile.profile_picture_url,
            city,
            availability: profile.availability,
            skills: profile.skills,
            profile_completeness: profile.profile_completeness,
        }
    }
}

/// Profile row created together with the user at signup.
#[derive(Debug, Clone)]
pub enum ProfileSeed {
    JobSeeker {
        university: String,
        field_of_study: Option<String>,
    },
    Employer {
        company_name: String,
        business_email: String,
        contact_person_name: String,
        industry: Option<String>,
        company_size: Option<CompanySize>,
        website: Option<String>,
        description: Option<String>,
    },
    /// Admin accounts have no profile
    None,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfileChanges {
    #[validate(length(max = 100, message = "Statement header cannot exceed 100 characters"))]
    pub statement_header: Option<String>,
    #[validate(length(max = 500, message = "Statement cannot exceed 500 characters"))]
    pub statement: Option<String>,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
    pub city_id: Option<Uuid>,
    pub availability: Option<Availability>,
    pub profile_visibility: Option<ProfileVisibility>,
    pub skills: Option<Vec<Skill>>,
    pub educations: Option<Vec<Education>>,
    pub experiences: Option<Vec<Experience>>,
    pub projects: Option<Vec<Project>>,
    pub social_links: Option<SocialLinks>,
}

impl JobSeekerProfileChanges {
    pub fn apply(self, profile: &mut JobSeekerProfile) -> AppResult<()> {
        if let Some(educations) = &self.educations {
            for education in educations {
                if let Some(gpa) = education.gpa {
                    if !(0.0..=4.0).contains(&gpa) {
                        return Err(AppError::validation("GPA must be between 0 and 4"));
                    }
                }
                if matches!(education.end_year, Some(end) if end < education.start_year) {
                    return Err(AppError::validation(
                        "Education end year cannot be before its start year",
                    ));
                }
            }
        }
        if let Some(skills) = &self.skills {
            if skills.iter().any(|s| s.name.trim().is_empty()) {
                return Err(AppError::validation("Skill name is required"));
            }
        }

        if self.statement_header.is_some() {
            profile.statement_header = self.statement_header;
        }
        if self.statement.is_some() {
            profile.statement = self.statement;
        }
        if self.university.is_some() {
            profile.university = self.university;
        }
        if self.field_of_study.is_some() {
            profile.field_of_study = self.field_of_study;
        }
        if self.city_id.is_some() {
            profile.city_id = self.city_id;
        }
        if let Some(v) = self.availability {
            profile.availability = v;
        }
        if let Some(v) = self.profile_visibility {
            profile.profile_visibility = v;
        }
        if let Some(v) = self.skills {
            profile.skills = v;
        }
        if let Some(v) = self.educations {
            profile.educations = v;
        }
        if let Some(v) = self.experiences {
            profile.experiences = v;
        }
        if let Some(v) = self.projects {
            profile.projects = v;
        }
        if let Some(v) = self.social_links {
            profile.social_links = v;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfileChanges {
    #[validate(length(min = 2, max = 100, message = "Company name must be 2-100 characters"))]
    pub company_name: Option<String>,
    #[validate(email(message = "Please provide a valid business email"))]
    pub business_email: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub contact_person_name: Option<String>,
    #[validate(url(message = "Please provide a valid website URL"))]
    pub website: Option<String>,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<CompanySize>,
    #[validate(range(min = 1800, max = 2100))]
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
    pub social_links: Option<SocialLinks>,
}

impl EmployerProfileChanges {
    pub fn apply(self, profile: &mut EmployerProfile) {
        if let Some(v) = self.company_name {
            profile.company_name = v;
        }
        if let Some(v) = self.business_email {
            profile.business_email = v.trim().to_lowercase();
        }
        if let Some(v) = self.contact_person_name {
            profile.contact_person_name = v;
        }
        if self.website.is_some() {
            profile.website = self.website;
        }
        if self.description.is_some() {
            profile.description = self.description;
        }
        if self.industry.is_some() {
            profile.industry = self.industry;
        }
        if self.company_size.is_some() {
            profile.company_size = self.company_size;
        }
        if self.founded_year.is_some() {
            profile.founded_year = self.founded_year;
        }
        if self.headquarters.is_some() {
            profile.headquarters = self.headquarters;
        }
        if self.phone.is_some() {
            profile.phone = self.phone;
        }
        if self.address.is_some() {
            profile.address = self.address;
        }
        if self.city_id.is_some() {
            profile.city_id = self.city_id;
        }
        if let Some(v) = self.social_links {
            profile.social_links = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeker() -> JobSeekerProfile {
        let now = Utc::now();
        JobSeekerProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            statement_header: None,
            statement: None,
            university: Some("University of Moratuwa".to_string()),
            field_of_study: None,
            resume_url: None,
            profile_picture_url: None,
            city_id: None,
            availability: Availability::default(),
            profile_visibility: ProfileVisibility::default(),
            skills: vec![],
            educations: vec![],
            experiences: vec![],
            projects: vec![],
            social_links: SocialLinks::default(),
            profile_completeness: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completeness_tracks_checklist() {
        let mut profile = seeker();
        assert_eq!(profile.completeness(), 10);

        profile.statement_header = Some("Aspiring backend engineer".to_string());
        profile.skills.push(Skill {
            name: "Rust".to_string(),
            level: SkillLevel::Intermediate,
            years_of_experience: Some(1),
        });
        profile.touch(Utc::now());
        assert_eq!(profile.profile_completeness, 30);
    }

    #[test]
    fn test_blank_strings_do_not_count() {
        let mut profile = seeker();
        profile.statement = Some("   ".to_string());
        assert_eq!(profile.completeness(), 10);
    }

    #[test]
    fn test_changes_reject_bad_gpa() {
        let mut profile = seeker();
        let changes = JobSeekerProfileChanges {
            educations: Some(vec![Education {
                degree: "BSc".to_string(),
                field_of_study: "CS".to_string(),
                university: "UoM".to_string(),
                start_year: 2021,
                end_year: None,
                currently_studying: true,
                gpa: Some(4.5),
            }]),
            ..Default::default()
        };
        assert!(changes.apply(&mut profile).is_err());
        assert!(profile.educations.is_empty());
    }

    #[test]
    fn test_company_size_labels() {
        assert_eq!(CompanySize::parse("1000+"), Some(CompanySize::Enterprise));
        assert_eq!(CompanySize::Medium.as_str(), "51-200");
        assert_eq!(CompanySize::parse("huge"), None);
    }
}
