//! Application type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an application
///
/// The only transition this crate performs is `Draft` -> `Submitted`. The
/// review states exist so externally assigned outcomes survive storage
/// round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

/// English proficiency test taken by the applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnglishTestType {
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "IELTS")]
    Ielts,
    Duolingo,
    #[serde(rename = "PTE")]
    Pte,
    Other,
}

/// Degree level the applicant is applying for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeLevel {
    Undergraduate,
    Graduate,
    Postgraduate,
    #[serde(rename = "PhD")]
    PhD,
}

/// Applicant identity and contact details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub passport_number: String,
    pub email: String,
    pub phone: String,
    pub current_address: String,
}

/// Secondary education history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationalBackground {
    pub high_school_name: String,
    pub high_school_country: String,
    pub graduation_year: String,
    pub gpa: String,
    pub transcript_url: Option<String>,
    pub diploma_url: Option<String>,
}

/// English proficiency test record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnglishProficiency {
    pub test_type: Option<EnglishTestType>,
    pub score: String,
    pub test_date: String,
    pub certificate_url: Option<String>,
}

impl Default for EnglishProficiency {
    fn default() -> Self {
        Self {
            test_type: None,
            score: String::new(),
            test_date: String::new(),
            certificate_url: None,
        }
    }
}

/// Where and what the applicant wants to study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversityPreferences {
    pub preferred_countries: Vec<String>,
    pub preferred_programs: Vec<String>,
    pub degree_level: DegreeLevel,
    pub preferred_start_date: String,
}

impl Default for UniversityPreferences {
    fn default() -> Self {
        Self {
            preferred_countries: Vec::new(),
            preferred_programs: Vec::new(),
            degree_level: DegreeLevel::Undergraduate,
            preferred_start_date: String::new(),
        }
    }
}

/// Optional uploaded-document references
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documents {
    pub passport: Option<String>,
    pub transcripts: Option<Vec<String>>,
    pub recommendation_letters: Option<Vec<String>>,
    pub statement_of_purpose: Option<String>,
    pub cv: Option<String>,
    pub english_proficiency_certificate: Option<String>,
    pub financial_documents: Option<Vec<String>>,
    pub other_documents: Option<Vec<String>>,
}

/// A stored application record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier, allocated at creation
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub personal_info: PersonalInfo,
    pub educational_background: EducationalBackground,
    pub english_proficiency: EnglishProficiency,
    pub university_preferences: UniversityPreferences,
    pub documents: Documents,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly once, when the record leaves draft
    pub submitted_at: Option<DateTime<Utc>>,
    /// Encrypted self-snapshot, refreshed on every write
    pub encrypted_data: Option<String>,
}

impl Application {
    /// Collect every submit-blocking violation, not just the first
    pub fn required_field_violations(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.personal_info.first_name.is_empty() {
            errors.push("First name is required".to_string());
        }
        if self.personal_info.last_name.is_empty() {
            errors.push("Last name is required".to_string());
        }
        if self.personal_info.email.is_empty() {
            errors.push("Email is required".to_string());
        }
        if self.personal_info.passport_number.is_empty() {
            errors.push("Passport number is required".to_string());
        }

        if self.educational_background.high_school_name.is_empty() {
            errors.push("High school name is required".to_string());
        }
        if self.educational_background.gpa.is_empty() {
            errors.push("GPA is required".to_string());
        }

        if self.english_proficiency.test_type.is_none() {
            errors.push("English proficiency test type is required".to_string());
        }
        if self.english_proficiency.score.is_empty() {
            errors.push("English proficiency score is required".to_string());
        }

        if self.university_preferences.preferred_countries.is_empty() {
            errors.push("At least one preferred country is required".to_string());
        }
        if self.university_preferences.preferred_programs.is_empty() {
            errors.push("At least one preferred program is required".to_string());
        }

        errors
    }
}

/// The four sections (plus documents) required to start a draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewApplication {
    pub personal_info: PersonalInfo,
    pub educational_background: EducationalBackground,
    pub english_proficiency: EnglishProficiency,
    pub university_preferences: UniversityPreferences,
    #[serde(default)]
    pub documents: Documents,
}

/// A shallow patch over an existing record
///
/// Sections present in the patch replace the stored section wholesale;
/// absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    pub personal_info: Option<PersonalInfo>,
    pub educational_background: Option<EducationalBackground>,
    pub english_proficiency: Option<EnglishProficiency>,
    pub university_preferences: Option<UniversityPreferences>,
    pub documents: Option<Documents>,
    pub status: Option<ApplicationStatus>,
    pub submitted_at: Option<DateTime<Utc>>,
}
