//! Plain data shapes for the company site's marketing content.
//!
//! These records carry no behaviour beyond serialization, except for
//! [`ContactFormData`], which validates visitor input before submission.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ReconError, Result};

// =============================================================================
// Company
// =============================================================================

/// Legal form of the company. The site only ever describes a holding company.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyType {
    #[default]
    #[serde(rename = "Holding Company")]
    HoldingCompany,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub short_name: String,
    pub tagline: String,
    pub description: String,
    /// Corporate Identification Number.
    pub cin: String,
    pub founded: u16,
    #[serde(rename = "type", default)]
    pub company_type: CompanyType,
    pub address: Address,
    pub contact: ContactInfo,
    pub website: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(street) = &self.street {
            write!(f, "{}, ", street)?;
        }
        write!(
            f,
            "{}, {} – {}, {}",
            self.city, self.state, self.pincode, self.country
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub website: String,
}

// =============================================================================
// Founder
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub name: String,
    pub title: String,
    pub role: String,
    pub bio: String,
    pub background: String,
    pub image_alt: String,
}

// =============================================================================
// Portfolio
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VentureStage {
    #[serde(rename = "Active Development")]
    ActiveDevelopment,
    #[serde(rename = "Operational")]
    Operational,
    #[serde(rename = "Pre-Launch")]
    PreLaunch,
    #[serde(rename = "Strategic Evaluation")]
    StrategicEvaluation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VentureSector {
    #[serde(rename = "Nutraceutical & Wellness")]
    NutraceuticalWellness,
    #[serde(rename = "Technology")]
    Technology,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Finance")]
    Finance,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "Education")]
    Education,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioVenture {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub sector: VentureSector,
    pub stage: VentureStage,
    pub logo_alt: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<VentureMetaItem>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VentureMetaItem {
    pub label: String,
    pub value: String,
}

// =============================================================================
// Services, values, stats, navigation
// =============================================================================

/// One of the company's service capabilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    /// Display ordinal, e.g. "01".
    pub number: String,
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrandValue {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatItem {
    pub value: String,
    pub label: String,
    pub sublabel: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

// =============================================================================
// SEO
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCard {
    #[default]
    Summary,
    SummaryLargeImage,
}

/// Per-page search engine and social sharing metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<TwitterCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

impl SeoMeta {
    /// Open Graph title, defaulting to the page title.
    pub fn effective_og_title(&self) -> &str {
        self.og_title.as_deref().unwrap_or(&self.title)
    }

    /// Open Graph description, defaulting to the page description.
    pub fn effective_og_description(&self) -> &str {
        self.og_description.as_deref().unwrap_or(&self.description)
    }
}

// =============================================================================
// Contact form
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnquiryType {
    #[serde(rename = "Business Partnership")]
    BusinessPartnership,
    #[serde(rename = "Strategic Collaboration")]
    StrategicCollaboration,
    #[serde(rename = "Investment Inquiry")]
    InvestmentInquiry,
    #[serde(rename = "Life Sciences / Rajmeric")]
    LifeSciences,
    #[serde(rename = "General Enquiry")]
    GeneralEnquiry,
}

/// The form's select sends `""` until an option is picked.
mod enquiry_selection {
    use serde::de::value::StrDeserializer;
    use serde::de::IntoDeserializer;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::EnquiryType;

    pub fn serialize<S: Serializer>(
        value: &Option<EnquiryType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(kind) => kind.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<EnquiryType>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(None),
            Some(label) => {
                let de: StrDeserializer<'_, D::Error> = label.into_deserializer();
                EnquiryType::deserialize(de).map(Some)
            }
        }
    }
}

/// A visitor's contact form submission.
///
/// `enquiry_type` is `None` until the visitor picks an option, and travels
/// as `""` in that state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    pub email: String,
    #[serde(default, with = "enquiry_selection")]
    pub enquiry_type: Option<EnquiryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A single problem with a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormViolation {
    #[error("full name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("email address is not valid: {0}")]
    InvalidEmail(String),
    #[error("enquiry type must be selected")]
    MissingEnquiryType,
}

impl ContactFormData {
    /// Check every required field and return all violations found.
    pub fn validate(&self) -> Vec<FormViolation> {
        let mut violations = Vec::new();

        if self.full_name.trim().is_empty() {
            violations.push(FormViolation::MissingName);
        }

        let email = self.email.trim();
        if email.is_empty() {
            violations.push(FormViolation::MissingEmail);
        } else if !is_plausible_email(email) {
            violations.push(FormViolation::InvalidEmail(email.to_string()));
        }

        if self.enquiry_type.is_none() {
            violations.push(FormViolation::MissingEnquiryType);
        }

        violations
    }

    /// Like [`validate`](Self::validate), but folds the violations into a
    /// single [`ReconError::Validation`].
    pub fn ensure_valid(&self) -> Result<()> {
        let violations = self.validate();
        if violations.is_empty() {
            return Ok(());
        }
        let joined = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(ReconError::Validation(joined))
    }
}

/// One `@`, non-empty local part, and a dotted domain without empty labels.
fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}
