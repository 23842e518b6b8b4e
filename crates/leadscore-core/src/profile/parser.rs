//! Offer and lead parsing from YAML/JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::{validate_lead_schema, validate_offer_schema};

/// Errors that can occur when loading profiles.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{document} failed schema validation: {}", .errors.join("; "))]
    SchemaViolation {
        document: String,
        errors: Vec<String>,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Lead document must be a list of leads")]
    NotAList,

    #[error("Lead batch is empty")]
    EmptyBatch,

    #[error("Unsupported file extension: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

/// The product or service a lead is evaluated against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OfferProfile {
    /// Offer name
    pub name: String,

    /// Value propositions, in the order given
    #[serde(default)]
    pub value_props: Vec<String>,

    /// Ideal use cases / target industries, in the order given
    #[serde(default)]
    pub ideal_use_cases: Vec<String>,
}

/// A prospective customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "LeadDocument")]
pub struct LeadProfile {
    pub name: String,

    pub role: Option<String>,

    pub company: Option<String>,

    pub industry: Option<String>,

    pub location: Option<String>,

    /// Free-text biography (LinkedIn summary or similar)
    pub bio: Option<String>,
}

/// Lead record as written in a document. Both `bio` and `linkedin_bio` may
/// appear; a non-empty `linkedin_bio` wins.
#[derive(Deserialize)]
struct LeadDocument {
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    linkedin_bio: Option<String>,
}

impl From<LeadDocument> for LeadProfile {
    fn from(doc: LeadDocument) -> Self {
        let bio = match (doc.linkedin_bio, doc.bio) {
            (Some(linkedin), _) if !linkedin.is_empty() => Some(linkedin),
            (linkedin, None) => linkedin,
            (_, bio) => bio,
        };

        Self {
            name: doc.name,
            role: doc.role,
            company: doc.company,
            industry: doc.industry,
            location: doc.location,
            bio,
        }
    }
}

/// A lead record that could not be used, kept in its batch position.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RejectedLead {
    /// The record's `name` when it had a string one, otherwise empty
    pub name: String,
    pub error: ProfileError,
}

/// Every record of a lead document, in document order.
///
/// Bad records do not fail the load; they stay in place as [`RejectedLead`]s
/// so the rest of the batch is still scored.
#[derive(Debug, Default)]
pub struct LeadBatch {
    pub records: Vec<Result<LeadProfile, RejectedLead>>,
}

impl LeadBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn leads(&self) -> impl Iterator<Item = &LeadProfile> {
        self.records.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Rejected records with their position in the document.
    pub fn rejected(&self) -> impl Iterator<Item = (usize, &RejectedLead)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// The usable leads, dropping rejected records.
    pub fn into_leads(self) -> Vec<LeadProfile> {
        self.records.into_iter().filter_map(Result::ok).collect()
    }
}

impl From<Vec<LeadProfile>> for LeadBatch {
    fn from(leads: Vec<LeadProfile>) -> Self {
        Self {
            records: leads.into_iter().map(Ok).collect(),
        }
    }
}

/// The six lead fields checked for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Role,
    Company,
    Industry,
    Location,
    Bio,
}

impl LeadField {
    pub const ALL: [LeadField; 6] = [
        LeadField::Name,
        LeadField::Role,
        LeadField::Company,
        LeadField::Industry,
        LeadField::Location,
        LeadField::Bio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Role => "role",
            LeadField::Company => "company",
            LeadField::Industry => "industry",
            LeadField::Location => "location",
            LeadField::Bio => "bio",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            _ => Err(ProfileError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse(self, text: &str) -> Result<serde_json::Value, ProfileError> {
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
            DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }
}

/// Convert a schema-checked document into its typed form.
fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ProfileError> {
    Ok(serde_json::from_value(value)?)
}

impl OfferProfile {
    /// Create an offer with no value props or use cases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value_prop(mut self, value_prop: impl Into<String>) -> Self {
        self.value_props.push(value_prop.into());
        self
    }

    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.ideal_use_cases.push(use_case.into());
        self
    }

    /// Parse an offer from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        Self::from_value(DocumentFormat::Yaml.parse(yaml)?)
    }

    /// Parse an offer from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Self::from_value(DocumentFormat::Json.parse(json)?)
    }

    /// Load an offer from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let contents = fs::read_to_string(path)?;
        Self::from_value(format.parse(&contents)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ProfileError> {
        validate_offer_schema(&value).map_err(|errors| ProfileError::SchemaViolation {
            document: "offer".to_string(),
            errors,
        })?;

        let offer: OfferProfile = decode(value)?;
        offer.validate()?;
        tracing::debug!(
            offer = %offer.name,
            value_props = offer.value_props.len(),
            use_cases = offer.ideal_use_cases.len(),
            "Offer loaded"
        );
        Ok(offer)
    }

    /// Structural checks beyond the schema.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("offer.name".to_string()));
        }
        Ok(())
    }
}

impl LeadProfile {
    /// Create a lead with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Field text with a missing value normalized to the empty string.
    pub fn field(&self, field: LeadField) -> &str {
        let value = match field {
            LeadField::Name => return &self.name,
            LeadField::Role => &self.role,
            LeadField::Company => &self.company,
            LeadField::Industry => &self.industry,
            LeadField::Location => &self.location,
            LeadField::Bio => &self.bio,
        };
        value.as_deref().unwrap_or("")
    }

    /// Fields that are missing or empty.
    pub fn missing_fields(&self) -> Vec<LeadField> {
        LeadField::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect()
    }

    /// Structural checks beyond the schema.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("lead.name".to_string()));
        }
        Ok(())
    }

    /// Parse a list of leads from a JSON array.
    pub fn batch_from_json(json: &str) -> Result<LeadBatch, ProfileError> {
        Self::batch_from_value(DocumentFormat::Json.parse(json)?)
    }

    /// Parse a list of leads from a YAML sequence.
    pub fn batch_from_yaml(yaml: &str) -> Result<LeadBatch, ProfileError> {
        Self::batch_from_value(DocumentFormat::Yaml.parse(yaml)?)
    }

    /// Load a list of leads from a `.yaml`, `.yml` or `.json` file.
    pub fn batch_from_file(path: impl AsRef<Path>) -> Result<LeadBatch, ProfileError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let contents = fs::read_to_string(path)?;
        Self::batch_from_value(format.parse(&contents)?)
    }

    /// Only document-level problems fail here; each bad record is rejected
    /// in place.
    fn batch_from_value(value: serde_json::Value) -> Result<LeadBatch, ProfileError> {
        let serde_json::Value::Array(items) = value else {
            return Err(ProfileError::NotAList);
        };

        if items.is_empty() {
            return Err(ProfileError::EmptyBatch);
        }

        let records: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Self::record_from_value(index, item).map_err(|(name, error)| {
                    tracing::warn!(index, lead = %name, error = %error, "Rejected lead record");
                    RejectedLead { name, error }
                })
            })
            .collect();

        let batch = LeadBatch { records };
        tracing::debug!(
            leads = batch.leads().count(),
            rejected = batch.rejected().count(),
            "Lead batch loaded"
        );
        Ok(batch)
    }

    fn record_from_value(
        index: usize,
        item: serde_json::Value,
    ) -> Result<Self, (String, ProfileError)> {
        let name = item
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string();

        if let Err(errors) = validate_lead_schema(&item) {
            let error = ProfileError::SchemaViolation {
                document: format!("leads[{}]", index),
                errors,
            };
            return Err((name, error));
        }

        let lead: LeadProfile = match decode(item) {
            Ok(lead) => lead,
            Err(e) => return Err((name, e)),
        };
        if lead.validate().is_err() {
            return Err((name, ProfileError::MissingField(format!("leads[{}].name", index))));
        }
        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_OFFER: &str = r#"
name: "AI Outreach Automation"
value_props:
  - "24/7 outreach"
  - "6x more meetings"
ideal_use_cases:
  - "B2B SaaS mid-market"
  - "sales teams"
"#;

    #[test]
    fn test_parse_valid_offer() {
        let offer = OfferProfile::from_yaml(VALID_OFFER).unwrap();
        assert_eq!(offer.name, "AI Outreach Automation");
        assert_eq!(offer.value_props, vec!["24/7 outreach", "6x more meetings"]);
        assert_eq!(offer.ideal_use_cases.len(), 2);
    }

    #[test]
    fn test_offer_from_json_defaults_lists() {
        let offer = OfferProfile::from_json(r#"{"name": "Bare"}"#).unwrap();
        assert!(offer.value_props.is_empty());
        assert!(offer.ideal_use_cases.is_empty());
    }

    #[test]
    fn test_offer_blank_name_rejected() {
        let result = OfferProfile::from_json(r#"{"name": "   "}"#);
        assert!(matches!(result, Err(ProfileError::MissingField(_))));
    }

    #[test]
    fn test_offer_schema_violation_reported() {
        let result = OfferProfile::from_json(r#"{"name": "X", "value_props": "not a list"}"#);
        match result {
            Err(ProfileError::SchemaViolation { document, errors }) => {
                assert_eq!(document, "offer");
                assert!(!errors.is_empty());
            }
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_lead_batch_accepts_linkedin_bio_alias() {
        let leads = LeadProfile::batch_from_json(
            r#"[{"name": "Ava Patel", "role": "Head of Growth", "linkedin_bio": "Leading growth."}]"#,
        )
        .unwrap()
        .into_leads();
        assert_eq!(leads[0].bio.as_deref(), Some("Leading growth."));
    }

    #[test]
    fn test_linkedin_bio_preferred_over_bio() {
        let batch = LeadProfile::batch_from_json(
            r#"[
                {"name": "Both", "bio": "short", "linkedin_bio": "from linkedin"},
                {"name": "Blank linkedin", "bio": "short", "linkedin_bio": ""},
                {"name": "Bio only", "bio": "short"}
            ]"#,
        )
        .unwrap();

        assert_eq!(batch.rejected().count(), 0);
        let bios: Vec<_> = batch.leads().map(|l| l.bio.as_deref()).collect();
        assert_eq!(bios, vec![Some("from linkedin"), Some("short"), Some("short")]);
    }

    #[test]
    fn test_lead_batch_preserves_order() {
        let batch = LeadProfile::batch_from_yaml(
            r#"
- name: "First"
- name: "Second"
- name: "Third"
"#,
        )
        .unwrap();
        let names: Vec<_> = batch.leads().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_empty_lead_batch_rejected() {
        assert!(matches!(
            LeadProfile::batch_from_json("[]"),
            Err(ProfileError::EmptyBatch)
        ));
    }

    #[test]
    fn test_lead_document_must_be_list() {
        assert!(matches!(
            LeadProfile::batch_from_json(r#"{"name": "Solo"}"#),
            Err(ProfileError::NotAList)
        ));
    }

    #[test]
    fn test_bad_records_rejected_in_place() {
        let batch = LeadProfile::batch_from_json(
            r#"[
                {"name": "Ok", "role": "CEO"},
                {"name": ""},
                {"name": "Typed", "role": 3},
                {"role": "No name"},
                {"name": "Last"}
            ]"#,
        )
        .unwrap();

        assert_eq!(batch.len(), 5);
        let names: Vec<_> = batch.leads().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Ok", "Last"]);

        let rejected: Vec<_> = batch.rejected().map(|(i, r)| (i, r.name.as_str())).collect();
        assert_eq!(rejected, vec![(1, ""), (2, "Typed"), (3, "")]);

        match &batch.records[1] {
            Err(RejectedLead {
                error: ProfileError::MissingField(field),
                ..
            }) => assert_eq!(field, "leads[1].name"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
        match &batch.records[2] {
            Err(RejectedLead {
                error: ProfileError::SchemaViolation { document, .. },
                ..
            }) => assert_eq!(document, "leads[2]"),
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_lead_columns_ignored() {
        let batch = LeadProfile::batch_from_json(
            r#"[{"name": "Ok"}, {"name": "B", "email": "b@x.io", "id": 7}]"#,
        )
        .unwrap();
        assert_eq!(batch.rejected().count(), 0);
        assert_eq!(batch.into_leads()[1], LeadProfile::new("B"));
    }

    #[test]
    fn test_batch_from_profiles_keeps_every_lead() {
        let batch = LeadBatch::from(vec![LeadProfile::new("A"), LeadProfile::new("B")]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rejected().count(), 0);
    }

    #[test]
    fn test_missing_and_empty_fields_are_equivalent() {
        let missing = LeadProfile::new("Ava");
        let empty = LeadProfile::new("Ava").with_role("").with_bio("");

        assert_eq!(missing.field(LeadField::Role), "");
        assert_eq!(empty.field(LeadField::Role), "");
        assert!(empty.missing_fields().contains(&LeadField::Role));
        assert!(empty.missing_fields().contains(&LeadField::Bio));
        assert_eq!(missing.missing_fields().len(), 5);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = OfferProfile::from_file("offer.toml");
        assert!(matches!(result, Err(ProfileError::UnsupportedFormat(_))));
    }
}
