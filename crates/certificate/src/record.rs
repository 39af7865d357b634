//! Permit record model

use crate::{CertificateError, PermitCategory, Result};
use permit_format::{certificate_filename, plate_number, Amount};
use serde::{Deserialize, Deserializer, Serialize};

/// Label used when a record has no permit type
pub const DEFAULT_PERMIT_TYPE: &str = "Permit";

/// Fee as stored by the calling system: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeeValue {
    Number(f64),
    Text(String),
    /// Any other JSON value; treated as no fee
    Other(serde_json::Value),
}

impl From<&FeeValue> for Amount {
    fn from(value: &FeeValue) -> Self {
        match value {
            FeeValue::Number(n) => Amount::from(*n),
            FeeValue::Text(s) => Amount::from(s.as_str()),
            FeeValue::Other(_) => Amount(0.0),
        }
    }
}

/// A permit application as handed over by the calling system
///
/// Every field is optional. Keys are camelCase; snake_case spellings are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermitRecord {
    /// String or number in the source; stored as text
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "permit_type")]
    pub permit_type: Option<String>,
    #[serde(alias = "applicant_name")]
    pub applicant_name: Option<String>,
    #[serde(alias = "business_name")]
    pub business_name: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "contact_number")]
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "submitted_date")]
    pub submitted_date: Option<String>,
    #[serde(alias = "approved_date")]
    pub approved_date: Option<String>,
    #[serde(alias = "expiration_date")]
    pub expiration_date: Option<String>,
    pub fees: Option<FeeValue>,
    #[serde(alias = "receipt_number")]
    pub receipt_number: Option<String>,
    pub remarks: Option<String>,
    #[serde(alias = "compliance_notes")]
    pub compliance_notes: Option<String>,
    #[serde(rename = "application_type", alias = "applicationType")]
    pub application_type: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Integer(n)) => n.to_string(),
        Some(RawId::Float(n)) => n.to_string(),
        Some(RawId::Text(s)) => s,
        None => String::new(),
    })
}

/// Treat blank strings like missing values
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PermitRecord {
    /// Parse a record from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CertificateError::RecordError(e.to_string()))
    }

    /// Permit type label, "Permit" when absent
    pub fn permit_type_label(&self) -> &str {
        non_blank(&self.permit_type).unwrap_or(DEFAULT_PERMIT_TYPE)
    }

    /// Category derived from the permit type
    pub fn category(&self) -> PermitCategory {
        PermitCategory::classify(self.permit_type.as_deref().unwrap_or_default())
    }

    /// Remarks, falling back to compliance notes
    pub fn remarks_text(&self) -> Option<&str> {
        non_blank(&self.remarks).or_else(|| non_blank(&self.compliance_notes))
    }

    /// Fee amount, 0 when absent or unparseable
    pub fn fee_amount(&self) -> Amount {
        self.fees.as_ref().map(Amount::from).unwrap_or_default()
    }

    /// 4-digit identifier plate code
    pub fn plate_number(&self) -> String {
        plate_number(&self.id)
    }

    /// Download name of the generated certificate
    pub fn filename(&self) -> String {
        certificate_filename(self.permit_type_label(), &self.id)
    }
}
