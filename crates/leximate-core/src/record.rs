//! Stored document records and their normalized list-view shape.
//!
//! The backend returns one flat record shape for every document type, with
//! most fields absent or null depending on which variant was drafted.
//! [`DocumentRecord::from_raw`] turns that into the uniform shape the list,
//! dashboard and preview views display.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::draft::{DocumentType, DraftField, DraftForm};

/// A document record exactly as the backend stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,

    pub disclosing_party: Option<String>,
    pub receiving_party: Option<String>,
    pub client_name: Option<String>,
    pub freelancer_name: Option<String>,
    pub project_title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub payment_amount: Option<String>,
    pub payment_method: Option<String>,
    pub company_name: Option<String>,
    pub counterparty_name: Option<String>,
    pub effective_date: Option<String>,
    pub duration: Option<String>,
    pub governing_law: Option<String>,
    pub confidentiality_level: Option<String>,
    pub purpose: Option<String>,
    pub additional_terms: Option<String>,

    pub generated_text: Option<String>,
    pub status: Option<String>,
    /// ISO 8601 timestamp string; the backend may omit the offset.
    pub created_at: Option<String>,
    /// ISO 8601 timestamp string; the backend may omit the offset.
    pub updated_at: Option<String>,
}

impl RawDocument {
    pub fn field(&self, field: DraftField) -> Option<&str> {
        let v = match field {
            DraftField::DisclosingParty => &self.disclosing_party,
            DraftField::ReceivingParty => &self.receiving_party,
            DraftField::ClientName => &self.client_name,
            DraftField::FreelancerName => &self.freelancer_name,
            DraftField::ProjectTitle => &self.project_title,
            DraftField::StartDate => &self.start_date,
            DraftField::EndDate => &self.end_date,
            DraftField::PaymentAmount => &self.payment_amount,
            DraftField::PaymentMethod => &self.payment_method,
            DraftField::CompanyName => &self.company_name,
            DraftField::CounterpartyName => &self.counterparty_name,
            DraftField::EffectiveDate => &self.effective_date,
            DraftField::Duration => &self.duration,
            DraftField::GoverningLaw => &self.governing_law,
            DraftField::ConfidentialityLevel => &self.confidentiality_level,
            DraftField::Purpose => &self.purpose,
            DraftField::AdditionalTerms => &self.additional_terms,
        };
        v.as_deref()
    }

    /// The recognized document type, if the stored `type` names one.
    pub fn document_type(&self) -> Option<DocumentType> {
        self.doc_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Generated text, treating an empty string the same as absent.
    pub fn text(&self) -> Option<&str> {
        self.generated_text.as_deref().filter(|t| !t.is_empty())
    }

    /// Copy every present field into `form`, leaving the rest untouched.
    pub fn merge_into(&self, form: &mut DraftForm) {
        for field in DraftField::ALL {
            form.merge_field(field, self.field(field));
        }
    }
}

/// Party-name fields for each document variant.
///
/// Keyed on the record's `type`; anything unrecognized lands in `Other`,
/// which has no type-specific pair and goes straight to the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentParties<'a> {
    Nda {
        disclosing: Option<&'a str>,
        receiving: Option<&'a str>,
    },
    Contract {
        client: Option<&'a str>,
        freelancer: Option<&'a str>,
    },
    Service {
        company: Option<&'a str>,
        counterparty: Option<&'a str>,
    },
    Other,
}

/// Order used when the type-specific pair yields no names.
const FALLBACK_PARTY_FIELDS: [DraftField; 6] = [
    DraftField::CompanyName,
    DraftField::CounterpartyName,
    DraftField::DisclosingParty,
    DraftField::ReceivingParty,
    DraftField::ClientName,
    DraftField::FreelancerName,
];

impl<'a> DocumentParties<'a> {
    pub fn of(raw: &'a RawDocument) -> Self {
        match raw.document_type() {
            Some(DocumentType::Nda) => Self::Nda {
                disclosing: raw.disclosing_party.as_deref(),
                receiving: raw.receiving_party.as_deref(),
            },
            Some(DocumentType::Contract) => Self::Contract {
                client: raw.client_name.as_deref(),
                freelancer: raw.freelancer_name.as_deref(),
            },
            Some(DocumentType::Service) => Self::Service {
                company: raw.company_name.as_deref(),
                counterparty: raw.counterparty_name.as_deref(),
            },
            None => Self::Other,
        }
    }

    /// The type-specific pair, skipping empty names.
    pub fn primary(&self) -> Vec<String> {
        let pair = match *self {
            Self::Nda {
                disclosing,
                receiving,
            } => [disclosing, receiving],
            Self::Contract { client, freelancer } => [client, freelancer],
            Self::Service {
                company,
                counterparty,
            } => [company, counterparty],
            Self::Other => [None, None],
        };
        pair.into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Party names for display: type-specific pair first, then any non-blank
/// name-like field in [`FALLBACK_PARTY_FIELDS`] order.
pub fn derive_parties(raw: &RawDocument) -> Vec<String> {
    let parties = DocumentParties::of(raw).primary();
    if !parties.is_empty() {
        return parties;
    }
    FALLBACK_PARTY_FIELDS
        .iter()
        .filter_map(|&f| raw.field(f))
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Lifecycle status of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Draft,
    Pending,
    Completed,
    /// Any value the backend sends that we don't model; kept verbatim.
    Other(String),
}

impl DocumentStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a backend timestamp: ISO 8601 with or without an offset, or the
/// HTTP-date form (`Wed, 14 Oct 2026 10:00:00 GMT`) some endpoints send.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    tracing::debug!(value = s, "unparseable timestamp");
    None
}

fn display_date(ts: Option<&str>) -> Option<String> {
    ts.and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Synthetic size label: half a kilobyte per character of generated text.
pub fn size_label(text: Option<&str>) -> String {
    let chars = text.map(|t| t.chars().count()).unwrap_or(0);
    format!("{} KB", chars / 2)
}

/// A document in the uniform shape the list views display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    pub doc_type: String,
    pub status: DocumentStatus,
    pub created_date: String,
    pub last_modified: String,
    pub size: String,
    pub parties: Vec<String>,
}

impl DocumentRecord {
    pub fn from_raw(raw: &RawDocument) -> Self {
        let type_name = raw.doc_type.as_deref().filter(|t| !t.is_empty());
        let name = match raw.company_name.as_deref().filter(|c| !c.is_empty()) {
            Some(company) => format!("{} - {}", type_name.unwrap_or("Document"), company),
            None => type_name.unwrap_or("Document").to_string(),
        };
        let status = match raw.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => DocumentStatus::parse(s),
            None if raw.text().is_some() => DocumentStatus::Completed,
            None => DocumentStatus::Pending,
        };
        let created_date = display_date(raw.created_at.as_deref()).unwrap_or_default();
        let last_modified = display_date(raw.updated_at.as_deref())
            .or_else(|| display_date(raw.created_at.as_deref()))
            .unwrap_or_default();

        Self {
            id: raw.id.clone(),
            name,
            doc_type: type_name.unwrap_or("Unknown").to_string(),
            status,
            created_date,
            last_modified,
            size: size_label(raw.generated_text.as_deref()),
            parties: derive_parties(raw),
        }
    }
}

/// Normalize a backend collection, keeping backend order.
pub fn normalize_all(raws: &[RawDocument]) -> Vec<DocumentRecord> {
    raws.iter().map(DocumentRecord::from_raw).collect()
}

/// Client-side list filter. `None` means "all" for type and status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub search: String,
    pub doc_type: Option<String>,
    pub status: Option<String>,
}

impl DocumentFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.doc_type.is_none() && self.status.is_none()
    }

    pub fn matches(&self, doc: &DocumentRecord) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = doc.name.to_lowercase().contains(&needle)
            || doc
                .parties
                .iter()
                .any(|p| p.to_lowercase().contains(&needle));
        let matches_type = self.doc_type.as_deref().is_none_or(|t| doc.doc_type == t);
        let matches_status = self
            .status
            .as_deref()
            .is_none_or(|s| doc.status.as_str() == s);
        matches_search && matches_type && matches_status
    }

    /// Pure; never touches the backend.
    pub fn apply<'a>(&self, docs: &'a [DocumentRecord]) -> Vec<&'a DocumentRecord> {
        docs.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Editable subset of a stored record, as accepted by `PUT /documents/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditForm {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub company_name: String,
    pub counterparty_name: String,
    pub effective_date: String,
    pub duration: String,
    pub governing_law: String,
    pub confidentiality_level: String,
    pub purpose: String,
    pub additional_terms: String,
    pub status: String,
}

impl EditForm {
    pub const FIELDS: [&'static str; 10] = [
        "type",
        "companyName",
        "counterpartyName",
        "effectiveDate",
        "duration",
        "governingLaw",
        "confidentialityLevel",
        "purpose",
        "additionalTerms",
        "status",
    ];

    pub fn from_raw(raw: &RawDocument) -> Self {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            doc_type: s(&raw.doc_type),
            company_name: s(&raw.company_name),
            counterparty_name: s(&raw.counterparty_name),
            effective_date: s(&raw.effective_date),
            duration: s(&raw.duration),
            governing_law: s(&raw.governing_law),
            confidentiality_level: s(&raw.confidentiality_level),
            purpose: s(&raw.purpose),
            additional_terms: s(&raw.additional_terms),
            status: s(&raw.status),
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "type" => &mut self.doc_type,
            "companyName" => &mut self.company_name,
            "counterpartyName" => &mut self.counterparty_name,
            "effectiveDate" => &mut self.effective_date,
            "duration" => &mut self.duration,
            "governingLaw" => &mut self.governing_law,
            "confidentialityLevel" => &mut self.confidentiality_level,
            "purpose" => &mut self.purpose,
            "additionalTerms" => &mut self.additional_terms,
            "status" => &mut self.status,
            _ => return None,
        })
    }

    /// Set a field by wire name. Returns `false` for names the endpoint doesn't accept.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.slot(key.trim()) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Request body: only the non-empty fields are sent.
    pub fn to_payload(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        if let Ok(serde_json::Value::Object(all)) = serde_json::to_value(self) {
            for (k, v) in all {
                if v.as_str().is_some_and(|s| !s.is_empty()) {
                    map.insert(k, v);
                }
            }
        }
        map
    }

    /// Copy the non-empty fields onto the stored shape, as the backend does
    /// on a successful update.
    pub fn apply_to_raw(&self, raw: &mut RawDocument) {
        let pairs = [
            (&self.doc_type, &mut raw.doc_type),
            (&self.company_name, &mut raw.company_name),
            (&self.counterparty_name, &mut raw.counterparty_name),
            (&self.effective_date, &mut raw.effective_date),
            (&self.duration, &mut raw.duration),
            (&self.governing_law, &mut raw.governing_law),
            (&self.confidentiality_level, &mut raw.confidentiality_level),
            (&self.purpose, &mut raw.purpose),
            (&self.additional_terms, &mut raw.additional_terms),
            (&self.status, &mut raw.status),
        ];
        for (value, slot) in pairs {
            if !value.is_empty() {
                *slot = Some(value.clone());
            }
        }
    }

    /// Patch a listed record after a successful update. Unset fields fall back
    /// to what the record already shows.
    pub fn apply_to(&self, doc: &mut DocumentRecord, today: NaiveDate) {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let doc_type = non_empty(&self.doc_type);
        let company = non_empty(&self.company_name).or_else(|| doc.parties.first().cloned());
        let counterparty =
            non_empty(&self.counterparty_name).or_else(|| doc.parties.get(1).cloned());

        doc.name = format!(
            "{} - {}",
            doc_type.as_deref().unwrap_or(&doc.doc_type),
            company.as_deref().unwrap_or("Document")
        );
        if let Some(t) = doc_type {
            doc.doc_type = t;
        }
        if let Some(s) = non_empty(&self.status) {
            doc.status = DocumentStatus::parse(&s);
        }
        doc.parties = [company, counterparty]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        doc.last_modified = today.format("%Y-%m-%d").to_string();
    }
}
