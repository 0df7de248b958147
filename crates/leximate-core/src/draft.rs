//! Draft form state for the document-generation wizard.
//!
//! A [`DraftForm`] holds the union of every field the three document
//! variants use. Fields that don't apply to the selected [`DocumentType`]
//! are kept and sent along with the rest; nothing is validated away.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The document variants the generator knows how to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Nda,
    Contract,
    Service,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::Nda, Self::Contract, Self::Service];

    /// Wire value, also used as the `type` of stored records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nda => "nda",
            Self::Contract => "contract",
            Self::Service => "service",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nda => "Non-Disclosure Agreement (NDA)",
            Self::Contract => "Freelancer Contract",
            Self::Service => "Service Agreement",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Nda => "Protect confidential information",
            Self::Contract => "Define work terms and payment",
            Self::Service => "Outline service delivery terms",
        }
    }

    /// Fields shown on the "Basic Information" step.
    pub fn basic_fields(self) -> &'static [DraftField] {
        use DraftField::*;
        match self {
            Self::Nda => &[
                DisclosingParty,
                ReceivingParty,
                EffectiveDate,
                ConfidentialityLevel,
            ],
            Self::Contract => &[ClientName, FreelancerName, ProjectTitle, StartDate, EndDate],
            Self::Service => &[CompanyName, CounterpartyName, EffectiveDate, GoverningLaw],
        }
    }

    /// Fields shown on the "Terms & Conditions" step.
    pub fn term_fields(self) -> &'static [DraftField] {
        use DraftField::*;
        match self {
            Self::Nda => &[ConfidentialityLevel, Duration, Purpose, AdditionalTerms],
            Self::Contract => &[
                ProjectTitle,
                PaymentAmount,
                PaymentMethod,
                StartDate,
                EndDate,
                AdditionalTerms,
            ],
            Self::Service => &[
                Purpose,
                Duration,
                GoverningLaw,
                ConfidentialityLevel,
                AdditionalTerms,
            ],
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type: {0}")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nda" => Ok(Self::Nda),
            "contract" => Ok(Self::Contract),
            "service" => Ok(Self::Service),
            other => Err(UnknownDocumentType(other.to_string())),
        }
    }
}

/// Addresses one field of a [`DraftForm`] by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    // NDA
    DisclosingParty,
    ReceivingParty,
    // Freelancer contract
    ClientName,
    FreelancerName,
    ProjectTitle,
    StartDate,
    EndDate,
    PaymentAmount,
    PaymentMethod,
    // Service agreement
    CompanyName,
    CounterpartyName,
    // Common
    EffectiveDate,
    Duration,
    GoverningLaw,
    ConfidentialityLevel,
    Purpose,
    AdditionalTerms,
}

impl DraftField {
    pub const ALL: [DraftField; 17] = [
        Self::DisclosingParty,
        Self::ReceivingParty,
        Self::ClientName,
        Self::FreelancerName,
        Self::ProjectTitle,
        Self::StartDate,
        Self::EndDate,
        Self::PaymentAmount,
        Self::PaymentMethod,
        Self::CompanyName,
        Self::CounterpartyName,
        Self::EffectiveDate,
        Self::Duration,
        Self::GoverningLaw,
        Self::ConfidentialityLevel,
        Self::Purpose,
        Self::AdditionalTerms,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::DisclosingParty => "disclosingParty",
            Self::ReceivingParty => "receivingParty",
            Self::ClientName => "clientName",
            Self::FreelancerName => "freelancerName",
            Self::ProjectTitle => "projectTitle",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::PaymentAmount => "paymentAmount",
            Self::PaymentMethod => "paymentMethod",
            Self::CompanyName => "companyName",
            Self::CounterpartyName => "counterpartyName",
            Self::EffectiveDate => "effectiveDate",
            Self::Duration => "duration",
            Self::GoverningLaw => "governingLaw",
            Self::ConfidentialityLevel => "confidentialityLevel",
            Self::Purpose => "purpose",
            Self::AdditionalTerms => "additionalTerms",
        }
    }

    /// Look a field up by wire name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// In-progress field values for one wizard session.
///
/// Serializes flat with camelCase keys so it can be spliced directly into
/// the `/generate-document` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftForm {
    pub disclosing_party: String,
    pub receiving_party: String,

    pub client_name: String,
    pub freelancer_name: String,
    pub project_title: String,
    pub start_date: String,
    pub end_date: String,
    pub payment_amount: String,
    pub payment_method: String,

    pub company_name: String,
    pub counterparty_name: String,

    pub effective_date: String,
    pub duration: String,
    pub governing_law: String,
    pub confidentiality_level: String,
    pub purpose: String,
    pub additional_terms: String,
}

impl DraftForm {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
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
        }
    }

    fn slot(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::DisclosingParty => &mut self.disclosing_party,
            DraftField::ReceivingParty => &mut self.receiving_party,
            DraftField::ClientName => &mut self.client_name,
            DraftField::FreelancerName => &mut self.freelancer_name,
            DraftField::ProjectTitle => &mut self.project_title,
            DraftField::StartDate => &mut self.start_date,
            DraftField::EndDate => &mut self.end_date,
            DraftField::PaymentAmount => &mut self.payment_amount,
            DraftField::PaymentMethod => &mut self.payment_method,
            DraftField::CompanyName => &mut self.company_name,
            DraftField::CounterpartyName => &mut self.counterparty_name,
            DraftField::EffectiveDate => &mut self.effective_date,
            DraftField::Duration => &mut self.duration,
            DraftField::GoverningLaw => &mut self.governing_law,
            DraftField::ConfidentialityLevel => &mut self.confidentiality_level,
            DraftField::Purpose => &mut self.purpose,
            DraftField::AdditionalTerms => &mut self.additional_terms,
        }
    }

    /// Overwrite one field. The value is stored exactly as typed.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    /// Copy a value in only when one is present; `None` keeps the current value.
    pub fn merge_field(&mut self, field: DraftField, value: Option<&str>) {
        if let Some(v) = value {
            self.set(field, v);
        }
    }

    /// Non-empty fields in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (DraftField, &str)> {
        DraftField::ALL
            .into_iter()
            .map(|f| (f, self.get(f)))
            .filter(|(_, v)| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_unique_and_parse_back() {
        for field in DraftField::ALL {
            assert_eq!(DraftField::parse(field.wire_name()), Some(field));
        }
        let mut names: Vec<_> = DraftField::ALL.iter().map(|f| f.wire_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), DraftField::ALL.len());
    }

    #[test]
    fn unknown_field_name_is_none() {
        assert_eq!(DraftField::parse("favouriteColour"), None);
    }

    #[test]
    fn form_serializes_every_field_in_camel_case() {
        let mut form = DraftForm::default();
        form.set(DraftField::DisclosingParty, "Acme");
        let json = serde_json::to_value(&form).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), DraftField::ALL.len());
        assert_eq!(obj["disclosingParty"], "Acme");
        assert_eq!(obj["additionalTerms"], "");
    }

    #[test]
    fn set_preserves_whitespace() {
        let mut form = DraftForm::default();
        form.set(DraftField::AdditionalTerms, "  line one\nline two  ");
        assert_eq!(form.get(DraftField::AdditionalTerms), "  line one\nline two  ");
    }

    #[test]
    fn merge_field_keeps_current_value_on_none() {
        let mut form = DraftForm::default();
        form.set(DraftField::Purpose, "evaluation");
        form.merge_field(DraftField::Purpose, None);
        assert_eq!(form.purpose, "evaluation");
        form.merge_field(DraftField::Purpose, Some(""));
        assert_eq!(form.purpose, "");
    }

    #[test]
    fn document_type_parses_wire_values() {
        assert_eq!("nda".parse::<DocumentType>().unwrap(), DocumentType::Nda);
        assert_eq!(" service ".parse::<DocumentType>().unwrap(), DocumentType::Service);
        assert!("lease".parse::<DocumentType>().is_err());
    }

    #[test]
    fn every_type_has_basic_and_term_fields() {
        for t in DocumentType::ALL {
            assert!(!t.basic_fields().is_empty());
            assert!(!t.term_fields().is_empty());
        }
        assert!(DocumentType::Nda.basic_fields().contains(&DraftField::DisclosingParty));
        assert!(DocumentType::Contract.term_fields().contains(&DraftField::PaymentAmount));
    }

    #[test]
    fn filled_skips_empty_fields() {
        let mut form = DraftForm::default();
        form.set(DraftField::ClientName, "Globex");
        form.set(DraftField::FreelancerName, "Sam");
        let filled: Vec<_> = form.filled().collect();
        assert_eq!(
            filled,
            vec![
                (DraftField::ClientName, "Globex"),
                (DraftField::FreelancerName, "Sam")
            ]
        );
    }
}
