use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Which ERP ledger a sheet belongs to. Project books tie counterparties
/// to contracts, company books to affiliates; the two never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    Company,
    Project,
}

impl SystemType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "company" => Some(Self::Company),
            "project" => Some(Self::Project),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Project => "project",
        }
    }

    /// Header text for the counterparty column.
    pub fn counterparty_header(&self) -> &'static str {
        match self {
            Self::Company => "소속명",
            Self::Project => "계약명",
        }
    }

    /// Localized label used in generated template filenames.
    pub fn file_label(&self) -> &'static str {
        match self {
            Self::Company => "본사경리",
            Self::Project => "프로젝트경리",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOption {
    pub id: i64,
    pub label: String,
    /// Category headers are listed for grouping only and never match a row.
    #[serde(default)]
    pub is_category_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyOption {
    pub id: i64,
    pub label: String,
}

/// A persisted ledger line fetched from the API before an import.
/// Input only: referenced positionally or marked for deletion, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingEntry {
    pub id: Option<i64>,
    #[serde(default)]
    pub account_id: Option<i64>,
    pub account_name: String,
    #[serde(default)]
    pub trader: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub evidence_type_code: String,
    #[serde(default)]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub affiliate_id: Option<i64>,
    #[serde(default)]
    pub affiliate_name: Option<String>,
}

impl ExistingEntry {
    /// Counterparty display name under the given system, if any.
    pub fn counterparty_name(&self, system: SystemType) -> Option<&str> {
        match system {
            SystemType::Project => self.contract_name.as_deref(),
            SystemType::Company => self.affiliate_name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
}

/// One ledger line extracted from a non-blank sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub account_name: String,
    /// Resolved account id; absent when the name matched nothing.
    pub account: Option<i64>,
    pub trader: String,
    pub amount: BigDecimal,
    pub evidence_type_raw: String,
    pub evidence_type_code: String,
    pub counterparty_name: Option<String>,
    pub counterparty_ref: Option<i64>,
    /// Id of the persisted entry this row updates, when positionally matched.
    pub existing_ref: Option<i64>,
    /// 1-based sheet row, for user-facing messages.
    pub row_number: u32,
    pub operation: Operation,
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub update_count: usize,
    pub create_count: usize,
    pub delete_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub to_update: Vec<ParsedEntry>,
    pub to_create: Vec<ParsedEntry>,
    pub to_delete: Vec<ExistingEntry>,
    pub total_amount: BigDecimal,
    pub is_valid: bool,
    pub summary: Summary,
}
