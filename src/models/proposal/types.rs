use serde::{Deserialize, Serialize};

use crate::auth::policy;
use crate::auth::session::Role;

/// Proposal lifecycle. PENDING on creation; APPROVED is terminal for the
/// happy path, REJECTED is revisable by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "PENDING",
            ProposalStatus::Approved => "APPROVED",
            ProposalStatus::Rejected => "REJECTED",
        }
    }

    /// Forgiving parse for values read back from the database.
    pub fn parse(value: &str) -> ProposalStatus {
        match value {
            "APPROVED" => ProposalStatus::Approved,
            "REJECTED" => ProposalStatus::Rejected,
            _ => ProposalStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    #[serde(rename = "postOffice")]
    pub post_office: String,
    #[serde(rename = "policeStation")]
    pub police_station: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankDetails {
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    #[serde(rename = "bankName")]
    pub bank_name: String,
    pub branch: String,
    pub ifsc: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeDetails {
    pub amount: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandDetails {
    #[serde(rename = "ownerName")]
    pub owner_name: String,
    #[serde(rename = "ownerNumber")]
    pub owner_number: String,
    #[serde(rename = "ownerEmail")]
    pub owner_email: String,
    pub location: String,
    pub area: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub usage: String,
    #[serde(rename = "ownershipStatus")]
    pub ownership_status: String,
    pub description: String,
}

/// Reference into the external object store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRef {
    pub public_id: String,
    pub secure_url: String,
}

/// The three mandatory supporting documents, in upload order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documents {
    pub photo: DocumentRef,
    #[serde(rename = "addressProof")]
    pub address_proof: DocumentRef,
    #[serde(rename = "incomeProof")]
    pub income_proof: DocumentRef,
}

/// A proposal as the API returns it. `edit_enable`/`delete_enable` are not
/// columns; `for_role` computes them from the policy table before the
/// proposal is serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub objective: String,
    pub duration: String,
    pub budget: String,
    pub address: Address,
    pub bank_details: BankDetails,
    pub income_details: IncomeDetails,
    pub land_details: LandDetails,
    pub documents: Documents,
    pub status: ProposalStatus,
    pub highlighted_fields: Vec<String>,
    pub edit_enable: bool,
    pub delete_enable: bool,
    pub remarks: String,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Proposal {
    /// Attach the request-scoped permission flags for the viewing role.
    pub fn for_role(mut self, role: Role) -> Proposal {
        self.edit_enable = policy::edit_enabled(role, self.status);
        self.delete_enable = policy::delete_enabled(role, self.status);
        self
    }
}

/// The flat field set submitted by the clients, both on creation (as
/// multipart text parts) and on edit-resubmission (as JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalInput {
    pub title: String,
    pub description: String,
    pub objective: String,
    pub duration: String,
    pub budget: String,
    pub state: String,
    pub district: String,
    pub pincode: String,
    pub post_office: String,
    pub police_station: String,
    pub address: String,
    pub bank_name: String,
    pub ifsc: String,
    pub account_number: String,
    pub bank_branch: String,
    pub income_source: String,
    pub income_amount: String,
    pub owner_name: String,
    pub owner_number: String,
    pub owner_email: String,
    pub land_location: String,
    pub land_area: String,
    pub land_type: String,
    pub usage: String,
    pub ownership_status: String,
    pub land_description: String,
    #[serde(default)]
    pub remarks: String,
}

impl ProposalInput {
    pub fn address(&self) -> Address {
        Address {
            address: self.address.clone(),
            state: self.state.clone(),
            district: self.district.clone(),
            pincode: self.pincode.clone(),
            post_office: self.post_office.clone(),
            police_station: self.police_station.clone(),
        }
    }

    pub fn bank_details(&self) -> BankDetails {
        BankDetails {
            account_number: self.account_number.clone(),
            bank_name: self.bank_name.clone(),
            branch: self.bank_branch.clone(),
            ifsc: self.ifsc.clone(),
        }
    }

    pub fn income_details(&self) -> IncomeDetails {
        IncomeDetails {
            amount: self.income_amount.clone(),
            source: self.income_source.clone(),
        }
    }

    pub fn land_details(&self) -> LandDetails {
        LandDetails {
            owner_name: self.owner_name.clone(),
            owner_number: self.owner_number.clone(),
            owner_email: self.owner_email.clone(),
            location: self.land_location.clone(),
            area: self.land_area.clone(),
            kind: self.land_type.clone(),
            usage: self.usage.clone(),
            ownership_status: self.ownership_status.clone(),
            description: self.land_description.clone(),
        }
    }
}

/// Admin status-change payload for PATCH /proposal/{id}.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ProposalStatus,
    #[serde(default)]
    pub rejected_fields: Vec<String>,
    #[serde(default)]
    pub remarks: String,
}
