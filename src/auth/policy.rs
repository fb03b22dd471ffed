//! Authorization policy for proposals.
//!
//! One table maps (role, proposal status) to permitted actions; every
//! handler and every serialized `editEnable`/`deleteEnable` flag goes
//! through it. Ownership is not decided here — handlers scope their
//! queries to the owning user id.

use super::session::Role;
use crate::models::proposal::types::ProposalStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Delete,
}

/// The policy table. Users may revise their own proposal only after a
/// rejection and may withdraw it at any time. Admins review (edit) any
/// proposal until it is approved, and never delete.
pub fn permits(role: Role, status: ProposalStatus, action: Action) -> bool {
    match (role, action) {
        (Role::User, Action::View) => true,
        (Role::User, Action::Edit) => status == ProposalStatus::Rejected,
        (Role::User, Action::Delete) => true,
        (Role::Admin, Action::View) => true,
        (Role::Admin, Action::Edit) => status != ProposalStatus::Approved,
        (Role::Admin, Action::Delete) => false,
    }
}

pub fn edit_enabled(role: Role, status: ProposalStatus) -> bool {
    permits(role, status, Action::Edit)
}

pub fn delete_enabled(role: Role, status: ProposalStatus) -> bool {
    permits(role, status, Action::Delete)
}
