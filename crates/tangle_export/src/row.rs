//! Denormalized export rows.

use serde::{Deserialize, Serialize};
use tangle_codec::Hash;
use tangle_core::{MilestoneIndex, TransactionMetadata};

/// One exported transaction: its hash, links, flags, confirmation state and
/// payload trytes.
///
/// Field names serialize in `PascalCase` (`TxHash`, `IsSolid`, ...).
/// `ConfirmationIndex` is present only for confirmed transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    /// Transaction hash (the index key).
    pub tx_hash: String,
    /// Trunk reference.
    pub trunk_hash: String,
    /// Branch reference.
    pub branch_hash: String,
    /// Bundle hash.
    pub bundle_hash: String,
    /// Confirming milestone, only when confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_index: Option<MilestoneIndex>,
    /// Solid flag.
    pub is_solid: bool,
    /// Confirmed flag.
    pub is_confirmed: bool,
    /// Conflicting flag.
    pub is_conflicting: bool,
    /// Bundle head flag.
    pub is_head: bool,
    /// Bundle tail flag.
    pub is_tail: bool,
    /// Value flag.
    pub is_value: bool,
    /// Decoded payload.
    pub trytes: String,
}

/// Merges a transaction's metadata and decoded payload into a row.
///
/// `hash` is the index key that produced the item; it becomes `TxHash`.
#[must_use]
pub fn build_row(hash: Hash, meta: &TransactionMetadata, trytes: String) -> ExportRow {
    let confirmation = meta.confirmation();

    ExportRow {
        tx_hash: hash.trytes(),
        trunk_hash: meta.trunk().trytes(),
        branch_hash: meta.branch().trytes(),
        bundle_hash: meta.bundle().trytes(),
        confirmation_index: confirmation,
        is_solid: meta.is_solid(),
        is_confirmed: confirmation.is_some(),
        is_conflicting: meta.is_conflicting(),
        is_head: meta.is_head(),
        is_tail: meta.is_tail(),
        is_value: meta.is_value(),
        trytes,
    }
}
