// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tenant scope (contract) and cloud-account records read from upstream services.

use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ContractId, CspId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub contractor_name: String,
}

/// Cloud-account record; `contract_id` is the owning tenant scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CspInfo {
    pub id: CspId,
    pub contract_id: ContractId,
    pub name: String,
}
