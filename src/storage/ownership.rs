// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership scoping for stored records.
//!
//! Every patient record belongs to exactly one doctor, and every lookup is
//! scoped to the caller. [`OwnerScoped::scoped_to`] collapses "exists but
//! belongs to someone else" into "does not exist": both come out as `None`,
//! so no response reveals that another doctor's record id is live.

/// Trait for records that have an owner.
pub trait Owned {
    /// Id of the doctor who owns this record.
    fn owner_id(&self) -> &str;
}

/// Extension trait scoping a lookup result to one owner.
pub trait OwnerScoped<T> {
    /// Keep the record only if `owner_id` owns it.
    fn scoped_to(self, owner_id: &str) -> Option<T>;
}

impl<T: Owned> OwnerScoped<T> for Option<T> {
    fn scoped_to(self, owner_id: &str) -> Option<T> {
        self.filter(|record| record.owner_id() == owner_id)
    }
}
