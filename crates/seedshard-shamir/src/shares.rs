//! Share collection during recovery
//!
//! [`ShareSet`] accepts shares one at a time, rejecting any share that does
//! not fit the ones already collected, and reports per-group progress until
//! enough groups are complete to recover the master secret.

use crate::cipher::EncryptedMasterSecret;
use crate::shamir::{recover_secret, RawShare};
use crate::share::{CommonParameters, Share};
use crate::{GroupShortfall, ShamirError};
use seedshard_core::MasterSecret;
use serde::Serialize;
use std::collections::BTreeMap;

/// Progress of one group that has at least one share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupStatus {
    pub group_index: u8,
    pub member_threshold: u8,
    /// Distinct member shares collected
    pub members: u8,
}

impl GroupStatus {
    pub fn is_complete(&self) -> bool {
        self.members >= self.member_threshold
    }

    pub fn missing(&self) -> u8 {
        self.member_threshold.saturating_sub(self.members)
    }
}

/// Progress towards recovering the master secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryStatus {
    pub group_threshold: u8,
    pub group_count: u8,
    /// Groups with at least one share, by group index
    pub groups: Vec<GroupStatus>,
}

impl RecoveryStatus {
    pub fn groups_complete(&self) -> u8 {
        self.groups.iter().filter(|g| g.is_complete()).count() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.groups_complete() >= self.group_threshold
    }

    /// Started groups that still lack shares.
    pub fn shortfalls(&self) -> Vec<GroupShortfall> {
        self.groups
            .iter()
            .filter(|g| !g.is_complete())
            .map(|g| GroupShortfall {
                group_index: g.group_index,
                have: g.members,
                need: g.member_threshold,
            })
            .collect()
    }
}

struct MemberGroup {
    member_threshold: u8,
    members: BTreeMap<u8, Share>,
}

/// Shares of one split, collected for recovery.
#[derive(Default)]
pub struct ShareSet {
    params: Option<CommonParameters>,
    value_len: usize,
    groups: BTreeMap<u8, MemberGroup>,
}

impl ShareSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a share. Returns `Ok(false)` for an exact duplicate.
    ///
    /// A rejected share leaves the set unchanged.
    pub fn add(&mut self, share: Share) -> Result<bool, ShamirError> {
        share.validate()?;
        let params = share.common_parameters();
        if let Some(expected) = self.params {
            check_parameters(&expected, &params)?;
            if share.value.len() != self.value_len {
                return Err(ShamirError::MismatchedSet(format!(
                    "share value is {} bytes, expected {}",
                    share.value.len(),
                    self.value_len
                )));
            }
        }

        if let Some(group) = self.groups.get(&share.group_index) {
            if group.member_threshold != share.member_threshold {
                return Err(ShamirError::MismatchedSet(format!(
                    "group {} member threshold {} differs from {}",
                    share.group_index + 1,
                    share.member_threshold,
                    group.member_threshold
                )));
            }
            if let Some(existing) = group.members.get(&share.member_index) {
                if *existing == share {
                    log::debug!(
                        "ignoring duplicate share for group {} member {}",
                        share.group_index + 1,
                        share.member_index + 1
                    );
                    return Ok(false);
                }
                return Err(ShamirError::DuplicateShare {
                    group_index: share.group_index,
                    member_index: share.member_index,
                });
            }
        }

        self.params = Some(params);
        self.value_len = share.value.len();
        self.groups
            .entry(share.group_index)
            .or_insert_with(|| MemberGroup {
                member_threshold: share.member_threshold,
                members: BTreeMap::new(),
            })
            .members
            .insert(share.member_index, share);
        Ok(true)
    }

    /// Decode and add a normalized mnemonic.
    pub fn add_mnemonic(&mut self, mnemonic: &str) -> Result<bool, ShamirError> {
        self.add(Share::from_mnemonic(mnemonic)?)
    }

    /// Parameters shared by every collected share.
    pub fn parameters(&self) -> Option<CommonParameters> {
        self.params
    }

    /// Total distinct shares collected.
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn status(&self) -> Option<RecoveryStatus> {
        let params = self.params?;
        let groups = self
            .groups
            .iter()
            .map(|(&group_index, group)| GroupStatus {
                group_index,
                member_threshold: group.member_threshold,
                members: group.members.len() as u8,
            })
            .collect();
        Some(RecoveryStatus {
            group_threshold: params.group_threshold,
            group_count: params.group_count,
            groups,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.status().is_some_and(|s| s.is_complete())
    }

    /// Reconstruct the encrypted master secret from every complete group.
    pub fn recover_ems(&self) -> Result<EncryptedMasterSecret, ShamirError> {
        // Nothing collected yet: at least one complete group is needed
        let (Some(params), Some(status)) = (self.params, self.status()) else {
            return Err(ShamirError::InsufficientShares {
                group_threshold: 1,
                groups_complete: 0,
                shortfalls: Vec::new(),
            });
        };

        if !status.is_complete() {
            return Err(ShamirError::InsufficientShares {
                group_threshold: status.group_threshold,
                groups_complete: status.groups_complete(),
                shortfalls: status.shortfalls(),
            });
        }

        let mut group_secrets = Vec::new();
        for (&group_index, group) in &self.groups {
            if group.members.len() < group.member_threshold as usize {
                continue;
            }
            let points: Vec<RawShare> = group
                .members
                .values()
                .map(|s| RawShare::new(s.member_index, s.value.clone()))
                .collect();
            let secret = recover_secret(group.member_threshold, &points)?;
            group_secrets.push(RawShare::new(group_index, secret.to_vec()));
        }

        log::debug!(
            "recovering from {} of {} groups (threshold {})",
            group_secrets.len(),
            params.group_count,
            params.group_threshold
        );

        let ems = recover_secret(params.group_threshold, &group_secrets)?;
        EncryptedMasterSecret::from_parts(
            params.identifier,
            params.extendable,
            params.iteration_exponent,
            ems,
        )
    }

    /// Recover the master secret.
    pub fn recover(&self, passphrase: &str) -> Result<MasterSecret, ShamirError> {
        seedshard_core::validate_passphrase(passphrase)?;
        self.recover_ems()?.decrypt(passphrase)
    }
}

fn check_parameters(
    expected: &CommonParameters,
    found: &CommonParameters,
) -> Result<(), ShamirError> {
    let mismatch = |field: &str, a: u32, b: u32| {
        Err(ShamirError::MismatchedSet(format!(
            "{} {} differs from {}",
            field, b, a
        )))
    };

    if expected.identifier != found.identifier {
        return mismatch("identifier", expected.identifier.into(), found.identifier.into());
    }
    if expected.extendable != found.extendable {
        return mismatch("extendable flag", expected.extendable.into(), found.extendable.into());
    }
    if expected.iteration_exponent != found.iteration_exponent {
        return mismatch(
            "iteration exponent",
            expected.iteration_exponent.into(),
            found.iteration_exponent.into(),
        );
    }
    if expected.group_threshold != found.group_threshold {
        return mismatch(
            "group threshold",
            expected.group_threshold.into(),
            found.group_threshold.into(),
        );
    }
    if expected.group_count != found.group_count {
        return mismatch("group count", expected.group_count.into(), found.group_count.into());
    }
    Ok(())
}
