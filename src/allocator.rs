//! Hierarchical allocator (C4): walks accounts → providers → regions → AZs →
//! roles, carving a contiguous run of CIDRs at each level and emitting one
//! [`AllocationRecord`] per (AZ, role) pair.
//!
//! The walk order below is part of the contract: accounts in input order,
//! providers in the account's declared cloud-map order, regions in input
//! order, AZs in catalog-name order, roles in `subnetTypes` key order. Two
//! `generate` calls on the same input must produce identical output.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Provider};
use crate::cidr::{required_prefix_bits, Cidr};
use crate::config::InputRecord;
use crate::error::{PlannerError, Result};
use crate::ledger::Ledger;

/// One emitted subnet allocation, the terminal unit of the walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationRecord {
    pub account_name: String,
    pub vpc_name: String,
    pub cloud_provider: String,
    pub region_name: String,
    pub availability_zone: String,
    pub subnet_role: String,
    pub region_cidr: String,
    pub vpc_cidr: String,
    pub az_cidr: String,
    pub subnet_cidr: String,
    pub usable_ips: u64,
}

/// Run the full allocation walk described in §4.4, returning every emitted
/// record in deterministic order, or the first error encountered.
pub fn generate(input: &InputRecord) -> Result<Vec<AllocationRecord>> {
    let base = Cidr::parse(&input.base_cidr)
        .map_err(|e| e.with_context("field", "baseCidr"))?;

    let mut records = Vec::new();
    if input.accounts.is_empty() {
        return Ok(records);
    }

    let account_prefix = resolve_level_prefix(
        input.prefix_lengths.account,
        base.prefix(),
        input.accounts.len(),
    )
    .map_err(|e| e.with_context("level", "account"))?;

    let mut ledger = Ledger::new();

    for (account_idx, account) in input.accounts.iter().enumerate() {
        if account.name.trim().is_empty() {
            return Err(PlannerError::configuration_error(
                "account name must not be empty",
            )
            .with_context("accountIndex", account_idx));
        }

        let account_cidr = nth_child(&base, account_prefix, account_idx, "account")
            .map_err(|e| e.with_context("account", &account.name))?;
        let vpc_name = format!("{}-vpc", account.name);

        // Providers within an account that don't override baseCidr must
        // still land on distinct address space, or the first region of each
        // such provider would carve the same CIDR from account_cidr and
        // collide in the ledger. Carve a per-provider slice of account_cidr
        // up front, indexed by the provider's position in `clouds`, mirroring
        // the account-level carve above; an explicit override bypasses it.
        let provider_count = account.clouds.len();
        let provider_prefix = if provider_count > 0 {
            Some(
                resolve_level_prefix(None, account_cidr.prefix(), provider_count).map_err(
                    |e| {
                        e.with_context("account", &account.name)
                            .with_context("level", "provider")
                    },
                )?,
            )
        } else {
            None
        };

        for (provider_idx, (provider_id, cloud_config)) in account.clouds.iter().enumerate() {
            if cloud_config.regions.is_empty() {
                continue;
            }

            let provider_base = match &cloud_config.base_cidr {
                Some(text) => Cidr::parse(text)
                    .map_err(|e| e.with_context("account", &account.name))
                    .map_err(|e| e.with_context("provider", provider_id))?,
                None => {
                    let prefix = provider_prefix.expect("provider_count > 0 since this entry exists");
                    nth_child(&account_cidr, prefix, provider_idx, "provider").map_err(|e| {
                        e.with_context("account", &account.name)
                            .with_context("provider", provider_id)
                    })?
                }
            };

            // The emitted `vpcCidr` follows the glossary's effective-base
            // definition literally (override if present, else the *global*
            // base_cidr) - it is a reporting label, not the address space
            // actually carved from (that's `provider_base`, above, an
            // internal account/provider slice used purely to keep distinct
            // providers/accounts from colliding).
            let vpc_cidr = if cloud_config.base_cidr.is_some() {
                provider_base
            } else {
                base
            };

            let provider = resolve_provider(provider_id, &cloud_config.regions);

            let region_prefix = resolve_level_prefix(
                input.prefix_lengths.region,
                provider_base.prefix(),
                cloud_config.regions.len(),
            )
            .map_err(|e| {
                e.with_context("account", &account.name)
                    .with_context("provider", provider_id)
                    .with_context("level", "region")
            })?;

            let az_counts: Vec<u32> = cloud_config
                .regions
                .iter()
                .map(|region| catalog::default_az_count(provider, region))
                .collect();
            let az_count_max = az_counts.iter().copied().max().unwrap_or(1) as usize;

            let az_prefix = resolve_level_prefix(input.prefix_lengths.az, region_prefix, az_count_max)
                .map_err(|e| {
                    e.with_context("account", &account.name)
                        .with_context("provider", provider_id)
                        .with_context("level", "az")
                })?;

            for (region_idx, region_name) in cloud_config.regions.iter().enumerate() {
                let err_ctx = |e: PlannerError| {
                    e.with_context("account", &account.name)
                        .with_context("provider", provider_id)
                        .with_context("region", region_name)
                };

                let region_cidr = nth_child(&provider_base, region_prefix, region_idx, "region")
                    .map_err(err_ctx)?;
                debug_assert!(provider_base.contains(&region_cidr));

                let az_count = az_counts[region_idx];
                let az_names = catalog::az_names(provider, region_name, az_count);
                let az_cidrs = take_children(&region_cidr, az_prefix, az_names.len(), "az")
                    .map_err(err_ctx)?;

                for (az_name, az_cidr) in az_names.into_iter().zip(az_cidrs.into_iter()) {
                    let mut remaining = vec![az_cidr];

                    for (role, target_prefix) in input.subnet_types.iter() {
                        let eff_prefix = (*target_prefix).max(az_prefix);
                        let chosen = split_head(&mut remaining, eff_prefix).map_err(|e| {
                            e.with_context("account", &account.name)
                                .with_context("provider", provider_id)
                                .with_context("region", region_name)
                                .with_context("az", &az_name)
                                .with_context("role", role)
                        })?;

                        ledger.try_insert(chosen).map_err(|e| {
                            e.with_context("account", &account.name)
                                .with_context("region", region_name)
                                .with_context("az", &az_name)
                                .with_context("role", role)
                        })?;

                        records.push(AllocationRecord {
                            account_name: account.name.clone(),
                            vpc_name: vpc_name.clone(),
                            cloud_provider: provider_label(provider_id, provider),
                            region_name: region_name.clone(),
                            availability_zone: az_name.clone(),
                            subnet_role: role.to_string(),
                            region_cidr: region_cidr.to_string(),
                            vpc_cidr: vpc_cidr.to_string(),
                            az_cidr: az_cidr.to_string(),
                            subnet_cidr: chosen.to_string(),
                            usable_ips: chosen.usable_ips(),
                        });
                    }
                }
            }
        }
    }

    Ok(records)
}

/// `explicit` if set, else `parent_prefix + required_prefix_bits(count)`,
/// failing with `InsufficientSpace` if that would exceed 32. Per the
/// resolved open question in DESIGN.md, an out-of-range *derived* prefix is
/// always a planning failure, never silently clamped to 32.
fn resolve_level_prefix(explicit: Option<u8>, parent_prefix: u8, count: usize) -> Result<u8> {
    if let Some(p) = explicit {
        return Ok(p);
    }
    let bits = required_prefix_bits(count.max(1) as i64)?;
    let total = parent_prefix as u32 + bits;
    if total > 32 {
        return Err(PlannerError::insufficient_space(format!(
            "deriving a prefix for {count} children of a /{parent_prefix} block would need /{total}"
        ))
        .with_context("parentPrefix", parent_prefix)
        .with_context("requiredCount", count));
    }
    Ok(total as u8)
}

/// The `index`-th child of `parent` at `prefix`, treating any subdivision
/// failure (prefix smaller than the parent's, or index beyond the child
/// count) as `InsufficientSpace` — per §4.4's failure semantics, within the
/// walk this always means "ran out of room", not a malformed literal.
fn nth_child(parent: &Cidr, prefix: u8, index: usize, level: &str) -> Result<Cidr> {
    let children = subdivide_or_insufficient_space(parent, prefix, level)?;
    children.get(index).copied().ok_or_else(|| {
        PlannerError::insufficient_space(format!(
            "{parent} has no /{prefix} child at index {index} for the {level} level"
        ))
        .with_context("cidr", parent)
        .with_context("level", level)
    })
}

/// The first `count` children of `parent` at `prefix`.
fn take_children(parent: &Cidr, prefix: u8, count: usize, level: &str) -> Result<Vec<Cidr>> {
    let children = subdivide_or_insufficient_space(parent, prefix, level)?;
    if children.len() < count {
        return Err(PlannerError::insufficient_space(format!(
            "{parent} has only {} /{prefix} children, need {count} for the {level} level",
            children.len()
        ))
        .with_context("cidr", parent)
        .with_context("level", level));
    }
    Ok(children.into_iter().take(count).collect())
}

fn subdivide_or_insufficient_space(parent: &Cidr, prefix: u8, level: &str) -> Result<Vec<Cidr>> {
    parent.subdivide(prefix).map_err(|_| {
        PlannerError::insufficient_space(format!(
            "cannot split {parent} into /{prefix} blocks for the {level} level"
        ))
        .with_context("cidr", parent)
        .with_context("level", level)
    })
}

/// Take the head of `remaining`, growing it to `eff_prefix` if needed and
/// pushing the leftover siblings back onto the front of the list.
fn split_head(remaining: &mut Vec<Cidr>, eff_prefix: u8) -> Result<Cidr> {
    if remaining.is_empty() {
        return Err(PlannerError::insufficient_space(
            "no free space left in this availability zone",
        ));
    }
    let head = remaining.remove(0);

    if head.prefix() == eff_prefix {
        return Ok(head);
    }
    if head.prefix() > eff_prefix {
        return Err(PlannerError::insufficient_space(format!(
            "{head} is already smaller than the requested /{eff_prefix}"
        ))
        .with_context("cidr", head));
    }

    let mut children = head.subdivide(eff_prefix).map_err(|_| {
        PlannerError::insufficient_space(format!("cannot split {head} into /{eff_prefix} blocks"))
            .with_context("cidr", head)
    })?;
    let chosen = children.remove(0);
    children.extend(remaining.drain(..));
    *remaining = children;
    Ok(chosen)
}

/// Resolve a provider identifier to a [`Provider`], per §4.4's "provider
/// resolution": a non-empty cloud-map key is authoritative; an empty key
/// falls back to inferring from the first region name. An `Unknown` result
/// either way resolves to AWS, with a warning.
fn resolve_provider(provider_id: &str, regions: &[String]) -> Provider {
    let trimmed = provider_id.trim();
    let resolved = if !trimmed.is_empty() {
        match trimmed.to_lowercase().as_str() {
            "aws" => Provider::Aws,
            "azure" => Provider::Azure,
            "gcp" => Provider::Gcp,
            _ => Provider::Unknown,
        }
    } else {
        regions
            .first()
            .map(|r| catalog::classify(r))
            .unwrap_or(Provider::Unknown)
    };

    if resolved == Provider::Unknown {
        log::warn!(
            "could not resolve cloud provider for '{provider_id}' (regions: {regions:?}); defaulting to AWS"
        );
        Provider::Aws
    } else {
        resolved
    }
}

/// Output label for `cloudProvider`: the literal cloud-map key when it was
/// authoritative, else the inferred provider's canonical name.
fn provider_label(provider_id: &str, resolved: Provider) -> String {
    if provider_id.trim().is_empty() {
        resolved.to_string()
    } else {
        provider_id.to_string()
    }
}
