//! IPv4 CIDR arithmetic primitives.
//!
//! A [`Cidr`] is a network address paired with a prefix length, with the
//! invariant that the low `(32 - prefix)` bits of the address are zero.
//! Every other component in this crate is built on top of `parse`,
//! `subdivide`, `contains` and `overlap`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{PlannerError, Result};

pub const MAX_PREFIX: u8 = 32;

/// An IPv4 CIDR block: a network-aligned address plus a prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cidr {
    addr: u32,
    prefix: u8,
}

/// Convert a prefix length to its 32-bit network mask. `len == 0` yields the
/// all-zero mask; `len == 32` yields `u32::MAX`.
fn prefix_mask(len: u8) -> Result<u32> {
    if len > MAX_PREFIX {
        return Err(PlannerError::invalid_prefix(len)
            .with_context("reason", "prefix length must be in 0..=32"));
    }
    if len == 0 {
        Ok(0)
    } else {
        Ok(u32::MAX << (MAX_PREFIX - len))
    }
}

impl Cidr {
    /// Build a `Cidr` from a raw address and prefix, masking host bits.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Cidr> {
        let mask = prefix_mask(prefix)?;
        Ok(Cidr {
            addr: u32::from(addr) & mask,
            prefix,
        })
    }

    /// Parse `a.b.c.d/p`. Rejects malformed dotted-quads, out-of-range
    /// prefixes, and anything with extra tokens.
    pub fn parse(text: &str) -> Result<Cidr> {
        let text = text.trim();
        let mut parts = text.split('/');
        let (addr_part, prefix_part, extra) = (parts.next(), parts.next(), parts.next());

        let (addr_part, prefix_part) = match (addr_part, prefix_part, extra) {
            (Some(a), Some(p), None) if !a.is_empty() && !p.is_empty() => (a, p),
            _ => return Err(PlannerError::invalid_cidr_format(text)),
        };

        let addr = Ipv4Addr::from_str(addr_part)
            .map_err(|_| PlannerError::invalid_cidr_format(text).with_context("octets", addr_part))?;
        let prefix: u8 = prefix_part
            .parse()
            .map_err(|_| PlannerError::invalid_cidr_format(text).with_context("prefix", prefix_part))?;
        if prefix > MAX_PREFIX {
            return Err(PlannerError::invalid_cidr_format(text)
                .with_context("prefix", prefix_part)
                .with_context("reason", "prefix length must be in 0..=32"));
        }

        Cidr::new(addr, prefix)
    }

    /// Re-mask the address against the current prefix. Idempotent.
    pub fn normalize(self) -> Cidr {
        // Safe to unwrap: self.prefix was already validated on construction.
        Cidr::new(self.address(), self.prefix).expect("prefix already validated")
    }

    pub fn address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.addr)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block: `2^(32 - prefix)`.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_PREFIX - self.prefix) as u64
    }

    /// Usable host count: size - 2 for prefix <= 30, 2 for /31, 1 for /32.
    pub fn usable_ips(&self) -> u64 {
        match self.prefix {
            31 => 2,
            32 => 1,
            _ => self.size().saturating_sub(2),
        }
    }

    /// The last address in the block (broadcast address).
    pub fn broadcast(&self) -> Ipv4Addr {
        let host_bits_mask = if self.prefix == 0 {
            u32::MAX
        } else {
            !(u32::MAX << (MAX_PREFIX - self.prefix))
        };
        Ipv4Addr::from(self.addr | host_bits_mask)
    }

    /// True iff `self` fully contains `other`: `self.prefix <= other.prefix`
    /// and the top `self.prefix` bits of `other`'s address match.
    pub fn contains(&self, other: &Cidr) -> bool {
        if self.prefix > other.prefix {
            return false;
        }
        let mask = prefix_mask(self.prefix).expect("prefix already validated");
        (other.addr & mask) == self.addr
    }

    /// True iff either CIDR contains the other.
    pub fn overlap(&self, other: &Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// Split this CIDR into `2^(new_prefix - prefix)` consecutive children,
    /// in ascending address order. Returns `[self]` when `new_prefix ==
    /// prefix`.
    pub fn subdivide(&self, new_prefix: u8) -> Result<Vec<Cidr>> {
        if new_prefix < self.prefix || new_prefix > MAX_PREFIX {
            return Err(PlannerError::invalid_prefix(new_prefix)
                .with_context("parent_prefix", self.prefix)
                .with_context("reason", "new_prefix must be in [parent.prefix, 32]"));
        }
        if new_prefix == self.prefix {
            return Ok(vec![*self]);
        }
        let count = 1u64 << (new_prefix - self.prefix) as u64;
        let child_size = 1u64 << (MAX_PREFIX - new_prefix) as u64;
        let mut children = Vec::with_capacity(count as usize);
        for i in 0..count {
            let child_addr = (self.addr as u64) + i * child_size;
            children.push(Cidr {
                addr: child_addr as u32,
                prefix: new_prefix,
            });
        }
        Ok(children)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix)
    }
}

/// `⌈log2(max(1, count))⌉`. `count <= 1` needs zero extra bits; `count <= 0`
/// is a programmer error (`InvalidOperation`).
pub fn required_prefix_bits(count: i64) -> Result<u32> {
    if count <= 0 {
        return Err(PlannerError::invalid_operation(format!(
            "count must be positive, got {count}"
        )));
    }
    if count <= 1 {
        return Ok(0);
    }
    let mut bits = 0u32;
    while (1u64 << bits) < count as u64 {
        bits += 1;
    }
    Ok(bits)
}

/// `parent.prefix + required_prefix_bits(count)`, failing with
/// `InsufficientSpace` if the result would exceed 32.
pub fn optimal_child_prefix(parent: &Cidr, count: i64) -> Result<u8> {
    let bits = required_prefix_bits(count)?;
    let prefix = parent.prefix() as u32 + bits;
    if prefix > MAX_PREFIX as u32 {
        return Err(PlannerError::insufficient_space(format!(
            "{parent} cannot be split into {count} children: would need /{prefix}"
        ))
        .with_context("cidr", parent)
        .with_context("requiredCount", count));
    }
    Ok(prefix as u8)
}
