//! Provider availability-zone catalog.
//!
//! Three pure, read-only queries keyed by region name string: which cloud
//! provider a region belongs to, how many AZs to plan for, and what those
//! AZs are called in the provider's native convention. Regex compilation
//! happens once behind a [`OnceLock`], the way the reference crate lazily
//! builds its command-splitting regex in `azure::cli`.

use std::sync::OnceLock;

use regex::RegexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
    Unknown,
}

impl Provider {
    /// Per-provider ceiling on AZ count for a region whose default isn't
    /// overridden below; the generic per-region default (3) never exceeds
    /// it, but an explicit override (e.g. AWS us-east-1's 6) may be capped.
    fn az_ceiling(self) -> u32 {
        match self {
            Provider::Aws => 6,
            Provider::Azure => 3,
            Provider::Gcp => 3,
            Provider::Unknown => 3,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
            Provider::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

const AWS_PATTERNS: &[&str] = &[
    r"^(us|eu|ap|sa|ca|af|me)-(east|west|north|south|central|southeast|northeast|northwest|southwest)+-\d$",
    r"^us-gov-(east|west)-\d$",
    r"^cn-(north|northwest)-\d$",
    r"^(us|eu|ap|sa|ca|af|me)-(east|west|north|south|central)+-\d-[a-z0-9-]+$",
];

const AZURE_PATTERNS: &[&str] = &[
    r"^(east|west|central|north|south|southeast|northeast|northwest|southwest)+(us|europe|asia|australia|india|japan|korea|brazil|france|germany|norway|switzerland|uae|uk|africa)\d*$",
    r"^usgov(virginia|texas|arizona|iowa)$",
    r"^china(east|north|northeast|northwest|southeast|southwest)\d*$",
];

const AZURE_SPECIAL_NAMES: &[&str] = &[
    "japaneast",
    "japanwest",
    "southeastasia",
    "southindia",
    "westindia",
    "centralindia",
    "eastasia",
];

const GCP_PATTERNS: &[&str] = &[
    r"^(us|europe|asia|australia|southamerica|northamerica)-(east|west|north|south|central|northeast|northwest|southeast|southwest)\d+$",
];

fn aws_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(AWS_PATTERNS).expect("invalid AWS region regex"))
}

fn azure_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(AZURE_PATTERNS).expect("invalid Azure region regex"))
}

fn gcp_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(GCP_PATTERNS).expect("invalid GCP region regex"))
}

/// Classify a region name string into a [`Provider`]. Empty or absent names
/// are `Unknown`; AWS patterns are checked first, then Azure, then GCP.
pub fn classify(region_name: &str) -> Provider {
    if region_name.trim().is_empty() {
        return Provider::Unknown;
    }
    let lower = region_name.to_lowercase();

    if aws_set().is_match(&lower) {
        return Provider::Aws;
    }
    if azure_set().is_match(&lower) || AZURE_SPECIAL_NAMES.contains(&lower.as_str()) {
        return Provider::Azure;
    }
    if gcp_set().is_match(&lower) {
        return Provider::Gcp;
    }
    Provider::Unknown
}

/// Per-region AZ count overrides, keyed by the provider's native region
/// name. Regions absent from this table use the provider's generic default
/// of 3.
fn region_az_override(provider: Provider, region_name: &str) -> Option<u32> {
    let region = region_name.to_lowercase();
    match provider {
        Provider::Aws => match region.as_str() {
            "us-east-1" => Some(6),
            "us-west-1" => Some(2),
            _ => None,
        },
        _ => None,
    }
}

/// Default AZ count for `region_name` under `provider`, capped by the
/// provider's ceiling for that region.
pub fn default_az_count(provider: Provider, region_name: &str) -> u32 {
    let raw = region_az_override(provider, region_name).unwrap_or(3);
    raw.min(provider.az_ceiling())
}

/// Produce `count` distinct AZ identifiers in the provider's native naming
/// convention, bounded by the region's ceiling.
pub fn az_names(provider: Provider, region_name: &str, count: u32) -> Vec<String> {
    let count = count.min(provider.az_ceiling());
    match provider {
        Provider::Aws | Provider::Gcp => {
            let region = region_name.to_lowercase();
            (0..count)
                .map(|i| format!("{region}{}", az_letter(i)))
                .collect()
        }
        Provider::Azure => {
            let region = normalize_azure_region(region_name);
            (1..=count).map(|i| format!("{region}-{i}")).collect()
        }
        Provider::Unknown => (1..=count).map(|i| format!("{region_name}-az{i}")).collect(),
    }
}

fn az_letter(index: u32) -> char {
    (b'a' + index as u8) as char
}

fn normalize_azure_region(region_name: &str) -> String {
    region_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_aws_regions() {
        assert_eq!(classify("us-east-1"), Provider::Aws);
        assert_eq!(classify("ap-southeast-2"), Provider::Aws);
        assert_eq!(classify("us-gov-west-1"), Provider::Aws);
        assert_eq!(classify("cn-northwest-1"), Provider::Aws);
        assert_eq!(classify("us-east-1-bos-1"), Provider::Aws);
        assert_eq!(classify("US-EAST-1"), Provider::Aws);
    }

    #[test]
    fn classifies_azure_regions() {
        assert_eq!(classify("eastus"), Provider::Azure);
        assert_eq!(classify("westeurope"), Provider::Azure);
        assert_eq!(classify("usgovvirginia"), Provider::Azure);
        assert_eq!(classify("chinaeast"), Provider::Azure);
        assert_eq!(classify("japaneast"), Provider::Azure);
        assert_eq!(classify("southeastasia"), Provider::Azure);
    }

    #[test]
    fn classifies_gcp_regions() {
        assert_eq!(classify("us-central1"), Provider::Gcp);
        assert_eq!(classify("europe-west4"), Provider::Gcp);
        assert_eq!(classify("australia-southeast1"), Provider::Gcp);
    }

    #[test]
    fn classifies_unknown() {
        assert_eq!(classify(""), Provider::Unknown);
        assert_eq!(classify("mars-base-1"), Provider::Unknown);
    }

    #[test]
    fn default_az_counts_match_overrides_and_generic() {
        assert_eq!(default_az_count(Provider::Aws, "us-east-1"), 6);
        assert_eq!(default_az_count(Provider::Aws, "us-west-1"), 2);
        assert_eq!(default_az_count(Provider::Aws, "us-west-2"), 3);
        assert_eq!(default_az_count(Provider::Azure, "eastus"), 3);
        assert_eq!(default_az_count(Provider::Gcp, "us-central1"), 3);
        assert_eq!(default_az_count(Provider::Unknown, "mars-base-1"), 3);
    }

    #[test]
    fn az_names_aws_and_gcp_use_letter_suffix() {
        assert_eq!(
            az_names(Provider::Aws, "us-east-1", 3),
            vec!["us-east-1a", "us-east-1b", "us-east-1c"]
        );
        assert_eq!(
            az_names(Provider::Gcp, "us-central1", 3),
            vec!["us-central1a", "us-central1b", "us-central1c"]
        );
    }

    #[test]
    fn az_names_azure_uses_dash_index() {
        assert_eq!(
            az_names(Provider::Azure, "eastus", 3),
            vec!["eastus-1", "eastus-2", "eastus-3"]
        );
        assert_eq!(az_names(Provider::Azure, "East US", 2), vec!["eastus-1", "eastus-2"]);
    }

    #[test]
    fn az_names_unknown_uses_az_suffix() {
        assert_eq!(
            az_names(Provider::Unknown, "mars-base-1", 2),
            vec!["mars-base-1-az1", "mars-base-1-az2"]
        );
    }

    #[test]
    fn az_names_are_capped_by_ceiling() {
        let names = az_names(Provider::Azure, "eastus", 10);
        assert_eq!(names.len(), 3);
    }
}
