//! Input record ingestion.
//!
//! Deserializes the wire schema of the planner's config file (JSON or
//! YAML) into an [`InputRecord`] tree. Mirrors the reference crate's
//! `azure::cache::read_subnet_cache`: a thin IO wrapper around `serde`
//! that turns IO/parse failures into the crate's typed error, minus the
//! live-fetch fallback (there is no external API here to fall back to).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Optional default prefix lengths for the account/region/az levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrefixLengths {
    pub account: Option<u8>,
    pub region: Option<u8>,
    pub az: Option<u8>,
}

/// A cloud provider's configuration within a single account: an optional
/// base CIDR override and an ordered list of regions to allocate in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudConfig {
    #[serde(rename = "baseCidr", default, skip_serializing_if = "Option::is_none")]
    pub base_cidr: Option<String>,
    pub regions: Vec<String>,
}

/// An organizational account: a name plus a map from provider identifier to
/// that provider's configuration. Insertion order of `clouds` is preserved
/// (a plain `Vec` of pairs, not a `HashMap`) so the walk in §4.4 is
/// deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub clouds: OrderedMap<CloudConfig>,
}

/// The full, validated input record produced by config ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputRecord {
    #[serde(rename = "baseCidr")]
    pub base_cidr: String,
    #[serde(rename = "prefixLengths", default)]
    pub prefix_lengths: PrefixLengths,
    #[serde(rename = "cloudProviders", default)]
    pub cloud_providers: Vec<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(rename = "subnetTypes", default)]
    pub subnet_types: OrderedMap<u8>,
}

/// A string-keyed map that preserves insertion/declaration order, since the
/// spec makes `subnetTypes` and `clouds` key order part of the contract
/// (role allocation order, provider iteration order) — a `HashMap` would
/// silently break determinism (I4, property 7).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // serde_json and serde_yaml both preserve source key order when
        // deserializing into an ordered map container; BTreeMap does not,
        // so we deserialize through the raw Vec-of-pairs visitor instead.
        struct OrderedMapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> serde::de::Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a map")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, V>()? {
                    entries.push((k, v));
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(std::marker::PhantomData))
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        OrderedMap {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

fn sniff_format(path: &Path) -> Option<ConfigFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ConfigFormat::Json),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Some(ConfigFormat::Yaml)
        }
        _ => None,
    }
}

/// Load and parse an [`InputRecord`] from `path`. The format is chosen by
/// file extension; an unrecognized extension tries JSON, then YAML, before
/// giving up with a `ConfigurationError`.
pub fn load_input_record(path: &Path) -> Result<InputRecord> {
    let text = std::fs::read_to_string(path).map_err(|e| PlannerError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_input_record(&text, sniff_format(path))
}

fn parse_input_record(text: &str, format: Option<ConfigFormat>) -> Result<InputRecord> {
    match format {
        Some(ConfigFormat::Json) => serde_json::from_str(text)
            .map_err(|e| PlannerError::configuration_error(format!("invalid JSON config: {e}"))),
        Some(ConfigFormat::Yaml) => serde_yaml::from_str(text)
            .map_err(|e| PlannerError::configuration_error(format!("invalid YAML config: {e}"))),
        None => serde_json::from_str(text)
            .or_else(|json_err| {
                serde_yaml::from_str(text).map_err(|yaml_err| {
                    PlannerError::configuration_error(format!(
                        "config is neither valid JSON ({json_err}) nor valid YAML ({yaml_err})"
                    ))
                })
            }),
    }
}

/// Parse an [`InputRecord`] directly from a string, auto-sniffing JSON vs
/// YAML. Exposed for callers that already hold the config text (tests, or
/// a CLI `--format` override feeding in pre-read bytes).
pub fn parse_input_record_str(text: &str, format_hint: Option<&str>) -> Result<InputRecord> {
    let format = match format_hint {
        Some(f) if f.eq_ignore_ascii_case("json") => Some(ConfigFormat::Json),
        Some(f) if f.eq_ignore_ascii_case("yaml") || f.eq_ignore_ascii_case("yml") => {
            Some(ConfigFormat::Yaml)
        }
        Some(other) => {
            return Err(PlannerError::configuration_error(format!(
                "unrecognized --format value: {other}"
            )))
        }
        None => None,
    };
    parse_input_record(text, format)
}

/// Build an `OrderedMap<u8>` from a slice of `(role, prefix)` pairs, for
/// tests and programmatic callers that don't go through a config file.
pub fn subnet_types_from(pairs: &[(&str, u8)]) -> OrderedMap<u8> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect::<OrderedMap<u8>>()
}
