use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate prefix used by the RubyGems ecosystem.
pub const GEM_PREFIX: &str = "pkg:gem/";

/// One package as returned by the audit service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub coordinates: String,
    #[serde(default)]
    pub vulnerabilities: VulnerabilityMap,
}

impl AuditRecord {
    pub fn new(coordinates: impl Into<String>) -> Self {
        Self {
            coordinates: coordinates.into(),
            vulnerabilities: VulnerabilityMap::default(),
        }
    }

    pub fn with_vulnerability(mut self, vuln: VulnerabilityDetail) -> Self {
        self.vulnerabilities.insert(vuln.id.clone(), vuln);
        self
    }

    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

/// A single vulnerability reported against a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VulnerabilityDetail {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    pub cvss_score: Option<f64>,
    #[serde(deserialize_with = "null_as_empty")]
    pub cvss_vector: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub cve: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub reference: String,
}

impl VulnerabilityDetail {
    pub fn new(id: impl Into<String>, cvss_score: f64) -> Self {
        Self {
            id: id.into(),
            cvss_score: Some(cvss_score),
            ..Default::default()
        }
    }

    /// Score as printed in reports; empty when the service sent none.
    pub fn score_label(&self) -> String {
        self.cvss_score.map(|s| s.to_string()).unwrap_or_default()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Vulnerabilities keyed by identifier, kept in the order the service sent them.
///
/// Deserializes from either a JSON object keyed by id or an array of
/// details. Every array element is kept; it is keyed by its `id` unless the
/// id is empty or already taken, in which case a positional key is used.
/// Serializes as an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VulnerabilityMap {
    entries: Vec<(String, VulnerabilityDetail)>,
}

impl VulnerabilityMap {
    /// Inserts a detail, replacing an existing entry with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, detail: VulnerabilityDetail) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = detail,
            None => self.entries.push((key, detail)),
        }
    }

    /// Appends a detail without replacing anything, keyed by its id when that is free.
    pub fn push(&mut self, detail: VulnerabilityDetail) {
        let mut key = detail.id.clone();
        let mut position = self.entries.len();
        while key.is_empty() || self.get(&key).is_some() {
            key = format!("#{}", position);
            position += 1;
        }
        self.entries.push((key, detail));
    }

    pub fn get(&self, key: &str) -> Option<&VulnerabilityDetail> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &VulnerabilityDetail> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &VulnerabilityDetail) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }
}

impl FromIterator<VulnerabilityDetail> for VulnerabilityMap {
    fn from_iter<I: IntoIterator<Item = VulnerabilityDetail>>(iter: I) -> Self {
        let mut map = VulnerabilityMap::default();
        for detail in iter {
            map.push(detail);
        }
        map
    }
}

impl Serialize for VulnerabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for detail in self.values() {
            seq.serialize_element(detail)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for VulnerabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VulnerabilityMapVisitor)
    }
}

struct VulnerabilityMapVisitor;

impl<'de> Visitor<'de> for VulnerabilityMapVisitor {
    type Value = VulnerabilityMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object keyed by vulnerability id or an array of vulnerabilities")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(VulnerabilityMap::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut map = VulnerabilityMap::default();
        while let Some(detail) = seq.next_element::<VulnerabilityDetail>()? {
            map.push(detail);
        }
        Ok(map)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = VulnerabilityMap::default();
        while let Some((key, detail)) = access.next_entry::<String, VulnerabilityDetail>()? {
            map.insert(key, detail);
        }
        Ok(map)
    }
}

/// Package name and version parsed out of a coordinate string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCoordinates {
    pub name: String,
    pub version: String,
    has_separator: bool,
}

impl PackageCoordinates {
    /// Strips `prefix` and splits on `@`.
    ///
    /// Coordinates without an `@` produce an empty version rather than an error.
    pub fn parse(coordinates: &str, prefix: &str) -> Self {
        let stripped = coordinates.strip_prefix(prefix).unwrap_or(coordinates);
        let mut parts = stripped.split('@');
        let name = parts.next().unwrap_or_default().to_string();
        let version = parts.next();

        Self {
            name,
            has_separator: version.is_some(),
            version: version.unwrap_or_default().to_string(),
        }
    }

    /// Key used by the reverse dependency index: `name-version`.
    pub fn lookup_key(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub fn is_well_formed(&self) -> bool {
        self.has_separator
    }
}
