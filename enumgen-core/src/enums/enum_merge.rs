//! Merging per-unit extraction results into one record per enumeration.
//!
//! Members contributed by any number of files are concatenated, sorted and
//! deduplicated. The mapping is ordered by [`EnumKey`], so the result does
//! not depend on the order units were processed in.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use super::enum_extractor::EnumDefinition;

/// Identity of an enumeration: directory, package, test flag and type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EnumKey {
    pub dir: PathBuf,
    pub package: String,
    pub is_test: bool,
    pub name: String,
}

/// An enumeration with its complete member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedEnum {
    pub definition: EnumDefinition,
    /// Sorted, without duplicates
    pub members: Vec<String>,
}

/// The enumerations of one package, in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup<'a> {
    pub dir: PathBuf,
    pub package: String,
    pub is_test: bool,
    pub enums: Vec<&'a MergedEnum>,
}

/// All enumerations found in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMapping {
    enums: BTreeMap<EnumKey, MergedEnum>,
}

impl CanonicalMapping {
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }

    pub fn get(&self, key: &EnumKey) -> Option<&MergedEnum> {
        self.enums.get(key)
    }

    /// Enumerations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&EnumKey, &MergedEnum)> {
        self.enums.iter()
    }

    /// First enumeration with the given type name, in key order.
    pub fn find(&self, name: &str) -> Option<&MergedEnum> {
        self.enums.values().find(|e| e.definition.name == name)
    }

    /// Groups enumerations by package. Keys sort by directory first, so
    /// each package's enumerations are contiguous.
    pub fn packages(&self) -> Vec<PackageGroup<'_>> {
        let mut groups: Vec<PackageGroup<'_>> = Vec::new();
        for (key, merged) in &self.enums {
            match groups.last_mut() {
                Some(g) if g.dir == key.dir && g.package == key.package && g.is_test == key.is_test => {
                    g.enums.push(merged)
                }
                _ => groups.push(PackageGroup {
                    dir: key.dir.clone(),
                    package: key.package.clone(),
                    is_test: key.is_test,
                    enums: vec![merged],
                }),
            }
        }
        groups
    }
}

/// Combines `(definition, member)` pairs by enumeration identity.
///
/// When contributors disagree on the base type, the lexicographically
/// smallest one is kept and a warning is logged.
pub fn merge<I>(pairs: I) -> CanonicalMapping
where
    I: IntoIterator<Item = (EnumDefinition, String)>,
{
    let mut enums: BTreeMap<EnumKey, MergedEnum> = BTreeMap::new();

    for (definition, member) in pairs {
        let entry = enums.entry(definition.key()).or_insert_with(|| MergedEnum {
            definition: definition.clone(),
            members: Vec::new(),
        });
        if entry.definition.base_type != definition.base_type {
            warn!(
                enum_name = %definition.name,
                dir = %definition.dir.display(),
                first = %entry.definition.base_type,
                second = %definition.base_type,
                "Conflicting base types"
            );
            if definition.base_type < entry.definition.base_type {
                entry.definition.base_type = definition.base_type;
            }
        }
        entry.members.push(member);
    }

    for merged in enums.values_mut() {
        merged.members.sort_unstable();
        merged.members.dedup();
    }

    CanonicalMapping { enums }
}
