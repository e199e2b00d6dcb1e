//! Functional-group seniority table.
//!
//! The table is data, not code: the built-in ranks are read from an embedded
//! CSV file and callers can inject their own table with the same columns
//! (`kind,rank,suffix,aliases`).

use crate::{Name, NamingError};
use csv::{ReaderBuilder, StringRecord};
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::io::Read;

/// Rank given to a chain or group with no recognised characteristic group.
pub const NO_PRIORITY: u32 = 999;

lazy_static! {
    static ref DEFAULT_PRIORITIES: PriorityTable =
        PriorityTable::from_csv(include_str!("priorities.csv"))
            .expect("embedded priority table is well formed");

    /// Interned kind of every class, indexed by discriminant.
    static ref CLASS_NAMES: Vec<Name> = ALL_CLASSES.iter().map(|class| Name::new(class.kind())).collect();
}

/// Characteristic-group classes the chain classifier recognises by
/// inspecting atoms. Each maps onto a table kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupClass {
    CarboxylicAcid,
    SulfonicAcid,
    PhosphonicAcid,
    Anhydride,
    Ester,
    AcylHalide,
    SulfonylHalide,
    Amide,
    Nitrile,
    Isocyanate,
    Aldehyde,
    Ketone,
    Alcohol,
    Thiol,
    Sulfonamide,
    Amine,
    Imine,
    Sulfone,
    Sulfoxide,
    Ether,
    Sulfide,
    Halide,
    Nitro,
}

impl GroupClass {
    pub fn kind(&self) -> &'static str {
        match self {
            GroupClass::CarboxylicAcid => "carboxylic acid",
            GroupClass::SulfonicAcid => "sulfonic acid",
            GroupClass::PhosphonicAcid => "phosphonic acid",
            GroupClass::Anhydride => "anhydride",
            GroupClass::Ester => "ester",
            GroupClass::AcylHalide => "acyl halide",
            GroupClass::SulfonylHalide => "sulfonyl halide",
            GroupClass::Amide => "amide",
            GroupClass::Nitrile => "nitrile",
            GroupClass::Isocyanate => "isocyanate",
            GroupClass::Aldehyde => "aldehyde",
            GroupClass::Ketone => "ketone",
            GroupClass::Alcohol => "alcohol",
            GroupClass::Thiol => "thiol",
            GroupClass::Sulfonamide => "sulfonamide",
            GroupClass::Amine => "amine",
            GroupClass::Imine => "imine",
            GroupClass::Sulfone => "sulfone",
            GroupClass::Sulfoxide => "sulfoxide",
            GroupClass::Ether => "ether",
            GroupClass::Sulfide => "sulfide",
            GroupClass::Halide => "halide",
            GroupClass::Nitro => "nitro",
        }
    }

    /// Classes whose first atom is a carbonyl carbon that must end up in the
    /// parent chain.
    pub fn is_carbonyl_anchored(&self) -> bool {
        matches!(
            self,
            GroupClass::CarboxylicAcid
                | GroupClass::Ester
                | GroupClass::AcylHalide
                | GroupClass::Amide
                | GroupClass::Aldehyde
                | GroupClass::Ketone
        )
    }

    /// The interned form of [`GroupClass::kind`].
    pub fn name(&self) -> &'static Name {
        &CLASS_NAMES[*self as usize]
    }

    pub fn from_kind(kind: &Name) -> Option<Self> {
        ALL_CLASSES.iter().copied().find(|class| class.name() == kind)
    }
}

const ALL_CLASSES: [GroupClass; 23] = [
    GroupClass::CarboxylicAcid,
    GroupClass::SulfonicAcid,
    GroupClass::PhosphonicAcid,
    GroupClass::Anhydride,
    GroupClass::Ester,
    GroupClass::AcylHalide,
    GroupClass::SulfonylHalide,
    GroupClass::Amide,
    GroupClass::Nitrile,
    GroupClass::Isocyanate,
    GroupClass::Aldehyde,
    GroupClass::Ketone,
    GroupClass::Alcohol,
    GroupClass::Thiol,
    GroupClass::Sulfonamide,
    GroupClass::Amine,
    GroupClass::Imine,
    GroupClass::Sulfone,
    GroupClass::Sulfoxide,
    GroupClass::Ether,
    GroupClass::Sulfide,
    GroupClass::Halide,
    GroupClass::Nitro,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityEntry {
    pub kind: Name,
    pub rank: u32,
    /// Whether the kind can be expressed as a suffix, and so be principal.
    pub suffix: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    entries: BTreeMap<Name, PriorityEntry>,
}

impl PriorityTable {
    /// The built-in seniority order.
    pub fn builtin() -> &'static PriorityTable {
        &DEFAULT_PRIORITIES
    }

    pub fn from_csv(data: &str) -> Result<Self, NamingError> {
        Self::from_reader(data.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, NamingError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = PriorityTable::default();
        for (row, result) in rdr.records().enumerate() {
            let record: StringRecord = result?;
            let row = row + 2;
            let kind = record
                .get(0)
                .filter(|kind| !kind.is_empty())
                .ok_or_else(|| NamingError::priority_row(row, "missing kind"))?;
            let rank = record
                .get(1)
                .ok_or_else(|| NamingError::priority_row(row, "missing rank"))?
                .parse::<u32>()
                .map_err(|err| NamingError::priority_row(row, format!("bad rank: {err}")))?;
            let suffix = match record.get(2).unwrap_or("true") {
                "" | "true" | "yes" => true,
                "false" | "no" => false,
                other => {
                    return Err(NamingError::priority_row(
                        row,
                        format!("bad suffix flag '{other}'"),
                    ))
                }
            };

            let entry = PriorityEntry {
                kind: Name::new(kind),
                rank,
                suffix,
            };
            let aliases = record.get(3).unwrap_or("");
            for alias in aliases.split(';').map(str::trim).filter(|a| !a.is_empty()) {
                table.entries.insert(Name::new(alias), entry.clone());
            }
            table.entries.insert(entry.kind.clone(), entry);
        }
        Ok(table)
    }

    pub fn entry(&self, kind: &Name) -> Option<&PriorityEntry> {
        self.entries.get(kind)
    }

    pub fn rank(&self, kind: &Name) -> Option<u32> {
        self.entry(kind).map(|entry| entry.rank)
    }

    pub fn class_rank(&self, class: GroupClass) -> u32 {
        self.rank(class.name()).unwrap_or(NO_PRIORITY)
    }

    pub fn is_suffix(&self, kind: &Name) -> bool {
        self.entry(kind).map(|entry| entry.suffix).unwrap_or(false)
    }

    /// The canonical kind an alias refers to.
    pub fn canonical(&self, kind: &Name) -> Name {
        self.entry(kind)
            .map(|entry| entry.kind.clone())
            .unwrap_or_else(|| kind.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
