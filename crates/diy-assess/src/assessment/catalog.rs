use std::collections::{BTreeSet, HashMap};

use regex::Regex;

use super::domain::{JobDefinition, JobKey, RiskFlags};

/// A job definition together with the keywords that select it.
///
/// Keywords are regular-expression alternatives matched case-insensitively
/// against the lowercased request text.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub definition: JobDefinition,
    pub keywords: Vec<&'static str>,
}

#[derive(Debug)]
struct IndexedEntry {
    definition: JobDefinition,
    pattern: Regex,
}

/// Read-only table of known jobs, in classification priority order.
#[derive(Debug)]
pub struct JobCatalog {
    entries: Vec<IndexedEntry>,
    index: HashMap<JobKey, usize>,
}

impl JobCatalog {
    /// The catalog shipped with the service.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard_entries())
    }

    /// Validate and index `entries`. Declaration order becomes priority order.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut indexed = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());

        for entry in entries {
            let CatalogEntry {
                definition,
                keywords,
            } = entry;

            let key = definition.key;
            if key.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if !(1..=10).contains(&definition.base_difficulty) {
                return Err(CatalogError::DifficultyOutOfRange {
                    key: key.as_str(),
                    value: definition.base_difficulty,
                });
            }
            if keywords.is_empty() {
                return Err(CatalogError::MissingKeywords { key: key.as_str() });
            }
            if index.contains_key(&key) {
                return Err(CatalogError::DuplicateKey { key: key.as_str() });
            }

            let pattern = Regex::new(&format!("(?i)(?:{})", keywords.join("|"))).map_err(
                |source| CatalogError::InvalidPattern {
                    key: key.as_str(),
                    source,
                },
            )?;

            index.insert(key, indexed.len());
            indexed.push(IndexedEntry {
                definition,
                pattern,
            });
        }

        Ok(Self {
            entries: indexed,
            index,
        })
    }

    pub fn lookup(&self, key: JobKey) -> Option<&JobDefinition> {
        self.index
            .get(&key)
            .map(|position| &self.entries[*position].definition)
    }

    /// Valid keys in priority order.
    pub fn keys(&self) -> Vec<JobKey> {
        self.entries
            .iter()
            .map(|entry| entry.definition.key)
            .collect()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &JobDefinition> {
        self.entries.iter().map(|entry| &entry.definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, in priority order, whose pattern matches `text`.
    pub(crate) fn first_match(&self, text: &str) -> Option<JobKey> {
        self.entries
            .iter()
            .find(|entry| entry.pattern.is_match(text))
            .map(|entry| entry.definition.key)
    }
}

/// Raised when the catalog violates its invariants. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog entry has an empty key")]
    EmptyKey,
    #[error("catalog key '{key}' is declared more than once")]
    DuplicateKey { key: &'static str },
    #[error("catalog entry '{key}' has base difficulty {value}, expected 1-10")]
    DifficultyOutOfRange { key: &'static str, value: u8 },
    #[error("catalog entry '{key}' declares no keywords")]
    MissingKeywords { key: &'static str },
    #[error("catalog entry '{key}' has an invalid keyword pattern: {source}")]
    InvalidPattern {
        key: &'static str,
        #[source]
        source: regex::Error,
    },
}

fn standard_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            definition: JobDefinition {
                key: JobKey("hang_shelf"),
                name: "Hang a shelf",
                base_difficulty: 4,
                risk_flags: RiskFlags::NONE,
                steps: vec![
                    "Choose the shelf position and check it is level with a spirit level.",
                    "Scan the wall with a detector for hidden pipes and cables.",
                    "Mark the bracket holes with a pencil.",
                    "Drill pilot holes and insert wall anchors suited to the wall type.",
                    "Screw the brackets to the wall and check they are level.",
                    "Fix the shelf to the brackets and test it with a light load.",
                ],
                tools: BTreeSet::from([
                    "Drill",
                    "Spirit level",
                    "Stud and cable detector",
                    "Screwdriver",
                    "Tape measure",
                    "Pencil",
                ]),
                materials: BTreeSet::from(["Shelf", "Brackets", "Wall anchors", "Screws"]),
                safety_notes: vec![
                    "Always scan for hidden pipes and cables before drilling.",
                    "Wear safety glasses while drilling.",
                    "Check the weight rating of the anchors against the planned load.",
                ],
            },
            keywords: vec![r"shel(?:f|v)", r"\bbrackets?\b", r"wall anchors?"],
        },
        CatalogEntry {
            definition: JobDefinition {
                key: JobKey("replace_tap_washer"),
                name: "Replace a tap washer",
                base_difficulty: 3,
                risk_flags: RiskFlags {
                    plumbing: true,
                    ..RiskFlags::NONE
                },
                steps: vec![
                    "Turn off the water supply to the tap at the isolation valve.",
                    "Open the tap to drain the remaining water.",
                    "Remove the tap handle and unscrew the headgear nut.",
                    "Take out the old washer and fit the new one.",
                    "Reassemble the tap and hand-tighten before a final quarter turn.",
                    "Restore the water supply and check for leaks.",
                ],
                tools: BTreeSet::from(["Adjustable spanner", "Screwdriver", "Cloth"]),
                materials: BTreeSet::from(["Replacement washer", "O-rings", "Silicone grease"]),
                safety_notes: vec![
                    "Make sure the water supply is fully isolated before dismantling the tap.",
                    "Put the plug in the sink so small parts cannot fall down the drain.",
                ],
            },
            keywords: vec![
                r"\btaps?\b",
                r"\bfaucets?\b",
                r"\bwashers?\b",
                r"\bdripp?(?:ing|s)?\b",
            ],
        },
        CatalogEntry {
            definition: JobDefinition {
                key: JobKey("paint_wall"),
                name: "Paint a wall",
                base_difficulty: 2,
                risk_flags: RiskFlags::NONE,
                steps: vec![
                    "Move furniture away and cover the floor with dust sheets.",
                    "Fill cracks and holes, then sand the wall smooth.",
                    "Mask skirting boards, sockets and window frames.",
                    "Cut in around the edges with a brush.",
                    "Roll on the first coat and let it dry fully.",
                    "Apply a second coat and remove the masking tape while it is still tacky.",
                ],
                tools: BTreeSet::from([
                    "Roller and tray",
                    "Paint brushes",
                    "Filling knife",
                    "Sanding block",
                    "Step ladder",
                ]),
                materials: BTreeSet::from(["Paint", "Filler", "Masking tape", "Dust sheets"]),
                safety_notes: vec![
                    "Keep the room ventilated while painting and drying.",
                    "Make sure the step ladder is fully opened and on a level floor.",
                ],
            },
            keywords: vec![
                r"\bpaint(?:s|ing|ed)?\b",
                r"\brepaint",
                r"\bemulsion\b",
                r"\broller\b",
            ],
        },
        CatalogEntry {
            definition: JobDefinition {
                key: JobKey("fit_light_fixture"),
                name: "Fit a ceiling light fixture",
                base_difficulty: 7,
                risk_flags: RiskFlags {
                    electrical: true,
                    working_at_height: true,
                    ..RiskFlags::NONE
                },
                steps: vec![
                    "Switch off the lighting circuit at the consumer unit and lock it off.",
                    "Confirm the circuit is dead with a voltage tester.",
                    "Note or photograph the existing wiring before disconnecting it.",
                    "Disconnect the old fitting and support its weight while doing so.",
                    "Connect the new fitting, matching live, neutral and earth conductors.",
                    "Secure the fitting to the ceiling, restore power and test.",
                ],
                tools: BTreeSet::from([
                    "Voltage tester",
                    "Insulated screwdrivers",
                    "Wire strippers",
                    "Step ladder",
                    "Drill",
                ]),
                materials: BTreeSet::from([
                    "Light fixture",
                    "Connector block",
                    "Ceiling fixing screws",
                    "Earth sleeving",
                ]),
                safety_notes: vec![
                    "Never work on a circuit that has not been isolated and proven dead.",
                    "Use a stable ladder and have someone hold it while you work overhead.",
                    "Some electrical work must be notified to building control or done by a registered electrician.",
                ],
            },
            keywords: vec![
                r"light fixtures?",
                r"light fittings?",
                r"ceiling lights?",
                r"\bpendant\b",
                r"\bluminaire\b",
                r"\blight switch\b",
            ],
        },
    ]
}
