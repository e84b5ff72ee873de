//! Versioned scoring rubric: per-dimension guidance and keyword cues.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::model::Dimension;

/// Language a keyword cue is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Danish,
    French,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Danish => "Danish",
            Language::French => "French",
        }
    }
}

/// Rubric revisions the scoring client can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RubricVersion {
    /// English cues only.
    V1,
    /// Multilingual cues and the stricter funk/brett bands.
    #[default]
    V2,
}

impl fmt::Display for RubricVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RubricVersion::V1 => f.write_str("v1"),
            RubricVersion::V2 => f.write_str("v2"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown rubric version {0:?}, expected v1 or v2")]
pub struct UnknownRubric(String);

impl FromStr for RubricVersion {
    type Err = UnknownRubric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(RubricVersion::V1),
            "v2" | "2" => Ok(RubricVersion::V2),
            _ => Err(UnknownRubric(s.to_string())),
        }
    }
}

/// Keywords in one language that hint at a dimension.
#[derive(Debug, Clone, Copy)]
pub struct Cues {
    pub language: Language,
    pub words: &'static [&'static str],
}

/// Guidance for scoring one dimension.
#[derive(Debug, Clone)]
pub struct DimensionGuide {
    pub dimension: Dimension,
    pub summary: &'static str,
    pub cues: Vec<Cues>,
    /// Extra instructions appended after the cues.
    pub notes: &'static [&'static str],
    /// Score bands, highest last.
    pub bands: &'static [&'static str],
}

/// A complete rubric.
#[derive(Debug, Clone)]
pub struct Rubric {
    pub version: RubricVersion,
    pub guides: Vec<DimensionGuide>,
}

impl Rubric {
    pub fn new(version: RubricVersion) -> Self {
        let guides = Dimension::ALL
            .into_iter()
            .map(|dimension| guide(version, dimension))
            .collect();
        Self { version, guides }
    }

    pub fn guide(&self, dimension: Dimension) -> Option<&DimensionGuide> {
        self.guides.iter().find(|g| g.dimension == dimension)
    }

    /// Whether cues in languages other than English are present.
    pub fn is_multilingual(&self) -> bool {
        self.guides
            .iter()
            .flat_map(|g| g.cues.iter())
            .any(|c| c.language != Language::English)
    }
}

const FUNKY_BANDS: &[&str] = &[
    "0-2: None of these descriptors present. Clean, conventional style.",
    "3-4: One or two mild hints mentioned positively.",
    "5-6: Clearly present but not dominant.",
    "7-8: Strongly present, mentioned by multiple reviewers OR mentioned as excessive/a flaw.",
    "9-10: Overwhelming, repeatedly flagged as too much or a major characteristic.",
];

const BRETT_BANDS: &[&str] = &[
    "0-2: No brett descriptors present whatsoever.",
    "3-4: One mild hint mentioned once.",
    "5-6: Clearly present, mentioned positively or neutrally.",
    "7-8: Strongly present, explicitly named or mentioned as excessive by any reviewer.",
    "9-10: Brett is dominant, repeatedly mentioned or flagged as a major flaw by multiple reviewers.",
];

fn english(words: &'static [&'static str]) -> Cues {
    Cues {
        language: Language::English,
        words,
    }
}

fn danish(words: &'static [&'static str]) -> Cues {
    Cues {
        language: Language::Danish,
        words,
    }
}

fn french(words: &'static [&'static str]) -> Cues {
    Cues {
        language: Language::French,
        words,
    }
}

fn guide(version: RubricVersion, dimension: Dimension) -> DimensionGuide {
    let multilingual = version == RubricVersion::V2;
    let mut notes: &'static [&'static str] = &[];
    let mut bands: &'static [&'static str] = &[];

    let (summary, mut cues) = match dimension {
        Dimension::Quality => (
            "Overall quality and pleasure. Use any mention of scores (e.g. 90 points = ~8, 95 points = ~9).",
            vec![english(&["exceptional", "outstanding", "disappointing", "simple"])],
        ),
        Dimension::Acidity => (
            "Freshness and acid structure.",
            vec![
                english(&["fresh", "crisp", "tart", "bright", "zippy", "lively", "sharp", "sour", "low acid", "flat", "flabby"]),
                danish(&["syre", "frisk", "syrlig"]),
            ],
        ),
        Dimension::Tannins => (
            "Grip and texture of the tannins.",
            vec![
                english(&["grippy", "firm", "chewy", "silky", "smooth", "velvety", "astringent", "drying", "fine-grained", "dusty", "soft tannins", "tannic"]),
                danish(&["tannin", "garvesyre"]),
            ],
        ),
        Dimension::Body => (
            "Weight and concentration.",
            vec![
                english(&["full-bodied", "medium-bodied", "light-bodied", "weighty", "substantial", "lean", "thin", "concentrated", "dense"]),
                danish(&["fyldig", "let", "kraftig"]),
            ],
        ),
        Dimension::Fruitiness => {
            notes = &["Low score if described as \"savory\" or \"earthy\" with little fruit."];
            (
                "Intensity of fruit character.",
                vec![
                    english(&["red fruits", "black fruits", "cherry", "plum", "raspberry", "citrus", "tropical", "stone fruit"]),
                    danish(&["frugt", "kirsebær", "jordbær", "hindbær", "solbær", "blomme"]),
                ],
            )
        }
        Dimension::Finish => (
            "Length of the aftertaste.",
            vec![
                english(&["long finish", "persistent", "lingering", "short finish"]),
                danish(&["eftersmag", "lang", "kort"]),
            ],
        ),
        Dimension::Complexity => (
            "Layering and evolution in the glass.",
            vec![
                english(&["complex", "layered", "multidimensional", "nuanced", "evolving", "simple", "straightforward"]),
                danish(&["kompleks", "lagdelt", "enkel"]),
            ],
        ),
        Dimension::Funky => {
            notes = if multilingual {
                &[
                    "Score based on SMELL AND TASTE ONLY, not production methods.",
                    "IMPORTANT: If ANY reviewer says the wine has \"too much\" of these characteristics, or explicitly complains about gunpowder, funkiness or natural wine taste, score 8 or higher.",
                    "If a descriptor is mentioned negatively or as a flaw, that means it is very present: score high.",
                ]
            } else {
                &["Score based on SMELL AND TASTE ONLY, not production methods."]
            };
            bands = FUNKY_BANDS;
            (
                "Unconventional, natural-wine style aromas and flavours.",
                vec![
                    english(&["funky", "wild", "natural", "earthy", "smoke", "gunpowder", "reduction", "reductive", "sulfur", "struck match", "volatile", "VA", "brett-like", "sweaty", "unconventional", "acquired taste", "natural wine character"]),
                    danish(&["funky", "vild", "naturvin", "jordagtig", "røg", "reduktiv", "ustabil", "elektrisk", "beskidt", "udfordrende", "naturlig"]),
                    french(&["sauvage", "terreux", "fume", "reduit", "volatile"]),
                ],
            )
        }
        Dimension::Brett => {
            notes = if multilingual {
                &[
                    "Also score higher if the wine is described as having strong terroir character in a specifically animal or earthy sense in any language.",
                    "IMPORTANT: If ANY reviewer explicitly mentions brett by name or says there is \"lots of brett\", score 8 or higher immediately. A complaint about brett means it is very present.",
                ]
            } else {
                &["A complaint about brett means it is very present."]
            };
            bands = BRETT_BANDS;
            (
                "Brettanomyces character: barnyard, leather, animal.",
                vec![
                    english(&["brett", "brettanomyces", "barnyard", "horse", "horse saddle", "stable", "wet dog", "band-aid", "earthy", "leather", "animal", "farm", "manure"]),
                    danish(&["hestestald", "stald", "hest", "lo", "staldlugt", "laeder", "dyrisk", "landlig", "bondegaard", "beskidt"]),
                    french(&["ecurie", "cheval", "cuir", "animal", "etable", "fumier"]),
                ],
            )
        }
        Dimension::Alcohol => {
            notes = &["Use the actual % if mentioned: under 12% = 3, 12-13% = 5, 13-14% = 7, 14-15% = 8, over 15% = 9-10."];
            (
                "Perceived and stated alcohol.",
                vec![
                    english(&["hot", "warming", "heady", "low alcohol", "light", "easy drinking"]),
                    danish(&["alkohol", "let drikkelig", "varm"]),
                ],
            )
        }
        Dimension::Sweetness => {
            notes = &["Bone dry = 1, dry = 2, off-dry = 4, semi-sweet = 6, sweet = 8+."];
            (
                "Residual sugar as perceived.",
                vec![
                    english(&["dry", "bone dry", "off-dry", "hint of sweetness", "semi-sweet", "sweet", "residual sugar"]),
                    danish(&["tor", "sod", "restsodme"]),
                ],
            )
        }
    };

    if !multilingual {
        cues.retain(|c| c.language == Language::English);
    }

    DimensionGuide {
        dimension,
        summary,
        cues,
        notes,
        bands,
    }
}
