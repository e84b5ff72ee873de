//! Request-scoped domain types shared by the pipeline stages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A web page that contributed text to an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub link: String,
}

/// The eleven scored characteristics, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Quality,
    Acidity,
    Tannins,
    Body,
    Fruitiness,
    Finish,
    Complexity,
    Funky,
    Brett,
    Alcohol,
    Sweetness,
}

impl Dimension {
    pub const ALL: [Dimension; 11] = [
        Dimension::Quality,
        Dimension::Acidity,
        Dimension::Tannins,
        Dimension::Body,
        Dimension::Fruitiness,
        Dimension::Finish,
        Dimension::Complexity,
        Dimension::Funky,
        Dimension::Brett,
        Dimension::Alcohol,
        Dimension::Sweetness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Quality => "Quality",
            Dimension::Acidity => "Acidity",
            Dimension::Tannins => "Tannins",
            Dimension::Body => "Body",
            Dimension::Fruitiness => "Fruitiness",
            Dimension::Finish => "Finish",
            Dimension::Complexity => "Complexity",
            Dimension::Funky => "Funky",
            Dimension::Brett => "Brett",
            Dimension::Alcohol => "Alcohol",
            Dimension::Sweetness => "Sweetness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Highest score any dimension may carry.
pub const MAX_SCORE: u8 = 10;

/// A score value outside `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("score {value} for {dimension} is outside 0..={MAX_SCORE}")]
pub struct ScoreOutOfRange {
    pub dimension: Dimension,
    pub value: i64,
}

/// Integer scores for every [`Dimension`]; each field lies in `0..=10`.
///
/// Deserialisation requires all eleven keys and rejects out-of-range values,
/// so a parsed vector is always complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreVector {
    #[serde(deserialize_with = "score_field")]
    pub quality: u8,
    #[serde(deserialize_with = "score_field")]
    pub acidity: u8,
    #[serde(deserialize_with = "score_field")]
    pub tannins: u8,
    #[serde(deserialize_with = "score_field")]
    pub body: u8,
    #[serde(deserialize_with = "score_field")]
    pub fruitiness: u8,
    #[serde(deserialize_with = "score_field")]
    pub finish: u8,
    #[serde(deserialize_with = "score_field")]
    pub complexity: u8,
    #[serde(deserialize_with = "score_field")]
    pub funky: u8,
    #[serde(deserialize_with = "score_field")]
    pub brett: u8,
    #[serde(deserialize_with = "score_field")]
    pub alcohol: u8,
    #[serde(deserialize_with = "score_field")]
    pub sweetness: u8,
}

fn score_field<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_SCORE)
        .ok_or_else(|| {
            serde::de::Error::custom(format!("score {value} is outside 0..={MAX_SCORE}"))
        })
}

impl ScoreVector {
    /// Build a vector from values listed in [`Dimension::ALL`] order.
    pub fn from_values(values: [i64; 11]) -> Result<Self, ScoreOutOfRange> {
        let mut checked = [0u8; 11];
        for ((slot, value), dimension) in checked.iter_mut().zip(values).zip(Dimension::ALL) {
            *slot = u8::try_from(value)
                .ok()
                .filter(|v| *v <= MAX_SCORE)
                .ok_or(ScoreOutOfRange { dimension, value })?;
        }
        let [quality, acidity, tannins, body, fruitiness, finish, complexity, funky, brett, alcohol, sweetness] =
            checked;
        Ok(Self {
            quality,
            acidity,
            tannins,
            body,
            fruitiness,
            finish,
            complexity,
            funky,
            brett,
            alcohol,
            sweetness,
        })
    }

    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Quality => self.quality,
            Dimension::Acidity => self.acidity,
            Dimension::Tannins => self.tannins,
            Dimension::Body => self.body,
            Dimension::Fruitiness => self.fruitiness,
            Dimension::Finish => self.finish,
            Dimension::Complexity => self.complexity,
            Dimension::Funky => self.funky,
            Dimension::Brett => self.brett,
            Dimension::Alcohol => self.alcohol,
            Dimension::Sweetness => self.sweetness,
        }
    }

    /// Scores paired with their dimension, in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Wine colour category; only used to pick chart styling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WineType {
    #[default]
    Red,
    White,
    Rose,
    Orange,
    /// Anything the model returned that is not a known category.
    Other(String),
}

impl WineType {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "red" => WineType::Red,
            "white" => WineType::White,
            "rose" | "rosé" => WineType::Rose,
            "orange" => WineType::Orange,
            _ => WineType::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WineType::Red => "Red",
            WineType::White => "White",
            WineType::Rose => "Rose",
            WineType::Orange => "Orange",
            WineType::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WineType::Other(_))
    }
}

impl fmt::Display for WineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WineType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for WineType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .map(|l| WineType::parse(&l))
            .unwrap_or_else(|| WineType::Other(String::new())))
    }
}

/// Structured scoring returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default = "missing_wine_type")]
    pub wine_type: WineType,
    pub scores: ScoreVector,
}

fn missing_wine_type() -> WineType {
    WineType::Other(String::new())
}
