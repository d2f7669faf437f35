//! School records as loaded from the census table.
//!
//! [`RawSchoolRow`] mirrors the columns returned by the load query, with every
//! field nullable. [`SchoolRecord`] is the typed row the aggregator works on;
//! its derived columns are computed once in [`SchoolRecord::from_raw`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Census code for a school that is currently operating.
pub const OPERATIONAL: i64 = 1;

/// `TP_DEPENDENCIA` value for privately administered schools.
pub const PRIVATE_DEPENDENCY: i64 = 4;

pub const INDICATOR_COUNT: usize = 8;

/// One of the eight physical-accessibility attributes, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Corrimao,
    Elevador,
    PisosTateis,
    VaoLivre,
    Rampas,
    SinalSonoro,
    SinalTatil,
    SinalVisual,
}

impl Indicator {
    pub const ALL: [Indicator; INDICATOR_COUNT] = [
        Indicator::Corrimao,
        Indicator::Elevador,
        Indicator::PisosTateis,
        Indicator::VaoLivre,
        Indicator::Rampas,
        Indicator::SinalSonoro,
        Indicator::SinalTatil,
        Indicator::SinalVisual,
    ];

    /// Position in [`Indicator::ALL`], used to index flag arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label shown on charts and in exports.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Corrimao => "Corrimão",
            Indicator::Elevador => "Elevador",
            Indicator::PisosTateis => "Pisos Táteis",
            Indicator::VaoLivre => "Vão Livre",
            Indicator::Rampas => "Rampas",
            Indicator::SinalSonoro => "Sinal Sonoro",
            Indicator::SinalTatil => "Sinal Tátil",
            Indicator::SinalVisual => "Sinal Visual",
        }
    }

    /// Source column in the census table.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Corrimao => "IN_ACESSIBILIDADE_CORRIMAO",
            Indicator::Elevador => "IN_ACESSIBILIDADE_ELEVADOR",
            Indicator::PisosTateis => "IN_ACESSIBILIDADE_PISOS_TATEIS",
            Indicator::VaoLivre => "IN_ACESSIBILIDADE_VAO_LIVRE",
            Indicator::Rampas => "IN_ACESSIBILIDADE_RAMPAS",
            Indicator::SinalSonoro => "IN_ACESSIBILIDADE_SINAL_SONORO",
            Indicator::SinalTatil => "IN_ACESSIBILIDADE_SINAL_TATIL",
            Indicator::SinalVisual => "IN_ACESSIBILIDADE_SINAL_VISUAL",
        }
    }

    /// Column alias used by the load query and by CSV sources.
    pub fn alias(self) -> &'static str {
        match self {
            Indicator::Corrimao => "corrimao",
            Indicator::Elevador => "elevador",
            Indicator::PisosTateis => "pisos_tateis",
            Indicator::VaoLivre => "vao_livre",
            Indicator::Rampas => "rampas",
            Indicator::SinalSonoro => "sinal_sonoro",
            Indicator::SinalTatil => "sinal_tatil",
            Indicator::SinalVisual => "sinal_visual",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Administrative category derived from the dependency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchoolType {
    #[serde(rename = "Pública")]
    Public,
    #[serde(rename = "Privada")]
    Private,
}

impl SchoolType {
    pub fn from_dependency(code: Option<i64>) -> Self {
        if code == Some(PRIVATE_DEPENDENCY) {
            SchoolType::Private
        } else {
            SchoolType::Public
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SchoolType::Public => "Pública",
            SchoolType::Private => "Privada",
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchoolType {
    type Err = String;

    /// Matches the dropdown labels exactly (case-sensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pública" => Ok(SchoolType::Public),
            "Privada" => Ok(SchoolType::Private),
            other => Err(format!(
                "unknown school type '{other}', expected 'Pública' or 'Privada'"
            )),
        }
    }
}

/// A single row as returned by the load query or read from a CSV source.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RawSchoolRow {
    pub state: Option<String>,
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub dependency: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub internet: Option<i64>,

    // accessibility indicators
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub corrimao: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub elevador: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub pisos_tateis: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub vao_livre: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub rampas: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub sinal_sonoro: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub sinal_tatil: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_coded")]
    pub sinal_visual: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_coded")]
    pub operational_status: Option<i64>,
}

/// A census code as stored by the source: exports write the same column as
/// an integer, a float or a boolean depending on how the table was loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CodedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CodedValue {
    /// Integer code for this value. Non-finite floats count as missing.
    pub fn to_code(self) -> Option<i64> {
        match self {
            CodedValue::Int(v) => Some(v),
            CodedValue::Float(v) if v.is_finite() => Some(v as i64),
            CodedValue::Float(_) => None,
            CodedValue::Bool(v) => Some(i64::from(v)),
        }
    }

    /// Parses a text cell. Returns `Ok(None)` for an empty cell.
    pub fn parse(text: &str) -> Result<Option<Self>, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Some(CodedValue::Int(v)));
        }
        if let Ok(v) = text.parse::<f64>() {
            return Ok(Some(CodedValue::Float(v)));
        }
        match text {
            "true" | "True" | "TRUE" => Ok(Some(CodedValue::Bool(true))),
            "false" | "False" | "FALSE" => Ok(Some(CodedValue::Bool(false))),
            other => Err(format!("'{other}' is not an integer, float or boolean code")),
        }
    }
}

fn deserialize_coded<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;
    let value = match text {
        Some(text) => CodedValue::parse(&text).map_err(serde::de::Error::custom)?,
        None => None,
    };
    Ok(value.and_then(CodedValue::to_code))
}

impl RawSchoolRow {
    pub fn indicator(&self, indicator: Indicator) -> Option<i64> {
        match indicator {
            Indicator::Corrimao => self.corrimao,
            Indicator::Elevador => self.elevador,
            Indicator::PisosTateis => self.pisos_tateis,
            Indicator::VaoLivre => self.vao_livre,
            Indicator::Rampas => self.rampas,
            Indicator::SinalSonoro => self.sinal_sonoro,
            Indicator::SinalTatil => self.sinal_tatil,
            Indicator::SinalVisual => self.sinal_visual,
        }
    }

    pub fn set_indicator(&mut self, indicator: Indicator, value: Option<i64>) {
        let slot = match indicator {
            Indicator::Corrimao => &mut self.corrimao,
            Indicator::Elevador => &mut self.elevador,
            Indicator::PisosTateis => &mut self.pisos_tateis,
            Indicator::VaoLivre => &mut self.vao_livre,
            Indicator::Rampas => &mut self.rampas,
            Indicator::SinalSonoro => &mut self.sinal_sonoro,
            Indicator::SinalTatil => &mut self.sinal_tatil,
            Indicator::SinalVisual => &mut self.sinal_visual,
        };
        *slot = value;
    }

    pub fn is_operational(&self) -> bool {
        self.operational_status == Some(OPERATIONAL)
    }
}

/// A typed school row with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    pub state: String,
    pub region: String,
    pub dependency_code: Option<i64>,
    /// `None` when the census left the internet flag empty.
    pub has_internet: Option<bool>,
    pub indicators: [bool; INDICATOR_COUNT],
    pub operational_status: i64,

    // derived
    pub school_type: SchoolType,
    pub has_all_accessibility: bool,
    pub has_no_accessibility: bool,
}

impl SchoolRecord {
    /// Converts a raw row, treating missing indicators as `false` and any
    /// non-zero code as `true`.
    pub fn from_raw(raw: &RawSchoolRow) -> Self {
        let mut indicators = [false; INDICATOR_COUNT];
        for indicator in Indicator::ALL {
            indicators[indicator.index()] = raw.indicator(indicator).is_some_and(|v| v != 0);
        }

        let present = indicators.iter().filter(|&&flag| flag).count();

        SchoolRecord {
            state: raw.state.clone().unwrap_or_default(),
            region: raw.region.clone().unwrap_or_default(),
            dependency_code: raw.dependency,
            has_internet: raw.internet.map(|v| v != 0),
            indicators,
            operational_status: raw.operational_status.unwrap_or_default(),
            school_type: SchoolType::from_dependency(raw.dependency),
            has_all_accessibility: present == INDICATOR_COUNT,
            has_no_accessibility: present == 0,
        }
    }

    pub fn has(&self, indicator: Indicator) -> bool {
        self.indicators[indicator.index()]
    }
}
