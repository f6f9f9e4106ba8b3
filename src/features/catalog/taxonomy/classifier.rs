//! Country → continent classification
//!
//! One canonical table keyed by ISO 3166-1 alpha-2 code decides the continent.
//! Country names resolve to a code first, through an accent and case insensitive
//! alias table. Anything unknown lands in [`Continent::Otros`].

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::UNKNOWN_COUNTRY_CODE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Continent {
    #[serde(rename = "América")]
    America,
    Europa,
    Asia,
    #[serde(rename = "África")]
    Africa,
    #[serde(rename = "Oceanía")]
    Oceania,
    Otros,
}

impl Continent {
    pub const ALL: [Continent; 6] = [
        Continent::America,
        Continent::Europa,
        Continent::Asia,
        Continent::Africa,
        Continent::Oceania,
        Continent::Otros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Continent::America => "América",
            Continent::Europa => "Europa",
            Continent::Asia => "Asia",
            Continent::Africa => "África",
            Continent::Oceania => "Oceanía",
            Continent::Otros => "Otros",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Continent::America => "🌎",
            Continent::Europa | Continent::Africa => "🌍",
            Continent::Asia | Continent::Oceania => "🌏",
            Continent::Otros => "🌐",
        }
    }

    /// Parses a label typed with or without accents, in any case.
    ///
    /// "Sin clasificar" is accepted as a legacy spelling of `Otros`.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded = fold(label);
        if folded == "sin clasificar" {
            return Some(Continent::Otros);
        }
        Self::ALL.into_iter().find(|c| fold(c.label()) == folded)
    }

    /// Total over any input: unknown, empty or malformed codes give `Otros`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "ar" | "br" | "cl" | "co" | "us" | "mx" | "pe" | "ca" | "ec" | "ve" | "uy" | "py"
            | "bo" | "pa" | "cr" | "ni" | "hn" | "gt" | "sv" | "bz" | "cu" | "do" | "ht"
            | "jm" => Continent::America,
            "es" | "fr" | "de" | "it" | "gb" | "pt" | "nl" | "be" | "ch" | "at" | "se" | "no"
            | "dk" | "fi" | "pl" | "cz" | "hu" | "ro" | "bg" | "hr" | "gr" | "ie" | "sk"
            | "si" | "ru" => Continent::Europa,
            "cn" | "jp" | "in" | "kr" | "th" | "vn" | "my" | "sg" | "ph" | "id" | "pk" | "bd"
            | "ir" | "iq" | "sa" | "ae" | "tr" | "il" | "jo" | "lb" => Continent::Asia,
            "za" | "eg" | "ma" | "ng" | "ke" | "gh" | "et" | "tz" | "ug" | "mz" | "mg" | "ao"
            | "zm" | "zw" | "bw" | "na" => Continent::Africa,
            "au" | "nz" | "fj" | "pg" | "sb" | "vu" | "ws" | "to" => Continent::Oceania,
            _ => Continent::Otros,
        }
    }

    pub fn from_country_name(name: &str) -> Self {
        code_for_name(name)
            .map(Self::from_code)
            .unwrap_or(Continent::Otros)
    }
}

impl std::fmt::Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Spanish country names as they appear in the catalog, with their codes
const COUNTRY_NAME_CODES: &[(&str, &str)] = &[
    // América
    ("Colombia", "co"),
    ("Estados Unidos", "us"),
    ("México", "mx"),
    ("Brasil", "br"),
    ("Argentina", "ar"),
    ("Chile", "cl"),
    ("Perú", "pe"),
    ("Ecuador", "ec"),
    ("Venezuela", "ve"),
    ("Uruguay", "uy"),
    ("Paraguay", "py"),
    ("Bolivia", "bo"),
    ("Canadá", "ca"),
    ("Panamá", "pa"),
    ("Costa Rica", "cr"),
    ("Nicaragua", "ni"),
    ("Honduras", "hn"),
    ("Guatemala", "gt"),
    ("El Salvador", "sv"),
    ("Belice", "bz"),
    ("Cuba", "cu"),
    ("República Dominicana", "do"),
    ("Haití", "ht"),
    ("Jamaica", "jm"),
    // Europa
    ("España", "es"),
    ("Francia", "fr"),
    ("Italia", "it"),
    ("Alemania", "de"),
    ("Reino Unido", "gb"),
    ("Portugal", "pt"),
    ("Suiza", "ch"),
    ("Austria", "at"),
    ("Bélgica", "be"),
    ("Holanda", "nl"),
    ("Países Bajos", "nl"),
    ("Suecia", "se"),
    ("Noruega", "no"),
    ("Dinamarca", "dk"),
    ("Finlandia", "fi"),
    ("Polonia", "pl"),
    ("Grecia", "gr"),
    ("Irlanda", "ie"),
    ("Rusia", "ru"),
    // Asia
    ("Japón", "jp"),
    ("China", "cn"),
    ("India", "in"),
    ("Corea del Sur", "kr"),
    ("Tailandia", "th"),
    ("Singapur", "sg"),
    ("Malasia", "my"),
    ("Indonesia", "id"),
    ("Filipinas", "ph"),
    ("Vietnam", "vn"),
    ("Turquía", "tr"),
    ("Israel", "il"),
    ("Arabia Saudita", "sa"),
    ("Emiratos Árabes Unidos", "ae"),
    // África
    ("Sudáfrica", "za"),
    ("Egipto", "eg"),
    ("Marruecos", "ma"),
    ("Nigeria", "ng"),
    ("Kenia", "ke"),
    ("Ghana", "gh"),
    // Oceanía
    ("Australia", "au"),
    ("Nueva Zelanda", "nz"),
];

lazy_static! {
    static ref CODE_BY_FOLDED_NAME: HashMap<String, &'static str> = COUNTRY_NAME_CODES
        .iter()
        .map(|(name, code)| (fold(name), *code))
        .collect();

    /// Flag image URLs such as ".../w80/co.png" carry the code as file stem
    static ref FLAG_URL_CODE: Regex =
        Regex::new(r"(?i)/([a-z]{2})\.(?:png|svg|webp|jpe?g|gif)(?:\?.*)?$").unwrap();
}

/// Lowercases and strips Spanish diacritics so "Perú", "peru" and "PERU" compare equal.
pub(crate) fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

pub fn code_for_name(name: &str) -> Option<&'static str> {
    CODE_BY_FOLDED_NAME.get(&fold(name)).copied()
}

/// Extracts a two-letter code from a flag reference, whether given bare or as a URL.
pub fn flag_code(flag: &str) -> Option<String> {
    let flag = flag.trim();
    if flag.len() == 2 && flag.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(flag.to_ascii_lowercase());
    }
    FLAG_URL_CODE
        .captures(flag)
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Result of classifying a country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub continent: Continent,
    pub code: String,
}

/// Classifies a country from its name and flag reference.
///
/// The flag's own code wins when it maps to a continent; otherwise the name decides.
/// The code falls back to the name's code, then to `"xx"`.
pub fn classify(name: &str, flag: &str) -> Classification {
    let from_flag = flag_code(flag);
    let from_name = code_for_name(name);

    let continent = match from_flag.as_deref().map(Continent::from_code) {
        Some(continent) if continent != Continent::Otros => continent,
        _ => from_name
            .map(Continent::from_code)
            .unwrap_or(Continent::Otros),
    };

    let code = from_flag
        .or_else(|| from_name.map(String::from))
        .unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.to_string());

    Classification { continent, code }
}
