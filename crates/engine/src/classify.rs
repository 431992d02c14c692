//! Heuristic occupation classification.
//!
//! School programs and offers are mapped onto a small closed set of
//! occupation families by keyword predicates. The predicate tables are plain
//! data evaluated first-match-wins, so extending them never touches control
//! flow.

use once_cell::sync::Lazy;
use pracehub_text::{normalize, token_in_text};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Occupation family of a program or offer shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Vehicle repair and maintenance.
    Auto,
    /// Agricultural and construction machinery.
    Agri,
    /// Cooking and food preparation.
    Kuchar,
    /// Waiting staff and hotel service.
    Cisnik,
    /// Bar service.
    Barman,
    /// Professional driving and logistics.
    Ridic,
    /// Welding and metalwork.
    Svarec,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 8] = [
        Category::Auto,
        Category::Agri,
        Category::Kuchar,
        Category::Cisnik,
        Category::Barman,
        Category::Ridic,
        Category::Svarec,
        Category::Other,
    ];

    /// Shard/manifest tag for this category.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Auto => "auto",
            Category::Agri => "agri",
            Category::Kuchar => "kuchar",
            Category::Cisnik => "cisnik",
            Category::Barman => "barman",
            Category::Ridic => "ridic",
            Category::Svarec => "svarec",
            Category::Other => "other",
        }
    }

    /// Category for a shard/manifest tag.
    pub fn from_tag(tag: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.tag() == tag)
    }
}

/// Ordered predicate table: the first category whose needle list hits the
/// normalized program name wins.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Auto, &["motorovych vozidel", "automechanik", "kfz"]),
    (Category::Agri, &["zemedelsk", "baumaschinen", "landmaschinen"]),
    (Category::Ridic, &["ridic", "spedit", "logist"]),
    (Category::Svarec, &["svarec", "svare"]),
    (Category::Barman, &["barman", "barist"]),
    (Category::Cisnik, &["cisnik", "servirk", "hotel"]),
    (Category::Kuchar, &["kuchar", "gastr"]),
];

/// Classify a program/offer description into a coarse category.
pub fn category_for_program(name: &str) -> Category {
    let key = normalize(name);
    if key.is_empty() {
        return Category::Other;
    }
    for (category, needles) in CATEGORY_RULES {
        if needles.iter().any(|needle| key.contains(needle)) {
            return *category;
        }
    }
    Category::Other
}

/// A fine-grained focus tag scoped to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Focus {
    /// Stable focus id, referenced by [`SearchQuery::focus`].
    ///
    /// [`SearchQuery::focus`]: pracehub_core::SearchQuery::focus
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
}

const fn focus(id: &'static str, label: &'static str) -> Focus {
    Focus { id, label }
}

const FOCUSES_AUTO: &[Focus] = &[
    focus("svarec", "Svářečský průkaz"),
    focus("diagnostika", "Diagnostika (OBD, elektro)"),
    focus("klima", "Klimatizace (AC)"),
    focus("ridicC", "Řidičák C / práce s užitkovými vozy"),
];
const FOCUSES_AGRI: &[Focus] = &[
    focus("svarec", "Svářečský průkaz"),
    focus("hydraulika", "Hydraulika / pneumatika"),
    focus("servis", "Servis v terénu"),
];
const FOCUSES_KUCHAR: &[Focus] = &[
    focus("cukrar", "Cukrářství / pečení"),
    focus("catering", "Catering / eventy"),
    focus("barista", "Káva / barista"),
];
const FOCUSES_CISNIK: &[Focus] = &[
    focus("catering", "Catering / eventy"),
    focus("barista", "Káva / barista"),
];
const FOCUSES_BARMAN: &[Focus] = &[
    focus("barista", "Káva / barista"),
    focus("catering", "Catering / eventy"),
];
const FOCUSES_RIDIC: &[Focus] = &[focus("ridicC", "Řidičák C / profesní průkaz")];
const FOCUSES_SVAREC: &[Focus] = &[focus("svarec", "Svářečský průkaz")];

/// Candidate focuses offered for each category.
pub fn focuses_for(category: Category) -> &'static [Focus] {
    match category {
        Category::Auto => FOCUSES_AUTO,
        Category::Agri => FOCUSES_AGRI,
        Category::Kuchar => FOCUSES_KUCHAR,
        Category::Cisnik => FOCUSES_CISNIK,
        Category::Barman => FOCUSES_BARMAN,
        Category::Ridic => FOCUSES_RIDIC,
        Category::Svarec | Category::Other => FOCUSES_SVAREC,
    }
}

/// Keyword sets matched against offer text when a focus is selected.
static FOCUS_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let table: &[(&str, &[&str])] = &[
        ("svarec", &["svarec", "svare", "welding", "tig", "mig", "mag"]),
        ("diagnostika", &["diagnost", "mechatron", "autoelektr", "elektr", "technolog"]),
        ("klima", &["klimatiz", "chlad", "chlaz", "chladar"]),
        ("ridicC", &["ridic", "naklad", "kamion", "tahac", "souprava", "logistik"]),
        ("hydraulika", &["hydraul", "pneumat"]),
        ("servis", &["servis", "technik", "montaz", "udrzb", "oprava"]),
        ("cukrar", &["cukrar", "pekar", "pekarst", "peciv", "dort", "dezert"]),
        ("catering", &["catering", "event", "banket", "raut", "svateb"]),
        ("barista", &["barista", "kava", "kavar", "coffee"]),
    ];
    table.iter().copied().collect()
});

/// Whether an offer's searchable text matches a focus.
///
/// An empty or unknown focus id matches everything; otherwise any keyword of
/// the focus must be present in the (already normalized) haystack.
pub fn focus_matches(haystack: &str, focus_id: &str) -> bool {
    let id = focus_id.trim();
    if id.is_empty() {
        return true;
    }
    let Some(keywords) = FOCUS_KEYWORDS.get(id).filter(|k| !k.is_empty()) else {
        return true;
    };
    keywords.iter().any(|kw| token_in_text(haystack, kw))
}

/// A recommended role for the classified program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Position title.
    pub title: &'static str,
    /// One-line note about the role.
    pub note: &'static str,
}

const fn role(title: &'static str, note: &'static str) -> Role {
    Role { title, note }
}

const ROLES_AUTO: &[Role] = &[
    role("Automechanik", "Servis osobních i užitkových vozů"),
    role("Mechanik opravář motorových vozidel", "Diagnostika a opravy"),
    role("KFZ-Mechatroniker", "Zahraničí / německé názvy"),
];
const ROLES_AGRI: &[Role] = &[
    role("Opravář zemědělských strojů", "Servis traktorů a techniky"),
    role("Mechanik zemědělské techniky", "Záruční i pozáruční servis"),
    role("Land-/Baumaschinenmechatroniker", "Zahraničí / německé názvy"),
];
const ROLES_KUCHAR: &[Role] = &[
    role("Kuchař", "Teplá/studená kuchyně"),
    role("Pomocný kuchař", "Základní příprava a výdej"),
    role("Koch", "Zahraničí / německé názvy"),
];
const ROLES_CISNIK: &[Role] = &[
    role("Číšník", "Obsluha, hotel, restaurace"),
    role("Servírka", "Obsluha, hotel, restaurace"),
    role("Kellner", "Zahraničí / německé názvy"),
];
const ROLES_BARMAN: &[Role] = &[
    role("Barman", "Bar, míchané nápoje"),
    role("Barista", "Káva a obsluha"),
];
const ROLES_RIDIC: &[Role] = &[
    role("Řidič", "Rozvoz, doprava, logistika"),
    role("Řidič nákladního vozidla", "Kamion / náklad"),
];
const ROLES_SVAREC: &[Role] = &[
    role("Svářeč", "MIG/MAG, TIG apod."),
    role("Zámečník", "Dílna / výroba"),
];
const ROLES_OTHER: &[Role] = &[role("Pracovník v oboru", "Upřesni obor nebo pozici")];

fn base_roles(category: Category) -> &'static [Role] {
    match category {
        Category::Auto => ROLES_AUTO,
        Category::Agri => ROLES_AGRI,
        Category::Kuchar => ROLES_KUCHAR,
        Category::Cisnik => ROLES_CISNIK,
        Category::Barman => ROLES_BARMAN,
        Category::Ridic => ROLES_RIDIC,
        Category::Svarec => ROLES_SVAREC,
        Category::Other => ROLES_OTHER,
    }
}

const EXTRA_SVAREC: &[Role] = &[
    role("Svářeč", "Doplněk k technickým oborům"),
    role("Zámečník", "Dílna / výroba"),
];
const EXTRA_DIAGNOSTIKA: &[Role] = &[role("Autoelektrikář", "Elektro a diagnostika")];
const EXTRA_KLIMA: &[Role] = &[role("Servis klimatizací", "AC systémy")];
const EXTRA_RIDICC: &[Role] = &[role("Mechanik (užitkové vozy)", "Kombinace řízení + servis")];
const EXTRA_HYDRAULIKA: &[Role] = &[role("Servisní technik hydrauliky", "Pumpy, hadice, okruhy")];
const EXTRA_SERVIS: &[Role] = &[role("Servisní technik (výjezdy)", "Práce v terénu")];
const EXTRA_CUKRAR: &[Role] = &[role("Cukrář", "Pečení, dezerty")];
const EXTRA_CATERING: &[Role] = &[role("Kuchař (catering)", "Akce a eventy")];
const EXTRA_BARISTA: &[Role] = &[role("Barista", "Káva, obsluha")];
const EXTRA_NONE: &[Role] = &[];

fn extra_roles(focus_id: &str) -> &'static [Role] {
    match focus_id {
        "svarec" => EXTRA_SVAREC,
        "diagnostika" => EXTRA_DIAGNOSTIKA,
        "klima" => EXTRA_KLIMA,
        "ridicC" => EXTRA_RIDICC,
        "hydraulika" => EXTRA_HYDRAULIKA,
        "servis" => EXTRA_SERVIS,
        "cukrar" => EXTRA_CUKRAR,
        "catering" => EXTRA_CATERING,
        "barista" => EXTRA_BARISTA,
        _ => EXTRA_NONE,
    }
}

/// Recommended roles for a category, extended by the selected focus.
///
/// Deduplicated by normalized title, first occurrence wins.
pub fn recommended_roles(category: Category, focus_id: Option<&str>) -> Vec<Role> {
    let mut out: Vec<Role> = base_roles(category).to_vec();
    if let Some(id) = focus_id.map(str::trim).filter(|id| !id.is_empty()) {
        out.extend_from_slice(extra_roles(id));
    }

    let mut seen = HashSet::new();
    out.retain(|r| seen.insert(normalize(r.title)));
    out
}

/// Result of classifying a program name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The matched occupation family.
    pub category: Category,
    /// Focuses offered for that family.
    pub focuses: &'static [Focus],
}

/// Classify a free-text program name into a category and its focus options.
pub fn classify(program_name: &str) -> Classification {
    let category = category_for_program(program_name);
    Classification { category, focuses: focuses_for(category) }
}

/// Wire shape of the school/program index.
///
/// Consumed only to derive a [`Category`] from a selected program; the
/// ranking core has no other use for schools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolIndex {
    /// All indexed schools.
    #[serde(default)]
    pub schools: Vec<School>,
}

/// A school record from the school/program index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// School display name.
    #[serde(default)]
    pub name: String,
    /// Offered study programs.
    #[serde(default)]
    pub programs: Vec<Program>,
}

/// One study program of a school.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Program code.
    #[serde(default)]
    pub code: String,
    /// Program name.
    #[serde(default)]
    pub name: String,
}

impl School {
    /// Category of the program selected by code (or name, when codeless).
    pub fn program_category(&self, selected: &str) -> Category {
        let program_name = self
            .programs
            .iter()
            .find(|p| {
                let id = if p.code.is_empty() { p.name.as_str() } else { p.code.as_str() };
                id == selected
            })
            .map(|p| p.name.as_str())
            .unwrap_or("");
        category_for_program(program_name)
    }
}
