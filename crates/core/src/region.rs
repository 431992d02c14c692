//! Fixed table of CZ NUTS-3 regions (kraje).

/// A Czech first-level administrative region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// NUTS-3 code, e.g. `CZ032`.
    pub code: &'static str,
    /// Full official name.
    pub name: &'static str,
    /// Short label for compact display.
    pub short: &'static str,
}

/// All 14 regions, in the upstream portal's order.
pub const CZ_REGIONS: [Region; 14] = [
    Region { code: "CZ010", name: "Hlavní město Praha", short: "Praha" },
    Region { code: "CZ020", name: "Středočeský kraj", short: "Středočeský" },
    Region { code: "CZ031", name: "Jihočeský kraj", short: "Jihočeský" },
    Region { code: "CZ032", name: "Plzeňský kraj", short: "Plzeňský" },
    Region { code: "CZ041", name: "Karlovarský kraj", short: "Karlovarský" },
    Region { code: "CZ042", name: "Ústecký kraj", short: "Ústecký" },
    Region { code: "CZ051", name: "Liberecký kraj", short: "Liberecký" },
    Region { code: "CZ052", name: "Královéhradecký kraj", short: "Královéhradecký" },
    Region { code: "CZ053", name: "Pardubický kraj", short: "Pardubický" },
    Region { code: "CZ063", name: "Kraj Vysočina", short: "Vysočina" },
    Region { code: "CZ064", name: "Jihomoravský kraj", short: "Jihomoravský" },
    Region { code: "CZ071", name: "Olomoucký kraj", short: "Olomoucký" },
    Region { code: "CZ072", name: "Zlínský kraj", short: "Zlínský" },
    Region { code: "CZ080", name: "Moravskoslezský kraj", short: "Moravskoslezský" },
];

/// Full region name for a NUTS-3 code.
pub fn region_name(code: &str) -> Option<&'static str> {
    CZ_REGIONS.iter().find(|r| r.code == code).map(|r| r.name)
}

/// Short region label for a NUTS-3 code.
pub fn region_short(code: &str) -> Option<&'static str> {
    CZ_REGIONS.iter().find(|r| r.code == code).map(|r| r.short)
}
