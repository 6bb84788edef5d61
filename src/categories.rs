// Mapping of free-text EVTYPE labels onto a fixed set of categories.
//
// The labels in the dataset were typed by hand over six decades, so the same
// phenomenon shows up under dozens of spellings ("TSTM WIND", "THUNDERSTORM
// WINDS", "THUNDERSTORMW"...). Rules are tested in order against the
// lower-cased label and the first rule with a matching keyword wins, so
// anything more specific has to come before the catch-all wind rule.

pub struct CategoryRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const RULES: [CategoryRule; 14] = [
    CategoryRule {
        name: "Tornado",
        keywords: &["tornado", "torndao", "funnel", "waterspout", "gustnado", "landspout", "wall cloud"],
    },
    CategoryRule {
        name: "Extreme Heat",
        keywords: &["heat", "hot", "warm", "hyperthermia", "high temp", "record high"],
    },
    CategoryRule {
        name: "Hurricane/Tropical Storm",
        keywords: &["hurricane", "typhoon", "tropical"],
    },
    CategoryRule {
        name: "Coastal/Marine",
        keywords: &[
            "surge", "tide", "tsunami", "seiche", "rip current", "surf", "rough sea", "high sea",
            "heavy sea", "marine", "swell", "rogue wave", "high waves", "coastal", "beach",
            "astronomical",
        ],
    },
    CategoryRule {
        name: "Flood",
        keywords: &[
            "flood", "fld", "flash", "dam break", "dam failure", "high water", "rising water",
            "urban", "stream", "ice jam",
        ],
    },
    CategoryRule {
        name: "Thunderstorm/Lightning",
        keywords: &[
            "thunderstorm", "tstm", "thunder", "lightning", "lighting", "ligntning", "microburst",
            "downburst", "severe storm",
        ],
    },
    CategoryRule {
        name: "Hail",
        keywords: &["hail"],
    },
    CategoryRule {
        name: "Winter Weather",
        keywords: &[
            "blizzard", "snow", "ice", "icy", "sleet", "freez", "frost", "winter", "wintry",
            "avalanche", "avalance", "glaze", "mixed precip",
        ],
    },
    CategoryRule {
        name: "Extreme Cold",
        keywords: &["cold", "chill", "hypothermia", "low temp", "record low", "cool"],
    },
    CategoryRule {
        name: "Drought/Dust",
        keywords: &["drought", "dry", "dust"],
    },
    CategoryRule {
        name: "Heavy Rain",
        keywords: &["rain", "precip", "shower", "wet"],
    },
    CategoryRule {
        name: "Wildfire",
        keywords: &["fire", "smoke"],
    },
    CategoryRule {
        name: "Landslide",
        keywords: &["slide", "mud", "landslump", "erosion"],
    },
    CategoryRule {
        name: "High Wind",
        keywords: &["wind", "wnd", "gust", "turbulence"],
    },
];

/// Label used when EVTYPE is blank, so a category is always present.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Canonical(&'static str),
    /// No rule matched; carries the trimmed original label, upper-cased so
    /// labels differing only in case share a group.
    Raw(String),
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Category::Canonical(name) => name,
            Category::Raw(label) => label,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Category::Canonical(_))
    }

    pub fn into_name(self) -> String {
        match self {
            Category::Canonical(name) => name.to_string(),
            Category::Raw(label) => label,
        }
    }
}

pub fn classify(label: &str) -> Category {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Category::Raw(UNKNOWN_LABEL.to_string());
    }
    let lower = trimmed.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| Category::Canonical(rule.name))
        .unwrap_or_else(|| Category::Raw(trimmed.to_uppercase()))
}

pub fn canonical_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|r| r.name)
}
