//! Curated affiliation patterns for names the ISO table does not cover.
//!
//! Evaluated in order, case-insensitively, and only for affiliation blocks
//! that contain no ISO country name. Country aliases come first, then
//! institutions, then cities, and the short abbreviations last: "usa" is a
//! substring of "Busan", so it must not be tried before "South Korea".
//! Every target is a name from [`super::ISO_COUNTRIES`], so a country found
//! through an alias and through its ISO name lands in the same group.

/// Ordered `(pattern, country)` pairs.
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    // country aliases
    ("South Korea", "Korea, Republic of"),
    ("Czech Republic", "Czechia"),
    ("Taiwan", "Taiwan, Province of China"),
    ("Turkey", "Türkiye"),
    ("Palestine", "Palestine, State of"),
    ("Iran", "Iran, Islamic Republic of"),
    ("Vietnam", "Viet Nam"),
    ("Russia", "Russian Federation"),
    ("Tanzania", "Tanzania, United Republic of"),
    ("Bolivia", "Bolivia, Plurinational State of"),
    ("Venezuela", "Venezuela, Bolivarian Republic of"),
    ("Syria", "Syrian Arab Republic"),
    // institutions
    ("Gazi University", "Türkiye"),
    ("Kadir Has University", "Türkiye"),
    ("Yaşar University", "Türkiye"),
    ("Ozyegin University", "Türkiye"),
    ("Michigan State University", "United States"),
    ("Ryerson University", "Canada"),
    ("University of Alberta", "Canada"),
    ("Nitte Meenakshi Institute of Technology", "India"),
    ("SSN College of Engineering", "India"),
    ("Amazon", "United States"),
    ("Origin Energy", "Australia"),
    ("Fondazione Bruno Kessler", "Italy"),
    ("Red Tree Consulting", "United States"),
    ("FACT Inc", "United States"),
    ("Kennesaw State University", "United States"),
    ("Marquette University", "United States"),
    ("Teknobuilt Ltd", "India"),
    ("Symbiosis International", "India"),
    ("Nokia Bell Labs", "United States"),
    ("C Spire", "United States"),
    ("Cognizant Worldwide Ltd", "United States"),
    ("University of Southampton", "United Kingdom"),
    ("ARM Ltd", "United Kingdom"),
    ("Tenstorrent", "United Kingdom"),
    (
        "The Nelson Mandela African Institution of Science and Technology",
        "Tanzania, United Republic of",
    ),
    (
        "National University of Sciences and Technology (NUST)",
        "Pakistan",
    ),
    (
        "Vels Institute of Science Technology and Advanced Studies",
        "India",
    ),
    ("Purdue University", "United States"),
    ("Zhejiang University", "China"),
    ("Princeton University", "United States"),
    ("Ericsson Research", "Sweden"),
    ("University of Washington Tacoma", "United States"),
    ("Iowa State University", "United States"),
    ("University of Milan", "Italy"),
    ("IBM T.J. Watson Research Center", "United States"),
    ("University of Florida", "United States"),
    ("Peking University", "China"),
    ("Oakland University", "United States"),
    (
        "National Institute of Information and Communications Technology",
        "Japan",
    ),
    // cities
    ("Tehran", "Iran, Islamic Republic of"),
    ("Ankara", "Türkiye"),
    ("Istanbul", "Türkiye"),
    ("Izmir", "Türkiye"),
    ("Denizli", "Türkiye"),
    ("Trabzon", "Türkiye"),
    ("Eskişehir", "Türkiye"),
    ("Kocaeli", "Türkiye"),
    ("Antalya", "Türkiye"),
    ("Muğla", "Türkiye"),
    // abbreviations
    ("USA", "United States"),
    ("U.S.", "United States"),
    ("U.K.", "United Kingdom"),
];
