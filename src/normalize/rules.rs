//! Normalization rule tables
//!
//! Ordered literal rule lists consumed by the generic drivers in this
//! module. Order matters for the salt prefixes (longest compound forms
//! first) and the suffix list is applied to a bounded fixed point.
//!
//! All entries are accent-free: inputs are diacritic-stripped before any
//! table lookup.

/// Upper bound on salt-suffix stripping passes; guarantees termination even
/// on adversarial names.
pub const MAX_SUFFIX_PASSES: usize = 8;

/// Salt prefixes appearing before the base molecule name.
/// Example: "CHLORHYDRATE DE MEMANTINE" -> "MEMANTINE".
pub const SALT_PREFIXES: &[&str] = &[
    // Compound prefixes first so the longest match wins
    "FUMARATE ACIDE DE",
    "HEMIFUMARATE DE",
    "CHLORHYDRATE DIHYDRATE DE",
    "DIPROPIONATE DE",
    "DIPROPIONATE D'",
    // Standard salt prefixes
    "ACETATE DE",
    "ACETATE D'",
    "ASCORBATE DE",
    "ASCORBATE D'",
    "BENZOATE DE",
    "BENZOATE D'",
    "BICARBONATE DE",
    "BICARBONATE D'",
    "BROMHYDRATE DE",
    "BROMHYDRATE D'",
    "CARBONATE DE",
    "CARBONATE D'",
    "CHLORHYDRATE D'",
    "CHLORHYDRATE DE",
    "CITRATE DE",
    "CITRATE D'",
    "FUMARATE DE",
    "FUMARATE D'",
    "GLUCONATE DE",
    "GLUCONATE D'",
    "LACTATE DE",
    "LACTATE D'",
    "MALEATE DE",
    "MALATE DE",
    "MALATE D'",
    "NITRATE DE",
    "NITRATE D'",
    "OXALATE DE",
    "OXALATE D'",
    "PHOSPHATE DE",
    "PHOSPHATE D'",
    "PROPIONATE DE",
    "PROPIONATE D'",
    "SUCCINATE DE",
    "SUCCINATE D'",
    "SULFATE DE",
    "SULFATE D'",
    "TARTRATE DE",
    "TARTRATE D'",
    "TOSILATE DE",
    "TOSYLATE DE",
];

/// Salt and solvate suffixes appearing after the base molecule name.
/// Stripped iteratively: "VALSARTAN DISODIQUE MONOHYDRATE" loses both.
pub const SALT_SUFFIXES: &[&str] = &[
    "MAGNESIQUE DIHYDRATE",
    "MAGNESIQUE TRIHYDRATE",
    "MONOSODIQUE ANHYDRE",
    // Mineral adjectives
    "SODIQUE",
    "POTASSIQUE",
    "CALCIQUE",
    "MAGNESIQUE",
    "LITHIQUE",
    "ZINCIQUE",
    "MONOSODIQUE",
    "DISODIQUE",
    "DIPOTASSIQUE",
    "MONOPOTASSIQUE",
    "BASE",
    "DE SODIUM",
    "DE POTASSIUM",
    "DE CALCIUM",
    "DE MAGNESIUM",
    "ARGININE",
    "TERT-BUTYLAMINE",
    "TERT BUTYLAMINE",
    "TERTBUTYLAMINE",
    "ERBUMINE",
    "OLAMINE",
    // Hydrate and solvate markers
    "ANHYDRE",
    "HEMIPENTAHYDRATE",
    "HEMIHYDRATE",
    "MONOHYDRATE",
    "DIHYDRATE",
    "TRIHYDRATE",
    "PENTAHYDRATE",
    "SESQUIHYDRATE",
    // Salt anions
    "TOSILATE",
    "MALEATE",
    "CHLORHYDRATE",
    "SULFATE",
    "TARTRATE",
    "BESILATE",
    "MESILATE",
    "SUCCINATE",
    "FUMARATE",
    "OXALATE",
    "CITRATE",
    "ACETATE",
    "LACTATE",
    "VALERATE",
    "PROPIONATE",
    "BUTYRATE",
    "PHOSPHATE",
    "NITRATE",
    "BROMHYDRATE",
];

/// Mineral tokens preserved when they constitute the whole name, so
/// electrolytes are not over-stripped into a bare anion.
pub const MINERAL_TOKENS: &[&str] = &[
    "MAGNESIUM",
    "MAGNESIQUE",
    "SODIUM",
    "POTASSIUM",
    "CALCIUM",
    "MONOSODIQUE",
    "DISODIQUE",
    "ZINC",
];

/// Anion cores of pure inorganic salts ("CHLORURE DE SODIUM").
pub const INORGANIC_CORES: &[&str] = &[
    "CHLORURE",
    "PHOSPHATE",
    "CARBONATE",
    "BICARBONATE",
    "SULFATE",
    "NITRATE",
    "HYDROXYDE",
    "OXYDE",
];

/// Modifiers forming inorganic pairs ("PHOSPHATE MONOPOTASSIQUE").
pub const INORGANIC_MODIFIERS: &[&str] = &[
    "MONOPOTASSIQUE",
    "DIPOTASSIQUE",
    "MONOSODIQUE",
    "DISODIQUE",
];

/// Marketing and packaging words that pollute labels.
pub const NOISE_WORDS: &[&str] = &[
    "RESERVE A L'ORDONNANCE",
    "RESERVE A L'HOPITAL",
    "RESERVE HOSPITALIER",
    "RESERVE",
    "MEDICAMENT",
    "EQUIVALENT",
    "EQUIVALENTE",
    "GENERIQUE",
    "PRINCEPS",
    "AUTORISE",
    "AUTORISEE",
    "SANS CONSERVATEUR",
    "BOITE",
    "CONDITIONNEMENT",
    "UNITE",
    "DOSE",
    "DOSES",
    "FLACON",
    "FLACONS",
    "TUBE",
    "TUBES",
    "SACHET",
    "SACHETS",
    "PLAQUETTE",
    "PLAQUETTES",
    "STYLO",
    "STYLOS",
    "SERINGUE",
    "SERINGUES",
    "AMPOULE",
    "AMPOULES",
    "CARTOUCHE",
    "CARTOUCHES",
    "POUR CENT",
    "POUR MILLE",
];

/// Segment markers removed from the head of labels.
pub const PREFIX_STOP_WORDS: &[&str] = &[
    "RESERVE",
    "MEDICAMENT",
    "SPECIALITE",
    "SUBSTANCE",
    "EQUIVALENT",
    "GENERIQUE",
    "PRINCEPS",
    "AUTORISE",
    "AUTORISEE",
];

/// Population markers that must not split clusters.
pub const TARGET_POPULATION_TOKENS: &[&str] = &[
    "ADULTE",
    "ADULTES",
    "ENFANT",
    "ENFANTS",
    "NOURRISSON",
    "NOURRISSONS",
    "BEBE",
    "BEBES",
];

/// Administration-form hints re-injected into clustering keys so radically
/// different routes never merge.
pub const FORM_HINTS: &[&str] = &[
    "CREME",
    "COLLYRE",
    "OPHTALMIQUE",
    "INJECTABLE",
    "PERFUSION",
    "POMMADE",
    "SOLUTION BUVABLE",
    "SIROP",
    "SUSPENSION",
    "COMPRIME",
    "CAPSULE",
];

/// Oral solid form tokens; tablet/capsule variants share one cluster.
pub const ORAL_FORM_TOKENS: &[&str] = &[
    "COMPRIME PELLICULE",
    "COMPRIMES PELLICULES",
    "COMPRIME",
    "COMPRIMES",
    "PELLICULE",
    "PELLICULES",
    "SECABLE",
    "SECABLES",
    "GELULE",
    "GELULES",
    "A LIBERATION PROLONGEE",
    "LIBERATION PROLONGEE",
    "LP",
    "RETARD",
];

/// Galenic form words stripped from product labels when deriving brands.
pub const FORM_WORDS: &[&str] = &[
    "COMPRIME",
    "COMPRIMES",
    "GELULE",
    "GELULES",
    "CAPSULE",
    "CAPSULES",
    "SOLUTION",
    "POMMADE",
    "CREME",
    "PELLICULE",
    "PELLICULEE",
    "PELLICULES",
    "COLLYRE",
    "SIROP",
    "SUSPENSION",
    "POUDRE",
    "INJECTABLE",
    "PERFUSION",
    "EMULSION",
    "SPRAY",
    "AEROSOL",
    "PATCH",
    "FILM",
    "SACHET",
    "LYOPHILISAT",
    "GRANULES",
    "OVULE",
    "SUPPOSITOIRE",
    "PULVERISATION",
    "GOUTTES",
];

/// Trailing shape keywords truncated from label-parsed reference names.
pub const SHAPE_KEYWORDS: &[&str] = &[
    " COMPRIME",
    " GELULE",
    " SOLUTION",
    " SUSPENSION",
    " POUDRE",
    " CREME",
    " POMMADE",
    " SIROP",
    " SUPPOSITOIRE",
    " INJECTABLE",
    " LYOPHILISAT",
];

/// Stop words skipped when extracting a brand token from a name.
pub const NAMING_STOP_WORDS: &[&str] = &[
    "POUR", "NOURRISSON", "ENFANT", "ADULTE", "SANS", "AVEC",
];

/// Laboratories that only publish homeopathic ranges.
pub const HOMEOPATHIC_LABS: &[&str] = &[
    "LEHNING",
    "BOIRON",
    "WELEDA",
    "RECKEWEG",
    "UNDA",
    "LABORATOIRES HOMEOPATHIQU",
];

/// Label terms that directly mark a homeopathic preparation.
pub const HOMEOPATHIC_TERMS: &[&str] = &[
    "HOMEOPATHIQU",
    "HOMEOPATH",
    "POUR PREPARATIONS",
    "GRANULES",
    "GLOBULES",
    "TRITURATION",
    "TEINTURE MERE",
];
