//! Built-in lookup tables.
//!
//! Rows are `[wood, fire, earth, metal, water]`. Every keyed row is
//! normalized on load so hand edits never break the sum-to-one property of
//! a table entry.

use std::collections::BTreeMap;

use crate::element::{Element, ElementDistribution};
use crate::numeric::Band;
use crate::tables::{
    Boost, ContextRule, FlavorEntry, GeographyBands, GeographyThermalBands, HeuristicRule,
    LookupTables, ProcessingCategory, ProcessingCombination, ProcessingEntry, SignaturePattern,
    TcmBase, TcmFlavor,
};

use ProcessingCategory::*;
use TcmFlavor::*;

type Row = [f64; 5];

fn dist(row: Row) -> ElementDistribution {
    ElementDistribution::from_array(row).normalized()
}

const TCM_BASE: [(TcmFlavor, Row); 5] = [
    (Sour, [0.70, 0.05, 0.05, 0.10, 0.10]),
    (Bitter, [0.05, 0.70, 0.10, 0.05, 0.10]),
    (Sweet, [0.10, 0.05, 0.70, 0.10, 0.05]),
    (Pungent, [0.10, 0.10, 0.05, 0.70, 0.05]),
    (Salty, [0.05, 0.05, 0.10, 0.10, 0.70]),
];

const TCM_ALIASES: &[(&str, TcmFlavor)] = &[("acidic", Sour), ("acrid", Pungent), ("saline", Salty)];

const FLAVORS: &[(&str, TcmFlavor, Row)] = &[
    // green and vegetal
    ("grassy", Sour, [0.60, 0.05, 0.10, 0.05, 0.20]),
    ("vegetal", Sour, [0.60, 0.05, 0.15, 0.05, 0.15]),
    ("green", Sour, [0.60, 0.05, 0.10, 0.10, 0.15]),
    ("fresh", Sour, [0.55, 0.05, 0.10, 0.15, 0.15]),
    ("herbaceous", Sour, [0.55, 0.05, 0.10, 0.15, 0.15]),
    ("spinach", Sour, [0.55, 0.05, 0.15, 0.05, 0.20]),
    ("asparagus", Sour, [0.55, 0.05, 0.15, 0.05, 0.20]),
    ("bamboo", Sour, [0.60, 0.05, 0.10, 0.15, 0.10]),
    ("cucumber", Sour, [0.45, 0.00, 0.05, 0.10, 0.40]),
    ("pine", Sour, [0.50, 0.15, 0.05, 0.20, 0.10]),
    ("woody", Sour, [0.45, 0.15, 0.20, 0.15, 0.05]),
    ("herbal", Bitter, [0.40, 0.20, 0.10, 0.20, 0.10]),
    ("hay", Sweet, [0.30, 0.10, 0.40, 0.10, 0.10]),
    ("straw", Sweet, [0.30, 0.10, 0.40, 0.10, 0.10]),
    // sour and fruit
    ("citrus", Sour, [0.55, 0.10, 0.05, 0.20, 0.10]),
    ("lemon", Sour, [0.60, 0.05, 0.05, 0.20, 0.10]),
    ("grapefruit", Sour, [0.50, 0.15, 0.05, 0.20, 0.10]),
    ("orange", Sour, [0.45, 0.15, 0.15, 0.15, 0.10]),
    ("bergamot", Sour, [0.50, 0.10, 0.10, 0.20, 0.10]),
    ("tart", Sour, [0.65, 0.05, 0.05, 0.15, 0.10]),
    ("tangy", Sour, [0.60, 0.10, 0.05, 0.15, 0.10]),
    ("green apple", Sour, [0.55, 0.05, 0.20, 0.10, 0.10]),
    ("berry", Sour, [0.40, 0.15, 0.30, 0.05, 0.10]),
    ("plum", Sour, [0.35, 0.10, 0.35, 0.05, 0.15]),
    ("wine", Sour, [0.35, 0.20, 0.25, 0.10, 0.10]),
    ("fermented", Sour, [0.30, 0.10, 0.25, 0.05, 0.30]),
    ("fruity", Sweet, [0.25, 0.10, 0.45, 0.10, 0.10]),
    ("stone fruit", Sweet, [0.20, 0.10, 0.50, 0.10, 0.10]),
    ("apricot", Sweet, [0.20, 0.10, 0.50, 0.10, 0.10]),
    ("peach", Sweet, [0.20, 0.10, 0.55, 0.05, 0.10]),
    ("muscatel", Sweet, [0.25, 0.15, 0.40, 0.10, 0.10]),
    ("grape", Sweet, [0.30, 0.10, 0.45, 0.05, 0.10]),
    ("lychee", Sweet, [0.20, 0.10, 0.50, 0.10, 0.10]),
    ("melon", Sweet, [0.25, 0.05, 0.45, 0.05, 0.20]),
    ("raisin", Sweet, [0.10, 0.20, 0.50, 0.05, 0.15]),
    ("dried fruit", Sweet, [0.15, 0.20, 0.50, 0.05, 0.10]),
    // floral
    ("floral", Pungent, [0.25, 0.10, 0.20, 0.35, 0.10]),
    ("orchid", Pungent, [0.25, 0.10, 0.20, 0.35, 0.10]),
    ("jasmine", Pungent, [0.25, 0.10, 0.15, 0.40, 0.10]),
    ("rose", Pungent, [0.20, 0.15, 0.20, 0.35, 0.10]),
    ("lilac", Pungent, [0.25, 0.05, 0.20, 0.40, 0.10]),
    ("gardenia", Pungent, [0.20, 0.10, 0.20, 0.40, 0.10]),
    ("osmanthus", Sweet, [0.20, 0.10, 0.40, 0.25, 0.05]),
    ("honeysuckle", Sweet, [0.25, 0.05, 0.40, 0.25, 0.05]),
    // sweet and rich
    ("honey", Sweet, [0.10, 0.10, 0.65, 0.05, 0.10]),
    ("caramel", Sweet, [0.05, 0.25, 0.60, 0.05, 0.05]),
    ("toffee", Sweet, [0.05, 0.25, 0.60, 0.05, 0.05]),
    ("vanilla", Sweet, [0.10, 0.10, 0.60, 0.15, 0.05]),
    ("licorice", Sweet, [0.10, 0.10, 0.60, 0.10, 0.10]),
    ("sugarcane", Sweet, [0.15, 0.05, 0.65, 0.05, 0.10]),
    ("malty", Sweet, [0.05, 0.25, 0.60, 0.05, 0.05]),
    ("malt", Sweet, [0.05, 0.25, 0.60, 0.05, 0.05]),
    ("bready", Sweet, [0.05, 0.20, 0.60, 0.10, 0.05]),
    ("biscuit", Sweet, [0.05, 0.25, 0.55, 0.10, 0.05]),
    ("nutty", Sweet, [0.05, 0.25, 0.55, 0.10, 0.05]),
    ("chestnut", Sweet, [0.10, 0.20, 0.55, 0.10, 0.05]),
    ("almond", Sweet, [0.05, 0.15, 0.50, 0.25, 0.05]),
    ("creamy", Sweet, [0.05, 0.05, 0.60, 0.10, 0.20]),
    ("buttery", Sweet, [0.10, 0.05, 0.60, 0.10, 0.15]),
    ("milky", Sweet, [0.05, 0.05, 0.60, 0.10, 0.20]),
    ("silky", Sweet, [0.10, 0.05, 0.50, 0.15, 0.20]),
    ("smooth", Sweet, [0.10, 0.05, 0.50, 0.15, 0.20]),
    ("velvety", Sweet, [0.10, 0.05, 0.55, 0.10, 0.20]),
    ("umami", Sweet, [0.20, 0.05, 0.40, 0.05, 0.30]),
    ("savory", Sweet, [0.15, 0.10, 0.45, 0.05, 0.25]),
    // roast and bitter
    ("toasted", Bitter, [0.05, 0.50, 0.30, 0.10, 0.05]),
    ("roasted", Bitter, [0.05, 0.55, 0.25, 0.10, 0.05]),
    ("roasty", Bitter, [0.05, 0.55, 0.25, 0.10, 0.05]),
    ("charcoal", Bitter, [0.05, 0.60, 0.15, 0.15, 0.05]),
    ("smoky", Bitter, [0.10, 0.55, 0.10, 0.20, 0.05]),
    ("smoke", Bitter, [0.10, 0.55, 0.10, 0.20, 0.05]),
    ("burnt", Bitter, [0.00, 0.70, 0.15, 0.10, 0.05]),
    ("coffee", Bitter, [0.05, 0.60, 0.20, 0.05, 0.10]),
    ("chocolate", Bitter, [0.05, 0.40, 0.40, 0.05, 0.10]),
    ("cocoa", Bitter, [0.05, 0.45, 0.35, 0.05, 0.10]),
    ("tannic", Bitter, [0.15, 0.45, 0.05, 0.30, 0.05]),
    ("medicinal", Bitter, [0.10, 0.40, 0.05, 0.25, 0.20]),
    ("leather", Bitter, [0.05, 0.40, 0.30, 0.15, 0.10]),
    ("tobacco", Bitter, [0.10, 0.45, 0.25, 0.15, 0.05]),
    // earth and age
    ("earthy", Sweet, [0.05, 0.10, 0.60, 0.10, 0.15]),
    ("forest floor", Sweet, [0.15, 0.05, 0.50, 0.10, 0.20]),
    ("mushroom", Sweet, [0.10, 0.05, 0.45, 0.10, 0.30]),
    ("musty", Sweet, [0.05, 0.05, 0.40, 0.10, 0.40]),
    ("aged", Salty, [0.05, 0.10, 0.35, 0.10, 0.40]),
    ("damp", Salty, [0.05, 0.05, 0.30, 0.10, 0.50]),
    // pungent and spice
    ("spicy", Pungent, [0.05, 0.30, 0.05, 0.55, 0.05]),
    ("peppery", Pungent, [0.05, 0.30, 0.05, 0.55, 0.05]),
    ("cinnamon", Pungent, [0.05, 0.35, 0.10, 0.45, 0.05]),
    ("ginger", Pungent, [0.05, 0.35, 0.10, 0.45, 0.05]),
    ("clove", Pungent, [0.05, 0.30, 0.10, 0.50, 0.05]),
    ("cardamom", Pungent, [0.10, 0.20, 0.10, 0.55, 0.05]),
    ("camphor", Pungent, [0.20, 0.05, 0.05, 0.55, 0.15]),
    ("cedar", Pungent, [0.35, 0.15, 0.10, 0.35, 0.05]),
    ("mint", Pungent, [0.35, 0.00, 0.05, 0.50, 0.10]),
    ("astringent", Sour, [0.40, 0.15, 0.05, 0.35, 0.05]),
    ("brisk", Pungent, [0.25, 0.25, 0.05, 0.40, 0.05]),
    ("sharp", Pungent, [0.20, 0.15, 0.05, 0.55, 0.05]),
    ("dry", Pungent, [0.15, 0.20, 0.10, 0.50, 0.05]),
    ("crisp", Pungent, [0.25, 0.05, 0.05, 0.50, 0.15]),
    ("clean", Pungent, [0.20, 0.05, 0.10, 0.45, 0.20]),
    ("cooling", Pungent, [0.20, 0.00, 0.05, 0.45, 0.30]),
    ("metallic", Pungent, [0.05, 0.05, 0.05, 0.70, 0.15]),
    ("flinty", Pungent, [0.05, 0.10, 0.05, 0.55, 0.25]),
    // mineral and marine
    ("mineral", Salty, [0.05, 0.05, 0.10, 0.35, 0.45]),
    ("stony", Salty, [0.05, 0.05, 0.15, 0.35, 0.40]),
    ("briny", Salty, [0.05, 0.00, 0.05, 0.10, 0.80]),
    ("marine", Salty, [0.10, 0.00, 0.05, 0.10, 0.75]),
    ("oceanic", Salty, [0.10, 0.00, 0.05, 0.10, 0.75]),
    ("seaweed", Salty, [0.15, 0.00, 0.05, 0.05, 0.75]),
    ("kelp", Salty, [0.10, 0.00, 0.05, 0.05, 0.80]),
    ("brothy", Salty, [0.15, 0.05, 0.35, 0.05, 0.40]),
];

/// Context overrides: (descriptor, any sibling of, flavor, row).
const CONTEXT_RULES: &[(&str, &[&str], TcmFlavor, Row)] = &[
    (
        "malty",
        &["roasted", "roasty", "toasted", "charcoal", "smoky", "caramel"],
        Sweet,
        [0.05, 0.40, 0.45, 0.05, 0.05],
    ),
    (
        "umami",
        &["green", "grassy", "vegetal", "fresh", "spinach"],
        Sweet,
        [0.40, 0.05, 0.30, 0.05, 0.20],
    ),
    (
        "sweet",
        &["floral", "orchid", "jasmine", "honeysuckle"],
        Sweet,
        [0.15, 0.05, 0.50, 0.25, 0.05],
    ),
    (
        "bitter",
        &["green", "grassy", "vegetal"],
        Bitter,
        [0.30, 0.45, 0.05, 0.10, 0.10],
    ),
    (
        "mineral",
        &["roasted", "charcoal", "toasted"],
        Salty,
        [0.05, 0.25, 0.10, 0.30, 0.30],
    ),
];

/// Signatures in priority order. Every clause must be met.
const SIGNATURES: &[(&str, &[&[&str]], Row)] = &[
    (
        "japanese_green",
        &[
            &["umami", "savory", "brothy"],
            &["marine", "seaweed", "oceanic", "kelp"],
            &["vegetal", "green", "grassy", "spinach"],
        ],
        [0.70, 0.025, 0.05, 0.025, 0.20],
    ),
    (
        "oceanic_mineral",
        &[
            &["salty", "briny", "saline", "salt"],
            &["marine", "seaweed", "oceanic", "kelp", "sea"],
        ],
        [0.01, 0.0, 0.0, 0.01, 0.98],
    ),
    (
        "roasted_oolong",
        &[
            &["roasted", "roasty", "charcoal", "toasted"],
            &["floral", "orchid", "stone fruit", "peach", "honey"],
        ],
        [0.10, 0.40, 0.25, 0.20, 0.05],
    ),
    (
        "smoky_pine",
        &[&["smoky", "smoke"], &["pine", "resin", "woody"]],
        [0.15, 0.50, 0.05, 0.25, 0.05],
    ),
    (
        "aged_puerh",
        &[
            &["earthy", "forest floor", "mushroom", "musty", "damp"],
            &["aged", "leather", "woody", "camphor"],
        ],
        [0.05, 0.10, 0.45, 0.10, 0.30],
    ),
    (
        "malty_breakfast",
        &[&["malty", "malt"], &["brisk", "tannic", "astringent"]],
        [0.05, 0.40, 0.35, 0.15, 0.05],
    ),
    (
        "high_mountain_floral",
        &[
            &["floral", "orchid", "lilac", "gardenia"],
            &["creamy", "buttery", "milky"],
        ],
        [0.20, 0.05, 0.35, 0.30, 0.10],
    ),
    (
        "white_tea_delicate",
        &[&["hay", "straw"], &["honey", "melon", "honeysuckle"]],
        [0.25, 0.05, 0.45, 0.15, 0.10],
    ),
    (
        "citrus_bright",
        &[
            &["citrus", "lemon", "bergamot", "orange", "grapefruit"],
            &["floral", "brisk", "crisp"],
        ],
        [0.40, 0.15, 0.10, 0.30, 0.05],
    ),
    (
        "spiced_chai",
        &[
            &["cinnamon", "ginger", "clove", "cardamom"],
            &["creamy", "milky", "malty", "honey", "vanilla"],
        ],
        [0.05, 0.35, 0.30, 0.25, 0.05],
    ),
];

const HEURISTICS: &[(&[&str], &str)] = &[
    (&["floral", "flower", "blossom"], "floral"),
    (&["citrus", "citric", "zest"], "citrus"),
    (&["earth", "soil"], "earthy"),
    (&["roast", "toast"], "roasted"),
    (&["smok"], "smoky"),
    (&["fruit"], "fruity"),
    (&["sweet", "sugar", "candied"], "honey"),
    (&["spic", "pepper"], "spicy"),
    (&["grass", "leaf", "veget"], "grassy"),
    (&["mineral", "stone", "rock"], "mineral"),
    (&["ocean", "marine", "brin"], "marine"),
    (&["cream", "butter", "milk"], "creamy"),
    (&["malt"], "malty"),
    (&["bitter"], "cocoa"),
    (&["sour", "acid"], "tart"),
    (&["herb"], "herbal"),
    (&["nut"], "nutty"),
    (&["wood", "bark"], "woody"),
];

const TEA_TYPES: &[(&str, Row)] = &[
    ("green", [0.55, 0.05, 0.10, 0.10, 0.20]),
    ("white", [0.25, 0.05, 0.20, 0.35, 0.15]),
    ("yellow", [0.35, 0.05, 0.35, 0.10, 0.15]),
    ("oolong", [0.20, 0.25, 0.25, 0.20, 0.10]),
    ("black", [0.05, 0.45, 0.30, 0.10, 0.10]),
    ("pu erh", [0.05, 0.15, 0.35, 0.10, 0.35]),
    ("puerh", [0.05, 0.15, 0.35, 0.10, 0.35]),
    ("dark", [0.05, 0.15, 0.35, 0.10, 0.35]),
    ("herbal", [0.25, 0.15, 0.25, 0.20, 0.15]),
    ("matcha", [0.60, 0.05, 0.10, 0.05, 0.20]),
    ("sencha", [0.60, 0.05, 0.05, 0.10, 0.20]),
    ("gyokuro", [0.55, 0.00, 0.10, 0.05, 0.30]),
    ("hojicha", [0.15, 0.45, 0.25, 0.10, 0.05]),
    ("genmaicha", [0.35, 0.15, 0.35, 0.05, 0.10]),
    ("lapsang", [0.10, 0.55, 0.10, 0.20, 0.05]),
    ("darjeeling", [0.35, 0.20, 0.20, 0.20, 0.05]),
    ("assam", [0.05, 0.50, 0.30, 0.10, 0.05]),
];

const PROCESSING: &[(&str, ProcessingCategory, Row)] = &[
    ("shade grown", Cultivation, [0.50, 0.00, 0.10, 0.05, 0.35]),
    ("sun grown", Cultivation, [0.30, 0.35, 0.20, 0.10, 0.05]),
    ("organic", Cultivation, [0.30, 0.10, 0.30, 0.10, 0.20]),
    ("high mountain", Cultivation, [0.30, 0.05, 0.10, 0.30, 0.25]),
    ("hand picked", Cultivation, [0.30, 0.10, 0.30, 0.15, 0.15]),
    ("first flush", Cultivation, [0.50, 0.10, 0.10, 0.15, 0.15]),
    ("second flush", Cultivation, [0.30, 0.25, 0.25, 0.10, 0.10]),
    ("withered", Withering, [0.25, 0.10, 0.25, 0.30, 0.10]),
    ("sun withered", Withering, [0.20, 0.30, 0.25, 0.20, 0.05]),
    ("indoor withered", Withering, [0.25, 0.05, 0.25, 0.30, 0.15]),
    ("minimal processing", Withering, [0.30, 0.05, 0.20, 0.30, 0.15]),
    ("steamed", Heating, [0.55, 0.05, 0.10, 0.05, 0.25]),
    ("pan fired", Heating, [0.35, 0.35, 0.15, 0.10, 0.05]),
    ("baked", Heating, [0.10, 0.40, 0.35, 0.10, 0.05]),
    ("kill green", Heating, [0.40, 0.25, 0.15, 0.10, 0.10]),
    ("rolled", Rolling, [0.25, 0.15, 0.30, 0.20, 0.10]),
    ("hand rolled", Rolling, [0.25, 0.15, 0.30, 0.20, 0.10]),
    ("ball rolled", Rolling, [0.20, 0.15, 0.35, 0.20, 0.10]),
    ("twisted", Rolling, [0.25, 0.15, 0.25, 0.25, 0.10]),
    ("unoxidized", Oxidation, [0.55, 0.05, 0.10, 0.10, 0.20]),
    ("lightly oxidized", Oxidation, [0.35, 0.10, 0.20, 0.25, 0.10]),
    ("partially oxidized", Oxidation, [0.20, 0.25, 0.25, 0.20, 0.10]),
    ("oxidized", Oxidation, [0.10, 0.40, 0.30, 0.10, 0.10]),
    ("fully oxidized", Oxidation, [0.05, 0.45, 0.30, 0.10, 0.10]),
    ("roasted", Roasting, [0.05, 0.55, 0.25, 0.10, 0.05]),
    ("lightly roasted", Roasting, [0.15, 0.35, 0.30, 0.15, 0.05]),
    ("heavily roasted", Roasting, [0.00, 0.70, 0.15, 0.10, 0.05]),
    ("charcoal roasted", Roasting, [0.00, 0.65, 0.20, 0.10, 0.05]),
    ("fermented", Fermentation, [0.10, 0.10, 0.35, 0.05, 0.40]),
    ("pile fermented", Fermentation, [0.05, 0.10, 0.40, 0.05, 0.40]),
    ("wet piled", Fermentation, [0.05, 0.10, 0.40, 0.05, 0.40]),
    ("post fermented", Fermentation, [0.05, 0.10, 0.40, 0.05, 0.40]),
    ("aged", Fermentation, [0.05, 0.10, 0.35, 0.15, 0.35]),
    ("dried", Drying, [0.20, 0.15, 0.25, 0.30, 0.10]),
    ("sun dried", Drying, [0.15, 0.30, 0.30, 0.20, 0.05]),
    ("air dried", Drying, [0.25, 0.05, 0.20, 0.35, 0.15]),
    ("scented", Scenting, [0.25, 0.10, 0.20, 0.35, 0.10]),
    ("jasmine scented", Scenting, [0.25, 0.10, 0.15, 0.40, 0.10]),
    ("smoked", Scenting, [0.10, 0.55, 0.10, 0.20, 0.05]),
    ("flavored", Scenting, [0.20, 0.15, 0.30, 0.25, 0.10]),
    ("compressed", Compression, [0.05, 0.10, 0.40, 0.15, 0.30]),
    ("pressed", Compression, [0.05, 0.10, 0.40, 0.15, 0.30]),
    ("brick", Compression, [0.05, 0.10, 0.40, 0.15, 0.30]),
];

const COMPRESSED: &[&str] = &["compressed", "pressed", "brick", "cake"];

fn combinations() -> Vec<ProcessingCombination> {
    fn combo(name: &str, clauses: &[&[&str]], boosts: Vec<Boost>) -> ProcessingCombination {
        ProcessingCombination {
            name: name.to_string(),
            clauses: clauses.iter().map(|c| strings(c)).collect(),
            boosts,
        }
    }
    let mul = |element, factor| Boost::Multiply { element, factor };
    let add = |element, amount| Boost::Add { element, amount };

    vec![
        combo(
            "gyokuro_style",
            &[&["shade grown"], &["steamed"]],
            vec![mul(Element::Wood, 1.3), mul(Element::Water, 1.2)],
        ),
        combo(
            "high_mountain_rolled",
            &[&["high mountain"], &["ball rolled", "rolled"]],
            vec![add(Element::Metal, 0.05), add(Element::Water, 0.03)],
        ),
        combo(
            "traditional_roast",
            &[
                &["roasted", "baked"],
                &["rolled", "twisted", "partially oxidized"],
            ],
            vec![mul(Element::Fire, 1.2), add(Element::Earth, 0.03)],
        ),
        combo(
            "ripe_puerh",
            &[&["pile fermented", "wet piled", "post fermented"], COMPRESSED],
            vec![mul(Element::Water, 1.2), mul(Element::Earth, 1.1)],
        ),
        combo(
            "aged_compressed",
            &[&["aged"], COMPRESSED],
            vec![add(Element::Water, 0.05), add(Element::Metal, 0.02)],
        ),
        combo(
            "scented_pearl",
            &[&["scented"], &["rolled"]],
            vec![mul(Element::Metal, 1.2)],
        ),
        combo(
            "pine_smoked",
            &[&["smoked"], &["withered"]],
            vec![mul(Element::Fire, 1.25), add(Element::Metal, 0.03)],
        ),
    ]
}

const FLAVOR_THERMAL: &[(&str, f64)] = &[
    ("sour", -0.1),
    ("bitter", -0.2),
    ("sweet", 0.2),
    ("pungent", 0.3),
    ("salty", -0.3),
    ("grassy", -0.3),
    ("vegetal", -0.3),
    ("green", -0.3),
    ("fresh", -0.2),
    ("herbaceous", -0.2),
    ("cucumber", -0.4),
    ("mint", -0.5),
    ("cooling", -0.6),
    ("melon", -0.2),
    ("crisp", -0.2),
    ("citrus", -0.1),
    ("lemon", -0.1),
    ("umami", -0.1),
    ("mineral", -0.1),
    ("briny", -0.3),
    ("marine", -0.4),
    ("oceanic", -0.4),
    ("seaweed", -0.4),
    ("kelp", -0.4),
    ("floral", 0.05),
    ("fruity", 0.1),
    ("stone fruit", 0.1),
    ("peach", 0.1),
    ("creamy", 0.1),
    ("buttery", 0.1),
    ("tannic", 0.1),
    ("aged", 0.1),
    ("brisk", 0.2),
    ("earthy", 0.2),
    ("woody", 0.2),
    ("honey", 0.3),
    ("nutty", 0.3),
    ("caramel", 0.4),
    ("malty", 0.4),
    ("chocolate", 0.4),
    ("cocoa", 0.4),
    ("toasted", 0.5),
    ("roasted", 0.6),
    ("smoky", 0.6),
    ("peppery", 0.6),
    ("charcoal", 0.7),
    ("spicy", 0.7),
    ("cinnamon", 0.7),
    ("ginger", 0.7),
];

const PROCESSING_THERMAL: &[(&str, f64)] = &[
    ("shade grown", -0.3),
    ("high mountain", -0.2),
    ("steamed", -0.4),
    ("unoxidized", -0.4),
    ("air dried", -0.1),
    ("lightly oxidized", -0.1),
    ("jasmine scented", -0.1),
    ("withered", 0.05),
    ("pan fired", 0.1),
    ("partially oxidized", 0.1),
    ("compressed", 0.1),
    ("fermented", 0.2),
    ("aged", 0.2),
    ("sun dried", 0.2),
    ("pile fermented", 0.3),
    ("lightly roasted", 0.3),
    ("oxidized", 0.4),
    ("baked", 0.4),
    ("fully oxidized", 0.5),
    ("roasted", 0.5),
    ("smoked", 0.6),
    ("charcoal roasted", 0.7),
    ("heavily roasted", 0.8),
];

fn bands(rows: [(Option<f64>, Row); 5]) -> Vec<Band<ElementDistribution>> {
    rows.into_iter()
        .map(|(upper, row)| Band {
            upper,
            value: dist(row),
        })
        .collect()
}

fn scalar_bands(rows: [(Option<f64>, f64); 5]) -> Vec<Band<f64>> {
    rows.into_iter()
        .map(|(upper, value)| Band { upper, value })
        .collect()
}

fn geography() -> GeographyBands {
    GeographyBands {
        // metres
        altitude: bands([
            (Some(500.0), [0.10, 0.20, 0.40, 0.10, 0.20]),
            (Some(1000.0), [0.20, 0.15, 0.35, 0.15, 0.15]),
            (Some(1500.0), [0.30, 0.10, 0.25, 0.20, 0.15]),
            (Some(2000.0), [0.30, 0.05, 0.15, 0.30, 0.20]),
            (None, [0.25, 0.05, 0.10, 0.35, 0.25]),
        ]),
        // relative humidity, percent
        humidity: bands([
            (Some(40.0), [0.10, 0.35, 0.20, 0.30, 0.05]),
            (Some(60.0), [0.20, 0.25, 0.25, 0.20, 0.10]),
            (Some(75.0), [0.25, 0.15, 0.25, 0.15, 0.20]),
            (Some(85.0), [0.30, 0.10, 0.20, 0.10, 0.30]),
            (None, [0.25, 0.05, 0.15, 0.10, 0.45]),
        ]),
        // mean growing-season temperature, °C
        temperature: bands([
            (Some(10.0), [0.15, 0.05, 0.15, 0.25, 0.40]),
            (Some(15.0), [0.25, 0.10, 0.20, 0.25, 0.20]),
            (Some(20.0), [0.30, 0.15, 0.25, 0.15, 0.15]),
            (Some(25.0), [0.20, 0.30, 0.25, 0.10, 0.15]),
            (None, [0.10, 0.45, 0.25, 0.10, 0.10]),
        ]),
        // kWh/m²/day
        solar_radiation: bands([
            (Some(3.0), [0.20, 0.05, 0.20, 0.20, 0.35]),
            (Some(4.0), [0.30, 0.10, 0.25, 0.20, 0.15]),
            (Some(5.0), [0.25, 0.25, 0.25, 0.15, 0.10]),
            (Some(6.0), [0.15, 0.40, 0.25, 0.15, 0.05]),
            (None, [0.10, 0.50, 0.20, 0.15, 0.05]),
        ]),
        // absolute latitude, degrees
        seasonal: bands([
            (Some(10.0), [0.15, 0.40, 0.30, 0.05, 0.10]),
            (Some(20.0), [0.25, 0.30, 0.25, 0.10, 0.10]),
            (Some(30.0), [0.30, 0.20, 0.20, 0.15, 0.15]),
            (Some(40.0), [0.25, 0.10, 0.15, 0.25, 0.25]),
            (None, [0.15, 0.05, 0.10, 0.30, 0.40]),
        ]),
    }
}

fn geography_thermal() -> GeographyThermalBands {
    GeographyThermalBands {
        altitude: scalar_bands([
            (Some(500.0), 0.1),
            (Some(1000.0), 0.0),
            (Some(1500.0), -0.1),
            (Some(2000.0), -0.2),
            (None, -0.3),
        ]),
        temperature: scalar_bands([
            (Some(10.0), -0.4),
            (Some(15.0), -0.2),
            (Some(20.0), 0.0),
            (Some(25.0), 0.2),
            (None, 0.4),
        ]),
        humidity: scalar_bands([
            (Some(40.0), 0.2),
            (Some(60.0), 0.1),
            (Some(75.0), 0.0),
            (Some(85.0), -0.1),
            (None, -0.2),
        ]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tcm_base() -> TcmBase {
    let row = |flavor: TcmFlavor| {
        TCM_BASE
            .iter()
            .find(|(f, _)| *f == flavor)
            .map(|(_, r)| dist(*r))
            .unwrap_or_else(ElementDistribution::uniform)
    };
    TcmBase {
        sour: row(Sour),
        bitter: row(Bitter),
        sweet: row(Sweet),
        pungent: row(Pungent),
        salty: row(Salty),
    }
}

pub(crate) fn tables() -> LookupTables {
    let flavors: BTreeMap<String, FlavorEntry> = FLAVORS
        .iter()
        .map(|(name, flavor, row)| {
            (
                name.to_string(),
                FlavorEntry {
                    flavor: *flavor,
                    elements: dist(*row),
                },
            )
        })
        .collect();

    let context_rules = CONTEXT_RULES
        .iter()
        .map(|(descriptor, context, flavor, row)| ContextRule {
            descriptor: descriptor.to_string(),
            context: strings(context),
            flavor: *flavor,
            elements: dist(*row),
        })
        .collect();

    let signatures = SIGNATURES
        .iter()
        .map(|(name, clauses, row)| SignaturePattern {
            name: name.to_string(),
            clauses: clauses.iter().map(|c| strings(c)).collect(),
            elements: dist(*row),
        })
        .collect();

    let heuristics = HEURISTICS
        .iter()
        .map(|(needles, canonical)| HeuristicRule {
            needles: strings(needles),
            canonical: canonical.to_string(),
        })
        .collect();

    let processing = PROCESSING
        .iter()
        .map(|(name, category, row)| {
            (
                name.to_string(),
                ProcessingEntry {
                    category: *category,
                    elements: dist(*row),
                },
            )
        })
        .collect();

    LookupTables {
        tcm_base: tcm_base(),
        tcm_aliases: TCM_ALIASES
            .iter()
            .map(|(alias, flavor)| (alias.to_string(), *flavor))
            .collect(),
        flavors,
        context_rules,
        signatures,
        heuristics,
        tea_types: TEA_TYPES
            .iter()
            .map(|(name, row)| (name.to_string(), dist(*row)))
            .collect(),
        processing,
        processing_combinations: combinations(),
        geography: geography(),
        flavor_thermal: FLAVOR_THERMAL
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
        processing_thermal: PROCESSING_THERMAL
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
        geography_thermal: geography_thermal(),
    }
}
