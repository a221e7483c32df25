/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Value of every category in the flat fallback distribution (1/5)
pub const UNIFORM_SHARE: f64 = 0.2;

/// Lower bound of the caffeine / L-theanine level scale
pub const LEVEL_MIN: f64 = 1.0;

/// Upper bound of the caffeine / L-theanine level scale
pub const LEVEL_MAX: f64 = 10.0;

/// Level assumed for a compound whose partner level is present but it is not
pub const LEVEL_MIDPOINT: f64 = 5.0;

/// Total mass of the compound contribution before its own rescale
pub const DEFAULT_COMPOUND_WEIGHT: f64 = 0.3;

/// Theanine : caffeine ratio considered balanced
pub const DEFAULT_IDEAL_RATIO: f64 = 2.0;

/// Default exponent of the power-law diminishing-returns multiplier
pub const DEFAULT_DIMINISHING_EXPONENT: f64 = -0.3;

/// Default generating-cycle strength
pub const DEFAULT_GENERATING_STRENGTH: f64 = 0.05;

/// Default controlling-cycle strength
pub const DEFAULT_CONTROLLING_STRENGTH: f64 = 0.03;

/// Default attribute weights: flavor, compounds, processing, geography
pub const DEFAULT_ELEMENT_WEIGHTS: [f64; 4] = [0.35, 0.25, 0.25, 0.15];

/// Thermal component weights: flavor, compounds, processing, geography
pub const THERMAL_COMPONENT_WEIGHTS: [f64; 4] = [0.35, 0.25, 0.25, 0.15];

/// Share of weighted TCM-flavor mass above which a flavor profile is dominant
pub const DEFAULT_DOMINANCE_SHARE: f64 = 0.6;

/// Leader-to-runner-up count ratio at which a flavor profile is dominant
pub const DEFAULT_DOMINANCE_RATIO: f64 = 3.0;

/// Geography factor weights: altitude, humidity, temperature, solar, seasonal
pub const GEOGRAPHY_FACTOR_WEIGHTS: [f64; 5] = [0.25, 0.20, 0.20, 0.20, 0.15];

/// Compound thermal slope per caffeine level
pub const CAFFEINE_THERMAL_SLOPE: f64 = 0.1;

/// Compound thermal slope per L-theanine level
pub const THEANINE_THERMAL_SLOPE: f64 = 0.07;

/// Minimum key length considered for fuzzy containment matching
pub const FUZZY_MIN_KEY_LEN: usize = 3;
