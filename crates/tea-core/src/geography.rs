use std::sync::Arc;

use crate::attribute::Attribute;
use crate::config::ConfigSource;
use crate::constants::GEOGRAPHY_FACTOR_WEIGHTS;
use crate::element::ElementDistribution;
use crate::mapper::AttributeMapper;
use crate::numeric::band_lookup;
use crate::record::{Geography, TeaRecord};
use crate::tables::LookupTables;

/// Growing conditions to elements via per-factor band tables.
#[derive(Clone)]
pub struct GeographyMapper {
    tables: Arc<LookupTables>,
}

impl GeographyMapper {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self { tables }
    }

    /// `(factor, weight, band distribution)` for every present factor.
    pub fn factors(&self, geo: &Geography) -> Vec<(&'static str, f64, ElementDistribution)> {
        let bands = &self.tables.geography;
        let [w_alt, w_hum, w_temp, w_solar, w_season] = GEOGRAPHY_FACTOR_WEIGHTS;
        let inputs = [
            ("altitude", geo.altitude(), w_alt, &bands.altitude),
            ("humidity", geo.humidity(), w_hum, &bands.humidity),
            ("temperature", geo.temperature(), w_temp, &bands.temperature),
            ("solarRadiation", geo.solar_radiation(), w_solar, &bands.solar_radiation),
            ("seasonal", geo.abs_latitude(), w_season, &bands.seasonal),
        ];

        inputs
            .into_iter()
            .filter_map(|(name, value, weight, table)| {
                let d = band_lookup(table, value?)?;
                Some((name, weight, *d))
            })
            .collect()
    }

    /// Weighted blend of the present factors, renormalized over their
    /// weights, then clamped to [0, 1] per element. None without factors.
    pub fn map_geography(&self, geo: &Geography) -> Option<ElementDistribution> {
        let factors = self.factors(geo);
        let total_weight: f64 = factors.iter().map(|(_, w, _)| w).sum();
        if factors.is_empty() || total_weight <= 0.0 {
            return None;
        }

        let mut out = ElementDistribution::zero();
        for (_, weight, d) in &factors {
            out.add_scaled(d, weight / total_weight);
        }
        out.clamp_unit();
        Some(out)
    }
}

impl AttributeMapper for GeographyMapper {
    fn attribute(&self) -> Attribute {
        Attribute::Geography
    }

    fn map(&self, tea: &TeaRecord, _config: &dyn ConfigSource) -> Option<ElementDistribution> {
        self.map_geography(tea.usable_geography()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use approx::assert_relative_eq;

    fn mapper() -> GeographyMapper {
        GeographyMapper::new(Arc::new(LookupTables::builtin()))
    }

    #[test]
    fn test_single_factor_is_its_band() {
        let m = mapper();
        let geo = Geography {
            altitude: Some(2500.0),
            ..Default::default()
        };
        let d = m.map_geography(&geo).unwrap();
        let band = LookupTables::builtin().geography.altitude[4].value;
        assert!(d.max_abs_diff(&band) < 1e-12);
        assert_eq!(d.dominant_pair().0, Some(Element::Metal));
    }

    #[test]
    fn test_latitude_uses_absolute_value() {
        let m = mapper();
        let north = Geography {
            latitude: Some(45.0),
            ..Default::default()
        };
        let south = Geography {
            latitude: Some(-45.0),
            ..Default::default()
        };
        assert_eq!(m.map_geography(&north), m.map_geography(&south));
    }

    #[test]
    fn test_weights_renormalize_over_present_factors() {
        let m = mapper();
        let geo = Geography {
            altitude: Some(1200.0),
            humidity: Some(80.0),
            ..Default::default()
        };
        let d = m.map_geography(&geo).unwrap();
        assert_relative_eq!(d.total(), 1.0, epsilon = 1e-12);
        let tables = LookupTables::builtin();
        let alt = tables.geography.altitude[2].value;
        let hum = tables.geography.humidity[3].value;
        let expected = alt.wood * 0.25 / 0.45 + hum.wood * 0.20 / 0.45;
        assert_relative_eq!(d.wood, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_factors_are_absent() {
        let m = mapper();
        let geo = Geography {
            altitude: Some(f64::NAN),
            ..Default::default()
        };
        assert!(m.map_geography(&geo).is_none());
    }
}
