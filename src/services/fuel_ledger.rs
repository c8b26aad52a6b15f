//! Libro de repostajes de un viaje
//!
//! Derivaciones puras sobre la lista de repostajes embebida en un
//! checklist: litros totales, costo total y eficiencia del viaje.
//! No tiene frontera de persistencia propia.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::checklist::Refueling;

/// Clasificación de eficiencia para mostrar en reportes.
/// El corte superior es inclusivo (12.0 exacto es Excellent); los cortes
/// intermedios son estrictos: 8.0 exacto cae en Fair, no en Good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl EfficiencyRating {
    pub fn from_km_per_liter(km_per_liter: f64) -> Self {
        if km_per_liter >= 12.0 {
            EfficiencyRating::Excellent
        } else if km_per_liter > 8.0 {
            EfficiencyRating::Good
        } else if km_per_liter > 5.0 {
            EfficiencyRating::Fair
        } else {
            EfficiencyRating::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyRating::Excellent => "excellent",
            EfficiencyRating::Good => "good",
            EfficiencyRating::Fair => "fair",
            EfficiencyRating::Poor => "poor",
        }
    }
}

/// Vista de solo lectura sobre los repostajes de un checklist
pub struct FuelLedger<'a> {
    refuelings: &'a [Refueling],
}

impl<'a> FuelLedger<'a> {
    pub fn new(refuelings: &'a [Refueling]) -> Self {
        Self { refuelings }
    }

    pub fn total_liters(&self) -> Decimal {
        self.refuelings.iter().map(|r| r.liters).sum()
    }

    pub fn total_cost(&self) -> Decimal {
        self.refuelings.iter().map(|r| r.amount).sum()
    }

    /// Eficiencia del viaje en km por litro.
    /// Indefinida (None, se muestra "N/A") cuando no hay distancia o litros;
    /// nunca cero ni error de división.
    pub fn efficiency(&self, distance_km: i64) -> Option<f64> {
        let total_liters = self.total_liters();
        if distance_km <= 0 || total_liters <= Decimal::ZERO {
            return None;
        }
        let liters = total_liters.to_f64()?;
        Some(distance_km as f64 / liters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checklist::FuelType;

    fn refueling(liters: &str, amount: &str) -> Refueling {
        Refueling {
            amount: amount.parse().unwrap(),
            liters: liters.parse().unwrap(),
            fuel_type: FuelType::Diesel,
        }
    }

    #[test]
    fn test_totals() {
        let refuelings = vec![refueling("20", "400"), refueling("15.5", "310")];
        let ledger = FuelLedger::new(&refuelings);

        assert_eq!(ledger.total_liters(), "35.5".parse().unwrap());
        assert_eq!(ledger.total_cost(), "710".parse().unwrap());
    }

    #[test]
    fn test_efficiency_zero_distance_is_undefined() {
        let refuelings = vec![refueling("5", "100")];
        let ledger = FuelLedger::new(&refuelings);

        assert_eq!(ledger.efficiency(0), None);
    }

    #[test]
    fn test_efficiency_no_liters_is_undefined() {
        let refuelings: Vec<Refueling> = vec![];
        let ledger = FuelLedger::new(&refuelings);

        assert_eq!(ledger.efficiency(120), None);
    }

    #[test]
    fn test_efficiency_basic() {
        let refuelings = vec![refueling("10", "200")];
        let ledger = FuelLedger::new(&refuelings);

        let efficiency = ledger.efficiency(120).unwrap();
        assert!((efficiency - 12.0).abs() < f64::EPSILON);
        assert_eq!(EfficiencyRating::from_km_per_liter(efficiency), EfficiencyRating::Excellent);
    }

    #[test]
    fn test_rating_boundaries_are_strict() {
        // 12.0 exacto es excellent; 8.0 exacto no es good; 5.0 exacto no es fair
        assert_eq!(EfficiencyRating::from_km_per_liter(12.0), EfficiencyRating::Excellent);
        assert_eq!(EfficiencyRating::from_km_per_liter(11.9), EfficiencyRating::Good);
        assert_eq!(EfficiencyRating::from_km_per_liter(8.0), EfficiencyRating::Fair);
        assert_eq!(EfficiencyRating::from_km_per_liter(5.0), EfficiencyRating::Poor);
    }

    #[test]
    fn test_boundary_case_96_km_12_liters() {
        let refuelings = vec![refueling("12", "240")];
        let ledger = FuelLedger::new(&refuelings);

        let efficiency = ledger.efficiency(96).unwrap();
        assert!((efficiency - 8.0).abs() < f64::EPSILON);
        assert_eq!(EfficiencyRating::from_km_per_liter(efficiency), EfficiencyRating::Fair);
    }
}
