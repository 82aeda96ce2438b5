//! Standard air-quality linguistic variables
//!
//! Universes and term shapes are calibration data:
//!
//! | variable    | universe           | terms |
//! |-------------|--------------------|-------|
//! | CO (ppm)    | 0..20 by 0.1       | Very_Low, Low, Moderate, High, Very_High |
//! | NO2 (ppb)   | 0..400 by 1        | Excellent, Good, Fair, Poor, Hazardous |
//! | O3 (sensor) | 0..3000 by 10      | Good, Moderate, Unhealthy, Very_Unhealthy |
//! | Temperature | -10..50 by 0.5     | Cold, Comfortable, Hot |
//! | Humidity    | 0..100 by 1        | Dry, Comfortable, Humid |
//! | AQI         | 0..500 by 1        | one term per [`AqiCategory`] |
//!
//! Temperature and humidity only modulate rules; their degrees are not
//! reported in assessment diagnostics.

use crate::error::AqiResult;
use crate::fuzzy::{LinguisticVariable, MembershipFunction as Mf, Universe};

use super::category::AqiCategory;

pub const CO: &str = "CO";
pub const NO2: &str = "NO2";
pub const O3: &str = "O3";
pub const TEMPERATURE: &str = "Temperature";
pub const HUMIDITY: &str = "Humidity";
pub const AQI: &str = "AQI";

/// Input variable names in declaration order
pub const INPUT_NAMES: [&str; 5] = [CO, NO2, O3, TEMPERATURE, HUMIDITY];

pub fn co() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::input(CO, Universe::new(0.0, 20.0, 0.1)?)
        .try_term("Very_Low", Mf::triangular(0.0, 0.0, 2.0))
        .try_term("Low", Mf::triangular(1.0, 2.5, 4.0))
        .try_term("Moderate", Mf::triangular(3.0, 5.0, 7.0))
        .try_term("High", Mf::triangular(6.0, 9.0, 12.0))
        .try_term("Very_High", Mf::trapezoidal(10.0, 15.0, 20.0, 20.0))
        .build()
}

pub fn no2() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::input(NO2, Universe::new(0.0, 400.0, 1.0)?)
        .try_term("Excellent", Mf::gaussian(20.0, 15.0))
        .try_term("Good", Mf::gaussian(50.0, 20.0))
        .try_term("Fair", Mf::gaussian(100.0, 30.0))
        .try_term("Poor", Mf::gaussian(200.0, 50.0))
        .try_term("Hazardous", Mf::trapezoidal(150.0, 250.0, 400.0, 400.0))
        .build()
}

pub fn o3() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::input(O3, Universe::new(0.0, 3000.0, 10.0)?)
        .try_term("Good", Mf::triangular(0.0, 0.0, 1000.0))
        .try_term("Moderate", Mf::triangular(500.0, 1250.0, 2000.0))
        .try_term("Unhealthy", Mf::triangular(1500.0, 2250.0, 3000.0))
        .try_term("Very_Unhealthy", Mf::trapezoidal(2500.0, 2750.0, 3000.0, 3000.0))
        .build()
}

pub fn temperature() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::input(TEMPERATURE, Universe::new(-10.0, 50.0, 0.5)?)
        .try_term("Cold", Mf::trapezoidal(-10.0, -10.0, 5.0, 15.0))
        .try_term("Comfortable", Mf::triangular(10.0, 20.0, 30.0))
        .try_term("Hot", Mf::trapezoidal(25.0, 35.0, 50.0, 50.0))
        .diagnostics(false)
        .build()
}

pub fn humidity() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::input(HUMIDITY, Universe::new(0.0, 100.0, 1.0)?)
        .try_term("Dry", Mf::triangular(0.0, 0.0, 50.0))
        .try_term("Comfortable", Mf::triangular(30.0, 50.0, 70.0))
        .try_term("Humid", Mf::triangular(60.0, 100.0, 100.0))
        .diagnostics(false)
        .build()
}

/// Output variable; term names match [`AqiCategory::as_str`]
pub fn aqi() -> AqiResult<LinguisticVariable> {
    LinguisticVariable::output(AQI, Universe::new(0.0, 500.0, 1.0)?)
        .try_term(AqiCategory::Good.as_str(), Mf::triangular(0.0, 0.0, 50.0))
        .try_term(AqiCategory::Moderate.as_str(), Mf::triangular(51.0, 100.0, 150.0))
        .try_term(
            AqiCategory::UnhealthySensitive.as_str(),
            Mf::triangular(101.0, 150.0, 200.0),
        )
        .try_term(AqiCategory::Unhealthy.as_str(), Mf::triangular(151.0, 200.0, 300.0))
        .try_term(AqiCategory::VeryUnhealthy.as_str(), Mf::triangular(201.0, 300.0, 400.0))
        .try_term(
            AqiCategory::Hazardous.as_str(),
            Mf::trapezoidal(301.0, 400.0, 500.0, 500.0),
        )
        .build()
}

/// All five inputs in declaration order
pub fn inputs() -> AqiResult<Vec<LinguisticVariable>> {
    Ok(vec![co()?, no2()?, o3()?, temperature()?, humidity()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_variables_build() {
        let inputs = inputs().unwrap();
        let names: Vec<&str> = inputs.iter().map(|v| v.name()).collect();
        assert_eq!(names, INPUT_NAMES.to_vec());
        assert_eq!(co().unwrap().term_names().count(), 5);
        assert_eq!(o3().unwrap().term_names().count(), 4);
        assert_eq!(aqi().unwrap().term_names().count(), 6);
    }

    #[test]
    fn test_diagnostic_flags() {
        assert!(co().unwrap().exposes_diagnostics());
        assert!(no2().unwrap().exposes_diagnostics());
        assert!(o3().unwrap().exposes_diagnostics());
        assert!(!temperature().unwrap().exposes_diagnostics());
        assert!(!humidity().unwrap().exposes_diagnostics());
    }

    #[test]
    fn test_shoulders_reach_one() {
        let co = co().unwrap();
        assert_eq!(co.fuzzify(0.0)["Very_Low"], 1.0);
        assert_eq!(co.fuzzify(20.0)["Very_High"], 1.0);
        assert_eq!(co.fuzzify(50.0)["Very_High"], 1.0);

        let temp = temperature().unwrap();
        assert_eq!(temp.fuzzify(-10.0)["Cold"], 1.0);
        assert_eq!(temp.fuzzify(20.0)["Comfortable"], 1.0);
    }

    #[test]
    fn test_output_terms_follow_categories() {
        let aqi = aqi().unwrap();
        for category in AqiCategory::ALL {
            assert!(aqi.has_term(category.as_str()));
        }
    }
}
