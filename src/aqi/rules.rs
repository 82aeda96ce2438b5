//! Standard air-quality rule base
//!
//! Ten rules in four groups: single-pollutant dominance (1-5), combined
//! pollutants (6-7), weather amplification (8-9) and emergency conditions (10).

use crate::fuzzy::{Antecedent, FuzzyRule};

use super::category::AqiCategory;
use super::variables::{AQI, CO, HUMIDITY, NO2, O3, TEMPERATURE};

fn co(term: &str) -> Antecedent {
    Antecedent::is(CO, term)
}

fn no2(term: &str) -> Antecedent {
    Antecedent::is(NO2, term)
}

fn o3(term: &str) -> Antecedent {
    Antecedent::is(O3, term)
}

fn temperature(term: &str) -> Antecedent {
    Antecedent::is(TEMPERATURE, term)
}

fn humidity(term: &str) -> Antecedent {
    Antecedent::is(HUMIDITY, term)
}

fn then(name: &str, antecedent: Antecedent, category: AqiCategory) -> FuzzyRule {
    FuzzyRule::new(antecedent, AQI, category.as_str()).with_name(name)
}

/// The standard rule base, in evaluation order
pub fn standard_rules() -> Vec<FuzzyRule> {
    vec![
        then(
            "clean_air",
            co("Very_Low")
                .and(no2("Excellent").or(no2("Good")))
                .and(o3("Good").or(o3("Moderate"))),
            AqiCategory::Good,
        ),
        then(
            "low_co_fair_no2",
            co("Low").and(no2("Fair")).and(o3("Moderate")),
            AqiCategory::Moderate,
        ),
        then(
            "moderate_co",
            co("Moderate").and(no2("Fair").or(no2("Poor"))),
            AqiCategory::UnhealthySensitive,
        ),
        then(
            "high_co_or_poor_no2",
            co("High").or(no2("Poor")),
            AqiCategory::Unhealthy,
        ),
        then(
            "any_hazardous",
            co("Very_High").or(no2("Hazardous")).or(o3("Very_Unhealthy")),
            AqiCategory::Hazardous,
        ),
        then(
            "low_combined",
            co("Low").and(no2("Good")).and(o3("Good")),
            AqiCategory::Good,
        ),
        then(
            "moderate_combined",
            co("Moderate").or(no2("Fair")).and(o3("Moderate")),
            AqiCategory::Moderate,
        ),
        then(
            "hot_humid_amplification",
            co("High")
                .or(no2("Poor"))
                .and(temperature("Hot"))
                .and(humidity("Humid")),
            AqiCategory::VeryUnhealthy,
        ),
        then(
            "summer_ozone",
            o3("Unhealthy").and(temperature("Hot")),
            AqiCategory::Unhealthy,
        ),
        then(
            "emergency",
            co("Very_High")
                .and(no2("Hazardous"))
                .or(o3("Very_Unhealthy").and(temperature("Hot"))),
            AqiCategory::Hazardous,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_count_and_names() {
        let rules = standard_rules();
        assert_eq!(rules.len(), 10);
        let names: HashSet<_> = rules.iter().filter_map(|r| r.name.clone()).collect();
        assert_eq!(names.len(), 10);
        assert!(rules.iter().all(|r| r.consequent.variable == AQI));
    }

    #[test]
    fn test_rule_rendering() {
        let rules = standard_rules();
        assert_eq!(
            rules[3].to_string(),
            "[high_co_or_poor_no2] IF (CO.High OR NO2.Poor) THEN AQI.Unhealthy"
        );
        let leaves = rules[7].antecedent.leaves();
        assert!(leaves.contains(&(HUMIDITY, "Humid")));
        assert!(leaves.contains(&(TEMPERATURE, "Hot")));
    }
}
