//! Fuzzy rules and rule-base evaluation
//!
//! An antecedent is an explicit expression tree over `variable.term` leaves:
//!
//! - `And` takes the minimum of its children (t-norm)
//! - `Or` takes the maximum (t-conorm)
//! - `Not` takes the complement `1 - x`
//!
//! A leaf whose degree is absent from the supplied memberships evaluates
//! to 0, so a variable a rule does not mention never gates it.
//!
//! ```rust,ignore
//! use fuzzy_aqi::fuzzy::{Antecedent, FuzzyRule};
//!
//! let rule = FuzzyRule::new(
//!     Antecedent::is("CO", "High").or(Antecedent::is("NO2", "Poor")),
//!     "AQI",
//!     "Unhealthy",
//! );
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::variable::TermDegrees;

/// Term degrees for every fuzzified input variable
pub type Memberships = IndexMap<String, TermDegrees>;

/// Antecedent expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    /// `variable IS term`
    Term { variable: String, term: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
    Not(Box<Antecedent>),
}

impl Antecedent {
    /// Leaf: `variable IS term`
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Term {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, other: Antecedent) -> Self {
        Antecedent::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Antecedent) -> Self {
        Antecedent::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Antecedent::Not(Box::new(self))
    }

    /// Conjunction of several antecedents; `None` for an empty list
    pub fn all(parts: impl IntoIterator<Item = Antecedent>) -> Option<Self> {
        parts.into_iter().reduce(Antecedent::and)
    }

    /// Disjunction of several antecedents; `None` for an empty list
    pub fn any(parts: impl IntoIterator<Item = Antecedent>) -> Option<Self> {
        parts.into_iter().reduce(Antecedent::or)
    }

    /// Evaluate by recursive descent
    pub fn evaluate(&self, memberships: &Memberships) -> f64 {
        match self {
            Antecedent::Term { variable, term } => memberships
                .get(variable)
                .and_then(|degrees| degrees.get(term))
                .copied()
                .unwrap_or(0.0),
            Antecedent::And(left, right) => {
                left.evaluate(memberships).min(right.evaluate(memberships))
            }
            Antecedent::Or(left, right) => {
                left.evaluate(memberships).max(right.evaluate(memberships))
            }
            Antecedent::Not(inner) => 1.0 - inner.evaluate(memberships),
        }
    }

    /// All `(variable, term)` leaves, left to right
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Antecedent::Term { variable, term } => out.push((variable.as_str(), term.as_str())),
            Antecedent::And(l, r) | Antecedent::Or(l, r) => {
                l.collect_leaves(out);
                r.collect_leaves(out);
            }
            Antecedent::Not(inner) => inner.collect_leaves(out),
        }
    }
}

impl std::fmt::Display for Antecedent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Antecedent::Term { variable, term } => write!(f, "{}.{}", variable, term),
            Antecedent::And(l, r) => write!(f, "({} AND {})", l, r),
            Antecedent::Or(l, r) => write!(f, "({} OR {})", l, r),
            Antecedent::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

/// A fuzzy rule consequent (conclusion)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequent {
    /// Output variable name
    pub variable: String,
    /// Output term name
    pub term: String,
}

/// A fuzzy rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyRule {
    /// Rule name/label
    pub name: Option<String>,
    /// Condition
    pub antecedent: Antecedent,
    /// Conclusion
    pub consequent: Consequent,
    /// Rule weight in [0, 1]
    pub weight: f64,
}

impl FuzzyRule {
    pub fn new(
        antecedent: Antecedent,
        output_variable: impl Into<String>,
        output_term: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            antecedent,
            consequent: Consequent {
                variable: output_variable.into(),
                term: output_term.into(),
            },
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Firing strength: antecedent degree scaled by the rule weight
    pub fn firing_strength(&self, memberships: &Memberships) -> f64 {
        (self.antecedent.evaluate(memberships) * self.weight).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref name) = self.name {
            write!(f, "[{}] ", name)?;
        }
        write!(
            f,
            "IF {} THEN {}.{}",
            self.antecedent, self.consequent.variable, self.consequent.term
        )
    }
}

/// Firing of one rule for one set of inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    /// Position of the rule in the rule base
    pub index: usize,
    /// Rule label, if any
    pub name: Option<String>,
    /// Output term the rule concludes
    pub consequent: String,
    /// Firing strength in [0, 1]
    pub strength: f64,
}

impl RuleActivation {
    pub fn fired(&self) -> bool {
        self.strength > 0.0
    }
}

/// Ordered collection of rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleBase {
    rules: Vec<FuzzyRule>,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<FuzzyRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: FuzzyRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule in order; zero-strength rules are kept.
    pub fn evaluate(&self, memberships: &Memberships) -> Vec<RuleActivation> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleActivation {
                index,
                name: rule.name.clone(),
                consequent: rule.consequent.term.clone(),
                strength: rule.firing_strength(memberships),
            })
            .collect()
    }

    /// Combine activations per consequent term by maximum.
    ///
    /// Terms appear in the order they are first concluded.
    pub fn aggregate(activations: &[RuleActivation]) -> IndexMap<String, f64> {
        let mut strengths: IndexMap<String, f64> = IndexMap::new();
        for activation in activations {
            let entry = strengths.entry(activation.consequent.clone()).or_insert(0.0);
            *entry = entry.max(activation.strength);
        }
        strengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn memberships(pairs: &[(&str, &str, f64)]) -> Memberships {
        let mut m: Memberships = IndexMap::new();
        for (var, term, degree) in pairs {
            m.entry(var.to_string())
                .or_default()
                .insert(term.to_string(), *degree);
        }
        m
    }

    #[test]
    fn test_leaf_lookup() {
        let m = memberships(&[("CO", "Low", 0.3)]);
        assert_eq!(Antecedent::is("CO", "Low").evaluate(&m), 0.3);
        // Missing variable or term reads as 0
        assert_eq!(Antecedent::is("CO", "High").evaluate(&m), 0.0);
        assert_eq!(Antecedent::is("NO2", "Poor").evaluate(&m), 0.0);
    }

    #[test]
    fn test_operators() {
        let m = memberships(&[("a", "x", 0.6), ("b", "y", 0.4)]);
        let a = Antecedent::is("a", "x");
        let b = Antecedent::is("b", "y");

        assert!((a.clone().and(b.clone()).evaluate(&m) - 0.4).abs() < 1e-12);
        assert!((a.clone().or(b.clone()).evaluate(&m) - 0.6).abs() < 1e-12);
        assert!((a.clone().negate().evaluate(&m) - 0.4).abs() < 1e-12);
        assert!((a.negate().and(b).evaluate(&m) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_all_any() {
        let m = memberships(&[("a", "x", 0.2), ("b", "y", 0.9), ("c", "z", 0.5)]);
        let parts = || {
            vec![
                Antecedent::is("a", "x"),
                Antecedent::is("b", "y"),
                Antecedent::is("c", "z"),
            ]
        };
        assert_eq!(Antecedent::all(parts()).unwrap().evaluate(&m), 0.2);
        assert_eq!(Antecedent::any(parts()).unwrap().evaluate(&m), 0.9);
        assert!(Antecedent::all(Vec::new()).is_none());
    }

    #[test]
    fn test_leaves_and_display() {
        let ante = Antecedent::is("CO", "High")
            .or(Antecedent::is("NO2", "Poor"))
            .and(Antecedent::is("Temperature", "Hot").negate());
        assert_eq!(
            ante.leaves(),
            vec![("CO", "High"), ("NO2", "Poor"), ("Temperature", "Hot")]
        );
        assert_eq!(
            ante.to_string(),
            "((CO.High OR NO2.Poor) AND NOT Temperature.Hot)"
        );
    }

    #[test]
    fn test_rule_base_keeps_order_and_zero_rules() {
        let base = RuleBase::from_rules(vec![
            FuzzyRule::new(Antecedent::is("a", "x"), "out", "low").with_name("r1"),
            FuzzyRule::new(Antecedent::is("b", "y"), "out", "high"),
            FuzzyRule::new(Antecedent::is("a", "x").negate(), "out", "low"),
        ]);
        let m = memberships(&[("a", "x", 0.7)]);
        let activations = base.evaluate(&m);

        assert_eq!(activations.len(), 3);
        assert_eq!(activations[0].name.as_deref(), Some("r1"));
        assert_eq!(activations[1].strength, 0.0);
        assert!(!activations[1].fired());
        assert!((activations[2].strength - 0.3).abs() < 1e-12);

        let aggregated = RuleBase::aggregate(&activations);
        assert!((aggregated["low"] - 0.7).abs() < 1e-12);
        assert_eq!(aggregated["high"], 0.0);
    }

    #[test]
    fn test_rule_weight() {
        let rule = FuzzyRule::new(Antecedent::is("a", "x"), "out", "low").with_weight(0.5);
        let m = memberships(&[("a", "x", 0.8)]);
        assert!((rule.firing_strength(&m) - 0.4).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_and_or_not(d1 in 0.0f64..=1.0, d2 in 0.0f64..=1.0) {
            let m = memberships(&[("a", "x", d1), ("b", "y", d2)]);
            let a = Antecedent::is("a", "x");
            let b = Antecedent::is("b", "y");
            prop_assert_eq!(a.clone().and(b.clone()).evaluate(&m), d1.min(d2));
            prop_assert_eq!(a.clone().or(b).evaluate(&m), d1.max(d2));
            prop_assert_eq!(a.negate().evaluate(&m), 1.0 - d1);
        }

        #[test]
        fn prop_aggregate_is_max(strengths in proptest::collection::vec(0.0f64..=1.0, 1..20)) {
            let activations: Vec<RuleActivation> = strengths
                .iter()
                .enumerate()
                .map(|(index, &strength)| RuleActivation {
                    index,
                    name: None,
                    consequent: "t".to_string(),
                    strength,
                })
                .collect();
            let expected = strengths.iter().cloned().fold(0.0, f64::max);
            prop_assert_eq!(RuleBase::aggregate(&activations)["t"], expected);
        }
    }
}
