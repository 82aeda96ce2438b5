//! Linguistic variables
//!
//! A named dimension (e.g. "CO") with a universe and an ordered set of terms.
//! Variables are assembled with [`LinguisticVariable::builder`] and are
//! immutable once built.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AqiError, AqiResult};
use super::membership::MembershipFunction;
use super::universe::Universe;

/// Degree of membership for each term of one variable, in declaration order
pub type TermDegrees = IndexMap<String, f64>;

/// Whether a variable feeds rule antecedents or receives consequents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableRole {
    Input,
    Output,
}

/// Plot-ready sampling of every term of a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipCurve {
    /// Sample points across the closed universe
    pub universe: Vec<f64>,
    /// Membership degree per term at each sample point
    pub terms: IndexMap<String, Vec<f64>>,
}

/// A linguistic variable with associated terms
#[derive(Debug, Clone, Serialize)]
pub struct LinguisticVariable {
    name: String,
    role: VariableRole,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
    diagnostics: bool,
}

impl LinguisticVariable {
    /// Start building an input variable
    pub fn input(name: impl Into<String>, universe: Universe) -> LinguisticVariableBuilder {
        LinguisticVariableBuilder::new(name, VariableRole::Input, universe)
    }

    /// Start building an output variable
    pub fn output(name: impl Into<String>, universe: Universe) -> LinguisticVariableBuilder {
        LinguisticVariableBuilder::new(name, VariableRole::Output, universe)
    }

    pub fn builder(
        name: impl Into<String>,
        role: VariableRole,
        universe: Universe,
    ) -> LinguisticVariableBuilder {
        LinguisticVariableBuilder::new(name, role, universe)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> VariableRole {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Whether per-term degrees are reported in assessment diagnostics
    pub fn exposes_diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Fuzzify a crisp value - get membership for all terms.
    ///
    /// The value is clamped to the universe bounds first.
    pub fn fuzzify(&self, value: f64) -> TermDegrees {
        let x = self.universe.clamp(value);
        self.terms
            .iter()
            .map(|(name, mf)| (name.clone(), mf.evaluate(x)))
            .collect()
    }

    /// Get the term with highest membership for a value (first wins on ties)
    pub fn dominant_term(&self, value: f64) -> Option<(&str, f64)> {
        let x = self.universe.clamp(value);
        let mut best: Option<(&str, f64)> = None;
        for (name, mf) in &self.terms {
            let degree = mf.evaluate(x);
            match best {
                Some((_, current)) if current >= degree => {}
                _ => best = Some((name.as_str(), degree)),
            }
        }
        best
    }

    /// Sample every term at `n_points` evenly spaced points over the universe
    pub fn sample_curve(&self, n_points: usize) -> MembershipCurve {
        let universe = self.universe.linspace(n_points);
        let terms = self
            .terms
            .iter()
            .map(|(name, mf)| {
                let ys = universe.iter().map(|&x| mf.evaluate(x)).collect();
                (name.clone(), ys)
            })
            .collect();
        MembershipCurve { universe, terms }
    }
}

/// Builder for [`LinguisticVariable`]; duplicate terms are reported at `build`.
#[derive(Debug)]
pub struct LinguisticVariableBuilder {
    name: String,
    role: VariableRole,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
    diagnostics: bool,
    error: Option<AqiError>,
}

impl LinguisticVariableBuilder {
    fn new(name: impl Into<String>, role: VariableRole, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: IndexMap::new(),
            diagnostics: true,
            error: None,
        }
    }

    /// Add a term (fuzzy set) to this variable
    pub fn term(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        let name = name.into();
        if self.error.is_none() {
            if self.terms.contains_key(&name) {
                self.error = Some(AqiError::duplicate_term(&self.name, &name));
            } else if let Err(e) = membership.validate() {
                self.error = Some(
                    e.with_context("variable", self.name.clone())
                        .with_context("term", name.clone()),
                );
            } else {
                self.terms.insert(name, membership);
            }
        }
        self
    }

    /// Add a term whose membership function is still being validated
    pub fn try_term(
        mut self,
        name: impl Into<String>,
        membership: AqiResult<MembershipFunction>,
    ) -> Self {
        match membership {
            Ok(mf) => self.term(name, mf),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(
                        e.with_context("variable", self.name.clone())
                            .with_context("term", name.into()),
                    );
                }
                self
            }
        }
    }

    /// Include or exclude this variable from assessment diagnostics
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn build(self) -> AqiResult<LinguisticVariable> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.terms.is_empty() {
            return Err(AqiError::configuration(format!(
                "variable '{}' declares no terms",
                self.name
            ))
            .with_context("variable", self.name));
        }
        Ok(LinguisticVariable {
            name: self.name,
            role: self.role,
            universe: self.universe,
            terms: self.terms,
            diagnostics: self.diagnostics,
        })
    }
}
