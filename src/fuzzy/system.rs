//! Mamdani fuzzy inference system
//!
//! A [`FuzzySystem`] is an immutable configuration: input variables, one
//! output variable and a rule base, all validated by [`FuzzySystemBuilder`].
//! Every inference runs through two explicit stages:
//!
//! ```text
//!   FuzzySystem ──fuzzify(inputs)──▶ FuzzifiedInputs ──compute()──▶ InferenceOutcome
//!      (idle)                          (inputs set)                     (computed)
//! ```
//!
//! Nothing is written back into the system, so one instance can serve any
//! number of threads concurrently.
//!
//! # Algorithm
//!
//! 1. Each crisp input is clamped to its universe and fuzzified.
//! 2. Every rule's antecedent is evaluated (min / max / complement).
//! 3. Strengths targeting the same output term are combined by maximum.
//! 4. Each output term is clipped at its strength (min implication) and the
//!    clipped sets are max-combined over the sampled output universe.
//! 5. The aggregate is defuzzified. An all-zero aggregate falls back to the
//!    universe midpoint and is flagged in the outcome.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AqiError, AqiResult};
use super::defuzz::DefuzzificationMethod;
use super::rule::{FuzzyRule, Memberships, RuleActivation, RuleBase};
use super::variable::{LinguisticVariable, VariableRole};

/// Confidence reported when no rule fired
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.1;

/// Tunables that do not change the rule semantics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceOptions {
    pub defuzzification: DefuzzificationMethod,
    pub fallback_confidence: f64,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            defuzzification: DefuzzificationMethod::Centroid,
            fallback_confidence: DEFAULT_FALLBACK_CONFIDENCE,
        }
    }
}

/// Fuzzy Inference System
#[derive(Debug, Clone)]
pub struct FuzzySystem {
    inputs: IndexMap<String, LinguisticVariable>,
    output: LinguisticVariable,
    rules: RuleBase,
    options: InferenceOptions,
    /// Sampled output universe
    grid: Vec<f64>,
    /// Each output term evaluated on `grid`
    term_samples: IndexMap<String, Vec<f64>>,
}

impl FuzzySystem {
    pub fn builder() -> FuzzySystemBuilder {
        FuzzySystemBuilder::default()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.inputs.values()
    }

    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        self.inputs.get(name)
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Idle → Inputs-Set: fuzzify one crisp value per declared input.
    ///
    /// Names that match no input variable are ignored; a declared input
    /// without a value is a `MissingInput` error.
    pub fn fuzzify<I, K>(&self, inputs: I) -> AqiResult<FuzzifiedInputs<'_>>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut supplied: IndexMap<String, f64> = IndexMap::new();
        for (name, value) in inputs {
            let name = name.as_ref();
            if self.inputs.contains_key(name) {
                supplied.insert(name.to_string(), value);
            } else {
                debug!(variable = name, "ignoring value for undeclared input");
            }
        }

        let mut crisp = IndexMap::with_capacity(self.inputs.len());
        let mut memberships = Memberships::with_capacity(self.inputs.len());
        for (name, variable) in &self.inputs {
            let value = supplied
                .get(name)
                .copied()
                .ok_or_else(|| AqiError::missing_input(name))?;
            crisp.insert(name.clone(), value);
            memberships.insert(name.clone(), variable.fuzzify(value));
        }

        Ok(FuzzifiedInputs {
            system: self,
            crisp,
            memberships,
        })
    }

    /// Run both stages in one call
    pub fn infer<I, K>(&self, inputs: I) -> AqiResult<InferenceOutcome>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Ok(self.fuzzify(inputs)?.compute())
    }

    /// Pointwise max of every output term clipped at its strength
    fn aggregate(&self, term_strengths: &IndexMap<String, f64>) -> Vec<f64> {
        let mut aggregate = vec![0.0; self.grid.len()];
        for (term, samples) in &self.term_samples {
            let strength = term_strengths.get(term).copied().unwrap_or(0.0);
            if strength <= 0.0 {
                continue;
            }
            for (current, &mu) in aggregate.iter_mut().zip(samples) {
                let implied = strength.min(mu);
                if implied > *current {
                    *current = implied;
                }
            }
        }
        aggregate
    }
}

/// Inputs fuzzified against a system, ready for rule evaluation
#[derive(Debug, Clone)]
pub struct FuzzifiedInputs<'a> {
    system: &'a FuzzySystem,
    crisp: IndexMap<String, f64>,
    memberships: Memberships,
}

impl<'a> FuzzifiedInputs<'a> {
    pub fn memberships(&self) -> &Memberships {
        &self.memberships
    }

    pub fn crisp(&self) -> &IndexMap<String, f64> {
        &self.crisp
    }

    /// Inputs-Set → Computed
    pub fn compute(self) -> InferenceOutcome {
        let system = self.system;
        let activations = system.rules.evaluate(&self.memberships);
        let term_strengths = RuleBase::aggregate(&activations);
        let aggregate = system.aggregate(&term_strengths);

        let defuzzified = system
            .options
            .defuzzification
            .defuzzify(&system.grid, &aggregate);

        let fired: Vec<f64> = activations
            .iter()
            .filter(|a| a.fired())
            .map(|a| a.strength)
            .collect();

        let (value, confidence, fallback_used) = match defuzzified {
            Some(value) if !fired.is_empty() => {
                let confidence = fired.iter().sum::<f64>() / fired.len() as f64;
                (value, confidence, false)
            }
            _ => {
                let midpoint = system.output.universe().midpoint();
                warn!(
                    output = system.output.name(),
                    fallback = midpoint,
                    "no rule fired; falling back to universe midpoint"
                );
                (midpoint, system.options.fallback_confidence, true)
            }
        };

        debug!(
            output = system.output.name(),
            value,
            confidence,
            fired = fired.len(),
            "inference computed"
        );

        InferenceOutcome {
            value,
            confidence,
            fallback_used,
            activations,
            term_strengths,
            memberships: self.memberships,
            inputs: self.crisp,
        }
    }
}

/// Result of one inference; carries no reference to the system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceOutcome {
    /// Defuzzified output value
    pub value: f64,
    /// Mean strength of the rules that fired, or the fallback default
    pub confidence: f64,
    /// True when the aggregate set was empty and the midpoint was used
    pub fallback_used: bool,
    /// Every rule in rule-base order
    pub activations: Vec<RuleActivation>,
    /// Aggregated strength per output term
    pub term_strengths: IndexMap<String, f64>,
    /// Term degrees per input variable
    pub memberships: Memberships,
    /// Crisp inputs as supplied (before clamping)
    pub inputs: IndexMap<String, f64>,
}

impl InferenceOutcome {
    pub fn fired_rules(&self) -> impl Iterator<Item = &RuleActivation> {
        self.activations.iter().filter(|a| a.fired())
    }
}

/// Builder that validates variables and rules before producing a system
#[derive(Debug, Default)]
pub struct FuzzySystemBuilder {
    inputs: Vec<LinguisticVariable>,
    output: Option<LinguisticVariable>,
    rules: Vec<FuzzyRule>,
    options: InferenceOptions,
}

impl FuzzySystemBuilder {
    pub fn input(mut self, variable: LinguisticVariable) -> Self {
        self.inputs.push(variable);
        self
    }

    pub fn output(mut self, variable: LinguisticVariable) -> Self {
        self.output = Some(variable);
        self
    }

    pub fn rule(mut self, rule: FuzzyRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = FuzzyRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn defuzzification(mut self, method: DefuzzificationMethod) -> Self {
        self.options.defuzzification = method;
        self
    }

    pub fn fallback_confidence(mut self, confidence: f64) -> Self {
        self.options.fallback_confidence = confidence;
        self
    }

    pub fn build(self) -> AqiResult<FuzzySystem> {
        let output = self
            .output
            .ok_or_else(|| AqiError::configuration("fuzzy system has no output variable"))?;
        if output.role() != VariableRole::Output {
            return Err(AqiError::configuration(format!(
                "variable '{}' is not declared as an output",
                output.name()
            )));
        }

        let mut inputs: IndexMap<String, LinguisticVariable> = IndexMap::new();
        for variable in self.inputs {
            if variable.role() != VariableRole::Input {
                return Err(AqiError::configuration(format!(
                    "variable '{}' is not declared as an input",
                    variable.name()
                )));
            }
            if inputs.contains_key(variable.name()) || variable.name() == output.name() {
                return Err(AqiError::duplicate_variable(variable.name()));
            }
            inputs.insert(variable.name().to_string(), variable);
        }

        let fallback = self.options.fallback_confidence;
        if !(0.0..=1.0).contains(&fallback) {
            return Err(AqiError::configuration(format!(
                "fallback confidence must lie in [0, 1] (got {})",
                fallback
            )));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            validate_rule(rule, &inputs, &output)
                .map_err(|e| e.with_context("rule", index.to_string()))?;
        }

        let grid: Vec<f64> = output.universe().points().collect();
        let term_samples = output
            .terms()
            .map(|(name, mf)| {
                let samples = grid.iter().map(|&y| mf.evaluate(y)).collect();
                (name.to_string(), samples)
            })
            .collect();

        info!(
            inputs = inputs.len(),
            output = output.name(),
            rules = self.rules.len(),
            resolution = grid.len(),
            "fuzzy system built"
        );

        Ok(FuzzySystem {
            inputs,
            output,
            rules: RuleBase::from_rules(self.rules),
            options: self.options,
            grid,
            term_samples,
        })
    }
}

fn validate_rule(
    rule: &FuzzyRule,
    inputs: &IndexMap<String, LinguisticVariable>,
    output: &LinguisticVariable,
) -> AqiResult<()> {
    if !rule.weight.is_finite() || !(0.0..=1.0).contains(&rule.weight) {
        return Err(AqiError::invalid_rule(format!(
            "rule weight must lie in [0, 1] (got {})",
            rule.weight
        )));
    }

    for (variable, term) in rule.antecedent.leaves() {
        let declared = inputs
            .get(variable)
            .ok_or_else(|| AqiError::unknown_variable(variable))?;
        if !declared.has_term(term) {
            return Err(AqiError::unknown_term(variable, term));
        }
    }

    let consequent = &rule.consequent;
    if consequent.variable != output.name() {
        return Err(AqiError::unknown_variable(&consequent.variable)
            .with_hint(format!("consequents must target '{}'", output.name())));
    }
    if !output.has_term(&consequent.term) {
        return Err(AqiError::unknown_term(&consequent.variable, &consequent.term));
    }
    Ok(())
}
