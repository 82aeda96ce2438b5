//! Generic Mamdani fuzzy inference
//!
//! Building blocks, leaves first:
//!
//! - [`MembershipFunction`]: triangular, trapezoidal, Gaussian and ramp shapes
//! - [`Universe`]: bounded, sampled numeric domain
//! - [`LinguisticVariable`]: named dimension with ordered terms
//! - [`FuzzyRule`] / [`RuleBase`]: antecedent trees and their evaluation
//! - [`FuzzySystem`]: fuzzify, evaluate, clip, aggregate, defuzzify
//!
//! Nothing here knows about air quality; see [`crate::aqi`] for the
//! concrete variables and rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_aqi::fuzzy::*;
//!
//! let speed = LinguisticVariable::input("speed", Universe::new(0.0, 100.0, 1.0)?)
//!     .try_term("slow", MembershipFunction::ramp_left(20.0, 50.0))
//!     .try_term("fast", MembershipFunction::ramp_right(50.0, 80.0))
//!     .build()?;
//! let brake = LinguisticVariable::output("brake", Universe::new(0.0, 1.0, 0.01)?)
//!     .try_term("soft", MembershipFunction::triangular(0.0, 0.0, 0.5))
//!     .try_term("hard", MembershipFunction::triangular(0.5, 1.0, 1.0))
//!     .build()?;
//!
//! let system = FuzzySystem::builder()
//!     .input(speed)
//!     .output(brake)
//!     .rule(FuzzyRule::new(Antecedent::is("speed", "fast"), "brake", "hard"))
//!     .build()?;
//!
//! let outcome = system.infer([("speed", 72.0)])?;
//! println!("brake = {:.2}", outcome.value);
//! ```

pub mod defuzz;
pub mod membership;
pub mod rule;
pub mod system;
pub mod universe;
pub mod variable;

pub use defuzz::DefuzzificationMethod;
pub use membership::MembershipFunction;
pub use rule::{Antecedent, Consequent, FuzzyRule, Memberships, RuleActivation, RuleBase};
pub use system::{
    FuzzifiedInputs, FuzzySystem, FuzzySystemBuilder, InferenceOptions, InferenceOutcome,
    DEFAULT_FALLBACK_CONFIDENCE,
};
pub use universe::Universe;
pub use variable::{
    LinguisticVariable, LinguisticVariableBuilder, MembershipCurve, TermDegrees, VariableRole,
};
