//! Sampled numeric amounts used by populator configuration.
//!
//! A [`VariableAmount`] describes how a number is drawn each time a populator
//! needs one: a constant, a uniform range, a base with variance or with a
//! random addition, or a weighted pick between nested amounts. Besides
//! sampling, every amount reports the bounds of what it can produce, which is
//! how configuration rejects distributions that could go negative.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::random::{rand01, roll};

/// A numeric value that is re-sampled on every use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum VariableAmount {
    /// Always the same value.
    Fixed(f64),
    /// Uniform in `[min, max)`.
    Range { min: f64, max: f64 },
    /// Uniform in `[base - variance, base + variance)`.
    BaseWithVariance { base: f64, variance: f64 },
    /// `base` plus a uniform fraction of `addition`.
    BaseWithRandomAddition { base: f64, addition: f64 },
    /// Like [`VariableAmount::BaseWithRandomAddition`], but the addition only
    /// applies when a roll against `chance` succeeds.
    BaseWithOptionalAddition { base: f64, addition: f64, chance: f64 },
    /// Picks one entry proportionally to its weight and samples it.
    Weighted(Vec<WeightedAmount>),
}

/// One entry of a [`VariableAmount::Weighted`] distribution.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedAmount {
    pub weight: f64,
    pub amount: VariableAmount,
}

impl WeightedAmount {
    pub fn new(weight: f64, amount: VariableAmount) -> Self {
        Self { weight, amount }
    }
}

impl VariableAmount {
    pub fn fixed(value: f64) -> Self {
        Self::Fixed(value)
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max }
    }

    pub fn base_with_variance(base: f64, variance: f64) -> Self {
        Self::BaseWithVariance { base, variance }
    }

    pub fn base_with_random_addition(base: f64, addition: f64) -> Self {
        Self::BaseWithRandomAddition { base, addition }
    }

    pub fn base_with_optional_addition(base: f64, addition: f64, chance: f64) -> Self {
        Self::BaseWithOptionalAddition {
            base,
            addition,
            chance,
        }
    }

    pub fn weighted(entries: Vec<WeightedAmount>) -> Self {
        Self::Weighted(entries)
    }

    /// Draws a value.
    ///
    /// Amounts that fail [`VariableAmount::validate`] still sample without
    /// panicking; an empty weighted list yields `0.0`.
    pub fn amount(&self, rng: &mut dyn RngCore) -> f64 {
        match self {
            Self::Fixed(v) => *v,
            Self::Range { min, max } => min + rand01(rng) * (max - min),
            Self::BaseWithVariance { base, variance } => {
                base + rand01(rng) * variance * 2.0 - variance
            }
            Self::BaseWithRandomAddition { base, addition } => base + rand01(rng) * addition,
            Self::BaseWithOptionalAddition {
                base,
                addition,
                chance,
            } => {
                if roll(rng, *chance) {
                    base + rand01(rng) * addition
                } else {
                    *base
                }
            }
            Self::Weighted(entries) => pick_weighted(entries, rng)
                .map(|entry| entry.amount.amount(rng))
                .unwrap_or(0.0),
        }
    }

    /// Draws a value and rounds it down.
    pub fn floored_amount(&self, rng: &mut dyn RngCore) -> i64 {
        self.amount(rng).floor() as i64
    }

    /// Smallest value this amount can produce.
    pub fn min_bound(&self) -> f64 {
        self.bounds().0
    }

    /// Largest value this amount can produce.
    pub fn max_bound(&self) -> f64 {
        self.bounds().1
    }

    /// Returns `true` if any sample could be below zero.
    pub fn can_be_negative(&self) -> bool {
        self.min_bound() < 0.0
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Fixed(v) => (*v, *v),
            Self::Range { min, max } => (min.min(*max), min.max(*max)),
            Self::BaseWithVariance { base, variance } => {
                let v = variance.abs();
                (base - v, base + v)
            }
            Self::BaseWithRandomAddition { base, addition } => {
                (base + addition.min(0.0), base + addition.max(0.0))
            }
            Self::BaseWithOptionalAddition {
                base,
                addition,
                chance,
            } => {
                if *chance <= 0.0 {
                    (*base, *base)
                } else {
                    (base + addition.min(0.0), base + addition.max(0.0))
                }
            }
            Self::Weighted(entries) => entries
                .iter()
                .filter(|e| e.weight > 0.0)
                .map(|e| e.amount.bounds())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                    (lo.min(a), hi.max(b))
                }),
        }
    }

    /// Checks that every parameter is finite, chances lie in `[0, 1]`, and
    /// weighted lists have a positive total weight.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed(v) => finite("value", *v),
            Self::Range { min, max } => {
                finite("min", *min)?;
                finite("max", *max)
            }
            Self::BaseWithVariance { base, variance } => {
                finite("base", *base)?;
                finite("variance", *variance)
            }
            Self::BaseWithRandomAddition { base, addition } => {
                finite("base", *base)?;
                finite("addition", *addition)
            }
            Self::BaseWithOptionalAddition {
                base,
                addition,
                chance,
            } => {
                finite("base", *base)?;
                finite("addition", *addition)?;
                if !(0.0..=1.0).contains(chance) {
                    return Err(Error::InvalidAmount(format!(
                        "chance must be within [0, 1], got {chance}"
                    )));
                }
                Ok(())
            }
            Self::Weighted(entries) => {
                let mut total = 0.0;
                for entry in entries {
                    if !entry.weight.is_finite() || entry.weight < 0.0 {
                        return Err(Error::InvalidAmount(format!(
                            "weights must be finite and >= 0, got {}",
                            entry.weight
                        )));
                    }
                    entry.amount.validate()?;
                    total += entry.weight;
                }
                if total <= 0.0 {
                    return Err(Error::InvalidAmount(
                        "weighted amount needs a positive total weight".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Validates the amount and rejects it if it could produce a negative
    /// value. `field` names the setting in the returned error.
    pub fn ensure_non_negative(&self, field: &'static str) -> Result<()> {
        self.validate()?;
        let min = self.min_bound();
        if min < 0.0 {
            return Err(Error::NegativeAmount { field, min });
        }
        Ok(())
    }
}

impl From<f64> for VariableAmount {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidAmount(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

fn pick_weighted<'a>(
    entries: &'a [WeightedAmount],
    rng: &mut dyn RngCore,
) -> Option<&'a WeightedAmount> {
    let total: f64 = entries.iter().filter(|e| e.weight > 0.0).map(|e| e.weight).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rand01(rng) * total;
    for entry in entries.iter().filter(|e| e.weight > 0.0) {
        remaining -= entry.weight;
        if remaining < 0.0 {
            return Some(entry);
        }
    }

    entries.iter().rev().find(|e| e.weight > 0.0)
}
