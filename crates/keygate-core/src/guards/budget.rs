// crates/keygate-core/src/guards/budget.rs
// ============================================================================
// Module: Keygate Budget Guard
// Description: Hierarchical spend-versus-limit evaluation.
// Purpose: Enforce key, team, and personal budgets in a fixed precedence.
// Dependencies: crate::core::records, crate::error
// ============================================================================

//! ## Overview
//! Budgets are evaluated hierarchically and mutually exclusively:
//! 1. The key's own limit, when the key carries one.
//! 2. Team spend against the team limit, when the identity belongs to a
//!    team; team membership supersedes individual limits, so the personal
//!    budget is not consulted.
//! 3. Otherwise the user's personal spend against the personal limit.
//!
//! A `None` limit means unlimited. A concrete limit is exceeded when current
//! spend is strictly greater than the limit; equality still admits. Team
//! figures come from the reconciled working context (see
//! [`crate::reconcile`]), never from the raw embedded snapshot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::records::AuthorizationContext;
use crate::core::records::UserRecord;
use crate::error::AdmissionError;

// ============================================================================
// SECTION: Budget Tiers
// ============================================================================

/// Budget tier identified in a rejection.
///
/// # Invariants
/// - Variants are stable for telemetry labeling and error rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    /// The key's own budget.
    Key,
    /// The team budget superseding personal limits.
    Team,
    /// The user's personal budget.
    Personal,
}

impl BudgetTier {
    /// Returns a stable label for the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Team => "team",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Budget Evaluation
// ============================================================================

/// Checks one tier's spend against its optional limit.
fn check_tier(tier: BudgetTier, spend: f64, limit: Option<f64>) -> Result<(), AdmissionError> {
    match limit {
        Some(limit) if spend > limit => Err(AdmissionError::BudgetExceeded {
            tier,
            spend,
            limit,
        }),
        Some(_) | None => Ok(()),
    }
}

/// Evaluates the budget hierarchy for a resolved identity.
///
/// `user` is the canonical user record when one was resolved; personal
/// limits are unknown (treated as unlimited) without it.
///
/// # Errors
///
/// Returns [`AdmissionError::BudgetExceeded`] carrying the exceeded tier and
/// figures.
pub fn check_budget(
    context: &AuthorizationContext,
    user: Option<&UserRecord>,
) -> Result<(), AdmissionError> {
    check_tier(BudgetTier::Key, context.spend, context.max_budget)?;
    if context.team_id.is_some() {
        return check_tier(BudgetTier::Team, context.team_spend, context.team_max_budget);
    }
    if let Some(user) = user {
        return check_tier(BudgetTier::Personal, user.spend, user.max_budget);
    }
    Ok(())
}
