use super::tax::{TaxInput, resolve_tax};

/// Net convergence tolerance: five pence, so genuine small deltas are not
/// masked by a whole-pound tolerance.
pub const NET_TOLERANCE: f64 = 0.05;
pub const MAX_ITERATIONS: u32 = 30;

/// Worst-case-tax heuristic for the search's upper bound.
const GROSS_SEARCH_MULTIPLE: f64 = 2.5;

/// The household's income picture for the year, before any pension
/// withdrawal. The solver holds it fixed and varies only the withdrawal.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeContext {
    pub gross_salary: f64,
    pub gross_dividends: f64,
    pub gross_state_pension: f64,
    pub gross_db_pension: f64,
    pub gross_rental_profit: f64,
    pub other_taxable_income: f64,
    pub pension_tax_free_fraction: f64,
    pub inflation_multiplier: f64,
}

impl IncomeContext {
    fn tax_input(&self, gross_withdrawal: f64) -> TaxInput {
        TaxInput {
            gross_salary: self.gross_salary,
            gross_dividends: self.gross_dividends,
            gross_state_pension: self.gross_state_pension,
            gross_db_pension: self.gross_db_pension,
            gross_rental_profit: self.gross_rental_profit,
            other_taxable_income: self.other_taxable_income,
            gross_pension_withdrawal: gross_withdrawal,
            pension_tax_free_fraction: self.pension_tax_free_fraction,
            inflation_multiplier: self.inflation_multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GrossWithdrawal {
    pub gross: f64,
    pub net: f64,
}

/// Find the gross pension withdrawal whose net contribution, on top of the
/// existing income context, equals `target_net`.
///
/// The gross-to-net relationship is non-linear (band filling, allowance
/// tapering), so this inverts the tax resolver by binary search over
/// `[target, 2.5 × target]`. The result is clamped to the available pot;
/// when the pot cannot supply even the 0%-tax minimum the whole pot is
/// withdrawn and whatever net it yields is reported, which is how a
/// shortfall is allowed to occur.
pub fn resolve_gross_withdrawal(
    target_net: f64,
    context: &IncomeContext,
    available_pot: f64,
) -> GrossWithdrawal {
    if !target_net.is_finite() || target_net <= 0.0 || available_pot <= 0.0 {
        return GrossWithdrawal::default();
    }

    let baseline_net = resolve_tax(&context.tax_input(0.0)).total_net_income;
    let net_delta = |gross: f64| -> f64 {
        resolve_tax(&context.tax_input(gross)).total_net_income - baseline_net
    };

    if available_pot <= target_net {
        let net = net_delta(available_pot).max(0.0);
        return GrossWithdrawal {
            gross: available_pot,
            net,
        };
    }

    let mut lo = target_net;
    let mut hi = target_net * GROSS_SEARCH_MULTIPLE;
    let mut gross = hi;

    for _ in 0..MAX_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        let delta = net_delta(mid);
        gross = mid;
        if (delta - target_net).abs() <= NET_TOLERANCE {
            break;
        }
        if delta < target_net {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let gross = gross.min(available_pot);
    GrossWithdrawal {
        gross,
        net: net_delta(gross).max(0.0),
    }
}
