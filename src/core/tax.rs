use super::types::TaxBreakdown;

// Frozen thresholds: held in nominal terms for the whole projection.
pub const PERSONAL_ALLOWANCE: f64 = 12_570.0;
pub const ALLOWANCE_TAPER_THRESHOLD: f64 = 100_000.0;
pub const NI_PRIMARY_THRESHOLD: f64 = 12_570.0;
pub const NI_UPPER_THRESHOLD: f64 = 50_270.0;

// Policy bands: uprated by the year's inflation multiplier.
pub const BASIC_BAND_TOP: f64 = 37_700.0;
pub const ADDITIONAL_BAND_FLOOR: f64 = 125_140.0;
pub const DIVIDEND_ALLOWANCE: f64 = 500.0;

pub const BASIC_RATE: f64 = 0.20;
pub const HIGHER_RATE: f64 = 0.40;
pub const ADDITIONAL_RATE: f64 = 0.45;
pub const NI_MAIN_RATE: f64 = 0.08;
pub const NI_UPPER_RATE: f64 = 0.02;
pub const DIVIDEND_BASIC_RATE: f64 = 0.0875;
pub const DIVIDEND_HIGHER_RATE: f64 = 0.3375;
pub const DIVIDEND_ADDITIONAL_RATE: f64 = 0.3935;

// Statutory annual caps: never inflation-adjusted.
pub const PENSION_ANNUAL_ALLOWANCE: f64 = 60_000.0;
pub const ISA_ANNUAL_ALLOWANCE: f64 = 20_000.0;
pub const CGT_ANNUAL_EXEMPT: f64 = 3_000.0;

pub const CGT_BASIC_RATE: f64 = 0.10;
pub const CGT_HIGHER_RATE: f64 = 0.20;
pub const CGT_RESIDENTIAL_BASIC_RATE: f64 = 0.18;
pub const CGT_RESIDENTIAL_HIGHER_RATE: f64 = 0.24;

/// Gross income by category for a single tax year.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxInput {
    pub gross_salary: f64,
    pub gross_dividends: f64,
    pub gross_state_pension: f64,
    pub gross_db_pension: f64,
    pub gross_rental_profit: f64,
    pub other_taxable_income: f64,
    pub gross_pension_withdrawal: f64,
    pub pension_tax_free_fraction: f64,
    pub inflation_multiplier: f64,
}

/// Net amounts per category plus the full breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxOutcome {
    pub net_salary: f64,
    pub net_dividends: f64,
    pub net_state_pension: f64,
    pub net_db_pension: f64,
    pub net_rental_profit: f64,
    pub net_other_taxable: f64,
    pub net_pension_withdrawal: f64,
    pub total_net_income: f64,
    pub breakdown: TaxBreakdown,
}

fn pos(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Resolve one year's UK income tax, National Insurance and dividend tax.
///
/// Pure function: same inputs yield the same outcome, no hidden state.
/// The personal allowance and its taper threshold are frozen; the band
/// edges and dividend allowance grow with the inflation multiplier.
pub fn resolve_tax(input: &TaxInput) -> TaxOutcome {
    let m = if input.inflation_multiplier.is_finite() && input.inflation_multiplier > 0.0 {
        input.inflation_multiplier
    } else {
        1.0
    };

    let salary = pos(input.gross_salary);
    let dividends = pos(input.gross_dividends);
    let state_pension = pos(input.gross_state_pension);
    let db_pension = pos(input.gross_db_pension);
    let rental = pos(input.gross_rental_profit);
    let other = pos(input.other_taxable_income);
    let withdrawal = pos(input.gross_pension_withdrawal);
    let tax_free_fraction = if input.pension_tax_free_fraction.is_finite() {
        input.pension_tax_free_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let taxable_withdrawal = withdrawal * (1.0 - tax_free_fraction);
    let tax_free_withdrawal = withdrawal - taxable_withdrawal;

    let non_dividend =
        salary + state_pension + db_pension + rental + other + taxable_withdrawal;
    let adjusted_income = non_dividend + dividends;

    // Personal-allowance taper: £1 per £2 above the frozen threshold.
    let mut allowance = PERSONAL_ALLOWANCE;
    if adjusted_income > ALLOWANCE_TAPER_THRESHOLD {
        allowance = (allowance - (adjusted_income - ALLOWANCE_TAPER_THRESHOLD) / 2.0).max(0.0);
    }

    // NI on salary only, frozen thresholds, no ceiling on the upper band.
    let ni_main =
        (salary.min(NI_UPPER_THRESHOLD) - NI_PRIMARY_THRESHOLD).max(0.0) * NI_MAIN_RATE;
    let ni_upper = (salary - NI_UPPER_THRESHOLD).max(0.0) * NI_UPPER_RATE;
    let national_insurance = ni_main + ni_upper;

    let basic_top = BASIC_BAND_TOP * m;
    let additional_floor = (ADDITIONAL_BAND_FLOOR * m).max(basic_top);

    let taxable_non_dividend = (non_dividend - allowance).max(0.0);
    let basic_taxable = taxable_non_dividend.min(basic_top);
    let higher_taxable = (taxable_non_dividend - basic_taxable).min(additional_floor - basic_top);
    let additional_taxable = (taxable_non_dividend - basic_taxable - higher_taxable).max(0.0);

    let basic_rate_tax = basic_taxable * BASIC_RATE;
    let higher_rate_tax = higher_taxable * HIGHER_RATE;
    let additional_rate_tax = additional_taxable * ADDITIONAL_RATE;
    let income_tax = basic_rate_tax + higher_rate_tax + additional_rate_tax;

    // Dividends stack on top of non-dividend income for band filling.
    let dividend_allowance = DIVIDEND_ALLOWANCE * m;
    let dividend_allowance_used = dividends.min(dividend_allowance);
    let taxable_dividends = (dividends - dividend_allowance_used).max(0.0);
    let stack_from = taxable_non_dividend + dividend_allowance_used;

    let dividend_basic = taxable_dividends.min((basic_top - stack_from).max(0.0));
    let higher_start = (stack_from + dividend_basic).max(basic_top);
    let dividend_higher =
        (taxable_dividends - dividend_basic).min((additional_floor - higher_start).max(0.0));
    let dividend_additional = (taxable_dividends - dividend_basic - dividend_higher).max(0.0);
    let dividend_tax = dividend_basic * DIVIDEND_BASIC_RATE
        + dividend_higher * DIVIDEND_HIGHER_RATE
        + dividend_additional * DIVIDEND_ADDITIONAL_RATE;

    // Apportion income tax back across non-dividend categories pro-rata by
    // gross contribution; salary alone absorbs all NI.
    let share = |gross: f64| -> f64 {
        if non_dividend > 0.0 {
            income_tax * gross / non_dividend
        } else {
            0.0
        }
    };

    let net_salary = (salary - share(salary) - national_insurance).max(0.0);
    let net_state_pension = (state_pension - share(state_pension)).max(0.0);
    let net_db_pension = (db_pension - share(db_pension)).max(0.0);
    let net_rental_profit = (rental - share(rental)).max(0.0);
    let net_other_taxable = (other - share(other)).max(0.0);
    let net_pension_withdrawal =
        (tax_free_withdrawal + taxable_withdrawal - share(taxable_withdrawal)).max(0.0);
    let net_dividends = (dividends - dividend_tax).max(0.0);

    let total_net_income = net_salary
        + net_dividends
        + net_state_pension
        + net_db_pension
        + net_rental_profit
        + net_other_taxable
        + net_pension_withdrawal;

    let gross_income = adjusted_income + tax_free_withdrawal;
    let total_tax = income_tax + national_insurance + dividend_tax;
    let effective_rate = if gross_income > 0.0 {
        total_tax / gross_income
    } else {
        0.0
    };

    TaxOutcome {
        net_salary,
        net_dividends,
        net_state_pension,
        net_db_pension,
        net_rental_profit,
        net_other_taxable,
        net_pension_withdrawal,
        total_net_income,
        breakdown: TaxBreakdown {
            gross_income,
            non_dividend_income: non_dividend,
            taxable_pension_withdrawal: taxable_withdrawal,
            tax_free_pension_withdrawal: tax_free_withdrawal,
            personal_allowance: allowance,
            taxable_income: taxable_non_dividend + taxable_dividends,
            basic_rate_tax,
            higher_rate_tax,
            additional_rate_tax,
            income_tax,
            national_insurance,
            dividend_allowance_used,
            dividend_tax,
            capital_gains_tax: 0.0,
            total_tax,
            effective_rate,
        },
    }
}
