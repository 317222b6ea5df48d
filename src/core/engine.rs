use super::solver::{IncomeContext, resolve_gross_withdrawal};
use super::tax::{self, TaxInput, resolve_tax};
use super::types::{
    Assumptions, DrawdownStrategy, FinancialEvent, Indexation, LumpSumDestination, LumpSumMode,
    MortgageKind, SurplusTarget, TaxTreatment, YearRecord,
};

/// Fixed annual fee assumed for the benchmark shadow pension.
pub const BENCHMARK_FEE_RATE: f64 = 0.001;

/// One penny, so floating-point noise is absorbed but genuine small
/// shortfalls are still reported.
const SHORTFALL_TOLERANCE: f64 = 0.01;

/// Relief-at-source top-up on every pound paid into the pension.
const PENSION_RELIEF_RATE: f64 = 0.25;

const MAX_TAX_FREE_FRACTION: f64 = 0.25;

/// Mutable state threaded through the year loop: the four pot balances,
/// the debt/property balances the loop owns exclusively, the one-off
/// lump-sum flag, and the shadow pension pot.
#[derive(Debug, Clone)]
struct Ledger {
    cash: f64,
    isa: f64,
    gia: f64,
    pension: f64,
    shadow_pension: f64,
    lump_sum_taken: bool,
    loan_balances: Vec<f64>,
    mortgage_balances: Vec<f64>,
    property_values: Vec<f64>,
}

impl Ledger {
    fn open(assumptions: &Assumptions) -> Self {
        Self {
            cash: pos(assumptions.cash_start),
            isa: pos(assumptions.isa_start),
            gia: pos(assumptions.gia_start),
            pension: pos(assumptions.pension_start),
            shadow_pension: pos(assumptions.pension_start),
            lump_sum_taken: false,
            loan_balances: assumptions.loans.iter().map(|l| pos(l.balance)).collect(),
            mortgage_balances: assumptions
                .mortgages
                .iter()
                .map(|m| pos(m.balance))
                .collect(),
            property_values: assumptions
                .properties
                .iter()
                .map(|p| pos(p.value))
                .collect(),
        }
    }
}

/// In-year cash movements for one pot; the opening balance stays fixed
/// until growth is applied, so a pot can never be over-drawn.
#[derive(Debug, Default, Clone, Copy)]
struct Flows {
    inflow: f64,
    outflow: f64,
}

impl Flows {
    fn available(&self, opening: f64) -> f64 {
        (opening + self.inflow - self.outflow).max(0.0)
    }
}

/// Shared annual CGT exempt amount, consumed in processing order across
/// all gain-generating events and disposals within the same year.
#[derive(Debug)]
struct CgtYearState {
    allowance_remaining: f64,
    tax_paid: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum PotKind {
    Cash,
    Isa,
    Gia,
    Pension,
}

fn pos(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn num_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value } else { default }
}

/// Run the whole projection: one record per integer age from `current_age`
/// to `life_expectancy` inclusive. Shortfall years do not stop the loop.
pub fn run_projection(assumptions: &Assumptions) -> Vec<YearRecord> {
    let mut ledger = Ledger::open(assumptions);
    let last_age = assumptions.life_expectancy.max(assumptions.current_age);
    let mut records =
        Vec::with_capacity((last_age - assumptions.current_age + 1) as usize);
    for age in assumptions.current_age..=last_age {
        records.push(project_year(assumptions, &mut ledger, age));
    }
    records
}

fn project_year(a: &Assumptions, ledger: &mut Ledger, age: u32) -> YearRecord {
    let years_elapsed = (age - a.current_age) as i32;
    let inflation = num_or(a.inflation_rate, 0.0).max(-1.0);
    let infl = (1.0 + inflation).powi(years_elapsed);
    let salary_growth = num_or(a.salary_growth_rate, 0.0).max(-1.0);
    let salary_mult = (1.0 + salary_growth).powi(years_elapsed);

    let fully_retired = age >= a.retirement_age;
    let semi_retired = !fully_retired && age >= a.semi_retirement_age;
    let pension_accessible = age >= a.pension_access_age;

    // --- 1. income aggregation -------------------------------------------
    let gross_salary = if fully_retired {
        0.0
    } else if semi_retired {
        pos(a.semi_retirement_income) * infl
    } else {
        pos(a.annual_salary) * salary_mult
    };

    let mut gross_dividends = pos(a.annual_dividends) * infl;
    let mut stream_taxable = 0.0;
    for stream in &a.income_streams {
        if age < stream.start_age || age > stream.end_age {
            continue;
        }
        let multiplier = match stream.indexation {
            Indexation::Flat => 1.0,
            Indexation::Inflation => infl,
            Indexation::SalaryGrowth => salary_mult,
        };
        let amount = pos(stream.amount) * multiplier;
        if stream.dividend {
            gross_dividends += amount;
        } else {
            stream_taxable += amount;
        }
    }

    let gross_state_pension = state_pension_income(a, age, infl);
    let gross_db_pension = db_pension_income(a, age, infl);
    let gross_rental = rental_profit(a, age, infl);

    // Band position for CGT is taken from non-event, non-disposal income
    // only. Gains taxed earlier in the same year do not push later gains
    // into the higher band; this matches the original behavior and
    // slightly under-taxes stacked same-year gains.
    let income_before_gains =
        gross_salary + stream_taxable + gross_state_pension + gross_db_pension + gross_rental;

    let mut cgt = CgtYearState {
        allowance_remaining: tax::CGT_ANNUAL_EXEMPT,
        tax_paid: 0.0,
    };
    let mut event_taxable = 0.0;
    let mut tax_free_income = 0.0;
    let mut event_expenses = 0.0;
    for event in &a.events {
        if !event_active(event, age) {
            continue;
        }
        let amount = pos(event.amount) * infl;
        if event.expense {
            event_expenses += amount;
            continue;
        }
        match event.treatment {
            TaxTreatment::TaxFree => tax_free_income += amount,
            TaxTreatment::TaxableIncome => event_taxable += amount,
            TaxTreatment::Dividend => gross_dividends += amount,
            TaxTreatment::CapitalGains => {
                tax_free_income +=
                    apply_capital_gain(amount, false, income_before_gains, &mut cgt, infl);
            }
            TaxTreatment::ResidentialProperty => {
                tax_free_income +=
                    apply_capital_gain(amount, true, income_before_gains, &mut cgt, infl);
            }
        }
    }

    let other_taxable = stream_taxable + event_taxable;

    // Upfront mode takes the whole tax-free entitlement as a one-off lump,
    // so drawdown withdrawals are then fully taxable.
    let tax_free_fraction = match a.lump_sum_mode {
        LumpSumMode::Drip => {
            num_or(a.pension_tax_free_fraction, 0.0).clamp(0.0, MAX_TAX_FREE_FRACTION)
        }
        LumpSumMode::Upfront => 0.0,
    };

    let context = IncomeContext {
        gross_salary,
        gross_dividends,
        gross_state_pension,
        gross_db_pension,
        gross_rental_profit: gross_rental,
        other_taxable_income: other_taxable,
        pension_tax_free_fraction: tax_free_fraction,
        inflation_multiplier: infl,
    };

    // --- 4. baseline tax, assuming no pension withdrawal -----------------
    let baseline = resolve_tax(&tax_input(&context, 0.0));

    // --- 5. expense aggregation ------------------------------------------
    let lifestyle = lifestyle_expense(a, age, infl);
    let housing = housing_expense(a, ledger, age, years_elapsed);
    let loan_payments = amortize_loans(a, ledger, age);
    let total_expense = lifestyle + housing + loan_payments + event_expenses;

    // --- scheduled contributions (stop at full retirement) ---------------
    let (mut c_cash, mut c_isa, mut c_gia, mut pension_paid) = if fully_retired {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (
            pos(a.monthly_cash_contribution) * 12.0,
            (pos(a.monthly_isa_contribution) * 12.0).min(tax::ISA_ANNUAL_ALLOWANCE),
            pos(a.monthly_gia_contribution) * 12.0,
            (pos(a.monthly_pension_contribution) * 12.0)
                .min(tax::PENSION_ANNUAL_ALLOWANCE / (1.0 + PENSION_RELIEF_RATE)),
        )
    };
    let mut pension_relief = pension_paid * PENSION_RELIEF_RATE;

    // --- 6. net position; contributions never fund a deficit -------------
    let total_net_income = baseline.total_net_income + tax_free_income;
    let mut raw_net_position =
        total_net_income - total_expense - (c_cash + c_isa + c_gia + pension_paid);
    if raw_net_position < 0.0 {
        c_cash = 0.0;
        c_isa = 0.0;
        c_gia = 0.0;
        pension_paid = 0.0;
        pension_relief = 0.0;
        raw_net_position = total_net_income - total_expense;
    }

    let mut cash = Flows {
        inflow: c_cash,
        outflow: 0.0,
    };
    let mut isa = Flows {
        inflow: c_isa,
        outflow: 0.0,
    };
    let mut gia = Flows {
        inflow: c_gia,
        outflow: 0.0,
    };
    let mut pension = Flows {
        inflow: pension_paid + pension_relief,
        outflow: 0.0,
    };
    // The shadow pot shares the real pot's inflows but tracks its own
    // withdrawals.
    let mut shadow_outflow = 0.0;

    let mut surplus_cash = 0.0;
    let mut surplus_isa = 0.0;
    let mut surplus_gia = 0.0;
    let mut surplus_pension = 0.0;
    let mut surplus_mortgage = 0.0;
    let mut withdrawal_cash = 0.0;
    let mut withdrawal_isa = 0.0;
    let mut withdrawal_gia = 0.0;
    let mut withdrawal_pension_gross = 0.0;
    let mut shortfall = 0.0;

    if raw_net_position >= 0.0 {
        // --- 7. surplus waterfall over the configured priority order -----
        let mut remaining = raw_net_position;
        for target in &a.surplus_priority {
            if remaining <= 0.0 {
                break;
            }
            match target {
                SurplusTarget::Pension => {
                    if fully_retired {
                        continue;
                    }
                    let gross_so_far = pension_paid + pension_relief + surplus_pension;
                    let headroom = (tax::PENSION_ANNUAL_ALLOWANCE - gross_so_far).max(0.0);
                    let paid = remaining.min(headroom / (1.0 + PENSION_RELIEF_RATE));
                    let relief = paid * PENSION_RELIEF_RATE;
                    surplus_pension += paid + relief;
                    pension_relief += relief;
                    pension.inflow += paid + relief;
                    remaining -= paid;
                }
                SurplusTarget::Isa => {
                    let headroom = (tax::ISA_ANNUAL_ALLOWANCE - c_isa - surplus_isa).max(0.0);
                    let amount = remaining.min(headroom);
                    surplus_isa += amount;
                    isa.inflow += amount;
                    remaining -= amount;
                }
                SurplusTarget::Gia => {
                    surplus_gia += remaining;
                    gia.inflow += remaining;
                    remaining = 0.0;
                }
                SurplusTarget::Cash => {
                    surplus_cash += remaining;
                    cash.inflow += remaining;
                    remaining = 0.0;
                }
                SurplusTarget::MortgageOverpayment => {
                    for balance in ledger.mortgage_balances.iter_mut() {
                        if *balance <= 0.0 || remaining <= 0.0 {
                            continue;
                        }
                        let amount = remaining.min(*balance);
                        *balance -= amount;
                        surplus_mortgage += amount;
                        remaining -= amount;
                    }
                }
            }
        }
        // Whatever the priority list did not place is banked as cash.
        if remaining > 0.0 {
            surplus_cash += remaining;
            cash.inflow += remaining;
        }
    } else {
        // --- 8. deficit waterfall per drawdown strategy -------------------
        let mut remaining = -raw_net_position;
        let order: &[PotKind] = match a.drawdown_strategy {
            DrawdownStrategy::TaxEfficientBridge => {
                if pension_accessible {
                    &[PotKind::Pension, PotKind::Gia, PotKind::Cash, PotKind::Isa]
                } else {
                    &[PotKind::Gia, PotKind::Cash, PotKind::Isa]
                }
            }
            DrawdownStrategy::PreservePension => {
                &[PotKind::Gia, PotKind::Cash, PotKind::Isa, PotKind::Pension]
            }
            DrawdownStrategy::Standard => {
                &[PotKind::Cash, PotKind::Gia, PotKind::Isa, PotKind::Pension]
            }
        };

        for pot in order {
            if remaining <= SHORTFALL_TOLERANCE {
                break;
            }
            match pot {
                PotKind::Cash => {
                    let taken = cash.available(ledger.cash).min(remaining);
                    cash.outflow += taken;
                    withdrawal_cash += taken;
                    remaining -= taken;
                }
                PotKind::Isa => {
                    let taken = isa.available(ledger.isa).min(remaining);
                    isa.outflow += taken;
                    withdrawal_isa += taken;
                    remaining -= taken;
                }
                PotKind::Gia => {
                    let taken = gia.available(ledger.gia).min(remaining);
                    gia.outflow += taken;
                    withdrawal_gia += taken;
                    remaining -= taken;
                }
                PotKind::Pension => {
                    if !pension_accessible {
                        continue;
                    }
                    let target = remaining;
                    let solved = resolve_gross_withdrawal(
                        target,
                        &context,
                        pension.available(ledger.pension),
                    );
                    pension.outflow += solved.gross;
                    withdrawal_pension_gross = solved.gross;
                    remaining -= solved.net;

                    // Shadow withdrawal against the shadow pot's own size, so
                    // the benchmark is not distorted by the real pot running
                    // dry early.
                    let shadow_available =
                        (ledger.shadow_pension + pension.inflow - shadow_outflow).max(0.0);
                    let shadow_solved =
                        resolve_gross_withdrawal(target, &context, shadow_available);
                    shadow_outflow += shadow_solved.gross;
                }
            }
        }

        if remaining > SHORTFALL_TOLERANCE {
            shortfall = remaining;
        }
    }

    // --- 9. one-off upfront tax-free lump sum -----------------------------
    let mut lump_cash = 0.0;
    let mut lump_isa = 0.0;
    let mut lump_gia = 0.0;
    let lump_fraction =
        num_or(a.pension_tax_free_fraction, 0.0).clamp(0.0, MAX_TAX_FREE_FRACTION);
    if a.lump_sum_mode == LumpSumMode::Upfront
        && !ledger.lump_sum_taken
        && age >= a.retirement_age.max(a.pension_access_age)
    {
        let lump = pension.available(ledger.pension) * lump_fraction;
        if lump > 0.0 {
            pension.outflow += lump;
            match a.lump_sum_destination {
                LumpSumDestination::Cash => lump_cash = lump,
                LumpSumDestination::Gia => lump_gia = lump,
                LumpSumDestination::Isa => {
                    let headroom =
                        (tax::ISA_ANNUAL_ALLOWANCE - c_isa - surplus_isa).max(0.0);
                    lump_isa = lump.min(headroom);
                    lump_gia = lump - lump_isa;
                }
            }
            cash.inflow += lump_cash;
            isa.inflow += lump_isa;
            gia.inflow += lump_gia;
        }
        // The benchmark takes its own proportional lump even when the real
        // pot is already empty this year.
        let shadow_available =
            (ledger.shadow_pension + pension.inflow - shadow_outflow).max(0.0);
        shadow_outflow += shadow_available * lump_fraction;
        ledger.lump_sum_taken = true;
    }

    // --- 10. final tax including the actual withdrawal --------------------
    let final_outcome = resolve_tax(&tax_input(&context, withdrawal_pension_gross));
    // The withdrawal's reported net is its category net under the final
    // apportionment, so the year's nets and withdrawals add up exactly.
    let withdrawal_pension_net = final_outcome.net_pension_withdrawal;

    // --- 11. optional Bed-and-ISA sweep ------------------------------------
    if a.bed_and_isa {
        let mut headroom =
            (tax::ISA_ANNUAL_ALLOWANCE - c_isa - surplus_isa - lump_isa).max(0.0);
        let from_gia = gia.available(ledger.gia).min(headroom);
        gia.outflow += from_gia;
        isa.inflow += from_gia;
        surplus_isa += from_gia;
        headroom -= from_gia;
        let from_cash = cash.available(ledger.cash).min(headroom);
        cash.outflow += from_cash;
        isa.inflow += from_cash;
        surplus_isa += from_cash;
    }

    // --- 12. growth with mid-year flow timing ------------------------------
    let (cash_close, cash_growth) =
        grow(ledger.cash, cash, num_or(a.cash_growth_rate, 0.0));
    let (isa_close, isa_growth) = grow(ledger.isa, isa, num_or(a.isa_growth_rate, 0.0));
    let (gia_close, gia_growth) = grow(ledger.gia, gia, num_or(a.gia_growth_rate, 0.0));
    let pension_rate =
        num_or(a.pension_growth_rate, 0.0) - num_or(a.pension_fee_rate, 0.0).max(0.0);
    let (pension_close, pension_growth) = grow(ledger.pension, pension, pension_rate);
    let shadow_rate = num_or(a.pension_growth_rate, 0.0) - BENCHMARK_FEE_RATE;
    let (shadow_close, _) = grow(
        ledger.shadow_pension,
        Flows {
            inflow: pension.inflow,
            outflow: shadow_outflow,
        },
        shadow_rate,
    );

    ledger.cash = cash_close;
    ledger.isa = isa_close;
    ledger.gia = gia_close;
    ledger.pension = pension_close;
    ledger.shadow_pension = shadow_close;

    let investment_growth = cash_growth + isa_growth + gia_growth + pension_growth;

    // --- 13. property growth and disposals ---------------------------------
    let mut sale_proceeds = 0.0;
    for (index, property) in a.properties.iter().enumerate() {
        let value = &mut ledger.property_values[index];
        match property.sale_age {
            Some(sale_age) if age > sale_age => {}
            Some(sale_age) if age == sale_age => {
                let sale_value = property
                    .sale_price
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .unwrap_or(*value);
                let gain = (sale_value - pos(property.value)).max(0.0);
                let net_gain =
                    apply_capital_gain(gain, true, income_before_gains, &mut cgt, infl);
                let mut proceeds = sale_value - (gain - net_gain);
                if let Some(mortgage_index) = property.linked_mortgage {
                    if let Some(balance) = ledger.mortgage_balances.get_mut(mortgage_index) {
                        proceeds = (proceeds - *balance).max(0.0);
                        *balance = 0.0;
                    }
                }
                sale_proceeds += proceeds;
                *value = 0.0;
            }
            _ => {
                *value *= 1.0 + num_or(property.growth_rate, 0.0).max(-1.0);
            }
        }
    }
    ledger.cash += sale_proceeds;
    tax_free_income += sale_proceeds;

    let mut breakdown = final_outcome.breakdown.clone();
    breakdown.capital_gains_tax = cgt.tax_paid;
    breakdown.total_tax += cgt.tax_paid;
    if breakdown.gross_income > 0.0 {
        breakdown.effective_rate = breakdown.total_tax / breakdown.gross_income;
    }

    // --- 14. emit the year record ------------------------------------------
    let other_net_pool = final_outcome.net_dividends
        + final_outcome.net_db_pension
        + final_outcome.net_rental_profit
        + final_outcome.net_other_taxable
        + tax_free_income;
    let mut expense_left = total_expense;
    let spent_salary = final_outcome.net_salary.min(expense_left);
    expense_left -= spent_salary;
    let spent_state_pension = final_outcome.net_state_pension.min(expense_left);
    expense_left -= spent_state_pension;
    let spent_other = other_net_pool.min(expense_left);

    let property_value: f64 = ledger.property_values.iter().sum();
    let mortgage_debt: f64 = ledger.mortgage_balances.iter().sum();
    let loan_debt: f64 = ledger.loan_balances.iter().sum();
    // Sale proceeds are already banked in the cash ledger, so net worth and
    // the reported cash balance agree in a sale year.
    let liquid_net_worth = ledger.cash + isa_close + gia_close + pension_close;
    let total_net_worth = liquid_net_worth + property_value - mortgage_debt - loan_debt;

    YearRecord {
        age,
        year: a.start_year + years_elapsed as u32,

        gross_salary,
        net_salary: final_outcome.net_salary,
        gross_dividends,
        net_dividends: final_outcome.net_dividends,
        gross_state_pension,
        net_state_pension: final_outcome.net_state_pension,
        gross_db_pension,
        net_db_pension: final_outcome.net_db_pension,
        gross_rental_profit: gross_rental,
        net_rental_profit: final_outcome.net_rental_profit,
        gross_other_income: other_taxable,
        net_other_income: final_outcome.net_other_taxable,
        tax_free_income,
        total_gross_income: breakdown.gross_income + tax_free_income,
        total_net_income: final_outcome.total_net_income + tax_free_income,

        lifestyle_expense: lifestyle,
        housing_expense: housing,
        loan_payments,
        event_expenses,
        total_expense,

        spent_salary,
        spent_state_pension,
        spent_other,

        withdrawal_cash,
        withdrawal_isa,
        withdrawal_gia,
        withdrawal_pension_gross,
        withdrawal_pension_net,
        shortfall,

        contribution_cash: c_cash,
        contribution_isa: c_isa,
        contribution_gia: c_gia,
        contribution_pension: pension_paid + pension_paid * PENSION_RELIEF_RATE,
        pension_tax_relief: pension_relief,
        surplus_cash,
        surplus_isa,
        surplus_gia,
        surplus_pension,
        surplus_mortgage_overpayment: surplus_mortgage,
        lump_sum_cash: lump_cash,
        lump_sum_isa: lump_isa,
        lump_sum_gia: lump_gia,

        balance_cash: ledger.cash,
        balance_isa: isa_close,
        balance_gia: gia_close,
        balance_pension: pension_close,
        property_value,
        property_sale_proceeds: sale_proceeds,
        total_net_worth,
        liquid_net_worth,
        investment_growth,
        benchmark_pension: shadow_close,

        tax: breakdown,
    }
}

fn tax_input(context: &IncomeContext, gross_withdrawal: f64) -> TaxInput {
    TaxInput {
        gross_salary: context.gross_salary,
        gross_dividends: context.gross_dividends,
        gross_state_pension: context.gross_state_pension,
        gross_db_pension: context.gross_db_pension,
        gross_rental_profit: context.gross_rental_profit,
        other_taxable_income: context.other_taxable_income,
        gross_pension_withdrawal: gross_withdrawal,
        pension_tax_free_fraction: context.pension_tax_free_fraction,
        inflation_multiplier: context.inflation_multiplier,
    }
}

/// Opening balance compounds for the full year; in-year flows are modeled
/// as occurring mid-year on average, so they compound by the square root
/// of the annual factor. The factor is floored at zero before the root.
fn grow(opening: f64, flows: Flows, rate: f64) -> (f64, f64) {
    let factor = (1.0 + num_or(rate, 0.0).max(-1.0)).max(0.0);
    let net_flow = flows.inflow - flows.outflow;
    let closing = (opening * factor + net_flow * factor.sqrt()).max(0.0);
    let growth = closing - (opening + net_flow);
    (closing, growth)
}

fn event_active(event: &FinancialEvent, age: u32) -> bool {
    match event.end_age {
        None => age == event.start_age,
        Some(end) => age >= event.start_age && age <= end,
    }
}

fn state_pension_income(a: &Assumptions, age: u32, infl: f64) -> f64 {
    if age < a.state_pension_age {
        return 0.0;
    }
    let qualifying_years = 35_u32.saturating_sub(a.missing_ni_years);
    if qualifying_years < 10 {
        return 0.0;
    }
    pos(a.state_pension_amount) * (qualifying_years as f64 / 35.0) * infl
}

fn db_pension_income(a: &Assumptions, age: u32, infl: f64) -> f64 {
    a.db_pensions
        .iter()
        .filter(|p| age >= p.start_age)
        .map(|p| pos(p.annual_income) * if p.inflation_linked { infl } else { 1.0 })
        .sum()
}

fn rental_profit(a: &Assumptions, age: u32, infl: f64) -> f64 {
    let profit: f64 = a
        .properties
        .iter()
        .filter(|p| p.sale_age.is_none_or(|sale| age <= sale))
        .map(|p| (pos(p.monthly_rent) - pos(p.monthly_costs)) * 12.0 * infl)
        .sum();
    profit.max(0.0)
}

fn lifestyle_expense(a: &Assumptions, age: u32, infl: f64) -> f64 {
    let base = pos(a.annual_spending) * infl;
    match a.spending_decline_age {
        Some(start) if age >= start => {
            let rate = num_or(a.spending_decline_rate, 0.0).clamp(0.0, 1.0);
            base * (1.0 - rate).powi((age - start) as i32)
        }
        _ => base,
    }
}

/// Rent when no mortgages are configured; otherwise the sum of active
/// mortgage payments, with an interest-only balloon in the final year.
/// Repayment balances accrue interest then shrink by the year's payments.
fn housing_expense(a: &Assumptions, ledger: &mut Ledger, age: u32, years_elapsed: i32) -> f64 {
    if a.mortgages.is_empty() {
        let rent_inflation = num_or(a.rent_inflation_rate, 0.0).max(-1.0);
        return pos(a.annual_rent) * (1.0 + rent_inflation).powi(years_elapsed);
    }

    let mut housing = 0.0;
    for (index, mortgage) in a.mortgages.iter().enumerate() {
        let balance = &mut ledger.mortgage_balances[index];
        if *balance <= 0.0 || age > mortgage.end_age {
            continue;
        }
        let interest = *balance * num_or(mortgage.rate, 0.0).max(-1.0);
        match mortgage.kind {
            MortgageKind::Repayment => {
                let scheduled = pos(mortgage.monthly_payment) * 12.0;
                let payment = if age == mortgage.end_age {
                    *balance + interest
                } else {
                    scheduled.min(*balance + interest)
                };
                *balance = (*balance + interest - payment).max(0.0);
                housing += payment;
            }
            MortgageKind::InterestOnly => {
                housing += pos(mortgage.monthly_payment) * 12.0;
                if age == mortgage.end_age {
                    housing += *balance;
                    *balance = 0.0;
                }
            }
        }
    }
    housing
}

/// Each loan accrues a year of interest, then the payment (capped at the
/// grown balance) is applied.
fn amortize_loans(a: &Assumptions, ledger: &mut Ledger, age: u32) -> f64 {
    let mut payments = 0.0;
    for (index, loan) in a.loans.iter().enumerate() {
        let balance = &mut ledger.loan_balances[index];
        if age < loan.start_age || *balance <= 0.0 {
            continue;
        }
        *balance *= 1.0 + num_or(loan.rate, 0.0).max(-1.0);
        let payment = pos(loan.annual_payment).min(*balance);
        *balance -= payment;
        payments += payment;
    }
    payments
}

/// Tax one realized gain, consuming the shared annual exempt amount first,
/// then splitting the remainder across CGT bands by where `other_income`
/// sits relative to the basic-rate ceiling. Returns the net (post-tax) gain.
fn apply_capital_gain(
    gain: f64,
    residential: bool,
    other_income: f64,
    cgt: &mut CgtYearState,
    infl: f64,
) -> f64 {
    if gain <= 0.0 {
        return 0.0;
    }
    let allowance_used = cgt.allowance_remaining.min(gain).max(0.0);
    cgt.allowance_remaining -= allowance_used;
    let taxable = gain - allowance_used;
    if taxable <= 0.0 {
        return gain;
    }
    let basic_ceiling = tax::PERSONAL_ALLOWANCE + tax::BASIC_BAND_TOP * infl;
    let basic_part = taxable.min((basic_ceiling - other_income).max(0.0));
    let higher_part = taxable - basic_part;
    let (basic_rate, higher_rate) = if residential {
        (
            tax::CGT_RESIDENTIAL_BASIC_RATE,
            tax::CGT_RESIDENTIAL_HIGHER_RATE,
        )
    } else {
        (tax::CGT_BASIC_RATE, tax::CGT_HIGHER_RATE)
    };
    let tax_due = basic_part * basic_rate + higher_part * higher_rate;
    cgt.tax_paid += tax_due;
    gain - tax_due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        DbPension, IncomeStream, InvestmentProperty, Loan, Mortgage,
    };
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_assumptions() -> Assumptions {
        Assumptions {
            current_age: 40,
            semi_retirement_age: 60,
            retirement_age: 60,
            pension_access_age: 58,
            state_pension_age: 68,
            life_expectancy: 75,
            start_year: 2026,

            annual_salary: 50_000.0,
            salary_growth_rate: 0.0,
            semi_retirement_income: 0.0,
            annual_dividends: 0.0,
            income_streams: Vec::new(),

            state_pension_amount: 12_000.0,
            missing_ni_years: 0,
            db_pensions: Vec::new(),

            inflation_rate: 0.0,

            annual_spending: 20_000.0,
            spending_decline_rate: 0.0,
            spending_decline_age: None,
            annual_rent: 0.0,
            rent_inflation_rate: 0.0,

            events: Vec::new(),
            loans: Vec::new(),
            mortgages: Vec::new(),
            properties: Vec::new(),

            cash_start: 10_000.0,
            isa_start: 50_000.0,
            gia_start: 20_000.0,
            pension_start: 200_000.0,
            monthly_cash_contribution: 0.0,
            monthly_isa_contribution: 500.0,
            monthly_gia_contribution: 0.0,
            monthly_pension_contribution: 500.0,

            cash_growth_rate: 0.0,
            isa_growth_rate: 0.05,
            gia_growth_rate: 0.04,
            pension_growth_rate: 0.05,
            pension_fee_rate: 0.01,

            surplus_priority: vec![SurplusTarget::Isa, SurplusTarget::Cash],
            drawdown_strategy: DrawdownStrategy::Standard,
            bed_and_isa: false,

            pension_tax_free_fraction: 0.25,
            lump_sum_mode: LumpSumMode::Drip,
            lump_sum_destination: LumpSumDestination::Cash,
        }
    }

    #[test]
    fn projection_covers_every_age_in_order() {
        let a = sample_assumptions();
        let records = run_projection(&a);
        assert_eq!(records.len(), (75 - 40 + 1) as usize);
        for (offset, record) in records.iter().enumerate() {
            assert_eq!(record.age, 40 + offset as u32);
            assert_eq!(record.year, 2026 + offset as u32);
        }
    }

    #[test]
    fn higher_pension_growth_never_ends_with_less() {
        let mut low = sample_assumptions();
        low.pension_growth_rate = 0.05;
        let mut high = sample_assumptions();
        high.pension_growth_rate = 0.08;

        let low_final = run_projection(&low).last().unwrap().balance_pension;
        let high_final = run_projection(&high).last().unwrap().balance_pension;
        assert!(high_final >= low_final);
    }

    #[test]
    fn reported_balances_are_never_negative() {
        let mut a = sample_assumptions();
        a.annual_spending = 60_000.0;
        a.retirement_age = 45;
        for record in run_projection(&a) {
            assert!(record.balance_cash >= 0.0);
            assert!(record.balance_isa >= 0.0);
            assert!(record.balance_gia >= 0.0);
            assert!(record.balance_pension >= 0.0);
        }
    }

    #[test]
    fn full_ni_record_gets_full_state_pension() {
        let a = sample_assumptions();
        let records = run_projection(&a);
        let at_68 = records.iter().find(|r| r.age == 68).unwrap();
        assert_approx_tol(at_68.gross_state_pension, 12_000.0, 1e-9);
    }

    #[test]
    fn state_pension_scales_with_qualifying_years() {
        let mut a = sample_assumptions();
        a.missing_ni_years = 5;
        let records = run_projection(&a);
        let at_68 = records.iter().find(|r| r.age == 68).unwrap();
        assert_approx_tol(at_68.gross_state_pension, 12_000.0 * 30.0 / 35.0, 1e-9);
    }

    #[test]
    fn state_pension_zero_below_ten_qualifying_years() {
        let mut a = sample_assumptions();
        a.missing_ni_years = 26; // 9 qualifying years
        let records = run_projection(&a);
        let at_68 = records.iter().find(|r| r.age == 68).unwrap();
        assert_approx_tol(at_68.gross_state_pension, 0.0, 1e-12);
    }

    #[test]
    fn unaffordable_spending_produces_shortfall_without_stopping() {
        let mut a = sample_assumptions();
        a.annual_salary = 0.0;
        a.retirement_age = 40;
        a.semi_retirement_age = 40;
        a.annual_spending = 500_000.0;
        a.monthly_isa_contribution = 0.0;
        a.monthly_pension_contribution = 0.0;

        let records = run_projection(&a);
        assert_eq!(records.len(), 36);
        assert!(records.iter().any(|r| r.shortfall > 0.0));
        // Shortfall is never negative.
        assert!(records.iter().all(|r| r.shortfall >= 0.0));
    }

    #[test]
    fn interest_only_mortgage_balloons_exactly_at_end_age() {
        let mut a = sample_assumptions();
        a.mortgages = vec![Mortgage {
            balance: 100_000.0,
            monthly_payment: 500.0,
            rate: 0.0,
            kind: MortgageKind::InterestOnly,
            end_age: 45,
        }];

        let records = run_projection(&a);
        let at_44 = records.iter().find(|r| r.age == 44).unwrap();
        assert_approx_tol(at_44.housing_expense, 6_000.0, 1e-9);
        let at_45 = records.iter().find(|r| r.age == 45).unwrap();
        assert_approx_tol(at_45.housing_expense, 106_000.0, 1e-9);
        let at_46 = records.iter().find(|r| r.age == 46).unwrap();
        assert_approx_tol(at_46.housing_expense, 0.0, 1e-12);
    }

    #[test]
    fn repayment_mortgage_amortizes_to_zero() {
        let mut a = sample_assumptions();
        a.mortgages = vec![Mortgage {
            balance: 50_000.0,
            monthly_payment: 1_000.0,
            rate: 0.03,
            kind: MortgageKind::Repayment,
            end_age: 50,
        }];
        let records = run_projection(&a);
        let at_51 = records.iter().find(|r| r.age == 51).unwrap();
        assert_approx_tol(at_51.housing_expense, 0.0, 1e-9);
        // Debt no longer drags on net worth after the end age.
        assert!(at_51.total_net_worth >= at_51.liquid_net_worth - 1e-6);
    }

    #[test]
    fn same_year_gains_share_one_cgt_allowance() {
        let mut a = sample_assumptions();
        a.annual_salary = 0.0;
        a.retirement_age = 40;
        a.semi_retirement_age = 40;
        a.monthly_isa_contribution = 0.0;
        a.monthly_pension_contribution = 0.0;
        a.annual_spending = 0.0;
        a.events = vec![
            FinancialEvent {
                amount: 2_500.0,
                start_age: 41,
                end_age: None,
                expense: false,
                treatment: TaxTreatment::CapitalGains,
            },
            FinancialEvent {
                amount: 2_500.0,
                start_age: 41,
                end_age: None,
                expense: false,
                treatment: TaxTreatment::CapitalGains,
            },
        ];

        let records = run_projection(&a);
        let at_41 = records.iter().find(|r| r.age == 41).unwrap();
        // 5,000 of gains less the single 3,000 exempt amount, all basic rate.
        assert_approx_tol(at_41.tax.capital_gains_tax, 2_000.0 * 0.10, 1e-9);
    }

    #[test]
    fn loan_interest_accrues_before_payment() {
        let mut a = sample_assumptions();
        a.loans = vec![Loan {
            balance: 10_000.0,
            rate: 0.10,
            annual_payment: 11_000.0,
            start_age: 40,
        }];
        let records = run_projection(&a);
        // Grown balance 11,000 is fully cleared by the capped payment.
        assert_approx_tol(records[0].loan_payments, 11_000.0, 1e-9);
        assert_approx_tol(records[1].loan_payments, 0.0, 1e-12);
    }

    #[test]
    fn contributions_cancelled_in_deficit_years() {
        let mut a = sample_assumptions();
        a.annual_spending = 80_000.0; // beyond net income
        let records = run_projection(&a);
        let first = &records[0];
        assert_approx_tol(first.contribution_isa, 0.0, 1e-12);
        assert_approx_tol(first.contribution_pension, 0.0, 1e-12);
        assert!(first.withdrawal_cash + first.withdrawal_gia + first.withdrawal_isa > 0.0);
    }

    #[test]
    fn surplus_respects_isa_annual_allowance() {
        let mut a = sample_assumptions();
        a.annual_salary = 120_000.0;
        a.monthly_isa_contribution = 1_000.0; // 12,000 scheduled
        a.monthly_pension_contribution = 0.0;
        a.surplus_priority = vec![SurplusTarget::Isa];

        let first = &run_projection(&a)[0];
        assert_approx_tol(first.contribution_isa, 12_000.0, 1e-9);
        assert!(first.surplus_isa <= 8_000.0 + 1e-9);
        // Leftover surplus is banked as cash, never dropped.
        assert!(first.surplus_cash > 0.0);
    }

    #[test]
    fn pension_surplus_skipped_once_fully_retired() {
        let mut a = sample_assumptions();
        a.retirement_age = 40;
        a.semi_retirement_age = 40;
        a.annual_salary = 0.0;
        a.annual_spending = 0.0;
        a.monthly_isa_contribution = 0.0;
        a.monthly_pension_contribution = 0.0;
        a.income_streams = vec![IncomeStream {
            amount: 30_000.0,
            start_age: 40,
            end_age: 75,
            indexation: Indexation::Flat,
            dividend: false,
        }];
        a.surplus_priority = vec![SurplusTarget::Pension, SurplusTarget::Cash];

        for record in run_projection(&a) {
            assert_approx_tol(record.surplus_pension, 0.0, 1e-12);
            assert_approx_tol(record.pension_tax_relief, 0.0, 1e-12);
        }
    }

    #[test]
    fn pension_not_withdrawn_before_access_age() {
        let mut a = sample_assumptions();
        a.retirement_age = 45;
        a.semi_retirement_age = 45;
        a.annual_spending = 40_000.0;
        a.drawdown_strategy = DrawdownStrategy::TaxEfficientBridge;

        for record in run_projection(&a) {
            if record.age < a.pension_access_age {
                assert_approx_tol(record.withdrawal_pension_gross, 0.0, 1e-12);
            }
        }
    }

    #[test]
    fn upfront_lump_sum_taken_exactly_once() {
        let mut a = sample_assumptions();
        a.lump_sum_mode = LumpSumMode::Upfront;
        a.lump_sum_destination = LumpSumDestination::Cash;

        let records = run_projection(&a);
        let lump_years: Vec<&YearRecord> = records
            .iter()
            .filter(|r| r.lump_sum_cash + r.lump_sum_isa + r.lump_sum_gia > 0.0)
            .collect();
        assert_eq!(lump_years.len(), 1);
        assert_eq!(lump_years[0].age, 60); // max(retirement, pension access)
        assert!(lump_years[0].lump_sum_cash > 0.0);
    }

    #[test]
    fn lump_sum_to_isa_overflows_into_gia() {
        let mut a = sample_assumptions();
        a.lump_sum_mode = LumpSumMode::Upfront;
        a.lump_sum_destination = LumpSumDestination::Isa;
        a.pension_start = 400_000.0;
        a.monthly_isa_contribution = 0.0;

        let records = run_projection(&a);
        let lump_year = records
            .iter()
            .find(|r| r.lump_sum_isa + r.lump_sum_gia > 0.0)
            .unwrap();
        assert!(lump_year.lump_sum_isa <= 20_000.0 + 1e-9);
        assert!(lump_year.lump_sum_gia > 0.0);
    }

    #[test]
    fn bed_and_isa_sweeps_gia_into_isa() {
        let mut a = sample_assumptions();
        a.bed_and_isa = true;
        a.gia_start = 5_000.0;
        a.monthly_isa_contribution = 0.0;
        a.monthly_pension_contribution = 0.0;
        a.isa_growth_rate = 0.0;
        a.gia_growth_rate = 0.0;
        a.annual_spending = 0.0;
        a.annual_salary = 0.0;
        a.retirement_age = 40;
        a.semi_retirement_age = 40;

        let first = &run_projection(&a)[0];
        assert_approx_tol(first.balance_gia, 0.0, 1e-9);
        assert!(first.balance_isa >= 55_000.0 - 1e-6);
    }

    #[test]
    fn property_sale_realizes_gain_and_redeems_linked_mortgage() {
        let mut a = sample_assumptions();
        a.annual_salary = 60_000.0; // fills the CGT basic band completely
        a.mortgages = vec![Mortgage {
            balance: 50_000.0,
            monthly_payment: 0.0,
            rate: 0.0,
            kind: MortgageKind::InterestOnly,
            end_age: 70,
        }];
        a.properties = vec![InvestmentProperty {
            value: 200_000.0,
            monthly_rent: 0.0,
            monthly_costs: 0.0,
            growth_rate: 0.0,
            sale_age: Some(45),
            sale_price: Some(300_000.0),
            linked_mortgage: Some(0),
        }];

        let records = run_projection(&a);
        let at_45 = records.iter().find(|r| r.age == 45).unwrap();
        // Gain 100,000 less 3,000 exempt; salary fills the basic band so the
        // residential higher rate applies to the full taxable gain.
        let expected_cgt = 97_000.0 * 0.24;
        assert_approx_tol(at_45.tax.capital_gains_tax, expected_cgt, 1e-6);
        let expected_proceeds = 300_000.0 - expected_cgt - 50_000.0;
        assert_approx_tol(at_45.property_sale_proceeds, expected_proceeds, 1e-6);
        assert!(at_45.tax_free_income >= expected_proceeds - 1e-6);
        let at_46 = records.iter().find(|r| r.age == 46).unwrap();
        assert_approx_tol(at_46.property_value, 0.0, 1e-12);
        // Redeemed mortgage no longer bills payments or balloons.
        assert!(records.iter().filter(|r| r.age > 45).all(|r| r.housing_expense == 0.0));
    }

    #[test]
    fn sale_year_net_worth_matches_reported_balances() {
        let mut a = sample_assumptions();
        a.properties = vec![InvestmentProperty {
            value: 200_000.0,
            monthly_rent: 0.0,
            monthly_costs: 0.0,
            growth_rate: 0.0,
            sale_age: Some(45),
            sale_price: Some(300_000.0),
            linked_mortgage: None,
        }];

        let records = run_projection(&a);
        let at_45 = records.iter().find(|r| r.age == 45).unwrap();
        assert!(at_45.property_sale_proceeds > 0.0);
        // The banked proceeds show up in the same year's net worth, not as a
        // one-year crater that heals the year after.
        assert_approx_tol(
            at_45.liquid_net_worth,
            at_45.balance_cash + at_45.balance_isa + at_45.balance_gia + at_45.balance_pension,
            1e-6,
        );
        assert_approx_tol(
            at_45.total_net_worth,
            at_45.liquid_net_worth + at_45.property_value,
            1e-6,
        );
        let at_44 = records.iter().find(|r| r.age == 44).unwrap();
        assert!(at_45.liquid_net_worth > at_44.liquid_net_worth);
    }

    #[test]
    fn benchmark_takes_its_lump_sum_even_when_real_pot_is_empty() {
        let mut drip = sample_assumptions();
        drip.current_age = 47;
        drip.semi_retirement_age = 57;
        drip.retirement_age = 57;
        drip.pension_access_age = 57;
        drip.life_expectancy = 60;
        drip.annual_salary = 0.0;
        drip.annual_spending = 0.0;
        drip.cash_start = 0.0;
        drip.isa_start = 0.0;
        drip.gia_start = 0.0;
        drip.pension_start = 60_000.0;
        drip.monthly_isa_contribution = 0.0;
        drip.monthly_pension_contribution = 0.0;
        drip.pension_growth_rate = 0.05;
        // Wide fee gap, so the benchmark pot outgrows the real one.
        drip.pension_fee_rate = 0.04;
        // One-off bill at 57 large enough to drain the whole real pot.
        drip.events = vec![FinancialEvent {
            amount: 70_000.0,
            start_age: 57,
            end_age: None,
            expense: true,
            treatment: TaxTreatment::TaxFree,
        }];
        let mut upfront = drip.clone();
        upfront.lump_sum_mode = LumpSumMode::Upfront;

        let drip_57 = run_projection(&drip)
            .into_iter()
            .find(|r| r.age == 57)
            .unwrap();
        let upfront_57 = run_projection(&upfront)
            .into_iter()
            .find(|r| r.age == 57)
            .unwrap();

        // The deficit empties the real pot first, so no real lump remains.
        assert!(upfront_57.withdrawal_pension_gross > 0.0);
        assert_approx_tol(
            upfront_57.lump_sum_cash + upfront_57.lump_sum_isa + upfront_57.lump_sum_gia,
            0.0,
            1e-9,
        );
        // The shadow pot still surrenders its tax-free share that year.
        assert!(upfront_57.benchmark_pension < drip_57.benchmark_pension - 1.0);
    }

    #[test]
    fn db_pension_starts_at_its_own_age() {
        let mut a = sample_assumptions();
        a.db_pensions = vec![DbPension {
            annual_income: 8_000.0,
            start_age: 65,
            inflation_linked: false,
        }];
        let records = run_projection(&a);
        assert_approx_tol(
            records.iter().find(|r| r.age == 64).unwrap().gross_db_pension,
            0.0,
            1e-12,
        );
        assert_approx_tol(
            records.iter().find(|r| r.age == 65).unwrap().gross_db_pension,
            8_000.0,
            1e-9,
        );
    }

    #[test]
    fn spending_taper_compounds_from_decline_age() {
        let mut a = sample_assumptions();
        a.spending_decline_age = Some(70);
        a.spending_decline_rate = 0.02;
        let records = run_projection(&a);
        let at_70 = records.iter().find(|r| r.age == 70).unwrap();
        assert_approx_tol(at_70.lifestyle_expense, 20_000.0, 1e-9);
        let at_72 = records.iter().find(|r| r.age == 72).unwrap();
        assert_approx_tol(at_72.lifestyle_expense, 20_000.0 * 0.98 * 0.98, 1e-9);
    }

    #[test]
    fn every_expense_pound_is_accounted_for() {
        let mut a = sample_assumptions();
        a.annual_spending = 45_000.0;
        a.retirement_age = 50;
        a.semi_retirement_age = 50;
        a.inflation_rate = 0.02;

        for record in run_projection(&a) {
            let covered = record.spent_salary
                + record.spent_state_pension
                + record.spent_other
                + record.withdrawal_cash
                + record.withdrawal_isa
                + record.withdrawal_gia
                + record.withdrawal_pension_net;
            assert!(
                covered + 0.1 >= record.total_expense - record.shortfall,
                "age {}: covered {covered}, expense {}, shortfall {}",
                record.age,
                record.total_expense,
                record.shortfall
            );
        }
    }

    #[test]
    fn benchmark_pot_tracks_fee_drag() {
        let mut a = sample_assumptions();
        a.pension_fee_rate = 0.015;
        let records = run_projection(&a);
        let last = records.last().unwrap();
        assert!(last.benchmark_pension >= last.balance_pension);
    }

    #[test]
    fn zero_growth_year_conserves_pot_arithmetic() {
        let (closing, growth) = grow(
            1_000.0,
            Flows {
                inflow: 200.0,
                outflow: 50.0,
            },
            0.0,
        );
        assert_approx_tol(closing, 1_150.0, 1e-12);
        assert_approx_tol(growth, 0.0, 1e-12);
    }

    #[test]
    fn growth_factor_floored_before_square_root() {
        // A -150% growth rate must not produce NaN.
        let (closing, _) = grow(
            1_000.0,
            Flows {
                inflow: 100.0,
                outflow: 0.0,
            },
            -1.5,
        );
        assert!(closing.is_finite());
        assert_approx_tol(closing, 0.0, 1e-12);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_projection_is_finite_and_non_negative(
            cash_start in 0u32..200_000,
            isa_start in 0u32..400_000,
            gia_start in 0u32..400_000,
            pension_start in 0u32..800_000,
            salary in 0u32..150_000,
            spending in 0u32..120_000,
            retirement_offset in 0u32..30,
            inflation_bp in 0u32..600,
            pension_growth_bp in -200i32..1200,
            missing_ni in 0u32..35
        ) {
            let mut a = sample_assumptions();
            a.cash_start = cash_start as f64;
            a.isa_start = isa_start as f64;
            a.gia_start = gia_start as f64;
            a.pension_start = pension_start as f64;
            a.annual_salary = salary as f64;
            a.annual_spending = spending as f64;
            a.retirement_age = 40 + retirement_offset;
            a.semi_retirement_age = a.retirement_age;
            a.inflation_rate = inflation_bp as f64 / 10_000.0;
            a.pension_growth_rate = pension_growth_bp as f64 / 10_000.0;
            a.missing_ni_years = missing_ni;

            let records = run_projection(&a);
            prop_assert!(records.len() == 36);
            for record in &records {
                for (label, value) in [
                    ("balance_cash", record.balance_cash),
                    ("balance_isa", record.balance_isa),
                    ("balance_gia", record.balance_gia),
                    ("balance_pension", record.balance_pension),
                    ("benchmark_pension", record.benchmark_pension),
                    ("shortfall", record.shortfall),
                    ("total_expense", record.total_expense),
                    ("total_gross_income", record.total_gross_income),
                ] {
                    prop_assert!(value.is_finite(), "{label} must be finite");
                    prop_assert!(value >= 0.0, "{label} must be non-negative");
                }
                prop_assert!(record.tax.total_tax.is_finite());
            }
        }
    }
}
