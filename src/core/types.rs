use serde::Serialize;

/// Order in which pots are raided when a year's expenses exceed its income.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DrawdownStrategy {
    /// Spend the pension first once it is accessible; bridge from GIA, cash
    /// and ISA before then.
    TaxEfficientBridge,
    /// Keep the pension intact for as long as possible.
    PreservePension,
    /// Cash first, pension last.
    Standard,
}

/// Targets for the surplus-allocation waterfall, walked in user order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SurplusTarget {
    Pension,
    Isa,
    Gia,
    Cash,
    MortgageOverpayment,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LumpSumMode {
    /// Tax-free fraction taken pro-rata on every withdrawal.
    Drip,
    /// Whole tax-free entitlement taken once, in the first eligible year.
    Upfront,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LumpSumDestination {
    Cash,
    Isa,
    Gia,
}

/// How an additional income stream is uprated over time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Indexation {
    Flat,
    Inflation,
    SalaryGrowth,
}

/// Tax treatment of a financial event's income.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TaxTreatment {
    TaxFree,
    TaxableIncome,
    Dividend,
    CapitalGains,
    ResidentialProperty,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MortgageKind {
    Repayment,
    InterestOnly,
}

#[derive(Debug, Clone)]
pub struct IncomeStream {
    pub amount: f64,
    pub start_age: u32,
    pub end_age: u32,
    pub indexation: Indexation,
    pub dividend: bool,
}

/// A one-off (`end_age: None`) or recurring income/expense event, in today's
/// money. For `CapitalGains`/`ResidentialProperty` income the amount is the
/// realized gain, which is also the cash received.
#[derive(Debug, Clone)]
pub struct FinancialEvent {
    pub amount: f64,
    pub start_age: u32,
    pub end_age: Option<u32>,
    pub expense: bool,
    pub treatment: TaxTreatment,
}

#[derive(Debug, Clone)]
pub struct Loan {
    pub balance: f64,
    pub rate: f64,
    pub annual_payment: f64,
    pub start_age: u32,
}

#[derive(Debug, Clone)]
pub struct Mortgage {
    pub balance: f64,
    pub monthly_payment: f64,
    pub rate: f64,
    pub kind: MortgageKind,
    pub end_age: u32,
}

#[derive(Debug, Clone)]
pub struct InvestmentProperty {
    pub value: f64,
    pub monthly_rent: f64,
    pub monthly_costs: f64,
    pub growth_rate: f64,
    pub sale_age: Option<u32>,
    pub sale_price: Option<f64>,
    /// Index into `Assumptions::mortgages`, redeemed from sale proceeds.
    pub linked_mortgage: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct DbPension {
    pub annual_income: f64,
    pub start_age: u32,
    pub inflation_linked: bool,
}

/// Single immutable input record per projection run. The engine never
/// mutates it; the API layer is responsible for constructing a complete,
/// internally consistent record (defaults filled, legacy fields normalized).
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub current_age: u32,
    pub semi_retirement_age: u32,
    pub retirement_age: u32,
    pub pension_access_age: u32,
    pub state_pension_age: u32,
    pub life_expectancy: u32,
    pub start_year: u32,

    pub annual_salary: f64,
    pub salary_growth_rate: f64,
    pub semi_retirement_income: f64,
    /// Legacy single dividend figure; new configs use `income_streams` with
    /// the dividend flag instead. Kept normalized here so the engine only
    /// ever sees one shape.
    pub annual_dividends: f64,
    pub income_streams: Vec<IncomeStream>,

    pub state_pension_amount: f64,
    pub missing_ni_years: u32,
    pub db_pensions: Vec<DbPension>,

    pub inflation_rate: f64,

    pub annual_spending: f64,
    pub spending_decline_rate: f64,
    pub spending_decline_age: Option<u32>,
    pub annual_rent: f64,
    pub rent_inflation_rate: f64,

    pub events: Vec<FinancialEvent>,
    pub loans: Vec<Loan>,
    pub mortgages: Vec<Mortgage>,
    pub properties: Vec<InvestmentProperty>,

    pub cash_start: f64,
    pub isa_start: f64,
    pub gia_start: f64,
    pub pension_start: f64,
    pub monthly_cash_contribution: f64,
    pub monthly_isa_contribution: f64,
    pub monthly_gia_contribution: f64,
    pub monthly_pension_contribution: f64,

    pub cash_growth_rate: f64,
    pub isa_growth_rate: f64,
    pub gia_growth_rate: f64,
    pub pension_growth_rate: f64,
    pub pension_fee_rate: f64,

    pub surplus_priority: Vec<SurplusTarget>,
    pub drawdown_strategy: DrawdownStrategy,
    pub bed_and_isa: bool,

    pub pension_tax_free_fraction: f64,
    pub lump_sum_mode: LumpSumMode,
    pub lump_sum_destination: LumpSumDestination,
}

/// Full audit trail for one tax year. Every intermediate figure the
/// resolver computes is surfaced so a year can be checked by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub gross_income: f64,
    pub non_dividend_income: f64,
    pub taxable_pension_withdrawal: f64,
    pub tax_free_pension_withdrawal: f64,
    pub personal_allowance: f64,
    pub taxable_income: f64,
    pub basic_rate_tax: f64,
    pub higher_rate_tax: f64,
    pub additional_rate_tax: f64,
    pub income_tax: f64,
    pub national_insurance: f64,
    pub dividend_allowance_used: f64,
    pub dividend_tax: f64,
    pub capital_gains_tax: f64,
    pub total_tax: f64,
    pub effective_rate: f64,
}

/// One immutable row of the projection ledger, emitted per simulated age.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub age: u32,
    pub year: u32,

    pub gross_salary: f64,
    pub net_salary: f64,
    pub gross_dividends: f64,
    pub net_dividends: f64,
    pub gross_state_pension: f64,
    pub net_state_pension: f64,
    pub gross_db_pension: f64,
    pub net_db_pension: f64,
    pub gross_rental_profit: f64,
    pub net_rental_profit: f64,
    pub gross_other_income: f64,
    pub net_other_income: f64,
    pub tax_free_income: f64,
    pub total_gross_income: f64,
    pub total_net_income: f64,

    pub lifestyle_expense: f64,
    pub housing_expense: f64,
    pub loan_payments: f64,
    pub event_expenses: f64,
    pub total_expense: f64,

    pub spent_salary: f64,
    pub spent_state_pension: f64,
    pub spent_other: f64,

    pub withdrawal_cash: f64,
    pub withdrawal_isa: f64,
    pub withdrawal_gia: f64,
    pub withdrawal_pension_gross: f64,
    pub withdrawal_pension_net: f64,
    pub shortfall: f64,

    pub contribution_cash: f64,
    pub contribution_isa: f64,
    pub contribution_gia: f64,
    pub contribution_pension: f64,
    pub pension_tax_relief: f64,
    pub surplus_cash: f64,
    pub surplus_isa: f64,
    pub surplus_gia: f64,
    pub surplus_pension: f64,
    pub surplus_mortgage_overpayment: f64,
    pub lump_sum_cash: f64,
    pub lump_sum_isa: f64,
    pub lump_sum_gia: f64,

    pub balance_cash: f64,
    pub balance_isa: f64,
    pub balance_gia: f64,
    pub balance_pension: f64,
    pub property_value: f64,
    /// Net disposal proceeds banked this year, after CGT and any linked
    /// mortgage redemption. Also counted inside `tax_free_income`.
    pub property_sale_proceeds: f64,
    pub total_net_worth: f64,
    pub liquid_net_worth: f64,
    pub investment_growth: f64,
    pub benchmark_pension: f64,

    pub tax: TaxBreakdown,
}
