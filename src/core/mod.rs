mod engine;
mod solver;
mod tax;
mod types;

pub use engine::{BENCHMARK_FEE_RATE, run_projection};
pub use solver::{GrossWithdrawal, IncomeContext, resolve_gross_withdrawal};
pub use tax::{
    ISA_ANNUAL_ALLOWANCE, PENSION_ANNUAL_ALLOWANCE, TaxInput, TaxOutcome, resolve_tax,
};
pub use types::{
    Assumptions, DbPension, DrawdownStrategy, FinancialEvent, IncomeStream, Indexation,
    InvestmentProperty, Loan, LumpSumDestination, LumpSumMode, Mortgage, MortgageKind,
    SurplusTarget, TaxBreakdown, TaxTreatment, YearRecord,
};
