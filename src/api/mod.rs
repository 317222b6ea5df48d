use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Assumptions, DbPension, DrawdownStrategy, FinancialEvent, IncomeStream, Indexation,
    InvestmentProperty, Loan, LumpSumDestination, LumpSumMode, Mortgage, MortgageKind,
    SurplusTarget, TaxTreatment, YearRecord, run_projection,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDrawdownStrategy {
    #[serde(alias = "taxEfficientBridge", alias = "tax_efficient_bridge", alias = "bridge")]
    TaxEfficientBridge,
    #[serde(alias = "preservePension", alias = "preserve_pension")]
    PreservePension,
    Standard,
}

impl From<ApiDrawdownStrategy> for DrawdownStrategy {
    fn from(value: ApiDrawdownStrategy) -> Self {
        match value {
            ApiDrawdownStrategy::TaxEfficientBridge => DrawdownStrategy::TaxEfficientBridge,
            ApiDrawdownStrategy::PreservePension => DrawdownStrategy::PreservePension,
            ApiDrawdownStrategy::Standard => DrawdownStrategy::Standard,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSurplusTarget {
    Pension,
    Isa,
    Gia,
    Cash,
    #[serde(alias = "mortgageOverpayment", alias = "mortgage_overpayment", alias = "mortgage")]
    MortgageOverpayment,
}

impl From<ApiSurplusTarget> for SurplusTarget {
    fn from(value: ApiSurplusTarget) -> Self {
        match value {
            ApiSurplusTarget::Pension => SurplusTarget::Pension,
            ApiSurplusTarget::Isa => SurplusTarget::Isa,
            ApiSurplusTarget::Gia => SurplusTarget::Gia,
            ApiSurplusTarget::Cash => SurplusTarget::Cash,
            ApiSurplusTarget::MortgageOverpayment => SurplusTarget::MortgageOverpayment,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiLumpSumMode {
    Drip,
    Upfront,
}

impl From<ApiLumpSumMode> for LumpSumMode {
    fn from(value: ApiLumpSumMode) -> Self {
        match value {
            ApiLumpSumMode::Drip => LumpSumMode::Drip,
            ApiLumpSumMode::Upfront => LumpSumMode::Upfront,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiLumpSumDestination {
    Cash,
    Isa,
    Gia,
}

impl From<ApiLumpSumDestination> for LumpSumDestination {
    fn from(value: ApiLumpSumDestination) -> Self {
        match value {
            ApiLumpSumDestination::Cash => LumpSumDestination::Cash,
            ApiLumpSumDestination::Isa => LumpSumDestination::Isa,
            ApiLumpSumDestination::Gia => LumpSumDestination::Gia,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiIndexation {
    #[serde(alias = "none", alias = "fixed")]
    Flat,
    #[serde(alias = "cpi")]
    Inflation,
    #[serde(alias = "salaryGrowth", alias = "salary_growth", alias = "salary")]
    SalaryGrowth,
}

impl From<ApiIndexation> for Indexation {
    fn from(value: ApiIndexation) -> Self {
        match value {
            ApiIndexation::Flat => Indexation::Flat,
            ApiIndexation::Inflation => Indexation::Inflation,
            ApiIndexation::SalaryGrowth => Indexation::SalaryGrowth,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTaxTreatment {
    #[serde(alias = "taxFree", alias = "tax_free")]
    TaxFree,
    #[serde(alias = "taxableIncome", alias = "taxable_income", alias = "income")]
    TaxableIncome,
    Dividend,
    #[serde(alias = "capitalGains", alias = "capital_gains", alias = "cgt")]
    CapitalGains,
    #[serde(alias = "residentialProperty", alias = "residential_property")]
    ResidentialProperty,
}

impl From<ApiTaxTreatment> for TaxTreatment {
    fn from(value: ApiTaxTreatment) -> Self {
        match value {
            ApiTaxTreatment::TaxFree => TaxTreatment::TaxFree,
            ApiTaxTreatment::TaxableIncome => TaxTreatment::TaxableIncome,
            ApiTaxTreatment::Dividend => TaxTreatment::Dividend,
            ApiTaxTreatment::CapitalGains => TaxTreatment::CapitalGains,
            ApiTaxTreatment::ResidentialProperty => TaxTreatment::ResidentialProperty,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiMortgageKind {
    Repayment,
    #[serde(alias = "interestOnly", alias = "interest_only")]
    InterestOnly,
}

impl From<ApiMortgageKind> for MortgageKind {
    fn from(value: ApiMortgageKind) -> Self {
        match value {
            ApiMortgageKind::Repayment => MortgageKind::Repayment,
            ApiMortgageKind::InterestOnly => MortgageKind::InterestOnly,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StreamPayload {
    amount: Option<f64>,
    start_age: Option<u32>,
    end_age: Option<u32>,
    indexation: Option<ApiIndexation>,
    dividend: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EventPayload {
    amount: Option<f64>,
    start_age: Option<u32>,
    end_age: Option<u32>,
    expense: Option<bool>,
    treatment: Option<ApiTaxTreatment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    balance: Option<f64>,
    rate: Option<f64>,
    annual_payment: Option<f64>,
    start_age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MortgagePayload {
    balance: Option<f64>,
    monthly_payment: Option<f64>,
    rate: Option<f64>,
    kind: Option<ApiMortgageKind>,
    end_age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PropertyPayload {
    value: Option<f64>,
    monthly_rent: Option<f64>,
    monthly_costs: Option<f64>,
    growth_rate: Option<f64>,
    sale_age: Option<u32>,
    sale_price: Option<f64>,
    linked_mortgage: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DbPensionPayload {
    annual_income: Option<f64>,
    start_age: Option<u32>,
    inflation_linked: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    birth_year: Option<u32>,
    semi_retirement_age: Option<u32>,
    retirement_age: Option<u32>,
    pension_access_age: Option<u32>,
    state_pension_age: Option<u32>,
    life_expectancy: Option<u32>,
    start_year: Option<u32>,

    annual_salary: Option<f64>,
    salary_growth_rate: Option<f64>,
    semi_retirement_income: Option<f64>,
    annual_dividends: Option<f64>,
    additional_income: Option<f64>,
    income_streams: Option<Vec<StreamPayload>>,

    state_pension_amount: Option<f64>,
    missing_ni_years: Option<u32>,
    db_pensions: Option<Vec<DbPensionPayload>>,

    inflation_rate: Option<f64>,

    annual_spending: Option<f64>,
    spending_decline_rate: Option<f64>,
    spending_decline_age: Option<u32>,
    annual_rent: Option<f64>,
    rent_inflation_rate: Option<f64>,

    events: Option<Vec<EventPayload>>,
    loans: Option<Vec<LoanPayload>>,
    mortgages: Option<Vec<MortgagePayload>>,
    properties: Option<Vec<PropertyPayload>>,

    cash_start: Option<f64>,
    isa_start: Option<f64>,
    gia_start: Option<f64>,
    pension_start: Option<f64>,
    monthly_cash_contribution: Option<f64>,
    monthly_isa_contribution: Option<f64>,
    monthly_gia_contribution: Option<f64>,
    monthly_pension_contribution: Option<f64>,

    cash_growth_rate: Option<f64>,
    isa_growth_rate: Option<f64>,
    gia_growth_rate: Option<f64>,
    pension_growth_rate: Option<f64>,
    pension_fee_rate: Option<f64>,

    surplus_priority: Option<Vec<ApiSurplusTarget>>,
    drawdown_strategy: Option<ApiDrawdownStrategy>,
    bed_and_isa: Option<bool>,

    pension_tax_free_fraction: Option<f64>,
    lump_sum_mode: Option<ApiLumpSumMode>,
    lump_sum_destination: Option<ApiLumpSumDestination>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSummary {
    final_net_worth: f64,
    final_liquid_net_worth: f64,
    total_tax_paid: f64,
    total_shortfall: f64,
    shortfall_years: usize,
    pension_fee_cost: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    start_year: u32,
    years: Vec<YearRecord>,
    summary: ProjectSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn default_assumptions() -> Assumptions {
    Assumptions {
        current_age: 35,
        semi_retirement_age: 55,
        retirement_age: 58,
        pension_access_age: 57,
        state_pension_age: 68,
        life_expectancy: 95,
        start_year: 2026,

        annual_salary: 60_000.0,
        salary_growth_rate: 0.02,
        semi_retirement_income: 20_000.0,
        annual_dividends: 0.0,
        income_streams: Vec::new(),

        state_pension_amount: 11_973.0,
        missing_ni_years: 0,
        db_pensions: Vec::new(),

        inflation_rate: 0.025,

        annual_spending: 30_000.0,
        spending_decline_rate: 0.0,
        spending_decline_age: None,
        annual_rent: 0.0,
        rent_inflation_rate: 0.03,

        events: Vec::new(),
        loans: Vec::new(),
        mortgages: Vec::new(),
        properties: Vec::new(),

        cash_start: 20_000.0,
        isa_start: 60_000.0,
        gia_start: 10_000.0,
        pension_start: 150_000.0,
        monthly_cash_contribution: 0.0,
        monthly_isa_contribution: 500.0,
        monthly_gia_contribution: 0.0,
        monthly_pension_contribution: 750.0,

        cash_growth_rate: 0.015,
        isa_growth_rate: 0.05,
        gia_growth_rate: 0.05,
        pension_growth_rate: 0.05,
        pension_fee_rate: 0.004,

        surplus_priority: vec![
            SurplusTarget::Pension,
            SurplusTarget::Isa,
            SurplusTarget::Gia,
            SurplusTarget::Cash,
        ],
        drawdown_strategy: DrawdownStrategy::Standard,
        bed_and_isa: false,

        pension_tax_free_fraction: 0.25,
        lump_sum_mode: LumpSumMode::Drip,
        lump_sum_destination: LumpSumDestination::Cash,
    }
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

fn build_assumptions(payload: ProjectPayload) -> Result<Assumptions, String> {
    let mut a = default_assumptions();

    if let Some(v) = payload.start_year {
        a.start_year = v;
    }
    // currentAge wins over the legacy birthYear field when both are sent.
    if let Some(v) = payload.current_age {
        a.current_age = v;
    } else if let Some(birth_year) = payload.birth_year {
        if birth_year >= a.start_year {
            return Err("birthYear must be before startYear".to_string());
        }
        a.current_age = a.start_year - birth_year;
    }
    if let Some(v) = payload.retirement_age {
        a.retirement_age = v;
        // Unless told otherwise, there is no semi-retirement phase.
        a.semi_retirement_age = payload.semi_retirement_age.unwrap_or(v);
    } else if let Some(v) = payload.semi_retirement_age {
        a.semi_retirement_age = v;
    }
    if let Some(v) = payload.pension_access_age {
        a.pension_access_age = v;
    }
    if let Some(v) = payload.state_pension_age {
        a.state_pension_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        a.life_expectancy = v;
    }

    if a.current_age == 0 || a.current_age > 120 {
        return Err("currentAge must be between 1 and 120".to_string());
    }
    if a.life_expectancy < a.current_age {
        return Err("lifeExpectancy must be >= currentAge".to_string());
    }
    if a.life_expectancy > 120 {
        return Err("lifeExpectancy must be <= 120".to_string());
    }
    if a.semi_retirement_age > a.retirement_age {
        return Err("semiRetirementAge must be <= retirementAge".to_string());
    }

    a.annual_salary = finite_or(payload.annual_salary, a.annual_salary);
    a.salary_growth_rate = finite_or(payload.salary_growth_rate, a.salary_growth_rate);
    a.semi_retirement_income =
        finite_or(payload.semi_retirement_income, a.semi_retirement_income);
    a.annual_dividends = finite_or(payload.annual_dividends, a.annual_dividends);

    if let Some(streams) = payload.income_streams {
        a.income_streams = streams
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let stream = IncomeStream {
                    amount: finite_or(s.amount, 0.0),
                    start_age: s.start_age.unwrap_or(a.current_age),
                    end_age: s.end_age.unwrap_or(a.life_expectancy),
                    indexation: s.indexation.map_or(Indexation::Inflation, Into::into),
                    dividend: s.dividend.unwrap_or(false),
                };
                if stream.start_age > stream.end_age {
                    return Err(format!("incomeStreams[{i}]: startAge must be <= endAge"));
                }
                if stream.amount < 0.0 {
                    return Err(format!("incomeStreams[{i}]: amount must be >= 0"));
                }
                Ok(stream)
            })
            .collect::<Result<_, _>>()?;
    }
    // Legacy single figure becomes a lifelong flat stream.
    if let Some(v) = payload.additional_income {
        if v.is_finite() && v > 0.0 {
            a.income_streams.push(IncomeStream {
                amount: v,
                start_age: a.current_age,
                end_age: a.life_expectancy,
                indexation: Indexation::Flat,
                dividend: false,
            });
        }
    }

    a.state_pension_amount = finite_or(payload.state_pension_amount, a.state_pension_amount);
    if let Some(v) = payload.missing_ni_years {
        if v > 35 {
            return Err("missingNiYears must be <= 35".to_string());
        }
        a.missing_ni_years = v;
    }
    if let Some(pensions) = payload.db_pensions {
        a.db_pensions = pensions
            .into_iter()
            .map(|p| DbPension {
                annual_income: finite_or(p.annual_income, 0.0).max(0.0),
                start_age: p.start_age.unwrap_or(a.state_pension_age),
                inflation_linked: p.inflation_linked.unwrap_or(true),
            })
            .collect();
    }

    a.inflation_rate = finite_or(payload.inflation_rate, a.inflation_rate);

    a.annual_spending = finite_or(payload.annual_spending, a.annual_spending);
    a.spending_decline_rate =
        finite_or(payload.spending_decline_rate, a.spending_decline_rate);
    if !(0.0..=1.0).contains(&a.spending_decline_rate) {
        return Err("spendingDeclineRate must be between 0 and 1".to_string());
    }
    if let Some(v) = payload.spending_decline_age {
        a.spending_decline_age = Some(v);
    }
    a.annual_rent = finite_or(payload.annual_rent, a.annual_rent);
    a.rent_inflation_rate = finite_or(payload.rent_inflation_rate, a.rent_inflation_rate);

    if let Some(events) = payload.events {
        a.events = events
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                let event = FinancialEvent {
                    amount: finite_or(e.amount, 0.0),
                    start_age: e.start_age.unwrap_or(a.current_age),
                    end_age: e.end_age,
                    expense: e.expense.unwrap_or(false),
                    treatment: e.treatment.map_or(TaxTreatment::TaxFree, Into::into),
                };
                if event.amount < 0.0 {
                    return Err(format!("events[{i}]: amount must be >= 0"));
                }
                if let Some(end) = event.end_age {
                    if event.start_age > end {
                        return Err(format!("events[{i}]: startAge must be <= endAge"));
                    }
                }
                Ok(event)
            })
            .collect::<Result<_, _>>()?;
    }

    if let Some(loans) = payload.loans {
        a.loans = loans
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                let loan = Loan {
                    balance: finite_or(l.balance, 0.0),
                    rate: finite_or(l.rate, 0.0),
                    annual_payment: finite_or(l.annual_payment, 0.0),
                    start_age: l.start_age.unwrap_or(a.current_age),
                };
                if loan.balance < 0.0 || loan.annual_payment < 0.0 {
                    return Err(format!(
                        "loans[{i}]: balance and annualPayment must be >= 0"
                    ));
                }
                Ok(loan)
            })
            .collect::<Result<_, _>>()?;
    }

    if let Some(mortgages) = payload.mortgages {
        a.mortgages = mortgages
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let mortgage = Mortgage {
                    balance: finite_or(m.balance, 0.0),
                    monthly_payment: finite_or(m.monthly_payment, 0.0),
                    rate: finite_or(m.rate, 0.0),
                    kind: m.kind.map_or(MortgageKind::Repayment, Into::into),
                    end_age: m.end_age.unwrap_or(a.retirement_age),
                };
                if mortgage.balance < 0.0 || mortgage.monthly_payment < 0.0 {
                    return Err(format!(
                        "mortgages[{i}]: balance and monthlyPayment must be >= 0"
                    ));
                }
                Ok(mortgage)
            })
            .collect::<Result<_, _>>()?;
    }

    if let Some(properties) = payload.properties {
        a.properties = properties
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let property = InvestmentProperty {
                    value: finite_or(p.value, 0.0),
                    monthly_rent: finite_or(p.monthly_rent, 0.0),
                    monthly_costs: finite_or(p.monthly_costs, 0.0),
                    growth_rate: finite_or(p.growth_rate, 0.0),
                    sale_age: p.sale_age,
                    sale_price: p.sale_price,
                    linked_mortgage: p.linked_mortgage,
                };
                if property.value < 0.0 {
                    return Err(format!("properties[{i}]: value must be >= 0"));
                }
                if let Some(index) = property.linked_mortgage {
                    if index >= a.mortgages.len() {
                        return Err(format!(
                            "properties[{i}]: linkedMortgage index {index} is out of range"
                        ));
                    }
                }
                Ok(property)
            })
            .collect::<Result<_, _>>()?;
    }

    a.cash_start = finite_or(payload.cash_start, a.cash_start);
    a.isa_start = finite_or(payload.isa_start, a.isa_start);
    a.gia_start = finite_or(payload.gia_start, a.gia_start);
    a.pension_start = finite_or(payload.pension_start, a.pension_start);
    for (name, value) in [
        ("cashStart", a.cash_start),
        ("isaStart", a.isa_start),
        ("giaStart", a.gia_start),
        ("pensionStart", a.pension_start),
    ] {
        if value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    a.monthly_cash_contribution =
        finite_or(payload.monthly_cash_contribution, a.monthly_cash_contribution);
    a.monthly_isa_contribution =
        finite_or(payload.monthly_isa_contribution, a.monthly_isa_contribution);
    a.monthly_gia_contribution =
        finite_or(payload.monthly_gia_contribution, a.monthly_gia_contribution);
    a.monthly_pension_contribution = finite_or(
        payload.monthly_pension_contribution,
        a.monthly_pension_contribution,
    );

    a.cash_growth_rate = finite_or(payload.cash_growth_rate, a.cash_growth_rate);
    a.isa_growth_rate = finite_or(payload.isa_growth_rate, a.isa_growth_rate);
    a.gia_growth_rate = finite_or(payload.gia_growth_rate, a.gia_growth_rate);
    a.pension_growth_rate = finite_or(payload.pension_growth_rate, a.pension_growth_rate);
    a.pension_fee_rate = finite_or(payload.pension_fee_rate, a.pension_fee_rate);
    if a.pension_fee_rate < 0.0 {
        return Err("pensionFeeRate must be >= 0".to_string());
    }

    if let Some(priority) = payload.surplus_priority {
        a.surplus_priority = priority.into_iter().map(Into::into).collect();
    }
    if let Some(v) = payload.drawdown_strategy {
        a.drawdown_strategy = v.into();
    }
    if let Some(v) = payload.bed_and_isa {
        a.bed_and_isa = v;
    }

    a.pension_tax_free_fraction = finite_or(
        payload.pension_tax_free_fraction,
        a.pension_tax_free_fraction,
    );
    if !(0.0..=1.0).contains(&a.pension_tax_free_fraction) {
        return Err("pensionTaxFreeFraction must be between 0 and 1".to_string());
    }
    if let Some(v) = payload.lump_sum_mode {
        a.lump_sum_mode = v.into();
    }
    if let Some(v) = payload.lump_sum_destination {
        a.lump_sum_destination = v.into();
    }

    Ok(a)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Prospect HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let assumptions = match build_assumptions(payload) {
        Ok(assumptions) => assumptions,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let years = run_projection(&assumptions);
    let response = build_project_response(&assumptions, years);
    json_response(StatusCode::OK, response)
}

fn build_project_response(assumptions: &Assumptions, years: Vec<YearRecord>) -> ProjectResponse {
    let total_tax_paid = years.iter().map(|y| y.tax.total_tax).sum();
    let total_shortfall = years.iter().map(|y| y.shortfall).sum();
    let shortfall_years = years.iter().filter(|y| y.shortfall > 0.0).count();
    let summary = match years.last() {
        Some(last) => ProjectSummary {
            final_net_worth: last.total_net_worth,
            final_liquid_net_worth: last.liquid_net_worth,
            total_tax_paid,
            total_shortfall,
            shortfall_years,
            pension_fee_cost: (last.benchmark_pension - last.balance_pension).max(0.0),
        },
        None => ProjectSummary {
            final_net_worth: 0.0,
            final_liquid_net_worth: 0.0,
            total_tax_paid: 0.0,
            total_shortfall: 0.0,
            shortfall_years: 0,
            pension_fee_cost: 0.0,
        },
    };

    ProjectResponse {
        start_year: assumptions.start_year,
        years,
        summary,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn assumptions_from_json(json: &str) -> Result<Assumptions, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    build_assumptions(payload)
}
