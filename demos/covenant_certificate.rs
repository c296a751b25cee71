//! Full covenant certificate example: reconcile, certify, store

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use covenant_core::utils::{validate_inputs, MemoryStore};
use covenant_core::{
    reconcile, AddBackRule, CertificateStore, CovenantRules, EbitdaRules, EntryCategory,
    FinancialCovenant, LedgerEntry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covenant_core=debug".into()),
        )
        .init();

    println!("📜 Covenant Core - Compliance Certificate Example\n");

    // 1. Categorized ledger entries as delivered by the ledger source
    let entries = vec![
        LedgerEntry::new("rev1", "4000", "Product revenue", "SAP", BigDecimal::from(1_250_000_000i64), EntryCategory::Revenue),
        LedgerEntry::new("opx1", "5000", "Operating costs", "SAP", BigDecimal::from(-950_000_000i64), EntryCategory::OpEx),
        LedgerEntry::new("da1", "6100", "Depreciation charge", "SAP", BigDecimal::from(70_000_000i64), EntryCategory::DepreciationAmortization),
        LedgerEntry::new("rst1", "6200", "Redundancy programme", "SAP", BigDecimal::from(-10_500_000i64), EntryCategory::Restructuring),
        LedgerEntry::new("fx1", "6300", "Unrealized FX gain", "SAP", BigDecimal::from(4_200_000i64), EntryCategory::Fx),
        LedgerEntry::new("int1", "7000", "Senior notes interest", "SAP", BigDecimal::from(-85_000_000i64), EntryCategory::InterestExpense),
        LedgerEntry::new("int2", "7100", "Deposit interest", "SAP", BigDecimal::from(5_000_000i64), EntryCategory::InterestIncome),
        LedgerEntry::new("dbt1", "2100", "Term Loan B", "SAP", BigDecimal::from(1_690_000_000i64), EntryCategory::GrossDebt),
        LedgerEntry::new("lse1", "2200", "Lease liabilities", "SAP", BigDecimal::from(100_000_000i64), EntryCategory::Leases),
        LedgerEntry::new("csh1", "1000", "Cash at bank", "SAP", BigDecimal::from(120_000_000i64), EntryCategory::Cash),
    ];

    // 2. Covenant rules as extracted from the facilities agreement
    let rules = CovenantRules {
        ebitda_rules: EbitdaRules {
            starting_point: Some("Consolidated Operating Profit".to_string()),
            permitted_add_backs: vec![
                AddBackRule {
                    item: "Depreciation, amortization and impairment".to_string(),
                    legal_logic: "Clause 22.1(a): non-cash charges added back".to_string(),
                    sap_mapping_hint: Some("61*".to_string()),
                    cap: None,
                },
                AddBackRule {
                    item: "Exceptional restructuring costs".to_string(),
                    legal_logic: "Clause 22.1(c): permitted up to the agreed cap".to_string(),
                    sap_mapping_hint: Some("62*".to_string()),
                    cap: Some("capped at 15% of EBITDA".to_string()),
                },
            ],
            exclusions: vec!["Unrealized FX gains and losses".to_string()],
        },
        financial_covenants: vec![FinancialCovenant {
            name: "Senior Secured Leverage Ratio".to_string(),
            max_limit: Some(BigDecimal::from(5)),
            min_limit: None,
        }],
        covenant_trigger: None,
    };

    validate_inputs(&entries, &rules)?;

    // 3. Run the engine
    let report = reconcile(&entries, &rules);

    println!("📊 EBITDA Bridge:");
    for line in &report.reconciliation {
        let marker = if line.is_deduction { "−" } else { "+" };
        println!(
            "  {} {:<40} {:>16} ({:?})",
            marker, line.label, line.final_amount, line.section
        );
    }
    println!();
    println!("  Adjusted EBITDA:     {}", report.health.adjusted_ebitda);
    println!("  Net Debt:            {}", report.health.net_debt);
    println!("  Net Finance Charges: {}", report.health.net_finance_charges);
    println!();
    println!(
        "  Leverage: {}x against {}x ceiling (headroom {})",
        report.headroom.leverage_ratio,
        report.headroom.leverage_threshold,
        report.headroom.leverage_headroom
    );
    println!("  Status: {:?}\n", report.headroom.status);

    // 4. Freeze the run into a certificate and store it
    let record = report.certify(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
    let mut store = MemoryStore::new();
    store.save_certificate(&record).await?;
    println!("✓ Certificate {} stored for {}", record.id, record.as_of_date);

    Ok(())
}
