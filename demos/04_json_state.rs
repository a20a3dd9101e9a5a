/// json state - config from json and ledger snapshots for debugging and monitoring
use chrono::{Duration, TimeZone, Utc};
use collateral_leverage_rs::{
    AccountId, Amount, ConstantPriceRouter, InMemoryChain, InMemoryToken,
    LedgerConfig, LedgerView, LendingLedger, PriceRouter, SafeTimeProvider, StableToken, TimeSource,
};

const CONFIG: &str = r#"{
    "borrower_rate": "0.08",
    "stable_decimals": 6,
    "native_decimals": 18,
    "term_curve": {
        "min_months": 6,
        "max_months": 24,
        "stable_per_month": "250000000"
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== json state serialization ===\n");

    let config = LedgerConfig::from_json(CONFIG)?;
    println!("config loaded:\n{}\n", config.to_json_pretty()?);

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let usdc = InMemoryToken::new();
    let chain = InMemoryChain::new();
    let router = ConstantPriceRouter::new(Amount::from_major(1_200, 6), 18);
    chain.deploy_contract(usdc.address());
    chain.deploy_contract(router.address());

    let mut ledger = LendingLedger::builder()
        .owner(AccountId::new())
        .config(config)
        .stable_token(usdc.clone())
        .price_router(router)
        .host_chain(chain.clone())
        .build()?;

    // stage 1: a pool
    let lender = AccountId::new();
    usdc.mint(lender, Amount::from_major(5_000, 6));
    usdc.approve(lender, ledger.address(), Amount::MAX);
    let loan_id = ledger.create_loan(lender, Amount::from_major(5_000, 6), &time)?;
    println!("stage 1: loan opened");
    println!("--------------------");
    println!("{}\n", ledger.json());

    // stage 2: a borrow against it
    let borrower = AccountId::new();
    chain.fund(borrower, Amount::from_major(1, 18));
    usdc.approve(borrower, ledger.address(), Amount::MAX);
    ledger.create_borrow(borrower, Amount::from_major(400, 6), loan_id, Amount::from_major(1, 18), &time)?;
    println!("stage 2: borrow opened");
    println!("----------------------");
    println!("{}\n", ledger.json());

    // stage 3: paid inside the term
    controller.advance(Duration::days(60));
    let due = ledger.get_amount_to_paid(borrower);
    usdc.mint(borrower, due);
    ledger.pay_borrow(borrower, due, &time)?;
    println!("stage 3: borrow paid");
    println!("--------------------");
    let view = LedgerView::from_ledger(&ledger);
    println!("{}\n", view.to_json_pretty()?);

    println!(
        "custody check: {} stable held, {} lent, {} drawn",
        view.custody.stable, view.custody.stable_lent, view.custody.stable_drawn
    );

    Ok(())
}
