/// lender claim - the pool's lender seizes collateral from a defaulted borrow
use chrono::{Duration, TimeZone, Utc};
use collateral_leverage_rs::{
    AccountId, Amount, ConstantPriceRouter, HostChain, InMemoryChain, InMemoryToken,
    LendingLedger, PriceRouter, SafeTimeProvider, StableToken, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== lender claim ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let usdc = InMemoryToken::new();
    let chain = InMemoryChain::new();
    let router = ConstantPriceRouter::new(Amount::from_major(3_000, 6), 18);
    chain.deploy_contract(usdc.address());
    chain.deploy_contract(router.address());

    let mut ledger = LendingLedger::builder()
        .owner(AccountId::new())
        .stable_token(usdc.clone())
        .price_router(router.clone())
        .host_chain(chain.clone())
        .build()?;

    // two pools
    let mut lenders = Vec::new();
    for deposit in [5_000u64, 20_000] {
        let lender = AccountId::new();
        usdc.mint(lender, Amount::from_major(deposit, 6));
        usdc.approve(lender, ledger.address(), Amount::MAX);
        let loan_id = ledger.create_loan(lender, Amount::from_major(deposit, 6), &time)?;
        println!("loan {} opened with {} stable", loan_id, deposit);
        lenders.push((lender, loan_id));
    }
    let (other_lender, _) = lenders[0];
    let (lender, loan_id) = lenders[1];

    // longer terms for richer collateral
    for native in [1u64, 2, 5] {
        println!(
            "{} native unit(s) -> {} month term",
            native,
            ledger.get_amount_month(Amount::from_major(native, 18))?
        );
    }

    let borrower = AccountId::new();
    chain.fund(borrower, Amount::from_major(2, 18));
    ledger.create_borrow(borrower, Amount::from_major(2_500, 6), loan_id, Amount::from_major(2, 18), &time)?;
    let borrowing = ledger.borrowing(borrower).unwrap();
    println!(
        "\nborrowed 2,500 stable from loan {} for {} months",
        loan_id, borrowing.term_months
    );

    // the market falls and the borrower walks away
    router.set_price(Amount::from_major(1_000, 6));
    let term = i64::from(borrowing.term_months) * 30;
    controller.advance(Duration::days(term + 1));
    println!("\n{}: borrower never paid", time.now().format("%Y-%m-%d"));
    println!(
        "still owed {}; claimable: {}",
        ledger.get_amount_to_paid(borrower),
        ledger.collateral_is_claimable(borrower, &time)
    );

    if let Err(e) = ledger.claim_collateral(other_lender, borrower, &time) {
        println!("claim by the other pool's lender refused: {}", e);
    }

    ledger.claim_collateral(lender, borrower, &time)?;
    println!(
        "lender claimed {} native units; loan {} has recovered {}",
        chain.balance_of(lender).to_major(18),
        loan_id,
        ledger.loan(loan_id).unwrap().amount_claimed
    );

    Ok(())
}
