/// repay after default - a late payment defaults the borrow, a make-whole repay recovers it
use chrono::{Duration, TimeZone, Utc};
use collateral_leverage_rs::{
    AccountId, Amount, ConstantPriceRouter, HostChain, InMemoryChain, InMemoryToken,
    LendingLedger, PriceRouter, SafeTimeProvider, StableToken, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== repay after default ===\n");

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
        .stable_token(usdc.clone())
        .price_router(router)
        .host_chain(chain.clone())
        .build()?;

    let lender = AccountId::new();
    usdc.mint(lender, Amount::from_major(10_000, 6));
    usdc.approve(lender, ledger.address(), Amount::MAX);
    let loan_id = ledger.create_loan(lender, Amount::from_major(10_000, 6), &time)?;

    let borrower = AccountId::new();
    chain.fund(borrower, Amount::from_major(1, 18));
    usdc.approve(borrower, ledger.address(), Amount::MAX);
    ledger.create_borrow(borrower, Amount::from_major(600, 6), loan_id, Amount::from_major(1, 18), &time)?;
    let end = ledger.borrowing(borrower).unwrap().end_date;
    println!("borrowed 600 stable, term ends {}", end.format("%Y-%m-%d"));

    // the borrower misses the end of the term by a day
    controller.advance(Duration::days(331));
    let due = ledger.get_amount_to_paid(borrower);
    usdc.mint(borrower, Amount::from_major(1_000, 6));
    println!("\n{}: payable = {}", time.now().format("%Y-%m-%d"), ledger.borrow_is_payable(borrower, &time));

    ledger.pay_borrow(borrower, due, &time)?;
    println!("late payment of {} accepted; status {:?}", due, ledger.borrowing(borrower).unwrap().status);
    println!("lender may now claim: {}", ledger.collateral_is_claimable(borrower, &time));

    // releasing is refused until the borrow is brought back to paid
    if let Err(e) = ledger.release_collateral(borrower, &time) {
        println!("release refused: {}", e);
    }
    if let Err(e) = ledger.repay_loan(borrower, due - Amount::ONE, &time) {
        println!("short repay refused: {}", e);
    }

    // a make-whole payment with a small tip on top
    let repay = due + Amount::from_major(10, 6);
    ledger.repay_loan(borrower, repay, &time)?;
    println!("\nrepaid {}; status {:?}", repay, ledger.borrowing(borrower).unwrap().status);

    ledger.release_collateral(borrower, &time)?;
    println!(
        "collateral released, borrower holds {} native units",
        chain.balance_of(borrower).to_major(18)
    );

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
