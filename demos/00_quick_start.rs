/// quick start - one pool, one borrower, paid on time
use chrono::{Duration, TimeZone, Utc};
use collateral_leverage_rs::{
    AccountId, Amount, ConstantPriceRouter, HostChain, InMemoryChain, InMemoryToken,
    LendingLedger, PriceRouter, SafeTimeProvider, StableToken, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== quick start ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // collaborators: a 6-decimal stable token, native currency, 1 native = 1,200 stable
    let usdc = InMemoryToken::new();
    let chain = InMemoryChain::new();
    let router = ConstantPriceRouter::new(Amount::from_major(1_200, 6), 18);
    chain.deploy_contract(usdc.address());
    chain.deploy_contract(router.address());

    let owner = AccountId::new();
    let mut ledger = LendingLedger::builder()
        .owner(owner)
        .stable_token(usdc.clone())
        .price_router(router)
        .host_chain(chain.clone())
        .build()?;

    // a lender opens a 10,000 stable pool
    let lender = AccountId::new();
    usdc.mint(lender, Amount::from_major(10_000, 6));
    usdc.approve(lender, ledger.address(), Amount::MAX);
    let loan_id = ledger.create_loan(lender, Amount::from_major(10_000, 6), &time)?;
    let loan = ledger.loan(loan_id).unwrap();
    println!("loan {} opened: {} units, lender interest {}", loan_id, loan.amount_stable_coin, loan.interest);

    // a borrower posts 1 native unit and draws the maximum, half its value
    let borrower = AccountId::new();
    chain.fund(borrower, Amount::from_major(1, 18));
    let value = ledger.get_stablecoin_per_native(Amount::from_major(1, 18))?;
    println!("1 native unit quotes at {} stable units", value);

    ledger.create_borrow(borrower, value.half(), loan_id, Amount::from_major(1, 18), &time)?;
    let borrowing = ledger.borrowing(borrower).unwrap();
    println!(
        "borrowed {} for {} months, due {} by {}",
        borrowing.amount_stable_coin,
        borrowing.term_months,
        ledger.get_amount_to_paid(borrower),
        borrowing.end_date.format("%Y-%m-%d")
    );

    // ten months later the borrower pays principal plus interest
    controller.advance(Duration::days(300));
    let due = ledger.get_amount_to_paid(borrower);
    usdc.mint(borrower, due - usdc.balance_of(borrower));
    usdc.approve(borrower, ledger.address(), due);
    println!("\n{}: payable = {}", time.now().format("%Y-%m-%d"), ledger.borrow_is_payable(borrower, &time));
    ledger.pay_borrow(borrower, due, &time)?;
    println!("paid {}; status {:?}", due, ledger.borrowing(borrower).unwrap().status);

    // collateral comes back once the term is over
    controller.advance(Duration::days(31));
    ledger.release_collateral(borrower, &time)?;
    println!(
        "{}: collateral released, borrower holds {} native units",
        time.now().format("%Y-%m-%d"),
        chain.balance_of(borrower).to_major(18)
    );

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
