/// circuit breaker - pause, emergency sweeps and ownership
use chrono::{TimeZone, Utc};
use collateral_leverage_rs::{
    AccountId, Amount, ConstantPriceRouter, HostChain, InMemoryChain, InMemoryToken,
    LendingLedger, PriceRouter, SafeTimeProvider, StableToken, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== circuit breaker ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

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

    let lender = AccountId::new();
    usdc.mint(lender, Amount::from_major(2_000, 6));
    usdc.approve(lender, ledger.address(), Amount::MAX);
    let loan_id = ledger.create_loan(lender, Amount::from_major(1_000, 6), &time)?;

    let borrower = AccountId::new();
    chain.fund(borrower, Amount::from_major(1, 18));
    ledger.create_borrow(borrower, Amount::from_major(500, 6), loan_id, Amount::from_major(1, 18), &time)?;

    // a tip sent straight to the ledger
    let donor = AccountId::new();
    chain.fund(donor, Amount::from_major(1, 18));
    ledger.receive_native(donor, Amount::from_major(1, 18))?;

    // pause halts every protocol operation
    ledger.pause(owner)?;
    println!("paused: {}", ledger.paused());
    match ledger.create_loan(AccountId::new(), Amount::from_major(1, 6), &time) {
        Err(e) => println!("create_loan while paused: {}", e),
        Ok(_) => println!("create_loan unexpectedly succeeded"),
    }
    if let Err(e) = ledger.pause(AccountId::new()) {
        println!("pause by a stranger: {}", e);
    }
    ledger.unpause(owner)?;

    // emergency sweeps drain custody and leave the ledger paused
    let vault = AccountId::new();
    let stable = ledger.emergency_withdraw_erc20(owner, vault)?;
    let native = ledger.emergency_withdraw_eth(owner, vault)?;
    println!(
        "\nswept {} stable and {} native units to the vault; paused: {}",
        stable.to_major(6),
        native.to_major(18),
        ledger.paused()
    );
    println!(
        "vault now holds {} stable, {} native",
        usdc.balance_of(vault).to_major(6),
        chain.balance_of(vault).to_major(18)
    );

    // hand over, then renounce
    let successor = AccountId::new();
    ledger.transfer_ownership(owner, successor)?;
    println!("\nowner is now {}", successor);
    ledger.renounce_ownership(successor)?;
    println!("owner renounced: {:?}", ledger.owner());
    if let Err(e) = ledger.unpause(successor) {
        println!("unpause after renounce: {}", e);
    }

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
