#![cfg(test)]

use super::*;
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contractimpl, contracttype, token, vec, Address, Env, String};

pub(crate) const START: u64 = 1_000;
/// One whole token at 7 decimals.
pub(crate) const UNIT: u128 = 10_000_000;
/// $1 for a 7 decimal token: 10^(36 - 7).
pub(crate) const PRICE_ONE: u128 = 100_000_000_000_000_000_000_000_000_000;
const WEEK: u64 = 7 * 24 * 60 * 60;

#[contract]
pub struct MockOracle;

#[contracttype]
enum MockKey {
    Price(Address),
    Rate,
}

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, market: Address, price: u128) {
        env.storage().instance().set(&MockKey::Price(market), &price);
    }

    pub fn get_underlying_price(env: Env, market: Address) -> u128 {
        env.storage()
            .instance()
            .get(&MockKey::Price(market))
            .unwrap_or(0)
    }
}

#[contract]
pub struct MockRateModel;

#[contractimpl]
impl MockRateModel {
    pub fn set_rate(env: Env, rate: u128) {
        env.storage().instance().set(&MockKey::Rate, &rate);
    }

    pub fn get_borrow_rate(env: Env, _cash: u128, _borrows: u128, _reserves: u128) -> u128 {
        env.storage().instance().get(&MockKey::Rate).unwrap_or(0)
    }
}

pub(crate) struct Setup<'a> {
    pub env: Env,
    pub admin: Address,
    pub comptroller: ComptrollerClient<'a>,
    pub comptroller_id: Address,
    pub oracle: MockOracleClient<'a>,
    /// Listed at 80% collateral factor.
    pub collateral: Address,
    /// Listed with no collateral value.
    pub debt: Address,
}

pub(crate) fn new_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone())
        .address()
}

pub(crate) fn fund(env: &Env, token: &Address, to: &Address, amount: u128) {
    token::StellarAssetClient::new(env, token).mint(to, &(amount as i128));
}

pub(crate) fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let admin = Address::generate(&env);
    let oracle_id = env.register(MockOracle, ());
    let oracle = MockOracleClient::new(&env, &oracle_id);
    let comptroller_id = env.register(Comptroller, ());
    let comptroller = ComptrollerClient::new(&env, &comptroller_id);
    comptroller.initialize(&admin, &oracle_id);

    let collateral = new_token(&env, &admin);
    let debt = new_token(&env, &admin);
    for market in [&collateral, &debt] {
        comptroller.support_market(market, &EXP_SCALE);
        oracle.set_price(market, &PRICE_ONE);
    }
    comptroller.set_collateral_factor(&collateral, &(8 * EXP_SCALE / 10));

    Setup {
        env,
        admin,
        comptroller,
        comptroller_id,
        oracle,
        collateral,
        debt,
    }
}

pub(crate) fn supply(s: &Setup, account: &Address, market: &Address, amount: u128) -> u128 {
    fund(&s.env, market, account, amount);
    s.comptroller.mint(account, market, &amount)
}

/// Alice: 200 collateral entered, 150 borrowed. Bob provides the debt liquidity.
fn borrowed_setup<'a>() -> (Setup<'a>, Address) {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    supply(&s, &bob, &s.debt, 1_000 * UNIT);
    supply(&s, &alice, &s.collateral, 200 * UNIT);
    s.comptroller.enter_markets(&alice, &vec![&s.env, s.collateral.clone()]);
    s.comptroller.borrow(&alice, &s.debt, &(150 * UNIT));
    (s, alice)
}

#[test]
fn initialize_once() {
    let s = setup();
    assert_eq!(
        s.comptroller.try_initialize(&s.admin, &s.admin),
        Err(Ok(Error::AlreadyInitialized))
    );
    let config = s.comptroller.get_config();
    assert_eq!(config.close_factor, DEFAULT_CLOSE_FACTOR);
    assert_eq!(config.liquidation_incentive, DEFAULT_LIQUIDATION_INCENTIVE);
    assert_eq!(
        s.comptroller.get_all_markets(),
        vec![&s.env, s.collateral.clone(), s.debt.clone()]
    );
    assert_eq!(
        s.comptroller.try_support_market(&s.debt, &EXP_SCALE),
        Err(Ok(Error::InvalidInput))
    );
}

#[test]
fn mint_and_redeem_move_cash_and_shares() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let shares = supply(&s, &alice, &s.collateral, 50 * UNIT);
    assert_eq!(shares, 50 * UNIT);

    let m = s.comptroller.get_market(&s.collateral);
    assert_eq!(m.cash, 50 * UNIT);
    assert_eq!(m.total_supply, 50 * UNIT);

    assert_eq!(s.comptroller.redeem(&alice, &s.collateral, &(20 * UNIT)), 20 * UNIT);
    assert_eq!(
        s.comptroller.redeem_underlying(&alice, &s.collateral, &(10 * UNIT)),
        10 * UNIT
    );
    assert_eq!(s.comptroller.get_position(&alice, &s.collateral).supply_shares, 20 * UNIT);
    assert_eq!(
        token::Client::new(&s.env, &s.collateral).balance(&alice),
        (30 * UNIT) as i128
    );
    assert_eq!(
        s.comptroller.try_redeem(&alice, &s.collateral, &(21 * UNIT)),
        Err(Ok(Error::InsufficientBalance))
    );
    assert_eq!(
        s.comptroller.try_mint(&alice, &s.collateral, &0),
        Err(Ok(Error::InvalidInput))
    );
}

#[test]
fn borrow_limited_by_collateral() {
    let (s, alice) = borrowed_setup();

    // 200 * 0.8 = 160 of capacity, 150 used
    let (liquidity, shortfall) = s.comptroller.get_account_liquidity(&alice);
    assert_eq!(liquidity, 10 * EXP_SCALE);
    assert_eq!(shortfall, 0);
    assert_eq!(
        s.comptroller.get_assets_in(&alice),
        vec![&s.env, s.collateral.clone(), s.debt.clone()]
    );

    assert_eq!(
        s.comptroller.try_borrow(&alice, &s.debt, &(11 * UNIT)),
        Err(Ok(Error::InsufficientLiquidity))
    );
    assert_eq!(
        s.comptroller.try_redeem(&alice, &s.collateral, &(13 * UNIT)),
        Err(Ok(Error::InsufficientLiquidity))
    );
    assert_eq!(
        s.comptroller.try_redeem_allowed(&s.collateral, &alice, &(13 * UNIT)),
        Err(Ok(Error::InsufficientLiquidity))
    );
    s.comptroller.redeem_allowed(&s.collateral, &alice, &(12 * UNIT));

    let (liquidity, shortfall) =
        s.comptroller
            .get_hypothetical_liquidity(&alice, &s.debt, &0, &(20 * UNIT));
    assert_eq!((liquidity, shortfall), (0, 10 * EXP_SCALE));
}

#[test]
fn borrow_without_price_fails() {
    let (s, alice) = borrowed_setup();
    s.oracle.set_price(&s.debt, &0);
    assert_eq!(
        s.comptroller.try_borrow(&alice, &s.debt, &UNIT),
        Err(Ok(Error::StalePrice))
    );
}

#[test]
fn stale_feed_blocks_borrowing() {
    let (s, alice) = borrowed_setup();
    let updater = Address::generate(&s.env);
    let oracle_id = s.env.register(price_oracle::PriceOracle, ());
    let oracle = price_oracle::PriceOracleClient::new(&s.env, &oracle_id);
    oracle.initialize(&s.admin, &vec![&s.env, updater.clone()]);
    oracle.set_underlying_decimals(
        &vec![&s.env, s.collateral.clone(), s.debt.clone()],
        &vec![&s.env, 7, 7],
    );
    for market in [&s.collateral, &s.debt] {
        // $1 with 8 decimals
        oracle.update_main_feed_data(&updater, market, &100_000_000, &START);
    }
    s.comptroller.set_oracle(&oracle_id);
    assert_eq!(
        s.comptroller.get_account_liquidity(&alice),
        (10 * EXP_SCALE, 0)
    );

    s.env
        .ledger()
        .set_timestamp(START + price_oracle::DEFAULT_VALID_PERIOD + 1);
    assert_eq!(
        s.comptroller.try_borrow(&alice, &s.debt, &UNIT),
        Err(Ok(Error::StalePrice))
    );
    assert_eq!(
        s.comptroller.try_get_account_liquidity(&alice),
        Err(Ok(Error::StalePrice))
    );
}

#[test]
fn liquidation_after_price_drop() {
    let (s, alice) = borrowed_setup();
    let carol = Address::generate(&s.env);
    fund(&s.env, &s.debt, &carol, 100 * UNIT);
    s.comptroller.set_seize_share(&s.collateral, &(EXP_SCALE / 10));

    assert_eq!(
        s.comptroller
            .try_liquidate_borrow(&carol, &alice, &s.debt, &(50 * UNIT), &s.collateral),
        Err(Ok(Error::NotLiquidatable))
    );

    s.oracle.set_price(&s.collateral, &(PRICE_ONE / 2));
    let (liquidity, shortfall) = s.comptroller.get_account_liquidity(&alice);
    assert_eq!(liquidity, 0);
    assert_eq!(shortfall, 70 * EXP_SCALE);

    // close factor 0.5 of 150 owed
    assert_eq!(
        s.comptroller
            .try_liquidate_borrow(&carol, &alice, &s.debt, &(76 * UNIT), &s.collateral),
        Err(Ok(Error::NotLiquidatable))
    );
    assert_eq!(
        s.comptroller
            .try_liquidate_borrow(&alice, &alice, &s.debt, &(50 * UNIT), &s.collateral),
        Err(Ok(Error::InvalidInput))
    );
    s.comptroller.liquidate_borrow_allowed(
        &s.debt,
        &s.collateral,
        &carol,
        &alice,
        &(75 * UNIT),
    );

    // 50 repaid at $1, 8% bonus, collateral share worth $0.5
    assert_eq!(
        s.comptroller
            .liquidate_calculate_seize_tokens(&s.debt, &s.collateral, &(50 * UNIT)),
        108 * UNIT
    );
    let seized =
        s.comptroller
            .liquidate_borrow(&carol, &alice, &s.debt, &(50 * UNIT), &s.collateral);
    assert_eq!(seized, 108 * UNIT);

    let protocol = 108 * UNIT / 10;
    assert_eq!(
        s.comptroller.get_position(&alice, &s.collateral).supply_shares,
        92 * UNIT
    );
    assert_eq!(
        s.comptroller.get_position(&carol, &s.collateral).supply_shares,
        108 * UNIT - protocol
    );
    let m = s.comptroller.get_market(&s.collateral);
    assert_eq!(m.total_reserves, protocol);
    assert_eq!(m.total_supply, 200 * UNIT - protocol);
    assert_eq!(s.comptroller.exchange_rate_stored(&s.collateral), EXP_SCALE);

    assert_eq!(
        s.comptroller.borrow_balance_stored(&alice, &s.debt),
        100 * UNIT
    );
    assert_eq!(
        token::Client::new(&s.env, &s.debt).balance(&carol),
        (50 * UNIT) as i128
    );
}

#[test]
fn seize_pause_blocks_liquidation() {
    let (s, alice) = borrowed_setup();
    let carol = Address::generate(&s.env);
    fund(&s.env, &s.debt, &carol, 100 * UNIT);
    s.oracle.set_price(&s.collateral, &(PRICE_ONE / 2));
    s.comptroller.set_seize_paused(&s.admin, &true);
    assert_eq!(
        s.comptroller
            .try_liquidate_borrow(&carol, &alice, &s.debt, &(50 * UNIT), &s.collateral),
        Err(Ok(Error::MarketPaused))
    );
}

#[test]
fn repay_borrow_full_and_over() {
    let (s, alice) = borrowed_setup();
    fund(&s.env, &s.debt, &alice, 10 * UNIT);
    assert_eq!(
        s.comptroller
            .try_repay_borrow(&alice, &alice, &s.debt, &(151 * UNIT)),
        Err(Ok(Error::InvalidInput))
    );
    assert_eq!(
        s.comptroller.repay_borrow(&alice, &alice, &s.debt, &(50 * UNIT)),
        50 * UNIT
    );
    assert_eq!(
        s.comptroller.repay_borrow(&alice, &alice, &s.debt, &u128::MAX),
        100 * UNIT
    );
    assert_eq!(s.comptroller.borrow_balance_stored(&alice, &s.debt), 0);
    assert_eq!(s.comptroller.get_market(&s.debt).total_borrows, 0);
    assert_eq!(s.comptroller.get_market(&s.debt).cash, 1_000 * UNIT);
}

#[test]
fn exit_market_rules() {
    let (s, alice) = borrowed_setup();
    assert_eq!(
        s.comptroller.try_exit_market(&alice, &s.debt),
        Err(Ok(Error::NonZeroBorrowBalance))
    );
    assert_eq!(
        s.comptroller.try_exit_market(&alice, &s.collateral),
        Err(Ok(Error::InsufficientLiquidity))
    );

    fund(&s.env, &s.debt, &alice, 150 * UNIT);
    s.comptroller.repay_borrow(&alice, &alice, &s.debt, &u128::MAX);
    s.comptroller.exit_market(&alice, &s.debt);
    s.comptroller.exit_market(&alice, &s.collateral);
    // not entered anymore
    s.comptroller.exit_market(&alice, &s.collateral);
    assert_eq!(s.comptroller.get_assets_in(&alice).len(), 0);
    assert!(!s.comptroller.check_membership(&alice, &s.collateral));

    // outside the collateral set shares move freely
    s.comptroller.redeem(&alice, &s.collateral, &(200 * UNIT));
}

#[test]
fn enter_markets_limits() {
    let s = setup();
    let alice = Address::generate(&s.env);
    s.comptroller.set_max_assets(&1);
    assert_eq!(
        s.comptroller
            .try_enter_markets(&alice, &vec![&s.env, s.collateral.clone(), s.debt.clone()]),
        Err(Ok(Error::TooManyAssets))
    );
    assert_eq!(
        s.comptroller
            .try_enter_markets(&alice, &vec![&s.env, Address::generate(&s.env)]),
        Err(Ok(Error::UnknownMarket))
    );
}

#[test]
fn pause_guardian_pauses_but_cannot_unpause() {
    let s = setup();
    let guardian = Address::generate(&s.env);
    let alice = Address::generate(&s.env);
    s.comptroller.set_pause_guardian(&guardian);

    s.comptroller.set_mint_paused(&guardian, &s.collateral, &true);
    fund(&s.env, &s.collateral, &alice, UNIT);
    assert_eq!(
        s.comptroller.try_mint(&alice, &s.collateral, &UNIT),
        Err(Ok(Error::MarketPaused))
    );
    assert_eq!(
        s.comptroller.try_mint_allowed(&s.collateral, &alice, &UNIT),
        Err(Ok(Error::MarketPaused))
    );
    assert_eq!(
        s.comptroller
            .try_set_mint_paused(&guardian, &s.collateral, &false),
        Err(Ok(Error::PermissionDenied))
    );
    assert_eq!(
        s.comptroller
            .try_set_borrow_paused(&alice, &s.collateral, &true),
        Err(Ok(Error::PermissionDenied))
    );
    s.comptroller.set_mint_paused(&s.admin, &s.collateral, &false);
    s.comptroller.mint(&alice, &s.collateral, &UNIT);

    s.comptroller.set_transfer_paused(&guardian, &true);
    assert_eq!(
        s.comptroller
            .try_transfer(&alice, &Address::generate(&s.env), &s.collateral, &UNIT),
        Err(Ok(Error::MarketPaused))
    );
}

#[test]
fn borrow_caps() {
    let (s, alice) = borrowed_setup();
    let cap_guardian = Address::generate(&s.env);
    s.comptroller.set_borrow_cap_guardian(&cap_guardian);
    s.comptroller.set_market_borrow_caps(
        &cap_guardian,
        &vec![&s.env, s.debt.clone()],
        &vec![&s.env, 155 * UNIT],
    );
    assert_eq!(
        s.comptroller.try_borrow(&alice, &s.debt, &(6 * UNIT)),
        Err(Ok(Error::BorrowCapReached))
    );
    s.comptroller.borrow(&alice, &s.debt, &(5 * UNIT));

    assert_eq!(
        s.comptroller.try_set_market_borrow_caps(
            &alice,
            &vec![&s.env, s.debt.clone()],
            &vec![&s.env, 0],
        ),
        Err(Ok(Error::PermissionDenied))
    );
    assert_eq!(
        s.comptroller.try_set_market_borrow_caps(
            &s.admin,
            &vec![&s.env, s.debt.clone()],
            &vec![&s.env],
        ),
        Err(Ok(Error::InvalidInput))
    );
}

#[test]
fn risk_parameter_bounds() {
    let s = setup();
    assert_eq!(
        s.comptroller.try_set_close_factor(&EXP_SCALE),
        Err(Ok(Error::InvalidInput))
    );
    assert_eq!(
        s.comptroller.try_set_liquidation_incentive(&(EXP_SCALE - 1)),
        Err(Ok(Error::InvalidInput))
    );
    assert_eq!(
        s.comptroller
            .try_set_collateral_factor(&s.collateral, &(95 * EXP_SCALE / 100)),
        Err(Ok(Error::InvalidInput))
    );
    assert_eq!(
        s.comptroller
            .try_set_collateral_factor(&Address::generate(&s.env), &0),
        Err(Ok(Error::UnknownMarket))
    );
    s.comptroller.set_close_factor(&(EXP_SCALE / 4));
    assert_eq!(s.comptroller.get_config().close_factor, EXP_SCALE / 4);
}

#[test]
fn interest_accrues_to_borrows_and_reserves() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let bob = Address::generate(&s.env);
    let model_id = s.env.register(MockRateModel, ());
    MockRateModelClient::new(&s.env, &model_id).set_rate(&100_000_000_000);
    s.comptroller.set_interest_rate_model(&s.debt, &model_id);
    s.comptroller.set_reserve_factor(&s.debt, &(EXP_SCALE / 10));

    supply(&s, &bob, &s.debt, 1_000 * UNIT);
    supply(&s, &alice, &s.collateral, 200 * UNIT);
    s.comptroller.enter_markets(&alice, &vec![&s.env, s.collateral.clone()]);
    s.comptroller.borrow(&alice, &s.debt, &(100 * UNIT));

    s.env.ledger().set_timestamp(START + 10_000);
    s.comptroller.accrue_interest(&s.debt);

    // rate 1e-7 per second over 10_000 seconds grows debt by 0.1%
    let m = s.comptroller.get_market(&s.debt);
    assert_eq!(m.borrow_index, EXP_SCALE + EXP_SCALE / 1_000);
    assert_eq!(m.total_borrows, 1_001_000_000);
    assert_eq!(m.total_reserves, 100_000);
    assert_eq!(
        s.comptroller.borrow_balance_stored(&alice, &s.debt),
        1_001_000_000
    );
    assert_eq!(
        s.comptroller.exchange_rate_stored(&s.debt),
        1_000_090_000_000_000_000
    );

    // redeeming the whole position pays out the accrued interest share
    fund(&s.env, &s.debt, &alice, 2 * UNIT);
    s.comptroller.repay_borrow(&alice, &alice, &s.debt, &u128::MAX);
    assert_eq!(
        s.comptroller.balance_of_underlying(&bob, &s.debt),
        10_000_900_000
    );
}

#[test]
fn reduce_reserves_pays_admin_target() {
    let s = setup();
    let alice = Address::generate(&s.env);
    let treasury = Address::generate(&s.env);
    let model_id = s.env.register(MockRateModel, ());
    MockRateModelClient::new(&s.env, &model_id).set_rate(&100_000_000_000);
    s.comptroller.set_interest_rate_model(&s.debt, &model_id);
    s.comptroller.set_reserve_factor(&s.debt, &(EXP_SCALE / 10));
    supply(&s, &alice, &s.collateral, 200 * UNIT);
    supply(&s, &alice, &s.debt, 200 * UNIT);
    s.comptroller.enter_markets(&alice, &vec![&s.env, s.collateral.clone()]);
    s.comptroller.borrow(&alice, &s.debt, &(100 * UNIT));
    s.env.ledger().set_timestamp(START + 10_000);

    assert_eq!(
        s.comptroller.try_reduce_reserves(&s.debt, &100_001, &treasury),
        Err(Ok(Error::InvalidInput))
    );
    s.comptroller.reduce_reserves(&s.debt, &100_000, &treasury);
    assert_eq!(s.comptroller.get_market(&s.debt).total_reserves, 0);
    assert_eq!(
        token::Client::new(&s.env, &s.debt).balance(&treasury),
        100_000
    );
}

#[test]
fn transfer_moves_shares_with_liquidity_check() {
    let (s, alice) = borrowed_setup();
    let dave = Address::generate(&s.env);
    assert_eq!(
        s.comptroller
            .try_transfer(&alice, &dave, &s.collateral, &(13 * UNIT)),
        Err(Ok(Error::InsufficientLiquidity))
    );
    s.comptroller.transfer(&alice, &dave, &s.collateral, &(12 * UNIT));
    assert_eq!(
        s.comptroller.get_position(&dave, &s.collateral).supply_shares,
        12 * UNIT
    );
    assert_eq!(
        s.comptroller.try_transfer(&dave, &dave, &s.collateral, &UNIT),
        Err(Ok(Error::InvalidInput))
    );
}

struct RewardSetup<'a> {
    s: Setup<'a>,
    alice: Address,
    locked_reward: Address,
    direct_reward: Address,
}

const CLAIM_START: u64 = 1_000_000;

/// Alice alone supplies the collateral market and earns 100_000 on each
/// track over 100 seconds, after which emission stops.
fn reward_setup<'a>() -> RewardSetup<'a> {
    let s = setup();
    let alice = Address::generate(&s.env);
    supply(&s, &alice, &s.collateral, 200 * UNIT);

    let locked_reward = new_token(&s.env, &s.admin);
    let direct_reward = new_token(&s.env, &s.admin);
    s.comptroller.set_reward_tokens(&locked_reward, &direct_reward);
    s.comptroller.set_reward_claim_start(&CLAIM_START);

    let markets = vec![&s.env, s.collateral.clone()];
    let sides = vec![&s.env, true];
    for track in [TRACK_LOCKED, TRACK_DIRECT] {
        s.comptroller
            .set_reward_speeds(&track, &markets, &vec![&s.env, 1_000], &sides);
    }
    s.env.ledger().set_timestamp(START + 100);
    for track in [TRACK_LOCKED, TRACK_DIRECT] {
        s.comptroller
            .set_reward_speeds(&track, &markets, &vec![&s.env, 0], &sides);
    }
    RewardSetup {
        s,
        alice,
        locked_reward,
        direct_reward,
    }
}

#[test]
fn rewards_stay_staged_before_claim_start() {
    let r = reward_setup();
    let s = &r.s;
    fund(&s.env, &r.direct_reward, &s.comptroller_id, 1_000_000);

    assert_eq!(s.comptroller.pending_reward(&TRACK_DIRECT, &r.alice), 100_000);
    assert_eq!(s.comptroller.claim_reward(&r.alice, &TRACK_DIRECT, &r.alice), 0);
    assert_eq!(s.comptroller.reward_accrued(&TRACK_DIRECT, &r.alice), 100_000);
    assert_eq!(
        token::Client::new(&s.env, &r.direct_reward).balance(&r.alice),
        0
    );
}

#[test]
fn direct_track_pays_in_full() {
    let r = reward_setup();
    let s = &r.s;
    s.env.ledger().set_timestamp(CLAIM_START + 22 * WEEK + 1);

    // unfunded: the amount stays staged
    assert_eq!(s.comptroller.claim_reward(&r.alice, &TRACK_DIRECT, &r.alice), 0);
    assert_eq!(s.comptroller.reward_accrued(&TRACK_DIRECT, &r.alice), 100_000);

    fund(&s.env, &r.direct_reward, &s.comptroller_id, 1_000_000);
    assert_eq!(
        s.comptroller.claim_reward(&r.alice, &TRACK_DIRECT, &r.alice),
        100_000
    );
    assert_eq!(s.comptroller.reward_accrued(&TRACK_DIRECT, &r.alice), 0);
    assert_eq!(
        token::Client::new(&s.env, &r.direct_reward).balance(&r.alice),
        100_000
    );
}

#[test]
fn locked_track_splits_through_token_lock() {
    let r = reward_setup();
    let s = &r.s;
    let lock_id = s.env.register(token_lock::TokenLock, ());
    let lock = token_lock::TokenLockClient::new(&s.env, &lock_id);
    lock.initialize(&s.admin, &r.locked_reward, &s.comptroller_id);
    s.comptroller.set_token_lock(&lock_id);
    fund(&s.env, &r.locked_reward, &s.comptroller_id, 1_000_000);

    // week 22 locks 95% - 22 * 2% = 51%
    s.env.ledger().set_timestamp(CLAIM_START + 22 * WEEK + 1);
    assert_eq!(
        s.comptroller.claim_reward(&r.alice, &TRACK_LOCKED, &r.alice),
        100_000
    );
    let reward = token::Client::new(&s.env, &r.locked_reward);
    assert_eq!(reward.balance(&r.alice), 49_000);
    assert_eq!(reward.balance(&lock_id), 51_000);
    assert_eq!(lock.locked_amount(&r.alice), 51_000);
    assert_eq!(lock.reward_claim_start(), CLAIM_START);
}

#[test]
fn locked_track_can_mint_locked_token() {
    let r = reward_setup();
    let s = &r.s;
    let pulp_id = s.env.register(locked_token::LockedToken, ());
    let pulp = locked_token::LockedTokenClient::new(&s.env, &pulp_id);
    pulp.initialize(
        &s.admin,
        &r.locked_reward,
        &s.comptroller_id,
        &String::from_str(&s.env, "Locked Reward"),
        &String::from_str(&s.env, "PULP"),
    );
    s.comptroller.set_token_lock(&pulp_id);
    fund(&s.env, &r.locked_reward, &s.comptroller_id, 1_000_000);

    s.env.ledger().set_timestamp(CLAIM_START + 22 * WEEK + 1);
    s.comptroller.claim_reward(&r.alice, &TRACK_LOCKED, &r.alice);
    assert_eq!(pulp.balance(&r.alice), 51_000);
    assert_eq!(pulp.total_supply(), 51_000);
    assert_eq!(
        token::Client::new(&s.env, &r.locked_reward).balance(&r.alice),
        49_000
    );
}

#[test]
fn only_whitelisted_delegates_claim_for_others() {
    let r = reward_setup();
    let s = &r.s;
    let bob = Address::generate(&s.env);
    fund(&s.env, &r.direct_reward, &s.comptroller_id, 1_000_000);
    s.env.ledger().set_timestamp(CLAIM_START);

    assert_eq!(
        s.comptroller.try_claim_reward(&bob, &TRACK_DIRECT, &r.alice),
        Err(Ok(Error::UnauthorizedClaim))
    );
    s.comptroller.set_whitelisted(&bob, &true);
    assert!(s.comptroller.is_whitelisted(&bob));
    assert_eq!(
        s.comptroller.claim_reward(&bob, &TRACK_DIRECT, &r.alice),
        100_000
    );
    // delegates claim on behalf, the holder receives
    assert_eq!(
        token::Client::new(&s.env, &r.direct_reward).balance(&r.alice),
        100_000
    );
    assert_eq!(
        token::Client::new(&s.env, &r.direct_reward).balance(&bob),
        0
    );

    s.comptroller.set_whitelisted(&bob, &false);
    assert_eq!(
        s.comptroller.try_claim_reward(&bob, &TRACK_DIRECT, &r.alice),
        Err(Ok(Error::UnauthorizedClaim))
    );
    assert_eq!(
        s.comptroller.try_claim_reward(&r.alice, &2, &r.alice),
        Err(Ok(Error::InvalidInput))
    );
}

#[test]
fn reward_balance_excludes_market_cash() {
    let s = setup();
    let alice = Address::generate(&s.env);
    // the reward token is also a listed market
    s.comptroller.set_reward_tokens(&s.debt, &s.debt);
    supply(&s, &alice, &s.collateral, 100 * UNIT);
    supply(&s, &alice, &s.debt, 100 * UNIT);
    s.comptroller.set_reward_speeds(
        &TRACK_DIRECT,
        &vec![&s.env, s.collateral.clone()],
        &vec![&s.env, 1_000],
        &vec![&s.env, true],
    );
    s.env.ledger().set_timestamp(START + 10);

    assert_eq!(s.comptroller.claim_reward(&alice, &TRACK_DIRECT, &alice), 0);
    assert_eq!(s.comptroller.reward_accrued(&TRACK_DIRECT, &alice), 10_000);
    assert_eq!(s.comptroller.get_market(&s.debt).cash, 100 * UNIT);

    fund(&s.env, &s.debt, &s.comptroller_id, 10_000);
    assert_eq!(
        s.comptroller.claim_reward(&alice, &TRACK_DIRECT, &alice),
        10_000
    );
}
