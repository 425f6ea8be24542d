use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol, Vec};

use crate::constants::*;
use crate::errors::Error;
use crate::events::*;
use crate::interfaces::TokenLockClient;
use crate::ledger;
use crate::liquidity::{self, Hypothetical, PriceSnapshot};
use crate::math::{self, mul_div, mul_div_up};
use crate::rewards::{self, Holder};
use crate::storage::{self, ComptrollerConfig, Market, Position, RewardState, Side};

#[contract]
pub struct Comptroller;

#[contractimpl]
impl Comptroller {
    pub fn initialize(env: Env, admin: Address, oracle: Address) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        storage::save_config(
            &env,
            &ComptrollerConfig {
                admin,
                oracle,
                close_factor: DEFAULT_CLOSE_FACTOR,
                liquidation_incentive: DEFAULT_LIQUIDATION_INCENTIVE,
                max_assets: DEFAULT_MAX_ASSETS,
                pause_guardian: None,
                borrow_cap_guardian: None,
                transfer_paused: false,
                seize_paused: false,
                token_lock: None,
                reward_claim_start: 0,
            },
        );
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<ComptrollerConfig, Error> {
        storage::load_config(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.admin = new_admin.clone();
        storage::save_config(&env, &config);
        AdminUpdated { admin: new_admin }.publish(&env);
        Ok(())
    }

    pub fn set_oracle(env: Env, oracle: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.oracle = oracle.clone();
        storage::save_config(&env, &config);
        OracleUpdated { oracle }.publish(&env);
        Ok(())
    }

    // Risk parameters

    pub fn set_close_factor(env: Env, close_factor: u128) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        if !(CLOSE_FACTOR_MIN..=CLOSE_FACTOR_MAX).contains(&close_factor) {
            return Err(Error::InvalidInput);
        }
        config.close_factor = close_factor;
        storage::save_config(&env, &config);
        CloseFactorUpdated {
            close_factor_mantissa: close_factor,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_liquidation_incentive(env: Env, incentive: u128) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        if incentive < EXP_SCALE {
            return Err(Error::InvalidInput);
        }
        config.liquidation_incentive = incentive;
        storage::save_config(&env, &config);
        LiquidationIncentiveUpdated {
            incentive_mantissa: incentive,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_max_assets(env: Env, max_assets: u32) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.max_assets = max_assets;
        storage::save_config(&env, &config);
        MaxAssetsUpdated { max_assets }.publish(&env);
        Ok(())
    }

    /// Lists the market lending `underlying`. The underlying address identifies the market.
    pub fn support_market(
        env: Env,
        underlying: Address,
        initial_exchange_rate: u128,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        if storage::is_listed(&env, &underlying) || initial_exchange_rate == 0 {
            return Err(Error::InvalidInput);
        }
        let now = env.ledger().timestamp();
        let m = Market {
            underlying: underlying.clone(),
            rate_model: None,
            collateral_factor: 0,
            reserve_factor: 0,
            seize_share: 0,
            initial_exchange_rate,
            total_supply: 0,
            total_borrows: 0,
            total_reserves: 0,
            cash: 0,
            borrow_index: EXP_SCALE,
            accrual_timestamp: now,
            borrow_cap: 0,
            mint_paused: false,
            borrow_paused: false,
        };
        storage::save_market(&env, &underlying, &m);
        storage::push_market(&env, &underlying);
        for track in 0..REWARD_TRACKS {
            for side in [Side::Supply, Side::Borrow] {
                storage::save_reward_state(
                    &env,
                    &storage::reward_key(track, &underlying, side),
                    &RewardState::new(now),
                );
            }
        }
        MarketListed {
            market: underlying,
            initial_exchange_rate,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_collateral_factor(env: Env, market: Address, factor: u128) -> Result<(), Error> {
        require_admin(&env)?;
        let mut m = storage::load_market(&env, &market)?;
        if factor > COLLATERAL_FACTOR_MAX {
            return Err(Error::InvalidInput);
        }
        m.collateral_factor = factor;
        storage::save_market(&env, &market, &m);
        CollateralFactorUpdated {
            market,
            cf_mantissa: factor,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_reserve_factor(env: Env, market: Address, factor: u128) -> Result<(), Error> {
        require_admin(&env)?;
        if factor > EXP_SCALE {
            return Err(Error::InvalidInput);
        }
        let mut m = ledger::accrue_interest(&env, &market)?;
        m.reserve_factor = factor;
        storage::save_market(&env, &market, &m);
        ReserveFactorUpdated {
            market,
            rf_mantissa: factor,
        }
        .publish(&env);
        Ok(())
    }

    /// Share of every seized collateral amount kept as reserves.
    pub fn set_seize_share(env: Env, market: Address, share: u128) -> Result<(), Error> {
        require_admin(&env)?;
        if share > EXP_SCALE {
            return Err(Error::InvalidInput);
        }
        let mut m = storage::load_market(&env, &market)?;
        m.seize_share = share;
        storage::save_market(&env, &market, &m);
        SeizeShareUpdated {
            market,
            share_mantissa: share,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_interest_rate_model(env: Env, market: Address, model: Address) -> Result<(), Error> {
        require_admin(&env)?;
        let mut m = ledger::accrue_interest(&env, &market)?;
        m.rate_model = Some(model.clone());
        storage::save_market(&env, &market, &m);
        RateModelUpdated { market, model }.publish(&env);
        Ok(())
    }

    pub fn reduce_reserves(env: Env, market: Address, amount: u128, to: Address) -> Result<(), Error> {
        require_admin(&env)?;
        let mut m = ledger::accrue_interest(&env, &market)?;
        if amount > m.total_reserves {
            return Err(Error::InvalidInput);
        }
        ledger::remove_cash(&mut m, amount)?;
        m.total_reserves -= amount;
        storage::save_market(&env, &market, &m);
        ledger::push_underlying(&env, &m, &to, amount)?;
        ReservesReduced {
            market,
            to,
            reduce_amount: amount,
            new_total_reserves: m.total_reserves,
        }
        .publish(&env);
        Ok(())
    }

    // Guardians and pauses

    pub fn set_pause_guardian(env: Env, guardian: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.pause_guardian = Some(guardian.clone());
        storage::save_config(&env, &config);
        PauseGuardianUpdated { guardian }.publish(&env);
        Ok(())
    }

    pub fn set_borrow_cap_guardian(env: Env, guardian: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.borrow_cap_guardian = Some(guardian.clone());
        storage::save_config(&env, &config);
        BorrowCapGuardianUpdated { guardian }.publish(&env);
        Ok(())
    }

    /// Zero means no cap. Callable by the admin or the borrow cap guardian.
    pub fn set_market_borrow_caps(
        env: Env,
        caller: Address,
        markets: Vec<Address>,
        caps: Vec<u128>,
    ) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        if caller != config.admin && config.borrow_cap_guardian.as_ref() != Some(&caller) {
            return Err(Error::PermissionDenied);
        }
        if markets.len() != caps.len() {
            return Err(Error::InvalidInput);
        }
        for (market, cap) in markets.iter().zip(caps.iter()) {
            let mut m = storage::load_market(&env, &market)?;
            m.borrow_cap = cap;
            storage::save_market(&env, &market, &m);
            BorrowCapUpdated { market, cap }.publish(&env);
        }
        Ok(())
    }

    pub fn set_mint_paused(env: Env, caller: Address, market: Address, paused: bool) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        require_pauser(&config, &caller, paused)?;
        let mut m = storage::load_market(&env, &market)?;
        m.mint_paused = paused;
        storage::save_market(&env, &market, &m);
        MarketPauseUpdated {
            market,
            action: symbol_short!("mint"),
            paused,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_borrow_paused(env: Env, caller: Address, market: Address, paused: bool) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        require_pauser(&config, &caller, paused)?;
        let mut m = storage::load_market(&env, &market)?;
        m.borrow_paused = paused;
        storage::save_market(&env, &market, &m);
        MarketPauseUpdated {
            market,
            action: symbol_short!("borrow"),
            paused,
        }
        .publish(&env);
        Ok(())
    }

    pub fn set_transfer_paused(env: Env, caller: Address, paused: bool) -> Result<(), Error> {
        let mut config = storage::load_config(&env)?;
        require_pauser(&config, &caller, paused)?;
        config.transfer_paused = paused;
        storage::save_config(&env, &config);
        publish_global_pause(&env, symbol_short!("transfer"), paused);
        Ok(())
    }

    pub fn set_seize_paused(env: Env, caller: Address, paused: bool) -> Result<(), Error> {
        let mut config = storage::load_config(&env)?;
        require_pauser(&config, &caller, paused)?;
        config.seize_paused = paused;
        storage::save_config(&env, &config);
        publish_global_pause(&env, symbol_short!("seize"), paused);
        Ok(())
    }

    // Membership

    pub fn enter_markets(env: Env, account: Address, markets: Vec<Address>) -> Result<(), Error> {
        account.require_auth();
        let config = storage::load_config(&env)?;
        for market in markets.iter() {
            enter(&env, &config, &account, &market)?;
        }
        Ok(())
    }

    /// Removes `market` from the account's collateral set. No-op when not entered.
    pub fn exit_market(env: Env, account: Address, market: Address) -> Result<(), Error> {
        account.require_auth();
        let config = storage::load_config(&env)?;
        let assets = storage::account_assets(&env, &account);
        let Some(slot) = assets.first_index_of(&market) else {
            return Ok(());
        };
        let m = storage::load_market(&env, &market)?;
        let position = storage::load_position(&env, &account, &market);
        if ledger::borrow_balance(&env, &m, &position)? > 0 {
            return Err(Error::NonZeroBorrowBalance);
        }
        check_redeem(&env, &config, &market, &account, position.supply_shares)?;
        let mut assets = assets;
        assets.remove(slot);
        storage::set_account_assets(&env, &account, &assets);
        MarketExited { account, market }.publish(&env);
        Ok(())
    }

    pub fn get_assets_in(env: Env, account: Address) -> Vec<Address> {
        storage::account_assets(&env, &account)
    }

    pub fn check_membership(env: Env, account: Address, market: Address) -> bool {
        storage::account_assets(&env, &account).contains(&market)
    }

    pub fn get_all_markets(env: Env) -> Vec<Address> {
        storage::all_markets(&env)
    }

    // Permission hooks. Each one validates and settles the rewards it affects.

    pub fn mint_allowed(env: Env, market: Address, minter: Address, amount: u128) -> Result<(), Error> {
        let m = storage::load_market(&env, &market)?;
        check_mint(&m, amount)?;
        let holders = [Holder::load(&env, &minter, &market)];
        rewards::settle_side(&env, &market, &m, Side::Supply, &holders)
    }

    pub fn redeem_allowed(env: Env, market: Address, redeemer: Address, shares: u128) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        let m = storage::load_market(&env, &market)?;
        check_redeem(&env, &config, &market, &redeemer, shares)?;
        let holders = [Holder::load(&env, &redeemer, &market)];
        rewards::settle_side(&env, &market, &m, Side::Supply, &holders)
    }

    /// Enters the market for the borrower when needed, hence the borrower's auth.
    pub fn borrow_allowed(env: Env, market: Address, borrower: Address, amount: u128) -> Result<(), Error> {
        borrower.require_auth();
        let config = storage::load_config(&env)?;
        let m = storage::load_market(&env, &market)?;
        check_borrow(&env, &config, &market, &m, &borrower, amount)?;
        let holders = [Holder::load(&env, &borrower, &market)];
        rewards::settle_side(&env, &market, &m, Side::Borrow, &holders)
    }

    pub fn repay_allowed(
        env: Env,
        market: Address,
        _payer: Address,
        borrower: Address,
        _amount: u128,
    ) -> Result<(), Error> {
        let m = storage::load_market(&env, &market)?;
        let holders = [Holder::load(&env, &borrower, &market)];
        rewards::settle_side(&env, &market, &m, Side::Borrow, &holders)
    }

    pub fn liquidate_borrow_allowed(
        env: Env,
        repay_market: Address,
        collateral_market: Address,
        liquidator: Address,
        borrower: Address,
        repay_amount: u128,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        let mut prices = PriceSnapshot::new(&env, &config);
        check_liquidate(
            &env,
            &config,
            &mut prices,
            &repay_market,
            &collateral_market,
            &liquidator,
            &borrower,
            repay_amount,
        )
    }

    pub fn seize_allowed(
        env: Env,
        collateral_market: Address,
        repay_market: Address,
        liquidator: Address,
        borrower: Address,
        _seize_tokens: u128,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        check_seize(&env, &config, &collateral_market, &repay_market)?;
        let m = storage::load_market(&env, &collateral_market)?;
        let holders = [
            Holder::load(&env, &borrower, &collateral_market),
            Holder::load(&env, &liquidator, &collateral_market),
        ];
        rewards::settle_side(&env, &collateral_market, &m, Side::Supply, &holders)
    }

    pub fn transfer_allowed(
        env: Env,
        market: Address,
        from: Address,
        to: Address,
        shares: u128,
    ) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        check_transfer(&env, &config, &market, &from, shares)?;
        let m = storage::load_market(&env, &market)?;
        let holders = [
            Holder::load(&env, &from, &market),
            Holder::load(&env, &to, &market),
        ];
        rewards::settle_side(&env, &market, &m, Side::Supply, &holders)
    }

    // Market ledger

    pub fn accrue_interest(env: Env, market: Address) -> Result<(), Error> {
        ledger::accrue_interest(&env, &market)?;
        Ok(())
    }

    /// Supplies `amount` of underlying and returns the shares minted.
    pub fn mint(env: Env, minter: Address, market: Address, amount: u128) -> Result<u128, Error> {
        minter.require_auth();
        let mut m = ledger::accrue_interest(&env, &market)?;
        check_mint(&m, amount)?;
        let rate = ledger::exchange_rate(&env, &m)?;
        let shares = mul_div(&env, amount, EXP_SCALE, rate)?;
        if shares == 0 {
            return Err(Error::InvalidInput);
        }
        ledger::pull_underlying(&env, &m, &minter, amount)?;
        let mut holders = [Holder::load(&env, &minter, &market)];
        rewards::settle_then_mutate(&env, &market, &mut m, Side::Supply, &mut holders, |m, h| {
            ledger::add_cash(m, amount)?;
            m.total_supply = math::add(m.total_supply, shares)?;
            h[0].position.supply_shares = math::add(h[0].position.supply_shares, shares)?;
            Ok(())
        })?;
        Mint {
            market,
            minter,
            mint_amount: amount,
            mint_tokens: shares,
        }
        .publish(&env);
        Ok(shares)
    }

    /// Burns `shares` and returns the underlying paid out.
    pub fn redeem(env: Env, redeemer: Address, market: Address, shares: u128) -> Result<u128, Error> {
        redeemer.require_auth();
        redeem_fresh(&env, &redeemer, &market, shares, 0)
    }

    /// Withdraws exactly `amount` of underlying, burning the shares it costs.
    pub fn redeem_underlying(
        env: Env,
        redeemer: Address,
        market: Address,
        amount: u128,
    ) -> Result<u128, Error> {
        redeemer.require_auth();
        redeem_fresh(&env, &redeemer, &market, 0, amount)
    }

    pub fn borrow(env: Env, borrower: Address, market: Address, amount: u128) -> Result<(), Error> {
        borrower.require_auth();
        let config = storage::load_config(&env)?;
        let mut m = ledger::accrue_interest(&env, &market)?;
        check_borrow(&env, &config, &market, &m, &borrower, amount)?;
        if m.cash < amount {
            return Err(Error::InsufficientCash);
        }
        let mut holders = [Holder::load(&env, &borrower, &market)];
        let owed = rewards::settle_then_mutate(
            &env,
            &market,
            &mut m,
            Side::Borrow,
            &mut holders,
            |m, h| {
                let owed = math::add(ledger::borrow_balance(&env, m, &h[0].position)?, amount)?;
                ledger::set_borrow(m, &mut h[0].position, owed);
                m.total_borrows = math::add(m.total_borrows, amount)?;
                ledger::remove_cash(m, amount)?;
                Ok(owed)
            },
        )?;
        ledger::push_underlying(&env, &m, &borrower, amount)?;
        Borrow {
            market,
            borrower,
            borrow_amount: amount,
            account_borrows: owed,
            total_borrows: m.total_borrows,
        }
        .publish(&env);
        Ok(())
    }

    /// Repays debt of `borrower` from `payer`. `u128::MAX` repays everything owed.
    pub fn repay_borrow(
        env: Env,
        payer: Address,
        borrower: Address,
        market: Address,
        amount: u128,
    ) -> Result<u128, Error> {
        payer.require_auth();
        ledger::accrue_interest(&env, &market)?;
        repay_fresh(&env, &market, &payer, &borrower, amount)
    }

    pub fn transfer(env: Env, from: Address, to: Address, market: Address, shares: u128) -> Result<(), Error> {
        from.require_auth();
        if from == to || shares == 0 {
            return Err(Error::InvalidInput);
        }
        let config = storage::load_config(&env)?;
        let mut m = storage::load_market(&env, &market)?;
        check_transfer(&env, &config, &market, &from, shares)?;
        let mut holders = [
            Holder::load(&env, &from, &market),
            Holder::load(&env, &to, &market),
        ];
        rewards::settle_then_mutate(&env, &market, &mut m, Side::Supply, &mut holders, |_, h| {
            h[0].position.supply_shares = h[0]
                .position
                .supply_shares
                .checked_sub(shares)
                .ok_or(Error::InsufficientBalance)?;
            h[1].position.supply_shares = math::add(h[1].position.supply_shares, shares)?;
            Ok(())
        })?;
        Transfer {
            market,
            from,
            to,
            shares,
        }
        .publish(&env);
        Ok(())
    }

    /// Repays part of an insolvent borrower's debt and seizes collateral shares
    /// at the liquidation incentive. Returns the shares seized.
    pub fn liquidate_borrow(
        env: Env,
        liquidator: Address,
        borrower: Address,
        repay_market: Address,
        repay_amount: u128,
        collateral_market: Address,
    ) -> Result<u128, Error> {
        liquidator.require_auth();
        let config = storage::load_config(&env)?;
        ledger::accrue_interest(&env, &repay_market)?;
        let collateral = ledger::accrue_interest(&env, &collateral_market)?;

        let mut prices = PriceSnapshot::new(&env, &config);
        check_liquidate(
            &env,
            &config,
            &mut prices,
            &repay_market,
            &collateral_market,
            &liquidator,
            &borrower,
            repay_amount,
        )?;
        let seize = liquidity::seize_tokens(
            &env,
            &config,
            &mut prices,
            &repay_market,
            &collateral_market,
            &collateral,
            repay_amount,
        )?;
        check_seize(&env, &config, &collateral_market, &repay_market)?;
        if storage::load_position(&env, &borrower, &collateral_market).supply_shares < seize {
            return Err(Error::NotLiquidatable);
        }

        repay_fresh(&env, &repay_market, &liquidator, &borrower, repay_amount)?;

        let mut cm = storage::load_market(&env, &collateral_market)?;
        let rate = ledger::exchange_rate(&env, &cm)?;
        let protocol = mul_div(&env, seize, cm.seize_share, EXP_SCALE)?;
        let mut holders = [
            Holder::load(&env, &borrower, &collateral_market),
            Holder::load(&env, &liquidator, &collateral_market),
        ];
        rewards::settle_then_mutate(
            &env,
            &collateral_market,
            &mut cm,
            Side::Supply,
            &mut holders,
            |m, h| {
                h[0].position.supply_shares = h[0]
                    .position
                    .supply_shares
                    .checked_sub(seize)
                    .ok_or(Error::NotLiquidatable)?;
                h[1].position.supply_shares =
                    math::add(h[1].position.supply_shares, seize - protocol)?;
                m.total_supply = math::sub(m.total_supply, protocol)?;
                m.total_reserves = math::add(m.total_reserves, mul_div(&env, rate, protocol, EXP_SCALE)?)?;
                Ok(())
            },
        )?;

        LiquidateBorrow {
            liquidator,
            borrower,
            repay_market,
            collateral_market,
            repay_amount,
            seize_tokens: seize,
            protocol_seize_tokens: protocol,
        }
        .publish(&env);
        Ok(seize)
    }

    // Queries

    pub fn get_market(env: Env, market: Address) -> Result<Market, Error> {
        storage::load_market(&env, &market)
    }

    pub fn get_position(env: Env, account: Address, market: Address) -> Position {
        storage::load_position(&env, &account, &market)
    }

    pub fn exchange_rate_stored(env: Env, market: Address) -> Result<u128, Error> {
        let m = storage::load_market(&env, &market)?;
        ledger::exchange_rate(&env, &m)
    }

    pub fn borrow_balance_stored(env: Env, account: Address, market: Address) -> Result<u128, Error> {
        let m = storage::load_market(&env, &market)?;
        ledger::borrow_balance(&env, &m, &storage::load_position(&env, &account, &market))
    }

    /// Underlying value of the account's shares at the stored exchange rate.
    pub fn balance_of_underlying(env: Env, account: Address, market: Address) -> Result<u128, Error> {
        let m = storage::load_market(&env, &market)?;
        let shares = storage::load_position(&env, &account, &market).supply_shares;
        mul_div(&env, shares, ledger::exchange_rate(&env, &m)?, EXP_SCALE)
    }

    /// `(liquidity, shortfall)` in USD with 18 decimals.
    pub fn get_account_liquidity(env: Env, account: Address) -> Result<(u128, u128), Error> {
        let config = storage::load_config(&env)?;
        let mut prices = PriceSnapshot::new(&env, &config);
        liquidity::account_liquidity(&env, &account, &mut prices, None)
    }

    pub fn get_hypothetical_liquidity(
        env: Env,
        account: Address,
        market: Address,
        redeem_shares: u128,
        borrow_amount: u128,
    ) -> Result<(u128, u128), Error> {
        let config = storage::load_config(&env)?;
        let mut prices = PriceSnapshot::new(&env, &config);
        liquidity::account_liquidity(
            &env,
            &account,
            &mut prices,
            Some(Hypothetical {
                market: &market,
                redeem_shares,
                borrow_amount,
            }),
        )
    }

    pub fn liquidate_calculate_seize_tokens(
        env: Env,
        repay_market: Address,
        collateral_market: Address,
        repay_amount: u128,
    ) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        storage::load_market(&env, &repay_market)?;
        let collateral = storage::load_market(&env, &collateral_market)?;
        let mut prices = PriceSnapshot::new(&env, &config);
        liquidity::seize_tokens(
            &env,
            &config,
            &mut prices,
            &repay_market,
            &collateral_market,
            &collateral,
            repay_amount,
        )
    }

    // Rewards

    /// Sets per-second speeds. Entry `i` applies `speeds[i]` to the supply side
    /// of `markets[i]` when `is_supply[i]`, else to its borrow side.
    pub fn set_reward_speeds(
        env: Env,
        track: u32,
        markets: Vec<Address>,
        speeds: Vec<u128>,
        is_supply: Vec<bool>,
    ) -> Result<(), Error> {
        require_admin(&env)?;
        check_track(track)?;
        if markets.len() != speeds.len() || markets.len() != is_supply.len() {
            return Err(Error::InvalidInput);
        }
        for i in 0..markets.len() {
            let (market, speed, supply) = match (markets.get(i), speeds.get(i), is_supply.get(i)) {
                (Some(market), Some(speed), Some(supply)) => (market, speed, supply),
                _ => return Err(Error::InvalidInput),
            };
            let m = storage::load_market(&env, &market)?;
            let side = if supply { Side::Supply } else { Side::Borrow };
            // grow at the old speed up to now before switching
            let mut state = rewards::update_index(&env, &market, &m, side, track)?;
            state.speed = speed;
            storage::save_reward_state(&env, &storage::reward_key(track, &market, side), &state);
            RewardSpeedUpdated {
                market,
                track,
                side,
                speed,
            }
            .publish(&env);
        }
        Ok(())
    }

    pub fn get_reward_state(
        env: Env,
        track: u32,
        market: Address,
        is_supply: bool,
    ) -> Option<RewardState> {
        let side = if is_supply { Side::Supply } else { Side::Borrow };
        storage::reward_state(&env, &storage::reward_key(track, &market, side))
    }

    pub fn set_reward_tokens(env: Env, token0: Address, token1: Address) -> Result<(), Error> {
        require_admin(&env)?;
        for (track, token) in [(TRACK_LOCKED, token0), (TRACK_DIRECT, token1)] {
            storage::set_reward_token(&env, track, &token);
            RewardTokenUpdated { token, track }.publish(&env);
        }
        Ok(())
    }

    pub fn get_reward_token(env: Env, track: u32) -> Option<Address> {
        storage::reward_token(&env, track)
    }

    pub fn set_token_lock(env: Env, token_lock: Address) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.token_lock = Some(token_lock.clone());
        storage::save_config(&env, &config);
        TokenLockClient::new(&env, &token_lock).set_reward_claim_start(&config.reward_claim_start);
        TokenLockUpdated { token_lock }.publish(&env);
        Ok(())
    }

    pub fn set_reward_claim_start(env: Env, timestamp: u64) -> Result<(), Error> {
        let mut config = require_admin(&env)?;
        config.reward_claim_start = timestamp;
        storage::save_config(&env, &config);
        if let Some(lock) = &config.token_lock {
            TokenLockClient::new(&env, lock).set_reward_claim_start(&timestamp);
        }
        RewardClaimStartUpdated { timestamp }.publish(&env);
        Ok(())
    }

    pub fn get_reward_claim_start(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.reward_claim_start)
    }

    pub fn set_whitelisted(env: Env, delegate: Address, allowed: bool) -> Result<(), Error> {
        require_admin(&env)?;
        storage::set_whitelisted(&env, &delegate, allowed);
        WhitelistUpdated { delegate, allowed }.publish(&env);
        Ok(())
    }

    pub fn is_whitelisted(env: Env, delegate: Address) -> bool {
        storage::is_whitelisted(&env, &delegate)
    }

    /// Staged, not yet paid reward of `account` on `track`.
    pub fn reward_accrued(env: Env, track: u32, account: Address) -> u128 {
        storage::reward_accrued(&env, track, &account)
    }

    /// Staged reward plus what settling every market right now would add.
    pub fn pending_reward(env: Env, track: u32, account: Address) -> Result<u128, Error> {
        check_track(track)?;
        rewards::pending(&env, &account, track)
    }

    /// Settles `holder` in every market and pays out the staged `track` reward.
    pub fn claim_reward(env: Env, claimer: Address, track: u32, holder: Address) -> Result<u128, Error> {
        Self::claim_reward_in_markets(env.clone(), claimer, track, holder, storage::all_markets(&env))
    }

    pub fn claim_reward_in_markets(
        env: Env,
        claimer: Address,
        track: u32,
        holder: Address,
        markets: Vec<Address>,
    ) -> Result<u128, Error> {
        claimer.require_auth();
        let config = storage::load_config(&env)?;
        check_track(track)?;
        if claimer != holder && !storage::is_whitelisted(&env, &claimer) {
            return Err(Error::UnauthorizedClaim);
        }
        rewards::settle_markets(&env, &holder, &markets, track)?;
        rewards::grant(&env, &config, &holder, track)
    }
}

fn require_admin(env: &Env) -> Result<ComptrollerConfig, Error> {
    let config = storage::load_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

/// The admin sets either way; the pause guardian can only pause.
fn require_pauser(config: &ComptrollerConfig, caller: &Address, paused: bool) -> Result<(), Error> {
    caller.require_auth();
    if *caller == config.admin {
        return Ok(());
    }
    if paused && config.pause_guardian.as_ref() == Some(caller) {
        return Ok(());
    }
    Err(Error::PermissionDenied)
}

fn publish_global_pause(env: &Env, action: Symbol, paused: bool) {
    GlobalPauseUpdated { action, paused }.publish(env);
}

fn check_track(track: u32) -> Result<(), Error> {
    if track >= REWARD_TRACKS {
        return Err(Error::InvalidInput);
    }
    Ok(())
}

fn enter(env: &Env, config: &ComptrollerConfig, account: &Address, market: &Address) -> Result<(), Error> {
    if !storage::is_listed(env, market) {
        return Err(Error::UnknownMarket);
    }
    let mut assets = storage::account_assets(env, account);
    if assets.contains(market) {
        return Ok(());
    }
    if assets.len() >= config.max_assets {
        return Err(Error::TooManyAssets);
    }
    assets.push_back(market.clone());
    storage::set_account_assets(env, account, &assets);
    MarketEntered {
        account: account.clone(),
        market: market.clone(),
    }
    .publish(env);
    Ok(())
}

fn check_mint(m: &Market, amount: u128) -> Result<(), Error> {
    if m.mint_paused {
        return Err(Error::MarketPaused);
    }
    if amount == 0 {
        return Err(Error::InvalidInput);
    }
    Ok(())
}

/// Burning shares of an entered market must not open a shortfall.
fn check_redeem(
    env: &Env,
    config: &ComptrollerConfig,
    market: &Address,
    account: &Address,
    shares: u128,
) -> Result<(), Error> {
    storage::load_market(env, market)?;
    if shares == 0 || !storage::account_assets(env, account).contains(market) {
        return Ok(());
    }
    let mut prices = PriceSnapshot::new(env, config);
    let (_, shortfall) = liquidity::account_liquidity(
        env,
        account,
        &mut prices,
        Some(Hypothetical {
            market,
            redeem_shares: shares,
            borrow_amount: 0,
        }),
    )?;
    if shortfall > 0 {
        return Err(Error::InsufficientLiquidity);
    }
    Ok(())
}

fn check_borrow(
    env: &Env,
    config: &ComptrollerConfig,
    market: &Address,
    m: &Market,
    borrower: &Address,
    amount: u128,
) -> Result<(), Error> {
    if m.borrow_paused {
        return Err(Error::MarketPaused);
    }
    if amount == 0 {
        return Err(Error::InvalidInput);
    }
    enter(env, config, borrower, market)?;
    let mut prices = PriceSnapshot::new(env, config);
    prices.price(env, market)?;
    if m.borrow_cap > 0 && math::add(m.total_borrows, amount)? > m.borrow_cap {
        return Err(Error::BorrowCapReached);
    }
    let (_, shortfall) = liquidity::account_liquidity(
        env,
        borrower,
        &mut prices,
        Some(Hypothetical {
            market,
            redeem_shares: 0,
            borrow_amount: amount,
        }),
    )?;
    if shortfall > 0 {
        return Err(Error::InsufficientLiquidity);
    }
    Ok(())
}

fn check_transfer(
    env: &Env,
    config: &ComptrollerConfig,
    market: &Address,
    from: &Address,
    shares: u128,
) -> Result<(), Error> {
    if config.transfer_paused {
        return Err(Error::MarketPaused);
    }
    check_redeem(env, config, market, from, shares)
}

#[allow(clippy::too_many_arguments)]
fn check_liquidate(
    env: &Env,
    config: &ComptrollerConfig,
    prices: &mut PriceSnapshot,
    repay_market: &Address,
    collateral_market: &Address,
    liquidator: &Address,
    borrower: &Address,
    repay_amount: u128,
) -> Result<(), Error> {
    let m = storage::load_market(env, repay_market)?;
    storage::load_market(env, collateral_market)?;
    if liquidator == borrower || repay_amount == 0 {
        return Err(Error::InvalidInput);
    }
    let (_, shortfall) = liquidity::account_liquidity(env, borrower, prices, None)?;
    if shortfall == 0 {
        return Err(Error::NotLiquidatable);
    }
    let owed = ledger::borrow_balance(env, &m, &storage::load_position(env, borrower, repay_market))?;
    let max_close = mul_div(env, owed, config.close_factor, EXP_SCALE)?;
    if repay_amount > max_close {
        return Err(Error::NotLiquidatable);
    }
    Ok(())
}

fn check_seize(
    env: &Env,
    config: &ComptrollerConfig,
    collateral_market: &Address,
    repay_market: &Address,
) -> Result<(), Error> {
    if config.seize_paused {
        return Err(Error::MarketPaused);
    }
    if !storage::is_listed(env, collateral_market) || !storage::is_listed(env, repay_market) {
        return Err(Error::UnknownMarket);
    }
    Ok(())
}

/// Redeems either `shares_in` shares or `amount_in` underlying, whichever is non-zero.
fn redeem_fresh(
    env: &Env,
    redeemer: &Address,
    market: &Address,
    shares_in: u128,
    amount_in: u128,
) -> Result<u128, Error> {
    let config = storage::load_config(env)?;
    let mut m = ledger::accrue_interest(env, market)?;
    let rate = ledger::exchange_rate(env, &m)?;
    let (shares, amount) = if shares_in > 0 {
        (shares_in, mul_div(env, shares_in, rate, EXP_SCALE)?)
    } else {
        (mul_div_up(env, amount_in, EXP_SCALE, rate)?, amount_in)
    };
    if shares == 0 {
        return Err(Error::InvalidInput);
    }
    if storage::load_position(env, redeemer, market).supply_shares < shares {
        return Err(Error::InsufficientBalance);
    }
    check_redeem(env, &config, market, redeemer, shares)?;
    if m.cash < amount {
        return Err(Error::InsufficientCash);
    }
    let mut holders = [Holder::load(env, redeemer, market)];
    rewards::settle_then_mutate(env, market, &mut m, Side::Supply, &mut holders, |m, h| {
        h[0].position.supply_shares -= shares;
        m.total_supply = math::sub(m.total_supply, shares)?;
        ledger::remove_cash(m, amount)
    })?;
    ledger::push_underlying(env, &m, redeemer, amount)?;
    Redeem {
        market: market.clone(),
        redeemer: redeemer.clone(),
        redeem_amount: amount,
        redeem_tokens: shares,
    }
    .publish(env);
    Ok(amount)
}

/// Repays against an already accrued market. Returns the amount repaid.
fn repay_fresh(
    env: &Env,
    market: &Address,
    payer: &Address,
    borrower: &Address,
    amount: u128,
) -> Result<u128, Error> {
    let mut m = storage::load_market(env, market)?;
    let owed = ledger::borrow_balance(env, &m, &storage::load_position(env, borrower, market))?;
    let amount = if amount == u128::MAX { owed } else { amount };
    if amount == 0 || amount > owed {
        return Err(Error::InvalidInput);
    }
    ledger::pull_underlying(env, &m, payer, amount)?;
    let mut holders = [Holder::load(env, borrower, market)];
    let remaining = rewards::settle_then_mutate(env, market, &mut m, Side::Borrow, &mut holders, |m, h| {
        let remaining = owed - amount;
        ledger::set_borrow(m, &mut h[0].position, remaining);
        m.total_borrows = m.total_borrows.saturating_sub(amount);
        ledger::add_cash(m, amount)?;
        Ok(remaining)
    })?;
    RepayBorrow {
        market: market.clone(),
        payer: payer.clone(),
        borrower: borrower.clone(),
        repay_amount: amount,
        account_borrows: remaining,
        total_borrows: m.total_borrows,
    }
    .publish(env);
    Ok(amount)
}
