use soroban_sdk::{contractevent, Address, Vec};

/// Underlying locked in and locked tokens minted 1:1.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockedIn {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub amount: u128,
}

/// Locked tokens burned for underlying.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redeemed {
    #[topic]
    pub account: Address,
    #[topic]
    pub to: Address,
    pub amount: u128,
    pub early: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EarlyRedeemsUpdated {
    #[topic]
    pub account: Address,
    pub allowance: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalLockUpdated {
    pub weeks: Vec<u32>,
    pub values: Vec<u32>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserLockUpdated {
    #[topic]
    pub account: Address,
    pub weeks: Vec<u32>,
    pub values: Vec<u32>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositorUpdated {
    #[topic]
    pub depositor: Address,
    pub allowed: bool,
}

#[contractevent(topics = ["reward_claim_start"])]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimStartUpdated {
    pub timestamp: u64,
}
