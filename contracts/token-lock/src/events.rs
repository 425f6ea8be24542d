use soroban_sdk::{contractevent, Address, Vec};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Locked {
    #[topic]
    pub account: Address,
    #[topic]
    pub depositor: Address,
    pub amount: u128,
    pub locked_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Claimed {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub locked_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PercentageLockUpdated {
    pub weeks: Vec<u32>,
    pub values: Vec<u32>,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnlockStartUpdated {
    #[topic]
    pub account: Address,
    pub unlock_begin: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositorUpdated {
    #[topic]
    pub depositor: Address,
    pub allowed: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminUpdated {
    #[topic]
    pub admin: Address,
}

#[contractevent(topics = ["reward_claim_start"])]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimStartUpdated {
    pub timestamp: u64,
}
