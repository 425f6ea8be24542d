use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimed {
    #[topic]
    pub account: Address,
    #[topic]
    pub comptroller: Address,
    pub locked_track: u128,
    pub direct_track: u128,
    pub pools: u32,
}
