use soroban_sdk::{contracttype, Env};

/// Round answer shape of the backup aggregator.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub updated_at: u64,
}

#[soroban_sdk::contractclient(name = "AggregatorClient")]
pub trait Aggregator {
    fn decimals(e: Env) -> u32;
    fn latest_round_data(e: Env) -> RoundData;
}
