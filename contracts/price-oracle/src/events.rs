use soroban_sdk::{contractevent, Address};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MainFeedUpdated {
    #[topic]
    pub market: Address,
    #[topic]
    pub updater: Address,
    pub answer: i128,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackupFeedUpdated {
    #[topic]
    pub market: Address,
    pub feed: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnderlyingDecimalsUpdated {
    #[topic]
    pub market: Address,
    pub decimals: u32,
}

#[contractevent(topics = ["price_validity"])]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceValidityUpdated {
    pub valid_period: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdaterUpdated {
    #[topic]
    pub updater: Address,
    pub allowed: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminUpdated {
    #[topic]
    pub admin: Address,
}
