use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    PermissionDenied = 3,
    UnknownMarket = 4,
    NoPriceFeed = 6,
    StalePrice = 7,
    InvalidInput = 13,
    MathOverflow = 22,
}
