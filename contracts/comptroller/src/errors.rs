use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    PermissionDenied = 3,
    UnknownMarket = 4,
    MarketPaused = 5,
    NoPriceFeed = 6,
    StalePrice = 7,
    InsufficientLiquidity = 8,
    NotLiquidatable = 9,
    InvalidScheduleInput = 10,
    UnauthorizedClaim = 11,
    BadTimestamp = 12,
    InvalidInput = 13,
    InsufficientCash = 14,
    InsufficientBalance = 15,
    NonZeroBorrowBalance = 16,
    TooManyAssets = 17,
    BorrowCapReached = 18,
    ClaimNotStarted = 19,
    InsufficientEarlyRedeem = 20,
    Underfunded = 21,
    MathOverflow = 22,
}
