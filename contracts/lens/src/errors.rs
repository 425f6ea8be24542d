use soroban_sdk::contracterror;

/// Codes 1-22 mirror the comptroller so its claim errors pass through unchanged.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 2,
    UnknownMarket = 4,
    UnauthorizedClaim = 11,
    InvalidInput = 13,
    MathOverflow = 22,
    /// The comptroller failed with a code outside the ones above.
    ClaimFailed = 23,
    /// The token lock failed with a code outside the ones above.
    VestingFailed = 24,
}
