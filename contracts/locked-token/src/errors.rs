use lock_schedule::ScheduleError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    PermissionDenied = 3,
    InvalidScheduleInput = 10,
    InvalidInput = 13,
    InsufficientBalance = 15,
    ClaimNotStarted = 19,
    InsufficientEarlyRedeem = 20,
    Underfunded = 21,
    MathOverflow = 22,
}

impl From<ScheduleError> for Error {
    fn from(_: ScheduleError) -> Self {
        Error::InvalidScheduleInput
    }
}
