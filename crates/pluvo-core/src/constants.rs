//! Protocol constants. All amounts are whole PLV; timestamps are Unix seconds.

/// Token name reported by the ledger.
pub const TOKEN_NAME: &str = "Pluvo";

/// Token ticker symbol.
pub const TOKEN_SYMBOL: &str = "PLV";

/// Number of decimal places. Balances are whole tokens.
pub const TOKEN_DECIMALS: u8 = 0;

/// Smallest accepted decay precision (decimal digits of the fixed-point scale).
pub const MIN_PRECISION: u32 = 3;

/// Largest number of fixed-point digits the decay engine uses.
///
/// Higher precisions are accepted and computed at this scale. `10^18`
/// squared is `10^36`, and a full `u64` amount times `10^18` is below
/// `2 × 10^37`; both fit a `u128` (max ~3.4 × 10^38).
pub const MAX_PRECISION: u32 = 18;

/// Rainfall index of the first, still in-progress rainfall of a fresh ledger.
pub const FIRST_RAINFALL_INDEX: u64 = 1;

/// Default emission sizing target.
pub const DEFAULT_MAX_SUPPLY: u64 = 100;

/// Default evaporation rate numerator (1/10 per period).
pub const DEFAULT_EVAPORATION_NUMERATOR: u64 = 1;

/// Default evaporation rate denominator.
pub const DEFAULT_EVAPORATION_DENOMINATOR: u64 = 10;

/// Default rainfall period.
pub const DEFAULT_SECONDS_BETWEEN_RAINFALLS: u64 = 30;

/// Default decay precision.
pub const DEFAULT_PRECISION: u32 = 9;

/// Length in bytes of a participant address.
pub const ADDRESS_LEN: usize = 20;
