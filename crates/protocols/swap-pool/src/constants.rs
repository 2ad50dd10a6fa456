//! Swap pool constants

/// Slippage tolerance presets offered to the user (basis points)
pub mod slippage {
    /// 0.5%
    pub const LOW_BPS: u16 = 50;
    /// 1%
    pub const MEDIUM_BPS: u16 = 100;
    /// 2%
    pub const HIGH_BPS: u16 = 200;
    /// 5%
    pub const MAX_PRESET_BPS: u16 = 500;

    pub const PRESETS_BPS: [u16; 4] = [LOW_BPS, MEDIUM_BPS, HIGH_BPS, MAX_PRESET_BPS];
}
