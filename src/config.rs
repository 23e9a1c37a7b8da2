use crate::consts::INITIAL_PC;

/// Deviations from the reference machine that some programs depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    /// 8XY4 sets VF when `sum % 255 > 0` instead of on a real carry.
    pub legacy_carry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Where program images are loaded and where the instruction pointer
    /// starts after a reset.
    pub base_address: u16,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_address: INITIAL_PC,
            quirks: Quirks::default(),
        }
    }
}
