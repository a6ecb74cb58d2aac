pub const TORCH_DELTA: f64 = 0.5;
pub const MIN_TORCH_RADIUS: f64 = 2.0;

pub const LAVA_DAMAGE: i32 = 1;
pub const DAMAGE_COUNTER_BUMP: u32 = 3;

pub const FRAME_MS: u64 = 100;
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

pub const FRAME_MS_ENV_VAR: &str = "TORCHLIT_FRAME_MS";

pub fn frame_ms_from_env() -> u64 {
    std::env::var(FRAME_MS_ENV_VAR)
        .ok()
        .and_then(|value| parse_frame_ms(&value))
        .unwrap_or(FRAME_MS)
}

pub fn parse_frame_ms(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
}
