/// Ticks per second achieved over `elapsed_nanos`; zero for an empty window.
pub fn ticks_per_sec(processed_ticks: u64, elapsed_nanos: u128) -> u64 {
    if elapsed_nanos == 0 {
        return 0;
    }

    let scaled = u128::from(processed_ticks).saturating_mul(1_000_000_000);
    u64::try_from(scaled / elapsed_nanos).unwrap_or(u64::MAX)
}

pub fn meets_target_ticks_per_sec(achieved: u64, target: u64) -> bool {
    achieved >= target
}
