use embassy_time::Duration;

/// Low time of `RST` pin to trigger module reset (reboot)
pub fn reset_time() -> Duration {
    Duration::from_millis(105)
}

/// Time to wait for module to boot after reset, until it answers `AT`
pub fn boot_time() -> Duration {
    Duration::from_secs(3)
}

/// Pause between two `AT` attempts while autosensing
pub fn autosense_interval() -> Duration {
    Duration::from_millis(100)
}

