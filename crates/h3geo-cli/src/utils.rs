use std::time::Duration;

/// Elapsed time as `H:MM:SS (hrs:min:secs)`, hours taken modulo 60.
pub fn time_diff(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let secs = total % 60;
    let mins = (total / 60) % 60;
    let hrs = (total / (60 * 60)) % 60;
    format!("{}:{:02}:{:02} (hrs:min:secs)", hrs, mins, secs)
}
