//! Display helpers shared by widgets.

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with binary units and one decimal, e.g. `1.5 KiB`.
pub fn human_file_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0.0 B".to_string();
    }

    let exponent = (bytes.ln() / 1024f64.ln()).floor().max(0.0) as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes / 1024f64.powi(exponent as i32);

    format!("{:.1} {}", scaled, UNITS[exponent])
}
