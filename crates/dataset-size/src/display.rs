//! Human-readable rendering of a megabyte total.

/// Decimal units the display layer steps through.
///
/// Totals arrive in megabytes, so nothing smaller exists here; nothing
/// larger than terabytes gets a step either, so huge datasets just show a
/// large terabyte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl SizeUnit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Megabytes => "MB",
            Self::Gigabytes => "GB",
            Self::Terabytes => "TB",
        }
    }
}

const SIG_FIGURES: u32 = 5;

/// Formats a megabyte total as `"<value> <unit>"`, e.g. `"1.5000 GB"`.
///
/// The value carries [`SIG_FIGURES`] significant digits, always in fixed
/// notation.
pub fn format_size(megabytes: f64) -> String {
    let (value, unit) = scale(megabytes);
    format!("{} {}", significant(value, SIG_FIGURES), unit.suffix())
}

/// Steps a megabyte total up to the largest unit that keeps the value at or
/// under 1000.
///
/// The comparison is strict, so exactly 1000 MB stays `(1000.0, Megabytes)`
/// while anything above it becomes gigabytes.
pub fn scale(megabytes: f64) -> (f64, SizeUnit) {
    let mut value = megabytes;
    let mut unit = SizeUnit::Megabytes;

    if value > 1000.0 {
        value /= 1000.0;
        unit = SizeUnit::Gigabytes;
    }
    if value > 1000.0 {
        value /= 1000.0;
        unit = SizeUnit::Terabytes;
    }

    (value, unit)
}

/// Renders `value` with `figures` significant digits in fixed notation.
fn significant(value: f64, figures: u32) -> String {
    // `magnitude` below only terminates for positive, finite inputs;
    // anything outside that domain renders as plain zero
    if !(value > 0.0 && value.is_finite()) {
        return format!("{:.*}", figures as usize - 1, 0.0);
    }

    let decimals = decimals_for(value, figures);
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;

    // rounding can grow the integer part (999.999 at two decimals would print
    // as "1000.00", six digits), so re-derive the decimal count afterwards
    format!("{:.*}", decimals_for(rounded, figures) as usize, rounded)
}

/// How many decimal places keep `value` at `figures` significant digits.
///
/// Clamped at zero: values with more than `figures` integer digits keep them
/// all rather than switching to exponent notation.
fn decimals_for(value: f64, figures: u32) -> i32 {
    (figures as i32 - 1 - magnitude(value)).max(0)
}

/// Floor of `log10`, by repeated division; `f64::log10` can come out a hair
/// under an exact power of ten and shift the digit count. `value` must be
/// positive and finite.
fn magnitude(value: f64) -> i32 {
    let mut rest = value;
    let mut magnitude = 0;

    while rest >= 10.0 {
        rest /= 10.0;
        magnitude += 1;
    }
    while rest < 1.0 {
        rest *= 10.0;
        magnitude -= 1;
    }

    magnitude
}
