use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use super::errors::{Result, StdError};

/// Unit appended to the GiB size of a database volume.
pub const SIZE_UNIT: &str = "Gi";

/// Quantities are compared in units of 10^-9, the smallest suffix the API server accepts.
const NANO_EXPONENT: i32 = 9;

pub fn gibibytes(size: i64) -> Quantity {
    Quantity(format!("{size}{SIZE_UNIT}"))
}

/// Splits a suffix into its binary and decimal exponents: `value * 2^bin * 10^dec`.
fn suffix_exponents(suffix: &str) -> Option<(u32, i32)> {
    let exponents = match suffix {
        "" => (0, 0),
        "Ki" => (10, 0),
        "Mi" => (20, 0),
        "Gi" => (30, 0),
        "Ti" => (40, 0),
        "Pi" => (50, 0),
        "Ei" => (60, 0),
        "n" => (0, -9),
        "u" => (0, -6),
        "m" => (0, -3),
        "k" => (0, 3),
        "M" => (0, 6),
        "G" => (0, 9),
        "T" => (0, 12),
        "P" => (0, 15),
        "E" => (0, 18),
        exp if exp.starts_with(['e', 'E']) => (0, exp[1..].parse().ok()?),
        _ => return None,
    };
    Some(exponents)
}

/// Value of a quantity in nano units, rounded up.
///
/// Accepts every quantity form: optional sign, decimal fraction, binary suffixes
/// (`Ki`..`Ei`), decimal suffixes (`n`..`E`) and exponents (`10e9`, `5E-3`).
fn to_nanos(quantity: &Quantity) -> Option<i128> {
    let raw = quantity.0.trim();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let split = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(split);
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let mut value: i128 = digits.parse().ok()?;
    let (binary, decimal) = suffix_exponents(suffix)?;
    value = value.checked_mul(1i128.checked_shl(binary)?)?;

    let scale = decimal
        .checked_add(NANO_EXPONENT)?
        .checked_sub(i32::try_from(fraction.len()).ok()?)?;
    value = if scale >= 0 {
        value.checked_mul(10i128.checked_pow(scale.unsigned_abs())?)?
    } else {
        match 10i128.checked_pow(scale.unsigned_abs()) {
            Some(divisor) => (value + divisor - 1) / divisor,
            // finer than any representable divisor: anything non-zero rounds up to one
            None => i128::from(value > 0),
        }
    };

    Some(if negative { -value } else { value })
}

/// Parses a storage quantity into bytes, rounding fractional bytes up.
pub fn to_bytes(quantity: &Quantity) -> Result<i128> {
    let nanos = to_nanos(quantity).ok_or_else(|| StdError::InvalidQuantity(quantity.0.clone()))?;
    let unit = 10i128.pow(NANO_EXPONENT.unsigned_abs());
    Ok(nanos.div_euclid(unit) + i128::from(nanos.rem_euclid(unit) != 0))
}

/// Compares two quantities by value, so `1Gi` and `1024Mi` are the same size.
pub fn same_size(a: &Quantity, b: &Quantity) -> Result<bool> {
    let nanos = |q: &Quantity| to_nanos(q).ok_or_else(|| StdError::InvalidQuantity(q.0.clone()));
    Ok(nanos(a)? == nanos(b)?)
}
