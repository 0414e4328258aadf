use chrono::NaiveDate;

use crate::{
    error::ValidationError,
    types::{Birthdate, Cpf},
};

const CPF_LENGTH: usize = 11;

/// Strip everything but digits from `raw` and check the result is a valid CPF.
pub fn validate_identity(raw: &str) -> Result<Cpf, ValidationError> {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_LENGTH {
        return Err(ValidationError::Length {
            found: digits.len(),
        });
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return Err(ValidationError::TrivialSequence);
    }

    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return Err(ValidationError::Checksum);
    }

    Ok(Cpf(digits.iter().map(|d| d.to_string()).collect()))
}

// Weights run from len + 1 down to 2; a remainder of 10 counts as 0.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder,
    }
}

/// Check that `raw` is a `DD/MM/YYYY` date naming a day that exists.
pub fn validate_date(raw: &str) -> Result<Birthdate, ValidationError> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(ValidationError::DateFormat);
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32, ValidationError> {
        raw[range].parse().map_err(|_| ValidationError::DateFormat)
    };
    let day = field(0..2)?;
    let month = field(3..5)?;
    let year = field(6..10)?;

    // 0000-0099 are not valid birth years.
    if year < 100 {
        return Err(ValidationError::Calendar);
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(ValidationError::Calendar)?;

    Ok(Birthdate(raw.to_string()))
}
