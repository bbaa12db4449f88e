use crate::domain::CrmError;

/// Validates an amount in an explicit ISO-4217 currency. No conversion happens anywhere.
pub(crate) fn check_money(field: &str, amount: f64, currency: &str) -> Result<(), CrmError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CrmError::validation(format!(
            "{field} amount must be a non-negative number"
        )));
    }
    let valid_code = currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase());
    if !valid_code {
        return Err(CrmError::validation(format!(
            "'{currency}' is not an ISO-4217 currency code"
        )));
    }
    Ok(())
}
