//! Minimal ARN helpers used for log context and the `accounts` listing.

/// Extract 12-digit account ID from ARN (field 5 in colon-delimited format)
pub fn extract_account_from_arn(arn: &str) -> Option<String> {
    let parts: Vec<&str> = arn.split(':').collect();
    if parts.len() >= 6 && parts[0] == "arn" {
        let account_id = parts[4];
        if account_id.len() == 12 && account_id.chars().all(|c| c.is_ascii_digit()) {
            return Some(account_id.to_string());
        }
    }
    None
}
