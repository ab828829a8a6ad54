// Turning operator-supplied strings into scan options

use std::collections::BTreeMap;

/// Parse cookies given as `name:value,name1:value1`.
pub fn parse_cookies(raw: &str) -> Result<BTreeMap<String, String>, String> {
    let mut cookies = BTreeMap::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = pair
            .split_once(':')
            .ok_or_else(|| format!("Malformed cookie '{}': expected name:value", pair))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Malformed cookie '{}': missing name", pair));
        }
        cookies.insert(name.to_string(), value.trim().to_string());
    }

    if cookies.is_empty() {
        return Err("No cookies given: expected name:value,name1:value1".to_string());
    }
    Ok(cookies)
}

/// Parse basic auth credentials given as `user:pass`. Only the first `:`
/// separates, so passwords may contain colons.
pub fn parse_basic_auth(raw: &str) -> Result<(String, String), String> {
    let (user, pass) = raw
        .split_once(':')
        .ok_or_else(|| "Malformed basic auth: expected user:pass".to_string())?;
    if user.is_empty() {
        return Err("Malformed basic auth: missing user".to_string());
    }
    Ok((user.to_string(), pass.to_string()))
}
