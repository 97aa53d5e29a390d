/// Parse a registration name such as `app/even`.
///
/// Names are `/`-separated registry keys, so they can't be empty, absolute,
/// or climb out with `..` segments.
pub fn parse_registry_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Registration name cannot be empty".to_string());
    }

    if s.starts_with('/') || s.contains('\\') {
        return Err(format!(
            "Registration names use '/' separators and are never absolute: '{s}'"
        ));
    }

    if s.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(format!(
            "Registration name has an empty, '.' or '..' segment: '{s}'"
        ));
    }

    Ok(s.to_string())
}

/// Parse an AMD module id.
pub fn parse_module_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Module name cannot be empty".to_string());
    }

    if s.contains(char::is_whitespace) {
        return Err(format!("Module name cannot contain whitespace: '{s}'"));
    }

    Ok(s.to_string())
}
