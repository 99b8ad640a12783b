use regex::Regex;

/// Derive the filename slug for a device from its manufacturer and model.
///
/// Mirrors the naming convention of the external asset repository, so
/// "Palo Alto" + "PA-850" becomes "palo-alto-pa-850". This must match the
/// repository's own slugs exactly; it is a hard external contract, not a
/// style choice. Total and deterministic for any input.
pub fn device_slug(manufacturer: &str, model: &str) -> String {
    let combined = format!("{} {}", manufacturer, model).to_lowercase();

    // Whitespace and underscore runs become single hyphens
    let slug = Regex::new(r"[\s_]+").unwrap().replace_all(&combined, "-");

    // Drop anything that isn't a lowercase letter, digit, or hyphen
    let slug = Regex::new(r"[^a-z0-9-]").unwrap().replace_all(&slug, "");

    // Collapse hyphen runs left behind by removed characters
    let slug = Regex::new(r"-+").unwrap().replace_all(&slug, "-");

    slug.trim_matches('-').to_string()
}
