// ==========================================
// Request validation
// ==========================================
// Checks applied to path and body parameters before any database
// work. A failed check surfaces as a 422 carrying a {loc, msg} pair
// naming the offending parameter.
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

use crate::api::error::{ApiError, ApiResult};

static PART_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static SEARCH_QUERY_RE: OnceLock<Regex> = OnceLock::new();
static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static PASSWORD_RE: OnceLock<Regex> = OnceLock::new();

/// Validate a part-number path parameter and normalize it to uppercase
///
/// Lowercase input is accepted here and normalized, unlike the import
/// pipeline which demands uppercase in the source file.
pub fn part_number(raw: &str) -> ApiResult<String> {
    let re = PART_NUMBER_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]{10}$").unwrap());
    if !re.is_match(raw) {
        return Err(ApiError::field(
            "part_number",
            "Enter a valid Bosch part number",
        ));
    }
    Ok(raw.to_uppercase())
}

/// Validate a search query and rewrite `?` wildcards for the store
///
/// The query is trimmed and uppercased, must be exactly 10 characters
/// after that, and may replace up to 4 characters with `?`. Accepted
/// queries come back with `?` turned into the store's single-character
/// wildcard `_`.
pub fn search_query(raw: &str) -> ApiResult<String> {
    let normalized = raw.trim().to_uppercase();
    if normalized.chars().count() != 10 {
        return Err(ApiError::field(
            "search_query",
            "Search query must be exactly 10 characters long",
        ));
    }
    let re = SEARCH_QUERY_RE.get_or_init(|| {
        Regex::new(r"^([A-Z0-9]*\??[A-Z0-9]*){0,4}$").unwrap()
    });
    if !re.is_match(&normalized) {
        return Err(ApiError::field(
            "search_query",
            "Use only letters and digits. You can replace missing character by ? up to 4 times.",
        ));
    }
    Ok(normalized.replace('?', "_"))
}

/// Validate a username from a request body or path
pub fn username(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim();
    let re = USERNAME_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]{3,25}$").unwrap());
    if !re.is_match(trimmed) {
        return Err(ApiError::field(
            "username",
            "Username must be 3 to 25 letters or digits",
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a new user's plaintext password before hashing
pub fn password(raw: &str) -> ApiResult<()> {
    let re = PASSWORD_RE.get_or_init(|| Regex::new(r"^\S{8,}$").unwrap());
    if !re.is_match(raw) {
        return Err(ApiError::field(
            "password",
            "Password must be at least 8 characters with no whitespace",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::FieldError;

    fn single_loc(err: ApiError) -> String {
        match err {
            ApiError::Validation(errors) => {
                let [FieldError { loc, .. }] = errors.as_slice() else {
                    panic!("expected exactly one field error");
                };
                loc.clone()
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_part_number_accepts_and_uppercases() {
        assert_eq!(part_number("f00hn37002").unwrap(), "F00HN37002");
        assert_eq!(part_number("F00HN37002").unwrap(), "F00HN37002");
    }

    #[test]
    fn test_part_number_rejects_wrong_shape() {
        for bad in ["F00HN3700", "F00HN370022", "F00HN37-02", ""] {
            assert_eq!(single_loc(part_number(bad).unwrap_err()), "part_number");
        }
    }

    #[test]
    fn test_search_query_wildcards() {
        assert_eq!(search_query("F00VC175??").unwrap(), "F00VC175__");
        assert_eq!(search_query(" f00vc175?? ").unwrap(), "F00VC175__");
        assert_eq!(search_query("DONTEXISTS").unwrap(), "DONTEXISTS");
        assert_eq!(search_query("?0?V?1?5AB").unwrap(), "_0_V_1_5AB");
    }

    #[test]
    fn test_search_query_length_enforced_after_trim() {
        assert_eq!(single_loc(search_query("F00VC175?").unwrap_err()), "search_query");
        assert_eq!(
            single_loc(search_query("F00VC175???").unwrap_err()),
            "search_query"
        );
    }

    #[test]
    fn test_search_query_rejects_symbols_and_excess_wildcards() {
        // five wildcards
        assert!(search_query("?0?V?1?5A?").is_err());
        // dash is not a permitted character
        assert!(search_query("F00VC-75??").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(username("  petro  ").unwrap(), "petro");
        assert!(username("ab").is_err());
        assert!(username(&"a".repeat(26)).is_err());
        assert!(username("pet ro").is_err());
        assert!(username("petro!").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(password("longenough").is_ok());
        assert!(password("short").is_err());
        assert!(password("has space8").is_err());
    }
}
