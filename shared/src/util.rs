use rand::Rng;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a product code from a source name.
///
/// Layout: `{PREFIX}-{6 low-order digits of now millis}{3-digit random}`
/// followed by `suffix` when given (`-D` for duplicates, `-{row}` for
/// imports). The prefix is the first three characters of `source`,
/// uppercased; `PRD` is used when the name has no usable characters.
///
/// Codes are not guaranteed unique. Callers insert under a unique
/// constraint and regenerate on conflict.
pub fn product_code(source: &str, suffix: Option<&str>) -> String {
    let prefix = code_prefix(source);
    let digits = now_millis().rem_euclid(1_000_000);
    let random: u16 = rand::thread_rng().gen_range(0..1000);
    let mut code = format!("{prefix}-{digits:06}{random:03}");
    if let Some(suffix) = suffix {
        code.push_str(suffix);
    }
    code
}

fn code_prefix(source: &str) -> String {
    let prefix: String = source
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect();
    if prefix.is_empty() {
        "PRD".to_string()
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_code_shape() {
        let code = product_code("Orologi", None);
        let (prefix, rest) = code.split_once('-').unwrap();
        assert_eq!(prefix, "ORO");
        assert_eq!(rest.len(), 9);
        assert!(rest.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_product_code_suffix() {
        let code = product_code("Rolex", Some("-D"));
        assert!(code.starts_with("ROL-"));
        assert!(code.ends_with("-D"));

        let code = product_code("Orologi", Some("-4"));
        assert!(code.ends_with("-4"));
    }

    #[test]
    fn test_product_code_short_or_symbolic_names() {
        assert!(product_code("ab", None).starts_with("AB-"));
        assert!(product_code("  ", None).starts_with("PRD-"));
        assert!(product_code("!!x", None).starts_with("X-"));
    }
}
