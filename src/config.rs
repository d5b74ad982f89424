//! Environment variable helpers.
//!
//! Absent or malformed values fall back to the given default.

pub(crate) fn read_env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

pub(crate) fn read_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_bool(v: &str) -> Option<bool> {
    let v = v.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_missing_vars_use_default() {
        assert!(read_env_bool("LEAPSDK_TEST_UNSET_BOOL", true));
        assert_eq!(read_env_u8("LEAPSDK_TEST_UNSET_U8", 7), 7);
        assert_eq!(read_env_u32("LEAPSDK_TEST_UNSET_U32", 120), 120);
    }

    #[test]
    fn test_malformed_value_uses_default() {
        std::env::set_var("LEAPSDK_TEST_BAD_U8", "300");
        assert_eq!(read_env_u8("LEAPSDK_TEST_BAD_U8", 5), 5);
        std::env::set_var("LEAPSDK_TEST_GOOD_U32", " 90 ");
        assert_eq!(read_env_u32("LEAPSDK_TEST_GOOD_U32", 5), 90);
    }
}
