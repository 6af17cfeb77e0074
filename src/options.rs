/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base retry delay in milliseconds (linear strategy).
    pub retry_delay_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_retries: 3,
            retry_delay_ms: 2_000,
        }
    }
}

impl ClientOptions {
    /// Overlays `PORTAL_API_TIMEOUT_MS`, `PORTAL_API_RETRIES` and
    /// `PORTAL_API_RETRY_DELAY_MS` onto these options.
    ///
    /// Unset or blank variables keep the current value.
    pub(crate) fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, String> {
        if let Some(value) = parse_var(&lookup, "PORTAL_API_TIMEOUT_MS")? {
            self.timeout_ms = value;
        }
        if let Some(value) = parse_var(&lookup, "PORTAL_API_RETRIES")? {
            self.max_retries = u32::try_from(value)
                .map_err(|_| format!("PORTAL_API_RETRIES is out of range: {value}"))?;
        }
        if let Some(value) = parse_var(&lookup, "PORTAL_API_RETRY_DELAY_MS")? {
            self.retry_delay_ms = value;
        }
        Ok(self)
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> std::result::Result<Option<u64>, String> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|err| format!("{name} must be a non-negative integer, got '{raw}': {err}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::ClientOptions;

    #[test]
    fn defaults_match_portal_policy() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout_ms, 60_000);
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.retry_delay_ms, 2_000);
    }

    #[test]
    fn env_overrides_only_set_values() {
        let opts = ClientOptions::default()
            .apply_env(|name| match name {
                "PORTAL_API_RETRIES" => Some("1".to_owned()),
                "PORTAL_API_TIMEOUT_MS" => Some("  ".to_owned()),
                _ => None,
            })
            .expect("valid env must parse");

        assert_eq!(opts.max_retries, 1);
        assert_eq!(opts.timeout_ms, 60_000);
        assert_eq!(opts.retry_delay_ms, 2_000);
    }

    #[test]
    fn env_rejects_garbage_numbers() {
        let err = ClientOptions::default()
            .apply_env(|name| (name == "PORTAL_API_RETRY_DELAY_MS").then(|| "soon".to_owned()))
            .expect_err("non-numeric delay must fail");
        assert!(err.contains("PORTAL_API_RETRY_DELAY_MS"));
    }
}
