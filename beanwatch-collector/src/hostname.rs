//! Local host name lookup.

use sysinfo::System;

/// Name of the local host as reported by the operating system.
///
/// Falls back to `localhost` only when the system reports no name.
pub fn local_hostname() -> String {
    resolve(System::host_name())
}

fn resolve(reported: Option<String>) -> String {
    reported
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_system_name() {
        let name = local_hostname();
        assert!(!name.is_empty());
        if let Some(reported) = System::host_name().filter(|n| !n.trim().is_empty()) {
            assert_eq!(name, reported.trim());
        }
    }

    #[test]
    fn trims_and_falls_back() {
        assert_eq!(resolve(Some(" app01\n".into())), "app01");
        assert_eq!(resolve(Some("  ".into())), "localhost");
        assert_eq!(resolve(None), "localhost");
    }
}
