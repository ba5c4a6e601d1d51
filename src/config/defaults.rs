//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "Cricket Hub".into()
    }

    pub fn headline() -> String {
        "Cricket Hub - Latest Articles and News".into()
    }

    pub fn description() -> String {
        "Your one-stop destination for the latest cricket news, articles, match analysis, \
         and player insights. Stay updated with Cricket Hub."
            .into()
    }

    pub fn summary() -> String {
        "Your one-stop destination for the latest cricket news, articles, match analysis, \
         and player insights."
            .into()
    }

    pub fn url() -> Option<String> {
        None
    }

    pub fn image() -> String {
        "https://picsum.photos/seed/crickethub/1200/630".into()
    }

    pub fn logo() -> String {
        "https://picsum.photos/seed/crickethub-logo/600/60".into()
    }

    pub fn email() -> String {
        "contact@crickethub.co.in".into()
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [store] Section Defaults
// ============================================================================

pub mod store {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "posts.json".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5280
    }
}

// ============================================================================
// [admin] Section Defaults
// ============================================================================

pub mod admin {
    pub fn sequence() -> String {
        "cricadmin".into()
    }

    pub fn window() -> usize {
        10
    }

    pub fn idle_reset_ms() -> u64 {
        2000
    }
}
