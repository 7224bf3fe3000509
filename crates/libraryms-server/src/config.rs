//! Server configuration for `LibraryMS`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `LIBRARYMS_*` environment variables;
//! the email provider key keeps the provider's conventional `RESEND_API_KEY`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default provider endpoint.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Listener address when neither `LIBRARYMS_BIND_ADDR` nor `PORT` is set.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Email provider settings.
    pub mail: MailConfig,
    /// Reject contact categories the form does not offer.
    pub strict_categories: bool,
    /// Allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<String>,
    /// Values that could not be parsed and were replaced by defaults. Logged
    /// once the subscriber is up.
    pub warnings: Vec<String>,
}

/// Transactional email provider settings and fixed mail identities.
#[derive(Clone)]
pub struct MailConfig {
    /// Provider API key. Without one every send fails.
    pub api_key: Option<String>,
    /// Base URL of the provider API.
    pub api_url: String,
    /// Inbox receiving contact messages and subscription notices.
    pub operator_email: String,
    /// Sender identity for contact messages.
    pub contact_from: String,
    /// Sender identity for subscription notices.
    pub subscribe_from: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("mail", &self.mail)
            .field("strict_categories", &self.strict_categories)
            .field("cors_origin", &self.cors_origin)
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_url", &self.api_url)
            .field("operator_email", &self.operator_email)
            .field("contact_from", &self.contact_from)
            .field("subscribe_from", &self.subscribe_from)
            .finish()
    }
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v == "true" || v == "1")
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (PaaS convention, binds to `0.0.0.0`)
    /// - `LIBRARYMS_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `LIBRARYMS_LOG_LEVEL`: log filter (default: `info`)
    /// - `RESEND_API_KEY`: email provider API key (no default)
    /// - `RESEND_API_URL`: provider base URL (default: `https://api.resend.com`)
    /// - `LIBRARYMS_OPERATOR_EMAIL`: inbox for contact messages and subscription notices
    /// - `LIBRARYMS_CONTACT_FROM`: sender identity for contact messages
    /// - `LIBRARYMS_SUBSCRIBE_FROM`: sender identity for subscription notices
    /// - `LIBRARYMS_STRICT_CATEGORIES`: reject unknown contact categories (default: `false`)
    /// - `LIBRARYMS_CORS_ORIGIN`: allowed CORS origin (default: any)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        // Priority: LIBRARYMS_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = lookup("LIBRARYMS_BIND_ADDR") {
            addr.parse().unwrap_or_else(|e| {
                warnings.push(format!(
                    "invalid LIBRARYMS_BIND_ADDR '{addr}' ({e}), using {DEFAULT_BIND_ADDR}"
                ));
                DEFAULT_BIND_ADDR
            })
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or_else(|e| {
                warnings.push(format!("invalid PORT '{port_str}' ({e}), using 3000"));
                3000
            });
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            DEFAULT_BIND_ADDR
        };

        let log_level = lookup("LIBRARYMS_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let mail = MailConfig {
            api_key: lookup("RESEND_API_KEY").filter(|k| !k.is_empty()),
            api_url: lookup("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_owned()),
            operator_email: lookup("LIBRARYMS_OPERATOR_EMAIL")
                .unwrap_or_else(|| "spmorey87@gmail.com".to_owned()),
            contact_from: lookup("LIBRARYMS_CONTACT_FROM")
                .unwrap_or_else(|| "Online-Library From <onboarding@resend.dev>".to_owned()),
            subscribe_from: lookup("LIBRARYMS_SUBSCRIBE_FROM")
                .unwrap_or_else(|| "LibraryMS <no-reply@yourdomain.com>".to_owned()),
        };

        let strict_categories = flag(lookup("LIBRARYMS_STRICT_CATEGORIES"));

        let cors_origin = lookup("LIBRARYMS_CORS_ORIGIN").filter(|o| !o.is_empty() && o != "*");

        Self {
            bind_addr,
            log_level,
            mail,
            strict_categories,
            cors_origin,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.mail.api_key, None);
        assert_eq!(cfg.mail.api_url, DEFAULT_RESEND_API_URL);
        assert!(!cfg.strict_categories);
        assert_eq!(cfg.cors_origin, None);
    }

    #[test]
    fn bind_addr_beats_port() {
        let cfg = config(&[("PORT", "8080"), ("LIBRARYMS_BIND_ADDR", "127.0.0.1:9000")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));

        let cfg = config(&[("PORT", "8080")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn unparsable_addresses_fall_back_with_a_warning() {
        let cfg = config(&[("LIBRARYMS_BIND_ADDR", "not-an-addr")]);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("LIBRARYMS_BIND_ADDR"));

        let cfg = config(&[("PORT", "eighty")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert!(cfg.warnings[0].contains("PORT 'eighty'"));

        assert!(config(&[("PORT", "8080")]).warnings.is_empty());
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        assert_eq!(config(&[("RESEND_API_KEY", "")]).mail.api_key, None);
    }

    #[test]
    fn strict_categories_flag() {
        assert!(config(&[("LIBRARYMS_STRICT_CATEGORIES", "true")]).strict_categories);
        assert!(!config(&[("LIBRARYMS_STRICT_CATEGORIES", "yes please")]).strict_categories);
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = config(&[("RESEND_API_KEY", "re_secret")]);
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("re_secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
