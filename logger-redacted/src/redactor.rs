use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use sha2::{Digest, Sha256};

#[allow(clippy::expect_used)]
mod patterns {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex =
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
        pub static ref PHONE_REGEX: Regex = Regex::new(
            r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"
        )
        .expect("phone pattern");
        pub static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern");
        pub static ref CREDIT_CARD_REGEX: Regex =
            Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b").expect("card pattern");
        pub static ref IP_REGEX: Regex =
            Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("ip pattern");
    }
}

use patterns::{CREDIT_CARD_REGEX, EMAIL_REGEX, IP_REGEX, PHONE_REGEX, SSN_REGEX};

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_credit_cards: bool,
    pub redact_ip_addresses: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_credit_cards: true,
            redact_ip_addresses: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for log messages
#[derive(Debug)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Cards and SSNs first: the phone pattern would otherwise eat their digits.
        if self.config.redact_credit_cards {
            result = self.replace(&CREDIT_CARD_REGEX, &result, "CC", |_| {
                "****-****-****-****".to_string()
            });
        }

        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", |_| "***-**-****".to_string());
        }

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", mask_email);
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", |_| "(***) ***-****".to_string());
        }

        if self.config.redact_ip_addresses {
            result = self.replace(&IP_REGEX, &result, "IP", mask_ip);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }

    fn replace(&self, regex: &Regex, text: &str, tag: &str, mask: impl Fn(&str) -> String) -> String {
        regex
            .replace_all(text, |caps: &regex::Captures| {
                let value = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{tag}[{}]", hash_value(value))
                } else {
                    mask(value)
                }
            })
            .into_owned()
    }
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let l = local.chars().next().unwrap_or('*');
            let d = domain.chars().next().unwrap_or('*');
            format!("{l}***@{d}***")
        }
        None => "***@***".to_string(),
    }
}

fn mask_ip(ip: &str) -> String {
    let parts: Vec<&str> = ip.split('.').collect();
    match (parts.first(), parts.last()) {
        (Some(first), Some(last)) if parts.len() == 4 => format!("{first}.***.***.{last}"),
        _ => "***.***.***.***".to_string(),
    }
}

// First 8 bytes keep the tag short while staying collision-resistant for log correlation.
fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    general_purpose::STANDARD.encode(digest.get(..8).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking().redact("User john.doe@example.com logged in");
        assert!(redacted.contains("j***@e***"));
        assert!(!redacted.contains("john.doe"));
    }

    #[test]
    fn test_phone_redaction() {
        let redacted = masking().redact("Call me at (555) 123-4567");
        assert!(redacted.contains("(***) ***-****"));
        assert!(!redacted.contains("4567"));
    }

    #[test]
    fn test_ssn_is_not_mistaken_for_phone() {
        let redacted = masking().redact("ssn 123-45-6789");
        assert_eq!(redacted, "ssn ***-**-****");
    }

    #[test]
    fn test_hashes_are_stable_for_correlation() {
        let redactor = PiiRedactor::new(RedactionConfig::default());
        let a = redactor.redact("jane@example.com");
        let b = redactor.redact("jane@example.com");
        let c = redactor.redact("john@example.com");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("EMAIL["));
    }

    #[test]
    fn test_ip_masking_keeps_outer_octets() {
        assert_eq!(masking().redact("from 10.1.2.3"), "from 10.***.***.3");
    }

    #[test]
    fn test_custom_patterns_apply_last() {
        let redactor = PiiRedactor::new(RedactionConfig {
            custom_patterns: vec![(Regex::new(r"LIC-\d+").unwrap(), "LIC-[REDACTED]".to_string())],
            ..Default::default()
        });
        assert_eq!(redactor.redact("license LIC-99812"), "license LIC-[REDACTED]");
    }
}
