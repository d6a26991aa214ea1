use std::fmt;
use std::net::IpAddr;

use thiserror::Error;

use crate::http::{Error, Request};

pub const IPV4_ECHO_URL: &str = "https://api.ipify.org";
pub const IPV6_ECHO_URL: &str = "https://api64.ipify.org";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The echo service queried for this family. The IPv4 endpoint only ever
    /// answers over IPv4; the dual-stack one is used for IPv6 and its answer
    /// is family-checked afterwards.
    pub fn echo_url(self) -> &'static str {
        match self {
            IpVersion::V4 => IPV4_ECHO_URL,
            IpVersion::V6 => IPV6_ECHO_URL,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unable to query the WAN address over HTTP: {0}")]
    Http(Box<str>),

    #[error("the echo service did not return an IP literal: {0:?}")]
    Parse(Box<str>),

    #[error("expected an {expected} address, the echo service returned {got}")]
    FamilyMismatch { expected: IpVersion, got: IpAddr },
}

/// One blocking GET against the echo service, no retry. The transport's
/// default timeout applies.
pub fn resolve(version: IpVersion) -> Result<IpAddr, ResolveError> {
    let response = match Request::get(version.echo_url()).call() {
        Ok(r) => r,
        Err(Error::Status(code, response)) => Err(ResolveError::Http(
            (code.to_string() + " " + &response.into_string().unwrap_or_default()).into(),
        ))?,
        Err(Error::Transport(t)) => Err(ResolveError::Http(t))?,
    };

    let text = response
        .into_string()
        .map_err(|e| ResolveError::Http(e.to_string().into()))?;

    validate_echo_response(&text, version)
}

/// The returned text must be a syntactically valid IP literal of the
/// requested family; a family mismatch is fatal, never a silent fallback.
pub fn validate_echo_response(text: &str, version: IpVersion) -> Result<IpAddr, ResolveError> {
    let trimmed = text.trim();

    let addr = trimmed
        .parse::<IpAddr>()
        .map_err(|_| ResolveError::Parse(trimmed.into()))?;

    let family_matches = match version {
        IpVersion::V4 => addr.is_ipv4(),
        IpVersion::V6 => addr.is_ipv6(),
    };

    if !family_matches {
        return Err(ResolveError::FamilyMismatch {
            expected: version,
            got: addr,
        });
    }

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_v4_literal() {
        let addr = validate_echo_response("203.0.113.9", IpVersion::V4).unwrap();
        assert_eq!(addr.to_string(), "203.0.113.9");
    }

    #[test]
    fn accepts_a_v6_literal() {
        let addr = validate_echo_response("2001:db8::1", IpVersion::V6).unwrap();
        assert!(addr.is_ipv6());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(validate_echo_response("  203.0.113.9\n", IpVersion::V4).is_ok());
    }

    #[test]
    fn rejects_non_ip_text() {
        let err = validate_echo_response("<html>busy</html>", IpVersion::V4).unwrap_err();
        assert!(matches!(err, ResolveError::Parse(_)));
    }

    #[test]
    fn rejects_a_v4_answer_when_v6_was_requested() {
        let err = validate_echo_response("203.0.113.9", IpVersion::V6).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::FamilyMismatch {
                expected: IpVersion::V6,
                ..
            }
        ));
    }

    #[test]
    fn rejects_a_v6_answer_when_v4_was_requested() {
        let err = validate_echo_response("2001:db8::1", IpVersion::V4).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::FamilyMismatch {
                expected: IpVersion::V4,
                ..
            }
        ));
    }
}
