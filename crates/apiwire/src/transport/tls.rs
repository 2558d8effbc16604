//! Certificate trust policy applied to the HTTP client builder.

use reqwest::ClientBuilder;
use tracing::warn;

use crate::config::TlsTrust;

/// Apply a trust policy to a client builder.
///
/// With the rustls backend, disabling certificate verification also
/// disables hostname verification, so `TrustAll` covers both.
pub(crate) fn apply(builder: ClientBuilder, trust: TlsTrust) -> ClientBuilder {
    match trust {
        TlsTrust::Verified => builder,
        TlsTrust::TrustAll => {
            warn!("TLS certificate and hostname verification disabled");
            builder.danger_accept_invalid_certs(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_policies_build() {
        for trust in [TlsTrust::Verified, TlsTrust::TrustAll] {
            let client = apply(reqwest::Client::builder(), trust).build();
            assert!(client.is_ok(), "{trust:?} failed to build");
        }
    }
}
