use crate::error::QscreenError;
use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// An allowlist-capped HTTP client that only permits requests to approved
/// public chemistry databases.
#[derive(Debug, Clone)]
pub struct AllowlistClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl AllowlistClient {
    /// Creates a new client with the default allowlist of compound databases.
    pub fn new() -> Result<Self, QscreenError> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "pubchem.ncbi.nlm.nih.gov", // PubChem PUG REST
            "www.ebi.ac.uk",            // ChEMBL
            "localhost",
            "127.0.0.1",
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QscreenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, QscreenError> {
        if !self.is_allowed(url) {
            return Err(QscreenError::Security(format!(
                "Domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubchem_allowed() {
        let client = AllowlistClient::new().unwrap();
        assert!(client.is_allowed("https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound"));
        assert!(client.is_allowed("https://www.ebi.ac.uk/chembl/api/data/molecule"));
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let client = AllowlistClient::new().unwrap();
        assert!(!client.is_allowed("https://example.com/anything"));
        assert!(client.get("https://example.com/anything").is_err());
    }

    #[test]
    fn test_allow_domain_extends_list() {
        let mut client = AllowlistClient::new().unwrap();
        assert!(!client.is_allowed("https://files.rcsb.org/x"));
        client.allow_domain("files.rcsb.org");
        assert!(client.is_allowed("https://files.rcsb.org/x"));
    }
}
