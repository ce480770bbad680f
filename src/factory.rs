//! Factory - domain registry over many builders
//!
//! Keeps one (Builder, document cache) pair per named domain. Document
//! requests check the domain's cost-bounded cache first and hand out
//! copies; raw-byte requests bypass it and go straight to the builder.

use crate::builder::{Builder, ScanStats};
use crate::cache::CostCache;
use crate::dom::Document;
use crate::error::Error;
use crate::path::TagPath;
use log::debug;
use std::collections::HashMap;

/// Default document cache capacity per domain, in source bytes.
const DEFAULT_CACHE_COST: usize = 5000;

/// One registered domain: its builder and its parsed-document cache.
struct Domain {
    builder: Builder,
    documents: CostCache<Document>,
}

impl Domain {
    fn new(data: Vec<u8>) -> Self {
        Domain {
            builder: Builder::with_data(data),
            documents: CostCache::new(DEFAULT_CACHE_COST),
        }
    }
}

/// Registry of independently cached XML buffers, keyed by domain name.
pub struct Factory {
    domains: HashMap<String, Domain>,
    last_error: Option<Error>,
}

impl Factory {
    /// Create an empty registry.
    pub fn new() -> Self {
        Factory {
            domains: HashMap::new(),
            last_error: None,
        }
    }

    /// Register a buffer under a domain name.
    ///
    /// An existing domain with the same name is replaced; its builder and
    /// cache are dropped.
    pub fn add_data(&mut self, domain: impl Into<String>, data: impl Into<Vec<u8>>) {
        let domain = domain.into();
        debug!("factory: adding domain {:?}", domain);
        self.domains.insert(domain, Domain::new(data.into()));
    }

    /// Remove a domain, dropping its builder and cache.
    ///
    /// Returns false (and records `DomainNotFound`) if the domain is not
    /// registered.
    pub fn remove_data(&mut self, domain: &str) -> bool {
        if self.domains.remove(domain).is_some() {
            debug!("factory: removed domain {:?}", domain);
            true
        } else {
            self.fail(domain);
            false
        }
    }

    /// Check if a domain is registered.
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Change a domain's document cache capacity (total source bytes).
    pub fn set_cache_size(&mut self, domain: &str, cost: usize) {
        match self.domains.get_mut(domain) {
            Some(entry) => entry.documents.set_max_cost(cost),
            None => {
                self.fail(domain);
            }
        }
    }

    /// Clear the document caches of all domains.
    pub fn clear_caches(&mut self) {
        for entry in self.domains.values_mut() {
            entry.documents.clear();
        }
    }

    /// Clear one domain's document cache.
    pub fn clear_cache(&mut self, domain: &str) {
        match self.domains.get_mut(domain) {
            Some(entry) => entry.documents.clear(),
            None => {
                self.fail(domain);
            }
        }
    }

    /// Resolve `path`/`index` in a domain and return the parsed document.
    ///
    /// A cache hit returns a copy of the cached document; a miss
    /// delegates to the domain's builder and caches the result with its
    /// source byte length as cost.
    pub fn build(&mut self, domain: &str, path: &str, index: u32) -> Result<Document, Error> {
        let Some(entry) = self.domains.get_mut(domain) else {
            return Err(self.fail(domain));
        };

        let Some(tag_path) = TagPath::parse(path) else {
            // Invalid path: let the builder record the failure
            return entry.builder.build(path, index);
        };
        let key = tag_path.cache_key(index);

        if let Some(document) = entry.documents.get(&key) {
            return Ok(document.clone());
        }

        let document = entry.builder.build(path, index)?;
        let cost = document.source_len();
        entry.documents.insert(key, document.clone(), cost);
        Ok(document)
    }

    /// Resolve `path`/`index` in a domain and return the raw bytes,
    /// bypassing the document cache.
    pub fn find(&mut self, domain: &str, path: &str, index: u32) -> Result<&[u8], Error> {
        // Checked lookup first: the borrow of the entry must not overlap
        // the error path's mutation of last_error
        if !self.domains.contains_key(domain) {
            return Err(self.fail(domain));
        }
        match self.domains.get_mut(domain) {
            Some(entry) => entry.builder.find(path, index),
            None => Err(Error::DomainNotFound(domain.to_string())),
        }
    }

    /// The registry-level error recorded by the most recent failed
    /// domain lookup.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// A domain's builder error, if the domain exists and its last
    /// operation failed.
    pub fn domain_error(&self, domain: &str) -> Option<&Error> {
        self.domains
            .get(domain)
            .and_then(|entry| entry.builder.last_error())
    }

    /// A domain's scanner counters.
    pub fn stats(&self, domain: &str) -> Option<ScanStats> {
        self.domains.get(domain).map(|entry| entry.builder.stats())
    }

    fn fail(&mut self, domain: &str) -> Error {
        let error = Error::DomainNotFound(domain.to_string());
        self.last_error = Some(error.clone());
        error
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
