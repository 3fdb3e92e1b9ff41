//! CDN image relocation
//!
//! Images served from the institutional CDN are moved to durable storage during the
//! reverse conversion. The Markdown always points at the storage location, whether or
//! not the upload later runs, so the written files do not depend on the network.

use crate::settings::ImageSettings;
use std::collections::HashSet;
use url::Url;

/// An image that must be copied from `source_url` to `key` in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub source_url: String,
    pub key: String,
}

/// Whether `src` is served from `domain` or one of its subdomains.
pub fn is_cdn_url(src: &str, domain: &str) -> bool {
    let Ok(url) = Url::parse(src) else {
        return false;
    };
    match url.host_str() {
        Some(host) => host == domain || host.ends_with(&format!(".{domain}")),
        None => false,
    }
}

/// Storage key for a CDN image: the prefix plus the text after the last `@`.
///
/// URLs without an `@` use their last path segment instead.
pub fn storage_key(src: &str, prefix: &str) -> String {
    let tail = match src.rsplit_once('@') {
        Some((_, tail)) => tail.to_string(),
        None => Url::parse(src)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
            })
            .filter(|segment| !segment.is_empty())
            .unwrap_or_else(|| src.to_string()),
    };
    format!("{prefix}{tail}")
}

/// Rewrites CDN image sources and records the uploads they imply.
#[derive(Debug)]
pub struct ImageRewriter<'s> {
    settings: &'s ImageSettings,
    pending: Vec<PendingUpload>,
    seen: HashSet<String>,
}

impl<'s> ImageRewriter<'s> {
    pub fn new(settings: &'s ImageSettings) -> Self {
        ImageRewriter {
            settings,
            pending: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// New location for `src`, or `None` when the image is not on the CDN.
    pub fn rewrite(&mut self, src: &str) -> Option<String> {
        if !is_cdn_url(src, &self.settings.cdn_domain) {
            return None;
        }
        let key = storage_key(src, &self.settings.key_prefix);
        let target = format!("{}{key}", self.settings.storage_base_url);
        if self.seen.insert(key.clone()) {
            self.pending.push(PendingUpload {
                source_url: src.to_string(),
                key,
            });
        }
        Some(target)
    }

    /// Uploads in the order their images were first seen.
    pub fn into_pending(self) -> Vec<PendingUpload> {
        self.pending
    }
}
