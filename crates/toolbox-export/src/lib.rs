//! toolbox-export: pure serializers for build-time artifacts (sans-IO)
//!
//! Turns the tool registry into a sitemap and a JSON route manifest.

pub mod manifest;
pub mod sitemap;

pub use manifest::{CategoryRoute, RouteManifest, to_route_manifest};
pub use sitemap::{ChangeFreq, SitemapEntry, SitemapError, entries_from_registry, to_sitemap};
