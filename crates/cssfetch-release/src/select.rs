use crate::types::{Asset, Release};

/// First asset whose name contains `pattern` (case-sensitive).
pub fn find_asset<'a>(release: &'a Release, pattern: &str) -> Option<&'a Asset> {
    release.assets.iter().find(|a| a.name.contains(pattern))
}
