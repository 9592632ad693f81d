//! Helpers for constructing URLs that respect the deployment base path.
use removals_booking::MapsConfig;

/// Root-anchored URL for a static asset.
///
/// When `PUBLIC_URL` is set at compile time (e.g., `/book` when hosted under a
/// subdirectory), generated URLs are prefixed accordingly. Local builds
/// without `PUBLIC_URL` fall back to root-anchored paths.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    asset_path_with_base(relative, option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Base path for the router.
///
/// Returns `None` when no base path is configured so the router falls back to root.
#[must_use]
pub fn router_base() -> Option<String> {
    router_base_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Maps credential baked in at build time from `GOOGLE_MAPS_API_KEY`.
#[must_use]
pub fn maps_config() -> MapsConfig {
    MapsConfig::new(option_env!("GOOGLE_MAPS_API_KEY"))
}

fn asset_path_with_base(relative: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = relative.trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

fn router_base_with_base(base: &str) -> Option<String> {
    let base = base.trim_end_matches('/').trim();
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{asset_path, router_base};

    #[test]
    fn builds_root_prefixed_path_when_base_missing() {
        assert_eq!(asset_path("images/medium-van.jpg"), "/images/medium-van.jpg");
        assert_eq!(asset_path("/medium-van.jpg"), "/medium-van.jpg");
    }

    #[test]
    fn builds_paths_with_public_base() {
        assert_eq!(
            super::asset_path_with_base("/luton-van.jpg", "/book/"),
            "/book/luton-van.jpg"
        );
    }

    #[test]
    fn router_base_is_none_by_default() {
        assert_eq!(router_base(), None);
        assert_eq!(
            super::router_base_with_base("/book/"),
            Some(String::from("/book"))
        );
    }
}
