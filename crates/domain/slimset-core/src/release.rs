use serde::{Deserialize, Serialize};

/// One entry of the releases API response, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: ReleaseAssets,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReleaseAssets {
    #[serde(default)]
    pub links: Vec<AssetLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetLink {
    pub name: String,
    pub url: String,
}

/// The asset a run will process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
    pub tag: String,
    pub filename: String,
    pub url: String,
}

impl AssetLink {
    pub fn qualifies(&self, prefix: &str, extension: &str) -> bool {
        self.name.starts_with(prefix) && self.name.ends_with(extension)
    }
}

/// Picks the first qualifying asset from the first release that has one.
///
/// `releases` must be ordered most recent first; releases without a
/// qualifying asset are skipped rather than ending the search.
pub fn select_asset(
    releases: &[Release],
    prefix: &str,
    extension: &str,
) -> Option<SelectedAsset> {
    releases.iter().find_map(|release| {
        release
            .assets
            .links
            .iter()
            .find(|link| link.qualifies(prefix, extension))
            .map(|link| SelectedAsset {
                tag: release.tag_name.clone(),
                filename: link.name.clone(),
                url: link.url.clone(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, names: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: ReleaseAssets {
                links: names
                    .iter()
                    .map(|n| AssetLink {
                        name: n.to_string(),
                        url: format!("https://dl.example/{tag}/{n}"),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn picks_first_matching_asset_of_latest_release() {
        let releases = vec![
            release("v2", &["notes.txt", "app-v2.apks", "app-v2-debug.apks"]),
            release("v1", &["app-v1.apks"]),
        ];
        let picked = select_asset(&releases, "app-", ".apks").unwrap();
        assert_eq!(picked.tag, "v2");
        assert_eq!(picked.filename, "app-v2.apks");
        assert_eq!(picked.url, "https://dl.example/v2/app-v2.apks");
    }

    #[test]
    fn skips_releases_without_qualifying_asset() {
        let releases = vec![
            release("v3", &["app-v3.apk", "other-v3.apks"]),
            release("v2", &["app-v2.apks"]),
        ];
        let picked = select_asset(&releases, "app-", ".apks").unwrap();
        assert_eq!(picked.tag, "v2");
    }

    #[test]
    fn no_releases_means_no_asset() {
        assert_eq!(select_asset(&[], "app-", ".apks"), None);
        let releases = vec![release("v1", &["readme.md"])];
        assert_eq!(select_asset(&releases, "app-", ".apks"), None);
    }
}
