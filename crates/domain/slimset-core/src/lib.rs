pub mod pattern;
pub mod release;

pub use pattern::{stale_versions, NamePattern};
pub use release::{select_asset, AssetLink, Release, ReleaseAssets, SelectedAsset};

/// File extension of an APK Set container.
pub const APKS_EXTENSION: &str = ".apks";

/// Entry-name markers understood by the split selection policy.
pub mod markers {
    /// Delivery table-of-contents; never needed once the set is flattened.
    pub const TOC_MARKER: &str = "toc.pb";
    /// Namespace holding configuration splits.
    pub const SPLITS_PREFIX: &str = "splits/";
    /// Substring shared by every master split variant.
    pub const MASTER_MARKER: &str = "base-master";
    pub const DENSITY_MARKER: &str = "base-xxhdpi.apk";
    pub const ABI_MARKER: &str = "base-arm64_v8a.apk";
}
