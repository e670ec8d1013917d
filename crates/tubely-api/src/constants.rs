/// Prefix of every JSON and upload route.
pub const API_PREFIX: &str = "/api";

/// Mount point of the public asset directory.
pub const ASSETS_ROUTE: &str = "/assets";
