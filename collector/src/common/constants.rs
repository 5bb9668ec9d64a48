// identity constants
pub const KEY_FIELD: &str = "_key";
pub const TS_FIELD: &str = "_ts";
pub const IDENTITY_FIELDS: [&str; 2] = [KEY_FIELD, TS_FIELD];

// wire parameter names
pub const PARAM_KEY: &str = "key";
pub const PARAM_PREFIX: &str = "prefix";
pub const PARAM_PREFIX_COUNT: &str = "prefixcount";
pub const PARAM_START_TS: &str = "startts";
pub const PARAM_END_TS: &str = "endts";
pub const PARAM_META: &str = "meta";

// query node priorities, lower is applied earlier
pub const PREFIX_PRIORITY: u8 = 0;
pub const TIME_RANGE_PRIORITY: u8 = 1;
pub const KEY_SELECT_PRIORITY: u8 = 2;

// endpoint constants
pub const DEFAULT_BASE_URI: &str = "https://storage.scrapinghub.com/collections/";
pub const APIKEY_ENV_VAR: &str = "SH_APIKEY";
