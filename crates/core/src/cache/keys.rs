/// Prefix of every weather cache key.
pub const WEATHER_KEY_PREFIX: &str = "weather_";

/// Replacement for characters that are unsafe in cache keys.
pub const KEY_PLACEHOLDER: char = '_';

/// Characters reserved by common key-value stores.
const RESERVED: &[char] = &['{', '}', '(', ')', '/', '\\', '@', ':'];

/// Normalizes an arbitrary string into a cache-safe key.
///
/// Trims surrounding whitespace, lower-cases, and replaces reserved
/// characters, inner whitespace and control characters with
/// [`KEY_PLACEHOLDER`]. Every input maps to exactly one key.
///
/// # Examples
///
/// ```
/// use ecogarden_core::cache::normalize_key;
///
/// assert_eq!(normalize_key("  Paris  "), "paris");
/// assert_eq!(normalize_key("Saint-Étienne"), "saint-étienne");
/// assert_eq!(normalize_key("a/b:c"), "a_b_c");
/// ```
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if RESERVED.contains(&c) || c.is_whitespace() || c.is_control() {
                KEY_PLACEHOLDER
            } else {
                c
            }
        })
        .collect()
}

/// Returns the cache key for a city's weather.
///
/// # Examples
///
/// ```
/// use ecogarden_core::cache::weather_key;
///
/// assert_eq!(weather_key("Paris"), weather_key("  paris  "));
/// assert_eq!(weather_key("Le Mans"), "weather_le_mans");
/// ```
pub fn weather_key(city: &str) -> String {
    format!("{}{}", WEATHER_KEY_PREFIX, normalize_key(city))
}
