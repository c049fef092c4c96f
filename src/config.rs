use std::{net::SocketAddr, str::FromStr, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::overpass::TagFilter;

pub const DEFAULT_RADIUS_METERS: f64 = 2000.0;

/// Everything the server reads from its environment at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    pub bind_addr: SocketAddr,
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    pub radius_meters: f64,
    pub geocode_limit: usize,
    pub geocode_timeout: Duration,
    pub search_timeout: Duration,
    pub filter: TagFilter,
    /// Plural used in "No {label} found within 2km"
    pub category_label: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_url: "https://overpass-api.de".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            radius_meters: DEFAULT_RADIUS_METERS,
            geocode_limit: 1,
            geocode_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(25),
            filter: TagFilter::chicken(),
            category_label: "chicken spots".to_string(),
        }
    }
}

impl FinderConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let radius_meters = parse_or(&var, "NEAREST_RADIUS_METERS", defaults.radius_meters)?;
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(eyre!("NEAREST_RADIUS_METERS must be positive, got {radius_meters}"));
        }
        let geocode_limit: usize = parse_or(&var, "NEAREST_GEOCODE_LIMIT", defaults.geocode_limit)?;
        if geocode_limit == 0 {
            return Err(eyre!("NEAREST_GEOCODE_LIMIT must be at least 1"));
        }

        let geocode_timeout = timeout_or(&var, "NEAREST_GEOCODE_TIMEOUT_SECS", defaults.geocode_timeout)?;
        let search_timeout = timeout_or(&var, "NEAREST_SEARCH_TIMEOUT_SECS", defaults.search_timeout)?;

        let filter = TagFilter {
            amenities: list_or(&var, "NEAREST_AMENITIES", defaults.filter.amenities),
            name_keywords: list_or(&var, "NEAREST_NAME_KEYWORDS", defaults.filter.name_keywords),
            cuisine_keywords: list_or(
                &var,
                "NEAREST_CUISINE_KEYWORDS",
                defaults.filter.cuisine_keywords,
            ),
        };
        if filter.amenities.is_empty() {
            return Err(eyre!("NEAREST_AMENITIES needs at least one amenity type"));
        }
        if filter.name_keywords.is_empty() && filter.cuisine_keywords.is_empty() {
            return Err(eyre!(
                "set NEAREST_NAME_KEYWORDS or NEAREST_CUISINE_KEYWORDS, a filter with neither matches nothing"
            ));
        }

        Ok(Self {
            bind_addr: parse_or(&var, "NEAREST_BIND_ADDR", defaults.bind_addr)?,
            nominatim_url: var("NEAREST_NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            overpass_url: var("NEAREST_OVERPASS_URL").unwrap_or(defaults.overpass_url),
            user_agent: var("NEAREST_USER_AGENT").unwrap_or(defaults.user_agent),
            radius_meters,
            geocode_limit,
            geocode_timeout,
            search_timeout,
            filter,
            category_label: var("NEAREST_CATEGORY_LABEL").unwrap_or(defaults.category_label),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("{key} has an invalid value {value:?}")),
    }
}

/// Whole seconds, at least one
fn timeout_or<F>(var: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(var, key, default.as_secs())? {
        0 => Err(eyre!("{key} must be at least 1 second")),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn list_or<F>(var: &F, key: &str, default: Vec<String>) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => default,
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = FinderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FinderConfig::default());
        assert_eq!(config.radius_meters, 2000.0);
        assert_eq!(config.geocode_limit, 1);
        assert_eq!(config.search_timeout, Duration::from_secs(25));
        assert_eq!(config.filter, TagFilter::chicken());
    }

    #[test]
    fn overrides_swap_the_category() {
        let config = FinderConfig::from_lookup(lookup(&[
            ("NEAREST_RADIUS_METERS", "750"),
            ("NEAREST_AMENITIES", "cafe"),
            ("NEAREST_NAME_KEYWORDS", " bagel , ,donut"),
            ("NEAREST_CUISINE_KEYWORDS", ""),
            ("NEAREST_CATEGORY_LABEL", "bagel shops"),
            ("NEAREST_BIND_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(config.radius_meters, 750.0);
        assert_eq!(config.filter.amenities, vec!["cafe".to_string()]);
        assert_eq!(
            config.filter.name_keywords,
            vec!["bagel".to_string(), "donut".to_string()]
        );
        // blank values fall back to the default
        assert_eq!(config.filter.cuisine_keywords, TagFilter::chicken().cuisine_keywords);
        assert_eq!(config.category_label, "bagel shops");
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(FinderConfig::from_lookup(lookup(&[("NEAREST_RADIUS_METERS", "far")])).is_err());
        assert!(FinderConfig::from_lookup(lookup(&[("NEAREST_RADIUS_METERS", "-5")])).is_err());
        assert!(FinderConfig::from_lookup(lookup(&[("NEAREST_GEOCODE_LIMIT", "0")])).is_err());
        assert!(FinderConfig::from_lookup(lookup(&[("NEAREST_AMENITIES", ",")])).is_err());
    }

    #[test]
    fn rejects_zero_timeouts() {
        for key in ["NEAREST_GEOCODE_TIMEOUT_SECS", "NEAREST_SEARCH_TIMEOUT_SECS"] {
            let err = FinderConfig::from_lookup(lookup(&[(key, "0")])).unwrap_err();
            assert!(err.to_string().contains(key), "{err}");
        }
        let config =
            FinderConfig::from_lookup(lookup(&[("NEAREST_SEARCH_TIMEOUT_SECS", "1")])).unwrap();
        assert_eq!(config.search_timeout, Duration::from_secs(1));
    }
}
