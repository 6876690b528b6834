/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (usually with `#[serde(default = ...)]`
/// on optional fields) and call `Config::from_env()` at startup. Field names map
/// to upper-cased env vars, so `database_url` reads `DATABASE_URL`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Same as [`Config::from_env`] but reads from an explicit iterator of pairs.
    fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
