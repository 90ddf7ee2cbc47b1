use crate::cell::Dimensions;
use crate::error::{Error, Result};
use anyhow::Context;
use std::str::FromStr;

/// Parameters for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
    /// Mines placed on the board; at most `height * width`.
    pub mines: usize,
    /// Fixes the mine layout and every guess when set.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(height: usize, width: usize, mines: usize) -> Self {
        GameConfig {
            height,
            width,
            mines,
            seed: None,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        GameConfig {
            seed: Some(seed),
            ..self
        }
    }

    pub fn validate(&self) -> Result<Dimensions> {
        let dims = Dimensions::new(self.height, self.width)?;
        if self.mines > dims.area() {
            return Err(Error::TooManyMines {
                height: self.height,
                width: self.width,
                mines: self.mines,
            });
        }
        Ok(dims)
    }

    /// Reads `MINESWEEPER_HEIGHT`, `MINESWEEPER_WIDTH`, `MINESWEEPER_MINES`
    /// and `MINESWEEPER_SEED`, keeping the default for any that are unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        fn parse<T: FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> anyhow::Result<Option<T>>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            lookup(key)
                .map(|raw| raw.trim().parse::<T>())
                .transpose()
                .with_context(|| format!("invalid {key}"))
        }

        let defaults = GameConfig::default();
        let config = GameConfig {
            height: parse(&lookup, "MINESWEEPER_HEIGHT")?.unwrap_or(defaults.height),
            width: parse(&lookup, "MINESWEEPER_WIDTH")?.unwrap_or(defaults.width),
            mines: parse(&lookup, "MINESWEEPER_MINES")?.unwrap_or(defaults.mines),
            seed: parse(&lookup, "MINESWEEPER_SEED")?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!((config.height, config.width, config.mines), (8, 8, 8));
    }

    #[test]
    fn test_overrides() {
        let config = GameConfig::from_lookup(lookup(&[
            ("MINESWEEPER_HEIGHT", "4"),
            ("MINESWEEPER_MINES", " 3 "),
            ("MINESWEEPER_SEED", "99"),
        ]))
        .unwrap();
        assert_eq!(config, GameConfig::new(4, 8, 3).with_seed(99));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_lookup(lookup(&[("MINESWEEPER_WIDTH", "wide")])).unwrap_err();
        assert!(err.to_string().contains("MINESWEEPER_WIDTH"));

        let err = GameConfig::from_lookup(lookup(&[("MINESWEEPER_MINES", "65")])).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn test_validate() {
        assert!(GameConfig::new(2, 2, 4).validate().is_ok());
        assert!(GameConfig::new(2, 2, 5).validate().is_err());
        assert!(GameConfig::new(0, 2, 0).validate().is_err());
    }
}
