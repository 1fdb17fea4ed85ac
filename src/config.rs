use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const START_OF_LINE: &str = "startofline";
pub const TAB_STOP: &str = "tabstop";
pub const SMART_TAB: &str = "smarttab";
pub const SHIFT_WIDTH: &str = "shiftwidth";
pub const EXPAND_TAB: &str = "expandtab";
pub const AUTO_INDENT: &str = "autoindent";

pub const ON: &str = "on";
pub const OFF: &str = "off";

/// Flat option map. Unknown keys are kept but have no effect.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(START_OF_LINE.to_string(), ON.to_string());
        values.insert(TAB_STOP.to_string(), "8".to_string());
        values.insert(SMART_TAB.to_string(), OFF.to_string());
        values.insert(SHIFT_WIDTH.to_string(), "8".to_string());
        values.insert(EXPAND_TAB.to_string(), OFF.to_string());
        values.insert(AUTO_INDENT.to_string(), OFF.to_string());
        Self { values }
    }
}

/// Indentation parameters handed to the surface's indenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentOptions {
    pub shift_width: usize,
    pub tab_stop: usize,
    pub expand_tab: bool,
}

impl Config {
    /// Parses a persisted JSON object of string values over the defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let loaded: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut config = Self::default();
        config.values.extend(loaded);
        Ok(config)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("on" | "true" | "1"))
    }

    fn number(&self, key: &str, default_: usize) -> usize {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default_)
    }

    pub fn start_of_line(&self) -> bool {
        self.flag(START_OF_LINE)
    }

    pub fn tab_stop(&self) -> usize {
        self.number(TAB_STOP, 8)
    }

    pub fn smart_tab(&self) -> bool {
        self.flag(SMART_TAB)
    }

    pub fn shift_width(&self) -> usize {
        self.number(SHIFT_WIDTH, 8)
    }

    pub fn expand_tab(&self) -> bool {
        self.flag(EXPAND_TAB)
    }

    pub fn auto_indent(&self) -> bool {
        self.flag(AUTO_INDENT)
    }

    pub fn indent_options(&self) -> IndentOptions {
        IndentOptions {
            shift_width: self.shift_width(),
            tab_stop: self.tab_stop(),
            expand_tab: self.expand_tab(),
        }
    }

    /// `key: value` lines, as listed by `:set`.
    pub fn describe(&self) -> String {
        self.iter().map(|(k, v)| format!("{k}: {v}\n")).collect()
    }

    /// Applies one `:set` argument: `opt=value`, `noopt` or `opt`.
    pub fn apply_set_argument(&mut self, arg: &str) {
        if let Some((key, value)) = arg.split_once('=') {
            self.set(key.trim(), value.trim());
        } else if let Some(key) = arg.strip_prefix("no")
            && self.values.contains_key(key)
        {
            self.set(key, OFF);
        } else {
            self.set(arg, ON);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_vi() {
        let config = Config::default();
        assert!(config.start_of_line());
        assert_eq!(config.tab_stop(), 8);
        assert_eq!(config.shift_width(), 8);
        assert!(!config.expand_tab());
        assert!(!config.smart_tab());
        assert!(!config.auto_indent());
    }

    #[test]
    fn unknown_keys_are_stored() {
        let mut config = Config::default();
        config.set("wrapscan", "on");
        assert_eq!(config.get("wrapscan"), Some("on"));
        assert!(config.describe().contains("wrapscan: on\n"));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let mut config = Config::default();
        config.set(TAB_STOP, "wide");
        assert_eq!(config.tab_stop(), 8);
    }

    #[test]
    fn json_merges_over_defaults() {
        let config = Config::from_json(r#"{"tabstop": "4", "expandtab": "true"}"#).unwrap();
        assert_eq!(config.tab_stop(), 4);
        assert!(config.expand_tab());
        assert!(config.start_of_line());
    }

    #[test]
    fn set_arguments() {
        let mut config = Config::default();
        config.apply_set_argument("shiftwidth=2");
        config.apply_set_argument("expandtab");
        config.apply_set_argument("nostartofline");
        assert_eq!(config.shift_width(), 2);
        assert!(config.expand_tab());
        assert!(!config.start_of_line());
    }
}
