//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::market::table::DEFAULT_CONVERSION;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing, seed, and income.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Household load parameters.
    #[serde(default)]
    pub house: HouseConfig,
    /// Market data and fallback parameters.
    #[serde(default)]
    pub market: MarketConfig,
    /// Wallet parameters.
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Automated purchase policy.
    #[serde(default)]
    pub auto_buy: AutoBuyConfig,
}

/// Simulation timing, seed, and income.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated hours to run (must be > 0).
    pub hours: u64,
    /// Master random seed.
    pub seed: u64,
    /// Calendar start year.
    pub start_year: i32,
    /// Calendar start month (1-12).
    pub start_month: u32,
    /// Calendar start day (1-31).
    pub start_day: u32,
    /// Income credited on each calendar month rollover (USD).
    pub monthly_income_usd: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hours: 24 * 30,
            seed: 42,
            start_year: 2025,
            start_month: 1,
            start_day: 1,
            monthly_income_usd: 200.0,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Nameplate capacity (kWh).
    pub capacity_kwh: f64,
    /// Energy held at simulation start (kWh).
    pub initial_charge_kwh: f64,
    /// Assumed unit cost of the starting energy (USD/kWh).
    pub initial_cost_per_kwh: f64,
    /// Years until health decays to zero.
    pub lifespan_years: f64,
    /// Capital cost per kWh of capacity (USD/kWh).
    pub asset_cost_per_kwh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 150.0,
            initial_charge_kwh: 50.0,
            initial_cost_per_kwh: 0.10,
            lifespan_years: 12.0,
            asset_cost_per_kwh: 336.87,
        }
    }
}

/// Household load parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseConfig {
    /// Baseline hourly consumption (kWh), scaled by the diurnal profile.
    pub base_rate_kwh: f64,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self { base_rate_kwh: 0.4 }
    }
}

/// Market data and fallback parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Path to the yearly price CSV; `None` runs the random-walk fallback.
    pub data_path: Option<PathBuf>,
    /// Source price to USD/kWh conversion factor.
    pub conversion_factor: f64,
    /// Price reported before the first table hit (USD/kWh).
    pub initial_price: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            conversion_factor: DEFAULT_CONVERSION,
            initial_price: 0.10,
        }
    }
}

/// Wallet parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalletConfig {
    /// Cash at simulation start (USD).
    pub initial_balance_usd: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            initial_balance_usd: 5000.0,
        }
    }
}

/// Automated purchase policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoBuyConfig {
    /// Whether the policy runs each tick.
    pub enabled: bool,
    /// Buy when the market price is at or below this (USD/kWh).
    pub threshold_usd_per_kwh: f64,
    /// Fixed purchase size per triggered tick (kWh).
    pub amount_kwh: f64,
}

impl Default for AutoBuyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_usd_per_kwh: 0.08,
            amount_kwh: 1.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: one simulated month with the default
    /// household, battery, and market.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig::default(),
            house: HouseConfig::default(),
            market: MarketConfig::default(),
            wallet: WalletConfig::default(),
            auto_buy: AutoBuyConfig::default(),
        }
    }

    /// Returns the auto-trader preset: automated purchases enabled with a
    /// generous threshold and a larger trade size.
    pub fn auto_trader() -> Self {
        Self {
            auto_buy: AutoBuyConfig {
                enabled: true,
                threshold_usd_per_kwh: 0.09,
                amount_kwh: 5.0,
            },
            ..Self::baseline()
        }
    }

    /// Returns the heavy-load preset: double the household draw backed by a
    /// bigger battery.
    pub fn heavy_load() -> Self {
        Self {
            house: HouseConfig { base_rate_kwh: 0.8 },
            battery: BatteryConfig {
                capacity_kwh: 300.0,
                initial_charge_kwh: 100.0,
                ..BatteryConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "auto_trader", "heavy_load"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "auto_trader" => Ok(Self::auto_trader()),
            "heavy_load" => Ok(Self::heavy_load()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.hours == 0 {
            errors.push(ConfigError {
                field: "simulation.hours".into(),
                message: "must be > 0".into(),
            });
        }
        if NaiveDate::from_ymd_opt(s.start_year, s.start_month, s.start_day).is_none() {
            errors.push(ConfigError {
                field: "simulation.start_day".into(),
                message: format!(
                    "{}-{:02}-{:02} is not a valid calendar date",
                    s.start_year, s.start_month, s.start_day
                ),
            });
        }
        if s.monthly_income_usd < 0.0 {
            errors.push(ConfigError {
                field: "simulation.monthly_income_usd".into(),
                message: "must be >= 0".into(),
            });
        }

        let bat = &self.battery;
        if bat.capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=bat.capacity_kwh).contains(&bat.initial_charge_kwh) {
            errors.push(ConfigError {
                field: "battery.initial_charge_kwh".into(),
                message: "must be in [0, battery.capacity_kwh]".into(),
            });
        }
        if bat.initial_cost_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "battery.initial_cost_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if bat.lifespan_years <= 0.0 {
            errors.push(ConfigError {
                field: "battery.lifespan_years".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.asset_cost_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "battery.asset_cost_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.house.base_rate_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "house.base_rate_kwh".into(),
                message: "must be > 0".into(),
            });
        }

        let m = &self.market;
        if m.conversion_factor <= 0.0 {
            errors.push(ConfigError {
                field: "market.conversion_factor".into(),
                message: "must be > 0".into(),
            });
        }
        if m.initial_price <= 0.0 {
            errors.push(ConfigError {
                field: "market.initial_price".into(),
                message: "must be > 0".into(),
            });
        }

        if self.wallet.initial_balance_usd < 0.0 {
            errors.push(ConfigError {
                field: "wallet.initial_balance_usd".into(),
                message: "must be >= 0".into(),
            });
        }

        let a = &self.auto_buy;
        if a.amount_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "auto_buy.amount_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if a.threshold_usd_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "auto_buy.threshold_usd_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}
