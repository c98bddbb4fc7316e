use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Role;

/// Absolute amount difference below which two amounts are considered equal.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    /// Overrides the label derived from the platform file name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "ColumnProfile::ledger")]
    pub ledger: ColumnProfile,
    #[serde(default = "ColumnProfile::platform")]
    pub platform: ColumnProfile,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            label: None,
            tolerance: DEFAULT_TOLERANCE,
            ledger: ColumnProfile::ledger(),
            platform: ColumnProfile::platform(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column profile
// ---------------------------------------------------------------------------

/// Ordered candidate column names for one role. The first column holding a
/// value wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnProfile {
    pub identifier: Vec<String>,
    pub amount: Vec<String>,
}

impl ColumnProfile {
    /// DEBO export columns.
    pub fn ledger() -> Self {
        Self {
            identifier: strings(&["Cupón", "Cupon"]),
            amount: strings(&["Importe"]),
        }
    }

    /// Union of the APPYPF (`ID`), MELI (`Referencia externa`) and CLOVER
    /// (`Nro. de cupón`) layouts.
    pub fn platform() -> Self {
        Self {
            identifier: strings(&["ID", "Referencia externa", "Nro. de cupón", "Cupon"]),
            amount: strings(&["Importe", "Neto", "Monto"]),
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Ledger => Self::ledger(),
            Role::Platform => Self::platform(),
        }
    }

    fn validate(&self, role: Role) -> Result<(), ReconError> {
        for (field, columns) in [("identifier", &self.identifier), ("amount", &self.amount)] {
            if columns.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{role}.{field}: at least one column is required"
                )));
            }
            if columns.iter().any(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{role}.{field}: column names must not be blank"
                )));
            }
        }
        Ok(())
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }

        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err(ReconError::ConfigValidation("label must not be blank".into()));
            }
        }

        self.ledger.validate(Role::Ledger)?;
        self.platform.validate(Role::Platform)?;

        Ok(())
    }

    pub fn profile(&self, role: Role) -> &ColumnProfile {
        match role {
            Role::Ledger => &self.ledger,
            Role::Platform => &self.platform,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config.label, None);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.ledger, ColumnProfile::ledger());
        assert_eq!(config.platform, ColumnProfile::platform());
    }

    #[test]
    fn parse_full_config() {
        let input = r#"
label = "CLOVER"
tolerance = 0.5

[ledger]
identifier = ["Cupón"]
amount = ["Importe", "Total"]

[platform]
identifier = ["Nro. de cupón"]
amount = ["Neto"]
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.label.as_deref(), Some("CLOVER"));
        assert_eq!(config.tolerance, 0.5);
        assert_eq!(config.ledger.amount, vec!["Importe", "Total"]);
        assert_eq!(config.profile(Role::Platform).identifier, vec!["Nro. de cupón"]);
    }

    #[test]
    fn default_profiles_keep_fallback_order() {
        assert_eq!(ColumnProfile::for_role(Role::Ledger).identifier, vec!["Cupón", "Cupon"]);
        assert_eq!(
            ColumnProfile::for_role(Role::Platform).identifier,
            vec!["ID", "Referencia externa", "Nro. de cupón", "Cupon"]
        );
        assert_eq!(ColumnProfile::for_role(Role::Platform).amount, vec!["Importe", "Neto", "Monto"]);
    }

    #[test]
    fn reject_empty_candidates() {
        let input = r#"
[platform]
identifier = []
amount = ["Importe"]
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("platform.identifier"));
    }

    #[test]
    fn reject_blank_column_name() {
        let input = r#"
[ledger]
identifier = ["Cupón", "  "]
amount = ["Importe"]
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("must not be blank"));
    }

    #[test]
    fn reject_negative_tolerance() {
        let err = ReconConfig::from_toml("tolerance = -0.01").unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn reject_unknown_key() {
        let err = ReconConfig::from_toml("tolerence = 0.01").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_partial_profile() {
        // A profile table must name both column lists.
        let input = r#"
[ledger]
identifier = ["Cupón"]
"#;
        assert!(ReconConfig::from_toml(input).is_err());
    }
}
