#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    Nearest,
    Zero,
    Positive,
    Negative,
}

impl RoundingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundingMode::Nearest => "nearest",
            RoundingMode::Zero => "zero",
            RoundingMode::Positive => "positive",
            RoundingMode::Negative => "negative",
        }
    }
}

/// Value of `FPSPY_FORCE_ROUNDING`: a rounding mode plus the optional
/// denormals-are-zero and flush-to-zero flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceRounding {
    pub mode: RoundingMode,
    pub daz: bool,
    pub ftz: bool,
}

impl std::fmt::Display for ForceRounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { mode, daz, ftz } = self;
        f.write_str(mode.as_str())?;
        if *daz {
            f.write_str(",daz")?;
        }
        if *ftz {
            f.write_str(",ftz")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingConfig {
    /// Also the name of the directory collecting this run's artifacts.
    pub name: &'static str,
    pub force_rounding: Option<ForceRounding>,
}

const fn forced(name: &'static str, mode: RoundingMode, daz: bool, ftz: bool) -> RoundingConfig {
    RoundingConfig {
        name,
        force_rounding: Some(ForceRounding { mode, daz, ftz }),
    }
}

use RoundingMode::{Negative, Nearest, Positive, Zero};

pub static ROUNDING_CONFIGS: [RoundingConfig; 17] = [
    RoundingConfig {
        name: "rounding_baseline",
        force_rounding: None,
    },
    forced("nearest", Nearest, false, false),
    forced("nearest_ftz", Nearest, false, true),
    forced("nearest_daz", Nearest, true, false),
    forced("nearest_daz_ftz", Nearest, true, true),
    forced("zero", Zero, false, false),
    forced("zero_ftz", Zero, false, true),
    forced("zero_daz", Zero, true, false),
    forced("zero_daz_ftz", Zero, true, true),
    forced("positive", Positive, false, false),
    forced("positive_ftz", Positive, false, true),
    forced("positive_daz", Positive, true, false),
    forced("positive_daz_ftz", Positive, true, true),
    forced("negative", Negative, false, false),
    forced("negative_ftz", Negative, false, true),
    forced("negative_daz", Negative, true, false),
    forced("negative_daz_ftz", Negative, true, true),
];

pub fn find(name: &str) -> Option<&'static RoundingConfig> {
    ROUNDING_CONFIGS.iter().find(|config| config.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn names_are_unique_and_spell_out_the_flags() {
        for (i, config) in ROUNDING_CONFIGS.iter().enumerate() {
            assert!(ROUNDING_CONFIGS[i + 1..].iter().all(|other| other.name != config.name));
            if let Some(forced) = config.force_rounding {
                let expected = forced.to_string().replace(',', "_");
                assert!(config.name == expected);
            }
        }
    }

    #[test]
    fn baseline_runs_first_without_forced_rounding() {
        assert!(ROUNDING_CONFIGS[0].force_rounding == None);
        assert!(ROUNDING_CONFIGS[1..].iter().all(|c| c.force_rounding.is_some()));
    }

    #[test]
    fn force_rounding_values() {
        let rendered = |name| find(name).unwrap().force_rounding.unwrap().to_string();
        assert!(rendered("zero") == "zero");
        assert!(rendered("positive_ftz") == "positive,ftz");
        assert!(rendered("negative_daz") == "negative,daz");
        assert!(rendered("nearest_daz_ftz") == "nearest,daz,ftz");
        assert!(find("upward").is_none());
    }
}
