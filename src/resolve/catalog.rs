/// An indicator the pipelines look for, and how to recognise its file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndicatorSpec {
    /// Column name the indicator gets in the merged table.
    pub key: &'static str,
    /// Conventional file name published for this indicator, tried before
    /// any fuzzy matching.
    pub conventional_name: Option<&'static str>,
    /// Substrings that must all occur in a lowercased file name.
    pub tokens: &'static [&'static str],
}

impl IndicatorSpec {
    /// Exact names tried in order: `<key>.csv`, `<key>.CSV`, then the
    /// conventional name.
    pub fn exact_names(&self) -> Vec<String> {
        let mut names = vec![format!("{}.csv", self.key), format!("{}.CSV", self.key)];
        if let Some(n) = self.conventional_name {
            names.push(n.to_string());
        }
        names
    }
}

pub const EARNINGS: IndicatorSpec = IndicatorSpec {
    key: "Earnings",
    conventional_name: Some("Earnings.csv"),
    tokens: &["earn"],
};

pub const EMP_POP: IndicatorSpec = IndicatorSpec {
    key: "EmpPop",
    conventional_name: Some("Employment to population ratio.csv"),
    tokens: &["employment", "population"],
};

pub const UNEMP: IndicatorSpec = IndicatorSpec {
    key: "Unemp",
    conventional_name: Some("Unemployment rate.csv"),
    tokens: &["unemployment"],
};

pub const LFPR: IndicatorSpec = IndicatorSpec {
    key: "LFPR",
    conventional_name: Some("Labour Force participation rate.csv"),
    tokens: &["labour", "force", "participation"],
};

pub const INFORMAL: IndicatorSpec = IndicatorSpec {
    key: "Informal",
    conventional_name: Some("Informal employment rate.csv"),
    tokens: &["informal"],
};

pub const POVERTY: IndicatorSpec = IndicatorSpec {
    key: "Poverty",
    conventional_name: Some("working poverty rate.csv"),
    tokens: &["poverty"],
};

pub const NEET: IndicatorSpec = IndicatorSpec {
    key: "NEET",
    conventional_name: Some("YOUTH NEET rate.csv"),
    tokens: &["neet"],
};

/// Indicators feeding the displacement index, in definition order.
pub const DISPLACEMENT_INDICATORS: &[IndicatorSpec] =
    &[EMP_POP, UNEMP, LFPR, INFORMAL, POVERTY, NEET];

/// Indicators feeding the productivity and risk indices, in definition order.
pub const LABOUR_MARKET_INDICATORS: &[IndicatorSpec] =
    &[EARNINGS, EMP_POP, INFORMAL, LFPR, UNEMP, POVERTY, NEET];
