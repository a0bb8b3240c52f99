// Companies covered by the dashboards and their fixed presentation data

/// Company identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Company {
    Tesla,
    GameStop,
}

/// Static per-company data: where to fetch from and how to draw it
#[derive(Debug, Clone, Copy)]
pub struct CompanyProfile {
    pub company: Company,
    pub name: &'static str,
    pub ticker: &'static str,
    /// Lowercase stem used for output file names
    pub slug: &'static str,
    pub revenue_url: &'static str,
    /// RGB
    pub price_color: (u8, u8, u8),
    pub revenue_color: (u8, u8, u8),
}

pub const PROFILES: &[CompanyProfile] = &[
    CompanyProfile {
        company: Company::Tesla,
        name: "Tesla",
        ticker: "TSLA",
        slug: "tesla",
        revenue_url: "https://www.macrotrends.net/stocks/charts/TSLA/tesla/revenue",
        price_color: (0, 0, 255),
        revenue_color: (0, 128, 0),
    },
    CompanyProfile {
        company: Company::GameStop,
        name: "GameStop",
        ticker: "GME",
        slug: "gamestop",
        revenue_url: "https://www.macrotrends.net/stocks/charts/GME/gamestop/revenue",
        price_color: (255, 0, 0),
        revenue_color: (128, 0, 128),
    },
];

impl Company {
    /// All companies, in processing order
    pub const ALL: [Company; 2] = [Company::Tesla, Company::GameStop];

    pub fn profile(self) -> &'static CompanyProfile {
        PROFILES
            .iter()
            .find(|p| p.company == self)
            .unwrap_or(&PROFILES[0])
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Dashboard title, e.g. "Tesla: Share Price vs Revenue"
    pub fn dashboard_title(self) -> String {
        format!("{}: Share Price vs Revenue", self.name())
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
